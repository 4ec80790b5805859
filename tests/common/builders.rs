//! Fluent builders for User test data.

use serde_json::{Map, Value, json};

const ENTERPRISE: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// Builder for User resources with fluent API for creating test data
#[derive(Debug, Clone)]
pub struct UserBuilder {
    data: Map<String, Value>,
}

impl UserBuilder {
    /// Create a new UserBuilder with only a userName
    pub fn new() -> Self {
        let mut data = Map::new();
        data.insert("userName".to_string(), json!("bjensen"));
        Self { data }
    }

    /// Start from existing JSON resource data
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(data) => Self { data },
            other => panic!("user data must be an object, got {}", other),
        }
    }

    /// Set any core attribute
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.data.insert(name.to_string(), value);
        self
    }

    /// Remove a core attribute
    pub fn without(mut self, name: &str) -> Self {
        self.data.remove(name);
        self
    }

    pub fn with_name(self, given: &str, family: &str) -> Self {
        self.with("name", json!({ "givenName": given, "familyName": family }))
    }

    /// Append an email with the given type
    pub fn with_email(mut self, value: &str, kind: &str) -> Self {
        let emails = self
            .data
            .entry("emails".to_string())
            .or_insert_with(|| json!([]));
        if let Value::Array(emails) = emails {
            emails.push(json!({ "value": value, "type": kind }));
        }
        self
    }

    pub fn with_roles(self, roles: &[&str]) -> Self {
        self.with("roles", json!(roles))
    }

    /// Set an enterprise extension attribute
    pub fn with_enterprise(mut self, name: &str, value: Value) -> Self {
        let extension = self
            .data
            .entry(ENTERPRISE.to_string())
            .or_insert_with(|| json!({}));
        if let Value::Object(extension) = extension {
            extension.insert(name.to_string(), value);
        }
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.data)
    }
}

impl Default for UserBuilder {
    fn default() -> Self {
        Self::new()
    }
}
