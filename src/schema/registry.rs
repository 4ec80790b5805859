//! Schema registry for loading schemas and producing resource descriptors.
//!
//! The registry owns the raw [`Schema`] documents and hands out shared
//! [`ResourceDescriptor`]s for each registered resource type. While building a
//! descriptor it enforces two preconditions the diff engine relies on: every
//! multi-valued complex attribute defines an `operation` sub-attribute, and
//! the core schema carries the common attributes including `meta.attributes`.

use super::descriptor::{OPERATION_SUB_ATTRIBUTE, ResourceDescriptor};
use super::embedded;
use super::types::{AttributeDefinition, AttributeType, Schema};
use crate::error::{ScimError, ScimResult};

use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Registry for SCIM schemas and resource types.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
    common_attributes: Vec<AttributeDefinition>,
    resource_types: HashMap<String, Arc<ResourceDescriptor>>,
}

impl SchemaRegistry {
    /// Create a registry with the embedded core schemas and the `User` and
    /// `Group` resource types registered.
    pub fn new() -> ScimResult<Self> {
        Self::with_embedded_schemas()
    }

    /// Same as [`SchemaRegistry::new`].
    pub fn with_embedded_schemas() -> ScimResult<Self> {
        let mut registry = Self::empty()?;
        registry.add_schema(Self::load_schema_from_str(embedded::core_user_schema())?);
        registry.add_schema(Self::load_schema_from_str(embedded::core_group_schema())?);
        registry.add_schema(Self::load_schema_from_str(embedded::enterprise_user_schema())?);

        registry.register_resource_type(
            "User",
            "Users",
            embedded::CORE_USER_SCHEMA,
            &[embedded::ENTERPRISE_USER_SCHEMA],
        )?;
        registry.register_resource_type("Group", "Groups", embedded::CORE_GROUP_SCHEMA, &[])?;

        Ok(registry)
    }

    /// Create a registry with only the common attributes loaded.
    pub fn empty() -> ScimResult<Self> {
        let common_attributes = serde_json::from_str(embedded::common_attributes())?;
        Ok(Self {
            schemas: HashMap::new(),
            common_attributes,
            resource_types: HashMap::new(),
        })
    }

    /// Load a schema from a JSON file.
    pub fn load_schema_from_file<P: AsRef<Path>>(path: P) -> ScimResult<Schema> {
        let content = fs::read_to_string(&path).map_err(|e| {
            ScimError::schema_not_found(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::load_schema_from_str(&content)
    }

    /// Load a schema from a JSON string.
    pub fn load_schema_from_str(content: &str) -> ScimResult<Schema> {
        Ok(serde_json::from_str(content)?)
    }

    /// Get all available schemas.
    pub fn get_schemas(&self) -> Vec<&Schema> {
        self.schemas.values().collect()
    }

    /// Get a specific schema by ID, ignoring case.
    pub fn get_schema(&self, id: &str) -> Option<&Schema> {
        self.schemas.get(&id.to_ascii_lowercase())
    }

    /// Add or replace a schema. Resource types registered earlier keep the
    /// descriptors they were built with.
    pub fn add_schema(&mut self, schema: Schema) {
        self.schemas.insert(schema.id.to_ascii_lowercase(), schema);
    }

    /// Register a resource type built from already added schemas.
    pub fn register_resource_type(
        &mut self,
        name: &str,
        endpoint: &str,
        core_schema: &str,
        extension_schemas: &[&str],
    ) -> ScimResult<Arc<ResourceDescriptor>> {
        let mut core = self
            .get_schema(core_schema)
            .cloned()
            .ok_or_else(|| ScimError::schema_not_found(core_schema))?;
        for common in &self.common_attributes {
            if core.attribute(&common.name).is_none() {
                core.attributes.push(common.clone());
            }
        }
        Self::prepare_schema(&mut core);

        let mut extensions = Vec::with_capacity(extension_schemas.len());
        for id in extension_schemas {
            let mut extension = self
                .get_schema(id)
                .cloned()
                .ok_or_else(|| ScimError::schema_not_found(*id))?;
            Self::prepare_schema(&mut extension);
            extensions.push(extension);
        }
        let extension_refs: Vec<&Schema> = extensions.iter().collect();

        let descriptor = Arc::new(ResourceDescriptor::new(name, endpoint, &core, &extension_refs));
        debug!(
            "Registered resource type '{}' with {} schema(s)",
            name,
            1 + extension_refs.len()
        );
        self.resource_types
            .insert(name.to_string(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Get the descriptor of a registered resource type.
    pub fn resource_descriptor(&self, name: &str) -> ScimResult<Arc<ResourceDescriptor>> {
        self.resource_types
            .get(name)
            .cloned()
            .ok_or_else(|| ScimError::UnknownResourceType(name.to_string()))
    }

    pub fn user_descriptor(&self) -> ScimResult<Arc<ResourceDescriptor>> {
        self.resource_descriptor("User")
    }

    pub fn group_descriptor(&self) -> ScimResult<Arc<ResourceDescriptor>> {
        self.resource_descriptor("Group")
    }

    /// Names of all registered resource types.
    pub fn resource_types(&self) -> Vec<&str> {
        self.resource_types.keys().map(String::as_str).collect()
    }

    fn prepare_schema(schema: &mut Schema) {
        for attr in &mut schema.attributes {
            Self::add_operation_sub_attribute(attr);
        }
    }

    /// Multi-valued complex attributes need an `operation` sub-attribute so a
    /// PATCH body can mark individual values for deletion.
    fn add_operation_sub_attribute(attr: &mut AttributeDefinition) {
        if attr.is_complex() && attr.multi_valued && !attr.has_sub_attribute(OPERATION_SUB_ATTRIBUTE) {
            attr.sub_attributes.push(AttributeDefinition {
                case_exact: true,
                ..AttributeDefinition::new(OPERATION_SUB_ATTRIBUTE, AttributeType::String)
            });
        }
    }
}
