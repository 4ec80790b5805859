//! Embedded core SCIM schemas.
//!
//! The User, Group and Enterprise User schemas from RFC 7643, reduced to the
//! attributes a provisioning client diffs, plus the common attributes every
//! resource type carries. Keeping them as static strings means the registry
//! works without schema files on disk.

/// Schema URI of the core User schema.
pub const CORE_USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// Schema URI of the core Group schema.
pub const CORE_GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

/// Schema URI of the Enterprise User extension.
pub const ENTERPRISE_USER_SCHEMA: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// Returns the core User schema as a JSON string.
pub fn core_user_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:core:2.0:User",
  "name": "User",
  "description": "User Account",
  "attributes": [
    { "name": "userName", "type": "string", "required": true, "uniqueness": "server" },
    {
      "name": "name",
      "type": "complex",
      "subAttributes": [
        { "name": "formatted", "type": "string" },
        { "name": "familyName", "type": "string" },
        { "name": "givenName", "type": "string" },
        { "name": "middleName", "type": "string" },
        { "name": "honorificPrefix", "type": "string" },
        { "name": "honorificSuffix", "type": "string" }
      ]
    },
    { "name": "displayName", "type": "string" },
    { "name": "nickName", "type": "string" },
    { "name": "profileUrl", "type": "reference" },
    { "name": "title", "type": "string" },
    { "name": "userType", "type": "string" },
    { "name": "preferredLanguage", "type": "string" },
    { "name": "locale", "type": "string" },
    { "name": "timezone", "type": "string" },
    { "name": "active", "type": "boolean" },
    { "name": "password", "type": "string", "mutability": "writeOnly" },
    {
      "name": "emails",
      "type": "complex",
      "multiValued": true,
      "subAttributes": [
        { "name": "value", "type": "string" },
        { "name": "display", "type": "string" },
        { "name": "type", "type": "string" },
        { "name": "primary", "type": "boolean" }
      ]
    },
    {
      "name": "phoneNumbers",
      "type": "complex",
      "multiValued": true,
      "subAttributes": [
        { "name": "value", "type": "string" },
        { "name": "display", "type": "string" },
        { "name": "type", "type": "string" },
        { "name": "primary", "type": "boolean" }
      ]
    },
    {
      "name": "addresses",
      "type": "complex",
      "multiValued": true,
      "subAttributes": [
        { "name": "formatted", "type": "string" },
        { "name": "streetAddress", "type": "string" },
        { "name": "locality", "type": "string" },
        { "name": "region", "type": "string" },
        { "name": "postalCode", "type": "string" },
        { "name": "country", "type": "string" },
        { "name": "type", "type": "string" },
        { "name": "primary", "type": "boolean" }
      ]
    },
    {
      "name": "groups",
      "type": "complex",
      "multiValued": true,
      "mutability": "readOnly",
      "subAttributes": [
        { "name": "value", "type": "string", "mutability": "readOnly" },
        { "name": "$ref", "type": "reference", "mutability": "readOnly" },
        { "name": "display", "type": "string", "mutability": "readOnly" },
        { "name": "type", "type": "string", "mutability": "readOnly" }
      ]
    },
    {
      "name": "roles",
      "type": "string",
      "multiValued": true
    }
  ]
}"#
}

/// Returns the core Group schema as a JSON string.
pub fn core_group_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:core:2.0:Group",
  "name": "Group",
  "description": "Group",
  "attributes": [
    { "name": "displayName", "type": "string", "required": true },
    {
      "name": "members",
      "type": "complex",
      "multiValued": true,
      "subAttributes": [
        { "name": "value", "type": "string", "mutability": "immutable" },
        { "name": "$ref", "type": "reference", "mutability": "immutable" },
        { "name": "display", "type": "string", "mutability": "readOnly" },
        { "name": "type", "type": "string", "mutability": "immutable" }
      ]
    }
  ]
}"#
}

/// Returns the Enterprise User extension schema as a JSON string.
pub fn enterprise_user_schema() -> &'static str {
    r#"{
  "id": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User",
  "name": "EnterpriseUser",
  "description": "Enterprise User",
  "attributes": [
    { "name": "employeeNumber", "type": "string" },
    { "name": "costCenter", "type": "string" },
    { "name": "organization", "type": "string" },
    { "name": "division", "type": "string" },
    { "name": "department", "type": "string" },
    {
      "name": "manager",
      "type": "complex",
      "subAttributes": [
        { "name": "value", "type": "string" },
        { "name": "$ref", "type": "reference" },
        { "name": "displayName", "type": "string", "mutability": "readOnly" }
      ]
    }
  ]
}"#
}

/// Returns the attributes common to every resource type (RFC 7643 §3.1).
///
/// `meta.attributes` lists the attribute paths a PATCH request removes.
pub fn common_attributes() -> &'static str {
    r#"[
  { "name": "id", "type": "string", "caseExact": true, "mutability": "readOnly", "uniqueness": "server" },
  { "name": "externalId", "type": "string", "caseExact": true },
  {
    "name": "meta",
    "type": "complex",
    "mutability": "readOnly",
    "subAttributes": [
      { "name": "resourceType", "type": "string", "caseExact": true, "mutability": "readOnly" },
      { "name": "created", "type": "dateTime", "mutability": "readOnly" },
      { "name": "lastModified", "type": "dateTime", "mutability": "readOnly" },
      { "name": "location", "type": "reference", "mutability": "readOnly" },
      { "name": "version", "type": "string", "caseExact": true, "mutability": "readOnly" },
      { "name": "attributes", "type": "string", "multiValued": true }
    ]
  }
]"#
}
