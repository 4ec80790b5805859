//! Schema definitions, descriptors and the schema registry.
//!
//! # Key Types
//!
//! - [`Schema`] - RFC 7643 schema document with attribute definitions
//! - [`AttributeDescriptor`] - an attribute definition bound to its schema URI
//! - [`ResourceDescriptor`] - the schemas and attributes of one resource type
//! - [`SchemaRegistry`] - loads schemas and hands out resource descriptors
//!
//! # Examples
//!
//! ```rust
//! use scim_diff::schema::SchemaRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new()?;
//! let users = registry.user_descriptor()?;
//! assert!(users.meta_descriptor().is_some());
//! # Ok(())
//! # }
//! ```

pub mod descriptor;
pub mod embedded;
pub mod registry;
pub mod types;


// Re-export the main types for convenience
pub use descriptor::{
    AttributeDescriptor, DELETE_OPERATION, META_ATTRIBUTE, META_ATTRIBUTES_SUB_ATTRIBUTE,
    NORMATIVE_SUB_ATTRIBUTES, OPERATION_SUB_ATTRIBUTE, ResourceDescriptor,
};
pub use embedded::{CORE_GROUP_SCHEMA, CORE_USER_SCHEMA, ENTERPRISE_USER_SCHEMA};
pub use registry::SchemaRegistry;
pub use types::{AttributeDefinition, AttributeType, Mutability, Schema, Uniqueness};
