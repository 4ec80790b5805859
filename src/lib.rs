//! SCIM resource diff library for Rust.
//!
//! Computes the modifications that turn one version of a SCIM resource into
//! another and renders them as a SCIM 1.1 style PATCH request body: changed
//! attributes with their new values, removed multi-valued entries marked with
//! `operation: "delete"`, and deleted attribute paths under `meta.attributes`.
//!
//! # Core Components
//!
//! - [`Diff`] - Diff generation and patch body construction
//! - [`AttributeSelector`] - Restricts a diff to selected attributes
//! - [`SchemaRegistry`] - Schemas and resource descriptors
//! - [`ResourceFactory`] - Turns attribute trees into typed resources
//!
//! # Quick Start
//!
//! ```rust
//! use scim_diff::{Diff, SchemaRegistry, UserResource};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let users = SchemaRegistry::new()?.user_descriptor()?;
//! let source = UserResource::from_json(users.clone(), &json!({
//!     "userName": "bjensen", "title": "Tour Guide", "nickName": "Babs"
//! }))?;
//! let target = UserResource::from_json(users, &json!({
//!     "userName": "bjensen", "title": "Tour Lead"
//! }))?;
//!
//! let diff = Diff::generate(&source, &target, &[])?;
//! assert_eq!(
//!     diff.to_patch_json(),
//!     json!({
//!         "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
//!         "meta": { "attributes": ["nickName"] },
//!         "title": "Tour Lead"
//!     })
//! );
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod error;
pub mod resource;
pub mod schema;

// Re-export commonly used types for convenience
pub use diff::{AttributePath, AttributeSelector, Diff, DiffBuilder};
pub use error::{ParseError, ScimError, ScimResult, ValidationError};
pub use resource::{
    AttributeValue, BaseResource, BaseResourceFactory, Resource, ResourceFactory, ScimAttribute,
    ScimObject, UserResource, UserResourceFactory,
};
pub use schema::{AttributeDescriptor, ResourceDescriptor, Schema, SchemaRegistry};
