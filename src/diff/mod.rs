//! Diff generation between two versions of a SCIM resource.
//!
//! # Key Types
//!
//! - [`AttributePath`] - parsed `[schema:]attribute[.subAttribute]` path
//! - [`AttributeSelector`] - restricts a diff to named attributes
//! - [`Diff`] - attributes to delete and attributes to add or replace
//! - [`DiffBuilder`] - configures and runs a diff
//!
//! A [`Diff`] can be turned into a PATCH request body with
//! [`Diff::partial_resource`] or [`Diff::to_patch_json`].
//!
//! # Examples
//!
//! ```rust
//! use scim_diff::diff::Diff;
//! use scim_diff::resource::{UserResource, UserResourceFactory};
//! use scim_diff::schema::SchemaRegistry;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let users = SchemaRegistry::new()?.user_descriptor()?;
//! let source = UserResource::from_json(users.clone(), &json!({
//!     "userName": "bjensen",
//!     "emails": [{ "value": "b@example.com", "type": "work" }]
//! }))?;
//! let target = UserResource::from_json(users, &json!({
//!     "userName": "bjensen",
//!     "emails": [{ "value": "babs@example.com", "type": "work" }]
//! }))?;
//!
//! let patch = Diff::generate(&source, &target, &[])?.partial_resource(&UserResourceFactory)?;
//! assert_eq!(patch.deleted_attributes(), ["emails"]);
//! assert_eq!(patch.emails(), ["babs@example.com"]);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod patch;
pub mod path;
pub mod selector;

pub use engine::{Diff, DiffBuilder};
pub use path::AttributePath;
pub use selector::AttributeSelector;
