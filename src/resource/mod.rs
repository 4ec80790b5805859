//! In-memory representation of SCIM resources.
//!
//! Resources are generic attribute trees: a [`ScimObject`] maps schema URIs
//! to [`ScimAttribute`]s, each holding one or more [`AttributeValue`]s. The
//! JSON bridge and the [`ResourceFactory`] implementations turn these trees
//! into resources and back.
//!
//! # Examples
//!
//! ```rust
//! use scim_diff::resource::{Resource, UserResource};
//! use scim_diff::schema::SchemaRegistry;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::new()?;
//! let user = UserResource::from_json(
//!     registry.user_descriptor()?,
//!     &json!({ "userName": "bjensen", "name": { "givenName": "Barbara" } }),
//! )?;
//! assert_eq!(user.given_name(), Some("Barbara"));
//! assert_eq!(user.scim_object().len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod attribute;
pub mod factory;
pub mod json;
pub mod object;
pub mod value;

pub use attribute::ScimAttribute;
pub use factory::{
    BaseResource, BaseResourceFactory, Resource, ResourceFactory, UserResource,
    UserResourceFactory, validate_structure,
};
pub use object::ScimObject;
pub use value::{AttributeValue, ComplexValue};
