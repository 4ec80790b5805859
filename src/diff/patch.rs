//! Materialization of a [`Diff`] as a SCIM 1.1 PATCH request body.
//!
//! The body is a partial resource: updated attributes appear with their new
//! values, values to remove carry `operation: "delete"`, and the paths of
//! attributes to delete are listed under `meta.attributes`. Read-only
//! attributes are left out since a service provider ignores them anyway.

use super::engine::Diff;
use crate::error::{ScimError, ScimResult};
use crate::resource::{AttributeValue, ResourceFactory, ScimAttribute, ScimObject};
use crate::schema::{META_ATTRIBUTE, META_ATTRIBUTES_SUB_ATTRIBUTE};

use log::trace;
use serde_json::Value;
use std::sync::Arc;

impl Diff {
    /// Build the PATCH body as a resource of the factory's type.
    ///
    /// # Errors
    ///
    /// Returns [`ScimError::InvalidResource`] when the factory rejects the
    /// assembled attribute tree.
    ///
    /// # Panics
    ///
    /// Panics if there are deletions and the resource descriptor defines no
    /// `meta.attributes` sub-attribute.
    pub fn partial_resource<F: ResourceFactory>(&self, factory: &F) -> ScimResult<F::Resource> {
        let descriptor = self.resource_descriptor();
        factory
            .create_resource(descriptor, self.patch_object())
            .map_err(|e| ScimError::invalid_resource(descriptor.name(), e))
    }

    /// The PATCH body as a raw attribute tree.
    ///
    /// # Panics
    ///
    /// Same as [`Diff::partial_resource`].
    pub fn patch_object(&self) -> ScimObject {
        let mut object = ScimObject::new();

        if !self.attributes_to_delete().is_empty() {
            object.set_attribute(self.deletion_meta());
        }

        for attribute in self.attributes_to_update() {
            if attribute.descriptor().is_read_only() {
                trace!("Leaving read-only attribute {} out of patch", attribute.name());
                continue;
            }
            object.set_attribute(attribute.clone());
        }

        object
    }

    /// The PATCH body rendered as a JSON resource.
    ///
    /// # Panics
    ///
    /// Same as [`Diff::partial_resource`].
    pub fn to_patch_json(&self) -> Value {
        self.patch_object().to_json(self.resource_descriptor())
    }

    /// `meta` attribute listing every deletion path under `attributes`.
    fn deletion_meta(&self) -> ScimAttribute {
        let descriptor = self.resource_descriptor();
        let meta = descriptor.meta_descriptor().unwrap_or_else(|| {
            panic!(
                "resource type '{}' has no '{}' attribute in schema '{}'",
                descriptor.name(),
                META_ATTRIBUTE,
                descriptor.core_schema()
            )
        });
        let attributes = meta
            .sub_attribute(META_ATTRIBUTES_SUB_ATTRIBUTE)
            .unwrap_or_else(|| {
                panic!(
                    "'{}' attribute of resource type '{}' has no '{}' sub-attribute",
                    META_ATTRIBUTE,
                    descriptor.name(),
                    META_ATTRIBUTES_SUB_ATTRIBUTE
                )
            });

        let paths = self
            .attributes_to_delete()
            .iter()
            .map(|path| AttributeValue::string(path.as_str()))
            .collect();
        ScimAttribute::single(
            Arc::clone(meta),
            AttributeValue::complex([ScimAttribute::new(Arc::clone(attributes), paths)]),
        )
    }
}
