//! Resource factories and typed resource wrappers.
//!
//! A [`ResourceFactory`] turns a generic [`ScimObject`] into a resource type
//! after checking that the tree matches the resource descriptor. The patch
//! body builder goes through a factory so callers get back the same resource
//! type they diffed.

use super::attribute::ScimAttribute;
use super::object::ScimObject;
use super::value::AttributeValue;
use crate::error::{ValidationError, ValidationResult};
use crate::schema::{AttributeDescriptor, CORE_USER_SCHEMA, ResourceDescriptor};

use serde_json::Value;
use std::sync::Arc;

/// A SCIM resource backed by a generic attribute tree.
pub trait Resource {
    fn resource_descriptor(&self) -> &Arc<ResourceDescriptor>;

    fn scim_object(&self) -> &ScimObject;

    /// Render the resource as JSON.
    fn to_json(&self) -> Value {
        self.scim_object().to_json(self.resource_descriptor())
    }
}

/// Creates resources of one type from attribute trees.
pub trait ResourceFactory {
    type Resource: Resource;

    fn create_resource(
        &self,
        descriptor: &Arc<ResourceDescriptor>,
        object: ScimObject,
    ) -> ValidationResult<Self::Resource>;
}

/// Untyped resource of any registered resource type.
#[derive(Debug, Clone)]
pub struct BaseResource {
    descriptor: Arc<ResourceDescriptor>,
    object: ScimObject,
}

impl BaseResource {
    /// Wrap an attribute tree after checking its structure.
    pub fn new(descriptor: Arc<ResourceDescriptor>, object: ScimObject) -> ValidationResult<Self> {
        validate_structure(&descriptor, &object)?;
        Ok(Self { descriptor, object })
    }

    /// Parse a JSON resource.
    pub fn from_json(descriptor: Arc<ResourceDescriptor>, data: &Value) -> ValidationResult<Self> {
        let object = ScimObject::from_json(&descriptor, data)?;
        Self::new(descriptor, object)
    }

    pub fn into_scim_object(self) -> ScimObject {
        self.object
    }

    /// Attribute of the core schema, ignoring case.
    pub fn core_attribute(&self, name: &str) -> Option<&ScimAttribute> {
        self.object.get_attribute(self.descriptor.core_schema(), name)
    }

    /// Single string value of a core attribute.
    pub fn core_string(&self, name: &str) -> Option<&str> {
        self.core_attribute(name)?.values().first()?.as_str()
    }

    pub fn id(&self) -> Option<&str> {
        self.core_string("id")
    }

    pub fn external_id(&self) -> Option<&str> {
        self.core_string("externalId")
    }
}

impl Resource for BaseResource {
    fn resource_descriptor(&self) -> &Arc<ResourceDescriptor> {
        &self.descriptor
    }

    fn scim_object(&self) -> &ScimObject {
        &self.object
    }
}

/// Factory for [`BaseResource`]s of any resource type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseResourceFactory;

impl ResourceFactory for BaseResourceFactory {
    type Resource = BaseResource;

    fn create_resource(
        &self,
        descriptor: &Arc<ResourceDescriptor>,
        object: ScimObject,
    ) -> ValidationResult<BaseResource> {
        BaseResource::new(Arc::clone(descriptor), object)
    }
}

/// A User resource with typed accessors for common core attributes.
#[derive(Debug, Clone)]
pub struct UserResource {
    base: BaseResource,
}

impl UserResource {
    pub fn from_json(descriptor: Arc<ResourceDescriptor>, data: &Value) -> ValidationResult<Self> {
        check_user_descriptor(&descriptor)?;
        Ok(Self {
            base: BaseResource::from_json(descriptor, data)?,
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.base.id()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.base.core_string("userName")
    }

    pub fn display_name(&self) -> Option<&str> {
        self.base.core_string("displayName")
    }

    pub fn active(&self) -> Option<bool> {
        self.base.core_attribute("active")?.values().first()?.as_bool()
    }

    pub fn given_name(&self) -> Option<&str> {
        self.name_part("givenName")
    }

    pub fn family_name(&self) -> Option<&str> {
        self.name_part("familyName")
    }

    /// Email addresses in resource order.
    pub fn emails(&self) -> Vec<&str> {
        self.base
            .core_attribute("emails")
            .map(|emails| {
                emails
                    .values()
                    .iter()
                    .filter_map(|email| email.sub_attribute("value")?.values().first()?.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Attribute paths listed in `meta.attributes`; set on PATCH bodies.
    pub fn deleted_attributes(&self) -> Vec<&str> {
        self.base
            .core_attribute("meta")
            .and_then(|meta| meta.values().first()?.sub_attribute("attributes"))
            .map(|paths| paths.values().iter().filter_map(AttributeValue::as_str).collect())
            .unwrap_or_default()
    }

    pub fn as_base(&self) -> &BaseResource {
        &self.base
    }

    fn name_part(&self, part: &str) -> Option<&str> {
        self.base
            .core_attribute("name")?
            .values()
            .first()?
            .sub_attribute(part)?
            .values()
            .first()?
            .as_str()
    }
}

impl Resource for UserResource {
    fn resource_descriptor(&self) -> &Arc<ResourceDescriptor> {
        self.base.resource_descriptor()
    }

    fn scim_object(&self) -> &ScimObject {
        self.base.scim_object()
    }
}

/// Factory for [`UserResource`]s; rejects descriptors of other types.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserResourceFactory;

impl ResourceFactory for UserResourceFactory {
    type Resource = UserResource;

    fn create_resource(
        &self,
        descriptor: &Arc<ResourceDescriptor>,
        object: ScimObject,
    ) -> ValidationResult<UserResource> {
        check_user_descriptor(descriptor)?;
        Ok(UserResource {
            base: BaseResource::new(Arc::clone(descriptor), object)?,
        })
    }
}

fn check_user_descriptor(descriptor: &ResourceDescriptor) -> ValidationResult<()> {
    if descriptor.is_core_schema(CORE_USER_SCHEMA) {
        Ok(())
    } else {
        Err(ValidationError::ResourceTypeMismatch {
            expected: "User".to_string(),
            actual: descriptor.name().to_string(),
        })
    }
}

/// Check that an attribute tree fits a resource descriptor.
///
/// Every schema must belong to the resource type, every attribute and
/// sub-attribute must be defined, single-valued attributes must hold exactly
/// one value, and complex attributes must hold complex values only.
pub fn validate_structure(descriptor: &ResourceDescriptor, object: &ScimObject) -> ValidationResult<()> {
    for schema in object.schemas() {
        if !descriptor.has_schema(schema) {
            return Err(ValidationError::UnsupportedSchema {
                schema_id: schema.to_string(),
                resource_type: descriptor.name().to_string(),
            });
        }
        for attribute in object.attributes(schema) {
            let definition = descriptor.attribute(schema, attribute.name()).ok_or_else(|| {
                ValidationError::UnknownAttribute {
                    attribute: attribute.name().to_string(),
                    schema_id: schema.to_string(),
                }
            })?;
            validate_attribute(definition, attribute)?;
        }
    }
    Ok(())
}

fn validate_attribute(definition: &AttributeDescriptor, attribute: &ScimAttribute) -> ValidationResult<()> {
    let values = attribute.values();
    if values.is_empty() {
        return Err(ValidationError::EmptyAttribute {
            attribute: definition.name().to_string(),
        });
    }
    if !definition.is_multi_valued() && values.len() > 1 {
        return Err(ValidationError::ExpectedSingleValue {
            attribute: definition.name().to_string(),
        });
    }

    for value in values {
        match (definition.is_complex(), value) {
            (true, AttributeValue::Complex(complex)) => {
                for sub in complex {
                    let sub_definition = definition.sub_attribute(sub.name()).ok_or_else(|| {
                        ValidationError::UnknownSubAttribute {
                            attribute: definition.name().to_string(),
                            sub_attribute: sub.name().to_string(),
                        }
                    })?;
                    validate_attribute(sub_definition, sub)?;
                }
            }
            (false, AttributeValue::Simple(_)) => {}
            (expects_complex, _) => {
                let (expected, actual) = if expects_complex {
                    ("complex", "simple")
                } else {
                    ("simple", "complex")
                };
                return Err(ValidationError::invalid_type(definition.name(), expected, actual));
            }
        }
    }
    Ok(())
}
