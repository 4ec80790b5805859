//! SCIM attributes: a descriptor plus one or more values.

use super::value::AttributeValue;
use crate::schema::AttributeDescriptor;
use std::sync::Arc;

/// An attribute of a SCIM resource or a sub-attribute of a complex value.
///
/// Single-valued attributes hold exactly one value; multi-valued attributes
/// hold an ordered sequence. Arity is checked by the resource factories, not
/// here, so a diff can assemble partial attributes freely.
#[derive(Debug, Clone)]
pub struct ScimAttribute {
    descriptor: Arc<AttributeDescriptor>,
    values: Vec<AttributeValue>,
}

impl ScimAttribute {
    pub fn new(descriptor: Arc<AttributeDescriptor>, values: Vec<AttributeValue>) -> Self {
        Self { descriptor, values }
    }

    pub fn single(descriptor: Arc<AttributeDescriptor>, value: AttributeValue) -> Self {
        Self::new(descriptor, vec![value])
    }

    pub fn descriptor(&self) -> &Arc<AttributeDescriptor> {
        &self.descriptor
    }

    /// URI of the schema owning this attribute.
    pub fn schema(&self) -> &str {
        self.descriptor.schema()
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    /// The first value; the only one for single-valued attributes.
    ///
    /// # Panics
    ///
    /// Panics if the attribute was built without values.
    pub fn value(&self) -> &AttributeValue {
        &self.values[0]
    }

    pub fn is_multi_valued(&self) -> bool {
        self.descriptor.is_multi_valued()
    }

    /// Whether this attribute is identified by `(schema, name)`, ignoring case.
    pub fn is_named(&self, schema: &str, name: &str) -> bool {
        self.schema().eq_ignore_ascii_case(schema) && self.name().eq_ignore_ascii_case(name)
    }
}

/// Attributes are equal when they share schema and name (ignoring case) and
/// hold equal values in the same order.
impl PartialEq for ScimAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.is_named(other.schema(), other.name()) && self.values == other.values
    }
}
