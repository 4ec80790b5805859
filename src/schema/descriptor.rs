//! Immutable attribute and resource descriptors.
//!
//! A descriptor is a [`AttributeDefinition`] bound to the schema URI that owns
//! it. Descriptors are shared through [`Arc`] by every attribute that carries
//! values for them and are never mutated after construction.

use super::types::{AttributeDefinition, AttributeType, Mutability, Schema};
use std::sync::Arc;

/// Sub-attribute that marks a multi-valued entry for removal in a PATCH body.
pub const OPERATION_SUB_ATTRIBUTE: &str = "operation";

/// Value of the [`OPERATION_SUB_ATTRIBUTE`] that requests deletion.
pub const DELETE_OPERATION: &str = "delete";

/// The normative sub-attributes of multi-valued complex attributes.
///
/// These are never listed individually as deletion targets; removing the
/// owning entry already removes them.
pub const NORMATIVE_SUB_ATTRIBUTES: [&str; 5] = ["type", "primary", "operation", "display", "value"];

/// Name of the common `meta` attribute and its deletion list sub-attribute.
pub const META_ATTRIBUTE: &str = "meta";
pub const META_ATTRIBUTES_SUB_ATTRIBUTE: &str = "attributes";

/// Schema metadata for one attribute or sub-attribute.
#[derive(Debug, PartialEq, Eq)]
pub struct AttributeDescriptor {
    schema: String,
    name: String,
    data_type: AttributeType,
    multi_valued: bool,
    required: bool,
    case_exact: bool,
    mutability: Mutability,
    sub_attributes: Vec<Arc<AttributeDescriptor>>,
}

impl AttributeDescriptor {
    /// Bind a definition, and recursively its sub-attributes, to a schema URI.
    pub fn new(schema: impl Into<String>, definition: &AttributeDefinition) -> Arc<Self> {
        let schema = schema.into();
        let sub_attributes = definition
            .sub_attributes
            .iter()
            .map(|sub| Self::new(schema.clone(), sub))
            .collect();

        Arc::new(Self {
            schema,
            name: definition.name.clone(),
            data_type: definition.data_type,
            multi_valued: definition.multi_valued,
            required: definition.required,
            case_exact: definition.case_exact,
            mutability: definition.mutability,
            sub_attributes,
        })
    }

    /// URI of the schema defining this attribute.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> AttributeType {
        self.data_type
    }

    pub fn is_multi_valued(&self) -> bool {
        self.multi_valued
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_case_exact(&self) -> bool {
        self.case_exact
    }

    pub fn is_complex(&self) -> bool {
        self.data_type == AttributeType::Complex
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    /// Read-only attributes are server managed and can never be written.
    pub fn is_read_only(&self) -> bool {
        self.mutability == Mutability::ReadOnly
    }

    /// Look up a sub-attribute descriptor, ignoring case.
    pub fn sub_attribute(&self, name: &str) -> Option<&Arc<AttributeDescriptor>> {
        self.sub_attributes
            .iter()
            .find(|sub| sub.name.eq_ignore_ascii_case(name))
    }

    pub fn sub_attributes(&self) -> impl Iterator<Item = &Arc<AttributeDescriptor>> {
        self.sub_attributes.iter()
    }
}

/// Describes one resource type: its endpoint, schemas and attributes.
#[derive(Debug)]
pub struct ResourceDescriptor {
    name: String,
    endpoint: String,
    core_schema: String,
    extension_schemas: Vec<String>,
    attributes: Vec<Arc<AttributeDescriptor>>,
}

impl ResourceDescriptor {
    /// Build a descriptor from a core schema and any extension schemas.
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        core_schema: &Schema,
        extension_schemas: &[&Schema],
    ) -> Self {
        let mut attributes: Vec<Arc<AttributeDescriptor>> = core_schema
            .attributes
            .iter()
            .map(|definition| AttributeDescriptor::new(core_schema.id.clone(), definition))
            .collect();
        for extension in extension_schemas {
            attributes.extend(
                extension
                    .attributes
                    .iter()
                    .map(|definition| AttributeDescriptor::new(extension.id.clone(), definition)),
            );
        }

        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            core_schema: core_schema.id.clone(),
            extension_schemas: extension_schemas.iter().map(|s| s.id.clone()).collect(),
            attributes,
        }
    }

    /// Resource type name, e.g. `User`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Endpoint path relative to the service base, e.g. `Users`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The schema whose attributes appear at the top level of the resource.
    pub fn core_schema(&self) -> &str {
        &self.core_schema
    }

    pub fn extension_schemas(&self) -> &[String] {
        &self.extension_schemas
    }

    /// Core schema first, then extensions in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.core_schema.as_str())
            .chain(self.extension_schemas.iter().map(String::as_str))
    }

    pub fn has_schema(&self, schema: &str) -> bool {
        self.schemas().any(|s| s.eq_ignore_ascii_case(schema))
    }

    pub fn is_core_schema(&self, schema: &str) -> bool {
        self.core_schema.eq_ignore_ascii_case(schema)
    }

    /// Look up an attribute descriptor by schema and name, ignoring case.
    pub fn attribute(&self, schema: &str, name: &str) -> Option<&Arc<AttributeDescriptor>> {
        self.attributes
            .iter()
            .find(|attr| attr.schema.eq_ignore_ascii_case(schema) && attr.name.eq_ignore_ascii_case(name))
    }

    /// All attribute descriptors of one schema, in definition order.
    pub fn attributes_in<'a>(
        &'a self,
        schema: &'a str,
    ) -> impl Iterator<Item = &'a Arc<AttributeDescriptor>> + 'a {
        self.attributes
            .iter()
            .filter(move |attr| attr.schema.eq_ignore_ascii_case(schema))
    }

    /// The common `meta` attribute of the core schema, if defined.
    pub fn meta_descriptor(&self) -> Option<&Arc<AttributeDescriptor>> {
        self.attribute(&self.core_schema, META_ATTRIBUTE)
    }
}
