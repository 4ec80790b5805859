//! Conversion between JSON resource representations and [`ScimObject`].
//!
//! Core schema attributes sit at the top level of the JSON object; extension
//! schema attributes are nested under their schema URI, as in RFC 7643.
//! Attribute names and extension keys are matched ignoring case.

use super::attribute::ScimAttribute;
use super::object::ScimObject;
use super::value::AttributeValue;
use crate::error::{ValidationError, ValidationResult};
use crate::schema::{AttributeDescriptor, AttributeType, ResourceDescriptor};

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use std::sync::Arc;

const SCHEMAS_KEY: &str = "schemas";

impl ScimObject {
    /// Parse a JSON resource against a resource descriptor.
    ///
    /// `null` values, empty arrays and empty complex objects are treated as
    /// absent attributes.
    pub fn from_json(descriptor: &ResourceDescriptor, data: &Value) -> ValidationResult<Self> {
        let obj = data.as_object().ok_or(ValidationError::NotAnObject)?;
        let mut object = ScimObject::new();

        for (key, value) in obj {
            if key == SCHEMAS_KEY || value.is_null() {
                continue;
            }

            if let Some(extension) = descriptor
                .extension_schemas()
                .iter()
                .find(|schema| schema.eq_ignore_ascii_case(key))
            {
                let ext_obj = value.as_object().ok_or_else(|| {
                    ValidationError::invalid_type(key, "object", json_type_name(value))
                })?;
                read_attributes(descriptor, extension, ext_obj, &mut object)?;
                continue;
            }

            let attr_descriptor = descriptor
                .attribute(descriptor.core_schema(), key)
                .ok_or_else(|| ValidationError::UnknownAttribute {
                    attribute: key.clone(),
                    schema_id: descriptor.core_schema().to_string(),
                })?;
            if let Some(attribute) = decode_attribute(attr_descriptor, value)? {
                object.set_attribute(attribute);
            }
        }

        Ok(object)
    }

    /// Render this object as a JSON resource, including a `schemas` array
    /// listing the core schema and every extension with attributes present.
    pub fn to_json(&self, descriptor: &ResourceDescriptor) -> Value {
        let mut obj = Map::new();
        let schemas: Vec<Value> = descriptor
            .schemas()
            .filter(|schema| descriptor.is_core_schema(schema) || self.attributes(schema).next().is_some())
            .map(|schema| Value::String(schema.to_string()))
            .collect();
        obj.insert(SCHEMAS_KEY.to_string(), Value::Array(schemas));

        for schema in self.schemas() {
            let attributes = self
                .attributes(schema)
                .map(|attribute| (attribute.name().to_string(), encode_attribute(attribute)));
            if descriptor.is_core_schema(schema) {
                obj.extend(attributes);
            } else {
                obj.insert(schema.to_string(), Value::Object(attributes.collect()));
            }
        }

        Value::Object(obj)
    }
}

fn read_attributes(
    descriptor: &ResourceDescriptor,
    schema: &str,
    obj: &Map<String, Value>,
    object: &mut ScimObject,
) -> ValidationResult<()> {
    for (key, value) in obj {
        if value.is_null() {
            continue;
        }
        let attr_descriptor =
            descriptor
                .attribute(schema, key)
                .ok_or_else(|| ValidationError::UnknownAttribute {
                    attribute: key.clone(),
                    schema_id: schema.to_string(),
                })?;
        if let Some(attribute) = decode_attribute(attr_descriptor, value)? {
            object.set_attribute(attribute);
        }
    }
    Ok(())
}

fn decode_attribute(
    descriptor: &Arc<AttributeDescriptor>,
    value: &Value,
) -> ValidationResult<Option<ScimAttribute>> {
    let values = if descriptor.is_multi_valued() {
        let items = value
            .as_array()
            .ok_or_else(|| ValidationError::ExpectedMultiValue {
                attribute: descriptor.name().to_string(),
            })?;
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            if let Some(decoded) = decode_value(descriptor, item)? {
                values.push(decoded);
            }
        }
        values
    } else {
        if value.is_array() {
            return Err(ValidationError::ExpectedSingleValue {
                attribute: descriptor.name().to_string(),
            });
        }
        decode_value(descriptor, value)?.into_iter().collect()
    };

    if values.is_empty() {
        return Ok(None);
    }
    Ok(Some(ScimAttribute::new(Arc::clone(descriptor), values)))
}

fn decode_value(
    descriptor: &AttributeDescriptor,
    value: &Value,
) -> ValidationResult<Option<AttributeValue>> {
    if descriptor.is_complex() {
        let obj = value.as_object().ok_or_else(|| {
            ValidationError::invalid_type(descriptor.name(), "object", json_type_name(value))
        })?;

        let mut sub_attributes = Vec::with_capacity(obj.len());
        for (key, sub_value) in obj {
            if sub_value.is_null() {
                continue;
            }
            let sub_descriptor =
                descriptor
                    .sub_attribute(key)
                    .ok_or_else(|| ValidationError::UnknownSubAttribute {
                        attribute: descriptor.name().to_string(),
                        sub_attribute: key.clone(),
                    })?;
            if sub_descriptor.is_complex() {
                return Err(ValidationError::NestedComplexAttributes {
                    attribute: format!("{}.{}", descriptor.name(), sub_descriptor.name()),
                });
            }
            if let Some(sub_attribute) = decode_attribute(sub_descriptor, sub_value)? {
                sub_attributes.push(sub_attribute);
            }
        }

        if sub_attributes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(AttributeValue::complex(sub_attributes)));
    }

    check_simple_type(descriptor, value)?;
    Ok(Some(AttributeValue::Simple(value.clone())))
}

fn check_simple_type(descriptor: &AttributeDescriptor, value: &Value) -> ValidationResult<()> {
    let data_type = descriptor.data_type();
    let valid = match data_type {
        AttributeType::String | AttributeType::Binary | AttributeType::Reference => {
            value.is_string()
        }
        AttributeType::DateTime => {
            let text = value.as_str().ok_or_else(|| {
                ValidationError::invalid_type(descriptor.name(), "dateTime", json_type_name(value))
            })?;
            if DateTime::<FixedOffset>::parse_from_rfc3339(text).is_err() {
                return Err(ValidationError::InvalidDateTimeFormat {
                    attribute: descriptor.name().to_string(),
                    value: text.to_string(),
                });
            }
            true
        }
        AttributeType::Boolean => value.is_boolean(),
        AttributeType::Integer => value.is_i64() || value.is_u64(),
        AttributeType::Decimal => value.is_number(),
        AttributeType::Complex => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::invalid_type(
            descriptor.name(),
            data_type.to_string(),
            json_type_name(value),
        ))
    }
}

fn encode_attribute(attribute: &ScimAttribute) -> Value {
    if attribute.is_multi_valued() {
        Value::Array(attribute.values().iter().map(encode_value).collect())
    } else {
        attribute.values().first().map_or(Value::Null, encode_value)
    }
}

fn encode_value(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Simple(simple) => simple.clone(),
        AttributeValue::Complex(complex) => Value::Object(
            complex
                .iter()
                .map(|sub| (sub.name().to_string(), encode_attribute(sub)))
                .collect(),
        ),
    }
}

/// Get the type name of a JSON value for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "decimal",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
