//! Attribute values: scalars and complex sub-attribute maps.

use super::attribute::ScimAttribute;
use serde_json::Value;

/// One value of a SCIM attribute.
///
/// Simple values hold the JSON scalar as given. Complex values hold the
/// sub-attributes; they compare equal regardless of sub-attribute order.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Simple(Value),
    Complex(ComplexValue),
}

impl AttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::Simple(Value::String(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::Simple(Value::Bool(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::Simple(Value::from(value))
    }

    /// Build a complex value from its sub-attributes.
    pub fn complex<I>(sub_attributes: I) -> Self
    where
        I: IntoIterator<Item = ScimAttribute>,
    {
        Self::Complex(sub_attributes.into_iter().collect())
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }

    pub fn as_complex(&self) -> Option<&ComplexValue> {
        match self {
            Self::Complex(complex) => Some(complex),
            Self::Simple(_) => None,
        }
    }

    pub fn as_simple(&self) -> Option<&Value> {
        match self {
            Self::Simple(value) => Some(value),
            Self::Complex(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_simple().and_then(Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_simple().and_then(Value::as_bool)
    }

    /// Sub-attribute of a complex value, ignoring case.
    pub fn sub_attribute(&self, name: &str) -> Option<&ScimAttribute> {
        self.as_complex().and_then(|complex| complex.get(name))
    }
}

/// Ordered, case-insensitively keyed sub-attributes of a complex value.
#[derive(Debug, Clone, Default)]
pub struct ComplexValue {
    sub_attributes: Vec<ScimAttribute>,
}

impl ComplexValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ScimAttribute> {
        self.sub_attributes
            .iter()
            .find(|attr| attr.name().eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert a sub-attribute, replacing any existing one of the same name in
    /// place. Returns the replaced sub-attribute.
    pub fn insert(&mut self, attribute: ScimAttribute) -> Option<ScimAttribute> {
        match self
            .sub_attributes
            .iter_mut()
            .find(|existing| existing.name().eq_ignore_ascii_case(attribute.name()))
        {
            Some(existing) => Some(std::mem::replace(existing, attribute)),
            None => {
                self.sub_attributes.push(attribute);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ScimAttribute> {
        let index = self
            .sub_attributes
            .iter()
            .position(|attr| attr.name().eq_ignore_ascii_case(name))?;
        Some(self.sub_attributes.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScimAttribute> {
        self.sub_attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.sub_attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_attributes.is_empty()
    }
}

impl PartialEq for ComplexValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .sub_attributes
                .iter()
                .all(|attr| other.get(attr.name()) == Some(attr))
    }
}

impl FromIterator<ScimAttribute> for ComplexValue {
    fn from_iter<I: IntoIterator<Item = ScimAttribute>>(iter: I) -> Self {
        let mut complex = Self::new();
        for attribute in iter {
            complex.insert(attribute);
        }
        complex
    }
}

impl<'a> IntoIterator for &'a ComplexValue {
    type Item = &'a ScimAttribute;
    type IntoIter = std::slice::Iter<'a, ScimAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
