//! The generic attribute tree of a SCIM resource.

use super::attribute::ScimAttribute;

/// Attributes of a resource grouped by schema URI.
///
/// Schemas and attributes keep first-insertion order, which is the order the
/// diff engine traverses them in. `(schema, name)` is unique, compared
/// ignoring case.
#[derive(Debug, Clone, Default)]
pub struct ScimObject {
    groups: Vec<SchemaAttributes>,
}

#[derive(Debug, Clone)]
struct SchemaAttributes {
    schema: String,
    attributes: Vec<ScimAttribute>,
}

impl ScimObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema URIs with at least one attribute, in first-seen order.
    pub fn schemas(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.schema.as_str())
    }

    /// Attributes of one schema, in insertion order.
    pub fn attributes(&self, schema: &str) -> impl Iterator<Item = &ScimAttribute> {
        self.group(schema)
            .into_iter()
            .flat_map(|group| group.attributes.iter())
    }

    /// Every attribute, schema by schema.
    pub fn iter(&self) -> impl Iterator<Item = &ScimAttribute> {
        self.groups.iter().flat_map(|group| group.attributes.iter())
    }

    pub fn get_attribute(&self, schema: &str, name: &str) -> Option<&ScimAttribute> {
        self.group(schema)?
            .attributes
            .iter()
            .find(|attr| attr.name().eq_ignore_ascii_case(name))
    }

    pub fn has_attribute(&self, schema: &str, name: &str) -> bool {
        self.get_attribute(schema, name).is_some()
    }

    /// Add an attribute, replacing an existing one with the same schema and
    /// name in place. Returns the replaced attribute.
    pub fn set_attribute(&mut self, attribute: ScimAttribute) -> Option<ScimAttribute> {
        let index = match self.group_index(attribute.schema()) {
            Some(index) => index,
            None => {
                self.groups.push(SchemaAttributes {
                    schema: attribute.schema().to_string(),
                    attributes: Vec::new(),
                });
                self.groups.len() - 1
            }
        };

        let attributes = &mut self.groups[index].attributes;
        match attributes
            .iter_mut()
            .find(|existing| existing.name().eq_ignore_ascii_case(attribute.name()))
        {
            Some(existing) => Some(std::mem::replace(existing, attribute)),
            None => {
                attributes.push(attribute);
                None
            }
        }
    }

    /// Remove an attribute. A schema left without attributes is dropped too.
    pub fn remove_attribute(&mut self, schema: &str, name: &str) -> Option<ScimAttribute> {
        let index = self.group_index(schema)?;
        let group = &mut self.groups[index];
        let position = group
            .attributes
            .iter()
            .position(|attr| attr.name().eq_ignore_ascii_case(name))?;
        let removed = group.attributes.remove(position);
        if group.attributes.is_empty() {
            self.groups.remove(index);
        }
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.attributes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn group(&self, schema: &str) -> Option<&SchemaAttributes> {
        self.groups
            .iter()
            .find(|group| group.schema.eq_ignore_ascii_case(schema))
    }

    fn group_index(&self, schema: &str) -> Option<usize> {
        self.groups
            .iter()
            .position(|group| group.schema.eq_ignore_ascii_case(schema))
    }
}

/// Objects are equal when they hold equal attributes, in any order.
impl PartialEq for ScimObject {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|attr| other.get_attribute(attr.schema(), attr.name()) == Some(attr))
    }
}

impl FromIterator<ScimAttribute> for ScimObject {
    fn from_iter<I: IntoIterator<Item = ScimAttribute>>(iter: I) -> Self {
        let mut object = Self::new();
        for attribute in iter {
            object.set_attribute(attribute);
        }
        object
    }
}
