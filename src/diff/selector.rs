//! Selection of the attributes and sub-attributes a diff compares.

use super::path::AttributePath;
use crate::error::ParseResult;
use std::collections::{HashMap, HashSet};

/// Restricts a diff to a set of attributes and sub-attributes.
///
/// Built once from attribute paths. All lookups ignore ASCII case; names are
/// lowercased when the selector is built. An attribute named without a
/// sub-attribute is selected whole; naming sub-attributes restricts complex
/// attributes to exactly those sub-attributes.
#[derive(Debug, Clone, Default)]
pub struct AttributeSelector {
    /// schema -> attribute -> sub-attributes; `None` selects everything
    filter: Option<HashMap<String, HashMap<String, SubAttributeFilter>>>,
}

#[derive(Debug, Clone, Default)]
struct SubAttributeFilter {
    whole_attribute: bool,
    sub_attributes: HashSet<String>,
}

impl AttributeSelector {
    /// A selector that matches every attribute and sub-attribute.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a selector from path strings. Unqualified paths resolve to
    /// `default_schema`. No paths at all selects everything.
    pub fn from_paths<I, S>(paths: I, default_schema: &str) -> ParseResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = paths
            .into_iter()
            .map(|path| AttributePath::parse(path.as_ref()))
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Self::from_attribute_paths(parsed, default_schema))
    }

    /// Build a selector from parsed paths.
    pub fn from_attribute_paths<I>(paths: I, default_schema: &str) -> Self
    where
        I: IntoIterator<Item = AttributePath>,
    {
        let mut filter: HashMap<String, HashMap<String, SubAttributeFilter>> = HashMap::new();
        for path in paths {
            let entry = filter
                .entry(path.schema_or(default_schema).to_ascii_lowercase())
                .or_default()
                .entry(path.attribute_name().to_ascii_lowercase())
                .or_default();
            match path.sub_attribute_name() {
                Some(sub) => {
                    entry.sub_attributes.insert(sub.to_ascii_lowercase());
                }
                None => entry.whole_attribute = true,
            }
        }

        if filter.is_empty() {
            return Self::all();
        }
        Self {
            filter: Some(filter),
        }
    }

    /// Whether this selector matches everything.
    pub fn is_unrestricted(&self) -> bool {
        self.filter.is_none()
    }

    /// Whether the attribute takes part in the diff at all, regardless of
    /// which of its sub-attributes were named.
    pub fn matches(&self, schema: &str, name: &str) -> bool {
        match &self.filter {
            None => true,
            Some(_) => self.lookup(schema, name).is_some(),
        }
    }

    /// Whether a sub-attribute of a complex attribute takes part in the diff.
    pub fn matches_sub_attribute(&self, schema: &str, name: &str, sub_attribute: &str) -> bool {
        match &self.filter {
            None => true,
            Some(_) => self.lookup(schema, name).is_some_and(|entry| {
                entry.whole_attribute
                    || entry
                        .sub_attributes
                        .contains(&sub_attribute.to_ascii_lowercase())
            }),
        }
    }

    /// Whether the attribute was selected only through named sub-attributes.
    pub fn has_sub_filter(&self, schema: &str, name: &str) -> bool {
        self.lookup(schema, name)
            .is_some_and(|entry| !entry.whole_attribute)
    }

    fn lookup(&self, schema: &str, name: &str) -> Option<&SubAttributeFilter> {
        self.filter
            .as_ref()?
            .get(&schema.to_ascii_lowercase())?
            .get(&name.to_ascii_lowercase())
    }
}
