//! Generation of the modifications between two versions of a resource.
//!
//! Attributes are partitioned into source-only, target-only and common ones.
//! Source-only attributes are deleted, target-only attributes are added, and
//! common attributes with different values are replaced or, for complex and
//! multi-valued attributes, reduced to the sub-attributes and values that
//! actually changed.
//!
//! # Ordering
//!
//! Deletion paths are deduplicated and kept in the order they were first
//! produced. Updates list target-only attributes first, then changed common
//! attributes. Within each group attributes follow the traversal order of the
//! resource they come from: schema by schema, attribute by attribute, in
//! insertion order.

use super::path::AttributePath;
use super::selector::AttributeSelector;
use crate::error::ScimResult;
use crate::resource::{AttributeValue, ComplexValue, Resource, ScimAttribute, ScimObject};
use crate::schema::{
    AttributeDescriptor, DELETE_OPERATION, NORMATIVE_SUB_ATTRIBUTES, OPERATION_SUB_ATTRIBUTE,
    ResourceDescriptor,
};

use log::{debug, trace};
use std::collections::HashSet;
use std::sync::Arc;

/// Modifications that turn a source resource into a target resource.
///
/// ```rust
/// use scim_diff::{Diff, UserResource, SchemaRegistry};
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let users = SchemaRegistry::new()?.user_descriptor()?;
/// let source = UserResource::from_json(users.clone(), &json!({
///     "userName": "bjensen", "nickName": "Babs", "title": "Tour Guide"
/// }))?;
/// let target = UserResource::from_json(users, &json!({
///     "userName": "bjensen", "title": "Tour Lead"
/// }))?;
///
/// let diff = Diff::generate(&source, &target, &[])?;
/// assert_eq!(diff.attributes_to_delete(), ["nickName"]);
/// assert_eq!(diff.attributes_to_update()[0].name(), "title");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Diff {
    resource_descriptor: Arc<ResourceDescriptor>,
    attributes_to_delete: Vec<String>,
    attributes_to_update: Vec<ScimAttribute>,
}

impl Diff {
    /// Diff two resources, comparing only the attributes named in
    /// `attributes` (standard attribute notation, e.g. `name.givenName`).
    /// An empty list compares everything.
    ///
    /// Fails only when one of the attribute paths is malformed.
    pub fn generate<R: Resource>(source: &R, target: &R, attributes: &[&str]) -> ScimResult<Self> {
        let selector = AttributeSelector::from_paths(
            attributes,
            source.resource_descriptor().core_schema(),
        )?;
        Ok(Self::generate_with_selector(source, target, &selector))
    }

    /// Diff two resources with a prebuilt selector.
    pub fn generate_with_selector<R: Resource>(
        source: &R,
        target: &R,
        selector: &AttributeSelector,
    ) -> Self {
        Self::between_objects(
            Arc::clone(source.resource_descriptor()),
            source.scim_object(),
            target.scim_object(),
            selector,
        )
    }

    /// Diff two raw attribute trees of the given resource type.
    ///
    /// # Panics
    ///
    /// Panics if a multi-valued complex attribute with removed values has a
    /// descriptor without an `operation` sub-attribute. The schema registry
    /// guarantees that sub-attribute; its absence is a registry defect.
    pub fn between_objects(
        resource_descriptor: Arc<ResourceDescriptor>,
        source: &ScimObject,
        target: &ScimObject,
        selector: &AttributeSelector,
    ) -> Self {
        let (attributes_to_delete, attributes_to_update) = {
            let mut generator = DiffGenerator::new(selector, resource_descriptor.core_schema());
            generator.run(source, target);
            (generator.deletions, generator.updates)
        };

        debug!(
            "Generated {} diff: {} deletion(s), {} update(s)",
            resource_descriptor.name(),
            attributes_to_delete.len(),
            attributes_to_update.len()
        );

        Self {
            resource_descriptor,
            attributes_to_delete,
            attributes_to_update,
        }
    }

    /// Descriptor of the resource type the diff was generated from.
    pub fn resource_descriptor(&self) -> &Arc<ResourceDescriptor> {
        &self.resource_descriptor
    }

    /// Paths of attributes and sub-attributes to delete from the source.
    pub fn attributes_to_delete(&self) -> &[String] {
        &self.attributes_to_delete
    }

    /// Attributes, with their new values, to add or replace on the source.
    pub fn attributes_to_update(&self) -> &[ScimAttribute] {
        &self.attributes_to_update
    }

    /// True when source and target agree on every selected attribute.
    pub fn is_empty(&self) -> bool {
        self.attributes_to_delete.is_empty() && self.attributes_to_update.is_empty()
    }
}

/// Configures and runs a diff.
///
/// ```rust
/// use scim_diff::{DiffBuilder, UserResource, SchemaRegistry};
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let users = SchemaRegistry::new()?.user_descriptor()?;
/// let source = UserResource::from_json(users.clone(), &json!({
///     "name": { "givenName": "A", "familyName": "B" }
/// }))?;
/// let target = UserResource::from_json(users, &json!({
///     "name": { "givenName": "A", "familyName": "C" }
/// }))?;
///
/// let diff = DiffBuilder::new().attribute("name.givenName").build(&source, &target)?;
/// assert!(diff.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiffBuilder {
    attributes: Vec<String>,
    selector: Option<AttributeSelector>,
}

impl DiffBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare this attribute path; may be called repeatedly.
    pub fn attribute(mut self, path: impl Into<String>) -> Self {
        self.attributes.push(path.into());
        self
    }

    pub fn attributes<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Use a prebuilt selector; attribute paths given to the builder are
    /// ignored when one is set.
    pub fn selector(mut self, selector: AttributeSelector) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn build<R: Resource>(&self, source: &R, target: &R) -> ScimResult<Diff> {
        match &self.selector {
            Some(selector) => Ok(Diff::generate_with_selector(source, target, selector)),
            None => {
                let paths: Vec<&str> = self.attributes.iter().map(String::as_str).collect();
                Diff::generate(source, target, &paths)
            }
        }
    }
}

/// Working state of one diff run.
struct DiffGenerator<'a> {
    selector: &'a AttributeSelector,
    default_schema: &'a str,
    seen_deletions: HashSet<AttributePath>,
    deletions: Vec<String>,
    updates: Vec<ScimAttribute>,
}

impl<'a> DiffGenerator<'a> {
    fn new(selector: &'a AttributeSelector, default_schema: &'a str) -> Self {
        Self {
            selector,
            default_schema,
            seen_deletions: HashSet::new(),
            deletions: Vec::new(),
            updates: Vec::with_capacity(10),
        }
    }

    fn run(&mut self, source: &ScimObject, target: &ScimObject) {
        let mut source_only = Vec::new();
        let mut common = Vec::new();
        for attribute in source.iter().filter(|attr| self.is_selected(attr)) {
            match target.get_attribute(attribute.schema(), attribute.name()) {
                Some(target_attribute) => common.push((attribute, target_attribute)),
                None => source_only.push(attribute),
            }
        }
        let target_only: Vec<&ScimAttribute> = target
            .iter()
            .filter(|attr| self.is_selected(attr))
            .filter(|attr| !source.has_attribute(attr.schema(), attr.name()))
            .collect();

        for attribute in source_only {
            trace!("Deleting source-only attribute {}", attribute.name());
            self.delete_attribute(attribute);
        }

        for attribute in target_only {
            trace!("Adding target-only attribute {}", attribute.name());
            self.add_attribute(attribute);
        }

        for (source_attribute, target_attribute) in common {
            if source_attribute == target_attribute {
                continue;
            }
            trace!("Comparing changed attribute {}", source_attribute.name());

            let descriptor = source_attribute.descriptor();
            if descriptor.is_multi_valued() {
                self.diff_multi_valued(source_attribute, target_attribute);
            } else if descriptor.is_complex() {
                self.diff_complex(source_attribute, target_attribute);
            } else {
                self.updates.push(target_attribute.clone());
            }
        }
    }

    fn is_selected(&self, attribute: &ScimAttribute) -> bool {
        self.selector.matches(attribute.schema(), attribute.name())
    }

    /// Emit the deletion of a whole attribute.
    ///
    /// Simple attributes and whole multi-valued attributes are deleted by
    /// name. Single-valued complex attributes, and multi-valued ones
    /// restricted to named sub-attributes, are deleted sub-attribute by
    /// sub-attribute; the normative sub-attributes of multi-valued entries
    /// go with the entry, so an attribute selected only through normative
    /// sub-attributes is deleted by name.
    fn delete_attribute(&mut self, attribute: &ScimAttribute) {
        let descriptor = attribute.descriptor();
        let whole_multi_valued = descriptor.is_multi_valued()
            && !self
                .selector
                .has_sub_filter(attribute.schema(), attribute.name());

        if !descriptor.is_complex() || whole_multi_valued {
            self.push_deletion(attribute, None);
            return;
        }

        let mut sub_names = Vec::new();
        let mut normative_only = false;
        for value in attribute.values() {
            for sub in self.filter_sub_attributes(attribute, value) {
                if descriptor.is_multi_valued() && is_normative(sub.name()) {
                    normative_only = true;
                    continue;
                }
                sub_names.push(sub.name().to_string());
            }
        }
        if normative_only && sub_names.is_empty() {
            self.push_deletion(attribute, None);
            return;
        }
        for sub_name in sub_names {
            self.push_deletion(attribute, Some(&sub_name));
        }
    }

    fn add_attribute(&mut self, attribute: &ScimAttribute) {
        if !attribute.descriptor().is_complex() {
            self.updates.push(attribute.clone());
            return;
        }

        let values: Vec<AttributeValue> = attribute
            .values()
            .iter()
            .filter_map(|value| self.filtered_value(attribute, value))
            .map(AttributeValue::Complex)
            .collect();
        if !values.is_empty() {
            self.updates
                .push(ScimAttribute::new(Arc::clone(attribute.descriptor()), values));
        }
    }

    /// Reconcile two value lists as sets under exact equality.
    ///
    /// Complex entries are compared on their selected sub-attributes, so
    /// entries that only differ outside the selection are unchanged.
    fn diff_multi_valued(&mut self, source: &ScimAttribute, target: &ScimAttribute) {
        let descriptor = source.descriptor();
        if !descriptor.is_complex() {
            self.diff_simple_values(source, target);
            return;
        }

        let mut removed: Vec<ComplexValue> = Vec::with_capacity(source.values().len());
        for selected in source
            .values()
            .iter()
            .filter_map(|value| self.filtered_value(source, value))
        {
            if !removed.contains(&selected) {
                removed.push(selected);
            }
        }
        let source_count = removed.len();

        let mut seen: Vec<ComplexValue> = Vec::with_capacity(target.values().len());
        let mut added: Vec<ComplexValue> = Vec::new();
        for selected in target
            .values()
            .iter()
            .filter_map(|value| self.filtered_value(target, value))
        {
            if seen.contains(&selected) {
                continue;
            }
            seen.push(selected.clone());
            match removed.iter().position(|existing| *existing == selected) {
                Some(index) => {
                    removed.remove(index);
                }
                None => added.push(selected),
            }
        }

        if removed.is_empty() && added.is_empty() {
            return;
        }

        if source_count > 0 && removed.len() == source_count {
            trace!("All values of {} removed, deleting attribute", source.name());
            self.push_deletion(source, None);
            removed.clear();
        }

        let mut patch_values = Vec::with_capacity(removed.len() + added.len());
        for mut complex in removed {
            complex.insert(delete_marker(descriptor));
            patch_values.push(AttributeValue::Complex(complex));
        }
        patch_values.extend(added.into_iter().map(AttributeValue::Complex));

        if !patch_values.is_empty() {
            self.updates
                .push(ScimAttribute::new(Arc::clone(descriptor), patch_values));
        }
    }

    /// Simple values cannot carry a delete marker: any removal replaces the
    /// attribute as a whole.
    fn diff_simple_values(&mut self, source: &ScimAttribute, target: &ScimAttribute) {
        let mut removed: Vec<&AttributeValue> = Vec::with_capacity(source.values().len());
        for value in source.values() {
            if !removed.contains(&value) {
                removed.push(value);
            }
        }

        let target_values = target.values();
        let mut added: Vec<&AttributeValue> = Vec::with_capacity(target_values.len());
        for (index, value) in target_values.iter().enumerate() {
            if target_values[..index].contains(value) {
                continue;
            }
            match removed.iter().position(|existing| *existing == value) {
                Some(index) => {
                    removed.remove(index);
                }
                None => added.push(value),
            }
        }

        if removed.is_empty() && added.is_empty() {
            return;
        }
        if removed.is_empty() {
            let values = added.into_iter().cloned().collect();
            self.updates
                .push(ScimAttribute::new(Arc::clone(source.descriptor()), values));
        } else {
            self.push_deletion(source, None);
            self.updates.push(target.clone());
        }
    }

    /// Compare the sub-attributes of a single-valued complex attribute.
    fn diff_complex(&mut self, source: &ScimAttribute, target: &ScimAttribute) {
        let (source_entry, target_entry) = match (source.values().first(), target.values().first()) {
            (Some(source_entry), Some(target_entry)) => (source_entry, target_entry),
            (Some(_), None) => {
                self.delete_attribute(source);
                return;
            }
            (None, _) => {
                self.add_attribute(target);
                return;
            }
        };
        let (Some(source_value), Some(target_value)) =
            (source_entry.as_complex(), target_entry.as_complex())
        else {
            self.updates.push(target.clone());
            return;
        };

        let removed: Vec<String> = self
            .filter_sub_attributes(source, source_entry)
            .filter(|sub| !target_value.contains(sub.name()))
            .map(|sub| sub.name().to_string())
            .collect();
        for sub_name in removed {
            self.push_deletion(source, Some(&sub_name));
        }

        let changed: ComplexValue = self
            .filter_sub_attributes(target, target_entry)
            .filter(|sub| source_value.get(sub.name()) != Some(*sub))
            .cloned()
            .collect();
        if !changed.is_empty() {
            self.updates.push(ScimAttribute::single(
                Arc::clone(target.descriptor()),
                AttributeValue::Complex(changed),
            ));
        }
    }

    /// Selected sub-attributes of one complex value of `attribute`.
    fn filter_sub_attributes<'v>(
        &self,
        attribute: &'v ScimAttribute,
        value: &'v AttributeValue,
    ) -> impl Iterator<Item = &'v ScimAttribute> {
        let selector = self.selector;
        value
            .as_complex()
            .into_iter()
            .flat_map(ComplexValue::iter)
            .filter(move |sub| {
                selector.matches_sub_attribute(attribute.schema(), attribute.name(), sub.name())
            })
    }

    /// The selected part of a complex value, or `None` if nothing is left.
    fn filtered_value(&self, attribute: &ScimAttribute, value: &AttributeValue) -> Option<ComplexValue> {
        let filtered: ComplexValue = self
            .filter_sub_attributes(attribute, value)
            .cloned()
            .collect();
        (!filtered.is_empty()).then_some(filtered)
    }

    fn push_deletion(&mut self, attribute: &ScimAttribute, sub_attribute: Option<&str>) {
        let path = AttributePath::new(Some(attribute.schema()), attribute.name(), sub_attribute)
            .relative_to(self.default_schema);
        let rendered = path.to_string();
        if self.seen_deletions.insert(path) {
            trace!("Deleting {}", rendered);
            self.deletions.push(rendered);
        }
    }
}

fn is_normative(sub_attribute: &str) -> bool {
    NORMATIVE_SUB_ATTRIBUTES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(sub_attribute))
}

/// `operation: "delete"` sub-attribute marking a value for removal.
///
/// # Panics
///
/// Panics if the descriptor defines no `operation` sub-attribute.
fn delete_marker(descriptor: &AttributeDescriptor) -> ScimAttribute {
    let operation = descriptor
        .sub_attribute(OPERATION_SUB_ATTRIBUTE)
        .unwrap_or_else(|| {
            panic!(
                "multi-valued attribute '{}' of schema '{}' has no '{}' sub-attribute; \
                 the schema registry must define it for every multi-valued complex attribute",
                descriptor.name(),
                descriptor.schema(),
                OPERATION_SUB_ATTRIBUTE
            )
        });
    ScimAttribute::single(Arc::clone(operation), AttributeValue::string(DELETE_OPERATION))
}
