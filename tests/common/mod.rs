//! Common test utilities for diff and patch body testing.
//!
//! Provides resource fixtures, a fluent user builder, and a reference
//! implementation of SCIM 1.1 PATCH semantics used to check that a generated
//! patch body really turns the source into the target.

use scim_diff::diff::{AttributePath, AttributeSelector};
use scim_diff::resource::ComplexValue;
use scim_diff::schema::{META_ATTRIBUTE, META_ATTRIBUTES_SUB_ATTRIBUTE, OPERATION_SUB_ATTRIBUTE};
use scim_diff::{
    AttributeValue, ResourceDescriptor, ScimAttribute, ScimObject, SchemaRegistry, UserResource,
};
use serde_json::Value;
use std::sync::Arc;

pub mod builders;
pub mod fixtures;

/// Route the library's `log` output to the test harness; set `RUST_LOG`
/// to see it.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

/// Registry with the embedded User and Group resource types.
pub fn registry() -> SchemaRegistry {
    SchemaRegistry::new().expect("embedded schemas must load")
}

pub fn user_descriptor() -> Arc<ResourceDescriptor> {
    registry().user_descriptor().expect("User is registered")
}

/// Parse a User resource, panicking on invalid test data.
pub fn user(data: &Value) -> UserResource {
    UserResource::from_json(user_descriptor(), data)
        .unwrap_or_else(|e| panic!("invalid test user {}: {}", data, e))
}

/// Apply a PATCH body to a copy of `source` the way a service provider does.
///
/// Paths under `meta.attributes` are removed first; a sub-attribute path
/// removes that sub-attribute from every value. Then each attribute of the
/// body is applied: simple single-valued attributes are replaced, complex
/// single-valued attributes are merged, and multi-valued entries are added
/// unless they carry `operation: "delete"`, in which case the source values
/// matching every listed sub-attribute are removed.
pub fn apply_patch(descriptor: &ResourceDescriptor, source: &ScimObject, patch: &ScimObject) -> ScimObject {
    let core = descriptor.core_schema();
    let mut result = source.clone();

    if let Some(meta) = patch.get_attribute(core, META_ATTRIBUTE) {
        let paths = meta
            .value()
            .sub_attribute(META_ATTRIBUTES_SUB_ATTRIBUTE)
            .map(|attr| attr.values().to_vec())
            .unwrap_or_default();
        for path in paths {
            let text = path.as_str().expect("deletion paths are strings");
            let path = AttributePath::parse(text).expect("deletion paths parse");
            remove_path(&mut result, &path, core);
        }
    }

    for attribute in patch.iter() {
        if attribute.is_named(core, META_ATTRIBUTE) {
            continue;
        }
        apply_attribute(&mut result, attribute);
    }

    result
}

fn remove_path(object: &mut ScimObject, path: &AttributePath, core: &str) {
    let schema = path.schema_or(core).to_string();
    let Some(sub_name) = path.sub_attribute_name() else {
        object.remove_attribute(&schema, path.attribute_name());
        return;
    };
    let Some(attribute) = object.remove_attribute(&schema, path.attribute_name()) else {
        return;
    };

    let values: Vec<AttributeValue> = attribute
        .values()
        .iter()
        .filter_map(|value| {
            let mut complex = value.as_complex()?.clone();
            complex.remove(sub_name);
            (!complex.is_empty()).then_some(AttributeValue::Complex(complex))
        })
        .collect();
    if !values.is_empty() {
        object.set_attribute(ScimAttribute::new(Arc::clone(attribute.descriptor()), values));
    }
}

fn apply_attribute(object: &mut ScimObject, update: &ScimAttribute) {
    let descriptor = Arc::clone(update.descriptor());
    let existing = object.get_attribute(update.schema(), update.name()).cloned();

    if !update.is_multi_valued() {
        let merged = match (existing, update.value()) {
            (Some(existing), AttributeValue::Complex(changes)) if existing.value().is_complex() => {
                let mut complex = existing.value().as_complex().cloned().unwrap_or_default();
                for sub in changes {
                    complex.insert(sub.clone());
                }
                ScimAttribute::single(descriptor, AttributeValue::Complex(complex))
            }
            _ => update.clone(),
        };
        object.set_attribute(merged);
        return;
    }

    let mut values: Vec<AttributeValue> = existing.map(|attr| attr.values().to_vec()).unwrap_or_default();
    for value in update.values() {
        match delete_target(value) {
            Some(selection) => values.retain(|candidate| !matches_selection(candidate, &selection)),
            None => {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        }
    }

    if values.is_empty() {
        object.remove_attribute(update.schema(), update.name());
    } else {
        object.set_attribute(ScimAttribute::new(descriptor, values));
    }
}

/// The value a delete-marked entry selects, without its marker.
fn delete_target(value: &AttributeValue) -> Option<ComplexValue> {
    let complex = value.as_complex()?;
    let operation = complex.get(OPERATION_SUB_ATTRIBUTE)?;
    if operation.value().as_str() != Some("delete") {
        return None;
    }
    let mut selection = complex.clone();
    selection.remove(OPERATION_SUB_ATTRIBUTE);
    Some(selection)
}

fn matches_selection(candidate: &AttributeValue, selection: &ComplexValue) -> bool {
    let Some(candidate) = candidate.as_complex() else {
        return false;
    };
    selection
        .iter()
        .all(|sub| candidate.get(sub.name()) == Some(sub))
}

/// Compare two attribute trees treating multi-valued attributes as sets.
pub fn equivalent(a: &ScimObject, b: &ScimObject) -> bool {
    a.len() == b.len()
        && a.iter().all(|attr| {
            b.get_attribute(attr.schema(), attr.name())
                .is_some_and(|other| same_values(attr, other))
        })
}

fn same_values(a: &ScimAttribute, b: &ScimAttribute) -> bool {
    if !a.is_multi_valued() {
        return a == b;
    }
    a.values().iter().all(|value| b.values().contains(value))
        && b.values().iter().all(|value| a.values().contains(value))
}

/// Restrict `object` to the attributes and sub-attributes `selector` names.
///
/// Complex values left without sub-attributes are dropped, as are duplicate
/// values and attributes left without any value.
pub fn project(object: &ScimObject, selector: &AttributeSelector) -> ScimObject {
    let mut projected = ScimObject::new();
    for attribute in object
        .iter()
        .filter(|attr| selector.matches(attr.schema(), attr.name()))
    {
        let mut values: Vec<AttributeValue> = Vec::new();
        for value in attribute.values() {
            let kept = match value.as_complex() {
                Some(complex) => {
                    let selected: ComplexValue = complex
                        .iter()
                        .filter(|sub| {
                            selector.matches_sub_attribute(attribute.schema(), attribute.name(), sub.name())
                        })
                        .cloned()
                        .collect();
                    if selected.is_empty() {
                        continue;
                    }
                    AttributeValue::Complex(selected)
                }
                None => value.clone(),
            };
            if !values.contains(&kept) {
                values.push(kept);
            }
        }
        if !values.is_empty() {
            projected.set_attribute(ScimAttribute::new(Arc::clone(attribute.descriptor()), values));
        }
    }
    projected
}

/// Assert that applying `patch` to `source` yields `target`, up to value order.
#[macro_export]
macro_rules! assert_applies_to {
    ($descriptor:expr, $source:expr, $patch:expr, $target:expr) => {{
        let applied = $crate::common::apply_patch($descriptor, $source, $patch);
        assert!(
            $crate::common::equivalent(&applied, $target),
            "patch did not reproduce the target\n applied: {}\n  target: {}",
            applied.to_json($descriptor),
            $target.to_json($descriptor)
        );
    }};
}
