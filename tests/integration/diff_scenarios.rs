//! Diff scenarios over realistic User and Group resources.

use crate::assert_applies_to;
use crate::common::builders::UserBuilder;
use crate::common::fixtures::rfc_examples;
use crate::common::{apply_patch, init_logging, project, registry, user, user_descriptor};
use scim_diff::{AttributeSelector, AttributeValue, BaseResource, Diff, DiffBuilder, Resource};
use serde_json::{Value, json};
use std::sync::Arc;

fn sub_value(value: &AttributeValue, name: &str) -> Option<Value> {
    value
        .sub_attribute(name)
        .and_then(|sub| sub.value().as_simple().cloned())
}

#[test]
fn test_emails_change_is_a_delete_marker_plus_an_add() {
    init_logging();
    let source = user(
        &UserBuilder::new()
            .with_email("a@x.com", "work")
            .with_email("b@x.com", "home")
            .build(),
    );
    let target = user(
        &UserBuilder::new()
            .with_email("a@x.com", "work")
            .with_email("c@x.com", "home")
            .build(),
    );

    let diff = Diff::generate(&source, &target, &[]).unwrap();
    assert!(diff.attributes_to_delete().is_empty());
    assert_eq!(diff.attributes_to_update().len(), 1);

    let emails = &diff.attributes_to_update()[0];
    assert_eq!(emails.name(), "emails");
    assert_eq!(emails.values().len(), 2);

    let deleted = emails
        .values()
        .iter()
        .find(|v| sub_value(v, "operation").is_some())
        .unwrap();
    assert_eq!(sub_value(deleted, "operation"), Some(json!("delete")));
    assert_eq!(sub_value(deleted, "value"), Some(json!("b@x.com")));
    assert_eq!(sub_value(deleted, "type"), Some(json!("home")));

    let added = emails
        .values()
        .iter()
        .find(|v| sub_value(v, "operation").is_none())
        .unwrap();
    assert_eq!(sub_value(added, "value"), Some(json!("c@x.com")));
    assert_eq!(sub_value(added, "type"), Some(json!("home")));

    assert!(
        emails
            .values()
            .iter()
            .all(|v| sub_value(v, "value") != Some(json!("a@x.com")))
    );

    assert_applies_to!(
        &user_descriptor(),
        source.scim_object(),
        &diff.patch_object(),
        target.scim_object()
    );
}

#[test]
fn test_enterprise_user_rewrite_round_trips_through_patch() {
    init_logging();
    let source = user(&rfc_examples::user_enterprise());
    let target = user(
        &UserBuilder::from_value(rfc_examples::user_enterprise())
            .without("nickName")
            .with("title", json!("Tour Lead"))
            .with("name", json!({ "givenName": "Barbara", "familyName": "Jensen-Smith" }))
            .with("roles", json!(["guide", "lead"]))
            .with_enterprise("department", json!("Tour Management"))
            .with_enterprise("manager", json!({ "value": "b4c2", "displayName": "Kim" }))
            .build(),
    );

    let diff = Diff::generate(&source, &target, &[]).unwrap();
    let deletions = diff.attributes_to_delete();
    assert!(deletions.contains(&"nickName".to_string()));
    for removed in ["formatted", "middleName", "honorificPrefix", "honorificSuffix"] {
        assert!(deletions.contains(&format!("name.{}", removed)), "{}", removed);
    }
    assert!(!deletions.iter().any(|path| path == "roles"));

    let roles = diff
        .attributes_to_update()
        .iter()
        .find(|attr| attr.name() == "roles")
        .unwrap();
    assert_eq!(roles.values(), [AttributeValue::string("lead")]);

    assert_applies_to!(
        &user_descriptor(),
        source.scim_object(),
        &diff.patch_object(),
        target.scim_object()
    );
}

#[test]
fn test_selected_attributes_narrow_the_diff() {
    let source = user(&rfc_examples::user_enterprise());
    let target = user(
        &UserBuilder::from_value(rfc_examples::user_enterprise())
            .with("title", json!("Tour Lead"))
            .with("name", json!({ "givenName": "Babs", "familyName": "Jensen" }))
            .with_enterprise("department", json!("Tour Management"))
            .build(),
    );

    let department = format!("{}:department", rfc_examples::ENTERPRISE);
    let diff = Diff::generate(&source, &target, &["name.givenName", department.as_str()]).unwrap();

    assert!(diff.attributes_to_delete().is_empty());
    let names: Vec<&str> = diff.attributes_to_update().iter().map(|a| a.name()).collect();
    assert_eq!(names, ["name", "department"]);

    let name = diff.attributes_to_update()[0].value().as_complex().unwrap();
    assert_eq!(name.len(), 1);
    assert_eq!(name.get("givenName").unwrap().value().as_str(), Some("Babs"));

    let unrelated = Diff::generate(&source, &target, &["nickName", "emails.value"]).unwrap();
    assert!(unrelated.is_empty());
}

#[test]
fn test_whole_removal_collapses_to_attribute_delete() {
    let source = user(
        &UserBuilder::new()
            .with_email("a@x.com", "work")
            .with_email("b@x.com", "home")
            .build(),
    );
    let target = user(&UserBuilder::new().with_email("c@x.com", "work").build());

    let diff = Diff::generate(&source, &target, &[]).unwrap();
    assert_eq!(diff.attributes_to_delete(), ["emails"]);

    let emails = &diff.attributes_to_update()[0];
    assert_eq!(emails.values().len(), 1);
    assert_eq!(sub_value(&emails.values()[0], "value"), Some(json!("c@x.com")));
    assert_eq!(sub_value(&emails.values()[0], "operation"), None);

    assert_applies_to!(
        &user_descriptor(),
        source.scim_object(),
        &diff.patch_object(),
        target.scim_object()
    );
}

#[test]
fn test_selected_email_values_replaced_through_patch() {
    let descriptor = user_descriptor();
    let source = user(&UserBuilder::new().with_email("a@x.com", "work").build());
    let target = user(&UserBuilder::new().with_email("b@x.com", "work").build());

    let diff = Diff::generate(&source, &target, &["emails.value"]).unwrap();
    assert_eq!(diff.attributes_to_delete(), ["emails"]);

    let applied = apply_patch(&descriptor, source.scim_object(), &diff.patch_object());
    let emails = applied
        .get_attribute(descriptor.core_schema(), "emails")
        .unwrap();
    let values: Vec<Option<Value>> = emails.values().iter().map(|v| sub_value(v, "value")).collect();
    assert_eq!(values, [Some(json!("b@x.com"))]);

    let selector = AttributeSelector::from_paths(["emails.value"], descriptor.core_schema()).unwrap();
    assert_eq!(
        project(&applied, &selector),
        project(target.scim_object(), &selector)
    );

    let source_only = Diff::generate(&source, &user(&UserBuilder::new().build()), &["emails.value"]).unwrap();
    assert_eq!(source_only.attributes_to_delete(), ["emails"]);
}

#[test]
fn test_group_membership_changes() {
    let groups = registry().group_descriptor().unwrap();
    let source =
        BaseResource::from_json(Arc::clone(&groups), &rfc_examples::group_tour_guides()).unwrap();
    let target = BaseResource::from_json(
        Arc::clone(&groups),
        &json!({
            "displayName": "Tour Guides",
            "members": [
                { "value": "2819c223-7f76-453a-919d-413861904646", "type": "User" },
                { "value": "e9e30dba-f08f-4109-8486-d5c6a331660a", "type": "Group" }
            ]
        }),
    )
    .unwrap();

    let diff = DiffBuilder::new()
        .selector(AttributeSelector::all())
        .build(&source, &target)
        .unwrap();
    assert!(diff.attributes_to_delete().is_empty());
    assert_eq!(
        diff.to_patch_json(),
        json!({
            "schemas": ["urn:ietf:params:scim:schemas:core:2.0:Group"],
            "members": [
                {
                    "value": "902c246b-6245-4190-8e05-00816be7344a",
                    "type": "User",
                    "operation": "delete"
                },
                { "value": "e9e30dba-f08f-4109-8486-d5c6a331660a", "type": "Group" }
            ]
        })
    );

    assert_applies_to!(
        &groups,
        source.scim_object(),
        &diff.patch_object(),
        target.scim_object()
    );
}

#[test]
fn test_attribute_names_match_ignoring_case() {
    let source = user(&json!({ "userName": "a", "NICKNAME": "x" }));
    let target = user(&json!({ "username": "a", "nickName": "y" }));

    let diff = Diff::generate(&source, &target, &["NickName"]).unwrap();
    assert!(diff.attributes_to_delete().is_empty());
    assert_eq!(diff.attributes_to_update().len(), 1);
    assert_eq!(diff.attributes_to_update()[0].value().as_str(), Some("y"));

    let all = Diff::generate(&source, &target, &[]).unwrap();
    assert_eq!(all.attributes_to_update().len(), 1);
}
