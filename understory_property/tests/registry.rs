// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_property` crate.
//!
//! These exercise how a component owns a group of properties inside a shared
//! registry: typed access, dynamic assignment, constraints and notification.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDate;
use understory_property::{
    Color, Enumeration, Property, PropertyColor, PropertyDateTime, PropertyEnumeration,
    PropertyEvent, PropertyHandle, PropertyInt, PropertyQuantity, PropertyRegistry, PropertyText,
    SetValueError, TextIdContext, Value, ValueRef,
};
use understory_units::{Quantity, Unit};

const GLTF: TextIdContext = TextIdContext::new("IO::GltfWriter");

struct GltfOptions {
    format: PropertyHandle<PropertyEnumeration>,
    merge_faces: PropertyHandle<PropertyInt>,
    tolerance: PropertyHandle<PropertyQuantity>,
    author: PropertyHandle<PropertyText>,
}

fn gltf_options(registry: &mut PropertyRegistry) -> GltfOptions {
    let group = registry.add_group(GLTF.id("gltf"), None);
    let format = Arc::new(
        Enumeration::new()
            .with_item(0, GLTF.id("Format_Json"))
            .with_item(1, GLTF.id("Format_Binary"))
            .chop_prefix("Format_"),
    );
    GltfOptions {
        format: registry.insert(
            Some(group),
            PropertyEnumeration::new(GLTF.id("format"), format, 1),
        ),
        merge_faces: registry.insert(
            Some(group),
            PropertyInt::new(GLTF.id("mergeFaces"), 0).with_range(0, 1),
        ),
        tolerance: registry.insert(
            Some(group),
            PropertyQuantity::length(GLTF.id("tolerance"), 0.01).with_range(0.0, 1.0),
        ),
        author: registry.insert(
            Some(group),
            PropertyText::new(GLTF.id("author"), String::new())
                .with_description("Written to the asset block"),
        ),
    }
}

#[test]
fn enumeration_values_are_exposed_with_their_names() {
    let mut registry = PropertyRegistry::new();
    let opts = gltf_options(&mut registry);

    let property = registry.get(opts.format.id()).unwrap();
    match property.value_ref() {
        ValueRef::Enumeration { value, enumeration } => {
            assert_eq!(value, 1);
            assert_eq!(enumeration.name_of(value), Some("Binary"));
        }
        other => panic!("unexpected value {other:?}"),
    }
}

#[test]
fn refused_assignments_leave_values_unchanged() {
    let mut registry = PropertyRegistry::new();
    let opts = gltf_options(&mut registry);

    assert_eq!(
        registry.assign(opts.format.id(), Value::Text("Xml".into())),
        Err(SetValueError::UnknownEnumerationName("Xml".into()))
    );
    assert_eq!(
        registry.set(opts.merge_faces, 2),
        Err(SetValueError::OutOfRange(2.0))
    );
    assert_eq!(
        registry.assign(
            opts.tolerance.id(),
            Value::Quantity(Quantity::degrees(1.0))
        ),
        Err(SetValueError::UnitMismatch {
            expected: Unit::Length,
            found: Unit::Angle,
        })
    );

    assert_eq!(registry.value(opts.format), Some(&1));
    assert_eq!(registry.value(opts.merge_faces), Some(&0));
    assert_eq!(registry.value(opts.tolerance), Some(&0.01));
}

#[test]
fn group_listener_sees_every_accepted_change() {
    let mut registry = PropertyRegistry::new();
    let opts = gltf_options(&mut registry);
    let group = registry.group_of(opts.author.id()).unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    registry.add_listener(group, move |event, property| {
        sink.borrow_mut()
            .push((*event, property.name().key().to_owned()));
    });

    registry.set(opts.author, "Fougue".into()).unwrap();
    let _ = registry.set(opts.merge_faces, 7);
    registry.set_enabled(opts.tolerance.id(), false).unwrap();

    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0], (PropertyEvent::Changed(opts.author.id()), "author".into()));
    assert_eq!(
        log[1],
        (
            PropertyEvent::EnabledChanged {
                property: opts.tolerance.id(),
                enabled: false
            },
            "tolerance".into()
        )
    );
}

#[test]
fn restore_defaults_resets_the_component() {
    let mut registry = PropertyRegistry::new();
    let opts = gltf_options(&mut registry);
    let group = registry.group_of(opts.author.id()).unwrap();

    registry.try_update(opts.format, |p| p.set_item_name("Json")).unwrap().unwrap();
    registry.set(opts.author, "someone".into()).unwrap();
    assert!(!registry.get(opts.format.id()).unwrap().is_default());

    registry.restore_defaults(group);
    for id in registry.group_members(group) {
        assert!(registry.get(*id).unwrap().is_default());
    }
    assert_eq!(registry.get(opts.author.id()).unwrap().description(), "Written to the asset block");
}

#[test]
fn builtin_value_kinds() {
    let mut registry = PropertyRegistry::new();
    let color = registry.insert(None, PropertyColor::new(GLTF.id("color"), Color::WHITE));
    let stamp = NaiveDate::from_ymd_opt(2021, 3, 4)
        .unwrap()
        .and_hms_opt(5, 6, 7)
        .unwrap();
    let date = registry.insert(None, PropertyDateTime::new(GLTF.id("date"), stamp));

    registry
        .assign(color.id(), Value::Color(Color::new(1, 2, 3)))
        .unwrap();
    assert_eq!(registry.value(color), Some(&Color::new(1, 2, 3)));
    assert_eq!(registry.get(date.id()).unwrap().value_ref(), ValueRef::DateTime(stamp));
    assert_eq!(registry.get(date.id()).unwrap().type_name(), "PropertyDateTime");
}
