// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_settings` crate.
//!
//! These build an application-like settings tree, save it to a store and load
//! it back into a freshly built tree.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use understory_property::{
    Color, Enumeration, Property, PropertyBool, PropertyColor, PropertyDouble, PropertyEnumeration,
    PropertyEvent, PropertyHandle, PropertyInt, PropertyQuantity, PropertyRegistry, PropertyText,
    TextIdContext,
};
use understory_settings::{
    ConversionError, GroupIndex, KeyValueStore, MemoryStore, Settings, Variant, exclude_none,
};
use understory_units::{Unit, UnitSchema};

const APP: TextIdContext = TextIdContext::new("Application");
const EXPORT: TextIdContext = TextIdContext::new("Export");

struct App {
    registry: PropertyRegistry,
    settings: Settings,
    export: GroupIndex,
    size: PropertyHandle<PropertyQuantity>,
    angle: PropertyHandle<PropertyQuantity>,
    format: PropertyHandle<PropertyEnumeration>,
    binary: PropertyHandle<PropertyBool>,
    count: PropertyHandle<PropertyInt>,
    scale: PropertyHandle<PropertyDouble>,
    author: PropertyHandle<PropertyText>,
    color: PropertyHandle<PropertyColor>,
}

fn build() -> App {
    let mut registry = PropertyRegistry::new();
    let mut settings = Settings::new(&mut registry);

    let export = settings.add_group(&mut registry, APP.id("export"));
    let group = settings.property_group(export);
    let mesh = settings.add_section(export, APP.id("mesh"));

    let format = Arc::new(
        Enumeration::new()
            .with_item(0, EXPORT.id("Format_Text"))
            .with_item(1, EXPORT.id("Format_Binary"))
            .chop_prefix("Format_"),
    );
    let size = registry.insert(Some(group), PropertyQuantity::length(EXPORT.id("size"), 25.4));
    let angle = registry.insert(Some(group), PropertyQuantity::angle(EXPORT.id("angle"), 0.5));
    let format = registry.insert(
        Some(group),
        PropertyEnumeration::new(EXPORT.id("format"), format, 0),
    );
    let binary = registry.insert(Some(group), PropertyBool::new(EXPORT.id("binary"), false));
    let count = registry.insert(
        Some(group),
        PropertyInt::new(EXPORT.id("count"), 4).with_range(1, 64),
    );
    let scale = registry.insert(Some(group), PropertyDouble::new(EXPORT.id("scale"), 1.0));
    let author = registry.insert(Some(group), PropertyText::new(EXPORT.id("author"), String::new()));
    let color = registry.insert(Some(group), PropertyColor::new(EXPORT.id("color"), Color::BLACK));

    for id in [size.id(), angle.id(), format.id(), binary.id(), author.id(), color.id()] {
        settings.add_setting_to_group(id, export);
    }
    settings.add_setting(count.id(), mesh);
    settings.add_setting(scale.id(), mesh);

    App {
        registry,
        settings,
        export,
        size,
        angle,
        format,
        binary,
        count,
        scale,
        author,
        color,
    }
}

fn edit(app: &mut App) {
    let r = &mut app.registry;
    r.set(app.size, 12.5).unwrap();
    r.set(app.angle, 1.25).unwrap();
    r.set(app.format, 1).unwrap();
    r.set(app.binary, true).unwrap();
    r.set(app.count, 17).unwrap();
    r.set(app.scale, 0.1 + 0.2).unwrap();
    r.set(app.author, "Fougue".into()).unwrap();
    r.set(app.color, Color::new(0x12, 0x34, 0xab)).unwrap();
}

#[test]
fn export_scenario() {
    let mut app = build();
    app.settings.conversion_mut().set_double_precision(3);
    let property = app.registry.get(app.size.id()).unwrap();
    assert_eq!(property.name().key(), "size");
    assert_eq!(
        app.settings.conversion().to_variant(property),
        Ok(Variant::from("25.4mm"))
    );

    // Inches convert to the internal millimetres.
    app.registry.set(app.size, 1.0).unwrap();
    let store = MemoryStore::from_iter([("export/DEFAULT/size".to_owned(), Variant::from("1in"))]);
    let report = app.settings.load_from(&mut app.registry, &store, exclude_none);
    assert_eq!(report.applied, 1);
    assert_eq!(app.registry.value(app.size), Some(&25.4));
}

#[test]
fn save_then_load_into_fresh_tree() {
    let mut app = build();
    edit(&mut app);

    let mut store = MemoryStore::new();
    let report = app.settings.save_as(&app.registry, &mut store, exclude_none);
    assert!(report.is_success());
    assert_eq!(report.applied, 8);
    assert_eq!(store.value("export/mesh/count"), Some(Variant::Int(17)));
    assert_eq!(store.value("export/DEFAULT/format"), Some(Variant::from("Binary")));
    assert_eq!(store.value("export/DEFAULT/color"), Some(Variant::from("#1234AB")));

    let mut fresh = build();
    let report = fresh.settings.load_from(&mut fresh.registry, &store, exclude_none);
    assert_eq!(report.applied, 8);
    assert_eq!(report.missing, 0);

    let r = &fresh.registry;
    assert_eq!(r.value(fresh.size), Some(&12.5));
    // Angles are written in degrees with six significant digits.
    let angle = *r.value(fresh.angle).unwrap();
    assert!((angle - 1.25).abs() < 1e-5, "got {angle}");
    assert_eq!(r.value(fresh.format), Some(&1));
    assert_eq!(r.value(fresh.binary), Some(&true));
    assert_eq!(r.value(fresh.count), Some(&17));
    assert_eq!(r.value(fresh.scale), Some(&(0.1 + 0.2)));
    assert_eq!(r.value(fresh.author).map(String::as_str), Some("Fougue"));
    assert_eq!(r.value(fresh.color), Some(&Color::new(0x12, 0x34, 0xab)));
}

#[test]
fn store_survives_json() {
    let mut app = build();
    edit(&mut app);
    let mut store = MemoryStore::new();
    app.settings.save_as(&app.registry, &mut store, exclude_none);

    let json = serde_json::to_string(&store).unwrap();
    let store: MemoryStore = serde_json::from_str(&json).unwrap();

    let mut fresh = build();
    let report = fresh.settings.load_from(&mut fresh.registry, &store, exclude_none);
    assert!(report.is_success());
    assert_eq!(fresh.registry.value(fresh.scale), Some(&(0.1 + 0.2)));
}

#[test]
fn imperial_schema_round_trips_within_precision() {
    let mut app = build();
    app.settings.conversion_mut().set_unit_schema(UnitSchema::ImperialUk);
    let mut store = MemoryStore::new();
    app.settings.save_as(&app.registry, &mut store, exclude_none);
    assert_eq!(store.value("export/DEFAULT/size"), Some(Variant::from("1in")));

    let mut fresh = build();
    fresh.registry.set(fresh.size, 0.0).unwrap();
    fresh.settings.load_from(&mut fresh.registry, &store, exclude_none);
    let size = *fresh.registry.value(fresh.size).unwrap();
    assert!((size - 25.4).abs() < 1e-9, "got {size}");
}

#[test]
fn bad_entries_fail_alone() {
    let mut app = build();
    let store = MemoryStore::from_iter([
        ("export/DEFAULT/size".to_owned(), Variant::from("90°")),
        ("export/DEFAULT/format".to_owned(), Variant::from("Xml")),
        ("export/mesh/count".to_owned(), Variant::Int(1000)),
        ("export/DEFAULT/color".to_owned(), Variant::from("red")),
        ("export/DEFAULT/binary".to_owned(), Variant::Bool(true)),
    ]);
    let report = app.settings.load_from(&mut app.registry, &store, exclude_none);
    assert_eq!(report.failed, 4);
    assert_eq!(report.applied, 1);
    assert_eq!(report.missing, 3);

    let r = &app.registry;
    assert_eq!(r.value(app.size), Some(&25.4));
    assert_eq!(r.value(app.format), Some(&0));
    assert_eq!(r.value(app.count), Some(&4));
    assert_eq!(r.value(app.color), Some(&Color::BLACK));
    assert_eq!(r.value(app.binary), Some(&true));
}

#[test]
fn single_setting_errors_are_returned() {
    let mut app = build();
    let setting = app.settings.find_property(app.size.id()).unwrap();
    let store = MemoryStore::from_iter([("export/DEFAULT/size".to_owned(), Variant::from("90°"))]);
    let err = app
        .settings
        .load_property_from(&mut app.registry, &store, setting)
        .unwrap_err();
    assert!(matches!(
        err,
        ConversionError::UnitMismatch {
            expected: Unit::Length,
            found: Unit::Angle,
            ..
        }
    ));
    assert_eq!(
        app.settings
            .load_property_from(&mut app.registry, &MemoryStore::new(), setting),
        Ok(false)
    );
}

#[test]
fn exclude_predicates() {
    let mut app = build();
    edit(&mut app);
    let is_size = |p: &dyn Property| p.name().key() == "size";

    let mut store = MemoryStore::new();
    let report = app.settings.save_as(&app.registry, &mut store, is_size);
    assert_eq!(report.excluded, 1);
    assert!(!store.contains("export/DEFAULT/size"));
    assert!(store.contains("export/DEFAULT/angle"));

    store.set_value("export/DEFAULT/size", Variant::from("3mm"));
    store.set_value("export/DEFAULT/angle", Variant::from("90°"));
    let report = app.settings.load_from(&mut app.registry, &store, is_size);
    assert_eq!(report.excluded, 1);
    assert_eq!(app.registry.value(app.size), Some(&12.5));
    let angle = *app.registry.value(app.angle).unwrap();
    assert!((angle - core::f64::consts::FRAC_PI_2).abs() < 1e-12, "got {angle}");
}

#[test]
fn subscribers_see_loaded_values_and_restored_defaults() {
    let mut app = build();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    app.settings.subscribe(&mut app.registry, move |event, property| {
        if let PropertyEvent::Changed(_) = event {
            sink.borrow_mut().push(property.name().key().to_owned());
        }
    });

    let store = MemoryStore::from_iter([("export/mesh/count".to_owned(), Variant::from("9"))]);
    app.settings.load_from(&mut app.registry, &store, exclude_none);
    assert_eq!(*seen.borrow(), ["count"]);
    assert_eq!(app.registry.value(app.count), Some(&9));

    seen.borrow_mut().clear();
    app.settings.restore_defaults(&mut app.registry);
    assert_eq!(seen.borrow().len(), 8);
    assert_eq!(app.registry.value(app.count), Some(&4));
}

#[test]
fn reset_functions_mutate_their_group() {
    let mut app = build();
    edit(&mut app);
    let count = app.count;
    app.settings.add_reset_function(app.export, move |registry| {
        registry.reset(count.id()).unwrap();
    });
    let other = app.settings.add_group(&mut app.registry, APP.id("other"));
    let touched = Rc::new(RefCell::new(false));
    let flag = touched.clone();
    app.settings
        .add_reset_function(other, move |_| *flag.borrow_mut() = true);

    app.settings.reset_group(&mut app.registry, app.export);
    assert_eq!(app.registry.value(app.count), Some(&4));
    assert_eq!(app.registry.value(app.scale), Some(&(0.1 + 0.2)));
    assert!(!*touched.borrow());

    app.settings.reset_all(&mut app.registry);
    assert!(*touched.borrow());
}
