// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Property: type-erased, observable properties.
//!
//! A *property* is a named value with a description, an enabled flag and
//! change notification. Components that need configurable state define
//! properties, hand them to a [`PropertyRegistry`] and keep typed
//! [`PropertyHandle`]s. Generic code such as a settings dialog or a persistence
//! layer works on `&dyn Property` and the closed [`ValueRef`] / [`Value`] shapes
//! without knowing any concrete kind.
//!
//! ## Core Concepts
//!
//! - [`TextId`]: namespaced identifier naming every property and group.
//! - [`Property`]: the object-safe contract; [`TypedProperty`] adds a static
//!   value type.
//! - Built-in kinds: [`GenericProperty<T>`] (bool, text, color, ...),
//!   [`ScalarProperty<T>`] (bounded `i64`/`f64`), [`PropertyQuantity`] and
//!   [`PropertyEnumeration`].
//! - [`PropertyRegistry`]: arena of properties and groups. Groups nest; value
//!   and enabled-state changes made through the registry bubble up the group
//!   chain as [`PropertyEvent`]s. [`PropertyRegistry::restore_defaults`] resets a
//!   whole group tree.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use understory_property::{
//!     Enumeration, PropertyEnumeration, PropertyQuantity, PropertyRegistry,
//!     TextIdContext, Value,
//! };
//! use understory_units::Quantity;
//!
//! const EXPORT: TextIdContext = TextIdContext::new("Export");
//!
//! let format = Arc::new(
//!     Enumeration::new()
//!         .with_item(0, EXPORT.id("Text"))
//!         .with_item(1, EXPORT.id("Binary")),
//! );
//!
//! let mut registry = PropertyRegistry::new();
//! let group = registry.add_group(EXPORT.id("export"), None);
//! let size = registry.insert(Some(group), PropertyQuantity::length(EXPORT.id("size"), 25.4));
//! let kind = registry.insert(Some(group), PropertyEnumeration::new(EXPORT.id("format"), format, 0));
//!
//! registry.assign(size.id(), Value::Quantity(Quantity::millimeters(10.0))).unwrap();
//! registry.try_update(kind, |p| p.set_item_name("Binary")).unwrap().unwrap();
//!
//! // Quantities of another dimension and unknown names are refused.
//! assert!(registry.assign(size.id(), Value::Quantity(Quantity::degrees(90.0))).is_err());
//! assert!(registry.assign(kind.id(), Value::Text("Xml".into())).is_err());
//!
//! assert_eq!(registry.value(size), Some(&10.0));
//! assert_eq!(registry.get_typed(kind).unwrap().item_name(), "Binary");
//! ```
//!
//! ## Threading
//!
//! Everything here is single-threaded and synchronous. Listeners only receive
//! a shared reference to the changed property, so they cannot re-enter the
//! registry while it is notifying.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod builtins;
mod enumeration;
mod id;
mod property;
mod quantity;
mod registry;
mod text_id;
mod types;
mod value;

pub use builtins::{
    GenericProperty, PropertyBool, PropertyBytes, PropertyCheckState, PropertyColor,
    PropertyDateTime, PropertyDouble, PropertyInt, PropertyMetadataList, PropertyPoint,
    PropertyText, PropertyTextList, PropertyValueType, Scalar, ScalarProperty,
};
pub use enumeration::{Enumeration, EnumerationItem, PropertyEnumeration};
pub use id::{GroupId, ListenerId, PropertyHandle, PropertyId};
pub use property::{Property, PropertyBase, SetValueError, TypedProperty};
pub use quantity::PropertyQuantity;
pub use registry::{Listener, PropertyEvent, PropertyRegistry};
pub use text_id::{TextId, TextIdContext, is_valid_key};
pub use types::{CheckState, Color, Point3, StringMetadata};
pub use value::{CustomValue, Value, ValueRef};
