// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Settings: hierarchical application settings over properties.
//!
//! [`Settings`] arranges properties of a
//! [`PropertyRegistry`](understory_property::PropertyRegistry) in groups and
//! sections, persists them to a [`KeyValueStore`] through a
//! [`PropertyValueConversion`], and runs reset functions registered per group
//! or section.
//!
//! ## Core Concepts
//!
//! - [`Variant`]: the closed set of shapes crossing the store boundary.
//! - [`PropertyValueConversion`]: property to variant and back. Quantities are
//!   written as text in a [`UnitSchema`](understory_units::UnitSchema),
//!   enumeration items by name, colors as `#RRGGBB`. Kinds without a textual
//!   form can be handled with a [`ConversionHandler`].
//! - [`Settings`]: groups, sections and settings, addressed by
//!   [`GroupIndex`], [`SectionIndex`] and [`SettingIndex`]. A setting is
//!   stored at `group/section/property`.
//!
//! ## Loading and Saving
//!
//! Passes are best effort: a setting that fails to convert is logged with the
//! `log` crate and counted in the returned [`PassReport`], and the pass goes on.
//! A property is only changed if its stored value converts completely.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use understory_property::{
//!     Enumeration, PropertyEnumeration, PropertyQuantity, PropertyRegistry, TextIdContext,
//! };
//! use understory_settings::{KeyValueStore, MemoryStore, Settings, Variant, exclude_none};
//!
//! const EXPORT: TextIdContext = TextIdContext::new("Export");
//!
//! let mut registry = PropertyRegistry::new();
//! let mut settings = Settings::new(&mut registry);
//! settings.conversion_mut().set_double_precision(3);
//!
//! let export = settings.add_group(&mut registry, EXPORT.id("export"));
//! let group = settings.property_group(export);
//! let size = registry.insert(Some(group), PropertyQuantity::length(EXPORT.id("size"), 25.4));
//! let format = Arc::new(
//!     Enumeration::new()
//!         .with_item(0, EXPORT.id("Text"))
//!         .with_item(1, EXPORT.id("Binary")),
//! );
//! let kind = registry.insert(Some(group), PropertyEnumeration::new(EXPORT.id("format"), format, 0));
//! settings.add_setting_to_group(size.id(), export);
//! settings.add_setting_to_group(kind.id(), export);
//!
//! let mut store = MemoryStore::new();
//! let report = settings.save_as(&registry, &mut store, exclude_none);
//! assert_eq!(report.applied, 2);
//! assert_eq!(store.value("export/DEFAULT/size"), Some(Variant::from("25.4mm")));
//! assert_eq!(store.value("export/DEFAULT/format"), Some(Variant::from("Text")));
//!
//! // An angle is not a length: that entry fails, the other one loads.
//! store.set_value("export/DEFAULT/size", Variant::from("90°"));
//! store.set_value("export/DEFAULT/format", Variant::from("Binary"));
//! let report = settings.load_from(&mut registry, &store, exclude_none);
//! assert_eq!((report.applied, report.failed), (1, 1));
//! assert_eq!(registry.value(size), Some(&25.4));
//! assert_eq!(registry.value(kind), Some(&1));
//! ```
//!
//! ## Threading
//!
//! Like the property registry, settings are single-threaded. The store is
//! called synchronously; a store doing I/O blocks the caller.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod conversion;
mod settings;
mod store;
mod variant;

pub use conversion::{
    ConversionError, ConversionHandler, DEFAULT_DOUBLE_PRECISION, PropertyValueConversion,
};
pub use settings::{
    DEFAULT_SECTION, GroupIndex, PassReport, ResetFunction, ResetTarget, SectionIndex, Settings,
    SettingIndex, exclude_none,
};
pub use store::{KeyValueStore, MemoryStore};
pub use variant::{DATE_TIME_FORMAT, Variant};
