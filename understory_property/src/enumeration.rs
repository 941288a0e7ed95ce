// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Symbolic enumerations and the property kind built on them.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::property::{Property, PropertyBase, SetValueError, TypedProperty};
use crate::text_id::TextId;
use crate::value::{Value, ValueRef};

/// One entry of an [`Enumeration`].
#[derive(Clone, Debug, PartialEq)]
pub struct EnumerationItem {
    /// Integer discriminant.
    pub value: i64,
    /// Symbolic name; its key is what gets persisted.
    pub name: TextId,
    /// Optional longer explanation shown to users.
    pub description: Option<String>,
}

/// An ordered mapping between integer values and symbolic names.
///
/// Persisted data refers to items by name, so values may be renumbered freely.
///
/// ```rust
/// use understory_property::{Enumeration, TextIdContext};
///
/// const CTX: TextIdContext = TextIdContext::new("Format");
///
/// let format = Enumeration::new()
///     .with_item(0, CTX.id("Format_Text"))
///     .with_item(1, CTX.id("Format_Binary"))
///     .chop_prefix("Format_");
///
/// assert_eq!(format.find_by_name("Binary").map(|i| i.value), Some(1));
/// assert_eq!(format.name_of(0), Some("Text"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enumeration {
    items: Vec<EnumerationItem>,
}

impl Enumeration {
    /// Creates an empty enumeration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item, builder style.
    #[must_use]
    pub fn with_item(mut self, value: i64, name: TextId) -> Self {
        self.add_item(value, name);
        self
    }

    /// Appends an item.
    ///
    /// # Panics
    ///
    /// Panics if `value` or the key of `name` is already used by another item.
    pub fn add_item(&mut self, value: i64, name: TextId) {
        assert!(
            !self.contains(value),
            "enumeration value {value} is already defined"
        );
        assert!(
            self.find_by_name(name.key()).is_none(),
            "enumeration name '{}' is already defined",
            name.key()
        );
        self.items.push(EnumerationItem {
            value,
            name,
            description: None,
        });
    }

    /// Sets the description of the item with `value`.
    ///
    /// Returns `false` if there is no such item.
    pub fn set_description(&mut self, value: i64, description: impl Into<String>) -> bool {
        match self.items.iter_mut().find(|item| item.value == value) {
            Some(item) => {
                item.description = Some(description.into());
                true
            }
            None => false,
        }
    }

    /// Removes `prefix` from the key of every item that starts with it.
    ///
    /// Generated names such as `Format_Binary` become `Binary`.
    #[must_use]
    pub fn chop_prefix(mut self, prefix: &str) -> Self {
        for item in &mut self.items {
            if let Some(rest) = item.name.key().strip_prefix(prefix) {
                let key: String = rest.into();
                let namespace: String = item.name.namespace().into();
                let mut renamed = TextId::new(namespace, key);
                if item.name.text() != item.name.key() {
                    renamed = renamed.with_text(String::from(item.name.text()));
                }
                item.name = renamed;
            }
        }
        self
    }

    /// Returns the items in declaration order.
    #[must_use]
    pub fn items(&self) -> &[EnumerationItem] {
        &self.items
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by the key of its name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&EnumerationItem> {
        self.items.iter().find(|item| item.name.key() == name)
    }

    /// Looks up an item by value.
    #[must_use]
    pub fn find_by_value(&self, value: i64) -> Option<&EnumerationItem> {
        self.items.iter().find(|item| item.value == value)
    }

    /// Returns `true` if some item has `value`.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        self.find_by_value(value).is_some()
    }

    /// Returns the name key of the item with `value`.
    #[must_use]
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.find_by_value(value).map(|item| item.name.key())
    }
}

/// A property holding one value of an [`Enumeration`].
///
/// The enumeration is shared: many properties (and the UI listing choices)
/// usually refer to the same one.
#[derive(Clone, Debug)]
pub struct PropertyEnumeration {
    base: PropertyBase,
    enumeration: Arc<Enumeration>,
    value: i64,
    default: i64,
}

impl PropertyEnumeration {
    /// Creates an enumeration property whose value and default are `default`.
    ///
    /// # Panics
    ///
    /// Panics if `default` is not a value of `enumeration`.
    #[must_use]
    pub fn new(name: TextId, enumeration: Arc<Enumeration>, default: i64) -> Self {
        assert!(
            enumeration.contains(default),
            "default value {default} of '{}' is not in its enumeration",
            name.key()
        );
        Self {
            base: PropertyBase::new(name),
            enumeration,
            value: default,
            default,
        }
    }

    /// Sets the description, builder style.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.base.set_description(description);
        self
    }

    /// Returns the enumeration this property draws from.
    #[must_use]
    pub fn enumeration(&self) -> &Enumeration {
        &self.enumeration
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Returns the key of the current item.
    #[must_use]
    pub fn item_name(&self) -> &str {
        // `value` is only ever set to members of the enumeration.
        self.enumeration.name_of(self.value).unwrap_or_default()
    }

    /// Selects the item whose name key is `name`.
    pub fn set_item_name(&mut self, name: &str) -> Result<(), SetValueError> {
        let item = self
            .enumeration
            .find_by_name(name)
            .ok_or_else(|| SetValueError::UnknownEnumerationName(name.into()))?;
        self.value = item.value;
        Ok(())
    }
}

impl Property for PropertyEnumeration {
    fn base(&self) -> &PropertyBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PropertyBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "PropertyEnumeration"
    }

    fn value_ref(&self) -> ValueRef<'_> {
        ValueRef::Enumeration {
            value: self.value,
            enumeration: &self.enumeration,
        }
    }

    fn try_assign(&mut self, value: Value) -> Result<(), SetValueError> {
        match value {
            Value::Enumeration(v) | Value::Int(v) => self.set_value(v),
            Value::Text(name) => self.set_item_name(&name),
            other => Err(SetValueError::TypeMismatch {
                expected: "enumeration",
                found: other.kind_name(),
            }),
        }
    }

    fn restore_default(&mut self) {
        self.value = self.default;
    }

    fn is_default(&self) -> bool {
        self.value == self.default
    }
}

impl TypedProperty for PropertyEnumeration {
    type Value = i64;

    fn get(&self) -> &i64 {
        &self.value
    }

    fn set_value(&mut self, value: i64) -> Result<(), SetValueError> {
        if !self.enumeration.contains(value) {
            return Err(SetValueError::UnknownEnumerationValue(value));
        }
        self.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_id::TextIdContext;

    const CTX: TextIdContext = TextIdContext::new("Test");

    fn shading() -> Arc<Enumeration> {
        let mut e = Enumeration::new()
            .with_item(0, CTX.id("Shading_Flat"))
            .with_item(1, CTX.id("Shading_Smooth").with_text("Smooth shading"))
            .with_item(5, CTX.id("Shading_None"))
            .chop_prefix("Shading_");
        assert!(e.set_description(1, "Interpolated normals"));
        Arc::new(e)
    }

    #[test]
    fn chop_prefix_keeps_text_and_namespace() {
        let e = shading();
        let smooth = e.find_by_value(1).unwrap();
        assert_eq!(smooth.name.key(), "Smooth");
        assert_eq!(smooth.name.namespace(), "Test");
        assert_eq!(smooth.name.text(), "Smooth shading");
        assert_eq!(smooth.description.as_deref(), Some("Interpolated normals"));
        assert_eq!(e.find_by_value(0).unwrap().name.text(), "Flat");
    }

    #[test]
    fn lookup() {
        let e = shading();
        assert_eq!(e.len(), 3);
        assert!(e.contains(5));
        assert!(!e.contains(2));
        assert_eq!(e.find_by_name("None").map(|i| i.value), Some(5));
        assert!(e.find_by_name("Shading_None").is_none());
        assert!(!Enumeration::new().set_description(0, "x"));
    }

    #[test]
    #[should_panic(expected = "already defined")]
    fn duplicate_value_panics() {
        let _ = Enumeration::new()
            .with_item(0, CTX.id("A"))
            .with_item(0, CTX.id("B"));
    }

    #[test]
    fn property_rejects_unknown_values_and_names() {
        let mut p = PropertyEnumeration::new(CTX.id("shading"), shading(), 0);
        assert_eq!(p.item_name(), "Flat");

        assert_eq!(
            p.set_value(2),
            Err(SetValueError::UnknownEnumerationValue(2))
        );
        assert_eq!(
            p.set_item_name("Glossy"),
            Err(SetValueError::UnknownEnumerationName("Glossy".into()))
        );
        assert_eq!(p.value(), 0);

        p.try_assign(Value::Text("None".into())).unwrap();
        assert_eq!(p.value(), 5);
        assert!(!p.is_default());
        p.restore_default();
        assert_eq!(p.item_name(), "Flat");
    }

    #[test]
    #[should_panic(expected = "not in its enumeration")]
    fn default_outside_enumeration_panics() {
        let _ = PropertyEnumeration::new(CTX.id("shading"), shading(), 9);
    }
}
