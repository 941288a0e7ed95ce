// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The property arena.
//!
//! This module provides [`PropertyRegistry`], which owns property objects on
//! behalf of the components that define them and organizes them into groups.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

use crate::id::{GroupId, ListenerId, PropertyHandle, PropertyId};
use crate::property::{Property, SetValueError, TypedProperty};
use crate::text_id::TextId;
use crate::value::Value;

/// A notification about one property.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PropertyEvent {
    /// The value changed.
    Changed(PropertyId),
    /// The enabled flag flipped.
    EnabledChanged {
        /// The property.
        property: PropertyId,
        /// New state.
        enabled: bool,
    },
}

impl PropertyEvent {
    /// Returns the property the event is about.
    #[must_use]
    pub fn property(&self) -> PropertyId {
        match *self {
            Self::Changed(property) | Self::EnabledChanged { property, .. } => property,
        }
    }
}

/// Callback observing a group. It sees the property after the change.
pub type Listener = Box<dyn FnMut(&PropertyEvent, &dyn Property)>;

struct PropertySlot {
    property: Box<dyn Property>,
    group: Option<GroupId>,
}

struct GroupSlot {
    name: TextId,
    parent: Option<GroupId>,
    members: SmallVec<[PropertyId; 8]>,
    children: SmallVec<[GroupId; 4]>,
    listeners: Vec<(ListenerId, Listener)>,
    changes_blocked: bool,
}

impl fmt::Debug for GroupSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupSlot")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("members", &self.members)
            .field("children", &self.children)
            .field("listeners", &self.listeners.len())
            .field("changes_blocked", &self.changes_blocked)
            .finish()
    }
}

/// Owns properties and the groups they belong to.
///
/// Components create a property, hand it over with [`insert`](Self::insert)
/// and keep the returned [`PropertyHandle`]. Every mutation made through the
/// registry notifies the listeners of the property's group and then of each
/// ancestor group, synchronously, before the mutating call returns.
///
/// Listeners get a shared reference to the changed property and nothing else,
/// so a listener cannot mutate properties while a notification is running.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use understory_property::{PropertyBool, PropertyEvent, PropertyRegistry, TextId};
///
/// let mut registry = PropertyRegistry::new();
/// let root = registry.add_group(TextId::new("App", "settings"), None);
/// let io = registry.add_group(TextId::new("App", "io"), Some(root));
///
/// let seen = Rc::new(Cell::new(0));
/// let counter = seen.clone();
/// registry.add_listener(root, move |event, _property| {
///     if matches!(event, PropertyEvent::Changed(_)) {
///         counter.set(counter.get() + 1);
///     }
/// });
///
/// let flag = registry.insert(Some(io), PropertyBool::new(TextId::new("IO", "flag"), false));
/// registry.set(flag, true).unwrap();
/// assert_eq!(seen.get(), 1);
///
/// registry.restore_defaults(root);
/// assert_eq!(registry.value(flag), Some(&false));
/// assert_eq!(seen.get(), 2);
/// ```
#[derive(Default)]
pub struct PropertyRegistry {
    properties: Vec<Option<PropertySlot>>,
    groups: Vec<GroupSlot>,
    next_listener: u32,
}

impl PropertyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- groups -----------------------------------------------------------

    /// Adds a group, optionally nested under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a group of this registry.
    pub fn add_group(&mut self, name: TextId, parent: Option<GroupId>) -> GroupId {
        assert!(
            self.groups.len() < u32::MAX as usize,
            "Too many groups registered (max {})",
            u32::MAX
        );
        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = GroupId::new(self.groups.len() as u32);
        if let Some(parent) = parent {
            self.group_slot_mut(parent).children.push(id);
        }
        self.groups.push(GroupSlot {
            name,
            parent,
            members: SmallVec::new(),
            children: SmallVec::new(),
            listeners: Vec::new(),
            changes_blocked: false,
        });
        id
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns the name of a group.
    #[must_use]
    pub fn group_name(&self, group: GroupId) -> Option<&TextId> {
        self.group_slot(group).map(|g| &g.name)
    }

    /// Returns the parent of a group.
    #[must_use]
    pub fn group_parent(&self, group: GroupId) -> Option<GroupId> {
        self.group_slot(group).and_then(|g| g.parent)
    }

    /// Returns the properties directly in a group, in insertion order.
    #[must_use]
    pub fn group_members(&self, group: GroupId) -> &[PropertyId] {
        self.group_slot(group)
            .map(|g| g.members.as_slice())
            .unwrap_or_default()
    }

    /// Returns the groups nested directly in a group.
    #[must_use]
    pub fn child_groups(&self, group: GroupId) -> &[GroupId] {
        self.group_slot(group)
            .map(|g| g.children.as_slice())
            .unwrap_or_default()
    }

    /// Stops or resumes forwarding of [`PropertyEvent::Changed`] at `group`.
    ///
    /// While blocked, value changes of properties in the group or below reach
    /// neither the group's listeners nor its ancestors'. Enabled-state events
    /// are not affected.
    pub fn block_changes(&mut self, group: GroupId, blocked: bool) {
        self.group_slot_mut(group).changes_blocked = blocked;
    }

    /// Returns `true` if [`block_changes`](Self::block_changes) is active.
    #[must_use]
    pub fn changes_blocked(&self, group: GroupId) -> bool {
        self.group_slot(group).is_some_and(|g| g.changes_blocked)
    }

    /// Registers a listener on a group.
    ///
    /// The listener sees events of properties in the group and in its
    /// descendants.
    pub fn add_listener(
        &mut self,
        group: GroupId,
        listener: impl FnMut(&PropertyEvent, &dyn Property) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.group_slot_mut(group)
            .listeners
            .push((id, Box::new(listener)));
        id
    }

    /// Unregisters a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, listener: ListenerId) -> bool {
        for group in &mut self.groups {
            if let Some(pos) = group.listeners.iter().position(|(id, _)| *id == listener) {
                group.listeners.remove(pos);
                return true;
            }
        }
        false
    }

    /// Resets every property of `group` and of its descendants.
    ///
    /// Each reset property is announced with [`PropertyEvent::Changed`].
    pub fn restore_defaults(&mut self, group: GroupId) {
        let Some(slot) = self.group_slot(group) else {
            return;
        };
        log::debug!("restoring defaults of group '{}'", slot.name.key());
        let members = slot.members.clone();
        let children = slot.children.clone();
        for id in members {
            if let Some(slot) = self.slot_mut(id) {
                slot.property.restore_default();
                self.notify(PropertyEvent::Changed(id));
            }
        }
        for child in children {
            self.restore_defaults(child);
        }
    }

    // --- properties -------------------------------------------------------

    /// Takes ownership of `property`, optionally placing it in `group`.
    ///
    /// # Panics
    ///
    /// Panics if `group` is not a group of this registry.
    pub fn insert<P: Property>(&mut self, group: Option<GroupId>, property: P) -> PropertyHandle<P> {
        assert!(
            self.properties.len() < u32::MAX as usize,
            "Too many properties registered (max {})",
            u32::MAX
        );
        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = PropertyId::new(self.properties.len() as u32);
        if let Some(group) = group {
            self.group_slot_mut(group).members.push(id);
        }
        self.properties.push(Some(PropertySlot {
            property: Box::new(property),
            group,
        }));
        PropertyHandle::from_id(id)
    }

    /// Removes a property and hands it back. Its id is never reused.
    pub fn remove(&mut self, id: PropertyId) -> Option<Box<dyn Property>> {
        let slot = self.properties.get_mut(id.index() as usize)?.take()?;
        if let Some(group) = slot.group {
            self.groups[group.index() as usize].members.retain(|m| *m != id);
        }
        log::debug!("removed property '{}'", slot.property.name().key());
        Some(slot.property)
    }

    /// Returns `true` if `id` refers to a live property.
    #[must_use]
    pub fn contains(&self, id: PropertyId) -> bool {
        self.slot(id).is_some()
    }

    /// Returns the number of live properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.iter().flatten().count()
    }

    /// Returns `true` if there are no live properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates live properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &dyn Property)> + '_ {
        self.properties.iter().enumerate().filter_map(|(i, slot)| {
            #[expect(clippy::cast_possible_truncation, reason = "ids are u32 by construction")]
            let id = PropertyId::new(i as u32);
            slot.as_ref().map(|s| (id, &*s.property))
        })
    }

    /// Returns a property.
    #[must_use]
    pub fn get(&self, id: PropertyId) -> Option<&dyn Property> {
        self.slot(id).map(|s| &*s.property)
    }

    /// Returns a property as its concrete kind.
    #[must_use]
    pub fn get_typed<P: Property>(&self, handle: PropertyHandle<P>) -> Option<&P> {
        self.get(handle.id())?.downcast_ref()
    }

    /// Returns the current value of a typed property.
    #[must_use]
    pub fn value<P: TypedProperty>(&self, handle: PropertyHandle<P>) -> Option<&P::Value> {
        self.get_typed(handle).map(TypedProperty::get)
    }

    /// Returns the group a property belongs to.
    #[must_use]
    pub fn group_of(&self, id: PropertyId) -> Option<GroupId> {
        self.slot(id).and_then(|s| s.group)
    }

    /// Sets the value of a typed property and notifies.
    pub fn set<P: TypedProperty>(
        &mut self,
        handle: PropertyHandle<P>,
        value: P::Value,
    ) -> Result<(), SetValueError> {
        let id = handle.id();
        self.slot_mut(id)
            .and_then(|s| s.property.downcast_mut::<P>())
            .ok_or(SetValueError::UnknownProperty(id))?
            .set_value(value)?;
        self.notify(PropertyEvent::Changed(id));
        Ok(())
    }

    /// Assigns a dynamically typed value and notifies.
    ///
    /// The property is unchanged, and nobody is notified, if the value is
    /// refused.
    pub fn assign(&mut self, id: PropertyId, value: Value) -> Result<(), SetValueError> {
        self.slot_mut(id)
            .ok_or(SetValueError::UnknownProperty(id))?
            .property
            .try_assign(value)?;
        self.notify(PropertyEvent::Changed(id));
        Ok(())
    }

    /// Runs `f` on a property of known kind, then announces a value change.
    ///
    /// For fallible setters use [`try_update`](Self::try_update), which stays
    /// silent when the setter refuses.
    pub fn update<P: Property, R>(
        &mut self,
        handle: PropertyHandle<P>,
        f: impl FnOnce(&mut P) -> R,
    ) -> Option<R> {
        let id = handle.id();
        let property = self.slot_mut(id)?.property.downcast_mut::<P>()?;
        let result = f(property);
        self.notify(PropertyEvent::Changed(id));
        Some(result)
    }

    /// Runs a fallible setter on a property of known kind.
    ///
    /// A value change is announced only if `f` returns `Ok`. Use this for
    /// kind-specific setters such as
    /// [`PropertyEnumeration::set_item_name`](crate::PropertyEnumeration::set_item_name).
    pub fn try_update<P: Property, R, E>(
        &mut self,
        handle: PropertyHandle<P>,
        f: impl FnOnce(&mut P) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        let id = handle.id();
        let property = self.slot_mut(id)?.property.downcast_mut::<P>()?;
        let result = f(property);
        if result.is_ok() {
            self.notify(PropertyEvent::Changed(id));
        }
        Some(result)
    }

    /// Resets a property to its default and notifies.
    pub fn reset(&mut self, id: PropertyId) -> Result<(), SetValueError> {
        self.slot_mut(id)
            .ok_or(SetValueError::UnknownProperty(id))?
            .property
            .restore_default();
        self.notify(PropertyEvent::Changed(id));
        Ok(())
    }

    /// Enables or disables a property.
    ///
    /// [`PropertyEvent::EnabledChanged`] is emitted only if the state flips.
    pub fn set_enabled(&mut self, id: PropertyId, enabled: bool) -> Result<(), SetValueError> {
        let base = self
            .slot_mut(id)
            .ok_or(SetValueError::UnknownProperty(id))?
            .property
            .base_mut();
        if base.is_enabled() != enabled {
            base.set_enabled(enabled);
            self.notify(PropertyEvent::EnabledChanged {
                property: id,
                enabled,
            });
        }
        Ok(())
    }

    /// Shows or hides a property in user interfaces.
    pub fn set_user_visible(&mut self, id: PropertyId, visible: bool) -> Result<(), SetValueError> {
        self.slot_mut(id)
            .ok_or(SetValueError::UnknownProperty(id))?
            .property
            .base_mut()
            .set_user_visible(visible);
        Ok(())
    }

    /// Replaces the description of a property.
    pub fn set_description(
        &mut self,
        id: PropertyId,
        description: impl Into<String>,
    ) -> Result<(), SetValueError> {
        self.slot_mut(id)
            .ok_or(SetValueError::UnknownProperty(id))?
            .property
            .base_mut()
            .set_description(description);
        Ok(())
    }

    /// Moves a property to another group, or out of any group.
    ///
    /// # Panics
    ///
    /// Panics if `group` is not a group of this registry.
    pub fn set_group(&mut self, id: PropertyId, group: Option<GroupId>) -> Result<(), SetValueError> {
        if let Some(group) = group {
            assert!(
                self.group_slot(group).is_some(),
                "{group:?} is not a group of this registry"
            );
        }
        let slot = self
            .properties
            .get_mut(id.index() as usize)
            .and_then(Option::as_mut)
            .ok_or(SetValueError::UnknownProperty(id))?;
        let previous = core::mem::replace(&mut slot.group, group);
        if let Some(previous) = previous {
            self.groups[previous.index() as usize]
                .members
                .retain(|m| *m != id);
        }
        if let Some(group) = group {
            self.groups[group.index() as usize].members.push(id);
        }
        Ok(())
    }

    // --- internals --------------------------------------------------------

    fn slot(&self, id: PropertyId) -> Option<&PropertySlot> {
        self.properties.get(id.index() as usize)?.as_ref()
    }

    fn slot_mut(&mut self, id: PropertyId) -> Option<&mut PropertySlot> {
        self.properties.get_mut(id.index() as usize)?.as_mut()
    }

    fn group_slot(&self, group: GroupId) -> Option<&GroupSlot> {
        self.groups.get(group.index() as usize)
    }

    fn group_slot_mut(&mut self, group: GroupId) -> &mut GroupSlot {
        let count = self.groups.len();
        self.groups.get_mut(group.index() as usize).unwrap_or_else(|| {
            panic!("{group:?} is not a group of this registry ({count} groups)")
        })
    }

    /// Walks from the property's group up to the root, calling listeners.
    fn notify(&mut self, event: PropertyEvent) {
        let Some(Some(slot)) = self.properties.get(event.property().index() as usize) else {
            return;
        };
        let property = &*slot.property;
        let mut group = slot.group;
        while let Some(id) = group {
            let entry = &mut self.groups[id.index() as usize];
            if entry.changes_blocked && matches!(event, PropertyEvent::Changed(_)) {
                break;
            }
            for (_, listener) in &mut entry.listeners {
                listener(&event, property);
            }
            group = entry.parent;
        }
    }
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("properties", &self.len())
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}
