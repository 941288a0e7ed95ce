// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The settings tree: groups, sections and settings.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use understory_property::{
    GroupId, ListenerId, Property, PropertyEvent, PropertyId, PropertyRegistry, TextId,
};

use crate::conversion::{ConversionError, PropertyValueConversion};
use crate::store::KeyValueStore;
use crate::variant::Variant;

/// Identifier of the section every group starts with.
///
/// Settings added straight to a group land there, so their paths read
/// `group/DEFAULT/property`.
pub const DEFAULT_SECTION: TextId = TextId::from_static("Settings", "DEFAULT");

const ROOT_GROUP: TextId = TextId::from_static("Settings", "settings");

/// Position of a group in [`Settings`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupIndex(usize);

impl GroupIndex {
    /// Creates an index from a raw position.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Position of a section within its group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionIndex {
    group: GroupIndex,
    section: usize,
}

impl SectionIndex {
    /// Creates an index from a group and a raw position within it.
    #[must_use]
    pub const fn new(group: GroupIndex, section: usize) -> Self {
        Self { group, section }
    }

    /// Returns the group the section belongs to.
    #[must_use]
    pub const fn group(self) -> GroupIndex {
        self.group
    }

    /// Returns the raw position within the group.
    #[must_use]
    pub const fn get(self) -> usize {
        self.section
    }
}

/// Position of a setting within its section.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SettingIndex {
    section: SectionIndex,
    setting: usize,
}

impl SettingIndex {
    /// Creates an index from a section and a raw position within it.
    #[must_use]
    pub const fn new(section: SectionIndex, setting: usize) -> Self {
        Self { section, setting }
    }

    /// Returns the section the setting belongs to.
    #[must_use]
    pub const fn section(self) -> SectionIndex {
        self.section
    }

    /// Returns the group the setting belongs to.
    #[must_use]
    pub const fn group(self) -> GroupIndex {
        self.section.group
    }

    /// Returns the raw position within the section.
    #[must_use]
    pub const fn get(self) -> usize {
        self.setting
    }
}

/// What a reset function is registered for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResetTarget {
    /// A whole group.
    Group(GroupIndex),
    /// One section.
    Section(SectionIndex),
}

impl ResetTarget {
    /// Returns the group the target lies in.
    #[must_use]
    pub fn group(self) -> GroupIndex {
        match self {
            Self::Group(group) => group,
            Self::Section(section) => section.group(),
        }
    }
}

/// Callback restoring the properties of a group or section.
pub type ResetFunction = Box<dyn FnMut(&mut PropertyRegistry)>;

/// Tally of one load or save pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Settings read or written successfully.
    pub applied: usize,
    /// Settings whose conversion failed; already logged.
    pub failed: usize,
    /// Settings skipped by the exclude predicate.
    pub excluded: usize,
    /// Settings without an entry in the store. Always zero for saves.
    pub missing: usize,
}

impl PassReport {
    /// Returns `true` if no setting failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Exclude predicate keeping every setting.
#[must_use]
pub fn exclude_none(_: &dyn Property) -> bool {
    false
}

#[derive(Debug)]
struct Section {
    identifier: TextId,
    title: Option<String>,
    settings: Vec<PropertyId>,
}

impl Section {
    fn new(identifier: TextId) -> Self {
        Self {
            identifier,
            title: None,
            settings: Vec::new(),
        }
    }

    fn is_default(&self) -> bool {
        self.identifier.key() == DEFAULT_SECTION.key()
    }
}

#[derive(Debug)]
struct Group {
    identifier: TextId,
    title: Option<String>,
    property_group: GroupId,
    sections: Vec<Section>,
}

/// The application settings registry.
///
/// Settings are organized in three levels: groups, sections within groups,
/// and settings within sections. A setting refers to one property of a
/// [`PropertyRegistry`], and is persisted at `group/section/property` using
/// the keys of the three identifiers.
///
/// Each group starts with the [`DEFAULT_SECTION`] at position 0; sections are
/// never removed or reordered, so that section stays first.
///
/// `Settings` also owns a group in the property registry. Properties inserted
/// under [`Settings::property_group`] (or any group nested below the root)
/// are reset by [`restore_defaults`](Self::restore_defaults) and observed by
/// [`subscribe`](Self::subscribe).
///
/// ```rust
/// use understory_property::{PropertyQuantity, PropertyRegistry, TextId};
/// use understory_settings::{MemoryStore, Settings, Variant, exclude_none};
///
/// let mut registry = PropertyRegistry::new();
/// let mut settings = Settings::new(&mut registry);
/// let export = settings.add_group(&mut registry, TextId::new("App", "export"));
/// let size = registry.insert(
///     Some(settings.property_group(export)),
///     PropertyQuantity::length(TextId::new("Export", "size"), 25.4),
/// );
/// settings.add_setting_to_group(size.id(), export);
///
/// let mut store = MemoryStore::new();
/// settings.save_as(&registry, &mut store, exclude_none);
/// assert_eq!(store.iter().count(), 1);
///
/// settings.load_from(
///     &mut registry,
///     &MemoryStore::from_iter([("export/DEFAULT/size".into(), Variant::from("2in"))]),
///     exclude_none,
/// );
/// assert_eq!(registry.value(size), Some(&50.8));
/// ```
pub struct Settings {
    root: GroupId,
    groups: Vec<Group>,
    resets: Vec<(ResetTarget, ResetFunction)>,
    conversion: PropertyValueConversion,
    store: Option<Box<dyn KeyValueStore>>,
}

impl Settings {
    /// Creates empty settings, adding their root group to `registry`.
    pub fn new(registry: &mut PropertyRegistry) -> Self {
        Self {
            root: registry.add_group(ROOT_GROUP, None),
            groups: Vec::new(),
            resets: Vec::new(),
            conversion: PropertyValueConversion::new(),
            store: None,
        }
    }

    /// Returns the registry group all settings groups are nested under.
    #[must_use]
    pub fn root_group(&self) -> GroupId {
        self.root
    }

    // --- structure --------------------------------------------------------

    /// Adds a group, or returns the group that already has this key.
    ///
    /// Groups are matched on the identifier key alone, since the key is what
    /// names them in store paths.
    ///
    /// A new group gets the [`DEFAULT_SECTION`] and a registry group nested
    /// under [`root_group`](Self::root_group).
    ///
    /// # Panics
    ///
    /// Panics if the key of `identifier` is empty or contains `/`.
    pub fn add_group(&mut self, registry: &mut PropertyRegistry, identifier: TextId) -> GroupIndex {
        assert_path_segment(&identifier);
        let existing = self
            .groups
            .iter()
            .position(|g| g.identifier.key() == identifier.key());
        if let Some(pos) = existing {
            return GroupIndex(pos);
        }
        log::debug!("adding settings group '{}'", identifier.key());
        let property_group = registry.add_group(identifier.clone(), Some(self.root));
        self.groups.push(Group {
            identifier,
            title: None,
            property_group,
            sections: alloc::vec![Section::new(DEFAULT_SECTION)],
        });
        GroupIndex(self.groups.len() - 1)
    }

    /// Appends a section to `group`.
    ///
    /// # Panics
    ///
    /// Panics if the key of `identifier` is empty or contains `/`, or if
    /// `group` already has a section with this key. The key of
    /// [`DEFAULT_SECTION`] is always taken.
    pub fn add_section(&mut self, group: GroupIndex, identifier: TextId) -> SectionIndex {
        assert_path_segment(&identifier);
        let sections = &mut self.group_mut(group).sections;
        assert!(
            sections.iter().all(|s| s.identifier.key() != identifier.key()),
            "section '{}' is already defined",
            identifier.key()
        );
        sections.push(Section::new(identifier));
        SectionIndex::new(group, sections.len() - 1)
    }

    /// Registers `property` as a setting of `section`.
    ///
    /// A property is a setting at most once; registering it again returns the
    /// existing index.
    pub fn add_setting(&mut self, property: PropertyId, section: SectionIndex) -> SettingIndex {
        if let Some(existing) = self.find_property(property) {
            log::warn!("{property} is already a setting, keeping {existing:?}");
            return existing;
        }
        let settings = &mut self.section_mut(section).settings;
        settings.push(property);
        SettingIndex::new(section, settings.len() - 1)
    }

    /// Registers `property` in the default section of `group`.
    pub fn add_setting_to_group(&mut self, property: PropertyId, group: GroupIndex) -> SettingIndex {
        let section = SectionIndex::new(group, 0);
        debug_assert!(
            self.section(section).is_default(),
            "first section of a group is the default section"
        );
        self.add_setting(property, section)
    }

    /// Returns where `property` is registered, if it is.
    #[must_use]
    pub fn find_property(&self, property: PropertyId) -> Option<SettingIndex> {
        for (g, group) in self.groups.iter().enumerate() {
            for (s, section) in group.sections.iter().enumerate() {
                if let Some(pos) = section.settings.iter().position(|p| *p == property) {
                    return Some(SettingIndex::new(
                        SectionIndex::new(GroupIndex(g), s),
                        pos,
                    ));
                }
            }
        }
        None
    }

    // --- accessors --------------------------------------------------------

    /// Returns the number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns the number of sections of `group`, the default one included.
    #[must_use]
    pub fn section_count(&self, group: GroupIndex) -> usize {
        self.group(group).sections.len()
    }

    /// Returns the number of settings of `section`.
    #[must_use]
    pub fn setting_count(&self, section: SectionIndex) -> usize {
        self.section(section).settings.len()
    }

    /// Returns the identifier of `group`.
    #[must_use]
    pub fn group_identifier(&self, group: GroupIndex) -> &TextId {
        &self.group(group).identifier
    }

    /// Returns the identifier of `section`.
    #[must_use]
    pub fn section_identifier(&self, section: SectionIndex) -> &TextId {
        &self.section(section).identifier
    }

    /// Returns `true` if `section` is the default section of its group.
    #[must_use]
    pub fn is_default_group_section(&self, section: SectionIndex) -> bool {
        self.section(section).is_default()
    }

    /// Returns the registry group created for `group`.
    #[must_use]
    pub fn property_group(&self, group: GroupIndex) -> GroupId {
        self.group(group).property_group
    }

    /// Returns the display title of `group`: the override if one was set,
    /// the identifier text otherwise.
    #[must_use]
    pub fn group_title(&self, group: GroupIndex) -> &str {
        let group = self.group(group);
        group
            .title
            .as_deref()
            .unwrap_or_else(|| group.identifier.text())
    }

    /// Overrides the display title of `group`.
    pub fn set_group_title(&mut self, group: GroupIndex, title: impl Into<String>) {
        self.group_mut(group).title = Some(title.into());
    }

    /// Returns the display title of `section`.
    #[must_use]
    pub fn section_title(&self, section: SectionIndex) -> &str {
        let section = self.section(section);
        section
            .title
            .as_deref()
            .unwrap_or_else(|| section.identifier.text())
    }

    /// Overrides the display title of `section`.
    pub fn set_section_title(&mut self, section: SectionIndex, title: impl Into<String>) {
        self.section_mut(section).title = Some(title.into());
    }

    /// Returns the property of a setting.
    #[must_use]
    pub fn property(&self, setting: SettingIndex) -> PropertyId {
        let settings = &self.section(setting.section()).settings;
        assert!(
            setting.get() < settings.len(),
            "{setting:?} is not a setting of these settings"
        );
        settings[setting.get()]
    }

    /// Returns the store path of a setting, `None` if its property is gone.
    #[must_use]
    pub fn setting_path(&self, registry: &PropertyRegistry, setting: SettingIndex) -> Option<String> {
        let property = registry.get(self.property(setting))?;
        Some(self.path(setting.section(), property))
    }

    fn path(&self, section: SectionIndex, property: &dyn Property) -> String {
        format!(
            "{}/{}/{}",
            self.group(section.group()).identifier.key(),
            self.section(section).identifier.key(),
            property.name().key()
        )
    }

    // --- conversion and store ---------------------------------------------

    /// Returns the converter used by load and save.
    #[must_use]
    pub fn conversion(&self) -> &PropertyValueConversion {
        &self.conversion
    }

    /// Returns the converter used by load and save, mutably.
    pub fn conversion_mut(&mut self) -> &mut PropertyValueConversion {
        &mut self.conversion
    }

    /// Replaces the converter used by load and save.
    pub fn set_conversion(&mut self, conversion: PropertyValueConversion) {
        self.conversion = conversion;
    }

    /// Sets the store used by [`load`](Self::load) and [`save`](Self::save).
    pub fn set_store(&mut self, store: impl KeyValueStore + 'static) {
        self.store = Some(Box::new(store));
    }

    /// Returns the store used by [`load`](Self::load) and [`save`](Self::save).
    #[must_use]
    pub fn store(&self) -> Option<&dyn KeyValueStore> {
        self.store.as_deref()
    }

    /// Removes and returns the owned store.
    pub fn take_store(&mut self) -> Option<Box<dyn KeyValueStore>> {
        self.store.take()
    }

    /// Reads the entry at `path` in the owned store.
    #[must_use]
    pub fn find_value_from_key(&self, path: &str) -> Option<Variant> {
        self.store.as_ref()?.value(path)
    }

    // --- load and save ----------------------------------------------------

    /// Loads every setting not matched by `exclude` from `store`.
    ///
    /// Failures are logged by the converter and counted; they do not stop the
    /// pass. Settings without an entry keep their value.
    pub fn load_from(
        &self,
        registry: &mut PropertyRegistry,
        store: &dyn KeyValueStore,
        exclude: impl Fn(&dyn Property) -> bool,
    ) -> PassReport {
        let mut report = PassReport::default();
        for (section, id) in self.settings() {
            let path = match registry.get(id) {
                None => {
                    log::warn!("setting {id} refers to a removed property");
                    report.failed += 1;
                    continue;
                }
                Some(property) if exclude(property) => {
                    report.excluded += 1;
                    continue;
                }
                Some(property) => self.path(section, property),
            };
            let Some(variant) = store.value(&path) else {
                log::debug!("no stored value for '{path}'");
                report.missing += 1;
                continue;
            };
            match self.conversion.from_variant(registry, id, &variant) {
                Ok(()) => report.applied += 1,
                Err(_) => report.failed += 1,
            }
        }
        report
    }

    /// Writes every setting not matched by `exclude` to `store`.
    ///
    /// Failures are logged by the converter and counted; they do not stop the
    /// pass. The store is not synced.
    pub fn save_as(
        &self,
        registry: &PropertyRegistry,
        store: &mut dyn KeyValueStore,
        exclude: impl Fn(&dyn Property) -> bool,
    ) -> PassReport {
        let mut report = PassReport::default();
        for (section, id) in self.settings() {
            let Some(property) = registry.get(id) else {
                log::warn!("setting {id} refers to a removed property");
                report.failed += 1;
                continue;
            };
            if exclude(property) {
                report.excluded += 1;
                continue;
            }
            match self.conversion.to_variant(property) {
                Ok(variant) => {
                    store.set_value(&self.path(section, property), variant);
                    report.applied += 1;
                }
                Err(_) => report.failed += 1,
            }
        }
        report
    }

    /// Loads every setting from the owned store.
    pub fn load(&self, registry: &mut PropertyRegistry) -> PassReport {
        match self.store.as_deref() {
            Some(store) => self.load_from(registry, store, exclude_none),
            None => {
                log::warn!("no store to load settings from");
                PassReport::default()
            }
        }
    }

    /// Saves every setting to the owned store, then syncs it.
    pub fn save(&mut self, registry: &PropertyRegistry) -> PassReport {
        let Some(mut store) = self.store.take() else {
            log::warn!("no store to save settings to");
            return PassReport::default();
        };
        let report = self.save_as(registry, &mut *store, exclude_none);
        store.sync();
        self.store = Some(store);
        report
    }

    /// Loads one setting from `store`.
    ///
    /// Returns `Ok(false)` if the store has no entry for it.
    pub fn load_property_from(
        &self,
        registry: &mut PropertyRegistry,
        store: &dyn KeyValueStore,
        setting: SettingIndex,
    ) -> Result<bool, ConversionError> {
        let id = self.property(setting);
        let path = registry
            .get(id)
            .map(|property| self.path(setting.section(), property))
            .ok_or(ConversionError::UnknownProperty(id))?;
        let Some(variant) = store.value(&path) else {
            return Ok(false);
        };
        self.conversion.from_variant(registry, id, &variant)?;
        Ok(true)
    }

    /// Loads one setting from the owned store.
    ///
    /// Returns `Ok(false)` if there is no store or no entry.
    pub fn load_property(
        &self,
        registry: &mut PropertyRegistry,
        setting: SettingIndex,
    ) -> Result<bool, ConversionError> {
        match self.store.as_deref() {
            Some(store) => self.load_property_from(registry, store, setting),
            None => Ok(false),
        }
    }

    fn settings(&self) -> impl Iterator<Item = (SectionIndex, PropertyId)> + '_ {
        self.groups.iter().enumerate().flat_map(|(g, group)| {
            group.sections.iter().enumerate().flat_map(move |(s, section)| {
                let index = SectionIndex::new(GroupIndex(g), s);
                section.settings.iter().map(move |id| (index, *id))
            })
        })
    }

    // --- resets -----------------------------------------------------------

    /// Registers a reset function for `group`.
    pub fn add_reset_function(
        &mut self,
        group: GroupIndex,
        function: impl FnMut(&mut PropertyRegistry) + 'static,
    ) {
        assert!(
            group.get() < self.groups.len(),
            "{group:?} is not a group of these settings"
        );
        self.resets.push((ResetTarget::Group(group), Box::new(function)));
    }

    /// Registers a reset function for `section`.
    pub fn add_section_reset_function(
        &mut self,
        section: SectionIndex,
        function: impl FnMut(&mut PropertyRegistry) + 'static,
    ) {
        assert!(
            section.get() < self.section_count(section.group()),
            "{section:?} is not a section of these settings"
        );
        self.resets
            .push((ResetTarget::Section(section), Box::new(function)));
    }

    /// Runs every reset function, in registration order.
    pub fn reset_all(&mut self, registry: &mut PropertyRegistry) {
        self.run_resets(registry, |_| true);
    }

    /// Runs the reset functions of `group` and of its sections.
    pub fn reset_group(&mut self, registry: &mut PropertyRegistry, group: GroupIndex) {
        self.run_resets(registry, |target| target.group() == group);
    }

    /// Runs the reset functions of `section`.
    pub fn reset_section(&mut self, registry: &mut PropertyRegistry, section: SectionIndex) {
        self.run_resets(registry, |target| target == ResetTarget::Section(section));
    }

    fn run_resets(&mut self, registry: &mut PropertyRegistry, matches: impl Fn(ResetTarget) -> bool) {
        for (target, function) in &mut self.resets {
            if matches(*target) {
                function(registry);
            }
        }
    }

    // --- property tree ----------------------------------------------------

    /// Restores the default of every property under [`root_group`](Self::root_group).
    pub fn restore_defaults(&self, registry: &mut PropertyRegistry) {
        registry.restore_defaults(self.root);
    }

    /// Observes changes of every property under [`root_group`](Self::root_group).
    pub fn subscribe(
        &self,
        registry: &mut PropertyRegistry,
        listener: impl FnMut(&PropertyEvent, &dyn Property) + 'static,
    ) -> ListenerId {
        registry.add_listener(self.root, listener)
    }

    // --- lookup -----------------------------------------------------------

    fn group(&self, group: GroupIndex) -> &Group {
        assert!(
            group.get() < self.groups.len(),
            "{group:?} is not a group of these settings"
        );
        &self.groups[group.get()]
    }

    fn group_mut(&mut self, group: GroupIndex) -> &mut Group {
        assert!(
            group.get() < self.groups.len(),
            "{group:?} is not a group of these settings"
        );
        &mut self.groups[group.get()]
    }

    fn section(&self, section: SectionIndex) -> &Section {
        let sections = &self.group(section.group()).sections;
        assert!(
            section.get() < sections.len(),
            "{section:?} is not a section of these settings"
        );
        &sections[section.get()]
    }

    fn section_mut(&mut self, section: SectionIndex) -> &mut Section {
        let sections = &mut self.group_mut(section.group()).sections;
        assert!(
            section.get() < sections.len(),
            "{section:?} is not a section of these settings"
        );
        &mut sections[section.get()]
    }
}

fn assert_path_segment(identifier: &TextId) {
    assert!(
        identifier.is_valid() && !identifier.key().contains('/'),
        "'{}' is not a valid settings identifier",
        identifier.key()
    );
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("root", &self.root)
            .field("groups", &self.groups)
            .field("resets", &self.resets.len())
            .field("conversion", &self.conversion)
            .field("store", &self.store.is_some())
            .finish()
    }
}
