// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Namespaced, human-readable identifiers.
//!
//! A [`TextId`] names every property, property group, settings group and
//! settings section. Its `key` is the stable part used for persistence paths;
//! the optional `text` is what a user sees.

use alloc::borrow::Cow;
use core::fmt;
use core::hash::{Hash, Hasher};

/// A namespaced identifier with an optional display text.
///
/// Equality and hashing only consider `namespace` and `key`.
///
/// ```rust
/// use understory_property::TextId;
///
/// let a = TextId::new("Export", "scale").with_text("Scale factor");
/// let b = TextId::new("Export", "scale");
/// assert_eq!(a, b);
/// assert_eq!(a.text(), "Scale factor");
/// assert_eq!(b.text(), "scale");
/// ```
#[derive(Clone)]
pub struct TextId {
    namespace: Cow<'static, str>,
    key: Cow<'static, str>,
    text: Option<Cow<'static, str>>,
}

impl TextId {
    /// Creates an identifier without display text.
    #[must_use]
    pub fn new(
        namespace: impl Into<Cow<'static, str>>,
        key: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            text: None,
        }
    }

    /// Creates an identifier from static strings, usable in `const` items.
    #[must_use]
    pub const fn from_static(namespace: &'static str, key: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            key: Cow::Borrowed(key),
            text: None,
        }
    }

    /// Sets the human-readable text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns the namespace (translation context).
    #[must_use]
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the stable key.
    #[must_use]
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the display text, or the key when none was set.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.key)
    }

    /// Returns `true` if the key is neither empty nor whitespace only.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_key(&self.key)
    }
}

/// Returns `true` if `key` is usable as an identifier key.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

impl PartialEq for TextId {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.key == other.key
    }
}

impl Eq for TextId {}

impl Hash for TextId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.key.hash(state);
    }
}

impl fmt::Debug for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextId({}::{})", self.namespace, self.key)
    }
}

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Produces [`TextId`]s sharing one namespace.
///
/// Components typically declare one context and derive all their ids from it:
///
/// ```rust
/// use understory_property::TextIdContext;
///
/// const GLTF: TextIdContext = TextIdContext::new("IO::GltfWriter");
///
/// let id = GLTF.id("forceExportUV");
/// assert_eq!(id.namespace(), "IO::GltfWriter");
/// assert_eq!(id.key(), "forceExportUV");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextIdContext(&'static str);

impl TextIdContext {
    /// Creates a context for `namespace`.
    #[must_use]
    pub const fn new(namespace: &'static str) -> Self {
        Self(namespace)
    }

    /// Returns the namespace.
    #[must_use]
    pub const fn namespace(self) -> &'static str {
        self.0
    }

    /// Returns the identifier for `key` in this namespace.
    #[must_use]
    pub const fn id(self, key: &'static str) -> TextId {
        TextId::from_static(self.0, key)
    }
}
