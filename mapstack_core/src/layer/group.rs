// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Group`] entity.

use alloc::string::String;
use alloc::vec::Vec;

use super::id::LayerId;

/// An ordered, named collection of layers.
///
/// Member order is render order within the group: the first member renders
/// on top. The registry prunes a group as soon as its last member is
/// removed.
#[derive(Clone, Debug)]
pub struct Group {
    name: String,
    title: Option<String>,
    pub(crate) layers: Vec<LayerId>,
    pub(crate) collapsed: bool,
    single_select: bool,
    single_select_group: bool,
    catalog_layer: bool,
}

impl Group {
    /// Creates an empty, collapsed group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            layers: Vec::new(),
            collapsed: true,
            single_select: false,
            single_select_group: false,
            catalog_layer: false,
        }
    }

    /// Sets the member layers, top first.
    #[must_use]
    pub fn with_layers(mut self, layers: impl IntoIterator<Item = LayerId>) -> Self {
        self.layers = layers.into_iter().collect();
        self
    }

    /// Sets the display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the initial collapsed state.
    #[must_use]
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Sets the selection policy flags.
    ///
    /// `single_select` allows one visible member at a time;
    /// `single_select_group` additionally hides other single-select groups
    /// when a member of this one is shown. Both are hints for layer switchers.
    #[must_use]
    pub fn with_selection(mut self, single_select: bool, single_select_group: bool) -> Self {
        self.single_select = single_select;
        self.single_select_group = single_select_group;
        self
    }

    /// Marks the group as sourced from a read-only catalog.
    #[must_use]
    pub fn with_catalog_layer(mut self, catalog_layer: bool) -> Self {
        self.catalog_layer = catalog_layer;
        self
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the member layers, top first.
    #[must_use]
    pub fn layers(&self) -> &[LayerId] {
        &self.layers
    }

    /// Returns whether the group is collapsed in layer switchers.
    #[must_use]
    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    /// Returns whether only one member may be visible at a time.
    #[must_use]
    pub fn single_select(&self) -> bool {
        self.single_select
    }

    /// Returns whether showing a member hides other single-select groups.
    #[must_use]
    pub fn single_select_group(&self) -> bool {
        self.single_select_group
    }

    /// Returns whether the group comes from a read-only catalog.
    #[must_use]
    pub fn catalog_layer(&self) -> bool {
        self.catalog_layer
    }
}
