// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Layer`] entity.

use alloc::string::String;

use kurbo::Rect;

use super::id::UnitId;
use super::kind::LayerKind;

/// The three mutually exclusive categories a layer belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    /// Base map; exactly one is visible at a time.
    Background,
    /// User content, optionally grouped.
    #[default]
    Overlay,
    /// Engine-internal layers such as marker overlays.
    System,
}

/// A named, typed unit of renderable map data.
///
/// Layers are built by client code or a [`LayerFactory`](crate::config::LayerFactory)
/// and handed to a [`Registry`](crate::registry::Registry), which owns them
/// from then on. Visibility, combination, and unit assignment are only
/// mutated through the registry.
#[derive(Clone, Debug)]
pub struct Layer {
    name: Option<String>,
    title: Option<String>,
    kind: LayerKind,
    pub(crate) category: Category,
    pub(crate) visible: bool,
    pub(crate) combined: bool,
    extent: Option<Rect>,
    catalog_layer: bool,
    display_in_switcher: bool,
    editable: bool,
    saveable: bool,
    pub(crate) unit: Option<UnitId>,
    pub(crate) registered: bool,
}

impl Layer {
    /// Creates an anonymous, invisible overlay layer of the given kind.
    #[must_use]
    pub fn new(kind: LayerKind) -> Self {
        Self {
            name: None,
            title: None,
            kind,
            category: Category::Overlay,
            visible: false,
            combined: false,
            extent: None,
            catalog_layer: false,
            display_in_switcher: true,
            editable: false,
            saveable: false,
            unit: None,
            registered: false,
        }
    }

    /// Sets the lookup name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the initial visibility.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the category used by [`Registry::with_layers`](crate::registry::Registry::with_layers).
    ///
    /// The `add_*_layer` operations overwrite it with the list the layer is
    /// actually added to.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Sets the data extent in map coordinates.
    #[must_use]
    pub fn with_extent(mut self, extent: Rect) -> Self {
        self.extent = Some(extent);
        self
    }

    /// Marks the layer as sourced from a read-only catalog.
    ///
    /// Catalog layers are never recorded in
    /// [`deleted_overlay_layers`](crate::registry::Registry::deleted_overlay_layers).
    #[must_use]
    pub fn with_catalog_layer(mut self, catalog_layer: bool) -> Self {
        self.catalog_layer = catalog_layer;
        self
    }

    /// Sets whether the layer is listed in layer switchers.
    #[must_use]
    pub fn with_display_in_switcher(mut self, display: bool) -> Self {
        self.display_in_switcher = display;
        self
    }

    /// Marks the layer's features as editable and saveable.
    #[must_use]
    pub fn with_editing(mut self, editable: bool, saveable: bool) -> Self {
        self.editable = editable;
        self.saveable = saveable;
        self
    }

    /// Returns the lookup name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the display title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the layer variant.
    #[must_use]
    pub fn kind(&self) -> &LayerKind {
        &self.kind
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns whether the layer is visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Returns whether the layer currently shares its unit with another layer.
    #[must_use]
    pub fn combined(&self) -> bool {
        self.combined
    }

    /// Returns whether features of this layer are clustered.
    #[must_use]
    pub fn is_clustered(&self) -> bool {
        self.kind.is_clustered()
    }

    /// Returns whether `other` may reuse this layer's physical unit.
    #[must_use]
    pub fn is_combinable(&self, other: &Self) -> bool {
        self.kind.is_combinable(&other.kind)
    }

    /// Returns the data extent, if known.
    #[must_use]
    pub fn extent(&self) -> Option<Rect> {
        self.extent
    }

    /// Returns whether the layer comes from a read-only catalog.
    #[must_use]
    pub fn catalog_layer(&self) -> bool {
        self.catalog_layer
    }

    /// Returns whether the layer is listed in layer switchers.
    #[must_use]
    pub fn display_in_switcher(&self) -> bool {
        self.display_in_switcher
    }

    /// Returns whether features may be edited.
    #[must_use]
    pub fn editable(&self) -> bool {
        self.editable
    }

    /// Returns whether edited features may be saved back.
    #[must_use]
    pub fn saveable(&self) -> bool {
        self.saveable
    }

    /// Returns the physical unit this layer renders through, once created.
    #[must_use]
    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }
}
