// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer registry engine.
//!
//! A [`Registry`] owns every [`Layer`], [`Group`], and [`RenderUnit`] of one
//! map. Layers are partitioned into three ordered lists:
//!
//! - **background**: base maps, exactly one visible at a time;
//! - **overlay**: user content, each entry a standalone layer or a group,
//!   first entry on top;
//! - **system**: engine-internal layers.
//!
//! Every add operation assigns the layer a physical unit (possibly shared, see
//! [`combine`](crate::combine)), runs the add handlers, recomputes overlay
//! stacking, and attaches the unit to the bound [`Surface`]. Without a
//! surface, attachment is deferred to [`Registry::register_surface`].
//!
//! # Names
//!
//! Layer and group names are indexed for lookup. Adding a second layer under
//! an existing name silently redirects the index to the newer layer; removing
//! either layer only clears the index entry if it still points at the removed
//! one. Applications that rely on name lookup should keep names unique.
//!
//! # Handlers
//!
//! Add and remove handlers run synchronously inside the triggering operation,
//! in registration order. They receive `&Layer` only and cannot reach the
//! registry, so they cannot mutate it while it is mid-operation. A panicking
//! handler unwinds through the operation.

mod add;
mod init;
mod order;
mod remove;

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use kurbo::Rect;

use crate::config::RegistryConfig;
use crate::dirty;
use crate::layer::store::Slots;
use crate::layer::{Category, Group, GroupId, Layer, LayerId, UnitId};
use crate::surface::{PopupCloser, Surface};
use crate::trace::{TraceSink, Tracer};
use crate::unit::{RenderUnit, UnitStore};
use crate::zorder::{self, OverlayEntry, StackingSource, ZOrder};

pub use init::Loaded;
pub use order::{LayerOrder, ReorderReport};

type LayerHandler = Box<dyn FnMut(&Layer)>;

/// Owns all layers, groups, and render units of one map.
///
/// `S` is the rendering surface type; it defaults to a boxed trait object so
/// that applications can swap surface implementations at runtime.
pub struct Registry<S: Surface = Box<dyn Surface>> {
    config: RegistryConfig,

    // -- Storage --
    layers: Slots<LayerId, Layer>,
    groups: Slots<GroupId, Group>,
    units: UnitStore,

    // -- Category lists --
    background_layers: Vec<LayerId>,
    overlay_layers: Vec<OverlayEntry>,
    system_layers: Vec<LayerId>,
    deleted_overlay_layers: Vec<String>,

    // -- Indices --
    name_layers: HashMap<String, LayerId>,
    name_groups: HashMap<String, GroupId>,

    // -- Attachment --
    attached_units: Vec<UnitId>,
    added_layers: Vec<LayerId>,
    surface: Option<S>,

    // -- Collaborators --
    popups: Option<Box<dyn PopupCloser>>,
    add_handlers: Vec<LayerHandler>,
    remove_handlers: Vec<LayerHandler>,
    tracer: Tracer,
}

impl<S: Surface> core::fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("background_layers", &self.background_layers)
            .field("overlay_layers", &self.overlay_layers)
            .field("system_layers", &self.system_layers)
            .field("units", &self.units.len())
            .field("attached_units", &self.attached_units)
            .field("surface_bound", &self.surface.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: Surface> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface> StackingSource for Registry<S> {
    fn unit_of(&self, layer: LayerId) -> Option<UnitId> {
        self.layers.get(layer).and_then(Layer::unit)
    }

    fn members_of(&self, group: GroupId) -> &[LayerId] {
        self.groups.get(group).map_or(&[][..], Group::layers)
    }
}

impl<S: Surface> Registry<S> {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            layers: Slots::new(),
            groups: Slots::new(),
            units: UnitStore::new(),
            background_layers: Vec::new(),
            overlay_layers: Vec::new(),
            system_layers: Vec::new(),
            deleted_overlay_layers: Vec::new(),
            name_layers: HashMap::new(),
            name_groups: HashMap::new(),
            attached_units: Vec::new(),
            added_layers: Vec::new(),
            surface: None,
            popups: None,
            add_handlers: Vec::new(),
            remove_handlers: Vec::new(),
            tracer: Tracer::none(),
        }
    }

    // -- Collaborators --

    /// Installs a trace sink, returning the previous one.
    ///
    /// Events are only delivered when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) -> Option<Box<dyn TraceSink>> {
        let previous = self.tracer.take();
        self.tracer = Tracer::new(sink);
        previous
    }

    /// Installs the popup closer notified on overlay visibility changes.
    pub fn set_popup_closer(&mut self, closer: impl PopupCloser + 'static) {
        self.popups = Some(Box::new(closer));
    }

    /// Registers a handler called with every layer after it was added.
    pub fn register_add_layer_handler(&mut self, handler: impl FnMut(&Layer) + 'static) {
        self.add_handlers.push(Box::new(handler));
    }

    /// Registers a handler called with every layer as it is removed.
    pub fn register_remove_layer_handler(&mut self, handler: impl FnMut(&Layer) + 'static) {
        self.remove_handlers.push(Box::new(handler));
    }

    /// Returns the bound surface, if any.
    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Returns the bound surface mutably, if any.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    // -- Configuration --

    /// Returns the registry configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Sets the cluster distance applied to units created from now on.
    pub fn set_cluster_distance(&mut self, distance: f64) {
        self.config.cluster_distance = distance;
    }

    // -- Entity access --

    /// Returns the layer, or `None` if the handle is stale.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id)
    }

    /// Returns the group, or `None` if the handle is stale.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Returns the render unit, or `None` if it was dropped.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&RenderUnit> {
        self.units.get(id)
    }

    /// Looks up a layer by name.
    ///
    /// The index covers every registered layer, background and system layers
    /// included, so the result may be missing from [`layers`](Self::layers)
    /// and [`flatted_layers`](Self::flatted_layers). Use
    /// [`system_layer_by_name`](Self::system_layer_by_name) to search system
    /// layers only.
    #[must_use]
    pub fn layer_by_name(&self, name: &str) -> Option<LayerId> {
        self.name_layers.get(name).copied()
    }

    /// Looks up an overlay group by name.
    #[must_use]
    pub fn group_by_name(&self, name: &str) -> Option<GroupId> {
        self.name_groups.get(name).copied()
    }

    /// Returns the last system layer with the given name.
    #[must_use]
    pub fn system_layer_by_name(&self, name: &str) -> Option<LayerId> {
        self.system_layers
            .iter()
            .rev()
            .copied()
            .find(|&id| self.layers.get(id).and_then(Layer::name) == Some(name))
    }

    // -- Lists --

    /// Returns the background layers in insertion order.
    #[must_use]
    pub fn background_layers(&self) -> &[LayerId] {
        &self.background_layers
    }

    /// Returns the overlay entries, top first.
    #[must_use]
    pub fn overlay_layers(&self) -> &[OverlayEntry] {
        &self.overlay_layers
    }

    /// Returns the system layers.
    #[must_use]
    pub fn system_layers(&self) -> &[LayerId] {
        &self.system_layers
    }

    /// Returns the units currently attached to the surface, in attach order.
    #[must_use]
    pub fn attached_units(&self) -> &[UnitId] {
        &self.attached_units
    }

    /// Returns the layers that were assigned a unit, oldest first.
    #[must_use]
    pub fn added_layers(&self) -> &[LayerId] {
        &self.added_layers
    }

    /// Returns background layers followed by overlay entries.
    #[must_use]
    pub fn layers(&self) -> Vec<OverlayEntry> {
        self.background_layers
            .iter()
            .copied()
            .map(OverlayEntry::Layer)
            .chain(self.overlay_layers.iter().copied())
            .collect()
    }

    /// Returns all overlay layers with groups expanded into their members.
    #[must_use]
    pub fn flatted_layers(&self) -> Vec<LayerId> {
        let mut out = Vec::new();
        for entry in &self.overlay_layers {
            match *entry {
                OverlayEntry::Layer(id) => out.push(id),
                OverlayEntry::Group(g) => out.extend_from_slice(self.members_of(g)),
            }
        }
        out
    }

    /// Returns the names of overlay layers and groups removed since the last
    /// [`reset_deleted_overlay_layers`](Self::reset_deleted_overlay_layers).
    #[must_use]
    pub fn deleted_overlay_layers(&self) -> &[String] {
        &self.deleted_overlay_layers
    }

    /// Clears the removal log.
    pub fn reset_deleted_overlay_layers(&mut self) {
        self.deleted_overlay_layers.clear();
    }

    // -- Queries --

    /// Returns the visible background layer.
    ///
    /// If several are visible (only possible before the registry settled its
    /// background layers), the last one wins.
    #[must_use]
    pub fn active_background_layer(&self) -> Option<LayerId> {
        self.background_layers
            .iter()
            .rev()
            .copied()
            .find(|&id| self.layers.get(id).is_some_and(Layer::visible))
    }

    /// Returns whether an overlay layer with this name exists and is visible.
    #[must_use]
    pub fn layer_is_active(&self, name: &str) -> bool {
        self.flatted_layers().into_iter().any(|id| {
            self.layers
                .get(id)
                .is_some_and(|l| l.name() == Some(name) && l.visible())
        })
    }

    /// Returns the union of the extents of visible overlay layers.
    #[must_use]
    pub fn overlay_extent(&self) -> Option<Rect> {
        self.flatted_layers()
            .into_iter()
            .filter_map(|id| self.layers.get(id))
            .filter(|l| l.visible())
            .filter_map(Layer::extent)
            .reduce(|a, b| a.union(b))
    }

    /// Computes overlay stacking from the current lists.
    #[must_use]
    pub fn z_order(&self) -> ZOrder {
        zorder::compute(&self.overlay_layers, self)
    }

    // -- Groups --

    /// Marks the named overlay groups as expanded (not collapsed).
    pub fn expand_groups<T: AsRef<str>>(&mut self, names: &[T]) {
        for entry in &self.overlay_layers {
            if let OverlayEntry::Group(g) = *entry
                && let Some(group) = self.groups.get_mut(g)
                && names.iter().any(|n| n.as_ref() == group.name())
            {
                group.collapsed = false;
            }
        }
    }

    /// Returns the names of overlay groups that are not collapsed.
    #[must_use]
    pub fn expanded_groups(&self) -> Vec<String> {
        self.overlay_layers
            .iter()
            .filter_map(|entry| match *entry {
                OverlayEntry::Group(g) => self.groups.get(g),
                OverlayEntry::Layer(_) => None,
            })
            .filter(|g| !g.collapsed())
            .map(|g| g.name().to_owned())
            .collect()
    }

    // -- Visibility --

    /// Shows or hides a layer.
    ///
    /// Toggling a registered overlay layer closes all popups. Returns `false`
    /// if the handle is stale.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> bool {
        let Some(layer) = self.layers.get_mut(id) else {
            return false;
        };
        if layer.visible == visible {
            return true;
        }
        layer.visible = visible;
        let close_popups = layer.registered && layer.category == Category::Overlay;
        let unit = layer.unit;

        if close_popups && let Some(popups) = &mut self.popups {
            popups.close_all();
        }
        if let Some(unit) = unit {
            self.refresh_unit_visibility(unit);
        }
        self.flush_surface();
        true
    }

    /// Makes `id` the only visible background layer.
    ///
    /// Returns `false` if `id` is not a background layer.
    pub fn activate_background_layer(&mut self, id: LayerId) -> bool {
        if !self.background_layers.contains(&id) {
            return false;
        }
        let others: Vec<LayerId> = self
            .background_layers
            .iter()
            .copied()
            .filter(|&b| b != id)
            .collect();
        for other in others {
            self.set_visible(other, false);
        }
        self.set_visible(id, true);
        true
    }

    /// Recomputes a unit's effective visibility from its constituents.
    fn refresh_unit_visibility(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(id) else {
            return;
        };
        let visible = unit
            .layers
            .iter()
            .any(|&l| self.layers.get(l).is_some_and(Layer::visible));
        let attached = unit.attached;
        if let Some(unit) = self.units.get_mut(id)
            && unit.visible != visible
        {
            unit.visible = visible;
            if attached {
                self.units.mark(id, dirty::VISIBILITY);
            }
        }
    }

    // -- Surface sync --

    /// Forwards pending unit changes to the bound surface.
    fn flush_surface(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        for id in self.units.drain(dirty::MEMBERSHIP) {
            if let Some(unit) = self.units.get(id)
                && unit.attached
            {
                surface.update_unit(id, unit);
            }
        }
        for id in self.units.drain(dirty::VISIBILITY) {
            if let Some(unit) = self.units.get(id)
                && unit.attached
            {
                surface.set_visible(id, unit.visible);
            }
        }
        for id in self.units.drain(dirty::Z_ORDER) {
            if let Some(unit) = self.units.get(id)
                && unit.attached
                && let Some(z) = unit.z_index
            {
                surface.set_z_index(id, z);
            }
        }
    }
}
