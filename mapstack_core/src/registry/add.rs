// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer creation, registration, and surface attachment.

use alloc::borrow::ToOwned;
use alloc::vec;
use alloc::vec::Vec;

use crate::combine::{self, Combination};
use crate::dirty;
use crate::layer::{Category, Group, GroupId, Layer, LayerId, UnitId};
use crate::surface::Surface;
use crate::trace::{AttachEvent, LayerEvent, UnitEvent};
use crate::unit::RenderUnit;
use crate::zorder::{self, OverlayEntry};

use super::Registry;

impl<S: Surface> Registry<S> {
    /// Hands a layer to the registry and returns its handle.
    ///
    /// The layer is stored but not yet part of any category list; pass the
    /// handle to one of the `add_*_layer` operations.
    pub fn create_layer(&mut self, mut layer: Layer) -> LayerId {
        layer.unit = None;
        layer.registered = false;
        layer.combined = false;
        self.layers.insert(layer)
    }

    /// Hands a group to the registry and returns its handle.
    ///
    /// Members must be handles returned by [`create_layer`](Self::create_layer)
    /// of this registry.
    pub fn create_group(&mut self, group: Group) -> GroupId {
        self.groups.insert(group)
    }

    /// Adds a background layer at `index` (default: last).
    ///
    /// Returns `false` if the handle is stale or the layer is already
    /// registered.
    pub fn add_background_layer(&mut self, id: LayerId, index: Option<usize>) -> bool {
        if !self.is_addable(id) {
            return false;
        }
        let len = self.background_layers.len();
        self.background_layers.insert(index.unwrap_or(len).min(len), id);
        self.prepare_layer(id, Category::Background);
        self.attach_layer(id);
        self.flush_surface();
        true
    }

    /// Adds an overlay layer or group at `index` (default: 0, the top).
    ///
    /// Indices past the end are clamped. Returns `false` if the entry is
    /// already in the overlay list, if a handle is stale, if any layer
    /// involved is already registered, or if the group has no members.
    pub fn add_overlay_layer(
        &mut self,
        entry: impl Into<OverlayEntry>,
        index: Option<usize>,
    ) -> bool {
        let entry = entry.into();
        if self.overlay_layers.contains(&entry) {
            return false;
        }
        let members: Vec<LayerId> = match entry {
            OverlayEntry::Layer(id) => vec![id],
            OverlayEntry::Group(g) => match self.groups.get(g) {
                Some(group) => group.layers().to_vec(),
                None => return false,
            },
        };
        if members.is_empty() || !members.iter().all(|&id| self.is_addable(id)) {
            return false;
        }
        if has_duplicates(&members) {
            return false;
        }

        let len = self.overlay_layers.len();
        self.overlay_layers.insert(index.unwrap_or(0).min(len), entry);
        if let OverlayEntry::Group(g) = entry
            && let Some(group) = self.groups.get(g)
        {
            self.name_groups.insert(group.name().to_owned(), g);
        }
        for &id in &members {
            self.prepare_layer(id, Category::Overlay);
        }

        self.sync_unit_order();
        self.apply_z_order();
        for &id in members.iter().rev() {
            self.attach_layer(id);
        }
        self.flush_surface();
        true
    }

    /// Adds a system layer at `index` (default: 0).
    ///
    /// Returns `false` if the handle is stale or the layer is already
    /// registered.
    pub fn add_system_layer(&mut self, id: LayerId, index: Option<usize>) -> bool {
        if !self.is_addable(id) {
            return false;
        }
        let len = self.system_layers.len();
        self.system_layers.insert(index.unwrap_or(0).min(len), id);
        self.prepare_layer(id, Category::System);
        self.attach_layer(id);
        self.flush_surface();
        true
    }

    /// Binds a rendering surface and attaches every existing unit to it.
    ///
    /// Background units attach first, then overlay units bottom to top
    /// (groups in reverse member order), then system units. A unit shared by
    /// several layers is attached once.
    ///
    /// Returns the previously bound surface, if any. Units are not removed
    /// from it; the caller owns it again and decides what to do with it.
    pub fn register_surface(&mut self, surface: S) -> Option<S> {
        let previous = self.surface.replace(surface);
        for id in self.attached_units.drain(..) {
            if let Some(unit) = self.units.get_mut(id) {
                unit.attached = false;
            }
        }
        self.units.clear_dirty();

        let mut order = self.background_layers.clone();
        zorder::for_each_bottom_up(&self.overlay_layers, &*self, |id| order.push(id));
        order.extend_from_slice(&self.system_layers);
        for id in order {
            self.attach_layer(id);
        }
        self.tracer.surface_registered(self.attached_units.len());
        previous
    }

    // -- Internals --

    /// Returns whether `id` is live and not yet in any category list.
    pub(super) fn is_addable(&self, id: LayerId) -> bool {
        self.layers.get(id).is_some_and(|l| !l.registered)
    }

    /// Registers a layer in the name index, gives it a unit, and runs the
    /// add handlers.
    fn prepare_layer(&mut self, id: LayerId, category: Category) {
        let Some(layer) = self.layers.get_mut(id) else {
            return;
        };
        layer.category = category;
        layer.registered = true;
        if let Some(name) = layer.name() {
            self.name_layers.insert(name.to_owned(), id);
        }

        self.create_physical_unit(id);
        self.added_layers.push(id);

        if let Some(layer) = self.layers.get(id) {
            for handler in &mut self.add_handlers {
                handler(layer);
            }
            self.tracer.layer_added(&LayerEvent {
                layer: id,
                name: layer.name(),
                category,
            });
        }
    }

    /// Assigns `id` a unit: the most recently added layer's, if the two
    /// combine, otherwise a new one.
    fn create_physical_unit(&mut self, id: LayerId) {
        let last_id = self.added_layers.last().copied();
        let Some(candidate) = self.layers.get(id) else {
            return;
        };
        let last = last_id.and_then(|l| self.layers.get(l));
        let visible = candidate.visible();

        let (unit_id, combined) = match combine::resolve(last, candidate) {
            Combination::Share(unit_id) => {
                let Some(unit) = self.units.get_mut(unit_id) else {
                    return;
                };
                unit.layers.push(id);
                unit.last_layer = id;
                let attached = unit.attached;
                if attached {
                    self.units.mark(unit_id, dirty::MEMBERSHIP);
                }
                if let Some(last) = last_id.and_then(|l| self.layers.get_mut(l)) {
                    last.combined = true;
                }
                (unit_id, true)
            }
            Combination::Allocate => {
                let cluster_distance = candidate
                    .is_clustered()
                    .then_some(self.config.cluster_distance);
                let unit = RenderUnit::new(
                    candidate.kind().unit_kind(),
                    candidate.category(),
                    cluster_distance,
                    id,
                    visible,
                );
                (self.units.insert(unit), false)
            }
        };

        if let Some(layer) = self.layers.get_mut(id) {
            layer.unit = Some(unit_id);
            layer.combined = combined;
        }
        if combined {
            self.refresh_unit_visibility(unit_id);
        }
        if let Some(unit) = self.units.get(unit_id) {
            self.tracer.unit_created(&UnitEvent {
                unit: unit_id,
                layer: id,
                kind: unit.kind(),
                combined,
            });
        }
    }

    /// Attaches the unit of `id` if a surface is bound and the unit is not
    /// attached yet.
    pub(super) fn attach_layer(&mut self, id: LayerId) {
        if let Some(unit) = self.layers.get(id).and_then(Layer::unit) {
            self.attach_unit(unit);
        }
    }

    fn attach_unit(&mut self, id: UnitId) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let Some(unit) = self.units.get_mut(id) else {
            return;
        };
        if unit.attached {
            return;
        }
        unit.attached = true;
        let z_index = unit.z_index;
        self.attached_units.push(id);
        if let Some(unit) = self.units.get(id) {
            surface.add_unit(id, unit);
        }
        self.tracer.unit_attached(&AttachEvent { unit: id, z_index });
    }

    /// Detaches and drops a unit.
    pub(super) fn drop_unit(&mut self, id: UnitId) {
        let Some(unit) = self.units.remove(id) else {
            return;
        };
        if unit.attached {
            self.attached_units.retain(|&u| u != id);
            if let Some(surface) = self.surface.as_mut() {
                surface.remove_unit(id);
            }
            self.tracer.unit_detached(&AttachEvent {
                unit: id,
                z_index: unit.z_index,
            });
        }
    }
}

fn has_duplicates(ids: &[LayerId]) -> bool {
    ids.iter()
        .enumerate()
        .any(|(i, id)| ids[..i].contains(id))
}
