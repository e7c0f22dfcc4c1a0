// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay reordering and stacking.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use serde::Deserialize;

use crate::dirty;
use crate::layer::{GroupId, Layer, LayerId, UnitId};
use crate::surface::Surface;
use crate::trace::{WarningEvent, WarningKind, ZOrderEvent};
use crate::zorder::{self, OverlayEntry, StackingSource};

use super::Registry;

/// The desired position of one overlay entry.
///
/// A list of these, top first, is accepted by
/// [`Registry::set_layer_order`] and produced by
/// [`Registry::overlay_layer_order`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LayerOrder {
    /// Name of the overlay layer or group.
    pub name: String,
    /// For groups, the desired member order by name. Empty leaves members
    /// untouched.
    #[serde(default)]
    pub layers: Vec<String>,
}

impl LayerOrder {
    /// Creates an entry for a standalone layer or an untouched group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
        }
    }

    /// Sets the desired member order.
    #[must_use]
    pub fn with_layers<I, T>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.layers = layers.into_iter().map(Into::into).collect();
        self
    }
}

/// Names a reorder request could not place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReorderReport {
    /// Overlay entries that do not exist.
    pub skipped: Vec<String>,
    /// `(group, member)` pairs naming members that do not exist.
    pub skipped_members: Vec<(String, String)>,
}

impl ReorderReport {
    /// Returns whether every name was placed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.skipped_members.is_empty()
    }
}

impl<S: Surface> Registry<S> {
    /// Reorders overlay entries and group members by name.
    ///
    /// Entries are moved one by one to their position in `order`. Unknown
    /// names are skipped with a warning, and each skip shifts the target
    /// position of later entries up by one, so the remaining entries keep
    /// their requested relative order. Entries not mentioned keep their
    /// relative order after the moved ones.
    pub fn set_layer_order(&mut self, order: &[LayerOrder]) -> ReorderReport {
        let mut report = ReorderReport::default();
        let mut skipped = 0;

        for (new_index, request) in order.iter().enumerate() {
            let Some(old_index) = self
                .overlay_layers
                .iter()
                .position(|&e| self.entry_name(e) == Some(request.name.as_str()))
            else {
                self.tracer.warning(&WarningEvent {
                    kind: WarningKind::UnknownOrderEntry,
                    name: Some(request.name.as_str()),
                    group: None,
                });
                report.skipped.push(request.name.clone());
                skipped += 1;
                continue;
            };
            let entry = self.overlay_layers[old_index];
            move_item(&mut self.overlay_layers, old_index, new_index - skipped);

            if let OverlayEntry::Group(g) = entry {
                self.reorder_members(g, request, &mut report);
            }
        }

        self.sync_unit_order();
        self.restack();
        report
    }

    /// Returns the current overlay order in the shape accepted by
    /// [`set_layer_order`](Self::set_layer_order).
    ///
    /// Anonymous layers are reported with an empty name.
    #[must_use]
    pub fn overlay_layer_order(&self) -> Vec<LayerOrder> {
        self.overlay_layers
            .iter()
            .map(|&entry| {
                let name = self.entry_name(entry).unwrap_or_default();
                let layers = match entry {
                    OverlayEntry::Group(g) => self
                        .members_of(g)
                        .iter()
                        .map(|&id| self.layer_name(id).unwrap_or_default().to_owned())
                        .collect(),
                    OverlayEntry::Layer(_) => Vec::new(),
                };
                LayerOrder {
                    name: name.to_owned(),
                    layers,
                }
            })
            .collect()
    }

    fn reorder_members(&mut self, g: GroupId, request: &LayerOrder, report: &mut ReorderReport) {
        let mut skipped = 0;
        for (new_index, member) in request.layers.iter().enumerate() {
            let old_index = self
                .members_of(g)
                .iter()
                .position(|&id| self.layer_name(id) == Some(member.as_str()));
            let Some(old_index) = old_index else {
                self.tracer.warning(&WarningEvent {
                    kind: WarningKind::UnknownGroupMember,
                    name: Some(member.as_str()),
                    group: Some(request.name.as_str()),
                });
                report
                    .skipped_members
                    .push((request.name.clone(), member.clone()));
                skipped += 1;
                continue;
            };
            if let Some(group) = self.groups.get_mut(g) {
                move_item(&mut group.layers, old_index, new_index - skipped);
            }
        }
    }

    /// Brings the constituent order of every shared overlay unit in line
    /// with the flattened overlay order, top first.
    ///
    /// Units whose order is already correct are left alone, so repeating an
    /// identical reorder sends nothing to the surface.
    pub(super) fn sync_unit_order(&mut self) {
        let mut orders: Vec<(UnitId, Vec<LayerId>)> = Vec::new();
        for id in self.flatted_layers() {
            let Some(unit) = self.layers.get(id).and_then(Layer::unit) else {
                continue;
            };
            match orders.iter_mut().find(|(u, _)| *u == unit) {
                Some((_, order)) => order.push(id),
                None => orders.push((unit, vec![id])),
            }
        }

        for (id, mut order) in orders {
            let Some(unit) = self.units.get_mut(id) else {
                continue;
            };
            if unit.layers.len() < 2 {
                continue;
            }
            let missing: Vec<LayerId> = unit
                .layers
                .iter()
                .copied()
                .filter(|l| !order.contains(l))
                .collect();
            order.extend(missing);
            if order == unit.layers {
                continue;
            }
            unit.layers = order;
            let attached = unit.attached;
            if attached {
                self.units.mark(id, dirty::MEMBERSHIP);
            }
        }
    }

    /// Recomputes stacking and pushes pending changes to the surface.
    pub(super) fn restack(&mut self) {
        self.apply_z_order();
        self.flush_surface();
    }

    /// Writes fresh stacking indices onto overlay units.
    pub(super) fn apply_z_order(&mut self) {
        let z = zorder::compute(&self.overlay_layers, &*self);
        for (id, index) in z.iter() {
            if let Some(unit) = self.units.get_mut(id)
                && unit.z_index != Some(index)
            {
                unit.z_index = Some(index);
                let attached = unit.attached;
                if attached {
                    self.units.mark(id, dirty::Z_ORDER);
                }
            }
        }
        self.tracer.z_order(&ZOrderEvent { units: z.len() });
    }

    fn entry_name(&self, entry: OverlayEntry) -> Option<&str> {
        match entry {
            OverlayEntry::Layer(id) => self.layer_name(id),
            OverlayEntry::Group(g) => self.groups.get(g).map(|g| g.name()),
        }
    }

    fn layer_name(&self, id: LayerId) -> Option<&str> {
        self.layers.get(id).and_then(|l| l.name())
    }
}

/// Moves `items[from]` to `to`, clamping `to` to the valid range.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}
