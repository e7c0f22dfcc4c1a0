// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Physical rendering units.
//!
//! A [`RenderUnit`] is what a [`Surface`](crate::surface::Surface) actually
//! draws. Most layers get a unit of their own; combinable layers added back to
//! back share one (see [`combine`](crate::combine)). A unit records its
//! constituent layers in render-parameter order plus a back-reference to the
//! layer most recently attached to it.

use alloc::vec;
use alloc::vec::Vec;

use understory_dirty::{Channel, CycleHandling, DirtyTracker};

use crate::layer::store::Slots;
use crate::layer::{Category, Handle, LayerId, UnitId};

/// The type of physical unit a layer renders through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// A single image per view.
    Image,
    /// Raster tiles.
    Tile,
    /// Vector tiles.
    VectorTile,
    /// Vector features.
    Vector,
    /// Clustered vector features.
    Cluster,
}

/// A physical rendering unit shared by one or more layers.
#[derive(Clone, Debug)]
pub struct RenderUnit {
    kind: UnitKind,
    category: Category,
    cluster_distance: Option<f64>,
    pub(crate) layers: Vec<LayerId>,
    pub(crate) last_layer: LayerId,
    pub(crate) z_index: Option<u32>,
    pub(crate) attached: bool,
    pub(crate) visible: bool,
}

impl RenderUnit {
    pub(crate) fn new(
        kind: UnitKind,
        category: Category,
        cluster_distance: Option<f64>,
        first: LayerId,
        visible: bool,
    ) -> Self {
        Self {
            kind,
            category,
            cluster_distance,
            layers: vec![first],
            last_layer: first,
            z_index: None,
            attached: false,
            visible,
        }
    }

    /// Returns the unit type.
    #[must_use]
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Returns the category of the layers rendered by this unit.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the clustering distance in pixels, for clustered units.
    #[must_use]
    pub fn cluster_distance(&self) -> Option<f64> {
        self.cluster_distance
    }

    /// Returns the constituent layers in render-parameter order.
    ///
    /// For overlay units this follows the overlay order, top first.
    #[must_use]
    pub fn layers(&self) -> &[LayerId] {
        &self.layers
    }

    /// Returns the layer most recently attached to this unit.
    #[must_use]
    pub fn last_layer(&self) -> LayerId {
        self.last_layer
    }

    /// Returns the stacking index, for overlay units.
    #[must_use]
    pub fn z_index(&self) -> Option<u32> {
        self.z_index
    }

    /// Returns whether the unit is currently attached to a surface.
    #[must_use]
    pub fn attached(&self) -> bool {
        self.attached
    }

    /// Returns whether any constituent layer is visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }
}

/// Unit storage plus per-unit dirty tracking.
#[derive(Debug)]
pub(crate) struct UnitStore {
    slots: Slots<UnitId, RenderUnit>,
    dirty: DirtyTracker<u32>,
}

impl Default for UnitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitStore {
    pub(crate) fn new() -> Self {
        Self {
            slots: Slots::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    pub(crate) fn insert(&mut self, unit: RenderUnit) -> UnitId {
        self.slots.insert(unit)
    }

    pub(crate) fn get(&self, id: UnitId) -> Option<&RenderUnit> {
        self.slots.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut RenderUnit> {
        self.slots.get_mut(id)
    }

    /// Drops the unit and any pending dirty state for its slot.
    pub(crate) fn remove(&mut self, id: UnitId) -> Option<RenderUnit> {
        let unit = self.slots.remove(id)?;
        self.dirty.remove_key(id.idx());
        Some(unit)
    }

    pub(crate) fn mark(&mut self, id: UnitId, channel: Channel) {
        if self.slots.contains(id) {
            self.dirty.mark(id.idx(), channel);
        }
    }

    /// Drains `channel` and returns the live units that were marked, in slot
    /// order.
    pub(crate) fn drain(&mut self, channel: Channel) -> Vec<UnitId> {
        let marked: Vec<u32> = self.dirty.drain(channel).deterministic().run().collect();
        marked
            .into_iter()
            .filter_map(|idx| self.slots.id_at(idx))
            .collect()
    }

    /// Discards all pending dirty state.
    pub(crate) fn clear_dirty(&mut self) {
        for channel in [
            crate::dirty::Z_ORDER,
            crate::dirty::MEMBERSHIP,
            crate::dirty::VISIBILITY,
        ] {
            let _ = self.drain(channel);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirty;

    fn layer(idx: u32) -> LayerId {
        LayerId::from_raw(idx, 0)
    }

    fn unit(first: LayerId) -> RenderUnit {
        RenderUnit::new(UnitKind::Tile, Category::Overlay, None, first, true)
    }

    #[test]
    fn new_unit_has_single_constituent() {
        let u = unit(layer(4));
        assert_eq!(u.layers(), &[layer(4)]);
        assert_eq!(u.last_layer(), layer(4));
        assert_eq!(u.z_index(), None);
        assert!(!u.attached());
    }

    #[test]
    fn drain_returns_marked_units_once() {
        let mut store = UnitStore::new();
        let a = store.insert(unit(layer(0)));
        let b = store.insert(unit(layer(1)));
        store.mark(b, dirty::Z_ORDER);
        store.mark(a, dirty::Z_ORDER);
        store.mark(a, dirty::Z_ORDER);

        assert_eq!(store.drain(dirty::Z_ORDER), vec![a, b]);
        assert!(store.drain(dirty::Z_ORDER).is_empty());
    }

    #[test]
    fn channels_are_independent() {
        let mut store = UnitStore::new();
        let a = store.insert(unit(layer(0)));
        store.mark(a, dirty::MEMBERSHIP);

        assert!(store.drain(dirty::Z_ORDER).is_empty());
        assert_eq!(store.drain(dirty::MEMBERSHIP), vec![a]);
    }

    #[test]
    fn removed_unit_is_not_drained() {
        let mut store = UnitStore::new();
        let a = store.insert(unit(layer(0)));
        store.mark(a, dirty::VISIBILITY);
        assert!(store.remove(a).is_some());

        assert!(store.drain(dirty::VISIBILITY).is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn clear_dirty_discards_everything() {
        let mut store = UnitStore::new();
        let a = store.insert(unit(layer(0)));
        store.mark(a, dirty::Z_ORDER);
        store.mark(a, dirty::MEMBERSHIP);
        store.clear_dirty();

        assert!(store.drain(dirty::Z_ORDER).is_empty());
        assert!(store.drain(dirty::MEMBERSHIP).is_empty());
    }
}
