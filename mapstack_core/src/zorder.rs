// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order calculation over overlay units.
//!
//! The overlay list is ordered top first. Stacking indices are assigned from
//! the bottom: the list is walked in reverse, groups are expanded in reverse
//! member order, and every unit gets the next index the first time it is
//! seen. A unit shared by several layers therefore advances the index once.
//! Indices are dense and start at zero.

use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::layer::{GroupId, LayerId, UnitId};

/// An entry of the overlay list: a standalone layer or a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayEntry {
    /// A layer not belonging to any group.
    Layer(LayerId),
    /// A group of layers.
    Group(GroupId),
}

impl From<LayerId> for OverlayEntry {
    fn from(id: LayerId) -> Self {
        Self::Layer(id)
    }
}

impl From<GroupId> for OverlayEntry {
    fn from(id: GroupId) -> Self {
        Self::Group(id)
    }
}

/// Read access to the data the calculator needs.
pub trait StackingSource {
    /// Returns the unit a layer renders through, if it has one.
    fn unit_of(&self, layer: LayerId) -> Option<UnitId>;

    /// Returns a group's members, top first.
    fn members_of(&self, group: GroupId) -> &[LayerId];
}

/// Stacking indices for overlay units, bottom first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZOrder {
    assignments: Vec<(UnitId, u32)>,
}

impl ZOrder {
    /// Returns the stacking index of `unit`, if it is an overlay unit.
    #[must_use]
    pub fn get(&self, unit: UnitId) -> Option<u32> {
        self.assignments
            .iter()
            .find_map(|&(u, z)| (u == unit).then_some(z))
    }

    /// Returns the number of distinct units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns whether no unit was assigned an index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterates `(unit, index)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitId, u32)> + '_ {
        self.assignments.iter().copied()
    }
}

/// Calls `f` for every overlay layer in bottom-to-top order.
pub(crate) fn for_each_bottom_up(
    overlay: &[OverlayEntry],
    src: &impl StackingSource,
    mut f: impl FnMut(LayerId),
) {
    for entry in overlay.iter().rev() {
        match *entry {
            OverlayEntry::Layer(layer) => f(layer),
            OverlayEntry::Group(group) => {
                for &layer in src.members_of(group).iter().rev() {
                    f(layer);
                }
            }
        }
    }
}

/// Computes dense stacking indices for the units of `overlay`.
#[must_use]
pub fn compute(overlay: &[OverlayEntry], src: &impl StackingSource) -> ZOrder {
    let mut seen = HashSet::new();
    let mut assignments = Vec::new();
    for_each_bottom_up(overlay, src, |layer| {
        if let Some(unit) = src.unit_of(layer)
            && seen.insert(unit)
        {
            let z = u32::try_from(assignments.len()).unwrap_or(u32::MAX);
            assignments.push((unit, z));
        }
    });
    ZOrder { assignments }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use hashbrown::HashMap;

    use super::*;
    use crate::layer::Handle;

    #[derive(Default)]
    struct Fixture {
        units: HashMap<LayerId, UnitId>,
        groups: HashMap<GroupId, Vec<LayerId>>,
    }

    impl StackingSource for Fixture {
        fn unit_of(&self, layer: LayerId) -> Option<UnitId> {
            self.units.get(&layer).copied()
        }

        fn members_of(&self, group: GroupId) -> &[LayerId] {
            self.groups.get(&group).map_or(&[][..], Vec::as_slice)
        }
    }

    fn l(idx: u32) -> LayerId {
        LayerId::from_raw(idx, 0)
    }

    fn u(idx: u32) -> UnitId {
        UnitId::from_raw(idx, 0)
    }

    fn g(idx: u32) -> GroupId {
        GroupId::from_raw(idx, 0)
    }

    #[test]
    fn empty_overlay_has_no_indices() {
        let z = compute(&[], &Fixture::default());
        assert!(z.is_empty());
    }

    #[test]
    fn last_entry_is_bottom() {
        let mut fx = Fixture::default();
        fx.units.insert(l(0), u(0));
        fx.units.insert(l(1), u(1));
        let z = compute(&[l(0).into(), l(1).into()], &fx);
        assert_eq!(z.get(u(1)), Some(0));
        assert_eq!(z.get(u(0)), Some(1));
    }

    #[test]
    fn groups_expand_in_reverse_member_order() {
        let mut fx = Fixture::default();
        for i in 0..3 {
            fx.units.insert(l(i), u(i));
        }
        fx.groups.insert(g(0), vec![l(1), l(2)]);
        let z = compute(&[l(0).into(), g(0).into()], &fx);
        let order: Vec<_> = z.iter().collect();
        assert_eq!(order, vec![(u(2), 0), (u(1), 1), (u(0), 2)]);
    }

    #[test]
    fn shared_unit_advances_once() {
        let mut fx = Fixture::default();
        fx.units.insert(l(0), u(7));
        fx.units.insert(l(1), u(7));
        fx.units.insert(l(2), u(8));
        fx.groups.insert(g(0), vec![l(0), l(1)]);
        let z = compute(&[l(2).into(), g(0).into()], &fx);
        assert_eq!(z.len(), 2);
        assert_eq!(z.get(u(7)), Some(0));
        assert_eq!(z.get(u(8)), Some(1));
    }

    #[test]
    fn layers_without_units_are_skipped() {
        let mut fx = Fixture::default();
        fx.units.insert(l(1), u(1));
        let z = compute(&[l(0).into(), l(1).into()], &fx);
        assert_eq!(z.len(), 1);
        assert_eq!(z.get(u(1)), Some(0));
    }

    #[test]
    fn compute_is_deterministic() {
        let mut fx = Fixture::default();
        for i in 0..5 {
            fx.units.insert(l(i), u(i % 3));
        }
        fx.groups.insert(g(0), vec![l(3), l(4)]);
        let overlay: [OverlayEntry; 4] = [l(0).into(), g(0).into(), l(1).into(), l(2).into()];
        assert_eq!(compute(&overlay, &fx), compute(&overlay, &fx));
    }
}
