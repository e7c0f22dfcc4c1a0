// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contracts for the rendering side.
//!
//! The registry never renders anything itself. It hands
//! [`RenderUnit`]s to a [`Surface`] supplied by the application (an
//! interactive map widget, a headless tile renderer, a test double) and keeps
//! the surface in sync as units are added, restacked, toggled, or dropped.
//!
//! Until a surface is bound through
//! [`Registry::register_surface`](crate::registry::Registry::register_surface),
//! units are created but not attached; binding attaches everything created so
//! far in stacking order.
//!
//! # Call order
//!
//! For a single unit the surface observes:
//!
//! ```text
//! add_unit ─► (set_z_index | set_visible | update_unit)* ─► remove_unit
//! ```
//!
//! `add_unit` carries the unit's complete state, including its stacking
//! index. Follow-up calls are only issued for units that are attached.

use alloc::boxed::Box;

use crate::layer::UnitId;
use crate::unit::RenderUnit;

/// A rendering surface that physical units attach to.
///
/// Only [`add_unit`](Self::add_unit) and [`remove_unit`](Self::remove_unit)
/// are required; surfaces that re-read unit state on every frame can ignore
/// the incremental notifications.
pub trait Surface {
    /// Attaches a unit.
    fn add_unit(&mut self, id: UnitId, unit: &RenderUnit);

    /// Detaches a unit previously passed to [`add_unit`](Self::add_unit).
    fn remove_unit(&mut self, id: UnitId);

    /// Notifies that an attached overlay unit moved in the stacking order.
    fn set_z_index(&mut self, id: UnitId, z_index: u32) {
        _ = (id, z_index);
    }

    /// Notifies that an attached unit's effective visibility changed.
    fn set_visible(&mut self, id: UnitId, visible: bool) {
        _ = (id, visible);
    }

    /// Notifies that an attached unit's constituent layers or their order
    /// changed.
    fn update_unit(&mut self, id: UnitId, unit: &RenderUnit) {
        _ = (id, unit);
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn add_unit(&mut self, id: UnitId, unit: &RenderUnit) {
        (**self).add_unit(id, unit);
    }

    fn remove_unit(&mut self, id: UnitId) {
        (**self).remove_unit(id);
    }

    fn set_z_index(&mut self, id: UnitId, z_index: u32) {
        (**self).set_z_index(id, z_index);
    }

    fn set_visible(&mut self, id: UnitId, visible: bool) {
        (**self).set_visible(id, visible);
    }

    fn update_unit(&mut self, id: UnitId, unit: &RenderUnit) {
        (**self).update_unit(id, unit);
    }
}

/// Closes open feature popups.
///
/// Invoked whenever an overlay layer's visibility is toggled, so that no
/// popup keeps pointing at a feature that is no longer shown.
pub trait PopupCloser {
    /// Closes every open popup.
    fn close_all(&mut self);
}

impl<F: FnMut()> PopupCloser for F {
    fn close_all(&mut self) {
        self();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{Category, Handle, LayerId};
    use crate::unit::UnitKind;

    #[derive(Default)]
    struct Counting {
        added: usize,
        removed: usize,
    }

    impl Surface for Counting {
        fn add_unit(&mut self, _id: UnitId, _unit: &RenderUnit) {
            self.added += 1;
        }

        fn remove_unit(&mut self, _id: UnitId) {
            self.removed += 1;
        }
    }

    #[test]
    fn boxed_surface_forwards() {
        let mut boxed: Box<Counting> = Box::default();
        let unit = RenderUnit::new(
            UnitKind::Vector,
            Category::Overlay,
            None,
            LayerId::from_raw(0, 0),
            true,
        );
        let id = UnitId::from_raw(0, 0);
        boxed.add_unit(id, &unit);
        boxed.set_z_index(id, 3);
        boxed.remove_unit(id);
        assert_eq!(boxed.added, 1);
        assert_eq!(boxed.removed, 1);
    }

    #[test]
    fn closures_close_popups() {
        let mut calls = 0;
        let mut closer = || calls += 1;
        closer.close_all();
        closer.close_all();
        assert_eq!(calls, 2);
    }
}
