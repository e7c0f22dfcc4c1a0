// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Combination resolver.
//!
//! When a layer is added, it may share the physical unit of the layer added
//! immediately before it. Only that single, most recently added layer is
//! consulted: two combinable layers separated by any other addition get
//! separate units.

use crate::layer::{Layer, UnitId};

/// Outcome of resolving a newly added layer against its predecessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combination {
    /// Reuse the predecessor's unit.
    Share(UnitId),
    /// Allocate a fresh unit.
    Allocate,
}

/// Decides whether `candidate` may share the unit of `last_added`.
///
/// Sharing requires that the predecessor still has a unit, that both layers
/// are in the same category, and that the predecessor's variant accepts the
/// candidate (see [`LayerKind::is_combinable`](crate::layer::LayerKind::is_combinable)).
#[must_use]
pub fn resolve(last_added: Option<&Layer>, candidate: &Layer) -> Combination {
    let Some(last) = last_added else {
        return Combination::Allocate;
    };
    match last.unit() {
        Some(unit) if last.category() == candidate.category() && last.is_combinable(candidate) => {
            Combination::Share(unit)
        }
        _ => Combination::Allocate,
    }
}
