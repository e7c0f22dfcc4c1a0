// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for registry operations.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Registry`](crate::registry::Registry) calls as layers come and go. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional boxed `TraceSink`. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing. When **on**, each method
//! performs a single `Option` branch before dispatching.
//!
//! Warnings (unknown names in a reorder request, rejected configuration
//! records) are reported through [`TraceSink::on_warning`] regardless of
//! whether the caller also inspects the returned report.

use alloc::boxed::Box;

use crate::layer::{Category, GroupId, LayerId, UnitId};
use crate::unit::UnitKind;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What a [`WarningEvent`] is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A reorder request named an overlay entry that does not exist.
    UnknownOrderEntry,
    /// A reorder request named a group member that does not exist.
    UnknownGroupMember,
    /// A configuration record could not be turned into a layer or group.
    RejectedRecord,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a layer is added to, or removed from, a category list.
#[derive(Clone, Copy, Debug)]
pub struct LayerEvent<'a> {
    /// The layer.
    pub layer: LayerId,
    /// Its name, if any.
    pub name: Option<&'a str>,
    /// The list it was added to or removed from.
    pub category: Category,
}

/// Emitted when a group is removed.
#[derive(Clone, Copy, Debug)]
pub struct GroupEvent<'a> {
    /// The group.
    pub group: GroupId,
    /// Its name.
    pub name: &'a str,
    /// Number of members at removal time.
    pub members: usize,
}

/// Emitted when a layer is assigned a physical unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitEvent {
    /// The unit.
    pub unit: UnitId,
    /// The layer that was assigned.
    pub layer: LayerId,
    /// Unit type.
    pub kind: UnitKind,
    /// Whether an existing unit was reused.
    pub combined: bool,
}

/// Emitted when a unit is attached to, or detached from, the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachEvent {
    /// The unit.
    pub unit: UnitId,
    /// Its stacking index at that time, for overlay units.
    pub z_index: Option<u32>,
}

/// Emitted after stacking indices have been recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZOrderEvent {
    /// Number of distinct overlay units.
    pub units: usize,
}

/// Emitted for recoverable problems.
#[derive(Clone, Copy, Debug)]
pub struct WarningEvent<'a> {
    /// What went wrong.
    pub kind: WarningKind,
    /// The offending name, if any.
    pub name: Option<&'a str>,
    /// The group involved, for member-level warnings.
    pub group: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the registry.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a layer is added to a category list.
    fn on_layer_added(&mut self, e: &LayerEvent<'_>) {
        _ = e;
    }

    /// Called when a layer is removed from the registry.
    fn on_layer_removed(&mut self, e: &LayerEvent<'_>) {
        _ = e;
    }

    /// Called when a group is removed, explicitly or by pruning.
    fn on_group_removed(&mut self, e: &GroupEvent<'_>) {
        _ = e;
    }

    /// Called when a layer is assigned a new or shared unit.
    fn on_unit_created(&mut self, e: &UnitEvent) {
        _ = e;
    }

    /// Called when a unit is attached to the surface.
    fn on_unit_attached(&mut self, e: &AttachEvent) {
        _ = e;
    }

    /// Called when a unit is detached from the surface.
    fn on_unit_detached(&mut self, e: &AttachEvent) {
        _ = e;
    }

    /// Called after stacking indices have been recomputed.
    fn on_z_order(&mut self, e: &ZOrderEvent) {
        _ = e;
    }

    /// Called when a surface is bound; `units` is the number of units
    /// attached by the bind.
    fn on_surface_registered(&mut self, units: usize) {
        _ = units;
    }

    /// Called for recoverable problems.
    fn on_warning(&mut self, e: &WarningEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional boxed [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing and
/// the sink passed to [`new`](Self::new) is dropped immediately.
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::none()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            drop(sink);
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {}
        }
    }

    /// Takes the sink out, leaving the tracer disabled.
    #[inline]
    pub fn take(&mut self) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Emits a layer-added [`LayerEvent`].
    #[inline]
    pub fn layer_added(&mut self, e: &LayerEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_added(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a layer-removed [`LayerEvent`].
    #[inline]
    pub fn layer_removed(&mut self, e: &LayerEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_removed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`GroupEvent`].
    #[inline]
    pub fn group_removed(&mut self, e: &GroupEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_group_removed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`UnitEvent`].
    #[inline]
    pub fn unit_created(&mut self, e: &UnitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unit_created(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an attach [`AttachEvent`].
    #[inline]
    pub fn unit_attached(&mut self, e: &AttachEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unit_attached(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a detach [`AttachEvent`].
    #[inline]
    pub fn unit_detached(&mut self, e: &AttachEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unit_detached(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ZOrderEvent`].
    #[inline]
    pub fn z_order(&mut self, e: &ZOrderEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_z_order(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a surface-registered event.
    #[inline]
    pub fn surface_registered(&mut self, units: usize) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_surface_registered(units);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = units;
        }
    }

    /// Emits a [`WarningEvent`].
    #[inline]
    pub fn warning(&mut self, e: &WarningEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_warning(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Handle;

    fn sample_layer() -> LayerEvent<'static> {
        LayerEvent {
            layer: LayerId::from_raw(2, 0),
            name: Some("parcels"),
            category: Category::Overlay,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_layer_added(&sample_layer());
        sink.on_z_order(&ZOrderEvent { units: 3 });
        sink.on_warning(&WarningEvent {
            kind: WarningKind::UnknownOrderEntry,
            name: Some("missing"),
            group: None,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.layer_added(&sample_layer());
        tracer.surface_registered(4);
        assert!(tracer.take().is_none());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::rc::Rc;
        use alloc::vec::Vec;
        use core::cell::RefCell;

        struct RecordingSink {
            layers: Rc<RefCell<Vec<LayerId>>>,
        }
        impl TraceSink for RecordingSink {
            fn on_layer_added(&mut self, e: &LayerEvent<'_>) {
                self.layers.borrow_mut().push(e.layer);
            }
        }

        let layers = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = Tracer::new(Box::new(RecordingSink {
            layers: Rc::clone(&layers),
        }));
        tracer.layer_added(&sample_layer());
        tracer.layer_removed(&sample_layer());
        assert_eq!(*layers.borrow(), &[LayerId::from_raw(2, 0)]);
    }
}
