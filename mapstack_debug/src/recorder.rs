// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and stores every event as an
//! owned [`RecordedEvent`]. A registry takes ownership of its sink, so the
//! events are read back through a [`Recording`] handle obtained before the
//! sink is handed over.

use std::cell::RefCell;
use std::rc::Rc;

use mapstack_core::layer::{Category, GroupId, LayerId};
use mapstack_core::trace::{
    AttachEvent, GroupEvent, LayerEvent, TraceSink, UnitEvent, WarningEvent, WarningKind,
    ZOrderEvent,
};

// ---------------------------------------------------------------------------
// RecordedEvent
// ---------------------------------------------------------------------------

/// An owned copy of one trace event.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A layer was added to a category list.
    LayerAdded {
        /// The layer.
        layer: LayerId,
        /// Its name, if any.
        name: Option<String>,
        /// The list it was added to.
        category: Category,
    },
    /// A layer was removed.
    LayerRemoved {
        /// The layer.
        layer: LayerId,
        /// Its name, if any.
        name: Option<String>,
        /// The list it was removed from.
        category: Category,
    },
    /// A group was removed.
    GroupRemoved {
        /// The group.
        group: GroupId,
        /// Its name.
        name: String,
        /// Number of members at removal time.
        members: usize,
    },
    /// A layer was assigned a unit.
    UnitCreated(UnitEvent),
    /// A unit was attached to the surface.
    UnitAttached(AttachEvent),
    /// A unit was detached from the surface.
    UnitDetached(AttachEvent),
    /// Stacking indices were recomputed.
    ZOrder(ZOrderEvent),
    /// A surface was bound.
    SurfaceRegistered {
        /// Units attached by the bind.
        units: usize,
    },
    /// A recoverable problem.
    Warning {
        /// What went wrong.
        kind: WarningKind,
        /// The offending name, if any.
        name: Option<String>,
        /// The group involved, if any.
        group: Option<String>,
    },
}

impl RecordedEvent {
    /// Returns a short, stable name for the event type.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::LayerAdded { .. } => "LayerAdded",
            Self::LayerRemoved { .. } => "LayerRemoved",
            Self::GroupRemoved { .. } => "GroupRemoved",
            Self::UnitCreated(_) => "UnitCreated",
            Self::UnitAttached(_) => "UnitAttached",
            Self::UnitDetached(_) => "UnitDetached",
            Self::ZOrder(_) => "ZOrder",
            Self::SurfaceRegistered { .. } => "SurfaceRegistered",
            Self::Warning { .. } => "Warning",
        }
    }
}

// ---------------------------------------------------------------------------
// Recording handle
// ---------------------------------------------------------------------------

/// A shared view of the events captured by a [`RecorderSink`].
#[derive(Clone, Debug, Default)]
pub struct Recording {
    events: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl Recording {
    /// Returns a copy of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    /// Returns the number of events recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Removes and returns the events recorded so far.
    pub fn take(&self) -> Vec<RecordedEvent> {
        core::mem::take(&mut *self.events.borrow_mut())
    }
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    recording: Recording,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the recorded events.
    #[must_use]
    pub fn recording(&self) -> Recording {
        self.recording.clone()
    }

    fn push(&self, event: RecordedEvent) {
        self.recording.events.borrow_mut().push(event);
    }
}

impl TraceSink for RecorderSink {
    fn on_layer_added(&mut self, e: &LayerEvent<'_>) {
        self.push(RecordedEvent::LayerAdded {
            layer: e.layer,
            name: e.name.map(str::to_owned),
            category: e.category,
        });
    }

    fn on_layer_removed(&mut self, e: &LayerEvent<'_>) {
        self.push(RecordedEvent::LayerRemoved {
            layer: e.layer,
            name: e.name.map(str::to_owned),
            category: e.category,
        });
    }

    fn on_group_removed(&mut self, e: &GroupEvent<'_>) {
        self.push(RecordedEvent::GroupRemoved {
            group: e.group,
            name: e.name.to_owned(),
            members: e.members,
        });
    }

    fn on_unit_created(&mut self, e: &UnitEvent) {
        self.push(RecordedEvent::UnitCreated(*e));
    }

    fn on_unit_attached(&mut self, e: &AttachEvent) {
        self.push(RecordedEvent::UnitAttached(*e));
    }

    fn on_unit_detached(&mut self, e: &AttachEvent) {
        self.push(RecordedEvent::UnitDetached(*e));
    }

    fn on_z_order(&mut self, e: &ZOrderEvent) {
        self.push(RecordedEvent::ZOrder(*e));
    }

    fn on_surface_registered(&mut self, units: usize) {
        self.push(RecordedEvent::SurfaceRegistered { units });
    }

    fn on_warning(&mut self, e: &WarningEvent<'_>) {
        self.push(RecordedEvent::Warning {
            kind: e.kind,
            name: e.name.map(str::to_owned),
            group: e.group.map(str::to_owned),
        });
    }
}

#[cfg(test)]
mod tests {
    use mapstack_core::layer::{GeoJsonSource, Group, Layer, LayerKind};
    use mapstack_core::registry::{LayerOrder, Registry};

    use super::*;

    fn vector(name: &str) -> Layer {
        Layer::new(LayerKind::StaticGeoJson(GeoJsonSource::default())).with_name(name)
    }

    #[test]
    fn registry_events_are_recorded_in_order() {
        let sink = RecorderSink::new();
        let recording = sink.recording();
        let mut reg: Registry = Registry::new();
        assert!(reg.set_trace_sink(Box::new(sink)).is_none());

        let a = reg.create_layer(vector("a"));
        reg.add_overlay_layer(a, None);
        let labels: Vec<_> = recording.take().iter().map(RecordedEvent::label).collect();
        assert_eq!(labels, ["UnitCreated", "LayerAdded", "ZOrder"]);

        reg.remove_overlay_layer(a);
        let events = recording.take();
        assert!(events.contains(&RecordedEvent::LayerRemoved {
            layer: a,
            name: Some("a".into()),
            category: Category::Overlay,
        }));
    }

    #[test]
    fn unknown_names_become_warnings() {
        let sink = RecorderSink::new();
        let recording = sink.recording();
        let mut reg: Registry = Registry::new();
        reg.set_trace_sink(Box::new(sink));

        let b = reg.create_layer(vector("b"));
        let g = reg.create_group(Group::new("g").with_layers([b]));
        reg.add_overlay_layer(g, None);
        recording.take();

        reg.set_layer_order(&[
            LayerOrder::new("ghost"),
            LayerOrder::new("g").with_layers(["nope"]),
        ]);
        let warnings: Vec<_> = recording
            .events()
            .into_iter()
            .filter(|e| matches!(e, RecordedEvent::Warning { .. }))
            .collect();
        assert_eq!(
            warnings,
            [
                RecordedEvent::Warning {
                    kind: WarningKind::UnknownOrderEntry,
                    name: Some("ghost".into()),
                    group: None,
                },
                RecordedEvent::Warning {
                    kind: WarningKind::UnknownGroupMember,
                    name: Some("nope".into()),
                    group: Some("g".into()),
                },
            ]
        );
    }
}
