// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded events.
//!
//! [`export`] writes events captured by a
//! [`RecorderSink`](super::recorder::RecorderSink) as a JSON array, one
//! object per event, in recording order. Handles are rendered with their
//! `Debug` form (`LayerId(3@gen0)`), which keeps slot and generation visible.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Converts one recorded event into a JSON object.
#[must_use]
pub fn to_value(event: &RecordedEvent) -> Value {
    let args = match event {
        RecordedEvent::LayerAdded {
            layer,
            name,
            category,
        }
        | RecordedEvent::LayerRemoved {
            layer,
            name,
            category,
        } => json!({
            "layer": format!("{layer:?}"),
            "name": name,
            "category": format!("{category:?}"),
        }),
        RecordedEvent::GroupRemoved {
            group,
            name,
            members,
        } => json!({
            "group": format!("{group:?}"),
            "name": name,
            "members": members,
        }),
        RecordedEvent::UnitCreated(e) => json!({
            "unit": format!("{:?}", e.unit),
            "layer": format!("{:?}", e.layer),
            "kind": format!("{:?}", e.kind),
            "combined": e.combined,
        }),
        RecordedEvent::UnitAttached(e) | RecordedEvent::UnitDetached(e) => json!({
            "unit": format!("{:?}", e.unit),
            "z_index": e.z_index,
        }),
        RecordedEvent::ZOrder(e) => json!({ "units": e.units }),
        RecordedEvent::SurfaceRegistered { units } => json!({ "units": units }),
        RecordedEvent::Warning { kind, name, group } => json!({
            "kind": format!("{kind:?}"),
            "name": name,
            "group": group,
        }),
    };
    json!({
        "event": event.label(),
        "args": args,
    })
}

/// Writes `events` as a pretty-printed JSON array.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = events.iter().map(to_value).collect();
    serde_json::to_writer_pretty(&mut *writer, &values).map_err(io::Error::other)?;
    writeln!(writer)
}
