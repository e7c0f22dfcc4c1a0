// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use mapstack_core::layer::Category;
use mapstack_core::trace::{
    AttachEvent, GroupEvent, LayerEvent, TraceSink, UnitEvent, WarningEvent, WarningKind,
    ZOrderEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn category_name(category: Category) -> &'static str {
    match category {
        Category::Background => "background",
        Category::Overlay => "overlay",
        Category::System => "system",
    }
}

fn warning_name(kind: WarningKind) -> &'static str {
    match kind {
        WarningKind::UnknownOrderEntry => "unknown-entry",
        WarningKind::UnknownGroupMember => "unknown-member",
        WarningKind::RejectedRecord => "rejected-record",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_layer_added(&mut self, e: &LayerEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[layer:add] {:?} name={} list={}",
            e.layer,
            e.name.unwrap_or("-"),
            category_name(e.category),
        );
    }

    fn on_layer_removed(&mut self, e: &LayerEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[layer:remove] {:?} name={} list={}",
            e.layer,
            e.name.unwrap_or("-"),
            category_name(e.category),
        );
    }

    fn on_group_removed(&mut self, e: &GroupEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[group:remove] {:?} name={} members={}",
            e.group, e.name, e.members,
        );
    }

    fn on_unit_created(&mut self, e: &UnitEvent) {
        let how = if e.combined { "shared" } else { "new" };
        let _ = writeln!(
            self.writer,
            "[unit:{how}] {:?} layer={:?} kind={:?}",
            e.unit, e.layer, e.kind,
        );
    }

    fn on_unit_attached(&mut self, e: &AttachEvent) {
        match e.z_index {
            Some(z) => {
                let _ = writeln!(self.writer, "[attach] {:?} z={z}", e.unit);
            }
            None => {
                let _ = writeln!(self.writer, "[attach] {:?}", e.unit);
            }
        }
    }

    fn on_unit_detached(&mut self, e: &AttachEvent) {
        let _ = writeln!(self.writer, "[detach] {:?}", e.unit);
    }

    fn on_z_order(&mut self, e: &ZOrderEvent) {
        let _ = writeln!(self.writer, "[z-order] units={}", e.units);
    }

    fn on_surface_registered(&mut self, units: usize) {
        let _ = writeln!(self.writer, "[surface] attached={units}");
    }

    fn on_warning(&mut self, e: &WarningEvent<'_>) {
        let _ = match e.group {
            Some(group) => writeln!(
                self.writer,
                "[warn:{}] {} in {group}",
                warning_name(e.kind),
                e.name.unwrap_or("-"),
            ),
            None => writeln!(
                self.writer,
                "[warn:{}] {}",
                warning_name(e.kind),
                e.name.unwrap_or("-"),
            ),
        };
    }
}
