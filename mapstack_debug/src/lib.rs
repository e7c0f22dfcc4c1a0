// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, recording, and JSON export of mapstack registry traces.
//!
//! This crate provides [`TraceSink`](mapstack_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: in-memory recording of owned
//!   [`recorder::RecordedEvent`] values, readable through a
//!   [`recorder::Recording`] handle after the sink was handed to a registry.
//! - [`json::export`]: writes recorded events as a JSON array.

pub mod json;
pub mod pretty;
pub mod recorder;
