// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer registry, combination, and stacking order for interactive maps.
//!
//! `mapstack_core` decides which map layers exist, how they are grouped, in
//! which order they stack, and which logical layers share one physical
//! rendering unit. Rendering itself is left to a [`Surface`](surface::Surface)
//! implementation supplied by the application.
//!
//! # Architecture
//!
//! ```text
//!   LayerConfig ──► LayerFactory ──► Layer ──► Registry::create_layer()
//!                                                   │
//!                 ┌─────────────────────────────────┘
//!                 ▼
//!   Registry::add_overlay_layer() ──► combine::resolve() ──► RenderUnit
//!                 │
//!                 ▼
//!   zorder::compute() ──► dirty channels ──► Surface::{add_unit, set_z_index, ..}
//! ```
//!
//! **[`layer`]**: Layers, groups, variant capabilities, and generational
//! handles.
//!
//! **[`unit`]**: Physical rendering units shared by combined layers.
//!
//! **[`combine`]**: Decides whether a new layer may reuse the most recently
//! added layer's unit.
//!
//! **[`zorder`]**: Dense stacking indices over overlay units.
//!
//! **[`registry`]**: The [`Registry`](registry::Registry) engine that owns
//! all of the above.
//!
//! **[`surface`]**: The [`Surface`](surface::Surface) and
//! [`PopupCloser`](surface::PopupCloser) collaborator contracts.
//!
//! **[`config`]**: Configuration records and the
//! [`LayerFactory`](config::LayerFactory) that turns them into layers.
//!
//! **[`dirty`]**: Dirty channels for incremental surface updates.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! registry instrumentation.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod combine;
pub mod config;
pub mod dirty;
pub mod layer;
pub mod registry;
pub mod surface;
pub mod trace;
pub mod unit;
pub mod zorder;
