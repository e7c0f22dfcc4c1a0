// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The registry uses multi-channel dirty tracking (via [`understory_dirty`])
//! keyed by render-unit slot to push incremental updates to a bound
//! [`Surface`](crate::surface::Surface). Each channel represents an
//! independent category of change. All channels are local-only: a unit's
//! stacking index or membership never depends on another unit's.
//!
//! # Consumption
//!
//! Callers never need to query dirty state directly. Every mutating
//! [`Registry`](crate::registry::Registry) operation drains the channels at
//! the end of the call and forwards them as
//! [`set_z_index`](crate::surface::Surface::set_z_index),
//! [`set_visible`](crate::surface::Surface::set_visible), and
//! [`update_unit`](crate::surface::Surface::update_unit) calls. Only
//! attached units are marked. Binding a surface clears all channels, since
//! [`add_unit`](crate::surface::Surface::add_unit) already carries the
//! unit's full state.

use understory_dirty::Channel;

/// Stacking index changed.
pub const Z_ORDER: Channel = Channel::new(0);

/// Constituent layers or their order changed.
pub const MEMBERSHIP: Channel = Channel::new(1);

/// Effective visibility changed (any constituent visible).
pub const VISIBILITY: Channel = Channel::new(2);
