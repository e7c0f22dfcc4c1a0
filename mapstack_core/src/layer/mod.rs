// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer data model.
//!
//! A *layer* is a named, typed unit of renderable map data. Each layer has:
//!
//! - An identity ([`LayerId`]): a generational handle issued by the
//!   [`Registry`](crate::registry::Registry) that becomes stale when the layer
//!   is removed, so a removed layer can never be confused with a newer one.
//! - A variant ([`LayerKind`]) that answers the capability questions the
//!   registry asks: can it share a unit, is it clustered, which unit type
//!   renders it.
//! - A [`Category`]: background, overlay, or system.
//! - Registry-owned state: visibility, the `combined` flag, and the
//!   [`UnitId`] of its physical unit.
//!
//! A [`Group`] is an ordered, named collection of overlay layers addressed by
//! a [`GroupId`]. Groups hold membership; layers do not point back at their
//! group.

mod group;
mod id;
mod kind;
mod model;
pub(crate) mod store;

pub use group::Group;
pub(crate) use id::Handle;
pub use id::{GroupId, LayerId, UnitId};
pub use kind::{GeoJsonSource, LayerKind, SensorSource, VectorTileSource, WmsSource, WmtsSource};
pub use model::{Category, Layer};
