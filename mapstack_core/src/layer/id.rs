// Copyright 2026 the Mapstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer, group, and unit identity types.

use core::fmt;

/// Conversion between typed handles and raw `(slot, generation)` pairs.
pub(crate) trait Handle: Copy + Eq {
    fn from_raw(idx: u32, generation: u32) -> Self;
    fn idx(self) -> u32;
    fn generation(self) -> u32;
}

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            /// Slot index into the owning store.
            pub(crate) idx: u32,
            /// Generation counter; must match the store's generation for this slot.
            pub(crate) generation: u32,
        }

        impl $name {
            /// Returns the raw slot index (for diagnostics only).
            #[inline]
            #[must_use]
            pub const fn index(self) -> u32 {
                self.idx
            }

            /// Returns the generation counter.
            #[inline]
            #[must_use]
            pub const fn generation(self) -> u32 {
                self.generation
            }
        }

        impl Handle for $name {
            #[inline]
            fn from_raw(idx: u32, generation: u32) -> Self {
                Self { idx, generation }
            }

            #[inline]
            fn idx(self) -> u32 {
                self.idx
            }

            #[inline]
            fn generation(self) -> u32 {
                self.generation
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}@gen{})", stringify!($name), self.idx, self.generation)
            }
        }
    };
}

handle! {
    /// A handle to a [`Layer`](super::Layer) owned by a
    /// [`Registry`](crate::registry::Registry).
    ///
    /// Contains both a slot index and a generation counter so that stale
    /// handles can be detected after a layer is removed and the slot reused.
    LayerId
}

handle! {
    /// A handle to a [`Group`](super::Group) owned by a
    /// [`Registry`](crate::registry::Registry).
    GroupId
}

handle! {
    /// A handle to a [`RenderUnit`](crate::unit::RenderUnit).
    ///
    /// Surfaces receive unit handles in every callback; two layers that share
    /// a unit report the same `UnitId`.
    UnitId
}
