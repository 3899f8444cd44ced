//! Domain identifier types with proper encapsulation.
//!
//! The external API addresses everything by integer id; the newtypes keep
//! locations, regions and item types from being mixed up.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub const fn new(id: $inner) -> Self {
                Self(id)
            }

            /// The raw identifier.
            #[must_use]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// A node of the universe graph (a solar system).
    LocationId(u64)
);

numeric_id!(
    /// An administrative grouping of locations; the unit of whole-market scans.
    RegionId(u32)
);

numeric_id!(
    /// An item type traded on the market.
    TypeId(u32)
);

numeric_id!(
    /// A docking location: an NPC station or a player-owned structure.
    StationId(u64)
);
