//! Dense node and edge indices.
//!
//! The graph hands out indices in insertion order and never reuses them, so
//! feature rows and CSR slots can be addressed directly.

use serde::{Deserialize, Serialize};

macro_rules! dense_index {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for a slot that has not been filled yet.
            pub const INVALID: Self = Self(u32::MAX);

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;

            fn try_from(n: usize) -> Result<Self, Self::Error> {
                u32::try_from(n).map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

dense_index! {
    /// Position of a node in graph insertion order.
    NodeIdx
}

dense_index! {
    /// Position of a directed edge in insertion order.
    EdgeIdx
}
