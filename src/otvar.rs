//! OpenType Variations common machinery
//!
//! Everything the instancer needs to reason about design-space variation:
//! locations and support scalars, tuple variations (`gvar`/`cvar`), item
//! variation stores (`MVAR` and friends), interpolation of untouched points,
//! and the instancer itself.

/// The partial instancer
pub mod instancer;
/// Utilities for Interpolation of Untouched Points
pub mod iup;
/// Item Variation Store (used in `MVAR`, etc.)
mod itemvariationstore;
/// Locations, supports and normalization
mod locations;
/// Packed delta storage within a tuple variation store
pub mod packeddeltas;
/// Packed point numbers within a tuple variation store
pub mod packedpoints;
/// Headers locating variation data within a tuple variation store
mod tuplevariationheader;
/// Tuple Variation Store
mod tuplevariationstore;

use crate::types::int16;

pub use itemvariationstore::{ItemVariationData, ItemVariationStore, RegionAxisCoordinates};
pub use locations::{normalize_value, support_scalar, Location, Support};
pub use tuplevariationheader::{TupleIndexFlags, TupleVariationHeader};
pub use tuplevariationstore::{TupleVariation, TupleVariationStore};

/// Represents either a two-dimensional (`gvar`) or one-dimensional (`cvar`) delta value
#[derive(Debug, PartialEq, Clone)]
pub enum Delta {
    /// A one-dimensional delta (used in the `cvar` table)
    Delta1D(int16),
    /// A two-dimensional delta (used in the `gvar` table)
    Delta2D((int16, int16)),
}

impl Delta {
    /// Assuming that this is a two-dimensional delta, returns the delta as a
    /// X,Y coordinate tuple.
    pub fn get_2d(&self) -> (int16, int16) {
        if let Delta::Delta2D(p) = self {
            *p
        } else {
            panic!("Tried to turn a scalar delta into a coordinate delta");
        }
    }

    /// Assuming that this is a one-dimensional delta, returns the value.
    pub fn get_1d(&self) -> int16 {
        if let Delta::Delta1D(d) = self {
            *d
        } else {
            panic!("Tried to turn a coordinate delta into a scalar delta");
        }
    }
}
