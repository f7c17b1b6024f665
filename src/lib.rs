//! Partially instantiate variable fonts.
//!
//! This crate takes a variable font and a set of axis pins (e.g.
//! `wdth=85`), and produces a new variable font in which the pinned axes
//! are gone while the remaining axes continue to vary exactly as before.
//! To do this it rewrites each variation table: per-glyph outline deltas
//! (`gvar`), control-value deltas (`cvar`), metric deltas (`MVAR`), and
//! the feature-variation condition sets of `GSUB`/`GPOS`.
//!
//! ```no_run
//! use partial_instancer::instancer::{instantiate_in_place, parse_limits};
//!
//! # fn main() -> Result<(), partial_instancer::InstancerError> {
//! let mut font = partial_instancer::font::load("MyFont-VF.ttf")?;
//! let limits = parse_limits(&["wdth=85"])?;
//! instantiate_in_place(&mut font, &limits)?;
//! font.save("MyFont-VF-instance.ttf")?;
//! # Ok(())
//! # }
//! ```
#![allow(non_camel_case_types, non_snake_case, clippy::upper_case_acronyms)]

pub mod types;
pub mod binary;
pub mod error;
pub mod font;
pub mod otvar;
pub mod tables;

pub use crate::error::InstancerError;
pub use crate::font::{Font, Table};
pub use crate::otvar::instancer;
pub use crate::otvar::instancer::{
    instantiate_in_place, instantiate_variable_font, parse_limits, AxisLimit, AxisLimits,
};
