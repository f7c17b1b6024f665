//! Structures shared by the `GSUB` and `GPOS` tables
//!
//! Only the parts of the layout tables the instancer rewrites are modelled
//! here: the feature list and the feature variations. The lookup subtable
//! graph has its own fixed binary contract outside this crate, so fonts
//! loaded from disk carry their layout tables as opaque bytes; this model
//! is used when a font object is constructed with structured layout data.

use crate::types::{uint16, uint32, Tag};

/// A feature table: the lookups a feature activates
#[derive(Debug, PartialEq, Clone, Default)]
pub struct FeatureTable {
    /// Indices into the table's lookup list
    pub lookup_indices: Vec<uint16>,
}

/// A tagged feature within the feature list
#[derive(Debug, PartialEq, Clone)]
pub struct FeatureRecord {
    /// The feature tag (`liga`, `rvrn`, ...)
    pub tag: Tag,
    /// The feature table itself
    pub feature: FeatureTable,
}

/// The feature list of a layout table
#[derive(Debug, PartialEq, Clone, Default)]
pub struct FeatureList {
    /// Feature records, indexed by feature index
    pub records: Vec<FeatureRecord>,
}

/// A format 1 condition: an axis range which must hold for a variation
/// record to apply
#[derive(Debug, PartialEq, Clone)]
pub struct ConditionFormat1 {
    /// Index of the axis being tested, in fvar order
    pub axis_index: uint16,
    /// Minimum (inclusive) normalized value for the condition to hold
    pub filter_range_min: f32,
    /// Maximum (inclusive) normalized value for the condition to hold
    pub filter_range_max: f32,
}

/// A condition within a condition set
#[derive(Debug, PartialEq, Clone)]
pub enum Condition {
    /// Format 1: an axis value range
    Format1(ConditionFormat1),
    /// A condition format this crate does not evaluate; carried through
    /// untouched
    Other { format: uint16 },
}

/// A conjunction of conditions gating a feature substitution
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ConditionSet {
    pub conditions: Vec<Condition>,
}

/// A single feature-table substitution within a variation record
#[derive(Debug, PartialEq, Clone)]
pub struct FeatureSubstitutionRecord {
    /// Which feature (by index into the feature list) is replaced
    pub feature_index: uint16,
    /// The feature table to use instead
    pub feature: FeatureTable,
}

/// The substitutions applied when a variation record's conditions hold
#[derive(Debug, PartialEq, Clone)]
pub struct FeatureTableSubstitution {
    /// Format version, always 0x00010000
    pub version: uint32,
    pub substitutions: Vec<FeatureSubstitutionRecord>,
}

/// One feature-variation record: a condition set plus substitutions
#[derive(Debug, PartialEq, Clone)]
pub struct FeatureVariationRecord {
    pub condition_set: ConditionSet,
    pub substitution: FeatureTableSubstitution,
}

/// The FeatureVariations subtable of a GSUB or GPOS table
#[derive(Debug, PartialEq, Clone, Default)]
pub struct FeatureVariations {
    /// Variation records, evaluated in order with first-match-wins
    pub records: Vec<FeatureVariationRecord>,
}

/// The instancer's view of a GSUB or GPOS table
#[derive(Debug, PartialEq, Clone, Default)]
pub struct LayoutTable {
    /// The feature list
    pub features: FeatureList,
    /// Feature variations, if the table has any
    pub feature_variations: Option<FeatureVariations>,
}
