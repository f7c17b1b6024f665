//! Partially instantiate a variable font.
//!
//! Unlike a mutator, which produces a static font, this produces a
//! *partial* variable font: the axes pinned by the caller disappear, and
//! the remaining axes continue to vary exactly as they did before. For
//! each variation table, tuples which only involve pinned axes are folded
//! into the table's base values, tuples with no influence at the pinned
//! location are dropped, and tuples straddling pinned and surviving axes
//! are rescaled by the pinned axes' contribution.

use crate::error::InstancerError;
use crate::font::{Font, GPOS_TAG, GSUB_TAG, HVAR_TAG};
use crate::otvar::iup::iup_delta;
use crate::otvar::{
    support_scalar, Delta, ItemVariationStore, Location, Support, TupleVariation,
};
use crate::tables::layout::{Condition, LayoutTable};
use crate::tables::{cvar, fvar, glyf, gvar, MVAR};
use crate::types::{ot_round, F2DOT14, Tag};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// A restriction applied to one axis of the design space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisLimit {
    /// Fix the axis to a single user-space location and remove it
    Pin(f32),
    /// Restrict the axis to a sub-range (not supported yet)
    Range(f32, f32),
}

/// The caller's restrictions, keyed by axis tag
pub type AxisLimits = BTreeMap<Tag, AxisLimit>;

/// Parse command-line style `AXIS=LOC` limit strings.
///
/// A limit is a tag of 1-4 word characters, `=`, and either a single
/// number (pinning the axis) or `min:max`. Equal bounds collapse to a pin.
pub fn parse_limits<S: AsRef<str>>(specs: &[S]) -> Result<AxisLimits, InstancerError> {
    let matcher = Regex::new(r"^(\w{1,4})=([^:]+)(?:[:](.+))?$").unwrap();
    let mut limits = AxisLimits::new();
    for spec in specs {
        let spec = spec.as_ref();
        let bad = || InstancerError::BadLimitSyntax {
            spec: spec.to_string(),
        };
        let captures = matcher.captures(spec).ok_or_else(bad)?;
        let tag = Tag::from_raw(&captures[1]).map_err(|_| bad())?;
        let lower: f32 = captures[2].parse().map_err(|_| bad())?;
        let upper: f32 = match captures.get(3) {
            Some(bound) => bound.as_str().parse().map_err(|_| bad())?,
            None => lower,
        };
        let limit = if (lower - upper).abs() < f32::EPSILON {
            AxisLimit::Pin(lower)
        } else {
            AxisLimit::Range(lower, upper)
        };
        if limits.insert(tag, limit).is_some() {
            return Err(InstancerError::DuplicateLimit { tag });
        }
    }
    Ok(limits)
}

/// Normalize a user-space value: clamp and scale against the axis triple,
/// apply any avar mapping, and quantize to F2Dot14 to avoid surprise
/// interpolations.
fn normalize(
    value: f32,
    triple: (f32, f32, f32),
    avar_segment: Option<&crate::tables::avar::SegmentMap>,
) -> f32 {
    let mut value = crate::otvar::normalize_value(value, triple);
    if let Some(map) = avar_segment {
        value = map.piecewise_linear_map(value);
    }
    F2DOT14::round(value)
}

fn normalize_axis_limits(
    font: &Font,
    axis_limits: &AxisLimits,
) -> Result<Location, InstancerError> {
    let fvar = font.fvar().ok_or(InstancerError::MissingRequired {
        table: fvar::TAG,
    })?;
    let mut location = Location::new();
    for (&tag, limit) in axis_limits {
        let (index, axis) = fvar
            .axes
            .iter()
            .enumerate()
            .find(|(_, axis)| axis.axisTag == tag)
            .ok_or(InstancerError::AxisUnknown { tag })?;
        let value = match *limit {
            AxisLimit::Pin(value) => value,
            AxisLimit::Range(minimum, maximum) => {
                if (minimum - maximum).abs() > f32::EPSILON {
                    return Err(InstancerError::RangeUnsupported {
                        tag,
                        minimum,
                        maximum,
                    });
                }
                minimum
            }
        };
        let avar_segment = font.avar().and_then(|avar| avar.maps.get(index));
        location.insert(tag, normalize(value, axis.triple(), avar_segment));
    }
    Ok(location)
}

fn sanity_check(font: &Font) -> Result<(), InstancerError> {
    if !font.contains(&fvar::TAG) {
        return Err(InstancerError::MissingRequired { table: fvar::TAG });
    }
    if font.contains(&gvar::TAG) && !font.contains(&glyf::TAG) {
        return Err(InstancerError::MissingRequired { table: glyf::TAG });
    }
    Ok(())
}

fn instantiate_gvar_glyph(
    glyf: &mut glyf::glyf,
    gvar: &mut gvar::gvar,
    glyph_id: usize,
    location: &Location,
) {
    let variations = match gvar.variations.get_mut(glyph_id) {
        Some(Some(variations)) => variations,
        _ => return,
    };
    let glyph = match glyf.glyphs.get(glyph_id) {
        Some(glyph) => glyph,
        None => return,
    };
    let pinned: BTreeSet<Tag> = location.keys().copied().collect();
    let (base_coords, ends) = glyph.gvar_coords_and_ends();
    let mut accumulated = vec![(0.0_f32, 0.0_f32); base_coords.len()];
    let mut default_modified = false;

    let mut new_variations: Vec<TupleVariation> = vec![];
    for mut var in std::mem::take(&mut variations.tuples) {
        let tuple_axes: BTreeSet<Tag> = var.axes.keys().copied().collect();
        let pinned_tuple_axes: BTreeSet<Tag> = tuple_axes.intersection(&pinned).copied().collect();
        if pinned_tuple_axes.is_empty() {
            // A tuple for only axes being kept is untouched
            new_variations.push(var);
            continue;
        }
        // Compute influence at the pinned location, for the pinned axes only
        let pinned_support: Support = var
            .axes
            .iter()
            .filter(|(tag, _)| pinned_tuple_axes.contains(tag))
            .map(|(tag, tent)| (*tag, *tent))
            .collect();
        let scalar = support_scalar(location, &pinned_support);
        if scalar == 0.0 {
            // No influence (default value or out of range); drop the tuple
            continue;
        }
        let deltas: Vec<(f32, f32)> = if var.has_untouched_points() {
            iup_delta(&var.deltas, &base_coords, &ends)
        } else {
            var.deltas
                .iter()
                .map(|d| {
                    let (x, y) = d.as_ref().unwrap().get_2d();
                    (x as f32, y as f32)
                })
                .collect()
        };
        if tuple_axes.is_subset(&pinned) {
            // A tuple for only axes being pinned is discarded, and its
            // contribution is reflected into the base outline
            for (slot, (dx, dy)) in accumulated.iter_mut().zip(deltas) {
                slot.0 += dx * scalar;
                slot.1 += dy * scalar;
            }
            default_modified = true;
        } else {
            // A tuple for some axes being pinned has to be adjusted
            var.deltas = deltas
                .iter()
                .map(|(dx, dy)| {
                    Some(Delta::Delta2D((
                        ot_round(dx * scalar) as i16,
                        ot_round(dy * scalar) as i16,
                    )))
                })
                .collect();
            for axis in &pinned_tuple_axes {
                var.axes.remove(axis);
            }
            new_variations.push(var);
        }
    }

    if default_modified {
        let glyph = &mut glyf.glyphs[glyph_id];
        let num_outline = glyph.num_points();
        for (point, (dx, dy)) in glyph
            .contours
            .iter_mut()
            .flatten()
            .zip(accumulated.iter())
        {
            point.x = ot_round(point.x as f32 + dx) as i16;
            point.y = ot_round(point.y as f32 + dy) as i16;
        }
        for (component, (dx, dy)) in glyph
            .components
            .iter_mut()
            .zip(accumulated[num_outline..].iter())
        {
            component.apply_delta(*dx, *dy);
        }
        // The four phantom deltas are not stored anywhere
        glyf.recalc_bounds(glyph_id);
    }

    gvar.variations[glyph_id] = if new_variations.is_empty() {
        None
    } else {
        Some(gvar::GlyphVariationData {
            tuples: new_variations,
        })
    };
}

fn instantiate_gvar(font: &mut Font, location: &Location) {
    log::info!("Instantiating glyf/gvar tables");
    let mut gvar_table = match font.remove(gvar::TAG) {
        Some(crate::font::Table::Gvar(gvar_table)) => gvar_table,
        Some(other) => {
            font.tables.insert(gvar::TAG, other);
            return;
        }
        None => return,
    };
    if font.glyf().is_none() {
        font.tables
            .insert(gvar::TAG, crate::font::Table::Gvar(gvar_table));
        return;
    }
    let glyf_table = font.glyf_mut().unwrap();
    // Composite glyphs come after their bases, so that bounds
    // recomputation sees already-updated components
    let mut order: Vec<usize> = (0..glyf_table.glyphs.len()).collect();
    order.sort_by_key(|&glyph_id| (glyf_table.composite_depth(glyph_id), glyph_id));
    for glyph_id in order {
        instantiate_gvar_glyph(glyf_table, &mut gvar_table, glyph_id, location);
    }
    font.tables
        .insert(gvar::TAG, crate::font::Table::Gvar(gvar_table));
}

fn instantiate_cvar(font: &mut Font, location: &Location) {
    log::info!("Instantiating cvt/cvar tables");
    let pinned: BTreeSet<Tag> = location.keys().copied().collect();
    let mut cvt_deltas: BTreeMap<usize, f32> = BTreeMap::new();
    let mut drop_table = false;
    if let Some(cvar_table) = font.cvar_mut() {
        let mut new_variations: Vec<TupleVariation> = vec![];
        for mut var in std::mem::take(&mut cvar_table.variations) {
            let tuple_axes: BTreeSet<Tag> = var.axes.keys().copied().collect();
            let pinned_tuple_axes: BTreeSet<Tag> =
                tuple_axes.intersection(&pinned).copied().collect();
            if pinned_tuple_axes.is_empty() {
                new_variations.push(var);
                continue;
            }
            let pinned_support: Support = var
                .axes
                .iter()
                .filter(|(tag, _)| pinned_tuple_axes.contains(tag))
                .map(|(tag, tent)| (*tag, *tent))
                .collect();
            let scalar = support_scalar(location, &pinned_support);
            if scalar == 0.0 {
                continue;
            }
            if tuple_axes.is_subset(&pinned) {
                // Deltas to be baked into the cvt values
                for (index, delta) in var.deltas.iter().enumerate() {
                    if let Some(delta) = delta {
                        *cvt_deltas.entry(index).or_insert(0.0) +=
                            scalar * delta.get_1d() as f32;
                    }
                }
            } else {
                let scaled: Vec<Option<Delta>> = var
                    .deltas
                    .iter()
                    .map(|delta| {
                        delta
                            .as_ref()
                            .map(|d| Delta::Delta1D(ot_round(d.get_1d() as f32 * scalar) as i16))
                    })
                    .collect();
                var.deltas = scaled;
                for axis in &pinned_tuple_axes {
                    var.axes.remove(axis);
                }
                new_variations.push(var);
            }
        }
        if new_variations.is_empty() {
            drop_table = true;
        } else {
            cvar_table.variations = new_variations;
        }
    }
    if !cvt_deltas.is_empty() {
        if let Some(cvt_table) = font.cvt_mut() {
            for (index, delta) in cvt_deltas {
                if let Some(value) = cvt_table.values.get_mut(index) {
                    *value += ot_round(delta) as i16;
                }
            }
        }
    }
    if drop_table {
        log::info!("Dropping cvar table");
        font.remove(cvar::TAG);
    }
}

/// Rewrite an item variation store against the pinned location.
///
/// Regions whose every effective axis is pinned are removed (their
/// contribution was already applied by the caller); regions straddling
/// pinned and surviving axes have their deltas rescaled by the pinned
/// axes' scalar and their pinned peaks zeroed. Returns false if no
/// regions survive, in which case the containing table should go.
pub(crate) fn instantiate_item_variation_store(
    store: &mut ItemVariationStore,
    axis_tags: &[Tag],
    location: &Location,
) -> bool {
    let pinned: BTreeSet<Tag> = location.keys().copied().collect();
    let mut new_regions = vec![];
    let mut region_influence: BTreeMap<usize, f32> = BTreeMap::new();
    let mut dropped: Vec<usize> = vec![];
    for region_index in 0..store.variationRegions.len() {
        let support = store.region_support(region_index, axis_tags);
        let region_axes: BTreeSet<Tag> = support
            .iter()
            .filter(|(_, (_, peak, _))| *peak != 0.0)
            .map(|(tag, _)| *tag)
            .collect();
        let pinned_region_axes: BTreeSet<Tag> =
            region_axes.intersection(&pinned).copied().collect();
        if pinned_region_axes.is_empty() {
            // A region where none of the axes having effect are pinned
            new_regions.push(store.variationRegions[region_index].clone());
            continue;
        }
        if pinned_region_axes.len() == region_axes.len() {
            // All the axes having effect in this region are being pinned
            dropped.push(region_index);
            continue;
        }
        // The region is retained but its deltas have to be adjusted
        let pinned_support: Support = support
            .iter()
            .filter(|(tag, _)| pinned_region_axes.contains(tag))
            .map(|(tag, tent)| (*tag, *tent))
            .collect();
        region_influence.insert(region_index, support_scalar(location, &pinned_support));
        let region = &mut store.variationRegions[region_index];
        for (axis_index, tag) in axis_tags.iter().enumerate() {
            if pinned_region_axes.contains(tag) {
                region[axis_index].peakCoord = 0.0;
            }
        }
        new_regions.push(region.clone());
    }

    if new_regions.is_empty() {
        store.variationRegions = new_regions;
        return false;
    }

    for vardata in store.variationData.iter_mut() {
        let slot_of_region: BTreeMap<usize, usize> = vardata
            .region_indexes
            .iter()
            .enumerate()
            .map(|(slot, &region_index)| (region_index as usize, slot))
            .collect();
        // Apply scalars for regions being retained
        for (&region_index, &scalar) in &region_influence {
            if (scalar - 1.0).abs() < f32::EPSILON {
                continue;
            }
            if let Some(&slot) = slot_of_region.get(&region_index) {
                for item in vardata.delta_values.iter_mut() {
                    item[slot] = ot_round(item[slot] as f32 * scalar) as i16;
                }
            }
        }
        if !dropped.is_empty() {
            // Delete deltas for dropped regions, highest slot first so
            // earlier slots stay valid
            let mut dropped_slots: Vec<usize> = dropped
                .iter()
                .filter_map(|region_index| slot_of_region.get(region_index))
                .copied()
                .collect();
            dropped_slots.sort_unstable_by(|a, b| b.cmp(a));
            for slot in dropped_slots {
                for item in vardata.delta_values.iter_mut() {
                    item.remove(slot);
                }
            }
            // Renumber the surviving region references
            let new_region_indexes: Vec<u16> = vardata
                .region_indexes
                .iter()
                .filter(|region_index| !dropped.contains(&(**region_index as usize)))
                .map(|&region_index| {
                    region_index
                        - dropped.partition_point(|&d| d < region_index as usize) as u16
                })
                .collect();
            vardata.region_indexes = new_region_indexes;
        }
    }

    store.variationRegions = new_regions;
    true
}

fn set_mvar_deltas(font: &mut Font, location: &Location) {
    log::info!("Setting MVAR deltas");
    let axis_tags = match font.fvar() {
        Some(fvar) => fvar.axis_tags(),
        None => return,
    };
    let mut updates: Vec<(Tag, i32)> = vec![];
    if let Some(mvar) = font.mvar() {
        for record in &mvar.value_records {
            let delta = ot_round(mvar.store.interpolate(record.varIdx, &axis_tags, location));
            if delta == 0 {
                continue;
            }
            updates.push((record.valueTag, delta));
        }
    }
    for (tag, delta) in updates {
        apply_metric_delta(font, tag, delta);
    }
}

fn add_i16(value: &mut i16, delta: i32) {
    *value = (*value as i32 + delta) as i16;
}

fn add_u16(value: &mut u16, delta: i32) {
    *value = (*value as i32 + delta).max(0) as u16;
}

/// Apply a rounded MVAR delta to the metric field identified by a value
/// tag. Unrecognized tags are skipped.
fn apply_metric_delta(font: &mut Font, value_tag: Tag, delta: i32) {
    match value_tag.as_bytes() {
        b"hasc" => {
            if let Some(hhea) = font.hhea_mut() {
                add_i16(&mut hhea.ascender, delta)
            }
        }
        b"hdsc" => {
            if let Some(hhea) = font.hhea_mut() {
                add_i16(&mut hhea.descender, delta)
            }
        }
        b"hlgp" => {
            if let Some(hhea) = font.hhea_mut() {
                add_i16(&mut hhea.lineGap, delta)
            }
        }
        b"hcrs" => {
            if let Some(hhea) = font.hhea_mut() {
                add_i16(&mut hhea.caretSlopeRise, delta)
            }
        }
        b"hcrn" => {
            if let Some(hhea) = font.hhea_mut() {
                add_i16(&mut hhea.caretSlopeRun, delta)
            }
        }
        b"hcof" => {
            if let Some(hhea) = font.hhea_mut() {
                add_i16(&mut hhea.caretOffset, delta)
            }
        }
        b"vasc" => {
            if let Some(vhea) = font.vhea_mut() {
                add_i16(&mut vhea.ascent, delta)
            }
        }
        b"vdsc" => {
            if let Some(vhea) = font.vhea_mut() {
                add_i16(&mut vhea.descent, delta)
            }
        }
        b"vlgp" => {
            if let Some(vhea) = font.vhea_mut() {
                add_i16(&mut vhea.lineGap, delta)
            }
        }
        b"vcrs" => {
            if let Some(vhea) = font.vhea_mut() {
                add_i16(&mut vhea.caretSlopeRise, delta)
            }
        }
        b"vcrn" => {
            if let Some(vhea) = font.vhea_mut() {
                add_i16(&mut vhea.caretSlopeRun, delta)
            }
        }
        b"vcof" => {
            if let Some(vhea) = font.vhea_mut() {
                add_i16(&mut vhea.caretOffset, delta)
            }
        }
        b"hcla" => {
            if let Some(os2) = font.os2_mut() {
                add_u16(&mut os2.usWinAscent, delta)
            }
        }
        b"hcld" => {
            if let Some(os2) = font.os2_mut() {
                add_u16(&mut os2.usWinDescent, delta)
            }
        }
        b"xhgt" => {
            if let Some(os2) = font.os2_mut() {
                if let Some(sx_height) = os2.sxHeight.as_mut() {
                    add_i16(sx_height, delta)
                }
            }
        }
        b"cpht" => {
            if let Some(os2) = font.os2_mut() {
                if let Some(s_cap_height) = os2.sCapHeight.as_mut() {
                    add_i16(s_cap_height, delta)
                }
            }
        }
        b"sbxs" => {
            if let Some(os2) = font.os2_mut() {
                add_i16(&mut os2.ySubscriptXSize, delta)
            }
        }
        b"sbys" => {
            if let Some(os2) = font.os2_mut() {
                add_i16(&mut os2.ySubscriptYSize, delta)
            }
        }
        b"sbxo" => {
            if let Some(os2) = font.os2_mut() {
                add_i16(&mut os2.ySubscriptXOffset, delta)
            }
        }
        b"sbyo" => {
            if let Some(os2) = font.os2_mut() {
                add_i16(&mut os2.ySubscriptYOffset, delta)
            }
        }
        b"spxs" => {
            if let Some(os2) = font.os2_mut() {
                add_i16(&mut os2.ySuperscriptXSize, delta)
            }
        }
        b"spys" => {
            if let Some(os2) = font.os2_mut() {
                add_i16(&mut os2.ySuperscriptYSize, delta)
            }
        }
        b"spxo" => {
            if let Some(os2) = font.os2_mut() {
                add_i16(&mut os2.ySuperscriptXOffset, delta)
            }
        }
        b"spyo" => {
            if let Some(os2) = font.os2_mut() {
                add_i16(&mut os2.ySuperscriptYOffset, delta)
            }
        }
        b"strs" => {
            if let Some(os2) = font.os2_mut() {
                add_i16(&mut os2.yStrikeoutSize, delta)
            }
        }
        b"stro" => {
            if let Some(os2) = font.os2_mut() {
                add_i16(&mut os2.yStrikeoutPosition, delta)
            }
        }
        b"unds" => {
            if let Some(post) = font.post_mut() {
                add_i16(&mut post.underlineThickness, delta)
            }
        }
        b"undo" => {
            if let Some(post) = font.post_mut() {
                add_i16(&mut post.underlinePosition, delta)
            }
        }
        // The gasp family and anything else is not varied here
        _ => {}
    }
}

fn instantiate_mvar(font: &mut Font, location: &Location) {
    log::info!("Instantiating MVAR table");
    // First instantiate to the new position without modifying the table
    set_mvar_deltas(font, location);

    log::info!("Instantiating ItemVariation store of MVAR table");
    let axis_tags = match font.fvar() {
        Some(fvar) => fvar.axis_tags(),
        None => return,
    };
    let mut empty = false;
    if let Some(mvar) = font.mvar_mut() {
        empty = !instantiate_item_variation_store(&mut mvar.store, &axis_tags, location);
    }
    if empty {
        // No regions left, so no information left
        log::info!("Dropping MVAR table");
        font.remove(MVAR::TAG);
    }
}

fn instantiate_feature_variations(
    table: &mut LayoutTable,
    fvar: &fvar::fvar,
    location: &Location,
) -> Result<(), InstancerError> {
    let LayoutTable {
        features,
        feature_variations,
    } = table;
    let variations = match feature_variations.as_mut() {
        Some(variations) => variations,
        None => {
            log::info!("No FeatureVariations");
            return Ok(());
        }
    };
    let mut new_records = vec![];
    let mut feature_variation_applied = false;
    for mut record in std::mem::take(&mut variations.records) {
        let mut retain_record = true;
        let mut new_conditions = vec![];
        for condition in std::mem::take(&mut record.condition_set.conditions) {
            let verdict = match &condition {
                Condition::Format1(inner) => {
                    let axis_tag = fvar
                        .axes
                        .get(inner.axis_index as usize)
                        .ok_or_else(|| InstancerError::Corrupt {
                            msg: format!(
                                "FeatureVariations condition references axis {} of {}",
                                inner.axis_index,
                                fvar.axes.len()
                            ),
                        })?
                        .axisTag;
                    location.get(&axis_tag).map(|&value| {
                        inner.filter_range_min <= value && value <= inner.filter_range_max
                    })
                }
                Condition::Other { .. } => None,
            };
            match verdict {
                // Condition not met, so remove the entire record
                Some(false) => {
                    retain_record = false;
                    break;
                }
                // Satisfied by pinning: the condition is dropped
                Some(true) => {}
                // Still depends on a surviving axis; carry it forward
                None => new_conditions.push(condition),
            }
        }
        if !retain_record {
            continue;
        }
        if new_conditions.is_empty() {
            // Every condition was satisfied by pinning, so the record
            // applies now. Only the first such record wins, matching the
            // runtime's first-match semantics.
            if !feature_variation_applied {
                if record.substitution.version != 0x00010000 {
                    return Err(InstancerError::Corrupt {
                        msg: format!(
                            "FeatureTableSubstitution version 0x{:08x}",
                            record.substitution.version
                        ),
                    });
                }
                for substitution in record.substitution.substitutions {
                    let feature_record = features
                        .records
                        .get_mut(substitution.feature_index as usize)
                        .ok_or_else(|| InstancerError::Corrupt {
                            msg: format!(
                                "FeatureTableSubstitution references feature {}",
                                substitution.feature_index
                            ),
                        })?;
                    feature_record.feature = substitution.feature;
                }
                feature_variation_applied = true;
            }
        } else {
            record.condition_set.conditions = new_conditions;
            new_records.push(record);
        }
    }
    variations.records = new_records;
    Ok(())
}

fn instantiate_feature_variation_store(
    font: &mut Font,
    table_tag: Tag,
    location: &Location,
) -> Result<(), InstancerError> {
    let fvar = match font.fvar() {
        Some(fvar) => fvar.clone(),
        None => return Ok(()),
    };
    let table = if table_tag == GSUB_TAG {
        font.gsub_mut()
    } else {
        font.gpos_mut()
    };
    if let Some(table) = table {
        log::info!(
            "Instantiating FeatureVariation store of {} table",
            table_tag
        );
        instantiate_feature_variations(table, &fvar, location)?;
    }
    Ok(())
}

/// Partially instantiate a variable font in place.
///
/// Each axis named in `axis_limits` is pinned to the given user-space
/// location and removed from the font's variation data; the remaining
/// axes continue to vary. The `HVAR` table is removed unconditionally.
pub fn instantiate_in_place(
    font: &mut Font,
    axis_limits: &AxisLimits,
) -> Result<(), InstancerError> {
    sanity_check(font)?;
    let location = normalize_axis_limits(font, axis_limits)?;
    log::info!("Normalized limits: {:?}", location);

    if font.contains(&gvar::TAG) {
        instantiate_gvar(font, &location);
    }
    if font.contains(&cvar::TAG) {
        instantiate_cvar(font, &location);
    }
    if font.contains(&MVAR::TAG) {
        instantiate_mvar(font, &location);
    }
    if font.contains(&GSUB_TAG) {
        instantiate_feature_variation_store(font, GSUB_TAG, &location)?;
    }
    if font.contains(&GPOS_TAG) {
        instantiate_feature_variation_store(font, GPOS_TAG, &location)?;
    }

    // Not rewritten yet; a partial font with a stale HVAR is worse than
    // one without
    font.remove(HVAR_TAG);
    Ok(())
}

/// Partially instantiate a variable font, returning a new font and
/// leaving the input untouched.
pub fn instantiate_variable_font(
    font: &Font,
    axis_limits: &AxisLimits,
) -> Result<Font, InstancerError> {
    let mut copy = font.clone();
    instantiate_in_place(&mut copy, axis_limits)?;
    Ok(copy)
}
