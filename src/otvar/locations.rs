//! Locations in the design space, and how strongly a region applies at one.

use crate::types::Tag;
use std::collections::BTreeMap;

/// A region of the designspace, consisting of a set of per-axis triangular tents
pub type Support = BTreeMap<Tag, (f32, f32, f32)>;
/// A location as a mapping of tags to normalized (-1.0 to 1.0) values
pub type Location = BTreeMap<Tag, f32>;

/// Returns the contribution value of a region at a given location
pub fn support_scalar(loc: &Location, support: &Support) -> f32 {
    let mut scalar = 1.0;
    for (&axis, &(lower, peak, upper)) in support.iter() {
        if peak == 0.0 {
            continue;
        }
        if lower > peak || peak > upper {
            continue;
        }
        if lower < 0.0 && upper > 0.0 {
            continue;
        }
        let v: f32 = *loc.get(&axis).unwrap_or(&0.0);
        if (v - peak).abs() < f32::EPSILON {
            continue;
        }
        if v <= lower || upper <= v {
            scalar = 0.0;
            break;
        }
        if v < peak {
            scalar *= (v - lower) / (peak - lower)
        } else {
            scalar *= (v - upper) / (peak - upper)
        }
    }
    scalar
}

/// Normalize a user-space value against an axis's `(min, default, max)`
/// triple, without avar mapping or quantization: `min` maps to -1.0,
/// `default` to 0.0 and `max` to +1.0.
pub fn normalize_value(value: f32, triple: (f32, f32, f32)) -> f32 {
    let (minimum, default, maximum) = triple;
    let value = value.clamp(minimum, maximum);
    if value < default {
        (value - default) / (default - minimum)
    } else if value > default {
        (value - default) / (maximum - default)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{btreemap, tag};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_support_scalar() {
        assert_approx_eq!(support_scalar(&Location::new(), &Support::new()), 1.0);
        assert_approx_eq!(
            support_scalar(&btreemap!( tag!("wght") => 0.2), &Support::new()),
            1.0
        );
        assert_approx_eq!(
            support_scalar(
                &btreemap!( tag!("wght") => 0.2),
                &btreemap!( tag!("wght") => (0_f32, 2_f32, 3_f32))
            ),
            0.1
        );
        assert_approx_eq!(
            support_scalar(
                &btreemap!( tag!("wght") => 2.5),
                &btreemap!( tag!("wght") => (0_f32, 2_f32, 4_f32))
            ),
            0.75
        );
        // At the peak
        assert_approx_eq!(
            support_scalar(
                &btreemap!( tag!("wdth") => -1.0),
                &btreemap!( tag!("wdth") => (-1_f32, -1_f32, 0_f32))
            ),
            1.0
        );
        // Halfway up a tent
        assert_approx_eq!(
            support_scalar(
                &btreemap!( tag!("wdth") => -0.5),
                &btreemap!( tag!("wdth") => (-1_f32, -1_f32, 0_f32))
            ),
            0.5
        );
        // Outside the tent
        assert_approx_eq!(
            support_scalar(
                &btreemap!( tag!("wdth") => 0.5),
                &btreemap!( tag!("wdth") => (-1_f32, -1_f32, 0_f32))
            ),
            0.0
        );
        // An axis absent from the location sits at the default
        assert_approx_eq!(
            support_scalar(
                &Location::new(),
                &btreemap!( tag!("wght") => (0_f32, 1_f32, 1_f32))
            ),
            0.0
        );
        // Product over multiple axes
        assert_approx_eq!(
            support_scalar(
                &btreemap!( tag!("wght") => 0.5, tag!("wdth") => -0.5),
                &btreemap!(
                    tag!("wght") => (0_f32, 1_f32, 1_f32),
                    tag!("wdth") => (-1_f32, -1_f32, 0_f32)
                )
            ),
            0.25
        );
    }

    #[test]
    fn test_normalize_value() {
        assert_approx_eq!(normalize_value(400.0, (100.0, 400.0, 900.0)), 0.0);
        assert_approx_eq!(normalize_value(500.0, (100.0, 400.0, 900.0)), 0.2);
        assert_approx_eq!(normalize_value(100.0, (100.0, 400.0, 900.0)), -1.0);
        assert_approx_eq!(normalize_value(900.0, (100.0, 400.0, 900.0)), 1.0);
        assert_approx_eq!(normalize_value(250.0, (100.0, 400.0, 900.0)), -0.5);
        // Out-of-range values clamp
        assert_approx_eq!(normalize_value(1000.0, (100.0, 400.0, 900.0)), 1.0);
        assert_approx_eq!(normalize_value(0.0, (100.0, 400.0, 900.0)), -1.0);
        // Degenerate axis with default at an extreme
        assert_approx_eq!(normalize_value(0.0, (0.0, 0.0, 1.0)), 0.0);
        assert_approx_eq!(normalize_value(-5.0, (0.0, 0.0, 1.0)), 0.0);
    }
}
