//! Interpolation of Untouched Points
//!
//! Tuple variations may omit deltas for some points; the missing deltas are
//! reconstructed per contour, per coordinate axis, by interpolating between
//! the nearest touched points. Reconstruction stays fractional; rounding is
//! the caller's business.

use crate::otvar::Delta;

fn iup_segment(
    newdeltas: &mut Vec<(f32, f32)>,
    coords: &[(i16, i16)],
    rc1: (i16, i16),
    rd1: &Option<Delta>,
    rc2: (i16, i16),
    rd2: &Option<Delta>,
) {
    let rd1 = rd1.as_ref().unwrap().get_2d();
    let rd2 = rd2.as_ref().unwrap().get_2d();
    let mut out_arrays: Vec<Vec<f32>> = vec![vec![], vec![]];
    for j in 0..2 {
        let (mut x1, mut x2, mut d1, mut d2) = if j == 0 {
            (rc1.0, rc2.0, rd1.0, rd2.0)
        } else {
            (rc1.1, rc2.1, rd1.1, rd2.1)
        };
        if x1 == x2 {
            let n = coords.len();
            let fill = if d1 == d2 { d1 as f32 } else { 0.0 };
            out_arrays[j].extend(std::iter::repeat(fill).take(n));
            continue;
        }
        if x1 > x2 {
            std::mem::swap(&mut x2, &mut x1);
            std::mem::swap(&mut d2, &mut d1);
        }

        let scale = (d2 - d1) as f32 / (x2 - x1) as f32;

        for pair in coords {
            let x = if j == 0 { pair.0 } else { pair.1 };
            let d = if x <= x1 {
                d1 as f32
            } else if x >= x2 {
                d2 as f32
            } else {
                d1 as f32 + (x - x1) as f32 * scale
            };
            out_arrays[j].push(d);
        }
    }
    newdeltas.extend(
        out_arrays[0]
            .iter()
            .zip(out_arrays[1].iter())
            .map(|(x, y)| (*x, *y)),
    );
}

/// Perform Interpolation of Untouched Points on a single contour's deltas
pub fn iup_contour(
    newdeltas: &mut Vec<(f32, f32)>,
    deltas: &[Option<Delta>],
    coords: &[(i16, i16)],
) {
    if deltas.iter().all(|x| x.is_some()) {
        newdeltas.extend(deltas.iter().map(|x| {
            let (dx, dy) = x.as_ref().unwrap().get_2d();
            (dx as f32, dy as f32)
        }));
        return;
    }
    let n = deltas.len();
    let indices: Vec<usize> = deltas
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_some())
        .map(|(i, _)| i)
        .collect();
    if indices.is_empty() {
        newdeltas.extend(std::iter::repeat((0.0, 0.0)).take(n));
        return;
    }
    let mut start = indices[0];
    let verystart = start;
    if start != 0 {
        // Wrap-around segment before the first touched point
        let (i1, i2, ri1, ri2) = (0, start, start, *indices.last().unwrap());
        iup_segment(
            newdeltas,
            &coords[i1..i2],
            coords[ri1],
            &deltas[ri1],
            coords[ri2],
            &deltas[ri2],
        );
    }
    let first = deltas[start].as_ref().unwrap().get_2d();
    newdeltas.push((first.0 as f32, first.1 as f32));
    for end in indices.iter().skip(1) {
        if *end - start > 1 {
            let (i1, i2, ri1, ri2) = (start + 1, *end, start, *end);
            iup_segment(
                newdeltas,
                &coords[i1..i2],
                coords[ri1],
                &deltas[ri1],
                coords[ri2],
                &deltas[ri2],
            );
        }
        let touched = deltas[*end].as_ref().unwrap().get_2d();
        newdeltas.push((touched.0 as f32, touched.1 as f32));
        start = *end;
    }
    if start != n - 1 {
        let (i1, i2, ri1, ri2) = (start + 1, n, start, verystart);
        iup_segment(
            newdeltas,
            &coords[i1..i2],
            coords[ri1],
            &deltas[ri1],
            coords[ri2],
            &deltas[ri2],
        );
    }
}

/// Resolve a sparse delta list against base coordinates and contour ends,
/// returning one (dx, dy) pair per point.
pub fn iup_delta(
    deltas: &[Option<Delta>],
    coords: &[(i16, i16)],
    ends: &[usize],
) -> Vec<(f32, f32)> {
    let mut newdeltas = vec![];
    let mut start = 0;
    for end in ends {
        let contour_delta = &deltas[start..end + 1];
        let contour_orig = &coords[start..end + 1];
        start = end + 1;
        iup_contour(&mut newdeltas, contour_delta, contour_orig);
    }
    newdeltas
}
