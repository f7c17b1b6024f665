//! Tuple Variation Store
//!
//! The shared storage model of the `gvar` and `cvar` tables: a list of
//! tuple variations, each pairing a region of the design space with a set
//! of deltas. In memory the region is kept as a map from axis tag to a
//! `(start, peak, end)` tent; axes which have no effect on a tuple are
//! simply absent from the map. Deltas are kept sparse: a `None` entry is a
//! point whose delta must be inferred by IUP.

use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serializer,
};
use crate::otvar::packeddeltas::{self, PackedDeltas};
use crate::otvar::packedpoints::PackedPoints;
use crate::otvar::{Delta, Support, TupleIndexFlags, TupleVariationHeader};
use crate::types::{uint16, Tag, Tuple};
use std::collections::BTreeMap;

/// In the packed tuple count, signifies that shared point numbers follow
const SHARED_POINT_NUMBERS: u16 = 0x8000;
/// Mask off the packed tuple count to find the number of tuples
const COUNT_MASK: u16 = 0x0FFF;

/// How a set of values varies at one region of the design space
#[derive(Debug, PartialEq, Clone)]
pub struct TupleVariation {
    /// The tent of influence for each axis which has an effect on this
    /// tuple. Axes not present have no effect.
    pub axes: BTreeMap<Tag, (f32, f32, f32)>,
    /// One delta per point (or CVT entry); `None` entries are untouched.
    pub deltas: Vec<Option<Delta>>,
}

impl TupleVariation {
    /// Does this variation need IUP to resolve its deltas?
    pub fn has_untouched_points(&self) -> bool {
        self.deltas.iter().any(|d| d.is_none())
    }

    /// The support of this variation, for evaluation against a location.
    pub fn support(&self) -> Support {
        self.axes.clone()
    }
}

/// A collection of tuple variations for a single glyph (or for the CVT)
#[derive(Debug, PartialEq, Clone, Default)]
pub struct TupleVariationStore(pub Vec<TupleVariation>);

fn dense_tuple(axes: &BTreeMap<Tag, (f32, f32, f32)>, axis_tags: &[Tag], which: usize) -> Tuple {
    axis_tags
        .iter()
        .map(|tag| match axes.get(tag) {
            Some(&(start, peak, end)) => [start, peak, end][which],
            None => 0.0,
        })
        .collect()
}

/// The region implied by a peak tuple when no intermediate region is stored
fn infer_region(peak: f32) -> (f32, f32) {
    if peak > 0.0 {
        (0.0, peak)
    } else {
        (peak, 0.0)
    }
}

impl TupleVariationStore {
    /// Deserialize a tuple variation store.
    ///
    /// The caller provides the font's axis order, whether this is a gvar
    /// store (two-dimensional deltas), the number of deltas per tuple, and
    /// the gvar shared tuple array (empty for cvar). The reader's current
    /// table base (`c.top_of_table()`) must be the origin the store's data
    /// offset is measured from: the store itself for gvar, the start of the
    /// table for cvar.
    pub fn from_bytes(
        c: &mut ReaderContext,
        axis_tags: &[Tag],
        is_gvar: bool,
        point_count: usize,
        shared_tuples: &[Tuple],
    ) -> Result<Self, DeserializationError> {
        let packed_count: uint16 = c.de()?;
        let count = packed_count & COUNT_MASK;
        let points_are_shared = (packed_count & SHARED_POINT_NUMBERS) != 0;
        let data_offset: uint16 = c.de()?;
        let mut headers: Vec<TupleVariationHeader> = vec![];
        for _ in 0..count {
            headers.push(TupleVariationHeader::from_bytes(
                c,
                axis_tags.len() as uint16,
            )?);
        }

        c.ptr = c.top_of_table() + data_offset as usize;
        let shared_points: Option<Vec<uint16>> = if points_are_shared {
            let packed: PackedPoints = c.de()?;
            Some(
                packed
                    .points
                    .unwrap_or_else(|| (0..point_count as uint16).collect()),
            )
        } else {
            None
        };

        let mut variations = vec![];
        for header in headers {
            let block_start = c.ptr;
            let point_numbers: Vec<uint16> = if header
                .flags
                .contains(TupleIndexFlags::PRIVATE_POINT_NUMBERS)
            {
                let private: PackedPoints = c.de()?;
                private
                    .points
                    .unwrap_or_else(|| (0..point_count as uint16).collect())
            } else {
                shared_points
                    .clone()
                    .unwrap_or_else(|| (0..point_count as uint16).collect())
            };

            let mut all_deltas: Vec<Option<Delta>> = vec![None; point_count];
            if is_gvar {
                let x: PackedDeltas = packeddeltas::from_bytes(c, point_numbers.len())?;
                let y: PackedDeltas = packeddeltas::from_bytes(c, point_numbers.len())?;
                for ((&point, &dx), &dy) in point_numbers.iter().zip(x.0.iter()).zip(y.0.iter()) {
                    if let Some(slot) = all_deltas.get_mut(point as usize) {
                        *slot = Some(Delta::Delta2D((dx, dy)));
                    }
                }
            } else {
                let packed: PackedDeltas = packeddeltas::from_bytes(c, point_numbers.len())?;
                for (&point, &d) in point_numbers.iter().zip(packed.0.iter()) {
                    if let Some(slot) = all_deltas.get_mut(point as usize) {
                        *slot = Some(Delta::Delta1D(d));
                    }
                }
            }

            let peak = match &header.peakTuple {
                Some(peak) => peak.clone(),
                None => {
                    let index = header.sharedTupleIndex as usize;
                    shared_tuples
                        .get(index)
                        .cloned()
                        .ok_or_else(|| {
                            DeserializationError(format!("Invalid shared tuple index {}", index))
                        })?
                }
            };
            let mut axes = BTreeMap::new();
            for (ix, tag) in axis_tags.iter().enumerate() {
                let p = peak[ix];
                if p == 0.0 {
                    continue;
                }
                let (start, end) = match (&header.startTuple, &header.endTuple) {
                    (Some(start), Some(end)) => (start[ix], end[ix]),
                    _ => infer_region(p),
                };
                axes.insert(*tag, (start, p, end));
            }

            variations.push(TupleVariation {
                axes,
                deltas: all_deltas,
            });
            // Trust the recorded size over our own arithmetic
            c.ptr = block_start + header.size as usize;
        }
        Ok(TupleVariationStore(variations))
    }

    /// Serialize a tuple variation store.
    ///
    /// Always writes embedded peak tuples and private point numbers; tuples
    /// which touch no points at all are omitted. `offset_base` is the
    /// number of bytes between the offset origin and the store (0 for gvar,
    /// 4 for cvar's version field).
    pub fn to_bytes(
        &self,
        data: &mut Vec<u8>,
        axis_tags: &[Tag],
        is_gvar: bool,
        offset_base: uint16,
    ) -> Result<(), SerializationError> {
        let mut headers: Vec<u8> = vec![];
        let mut bodies: Vec<u8> = vec![];
        let mut written = 0_u16;
        for variation in &self.0 {
            let touched: Vec<uint16> = variation
                .deltas
                .iter()
                .enumerate()
                .filter(|(_, d)| d.is_some())
                .map(|(i, _)| i as uint16)
                .collect();
            if touched.is_empty() {
                continue;
            }
            let mut body: Vec<u8> = vec![];
            let points = if touched.len() == variation.deltas.len() {
                PackedPoints { points: None }
            } else {
                PackedPoints {
                    points: Some(touched.clone()),
                }
            };
            body.put(points)?;
            if is_gvar {
                let xs: Vec<i16> = touched
                    .iter()
                    .map(|&i| variation.deltas[i as usize].as_ref().unwrap().get_2d().0)
                    .collect();
                let ys: Vec<i16> = touched
                    .iter()
                    .map(|&i| variation.deltas[i as usize].as_ref().unwrap().get_2d().1)
                    .collect();
                body.put(PackedDeltas(xs))?;
                body.put(PackedDeltas(ys))?;
            } else {
                let ds: Vec<i16> = touched
                    .iter()
                    .map(|&i| variation.deltas[i as usize].as_ref().unwrap().get_1d())
                    .collect();
                body.put(PackedDeltas(ds))?;
            }

            let peak = dense_tuple(&variation.axes, axis_tags, 1);
            let start = dense_tuple(&variation.axes, axis_tags, 0);
            let end = dense_tuple(&variation.axes, axis_tags, 2);
            let mut flags =
                TupleIndexFlags::EMBEDDED_PEAK_TUPLE | TupleIndexFlags::PRIVATE_POINT_NUMBERS;
            let implied: Vec<(f32, f32)> = peak.iter().map(|&p| infer_region(p)).collect();
            if start
                .iter()
                .zip(end.iter())
                .zip(implied.iter())
                .any(|((&s, &e), &(is, ie))| s != is || e != ie)
            {
                flags |= TupleIndexFlags::INTERMEDIATE_REGION;
            }
            let header = TupleVariationHeader {
                size: body.len() as uint16,
                flags,
                sharedTupleIndex: 0,
                peakTuple: Some(peak),
                startTuple: if flags.contains(TupleIndexFlags::INTERMEDIATE_REGION) {
                    Some(start)
                } else {
                    None
                },
                endTuple: if flags.contains(TupleIndexFlags::INTERMEDIATE_REGION) {
                    Some(end)
                } else {
                    None
                },
            };
            headers.put(header)?;
            bodies.extend(body);
            written += 1;
        }
        data.put(written)?;
        data.put(offset_base + 4 + headers.len() as uint16)?;
        data.extend(headers);
        data.extend(bodies);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{btreemap, tag};

    fn axis_tags() -> Vec<Tag> {
        vec![tag!("wght"), tag!("wdth")]
    }

    #[test]
    fn tvs_roundtrip_gvar() {
        let store = TupleVariationStore(vec![
            TupleVariation {
                axes: btreemap!(tag!("wght") => (0.0, 1.0, 1.0)),
                deltas: vec![
                    Some(Delta::Delta2D((0, -46))),
                    Some(Delta::Delta2D((0, 46))),
                    None,
                    Some(Delta::Delta2D((82, 0))),
                ],
            },
            TupleVariation {
                axes: btreemap!(
                    tag!("wght") => (0.0, 1.0, 1.0),
                    tag!("wdth") => (-1.0, -1.0, 0.0)
                ),
                deltas: vec![
                    Some(Delta::Delta2D((5, 0))),
                    Some(Delta::Delta2D((-5, 0))),
                    Some(Delta::Delta2D((0, 0))),
                    Some(Delta::Delta2D((0, 12))),
                ],
            },
        ]);
        let mut data = vec![];
        store.to_bytes(&mut data, &axis_tags(), true, 0).unwrap();
        let deserialized =
            TupleVariationStore::from_bytes(&mut ReaderContext::new(data), &axis_tags(), true, 4, &[])
                .unwrap();
        assert_eq!(deserialized, store);
    }

    #[test]
    fn tvs_roundtrip_cvar() {
        let store = TupleVariationStore(vec![TupleVariation {
            axes: btreemap!(tag!("wdth") => (-1.0, -1.0, 0.0)),
            deltas: vec![Some(Delta::Delta1D(10)), None, Some(Delta::Delta1D(-3))],
        }]);
        let mut data = vec![];
        store.to_bytes(&mut data, &axis_tags(), false, 0).unwrap();
        let deserialized = TupleVariationStore::from_bytes(
            &mut ReaderContext::new(data),
            &axis_tags(),
            false,
            3,
            &[],
        )
        .unwrap();
        assert_eq!(deserialized, store);
    }

    #[test]
    fn tvs_drops_empty_tuples() {
        let store = TupleVariationStore(vec![TupleVariation {
            axes: btreemap!(tag!("wght") => (0.0, 1.0, 1.0)),
            deltas: vec![None, None],
        }]);
        let mut data = vec![];
        store.to_bytes(&mut data, &axis_tags(), true, 0).unwrap();
        let deserialized =
            TupleVariationStore::from_bytes(&mut ReaderContext::new(data), &axis_tags(), true, 2, &[])
                .unwrap();
        assert!(deserialized.0.is_empty());
    }
}
