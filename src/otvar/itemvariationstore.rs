//! Item Variation Store
//!
//! The region-list/data-block storage model used by `MVAR` (and other
//! tables carrying scalar variation data). Deltas here are indexed by a
//! 32-bit variation index: the high word selects a data block, the low word
//! an item within it.

use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serializer,
};
use crate::otvar::{support_scalar, Location, Support};
use crate::types::{int16, uint16, uint32, F2DOT14, Tag};

/// In the word delta count, signifies 32-bit deltas (unsupported here)
const LONG_WORDS: uint16 = 0x8000;

/// The support of a region on one axis
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub struct RegionAxisCoordinates {
    pub startCoord: f32,
    pub peakCoord: f32,
    pub endCoord: f32,
}

/// Represents variation data inside an item variation store
#[derive(Debug, PartialEq, Clone)]
pub struct ItemVariationData {
    /// Indices into the store's region list, one per delta column.
    pub region_indexes: Vec<uint16>,
    /// A two-dimensional array of delta values.
    ///
    /// Rows provide sets of deltas for particular target items, and columns
    /// correspond to regions of the variation space.
    pub delta_values: Vec<Vec<int16>>,
}

/// An item variation store, collecting a set of variation data for scalar values.
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub struct ItemVariationStore {
    /// Format - set to 1
    pub format: uint16,
    /// The number of variation axes in this font.
    pub axisCount: uint16,
    /// The variation regions used in this store.
    pub variationRegions: Vec<Vec<RegionAxisCoordinates>>,
    /// A list of item variation subtables.
    pub variationData: Vec<ItemVariationData>,
}

impl ItemVariationStore {
    /// The support of one region, keyed by axis tag.
    ///
    /// `axis_tags` must be the font's axis order; every axis appears in the
    /// result, including those with no effect (zero peak).
    pub fn region_support(&self, region_index: usize, axis_tags: &[Tag]) -> Support {
        axis_tags
            .iter()
            .zip(self.variationRegions[region_index].iter())
            .map(|(tag, axis)| (*tag, (axis.startCoord, axis.peakCoord, axis.endCoord)))
            .collect()
    }

    /// Evaluate the delta for a variation index at a normalized location.
    ///
    /// Returns the fractional sum of each referenced region's delta scaled
    /// by its support at the location.
    pub fn interpolate(&self, var_idx: uint32, axis_tags: &[Tag], loc: &Location) -> f32 {
        let outer = (var_idx >> 16) as usize;
        let inner = (var_idx & 0xFFFF) as usize;
        let vardata = match self.variationData.get(outer) {
            Some(vardata) => vardata,
            None => return 0.0,
        };
        let item = match vardata.delta_values.get(inner) {
            Some(item) => item,
            None => return 0.0,
        };
        let mut delta = 0.0;
        for (&region_index, &value) in vardata.region_indexes.iter().zip(item.iter()) {
            let support = self.region_support(region_index as usize, axis_tags);
            delta += support_scalar(loc, &support) * value as f32;
        }
        delta
    }

    pub fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        c.push();
        let format: uint16 = c.de()?;
        let region_list_offset: uint32 = c.de()?;
        let vardata_count: uint16 = c.de()?;
        let vardata_offsets: Vec<uint32> = c.de_counted(vardata_count as usize)?;

        c.ptr = c.top_of_table() + region_list_offset as usize;
        let axis_count: uint16 = c.de()?;
        let region_count: uint16 = c.de()?;
        let mut regions = Vec::with_capacity(region_count as usize);
        for _ in 0..region_count {
            let mut region = Vec::with_capacity(axis_count as usize);
            for _ in 0..axis_count {
                let start: int16 = c.de()?;
                let peak: int16 = c.de()?;
                let end: int16 = c.de()?;
                region.push(RegionAxisCoordinates {
                    startCoord: F2DOT14::unpack(start),
                    peakCoord: F2DOT14::unpack(peak),
                    endCoord: F2DOT14::unpack(end),
                });
            }
            regions.push(region);
        }

        let mut variation_data = Vec::with_capacity(vardata_count as usize);
        for offset in vardata_offsets {
            c.ptr = c.top_of_table() + offset as usize;
            let item_count: uint16 = c.de()?;
            let word_delta_count: uint16 = c.de()?;
            if word_delta_count & LONG_WORDS != 0 {
                return Err(DeserializationError(
                    "32-bit deltas in item variation data are not supported".to_string(),
                ));
            }
            let region_index_count: uint16 = c.de()?;
            let region_indexes: Vec<uint16> = c.de_counted(region_index_count as usize)?;
            let mut delta_values = Vec::with_capacity(item_count as usize);
            for _ in 0..item_count {
                let mut row: Vec<int16> = Vec::with_capacity(region_index_count as usize);
                for col in 0..region_index_count {
                    if col < word_delta_count {
                        row.push(c.de()?);
                    } else {
                        let b: i8 = c.de()?;
                        row.push(b as int16);
                    }
                }
                delta_values.push(row);
            }
            variation_data.push(ItemVariationData {
                region_indexes,
                delta_values,
            });
        }
        c.pop();
        Ok(ItemVariationStore {
            format,
            axisCount: axis_count,
            variationRegions: regions,
            variationData: variation_data,
        })
    }

    pub fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let base = data.len();
        let header_size = 8 + 4 * self.variationData.len();
        data.put(self.format)?;
        data.put(header_size as uint32)?;
        data.put(self.variationData.len() as uint16)?;

        let region_list_size = 4 + self.variationRegions.len() * self.axisCount as usize * 6;
        let mut vardata_offset = header_size + region_list_size;
        let mut vardata_blobs: Vec<Vec<u8>> = vec![];
        for vardata in &self.variationData {
            data.put(vardata_offset as uint32)?;
            let mut blob = vec![];
            // Leading columns holding any delta outside byte range are
            // stored as words
            let word_count = vardata
                .delta_values
                .iter()
                .flat_map(|row| {
                    row.iter()
                        .enumerate()
                        .filter(|(_, &d)| !(-128..=127).contains(&d))
                        .map(|(ix, _)| ix + 1)
                })
                .max()
                .unwrap_or(0) as uint16;
            blob.put(vardata.delta_values.len() as uint16)?;
            blob.put(word_count)?;
            blob.put(vardata.region_indexes.len() as uint16)?;
            for index in &vardata.region_indexes {
                blob.put(*index)?;
            }
            for row in &vardata.delta_values {
                for (col, &delta) in row.iter().enumerate() {
                    if (col as uint16) < word_count {
                        blob.put(delta)?;
                    } else {
                        blob.put(delta as i8)?;
                    }
                }
            }
            vardata_offset += blob.len();
            vardata_blobs.push(blob);
        }

        debug_assert_eq!(data.len() - base, header_size);
        data.put(self.axisCount)?;
        data.put(self.variationRegions.len() as uint16)?;
        for region in &self.variationRegions {
            for axis in region {
                data.put(F2DOT14::pack(axis.startCoord))?;
                data.put(F2DOT14::pack(axis.peakCoord))?;
                data.put(F2DOT14::pack(axis.endCoord))?;
            }
        }
        for blob in vardata_blobs {
            data.extend(blob);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{btreemap, tag};
    use assert_approx_eq::assert_approx_eq;

    fn test_store() -> ItemVariationStore {
        ItemVariationStore {
            format: 1,
            axisCount: 1,
            variationRegions: vec![vec![RegionAxisCoordinates {
                startCoord: 0.0,
                peakCoord: 1.0,
                endCoord: 1.0,
            }]],
            variationData: vec![ItemVariationData {
                region_indexes: vec![0],
                delta_values: vec![vec![-200], vec![-50], vec![100], vec![200]],
            }],
        }
    }

    #[test]
    fn ivs_de() {
        let binary_ivs = vec![
            0x00, 0x01, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x01, 0x00, 0x00, 0x00, 0x16, 0x00, 0x01,
            0x00, 0x01, 0x00, 0x00, 0x40, 0x00, 0x40, 0x00, 0x00, 0x04, 0x00, 0x01, 0x00, 0x01,
            0x00, 0x00, 0xFF, 0x38, 0xFF, 0xCE, 0x00, 0x64, 0x00, 0xC8,
        ];
        let deserialized =
            ItemVariationStore::from_bytes(&mut ReaderContext::new(binary_ivs.clone())).unwrap();
        assert_eq!(deserialized, test_store());

        let mut serialized = vec![];
        deserialized.to_bytes(&mut serialized).unwrap();
        assert_eq!(serialized, binary_ivs);
    }

    #[test]
    fn ivs_interpolate() {
        let store = test_store();
        let axis_tags = vec![tag!("wght")];
        assert_approx_eq!(
            store.interpolate(0x00000000, &axis_tags, &btreemap!(tag!("wght") => 1.0)),
            -200.0
        );
        assert_approx_eq!(
            store.interpolate(0x00000002, &axis_tags, &btreemap!(tag!("wght") => 0.5)),
            50.0
        );
        assert_approx_eq!(
            store.interpolate(0x00000003, &axis_tags, &Location::new()),
            0.0
        );
        // Out-of-range indices contribute nothing
        assert_approx_eq!(
            store.interpolate(0x00010000, &axis_tags, &btreemap!(tag!("wght") => 1.0)),
            0.0
        );
    }

    #[test]
    fn ivs_mixed_width_rows() {
        let store = ItemVariationStore {
            format: 1,
            axisCount: 1,
            variationRegions: vec![
                vec![RegionAxisCoordinates {
                    startCoord: 0.0,
                    peakCoord: 1.0,
                    endCoord: 1.0,
                }],
                vec![RegionAxisCoordinates {
                    startCoord: -1.0,
                    peakCoord: -1.0,
                    endCoord: 0.0,
                }],
            ],
            variationData: vec![ItemVariationData {
                region_indexes: vec![0, 1],
                delta_values: vec![vec![300, 5], vec![-3, 120]],
            }],
        };
        let mut data = vec![];
        store.to_bytes(&mut data).unwrap();
        let deserialized = ItemVariationStore::from_bytes(&mut ReaderContext::new(data)).unwrap();
        assert_eq!(deserialized, store);
    }
}
