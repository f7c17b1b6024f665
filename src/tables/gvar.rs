use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serializer,
};
use crate::otvar::{TupleVariation, TupleVariationStore};
use crate::types::*;

/// The 'gvar' OpenType tag.
pub const TAG: Tag = crate::tag!("gvar");

/// The tuple variations for a single glyph
#[derive(Debug, PartialEq, Clone)]
pub struct GlyphVariationData {
    pub tuples: Vec<TupleVariation>,
}

/// Represents a font's gvar (Glyph Variations) table
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Clone)]
pub struct gvar {
    /// Variation data, one entry per glyph
    pub variations: Vec<Option<GlyphVariationData>>,
}

/// Deserialize the gvar table.
///
/// `point_counts` gives, for each glyph, the number of deltas its tuples
/// carry (outline points, component pseudo-points, and phantom points).
pub fn from_bytes(
    data: &[u8],
    axis_tags: &[Tag],
    point_counts: &[usize],
) -> Result<gvar, DeserializationError> {
    let mut c = ReaderContext::new(data.to_vec());
    let _major_version: uint16 = c.de()?;
    let _minor_version: uint16 = c.de()?;
    let axis_count: uint16 = c.de()?;
    if axis_count as usize != axis_tags.len() {
        return Err(DeserializationError(format!(
            "gvar axis count {} does not match fvar ({})",
            axis_count,
            axis_tags.len()
        )));
    }
    let shared_tuple_count: uint16 = c.de()?;
    let shared_tuples_offset: uint32 = c.de()?;
    let glyph_count: uint16 = c.de()?;
    let flags: uint16 = c.de()?;
    let data_array_offset: uint32 = c.de()?;

    let data_offsets: Vec<u32> = if flags & 0x1 == 0 {
        // u16 offsets, need doubling
        let halved: Vec<u16> = c.de_counted(glyph_count as usize + 1)?;
        halved.iter().map(|x| *x as u32 * 2).collect()
    } else {
        c.de_counted(glyph_count as usize + 1)?
    };

    c.ptr = shared_tuples_offset as usize;
    let mut shared_tuples: Vec<Tuple> = Vec::with_capacity(shared_tuple_count as usize);
    for _ in 0..shared_tuple_count {
        let coords: Vec<int16> = c.de_counted(axis_count as usize)?;
        shared_tuples.push(coords.iter().map(|x| F2DOT14::unpack(*x)).collect());
    }

    let mut variations = vec![];
    for i in 0..glyph_count as usize {
        let start = data_array_offset as usize + data_offsets[i] as usize;
        let end = data_array_offset as usize + data_offsets[i + 1] as usize;
        if start == end {
            variations.push(None);
            continue;
        }
        if end > data.len() || start > end {
            return Err(DeserializationError(
                "Bad glyph variation data offset".to_string(),
            ));
        }
        let mut glyph_reader = ReaderContext::new(data[start..end].to_vec());
        let store = TupleVariationStore::from_bytes(
            &mut glyph_reader,
            axis_tags,
            true,
            *point_counts.get(i).unwrap_or(&0),
            &shared_tuples,
        )?;
        variations.push(Some(GlyphVariationData { tuples: store.0 }));
    }

    Ok(gvar { variations })
}

impl gvar {
    /// Serialize the gvar table.
    ///
    /// Every tuple is written with an embedded peak and private point
    /// numbers, so no shared tuple or shared point arrays are produced.
    pub fn to_bytes(&self, data: &mut Vec<u8>, axis_tags: &[Tag]) -> Result<(), SerializationError> {
        let mut serialized: Vec<u8> = vec![];
        let mut offsets: Vec<u32> = vec![0];
        for variation in &self.variations {
            if let Some(variation) = variation {
                let store = TupleVariationStore(variation.tuples.clone());
                store.to_bytes(&mut serialized, axis_tags, true, 0)?;
                if serialized.len() % 2 != 0 {
                    serialized.push(0);
                }
            }
            offsets.push(serialized.len() as u32);
        }

        let glyph_count = self.variations.len() as uint16;
        let offsets_size = (glyph_count as u32 + 1) * 4;
        data.put(1_u16)?; // major
        data.put(0_u16)?; // minor
        data.put(axis_tags.len() as uint16)?;
        data.put(0_u16)?; // sharedTupleCount
        data.put(20 + offsets_size)?; // sharedTuplesOffset (empty array)
        data.put(glyph_count)?;
        data.put(1_u16)?; // flags: long offsets
        data.put(20 + offsets_size)?; // glyphVariationDataArrayOffset
        for offset in offsets {
            data.put(offset)?;
        }
        data.extend(serialized);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otvar::Delta;
    use crate::{btreemap, tag};

    fn axis_tags() -> Vec<Tag> {
        vec![tag!("wght"), tag!("wdth")]
    }

    fn d2(x: i16, y: i16) -> Option<Delta> {
        Some(Delta::Delta2D((x, y)))
    }

    #[test]
    fn gvar_de() {
        let binary_gvar = vec![
            0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x02, 0x00, 0x00, 0x00, 0x1e, 0x00, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x26, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0d,
            0x00, 0x24, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x80, 0x02, 0x00, 0x0c,
            0x00, 0x06, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x86, 0x02, 0xd2, 0xd2, 0x2e,
            0x83, 0x02, 0x52, 0xae, 0xf7, 0x83, 0x86, 0x00, 0x80, 0x03, 0x00, 0x14, 0x00, 0x0a,
            0x20, 0x00, 0x00, 0x07, 0x00, 0x01, 0x00, 0x07, 0x80, 0x00, 0x40, 0x00, 0x40, 0x00,
            0x00, 0x02, 0x01, 0x01, 0x02, 0x01, 0x26, 0xda, 0x01, 0x83, 0x7d, 0x03, 0x26, 0x26,
            0xda, 0xda, 0x83, 0x87, 0x03, 0x13, 0x13, 0xed, 0xed, 0x83, 0x87, 0x00,
        ];
        let deserialized =
            from_bytes(&binary_gvar, &axis_tags(), &[0, 0, 7, 8]).unwrap();
        assert_eq!(deserialized.variations[0], None);
        assert_eq!(deserialized.variations[1], None);

        let glyph2 = deserialized.variations[2].as_ref().unwrap();
        assert_eq!(
            glyph2.tuples,
            vec![
                TupleVariation {
                    axes: btreemap!(tag!("wght") => (0.0, 1.0, 1.0)),
                    deltas: vec![
                        d2(0, -46),
                        d2(0, -46),
                        d2(0, 46),
                        d2(0, 0),
                        d2(0, 0),
                        d2(0, 0),
                        d2(0, 0)
                    ],
                },
                TupleVariation {
                    axes: btreemap!(tag!("wdth") => (0.0, 1.0, 1.0)),
                    deltas: vec![
                        d2(82, 0),
                        d2(-82, 0),
                        d2(-9, 0),
                        d2(0, 0),
                        d2(0, 0),
                        d2(0, 0),
                        d2(0, 0)
                    ],
                },
            ]
        );

        // The third glyph's first tuple has private point numbers; the
        // unreferenced points stay untouched for IUP to fill in later.
        let glyph3 = deserialized.variations[3].as_ref().unwrap();
        assert_eq!(
            glyph3.tuples[0],
            TupleVariation {
                axes: btreemap!(tag!("wght") => (0.0, 1.0, 1.0)),
                deltas: vec![
                    None,
                    d2(38, -125),
                    None,
                    d2(-38, 125),
                    None,
                    None,
                    None,
                    None
                ],
            }
        );
        assert_eq!(
            glyph3.tuples[2].axes,
            btreemap!(tag!("wght") => (0.0, 1.0, 1.0), tag!("wdth") => (0.0, 1.0, 1.0))
        );
    }

    #[test]
    fn gvar_roundtrip() {
        let binary_gvar = vec![
            0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x02, 0x00, 0x00, 0x00, 0x1e, 0x00, 0x04,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x26, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0d,
            0x00, 0x24, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x80, 0x02, 0x00, 0x0c,
            0x00, 0x06, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x86, 0x02, 0xd2, 0xd2, 0x2e,
            0x83, 0x02, 0x52, 0xae, 0xf7, 0x83, 0x86, 0x00, 0x80, 0x03, 0x00, 0x14, 0x00, 0x0a,
            0x20, 0x00, 0x00, 0x07, 0x00, 0x01, 0x00, 0x07, 0x80, 0x00, 0x40, 0x00, 0x40, 0x00,
            0x00, 0x02, 0x01, 0x01, 0x02, 0x01, 0x26, 0xda, 0x01, 0x83, 0x7d, 0x03, 0x26, 0x26,
            0xda, 0xda, 0x83, 0x87, 0x03, 0x13, 0x13, 0xed, 0xed, 0x83, 0x87, 0x00,
        ];
        let point_counts = [0, 0, 7, 8];
        let deserialized = from_bytes(&binary_gvar, &axis_tags(), &point_counts).unwrap();
        let mut serialized = vec![];
        deserialized.to_bytes(&mut serialized, &axis_tags()).unwrap();
        // Not byte-identical (we make different sharing choices), but
        // semantically the same
        let re_deserialized = from_bytes(&serialized, &axis_tags(), &point_counts).unwrap();
        assert_eq!(re_deserialized, deserialized);
    }
}
