use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serializer,
};
use crate::otvar::{TupleVariation, TupleVariationStore};
use crate::types::*;

/// The 'cvar' OpenType tag.
pub const TAG: Tag = crate::tag!("cvar");

/// Represents a font's cvar (CVT Variations) table
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Clone)]
pub struct cvar {
    /// The tuple variations applying to the control value table
    pub variations: Vec<TupleVariation>,
}

/// Deserialize the cvar table, given the font's axis order and the number
/// of entries in the cvt table.
pub fn from_bytes(
    data: &[u8],
    axis_tags: &[Tag],
    cvt_count: usize,
) -> Result<cvar, DeserializationError> {
    let mut c = ReaderContext::new(data.to_vec());
    let _major_version: uint16 = c.de()?;
    let _minor_version: uint16 = c.de()?;
    // The store's data offset is measured from the start of the table
    let store = TupleVariationStore::from_bytes(&mut c, axis_tags, false, cvt_count, &[])?;
    Ok(cvar {
        variations: store.0,
    })
}

impl cvar {
    pub fn to_bytes(&self, data: &mut Vec<u8>, axis_tags: &[Tag]) -> Result<(), SerializationError> {
        data.put(1_u16)?;
        data.put(0_u16)?;
        let store = TupleVariationStore(self.variations.clone());
        store.to_bytes(data, axis_tags, false, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otvar::Delta;
    use crate::{btreemap, tag};

    #[test]
    fn cvar_roundtrip() {
        let axis_tags = vec![tag!("wght"), tag!("wdth")];
        let table = cvar {
            variations: vec![
                TupleVariation {
                    axes: btreemap!(tag!("wght") => (0.0, 1.0, 1.0)),
                    deltas: vec![
                        Some(Delta::Delta1D(10)),
                        None,
                        Some(Delta::Delta1D(-24)),
                        None,
                    ],
                },
                TupleVariation {
                    axes: btreemap!(tag!("wdth") => (-1.0, -1.0, 0.0)),
                    deltas: vec![None, Some(Delta::Delta1D(4)), None, None],
                },
            ],
        };
        let mut data = vec![];
        table.to_bytes(&mut data, &axis_tags).unwrap();
        let deserialized = from_bytes(&data, &axis_tags, 4).unwrap();
        assert_eq!(deserialized, table);
    }
}
