use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::otvar::ItemVariationStore;
use crate::types::*;

/// The 'MVAR' OpenType tag.
pub const TAG: Tag = crate::tag!("MVAR");

/// Associates a metric value with an entry in the item variation store
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub struct ValueRecord {
    /// Which metric this record varies (`hasc`, `undo`, ...)
    pub valueTag: Tag,
    /// Variation index into the store: data block in the high word, item
    /// in the low word
    pub varIdx: uint32,
}

/// Represents a font's MVAR (Metrics Variations) table
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Clone)]
pub struct MVAR {
    /// The value records, sorted by tag
    pub value_records: Vec<ValueRecord>,
    /// The item variation store holding the deltas
    pub store: ItemVariationStore,
}

impl MVAR {
    pub fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        c.push();
        let _major_version: uint16 = c.de()?;
        let _minor_version: uint16 = c.de()?;
        let _reserved: uint16 = c.de()?;
        let value_record_size: uint16 = c.de()?;
        let value_record_count: uint16 = c.de()?;
        let store_offset: uint16 = c.de()?;
        let mut value_records = Vec::with_capacity(value_record_count as usize);
        for i in 0..value_record_count {
            c.ptr = c.top_of_table() + 12 + (i as usize * value_record_size as usize);
            let value_tag: Tag = c.de()?;
            let outer: uint16 = c.de()?;
            let inner: uint16 = c.de()?;
            value_records.push(ValueRecord {
                valueTag: value_tag,
                varIdx: ((outer as uint32) << 16) | inner as uint32,
            });
        }
        c.ptr = c.top_of_table() + store_offset as usize;
        let store = ItemVariationStore::from_bytes(c)?;
        c.pop();
        Ok(MVAR {
            value_records,
            store,
        })
    }
}

impl Serialize for MVAR {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(1_u16)?;
        data.put(0_u16)?;
        data.put(0_u16)?;
        data.put(8_u16)?; // valueRecordSize
        data.put(self.value_records.len() as uint16)?;
        data.put((12 + 8 * self.value_records.len()) as uint16)?;
        for record in &self.value_records {
            data.put(record.valueTag)?;
            data.put((record.varIdx >> 16) as uint16)?;
            data.put((record.varIdx & 0xFFFF) as uint16)?;
        }
        self.store.to_bytes(data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::otvar::{ItemVariationData, RegionAxisCoordinates};
    use crate::tag;

    pub(crate) fn test_mvar() -> MVAR {
        MVAR {
            value_records: vec![
                ValueRecord {
                    valueTag: tag!("hasc"),
                    varIdx: 0x00000000,
                },
                ValueRecord {
                    valueTag: tag!("undo"),
                    varIdx: 0x00000001,
                },
            ],
            store: ItemVariationStore {
                format: 1,
                axisCount: 1,
                variationRegions: vec![vec![RegionAxisCoordinates {
                    startCoord: 0.0,
                    peakCoord: 1.0,
                    endCoord: 1.0,
                }]],
                variationData: vec![ItemVariationData {
                    region_indexes: vec![0],
                    delta_values: vec![vec![30], vec![-12]],
                }],
            },
        }
    }

    #[test]
    fn mvar_roundtrip() {
        let table = test_mvar();
        let mut data = vec![];
        table.to_bytes(&mut data).unwrap();
        let deserialized = MVAR::from_bytes(&mut ReaderContext::new(data)).unwrap();
        assert_eq!(deserialized, table);
    }
}
