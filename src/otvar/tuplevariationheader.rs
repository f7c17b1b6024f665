//! Headers locating variation data within a Tuple Variation Store
//!
//! These are low-level structures used only during (de)serialization of
//! the `gvar` and `cvar` tables.

use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::types::{int16, uint16, F2DOT14, Tuple};
use bitflags::bitflags;

bitflags! {
    /// Flags used internally to a tuple variation header
    pub struct TupleIndexFlags: u16 {
        /// This header contains its own peak tuple (rather than a shared tuple)
        const EMBEDDED_PEAK_TUPLE = 0x8000;
        /// This header contains a start tuple and end tuple
        const INTERMEDIATE_REGION = 0x4000;
        /// This header has its own set of point numbers (rather than shared points)
        const PRIVATE_POINT_NUMBERS = 0x2000;
        /// Masks off flags to reveal the shared tuple index
        const TUPLE_INDEX_MASK = 0x0FFF;
    }
}

/// A tuple variation header
///
/// Used to locate a set of deltas within the design space.
#[derive(Debug, PartialEq)]
pub struct TupleVariationHeader {
    /// Size in bytes of the serialized data for this tuple (point numbers
    /// and deltas)
    pub size: uint16,
    /// Flags (including the shared tuple index)
    pub flags: TupleIndexFlags,
    /// The index into the Tuple Variation Store's shared tuple array to be
    /// used if this header does not define its own peak tuple.
    pub sharedTupleIndex: uint16,
    /// The location at which this set of deltas has maximum effect.
    pub peakTuple: Option<Tuple>,
    /// The start location for this delta region.
    pub startTuple: Option<Tuple>,
    /// The end location for this delta region.
    pub endTuple: Option<Tuple>,
}

impl TupleVariationHeader {
    pub fn from_bytes(
        c: &mut ReaderContext,
        axis_count: uint16,
    ) -> Result<Self, DeserializationError> {
        let mut res = TupleVariationHeader {
            size: 0,
            flags: TupleIndexFlags::empty(),
            sharedTupleIndex: 0,
            peakTuple: None,
            startTuple: None,
            endTuple: None,
        };
        res.size = c.de()?;
        let packed: uint16 = c.de()?;
        res.flags = TupleIndexFlags::from_bits_truncate(packed);
        res.sharedTupleIndex = packed & TupleIndexFlags::TUPLE_INDEX_MASK.bits();
        let read_tuple = |c: &mut ReaderContext| -> Result<Tuple, DeserializationError> {
            let coords: Vec<int16> = c.de_counted(axis_count as usize)?;
            Ok(coords.iter().map(|x| F2DOT14::unpack(*x)).collect())
        };
        if res.flags.contains(TupleIndexFlags::EMBEDDED_PEAK_TUPLE) {
            res.peakTuple = Some(read_tuple(c)?);
        }
        if res.flags.contains(TupleIndexFlags::INTERMEDIATE_REGION) {
            res.startTuple = Some(read_tuple(c)?);
            res.endTuple = Some(read_tuple(c)?);
        }
        Ok(res)
    }
}

impl Serialize for TupleVariationHeader {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(self.size)?;
        data.put(
            (self.flags.bits() & !TupleIndexFlags::TUPLE_INDEX_MASK.bits())
                | (self.sharedTupleIndex & TupleIndexFlags::TUPLE_INDEX_MASK.bits()),
        )?;
        if self.flags.contains(TupleIndexFlags::EMBEDDED_PEAK_TUPLE) {
            for coord in self.peakTuple.as_ref().expect("peak tuple flagged but absent") {
                data.put(F2DOT14::pack(*coord))?;
            }
        }
        if self.flags.contains(TupleIndexFlags::INTERMEDIATE_REGION) {
            for coord in self.startTuple.as_ref().expect("start tuple flagged but absent") {
                data.put(F2DOT14::pack(*coord))?;
            }
            for coord in self.endTuple.as_ref().expect("end tuple flagged but absent") {
                data.put(F2DOT14::pack(*coord))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let header = TupleVariationHeader {
            size: 12,
            flags: TupleIndexFlags::EMBEDDED_PEAK_TUPLE
                | TupleIndexFlags::INTERMEDIATE_REGION
                | TupleIndexFlags::PRIVATE_POINT_NUMBERS,
            sharedTupleIndex: 0,
            peakTuple: Some(vec![1.0, -0.5]),
            startTuple: Some(vec![0.0, -1.0]),
            endTuple: Some(vec![1.0, 0.0]),
        };
        let mut data = vec![];
        header.to_bytes(&mut data).unwrap();
        let deserialized =
            TupleVariationHeader::from_bytes(&mut ReaderContext::new(data), 2).unwrap();
        assert_eq!(deserialized, header);
    }

    #[test]
    fn header_shared_tuple() {
        // 0x2003: private point numbers plus shared tuple index 3
        let data = vec![0x00, 0x08, 0x20, 0x03];
        let header = TupleVariationHeader::from_bytes(&mut ReaderContext::new(data), 2).unwrap();
        assert_eq!(header.size, 8);
        assert_eq!(header.sharedTupleIndex, 3);
        assert!(header.peakTuple.is_none());
        assert!(header
            .flags
            .contains(TupleIndexFlags::PRIVATE_POINT_NUMBERS));
    }
}
