//! Packed point numbers within a Tuple Variation Store
//!
//! Each tuple variation may apply to all points in a glyph, or to an
//! explicit subset, stored as a count followed by runs of point-number
//! deltas.

use crate::binary::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serialize,
    Serializer,
};
use crate::types::uint16;

/// In a run control byte, signifies that the point number deltas are two-byte values
const POINTS_ARE_WORDS: u8 = 0x80;
/// Mask off a run control byte to find the number of points in the run
const POINT_RUN_COUNT_MASK: u8 = 0x7f;

/// An array of packed point numbers
///
/// `None` means "all points in the glyph" (serialized as a zero count).
#[derive(Debug, PartialEq, Clone)]
pub struct PackedPoints {
    pub points: Option<Vec<uint16>>,
}

impl Deserialize for PackedPoints {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let first: u8 = c.de()?;
        let count: uint16 = if first > 127 {
            let second: u8 = c.de()?;
            ((first as uint16 & 0x7f) << 8) + second as uint16
        } else {
            first as uint16
        };
        if count == 0 {
            return Ok(PackedPoints { points: None });
        }
        let mut points: Vec<uint16> = Vec::with_capacity(count as usize);
        let mut last = 0_u16;
        while points.len() < count as usize {
            let control: u8 = c.de()?;
            let run_count = (control & POINT_RUN_COUNT_MASK) as usize + 1;
            for _ in 0..run_count {
                let delta: uint16 = if control & POINTS_ARE_WORDS > 0 {
                    c.de()?
                } else {
                    let b: u8 = c.de()?;
                    b as uint16
                };
                last = last.wrapping_add(delta);
                points.push(last);
                if points.len() == count as usize {
                    break;
                }
            }
        }
        Ok(PackedPoints {
            points: Some(points),
        })
    }
}

impl Serialize for PackedPoints {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let points = match &self.points {
            None => {
                data.put(0_u8)?;
                return Ok(());
            }
            Some(points) => points,
        };
        let count = points.len() as uint16;
        if count < 0x80 {
            data.put(count as u8)?;
        } else {
            data.put((0x80 | (count >> 8)) as u8)?;
            data.put((count & 0xff) as u8)?;
        }
        let mut deltas: Vec<uint16> = Vec::with_capacity(points.len());
        let mut last = 0_u16;
        for point in points {
            deltas.push(point.wrapping_sub(last));
            last = *point;
        }
        let mut pos = 0;
        while pos < deltas.len() {
            let as_words = deltas[pos] > 0xff;
            let mut run_length = 0;
            while pos + run_length < deltas.len()
                && run_length < 128
                && (deltas[pos + run_length] > 0xff) == as_words
            {
                run_length += 1;
            }
            let mut control = (run_length - 1) as u8;
            if as_words {
                control |= POINTS_ARE_WORDS;
            }
            data.put(control)?;
            for delta in &deltas[pos..pos + run_length] {
                if as_words {
                    data.put(*delta)?;
                } else {
                    data.put(*delta as u8)?;
                }
            }
            pos += run_length;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(pp: &PackedPoints) -> PackedPoints {
        let mut data = vec![];
        pp.to_bytes(&mut data).unwrap();
        let mut rc = ReaderContext::new(data);
        rc.de().unwrap()
    }

    #[test]
    fn all_points() {
        let pp = PackedPoints { points: None };
        let mut data = vec![];
        pp.to_bytes(&mut data).unwrap();
        assert_eq!(data, vec![0]);
        assert_eq!(roundtrip(&pp), pp);
    }

    #[test]
    fn small_point_set() {
        let pp = PackedPoints {
            points: Some(vec![1, 2, 3, 10]),
        };
        let mut data = vec![];
        pp.to_bytes(&mut data).unwrap();
        // count, control (4 byte deltas), 1 +1 +1 +7
        assert_eq!(data, vec![4, 3, 1, 1, 1, 7]);
        assert_eq!(roundtrip(&pp), pp);
    }

    #[test]
    fn word_deltas() {
        let pp = PackedPoints {
            points: Some(vec![0, 1000, 1001]),
        };
        assert_eq!(roundtrip(&pp), pp);
    }

    #[test]
    fn long_point_set() {
        let points: Vec<u16> = (0..300).map(|x| x * 2).collect();
        let pp = PackedPoints {
            points: Some(points),
        };
        assert_eq!(roundtrip(&pp), pp);
    }
}
