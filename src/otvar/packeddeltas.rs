//! Packed deltas within a Tuple Variation Store

use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::types::int16;

/// An array of packed deltas
///
/// This is the underlying storage for delta values in the cvar and gvar tables
#[derive(Debug, PartialEq)]
pub struct PackedDeltas(pub Vec<int16>);

/// In a run control byte, signifies that the deltas are two-byte values
const DELTAS_ARE_WORDS: u8 = 0x40;
/// In a run control byte, signifies that the deltas are zero and omitted
const DELTAS_ARE_ZERO: u8 = 0x80;
/// Mask off a run control byte to find the number of deltas in the run
const DELTA_RUN_COUNT_MASK: u8 = 0x3f;

/// Deserialize a packed deltas array from a binary buffer.
/// The number of deltas expected must be provided.
pub fn from_bytes(
    c: &mut ReaderContext,
    num_points: usize,
) -> Result<PackedDeltas, DeserializationError> {
    let mut res = vec![];
    while res.len() < num_points {
        let control_byte: u8 = c.de()?;
        let deltas_are_words = (control_byte & DELTAS_ARE_WORDS) > 0;
        // "The low 6 bits specify the number of delta values in the run minus 1."
        let run_count = (control_byte & DELTA_RUN_COUNT_MASK) + 1;
        let deltas: Vec<i16> = if control_byte & DELTAS_ARE_ZERO > 0 {
            std::iter::repeat(0).take(run_count as usize).collect()
        } else if deltas_are_words {
            c.de_counted(run_count.into())?
        } else {
            let delta_bytes: Vec<i8> = c.de_counted(run_count.into())?;
            delta_bytes.iter().map(|x| *x as i16).collect()
        };
        res.extend(deltas);
    }
    Ok(PackedDeltas(res))
}

impl Serialize for PackedDeltas {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let mut pos = 0;
        let deltas = &self.0;
        while pos < deltas.len() {
            let mut value = deltas[pos];
            if value == 0 {
                let mut run_length = 0;
                while pos < deltas.len() && deltas[pos] == 0 {
                    run_length += 1;
                    pos += 1;
                }
                while run_length >= 64 {
                    data.put(DELTAS_ARE_ZERO | 63_u8)?;
                    run_length -= 64;
                }
                if run_length > 0 {
                    data.put(DELTAS_ARE_ZERO | (run_length - 1) as u8)?;
                }
            } else if (-128..=127).contains(&value) {
                // Runs of byte values
                let mut start_of_run = pos;
                while pos < deltas.len() {
                    value = deltas[pos];
                    if !(-128..=127).contains(&value) {
                        break;
                    }
                    // Avoid a sequence of more than one zero in a run.
                    if value == 0 && pos + 1 < deltas.len() && deltas[pos + 1] == 0 {
                        break;
                    }
                    pos += 1;
                }
                let mut run_length = pos - start_of_run;
                while run_length >= 64 {
                    data.put(63_u8)?;
                    for d in &deltas[start_of_run..start_of_run + 64] {
                        data.put(*d as i8)?;
                    }
                    start_of_run += 64;
                    run_length -= 64;
                }
                if run_length > 0 {
                    data.put((run_length - 1) as u8)?;
                    for d in &deltas[start_of_run..pos] {
                        data.put(*d as i8)?;
                    }
                }
            } else {
                // Runs of word values
                let mut start_of_run = pos;
                while pos < deltas.len() {
                    value = deltas[pos];
                    // Avoid a single zero
                    if value == 0 {
                        break;
                    }
                    // Avoid a sequence of more than one byte-value in a run.
                    if (-128..=127).contains(&value)
                        && pos + 1 < deltas.len()
                        && (-128..=127).contains(&deltas[pos + 1])
                    {
                        break;
                    }
                    pos += 1;
                }
                let mut run_length = pos - start_of_run;
                while run_length >= 64 {
                    data.put(DELTAS_ARE_WORDS | 63)?;
                    for d in &deltas[start_of_run..start_of_run + 64] {
                        data.put(d)?;
                    }
                    start_of_run += 64;
                    run_length -= 64;
                }
                if run_length > 0 {
                    data.put(DELTAS_ARE_WORDS | (run_length - 1) as u8)?;
                    for d in &deltas[start_of_run..pos] {
                        data.put(d)?
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_delta_de() {
        let packed = vec![
            0x03, 0x0a, 0x97, 0x00, 0xc6, 0x87, 0x41, 0x10, 0x22, 0xfb, 0x34,
        ];
        let expected = PackedDeltas(vec![10, -105, 0, -58, 0, 0, 0, 0, 0, 0, 0, 0, 4130, -1228]);
        let deserialized = from_bytes(&mut ReaderContext::new(packed), 14).unwrap();
        assert_eq!(deserialized, expected);
    }

    #[test]
    fn test_packed_delta_ser() {
        let expected = vec![
            0x03, 0x0a, 0x97, 0x00, 0xc6, 0x87, 0x41, 0x10, 0x22, 0xfb, 0x34,
        ];
        let object = PackedDeltas(vec![10, -105, 0, -58, 0, 0, 0, 0, 0, 0, 0, 0, 4130, -1228]);
        let mut serialized = vec![];
        object.to_bytes(&mut serialized).unwrap();
        assert_eq!(serialized, expected);
    }

    #[test]
    fn test_packed_delta_66_zeros_ser() {
        let expected = vec![0xbf, 0x81];
        let object = PackedDeltas(std::iter::repeat(0).take(66).collect());
        let mut serialized = vec![];
        object.to_bytes(&mut serialized).unwrap();
        assert_eq!(serialized, expected);
    }

    #[test]
    fn test_packed_delta_word_run_roundtrip() {
        let object = PackedDeltas(std::iter::repeat(400).take(66).collect());
        let mut serialized = vec![];
        object.to_bytes(&mut serialized).unwrap();
        let deserialized = from_bytes(&mut ReaderContext::new(serialized), 66).unwrap();
        assert_eq!(deserialized, object);
    }
}
