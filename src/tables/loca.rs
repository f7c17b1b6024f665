use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serializer,
};
use crate::types::*;

/// The 'loca' OpenType tag.
pub const TAG: Tag = crate::tag!("loca");

/// Represents a font's loca (Index to Location) table
///
/// This is consumed when reading the `glyf` table and regenerated when
/// writing it; offsets are kept unscaled (actual byte offsets).
#[derive(Debug, PartialEq, Clone)]
pub struct loca {
    pub indices: Vec<u32>,
}

pub fn from_bytes(c: &mut ReaderContext, is_32bit: bool) -> Result<loca, DeserializationError> {
    let mut indices = vec![];
    if is_32bit {
        while c.ptr + 4 <= c.input.len() {
            let offset: u32 = c.de()?;
            indices.push(offset);
        }
    } else {
        while c.ptr + 2 <= c.input.len() {
            let offset: u16 = c.de()?;
            indices.push(offset as u32 * 2);
        }
    }
    Ok(loca { indices })
}

/// Serialize glyph offsets, choosing the short format when possible.
///
/// Returns the bytes and the indexToLocFormat value to record in `head`.
pub fn to_bytes(indices: &[u32]) -> Result<(Vec<u8>, int16), SerializationError> {
    let mut data = vec![];
    let is_32bit = indices.last().copied().unwrap_or(0) > 0x1FFFE;
    if is_32bit {
        for offset in indices {
            data.put(*offset)?;
        }
        Ok((data, 1))
    } else {
        for offset in indices {
            data.put((offset / 2) as u16)?;
        }
        Ok((data, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loca_short_roundtrip() {
        let indices = vec![0, 100, 100, 256];
        let (data, format) = to_bytes(&indices).unwrap();
        assert_eq!(format, 0);
        let deserialized = from_bytes(&mut ReaderContext::new(data), false).unwrap();
        assert_eq!(deserialized.indices, indices);
    }

    #[test]
    fn loca_long_when_needed() {
        let indices = vec![0, 0x20000, 0x20004];
        let (data, format) = to_bytes(&indices).unwrap();
        assert_eq!(format, 1);
        let deserialized = from_bytes(&mut ReaderContext::new(data), true).unwrap();
        assert_eq!(deserialized.indices, indices);
    }
}
