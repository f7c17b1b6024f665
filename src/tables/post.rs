use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::types::*;

/// The 'post' OpenType tag.
pub const TAG: Tag = crate::tag!("post");

/// Represents a font's post (PostScript) table
///
/// Only the header fields are modelled; the version 2.0 glyph-name data is
/// carried as opaque bytes and written back untouched.
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub struct post {
    pub version: f32,
    pub italicAngle: f32,
    pub underlinePosition: FWORD,
    pub underlineThickness: FWORD,
    pub isFixedPitch: uint32,
    pub minMemType42: uint32,
    pub maxMemType42: uint32,
    pub minMemType1: uint32,
    pub maxMemType1: uint32,
    /// Glyph name data for version 2.0 tables, kept unparsed
    pub glyph_data: Vec<u8>,
}

impl post {
    pub fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let table = post {
            version: Fixed::unpack(c.de()?),
            italicAngle: Fixed::unpack(c.de()?),
            underlinePosition: c.de()?,
            underlineThickness: c.de()?,
            isFixedPitch: c.de()?,
            minMemType42: c.de()?,
            maxMemType42: c.de()?,
            minMemType1: c.de()?,
            maxMemType1: c.de()?,
            glyph_data: c.input[c.ptr..].to_vec(),
        };
        c.ptr = c.input.len();
        Ok(table)
    }
}

impl Serialize for post {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(Fixed::pack(self.version))?;
        data.put(Fixed::pack(self.italicAngle))?;
        data.put(self.underlinePosition)?;
        data.put(self.underlineThickness)?;
        data.put(self.isFixedPitch)?;
        data.put(self.minMemType42)?;
        data.put(self.maxMemType42)?;
        data.put(self.minMemType1)?;
        data.put(self.maxMemType1)?;
        data.extend_from_slice(&self.glyph_data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_roundtrip() {
        let table = post {
            version: 2.0,
            italicAngle: 0.0,
            underlinePosition: -75,
            underlineThickness: 50,
            isFixedPitch: 0,
            minMemType42: 0,
            maxMemType42: 0,
            minMemType1: 0,
            maxMemType1: 0,
            glyph_data: vec![0x00, 0x02, 0x00, 0x00, 0x00, 0x03],
        };
        let mut data = vec![];
        table.to_bytes(&mut data).unwrap();
        let deserialized = post::from_bytes(&mut ReaderContext::new(data)).unwrap();
        assert_eq!(deserialized, table);
    }
}
