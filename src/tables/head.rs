use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::types::*;

/// The 'head' OpenType tag.
pub const TAG: Tag = crate::tag!("head");

/// Represents a font's head (Header) table
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub struct head {
    pub majorVersion: uint16,
    pub minorVersion: uint16,
    pub fontRevision: f32,
    pub checksumAdjustment: uint32,
    pub magicNumber: uint32,
    pub flags: uint16,
    pub unitsPerEm: uint16,
    /// Creation time, in seconds since 1904-01-01 midnight
    pub created: i64,
    /// Modification time, in seconds since 1904-01-01 midnight
    pub modified: i64,
    pub xMin: int16,
    pub yMin: int16,
    pub xMax: int16,
    pub yMax: int16,
    pub macStyle: uint16,
    pub lowestRecPPEM: uint16,
    pub fontDirectionHint: int16,
    pub indexToLocFormat: int16,
    pub glyphDataFormat: int16,
}

impl head {
    pub fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let table = head {
            majorVersion: c.de()?,
            minorVersion: c.de()?,
            fontRevision: Fixed::unpack(c.de()?),
            checksumAdjustment: c.de()?,
            magicNumber: c.de()?,
            flags: c.de()?,
            unitsPerEm: c.de()?,
            created: c.de()?,
            modified: c.de()?,
            xMin: c.de()?,
            yMin: c.de()?,
            xMax: c.de()?,
            yMax: c.de()?,
            macStyle: c.de()?,
            lowestRecPPEM: c.de()?,
            fontDirectionHint: c.de()?,
            indexToLocFormat: c.de()?,
            glyphDataFormat: c.de()?,
        };
        if table.magicNumber != 0x5F0F3CF5 {
            return Err(DeserializationError(
                "Bad magic number in head table".to_string(),
            ));
        }
        Ok(table)
    }
}

impl Serialize for head {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(self.majorVersion)?;
        data.put(self.minorVersion)?;
        data.put(Fixed::pack(self.fontRevision))?;
        data.put(self.checksumAdjustment)?;
        data.put(self.magicNumber)?;
        data.put(self.flags)?;
        data.put(self.unitsPerEm)?;
        data.put(self.created)?;
        data.put(self.modified)?;
        data.put(self.xMin)?;
        data.put(self.yMin)?;
        data.put(self.xMax)?;
        data.put(self.yMax)?;
        data.put(self.macStyle)?;
        data.put(self.lowestRecPPEM)?;
        data.put(self.fontDirectionHint)?;
        data.put(self.indexToLocFormat)?;
        data.put(self.glyphDataFormat)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_roundtrip() {
        let table = head {
            majorVersion: 1,
            minorVersion: 0,
            fontRevision: 1.0,
            checksumAdjustment: 0xaf8fe61,
            magicNumber: 0x5F0F3CF5,
            flags: 0x000b,
            unitsPerEm: 1000,
            created: 3862967290,
            modified: 3874413311,
            xMin: -200,
            yMin: -305,
            xMax: 1594,
            yMax: 1068,
            macStyle: 0,
            lowestRecPPEM: 9,
            fontDirectionHint: 2,
            indexToLocFormat: 0,
            glyphDataFormat: 0,
        };
        let mut data = vec![];
        table.to_bytes(&mut data).unwrap();
        assert_eq!(data.len(), 54);
        let deserialized = head::from_bytes(&mut ReaderContext::new(data)).unwrap();
        assert_eq!(deserialized, table);
    }
}
