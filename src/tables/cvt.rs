use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::types::*;

/// The 'cvt ' OpenType tag.
pub const TAG: Tag = crate::tag!("cvt ");

/// Represents a font's cvt (Control Value) table
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Clone)]
pub struct cvt {
    pub values: Vec<FWORD>,
}

impl cvt {
    pub fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let mut values = vec![];
        while c.ptr + 2 <= c.input.len() {
            let value: FWORD = c.de()?;
            values.push(value);
        }
        Ok(cvt { values })
    }
}

impl Serialize for cvt {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        for value in &self.values {
            data.put(*value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cvt_roundtrip() {
        let binary_cvt = vec![
            0x00, 0x18, 0x00, 0x18, 0x01, 0x93, 0xff, 0xf7, 0x00, 0x4b, 0x00, 0x67,
        ];
        let deserialized = cvt::from_bytes(&mut ReaderContext::new(binary_cvt.clone())).unwrap();
        assert_eq!(deserialized.values, vec![24, 24, 403, -9, 75, 103]);
        let mut serialized = vec![];
        deserialized.to_bytes(&mut serialized).unwrap();
        assert_eq!(serialized, binary_cvt);
    }
}
