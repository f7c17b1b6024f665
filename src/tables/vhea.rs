use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::types::*;

/// The 'vhea' OpenType tag.
pub const TAG: Tag = crate::tag!("vhea");

/// Represents a font's vhea (Vertical Header) table
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub struct vhea {
    pub version: f32,
    pub ascent: FWORD,
    pub descent: FWORD,
    pub lineGap: FWORD,
    pub advanceHeightMax: int16,
    pub minTopSideBearing: int16,
    pub minBottomSideBearing: int16,
    pub yMaxExtent: int16,
    pub caretSlopeRise: int16,
    pub caretSlopeRun: int16,
    pub caretOffset: int16,
    pub reserved0: int16,
    pub reserved1: int16,
    pub reserved2: int16,
    pub reserved3: int16,
    pub metricDataFormat: int16,
    pub numOfLongVerMetrics: uint16,
}

impl vhea {
    pub fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        Ok(vhea {
            version: Fixed::unpack(c.de()?),
            ascent: c.de()?,
            descent: c.de()?,
            lineGap: c.de()?,
            advanceHeightMax: c.de()?,
            minTopSideBearing: c.de()?,
            minBottomSideBearing: c.de()?,
            yMaxExtent: c.de()?,
            caretSlopeRise: c.de()?,
            caretSlopeRun: c.de()?,
            caretOffset: c.de()?,
            reserved0: c.de()?,
            reserved1: c.de()?,
            reserved2: c.de()?,
            reserved3: c.de()?,
            metricDataFormat: c.de()?,
            numOfLongVerMetrics: c.de()?,
        })
    }
}

impl Serialize for vhea {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(Fixed::pack(self.version))?;
        data.put(self.ascent)?;
        data.put(self.descent)?;
        data.put(self.lineGap)?;
        data.put(self.advanceHeightMax)?;
        data.put(self.minTopSideBearing)?;
        data.put(self.minBottomSideBearing)?;
        data.put(self.yMaxExtent)?;
        data.put(self.caretSlopeRise)?;
        data.put(self.caretSlopeRun)?;
        data.put(self.caretOffset)?;
        data.put(self.reserved0)?;
        data.put(self.reserved1)?;
        data.put(self.reserved2)?;
        data.put(self.reserved3)?;
        data.put(self.metricDataFormat)?;
        data.put(self.numOfLongVerMetrics)?;
        Ok(())
    }
}
