use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::types::*;

/// The 'OS/2' OpenType tag.
pub const TAG: Tag = crate::tag!("OS/2");

/// Represents a font's OS/2 (OS/2 and Windows Metrics) table
///
/// Fields beyond version 0 are optional; which ones are present is
/// determined by the version number, and serialization expects consistency
/// (a version 2 table must carry `sxHeight` through `usMaxContext`).
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub struct os2 {
    pub version: uint16,
    pub xAvgCharWidth: int16,
    pub usWeightClass: uint16,
    pub usWidthClass: uint16,
    pub fsType: uint16,
    pub ySubscriptXSize: int16,
    pub ySubscriptYSize: int16,
    pub ySubscriptXOffset: int16,
    pub ySubscriptYOffset: int16,
    pub ySuperscriptXSize: int16,
    pub ySuperscriptYSize: int16,
    pub ySuperscriptXOffset: int16,
    pub ySuperscriptYOffset: int16,
    pub yStrikeoutSize: int16,
    pub yStrikeoutPosition: int16,
    pub sFamilyClass: int16,
    pub panose: [u8; 10],
    pub ulUnicodeRange1: uint32,
    pub ulUnicodeRange2: uint32,
    pub ulUnicodeRange3: uint32,
    pub ulUnicodeRange4: uint32,
    pub achVendID: Tag,
    pub fsSelection: uint16,
    pub usFirstCharIndex: uint16,
    pub usLastCharIndex: uint16,
    pub sTypoAscender: int16,
    pub sTypoDescender: int16,
    pub sTypoLineGap: int16,
    pub usWinAscent: uint16,
    pub usWinDescent: uint16,
    pub ulCodePageRange1: Option<uint32>,
    pub ulCodePageRange2: Option<uint32>,
    pub sxHeight: Option<int16>,
    pub sCapHeight: Option<int16>,
    pub usDefaultChar: Option<uint16>,
    pub usBreakChar: Option<uint16>,
    pub usMaxContext: Option<uint16>,
    pub usLowerOpticalPointSize: Option<uint16>,
    pub usUpperOpticalPointSize: Option<uint16>,
}

impl os2 {
    pub fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let version: uint16 = c.de()?;
        let x_avg_char_width = c.de()?;
        let us_weight_class = c.de()?;
        let us_width_class = c.de()?;
        let fs_type = c.de()?;
        let y_subscript_x_size = c.de()?;
        let y_subscript_y_size = c.de()?;
        let y_subscript_x_offset = c.de()?;
        let y_subscript_y_offset = c.de()?;
        let y_superscript_x_size = c.de()?;
        let y_superscript_y_size = c.de()?;
        let y_superscript_x_offset = c.de()?;
        let y_superscript_y_offset = c.de()?;
        let y_strikeout_size = c.de()?;
        let y_strikeout_position = c.de()?;
        let s_family_class = c.de()?;
        let mut panose = [0_u8; 10];
        for slot in panose.iter_mut() {
            *slot = c.de()?;
        }
        Ok(os2 {
            version,
            xAvgCharWidth: x_avg_char_width,
            usWeightClass: us_weight_class,
            usWidthClass: us_width_class,
            fsType: fs_type,
            ySubscriptXSize: y_subscript_x_size,
            ySubscriptYSize: y_subscript_y_size,
            ySubscriptXOffset: y_subscript_x_offset,
            ySubscriptYOffset: y_subscript_y_offset,
            ySuperscriptXSize: y_superscript_x_size,
            ySuperscriptYSize: y_superscript_y_size,
            ySuperscriptXOffset: y_superscript_x_offset,
            ySuperscriptYOffset: y_superscript_y_offset,
            yStrikeoutSize: y_strikeout_size,
            yStrikeoutPosition: y_strikeout_position,
            sFamilyClass: s_family_class,
            panose,
            ulUnicodeRange1: c.de()?,
            ulUnicodeRange2: c.de()?,
            ulUnicodeRange3: c.de()?,
            ulUnicodeRange4: c.de()?,
            achVendID: c.de()?,
            fsSelection: c.de()?,
            usFirstCharIndex: c.de()?,
            usLastCharIndex: c.de()?,
            sTypoAscender: c.de()?,
            sTypoDescender: c.de()?,
            sTypoLineGap: c.de()?,
            usWinAscent: c.de()?,
            usWinDescent: c.de()?,
            ulCodePageRange1: if version >= 1 { Some(c.de()?) } else { None },
            ulCodePageRange2: if version >= 1 { Some(c.de()?) } else { None },
            sxHeight: if version >= 2 { Some(c.de()?) } else { None },
            sCapHeight: if version >= 2 { Some(c.de()?) } else { None },
            usDefaultChar: if version >= 2 { Some(c.de()?) } else { None },
            usBreakChar: if version >= 2 { Some(c.de()?) } else { None },
            usMaxContext: if version >= 2 { Some(c.de()?) } else { None },
            usLowerOpticalPointSize: if version >= 5 { Some(c.de()?) } else { None },
            usUpperOpticalPointSize: if version >= 5 { Some(c.de()?) } else { None },
        })
    }
}

impl Serialize for os2 {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let version_field = |name: &str, field: Option<()>| -> Result<(), SerializationError> {
            field.ok_or_else(|| {
                SerializationError(format!(
                    "OS/2 version {} requires the {} field",
                    self.version, name
                ))
            })
        };
        data.put(self.version)?;
        data.put(self.xAvgCharWidth)?;
        data.put(self.usWeightClass)?;
        data.put(self.usWidthClass)?;
        data.put(self.fsType)?;
        data.put(self.ySubscriptXSize)?;
        data.put(self.ySubscriptYSize)?;
        data.put(self.ySubscriptXOffset)?;
        data.put(self.ySubscriptYOffset)?;
        data.put(self.ySuperscriptXSize)?;
        data.put(self.ySuperscriptYSize)?;
        data.put(self.ySuperscriptXOffset)?;
        data.put(self.ySuperscriptYOffset)?;
        data.put(self.yStrikeoutSize)?;
        data.put(self.yStrikeoutPosition)?;
        data.put(self.sFamilyClass)?;
        data.extend_from_slice(&self.panose);
        data.put(self.ulUnicodeRange1)?;
        data.put(self.ulUnicodeRange2)?;
        data.put(self.ulUnicodeRange3)?;
        data.put(self.ulUnicodeRange4)?;
        data.put(self.achVendID)?;
        data.put(self.fsSelection)?;
        data.put(self.usFirstCharIndex)?;
        data.put(self.usLastCharIndex)?;
        data.put(self.sTypoAscender)?;
        data.put(self.sTypoDescender)?;
        data.put(self.sTypoLineGap)?;
        data.put(self.usWinAscent)?;
        data.put(self.usWinDescent)?;
        if self.version >= 1 {
            version_field("ulCodePageRange1", self.ulCodePageRange1.map(|_| ()))?;
            data.put(self.ulCodePageRange1.unwrap())?;
            data.put(self.ulCodePageRange2.unwrap_or(0))?;
        }
        if self.version >= 2 {
            version_field("sxHeight", self.sxHeight.map(|_| ()))?;
            data.put(self.sxHeight.unwrap())?;
            data.put(self.sCapHeight.unwrap_or(0))?;
            data.put(self.usDefaultChar.unwrap_or(0))?;
            data.put(self.usBreakChar.unwrap_or(0))?;
            data.put(self.usMaxContext.unwrap_or(0))?;
        }
        if self.version >= 5 {
            version_field(
                "usLowerOpticalPointSize",
                self.usLowerOpticalPointSize.map(|_| ()),
            )?;
            data.put(self.usLowerOpticalPointSize.unwrap())?;
            data.put(self.usUpperOpticalPointSize.unwrap_or(0))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;

    pub(crate) fn test_os2(version: uint16) -> os2 {
        os2 {
            version,
            xAvgCharWidth: 500,
            usWeightClass: 400,
            usWidthClass: 5,
            fsType: 0,
            ySubscriptXSize: 650,
            ySubscriptYSize: 600,
            ySubscriptXOffset: 0,
            ySubscriptYOffset: 75,
            ySuperscriptXSize: 650,
            ySuperscriptYSize: 600,
            ySuperscriptXOffset: 0,
            ySuperscriptYOffset: 350,
            yStrikeoutSize: 50,
            yStrikeoutPosition: 300,
            sFamilyClass: 0,
            panose: [2, 0, 5, 3, 0, 0, 0, 0, 0, 0],
            ulUnicodeRange1: 1,
            ulUnicodeRange2: 0,
            ulUnicodeRange3: 0,
            ulUnicodeRange4: 0,
            achVendID: tag!("NONE"),
            fsSelection: 0x40,
            usFirstCharIndex: 32,
            usLastCharIndex: 0x7E,
            sTypoAscender: 800,
            sTypoDescender: -200,
            sTypoLineGap: 200,
            usWinAscent: 1000,
            usWinDescent: 250,
            ulCodePageRange1: if version >= 1 { Some(1) } else { None },
            ulCodePageRange2: if version >= 1 { Some(0) } else { None },
            sxHeight: if version >= 2 { Some(500) } else { None },
            sCapHeight: if version >= 2 { Some(700) } else { None },
            usDefaultChar: if version >= 2 { Some(0) } else { None },
            usBreakChar: if version >= 2 { Some(32) } else { None },
            usMaxContext: if version >= 2 { Some(3) } else { None },
            usLowerOpticalPointSize: None,
            usUpperOpticalPointSize: None,
        }
    }

    #[test]
    fn os2_roundtrip_v4() {
        let table = test_os2(4);
        let mut data = vec![];
        table.to_bytes(&mut data).unwrap();
        let deserialized = os2::from_bytes(&mut ReaderContext::new(data)).unwrap();
        assert_eq!(deserialized, table);
    }

    #[test]
    fn os2_roundtrip_v0() {
        let table = test_os2(0);
        let mut data = vec![];
        table.to_bytes(&mut data).unwrap();
        assert_eq!(data.len(), 78);
        let deserialized = os2::from_bytes(&mut ReaderContext::new(data)).unwrap();
        assert_eq!(deserialized, table);
    }
}
