use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::types::*;

/// The 'fvar' OpenType tag.
pub const TAG: Tag = crate::tag!("fvar");

/// A single axis of variation
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub struct VariationAxisRecord {
    /// The identifying tag of this axis
    pub axisTag: Tag,
    /// The minimum value of this axis, in user space
    pub minValue: f32,
    /// The default position of this axis, in user space
    pub defaultValue: f32,
    /// The maximum value of this axis, in user space
    pub maxValue: f32,
    /// Flags (hidden axis, etc.)
    pub flags: uint16,
    /// The name table ID for this axis's name
    pub axisNameID: uint16,
}

impl VariationAxisRecord {
    /// The `(min, default, max)` triple used for normalization.
    pub fn triple(&self) -> (f32, f32, f32) {
        (self.minValue, self.defaultValue, self.maxValue)
    }
}

impl VariationAxisRecord {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        Ok(VariationAxisRecord {
            axisTag: c.de()?,
            minValue: Fixed::unpack(c.de()?),
            defaultValue: Fixed::unpack(c.de()?),
            maxValue: Fixed::unpack(c.de()?),
            flags: c.de()?,
            axisNameID: c.de()?,
        })
    }

    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(self.axisTag)?;
        data.put(Fixed::pack(self.minValue))?;
        data.put(Fixed::pack(self.defaultValue))?;
        data.put(Fixed::pack(self.maxValue))?;
        data.put(self.flags)?;
        data.put(self.axisNameID)?;
        Ok(())
    }
}

/// Struct representing a named instance within the variable font's design space
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub struct InstanceRecord {
    /// The name ID for entries in the 'name' table that provide subfamily names for this instance.
    pub subfamilyNameID: uint16,
    /// Flags (unused)
    pub flags: uint16,
    /// Location of this instance in the design space.
    pub coordinates: Tuple,
    /// The name ID for entries in the 'name' table that provide PostScript names for this instance.
    pub postscriptNameID: Option<uint16>,
}

impl InstanceRecord {
    fn from_bytes(
        c: &mut ReaderContext,
        axis_count: uint16,
        has_postscript_name_id: bool,
    ) -> Result<Self, DeserializationError> {
        let subfamily_name_id = c.de()?;
        let flags: uint16 = c.de()?;
        let raw_coordinates: Vec<i32> = c.de_counted(axis_count.into())?;
        let coordinates: Vec<f32> = raw_coordinates.iter().map(|x| Fixed::unpack(*x)).collect();
        let postscript_name_id: Option<uint16> = if has_postscript_name_id {
            Some(c.de()?)
        } else {
            None
        };
        Ok(InstanceRecord {
            subfamilyNameID: subfamily_name_id,
            flags,
            coordinates,
            postscriptNameID: postscript_name_id,
        })
    }
}

/// Represents a font's fvar (Font Variations) table
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Clone)]
pub struct fvar {
    /// The font's axes of variation
    pub axes: Vec<VariationAxisRecord>,
    /// Any named instances within the design space
    pub instances: Vec<InstanceRecord>,
}

impl fvar {
    /// The font's axis tags, in axis order.
    pub fn axis_tags(&self) -> Vec<Tag> {
        self.axes.iter().map(|axis| axis.axisTag).collect()
    }

    /// Number of axes of variation.
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    pub fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        c.push();
        let _major_version: uint16 = c.de()?;
        let _minor_version: uint16 = c.de()?;
        let axes_array_offset: uint16 = c.de()?;
        let _reserved: uint16 = c.de()?;
        let axis_count: uint16 = c.de()?;
        let _axis_size: uint16 = c.de()?;
        let instance_count: uint16 = c.de()?;
        let instance_size: uint16 = c.de()?;

        c.ptr = c.top_of_table() + axes_array_offset as usize;
        let mut axes = Vec::with_capacity(axis_count as usize);
        for _ in 0..axis_count {
            axes.push(VariationAxisRecord::from_bytes(c)?);
        }
        let has_postscript_name_id = instance_size == axis_count * 4 + 6;
        let mut instances = Vec::with_capacity(instance_count as usize);
        for _ in 0..instance_count {
            instances.push(InstanceRecord::from_bytes(
                c,
                axis_count,
                has_postscript_name_id,
            )?);
        }
        c.pop();
        Ok(fvar { axes, instances })
    }
}

impl Serialize for fvar {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let has_postscript_name_id = self.instances.iter().any(|x| x.postscriptNameID.is_some());
        if has_postscript_name_id && !self.instances.iter().all(|x| x.postscriptNameID.is_some()) {
            return Err(SerializationError(
                "Inconsistent use of postscriptNameID in fvar instances".to_string(),
            ));
        }
        data.put(1_u16)?; // major
        data.put(0_u16)?; // minor
        data.put(16_u16)?; // axesArrayOffset
        data.put(2_u16)?; // reserved
        data.put(self.axes.len() as uint16)?;
        data.put(20_u16)?; // axisSize
        data.put(self.instances.len() as uint16)?;
        data.put((self.axes.len() * 4 + if has_postscript_name_id { 6 } else { 4 }) as uint16)?;
        for axis in &self.axes {
            axis.to_bytes(data)?;
        }
        for instance in &self.instances {
            data.put(instance.subfamilyNameID)?;
            data.put(0_u16)?;
            for coord in &instance.coordinates {
                data.put(Fixed::pack(*coord))?;
            }
            if has_postscript_name_id {
                data.put(instance.postscriptNameID.unwrap())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;

    #[test]
    fn fvar_roundtrip() {
        let ffvar = fvar {
            axes: vec![
                VariationAxisRecord {
                    axisTag: tag!("wght"),
                    flags: 0,
                    minValue: 200.0,
                    defaultValue: 200.0,
                    maxValue: 1000.0,
                    axisNameID: 256,
                },
                VariationAxisRecord {
                    axisTag: tag!("ital"),
                    flags: 0,
                    minValue: 0.0,
                    defaultValue: 0.0,
                    maxValue: 9.0,
                    axisNameID: 257,
                },
            ],
            instances: vec![
                InstanceRecord {
                    subfamilyNameID: 17,
                    flags: 0,
                    coordinates: vec![200.0, 0.0],
                    postscriptNameID: None,
                },
                InstanceRecord {
                    subfamilyNameID: 258,
                    flags: 0,
                    coordinates: vec![300.0, 9.0],
                    postscriptNameID: None,
                },
            ],
        };
        let mut data = vec![];
        ffvar.to_bytes(&mut data).unwrap();
        let deserialized = fvar::from_bytes(&mut ReaderContext::new(data)).unwrap();
        assert_eq!(deserialized, ffvar);
        assert_eq!(deserialized.axis_tags(), vec![tag!("wght"), tag!("ital")]);
    }

    #[test]
    fn fvar_binary_fixture() {
        // Two axes, no instances, no postscript name IDs
        let binary_fvar = vec![
            0x00, 0x01, 0x00, 0x00, 0x00, 0x10, 0x00, 0x02, 0x00, 0x02, 0x00, 0x14, 0x00, 0x00,
            0x00, 0x0c, 0x77, 0x67, 0x68, 0x74, 0x00, 0xc8, 0x00, 0x00, 0x00, 0xc8, 0x00, 0x00,
            0x03, 0xe8, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x69, 0x74, 0x61, 0x6c, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01,
        ];
        let deserialized = fvar::from_bytes(&mut ReaderContext::new(binary_fvar)).unwrap();
        assert_eq!(deserialized.axes.len(), 2);
        assert_eq!(deserialized.axes[0].axisTag, tag!("wght"));
        assert_eq!(deserialized.axes[0].minValue, 200.0);
        assert_eq!(deserialized.axes[0].maxValue, 1000.0);
        assert_eq!(deserialized.axes[1].axisTag, tag!("ital"));
        assert_eq!(deserialized.axes[1].maxValue, 9.0);
        assert!(deserialized.instances.is_empty());
    }
}
