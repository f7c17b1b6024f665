use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::types::*;

/// The 'avar' OpenType tag.
pub const TAG: Tag = crate::tag!("avar");

/// A piecewise-linear remapping of one axis's normalized values
#[derive(Debug, PartialEq, Clone)]
pub struct SegmentMap(pub Vec<(f32, f32)>);

/// Represents a font's avar (Axis Variations) table
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Clone)]
pub struct avar {
    /// One segment map per axis, in fvar axis order
    pub maps: Vec<SegmentMap>,
}

impl SegmentMap {
    /// Creates a new segment map from an array of tuples. These tuples
    /// must be in normalized coordinates, and *must* include entries for
    /// `-1.0,-1.0`, `0.0,0.0` and `1.0,1.0`.
    pub fn new(items: Vec<(f32, f32)>) -> Self {
        let new_thing = SegmentMap(items);
        if !new_thing.is_valid() {
            panic!("Created an invalid segment map {:?}", new_thing);
        }
        new_thing
    }

    /// Map a (normalized, i.e. `-1.0<=val<=1.0`) value using this segment map.
    pub fn piecewise_linear_map(&self, val: f32) -> f32 {
        let from: Vec<f32> = self.0.iter().map(|x| x.0).collect();
        let to: Vec<f32> = self.0.iter().map(|x| x.1).collect();
        if val <= -1.0 {
            return -1.0;
        }
        if val >= 1.0 {
            return 1.0;
        }
        if let Some(ix) = from.iter().position(|&r| (r - val).abs() < f32::EPSILON) {
            return to[ix];
        }
        if let Some(ix) = from.iter().position(|&r| r > val) {
            let a = from[ix - 1];
            let b = from[ix];
            let va = to[ix - 1];
            let vb = to[ix];
            va + (vb - va) * (val - a) / (b - a)
        } else {
            panic!("Can't happen")
        }
    }

    /// Check that this segment map is valid.
    /// This means that it contains entries for -1,0,1 and that the entries are in order
    pub fn is_valid(&self) -> bool {
        let mut saw_zero = 0;
        let mut saw_minus1 = 0;
        let mut saw_plus1 = 0;
        let mut prev_to_coordinate = -2.0;
        for map in &self.0 {
            let (from, to) = (map.0, map.1);
            if from == 0.0 && to == 0.0 {
                saw_zero += 1;
            }
            if (from - -1.0).abs() < f32::EPSILON && (to - -1.0).abs() < f32::EPSILON {
                saw_minus1 += 1;
            }
            if (from - 1.0).abs() < f32::EPSILON && (to - 1.0).abs() < f32::EPSILON {
                saw_plus1 += 1;
            }

            // Check for sortedness
            if to < prev_to_coordinate {
                return false;
            }
            prev_to_coordinate = to;
        }
        if saw_zero != 1 || saw_plus1 != 1 || saw_minus1 != 1 {
            return false;
        }
        true
    }
}

impl avar {
    pub fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let _major_version: uint16 = c.de()?;
        let _minor_version: uint16 = c.de()?;
        let _reserved: uint16 = c.de()?;
        let axis_count: uint16 = c.de()?;
        let mut maps = Vec::with_capacity(axis_count as usize);
        for _ in 0..axis_count {
            let position_map_count: uint16 = c.de()?;
            let mut mappings = Vec::with_capacity(position_map_count as usize);
            for _ in 0..position_map_count {
                let from: int16 = c.de()?;
                let to: int16 = c.de()?;
                mappings.push((F2DOT14::unpack(from), F2DOT14::unpack(to)));
            }
            maps.push(SegmentMap(mappings));
        }
        Ok(avar { maps })
    }
}

impl Serialize for avar {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(1_u16)?;
        data.put(0_u16)?;
        data.put(0_u16)?;
        data.put(self.maps.len() as uint16)?;
        for map in &self.maps {
            data.put(map.0.len() as uint16)?;
            for (from, to) in &map.0 {
                data.put(F2DOT14::pack(*from))?;
                data.put(F2DOT14::pack(*to))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piecewise_linear_map() {
        let seg = SegmentMap::new(vec![
            (-1.0, -1.0),
            (0.0, 0.0),
            (0.125, 0.11444092),
            (0.25, 0.23492432),
            (0.5, 0.3554077),
            (0.625, 0.5),
            (0.75, 0.6566162),
            (0.875, 0.8192749),
            (1.0, 1.0),
        ]);
        assert!((seg.piecewise_linear_map(-2.5) - -1.0).abs() < f32::EPSILON);
        assert!((seg.piecewise_linear_map(0.0) - 0.0).abs() < f32::EPSILON);
        assert!((seg.piecewise_linear_map(1.0) - 1.0).abs() < f32::EPSILON);
        assert!((seg.piecewise_linear_map(2.0) - 1.0).abs() < f32::EPSILON);
        assert!((seg.piecewise_linear_map(0.625) - 0.5).abs() < f32::EPSILON);
        assert!((seg.piecewise_linear_map(0.6) - 0.47108155).abs() < f32::EPSILON);
    }

    #[test]
    fn avar_roundtrip() {
        let favar = avar {
            maps: vec![
                SegmentMap::new(vec![
                    (-1.0, -1.0),
                    (0.0, 0.0),
                    (0.5, 0.375),
                    (1.0, 1.0),
                ]),
                SegmentMap::new(vec![(-1.0, -1.0), (0.0, 0.0), (1.0, 1.0)]),
            ],
        };
        let mut data = vec![];
        favar.to_bytes(&mut data).unwrap();
        let deserialized = avar::from_bytes(&mut ReaderContext::new(data)).unwrap();
        assert_eq!(deserialized, favar);
        assert!(deserialized.maps.iter().all(|m| m.is_valid()));
    }
}
