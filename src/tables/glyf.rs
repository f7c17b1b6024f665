use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize, Serializer,
};
use crate::types::*;
use bitflags::bitflags;
use itertools::izip;
use kurbo::Affine;

/// The 'glyf' OpenType tag.
pub const TAG: Tag = crate::tag!("glyf");

bitflags! {
    struct SimpleGlyphFlags: u8 {
        const ON_CURVE_POINT = 0x01;
        const X_SHORT_VECTOR = 0x02;
        const Y_SHORT_VECTOR = 0x04;
        const REPEAT_FLAG = 0x08;
        const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR = 0x10;
        const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR = 0x20;
        const OVERLAP_SIMPLE = 0x40;
        const RESERVED = 0x80;
    }
}

bitflags! {
    /// Flags used when serializing/deserializing a component.
    ///
    /// Most of these are computed automatically on serialization.
    pub struct ComponentFlags: u16 {
        const ARG_1_AND_2_ARE_WORDS = 0x0001;
        const ARGS_ARE_XY_VALUES = 0x0002;
        const ROUND_XY_TO_GRID = 0x0004;
        const WE_HAVE_A_SCALE = 0x0008;
        const MORE_COMPONENTS = 0x0020;
        const WE_HAVE_AN_X_AND_Y_SCALE = 0x0040;
        const WE_HAVE_A_TWO_BY_TWO = 0x0080;
        const WE_HAVE_INSTRUCTIONS = 0x0100;
        const USE_MY_METRICS = 0x0200;
        const OVERLAP_COMPOUND = 0x0400;
        const SCALED_COMPONENT_OFFSET = 0x0800;
        const UNSCALED_COMPONENT_OFFSET = 0x1000;
    }
}

/// Represents a point inside a glyph contour
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Point {
    /// x-coordinate
    pub x: int16,
    /// y-coordinate
    pub y: int16,
    /// Is this an on-curve point?
    pub on_curve: bool,
}

/// A high-level representation of a component within a glyph
#[derive(Debug, PartialEq, Clone)]
pub struct Component {
    /// The glyph ID that this component references.
    pub glyph_index: uint16,
    /// An affine transformation applied to the component's contours.
    pub transformation: Affine,
    /// Alternate, and rarely used, method of positioning components using
    /// contour point numbers.
    pub match_points: Option<(uint16, uint16)>,
    /// Flags.
    ///
    /// Of these, only `ROUND_XY_TO_GRID`, `USE_MY_METRICS`,
    /// `SCALED_COMPONENT_OFFSET`, `UNSCALED_COMPONENT_OFFSET` and
    /// `OVERLAP_COMPOUND` are meaningful to set by hand; the rest are
    /// recomputed on serialization.
    pub flags: ComponentFlags,
}

impl Component {
    /// Move this component by a variation delta, preserving its linear
    /// transform. The resulting offset is rounded to font units.
    pub fn apply_delta(&mut self, dx: f32, dy: f32) {
        let [xx, yx, xy, yy, e, f] = self.transformation.as_coeffs();
        self.transformation = Affine::new([
            xx,
            yx,
            xy,
            yy,
            ot_round(e as f32 + dx) as f64,
            ot_round(f as f32 + dy) as f64,
        ]);
    }

    fn recompute_flags(&self, more: bool, instructions: bool) -> ComponentFlags {
        let mut flags = self.flags
            & (ComponentFlags::ROUND_XY_TO_GRID
                | ComponentFlags::USE_MY_METRICS
                | ComponentFlags::SCALED_COMPONENT_OFFSET
                | ComponentFlags::UNSCALED_COMPONENT_OFFSET
                | ComponentFlags::OVERLAP_COMPOUND);
        if more {
            flags |= ComponentFlags::MORE_COMPONENTS;
        } else if instructions {
            flags |= ComponentFlags::WE_HAVE_INSTRUCTIONS;
        }
        let [x_scale, scale01, scale10, y_scale, translate_x, translate_y] =
            self.transformation.as_coeffs();
        if let Some((x, y)) = self.match_points {
            if !(x <= 255 && y <= 255) {
                flags |= ComponentFlags::ARG_1_AND_2_ARE_WORDS;
            }
        } else {
            flags |= ComponentFlags::ARGS_ARE_XY_VALUES;
            if !((-128.0..=127.0).contains(&translate_x)
                && (-128.0..=127.0).contains(&translate_y))
            {
                flags |= ComponentFlags::ARG_1_AND_2_ARE_WORDS;
            }
        }
        if scale01 != 0.0 || scale10 != 0.0 {
            flags |= ComponentFlags::WE_HAVE_A_TWO_BY_TWO;
        } else if (x_scale - y_scale).abs() > f64::EPSILON {
            flags |= ComponentFlags::WE_HAVE_AN_X_AND_Y_SCALE;
        } else if (x_scale - 1.0).abs() > f64::EPSILON {
            flags |= ComponentFlags::WE_HAVE_A_SCALE;
        }
        flags
    }

    fn from_bytes(c: &mut ReaderContext) -> Result<(Self, bool, bool), DeserializationError> {
        let flags = ComponentFlags::from_bits_truncate(c.de()?);
        let glyph_index: uint16 = c.de()?;
        let mut match_points: Option<(uint16, uint16)> = None;
        let mut x_offset = 0_i16;
        let mut y_offset = 0_i16;
        if !flags.contains(ComponentFlags::ARGS_ARE_XY_VALUES) {
            if flags.contains(ComponentFlags::ARG_1_AND_2_ARE_WORDS) {
                let p1: u16 = c.de()?;
                let p2: u16 = c.de()?;
                match_points = Some((p1, p2));
            } else {
                let p1: u8 = c.de()?;
                let p2: u8 = c.de()?;
                match_points = Some((p1.into(), p2.into()));
            }
        } else if flags.contains(ComponentFlags::ARG_1_AND_2_ARE_WORDS) {
            x_offset = c.de()?;
            y_offset = c.de()?;
        } else {
            let x: i8 = c.de()?;
            let y: i8 = c.de()?;
            x_offset = x.into();
            y_offset = y.into();
        }
        let mut x_scale = 1.0_f64;
        let mut scale01 = 0.0_f64;
        let mut scale10 = 0.0_f64;
        let mut y_scale = 1.0_f64;
        let f2dot14 = |c: &mut ReaderContext| -> Result<f64, DeserializationError> {
            let v: int16 = c.de()?;
            Ok(F2DOT14::unpack(v) as f64)
        };
        if flags.contains(ComponentFlags::WE_HAVE_A_SCALE) {
            x_scale = f2dot14(c)?;
            y_scale = x_scale;
        } else if flags.contains(ComponentFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            x_scale = f2dot14(c)?;
            y_scale = f2dot14(c)?;
        } else if flags.contains(ComponentFlags::WE_HAVE_A_TWO_BY_TWO) {
            x_scale = f2dot14(c)?;
            scale01 = f2dot14(c)?;
            scale10 = f2dot14(c)?;
            y_scale = f2dot14(c)?;
        }
        let transformation = Affine::new([
            x_scale,
            scale01,
            scale10,
            y_scale,
            x_offset as f64,
            y_offset as f64,
        ]);
        // Only the flags which are not recomputed on serialization are
        // retained
        let kept_flags = flags
            & (ComponentFlags::ROUND_XY_TO_GRID
                | ComponentFlags::USE_MY_METRICS
                | ComponentFlags::SCALED_COMPONENT_OFFSET
                | ComponentFlags::UNSCALED_COMPONENT_OFFSET
                | ComponentFlags::OVERLAP_COMPOUND);
        Ok((
            Component {
                glyph_index,
                transformation,
                match_points,
                flags: kept_flags,
            },
            flags.contains(ComponentFlags::MORE_COMPONENTS),
            flags.contains(ComponentFlags::WE_HAVE_INSTRUCTIONS),
        ))
    }

    fn to_bytes(
        &self,
        data: &mut Vec<u8>,
        more: bool,
        instructions: bool,
    ) -> Result<(), SerializationError> {
        let flags = self.recompute_flags(more, instructions);
        data.put(flags.bits())?;
        data.put(self.glyph_index)?;
        let [x_scale, scale01, scale10, y_scale, translate_x, translate_y] =
            self.transformation.as_coeffs();
        if let Some((p1, p2)) = self.match_points {
            if flags.contains(ComponentFlags::ARG_1_AND_2_ARE_WORDS) {
                data.put(p1)?;
                data.put(p2)?;
            } else {
                data.put(p1 as u8)?;
                data.put(p2 as u8)?;
            }
        } else if flags.contains(ComponentFlags::ARG_1_AND_2_ARE_WORDS) {
            data.put(translate_x as i16)?;
            data.put(translate_y as i16)?;
        } else {
            data.put(translate_x as i8)?;
            data.put(translate_y as i8)?;
        }
        if flags.contains(ComponentFlags::WE_HAVE_A_TWO_BY_TWO) {
            data.put(F2DOT14::pack(x_scale as f32))?;
            data.put(F2DOT14::pack(scale01 as f32))?;
            data.put(F2DOT14::pack(scale10 as f32))?;
            data.put(F2DOT14::pack(y_scale as f32))?;
        } else if flags.contains(ComponentFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            data.put(F2DOT14::pack(x_scale as f32))?;
            data.put(F2DOT14::pack(y_scale as f32))?;
        } else if flags.contains(ComponentFlags::WE_HAVE_A_SCALE) {
            data.put(F2DOT14::pack(x_scale as f32))?;
        }
        Ok(())
    }
}

/// A higher-level representation of a TrueType outline glyph
#[allow(non_snake_case)]
#[derive(Debug, PartialEq, Clone)]
pub struct Glyph {
    /// The minimum X coordinate of points within this glyph
    pub xMin: int16,
    /// The minimum Y coordinate of points within this glyph
    pub yMin: int16,
    /// The maximum X coordinate of points within this glyph
    pub xMax: int16,
    /// The maximum Y coordinate of points within this glyph
    pub yMax: int16,
    /// A list of contours, each a list of `Point`s
    pub contours: Vec<Vec<Point>>,
    /// TrueType instructions (binary)
    pub instructions: Vec<u8>,
    /// Components, if this is a composite glyph
    pub components: Vec<Component>,
    /// Whether the outline is marked as overlapping
    pub overlap: bool,
}

impl Default for Glyph {
    fn default() -> Self {
        Glyph {
            xMin: 0,
            yMin: 0,
            xMax: 0,
            yMax: 0,
            contours: vec![],
            instructions: vec![],
            components: vec![],
            overlap: false,
        }
    }
}

impl Glyph {
    /// Returns true if this glyph has any components
    pub fn has_components(&self) -> bool {
        !self.components.is_empty()
    }

    /// Returns true if this glyph has no outline content at all
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty() && self.components.is_empty()
    }

    /// The number of outline points (not including phantom points)
    pub fn num_points(&self) -> usize {
        self.contours.iter().map(|c| c.len()).sum()
    }

    /// The number of deltas a gvar tuple for this glyph carries: outline
    /// points, one pseudo-point per component, plus four phantom points.
    pub fn gvar_point_count(&self) -> usize {
        self.num_points() + self.components.len() + 4
    }

    /// Base coordinates and contour-end indices in the layout used by the
    /// gvar table: outline points, then one pseudo-point per component
    /// (carrying its translation), then the four phantom points.
    pub fn gvar_coords_and_ends(&self) -> (Vec<(int16, int16)>, Vec<usize>) {
        let mut ends: Vec<usize> = self
            .contours
            .iter()
            .map(|c| c.len())
            .scan(0, |acc, x| {
                *acc += x;
                Some(*acc - 1)
            })
            .collect();

        let mut coords: Vec<(int16, int16)> = self
            .contours
            .iter()
            .flatten()
            .map(|pt| (pt.x, pt.y))
            .collect();
        for comp in &self.components {
            let [_, _, _, _, translate_x, translate_y] = comp.transformation.as_coeffs();
            coords.push((translate_x as i16, translate_y as i16));
            ends.push(ends.iter().max().map(|x| x + 1).unwrap_or(0));
        }

        for _ in 0..4 {
            coords.push((0, 0));
            ends.push(ends.iter().max().map(|x| x + 1).unwrap_or(0));
        }
        (coords, ends)
    }

    fn end_points(&self) -> Vec<uint16> {
        let mut count = 0;
        let mut end_points = Vec::new();
        for contour in &self.contours {
            count += contour.len();
            end_points.push(count as uint16 - 1);
        }
        end_points
    }

    /// Recompute this glyph's bounding box from its own points.
    ///
    /// Composite bounds need the component glyphs and are handled by
    /// [`glyf::recalc_bounds`].
    pub fn recalc_simple_bounds(&mut self) {
        if self.contours.is_empty() {
            self.xMin = 0;
            self.yMin = 0;
            self.xMax = 0;
            self.yMax = 0;
            return;
        }
        self.xMin = self.contours.iter().flatten().map(|p| p.x).min().unwrap();
        self.xMax = self.contours.iter().flatten().map(|p| p.x).max().unwrap();
        self.yMin = self.contours.iter().flatten().map(|p| p.y).min().unwrap();
        self.yMax = self.contours.iter().flatten().map(|p| p.y).max().unwrap();
    }

    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let num_contours: i16 = c.de()?;
        let x_min: int16 = c.de()?;
        let y_min: int16 = c.de()?;
        let x_max: int16 = c.de()?;
        let y_max: int16 = c.de()?;
        let mut components: Vec<Component> = vec![];
        let mut instructions: Vec<u8> = vec![];
        let mut contours: Vec<Vec<Point>> = vec![];
        let mut overlap = false;
        if num_contours < 0 {
            let mut has_instructions = false;
            loop {
                let (comp, has_more, instr) = Component::from_bytes(c)?;
                if comp.flags.contains(ComponentFlags::OVERLAP_COMPOUND) {
                    overlap = true;
                }
                if instr {
                    has_instructions = true;
                }
                components.push(comp);
                if !has_more {
                    break;
                }
            }
            if has_instructions {
                let instruction_count: uint16 = c.de()?;
                instructions = c.de_counted(instruction_count as usize)?;
            }
        } else {
            let mut end_pts_of_contour: Vec<usize> = (0..num_contours as usize)
                .map(|_| {
                    let end: Result<uint16, DeserializationError> = c.de();
                    end.map(|x| 1 + x as usize)
                })
                .collect::<Result<Vec<usize>, DeserializationError>>()?;
            let instruction_count: uint16 = c.de()?;
            instructions = c.de_counted(instruction_count as usize)?;
            let num_points = *end_pts_of_contour.last().unwrap_or(&0);
            let mut flags: Vec<SimpleGlyphFlags> = Vec::with_capacity(num_points);
            while flags.len() < num_points {
                let flag = SimpleGlyphFlags::from_bits_truncate(c.de()?);
                flags.push(flag);
                if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                    let repeat_count: u8 = c.de()?;
                    for _ in 0..repeat_count {
                        flags.push(flag);
                    }
                }
            }
            let mut x_coords: Vec<int16> = Vec::with_capacity(num_points);
            let mut y_coords: Vec<int16> = Vec::with_capacity(num_points);
            let mut last_x = 0_i16;
            let mut last_y = 0_i16;
            for flag in &flags {
                if flag.contains(SimpleGlyphFlags::X_SHORT_VECTOR) {
                    let coord: u8 = c.de()?;
                    if flag.contains(SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR) {
                        last_x += coord as i16;
                    } else {
                        last_x -= coord as i16;
                    }
                } else if !flag.contains(SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR) {
                    let coord: i16 = c.de()?;
                    last_x += coord;
                }
                x_coords.push(last_x);
            }
            for flag in &flags {
                if flag.contains(SimpleGlyphFlags::Y_SHORT_VECTOR) {
                    let coord: u8 = c.de()?;
                    if flag.contains(SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR) {
                        last_y += coord as i16;
                    } else {
                        last_y -= coord as i16;
                    }
                } else if !flag.contains(SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR) {
                    let coord: i16 = c.de()?;
                    last_y += coord;
                }
                y_coords.push(last_y);
                if flag.contains(SimpleGlyphFlags::OVERLAP_SIMPLE) {
                    overlap = true;
                }
            }
            let points: Vec<Point> = izip!(&x_coords, &y_coords, &flags)
                .map(|(x, y, flag)| Point {
                    x: *x,
                    y: *y,
                    on_curve: flag.contains(SimpleGlyphFlags::ON_CURVE_POINT),
                })
                .collect();
            end_pts_of_contour.insert(0, 0);
            for window in end_pts_of_contour.windows(2) {
                contours.push(points[window[0]..window[1]].to_vec());
            }
        }
        Ok(Glyph {
            xMin: x_min,
            yMin: y_min,
            xMax: x_max,
            yMax: y_max,
            contours,
            instructions,
            components,
            overlap,
        })
    }
}

impl Serialize for Glyph {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        if self.is_empty() {
            return Ok(());
        }
        if self.has_components() {
            data.put(-1_i16)?;
            data.put(self.xMin)?;
            data.put(self.yMin)?;
            data.put(self.xMax)?;
            data.put(self.yMax)?;
            let has_instructions = !self.instructions.is_empty();
            for (ix, comp) in self.components.iter().enumerate() {
                let more = ix < self.components.len() - 1;
                comp.to_bytes(data, more, has_instructions)?;
            }
            if has_instructions {
                data.put(self.instructions.len() as uint16)?;
                data.extend_from_slice(&self.instructions);
            }
        } else {
            data.put(self.contours.len() as int16)?;
            data.put(self.xMin)?;
            data.put(self.yMin)?;
            data.put(self.xMax)?;
            data.put(self.yMax)?;
            for end in self.end_points() {
                data.put(end)?;
            }
            data.put(self.instructions.len() as uint16)?;
            data.extend_from_slice(&self.instructions);
            // Flags and coordinates, without run compression
            let points: Vec<&Point> = self.contours.iter().flatten().collect();
            let mut flags: Vec<SimpleGlyphFlags> = Vec::with_capacity(points.len());
            let mut x_bytes: Vec<u8> = vec![];
            let mut y_bytes: Vec<u8> = vec![];
            let mut last_x = 0_i16;
            let mut last_y = 0_i16;
            for (ix, point) in points.iter().enumerate() {
                let mut flag = if point.on_curve {
                    SimpleGlyphFlags::ON_CURVE_POINT
                } else {
                    SimpleGlyphFlags::empty()
                };
                if ix == 0 && self.overlap {
                    flag |= SimpleGlyphFlags::OVERLAP_SIMPLE;
                }
                let dx = point.x - last_x;
                let dy = point.y - last_y;
                if dx == 0 {
                    flag |= SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR;
                } else if (-255..=255).contains(&dx) {
                    flag |= SimpleGlyphFlags::X_SHORT_VECTOR;
                    if dx > 0 {
                        flag |= SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR;
                    }
                    x_bytes.push(dx.unsigned_abs() as u8);
                } else {
                    x_bytes.extend_from_slice(&dx.to_be_bytes());
                }
                if dy == 0 {
                    flag |= SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR;
                } else if (-255..=255).contains(&dy) {
                    flag |= SimpleGlyphFlags::Y_SHORT_VECTOR;
                    if dy > 0 {
                        flag |= SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR;
                    }
                    y_bytes.push(dy.unsigned_abs() as u8);
                } else {
                    y_bytes.extend_from_slice(&dy.to_be_bytes());
                }
                flags.push(flag);
                last_x = point.x;
                last_y = point.y;
            }
            for flag in flags {
                data.put(flag.bits())?;
            }
            data.extend(x_bytes);
            data.extend(y_bytes);
        }
        Ok(())
    }
}

/// Represents a font's glyf (Glyph Data) table
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Clone)]
pub struct glyf {
    /// The glyphs in this font, in glyph-id order
    pub glyphs: Vec<Glyph>,
}

impl glyf {
    /// Nesting depth of a glyph: 0 for simple glyphs, one more than the
    /// deepest component for composites. Used to order glyphs so that
    /// composites are processed after their bases.
    pub fn composite_depth(&self, glyph_id: usize) -> usize {
        self.composite_depth_impl(glyph_id, 0)
    }

    fn composite_depth_impl(&self, glyph_id: usize, nesting: usize) -> usize {
        // A cycle of components is broken arbitrarily
        if nesting > self.glyphs.len() {
            return nesting;
        }
        match self.glyphs.get(glyph_id) {
            Some(glyph) if glyph.has_components() => {
                1 + glyph
                    .components
                    .iter()
                    .map(|comp| self.composite_depth_impl(comp.glyph_index as usize, nesting + 1))
                    .max()
                    .unwrap()
            }
            _ => 0,
        }
    }

    /// Recompute the bounding box of one glyph. Simple glyphs use their own
    /// points; composites transform each component glyph's box, which is
    /// only correct once the components themselves are up to date.
    pub fn recalc_bounds(&mut self, glyph_id: usize) {
        if self
            .glyphs
            .get(glyph_id)
            .map_or(true, |g| !g.has_components())
        {
            if let Some(glyph) = self.glyphs.get_mut(glyph_id) {
                glyph.recalc_simple_bounds();
            }
            return;
        }
        let glyph = &self.glyphs[glyph_id];
        let mut corners: Vec<(f64, f64)> = vec![];
        for comp in &glyph.components {
            let child = match self.glyphs.get(comp.glyph_index as usize) {
                Some(child) if !child.is_empty() => child,
                _ => continue,
            };
            for &(x, y) in &[
                (child.xMin, child.yMin),
                (child.xMin, child.yMax),
                (child.xMax, child.yMin),
                (child.xMax, child.yMax),
            ] {
                let pt = comp.transformation * kurbo::Point::new(x as f64, y as f64);
                corners.push((pt.x, pt.y));
            }
        }
        let bounds = if corners.is_empty() {
            (0, 0, 0, 0)
        } else {
            (
                corners.iter().map(|p| p.0.round() as int16).min().unwrap(),
                corners.iter().map(|p| p.1.round() as int16).min().unwrap(),
                corners.iter().map(|p| p.0.round() as int16).max().unwrap(),
                corners.iter().map(|p| p.1.round() as int16).max().unwrap(),
            )
        };
        let glyph = &mut self.glyphs[glyph_id];
        glyph.xMin = bounds.0;
        glyph.yMin = bounds.1;
        glyph.xMax = bounds.2;
        glyph.yMax = bounds.3;
    }

    /// Deserialize the glyf table, given the offsets from a loca table.
    pub fn from_bytes(data: &[u8], loca_offsets: &[u32]) -> Result<Self, DeserializationError> {
        let mut glyphs = vec![];
        for window in loca_offsets.windows(2) {
            let (start, end) = (window[0] as usize, window[1] as usize);
            if start == end {
                glyphs.push(Glyph::default());
                continue;
            }
            if end > data.len() || start > end {
                return Err(DeserializationError("Bad loca offset".to_string()));
            }
            let mut c = ReaderContext::new(data[start..end].to_vec());
            glyphs.push(Glyph::from_bytes(&mut c)?);
        }
        Ok(glyf { glyphs })
    }

    /// Serialize the glyf table, returning its bytes and the loca offsets
    /// for the companion loca table.
    pub fn to_bytes(&self) -> Result<(Vec<u8>, Vec<u32>), SerializationError> {
        let mut data: Vec<u8> = vec![];
        let mut offsets: Vec<u32> = Vec::with_capacity(self.glyphs.len() + 1);
        for glyph in &self.glyphs {
            offsets.push(data.len() as u32);
            glyph.to_bytes(&mut data)?;
            // Keep glyph offsets even so the short loca format stays usable
            if data.len() % 2 != 0 {
                data.push(0);
            }
        }
        offsets.push(data.len() as u32);
        Ok((data, offsets))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn square_glyph() -> Glyph {
        Glyph {
            xMin: 0,
            yMin: 0,
            xMax: 10,
            yMax: 10,
            contours: vec![vec![
                Point {
                    x: 0,
                    y: 0,
                    on_curve: true,
                },
                Point {
                    x: 10,
                    y: 0,
                    on_curve: true,
                },
                Point {
                    x: 10,
                    y: 10,
                    on_curve: true,
                },
                Point {
                    x: 0,
                    y: 10,
                    on_curve: true,
                },
            ]],
            instructions: vec![],
            components: vec![],
            overlap: false,
        }
    }

    #[test]
    fn simple_glyph_roundtrip() {
        let glyph = square_glyph();
        let mut data = vec![];
        glyph.to_bytes(&mut data).unwrap();
        let deserialized = Glyph::from_bytes(&mut ReaderContext::new(data)).unwrap();
        assert_eq!(deserialized, glyph);
    }

    #[test]
    fn composite_glyph_roundtrip() {
        let glyph = Glyph {
            xMin: 0,
            yMin: 0,
            xMax: 10,
            yMax: 10,
            contours: vec![],
            instructions: vec![],
            components: vec![
                Component {
                    glyph_index: 1,
                    transformation: Affine::translate((30.0, -200.0)),
                    match_points: None,
                    flags: ComponentFlags::empty(),
                },
                Component {
                    glyph_index: 2,
                    transformation: Affine::new([0.5, 0.0, 0.0, 0.5, 10.0, 10.0]),
                    match_points: None,
                    flags: ComponentFlags::empty(),
                },
            ],
            overlap: false,
        };
        let mut data = vec![];
        glyph.to_bytes(&mut data).unwrap();
        let deserialized = Glyph::from_bytes(&mut ReaderContext::new(data)).unwrap();
        assert_eq!(deserialized, glyph);
    }

    #[test]
    fn glyf_table_roundtrip() {
        let table = glyf {
            glyphs: vec![
                Glyph::default(),
                square_glyph(),
                Glyph {
                    components: vec![Component {
                        glyph_index: 1,
                        transformation: Affine::translate((100.0, 0.0)),
                        match_points: None,
                        flags: ComponentFlags::empty(),
                    }],
                    xMin: 100,
                    yMin: 0,
                    xMax: 110,
                    yMax: 10,
                    ..Default::default()
                },
            ],
        };
        let (data, offsets) = table.to_bytes().unwrap();
        assert_eq!(offsets.len(), 4);
        assert_eq!(offsets[0], 0);
        // Empty glyphs take no space at all
        assert_eq!(offsets[1], 0);
        let deserialized = glyf::from_bytes(&data, &offsets).unwrap();
        assert_eq!(deserialized, table);
    }

    #[test]
    fn composite_depth_ordering() {
        let table = glyf {
            glyphs: vec![
                square_glyph(),
                Glyph {
                    components: vec![Component {
                        glyph_index: 0,
                        transformation: Affine::IDENTITY,
                        match_points: None,
                        flags: ComponentFlags::empty(),
                    }],
                    ..Default::default()
                },
                Glyph {
                    components: vec![Component {
                        glyph_index: 1,
                        transformation: Affine::IDENTITY,
                        match_points: None,
                        flags: ComponentFlags::empty(),
                    }],
                    ..Default::default()
                },
            ],
        };
        assert_eq!(table.composite_depth(0), 0);
        assert_eq!(table.composite_depth(1), 1);
        assert_eq!(table.composite_depth(2), 2);
    }

    #[test]
    fn composite_bounds_from_components() {
        let mut table = glyf {
            glyphs: vec![
                square_glyph(),
                Glyph {
                    components: vec![Component {
                        glyph_index: 0,
                        transformation: Affine::translate((100.0, 50.0)),
                        match_points: None,
                        flags: ComponentFlags::empty(),
                    }],
                    ..Default::default()
                },
            ],
        };
        table.recalc_bounds(1);
        let composite = &table.glyphs[1];
        assert_eq!(
            (
                composite.xMin,
                composite.yMin,
                composite.xMax,
                composite.yMax
            ),
            (100, 50, 110, 60)
        );
    }

    #[test]
    fn gvar_layout() {
        let glyph = square_glyph();
        let (coords, ends) = glyph.gvar_coords_and_ends();
        // 4 outline points plus 4 phantom points
        assert_eq!(coords.len(), 8);
        assert_eq!(ends, vec![3, 4, 5, 6, 7]);
        assert_eq!(glyph.gvar_point_count(), 8);
    }
}
