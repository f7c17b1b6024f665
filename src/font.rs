//! The in-memory font object and the sfnt container around it.
//!
//! A [`Font`] is a map from table tag to [`Table`]. Tables the instancer
//! understands are decoded into structured form on load (in dependency
//! order: `head` before `loca` before `glyf` before `gvar`, and so on);
//! everything else is carried as raw bytes and written back untouched.

use crate::binary::{
    DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize,
};
use crate::error::InstancerError;
use crate::tables::layout::LayoutTable;
use crate::tables::{avar, cvar, cvt, fvar, glyf, gvar, head, hhea, loca, os2, post, vhea, MVAR};
use crate::types::{uint16, uint32, Tag};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The 'GSUB' OpenType tag.
pub const GSUB_TAG: Tag = crate::tag!("GSUB");
/// The 'GPOS' OpenType tag.
pub const GPOS_TAG: Tag = crate::tag!("GPOS");
/// The 'HVAR' OpenType tag.
pub const HVAR_TAG: Tag = crate::tag!("HVAR");

/// A single table within a font
#[derive(Debug, PartialEq, Clone)]
pub enum Table {
    Avar(avar::avar),
    Cvar(cvar::cvar),
    Cvt(cvt::cvt),
    Fvar(fvar::fvar),
    Glyf(glyf::glyf),
    Gpos(LayoutTable),
    Gsub(LayoutTable),
    Gvar(gvar::gvar),
    Head(head::head),
    Hhea(hhea::hhea),
    Mvar(MVAR::MVAR),
    Os2(os2::os2),
    Post(post::post),
    Vhea(vhea::vhea),
    /// Any table this crate does not model structurally
    Unknown(Vec<u8>),
}

/// An OpenType font: a collection of tables
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Font {
    pub tables: BTreeMap<Tag, Table>,
}

macro_rules! table_accessor {
    ($getter:ident, $getter_mut:ident, $tag:expr, $variant:ident, $ty:ty) => {
        pub fn $getter(&self) -> Option<&$ty> {
            match self.tables.get(&$tag) {
                Some(Table::$variant(table)) => Some(table),
                _ => None,
            }
        }

        pub fn $getter_mut(&mut self) -> Option<&mut $ty> {
            match self.tables.get_mut(&$tag) {
                Some(Table::$variant(table)) => Some(table),
                _ => None,
            }
        }
    };
}

#[allow(missing_docs)]
impl Font {
    pub fn new() -> Self {
        Font {
            tables: BTreeMap::new(),
        }
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.tables.contains_key(tag)
    }

    pub fn remove(&mut self, tag: Tag) -> Option<Table> {
        self.tables.remove(&tag)
    }

    table_accessor!(fvar, fvar_mut, fvar::TAG, Fvar, fvar::fvar);
    table_accessor!(avar, avar_mut, avar::TAG, Avar, avar::avar);
    table_accessor!(glyf, glyf_mut, glyf::TAG, Glyf, glyf::glyf);
    table_accessor!(gvar, gvar_mut, gvar::TAG, Gvar, gvar::gvar);
    table_accessor!(cvt, cvt_mut, cvt::TAG, Cvt, cvt::cvt);
    table_accessor!(cvar, cvar_mut, cvar::TAG, Cvar, cvar::cvar);
    table_accessor!(mvar, mvar_mut, MVAR::TAG, Mvar, MVAR::MVAR);
    table_accessor!(head, head_mut, head::TAG, Head, head::head);
    table_accessor!(hhea, hhea_mut, hhea::TAG, Hhea, hhea::hhea);
    table_accessor!(vhea, vhea_mut, vhea::TAG, Vhea, vhea::vhea);
    table_accessor!(os2, os2_mut, os2::TAG, Os2, os2::os2);
    table_accessor!(post, post_mut, post::TAG, Post, post::post);
    table_accessor!(gsub, gsub_mut, GSUB_TAG, Gsub, LayoutTable);
    table_accessor!(gpos, gpos_mut, GPOS_TAG, Gpos, LayoutTable);

    /// Parse a font from the bytes of an sfnt container.
    pub fn from_bytes(data: &[u8]) -> Result<Font, DeserializationError> {
        let mut c = ReaderContext::new(data.to_vec());
        let sfnt_version: uint32 = c.de()?;
        if sfnt_version != 0x00010000 && sfnt_version != 0x74727565 && sfnt_version != 0x4F54544F
        {
            return Err(DeserializationError(format!(
                "Unsupported sfnt version 0x{:08x}",
                sfnt_version
            )));
        }
        let num_tables: uint16 = c.de()?;
        let _search_range: uint16 = c.de()?;
        let _entry_selector: uint16 = c.de()?;
        let _range_shift: uint16 = c.de()?;
        let mut raw: BTreeMap<Tag, Vec<u8>> = BTreeMap::new();
        for _ in 0..num_tables {
            let tag: Tag = c.de()?;
            let _checksum: uint32 = c.de()?;
            let offset: uint32 = c.de()?;
            let length: uint32 = c.de()?;
            let (start, end) = (offset as usize, offset as usize + length as usize);
            if end > data.len() {
                return Err(DeserializationError(format!(
                    "Table {} overflows the file",
                    tag
                )));
            }
            raw.insert(tag, data[start..end].to_vec());
        }
        Self::decode_tables(raw)
    }

    fn decode_tables(mut raw: BTreeMap<Tag, Vec<u8>>) -> Result<Font, DeserializationError> {
        let mut font = Font::new();

        let head = match raw.remove(&head::TAG) {
            Some(bytes) => {
                let table = head::head::from_bytes(&mut ReaderContext::new(bytes))?;
                font.tables.insert(head::TAG, Table::Head(table.clone()));
                Some(table)
            }
            None => None,
        };
        let fvar = match raw.remove(&fvar::TAG) {
            Some(bytes) => {
                let table = fvar::fvar::from_bytes(&mut ReaderContext::new(bytes))?;
                font.tables.insert(fvar::TAG, Table::Fvar(table.clone()));
                Some(table)
            }
            None => None,
        };
        if let Some(bytes) = raw.remove(&avar::TAG) {
            let table = avar::avar::from_bytes(&mut ReaderContext::new(bytes))?;
            font.tables.insert(avar::TAG, Table::Avar(table));
        }
        if let Some(bytes) = raw.remove(&hhea::TAG) {
            let table = hhea::hhea::from_bytes(&mut ReaderContext::new(bytes))?;
            font.tables.insert(hhea::TAG, Table::Hhea(table));
        }
        if let Some(bytes) = raw.remove(&vhea::TAG) {
            let table = vhea::vhea::from_bytes(&mut ReaderContext::new(bytes))?;
            font.tables.insert(vhea::TAG, Table::Vhea(table));
        }
        if let Some(bytes) = raw.remove(&os2::TAG) {
            let table = os2::os2::from_bytes(&mut ReaderContext::new(bytes))?;
            font.tables.insert(os2::TAG, Table::Os2(table));
        }
        if let Some(bytes) = raw.remove(&post::TAG) {
            let table = post::post::from_bytes(&mut ReaderContext::new(bytes))?;
            font.tables.insert(post::TAG, Table::Post(table));
        }
        if let Some(bytes) = raw.remove(&MVAR::TAG) {
            let table = MVAR::MVAR::from_bytes(&mut ReaderContext::new(bytes))?;
            font.tables.insert(MVAR::TAG, Table::Mvar(table));
        }
        let cvt = match raw.remove(&cvt::TAG) {
            Some(bytes) => {
                let table = cvt::cvt::from_bytes(&mut ReaderContext::new(bytes))?;
                font.tables.insert(cvt::TAG, Table::Cvt(table.clone()));
                Some(table)
            }
            None => None,
        };

        // glyf needs loca, which needs head; gvar needs glyf and fvar
        if let Some(glyf_bytes) = raw.remove(&glyf::TAG) {
            let head = head.as_ref().ok_or_else(|| {
                DeserializationError("glyf table without a head table".to_string())
            })?;
            let loca_bytes = raw.remove(&loca::TAG).ok_or_else(|| {
                DeserializationError("glyf table without a loca table".to_string())
            })?;
            let loca = loca::from_bytes(
                &mut ReaderContext::new(loca_bytes),
                head.indexToLocFormat == 1,
            )?;
            let table = glyf::glyf::from_bytes(&glyf_bytes, &loca.indices)?;
            font.tables.insert(glyf::TAG, Table::Glyf(table));
        }
        if let Some(gvar_bytes) = raw.remove(&gvar::TAG) {
            let fvar = fvar.as_ref().ok_or_else(|| {
                DeserializationError("gvar table without an fvar table".to_string())
            })?;
            let glyf = font.glyf().ok_or_else(|| {
                DeserializationError("gvar table without a glyf table".to_string())
            })?;
            let point_counts: Vec<usize> =
                glyf.glyphs.iter().map(|g| g.gvar_point_count()).collect();
            let table = gvar::from_bytes(&gvar_bytes, &fvar.axis_tags(), &point_counts)?;
            font.tables.insert(gvar::TAG, Table::Gvar(table));
        }
        if let Some(cvar_bytes) = raw.remove(&cvar::TAG) {
            let fvar = fvar.as_ref().ok_or_else(|| {
                DeserializationError("cvar table without an fvar table".to_string())
            })?;
            let cvt = cvt.as_ref().ok_or_else(|| {
                DeserializationError("cvar table without a cvt table".to_string())
            })?;
            let table = cvar::from_bytes(&cvar_bytes, &fvar.axis_tags(), cvt.values.len())?;
            font.tables.insert(cvar::TAG, Table::Cvar(table));
        }

        for (tag, bytes) in raw {
            font.tables.insert(tag, Table::Unknown(bytes));
        }
        Ok(font)
    }

    /// Serialize the font into an sfnt container, recomputing the loca
    /// table, table checksums, and the head checksum adjustment.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let axis_tags = self.fvar().map(|f| f.axis_tags()).unwrap_or_default();
        let mut table_bytes: BTreeMap<Tag, Vec<u8>> = BTreeMap::new();
        let mut head = self.head().cloned();

        if let Some(glyf) = self.glyf() {
            let (glyf_bytes, offsets) = glyf.to_bytes()?;
            let (loca_bytes, loca_format) = loca::to_bytes(&offsets)?;
            if let Some(head) = head.as_mut() {
                head.indexToLocFormat = loca_format;
            } else {
                return Err(SerializationError(
                    "Cannot write glyf without a head table".to_string(),
                ));
            }
            table_bytes.insert(glyf::TAG, glyf_bytes);
            table_bytes.insert(loca::TAG, loca_bytes);
        }

        for (tag, table) in &self.tables {
            let mut bytes: Vec<u8> = vec![];
            match table {
                Table::Glyf(_) => continue,
                Table::Head(_) => {
                    let mut head = head.clone().unwrap();
                    // Zeroed for the whole-font checksum; patched below
                    head.checksumAdjustment = 0;
                    head.to_bytes(&mut bytes)?;
                }
                Table::Avar(avar) => avar.to_bytes(&mut bytes)?,
                Table::Cvar(cvar) => cvar.to_bytes(&mut bytes, &axis_tags)?,
                Table::Cvt(cvt) => cvt.to_bytes(&mut bytes)?,
                Table::Fvar(fvar) => fvar.to_bytes(&mut bytes)?,
                Table::Gvar(gvar) => gvar.to_bytes(&mut bytes, &axis_tags)?,
                Table::Hhea(hhea) => hhea.to_bytes(&mut bytes)?,
                Table::Vhea(vhea) => vhea.to_bytes(&mut bytes)?,
                Table::Mvar(mvar) => mvar.to_bytes(&mut bytes)?,
                Table::Os2(os2) => os2.to_bytes(&mut bytes)?,
                Table::Post(post) => post.to_bytes(&mut bytes)?,
                Table::Gsub(_) | Table::Gpos(_) => {
                    return Err(SerializationError(
                        "Structured GSUB/GPOS tables have no binary form in this crate"
                            .to_string(),
                    ))
                }
                Table::Unknown(data) => bytes.extend(data),
            }
            table_bytes.insert(*tag, bytes);
        }

        Ok(assemble_sfnt(table_bytes))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), InstancerError> {
        let data = self.to_bytes()?;
        fs::write(path.as_ref(), data).map_err(|source| InstancerError::IO {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Load a font from a file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Font, InstancerError> {
    let data = fs::read(path.as_ref()).map_err(|source| InstancerError::IO {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    Ok(Font::from_bytes(&data)?)
}

fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0_u32;
    for chunk in data.chunks(4) {
        let mut word = [0_u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    sum
}

fn assemble_sfnt(table_bytes: BTreeMap<Tag, Vec<u8>>) -> Vec<u8> {
    let num_tables = table_bytes.len() as u16;
    let mut entry_selector = 0_u16;
    while num_tables >= (2 << entry_selector) {
        entry_selector += 1;
    }
    // entry_selector is now floor(log2(num_tables)) for nonzero counts
    let search_range = if num_tables == 0 {
        0
    } else {
        (1_u16 << entry_selector) * 16
    };
    let range_shift = num_tables * 16 - search_range;

    let mut directory: Vec<u8> = vec![];
    let mut body: Vec<u8> = vec![];
    let table_start = 12 + 16 * num_tables as usize;
    let mut head_offset: Option<usize> = None;
    for (tag, bytes) in &table_bytes {
        let offset = table_start + body.len();
        if *tag == head::TAG {
            head_offset = Some(offset);
        }
        directory.extend_from_slice(tag.as_bytes());
        directory.extend_from_slice(&checksum(bytes).to_be_bytes());
        directory.extend_from_slice(&(offset as u32).to_be_bytes());
        directory.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        body.extend(bytes);
        while body.len() % 4 != 0 {
            body.push(0);
        }
    }

    let mut out: Vec<u8> = vec![];
    out.extend_from_slice(&0x00010000_u32.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());
    out.extend(directory);
    out.extend(body);

    // The head table records a checksum adjustment over the whole file
    if let Some(head_offset) = head_offset {
        let total = checksum(&out);
        let adjustment = 0xB1B0AFBA_u32.wrapping_sub(total);
        out[head_offset + 8..head_offset + 12].copy_from_slice(&adjustment.to_be_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::fvar::VariationAxisRecord;
    use crate::tag;

    fn minimal_font() -> Font {
        let mut font = Font::new();
        font.tables.insert(
            fvar::TAG,
            Table::Fvar(fvar::fvar {
                axes: vec![VariationAxisRecord {
                    axisTag: tag!("wght"),
                    minValue: 100.0,
                    defaultValue: 400.0,
                    maxValue: 900.0,
                    flags: 0,
                    axisNameID: 256,
                }],
                instances: vec![],
            }),
        );
        font.tables.insert(
            cvt::TAG,
            Table::Cvt(cvt::cvt {
                values: vec![10, 20, 30],
            }),
        );
        font.tables
            .insert(tag!("name"), Table::Unknown(vec![1, 2, 3, 4, 5]));
        font
    }

    #[test]
    fn container_roundtrip() {
        let font = minimal_font();
        let data = font.to_bytes().unwrap();
        let reloaded = Font::from_bytes(&data).unwrap();
        assert_eq!(reloaded, font);
    }

    #[test]
    fn container_rejects_garbage() {
        assert!(Font::from_bytes(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0x00]).is_err());
    }

    #[test]
    fn glyf_loca_head_roundtrip() {
        let mut font = minimal_font();
        font.tables.insert(
            head::TAG,
            Table::Head(head::head {
                majorVersion: 1,
                minorVersion: 0,
                fontRevision: 1.0,
                checksumAdjustment: 0,
                magicNumber: 0x5F0F3CF5,
                flags: 0,
                unitsPerEm: 1000,
                created: 0,
                modified: 0,
                xMin: 0,
                yMin: 0,
                xMax: 10,
                yMax: 10,
                macStyle: 0,
                lowestRecPPEM: 9,
                fontDirectionHint: 2,
                indexToLocFormat: 0,
                glyphDataFormat: 0,
            }),
        );
        font.tables.insert(
            glyf::TAG,
            Table::Glyf(glyf::glyf {
                glyphs: vec![
                    glyf::Glyph::default(),
                    crate::tables::glyf::tests::square_glyph(),
                ],
            }),
        );
        let data = font.to_bytes().unwrap();
        let reloaded = Font::from_bytes(&data).unwrap();
        assert_eq!(reloaded.glyf(), font.glyf());
        assert_eq!(reloaded.glyf().unwrap().glyphs.len(), 2);
    }
}
