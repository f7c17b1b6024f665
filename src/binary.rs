//! Byte-level plumbing for reading and writing big-endian OpenType data.
//!
//! Tables implement [`Serialize`] and [`Deserialize`] in terms of a
//! [`ReaderContext`] cursor which tracks the current position and the start
//! of the enclosing table (for offset resolution).

use crate::types::Tag;
use std::convert::TryInto;
use std::mem;

#[derive(Debug, Clone)]
pub struct SerializationError(pub String);

#[derive(Debug, Clone)]
pub struct DeserializationError(pub String);

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Serialization error: {}", self.0)
    }
}

impl std::fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deserialization error: {}", self.0)
    }
}

impl std::error::Error for SerializationError {}
impl std::error::Error for DeserializationError {}

pub struct ReaderContext {
    pub input: Vec<u8>,
    pub ptr: usize,
    top_of_table_stack: Vec<usize>,
}

impl ReaderContext {
    pub fn new(input: Vec<u8>) -> Self {
        ReaderContext {
            input,
            ptr: 0,
            top_of_table_stack: vec![0],
        }
    }

    fn consume_or_peek(
        &mut self,
        bytes: usize,
        consume: bool,
    ) -> Result<&[u8], DeserializationError> {
        if self.ptr + bytes > self.input.len() {
            Err(DeserializationError("End of file".to_string()))
        } else {
            let subslice = &self.input[self.ptr..self.ptr + bytes];
            if consume {
                self.ptr += bytes;
            }
            Ok(subslice)
        }
    }

    fn consume(&mut self, bytes: usize) -> Result<&[u8], DeserializationError> {
        self.consume_or_peek(bytes, true)
    }

    pub fn peek(&mut self, bytes: usize) -> Result<&[u8], DeserializationError> {
        self.consume_or_peek(bytes, false)
    }

    /// Mark the current position as the top of a table, for later
    /// offset resolution via `top_of_table`.
    pub fn push(&mut self) {
        self.top_of_table_stack.push(self.ptr);
    }

    pub fn pop(&mut self) {
        self.top_of_table_stack
            .pop()
            .expect("pop with no matching push");
    }

    pub fn top_of_table(&self) -> usize {
        *self.top_of_table_stack.last().expect("not in a table")
    }

    pub fn skip(&mut self, bytes: usize) {
        self.ptr += bytes;
    }
}

pub trait Serialize {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError>;
}

pub trait Deserialize: Sized {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError>;
}

pub trait Serializer<T>
where
    T: Serialize,
{
    fn put(&mut self, data: T) -> Result<(), SerializationError>;
}

impl<T> Serializer<T> for Vec<u8>
where
    T: Serialize,
{
    fn put(&mut self, data: T) -> Result<(), SerializationError> {
        data.to_bytes(self)
    }
}

pub trait Deserializer<T>
where
    T: Deserialize,
{
    fn de(&mut self) -> Result<T, DeserializationError>;
    fn de_counted(&mut self, s: usize) -> Result<Vec<T>, DeserializationError>;
}

impl<T> Deserializer<T> for ReaderContext
where
    T: Deserialize,
{
    fn de(&mut self) -> Result<T, DeserializationError> {
        T::from_bytes(self)
    }

    fn de_counted(&mut self, s: usize) -> Result<Vec<T>, DeserializationError> {
        (0..s).map(|_| self.de()).collect()
    }
}

macro_rules! primitive_serde {
    ($t:ty) => {
        impl Serialize for $t {
            fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
                data.extend_from_slice(&self.to_be_bytes());
                Ok(())
            }
        }

        impl Serialize for &$t {
            fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
                data.extend_from_slice(&self.to_be_bytes());
                Ok(())
            }
        }

        impl Deserialize for $t {
            fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
                let bytes: &[u8] = c.consume(mem::size_of::<$t>())?;
                Ok(<$t>::from_be_bytes(bytes.try_into().unwrap()))
            }
        }
    };
}

primitive_serde!(u8);
primitive_serde!(i8);
primitive_serde!(u16);
primitive_serde!(i16);
primitive_serde!(u32);
primitive_serde!(i32);
primitive_serde!(i64);

impl<T> Serialize for Vec<T>
where
    T: Serialize,
{
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        for item in self {
            item.to_bytes(data)?;
        }
        Ok(())
    }
}

impl Serialize for Tag {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.extend_from_slice(self.as_bytes());
        Ok(())
    }
}

impl Deserialize for Tag {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let bytes = c.consume(4)?;
        Tag::from_raw(bytes).map_err(|e| DeserializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_roundtrip() {
        let mut data = vec![];
        data.put(1_u16).unwrap();
        data.put(-2_i16).unwrap();
        data.put(0xdeadbeef_u32).unwrap();
        assert_eq!(data, vec![0x00, 0x01, 0xff, 0xfe, 0xde, 0xad, 0xbe, 0xef]);
        let mut rc = ReaderContext::new(data);
        let a: u16 = rc.de().unwrap();
        let b: i16 = rc.de().unwrap();
        let c: u32 = rc.de().unwrap();
        assert_eq!((a, b, c), (1, -2, 0xdeadbeef));
        assert!(rc.consume(1).is_err());
    }

    #[test]
    fn counted_reads() {
        let mut rc = ReaderContext::new(vec![0x00, 0x01, 0x00, 0x02, 0x00, 0x03]);
        let v: Vec<u16> = rc.de_counted(3).unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn table_offsets() {
        let mut rc = ReaderContext::new(vec![0, 0, 0, 4, 0, 42]);
        rc.push();
        let offset: u32 = rc.de().unwrap();
        rc.ptr = rc.top_of_table() + offset as usize;
        let value: u16 = rc.de().unwrap();
        assert_eq!(value, 42);
        rc.pop();
    }
}
