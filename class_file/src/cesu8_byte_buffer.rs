use crate::class_file_error::{ClassFileError, Result};
use cesu8::{from_java_cesu8, to_java_cesu8};

/// class文件中所有多字节数据都是大端序
macro_rules! generate_read {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self) -> Result<$type> {
            let mut bytes = [0u8; std::mem::size_of::<$type>()];
            bytes.copy_from_slice(self.advance(std::mem::size_of::<$type>())?);
            Ok(<$type>::from_be_bytes(bytes))
        }
    };
}

macro_rules! generate_write {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) {
            self.bytes.extend_from_slice(&value.to_be_bytes());
        }
    };
}

/// Big-endian cursor over the bytes of a class file.
pub struct ByteBuffer<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ByteBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteBuffer {
            buffer: data,
            position: 0,
        }
    }

    fn advance(&mut self, size: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(size)
            .filter(|end| *end <= self.buffer.len())
            .ok_or(ClassFileError::UnexpectedEndOfData)?;
        let slice = &self.buffer[self.position..end];
        self.position = end;
        Ok(slice)
    }

    generate_read!(read_u8, u8);
    generate_read!(read_u16, u16);
    generate_read!(read_u32, u32);
    generate_read!(read_i32, i32);
    generate_read!(read_i64, i64);
    generate_read!(read_f32, f32);
    generate_read!(read_f64, f64);

    pub fn read_2_u16(&mut self) -> Result<(u16, u16)> {
        let first = self.read_u16()?;
        let second = self.read_u16()?;
        Ok((first, second))
    }

    pub fn read_u8_u16(&mut self) -> Result<(u8, u16)> {
        let first = self.read_u8()?;
        let second = self.read_u16()?;
        Ok((first, second))
    }

    /// 读取 modified UTF-8 (CESU-8) 编码的字符串
    pub fn read_utf8(&mut self, len: usize) -> Result<String> {
        let bytes = self.advance(len)?;
        from_java_cesu8(bytes)
            .map(|cow_string| cow_string.into_owned())
            .map_err(|_| ClassFileError::InvalidCesu8String)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.advance(len)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn has_more_data(&self) -> bool {
        self.position < self.buffer.len()
    }
}

/// Growable big-endian output, the write side of [`ByteBuffer`].
#[derive(Debug, Default)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter::default()
    }

    generate_write!(write_u8, u8);
    generate_write!(write_u16, u16);
    generate_write!(write_u32, u32);
    generate_write!(write_i32, i32);
    generate_write!(write_i64, i64);
    generate_write!(write_f32, f32);
    generate_write!(write_f64, f64);

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// u2 length prefix followed by the modified UTF-8 bytes
    pub fn write_utf8(&mut self, value: &str) -> Result<()> {
        let encoded = to_java_cesu8(value);
        let len = u16::try_from(encoded.len())
            .map_err(|_| ClassFileError::Utf8TooLong(encoded.len()))?;
        self.write_u16(len);
        self.write_bytes(&encoded);
        Ok(())
    }

    /// u4 length prefix followed by the raw bytes, as used by `attribute_info`
    pub fn write_u32_prefixed(&mut self, what: &'static str, bytes: &[u8]) -> Result<()> {
        let len =
            u32::try_from(bytes.len()).map_err(|_| ClassFileError::TooLong(what, bytes.len()))?;
        self.write_u32(len);
        self.write_bytes(bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
