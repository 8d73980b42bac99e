//! Byte readers for sequential little-endian parsing.
//!
//! [`ByteReader`] is the seam the codec consumes: sequential little-endian
//! reads, absolute seeking and a remaining-bytes query. Two implementations
//! are provided:
//!
//! - [`BinaryReader`] - zero-copy cursor over a byte slice
//! - [`StreamReader`] - any `Read + Seek` source (files, cursors)

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use zerocopy::FromBytes;

use crate::{Error, Result};

/// Sequential little-endian reader with absolute seeking.
///
/// Every reader carries a name identifying its source, which error reports
/// attach to failures.
pub trait ByteReader {
    /// Name of the underlying source (file name or a caller supplied label).
    fn name(&self) -> &str;

    /// Current absolute read position.
    fn position(&self) -> usize;

    /// Number of bytes left between the current position and the end.
    fn remaining(&self) -> usize;

    /// Seek to an absolute position.
    fn seek(&mut self, position: usize) -> Result<()>;

    /// Fill `buf` completely or fail with [`Error::UnexpectedEof`].
    fn read_into(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Read a single byte.
    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_into(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian u16.
    #[inline]
    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_into(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a little-endian u32.
    #[inline]
    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_into(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read `count` bytes into a new buffer.
    fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let available = self.remaining();
        if available < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available,
            });
        }
        let mut buf = vec![0u8; count];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Read a fixed-size array.
    #[inline]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes`; use zerocopy's little-endian
    /// integer types for on-disk layouts.
    fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let mut bytes = vec![0u8; size];
        self.read_into(&mut bytes)?;
        T::read_from_bytes(&bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// # Example
///
/// ```
/// use texcodec_common::{BinaryReader, ByteReader};
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert_eq!(reader.read_u16().unwrap(), 0x0605);
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    name: String,
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_name("<memory>", data)
    }

    /// Create a new reader with a source name used in error reports.
    #[inline]
    pub fn with_name(name: impl Into<String>, data: &'a [u8]) -> Self {
        Self {
            name: name.into(),
            data,
            position: 0,
        }
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        let available = self.data.len().saturating_sub(self.position);
        if available < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available,
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Borrow bytes from the underlying slice and advance the position.
    #[inline]
    pub fn read_slice(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }
}

impl ByteReader for BinaryReader<'_> {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn position(&self) -> usize {
        self.position
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    #[inline]
    fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(Error::SeekOutOfBounds {
                position,
                len: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    #[inline]
    fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        let bytes = self.read_slice(buf.len())?;
        buf.copy_from_slice(bytes);
        Ok(())
    }
}

/// A reader over any seekable byte stream.
///
/// The stream length is measured once on construction so that
/// [`ByteReader::remaining`] never touches the stream.
#[derive(Debug)]
pub struct StreamReader<R> {
    name: String,
    inner: R,
    position: usize,
    len: usize,
}

impl<R: Read + Seek> StreamReader<R> {
    /// Wrap a stream, measuring its length and rewinding to the start.
    pub fn new(name: impl Into<String>, mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))? as usize;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            name: name.into(),
            inner,
            position: 0,
            len,
        })
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ByteReader for StreamReader<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> usize {
        self.position
    }

    fn remaining(&self) -> usize {
        self.len.saturating_sub(self.position)
    }

    fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.len {
            return Err(Error::SeekOutOfBounds {
                position,
                len: self.len,
            });
        }
        self.inner.seek(SeekFrom::Start(position as u64))?;
        self.position = position;
        Ok(())
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.remaining() < buf.len() {
            return Err(Error::UnexpectedEof {
                needed: buf.len(),
                available: self.remaining(),
            });
        }
        self.inner.read_exact(buf)?;
        self.position += buf.len();
        Ok(())
    }

    fn read_u16(&mut self) -> Result<u16> {
        if self.remaining() < 2 {
            return Err(Error::UnexpectedEof {
                needed: 2,
                available: self.remaining(),
            });
        }
        let value = self.inner.read_u16::<LittleEndian>()?;
        self.position += 2;
        Ok(value)
    }

    fn read_u32(&mut self) -> Result<u32> {
        if self.remaining() < 4 {
            return Err(Error::UnexpectedEof {
                needed: 4,
                available: self.remaining(),
            });
        }
        let value = self.inner.read_u32::<LittleEndian>()?;
        self.position += 4;
        Ok(value)
    }
}
