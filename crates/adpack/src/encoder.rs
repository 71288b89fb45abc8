//! # Buffer Encoder
//!
//! Writes the flat little-endian adpack format:
//!
//! - `i32` / `u32`: 4 bytes, little-endian, no tag.
//! - strings: `u32` byte length, then the raw UTF-8 bytes.
//!
//! The format carries no type information; reader and writer must agree on
//! the value sequence, which the wire contract fixes per transaction code.

use crate::types::Error;
use crate::types::Result;

/// A growable buffer that encodes values into the adpack format.
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline(always)]
    fn write_u32_raw(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    #[inline]
    pub fn i32(&mut self, v: i32) -> Result<&mut Self> {
        self.buf.extend_from_slice(&v.to_le_bytes());
        Ok(self)
    }

    #[inline]
    pub fn u32(&mut self, v: u32) -> Result<&mut Self> {
        self.write_u32_raw(v);
        Ok(self)
    }

    pub fn str(&mut self, v: &str) -> Result<&mut Self> {
        let bytes = v.as_bytes();
        if bytes.len() > u32::MAX as usize {
            return Err(Error::BlobTooLarge(bytes.len()));
        }
        self.write_u32_raw(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
        Ok(self)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
