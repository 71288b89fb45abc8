//! # Buffer Decoder
//!
//! Reads the flat adpack format back out of a borrowed slice. The decoder is
//! positional: reads must occur in the same order the values were written.

use crate::cursor::Cursor;
use crate::types::Error;
use crate::types::Result;

#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(buf),
        }
    }

    pub fn pos(&self) -> usize {
        self.cursor.pos()
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn i32(&mut self) -> Result<i32> {
        let bytes = self.cursor.read_bytes(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn u32(&mut self) -> Result<u32> {
        let bytes = self.cursor.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn str(&mut self) -> Result<&'a str> {
        let len = self.u32()? as usize;
        let bytes = self.cursor.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
    }
}
