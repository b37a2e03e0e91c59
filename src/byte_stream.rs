// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The byte-buffer contract of the codec core (design §6.3): a random-access
//! growable buffer with independent read and write cursors, little- and
//! big-endian scalar accessors, and raw byte primitives.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{IoSnafu, Result};
use snafu::ResultExt;

/// Byte order used for the `NONE` (raw, unencoded) wire path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// A growable, seekable byte buffer used both as a writer's pixel-scratch
/// staging area and as a reader's input view over already-materialized
/// chunk bytes.
#[derive(Debug, Clone)]
pub struct ByteStream {
    bytes: BytesMut,
    read_pos: usize,
}

impl ByteStream {
    pub fn new() -> Self {
        Self {
            bytes: BytesMut::new(),
            read_pos: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: BytesMut::with_capacity(capacity),
            read_pos: 0,
        }
    }

    /// Wrap already-decoded bytes for reading (read cursor starts at 0).
    pub fn from_bytes(bytes: Bytes) -> Self {
        Self {
            bytes: BytesMut::from(&bytes[..]),
            read_pos: 0,
        }
    }

    pub fn write_pos(&self) -> usize {
        self.bytes.len()
    }

    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    pub fn set_read_pos(&mut self, pos: usize) {
        self.read_pos = pos;
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.read_pos)
    }

    /// View of the bytes from the current read position onward.
    pub fn get_pointer(&self) -> &[u8] {
        &self.bytes[self.read_pos..]
    }

    pub fn put_bytes(&mut self, data: &[u8]) {
        self.bytes.put_slice(data);
    }

    /// Read exactly `len` bytes, advancing the read cursor.
    pub fn get_bytes(&mut self, len: usize) -> Result<Bytes> {
        if self.remaining() < len {
            return self.underrun();
        }
        let start = self.read_pos;
        self.read_pos += len;
        Ok(Bytes::copy_from_slice(&self.bytes[start..start + len]))
    }

    /// Read `len` bytes starting at the absolute offset `offset`, without
    /// disturbing the read cursor. Used for the null-bitmap region, which
    /// readers address by an independent offset instead of the main
    /// streaming cursor (design §6.4).
    pub fn peek_bytes_at(&self, offset: usize, len: usize) -> Result<Bytes> {
        if self.bytes.len() < offset + len {
            return self.underrun();
        }
        Ok(Bytes::copy_from_slice(&self.bytes[offset..offset + len]))
    }

    fn underrun<T>(&self) -> Result<T> {
        std::io::Result::<T>::Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "byte stream exhausted before requested length",
        ))
        .context(IoSnafu)
    }

    pub fn put_u16(&mut self, v: u16, order: ByteOrder) {
        match order {
            ByteOrder::Little => self.bytes.put_u16_le(v),
            ByteOrder::Big => self.bytes.put_u16(v),
        }
    }

    pub fn put_i16(&mut self, v: i16, order: ByteOrder) {
        self.put_u16(v as u16, order)
    }

    pub fn put_u32(&mut self, v: u32, order: ByteOrder) {
        match order {
            ByteOrder::Little => self.bytes.put_u32_le(v),
            ByteOrder::Big => self.bytes.put_u32(v),
        }
    }

    pub fn put_i32(&mut self, v: i32, order: ByteOrder) {
        self.put_u32(v as u32, order)
    }

    pub fn put_u64(&mut self, v: u64, order: ByteOrder) {
        match order {
            ByteOrder::Little => self.bytes.put_u64_le(v),
            ByteOrder::Big => self.bytes.put_u64(v),
        }
    }

    pub fn put_i64(&mut self, v: i64, order: ByteOrder) {
        self.put_u64(v as u64, order)
    }

    pub fn get_i16(&mut self, order: ByteOrder) -> Result<i16> {
        if self.remaining() < 2 {
            return self.underrun();
        }
        let mut buf = &self.bytes[self.read_pos..self.read_pos + 2];
        self.read_pos += 2;
        Ok(match order {
            ByteOrder::Little => buf.get_i16_le(),
            ByteOrder::Big => buf.get_i16(),
        })
    }

    pub fn get_i32(&mut self, order: ByteOrder) -> Result<i32> {
        if self.remaining() < 4 {
            return self.underrun();
        }
        let mut buf = &self.bytes[self.read_pos..self.read_pos + 4];
        self.read_pos += 4;
        Ok(match order {
            ByteOrder::Little => buf.get_i32_le(),
            ByteOrder::Big => buf.get_i32(),
        })
    }

    pub fn get_i64(&mut self, order: ByteOrder) -> Result<i64> {
        if self.remaining() < 8 {
            return self.underrun();
        }
        let mut buf = &self.bytes[self.read_pos..self.read_pos + 8];
        self.read_pos += 8;
        Ok(match order {
            ByteOrder::Little => buf.get_i64_le(),
            ByteOrder::Big => buf.get_i64(),
        })
    }

    /// Finish writing, handing back the accumulated bytes and resetting to
    /// an empty stream ready to accumulate the next chunk/pixel.
    pub fn take(&mut self) -> Bytes {
        std::mem::take(&mut self.bytes).freeze()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes.freeze()
    }
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_le_be() {
        let mut s = ByteStream::new();
        s.put_i32(-7, ByteOrder::Little);
        s.put_i32(-7, ByteOrder::Big);
        assert_eq!(s.get_i32(ByteOrder::Little).unwrap(), -7);
        assert_eq!(s.get_i32(ByteOrder::Big).unwrap(), -7);
    }

    #[test]
    fn underrun_is_an_error() {
        let mut s = ByteStream::new();
        s.put_bytes(&[1, 2, 3]);
        assert!(s.get_i64(ByteOrder::Little).is_err());
    }

    #[test]
    fn get_bytes_advances_read_pos() {
        let mut s = ByteStream::new();
        s.put_bytes(&[1, 2, 3, 4]);
        let first = s.get_bytes(2).unwrap();
        assert_eq!(&first[..], &[1, 2]);
        assert_eq!(s.read_pos(), 2);
    }
}
