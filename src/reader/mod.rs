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

//! The shared `ColumnReader` state machine (design C5, §4.1) that the
//! type-specific readers in this module build on.

use crate::byte_stream::ByteStream;
use crate::error::{RangeCrossesPixelSnafu, Result};
use snafu::ensure;

pub mod date;
pub mod decimal;
pub mod timestamp;

/// Bookkeeping common to every column reader: the chunk-relative row
/// cursor and the independent offset into the null-bitmap region.
#[derive(Debug, Default)]
pub struct ColumnReaderState {
    element_index: usize,
    is_null_offset: usize,
}

impl ColumnReaderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element_index(&self) -> usize {
        self.element_index
    }

    pub fn is_null_offset(&self) -> usize {
        self.is_null_offset
    }

    /// Rewinds the cursor and captures a fresh null-bitmap offset; called
    /// whenever a `read` starts at chunk-relative row 0.
    pub fn reset(&mut self, is_null_offset: usize) {
        self.element_index = 0;
        self.is_null_offset = is_null_offset;
    }

    pub fn advance(&mut self, count: usize) {
        self.element_index += count;
    }

    /// Fails unless `[offset, offset+size)` stays within one pixel.
    pub fn check_pixel_boundary(offset: usize, size: usize, pixel_stride: usize) -> Result<()> {
        ensure!(
            size > 0 && offset / pixel_stride == (offset + size - 1) / pixel_stride,
            RangeCrossesPixelSnafu {
                offset,
                size,
                pixel_stride,
            }
        );
        Ok(())
    }

    /// Consumes the bit-packed null bitmap for one pixel (MSB-first,
    /// `ceil(pixel_stride/8)` bytes) when `has_null`, writing `size` flags
    /// into `is_null[vector_index..]`; otherwise clears that range.
    pub fn set_valid(
        &mut self,
        input: &ByteStream,
        pixel_stride: usize,
        is_null: &mut [bool],
        vector_index: usize,
        size: usize,
        has_null: bool,
    ) -> Result<()> {
        if has_null {
            let byte_len = pixel_stride.div_ceil(8);
            let bytes = input.peek_bytes_at(self.is_null_offset, byte_len)?;
            for row in 0..size {
                let byte = bytes[row / 8];
                let bit = (byte >> (7 - (row % 8))) & 1;
                is_null[vector_index + row] = bit == 1;
            }
            self.is_null_offset += byte_len;
        } else {
            for row in 0..size {
                is_null[vector_index + row] = false;
            }
        }
        Ok(())
    }
}
