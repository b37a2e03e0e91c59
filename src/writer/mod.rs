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

//! The shared `ColumnWriter` state machine (design C7, §4.5) that the
//! type-specific writers in this module build on, plus the options/encoding
//! level types that configure it.

use bytes::{Bytes, BytesMut};

use crate::byte_stream::{ByteOrder, ByteStream};
use crate::chunk::ColumnChunkEncoding;

pub mod date;
pub mod decimal;
pub mod timestamp;

/// Totally ordered encoding levels (design §4.5); `EL2` and above enable the
/// run-length integer codec for integer-backed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EncodingLevel {
    EL0,
    EL1,
    EL2,
    EL3,
}

impl EncodingLevel {
    pub fn enables_run_length(self) -> bool {
        self >= EncodingLevel::EL2
    }
}

/// Builder-style writer configuration, mirroring the teacher's
/// `WriterOptions`/`PixelsWriterOption` analogues and the C++
/// `PixelsWriterOption` fields consumed by the reference writers.
#[derive(Debug, Clone, Copy)]
pub struct WriterOptions {
    pixel_stride: usize,
    byte_order: ByteOrder,
    encoding_level: EncodingLevel,
    nulls_padding: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            pixel_stride: 10_000,
            byte_order: ByteOrder::Little,
            encoding_level: EncodingLevel::EL0,
            nulls_padding: false,
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pixel_stride(mut self, pixel_stride: usize) -> Self {
        self.pixel_stride = pixel_stride;
        self
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn with_encoding_level(mut self, encoding_level: EncodingLevel) -> Self {
        self.encoding_level = encoding_level;
        self
    }

    pub fn with_nulls_padding(mut self, nulls_padding: bool) -> Self {
        self.nulls_padding = nulls_padding;
        self
    }

    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn encoding_level(&self) -> EncodingLevel {
        self.encoding_level
    }

    pub fn nulls_padding(&self) -> bool {
        self.nulls_padding
    }

    /// `decideNullsPadding` (design §4.6): RLE forces nulls-padding off
    /// regardless of the configured value.
    pub fn decide_nulls_padding(&self) -> bool {
        if self.encoding_level.enables_run_length() {
            false
        } else {
            self.nulls_padding
        }
    }

    pub fn column_chunk_encoding(&self) -> ColumnChunkEncoding {
        if self.encoding_level.enables_run_length() {
            ColumnChunkEncoding::RunLength
        } else {
            ColumnChunkEncoding::None
        }
    }
}

/// Bookkeeping shared by every column writer: the pixel partitioning
/// counters, the sticky null flag, the chunk-level null-mask accumulator and
/// the output byte stream (design §4.5).
pub struct ColumnWriterState {
    options: WriterOptions,
    /// Rows written into the current pixel, including nulls.
    cur_pixel_ele_index: usize,
    /// Entries appended to the current pixel's null mask; also the
    /// partitioning cursor (`write` flushes once this reaches `pixel_stride`).
    cur_pixel_is_null_index: usize,
    /// Values appended to the current pixel's data buffer; may be less than
    /// `cur_pixel_ele_index` when nulls are not padded.
    cur_pixel_vector_index: usize,
    has_null: bool,
    /// Null mask for the rows currently buffered in this pixel, local index.
    pixel_is_null: Vec<bool>,
    /// Chunk-level null-mask accumulator (design W3): the bit-concatenation,
    /// in pixel emission order, of each null-bearing pixel's packed bitmap.
    null_bitmap: BytesMut,
    output: ByteStream,
    closed: bool,
}

impl ColumnWriterState {
    pub fn new(options: WriterOptions) -> Self {
        Self {
            options,
            cur_pixel_ele_index: 0,
            cur_pixel_is_null_index: 0,
            cur_pixel_vector_index: 0,
            has_null: false,
            pixel_is_null: Vec::new(),
            null_bitmap: BytesMut::new(),
            output: ByteStream::new(),
            closed: false,
        }
    }

    pub fn pixel_stride(&self) -> usize {
        self.options.pixel_stride
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.options.byte_order
    }

    pub fn rle_active(&self) -> bool {
        self.options.encoding_level.enables_run_length()
    }

    pub fn effective_nulls_padding(&self) -> bool {
        self.options.decide_nulls_padding()
    }

    pub fn cur_pixel_is_null_index(&self) -> usize {
        self.cur_pixel_is_null_index
    }

    pub fn cur_pixel_vector_index(&self) -> usize {
        self.cur_pixel_vector_index
    }

    pub fn has_null(&self) -> bool {
        self.has_null
    }

    pub fn output(&mut self) -> &mut ByteStream {
        &mut self.output
    }

    pub fn write_pos(&self) -> usize {
        self.output.write_pos()
    }

    /// Records one row in the current pixel's bookkeeping and decides
    /// whether it occupies a data-buffer slot, per `pad_nulls` (every writer
    /// passes `effective_nulls_padding()` — design §4.5/§4.6/§4.7/§4.8;
    /// `nullsPadding` is forced off under RLE regardless of what's
    /// configured, see `decide_nulls_padding`). Returns whether the caller
    /// should append a value to its type-specific data buffer.
    pub fn record_row(&mut self, is_null: bool, pad_nulls: bool) -> bool {
        self.cur_pixel_ele_index += 1;
        self.cur_pixel_is_null_index += 1;
        self.pixel_is_null.push(is_null);
        if is_null {
            self.has_null = true;
        }
        let append_data = !is_null || pad_nulls;
        if append_data {
            self.cur_pixel_vector_index += 1;
        }
        append_data
    }

    /// `newPixel`'s null-mask half (design §4.5): bit-packs the pixel's
    /// accumulated flags (MSB-first, `ceil(pixel_stride/8)` bytes) into the
    /// chunk-level bitmap iff this pixel actually saw a null (design §6.4 —
    /// "pixel i consumes ... bytes from the bitmap iff hasNull(i)"), then
    /// resets the per-pixel counters. The caller's type-specific data flush
    /// must happen before this, since it reads `cur_pixel_vector_index`.
    pub fn finish_pixel(&mut self) {
        if self.has_null {
            let byte_len = self.pixel_stride().div_ceil(8);
            let mut packed = vec![0u8; byte_len];
            for (row, &is_null) in self.pixel_is_null.iter().enumerate() {
                if is_null {
                    packed[row / 8] |= 1 << (7 - (row % 8));
                }
            }
            self.null_bitmap.extend_from_slice(&packed);
        }
        self.cur_pixel_ele_index = 0;
        self.cur_pixel_is_null_index = 0;
        self.cur_pixel_vector_index = 0;
        self.has_null = false;
        self.pixel_is_null.clear();
    }

    /// `close`'s tail (design §4.5): appends the chunk-level null bitmap
    /// after the already-flushed data region and hands back the complete
    /// chunk bytes. The caller must have already flushed any trailing
    /// partial pixel via its own `emit_pixel`/`finish_pixel` before calling
    /// this. Idempotent: a second call returns an empty buffer.
    pub fn close(&mut self) -> Bytes {
        if self.closed {
            return Bytes::new();
        }
        self.closed = true;
        let bitmap = std::mem::take(&mut self.null_bitmap).freeze();
        self.output.put_bytes(&bitmap);
        self.output.take()
    }

    pub fn column_chunk_encoding(&self) -> ColumnChunkEncoding {
        self.options.column_chunk_encoding()
    }

    pub fn estimate_memory_size(&self) -> usize {
        self.pixel_is_null.len() + self.null_bitmap.len() + self.output.write_pos()
    }
}
