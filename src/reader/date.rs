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

//! `DateColumnReader` (design C6, §4.2).

use crate::byte_stream::{ByteOrder, ByteStream};
use crate::chunk::{ChunkIndex, ColumnChunkEncoding};
use crate::encoding::rle::RunLenIntDecoder;
use crate::error::Result;
use crate::reader::ColumnReaderState;
use crate::vector::date::DateColumnVector;

pub struct DateColumnReader {
    state: ColumnReaderState,
    rle_decoder: Option<RunLenIntDecoder>,
}

impl DateColumnReader {
    pub fn new() -> Self {
        Self {
            state: ColumnReaderState::new(),
            rle_decoder: None,
        }
    }

    /// Decodes `size` day values beginning at chunk-relative row `offset`
    /// into `vector[vector_index..vector_index+size)`.
    ///
    /// `filter_mask` is accepted for interface parity with the external
    /// predicate evaluator but is not interpreted by this core (row
    /// filtering is out of scope — spec.md §1).
    #[allow(clippy::too_many_arguments)]
    pub fn read(
        &mut self,
        input: &mut ByteStream,
        encoding: ColumnChunkEncoding,
        offset: usize,
        size: usize,
        pixel_stride: usize,
        vector_index: usize,
        vector: &mut DateColumnVector,
        chunk_index: &ChunkIndex,
        byte_order: ByteOrder,
        _filter_mask: Option<&[bool]>,
    ) -> Result<()> {
        ColumnReaderState::check_pixel_boundary(offset, size, pixel_stride)?;

        if offset == 0 {
            self.state.reset(chunk_index.is_null_offset);
            self.rle_decoder = match encoding {
                ColumnChunkEncoding::RunLength => {
                    let remaining = input.remaining();
                    Some(RunLenIntDecoder::new(input.get_bytes(remaining)?, true))
                }
                ColumnChunkEncoding::None => None,
            };
        }

        let pixel_id = offset / pixel_stride;
        let has_null = chunk_index.has_null(pixel_id);
        self.state
            .set_valid(input, pixel_stride, vector.is_null_mut(), vector_index, size, has_null)?;

        match encoding {
            ColumnChunkEncoding::RunLength => {
                // Null rows never occupy a slot in the RLE sequence once
                // `nullsPadding` is forced off under RLE (design §4.6), so
                // only the non-null rows are pulled from the decoder and
                // scattered back into their original positions (as
                // `TimestampColumnReader` already does for its own wire
                // paths, design §4.4).
                let decoder = self
                    .rle_decoder
                    .as_mut()
                    .expect("RUNLENGTH read without a decoder; offset==0 must precede it");
                let non_null_count = (0..size)
                    .filter(|&i| !vector.is_null()[vector_index + i])
                    .count();
                let mut widened = vec![0i64; non_null_count];
                decoder.next_batch(&mut widened)?;
                let mut cursor = 0;
                for i in 0..size {
                    if !vector.is_null()[vector_index + i] {
                        vector.set(vector_index + i, widened[cursor] as i32);
                        cursor += 1;
                    }
                }
            }
            ColumnChunkEncoding::None => {
                let bytes = input.get_bytes(size * 4)?;
                for i in 0..size {
                    let chunk: [u8; 4] = bytes[i * 4..i * 4 + 4].try_into().unwrap();
                    let value = match byte_order {
                        ByteOrder::Little => i32::from_le_bytes(chunk),
                        ByteOrder::Big => i32::from_be_bytes(chunk),
                    };
                    vector.set(vector_index + i, value);
                }
            }
        }

        vector.ensure_write_through(vector_index + size);
        self.state.advance(size);
        Ok(())
    }

    pub fn close(&mut self) {
        self.rle_decoder = None;
    }
}

impl Default for DateColumnReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::PixelStatistics;

    #[test]
    fn reads_none_encoded_pixel() {
        let mut stream = ByteStream::new();
        stream.put_i32(0, ByteOrder::Little);
        stream.put_i32(19000, ByteOrder::Little);
        stream.put_bytes(&[0b0000_0000]);

        let chunk_index = ChunkIndex::new(8, vec![PixelStatistics { has_null: false }]);
        let mut vector = DateColumnVector::new(2, false);
        let mut reader = DateColumnReader::new();
        reader
            .read(
                &mut stream,
                ColumnChunkEncoding::None,
                0,
                2,
                4,
                0,
                &mut vector,
                &chunk_index,
                ByteOrder::Little,
                None,
            )
            .unwrap();
        assert_eq!(vector.data(), &[0, 19000]);
    }

    #[test]
    fn rejects_range_crossing_pixel_boundary() {
        let mut stream = ByteStream::new();
        let chunk_index = ChunkIndex::new(0, vec![]);
        let mut vector = DateColumnVector::new(3, false);
        let mut reader = DateColumnReader::new();
        let result = reader.read(
            &mut stream,
            ColumnChunkEncoding::None,
            9,
            3,
            10,
            0,
            &mut vector,
            &chunk_index,
            ByteOrder::Little,
            None,
        );
        assert!(result.is_err());
    }
}
