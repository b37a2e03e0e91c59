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

//! `TimestampColumnReader` (design C6, §4.4). The `RUNLENGTH` path only
//! ever encodes non-null values (nulls-padding is forced off under RLE, as
//! for the date/decimal readers). The `NONE` path reads `size` values
//! unconditionally, as date/decimal do, and scatters skipping nulls only on
//! the way into the vector — whether a null row occupies a data slot on the
//! wire is controlled by `nullsPadding`, same as every other column.

use crate::byte_stream::{ByteOrder, ByteStream};
use crate::chunk::{ChunkIndex, ColumnChunkEncoding};
use crate::encoding::rle::RunLenIntDecoder;
use crate::error::Result;
use crate::reader::ColumnReaderState;
use crate::vector::timestamp::TimestampColumnVector;

pub struct TimestampColumnReader {
    state: ColumnReaderState,
    rle_decoder: Option<RunLenIntDecoder>,
}

impl TimestampColumnReader {
    pub fn new() -> Self {
        Self {
            state: ColumnReaderState::new(),
            rle_decoder: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn read(
        &mut self,
        input: &mut ByteStream,
        encoding: ColumnChunkEncoding,
        offset: usize,
        size: usize,
        pixel_stride: usize,
        vector_index: usize,
        vector: &mut TimestampColumnVector,
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
                let decoder = self
                    .rle_decoder
                    .as_mut()
                    .expect("RUNLENGTH read without a decoder; offset==0 must precede it");
                let non_null_count = (0..size)
                    .filter(|&i| !vector.is_null()[vector_index + i])
                    .count();
                let mut values = vec![0i64; non_null_count];
                decoder.next_batch(&mut values)?;
                let mut cursor = 0;
                for i in 0..size {
                    if !vector.is_null()[vector_index + i] {
                        vector.set(vector_index + i, values[cursor]);
                        cursor += 1;
                    }
                }
            }
            ColumnChunkEncoding::None => {
                let bytes = input.get_bytes(size * 8)?;
                for i in 0..size {
                    let chunk: [u8; 8] = bytes[i * 8..i * 8 + 8].try_into().unwrap();
                    let value = match byte_order {
                        ByteOrder::Little => i64::from_le_bytes(chunk),
                        ByteOrder::Big => i64::from_be_bytes(chunk),
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

impl Default for TimestampColumnReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::PixelStatistics;

    #[test]
    fn reads_none_encoded_pixel_without_nulls() {
        let mut stream = ByteStream::new();
        stream.put_i64(0, ByteOrder::Big);
        stream.put_i64(123_456, ByteOrder::Big);
        stream.put_bytes(&[0]);

        let chunk_index = ChunkIndex::new(16, vec![PixelStatistics { has_null: false }]);
        let mut vector = TimestampColumnVector::new(2, 6, false);
        let mut reader = TimestampColumnReader::new();
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
                ByteOrder::Big,
                None,
            )
            .unwrap();
        assert_eq!(vector.data(), &[0, 123_456]);
    }

    #[test]
    fn none_payload_reads_padded_null_slot() {
        // NONE pairs with nullsPadding = true (design §4.6), so the null row
        // still occupies a data slot on the wire; only the in-memory scatter
        // skips it (the null mask, not this value, is authoritative there).
        let mut stream = ByteStream::new();
        stream.put_i64(42, ByteOrder::Big);
        stream.put_i64(0, ByteOrder::Big);
        stream.put_bytes(&[0b0100_0000]);

        let chunk_index = ChunkIndex::new(2 * 8, vec![PixelStatistics { has_null: true }]);
        let mut vector = TimestampColumnVector::new(2, 6, false);
        let mut reader = TimestampColumnReader::new();
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
                ByteOrder::Big,
                None,
            )
            .unwrap();
        assert_eq!(vector.is_null(), &[false, true]);
        assert_eq!(vector.data()[0], 42);
        assert_eq!(vector.write_index(), 2);
    }
}
