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

//! `DateColumnWriter` (design C8, §4.6).

use bytes::Bytes;

use crate::chunk::ColumnChunkEncoding;
use crate::encoding::rle::RunLenIntEncoder;
use crate::vector::date::DateColumnVector;
use crate::writer::{ColumnWriterState, WriterOptions};

pub struct DateColumnWriter {
    state: ColumnWriterState,
    cur_pixel_vector: Vec<i64>,
    rle_encoder: Option<RunLenIntEncoder>,
}

impl DateColumnWriter {
    pub fn new(options: WriterOptions) -> Self {
        let pixel_stride = options.pixel_stride();
        let rle_encoder = options
            .encoding_level()
            .enables_run_length()
            .then(|| RunLenIntEncoder::new(true));
        Self {
            state: ColumnWriterState::new(options),
            cur_pixel_vector: vec![0i64; pixel_stride],
            rle_encoder,
        }
    }

    /// Appends `size` rows from `vector[0..size)` (design §4.5 `write`),
    /// partitioning at pixel boundaries and emitting a pixel each time the
    /// partition fills, including the trailing partial pixel, which this
    /// writer buffers but does not flush (open question 1 is about the
    /// `write` loop's *trailing flush*, which `close` performs — see
    /// `DESIGN.md`).
    pub fn write(&mut self, vector: &DateColumnVector, size: usize) -> usize {
        let mut cur_part_offset = 0usize;
        let mut next_part_length = size;
        while self.state.cur_pixel_is_null_index() + next_part_length >= self.state.pixel_stride()
        {
            let cur_part_length = self.state.pixel_stride() - self.state.cur_pixel_is_null_index();
            self.write_cur_part(vector, cur_part_length, cur_part_offset);
            self.emit_pixel();
            cur_part_offset += cur_part_length;
            next_part_length = size - cur_part_offset;
        }
        self.write_cur_part(vector, next_part_length, cur_part_offset);
        self.state.write_pos()
    }

    fn write_cur_part(&mut self, vector: &DateColumnVector, len: usize, offset: usize) {
        let pad_nulls = self.state.effective_nulls_padding();
        for i in 0..len {
            let row = offset + i;
            let is_null = vector.is_null()[row];
            if self.state.record_row(is_null, pad_nulls) {
                let value = if is_null { 0 } else { vector.data()[row] as i64 };
                let idx = self.state.cur_pixel_vector_index() - 1;
                self.cur_pixel_vector[idx] = value;
            }
        }
    }

    /// `newPixel` (design §4.5/§4.6): flushes the pixel's data buffer with
    /// the active encoding, then hands the null-mask bookkeeping to the
    /// shared state.
    fn emit_pixel(&mut self) {
        let count = self.state.cur_pixel_vector_index();
        if let Some(encoder) = &self.rle_encoder {
            let encoded = encoder.encode(&self.cur_pixel_vector[..count]);
            self.state.output().put_bytes(&encoded);
        } else {
            let order = self.state.byte_order();
            for i in 0..count {
                let value = self.cur_pixel_vector[i];
                self.state.output().put_i32(value as i32, order);
            }
        }
        self.state.finish_pixel();
    }

    /// Flushes any rows remaining in the current pixel, then releases the
    /// chunk's complete bytes: data region followed by the bit-packed null
    /// bitmap (design §4.5 `close`, §6.4 wire layout).
    pub fn close(&mut self) -> Bytes {
        if self.state.cur_pixel_is_null_index() > 0 {
            self.emit_pixel();
        }
        self.rle_encoder = None;
        self.state.close()
    }

    pub fn column_chunk_encoding(&self) -> ColumnChunkEncoding {
        self.state.column_chunk_encoding()
    }

    pub fn write_pos(&self) -> usize {
        self.state.write_pos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_stream::ByteOrder;
    use crate::chunk::ChunkIndex;
    use crate::reader::date::DateColumnReader;
    use crate::writer::EncodingLevel;

    fn vector_from(values: &[Option<i32>]) -> DateColumnVector {
        let mut v = DateColumnVector::new(values.len(), false);
        for &value in values {
            match value {
                Some(days) => v.add_days(days).unwrap(),
                None => {
                    v.add_days(0).unwrap();
                    let idx = v.write_index() - 1;
                    v.is_null_mut()[idx] = true;
                }
            }
        }
        v
    }

    #[test]
    fn none_round_trip_across_two_pixels() {
        let values = [Some(0), Some(1), Some(-1), Some(19000), None, Some(19001)];
        let vector = vector_from(&values);
        let options = WriterOptions::new()
            .with_pixel_stride(4)
            .with_byte_order(ByteOrder::Little)
            .with_nulls_padding(true);
        let mut writer = DateColumnWriter::new(options);
        writer.write(&vector, values.len());
        let bytes = writer.close();

        let mut stream = crate::byte_stream::ByteStream::from_bytes(bytes);
        let chunk_index = ChunkIndex::new(
            24,
            vec![
                crate::chunk::PixelStatistics { has_null: false },
                crate::chunk::PixelStatistics { has_null: true },
            ],
        );
        let mut out = DateColumnVector::new(6, false);
        let mut reader = DateColumnReader::new();
        reader
            .read(
                &mut stream,
                ColumnChunkEncoding::None,
                0,
                4,
                4,
                0,
                &mut out,
                &chunk_index,
                ByteOrder::Little,
                None,
            )
            .unwrap();
        reader
            .read(
                &mut stream,
                ColumnChunkEncoding::None,
                4,
                2,
                4,
                4,
                &mut out,
                &chunk_index,
                ByteOrder::Little,
                None,
            )
            .unwrap();

        for (i, &value) in values.iter().enumerate() {
            match value {
                Some(days) => {
                    assert!(!out.is_null()[i]);
                    assert_eq!(out.data()[i], days);
                }
                None => assert!(out.is_null()[i]),
            }
        }
    }

    #[test]
    fn rle_round_trip_single_pixel() {
        let values = [Some(10), Some(11), Some(12), None, Some(100)];
        let vector = vector_from(&values);
        let options = WriterOptions::new()
            .with_pixel_stride(100)
            .with_encoding_level(EncodingLevel::EL2);
        let mut writer = DateColumnWriter::new(options);
        writer.write(&vector, values.len());
        assert_eq!(
            writer.column_chunk_encoding(),
            ColumnChunkEncoding::RunLength
        );
        let bytes = writer.close();

        let mut stream = crate::byte_stream::ByteStream::from_bytes(bytes);
        // The null row is excluded from the RLE sequence (nulls-padding is
        // forced off under RLE), so the data region holds only 4 encoded
        // values: a 3-value run [10, 11, 12] (header + delta + base, 3
        // bytes) followed by a 1-value literal group for 100 (header + a
        // 2-byte varint, 3 bytes) = 6 bytes before the null bitmap.
        let chunk_index = ChunkIndex::new(
            6,
            vec![crate::chunk::PixelStatistics { has_null: true }],
        );
        let mut out = DateColumnVector::new(5, false);
        let mut reader = DateColumnReader::new();
        reader
            .read(
                &mut stream,
                ColumnChunkEncoding::RunLength,
                0,
                5,
                100,
                0,
                &mut out,
                &chunk_index,
                ByteOrder::Little,
                None,
            )
            .unwrap();

        assert_eq!(out.is_null(), &[false, false, false, true, false]);
        assert_eq!(out.data()[0], 10);
        assert_eq!(out.data()[1], 11);
        assert_eq!(out.data()[2], 12);
        assert_eq!(out.data()[4], 100);
    }

    #[test]
    fn trailing_partial_pixel_is_flushed_on_close() {
        let values = [Some(1), Some(2), Some(3)];
        let vector = vector_from(&values);
        let options = WriterOptions::new().with_pixel_stride(10);
        let mut writer = DateColumnWriter::new(options);
        let pos_after_write = writer.write(&vector, values.len());
        assert_eq!(pos_after_write, 0, "a short pixel stays buffered until close");
        let bytes = writer.close();
        assert_eq!(bytes.len(), 3 * 4);
    }
}
