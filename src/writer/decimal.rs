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

//! `DecimalColumnWriter` (design C8, §4.7). As the date writer, but the
//! pixel buffer is width-polymorphic over `PhysicalType` (design §9):
//! `I16`/`I32`/`I64` are narrowed for both the RLE feed and the `NONE`
//! payload; `I128` is narrowed to `i64` only for the RLE feed (matching the
//! reference source's reader, DESIGN.md Open Question 2), while the `NONE`
//! payload keeps the full 16 bytes since this core's `DecimalColumnReader`
//! decodes a genuine `i128` off that wire path.

use bytes::Bytes;

use crate::chunk::ColumnChunkEncoding;
use crate::encoding::decimal::{physical_type_for_precision, PhysicalType};
use crate::encoding::rle::RunLenIntEncoder;
use crate::error::Result;
use crate::vector::decimal::DecimalColumnVector;
use crate::writer::{ColumnWriterState, WriterOptions};

pub struct DecimalColumnWriter {
    state: ColumnWriterState,
    precision: u32,
    scale: u32,
    physical_type: PhysicalType,
    /// Always holds the full-width unscaled value; narrowed per
    /// `physical_type` at emission time.
    cur_pixel_vector: Vec<i128>,
    rle_encoder: Option<RunLenIntEncoder>,
}

impl DecimalColumnWriter {
    pub fn new(precision: u32, scale: u32, options: WriterOptions) -> Result<Self> {
        let physical_type = physical_type_for_precision(precision)?;
        let pixel_stride = options.pixel_stride();
        let rle_encoder = options
            .encoding_level()
            .enables_run_length()
            .then(|| RunLenIntEncoder::new(true));
        Ok(Self {
            state: ColumnWriterState::new(options),
            precision,
            scale,
            physical_type,
            cur_pixel_vector: vec![0i128; pixel_stride],
            rle_encoder,
        })
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    /// Appends `size` rows from `vector[0..size)`, as
    /// [`crate::writer::date::DateColumnWriter::write`].
    pub fn write(&mut self, vector: &DecimalColumnVector, size: usize) -> usize {
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

    fn write_cur_part(&mut self, vector: &DecimalColumnVector, len: usize, offset: usize) {
        let pad_nulls = self.state.effective_nulls_padding();
        for i in 0..len {
            let row = offset + i;
            let is_null = vector.is_null()[row];
            if self.state.record_row(is_null, pad_nulls) {
                let value = if is_null { 0 } else { vector.get(row) };
                let idx = self.state.cur_pixel_vector_index() - 1;
                self.cur_pixel_vector[idx] = value;
            }
        }
    }

    fn emit_pixel(&mut self) {
        let count = self.state.cur_pixel_vector_index();
        if let Some(encoder) = &self.rle_encoder {
            // I128 is fed through the 64-bit RLE lane narrowed exactly as
            // the matching reader widens it back (DESIGN.md Open Question 2).
            let narrowed: Vec<i64> = self.cur_pixel_vector[..count]
                .iter()
                .map(|&v| match self.physical_type {
                    PhysicalType::I16 => (v as i16) as i64,
                    PhysicalType::I32 => (v as i32) as i64,
                    PhysicalType::I64 | PhysicalType::I128 => v as i64,
                })
                .collect();
            let encoded = encoder.encode(&narrowed);
            self.state.output().put_bytes(&encoded);
        } else {
            let order = self.state.byte_order();
            for i in 0..count {
                let value = self.cur_pixel_vector[i];
                let output = self.state.output();
                match self.physical_type {
                    PhysicalType::I16 => output.put_i16(value as i16, order),
                    PhysicalType::I32 => output.put_i32(value as i32, order),
                    PhysicalType::I64 => output.put_i64(value as i64, order),
                    PhysicalType::I128 => {
                        let bytes = match order {
                            crate::byte_stream::ByteOrder::Little => value.to_le_bytes(),
                            crate::byte_stream::ByteOrder::Big => value.to_be_bytes(),
                        };
                        output.put_bytes(&bytes);
                    }
                }
            }
        }
        self.state.finish_pixel();
    }

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
    use crate::byte_stream::{ByteOrder, ByteStream};
    use crate::chunk::{ChunkIndex, PixelStatistics};
    use crate::reader::decimal::DecimalColumnReader;

    fn vector_from(
        precision: u32,
        scale: u32,
        values: &[Option<i128>],
    ) -> DecimalColumnVector {
        let mut v = DecimalColumnVector::new(values.len(), precision, scale, false).unwrap();
        for &value in values {
            match value {
                Some(unscaled) => v.add_i128(unscaled).unwrap(),
                None => {
                    v.add_i128(0).unwrap();
                    let idx = v.write_index() - 1;
                    v.is_null_mut()[idx] = true;
                }
            }
        }
        v
    }

    #[test]
    fn rejects_unsupported_precision() {
        assert!(DecimalColumnWriter::new(39, 0, WriterOptions::new()).is_err());
    }

    #[test]
    fn rle_round_trip_across_two_pixels() {
        let values = [
            Some(314i128),
            Some(-100),
            Some(0),
            None,
            Some(99999),
        ];
        let vector = vector_from(5, 2, &values);
        let options = WriterOptions::new()
            .with_pixel_stride(3)
            .with_encoding_level(crate::writer::EncodingLevel::EL2);
        let mut writer = DecimalColumnWriter::new(5, 2, options).unwrap();
        writer.write(&vector, values.len());
        let bytes = writer.close();

        let mut stream = ByteStream::from_bytes(bytes);
        // Pixel 0's 3 values (314, -100, 0) have no run of their own (the
        // deltas don't repeat) so they encode as one 6-byte literal group;
        // pixel 1 excludes the null row and encodes its lone value (99999)
        // as a 4-byte literal group. The null bitmap starts after both, at
        // byte 10.
        let chunk_index = ChunkIndex::new(
            10,
            vec![
                PixelStatistics { has_null: false },
                PixelStatistics { has_null: true },
            ],
        );
        let mut out = DecimalColumnVector::new(5, 5, 2, false).unwrap();
        let mut reader = DecimalColumnReader::new(5, 2).unwrap();
        reader
            .read(
                &mut stream,
                ColumnChunkEncoding::RunLength,
                0,
                3,
                3,
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
                ColumnChunkEncoding::RunLength,
                3,
                2,
                3,
                3,
                &mut out,
                &chunk_index,
                ByteOrder::Little,
                None,
            )
            .unwrap();

        assert_eq!(out.is_null(), &[false, false, false, true, false]);
        assert_eq!(out.get(0), 314);
        assert_eq!(out.get(1), -100);
        assert_eq!(out.get(2), 0);
        assert_eq!(out.get(4), 99999);
    }

    #[test]
    fn none_round_trip_preserves_full_i128_width() {
        let big = 12345678901234567890123456789012345i128;
        let values = [Some(big), Some(-big), None];
        let vector = vector_from(38, 0, &values);
        let options = WriterOptions::new()
            .with_pixel_stride(10)
            .with_byte_order(ByteOrder::Big);
        let mut writer = DecimalColumnWriter::new(38, 0, options).unwrap();
        assert_eq!(writer.physical_type(), PhysicalType::I128);
        writer.write(&vector, values.len());
        let bytes = writer.close();
        // 3 rows * 16 bytes of data, plus a ceil(10/8) = 2-byte null bitmap.
        assert_eq!(bytes.len(), 3 * 16 + 2);

        let mut stream = ByteStream::from_bytes(bytes);
        let chunk_index = ChunkIndex::new(3 * 16, vec![PixelStatistics { has_null: true }]);
        let mut out = DecimalColumnVector::new(3, 38, 0, false).unwrap();
        let mut reader = DecimalColumnReader::new(38, 0).unwrap();
        reader
            .read(
                &mut stream,
                ColumnChunkEncoding::None,
                0,
                3,
                10,
                0,
                &mut out,
                &chunk_index,
                ByteOrder::Big,
                None,
            )
            .unwrap();

        assert_eq!(out.get(0), big);
        assert_eq!(out.get(1), -big);
        assert!(out.is_null()[2]);
    }

    #[test]
    fn none_round_trip_i32_physical_type() {
        let values = [Some(314i128), Some(-100)];
        let vector = vector_from(5, 2, &values);
        let options = WriterOptions::new().with_pixel_stride(4);
        let mut writer = DecimalColumnWriter::new(5, 2, options).unwrap();
        assert_eq!(writer.physical_type(), PhysicalType::I32);
        writer.write(&vector, values.len());
        let pos = writer.write_pos();
        assert_eq!(pos, 0, "buffered until close since the pixel is short");
        let bytes = writer.close();
        assert_eq!(bytes.len(), 2 * 4, "no nulls, so no bitmap bytes are appended");
    }
}
