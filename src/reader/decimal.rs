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

//! `DecimalColumnReader` (design C6, §4.3).

use crate::byte_stream::{ByteOrder, ByteStream};
use crate::chunk::{ChunkIndex, ColumnChunkEncoding};
use crate::encoding::decimal::{physical_type_for_precision, PhysicalType};
use crate::encoding::rle::RunLenIntDecoder;
use crate::error::{Result, TypeMismatchSnafu};
use crate::reader::ColumnReaderState;
use crate::vector::decimal::DecimalColumnVector;
use snafu::ensure;

pub struct DecimalColumnReader {
    state: ColumnReaderState,
    precision: u32,
    scale: u32,
    physical_type: PhysicalType,
    rle_decoder: Option<RunLenIntDecoder>,
}

impl DecimalColumnReader {
    pub fn new(precision: u32, scale: u32) -> Result<Self> {
        let physical_type = physical_type_for_precision(precision)?;
        Ok(Self {
            state: ColumnReaderState::new(),
            precision,
            scale,
            physical_type,
            rle_decoder: None,
        })
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
        vector: &mut DecimalColumnVector,
        chunk_index: &ChunkIndex,
        byte_order: ByteOrder,
        _filter_mask: Option<&[bool]>,
    ) -> Result<()> {
        ensure!(
            vector.precision() == self.precision && vector.scale() == self.scale,
            TypeMismatchSnafu {
                reader_type: format!("decimal({}, {})", self.precision, self.scale),
                vector_type: format!("decimal({}, {})", vector.precision(), vector.scale()),
            }
        );
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
                // As `DateColumnReader`: null rows are absent from the RLE
                // sequence once `nullsPadding` is forced off under RLE
                // (design §4.6, confirmed by the §8 scenario 2 worked
                // example), so only non-null rows are pulled and scattered.
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
                        // I128 is fed through the same 64-bit RLE lane as I64
                        // (design §9 / DESIGN.md Open Question 2): the wire
                        // value narrows here exactly as the reference source
                        // does, the in-memory vector still holds a real i128.
                        let value = widened[cursor];
                        cursor += 1;
                        let narrowed: i128 = match self.physical_type {
                            PhysicalType::I16 => (value as i16) as i128,
                            PhysicalType::I32 => (value as i32) as i128,
                            PhysicalType::I64 | PhysicalType::I128 => value as i128,
                        };
                        vector.set(vector_index + i, narrowed);
                    }
                }
            }
            ColumnChunkEncoding::None => {
                let width = self.physical_type.width();
                let bytes = input.get_bytes(size * width)?;
                for i in 0..size {
                    let slot = &bytes[i * width..i * width + width];
                    let value = decode_fixed_width(slot, self.physical_type, byte_order);
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

fn decode_fixed_width(bytes: &[u8], physical_type: PhysicalType, byte_order: ByteOrder) -> i128 {
    match physical_type {
        PhysicalType::I16 => {
            let b: [u8; 2] = bytes.try_into().unwrap();
            (match byte_order {
                ByteOrder::Little => i16::from_le_bytes(b),
                ByteOrder::Big => i16::from_be_bytes(b),
            }) as i128
        }
        PhysicalType::I32 => {
            let b: [u8; 4] = bytes.try_into().unwrap();
            (match byte_order {
                ByteOrder::Little => i32::from_le_bytes(b),
                ByteOrder::Big => i32::from_be_bytes(b),
            }) as i128
        }
        PhysicalType::I64 => {
            let b: [u8; 8] = bytes.try_into().unwrap();
            (match byte_order {
                ByteOrder::Little => i64::from_le_bytes(b),
                ByteOrder::Big => i64::from_be_bytes(b),
            }) as i128
        }
        PhysicalType::I128 => {
            let b: [u8; 16] = bytes.try_into().unwrap();
            match byte_order {
                ByteOrder::Little => i128::from_le_bytes(b),
                ByteOrder::Big => i128::from_be_bytes(b),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::PixelStatistics;

    #[test]
    fn reads_none_encoded_pixel() {
        let mut stream = ByteStream::new();
        stream.put_i32(314, ByteOrder::Little);
        stream.put_i32(-100, ByteOrder::Little);
        stream.put_bytes(&[0]);

        let chunk_index = ChunkIndex::new(8, vec![PixelStatistics { has_null: false }]);
        let mut vector = DecimalColumnVector::new(2, 5, 2, false).unwrap();
        let mut reader = DecimalColumnReader::new(5, 2).unwrap();
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
        assert_eq!(vector.get(0), 314);
        assert_eq!(vector.get(1), -100);
    }

    #[test]
    fn rejects_mismatched_precision_scale() {
        let mut stream = ByteStream::new();
        let chunk_index = ChunkIndex::new(0, vec![]);
        let mut vector = DecimalColumnVector::new(1, 5, 2, false).unwrap();
        let mut reader = DecimalColumnReader::new(6, 2).unwrap();
        let result = reader.read(
            &mut stream,
            ColumnChunkEncoding::None,
            0,
            1,
            4,
            0,
            &mut vector,
            &chunk_index,
            ByteOrder::Little,
            None,
        );
        assert!(result.is_err());
    }
}
