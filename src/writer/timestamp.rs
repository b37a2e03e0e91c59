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

//! `TimestampColumnWriter` (design C8, §4.8): symmetric to the date writer
//! over int64 microseconds. As for date/decimal, `nullsPadding` decides
//! whether a null row occupies a data slot on the `NONE` wire path; RLE
//! forces it off regardless (`effective_nulls_padding`), since a null's
//! placeholder value would otherwise corrupt the run/literal framing.

use bytes::Bytes;

use crate::chunk::ColumnChunkEncoding;
use crate::encoding::rle::RunLenIntEncoder;
use crate::vector::timestamp::TimestampColumnVector;
use crate::writer::{ColumnWriterState, WriterOptions};

pub struct TimestampColumnWriter {
    state: ColumnWriterState,
    cur_pixel_vector: Vec<i64>,
    rle_encoder: Option<RunLenIntEncoder>,
}

impl TimestampColumnWriter {
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

    pub fn write(&mut self, vector: &TimestampColumnVector, size: usize) -> usize {
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

    fn write_cur_part(&mut self, vector: &TimestampColumnVector, len: usize, offset: usize) {
        let pad_nulls = self.state.effective_nulls_padding();
        for i in 0..len {
            let row = offset + i;
            let is_null = vector.is_null()[row];
            if self.state.record_row(is_null, pad_nulls) {
                let value = if is_null { 0 } else { vector.data()[row] };
                let idx = self.state.cur_pixel_vector_index() - 1;
                self.cur_pixel_vector[idx] = value;
            }
        }
    }

    fn emit_pixel(&mut self) {
        let count = self.state.cur_pixel_vector_index();
        if let Some(encoder) = &self.rle_encoder {
            let encoded = encoder.encode(&self.cur_pixel_vector[..count]);
            self.state.output().put_bytes(&encoded);
        } else {
            let order = self.state.byte_order();
            for i in 0..count {
                let value = self.cur_pixel_vector[i];
                self.state.output().put_i64(value, order);
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
    use crate::reader::timestamp::TimestampColumnReader;
    use crate::writer::EncodingLevel;

    fn vector_from(values: &[Option<i64>]) -> TimestampColumnVector {
        let mut v = TimestampColumnVector::new(values.len(), 6, false);
        for &value in values {
            match value {
                Some(micros) => v.add_micros(micros).unwrap(),
                None => {
                    v.add_micros(0).unwrap();
                    let idx = v.write_index() - 1;
                    v.is_null_mut()[idx] = true;
                }
            }
        }
        v
    }

    #[test]
    fn none_round_trip_pads_null_data_slot() {
        let values = [Some(42i64), None, Some(123_456)];
        let vector = vector_from(&values);
        let options = WriterOptions::new()
            .with_pixel_stride(10)
            .with_byte_order(ByteOrder::Big)
            .with_nulls_padding(true);
        let mut writer = TimestampColumnWriter::new(options);
        writer.write(&vector, values.len());
        let bytes = writer.close();
        // All 3 rows get a data slot (the null's is a zero placeholder),
        // plus a ceil(10/8) = 2-byte null bitmap.
        assert_eq!(bytes.len(), 3 * 8 + 2);

        let mut stream = ByteStream::from_bytes(bytes);
        let chunk_index = ChunkIndex::new(3 * 8, vec![PixelStatistics { has_null: true }]);
        let mut out = TimestampColumnVector::new(3, 6, false);
        let mut reader = TimestampColumnReader::new();
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

        assert_eq!(out.is_null(), &[false, true, false]);
        assert_eq!(out.data()[0], 42);
        assert_eq!(out.data()[2], 123_456);
    }

    #[test]
    fn none_round_trip_without_padding_omits_null_data_slot() {
        let values = [Some(42i64), None, Some(123_456)];
        let vector = vector_from(&values);
        let options = WriterOptions::new()
            .with_pixel_stride(10)
            .with_byte_order(ByteOrder::Big)
            .with_nulls_padding(false);
        let mut writer = TimestampColumnWriter::new(options);
        writer.write(&vector, values.len());
        let bytes = writer.close();
        // Only the 2 non-null values are serialized, no padded zero slot,
        // plus a ceil(10/8) = 2-byte null bitmap.
        assert_eq!(bytes.len(), 2 * 8 + 2);
    }

    #[test]
    fn rle_round_trip() {
        let values = [Some(1i64), Some(2), Some(3), None, Some(1_000_000)];
        let vector = vector_from(&values);
        let options = WriterOptions::new()
            .with_pixel_stride(10)
            .with_encoding_level(EncodingLevel::EL2);
        let mut writer = TimestampColumnWriter::new(options);
        writer.write(&vector, values.len());
        let bytes = writer.close();

        let mut stream = ByteStream::from_bytes(bytes);
        // The null row is excluded from the RLE sequence; the 4 remaining
        // values (1, 2, 3, 1_000_000) encode as a 3-value run [1, 2, 3]
        // (3 bytes) followed by a 1-value literal group for 1_000_000
        // (header + a 3-byte varint, 4 bytes) = 7 bytes before the bitmap.
        let chunk_index = ChunkIndex::new(7, vec![PixelStatistics { has_null: true }]);
        let mut out = TimestampColumnVector::new(5, 6, false);
        let mut reader = TimestampColumnReader::new();
        reader
            .read(
                &mut stream,
                ColumnChunkEncoding::RunLength,
                0,
                5,
                10,
                0,
                &mut out,
                &chunk_index,
                ByteOrder::Little,
                None,
            )
            .unwrap();

        assert_eq!(out.is_null(), &[false, false, false, true, false]);
        assert_eq!(out.data()[0], 1);
        assert_eq!(out.data()[4], 1_000_000);
    }
}
