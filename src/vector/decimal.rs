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

//! `DecimalColumnVector` (design C3, §3.3): an unscaled-integer buffer whose
//! element width is selected from `precision` at construction (design
//! §3.1/§9 — the width is carried as a distinct buffer variant rather than
//! reinterpreting one allocation at multiple widths).

use crate::encoding::decimal::{
    bool_to_decimal, parse_decimal_string, physical_type_for_precision, PhysicalType,
};
use crate::error::Result;
use crate::memory::{AlignedBuffer, EstimateMemory};
use crate::vector::ColumnVectorState;

const ALIGNMENT: usize = 32;

enum DecimalBuffer {
    I16(AlignedBuffer<i16>),
    I32(AlignedBuffer<i32>),
    I64(AlignedBuffer<i64>),
    I128(AlignedBuffer<i128>),
}

impl DecimalBuffer {
    fn new(physical_type: PhysicalType, len: usize) -> Self {
        match physical_type {
            PhysicalType::I16 => DecimalBuffer::I16(AlignedBuffer::new(len, ALIGNMENT)),
            PhysicalType::I32 => DecimalBuffer::I32(AlignedBuffer::new(len, ALIGNMENT)),
            PhysicalType::I64 => DecimalBuffer::I64(AlignedBuffer::new(len, ALIGNMENT)),
            PhysicalType::I128 => DecimalBuffer::I128(AlignedBuffer::new(len, ALIGNMENT)),
        }
    }

    fn resize(&mut self, new_len: usize, preserve_data: bool) {
        match self {
            DecimalBuffer::I16(b) => b.resize(new_len, preserve_data),
            DecimalBuffer::I32(b) => b.resize(new_len, preserve_data),
            DecimalBuffer::I64(b) => b.resize(new_len, preserve_data),
            DecimalBuffer::I128(b) => b.resize(new_len, preserve_data),
        }
    }

    fn len(&self) -> usize {
        match self {
            DecimalBuffer::I16(b) => b.len(),
            DecimalBuffer::I32(b) => b.len(),
            DecimalBuffer::I64(b) => b.len(),
            DecimalBuffer::I128(b) => b.len(),
        }
    }

    fn byte_size(&self) -> usize {
        match self {
            DecimalBuffer::I16(b) => b.as_bytes().len(),
            DecimalBuffer::I32(b) => b.as_bytes().len(),
            DecimalBuffer::I64(b) => b.as_bytes().len(),
            DecimalBuffer::I128(b) => b.as_bytes().len(),
        }
    }

    fn get(&self, index: usize) -> i128 {
        match self {
            DecimalBuffer::I16(b) => b.as_slice()[index] as i128,
            DecimalBuffer::I32(b) => b.as_slice()[index] as i128,
            DecimalBuffer::I64(b) => b.as_slice()[index] as i128,
            DecimalBuffer::I128(b) => b.as_slice()[index],
        }
    }

    fn set(&mut self, index: usize, value: i128) {
        match self {
            DecimalBuffer::I16(b) => b.as_mut_slice()[index] = value as i16,
            DecimalBuffer::I32(b) => b.as_mut_slice()[index] = value as i32,
            DecimalBuffer::I64(b) => b.as_mut_slice()[index] = value as i64,
            DecimalBuffer::I128(b) => b.as_mut_slice()[index] = value,
        }
    }
}

pub struct DecimalColumnVector {
    state: ColumnVectorState,
    precision: u32,
    scale: u32,
    physical_type: PhysicalType,
    buffer: DecimalBuffer,
}

impl DecimalColumnVector {
    pub fn new(len: usize, precision: u32, scale: u32, encoding: bool) -> Result<Self> {
        let physical_type = physical_type_for_precision(precision)?;
        let mut state = ColumnVectorState::new(len);
        state.set_encoding(encoding);
        Ok(Self {
            state,
            precision,
            scale,
            physical_type,
            buffer: DecimalBuffer::new(physical_type, len),
        })
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn write_index(&self) -> usize {
        self.state.write_index()
    }

    pub fn read_index(&self) -> usize {
        self.state.read_index()
    }

    pub fn set_read_index(&mut self, index: usize) {
        self.state.set_read_index(index);
    }

    /// Widens the write cursor to `index` without touching the data buffer,
    /// for readers that scatter into non-null rows only and must still
    /// advance past any skipped null rows (I1).
    pub fn ensure_write_through(&mut self, index: usize) {
        self.state.ensure_write_through(index);
    }

    pub fn is_null(&self) -> &[bool] {
        self.state.is_null()
    }

    pub fn is_null_mut(&mut self) -> &mut [bool] {
        self.state.is_null_mut()
    }

    pub fn closed(&self) -> bool {
        self.state.closed()
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

    pub fn current(&self) -> Option<i128> {
        if self.state.closed() {
            None
        } else {
            Some(self.buffer.get(self.read_index()))
        }
    }

    /// Unscaled value at `index`, widened to `i128` regardless of the
    /// underlying physical width.
    pub fn get(&self, index: usize) -> i128 {
        self.buffer.get(index)
    }

    /// Direct row set (mirrors the reference `set`: widens the write
    /// cursor but does not touch the null mask).
    pub fn set(&mut self, index: usize, value: i128) {
        if index >= self.write_index() {
            self.state.advance_write(index + 1 - self.write_index());
        }
        self.buffer.set(index, value);
    }

    pub fn add_i128(&mut self, value: i128) -> Result<()> {
        self.state.check_open("DecimalColumnVector")?;
        if self.write_index() >= self.len() {
            self.ensure_size((self.len().max(1)) * 2, true);
        }
        let index = self.write_index();
        self.buffer.set(index, value);
        self.state.is_null_mut()[index] = false;
        self.state.advance_write(1);
        Ok(())
    }

    pub fn add_string(&mut self, value: &str) -> Result<()> {
        let unscaled = parse_decimal_string(value, self.precision, self.scale)?;
        self.add_i128(unscaled)
    }

    pub fn add_bool(&mut self, value: bool) -> Result<()> {
        let unscaled = bool_to_decimal(value, self.scale);
        self.add_i128(unscaled)
    }

    pub fn ensure_size(&mut self, size: usize, preserve_data: bool) {
        if self.len() >= size {
            return;
        }
        self.buffer.resize(size, preserve_data);
        self.state.ensure_size(size, preserve_data);
    }

    /// Releases the buffer unconditionally for every physical type,
    /// correcting the reference implementation's INT64/INT128 leak (open
    /// question resolved in DESIGN.md).
    pub fn close(&mut self) {
        if !self.closed() {
            self.state.close();
        }
    }
}

impl EstimateMemory for DecimalColumnVector {
    fn estimate_memory_size(&self) -> usize {
        self.buffer.byte_size() + self.state.estimate_memory_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_physical_type_from_precision() {
        let v = DecimalColumnVector::new(1, 5, 2, false).unwrap();
        assert_eq!(v.physical_type(), PhysicalType::I32);
    }

    #[test]
    fn rejects_precision_above_bound() {
        assert!(DecimalColumnVector::new(1, 39, 0, false).is_err());
    }

    #[test]
    fn add_and_read_back() {
        let mut v = DecimalColumnVector::new(2, 5, 2, false).unwrap();
        v.add_i128(314).unwrap();
        v.add_i128(-100).unwrap();
        assert_eq!(v.get(0), 314);
        assert_eq!(v.get(1), -100);
    }

    #[test]
    fn add_string_parses_and_scales() {
        let mut v = DecimalColumnVector::new(1, 5, 2, false).unwrap();
        v.add_string("3.14").unwrap();
        assert_eq!(v.get(0), 314);
    }

    #[test]
    fn add_bool_maps_to_scale_power() {
        let mut v = DecimalColumnVector::new(2, 5, 2, false).unwrap();
        v.add_bool(true).unwrap();
        v.add_bool(false).unwrap();
        assert_eq!(v.get(0), 100);
        assert_eq!(v.get(1), 0);
    }

    #[test]
    fn i128_physical_type_round_trips_full_width() {
        let mut v = DecimalColumnVector::new(1, 38, 0, false).unwrap();
        let big = 12345678901234567890123456789012345i128;
        v.add_i128(big).unwrap();
        assert_eq!(v.get(0), big);
    }
}
