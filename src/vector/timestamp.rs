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

//! `TimestampColumnVector` (design C4, §3.3): 64-byte aligned int64
//! microseconds since the UTC epoch, truncated to a declared sub-second
//! `precision`.

use crate::encoding::timestamp::{
    bool_to_timestamp, parse_timestamp_string, round_micros_to_precision,
};
use crate::error::Result;
use crate::memory::{AlignedBuffer, EstimateMemory};
use crate::vector::ColumnVectorState;

const ALIGNMENT: usize = 64;

pub struct TimestampColumnVector {
    state: ColumnVectorState,
    precision: u32,
    times: AlignedBuffer<i64>,
}

impl TimestampColumnVector {
    pub fn new(len: usize, precision: u32, encoding: bool) -> Self {
        let mut state = ColumnVectorState::new(len);
        state.set_encoding(encoding);
        Self {
            state,
            precision,
            times: AlignedBuffer::new(len, ALIGNMENT),
        }
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

    pub fn current(&self) -> Option<i64> {
        if self.state.closed() {
            None
        } else {
            Some(self.times.as_slice()[self.read_index()])
        }
    }

    pub fn data(&self) -> &[i64] {
        self.times.as_slice()
    }

    pub fn data_mut(&mut self) -> &mut [i64] {
        self.times.as_mut_slice()
    }

    pub fn set(&mut self, index: usize, micros: i64) {
        if index >= self.write_index() {
            self.state.advance_write(index + 1 - self.write_index());
        }
        self.times.as_mut_slice()[index] = micros;
    }

    /// Widens the write cursor to `index` without touching the data buffer
    /// (used by the reader to cover null rows it intentionally left
    /// indeterminate, design §4.4).
    pub fn ensure_write_through(&mut self, index: usize) {
        self.state.ensure_write_through(index);
    }

    pub fn add_micros(&mut self, micros: i64) -> Result<()> {
        self.state.check_open("TimestampColumnVector")?;
        if self.write_index() >= self.len() {
            self.ensure_size((self.len().max(1)) * 2, true);
        }
        let index = self.write_index();
        self.times.as_mut_slice()[index] = micros;
        self.state.is_null_mut()[index] = false;
        self.state.advance_write(1);
        Ok(())
    }

    /// Parses the canonical microsecond form, then truncates to this
    /// vector's declared precision.
    pub fn add_string(&mut self, value: &str) -> Result<()> {
        let micros = parse_timestamp_string(value)?;
        self.add_micros(round_micros_to_precision(micros, self.precision))
    }

    pub fn add_bool(&mut self, _value: bool) -> Result<()> {
        bool_to_timestamp()?;
        unreachable!()
    }

    pub fn ensure_size(&mut self, size: usize, preserve_data: bool) {
        if self.len() >= size {
            return;
        }
        self.times.resize(size, preserve_data);
        self.state.ensure_size(size, preserve_data);
    }

    pub fn close(&mut self) {
        if !self.closed() {
            self.state.close();
        }
    }
}

impl EstimateMemory for TimestampColumnVector {
    fn estimate_memory_size(&self) -> usize {
        self.times.as_bytes().len() + self.state.estimate_memory_size()
    }
}
