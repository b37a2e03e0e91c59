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

//! `DateColumnVector` (design C2, §3.3): 32-byte aligned int32 day counts
//! since the UTC epoch.

use crate::encoding::date::{bool_to_date, parse_date_string};
use crate::error::Result;
use crate::memory::{AlignedBuffer, EstimateMemory};
use crate::vector::ColumnVectorState;

const ALIGNMENT: usize = 32;

pub struct DateColumnVector {
    state: ColumnVectorState,
    dates: AlignedBuffer<i32>,
}

impl DateColumnVector {
    pub fn new(len: usize, encoding: bool) -> Self {
        let mut state = ColumnVectorState::new(len);
        state.set_encoding(encoding);
        Self {
            state,
            dates: AlignedBuffer::new(len, ALIGNMENT),
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

    /// Day value at `read_index`, or `None` if the buffer has been closed.
    pub fn current(&self) -> Option<i32> {
        if self.state.closed() {
            None
        } else {
            Some(self.dates.as_slice()[self.read_index()])
        }
    }

    /// Raw backing slice, for readers/writers operating on whole ranges.
    pub fn data(&self) -> &[i32] {
        self.dates.as_slice()
    }

    pub fn data_mut(&mut self) -> &mut [i32] {
        self.dates.as_mut_slice()
    }

    /// Appends `days`, growing the buffer first if full.
    pub fn add_days(&mut self, days: i32) -> Result<()> {
        self.state.check_open("DateColumnVector")?;
        if self.write_index() >= self.len() {
            self.ensure_size((self.len().max(1)) * 2, true);
        }
        let index = self.write_index();
        self.dates.as_mut_slice()[index] = days;
        self.state.is_null_mut()[index] = false;
        self.state.advance_write(1);
        Ok(())
    }

    pub fn add_string(&mut self, value: &str) -> Result<()> {
        let days = parse_date_string(value)?;
        self.add_days(days)
    }

    pub fn add_bool(&mut self, _value: bool) -> Result<()> {
        bool_to_date()?;
        unreachable!()
    }

    /// Directly sets row `index`, widening the write cursor if needed
    /// (mirrors the reference `set`, which does not touch the null mask).
    pub fn set(&mut self, index: usize, days: i32) {
        if index >= self.write_index() {
            self.state.advance_write(index + 1 - self.write_index());
        }
        self.dates.as_mut_slice()[index] = days;
    }

    pub fn ensure_size(&mut self, size: usize, preserve_data: bool) {
        if self.len() >= size {
            return;
        }
        self.dates.resize(size, preserve_data);
        self.state.ensure_size(size, preserve_data);
    }

    /// Releases the buffer unconditionally, matching this core's corrected
    /// `close` semantics (no encoding-gated skip).
    pub fn close(&mut self) {
        if !self.closed() {
            self.state.close();
        }
    }
}

impl EstimateMemory for DateColumnVector {
    fn estimate_memory_size(&self) -> usize {
        self.dates.as_bytes().len() + self.state.estimate_memory_size()
    }
}
