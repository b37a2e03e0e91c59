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

//! The shared column-vector state machine (design §3.2, C1) that the
//! type-specific vectors in this module build on.

use crate::error::{Result, StateErrorSnafu};
use crate::memory::EstimateMemory;
use snafu::ensure;

pub mod date;
pub mod decimal;
pub mod timestamp;

/// Bookkeeping common to every column vector: capacity, write/read cursors,
/// the null mask, and the closed flag (design §3.2 invariants I1-I4).
///
/// A type-specific vector embeds one of these and delegates the shared
/// operations to it, keeping the aligned primary buffer (which differs in
/// element type and alignment per vector) alongside it.
#[derive(Debug)]
pub struct ColumnVectorState {
    length: usize,
    write_index: usize,
    read_index: usize,
    is_null: Vec<bool>,
    closed: bool,
    /// Whether this vector participates in the encoded-payload (RLE) path;
    /// affects which buffers a writer using it owns and frees.
    encoding: bool,
}

impl ColumnVectorState {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            write_index: 0,
            read_index: 0,
            is_null: vec![false; length],
            closed: false,
            encoding: false,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }

    pub fn read_index(&self) -> usize {
        self.read_index
    }

    pub fn set_read_index(&mut self, index: usize) {
        self.read_index = index;
    }

    pub fn is_null(&self) -> &[bool] {
        &self.is_null
    }

    pub fn is_null_mut(&mut self) -> &mut [bool] {
        &mut self.is_null
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn encoding(&self) -> bool {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: bool) {
        self.encoding = encoding;
    }

    /// Fails if the vector has been closed (design §7 StateError).
    pub fn check_open(&self, what: &'static str) -> Result<()> {
        ensure!(!self.closed, StateErrorSnafu { what });
        Ok(())
    }

    /// Records `count` freshly written, non-null rows starting at
    /// `write_index`, advancing the cursor (I1).
    pub fn advance_write(&mut self, count: usize) {
        let end = self.write_index + count;
        debug_assert!(end <= self.length);
        self.write_index = end;
    }

    /// Widens the write cursor to `index` directly, for readers that fill a
    /// contiguous range row-by-row but skip the data buffer itself for null
    /// rows (the cursor must still cover the whole filled range, I1).
    pub fn ensure_write_through(&mut self, index: usize) {
        if index > self.write_index {
            self.write_index = index;
        }
    }

    /// Grows (or shrinks) the null mask to `new_len`, preserving the prefix
    /// `[0, write_index)` unconditionally and the rest only if
    /// `preserve_data` (I4).
    pub fn ensure_size(&mut self, new_len: usize, preserve_data: bool) {
        if new_len == self.length {
            return;
        }
        if preserve_data {
            self.is_null.resize(new_len, false);
        } else {
            self.is_null.clear();
            self.is_null.resize(new_len, false);
            self.write_index = self.write_index.min(new_len);
        }
        self.length = new_len;
    }

    /// Marks the vector closed. A second call is a silent no-op (I3).
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl EstimateMemory for ColumnVectorState {
    fn estimate_memory_size(&self) -> usize {
        self.is_null.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_no_nulls() {
        let state = ColumnVectorState::new(4);
        assert_eq!(state.is_null(), &[false, false, false, false]);
        assert_eq!(state.write_index(), 0);
    }

    #[test]
    fn ensure_size_preserves_prefix() {
        let mut state = ColumnVectorState::new(4);
        state.advance_write(4);
        state.is_null_mut()[1] = true;
        state.ensure_size(8, true);
        assert_eq!(state.len(), 8);
        assert!(state.is_null()[1]);
        assert_eq!(state.write_index(), 4);
    }

    #[test]
    fn ensure_size_without_preserve_resets_write_index() {
        let mut state = ColumnVectorState::new(4);
        state.advance_write(4);
        state.ensure_size(2, false);
        assert_eq!(state.write_index(), 2);
    }

    #[test]
    fn double_close_is_a_no_op() {
        let mut state = ColumnVectorState::new(1);
        state.close();
        state.close();
        assert!(state.closed());
        assert!(state.check_open("vector").is_err());
    }
}
