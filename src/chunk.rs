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

//! The chunk-index contract of the codec core (design §6.1). The footer,
//! postscript and statistics protobuf that ultimately produce these values
//! are out of scope for this core; callers hand in a plain, already-decoded
//! record.

/// Wire encoding of a column chunk's data region (design §3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnChunkEncoding {
    /// Values packed via the run-length integer codec.
    RunLength,
    /// Fixed-width big- or little-endian integers, byte order carried in
    /// writer options.
    None,
}

/// Per-pixel statistics relevant to this core. The statistics themselves are
/// produced by an external collaborator (the pixel-statistics producer);
/// this core only reads the `has_null` flag back out of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelStatistics {
    pub has_null: bool,
}

/// The portion of a chunk index this core needs: where the null bitmap
/// begins, and per-pixel null-presence flags.
#[derive(Debug, Clone, Default)]
pub struct ChunkIndex {
    pub is_null_offset: usize,
    pub pixel_statistics: Vec<PixelStatistics>,
}

impl ChunkIndex {
    pub fn new(is_null_offset: usize, pixel_statistics: Vec<PixelStatistics>) -> Self {
        Self {
            is_null_offset,
            pixel_statistics,
        }
    }

    pub fn has_null(&self, pixel_id: usize) -> bool {
        self.pixel_statistics
            .get(pixel_id)
            .map(|s| s.has_null)
            .unwrap_or(false)
    }
}
