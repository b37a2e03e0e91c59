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

use snafu::prelude::*;
use snafu::Location;

/// Errors produced by the column codec core.
///
/// A failed operation surfaces at the public boundary of the reader/writer
/// call that triggered it; no partial success is ever reported.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CodecError {
    #[snafu(display(
        "type mismatch: reader is for {}, vector/operation expects {}",
        reader_type,
        vector_type
    ))]
    TypeMismatch {
        reader_type: String,
        vector_type: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("unsupported precision {} for decimal (max supported is 38)", precision))]
    UnsupportedPrecision {
        precision: u32,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "read range [{}, {}) crosses a pixel boundary (pixel_stride={})",
        offset,
        offset + size,
        pixel_stride
    ))]
    RangeCrossesPixel {
        offset: usize,
        size: usize,
        pixel_stride: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to parse {} value from {:?}: {}", kind, input, reason))]
    ParseError {
        kind: &'static str,
        input: String,
        reason: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "decimal value {} exceeds the representable range for precision {}",
        value,
        precision
    ))]
    OverflowError {
        value: String,
        precision: u32,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display(
        "decode underrun: expected {} values but input was exhausted after {}",
        expected,
        actual
    ))]
    DecodeUnderrun {
        expected: usize,
        actual: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("operation attempted on a closed {}", what))]
    StateError {
        what: &'static str,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("I/O error: {}", source))]
    Io {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("varint being decoded is too large"))]
    VarintTooLarge {
        #[snafu(implicit)]
        location: Location,
    },
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;
