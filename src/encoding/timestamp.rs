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

//! Timestamp string parsing and sub-second truncation (design §4.9).
//!
//! Parses to microseconds unconditionally (the microsecond-canonical form;
//! see DESIGN.md for why the alternative "scale by `10^precision`" reading
//! of the reference implementation is not followed here), then truncates
//! via [`round_micros_to_precision`].

use chrono::NaiveDateTime;

use crate::error::{ParseErrorSnafu, Result, TypeMismatchSnafu};
use snafu::ResultExt;

const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parses `YYYY-MM-DD HH:MM:SS[.fraction]` (UTC, no offset) into
/// microseconds since the epoch. The fractional part, if present, is
/// left-aligned to microseconds (`.5` means 500 000 µs).
pub fn parse_timestamp_string(input: &str) -> Result<i64> {
    let dt = NaiveDateTime::parse_from_str(input.trim(), FORMAT).context(ParseErrorSnafu {
        kind: "timestamp",
        input: input.to_string(),
        reason: "expected YYYY-MM-DD HH:MM:SS[.fraction]".to_string(),
    })?;
    let seconds = dt.and_utc().timestamp();
    let subsec_micros = dt.and_utc().timestamp_subsec_micros() as i64;
    Ok(seconds * 1_000_000 + subsec_micros)
}

/// `⌊v / 10^(6-p)⌋ × 10^(6-p)` for `p < 6`, identity for `p >= 6`.
pub fn round_micros_to_precision(v: i64, precision: u32) -> i64 {
    if precision >= 6 {
        return v;
    }
    let unit = 10i64.pow(6 - precision);
    v.div_euclid(unit) * unit
}

/// Boolean → timestamp always fails (design §4.9): there is no sensible
/// instant for a boolean source, so this is a type mismatch rather than a
/// parse failure.
pub fn bool_to_timestamp() -> Result<i64> {
    TypeMismatchSnafu {
        reader_type: "boolean",
        vector_type: "timestamp",
    }
    .fail()
}
