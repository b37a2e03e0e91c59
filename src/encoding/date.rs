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

//! Date string parsing (design §4.9).

use chrono::NaiveDate;

use crate::error::{ParseErrorSnafu, Result, TypeMismatchSnafu};
use snafu::ResultExt;

/// Days since the UTC epoch, `1970-01-01`.
const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(d) => d,
    None => unreachable!(),
};

/// Parses `YYYY-MM-DD` into a signed day count since the UTC epoch.
pub fn parse_date_string(input: &str) -> Result<i32> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").context(ParseErrorSnafu {
        kind: "date",
        input: input.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })?;
    Ok((date - EPOCH).num_days() as i32)
}

/// Boolean → date always fails (design §4.9): there is no sensible day
/// count for a boolean source, so this is a type mismatch rather than a
/// parse failure.
pub fn bool_to_date() -> Result<i32> {
    TypeMismatchSnafu {
        reader_type: "boolean",
        vector_type: "date",
    }
    .fail()
}
