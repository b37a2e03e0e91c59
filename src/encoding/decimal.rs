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

//! Physical-width dispatch and string parsing for the decimal column type
//! (design §3.1, §4.9).

use crate::error::{OverflowErrorSnafu, ParseErrorSnafu, Result, UnsupportedPrecisionSnafu};
use snafu::OptionExt;

/// The integer width chosen to hold a decimal's unscaled value, selected
/// from `precision` alone (design §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalType {
    I16,
    I32,
    I64,
    I128,
}

impl PhysicalType {
    /// Width in bytes of one element on the wire / in the aligned buffer.
    pub fn width(self) -> usize {
        match self {
            PhysicalType::I16 => 2,
            PhysicalType::I32 => 4,
            PhysicalType::I64 => 8,
            PhysicalType::I128 => 16,
        }
    }
}

const MAX_PRECISION: u32 = 38;

/// Smallest of {16, 32, 64, 128} bits whose signed range contains
/// `±(10^precision - 1)`. Fails for `precision` outside `1..=38`.
pub fn physical_type_for_precision(precision: u32) -> Result<PhysicalType> {
    if precision == 0 || precision > MAX_PRECISION {
        return UnsupportedPrecisionSnafu { precision }.fail();
    }
    Ok(if precision <= 4 {
        PhysicalType::I16
    } else if precision <= 9 {
        PhysicalType::I32
    } else if precision <= 18 {
        PhysicalType::I64
    } else {
        PhysicalType::I128
    })
}

/// `10^precision - 1`, the largest magnitude representable at `precision`
/// digits. `precision` must already be known to be `<= 38` (the i128 bound).
fn max_magnitude(precision: u32) -> i128 {
    10i128.pow(precision) - 1
}

fn overflow_check(value: i128, precision: u32) -> Result<i128> {
    let bound = max_magnitude(precision);
    if value > bound || value < -bound {
        return OverflowErrorSnafu {
            value: value.to_string(),
            precision,
        }
        .fail();
    }
    Ok(value)
}

/// Parses a plain decimal literal (optional sign, digits, optional `.`
/// fraction, no exponent) into the unscaled integer for `(precision,
/// scale)`. Parses the digits exactly (no intermediate floating point) and
/// rounds half-away-from-zero when `scale` is smaller than the number of
/// fractional digits present.
pub fn parse_decimal_string(input: &str, precision: u32, scale: u32) -> Result<i128> {
    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return ParseErrorSnafu {
            kind: "decimal",
            input: input.to_string(),
            reason: "empty numeric literal".to_string(),
        }
        .fail();
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return ParseErrorSnafu {
            kind: "decimal",
            input: input.to_string(),
            reason: "non-digit character in numeric literal".to_string(),
        }
        .fail();
    }

    let combined: String = format!("{int_part}{frac_part}");
    let combined_digits: i128 = if combined.is_empty() {
        0
    } else {
        combined.parse().ok().context(ParseErrorSnafu {
            kind: "decimal",
            input: input.to_string(),
            reason: "numeric literal too long to represent".to_string(),
        })?
    };

    let frac_len = frac_part.len() as i32;
    let shift = scale as i32 - frac_len;

    let unscaled = if shift >= 0 {
        combined_digits
            .checked_mul(10i128.pow(shift as u32))
            .context(OverflowErrorSnafu {
                value: input.to_string(),
                precision,
            })?
    } else {
        let divisor = 10i128.pow((-shift) as u32);
        let quotient = combined_digits / divisor;
        let remainder = combined_digits % divisor;
        if remainder * 2 >= divisor {
            quotient + 1
        } else {
            quotient
        }
    };

    let signed = if negative { -unscaled } else { unscaled };
    overflow_check(signed, precision)
}

/// `true` → `10^scale`, `false` → `0` (design §4.9).
pub fn bool_to_decimal(value: bool, scale: u32) -> i128 {
    if value {
        10i128.pow(scale)
    } else {
        0
    }
}
