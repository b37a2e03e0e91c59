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

//! Base-128 varint and zigzag helpers shared by the RLE codec.

use bytes::{BufMut, BytesMut};

use crate::error::{IoSnafu, Result, VarintTooLargeSnafu};
use snafu::{OptionExt, ResultExt};

/// Zigzag-encode a signed 64-bit integer so small-magnitude negative values
/// stay small after varint encoding.
#[inline]
pub fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

#[inline]
pub fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

/// Read one base-128 varint (unsigned, no zigzag) from `bytes`, advancing
/// past it. Returns `None` if `bytes` is too short.
pub fn read_varint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut num: u64 = 0;
    let mut offset = 0u32;
    let mut consumed = 0;
    for &byte in bytes {
        consumed += 1;
        let is_last = byte & 0x80 == 0;
        let without_continuation = (byte & 0x7F) as u64;
        let shifted = without_continuation
            .checked_shl(offset)
            .context(VarintTooLargeSnafu)?;
        num |= shifted;
        offset += 7;
        if is_last {
            return Ok((num, consumed));
        }
        if offset >= 64 {
            return VarintTooLargeSnafu.fail();
        }
    }
    std::io::Result::<()>::Err(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "varint truncated before continuation bit cleared",
    ))
    .context(IoSnafu)?;
    unreachable!()
}

/// Write `value` as a base-128 varint into `out`.
pub fn write_varint(out: &mut BytesMut, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.put_u8(byte);
            break;
        } else {
            out.put_u8(byte | 0x80);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_round_trip() {
        for v in [-1_000_000_i64, -1, 0, 1, 42, i64::MIN, i64::MAX] {
            assert_eq!(zigzag_decode(zigzag_encode(v)), v);
        }
    }

    #[test]
    fn varint_round_trip() {
        for v in [0u64, 1, 127, 128, 300, u64::MAX] {
            let mut buf = BytesMut::new();
            write_varint(&mut buf, v);
            let (decoded, consumed) = read_varint(&buf).unwrap();
            assert_eq!(decoded, v);
            assert_eq!(consumed, buf.len());
        }
    }
}
