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

//! Run-length integer codec: the black-box contract of design §6.2.
//!
//! The wire framing is a header byte followed by a payload, repeated until
//! the input is exhausted: a non-negative header starts a *run* of
//! `header + 3` values sharing a constant delta (a zigzag-varint base
//! followed by a signed byte delta); a negative header starts a run of
//! `|header|` *literal* values, each its own zigzag varint. This mirrors the
//! run/literal split the reference run-length encoder uses, simplified to
//! operate purely in terms of 64-bit integers since that is all this codec
//! core ever feeds it.

use bytes::{Bytes, BytesMut};

use crate::error::{DecodeUnderrunSnafu, Result};
use crate::encoding::util::{read_varint, write_varint, zigzag_decode, zigzag_encode};

const MAX_RUN_LENGTH: usize = 130;
const MIN_RUN_LENGTH: usize = 3;
const MAX_LITERAL_LENGTH: usize = 128;

/// Lazily decodes a stream of 64-bit integers out of a [`Bytes`] buffer.
///
/// `next()` pulls one more value at a time, decoding a fresh run/literal
/// group from the input whenever the current one is exhausted.
pub struct RunLenIntDecoder {
    input: Bytes,
    pos: usize,
    pending: Vec<i64>,
    pending_pos: usize,
    is_signed: bool,
}

impl RunLenIntDecoder {
    pub fn new(input: Bytes, is_signed: bool) -> Self {
        Self {
            input,
            pos: 0,
            pending: Vec::with_capacity(MAX_RUN_LENGTH),
            pending_pos: 0,
            is_signed,
        }
    }

    fn decode_value(&mut self) -> Result<i64> {
        let (raw, consumed) = read_varint(&self.input[self.pos..])?;
        self.pos += consumed;
        Ok(if self.is_signed {
            zigzag_decode(raw)
        } else {
            raw as i64
        })
    }

    fn decode_group(&mut self) -> Result<()> {
        self.pending.clear();
        self.pending_pos = 0;
        if self.pos >= self.input.len() {
            return Ok(());
        }
        let header = self.input[self.pos] as i8;
        self.pos += 1;
        if header < 0 {
            let length = header.unsigned_abs() as usize;
            for _ in 0..length {
                let v = self.decode_value()?;
                self.pending.push(v);
            }
        } else {
            let length = header as usize + MIN_RUN_LENGTH;
            let delta = self.input[self.pos] as i8;
            self.pos += 1;
            let mut base = self.decode_value()?;
            self.pending.push(base);
            for _ in 1..length {
                base += delta as i64;
                self.pending.push(base);
            }
        }
        Ok(())
    }

    /// Decode exactly `out.len()` values into `out`.
    pub fn next_batch(&mut self, out: &mut [i64]) -> Result<()> {
        let mut filled = 0;
        while filled < out.len() {
            if self.pending_pos >= self.pending.len() {
                self.decode_group()?;
                if self.pending.is_empty() {
                    return DecodeUnderrunSnafu {
                        expected: out.len(),
                        actual: filled,
                    }
                    .fail();
                }
            }
            let available = self.pending.len() - self.pending_pos;
            let take = available.min(out.len() - filled);
            out[filled..filled + take]
                .copy_from_slice(&self.pending[self.pending_pos..self.pending_pos + take]);
            self.pending_pos += take;
            filled += take;
        }
        Ok(())
    }

    /// Decode a single value (convenience wrapper over [`Self::next_batch`]).
    pub fn next(&mut self) -> Result<i64> {
        let mut out = [0i64; 1];
        self.next_batch(&mut out)?;
        Ok(out[0])
    }
}

/// Encodes a slice of 64-bit integers into the run-length wire format
/// described above. Deterministic: a given input always produces the same
/// bytes.
pub struct RunLenIntEncoder {
    is_signed: bool,
}

impl RunLenIntEncoder {
    pub fn new(is_signed: bool) -> Self {
        Self { is_signed }
    }

    fn write_value(&self, out: &mut BytesMut, v: i64) {
        let raw = if self.is_signed {
            zigzag_encode(v)
        } else {
            v as u64
        };
        write_varint(out, raw);
    }

    /// Encode `values`, returning the produced bytes. Worst case each
    /// literal costs 1 header bit (amortized) plus up to 10 varint bytes.
    pub fn encode(&self, values: &[i64]) -> Bytes {
        let mut out = BytesMut::with_capacity(values.len() * 2);
        let mut i = 0;
        while i < values.len() {
            let run_len = self.run_length_at(values, i);
            if run_len >= MIN_RUN_LENGTH {
                let delta = values[i + 1] - values[i];
                let header = (run_len - MIN_RUN_LENGTH) as u8;
                out.extend_from_slice(&[header]);
                out.extend_from_slice(&[delta as i8 as u8]);
                self.write_value(&mut out, values[i]);
                i += run_len;
            } else {
                let literal_len = self.literal_length_at(values, i);
                let header = -(literal_len as i64) as i8 as u8;
                out.extend_from_slice(&[header]);
                for &v in &values[i..i + literal_len] {
                    self.write_value(&mut out, v);
                }
                i += literal_len;
            }
        }
        out.freeze()
    }

    /// Length (capped at [`MAX_RUN_LENGTH`]) of the constant-delta run
    /// starting at `i`; `0` or `1`/`2` if no run of at least
    /// [`MIN_RUN_LENGTH`] exists there.
    fn run_length_at(&self, values: &[i64], i: usize) -> usize {
        if i + 1 >= values.len() {
            return 0;
        }
        let delta = values[i + 1] - values[i];
        if delta > i8::MAX as i64 || delta < i8::MIN as i64 {
            return 0;
        }
        let mut len = 2;
        while len < MAX_RUN_LENGTH
            && i + len < values.len()
            && values[i + len] - values[i + len - 1] == delta
        {
            len += 1;
        }
        if len >= MIN_RUN_LENGTH {
            len
        } else {
            0
        }
    }

    /// Length of the literal group starting at `i`: runs until the next
    /// qualifying run of at least [`MIN_RUN_LENGTH`], the end of input, or
    /// [`MAX_LITERAL_LENGTH`], whichever comes first.
    fn literal_length_at(&self, values: &[i64], i: usize) -> usize {
        let mut len = 1;
        while len < MAX_LITERAL_LENGTH && i + len < values.len() {
            if self.run_length_at(values, i + len) >= MIN_RUN_LENGTH {
                break;
            }
            len += 1;
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(values: &[i64]) {
        let encoder = RunLenIntEncoder::new(true);
        let bytes = encoder.encode(values);
        let mut decoder = RunLenIntDecoder::new(bytes, true);
        let mut out = vec![0i64; values.len()];
        decoder.next_batch(&mut out).unwrap();
        assert_eq!(out, values);
    }

    #[test]
    fn round_trip_literals() {
        round_trip(&[2, 3, 6, 7, 11]);
    }

    #[test]
    fn round_trip_run() {
        let values: Vec<i64> = (1..=100).rev().collect();
        round_trip(&values);
    }

    #[test]
    fn round_trip_constant_run() {
        round_trip(&[7; 100]);
    }

    #[test]
    fn round_trip_mixed() {
        round_trip(&[314, -100, 0, 99999, 99999, 99999, 99999, 1, 2, 3, 3, 3]);
    }

    #[test]
    fn round_trip_empty() {
        round_trip(&[]);
    }

    #[test]
    fn decode_underrun_is_an_error() {
        let encoder = RunLenIntEncoder::new(true);
        let bytes = encoder.encode(&[1, 2, 3]);
        let mut decoder = RunLenIntDecoder::new(bytes, true);
        let mut out = vec![0i64; 10];
        assert!(decoder.next_batch(&mut out).is_err());
    }

    #[test]
    fn incremental_next_matches_batch() {
        let values = [1i64, 2, 3, 100, -5, -5, -5, -5];
        let encoder = RunLenIntEncoder::new(true);
        let bytes = encoder.encode(&values);
        let mut decoder = RunLenIntDecoder::new(bytes, true);
        let mut out = Vec::new();
        for _ in 0..values.len() {
            out.push(decoder.next().unwrap());
        }
        assert_eq!(out, values);
    }
}
