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

//! Pixel-aligned column codec core for the date, decimal and timestamp
//! column types of a columnar table-file engine: `ColumnVector`s,
//! `ColumnReader`s and `ColumnWriter`s over a pixel-partitioned chunk, plus
//! the run-length integer codec and byte-stream abstraction they build on.
//! See `SPEC_FULL.md` for the full component breakdown.

pub mod byte_stream;
pub mod chunk;
pub mod encoding;
pub mod error;
pub mod memory;
pub mod reader;
pub mod vector;
pub mod writer;
