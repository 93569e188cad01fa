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
use thiserror::Error;

/// Errors raised by the geo function family. Every variant aborts the whole
/// batch call; there is no per-row recovery and no partial output column.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Argument count below the function's arity, detected before any row
    /// is processed.
    #[error("{name} expects {expected} arguments, got {actual}")]
    TooFewArguments {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The argument's Arrow type cannot encode polygonal geometry.
    #[error("{name}: argument type {data_type} cannot encode polygonal geometry")]
    IllegalArgumentType {
        name: &'static str,
        data_type: String,
    },

    /// The runtime column contents do not match the classified nested shape.
    #[error("illegal geometry column: {0}")]
    IllegalColumn(String),

    /// A specific row decodes to a structurally invalid geometry.
    #[error("malformed geometry at row {row}: {message}")]
    MalformedGeometry { row: usize, message: String },
}
