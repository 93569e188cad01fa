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

//! Polygonal geometry functions over nested-list Arrow columns.
//!
//! Each row of an operand column encodes a point, ring, polygon (outer ring
//! first, then holes), or multi-polygon as nested lists of `Struct{x,y}`
//! coordinate pairs. Decoding normalizes every row upward to a canonical
//! `MultiPolygon<f64>` before the set-operation kernel runs.

mod column;
mod dispatch;
mod error;
mod geometry;
mod measures;
mod serializer;
mod set_ops;

pub use column::{GeometryColumn, GeometryKind, GeometrySource, classify};
pub use dispatch::{FunctionMeta, eval_geo_function, metadata, register};
pub use error::GeoError;
pub use geometry::Geometry;
pub use measures::{eval_point_in_polygon, eval_polygon_area, eval_polygon_convex_hull};
pub use serializer::{MultiPolygonSerializer, multi_polygon_data_type, point_data_type};
pub use set_ops::{SetOp, eval_polygons_equals, eval_set_operation};
