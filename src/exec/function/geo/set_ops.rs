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
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray};
use geo::{BooleanOps, MultiPolygon};

use super::column::GeometrySource;
use super::error::GeoError;
use super::serializer::MultiPolygonSerializer;
use crate::common::logging::debug;

/// Boolean set operation applied per row to two MultiPolygon operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOp {
    Intersection,
    Union,
    SymDifference,
}

impl SetOp {
    fn name(self) -> &'static str {
        match self {
            SetOp::Intersection => "polygons_intersection",
            SetOp::Union => "polygons_union",
            SetOp::SymDifference => "polygons_sym_difference",
        }
    }
}

/// Invoke the boolean-operation kernel on two canonical operands.
///
/// The kernel accumulates into an empty output, so "no overlap" comes back
/// as a MultiPolygon with zero polygons and needs no placeholder cleanup;
/// tie-breaking and boundary-touching semantics are the kernel's own.
fn apply(op: SetOp, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    match op {
        SetOp::Intersection => a.intersection(b),
        SetOp::Union => a.union(b),
        SetOp::SymDifference => a.xor(b),
    }
}

fn two_sources(
    name: &'static str,
    args: &[ArrayRef],
    num_rows: usize,
) -> Result<(GeometrySource, GeometrySource), GeoError> {
    if args.len() < 2 {
        return Err(GeoError::TooFewArguments {
            name,
            expected: 2,
            actual: args.len(),
        });
    }
    let lhs = GeometrySource::try_new(name, &args[0], num_rows)?;
    let rhs = GeometrySource::try_new(name, &args[1], num_rows)?;
    debug!(
        "{}: rows={} lhs_const={} rhs_const={}",
        name,
        num_rows,
        lhs.is_constant(),
        rhs.is_constant(),
    );
    Ok((lhs, rhs))
}

/// Batched evaluator for the polygonal set operations: classifies both
/// operands once, decodes constants once, then walks rows 0..num_rows
/// appending each kernel result to the serializer. The first decode or
/// kernel failure aborts the whole batch with no partial output.
pub fn eval_set_operation(
    op: SetOp,
    args: &[ArrayRef],
    num_rows: usize,
) -> Result<ArrayRef, GeoError> {
    let (lhs, rhs) = two_sources(op.name(), args, num_rows)?;
    let mut serializer = MultiPolygonSerializer::with_capacity(num_rows);
    for row in 0..num_rows {
        let a = lhs.multi_polygon_at(row)?;
        let b = rhs.multi_polygon_at(row)?;
        serializer.add(&apply(op, &a, &b));
    }
    serializer.finalize()
}

/// Geometric equality: two operands cover the same area exactly when their
/// symmetric difference is empty.
pub fn eval_polygons_equals(args: &[ArrayRef], num_rows: usize) -> Result<ArrayRef, GeoError> {
    let (lhs, rhs) = two_sources("polygons_equals", args, num_rows)?;
    let mut values = Vec::with_capacity(num_rows);
    for row in 0..num_rows {
        let a = lhs.multi_polygon_at(row)?;
        let b = rhs.multi_polygon_at(row)?;
        values.push(a.xor(&*b).0.is_empty());
    }
    Ok(Arc::new(BooleanArray::from(values)) as ArrayRef)
}
