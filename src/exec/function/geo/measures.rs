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

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array};
use geo::{Area, Contains, ConvexHull, MultiPolygon};

use super::column::{GeometryColumn, GeometryKind, GeometrySource};
use super::error::GeoError;
use super::geometry::Geometry;
use super::serializer::MultiPolygonSerializer;
use crate::common::logging::debug;

fn one_source(
    name: &'static str,
    args: &[ArrayRef],
    num_rows: usize,
) -> Result<GeometrySource, GeoError> {
    if args.is_empty() {
        return Err(GeoError::TooFewArguments {
            name,
            expected: 1,
            actual: 0,
        });
    }
    let source = GeometrySource::try_new(name, &args[0], num_rows)?;
    debug!(
        "{}: rows={} const={}",
        name,
        num_rows,
        source.is_constant()
    );
    Ok(source)
}

/// Unsigned planar area of each row's geometry. Points and empty
/// MultiPolygons have area 0.
pub fn eval_polygon_area(args: &[ArrayRef], num_rows: usize) -> Result<ArrayRef, GeoError> {
    let source = one_source("polygon_area", args, num_rows)?;
    let mut values = Vec::with_capacity(num_rows);
    for row in 0..num_rows {
        values.push(source.multi_polygon_at(row)?.unsigned_area());
    }
    Ok(Arc::new(Float64Array::from(values)) as ArrayRef)
}

/// Convex hull of each row's geometry, returned as a single-polygon
/// MultiPolygon so all polygonal results share one output encoding. The
/// hull of an empty geometry is the empty MultiPolygon.
pub fn eval_polygon_convex_hull(args: &[ArrayRef], num_rows: usize) -> Result<ArrayRef, GeoError> {
    let source = one_source("polygon_convex_hull", args, num_rows)?;
    let mut serializer = MultiPolygonSerializer::with_capacity(num_rows);
    for row in 0..num_rows {
        let multi = source.multi_polygon_at(row)?;
        if multi.0.is_empty() {
            serializer.add(&MultiPolygon(Vec::new()));
        } else {
            serializer.add(&MultiPolygon(vec![multi.convex_hull()]));
        }
    }
    serializer.finalize()
}

/// Point-in-area predicate: true when the row's point lies inside the
/// row's polygonal operand (holes excluded). Boundary semantics are the
/// kernel's own. Either operand may be a broadcast constant.
pub fn eval_point_in_polygon(args: &[ArrayRef], num_rows: usize) -> Result<ArrayRef, GeoError> {
    let name = "point_in_polygon";
    if args.len() < 2 {
        return Err(GeoError::TooFewArguments {
            name,
            expected: 2,
            actual: args.len(),
        });
    }
    if args[0].len() != num_rows && args[0].len() != 1 {
        return Err(GeoError::IllegalColumn(format!(
            "point operand has {} rows, batch has {}",
            args[0].len(),
            num_rows
        )));
    }
    let points = GeometryColumn::try_new(name, args[0].clone())?;
    if points.kind() != GeometryKind::Point {
        return Err(GeoError::IllegalColumn(format!(
            "{} expects a point as first argument, got {:?}",
            name,
            points.kind()
        )));
    }
    let areas = GeometrySource::try_new(name, &args[1], num_rows)?;
    debug!(
        "{}: rows={} area_const={}",
        name,
        num_rows,
        areas.is_constant()
    );

    let point_len = args[0].len();
    let mut values = Vec::with_capacity(num_rows);
    for row in 0..num_rows {
        let point = match points.decode(if point_len == 1 { 0 } else { row })? {
            Geometry::Point(point) => point,
            _ => unreachable!(),
        };
        values.push(areas.multi_polygon_at(row)?.contains(&point));
    }
    Ok(Arc::new(BooleanArray::from(values)) as ArrayRef)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::function::geo::serializer::point_data_type;
    use arrow::array::StructArray;
    use arrow::datatypes::DataType;
    use geo::{LineString, Polygon};

    fn column(rows: &[MultiPolygon<f64>]) -> ArrayRef {
        let mut serializer = MultiPolygonSerializer::with_capacity(rows.len());
        for row in rows {
            serializer.add(row);
        }
        serializer.finalize().unwrap()
    }

    fn point_column(points: &[(f64, f64)]) -> ArrayRef {
        let xs = Float64Array::from(points.iter().map(|p| p.0).collect::<Vec<_>>());
        let ys = Float64Array::from(points.iter().map(|p| p.1).collect::<Vec<_>>());
        let fields = match point_data_type() {
            DataType::Struct(fields) => fields,
            other => panic!("unexpected point type {:?}", other),
        };
        Arc::new(StructArray::new(
            fields,
            vec![Arc::new(xs) as ArrayRef, Arc::new(ys) as ArrayRef],
            None,
        ))
    }

    #[test]
    fn area_of_unit_square_is_one() {
        let unit = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            vec![],
        )]);
        let out = eval_polygon_area(&[column(&[unit])], 1).unwrap();
        let areas = out.as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(areas.value(0), 1.0);
    }

    #[test]
    fn area_subtracts_holes() {
        let outer = LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = LineString::from(vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]);
        let with_hole = MultiPolygon(vec![Polygon::new(outer, vec![hole])]);
        let out = eval_polygon_area(&[column(&[with_hole])], 1).unwrap();
        let areas = out.as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(areas.value(0), 96.0);
    }

    #[test]
    fn convex_hull_covers_a_concave_polygon() {
        // L-shape; its hull fills in the notch.
        let concave = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![
                (0.0, 0.0),
                (4.0, 0.0),
                (4.0, 1.0),
                (1.0, 1.0),
                (1.0, 4.0),
                (0.0, 4.0),
            ]),
            vec![],
        )]);
        let concave_area = concave.unsigned_area();
        let out = eval_polygon_convex_hull(&[column(&[concave])], 1).unwrap();
        let decoder = GeometryColumn::try_new("polygon_convex_hull", out).unwrap();
        let hull = decoder.decode(0).unwrap().into_multi_polygon();
        assert_eq!(hull.0.len(), 1);
        assert!(hull.unsigned_area() >= concave_area);
    }

    #[test]
    fn convex_hull_of_empty_geometry_is_empty() {
        let out = eval_polygon_convex_hull(&[column(&[MultiPolygon(Vec::new())])], 1).unwrap();
        let decoder = GeometryColumn::try_new("polygon_convex_hull", out).unwrap();
        assert!(decoder.decode(0).unwrap().into_multi_polygon().0.is_empty());
    }

    #[test]
    fn point_in_polygon_distinguishes_inside_and_outside() {
        let unit = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]),
            vec![],
        )]);
        let points = point_column(&[(1.0, 1.0), (5.0, 5.0)]);
        let out = eval_point_in_polygon(&[points, column(&[unit.clone(), unit])], 2).unwrap();
        let booleans = out.as_any().downcast_ref::<BooleanArray>().unwrap();
        assert!(booleans.value(0));
        assert!(!booleans.value(1));
    }

    #[test]
    fn point_in_polygon_excludes_holes() {
        let outer = LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = LineString::from(vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]);
        let with_hole = MultiPolygon(vec![Polygon::new(outer, vec![hole])]);

        // Constant polygon broadcast against a varying point column.
        let points = point_column(&[(5.0, 5.0), (1.0, 1.0)]);
        let out = eval_point_in_polygon(&[points, column(&[with_hole])], 2).unwrap();
        let booleans = out.as_any().downcast_ref::<BooleanArray>().unwrap();
        assert!(!booleans.value(0));
        assert!(booleans.value(1));
    }

    #[test]
    fn point_in_polygon_rejects_a_non_point_first_argument() {
        let unit = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            vec![],
        )]);
        let polygons = column(&[unit.clone()]);
        let err = eval_point_in_polygon(&[polygons.clone(), polygons], 1).unwrap_err();
        assert!(matches!(err, GeoError::IllegalColumn(_)), "{err}");
    }
}
