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
use std::borrow::Cow;

use arrow::array::{Array, ArrayRef, Float64Array, ListArray, StructArray};
use arrow::datatypes::DataType;
use geo::{Coord, LineString, MultiPolygon, Point, Polygon};

use super::error::GeoError;
use super::geometry::{Geometry, distinct_ring_points};

/// Geometry shape encoded by a column, classified once from its Arrow type
/// before any row is processed.
///
/// The nesting mirrors the wire format: a point is `Struct{x,y}` and each
/// further `List` level adds one of ring/polygon/multi-polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Ring,
    Polygon,
    MultiPolygon,
}

impl GeometryKind {
    fn list_depth(self) -> usize {
        match self {
            GeometryKind::Point => 0,
            GeometryKind::Ring => 1,
            GeometryKind::Polygon => 2,
            GeometryKind::MultiPolygon => 3,
        }
    }
}

fn is_point_type(data_type: &DataType) -> bool {
    match data_type {
        DataType::Struct(fields) => {
            fields.len() == 2
                && fields
                    .iter()
                    .all(|f| f.data_type() == &DataType::Float64)
        }
        _ => false,
    }
}

/// Classify an argument's Arrow type as one of the geometry shapes. `name`
/// is the function the argument belongs to, reported on rejection.
pub fn classify(name: &'static str, data_type: &DataType) -> Result<GeometryKind, GeoError> {
    let mut depth = 0usize;
    let mut current = data_type;
    while let DataType::List(field) = current {
        depth += 1;
        if depth > 3 {
            break;
        }
        current = field.data_type();
    }
    if depth <= 3 && is_point_type(current) {
        Ok(match depth {
            0 => GeometryKind::Point,
            1 => GeometryKind::Ring,
            2 => GeometryKind::Polygon,
            _ => GeometryKind::MultiPolygon,
        })
    } else {
        Err(GeoError::IllegalArgumentType {
            name,
            data_type: format!("{:?}", data_type),
        })
    }
}

fn downcast_list<'a>(array: &'a dyn Array, context: &str) -> Result<&'a ListArray, GeoError> {
    array
        .as_any()
        .downcast_ref::<ListArray>()
        .ok_or_else(|| GeoError::IllegalColumn(format!("{} is not a ListArray", context)))
}

fn point_columns<'a>(
    array: &'a dyn Array,
) -> Result<(&'a StructArray, &'a Float64Array, &'a Float64Array), GeoError> {
    let points = array
        .as_any()
        .downcast_ref::<StructArray>()
        .ok_or_else(|| GeoError::IllegalColumn("point level is not a StructArray".to_string()))?;
    if points.num_columns() != 2 {
        return Err(GeoError::IllegalColumn(format!(
            "point struct has {} fields, expected 2",
            points.num_columns()
        )));
    }
    let x = points
        .column(0)
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| GeoError::IllegalColumn("point x field is not Float64".to_string()))?;
    let y = points
        .column(1)
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| GeoError::IllegalColumn("point y field is not Float64".to_string()))?;
    Ok((points, x, y))
}

/// Per-column geometry decoder. The nesting downcasts are verified once at
/// construction so a shape mismatch surfaces before the row loop begins.
#[derive(Debug, Clone)]
pub struct GeometryColumn {
    kind: GeometryKind,
    array: ArrayRef,
}

impl GeometryColumn {
    pub fn try_new(name: &'static str, array: ArrayRef) -> Result<Self, GeoError> {
        let kind = classify(name, array.data_type())?;
        // Walk the nesting once; decode() repeats the same downcasts per row.
        {
            let mut current: &dyn Array = array.as_ref();
            for level in 0..kind.list_depth() {
                let list = downcast_list(current, &format!("nesting level {}", level))?;
                current = list.values().as_ref();
            }
            point_columns(current)?;
        }
        Ok(Self { kind, array })
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// Decode the geometry at `row` into the canonical model.
    ///
    /// A bare ring decodes as a holeless polygon; upward normalization to
    /// MultiPolygon is left to the caller.
    pub fn decode(&self, row: usize) -> Result<Geometry, GeoError> {
        if self.array.is_null(row) {
            return Err(GeoError::MalformedGeometry {
                row,
                message: "null geometry value".to_string(),
            });
        }
        match self.kind {
            GeometryKind::Point => {
                let (points, x, y) = point_columns(self.array.as_ref())?;
                if points.is_null(row) || x.is_null(row) || y.is_null(row) {
                    return Err(GeoError::MalformedGeometry {
                        row,
                        message: "null coordinate".to_string(),
                    });
                }
                Ok(Geometry::Point(Point::new(x.value(row), y.value(row))))
            }
            GeometryKind::Ring => {
                let rings = downcast_list(self.array.as_ref(), "ring column")?;
                let ring = decode_ring(rings, row, row)?;
                Ok(Geometry::Polygon(Polygon::new(ring, vec![])))
            }
            GeometryKind::Polygon => {
                let polygons = downcast_list(self.array.as_ref(), "polygon column")?;
                Ok(Geometry::Polygon(decode_polygon(polygons, row, row)?))
            }
            GeometryKind::MultiPolygon => {
                let multi = downcast_list(self.array.as_ref(), "multipolygon column")?;
                let offsets = multi.value_offsets();
                let start = offsets[row] as usize;
                let end = offsets[row + 1] as usize;
                let polygons = downcast_list(multi.values().as_ref(), "polygon level")?;
                let mut out = Vec::with_capacity(end - start);
                for idx in start..end {
                    out.push(decode_polygon(polygons, idx, row)?);
                }
                Ok(Geometry::MultiPolygon(MultiPolygon(out)))
            }
        }
    }
}

fn decode_polygon(polygons: &ListArray, idx: usize, row: usize) -> Result<Polygon<f64>, GeoError> {
    let offsets = polygons.value_offsets();
    let start = offsets[idx] as usize;
    let end = offsets[idx + 1] as usize;
    if start == end {
        return Err(GeoError::MalformedGeometry {
            row,
            message: "polygon with no rings".to_string(),
        });
    }
    let rings = downcast_list(polygons.values().as_ref(), "ring level")?;
    let exterior = decode_ring(rings, start, row)?;
    let mut interiors = Vec::with_capacity(end - start - 1);
    for idx in start + 1..end {
        interiors.push(decode_ring(rings, idx, row)?);
    }
    Ok(Polygon::new(exterior, interiors))
}

fn decode_ring(rings: &ListArray, idx: usize, row: usize) -> Result<LineString<f64>, GeoError> {
    let offsets = rings.value_offsets();
    let start = offsets[idx] as usize;
    let end = offsets[idx + 1] as usize;
    let (points, x, y) = point_columns(rings.values().as_ref())?;
    let mut coords = Vec::with_capacity(end - start);
    for k in start..end {
        if points.is_null(k) || x.is_null(k) || y.is_null(k) {
            return Err(GeoError::MalformedGeometry {
                row,
                message: "null coordinate".to_string(),
            });
        }
        coords.push(Coord {
            x: x.value(k),
            y: y.value(k),
        });
    }
    let distinct = distinct_ring_points(&coords);
    if distinct < 3 {
        return Err(GeoError::MalformedGeometry {
            row,
            message: format!("ring with {} distinct points, at least 3 required", distinct),
        });
    }
    Ok(LineString::new(coords))
}

/// Operand binding resolved once per argument at batch start.
///
/// A length-1 argument over a multi-row batch is a broadcast constant; it is
/// decoded exactly once and the cached value is reused for every row.
/// Anything else is decoded per row.
#[derive(Debug)]
pub enum GeometrySource {
    Constant(MultiPolygon<f64>),
    Variable(GeometryColumn),
}

impl GeometrySource {
    pub fn try_new(name: &'static str, array: &ArrayRef, num_rows: usize) -> Result<Self, GeoError> {
        if array.len() != num_rows && array.len() != 1 {
            return Err(GeoError::IllegalColumn(format!(
                "geometry operand has {} rows, batch has {}",
                array.len(),
                num_rows
            )));
        }
        let column = GeometryColumn::try_new(name, array.clone())?;
        if array.len() == 1 && num_rows > 1 {
            let constant = column.decode(0)?.into_multi_polygon();
            Ok(GeometrySource::Constant(constant))
        } else {
            Ok(GeometrySource::Variable(column))
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, GeometrySource::Constant(_))
    }

    /// Canonical operand for one row: the cached value for constants, a
    /// fresh decode otherwise.
    pub fn multi_polygon_at(&self, row: usize) -> Result<Cow<'_, MultiPolygon<f64>>, GeoError> {
        match self {
            GeometrySource::Constant(multi) => Ok(Cow::Borrowed(multi)),
            GeometrySource::Variable(column) => {
                Ok(Cow::Owned(column.decode(row)?.into_multi_polygon()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::function::geo::serializer::{MultiPolygonSerializer, point_data_type};
    use arrow::datatypes::Field;
    use arrow_buffer::NullBuffer;
    use geo::Area;
    use std::sync::Arc;

    fn square(min: f64, max: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(min, min), (max, min), (max, max), (min, max)]),
            vec![],
        )
    }

    fn multi_polygon_column(rows: &[MultiPolygon<f64>]) -> ArrayRef {
        let mut serializer = MultiPolygonSerializer::with_capacity(rows.len());
        for row in rows {
            serializer.add(row);
        }
        serializer.finalize().expect("serialize")
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
    fn classify_recognizes_all_geometry_shapes() {
        let point = point_data_type();
        assert_eq!(
            classify("polygons_intersection", &point).unwrap(),
            GeometryKind::Point
        );

        let ring = DataType::List(Arc::new(Field::new("item", point.clone(), true)));
        assert_eq!(
            classify("polygons_intersection", &ring).unwrap(),
            GeometryKind::Ring
        );

        let polygon = DataType::List(Arc::new(Field::new("item", ring.clone(), true)));
        assert_eq!(
            classify("polygons_intersection", &polygon).unwrap(),
            GeometryKind::Polygon
        );

        let multi = DataType::List(Arc::new(Field::new("item", polygon, true)));
        assert_eq!(
            classify("polygons_intersection", &multi).unwrap(),
            GeometryKind::MultiPolygon
        );
    }

    #[test]
    fn classify_rejects_non_geometry_types_naming_the_function() {
        let err = classify("polygons_union", &DataType::Float64).unwrap_err();
        assert!(
            matches!(err, GeoError::IllegalArgumentType { name: "polygons_union", .. }),
            "{err}"
        );
        assert!(err.to_string().starts_with("polygons_union:"), "{err}");

        let ints = DataType::List(Arc::new(Field::new("item", DataType::Int64, true)));
        assert!(matches!(
            classify("polygons_union", &ints),
            Err(GeoError::IllegalArgumentType { .. })
        ));
    }

    #[test]
    fn decode_round_trips_polygon_with_hole() {
        let outer = LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = LineString::from(vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]);
        let with_hole = MultiPolygon(vec![Polygon::new(outer, vec![hole])]);
        let column = multi_polygon_column(std::slice::from_ref(&with_hole));

        let decoder = GeometryColumn::try_new("polygons_intersection", column).unwrap();
        assert_eq!(decoder.kind(), GeometryKind::MultiPolygon);
        let decoded = decoder.decode(0).unwrap().into_multi_polygon();
        assert_eq!(decoded.0.len(), 1);
        assert_eq!(decoded.0[0].interiors().len(), 1);
        assert_eq!(decoded.unsigned_area(), 96.0);
    }

    #[test]
    fn decode_point_column() {
        let column = point_column(&[(1.5, -2.5), (0.0, 0.0)]);
        let decoder = GeometryColumn::try_new("polygons_intersection", column).unwrap();
        match decoder.decode(0).unwrap() {
            Geometry::Point(p) => {
                assert_eq!(p.x(), 1.5);
                assert_eq!(p.y(), -2.5);
            }
            other => panic!("expected point, got {:?}", other),
        }
    }

    #[test]
    fn degenerate_ring_is_malformed() {
        let degenerate = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]),
            vec![],
        )]);
        let column = multi_polygon_column(&[degenerate]);
        let decoder = GeometryColumn::try_new("polygons_intersection", column).unwrap();
        let err = decoder.decode(0).unwrap_err();
        assert!(matches!(err, GeoError::MalformedGeometry { row: 0, .. }), "{err}");
    }

    #[test]
    fn ring_with_repeated_vertices_is_malformed() {
        // Only two distinct vertices once the repeats collapse.
        let repeated = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (0.0, 0.0), (1.0, 1.0)]),
            vec![],
        )]);
        let column = multi_polygon_column(&[repeated]);
        let decoder = GeometryColumn::try_new("polygons_intersection", column).unwrap();
        let err = decoder.decode(0).unwrap_err();
        assert!(matches!(err, GeoError::MalformedGeometry { row: 0, .. }), "{err}");
    }

    #[test]
    fn null_row_is_malformed() {
        let column = multi_polygon_column(&[
            MultiPolygon(vec![square(0.0, 1.0)]),
            MultiPolygon(vec![square(0.0, 2.0)]),
        ]);
        let list = column.as_any().downcast_ref::<ListArray>().unwrap().clone();
        let (field, offsets, values, _) = list.into_parts();
        let with_null = Arc::new(ListArray::new(
            field,
            offsets,
            values,
            Some(NullBuffer::from(vec![true, false])),
        )) as ArrayRef;

        let decoder = GeometryColumn::try_new("polygons_intersection", with_null).unwrap();
        assert!(decoder.decode(0).is_ok());
        let err = decoder.decode(1).unwrap_err();
        assert!(matches!(err, GeoError::MalformedGeometry { row: 1, .. }), "{err}");
    }

    #[test]
    fn constant_source_is_resolved_once_at_batch_start() {
        let column = multi_polygon_column(&[MultiPolygon(vec![square(0.0, 2.0)])]);
        let source = GeometrySource::try_new("polygons_intersection", &column, 3).unwrap();
        assert!(source.is_constant());
        for row in 0..3 {
            assert_eq!(source.multi_polygon_at(row).unwrap().unsigned_area(), 4.0);
        }

        let source = GeometrySource::try_new("polygons_intersection", &column, 1).unwrap();
        assert!(!source.is_constant());
    }

    #[test]
    fn operand_length_mismatch_is_illegal_column() {
        let column = multi_polygon_column(&[
            MultiPolygon(vec![square(0.0, 1.0)]),
            MultiPolygon(vec![square(0.0, 2.0)]),
        ]);
        let err = GeometrySource::try_new("polygons_intersection", &column, 5).unwrap_err();
        assert!(matches!(err, GeoError::IllegalColumn(_)), "{err}");
    }
}
