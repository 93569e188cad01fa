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

use arrow::array::{Array, ArrayRef, Float64Array, ListArray, StructArray};
use arrow::datatypes::{DataType, Field, Fields};
use arrow_buffer::OffsetBuffer;
use geo::{LineString, MultiPolygon};

use super::error::GeoError;

/// Arrow type of one point: `Struct{ x: Float64, y: Float64 }`.
pub fn point_data_type() -> DataType {
    DataType::Struct(Fields::from(vec![
        Field::new("x", DataType::Float64, false),
        Field::new("y", DataType::Float64, false),
    ]))
}

/// Arrow type of one MultiPolygon row: `List<List<List<Struct{x,y}>>>`,
/// the dual of the shape the decoder consumes.
pub fn multi_polygon_data_type() -> DataType {
    let ring = DataType::List(Arc::new(Field::new("item", point_data_type(), true)));
    let polygon = DataType::List(Arc::new(Field::new("item", ring, true)));
    DataType::List(Arc::new(Field::new("item", polygon, true)))
}

/// Accumulates per-row MultiPolygon results into the nested-list output
/// column. Row order is preserved; an empty MultiPolygon becomes an empty
/// outermost list entry, distinct from any polygon-with-empty-ring shape
/// (which is never produced).
#[derive(Debug, Default)]
pub struct MultiPolygonSerializer {
    polygon_offsets: Vec<usize>,
    ring_offsets: Vec<usize>,
    point_offsets: Vec<usize>,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl MultiPolygonSerializer {
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            polygon_offsets: Vec::with_capacity(rows + 1),
            ring_offsets: Vec::new(),
            point_offsets: Vec::new(),
            xs: Vec::new(),
            ys: Vec::new(),
        }
    }

    fn push_ring(&mut self, ring: &LineString<f64>) {
        for coord in &ring.0 {
            self.xs.push(coord.x);
            self.ys.push(coord.y);
        }
        self.point_offsets.push(self.xs.len());
    }

    /// Append one row's result.
    pub fn add(&mut self, multi: &MultiPolygon<f64>) {
        for polygon in &multi.0 {
            self.push_ring(polygon.exterior());
            for hole in polygon.interiors() {
                self.push_ring(hole);
            }
            self.ring_offsets.push(self.point_offsets.len());
        }
        self.polygon_offsets.push(self.ring_offsets.len());
    }

    /// Build the completed output column.
    pub fn finalize(self) -> Result<ArrayRef, GeoError> {
        let points = StructArray::new(
            match point_data_type() {
                DataType::Struct(fields) => fields,
                _ => unreachable!(),
            },
            vec![
                Arc::new(Float64Array::from(self.xs)) as ArrayRef,
                Arc::new(Float64Array::from(self.ys)) as ArrayRef,
            ],
            None,
        );

        let rings = ListArray::new(
            Arc::new(Field::new("item", point_data_type(), true)),
            offsets_from_counts(&self.point_offsets)?,
            Arc::new(points),
            None,
        );
        let ring_type = rings.data_type().clone();

        let polygons = ListArray::new(
            Arc::new(Field::new("item", ring_type, true)),
            offsets_from_counts(&self.ring_offsets)?,
            Arc::new(rings),
            None,
        );
        let polygon_type = polygons.data_type().clone();

        let multi = ListArray::new(
            Arc::new(Field::new("item", polygon_type, true)),
            offsets_from_counts(&self.polygon_offsets)?,
            Arc::new(polygons),
            None,
        );
        Ok(Arc::new(multi) as ArrayRef)
    }
}

fn offsets_from_counts(counts: &[usize]) -> Result<OffsetBuffer<i32>, GeoError> {
    let mut offsets = Vec::with_capacity(counts.len() + 1);
    offsets.push(0i32);
    for &count in counts {
        let offset = i32::try_from(count).map_err(|_| {
            GeoError::IllegalColumn("multipolygon serializer offset overflow".to_string())
        })?;
        offsets.push(offset);
    }
    Ok(OffsetBuffer::new(offsets.into()))
}
