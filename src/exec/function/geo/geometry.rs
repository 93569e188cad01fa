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
use geo::{Coord, MultiPolygon, Point, Polygon};

/// Canonical in-memory geometry decoded from one row of a column, before
/// normalization. The set-operation kernel works on `MultiPolygon` only,
/// so every variant normalizes upward via [`Geometry::into_multi_polygon`].
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point<f64>),
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl Geometry {
    /// Normalize upward to the kernel's operand type.
    ///
    /// A point carries no area, so it becomes the empty MultiPolygon; set
    /// operations against it behave like operations against empty space.
    pub fn into_multi_polygon(self) -> MultiPolygon<f64> {
        match self {
            Geometry::Point(_) => MultiPolygon(Vec::new()),
            Geometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
            Geometry::MultiPolygon(multi) => multi,
        }
    }
}

/// Number of distinct vertices in a ring. Repeated vertices count once
/// wherever they appear, so the closing duplicate is ignored and a ring
/// that revisits a vertex mid-sequence is not inflated by it. A ring needs
/// at least 3 to enclose any area.
pub fn distinct_ring_points(coords: &[Coord<f64>]) -> usize {
    let mut distinct: Vec<&Coord<f64>> = Vec::with_capacity(coords.len());
    for coord in coords {
        if !distinct.contains(&coord) {
            distinct.push(coord);
        }
    }
    distinct.len()
}
