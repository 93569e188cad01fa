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
use std::collections::HashMap;

use arrow::array::ArrayRef;

use super::set_ops::SetOp;

#[derive(Clone, Copy)]
pub struct FunctionMeta {
    pub name: &'static str,
    pub min_args: usize,
    pub max_args: usize,
}

pub fn register(map: &mut HashMap<&'static str, crate::exec::function::FunctionKind>) {
    for (name, canonical) in GEO_FUNCTIONS {
        map.insert(
            *name,
            crate::exec::function::FunctionKind::Geo(*canonical),
        );
    }
}

pub fn metadata(name: &str) -> Option<FunctionMeta> {
    GEO_METADATA.iter().find(|m| m.name == name).copied()
}

pub fn eval_geo_function(
    name: &str,
    args: &[ArrayRef],
    num_rows: usize,
) -> Result<ArrayRef, String> {
    let canonical = GEO_FUNCTIONS
        .iter()
        .find_map(|(alias, target)| (*alias == name).then_some(*target))
        .unwrap_or(name);

    let result = match canonical {
        "polygons_intersection" => {
            super::set_ops::eval_set_operation(SetOp::Intersection, args, num_rows)
        }
        "polygons_union" => super::set_ops::eval_set_operation(SetOp::Union, args, num_rows),
        "polygons_sym_difference" => {
            super::set_ops::eval_set_operation(SetOp::SymDifference, args, num_rows)
        }
        "polygons_equals" => super::set_ops::eval_polygons_equals(args, num_rows),
        "polygon_area" => super::measures::eval_polygon_area(args, num_rows),
        "polygon_convex_hull" => super::measures::eval_polygon_convex_hull(args, num_rows),
        "point_in_polygon" => super::measures::eval_point_in_polygon(args, num_rows),
        other => return Err(format!("unsupported geo function: {}", other)),
    };
    result.map_err(|e| e.to_string())
}

// Lowercased aliases cover the upstream camelCase spellings.
static GEO_FUNCTIONS: &[(&str, &str)] = &[
    ("polygons_intersection", "polygons_intersection"),
    ("polygonsintersection", "polygons_intersection"),
    ("polygons_union", "polygons_union"),
    ("polygonsunion", "polygons_union"),
    ("polygons_sym_difference", "polygons_sym_difference"),
    ("polygonssymdifference", "polygons_sym_difference"),
    ("polygons_equals", "polygons_equals"),
    ("polygonsequals", "polygons_equals"),
    ("polygon_area", "polygon_area"),
    ("polygonarea", "polygon_area"),
    ("polygon_convex_hull", "polygon_convex_hull"),
    ("polygonconvexhull", "polygon_convex_hull"),
    ("point_in_polygon", "point_in_polygon"),
    ("pointinpolygon", "point_in_polygon"),
];

static GEO_METADATA: &[FunctionMeta] = &[
    FunctionMeta {
        name: "polygons_intersection",
        min_args: 2,
        max_args: 2,
    },
    FunctionMeta {
        name: "polygons_union",
        min_args: 2,
        max_args: 2,
    },
    FunctionMeta {
        name: "polygons_sym_difference",
        min_args: 2,
        max_args: 2,
    },
    FunctionMeta {
        name: "polygons_equals",
        min_args: 2,
        max_args: 2,
    },
    FunctionMeta {
        name: "polygon_area",
        min_args: 1,
        max_args: 1,
    },
    FunctionMeta {
        name: "polygon_convex_hull",
        min_args: 1,
        max_args: 1,
    },
    FunctionMeta {
        name: "point_in_polygon",
        min_args: 2,
        max_args: 2,
    },
];
