/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(uncommon_codepoints,mixed_script_confusables,confusable_idents)]

//! coordinate conversion and ellipsoidal distance computation for survey scenes:
//! UTM projection, Vincenty inverse geodesics on WGS84 and a conversion context that
//! ties grid, geodetic, internal (anchored) and external (display) coordinates together

use std::f64::consts::{PI as STD_PI};
use serde::{Serialize,Deserialize};
use num::{Num,ToPrimitive};

pub mod errors;
pub mod angle;
pub mod ellipsoid;
pub mod geo;
pub mod utm;
pub mod geodesic;
pub mod conversion;
pub mod config;

pub use errors::{OdinGeodesyError, Result};
pub use geo::GeoPoint;
pub use utm::{UTM, UtmZone, utm_from_geodetic, geodetic_from_utm};
pub use geodesic::{geodesic, GeodesicResult};
pub use conversion::{Coord, CoordSystem, ConversionConfig, ConversionContext, ExternalMapping, ExternalPoint, InternalPoint, format_as};
pub use config::load_config_path;

// syntactic sugar - the series expansions read closer to the literature this way
#[inline(always)] pub fn sin(x:f64) -> f64 { x.sin() }
#[inline(always)] pub fn cos(x:f64) -> f64 { x.cos() }
#[inline(always)] pub fn tan(x:f64) -> f64 { x.tan() }
#[inline(always)] pub fn sqrt(x:f64) -> f64 { x.sqrt() }
#[inline(always)] pub fn pow2(x:f64) -> f64 { x*x }

/// a generic bounding box without semantics for the coordinate type
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox <T: Num> {
    pub west: T,
    pub south: T,
    pub east: T,
    pub north: T
}

impl <T: Num + Copy + ToPrimitive> BoundingBox<T> {
    pub fn new(west: T, south: T, east: T, north: T)->Self {
        BoundingBox{ west, south, east, north}
    }

    pub fn from_wsen<N> (wsen: &[N;4]) -> BoundingBox<T> where N: Num + Copy + Into<T> {
        BoundingBox::<T>{
            west: wsen[0].into(),
            south: wsen[1].into(),
            east: wsen[2].into(),
            north: wsen[3].into()
        }
    }

    pub fn width (&self) -> T { self.east - self.west }
    pub fn height (&self) -> T { self.north - self.south }

    pub fn center (&self) -> Option<(f64,f64)> {
        let x = (self.west + self.east).to_f64()? / 2.0;
        let y = (self.south + self.north).to_f64()? / 2.0;
        Some((x,y))
    }
}

pub const PI: f64 = STD_PI;
pub const HALF_PI: f64 = PI / 2.0;
