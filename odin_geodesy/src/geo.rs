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

/// geodetic points on the WGS84 ellipsoid surface.
/// We use the [new type](https://doc.rust-lang.org/rust-by-example/generics/new_types.html) pattern around
/// a [geo](https://docs.rs/geo/latest/geo/index.html) `Point` (x = longitude, y = latitude in degrees) so that
/// values can be handed to `geo` algorithms without copying, while still adding our range semantics.

use std::fmt;
use geo::Point;
use serde::{Serialize,Deserialize};

use crate::angle::{normalize_180, normalize_90, Latitude, Longitude};
use crate::errors::{range_error, Result};
use crate::geodesic::{self, GeodesicResult};

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(try_from = "LatLon", into = "LatLon")]
pub struct GeoPoint(Point);

impl GeoPoint {
    /// checked constructor - latitude has to be within [-90,90] and longitude within [-180,180]
    pub fn try_from_lat_lon (lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) { return Err( range_error( format!("latitude {lat}"))) }
        if !(-180.0..=180.0).contains(&lon) { return Err( range_error( format!("longitude {lon}"))) }
        Ok( GeoPoint( Point::new( lon, lat)))
    }

    /// normalizing constructor for computed values, which might wrap around the antimeridian
    pub fn from_lon_lat_degrees (lon: f64, lat: f64) -> Self {
        GeoPoint( Point::new( normalize_180(lon), normalize_90(lat)))
    }

    pub fn from_lon_lat (lon: Longitude, lat: Latitude) -> Self {
        GeoPoint( Point::new( lon.degrees(), lat.degrees()))
    }

    pub fn longitude(&self) -> Longitude { Longitude::from_degrees( self.0.x()) }
    pub fn latitude(&self) -> Latitude { Latitude::from_degrees( self.0.y()) }

    pub fn lat_deg (&self) -> f64 { self.0.y() }
    pub fn lon_deg (&self) -> f64 { self.0.x() }

    pub fn point (&self) -> &Point { &self.0 }

    /// ellipsoidal distance and bearings from self to `other`
    pub fn geodesic_to (&self, other: &GeoPoint) -> Result<GeodesicResult> {
        geodesic::geodesic( self.lat_deg(), self.lon_deg(), other.lat_deg(), other.lon_deg())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.latitude(), self.longitude())
    }
}

/// the serialized form. We accept "lat"/"latitude" and "lon"/"longitude" field names
#[derive(Serialize,Deserialize)]
struct LatLon {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "longitude")]
    lon: f64,
}

impl TryFrom<LatLon> for GeoPoint {
    type Error = crate::errors::OdinGeodesyError;
    fn try_from (ll: LatLon) -> Result<Self> { GeoPoint::try_from_lat_lon( ll.lat, ll.lon) }
}

impl From<GeoPoint> for LatLon {
    fn from (p: GeoPoint) -> Self { LatLon { lat: p.lat_deg(), lon: p.lon_deg() } }
}
