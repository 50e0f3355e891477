/*
 * Copyright © 2024, United States Government, as represented by the Administrator of 
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
#![allow(non_snake_case)]

use std::fmt;
use serde::{Deserialize, Serialize};
use tracing::{trace,warn};

use crate::ellipsoid::{Ellipsoid, WGS84};
use crate::errors::{invalid_grid, range_error, OdinGeodesyError, Result};
use crate::geo::GeoPoint;
use crate::{cos, tan, pow2};

/// UTM scale factor on the central meridian
pub const K0: f64 = 0.9996;
pub const FALSE_EASTING: f64 = 500_000.0;
pub const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

pub const MIN_LAT: f64 = -80.0;
pub const MAX_LAT: f64 = 84.0;

pub const MIN_EASTING: f64 = 100_000.0;
pub const MAX_EASTING: f64 = 1_000_000.0; // exclusive
pub const MAX_NORTHING: f64 = 10_000_000.0;

/// forced zones further off than this (in degrees from the central meridian) lose accuracy
const FORCED_ZONE_WARN_OFFSET: f64 = 9.0;

// no 'I' or 'O' bands, and no polar bands 'A','B','Y','Z'
const LAT_BAND: [char;20] = ['C','D','E','F','G','H','J','K','L','M','N','P','Q','R','S','T','U','V','W','X'];

/// latitude band letter for given latitude in degrees, or None outside of [-80,84]
pub fn lat_band (lat_deg: f64) -> Option<char> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat_deg) { return None }
    let idx = ((lat_deg - MIN_LAT) / 8.0).floor() as usize;
    Some( LAT_BAND[ idx.min( LAT_BAND.len()-1)]) // 'X' is 12° tall
}

pub fn is_valid_band (band: char) -> bool {
    LAT_BAND.contains(&band)
}

/// longitude of central meridian for zone in degrees
#[inline]
pub fn zone_central_longitude (zone: u32) -> f64 {
    ((zone as f64) - 1.0) * 6.0 - 180.0 + 3.0
}

#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq,Eq)]
#[serde(try_from = "ZoneSpec", into = "ZoneSpec")]
pub struct UtmZone {
    pub(crate) zone: u32,
    pub(crate) band: char,
}

impl UtmZone {
    pub fn new (zone: u32, band: char) -> Result<Self> {
        if zone < 1 || zone > 60 { return Err( invalid_grid( format!("zone {zone}"))) }
        if !is_valid_band(band) { return Err( OdinGeodesyError::UnsupportedBand(band)) }
        Ok( UtmZone { zone, band })
    }

    pub fn zone(&self) -> u32 { self.zone }
    pub fn band(&self) -> char { self.band }
    pub fn is_north(&self) -> bool { self.band >= 'N' }
    pub fn central_meridian(&self) -> f64 { zone_central_longitude( self.zone) }
}

// serialized form, deserialization goes through UtmZone::new
#[derive(Serialize,Deserialize)]
#[serde(rename = "UtmZone")]
struct ZoneSpec {
    zone: u32,
    band: char,
}

impl TryFrom<ZoneSpec> for UtmZone {
    type Error = OdinGeodesyError;
    fn try_from (z: ZoneSpec) -> Result<Self> { UtmZone::new( z.zone, z.band) }
}

impl From<UtmZone> for ZoneSpec {
    fn from (z: UtmZone) -> Self { ZoneSpec { zone: z.zone, band: z.band } }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.zone, self.band)
    }
}

/// a UTM grid coordinate. 
/// Values created through `UTM::new` (or deserialized) satisfy 100000 ≤ easting < 1000000 and 0 ≤ northing ≤ 10000000.
/// Projections with forced zones can lie outside of this easting range since we don't reject large offsets
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
#[serde(try_from = "UtmSpec", into = "UtmSpec")]
pub struct UTM {
    pub(crate) easting: f64,
    pub(crate) northing: f64,
    pub(crate) utm_zone: UtmZone,
}

impl UTM {
    pub fn new (easting: f64, northing: f64, zone: u32, band: char) -> Result<Self> {
        let utm = UTM { easting, northing, utm_zone: UtmZone::new( zone, band)? };
        utm.check_grid()?;
        if !(MIN_EASTING..MAX_EASTING).contains(&easting) { return Err( invalid_grid( format!("easting {easting}"))) }
        Ok( utm)
    }

    /// unchecked constructor for derived values (e.g. anchor offsets)
    pub(crate) fn from_parts (easting: f64, northing: f64, utm_zone: UtmZone) -> Self {
        UTM { easting, northing, utm_zone }
    }

    /// the rules every grid value has to satisfy, including forced zone projections:
    /// zone in [1,60], a supported band, finite easting and 0 ≤ northing ≤ 10000000
    pub fn check_grid (&self) -> Result<()> {
        UtmZone::new( self.utm_zone.zone, self.utm_zone.band)?;
        if !self.easting.is_finite() { return Err( invalid_grid( format!("easting {}", self.easting))) }
        if !(0.0..=MAX_NORTHING).contains(&self.northing) { return Err( invalid_grid( format!("northing {}", self.northing))) }
        Ok(())
    }

    pub fn easting (&self) -> f64 { self.easting }
    pub fn northing (&self) -> f64 { self.northing }
    pub fn utm_zone (&self) -> UtmZone { self.utm_zone }
    pub fn zone (&self) -> u32 { self.utm_zone.zone }
    pub fn band (&self) -> char { self.utm_zone.band }
    pub fn is_north (&self) -> bool { self.utm_zone.is_north() }
}

#[derive(Serialize,Deserialize)]
#[serde(rename = "UTM")]
struct UtmSpec {
    easting: f64,
    northing: f64,
    utm_zone: UtmZone,
}

impl TryFrom<UtmSpec> for UTM {
    type Error = OdinGeodesyError;
    fn try_from (u: UtmSpec) -> Result<Self> { UTM::new( u.easting, u.northing, u.utm_zone.zone, u.utm_zone.band) }
}

impl From<UTM> for UtmSpec {
    fn from (u: UTM) -> Self { UtmSpec { easting: u.easting, northing: u.northing, utm_zone: u.utm_zone } }
}

/// metre-truncated grid reference, e.g. "30U 512345 5943210"
impl fmt::Display for UTM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.utm_zone, self.easting.trunc() as i64, self.northing.trunc() as i64)
    }
}

/// natural UTM zone of a point, including the Norway and Svalbard exceptions
pub fn utm_zone (geo: &GeoPoint) -> u32 {
    let lat_deg = geo.lat_deg();
    let lon_deg = geo.lon_deg();

    // Norway
    if (56.0..64.0).contains(&lat_deg) && (3.0..12.0).contains(&lon_deg) {
        return 32
    }

    // Svalbard
    if lat_deg >= 72.0 {
        if (0.0..9.0).contains(&lon_deg) { return 31 }
        if (9.0..21.0).contains(&lon_deg) { return 33 }
        if (21.0..33.0).contains(&lon_deg) { return 35 }
        if (33.0..42.0).contains(&lon_deg) { return 37 }
    }

    naive_utm_zone( lon_deg)
}

/// plain 6° zone without exceptions. Longitude 180 belongs to zone 60
pub fn naive_utm_zone (lon_deg: f64) -> u32 {
    ((((lon_deg + 180.0) / 6.0).floor() as i64).clamp(0, 59) + 1) as u32
}

fn check_envelope (geo: &GeoPoint) -> Result<char> {
    let lat_deg = geo.lat_deg();
    let lon_deg = geo.lon_deg();

    if !(-180.0..=180.0).contains(&lon_deg) {
        return Err( range_error( format!("longitude {lon_deg} outside [-180,180]")))
    }
    lat_band( lat_deg).ok_or_else( || range_error( format!("latitude {lat_deg} outside UTM range [-80,84]")))
}

pub fn geo_to_utm (geo: &GeoPoint) -> Result<UTM> {
    geo_to_utm_zone( geo, None)
}

/// forward projection. If `force_zone` is set the point is projected relative to that zone's central meridian,
/// no matter how far away it is. This is used to express points close to a zone boundary in a neighboring zone.
/// Accuracy degrades with the distance from the central meridian (the series is only good to a few degrees)
pub fn geo_to_utm_zone (geo: &GeoPoint, force_zone: Option<u32>) -> Result<UTM> {
    let band = check_envelope( geo)?;

    let zone = match force_zone {
        Some(z) => {
            if z < 1 || z > 60 { return Err( range_error( format!("forced zone {z} outside [1,60]"))) }
            let offset = (geo.lon_deg() - zone_central_longitude(z)).abs();
            if offset > FORCED_ZONE_WARN_OFFSET {
                warn!("projection into forced zone {} is {:.1}° off its central meridian", z, offset);
            }
            z
        }
        None => utm_zone( geo)
    };

    let utm_zone = UtmZone { zone, band };
    let (easting, northing) = project( &WGS84, geo.lat_deg(), geo.lon_deg(), utm_zone.central_meridian());
    trace!("projected {} -> {} {} {}", geo, utm_zone, easting, northing);

    Ok( UTM { easting, northing, utm_zone })
}

/// the ellipsoidal transverse mercator forward series (Snyder, USGS PP 1395, eq. 8-9 .. 8-10).
/// Returns easting and northing in meters, including false easting/northing
fn project (ell: &Ellipsoid, lat_deg: f64, lon_deg: f64, lon0_deg: f64) -> (f64,f64) {
    let φ = lat_deg.to_radians();
    let dλ = (lon_deg - lon0_deg).to_radians();
    let ep2 = ell.ep2;

    let N = ell.prime_vertical_radius( φ);
    let T = pow2( tan(φ));
    let C = ep2 * pow2( cos(φ));
    let A = cos(φ) * dλ;
    let M = ell.meridional_arc( φ);

    let A2 = A * A;
    let A3 = A2 * A;
    let A4 = A2 * A2;
    let A5 = A4 * A;
    let A6 = A3 * A3;

    let easting = K0 * N * ( A 
        + (1.0 - T + C) * A3 / 6.0
        + (5.0 - 18.0*T + T*T + 72.0*C - 58.0*ep2) * A5 / 120.0 ) + FALSE_EASTING;

    let mut northing = K0 * ( M + N * tan(φ) * ( A2 / 2.0
        + (5.0 - T + 9.0*C + 4.0*C*C) * A4 / 24.0
        + (61.0 - 58.0*T + T*T + 600.0*C - 330.0*ep2) * A6 / 720.0 ));

    if lat_deg < 0.0 { northing += FALSE_NORTHING_SOUTH }

    (easting, northing)
}

/// inverse projection. This does not fail since `UTM` values can only be obtained through validated
/// constructors or our own forward projection
pub fn utm_to_geo (utm: &UTM) -> GeoPoint {
    let (lat_deg, lon_deg) = unproject( &WGS84, utm.easting, utm.northing, &utm.utm_zone);
    GeoPoint::from_lon_lat_degrees( lon_deg, lat_deg)
}

/// inverse transverse mercator series (Snyder eq. 8-12 .. 8-18), footpoint latitude from the e₁ series
fn unproject (ell: &Ellipsoid, easting: f64, northing: f64, utm_zone: &UtmZone) -> (f64,f64) {
    let x = easting - FALSE_EASTING;
    let y = if utm_zone.is_north() { northing } else { northing - FALSE_NORTHING_SOUTH };
    let ep2 = ell.ep2;

    let M = y / K0;
    let μ = M / (ell.a * ell.arc_coefficient());
    let φ1 = ell.footpoint_latitude( μ);

    let C1 = ep2 * pow2( cos(φ1));
    let T1 = pow2( tan(φ1));
    let N1 = ell.prime_vertical_radius( φ1);
    let R1 = ell.meridional_radius( φ1);
    let D = x / (N1 * K0);

    let D2 = D * D;
    let D3 = D2 * D;
    let D4 = D2 * D2;
    let D5 = D4 * D;
    let D6 = D3 * D3;

    let φ = φ1 - (N1 * tan(φ1) / R1) * ( D2 / 2.0
        - (5.0 + 3.0*T1 + 10.0*C1 - 4.0*C1*C1 - 9.0*ep2) * D4 / 24.0
        + (61.0 + 90.0*T1 + 298.0*C1 + 45.0*T1*T1 - 252.0*ep2 - 3.0*C1*C1) * D6 / 720.0 );

    let dλ = ( D
        - (1.0 + 2.0*T1 + C1) * D3 / 6.0
        + (5.0 - 2.0*C1 + 28.0*T1 - 3.0*C1*C1 + 8.0*ep2 + 24.0*T1*T1) * D5 / 120.0 ) / cos(φ1);

    (φ.to_degrees(), utm_zone.central_meridian() + dλ.to_degrees())
}

//--- flat function API

pub fn utm_from_geodetic (lat: f64, lon: f64, force_zone: Option<u32>) -> Result<UTM> {
    let geo = GeoPoint::try_from_lat_lon( lat, lon)?;
    geo_to_utm_zone( &geo, force_zone)
}

pub fn geodetic_from_utm (utm: &UTM) -> GeoPoint {
    utm_to_geo( utm)
}
