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
#![allow(non_snake_case)]

/// the inverse geodesic problem on the WGS84 ellipsoid, following
///    Vincenty, T. (1975).
///    Direct and Inverse Solutions of Geodesics on the Ellipsoid with Application of Nested Equations.
///    Survey Review, 23(176), 88–93. https://doi.org/10.1179/sre.1975.23.176.88

use serde::{Serialize,Deserialize};
use tracing::{debug,warn};
use uom::si::f64::Length;
use uom::si::length::meter;

use crate::angle::{normalize_180, Bearing};
use crate::ellipsoid::{Ellipsoid, WGS84};
use crate::errors::{OdinGeodesyError, Result};
use crate::geo::GeoPoint;
use crate::{sqrt, HALF_PI};

/// convergence threshold for λ in radians (~0.006mm)
pub const LAMBDA_TOLERANCE: f64 = 1e-12;
pub const MAX_ITERATIONS: usize = 100;

#[derive(Debug,Clone,Copy,Serialize,Deserialize)]
pub struct GeodesicResult {
    pub distance: Length,
    /// initial bearing at the first point towards the second
    pub bearing_forward: Bearing,
    /// bearing at the second point back towards the first
    pub bearing_reverse: Bearing,
}

impl GeodesicResult {
    pub fn distance_meters (&self) -> f64 { self.distance.get::<meter>() }
}

/// atan2 with explicit handling of the x == 0 boundary. Returns an error for (0,0) since the angle
/// is undefined there
pub fn checked_atan2 (y: f64, x: f64) -> Result<f64> {
    if x == 0.0 {
        if y > 0.0 { Ok( HALF_PI) }
        else if y < 0.0 { Ok( -HALF_PI) }
        else { Err( OdinGeodesyError::UndefinedAngle) }
    } else {
        Ok( y.atan2(x))
    }
}

/// distance and bearings between two geodetic points given in degrees
pub fn geodesic (lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<GeodesicResult> {
    geodesic_on( &WGS84, lat1, lon1, lat2, lon2)
}

/// all angles in degrees. Latitudes have to be within [-90,90] and longitudes within [-180,180]
pub fn geodesic_on (ell: &Ellipsoid, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<GeodesicResult> {
    GeoPoint::try_from_lat_lon( lat1, lon1)?;
    GeoPoint::try_from_lat_lon( lat2, lon2)?;

    let dlon = normalize_180( lon2 - lon1);

    if lat1 == lat2 && dlon == 0.0 {
        return Err( OdinGeodesyError::IdenticalPoints)
    }
    if lat1 + lat2 == 0.0 && dlon.abs() == 180.0 {
        return Err( OdinGeodesyError::AntipodalPoints)
    }

    let Ellipsoid { a, b, f, .. } = *ell;

    let L = dlon.to_radians();
    let U1 = ((1.0 - f) * lat1.to_radians().tan()).atan();
    let U2 = ((1.0 - f) * lat2.to_radians().tan()).atan();
    let (sin_U1, cos_U1) = U1.sin_cos();
    let (sin_U2, cos_U2) = U2.sin_cos();

    let mut λ = L;
    let mut n_iter = 0;

    let (sin_σ, cos_σ, σ, cos2_α, cos_2σm) = loop {
        if n_iter >= MAX_ITERATIONS {
            warn!("geodesic ({},{})->({},{}) did not converge", lat1, lon1, lat2, lon2);
            return Err( OdinGeodesyError::NoConvergence(n_iter))
        }
        n_iter += 1;

        let (sin_λ, cos_λ) = λ.sin_cos();
        let t1 = cos_U2 * sin_λ;
        let t2 = cos_U1 * sin_U2 - sin_U1 * cos_U2 * cos_λ;

        let sin_σ = sqrt( t1*t1 + t2*t2);
        if sin_σ == 0.0 { // coincident after reduction
            return Err( OdinGeodesyError::IdenticalPoints)
        }
        let cos_σ = sin_U1 * sin_U2 + cos_U1 * cos_U2 * cos_λ;
        let σ = checked_atan2( sin_σ, cos_σ)?;

        let sin_α = cos_U1 * cos_U2 * sin_λ / sin_σ;
        let cos2_α = 1.0 - sin_α * sin_α;

        // on the equator cos²α is 0 and the term vanishes
        let cos_2σm = if cos2_α != 0.0 { cos_σ - 2.0 * sin_U1 * sin_U2 / cos2_α } else { 0.0 };

        let C = f / 16.0 * cos2_α * (4.0 + f * (4.0 - 3.0 * cos2_α));
        let λ_prev = λ;
        λ = L + (1.0 - C) * f * sin_α * (σ + C * sin_σ * (cos_2σm + C * cos_σ * (-1.0 + 2.0 * cos_2σm * cos_2σm)));

        if (λ - λ_prev).abs() <= LAMBDA_TOLERANCE {
            break (sin_σ, cos_σ, σ, cos2_α, cos_2σm)
        }
    };
    debug!("geodesic converged after {} iterations", n_iter);

    let u2 = cos2_α * (a*a - b*b) / (b*b);
    let A = 1.0 + u2 / 16384.0 * (4096.0 + u2 * (-768.0 + u2 * (320.0 - 175.0 * u2)));
    let B = u2 / 1024.0 * (256.0 + u2 * (-128.0 + u2 * (74.0 - 47.0 * u2)));

    let cos2_2σm = cos_2σm * cos_2σm;
    let Δσ = B * sin_σ * (cos_2σm + B / 4.0 * (cos_σ * (-1.0 + 2.0 * cos2_2σm)
                - B / 6.0 * cos_2σm * (-3.0 + 4.0 * sin_σ * sin_σ) * (-3.0 + 4.0 * cos2_2σm)));
    let s = b * A * (σ - Δσ);

    let (sin_λ, cos_λ) = λ.sin_cos();
    let α1 = checked_atan2( cos_U2 * sin_λ, cos_U1 * sin_U2 - sin_U1 * cos_U2 * cos_λ)?;
    let α2r = checked_atan2( -cos_U1 * sin_λ, sin_U1 * cos_U2 - cos_U1 * sin_U2 * cos_λ)?;

    Ok( GeodesicResult {
        distance: Length::new::<meter>(s),
        bearing_forward: Bearing::from_radians( α1),
        bearing_reverse: Bearing::from_radians( α2r),
    })
}
