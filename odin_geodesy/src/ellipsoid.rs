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

/// reference ellipsoid parameters used by the UTM projection and the geodesic solver.
/// Only WGS84 is modeled - the struct just keeps the derived powers of the eccentricity
/// in one place so that the series expansions don't have to recompute them.
/// Note that const float fns (sqrt) are still not stabilized, hence the literal values.

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Ellipsoid {
    /// semi major axis in meters
    pub a: f64,
    /// semi minor axis in meters
    pub b: f64,
    /// flattening
    pub f: f64,
    /// first eccentricity squared
    pub e2: f64,
    pub e4: f64,
    pub e6: f64,
    /// second eccentricity squared (e'²)
    pub ep2: f64,
}

/// semi major axis in meters
pub const WGS84_A: f64 = 6378137.0;

pub const WGS84_INVERSE_F: f64 = 298.257223563;
pub const WGS84_F: f64 = 1.0 / WGS84_INVERSE_F;

/// semi minor axis in meters
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

pub const WGS84: Ellipsoid = Ellipsoid {
    a: WGS84_A,
    b: WGS84_B,
    f: WGS84_F,
    e2: WGS84_E2,
    e4: WGS84_E2 * WGS84_E2,
    e6: WGS84_E2 * WGS84_E2 * WGS84_E2,
    ep2: WGS84_E2 / (1.0 - WGS84_E2),
};

impl Ellipsoid {
    /// first eccentricity
    pub fn e (&self)->f64 { self.e2.sqrt() }

    /// the e₁ = (1 - √(1-e²)) / (1 + √(1-e²)) parameter of the footpoint latitude series
    pub fn e1 (&self)->f64 {
        let s = (1.0 - self.e2).sqrt();
        (1.0 - s) / (1.0 + s)
    }

    /// radius of curvature in the prime vertical at geodetic latitude φ (radians)
    pub fn prime_vertical_radius (&self, φ: f64)->f64 {
        let sin_φ = φ.sin();
        self.a / (1.0 - self.e2 * sin_φ * sin_φ).sqrt()
    }

    /// meridional radius of curvature at geodetic latitude φ (radians)
    pub fn meridional_radius (&self, φ: f64)->f64 {
        let sin_φ = φ.sin();
        self.a * (1.0 - self.e2) / (1.0 - self.e2 * sin_φ * sin_φ).powf(1.5)
    }

    /// leading coefficient of the meridional arc series, M = a·(..)·φ - ...
    pub fn arc_coefficient (&self)->f64 {
        1.0 - self.e2/4.0 - 3.0*self.e4/64.0 - 5.0*self.e6/256.0
    }

    /// meridional arc length from the equator to geodetic latitude φ (radians), in meters
    pub fn meridional_arc (&self, φ: f64)->f64 {
        let Ellipsoid { a, e2, e4, e6, .. } = *self;

        a * ( self.arc_coefficient() * φ
            - (3.0*e2/8.0 + 3.0*e4/32.0 + 45.0*e6/1024.0) * (2.0*φ).sin()
            + (15.0*e4/256.0 + 45.0*e6/1024.0) * (4.0*φ).sin()
            - (35.0*e6/3072.0) * (6.0*φ).sin() )
    }

    /// footpoint latitude for the rectifying latitude μ (radians).
    /// This is a closed 4-term series in e₁, no iteration involved
    pub fn footpoint_latitude (&self, μ: f64)->f64 {
        let e1 = self.e1();
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_2 * e1_2;

        μ + (3.0*e1/2.0 - 27.0*e1_3/32.0) * (2.0*μ).sin()
          + (21.0*e1_2/16.0 - 55.0*e1_4/32.0) * (4.0*μ).sin()
          + (151.0*e1_3/96.0) * (6.0*μ).sin()
          + (1097.0*e1_4/512.0) * (8.0*μ).sin()
    }
}
