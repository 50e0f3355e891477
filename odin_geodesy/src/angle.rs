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

use std::{fmt, marker::PhantomData, cmp};
use serde::ser::{Serialize as SerializeTrait, Serializer};
use serde::de::{self, Deserialize as DeserializeTrait, Deserializer, Visitor};

#[inline]
pub fn normalize_90 (d:f64) -> f64 {
    let x = d % 360.0;

    if x < -90.0 { -180.0 - x }
    else if x > 90.0 { 180.0 - x }
    else { x }
}

#[inline]
pub fn normalize_180 (d: f64) -> f64 {
    let x = d % 360.0;
    
    if x < -180.0 { 360.0 + x }
    else if x > 180.0 { x - 360.0 }
    else { x }
}

/// normalize into [0,360)
#[inline]
pub fn normalize_360 (d: f64) -> f64 {
    let x = d % 360.0;
    let x = if x < 0.0 { 360.0 + x } else { x };
    if x >= 360.0 { 0.0 } else { x } // -1e-20 % 360.0 + 360.0 rounds to 360.0
}

/// split decimal degrees into (sign, whole degrees, decimal minutes)
/// The sign refers to the value as displayed with 3 minute decimals, i.e. a tiny negative value is not negative
pub fn degrees_minutes (d: f64) -> (bool, u32, f64) {
    let a = d.abs();
    let mut deg = a.trunc();
    let mut min = (a - deg) * 60.0;

    // avoid "59.9999'" formatting as "60.000'"
    if (min * 1000.0).round() >= 60000.0 {
        deg += 1.0;
        min = 0.0;
    }

    let is_negative = d < 0.0 && (deg > 0.0 || (min * 1000.0).round() > 0.0);
    (is_negative, deg as u32, min)
}

pub trait AngleKind {
    fn normalize(v: f64)->f64;
    fn fmt_display(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}°", value) }
    fn fmt_debug(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

#[derive(Debug,Clone,Copy)]
pub struct LatitudeKind {}
impl AngleKind for LatitudeKind {
    fn normalize(v: f64) -> f64 { normalize_90(v) }
    fn fmt_display(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt_dm( value, 'N', 'S', f) }
    fn fmt_debug(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Latitude({})", value) }
}

#[derive(Debug,Clone,Copy)]
pub struct LongitudeKind {}
impl AngleKind for LongitudeKind {
    fn normalize(v: f64) -> f64 { normalize_180(v) }
    fn fmt_display(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt_dm( value, 'E', 'W', f) }
    fn fmt_debug(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Longitude({})", value) }
}

/// azimuth angles clockwise from north, normalized into [0,360)
#[derive(Debug,Clone,Copy)]
pub struct BearingKind {}
impl AngleKind for BearingKind {
    fn normalize(v: f64) -> f64 { normalize_360(v) }
    fn fmt_debug(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Bearing({})", value) }
}

/// degree/minute format with hemisphere letter, e.g. `53°37.683'N`
fn fmt_dm (value: f64, pos: char, neg: char, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (is_negative, deg, min) = degrees_minutes(value);
    write!(f, "{}°{:06.3}'{}", deg, min, if is_negative { neg } else { pos })
}

#[derive(Copy, Clone)]
pub struct NormalizedAngle<K> where K: AngleKind {
    value: f64,
    kind: PhantomData<K>,
}

impl<K> NormalizedAngle<K> where K: AngleKind {
    #[inline]
    pub fn from_degrees(deg: f64) -> Self {
        NormalizedAngle { value: K::normalize(deg), kind: PhantomData }
    }

    #[inline]
    pub fn from_radians(rad: f64) -> Self {
        NormalizedAngle { value: K::normalize(rad.to_degrees()), kind: PhantomData }
    }

    #[inline] pub fn radians(&self)->f64 { self.value.to_radians() }
    #[inline] pub fn degrees(&self)->f64 { self.value }

    #[inline] pub fn sin(&self)->f64 { self.value.to_radians().sin() }
    #[inline] pub fn cos(&self)->f64 { self.value.to_radians().cos() }
    #[inline] pub fn tan(&self)->f64 { self.value.to_radians().tan() }
}

impl <K> From<NormalizedAngle<K>> for f64 where K: AngleKind {
    fn from(a: NormalizedAngle<K>) -> Self { a.value }
}

impl<K> fmt::Display for NormalizedAngle<K> where K: AngleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { K::fmt_display( self.value, f) }
}

impl<K> fmt::Debug for NormalizedAngle<K> where K: AngleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { K::fmt_debug( self.value, f) }
}

impl<K> cmp::PartialOrd for NormalizedAngle<K> where K: AngleKind {
    fn partial_cmp(&self,other:&Self) -> Option<cmp::Ordering> { self.value.partial_cmp(&other.value) }
}

impl<K> cmp::PartialEq for NormalizedAngle<K> where K: AngleKind {
    fn eq(&self, other: &Self) -> bool { self.value == other.value }
}

pub type Latitude = NormalizedAngle<LatitudeKind>;
pub type Longitude = NormalizedAngle<LongitudeKind>;
pub type Bearing = NormalizedAngle<BearingKind>;

impl Bearing {
    /// the opposite direction
    pub fn reversed (&self) -> Bearing { Bearing::from_degrees( self.value + 180.0) }

    /// smallest absolute angle between two bearings in degrees, [0,180]
    pub fn delta (&self, other: &Bearing) -> f64 {
        let d = (self.value - other.value).abs();
        if d > 180.0 { 360.0 - d } else { d }
    }
}

//--- serde support

macro_rules! define_angle_deserializer {
    ($angle_type: ident, $min:literal, $max:literal) => {
        impl<'de> DeserializeTrait<'de> for $angle_type {
            fn deserialize<D>(deserializer: D) -> Result<$angle_type, D::Error> where D: Deserializer<'de> {
                struct AngleVisitor;
        
                impl<'de> Visitor<'de> for AngleVisitor {
                    type Value = $angle_type;
        
                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        write!( formatter, "floating point degrees between [{}..{}]", $min, $max)
                    }
        
                    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> where E: de::Error {
                        if value >= $min && value <= $max {
                            Ok($angle_type::from_degrees(value))
                        } else {
                            Err(E::custom(format!("degrees out of range: {}", value)))
                        }
                    }

                    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> where E: de::Error {
                        self.visit_f64( value as f64)
                    }

                    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> where E: de::Error {
                        self.visit_f64( value as f64)
                    }
                }
        
                deserializer.deserialize_f64( AngleVisitor)
            }
        }
    };
}

define_angle_deserializer!{ Latitude, -90.0, 90.0 }
define_angle_deserializer!{ Longitude, -180.0, 180.0 }
define_angle_deserializer!{ Bearing, 0.0, 360.0 }

impl<K> SerializeTrait for NormalizedAngle<K> where K: AngleKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        serializer.serialize_f64(self.value)
    }
}
