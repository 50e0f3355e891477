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

/// conversion between the four coordinate systems of a survey scene:
///   - `Internal`: cartesian millimeters relative to an anchor grid coordinate
///   - `Grid`: UTM easting/northing/zone/band
///   - `Geodetic`: WGS84 latitude/longitude degrees
///   - `External`: display units (pixels) mapped from an internal bounding box
///
/// The anchor and the external mapping are the only mutable state, and both are owned by a
/// [`ConversionContext`]. Each context is meant to be used by one caller at a time - wrap it
/// into a Mutex if it has to be shared between threads.

use std::fmt;
use serde::{Serialize,Deserialize};
use tracing::debug;

use crate::BoundingBox;
use crate::errors::{config_error, OdinGeodesyError, Result};
use crate::geo::GeoPoint;
use crate::utm::{self, lat_band, UtmZone, UTM, FALSE_NORTHING_SOUTH};

/// millimeters per meter of the internal space
pub const MM_PER_METER: f64 = 1000.0;

/* #region coordinate systems and points *************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum CoordSystem {
    Internal,
    Grid,
    Geodetic,
    External,
}

impl CoordSystem {
    pub fn name (&self) -> &'static str {
        match self {
            CoordSystem::Internal => "internal",
            CoordSystem::Grid => "grid",
            CoordSystem::Geodetic => "geodetic",
            CoordSystem::External => "external",
        }
    }
}

impl TryFrom<u32> for CoordSystem {
    type Error = OdinGeodesyError;

    fn try_from (idx: u32) -> Result<Self> {
        match idx {
            0 => Ok(CoordSystem::Internal),
            1 => Ok(CoordSystem::Grid),
            2 => Ok(CoordSystem::Geodetic),
            3 => Ok(CoordSystem::External),
            _ => Err( OdinGeodesyError::UnsupportedSystem(idx))
        }
    }
}

impl fmt::Display for CoordSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str( self.name()) }
}

/// cartesian point in millimeters relative to the anchor (x: east, y: north, z: up)
#[derive(Debug,Clone,Copy,PartialEq,Default,Serialize,Deserialize)]
pub struct InternalPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl InternalPoint {
    pub fn new (x: f64, y: f64, z: f64) -> Self { InternalPoint { x, y, z } }
}

/// point in display units
#[derive(Debug,Clone,Copy,PartialEq,Default,Serialize,Deserialize)]
pub struct ExternalPoint {
    pub x: f64,
    pub y: f64,
}

impl ExternalPoint {
    pub fn new (x: f64, y: f64) -> Self { ExternalPoint { x, y } }
}

/// a point tagged with the coordinate system it is expressed in
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub enum Coord {
    Internal(InternalPoint),
    Grid(UTM),
    Geodetic(GeoPoint),
    External(ExternalPoint),
}

impl Coord {
    pub fn system (&self) -> CoordSystem {
        match self {
            Coord::Internal(_) => CoordSystem::Internal,
            Coord::Grid(_) => CoordSystem::Grid,
            Coord::Geodetic(_) => CoordSystem::Geodetic,
            Coord::External(_) => CoordSystem::External,
        }
    }

    pub fn as_internal (&self) -> Result<InternalPoint> {
        if let Coord::Internal(p) = self { Ok(*p) } else { Err( mismatch(CoordSystem::Internal)) }
    }

    pub fn as_grid (&self) -> Result<UTM> {
        if let Coord::Grid(p) = self { Ok(*p) } else { Err( mismatch(CoordSystem::Grid)) }
    }

    pub fn as_geodetic (&self) -> Result<GeoPoint> {
        if let Coord::Geodetic(p) = self { Ok(*p) } else { Err( mismatch(CoordSystem::Geodetic)) }
    }

    pub fn as_external (&self) -> Result<ExternalPoint> {
        if let Coord::External(p) = self { Ok(*p) } else { Err( mismatch(CoordSystem::External)) }
    }
}

fn mismatch (expected: CoordSystem) -> OdinGeodesyError {
    OdinGeodesyError::SystemMismatch { expected: expected.name() }
}

/// display format for each system:
///   - Geodetic: `53°37.683'N 2°44.390'W`
///   - Grid: `30U 512345 5943210` (meters truncated)
///   - Internal: `[1200, -350, 0]` (millimeters rounded)
///   - External: `(120.5, 33.0)`
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coord::Geodetic(p) => write!(f, "{}", p),
            Coord::Grid(p) => write!(f, "{}", p),
            Coord::Internal(p) => write!(f, "[{:.0}, {:.0}, {:.0}]", p.x, p.y, p.z),
            Coord::External(p) => write!(f, "({:.1}, {:.1})", p.x, p.y),
        }
    }
}

/// format a point that is supposed to be in `system`
pub fn format_as (system: CoordSystem, p: &Coord) -> Result<String> {
    if p.system() != system { return Err( mismatch(system)) }
    Ok( p.to_string())
}

/* #endregion coordinate systems and points */

/* #region external mapping **************************************************************************************/

/// maps an internal space bounding box (in millimeters) to display units, with the display origin
/// at the west/south corner or - if `flip_y` is set - at the west/north corner
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct ExternalMapping {
    pub bbox: BoundingBox<f64>,
    pub units_per_meter: f64,
    pub flip_y: bool,
}

impl ExternalMapping {
    pub fn new (bbox: BoundingBox<f64>, units_per_meter: f64, flip_y: bool) -> Result<Self> {
        if !(units_per_meter.is_finite() && units_per_meter > 0.0) {
            return Err( config_error( format!("units per meter has to be positive: {units_per_meter}")))
        }
        if !(bbox.east > bbox.west && bbox.north > bbox.south) {
            return Err( config_error( format!("degenerated bounding box: {bbox:?}")))
        }
        Ok( ExternalMapping { bbox, units_per_meter, flip_y })
    }

    fn scale (&self) -> f64 { self.units_per_meter / MM_PER_METER }

    /// the bounding box of the mapped area in external units
    pub fn external_bbox (&self) -> BoundingBox<f64> {
        let s = self.scale();
        BoundingBox::new( 0.0, 0.0, self.bbox.width() * s, self.bbox.height() * s)
    }

    pub fn to_external (&self, p: &InternalPoint) -> ExternalPoint {
        let s = self.scale();
        let x = (p.x - self.bbox.west) * s;
        let y = if self.flip_y { (self.bbox.north - p.y) * s } else { (p.y - self.bbox.south) * s };
        ExternalPoint { x, y }
    }

    /// the inverse of `to_external`. The resulting point has z = 0
    pub fn from_external (&self, p: &ExternalPoint) -> InternalPoint {
        let s = self.scale();
        let x = self.bbox.west + p.x / s;
        let y = if self.flip_y { self.bbox.north - p.y / s } else { self.bbox.south + p.y / s };
        InternalPoint { x, y, z: 0.0 }
    }
}

/* #endregion external mapping */

/* #region conversion context ************************************************************************************/

/// serializable initial state of a [`ConversionContext`], e.g. loaded from a RON config file
#[derive(Debug,Clone,Default,Serialize,Deserialize)]
pub struct ConversionConfig {
    #[serde(default)]
    pub anchor: Option<UTM>,
    #[serde(default)]
    pub external: Option<ExternalMapping>,
}

#[derive(Debug,Clone,Default)]
pub struct ConversionContext {
    anchor: Option<UTM>,
    external: Option<ExternalMapping>,
}

impl ConversionContext {
    pub fn new () -> Self { ConversionContext::default() }

    /// create a context from a config, validating all values
    pub fn from_config (config: &ConversionConfig) -> Result<Self> {
        let anchor = match &config.anchor {
            Some(a) => Some( UTM::new( a.easting, a.northing, a.utm_zone.zone, a.utm_zone.band)?),
            None => None
        };
        let external = match &config.external {
            Some(m) => Some( ExternalMapping::new( m.bbox, m.units_per_meter, m.flip_y)?),
            None => None
        };
        Ok( ConversionContext { anchor, external })
    }

    pub fn to_config (&self) -> ConversionConfig {
        ConversionConfig { anchor: self.anchor, external: self.external }
    }

    //--- anchor management

    pub fn anchor (&self) -> Option<&UTM> { self.anchor.as_ref() }

    pub fn set_anchor (&mut self, anchor: UTM) {
        debug!("anchor set to {}", anchor);
        self.anchor = Some(anchor);
    }

    pub fn clear_anchor (&mut self) {
        debug!("anchor cleared");
        self.anchor = None;
    }

    /// replace the anchor, or clear it if `new_anchor` is None
    pub fn reset_anchor (&mut self, new_anchor: Option<UTM>) {
        match new_anchor {
            Some(a) => self.set_anchor(a),
            None => self.clear_anchor()
        }
    }

    /// bind `utm` as anchor if there is none yet. Returns true if the anchor was bound by this call
    pub fn bind_anchor_if_unset (&mut self, utm: &UTM) -> bool {
        if self.anchor.is_none() {
            debug!("binding anchor to {}", utm);
            self.anchor = Some(*utm);
            true
        } else {
            false
        }
    }

    //--- external mapping

    pub fn external_mapping (&self) -> Option<&ExternalMapping> { self.external.as_ref() }

    pub fn configure_external_mapping (&mut self, bbox: BoundingBox<f64>, units_per_meter: f64, flip_y: bool) -> Result<()> {
        let mapping = ExternalMapping::new( bbox, units_per_meter, flip_y)?;
        debug!("external mapping configured: {:?}", mapping);
        self.external = Some(mapping);
        Ok(())
    }

    pub fn clear_external_mapping (&mut self) {
        self.external = None;
    }

    //--- conversion

    /// convert point `p` from system `from` into system `to`. Identity conversions return `p` without side effects.
    /// Grid operands that violate the grid rules (see [`UTM::check_grid`]) are rejected before anything else happens.
    /// Every route that passes through Grid space binds the anchor to the first grid operand if no anchor is set yet.
    /// Routes into or out of External space require a configured external mapping
    pub fn convert (&mut self, from: CoordSystem, p: &Coord, to: CoordSystem) -> Result<Coord> {
        if p.system() != from { return Err( mismatch(from)) }
        if let Coord::Grid(g) = p { g.check_grid()? }

        if from != to && (from == CoordSystem::External || to == CoordSystem::External) && self.external.is_none() {
            return Err( OdinGeodesyError::NoExternalMapping)
        }

        use CoordSystem::*;
        let res = match (from, to) {
            (Internal, Grid) => Coord::Grid( self.internal_to_grid( &p.as_internal()?)?),
            (Internal, Geodetic) => Coord::Geodetic( self.grid_to_geodetic( &self.internal_to_grid( &p.as_internal()?)?)),
            (Internal, External) => Coord::External( self.internal_to_external( &p.as_internal()?)?),

            (Grid, Internal) => Coord::Internal( self.grid_to_internal( &p.as_grid()?)?),
            (Grid, Geodetic) => Coord::Geodetic( self.grid_to_geodetic( &p.as_grid()?)),
            (Grid, External) => {
                let ip = self.grid_to_internal( &p.as_grid()?)?;
                Coord::External( self.internal_to_external( &ip)?)
            }

            (Geodetic, Grid) => Coord::Grid( self.geodetic_to_grid( &p.as_geodetic()?)?),
            (Geodetic, Internal) => {
                let g = self.geodetic_to_grid( &p.as_geodetic()?)?;
                Coord::Internal( self.grid_to_internal( &g)?)
            }
            (Geodetic, External) => {
                let g = self.geodetic_to_grid( &p.as_geodetic()?)?;
                let ip = self.grid_to_internal( &g)?;
                Coord::External( self.internal_to_external( &ip)?)
            }

            (External, Internal) => Coord::Internal( self.external_to_internal( &p.as_external()?)?),
            (External, Grid) => {
                let ip = self.external_to_internal( &p.as_external()?)?;
                Coord::Grid( self.internal_to_grid( &ip)?)
            }
            (External, Geodetic) => {
                let ip = self.external_to_internal( &p.as_external()?)?;
                Coord::Geodetic( self.grid_to_geodetic( &self.internal_to_grid( &ip)?))
            }

            (Internal, Internal) | (Grid, Grid) | (Geodetic, Geodetic) | (External, External) => *p
        };

        Ok(res)
    }

    /// convenience wrapper that takes raw system indices
    pub fn convert_idx (&mut self, from: u32, p: &Coord, to: u32) -> Result<Coord> {
        let from = CoordSystem::try_from(from)?;
        let to = CoordSystem::try_from(to)?;
        self.convert( from, p, to)
    }

    //--- the direct edges of the conversion graph

    fn grid_to_internal (&mut self, g: &UTM) -> Result<InternalPoint> {
        self.bind_anchor_if_unset( g);
        let anchor = self.anchor.ok_or( OdinGeodesyError::NoAnchor)?;

        let g = if g.zone() != anchor.zone() {
            // express in the anchor zone
            utm::geo_to_utm_zone( &utm::utm_to_geo(g), Some(anchor.zone()))?
        } else {
            *g
        };

        let northing = northing_in_hemisphere( &g, anchor.is_north());
        Ok( InternalPoint {
            x: (g.easting - anchor.easting) * MM_PER_METER,
            y: (northing - anchor.northing) * MM_PER_METER,
            z: 0.0
        })
    }

    fn internal_to_grid (&self, p: &InternalPoint) -> Result<UTM> {
        let anchor = self.anchor.ok_or( OdinGeodesyError::NoAnchor)?;

        let easting = anchor.easting + p.x / MM_PER_METER;
        let mut northing = anchor.northing + p.y / MM_PER_METER;
        let mut band = anchor.band();

        // offsets can cross the equator
        if anchor.is_north() && northing < 0.0 {
            northing += FALSE_NORTHING_SOUTH;
            band = 'M';
        } else if !anchor.is_north() && northing >= FALSE_NORTHING_SOUTH {
            northing -= FALSE_NORTHING_SOUTH;
            band = 'N';
        }

        let utm_zone = UtmZone { zone: anchor.zone(), band };
        let mut g = UTM::from_parts( easting, northing, utm_zone);
        g.check_grid()?; // offsets can leave the grid

        if p.x != 0.0 || p.y != 0.0 {
            if let Some(b) = lat_band( utm::utm_to_geo( &g).lat_deg()) {
                g.utm_zone.band = b;
            }
        }
        Ok(g)
    }

    fn grid_to_geodetic (&mut self, g: &UTM) -> GeoPoint {
        self.bind_anchor_if_unset( g);
        utm::utm_to_geo( g)
    }

    /// project into the anchor zone if there is one, otherwise into the natural zone and bind the anchor
    fn geodetic_to_grid (&mut self, p: &GeoPoint) -> Result<UTM> {
        let force_zone = self.anchor.map( |a| a.zone());
        let g = utm::geo_to_utm_zone( p, force_zone)?;
        self.bind_anchor_if_unset( &g);
        Ok(g)
    }

    fn internal_to_external (&self, p: &InternalPoint) -> Result<ExternalPoint> {
        let mapping = self.external.as_ref().ok_or( OdinGeodesyError::NoExternalMapping)?;
        Ok( mapping.to_external( p))
    }

    fn external_to_internal (&self, p: &ExternalPoint) -> Result<InternalPoint> {
        let mapping = self.external.as_ref().ok_or( OdinGeodesyError::NoExternalMapping)?;
        Ok( mapping.from_external( p))
    }
}

/// northing of `g` using the false northing convention of the given hemisphere
fn northing_in_hemisphere (g: &UTM, is_north: bool) -> f64 {
    match (g.is_north(), is_north) {
        (true, false) => g.northing + FALSE_NORTHING_SOUTH,
        (false, true) => g.northing - FALSE_NORTHING_SOUTH,
        _ => g.northing
    }
}

/* #endregion conversion context */
