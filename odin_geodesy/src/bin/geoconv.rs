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

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use uom::si::length::meter;

use odin_geodesy::{
    load_config_path, geodesic, utm_from_geodetic, geodetic_from_utm, format_as,
    Coord, CoordSystem, ConversionConfig, ConversionContext, ExternalPoint, GeoPoint, InternalPoint, UTM
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "convert between geodetic, UTM, internal and external coordinates")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// project latitude/longitude degrees into UTM
    Utm {
        #[arg(allow_hyphen_values=true)]
        lat: f64,
        #[arg(allow_hyphen_values=true)]
        lon: f64,
        /// force projection into this zone
        #[arg(long)]
        zone: Option<u32>,
    },

    /// UTM to latitude/longitude degrees
    Geo {
        easting: f64,
        northing: f64,
        zone: u32,
        band: char,
    },

    /// ellipsoidal distance and bearings between two points
    Dist {
        #[arg(allow_hyphen_values=true)]
        lat1: f64,
        #[arg(allow_hyphen_values=true)]
        lon1: f64,
        #[arg(allow_hyphen_values=true)]
        lat2: f64,
        #[arg(allow_hyphen_values=true)]
        lon2: f64,
    },

    /// convert a point between coordinate systems, using anchor and external mapping from a RON config
    Convert {
        #[arg(short,long)]
        config: Option<String>,
        #[arg(long, value_enum)]
        from: SystemArg,
        #[arg(long, value_enum)]
        to: SystemArg,
        /// latitude band letter for grid input
        #[arg(long)]
        band: Option<char>,
        /// internal: x y [z], grid: easting northing zone, geodetic: lat lon, external: x y
        #[arg(num_args=2.., allow_hyphen_values=true)]
        values: Vec<f64>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SystemArg { Internal, Grid, Geodetic, External }

impl From<SystemArg> for CoordSystem {
    fn from (s: SystemArg) -> Self {
        match s {
            SystemArg::Internal => CoordSystem::Internal,
            SystemArg::Grid => CoordSystem::Grid,
            SystemArg::Geodetic => CoordSystem::Geodetic,
            SystemArg::External => CoordSystem::External,
        }
    }
}

fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let args = Args::parse();

    match args.cmd {
        Cmd::Utm { lat, lon, zone } => {
            let utm = utm_from_geodetic( lat, lon, zone)?;
            println!("{utm}  (easting: {:.3}, northing: {:.3})", utm.easting(), utm.northing());
        }
        Cmd::Geo { easting, northing, zone, band } => {
            let utm = UTM::new( easting, northing, zone, band)?;
            let p = geodetic_from_utm( &utm);
            println!("{p}  (lat: {:.7}, lon: {:.7})", p.lat_deg(), p.lon_deg());
        }
        Cmd::Dist { lat1, lon1, lat2, lon2 } => {
            let res = geodesic( lat1, lon1, lat2, lon2)?;
            println!("distance:        {:.3} m", res.distance.get::<meter>());
            println!("forward bearing: {:.6}°", res.bearing_forward.degrees());
            println!("reverse bearing: {:.6}°", res.bearing_reverse.degrees());
        }
        Cmd::Convert { config, from, to, band, values } => {
            let config: ConversionConfig = match config {
                Some(path) => load_config_path( path)?,
                None => ConversionConfig::default()
            };
            let mut ctx = ConversionContext::from_config( &config)?;
            let from: CoordSystem = from.into();
            let to: CoordSystem = to.into();

            let p = coord_from_values( from, &values, band)?;
            let res = ctx.convert( from, &p, to)?;
            println!("{} -> {}", format_as( from, &p)?, format_as( to, &res)?);
        }
    }

    Ok(())
}

fn coord_from_values (system: CoordSystem, vs: &[f64], band: Option<char>) -> Result<Coord> {
    let arg = |i: usize| vs.get(i).copied().ok_or_else( || anyhow!("missing value {} for {} point", i, system));

    Ok( match system {
        CoordSystem::Internal => Coord::Internal( InternalPoint::new( arg(0)?, arg(1)?, vs.get(2).copied().unwrap_or(0.0))),
        CoordSystem::External => Coord::External( ExternalPoint::new( arg(0)?, arg(1)?)),
        CoordSystem::Geodetic => Coord::Geodetic( GeoPoint::try_from_lat_lon( arg(0)?, arg(1)?)?),
        CoordSystem::Grid => {
            let zone = arg(2)? as u32;
            let band = band.ok_or_else( || anyhow!("grid input requires --band"))?;
            Coord::Grid( UTM::new( arg(0)?, arg(1)?, zone, band)?)
        }
    })
}
