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
#![allow(unused)]

use odin_geodesy::*;
use odin_geodesy::conversion::MM_PER_METER;

// run with "cargo test --test test_conversion -- --nocapture"

fn anchor_50n() -> UTM { utm_from_geodetic( 50.0, 0.0, None).unwrap() }

fn internal (x: f64, y: f64, z: f64) -> Coord { Coord::Internal( InternalPoint::new( x, y, z)) }

fn geodetic (lat: f64, lon: f64) -> Coord { Coord::Geodetic( GeoPoint::try_from_lat_lon( lat, lon).unwrap()) }

fn assert_external (c: Coord, x: f64, y: f64) {
    let p = c.as_external().unwrap();
    assert!( (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9, "expected ({x},{y}), got {p:?}");
}

#[test]
fn test_anchor_binding() {
    let mut ctx = ConversionContext::new();
    assert!( ctx.anchor().is_none());

    let g = anchor_50n();
    let ip = ctx.convert( CoordSystem::Grid, &Coord::Grid(g), CoordSystem::Internal).unwrap();
    println!("{g} -> {ip}");
    assert_eq!( ip, internal( 0.0, 0.0, 0.0));
    assert_eq!( ctx.anchor(), Some(&g));

    let res = ctx.convert( CoordSystem::Internal, &internal( 0.0, 0.0, 0.0), CoordSystem::Grid).unwrap();
    assert_eq!( res, Coord::Grid(g));

    // a second grid conversion does not re-bind
    let g2 = utm_from_geodetic( 51.0, 1.0, None).unwrap();
    let ip2 = ctx.convert( CoordSystem::Grid, &Coord::Grid(g2), CoordSystem::Internal).unwrap();
    println!("{g2} -> {ip2}");
    assert_eq!( ctx.anchor(), Some(&g));
    let ip2 = ip2.as_internal().unwrap();
    assert!( (ip2.x - (g2.easting() - g.easting()) * MM_PER_METER).abs() < 1e-6);
    assert!( (ip2.y - (g2.northing() - g.northing()) * MM_PER_METER).abs() < 1e-6);
}

#[test]
fn test_bind_once() {
    let mut ctx = ConversionContext::new();
    let g = anchor_50n();
    let g2 = utm_from_geodetic( 51.0, 1.0, None).unwrap();

    assert!( ctx.bind_anchor_if_unset( &g));
    assert!( !ctx.bind_anchor_if_unset( &g2));
    assert_eq!( ctx.anchor(), Some(&g));

    ctx.reset_anchor( Some(g2));
    assert_eq!( ctx.anchor(), Some(&g2));

    ctx.reset_anchor( None);
    assert!( ctx.anchor().is_none());
    assert!( matches!( ctx.convert( CoordSystem::Internal, &internal( 1.0, 2.0, 3.0), CoordSystem::Grid), Err(OdinGeodesyError::NoAnchor)));

    ctx.set_anchor( g);
    assert_eq!( ctx.anchor(), Some(&g));
    ctx.clear_anchor();
    assert!( ctx.anchor().is_none());
}

#[test]
fn test_geodetic_binds_anchor() {
    let mut ctx = ConversionContext::new();
    let res = ctx.convert( CoordSystem::Geodetic, &geodetic( 50.0, 0.0), CoordSystem::Internal).unwrap();
    assert_eq!( res, internal( 0.0, 0.0, 0.0));
    assert_eq!( ctx.anchor(), Some(&anchor_50n()));

    // subsequent grid values are expressed in the anchor zone
    let g = ctx.convert( CoordSystem::Geodetic, &geodetic( 50.0, 6.1), CoordSystem::Grid).unwrap().as_grid().unwrap();
    assert_eq!( g.zone(), 31);
}

#[test]
fn test_identity() {
    let mut ctx = ConversionContext::new();
    let points = [
        internal( 1.0, -2.0, 3.0),
        Coord::Grid( anchor_50n()),
        geodetic( 53.6280529, -2.7398306),
        Coord::External( ExternalPoint::new( 12.0, 34.0)),
    ];

    for p in points {
        let res = ctx.convert( p.system(), &p, p.system()).unwrap();
        assert_eq!( res, p);
    }
    // identity has no side effects
    assert!( ctx.anchor().is_none());
}

#[test]
fn test_geodetic_round_trip() {
    let mut ctx = ConversionContext::new();
    ctx.set_anchor( anchor_50n());

    let p = geodetic( 50.001, 0.001);
    let ip = ctx.convert( CoordSystem::Geodetic, &p, CoordSystem::Internal).unwrap().as_internal().unwrap();
    println!("{p} -> {ip:?}");

    let g = utm_from_geodetic( 50.001, 0.001, None).unwrap();
    let a = anchor_50n();
    assert!( (ip.x - (g.easting() - a.easting()) * MM_PER_METER).abs() < 1e-3);
    assert!( (ip.y - (g.northing() - a.northing()) * MM_PER_METER).abs() < 1e-3);

    let q = ctx.convert( CoordSystem::Internal, &Coord::Internal(ip), CoordSystem::Geodetic).unwrap().as_geodetic().unwrap();
    println!("{ip:?} -> {q}");
    assert!( (q.lat_deg() - 50.001).abs() < 1e-8);
    assert!( (q.lon_deg() - 0.001).abs() < 1e-8);
}

#[test]
fn test_cross_zone() {
    let mut ctx = ConversionContext::new();
    ctx.set_anchor( anchor_50n()); // zone 31

    let g32 = utm_from_geodetic( 50.0, 6.1, None).unwrap();
    assert_eq!( g32.zone(), 32);

    let ip = ctx.convert( CoordSystem::Grid, &Coord::Grid(g32), CoordSystem::Internal).unwrap();
    println!("{g32} -> {ip}");
    let q = ctx.convert( CoordSystem::Internal, &ip, CoordSystem::Geodetic).unwrap().as_geodetic().unwrap();
    assert!( (q.lat_deg() - 50.0).abs() < 1e-6);
    assert!( (q.lon_deg() - 6.1).abs() < 1e-6);

    let g = ctx.convert( CoordSystem::Internal, &ip, CoordSystem::Grid).unwrap().as_grid().unwrap();
    assert_eq!( g.zone(), 31);
}

#[test]
fn test_equator_crossing() {
    let mut ctx = ConversionContext::new();
    let north = utm_from_geodetic( 0.5, -177.0, None).unwrap();
    let south = utm_from_geodetic( -0.5, -177.0, None).unwrap();
    ctx.set_anchor( north);

    let ip = ctx.convert( CoordSystem::Grid, &Coord::Grid(south), CoordSystem::Internal).unwrap().as_internal().unwrap();
    println!("{south} -> {ip:?}");
    assert!( ip.y < -100_000_000.0); // ~110km south

    let g = ctx.convert( CoordSystem::Internal, &Coord::Internal(ip), CoordSystem::Grid).unwrap().as_grid().unwrap();
    println!("-> {g}");
    assert!( !g.is_north());
    assert_eq!( g.band(), 'M');
    assert!( (g.easting() - south.easting()).abs() < 1e-6);
    assert!( (g.northing() - south.northing()).abs() < 1e-6);
}

#[test]
fn test_external_mapping() {
    let mut ctx = ConversionContext::new();
    let bbox = BoundingBox::new( -10000.0, -20000.0, 30000.0, 20000.0); // internal mm

    assert!( matches!( ctx.convert( CoordSystem::Internal, &internal( 0.0, 0.0, 0.0), CoordSystem::External),
                       Err(OdinGeodesyError::NoExternalMapping)));
    assert!( matches!( ctx.convert( CoordSystem::External, &Coord::External( ExternalPoint::new( 1.0, 1.0)), CoordSystem::Geodetic),
                       Err(OdinGeodesyError::NoExternalMapping)));
    // the failed conversion did not bind an anchor
    assert!( matches!( ctx.convert( CoordSystem::Geodetic, &geodetic( 50.0, 0.0), CoordSystem::External),
                       Err(OdinGeodesyError::NoExternalMapping)));
    assert!( ctx.anchor().is_none());

    ctx.configure_external_mapping( bbox, 2.0, false).unwrap();
    let mapping = ctx.external_mapping().unwrap();
    let ebb = mapping.external_bbox();
    assert!( ebb.west == 0.0 && ebb.south == 0.0);
    assert!( (ebb.east - 80.0).abs() < 1e-9 && (ebb.north - 80.0).abs() < 1e-9);

    let ep = ctx.convert( CoordSystem::Internal, &internal( 0.0, 0.0, 0.0), CoordSystem::External).unwrap();
    assert_external( ep, 20.0, 40.0);

    let ep = ctx.convert( CoordSystem::Internal, &internal( 0.0, 10000.0, 500.0), CoordSystem::External).unwrap();
    assert_external( ep, 20.0, 60.0);

    ctx.configure_external_mapping( bbox, 2.0, true).unwrap();
    let ep = ctx.convert( CoordSystem::Internal, &internal( 0.0, 10000.0, 0.0), CoordSystem::External).unwrap();
    assert_external( ep, 20.0, 20.0);

    let ip = ctx.convert( CoordSystem::External, &ep, CoordSystem::Internal).unwrap().as_internal().unwrap();
    assert!( ip.x.abs() < 1e-9);
    assert!( (ip.y - 10000.0).abs() < 1e-9);
    assert_eq!( ip.z, 0.0);

    ctx.clear_external_mapping();
    assert!( ctx.external_mapping().is_none());
}

#[test]
fn test_external_via_grid() {
    let mut ctx = ConversionContext::new();
    ctx.configure_external_mapping( BoundingBox::new( -1_000_000.0, -1_000_000.0, 1_000_000.0, 1_000_000.0), 10.0, true).unwrap();

    // binds the anchor, which is mapped to the center of the external bbox
    let ep = ctx.convert( CoordSystem::Geodetic, &geodetic( 50.0, 0.0), CoordSystem::External).unwrap().as_external().unwrap();
    println!("external: {ep:?}");
    assert!( (ep.x - 10000.0).abs() < 1e-6);
    assert!( (ep.y - 10000.0).abs() < 1e-6);
    assert_eq!( ctx.anchor(), Some(&anchor_50n()));

    let ep = ctx.convert( CoordSystem::Geodetic, &geodetic( 50.001, 0.001), CoordSystem::External).unwrap();
    let q = ctx.convert( CoordSystem::External, &ep, CoordSystem::Geodetic).unwrap().as_geodetic().unwrap();
    assert!( (q.lat_deg() - 50.001).abs() < 1e-8);
    assert!( (q.lon_deg() - 0.001).abs() < 1e-8);

    let g = ctx.convert( CoordSystem::External, &ep, CoordSystem::Grid).unwrap().as_grid().unwrap();
    let ep1 = ctx.convert( CoordSystem::Grid, &Coord::Grid(g), CoordSystem::External).unwrap().as_external().unwrap();
    let ep = ep.as_external().unwrap();
    assert!( (ep.x - ep1.x).abs() < 1e-6 && (ep.y - ep1.y).abs() < 1e-6);
}

#[test]
fn test_invalid_mapping() {
    let mut ctx = ConversionContext::new();
    let bbox = BoundingBox::new( 0.0, 0.0, 100.0, 100.0);

    assert!( matches!( ctx.configure_external_mapping( bbox, 0.0, false), Err(OdinGeodesyError::ConfigError(_))));
    assert!( matches!( ctx.configure_external_mapping( bbox, f64::NAN, false), Err(OdinGeodesyError::ConfigError(_))));
    assert!( matches!( ctx.configure_external_mapping( BoundingBox::new( 0.0, 0.0, 0.0, 100.0), 1.0, false), Err(OdinGeodesyError::ConfigError(_))));
    assert!( ctx.external_mapping().is_none());
}

#[test]
fn test_system_errors() {
    assert!( matches!( CoordSystem::try_from(4), Err(OdinGeodesyError::UnsupportedSystem(4))));
    assert_eq!( CoordSystem::try_from(2).unwrap(), CoordSystem::Geodetic);

    let mut ctx = ConversionContext::new();
    let p = internal( 0.0, 0.0, 0.0);
    assert!( matches!( ctx.convert_idx( 0, &p, 7), Err(OdinGeodesyError::UnsupportedSystem(7))));
    assert!( matches!( ctx.convert( CoordSystem::Grid, &p, CoordSystem::Geodetic), Err(OdinGeodesyError::SystemMismatch{..})));
    assert!( matches!( ctx.convert( CoordSystem::Grid, &p, CoordSystem::Grid), Err(OdinGeodesyError::SystemMismatch{..})));
}

#[test]
fn test_invalid_grid_operands() {
    // grid values can't be constructed outside of the grid rules, not even through serde
    let bad = r#"{ "Grid": { "easting": -5000000.0, "northing": -1.0, "utm_zone": { "zone": 0, "band": "Z" } } }"#;
    assert!( serde_json::from_str::<Coord>( bad).is_err());
    let good = r#"{ "Grid": { "easting": 285015.763, "northing": 5542944.019, "utm_zone": { "zone": 31, "band": "U" } } }"#;
    assert!( serde_json::from_str::<Coord>( good).is_ok());

    // internal offsets that leave the grid are rejected and don't change the anchor
    let mut ctx = ConversionContext::new();
    let a = anchor_50n();
    ctx.set_anchor( a);
    let res = ctx.convert( CoordSystem::Internal, &internal( 0.0, 5_000_000_000.0, 0.0), CoordSystem::Grid);
    println!("5000km north of {a}: {res:?}");
    assert!( matches!( res, Err(OdinGeodesyError::InvalidGrid(_))));
    let res = ctx.convert( CoordSystem::Internal, &internal( f64::NAN, 0.0, 0.0), CoordSystem::Geodetic);
    assert!( matches!( res, Err(OdinGeodesyError::InvalidGrid(_))));
    assert_eq!( ctx.anchor(), Some(&a));

    // forced zone projections far off the central meridian are still valid operands
    let far = utm_from_geodetic( 50.0, 14.0, Some(31)).unwrap();
    assert!( far.easting() > 1_000_000.0);
    assert!( far.check_grid().is_ok());
    let ip = ctx.convert( CoordSystem::Grid, &Coord::Grid(far), CoordSystem::Internal).unwrap();
    println!("{far} -> {ip}");
}

#[test]
fn test_identity_without_mapping() {
    let mut ctx = ConversionContext::new();
    let ep = Coord::External( ExternalPoint::new( 1.0, 2.0));
    assert_eq!( ctx.convert( CoordSystem::External, &ep, CoordSystem::External).unwrap(), ep);
    assert!( matches!( ctx.convert( CoordSystem::External, &ep, CoordSystem::Internal), Err(OdinGeodesyError::NoExternalMapping)));
}

#[test]
fn test_format() {
    let p = geodetic( 53.6280529, -2.7398306);
    assert_eq!( format_as( CoordSystem::Geodetic, &p).unwrap(), "53°37.683'N 2°44.390'W");

    let p = geodetic( -33.9, 18.4);
    assert_eq!( format_as( CoordSystem::Geodetic, &p).unwrap(), "33°54.000'S 18°24.000'E");

    let g = Coord::Grid( anchor_50n());
    assert_eq!( format_as( CoordSystem::Grid, &g).unwrap(), "31U 285015 5542944");

    let ip = internal( 1234.4, -56.6, 0.0);
    assert_eq!( format_as( CoordSystem::Internal, &ip).unwrap(), "[1234, -57, 0]");

    let ep = Coord::External( ExternalPoint::new( 12.34, 5.0));
    assert_eq!( format_as( CoordSystem::External, &ep).unwrap(), "(12.3, 5.0)");

    assert!( matches!( format_as( CoordSystem::Grid, &ep), Err(OdinGeodesyError::SystemMismatch{..})));

    // values that round to zero get the positive hemisphere
    let p = geodetic( -1e-9, -1e-9);
    assert_eq!( format_as( CoordSystem::Geodetic, &p).unwrap(), "0°00.000'N 0°00.000'E");
    let p = geodetic( -0.00001, 0.0);
    assert_eq!( format_as( CoordSystem::Geodetic, &p).unwrap(), "0°00.001'S 0°00.000'E");
}
