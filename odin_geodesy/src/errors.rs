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
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OdinGeodesyError>;

#[derive(Error,Debug)]
pub enum OdinGeodesyError {

    //--- input domain errors

    #[error("value out of supported range: {0}")]
    RangeError(String),

    #[error("unsupported latitude band: {0}")]
    UnsupportedBand(char),

    #[error("invalid grid coordinate: {0}")]
    InvalidGrid(String),

    //--- algorithmically undefined results

    #[error("geodesic undefined for antipodal points")]
    AntipodalPoints,

    #[error("geodesic undefined for identical points")]
    IdenticalPoints,

    #[error("geodesic failed to converge after {0} iterations")]
    NoConvergence(usize),

    #[error("angle undefined for zero vector")]
    UndefinedAngle,

    //--- configuration errors

    #[error("no anchor set for internal coordinates")]
    NoAnchor,

    #[error("no external mapping configured")]
    NoExternalMapping,

    #[error("invalid configuration: {0}")]
    ConfigError(String),

    //--- conversion graph errors

    #[error("unsupported coordinate system index: {0}")]
    UnsupportedSystem(u32),

    #[error("point is not in {expected} coordinates")]
    SystemMismatch { expected: &'static str },

    // pass through for IO errors (config files)
    #[error("IO error: {0}")]
    IOError( #[from] std::io::Error),

    // pass through for RON config parse errors
    #[error("config parse error: {0}")]
    RonError( #[from] ron::error::SpannedError),
}

pub fn range_error<S: ToString> (msg: S)->OdinGeodesyError {
    OdinGeodesyError::RangeError(msg.to_string())
}

pub fn invalid_grid<S: ToString> (msg: S)->OdinGeodesyError {
    OdinGeodesyError::InvalidGrid(msg.to_string())
}

pub fn config_error<S: ToString> (msg: S)->OdinGeodesyError {
    OdinGeodesyError::ConfigError(msg.to_string())
}
