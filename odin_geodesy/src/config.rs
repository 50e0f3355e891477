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

/// RON config support. Configs are plain serde types (e.g. [`ConversionConfig`](crate::ConversionConfig))

use std::{fs, path::Path};
use tracing::debug;
use ron::ser::PrettyConfig;
use serde::{Serialize, de::DeserializeOwned};

use crate::errors::{config_error, Result};

pub fn load_config_path<C,P> (path: P) -> Result<C> where C: DeserializeOwned, P: AsRef<Path> {
    let path = path.as_ref();
    debug!("loading config {:?}", path);
    let data = fs::read( path)?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

pub fn config_from_str<C> (s: &str) -> Result<C> where C: DeserializeOwned {
    Ok( ron::from_str(s)? )
}

pub fn config_to_string<C> (config: &C) -> Result<String> where C: Serialize {
    ron::ser::to_string_pretty( config, PrettyConfig::new().struct_names(true))
        .map_err( |e| config_error(e))
}
