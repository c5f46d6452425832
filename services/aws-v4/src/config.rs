// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::*;
use log::debug;
use stackwatch_core::Context;

/// Config carries the settings resolved once at startup.
///
/// It is an explicit value handed to the client; nothing is read from the
/// process environment after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Region used for every service that is not global.
    pub region: String,
    /// Path of the `id,secret[,token]` credential file.
    pub credential_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            credential_file: DEFAULT_CREDENTIAL_FILE.to_string(),
        }
    }
}

impl Config {
    /// Load config from the context environment.
    pub fn from_env(ctx: &Context) -> Self {
        let region = ctx
            .env_var(AWS_DEFAULT_REGION)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        debug!("configured region: {region}");

        Self {
            region,
            ..Default::default()
        }
    }

    /// Set the region.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    /// Set the credential file path.
    pub fn with_credential_file(mut self, path: &str) -> Self {
        self.credential_file = path.to_string();
        self
    }

    /// The region requests for `service` must be signed for.
    pub fn region_for(&self, service: &str) -> &str {
        signing_region(service, &self.region)
    }
}

/// Resolve the signing region of a service.
///
/// Global services are pinned to `us-east-1` whatever region is configured.
pub fn signing_region<'a>(service: &str, region: &'a str) -> &'a str {
    if GLOBAL_SERVICES.contains(&service) {
        GLOBAL_REGION
    } else {
        region
    }
}
