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

use crate::constants::KEY_MATERIAL_PREFIX;
use stackwatch_core::utils::Redact;
use stackwatch_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access key id and the signing key material.
///
/// The secret itself is not kept: only `AWS4` + secret, which is the seed of
/// the signing key derivation.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for aws services.
    pub access_key_id: String,
    /// Session token for aws services.
    pub session_token: Option<String>,

    key_material: Vec<u8>,
}

impl Credential {
    /// Create a credential from an access key id and a secret access key.
    pub fn new(access_key_id: &str, secret_access_key: &str) -> Self {
        let mut key_material = Vec::with_capacity(KEY_MATERIAL_PREFIX.len() + secret_access_key.len());
        key_material.extend_from_slice(KEY_MATERIAL_PREFIX);
        key_material.extend_from_slice(secret_access_key.as_bytes());

        Self {
            access_key_id: access_key_id.to_string(),
            session_token: None,
            key_material,
        }
    }

    /// Set the session token, empty tokens are ignored.
    pub fn with_session_token(mut self, token: &str) -> Self {
        self.session_token = Some(token.to_string()).filter(|v| !v.is_empty());
        self
    }

    /// Parse an `id,secret[,token]` record.
    ///
    /// Only the first two commas split, so a token may contain any character.
    pub fn from_record(record: &str) -> Option<Self> {
        let mut fields = record.trim_end().splitn(3, ',');
        let access_key_id = fields.next().filter(|v| !v.is_empty())?;
        let secret_access_key = fields.next().filter(|v| !v.is_empty())?;

        let cred = Self::new(access_key_id, secret_access_key);
        Some(match fields.next() {
            Some(token) => cred.with_session_token(token),
            None => cred,
        })
    }

    /// The seed key of the signing key derivation.
    pub fn key_material(&self) -> &[u8] {
        &self.key_material
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("key_material", &Redact::from(self.key_material.as_slice()))
            .field("session_token", &Redact::from(&self.session_token))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.access_key_id.is_empty() && self.key_material.len() > KEY_MATERIAL_PREFIX.len()
    }
}
