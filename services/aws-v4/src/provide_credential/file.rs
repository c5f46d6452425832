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

use crate::Credential;
use async_trait::async_trait;
use log::debug;
use stackwatch_core::{Context, Error, ProvideCredential, Result};

/// FileCredentialProvider loads credentials from a local CSV file.
///
/// The last line containing a comma is used as an `id,secret[,token]`
/// record, so the header line of a downloaded `accessKeys.csv` is skipped.
/// A missing file is not an error: the next provider is tried.
#[derive(Debug, Clone)]
pub struct FileCredentialProvider {
    path: String,
}

impl FileCredentialProvider {
    /// Create a new FileCredentialProvider reading `path`.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }
}

#[async_trait]
impl ProvideCredential for FileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        if ctx.file_modified(&self.path).await?.is_none() {
            debug!("credential file {} not found", self.path);
            return Ok(None);
        }

        let content = ctx.file_read_as_string(&self.path).await?;
        let cred = content
            .lines()
            .rev()
            .find(|line| line.contains(','))
            .and_then(Credential::from_record)
            .ok_or_else(|| {
                Error::credential_invalid(format!(
                    "no id,secret record found in {}",
                    self.path
                ))
            })?;
        debug!("using {}: accessKeyId {}", self.path, cred.access_key_id);

        Ok(Some(cred))
    }
}
