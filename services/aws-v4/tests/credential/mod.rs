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

use crate::mock::MemoryFileRead;
use stackwatch_aws_v4::{
    Config, DefaultCredentialProvider, FileCredentialProvider, AWS_ACCESS_KEYS,
};
use stackwatch_core::{Context, ProvideCredential, StaticEnv};
use std::collections::HashMap;

#[tokio::test]
async fn test_file_provider_uses_last_record() -> anyhow::Result<()> {
    let fs = MemoryFileRead::default().with_file(
        "keys.csv",
        "User name,Access key ID,Secret access key\nOLDKEY,oldsecret\nNEWKEY,newsecret,token\n\n",
    );
    let ctx = Context::new().with_file_read(fs);

    let cred = FileCredentialProvider::new("keys.csv")
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.access_key_id, "NEWKEY");
    assert_eq!(cred.key_material(), b"AWS4newsecret");
    assert_eq!(cred.session_token.as_deref(), Some("token"));

    Ok(())
}

#[tokio::test]
async fn test_file_provider_missing_file() -> anyhow::Result<()> {
    let ctx = Context::new().with_file_read(MemoryFileRead::default());

    let cred = FileCredentialProvider::new("keys.csv")
        .provide_credential(&ctx)
        .await?;
    assert!(cred.is_none());

    Ok(())
}

#[tokio::test]
async fn test_file_provider_without_record_fails() {
    let fs = MemoryFileRead::default().with_file("keys.csv", "nothing here\n");
    let ctx = Context::new().with_file_read(fs);

    let err = FileCredentialProvider::new("keys.csv")
        .provide_credential(&ctx)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no id,secret record found in keys.csv"));
}

#[tokio::test]
async fn test_default_provider_falls_back_to_env() -> anyhow::Result<()> {
    let ctx = Context::new()
        .with_file_read(MemoryFileRead::default())
        .with_env(StaticEnv {
            envs: HashMap::from([(AWS_ACCESS_KEYS.to_string(), "ENVKEY,envsecret".to_string())]),
        });

    let cred = DefaultCredentialProvider::new(&Config::default())
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.access_key_id, "ENVKEY");

    Ok(())
}

#[tokio::test]
async fn test_default_provider_prefers_file() -> anyhow::Result<()> {
    let fs = MemoryFileRead::default().with_file("accessKeys.csv", "FILEKEY,filesecret\n");
    let ctx = Context::new().with_file_read(fs).with_env(StaticEnv {
        envs: HashMap::from([(AWS_ACCESS_KEYS.to_string(), "ENVKEY,envsecret".to_string())]),
    });

    let cred = DefaultCredentialProvider::new(&Config::default())
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.access_key_id, "FILEKEY");

    Ok(())
}
