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

//! AWS signing and request dispatch with convenience APIs.

pub use stackwatch_aws_v4::*;

#[cfg(feature = "default-context")]
use crate::default_context;

/// Create a client on the default context.
///
/// The region comes from `AWS_DEFAULT_REGION` and credentials from
/// `accessKeys.csv`, then from the environment.
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> stackwatch::Result<()> {
/// use stackwatch::aws::{default_client, AwsRequest};
///
/// let client = default_client();
/// let resp = client
///     .send(AwsRequest::query("iam", "Action=ListUsers&Version=2010-05-08"))
///     .await?;
/// println!("{}", resp.is_ok());
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_client() -> Client {
    let ctx = default_context();
    let config = Config::from_env(&ctx);
    Client::from_config(ctx, config)
}
