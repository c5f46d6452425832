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

//! AWS SigV4 signing and request dispatch for stackwatch.
//!
//! ## Example
//!
//! ```no_run
//! use stackwatch_aws_v4::{AwsRequest, Client, Config};
//! use stackwatch_core::{Context, OsEnv, Result};
//!
//! # async fn example(ctx: Context) -> Result<()> {
//! let config = Config::from_env(&ctx);
//! let client = Client::from_config(ctx, config);
//!
//! let req = AwsRequest::query("cloudformation", "Action=DescribeStacks&StackName=demo");
//! match client.send(req).await? {
//!     Ok(resp) => println!("{}", resp.text()),
//!     Err(failure) => eprintln!("{failure}"),
//! }
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{
    AWS_ACCESS_KEYS, AWS_ACCESS_KEY_ID, AWS_DEFAULT_REGION, AWS_SECRET_ACCESS_KEY,
    AWS_SESSION_TOKEN, DEFAULT_REGION, GLOBAL_SERVICES,
};

mod config;
pub use config::signing_region;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::RequestSigner;

mod payload;
pub use payload::Payload;

mod client;
pub use client::{AwsRequest, Client, HttpFailure, Response};

mod format;
pub use format::{render, ContentFormat};
