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

//! CloudFormation deployments and their event log, as a console report.
//!
//! ## Example
//!
//! ```no_run
//! use stackwatch_aws_v4::{Client, Config};
//! use stackwatch_cloudformation::{DeploymentWatcher, StdConsole, Watch};
//! use stackwatch_core::{Context, Result};
//! use std::time::Duration;
//!
//! # async fn example(ctx: Context) -> Result<()> {
//! let client = Client::from_config(ctx.clone(), Config::from_env(&ctx));
//! let watcher = DeploymentWatcher::new(client, StdConsole);
//!
//! let outcome = watcher
//!     .describe_events("demo", &Watch::every(Duration::from_secs(10)))
//!     .await?;
//! println!("success: {}", outcome.is_success());
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{LOOKBACK, RULE_WIDTH, SERVICE};

mod options;
pub use options::{Confirm, OnError, Options, OutputDetail, Watch};

mod console;
pub use console::{Console, MemoryConsole, StdConsole};

mod model;
pub use model::{decode_stack_status, EventPage, StackEvent};

mod tracker;
pub use tracker::{is_failure_status, status_reasons, Busy, PollReport, WatchState};

mod watcher;
pub use watcher::{DeploymentWatcher, WatchOutcome};

mod call;

mod deploy;
pub use deploy::{escape, plan_action, Action, Deployment, Outcome};
