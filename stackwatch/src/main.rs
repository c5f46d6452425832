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

//! stackwatch - deploy CloudFormation stacks and watch their events

use clap::{Args, Parser, Subcommand};
use http::Method;
use log::debug;
use stackwatch::aws::{default_client, AwsRequest};
use stackwatch::cloudformation::{
    Confirm, Deployment, DeploymentWatcher, OnError, Options, OutputDetail, StdConsole, Watch,
};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "stackwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the event log of a stack
    Events(EventsArgs),

    /// Show why resources of a stack reached a status
    Reasons(ReasonsArgs),

    /// Create or update a stack from a template
    Deploy(DeployArgs),

    /// Delete a stack
    Delete(DeleteArgs),

    /// Send a single signed request and print the response
    Call(CallArgs),
}

#[derive(Args)]
struct EventsArgs {
    /// Stack name
    name: String,

    /// Poll every SECS seconds until the stack settles
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    watch: u64,

    /// Wait SECS seconds before the first poll
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    delay: u64,

    /// Keep the last event page after a successful watch
    #[arg(long)]
    keep: bool,
}

#[derive(Args)]
struct ReasonsArgs {
    /// Stack name
    name: String,

    /// Part of the resource status to report
    #[arg(long, default_value = "FAILED")]
    status: String,
}

#[derive(Args)]
struct DeployArgs {
    /// Stack name
    name: String,

    /// Template file
    template: String,

    /// Upload the template to bucket[/prefix] first
    #[arg(long, value_name = "LOCATION")]
    bucket: Option<String>,

    /// Stack parameter as KEY=VALUE, repeatable
    #[arg(long = "param", value_name = "K=V", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Poll every SECS seconds until the stack settles
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    watch: u64,

    /// Do not ask for confirmation
    #[arg(long)]
    yes: bool,
}

#[derive(Args)]
struct DeleteArgs {
    /// Stack name
    name: String,

    /// Poll every SECS seconds until the stack is gone
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    watch: u64,

    /// Do not ask for confirmation
    #[arg(long)]
    yes: bool,
}

#[derive(Args)]
struct CallArgs {
    /// Service name, such as cloudformation, iam or s3
    service: String,

    /// Host without the provider domain; derived from the service when empty
    #[arg(long, default_value = "")]
    host: String,

    #[arg(long, default_value = "/")]
    path: String,

    #[arg(long, default_value = "POST")]
    method: String,

    /// Request body, usually a form such as Action=ListUsers
    #[arg(long, default_value = "")]
    body: String,

    /// Print the status line only
    #[arg(long)]
    status_only: bool,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid parameter `{s}`, expected KEY=VALUE"))
}

/// Event log next to the executable name, as `<argv0>.dat`.
fn event_log() -> Option<String> {
    std::env::args().next().map(|arg0| format!("{arg0}.dat"))
}

fn watch(secs: u64, keep: bool) -> Watch {
    let watch = Watch::every(Duration::from_secs(secs));
    match event_log() {
        Some(path) => watch.with_event_log(&path, keep),
        None => watch,
    }
}

fn confirm(yes: bool) -> Confirm {
    if yes {
        Confirm::Auto
    } else {
        Confirm::Interactive
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("stackwatch: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Run the command, returning whether it ended in success.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let watcher = DeploymentWatcher::new(default_client(), StdConsole);
    debug!("region: {}", watcher.client().config().region);

    let success = match cli.command {
        Commands::Events(args) => {
            let watch = watch(args.watch, args.keep)
                .with_initial_delay(Duration::from_secs(args.delay));
            watcher
                .describe_events(&args.name, &watch)
                .await?
                .is_success()
        }
        Commands::Reasons(args) => {
            let status = watcher
                .with_options(Options::default().with_on_error(OnError::ContinueSilently))
                .status_reasons(&args.name, &args.status)
                .await?;
            is_success(status)
        }
        Commands::Deploy(args) => {
            let mut deployment = Deployment::new(&args.name, &args.template);
            if let Some(location) = &args.bucket {
                deployment = deployment.with_upload_location(location);
            }
            for (k, v) in &args.params {
                deployment = deployment.with_parameter(k, v);
            }
            watcher
                .with_options(Options::default().with_confirm(confirm(args.yes)))
                .deploy(&deployment, &watch(args.watch, false))
                .await?
                .is_success()
        }
        Commands::Delete(args) => watcher
            .with_options(Options::default().with_confirm(confirm(args.yes)))
            .delete(&args.name, &watch(args.watch, false))
            .await?
            .is_success(),
        Commands::Call(args) => {
            let method = Method::from_bytes(args.method.to_uppercase().as_bytes())?;
            let req = AwsRequest::new(&args.service)
                .with_host(&args.host)
                .with_path(&args.path)
                .with_method(method)
                .with_body(args.body);
            let output = if args.status_only {
                OutputDetail::StatusOnly
            } else {
                OutputDetail::Full
            };
            let status = watcher
                .with_options(
                    Options::default()
                        .with_on_error(OnError::ContinueSilently)
                        .with_output(output),
                )
                .show(req)
                .await?;
            is_success(status)
        }
    };

    Ok(success)
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
