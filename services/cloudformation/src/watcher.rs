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

use crate::console::Console;
use crate::constants::*;
use crate::model::EventPage;
use crate::options::{OnError, Options, Watch};
use crate::tracker::{status_reasons, Busy, WatchState};
use log::debug;
use stackwatch_aws_v4::{AwsRequest, Client, HttpFailure, Response};
use stackwatch_core::{Error, Result};
use std::sync::Arc;

/// How a watch session ended.
#[derive(Debug, Clone)]
pub enum WatchOutcome {
    /// The stack settled in a successful status, or a single poll found no
    /// failure.
    Succeeded {
        /// Last stack level status.
        stack_status: String,
    },
    /// The stack settled in a failed or rolled back status, or a poll was
    /// answered with a server error.
    Failed {
        /// Last stack level status, if any page was decoded.
        stack_status: Option<String>,
        /// Body of the last response.
        body: String,
    },
    /// A poll was rejected with a client error, polling stopped at once.
    Rejected(HttpFailure),
}

impl WatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WatchOutcome::Succeeded { .. })
    }

    /// Last stack level status seen by the session.
    pub fn stack_status(&self) -> Option<&str> {
        match self {
            WatchOutcome::Succeeded { stack_status } => Some(stack_status),
            WatchOutcome::Failed { stack_status, .. } => stack_status.as_deref(),
            WatchOutcome::Rejected(_) => None,
        }
    }
}

/// DeploymentWatcher reports the progress of stack changes.
///
/// All output goes through the [`Console`]; every request is signed and
/// sent by the [`Client`].
#[derive(Debug, Clone)]
pub struct DeploymentWatcher {
    pub(crate) client: Client,
    pub(crate) console: Arc<dyn Console>,
    pub(crate) options: Options,
}

/// One poll as seen by the loop.
enum Poll {
    Page {
        busy: Busy,
        failure: bool,
        stack_status: String,
        body: String,
    },
    Failure(HttpFailure),
}

impl DeploymentWatcher {
    /// Create a watcher with default options.
    pub fn new(client: Client, console: impl Console) -> Self {
        Self {
            client,
            console: Arc::new(console),
            options: Options::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Watch the event log of stack `name`.
    ///
    /// Polls once when `watch` has no interval, otherwise until the stack
    /// leaves its in-progress status. The poll interval is doubled while
    /// nothing changes.
    pub async fn describe_events(&self, name: &str, watch: &Watch) -> Result<WatchOutcome> {
        if watch.initial_delay.is_zero() {
            self.console.print(&format!("StackName: {name}\n"));
        } else {
            self.console.print(&"_".repeat(RULE_WIDTH));
            tokio::time::sleep(watch.initial_delay).await;
        }

        let mut state = WatchState::new();
        let mut prefix = None;
        let (failure, stack_status, body) = loop {
            let (busy, failed, stack_status, body) =
                match self.poll_events(name, &mut state, prefix.take()).await? {
                    Poll::Page {
                        busy,
                        failure,
                        stack_status,
                        body,
                    } => (busy, failure, stack_status, body),
                    Poll::Failure(failure) if failure.is_client_error() => {
                        self.console.print(&failure.text());
                        return Ok(WatchOutcome::Rejected(failure));
                    }
                    Poll::Failure(failure) => break (true, None, failure.text()),
                };

            if !busy.is_busy() || !watch.is_watching() {
                break (failed, Some(stack_status), body);
            }

            debug!("stack {name} is {stack_status}, polling again");
            tokio::time::sleep(busy.delay(watch.interval)).await;
            let blank = if busy == Busy::Changed { "\n" } else { "" };
            prefix = Some(format!("{blank}{}", "#".repeat(RULE_WIDTH)));
        };
        debug!("watch of stack {name} ended, failure: {failure}");

        if watch.is_watching() {
            self.console.print(&format!(
                "\nStackName: {name} (done)\n{}",
                "=".repeat(RULE_WIDTH)
            ));
        }

        if !failure {
            if watch.keep_event_log {
                self.client
                    .context()
                    .file_write(&watch.event_log, body.as_bytes())
                    .await?;
            }
            return Ok(WatchOutcome::Succeeded {
                stack_status: stack_status.unwrap_or_default(),
            });
        }

        if self.client.context().file_remove(&watch.event_log).await? {
            debug!("removed stale event log {}", watch.event_log);
        }
        self.console.eprint(&body);
        Ok(WatchOutcome::Failed { stack_status, body })
    }

    /// Fetch one page, feed it to the tracker and print the report.
    async fn poll_events(
        &self,
        name: &str,
        state: &mut WatchState,
        prefix: Option<String>,
    ) -> Result<Poll> {
        let resp = match self.describe_stack_events(name).await? {
            Ok(resp) => resp,
            Err(failure) => {
                self.console.print(&format!(
                    "{}\nstatus  {} {}",
                    prefix.unwrap_or_default(),
                    failure.status.as_u16(),
                    failure.reason()
                ));
                return Ok(Poll::Failure(failure));
            }
        };

        let page = EventPage::decode(resp.content_type(), &resp.body)?;
        let report = state.update(&page, name);

        if report.busy == Busy::Unchanged {
            if let Some(rule) = &prefix {
                self.console.print(rule);
            }
        } else {
            let mut lines: Vec<String> = prefix.into_iter().collect();
            lines.push(status_line(&resp, name));
            lines.extend(report.lines.iter().cloned());
            self.console.print(&lines.join("\n"));
        }

        Ok(Poll::Page {
            busy: report.busy,
            failure: report.is_failure(),
            stack_status: report.stack_status,
            body: resp.text(),
        })
    }

    pub(crate) async fn describe_stack_events(
        &self,
        name: &str,
    ) -> Result<std::result::Result<Response, HttpFailure>> {
        self.client
            .send(AwsRequest::query(
                SERVICE,
                format!("Action=DescribeStackEvents&StackName={name}"),
            ))
            .await
    }

    /// Print why resources of stack `name` reached a status containing
    /// `status_key`, returning the http status.
    pub async fn status_reasons(&self, name: &str, status_key: &str) -> Result<u16> {
        self.console.print(&format!("StackName: {name}\n"));

        match self.describe_stack_events(name).await? {
            Ok(resp) => {
                let page = EventPage::decode(resp.content_type(), &resp.body)?;
                for line in status_reasons(&page, name, status_key) {
                    self.console.print(&line);
                }
                Ok(resp.status.as_u16())
            }
            Err(failure) => self.fail(failure),
        }
    }

    /// Apply the error policy to an error status.
    pub(crate) fn fail(&self, failure: HttpFailure) -> Result<u16> {
        match self.options.on_error {
            OnError::Stop => Err(Error::unexpected(failure.to_string())),
            OnError::ContinueSilently => Ok(failure.status.as_u16()),
        }
    }
}

/// `status  200 OK ` followed by the stack name, right aligned to the rule.
fn status_line(resp: &Response, name: &str) -> String {
    let head = format!("status  {} {} ", resp.status.as_u16(), resp.reason());
    let width = RULE_WIDTH.saturating_sub(head.len());
    format!("{head}{name:>width$}")
}
