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
use crate::model::EventPage;
use std::collections::HashMap;
use std::time::Duration;

/// Poll outcome as seen by the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Busy {
    /// The stack reached a terminal status.
    Idle,
    /// Still in progress and something changed, or this was the first poll.
    Changed,
    /// Still in progress and nothing changed.
    Unchanged,
}

impl Busy {
    /// Whether polling should continue.
    pub fn is_busy(self) -> bool {
        self != Busy::Idle
    }

    /// Factor applied to the poll interval before the next poll.
    ///
    /// A quiet stack is polled half as often.
    pub fn multiplier(self) -> u32 {
        match self {
            Busy::Idle => 0,
            Busy::Changed => 1,
            Busy::Unchanged => 2,
        }
    }

    /// Time to wait before the next poll, saturating at [`Duration::MAX`].
    pub fn delay(self, interval: Duration) -> Duration {
        interval.saturating_mul(self.multiplier())
    }
}

/// Result of feeding one page to [`WatchState::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    /// Report lines, stack level and member events interleaved as received.
    pub lines: Vec<String>,
    /// Member events not seen by an earlier poll.
    pub new_events: usize,
    pub busy: Busy,
    /// Latest stack level status, or `lots_IN_PROGRESS` when none was found.
    pub stack_status: String,
    /// Whether a member failure was seen after the stack status was known,
    /// in this poll or an earlier one.
    pub failure_seen: bool,
}

impl PollReport {
    /// The stack status once it is terminal.
    pub fn terminal_status(&self) -> Option<&str> {
        (!self.busy.is_busy()).then_some(self.stack_status.as_str())
    }

    /// Whether the session ends in failure, meaningful once terminal.
    pub fn is_failure(&self) -> bool {
        self.failure_seen || is_failure_status(&self.stack_status)
    }
}

/// A stack status that denotes a failed deployment.
pub fn is_failure_status(status: &str) -> bool {
    status.contains(ROLLBACK_MARKER) || status.ends_with(FAILED_SUFFIX)
}

/// State of one watch session.
#[derive(Debug, Clone)]
pub struct WatchState {
    latest: HashMap<String, String>,
    stack_status: Option<String>,
    failure_seen: bool,
}

impl Default for WatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchState {
    /// Create the state of a new session.
    pub fn new() -> Self {
        Self {
            latest: HashMap::new(),
            stack_status: None,
            failure_seen: false,
        }
    }

    /// Latest timestamp seen for a resource.
    pub fn latest_timestamp(&self, resource_id: &str) -> Option<&str> {
        self.latest.get(resource_id).map(String::as_str)
    }

    /// Stack status of the last poll.
    pub fn stack_status(&self) -> Option<&str> {
        self.stack_status.as_deref()
    }

    /// Whether a failure has been seen during this session.
    pub fn failure_seen(&self) -> bool {
        self.failure_seen
    }

    /// Feed one page of events of stack `name`.
    pub fn update(&mut self, page: &EventPage, name: &str) -> PollReport {
        let first_poll = self.stack_status.is_none();
        let mut lines = Vec::new();
        let mut new_events = 0;
        let mut own_status: Option<&str> = None;
        let mut remaining = LOOKBACK;

        for ev in &page.events {
            if ev.resource_id == name {
                if ev.status.contains(CLEANUP_MARKER) {
                    continue;
                }
                lines.push(format!("  ----  {}  {}", ev.timestamp, ev.status));
                own_status.get_or_insert(ev.status.as_str());

                if ev.status.ends_with(IN_PROGRESS_SUFFIX) {
                    remaining -= 1;
                    if remaining == 0 {
                        break;
                    }
                }
                continue;
            }

            let failed = ev.status.ends_with(FAILED_SUFFIX);
            // Failures older than the latest stack event belong to a change
            // that is still settling.
            if failed && own_status.is_some() {
                self.failure_seen = true;
            }

            if self
                .latest
                .get(&ev.resource_id)
                .is_some_and(|seen| seen.as_str() >= ev.timestamp.as_str())
            {
                continue;
            }
            self.latest
                .insert(ev.resource_id.clone(), ev.timestamp.clone());
            new_events += 1;

            if failed {
                lines.push(format!(
                    "{}  {}\t{}",
                    ev.status,
                    ev.time_of_day(),
                    ev.resource_id
                ));
            } else {
                lines.push(format!(
                    "    {}  {}\t{}",
                    ev.time_of_day(),
                    ev.status,
                    ev.resource_id
                ));
            }
        }

        if page.next_token.is_some() {
            lines.push("  ...".to_string());
        }

        let stack_status = own_status.unwrap_or(UNKNOWN_STATUS).to_string();
        self.stack_status = Some(stack_status.clone());

        let busy = if !stack_status.ends_with(IN_PROGRESS_SUFFIX) {
            Busy::Idle
        } else if first_poll || new_events > 0 {
            Busy::Changed
        } else {
            Busy::Unchanged
        };

        PollReport {
            lines,
            new_events,
            busy,
            stack_status,
            failure_seen: self.failure_seen,
        }
    }
}

/// Lines explaining why resources reached a status containing `status_key`.
///
/// Only the newest matching event of each resource is reported, and only
/// when it carries a reason. Stack level events are listed with the same
/// lookback as [`WatchState::update`].
pub fn status_reasons(page: &EventPage, name: &str, status_key: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut newest: HashMap<&str, &str> = HashMap::new();
    let mut remaining = LOOKBACK;

    for ev in &page.events {
        if ev.resource_id == name {
            lines.push(format!("  ----  {}  {}", ev.timestamp, ev.status));
            if ev.status.ends_with(IN_PROGRESS_SUFFIX) {
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
            continue;
        }

        if !ev.status.contains(status_key) {
            continue;
        }
        let first = *newest
            .entry(ev.resource_id.as_str())
            .or_insert(ev.timestamp.as_str());
        if first != ev.timestamp {
            continue;
        }
        if let Some(reason) = &ev.reason {
            lines.push(format!(
                "{}  {}\t{}\n{}\n",
                ev.status,
                ev.time_of_day(),
                ev.resource_id,
                reason
            ));
        }
    }

    lines
}
