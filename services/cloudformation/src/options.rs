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

use crate::constants::DEFAULT_EVENT_LOG;
use std::time::Duration;

/// What a one-shot call does with an error status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnError {
    /// Return the error status as an error.
    #[default]
    Stop,
    /// Return the error status like any other status.
    ContinueSilently,
}

/// How much of a response is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputDetail {
    /// Status line and rendered body.
    #[default]
    Full,
    /// Status line only.
    StatusOnly,
}

/// Whether state-changing actions ask the operator first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Confirm {
    /// Ask for the stack name to be typed back.
    #[default]
    Interactive,
    /// Proceed without asking.
    Auto,
}

/// Behavior switches shared by every operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub on_error: OnError,
    pub output: OutputDetail,
    pub confirm: Confirm,
}

impl Options {
    /// Set the error policy.
    pub fn with_on_error(mut self, on_error: OnError) -> Self {
        self.on_error = on_error;
        self
    }

    /// Set the output detail.
    pub fn with_output(mut self, output: OutputDetail) -> Self {
        self.output = output;
        self
    }

    /// Set the confirmation mode.
    pub fn with_confirm(mut self, confirm: Confirm) -> Self {
        self.confirm = confirm;
        self
    }
}

/// Parameters of a watch session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watch {
    /// Base poll interval; zero polls exactly once.
    pub interval: Duration,
    /// Sleep before the first poll.
    pub initial_delay: Duration,
    /// Persist the last event page on success.
    pub keep_event_log: bool,
    /// Path of the persisted event page.
    pub event_log: String,
}

impl Default for Watch {
    fn default() -> Self {
        Self {
            interval: Duration::ZERO,
            initial_delay: Duration::ZERO,
            keep_event_log: false,
            event_log: DEFAULT_EVENT_LOG.to_string(),
        }
    }
}

impl Watch {
    /// Poll a single time.
    pub fn once() -> Self {
        Self::default()
    }

    /// Poll until the stack settles.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Set the delay before the first poll.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Keep the last event page in `path` after a successful session.
    pub fn with_event_log(mut self, path: &str, keep: bool) -> Self {
        self.event_log = path.to_string();
        self.keep_event_log = keep;
        self
    }

    /// Whether polls repeat.
    pub fn is_watching(&self) -> bool {
        !self.interval.is_zero()
    }
}
