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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use std::time::Duration;

pub const SERVICE: &str = "cloudformation";

/// Width of the rules and of the right-aligned status line.
pub const RULE_WIDTH: usize = 79;

/// Stack level events inspected per poll, counted on in-progress ones.
pub const LOOKBACK: usize = 3;

pub const IN_PROGRESS_SUFFIX: &str = "_IN_PROGRESS";
pub const FAILED_SUFFIX: &str = "_FAILED";
pub const CLEANUP_MARKER: &str = "_CLEANUP_";
pub const ROLLBACK_MARKER: &str = "ROLLBACK";
pub const ROLLBACK_COMPLETE: &str = "ROLLBACK_COMPLETE";

/// Stack status used when a page holds no stack level event.
pub const UNKNOWN_STATUS: &str = "lots_IN_PROGRESS";

pub const CAPABILITY: &str = "CAPABILITY_NAMED_IAM";

/// Marker of the error returned for an update without changes.
pub const NO_UPDATE_MARKER: &str = "No update";
/// Marker of the error returned for an unknown stack.
pub const NOT_EXIST_MARKER: &str = "does not exist";

/// Delay before the first poll after submitting a change.
pub const SUBMIT_DELAY: Duration = Duration::from_secs(5);
/// Interval of the existence polling while a stack is deleted for recreation.
pub const RECREATE_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub const DEFAULT_EVENT_LOG: &str = "stackwatch.dat";

/// Characters left as is in form values besides alphanumerics.
pub static FORM_VALUE_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
