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

use quick_xml::de;
use serde::Deserialize;
use stackwatch_aws_v4::ContentFormat;
use stackwatch_core::time::{format_rfc3339_millis, from_epoch_seconds};
use stackwatch_core::{Error, Result};

/// One entry of a stack event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEvent {
    /// Logical id of the resource; equals the stack name for stack events.
    pub resource_id: String,
    /// Resource status such as `CREATE_IN_PROGRESS`.
    pub status: String,
    /// Fixed width ISO-8601 timestamp, comparable as a string.
    pub timestamp: String,
    /// Status reason, if any.
    pub reason: Option<String>,
}

impl StackEvent {
    /// Create an event without reason.
    pub fn new(resource_id: &str, status: &str, timestamp: &str) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            status: status.to_string(),
            timestamp: timestamp.to_string(),
            reason: None,
        }
    }

    /// Set the status reason.
    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    /// The `hh:mm:ss` part of the timestamp.
    pub fn time_of_day(&self) -> &str {
        self.timestamp.get(11..19).unwrap_or(&self.timestamp)
    }
}

/// One page of `DescribeStackEvents`, newest event first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPage {
    pub events: Vec<StackEvent>,
    /// Set when older events exist on another page.
    pub next_token: Option<String>,
}

impl EventPage {
    /// Decode a response body according to its declared content type.
    pub fn decode(content_type: &str, body: &[u8]) -> Result<Self> {
        match ContentFormat::from_content_type(content_type) {
            ContentFormat::Json => Self::from_json(body),
            ContentFormat::Xml | ContentFormat::Other => Self::from_xml(body),
        }
    }

    /// Decode the xml protocol response.
    pub fn from_xml(body: &[u8]) -> Result<Self> {
        let body = std::str::from_utf8(body)
            .map_err(|e| Error::unexpected("event page is not valid utf-8").with_source(e))?;
        let resp: DescribeStackEventsResponse = de::from_str(body).map_err(|e| {
            Error::unexpected("failed to parse DescribeStackEvents response").with_source(e)
        })?;
        let result = resp.result;

        Ok(Self {
            events: result
                .stack_events
                .member
                .into_iter()
                .map(|ev| StackEvent {
                    resource_id: ev.logical_resource_id,
                    status: ev.resource_status,
                    timestamp: ev.timestamp,
                    reason: ev.resource_status_reason.filter(|v| !v.is_empty()),
                })
                .collect(),
            next_token: result.next_token.filter(|v| !v.is_empty()),
        })
    }

    /// Decode the json protocol response, where timestamps are epoch seconds.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let resp: JsonDescribeStackEventsResponse = serde_json::from_slice(body).map_err(|e| {
            Error::unexpected("failed to parse DescribeStackEvents response").with_source(e)
        })?;
        let result = resp.response.result;

        let mut events = Vec::with_capacity(result.stack_events.len());
        for ev in result.stack_events {
            events.push(StackEvent {
                resource_id: ev.logical_resource_id,
                status: ev.resource_status,
                timestamp: ev.timestamp.into_string()?,
                reason: ev.resource_status_reason.filter(|v| !v.is_empty()),
            });
        }

        Ok(Self {
            events,
            next_token: result.next_token.filter(|v| !v.is_empty()),
        })
    }
}

/// Status of the first stack in a `DescribeStacks` response.
pub fn decode_stack_status(content_type: &str, body: &[u8]) -> Result<Option<String>> {
    let status = match ContentFormat::from_content_type(content_type) {
        ContentFormat::Json => {
            let resp: JsonDescribeStacksResponse = serde_json::from_slice(body).map_err(|e| {
                Error::unexpected("failed to parse DescribeStacks response").with_source(e)
            })?;
            resp.response
                .result
                .stacks
                .into_iter()
                .next()
                .map(|s| s.stack_status)
        }
        ContentFormat::Xml | ContentFormat::Other => {
            let body = std::str::from_utf8(body).map_err(|e| {
                Error::unexpected("stack description is not valid utf-8").with_source(e)
            })?;
            let resp: DescribeStacksResponse = de::from_str(body).map_err(|e| {
                Error::unexpected("failed to parse DescribeStacks response").with_source(e)
            })?;
            resp.result
                .stacks
                .member
                .into_iter()
                .next()
                .map(|s| s.stack_status)
        }
    };

    Ok(status.filter(|v| !v.is_empty()))
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct DescribeStackEventsResponse {
    #[serde(rename = "DescribeStackEventsResult")]
    result: DescribeStackEventsResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct DescribeStackEventsResult {
    stack_events: XmlStackEvents,
    next_token: Option<String>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct XmlStackEvents {
    member: Vec<XmlStackEvent>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct XmlStackEvent {
    logical_resource_id: String,
    resource_status: String,
    timestamp: String,
    resource_status_reason: Option<String>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct DescribeStacksResponse {
    #[serde(rename = "DescribeStacksResult")]
    result: DescribeStacksResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct DescribeStacksResult {
    stacks: XmlStacks,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct XmlStacks {
    member: Vec<StackDescription>,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct StackDescription {
    stack_status: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct JsonDescribeStackEventsResponse {
    #[serde(rename = "DescribeStackEventsResponse")]
    response: JsonDescribeStackEventsBody,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct JsonDescribeStackEventsBody {
    #[serde(rename = "DescribeStackEventsResult")]
    result: JsonDescribeStackEventsResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct JsonDescribeStackEventsResult {
    stack_events: Vec<JsonStackEvent>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JsonStackEvent {
    logical_resource_id: String,
    resource_status: String,
    timestamp: JsonTimestamp,
    #[serde(default)]
    resource_status_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonTimestamp {
    Epoch(f64),
    Text(String),
}

impl JsonTimestamp {
    fn into_string(self) -> Result<String> {
        match self {
            JsonTimestamp::Epoch(secs) => Ok(format_rfc3339_millis(from_epoch_seconds(secs)?)),
            JsonTimestamp::Text(s) => Ok(s),
        }
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct JsonDescribeStacksResponse {
    #[serde(rename = "DescribeStacksResponse")]
    response: JsonDescribeStacksBody,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default)]
struct JsonDescribeStacksBody {
    #[serde(rename = "DescribeStacksResult")]
    result: JsonDescribeStacksResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct JsonDescribeStacksResult {
    stacks: Vec<StackDescription>,
}
