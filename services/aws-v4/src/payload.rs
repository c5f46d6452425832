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

use crate::constants::CONTENT_TYPE_AMZ_JSON;
use bytes::Bytes;
use stackwatch_core::{Error, Result};

/// Body of an outgoing request before it is turned into bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// Text sent as utf-8, usually a form-encoded query.
    Text(String),
    /// Raw bytes such as a template upload.
    Bytes(Bytes),
    /// A JSON document for the JSON protocol services.
    Json(serde_json::Value),
}

impl Payload {
    /// Content type implied by the payload itself, if any.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Payload::Json(_) => Some(CONTENT_TYPE_AMZ_JSON),
            _ => None,
        }
    }

    /// Serialize the payload into the exact bytes that get hashed and sent.
    ///
    /// JSON keeps non-ASCII characters as utf-8.
    pub fn into_bytes(self) -> Result<Bytes> {
        Ok(match self {
            Payload::Empty => Bytes::new(),
            Payload::Text(s) => Bytes::from(s),
            Payload::Bytes(bs) => bs,
            Payload::Json(v) => serde_json::to_vec(&v)
                .map(Bytes::from)
                .map_err(|e| Error::request_invalid("failed to serialize json payload").with_source(e))?,
        })
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::Bytes(value.into())
    }
}

impl From<Bytes> for Payload {
    fn from(value: Bytes) -> Self {
        Payload::Bytes(value)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Json(value)
    }
}
