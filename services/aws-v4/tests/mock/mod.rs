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

use async_trait::async_trait;
use bytes::Bytes;
use stackwatch_core::{Error, FileRead, HttpSend, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// Replays scripted responses and records every request.
#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    responses: Arc<Mutex<VecDeque<(u16, &'static str)>>>,
    requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
}

impl MockHttpSend {
    pub fn respond(self, status: u16, body: &'static str) -> Self {
        self.responses.lock().unwrap().push_back((status, body));
        self
    }

    pub fn requests(&self) -> Vec<http::Request<Bytes>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.requests.lock().unwrap().push(req);
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::unexpected("connection refused"))?;

        Ok(http::Response::builder()
            .status(status)
            .header("content-type", "text/xml")
            .body(Bytes::from_static(body.as_bytes()))?)
    }
}

/// In-memory files.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileRead {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryFileRead {
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.as_bytes().to_vec());
        self
    }
}

#[async_trait]
impl FileRead for MemoryFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::unexpected(format!("failed to read file {path}")))
    }

    async fn file_modified(&self, path: &str) -> Result<Option<SystemTime>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .contains_key(path)
            .then(SystemTime::now))
    }
}
