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

use crate::options::OutputDetail;
use crate::watcher::DeploymentWatcher;
use http::StatusCode;
use stackwatch_aws_v4::{render, AwsRequest};
use stackwatch_core::Result;

impl DeploymentWatcher {
    /// Send a single request and print its status and rendered body.
    ///
    /// Returns the http status. An error status is returned as an error
    /// unless the options continue silently.
    pub async fn show(&self, req: AwsRequest) -> Result<u16> {
        match self.client.send(req).await? {
            Ok(resp) => {
                self.print_response(resp.status, resp.reason(), resp.content_type(), &resp.body);
                Ok(resp.status.as_u16())
            }
            Err(failure) => {
                self.print_response(
                    failure.status,
                    failure.reason(),
                    failure.content_type(),
                    &failure.body,
                );
                self.fail(failure)
            }
        }
    }

    pub(crate) fn print_status(&self, status: StatusCode, reason: &str) {
        self.console
            .print(&format!("STATUS  {} {}", status.as_u16(), reason));
    }

    fn print_response(&self, status: StatusCode, reason: &str, content_type: &str, body: &[u8]) {
        self.print_status(status, reason);
        if self.options.output == OutputDetail::Full && !body.is_empty() {
            self.console.print(&render(content_type, body, true));
        }
    }
}
