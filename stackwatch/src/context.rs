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

use stackwatch_core::{Context, OsEnv};
use stackwatch_fs_tokio::{TokioFileRead, TokioFileWrite};
use stackwatch_http_send_reqwest::ReqwestHttpSend;

/// Create a context with tokio file access, the reqwest transport and the
/// process environment.
///
/// ```no_run
/// let ctx = stackwatch::default_context();
/// let region = ctx.env_var("AWS_DEFAULT_REGION");
/// ```
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_file_write(TokioFileWrite)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}
