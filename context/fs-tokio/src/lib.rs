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

//! Tokio-based file access for stackwatch.
//!
//! This crate provides `TokioFileRead` and `TokioFileWrite`, which implement
//! the `FileRead` and `FileWrite` traits from `stackwatch_core` on top of
//! `tokio::fs`.
//!
//! ## Example
//!
//! ```no_run
//! use stackwatch_core::{Context, OsEnv};
//! use stackwatch_fs_tokio::{TokioFileRead, TokioFileWrite};
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new()
//!         .with_file_read(TokioFileRead)
//!         .with_file_write(TokioFileWrite)
//!         .with_env(OsEnv);
//!
//!     match ctx.file_modified("template.yaml").await {
//!         Ok(Some(at)) => println!("modified at {at:?}"),
//!         Ok(None) => println!("no such file"),
//!         Err(e) => eprintln!("failed to stat file: {e}"),
//!     }
//! }
//! ```

use std::io::ErrorKind;
use std::time::SystemTime;

use async_trait::async_trait;
use log::debug;
use stackwatch_core::{Error, FileRead, FileWrite, Result};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::unexpected(format!("failed to read file {path}")).with_source(e))
    }

    async fn file_modified(&self, path: &str) -> Result<Option<SystemTime>> {
        let meta = match tokio::fs::metadata(path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::unexpected(format!("failed to stat file {path}")).with_source(e))
            }
        };

        let modified = meta.modified().map_err(|e| {
            Error::unexpected(format!("modification time unavailable for {path}")).with_source(e)
        })?;
        Ok(Some(modified))
    }
}

/// Tokio-based implementation of the `FileWrite` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileWrite;

#[async_trait]
impl FileWrite for TokioFileWrite {
    async fn file_write(&self, path: &str, content: &[u8]) -> Result<()> {
        debug!("writing {} bytes to {path}", content.len());
        tokio::fs::write(path, content)
            .await
            .map_err(|e| Error::unexpected(format!("failed to write file {path}")).with_source(e))
    }

    async fn file_remove(&self, path: &str) -> Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(Error::unexpected(format!("failed to remove file {path}")).with_source(e))
            }
        }
    }
}
