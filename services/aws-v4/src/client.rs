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
use crate::{Config, Credential, DefaultCredentialProvider, Payload, RequestSigner};
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HOST};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use log::debug;
use stackwatch_core::{Context, ProvideCredential, Result, Signer};
use std::fmt;

/// A request to an aws endpoint, before host resolution and signing.
#[derive(Debug, Clone)]
pub struct AwsRequest {
    /// Service name, also the first label of the default host.
    pub service: String,
    /// Host without the provider domain; empty means `<service>.<region>`.
    /// For `s3` this is the bucket.
    pub host: String,
    /// Path, optionally with a query.
    pub path: String,
    /// HTTP method.
    pub method: Method,
    /// Extra headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Payload,
}

impl AwsRequest {
    /// Create a `POST /` request for `service`.
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
            host: String::new(),
            path: "/".to_string(),
            method: Method::POST,
            headers: HeaderMap::new(),
            body: Payload::Empty,
        }
    }

    /// Create a form-encoded query API call such as `Action=DescribeStacks&...`.
    pub fn query(service: &str, body: impl Into<String>) -> Self {
        Self::new(service).with_body(body.into())
    }

    /// Set the host.
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the path.
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Set the method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Insert a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Payload>) -> Self {
        self.body = body.into();
        self
    }
}

/// A response with a success status.
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

/// A response with an error status (4xx or 5xx).
#[derive(Debug, Clone)]
pub struct HttpFailure {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body, usually an xml error document.
    pub body: Bytes,
}

macro_rules! impl_response_accessors {
    ($ty:ty) => {
        impl $ty {
            /// Declared content type, empty when absent.
            pub fn content_type(&self) -> &str {
                self.headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
            }

            /// Canonical reason phrase of the status.
            pub fn reason(&self) -> &'static str {
                self.status.canonical_reason().unwrap_or_default()
            }

            /// Body decoded as utf-8, invalid sequences replaced.
            pub fn text(&self) -> String {
                String::from_utf8_lossy(&self.body).into_owned()
            }
        }
    };
}

impl_response_accessors!(Response);
impl_response_accessors!(HttpFailure);

impl HttpFailure {
    /// 4xx responses are never worth retrying.
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status {} {}: {}",
            self.status.as_u16(),
            self.reason(),
            self.text()
        )
    }
}

/// Client signs and sends requests to aws endpoints.
///
/// `send` returns `Err` only when no response could be obtained (signing,
/// credential or transport failure). An error status from the service is an
/// `Ok(Err(HttpFailure))`.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    config: Config,
    signer: Signer<Credential>,
}

impl Client {
    /// Create a client with a custom credential provider.
    pub fn new(
        ctx: Context,
        config: Config,
        loader: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        // Requests derive their own signer, this one owns the credential cache.
        let signer = Signer::new(
            ctx.clone(),
            loader,
            RequestSigner::new("cloudformation", &config.region),
        );

        Self {
            ctx,
            config,
            signer,
        }
    }

    /// Create a client using the credential file, then the environment.
    pub fn from_config(ctx: Context, config: Config) -> Self {
        let loader = DefaultCredentialProvider::new(&config);
        Self::new(ctx, config, loader)
    }

    /// Context used for all effects.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sign and send a request.
    pub async fn send(&self, req: AwsRequest) -> Result<std::result::Result<Response, HttpFailure>> {
        let service = req.service.clone();
        let region = self.config.region_for(&service).to_string();
        let (mut parts, body) = prepare(req, &region)?;

        self.signer
            .with_builder(RequestSigner::new(&service, &region))
            .sign(&mut parts, &body)
            .await?;

        let resp = self
            .ctx
            .http_send(http::Request::from_parts(parts, body))
            .await?;
        let (parts, body) = resp.into_parts();
        debug!("STATUS  {} ({} bytes)", parts.status, body.len());

        if parts.status.is_client_error() || parts.status.is_server_error() {
            return Ok(Err(HttpFailure {
                status: parts.status,
                headers: parts.headers,
                body,
            }));
        }

        Ok(Ok(Response {
            status: parts.status,
            headers: parts.headers,
            body,
        }))
    }
}

/// Resolve host, content type and url of a request.
fn prepare(req: AwsRequest, region: &str) -> Result<(http::request::Parts, Bytes)> {
    let AwsRequest {
        service,
        mut host,
        path,
        method,
        mut headers,
        body,
    } = req;

    if let Some(content_type) = body.content_type() {
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }
    let body = body.into_bytes()?;

    if service == "s3" {
        if !host.contains(".s3") {
            host.push_str(".s3");
        }
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_TEXT));
        }
    } else if host.is_empty() {
        host = format!("{service}.{region}");
    }
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_FORM));
    }
    let host = format!("{host}.{PROVIDER_DOMAIN}");
    headers.insert(HOST, HeaderValue::from_str(&host)?);

    let url = format!("https://{host}{path}");
    debug!("url: {url}");

    let (mut parts, ()) = http::Request::builder()
        .method(method)
        .uri(url)
        .body(())?
        .into_parts();
    parts.headers = headers;

    Ok((parts, body))
}
