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
use crate::model::decode_stack_status;
use crate::options::{Confirm, Watch};
use crate::watcher::{DeploymentWatcher, WatchOutcome};
use http::{Method, StatusCode};
use log::debug;
use percent_encoding::utf8_percent_encode;
use stackwatch_aws_v4::{render, AwsRequest, HttpFailure};
use stackwatch_core::{Error, Result};

/// Percent-encode a form value, keeping alphanumerics and `!'()*-._~`.
pub fn escape(value: &str) -> String {
    utf8_percent_encode(value, &FORM_VALUE_ENCODE_SET).to_string()
}

/// What a deployment has to do given the current stack status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    /// Delete the rolled back stack, wait until it is gone, then create.
    Recreate,
    /// Another change is running, nothing is sent.
    InProgress(String),
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Action::Update => "Update",
            _ => "Create",
        }
    }
}

/// Decide the action from the status returned by [`DeploymentWatcher::exists`].
pub fn plan_action(status: Option<&str>) -> Action {
    match status {
        None => Action::Create,
        Some(status) if status.ends_with(IN_PROGRESS_SUFFIX) => {
            Action::InProgress(status.to_string())
        }
        Some(ROLLBACK_COMPLETE) => Action::Recreate,
        Some(_) => Action::Update,
    }
}

/// A stack to create or update from a local template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deployment {
    pub stack_name: String,
    /// Local template file.
    pub template_path: String,
    /// `bucket[/prefix]` to upload the template to; inline when unset.
    pub upload_location: Option<String>,
    /// Stack parameters in submission order.
    pub parameters: Vec<(String, String)>,
}

impl Deployment {
    pub fn new(stack_name: &str, template_path: &str) -> Self {
        Self {
            stack_name: stack_name.to_string(),
            template_path: template_path.to_string(),
            ..Default::default()
        }
    }

    /// Upload the template to `bucket[/prefix]` and reference it by url.
    pub fn with_upload_location(mut self, location: &str) -> Self {
        self.upload_location = Some(location.to_string());
        self
    }

    /// Append a stack parameter.
    pub fn with_parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.push((key.to_string(), value.to_string()));
        self
    }

    /// Form fields of the parameters, each prefixed with `&`.
    pub fn parameter_fields(&self) -> String {
        self.parameters
            .iter()
            .enumerate()
            .map(|(i, (k, v))| {
                let n = i + 1;
                format!(
                    "&Parameters.member.{n}.ParameterKey={k}&Parameters.member.{n}.ParameterValue={}",
                    escape(v)
                )
            })
            .collect()
    }
}

/// Result of a deploy or delete.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The confirmation did not match, nothing was sent.
    Aborted,
    /// The stack is busy with another change, nothing was sent.
    InProgress(String),
    /// The change was accepted and not watched.
    Completed(StatusCode),
    /// The update had nothing to change.
    NoUpdate,
    /// The change was refused.
    Rejected(HttpFailure),
    /// The change was accepted and watched to the end.
    Watched(WatchOutcome),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Completed(status) => status.is_success(),
            Outcome::NoUpdate => true,
            Outcome::Watched(outcome) => outcome.is_success(),
            Outcome::Aborted | Outcome::InProgress(_) | Outcome::Rejected(_) => false,
        }
    }

    /// Http status summarizing the outcome, if a request was answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Outcome::Completed(status) => Some(status.as_u16()),
            Outcome::NoUpdate => Some(StatusCode::NO_CONTENT.as_u16()),
            Outcome::Rejected(failure) => Some(failure.status.as_u16()),
            Outcome::Watched(WatchOutcome::Succeeded { .. }) => Some(StatusCode::OK.as_u16()),
            Outcome::Watched(WatchOutcome::Rejected(failure)) => Some(failure.status.as_u16()),
            Outcome::Aborted | Outcome::InProgress(_) | Outcome::Watched(_) => None,
        }
    }
}

impl DeploymentWatcher {
    /// Current status of stack `name`, `None` if the service refuses to
    /// describe it.
    pub async fn exists(&self, name: &str) -> Result<Option<String>> {
        let req = AwsRequest::query(SERVICE, format!("Action=DescribeStacks&StackName={name}"));
        match self.client.send(req).await? {
            Ok(resp) => decode_stack_status(resp.content_type(), &resp.body),
            Err(failure) => {
                debug!("stack {name} not described: {failure}");
                Ok(None)
            }
        }
    }

    /// Delete stack `name`, asking for confirmation first unless the options
    /// say otherwise.
    ///
    /// When watching, a stack that no longer exists counts as deleted.
    pub async fn delete(&self, name: &str, watch: &Watch) -> Result<Outcome> {
        self.delete_stack(name, self.options.confirm, watch).await
    }

    async fn delete_stack(&self, name: &str, confirm: Confirm, watch: &Watch) -> Result<Outcome> {
        match confirm {
            Confirm::Interactive => {
                if !self.confirm(&format!("StackName: {name}"), name)? {
                    return Ok(Outcome::Aborted);
                }
            }
            Confirm::Auto => self.console.print(&format!("StackName: {name}\n")),
        }

        let req = AwsRequest::query(SERVICE, format!("Action=DeleteStack&StackName={name}"));
        let resp = match self.client.send(req).await? {
            Ok(resp) => resp,
            Err(failure) => {
                self.print_status(failure.status, failure.reason());
                return Ok(Outcome::Rejected(failure));
            }
        };
        self.print_status(resp.status, resp.reason());

        if !watch.is_watching() {
            return Ok(Outcome::Completed(resp.status));
        }

        let watch = watch.clone().with_initial_delay(SUBMIT_DELAY);
        let outcome = match self.describe_events(name, &watch).await? {
            WatchOutcome::Rejected(failure)
                if failure.is_client_error() && failure.text().contains(NOT_EXIST_MARKER) =>
            {
                WatchOutcome::Succeeded {
                    stack_status: "DELETE_COMPLETE".to_string(),
                }
            }
            outcome => outcome,
        };
        Ok(Outcome::Watched(outcome))
    }

    /// Create or update a stack, then watch it when `watch` has an interval.
    ///
    /// A stack left in `ROLLBACK_COMPLETE` is deleted and created again.
    pub async fn deploy(&self, deployment: &Deployment, watch: &Watch) -> Result<Outcome> {
        let name = deployment.stack_name.as_str();
        let status = self.exists(name).await?;
        let action = plan_action(status.as_deref());
        debug!("stack {name} is {status:?}, action: {action:?}");

        if let Action::InProgress(status) = &action {
            self.console.print(&format!("{name} {status} ..."));
            return Ok(Outcome::InProgress(status.clone()));
        }

        let update = action == Action::Update;
        let header = format!(
            "StackName: {name} ({}{})",
            deployment.template_path,
            if update { " UP" } else { "" }
        );
        // Nothing is sent before the operator has confirmed, including the
        // delete of a rolled back stack.
        if self.options.confirm == Confirm::Interactive && !self.confirm(&header, name)? {
            return Ok(Outcome::Aborted);
        }

        if action == Action::Recreate {
            self.console.print(&format!("reset {ROLLBACK_COMPLETE}"));
            let deleted = self.delete_stack(name, Confirm::Auto, &Watch::once()).await?;
            if let Outcome::Rejected(_) = deleted {
                return Ok(deleted);
            }
            while self.exists(name).await?.is_some() {
                tokio::time::sleep(RECREATE_POLL_INTERVAL).await;
            }
        }
        if self.options.confirm == Confirm::Auto {
            self.console.print(&format!("{header}\n"));
        }

        if !deployment.parameters.is_empty() {
            let params: Vec<String> = deployment
                .parameters
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            self.console.print(&format!("params: {}", params.join(" ")));
        }

        let verb = action.verb();
        let template = self.template_source(deployment, verb).await?;
        let body = format!(
            "Action={verb}Stack&StackName={name}{}&Capabilities.member.1={CAPABILITY}&{template}",
            deployment.parameter_fields()
        );

        let resp = match self.client.send(AwsRequest::query(SERVICE, body)).await? {
            Ok(resp) => resp,
            Err(failure) => {
                self.print_status(failure.status, failure.reason());
                if update && failure.text().contains(NO_UPDATE_MARKER) {
                    self.console.print("status  204\tno update\n");
                    return Ok(Outcome::NoUpdate);
                }
                self.console
                    .print(&render(failure.content_type(), &failure.body, true));
                return Ok(Outcome::Rejected(failure));
            }
        };
        self.print_status(resp.status, resp.reason());

        if !watch.is_watching() {
            return Ok(Outcome::Completed(resp.status));
        }
        let watch = watch.clone().with_initial_delay(SUBMIT_DELAY);
        Ok(Outcome::Watched(self.describe_events(name, &watch).await?))
    }

    /// Form field referencing the template, uploading it first if needed.
    ///
    /// The upload is skipped while `<template>.stamp` is newer than the
    /// template.
    async fn template_source(&self, deployment: &Deployment, verb: &str) -> Result<String> {
        let ctx = self.client.context();
        let path = deployment.template_path.as_str();

        let Some(location) = &deployment.upload_location else {
            let text = ctx.file_read_as_string(path).await?;
            return Ok(format!("TemplateBody={}", escape(&text)));
        };

        self.console.print("---------- upload template ----------");
        let stamp = format!("{path}.stamp");
        let modified = ctx
            .file_modified(path)
            .await?
            .ok_or_else(|| Error::config_invalid(format!("template {path} not found")))?;
        let stale = ctx
            .file_modified(&stamp)
            .await?
            .map_or(true, |stamped| stamped < modified);

        let full = format!("{location}/{path}");
        let (bucket, key) = full.split_once('/').unwrap_or((full.as_str(), path));

        if stale {
            self.console.print(&format!("host: {location}"));
            let req = AwsRequest::new("s3")
                .with_host(bucket)
                .with_path(&format!("/{key}"))
                .with_method(Method::PUT)
                .with_body(ctx.file_read(path).await?);
            match self.client.send(req).await? {
                Ok(resp) => self.print_status(resp.status, resp.reason()),
                Err(failure) => {
                    self.print_status(failure.status, failure.reason());
                    return Err(Error::unexpected(format!(
                        "failed to upload template {path}: {failure}"
                    )));
                }
            }
            ctx.file_write(&stamp, b"").await?;
        } else {
            debug!("template {path} unchanged since last upload");
        }

        self.console
            .print(&format!("---------- {} stack ----------", verb.to_lowercase()));
        Ok(format!("TemplateURL=https://{bucket}.s3.amazonaws.com/{key}"))
    }

    /// Ask for the stack name to be typed back, printing `bye` on mismatch.
    fn confirm(&self, header: &str, name: &str) -> Result<bool> {
        let answer = self.console.prompt(&format!("{header}\nStackName? "))?;
        if answer.trim() != name {
            self.console.print("bye");
            return Ok(false);
        }
        Ok(true)
    }
}
