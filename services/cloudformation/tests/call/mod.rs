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

use crate::mock::*;
use stackwatch_aws_v4::AwsRequest;
use stackwatch_cloudformation::{Confirm, MemoryConsole, OnError, Options, OutputDetail};
use stackwatch_core::ErrorKind;

#[tokio::test]
async fn test_show_prints_status_and_body() -> anyhow::Result<()> {
    let http = MockHttpSend::default().respond(200, stacks_xml("CREATE_COMPLETE"));
    let console = MemoryConsole::default();
    let w = watcher(&http, &MemoryFs::default(), &console, Confirm::Auto);

    let status = w
        .show(AwsRequest::query(
            "cloudformation",
            "Action=DescribeStacks&StackName=demo",
        ))
        .await?;

    assert_eq!(status, 200);
    let output = console.output();
    assert!(output.starts_with("STATUS  200 OK\n<DescribeStacksResponse"));
    assert!(output.contains("  <DescribeStacksResult>"));
    assert!(output.contains("<StackStatus>CREATE_COMPLETE</StackStatus>"));
    Ok(())
}

#[tokio::test]
async fn test_show_status_only() -> anyhow::Result<()> {
    let http = MockHttpSend::default().respond(200, stacks_xml("CREATE_COMPLETE"));
    let console = MemoryConsole::default();
    let w = watcher(&http, &MemoryFs::default(), &console, Confirm::Auto)
        .with_options(Options::default().with_output(OutputDetail::StatusOnly));

    w.show(AwsRequest::query("cloudformation", "Action=DescribeStacks"))
        .await?;

    assert_eq!(console.output(), "STATUS  200 OK\n");
    Ok(())
}

#[tokio::test]
async fn test_show_error_policy() -> anyhow::Result<()> {
    let http = MockHttpSend::default()
        .respond(403, error_xml("not authorized"))
        .respond(403, error_xml("not authorized"));
    let console = MemoryConsole::default();
    let w = watcher(&http, &MemoryFs::default(), &console, Confirm::Auto);

    let err = w
        .show(AwsRequest::query("iam", "Action=ListUsers"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(console.output().starts_with("STATUS  403 Forbidden\n"));

    let w = w.with_options(Options::default().with_on_error(OnError::ContinueSilently));
    let status = w
        .show(AwsRequest::query("iam", "Action=ListUsers"))
        .await?;
    assert_eq!(status, 403);
    assert_eq!(
        http.requests()[1].uri().host(),
        Some("iam.us-east-1.amazonaws.com")
    );
    Ok(())
}
