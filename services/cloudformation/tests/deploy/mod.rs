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
use http::Method;
use pretty_assertions::assert_eq;
use stackwatch_cloudformation::{Confirm, Deployment, MemoryConsole, Outcome, Watch, WatchOutcome};
use std::time::{Duration, UNIX_EPOCH};
use tokio::time::Instant;

const NOT_FOUND: &str = "Stack with id demo does not exist";

fn template_fs() -> MemoryFs {
    MemoryFs::default().with_file("stack.yaml", "Resources: {}", 2000)
}

#[tokio::test]
async fn test_create_with_inline_template() -> anyhow::Result<()> {
    let http = MockHttpSend::default()
        .respond(400, error_xml(NOT_FOUND))
        .respond(200, "<CreateStackResponse/>");
    let console = MemoryConsole::default();
    let w = watcher(&http, &template_fs(), &console, Confirm::Auto);

    let deployment = Deployment::new("demo", "stack.yaml").with_parameter("Env", "prod env");
    let outcome = w.deploy(&deployment, &Watch::once()).await?;

    assert!(matches!(outcome, Outcome::Completed(s) if s == 200));
    assert_eq!(http.actions(), vec!["DescribeStacks", "CreateStack"]);
    assert_eq!(
        http.body(1),
        "Action=CreateStack&StackName=demo\
         &Parameters.member.1.ParameterKey=Env&Parameters.member.1.ParameterValue=prod%20env\
         &Capabilities.member.1=CAPABILITY_NAMED_IAM&TemplateBody=Resources%3A%20%7B%7D"
    );
    assert_eq!(
        console.output(),
        "StackName: demo (stack.yaml)\n\nparams: Env=prod env\nSTATUS  200 OK\n"
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_rollback_complete_is_recreated() -> anyhow::Result<()> {
    let http = MockHttpSend::default()
        .respond(200, stacks_xml("ROLLBACK_COMPLETE"))
        .respond(200, "<DeleteStackResponse/>")
        .respond(200, stacks_xml("DELETE_IN_PROGRESS"))
        .respond(400, error_xml(NOT_FOUND))
        .respond(200, "<CreateStackResponse/>");
    let console = MemoryConsole::default();
    let w = watcher(&http, &template_fs(), &console, Confirm::Auto);

    let start = Instant::now();
    let outcome = w
        .deploy(&Deployment::new("demo", "stack.yaml"), &Watch::once())
        .await?;

    assert!(outcome.is_success());
    assert_eq!(start.elapsed().as_secs(), 10);
    assert_eq!(
        http.actions(),
        vec![
            "DescribeStacks",
            "DeleteStack",
            "DescribeStacks",
            "DescribeStacks",
            "CreateStack"
        ]
    );
    assert!(console.output().starts_with("reset ROLLBACK_COMPLETE\nStackName: demo\n"));
    assert!(console.output().contains("StackName: demo (stack.yaml)\n"));
    Ok(())
}

#[tokio::test]
async fn test_rolled_back_stack_kept_without_confirmation() -> anyhow::Result<()> {
    let http = MockHttpSend::default().respond(200, stacks_xml("ROLLBACK_COMPLETE"));
    let console = MemoryConsole::default().with_answer("prod");
    let w = watcher(&http, &template_fs(), &console, Confirm::Interactive);

    let outcome = w
        .deploy(&Deployment::new("demo", "stack.yaml"), &Watch::once())
        .await?;

    assert!(matches!(outcome, Outcome::Aborted));
    assert_eq!(http.actions(), vec!["DescribeStacks"]);
    assert_eq!(console.output(), "StackName: demo (stack.yaml)\nStackName? bye\n");
    Ok(())
}

#[tokio::test]
async fn test_busy_stack_is_left_alone() -> anyhow::Result<()> {
    let http = MockHttpSend::default().respond(200, stacks_xml("UPDATE_IN_PROGRESS"));
    let console = MemoryConsole::default();
    let w = watcher(&http, &template_fs(), &console, Confirm::Auto);

    let outcome = w
        .deploy(&Deployment::new("demo", "stack.yaml"), &Watch::once())
        .await?;

    assert!(matches!(outcome, Outcome::InProgress(ref s) if s == "UPDATE_IN_PROGRESS"));
    assert_eq!(http.requests().len(), 1);
    assert_eq!(console.output(), "demo UPDATE_IN_PROGRESS ...\n");
    Ok(())
}

#[tokio::test]
async fn test_update_without_changes() -> anyhow::Result<()> {
    let http = MockHttpSend::default()
        .respond(200, stacks_xml("CREATE_COMPLETE"))
        .respond(400, error_xml("No updates are to be performed."));
    let console = MemoryConsole::default().with_answer("demo");
    let w = watcher(&http, &template_fs(), &console, Confirm::Interactive);

    let outcome = w
        .deploy(&Deployment::new("demo", "stack.yaml"), &Watch::once())
        .await?;

    assert!(matches!(outcome, Outcome::NoUpdate));
    assert_eq!(outcome.status(), Some(204));
    assert_eq!(http.actions(), vec!["DescribeStacks", "UpdateStack"]);
    assert_eq!(
        console.output(),
        "StackName: demo (stack.yaml UP)\nStackName? \
         STATUS  400 Bad Request\nstatus  204\tno update\n\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_mismatched_confirmation_sends_nothing() -> anyhow::Result<()> {
    let http = MockHttpSend::default().respond(200, stacks_xml("UPDATE_COMPLETE"));
    let console = MemoryConsole::default().with_answer("prod");
    let w = watcher(&http, &template_fs(), &console, Confirm::Interactive);

    let outcome = w
        .deploy(&Deployment::new("demo", "stack.yaml"), &Watch::once())
        .await?;

    assert!(matches!(outcome, Outcome::Aborted));
    assert_eq!(http.actions(), vec!["DescribeStacks"]);
    assert!(console.output().ends_with("StackName? bye\n"));
    Ok(())
}

#[tokio::test]
async fn test_rejected_create_prints_error() -> anyhow::Result<()> {
    let http = MockHttpSend::default()
        .respond(400, error_xml(NOT_FOUND))
        .respond(400, error_xml("Template format error"));
    let console = MemoryConsole::default();
    let w = watcher(&http, &template_fs(), &console, Confirm::Auto);

    let outcome = w
        .deploy(&Deployment::new("demo", "stack.yaml"), &Watch::once())
        .await?;

    assert!(matches!(outcome, Outcome::Rejected(ref f) if f.status == 400));
    assert!(!outcome.is_success());
    assert!(console.output().contains("Template format error"));
    Ok(())
}

#[tokio::test]
async fn test_template_upload_skipped_while_stamp_is_newer() -> anyhow::Result<()> {
    let fs = template_fs().with_file("stack.yaml.stamp", "", 3000);
    let http = MockHttpSend::default()
        .respond(400, error_xml(NOT_FOUND))
        .respond(200, "<CreateStackResponse/>");
    let console = MemoryConsole::default();
    let w = watcher(&http, &fs, &console, Confirm::Auto);

    let deployment = Deployment::new("demo", "stack.yaml").with_upload_location("bucket/prefix");
    w.deploy(&deployment, &Watch::once()).await?;

    assert_eq!(http.actions(), vec!["DescribeStacks", "CreateStack"]);
    assert!(http
        .body(1)
        .ends_with("&TemplateURL=https://bucket.s3.amazonaws.com/prefix/stack.yaml"));
    assert_eq!(
        fs.modified("stack.yaml.stamp"),
        Some(UNIX_EPOCH + Duration::from_secs(3000))
    );
    assert!(!console.output().contains("host:"));
    Ok(())
}

#[tokio::test]
async fn test_template_uploaded_when_stamp_is_older() -> anyhow::Result<()> {
    let fs = template_fs().with_file("stack.yaml.stamp", "", 1000);
    let http = MockHttpSend::default()
        .respond(400, error_xml(NOT_FOUND))
        .respond(200, "")
        .respond(200, "<CreateStackResponse/>");
    let console = MemoryConsole::default();
    let w = watcher(&http, &fs, &console, Confirm::Auto);

    let deployment = Deployment::new("demo", "stack.yaml").with_upload_location("bucket/prefix");
    w.deploy(&deployment, &Watch::once()).await?;

    assert_eq!(
        http.actions(),
        vec!["DescribeStacks", "PUT /prefix/stack.yaml", "CreateStack"]
    );
    let put = &http.requests()[1];
    assert_eq!(put.method(), Method::PUT);
    assert_eq!(put.uri().host(), Some("bucket.s3.amazonaws.com"));
    assert_eq!(put.body(), "Resources: {}");
    assert!(put.headers().contains_key("x-amz-content-sha256"));
    assert!(fs.modified("stack.yaml.stamp") > Some(UNIX_EPOCH + Duration::from_secs(2000)));

    assert_eq!(
        console.output(),
        "StackName: demo (stack.yaml)\n\n\
         ---------- upload template ----------\n\
         host: bucket/prefix\n\
         STATUS  200 OK\n\
         ---------- create stack ----------\n\
         STATUS  200 OK\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_upload_keeps_stamp() -> anyhow::Result<()> {
    let fs = template_fs();
    let http = MockHttpSend::default()
        .respond(400, error_xml(NOT_FOUND))
        .respond(403, "<Error><Code>AccessDenied</Code></Error>");
    let console = MemoryConsole::default();
    let w = watcher(&http, &fs, &console, Confirm::Auto);

    let deployment = Deployment::new("demo", "stack.yaml").with_upload_location("bucket");
    let err = w.deploy(&deployment, &Watch::once()).await.unwrap_err();

    assert!(err.to_string().contains("failed to upload template stack.yaml"));
    assert_eq!(http.actions(), vec!["DescribeStacks", "PUT /stack.yaml"]);
    assert_eq!(fs.content("stack.yaml.stamp"), None);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_deleted_stack_counts_as_done() -> anyhow::Result<()> {
    let http = MockHttpSend::default()
        .respond(200, "<DeleteStackResponse/>")
        .respond(400, error_xml(NOT_FOUND));
    let console = MemoryConsole::default().with_answer("demo");
    let w = watcher(&http, &MemoryFs::default(), &console, Confirm::Interactive);

    let start = Instant::now();
    let outcome = w
        .delete("demo", &Watch::every(Duration::from_secs(10)))
        .await?;

    assert_eq!(start.elapsed().as_secs(), 5);
    match outcome {
        Outcome::Watched(WatchOutcome::Succeeded { stack_status }) => {
            assert_eq!(stack_status, "DELETE_COMPLETE")
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(http.actions(), vec!["DeleteStack", "DescribeStackEvents"]);
    assert!(console
        .output()
        .starts_with("StackName: demo\nStackName? STATUS  200 OK\n"));
    Ok(())
}

#[tokio::test]
async fn test_delete_confirmation_mismatch() -> anyhow::Result<()> {
    let http = MockHttpSend::default();
    let console = MemoryConsole::default().with_answer("prod");
    let w = watcher(&http, &MemoryFs::default(), &console, Confirm::Interactive);

    let outcome = w.delete("demo", &Watch::once()).await?;

    assert!(matches!(outcome, Outcome::Aborted));
    assert!(http.requests().is_empty());
    assert_eq!(console.output(), "StackName: demo\nStackName? bye\n");
    Ok(())
}

#[tokio::test]
async fn test_exists() -> anyhow::Result<()> {
    let http = MockHttpSend::default()
        .respond(200, stacks_xml("CREATE_COMPLETE"))
        .respond(400, error_xml(NOT_FOUND));
    let w = watcher(&http, &MemoryFs::default(), &MemoryConsole::default(), Confirm::Auto);

    assert_eq!(w.exists("demo").await?.as_deref(), Some("CREATE_COMPLETE"));
    assert_eq!(w.exists("demo").await?, None);
    // No scripted response left: transport errors are not swallowed.
    assert!(w.exists("demo").await.is_err());
    Ok(())
}
