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
use pretty_assertions::assert_eq;
use stackwatch_cloudformation::{
    Confirm, MemoryConsole, OnError, Options, Watch, WatchOutcome,
};
use stackwatch_core::ErrorKind;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test]
async fn test_single_poll_prints_report() -> anyhow::Result<()> {
    let http = MockHttpSend::default().respond(
        200,
        events_xml(&[
            ("Queue", "CREATE_COMPLETE", "03:04:09"),
            ("demo", "CREATE_IN_PROGRESS", "03:04:05"),
        ]),
    );
    let console = MemoryConsole::default();
    let w = watcher(&http, &MemoryFs::default(), &console, Confirm::Auto);

    let outcome = w.describe_events("demo", &Watch::once()).await?;

    assert!(outcome.is_success());
    assert_eq!(outcome.stack_status(), Some("CREATE_IN_PROGRESS"));
    assert_eq!(
        console.output(),
        format!(
            "StackName: demo\n\n{}\n    03:04:09  CREATE_COMPLETE\tQueue\n  ----  2024-01-02T03:04:05.000Z  CREATE_IN_PROGRESS\n",
            status_line()
        )
    );
    assert_eq!(
        http.body(0),
        "Action=DescribeStackEvents&StackName=demo"
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_watch_until_complete() -> anyhow::Result<()> {
    let in_progress = events_xml(&[
        ("Queue", "CREATE_IN_PROGRESS", "03:04:07"),
        ("demo", "CREATE_IN_PROGRESS", "03:04:05"),
    ]);
    let complete = events_xml(&[
        ("demo", "CREATE_COMPLETE", "03:04:12"),
        ("Queue", "CREATE_COMPLETE", "03:04:11"),
        ("Queue", "CREATE_IN_PROGRESS", "03:04:07"),
        ("demo", "CREATE_IN_PROGRESS", "03:04:05"),
    ]);
    let http = MockHttpSend::default()
        .respond(200, in_progress.clone())
        .respond(200, in_progress)
        .respond(200, complete.clone());
    let fs = MemoryFs::default();
    let console = MemoryConsole::default();
    let w = watcher(&http, &fs, &console, Confirm::Auto);

    let start = Instant::now();
    let watch = Watch::every(Duration::from_secs(10)).with_event_log("stack.dat", true);
    let outcome = w.describe_events("demo", &watch).await?;

    // Changed once (x1), then unchanged once (x2).
    assert_eq!(start.elapsed().as_secs(), 30);
    assert!(outcome.is_success());
    assert_eq!(outcome.stack_status(), Some("CREATE_COMPLETE"));
    assert_eq!(http.requests().len(), 3);

    let expected = [
        "StackName: demo\n".to_string(),
        status_line(),
        "    03:04:07  CREATE_IN_PROGRESS\tQueue".to_string(),
        "  ----  2024-01-02T03:04:05.000Z  CREATE_IN_PROGRESS".to_string(),
        String::new(),
        rule('#'),
        rule('#'),
        status_line(),
        "  ----  2024-01-02T03:04:12.000Z  CREATE_COMPLETE".to_string(),
        "    03:04:11  CREATE_COMPLETE\tQueue".to_string(),
        "  ----  2024-01-02T03:04:05.000Z  CREATE_IN_PROGRESS".to_string(),
        String::new(),
        "StackName: demo (done)".to_string(),
        rule('='),
    ];
    assert_eq!(console.output(), expected.join("\n") + "\n");
    assert_eq!(fs.content("stack.dat"), Some(complete));
    Ok(())
}

#[tokio::test]
async fn test_failed_stack_reports_body_and_removes_event_log() -> anyhow::Result<()> {
    let body = events_xml(&[
        ("demo", "ROLLBACK_COMPLETE", "03:05:00"),
        ("Bucket", "CREATE_FAILED", "03:04:09"),
        ("demo", "CREATE_IN_PROGRESS", "03:04:05"),
    ]);
    let http = MockHttpSend::default().respond(200, body.clone());
    let fs = MemoryFs::default().with_file("stack.dat", "stale", 1000);
    let console = MemoryConsole::default();
    let w = watcher(&http, &fs, &console, Confirm::Auto);

    let watch = Watch::once().with_event_log("stack.dat", true);
    let outcome = w.describe_events("demo", &watch).await?;

    match outcome {
        WatchOutcome::Failed { stack_status, .. } => {
            assert_eq!(stack_status.as_deref(), Some("ROLLBACK_COMPLETE"))
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(console.output().contains("CREATE_FAILED  03:04:09\tBucket"));
    assert_eq!(console.errors(), body);
    assert_eq!(fs.content("stack.dat"), None);
    Ok(())
}

#[tokio::test]
async fn test_client_error_stops_watch() -> anyhow::Result<()> {
    let body = error_xml("Stack [demo] does not exist");
    let http = MockHttpSend::default().respond(400, body.clone());
    let console = MemoryConsole::default();
    let w = watcher(&http, &MemoryFs::default(), &console, Confirm::Auto);

    let outcome = w
        .describe_events("demo", &Watch::every(Duration::from_secs(10)))
        .await?;

    assert!(matches!(outcome, WatchOutcome::Rejected(ref f) if f.status == 400));
    assert_eq!(http.requests().len(), 1);
    assert_eq!(
        console.output(),
        format!("StackName: demo\n\n\nstatus  400 Bad Request\n{body}\n")
    );
    assert_eq!(console.errors(), "");
    Ok(())
}

#[tokio::test]
async fn test_server_error_fails_watch() -> anyhow::Result<()> {
    let http = MockHttpSend::default().respond(503, "slow down");
    let fs = MemoryFs::default();
    let console = MemoryConsole::default();
    let w = watcher(&http, &fs, &console, Confirm::Auto);

    let watch = Watch::every(Duration::from_secs(10)).with_initial_delay(Duration::ZERO);
    let outcome = w.describe_events("demo", &watch).await?;

    assert!(!outcome.is_success());
    assert_eq!(outcome.stack_status(), None);
    assert!(console.output().contains("StackName: demo (done)"));
    assert_eq!(console.errors(), "slow down");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_initial_delay_prints_rule() -> anyhow::Result<()> {
    let http = MockHttpSend::default().respond(
        200,
        events_xml(&[("demo", "DELETE_COMPLETE", "03:04:05")]),
    );
    let console = MemoryConsole::default();
    let w = watcher(&http, &MemoryFs::default(), &console, Confirm::Auto);

    let start = Instant::now();
    let watch = Watch::once().with_initial_delay(Duration::from_secs(5));
    w.describe_events("demo", &watch).await?;

    assert_eq!(start.elapsed().as_secs(), 5);
    assert!(console.output().starts_with(&format!("{}\nstatus  200 OK", rule('_'))));
    Ok(())
}

#[tokio::test]
async fn test_status_reasons() -> anyhow::Result<()> {
    let body = "<DescribeStackEventsResponse><DescribeStackEventsResult><StackEvents>\
        <member><LogicalResourceId>Bucket</LogicalResourceId>\
        <Timestamp>2024-01-02T03:04:09.000Z</Timestamp>\
        <ResourceStatus>CREATE_FAILED</ResourceStatus>\
        <ResourceStatusReason>demo-bucket already exists</ResourceStatusReason></member>\
        <member><LogicalResourceId>demo</LogicalResourceId>\
        <Timestamp>2024-01-02T03:04:05.000Z</Timestamp>\
        <ResourceStatus>CREATE_IN_PROGRESS</ResourceStatus></member>\
        </StackEvents></DescribeStackEventsResult></DescribeStackEventsResponse>";
    let http = MockHttpSend::default().respond(200, body);
    let console = MemoryConsole::default();
    let w = watcher(&http, &MemoryFs::default(), &console, Confirm::Auto);

    let status = w.status_reasons("demo", "FAILED").await?;

    assert_eq!(status, 200);
    assert_eq!(
        console.output(),
        "StackName: demo\n\n\
         CREATE_FAILED  03:04:09\tBucket\ndemo-bucket already exists\n\n\
         \x20 ----  2024-01-02T03:04:05.000Z  CREATE_IN_PROGRESS\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_status_reasons_error_policy() -> anyhow::Result<()> {
    let http = MockHttpSend::default()
        .respond(400, error_xml("Stack [demo] does not exist"))
        .respond(400, error_xml("Stack [demo] does not exist"));
    let console = MemoryConsole::default();
    let w = watcher(&http, &MemoryFs::default(), &console, Confirm::Auto);

    let err = w.status_reasons("demo", "FAILED").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.to_string().contains("does not exist"));

    let w = w.with_options(Options::default().with_on_error(OnError::ContinueSilently));
    assert_eq!(w.status_reasons("demo", "FAILED").await?, 400);
    Ok(())
}
