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

use crate::mock::{MemoryFileRead, MockHttpSend};
use http::header::AUTHORIZATION;
use http::StatusCode;
use pretty_assertions::assert_eq;
use stackwatch_aws_v4::{AwsRequest, Client, Config, StaticCredentialProvider};
use stackwatch_core::{Context, ErrorKind, StaticEnv};

fn client(http: MockHttpSend) -> Client {
    let ctx = Context::new().with_http_send(http);
    Client::new(
        ctx,
        Config::default().with_region("eu-west-1"),
        StaticCredentialProvider::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
    )
}

#[tokio::test]
async fn test_send_signs_and_returns_response() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let http = MockHttpSend::default().respond(200, "<DescribeStacksResponse/>");
    let client = client(http.clone());

    let resp = client
        .send(AwsRequest::query(
            "cloudformation",
            "Action=DescribeStacks&StackName=demo",
        ))
        .await?
        .expect("status must be success");
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.reason(), "OK");
    assert_eq!(resp.content_type(), "text/xml");
    assert_eq!(resp.text(), "<DescribeStacksResponse/>");

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(
        req.uri().to_string(),
        "https://cloudformation.eu-west-1.amazonaws.com/"
    );
    assert_eq!(req.body(), "Action=DescribeStacks&StackName=demo");
    let auth = req.headers()[AUTHORIZATION].to_str()?;
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(auth.contains("/eu-west-1/cloudformation/aws4_request, SignedHeaders=content-type;host;x-amz-date, Signature="));

    Ok(())
}

#[tokio::test]
async fn test_global_service_signs_for_us_east_1() -> anyhow::Result<()> {
    let http = MockHttpSend::default().respond(200, "<ListUsersResponse/>");
    let client = client(http.clone());

    client
        .send(AwsRequest::query("iam", "Action=ListUsers"))
        .await?
        .expect("status must be success");

    let req = &http.requests()[0];
    assert_eq!(req.uri().host(), Some("iam.us-east-1.amazonaws.com"));
    assert!(req.headers()[AUTHORIZATION]
        .to_str()?
        .contains("/us-east-1/iam/aws4_request"));

    Ok(())
}

#[tokio::test]
async fn test_error_status_is_http_failure() -> anyhow::Result<()> {
    let http = MockHttpSend::default()
        .respond(400, "<ErrorResponse><Error><Message>Stack with id demo does not exist</Message></Error></ErrorResponse>")
        .respond(503, "busy");
    let client = client(http);

    let failure = client
        .send(AwsRequest::query("cloudformation", "Action=DescribeStacks&StackName=demo"))
        .await?
        .expect_err("status must be failure");
    assert!(failure.is_client_error());
    assert!(failure.text().contains("does not exist"));
    assert!(failure.to_string().starts_with("status 400 Bad Request: "));

    let failure = client
        .send(AwsRequest::query("cloudformation", "Action=DescribeStacks&StackName=demo"))
        .await?
        .expect_err("status must be failure");
    assert!(!failure.is_client_error());
    assert_eq!(failure.status, StatusCode::SERVICE_UNAVAILABLE);

    Ok(())
}

#[tokio::test]
async fn test_transport_failure_is_error() {
    let client = client(MockHttpSend::default());

    let err = client
        .send(AwsRequest::query("cloudformation", "Action=DescribeStacks"))
        .await
        .expect_err("no response scripted");
    assert_eq!(err.kind(), ErrorKind::Unexpected);
}

#[tokio::test]
async fn test_missing_credential_is_config_error() {
    let http = MockHttpSend::default().respond(200, "");
    let ctx = Context::new()
        .with_file_read(MemoryFileRead::default())
        .with_env(StaticEnv::default())
        .with_http_send(http.clone());
    let client = Client::from_config(ctx, Config::default());

    let err = client
        .send(AwsRequest::query("cloudformation", "Action=DescribeStacks"))
        .await
        .expect_err("no credential available");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_credential_file_is_used() -> anyhow::Result<()> {
    let http = MockHttpSend::default().respond(200, "").respond(200, "");
    let fs = MemoryFileRead::default().with_file(
        "accessKeys.csv",
        "Access key ID,Secret access key\nAKIAFROMFILE,secret\n",
    );
    let ctx = Context::new()
        .with_file_read(fs)
        .with_env(StaticEnv::default())
        .with_http_send(http.clone());
    let client = Client::from_config(ctx, Config::default());

    for _ in 0..2 {
        client
            .send(AwsRequest::query("cloudformation", "Action=DescribeStacks"))
            .await?
            .expect("status must be success");
    }

    for req in http.requests() {
        assert!(req.headers()[AUTHORIZATION]
            .to_str()?
            .contains("Credential=AKIAFROMFILE/"));
    }

    Ok(())
}
