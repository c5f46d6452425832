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

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use stackwatch_core::{Error, Result};

/// Body format, decided from the declared content type only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// `application/json`, `application/x-amz-json-1.0`, ...
    Json,
    /// `text/xml`, `application/xml`, ...
    Xml,
    /// Anything else.
    Other,
}

impl ContentFormat {
    /// Classify a `Content-Type` header value.
    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        let subtype = essence.split_once('/').map(|(_, v)| v).unwrap_or_default();
        match subtype {
            "json" => ContentFormat::Json,
            v if v.starts_with("x-amz-json") || v.ends_with("+json") => ContentFormat::Json,
            "xml" => ContentFormat::Xml,
            v if v.ends_with("+xml") => ContentFormat::Xml,
            _ => ContentFormat::Other,
        }
    }
}

/// Render a response body for display.
///
/// With `pretty`, JSON is re-printed with sorted keys and XML re-indented,
/// both with two spaces. Other bodies, and any body when `pretty` is off,
/// are shown as text after a `Content-Type:` line. A body that does not
/// parse in its declared format falls back to the plain form.
pub fn render(content_type: &str, body: &[u8], pretty: bool) -> String {
    let formatted = match ContentFormat::from_content_type(content_type) {
        _ if !pretty => None,
        ContentFormat::Json => pretty_json(body).ok(),
        ContentFormat::Xml => pretty_xml(body).ok(),
        ContentFormat::Other => None,
    };

    formatted.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(body);
        if content_type.is_empty() {
            text.into_owned()
        } else {
            format!("Content-Type: {content_type}\n{text}")
        }
    })
}

fn pretty_json(body: &[u8]) -> Result<String> {
    // serde_json's default map is ordered by key.
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| Error::unexpected("invalid json body").with_source(e))?;
    serde_json::to_string_pretty(&value)
        .map_err(|e| Error::unexpected("failed to print json").with_source(e))
}

fn pretty_xml(body: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    loop {
        match reader
            .read_event()
            .map_err(|e| Error::unexpected("invalid xml body").with_source(e))?
        {
            Event::Eof => break,
            event => writer
                .write_event(event)
                .map_err(|e| Error::unexpected("failed to print xml").with_source(e))?,
        }
    }

    Ok(String::from_utf8(writer.into_inner())?)
}
