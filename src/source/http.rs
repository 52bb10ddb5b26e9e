// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::{ChildSource, FetchError, FetchFuture};
use crate::model::ChildRecord;

/// Which JSON fields of a fetched item hold the child's name and its own source reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub name_field: String,
    pub source_ref_field: Option<String>,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self { name_field: "name".to_owned(), source_ref_field: None }
    }
}

/// `User-Agent` sent with every fetch.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches child records with a GET against the node's `source_ref` URL.
///
/// The body must be a JSON array of objects.
#[derive(Debug, Clone)]
pub struct HttpChildSource {
    client: reqwest::Client,
    fields: RecordFields,
    timeout: Option<Duration>,
}

impl HttpChildSource {
    pub fn new(fields: RecordFields) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(client, fields)
    }

    pub fn with_client(client: reqwest::Client, fields: RecordFields) -> Self {
        Self { client, fields, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn fields(&self) -> &RecordFields {
        &self.fields
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        request
    }

    async fn fetch(&self, url: &str) -> Result<Vec<ChildRecord>, FetchError> {
        let resp = self.request(url).send().await.map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.json::<Value>().await.map_err(|e| FetchError::Payload(e.to_string()))?;
        let records = parse_child_records(&body, &self.fields)?;
        debug!(url, count = records.len(), "fetched child records");
        Ok(records)
    }
}

impl ChildSource for HttpChildSource {
    fn fetch_children<'a>(&'a self, source_ref: &'a str) -> FetchFuture<'a> {
        Box::pin(self.fetch(source_ref))
    }
}

/// Maps a JSON array of objects to child records.
///
/// Every item must carry a string `name_field`; one bad item rejects the whole
/// batch so nothing is partially merged. A missing or non-string
/// `source_ref_field` just leaves the child without a reference.
pub fn parse_child_records(
    body: &Value,
    fields: &RecordFields,
) -> Result<Vec<ChildRecord>, FetchError> {
    let items = body
        .as_array()
        .ok_or_else(|| FetchError::Payload("expected a JSON array".to_owned()))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let name = item.get(&fields.name_field).and_then(Value::as_str).ok_or_else(|| {
                FetchError::Payload(format!("item {idx} has no string `{}`", fields.name_field))
            })?;
            let record = ChildRecord::new(name);
            let source_ref = fields
                .source_ref_field
                .as_deref()
                .and_then(|field| item.get(field))
                .and_then(Value::as_str);
            Ok(match source_ref {
                Some(source_ref) => record.with_source_ref(source_ref),
                None => record,
            })
        })
        .collect()
}
