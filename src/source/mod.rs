// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Where child records come from.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::model::ChildRecord;

pub mod http;
pub mod memory;

pub use http::{parse_child_records, HttpChildSource, RecordFields, USER_AGENT};
pub use memory::StaticChildSource;

pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<ChildRecord>, FetchError>> + Send + 'a>>;

/// Async capability resolving a node's `source_ref` to its child records.
pub trait ChildSource: Send + Sync {
    fn fetch_children<'a>(&'a self, source_ref: &'a str) -> FetchFuture<'a>;
}

impl<S: ChildSource + ?Sized> ChildSource for std::sync::Arc<S> {
    fn fetch_children<'a>(&'a self, source_ref: &'a str) -> FetchFuture<'a> {
        (**self).fetch_children(source_ref)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response.
    Transport(String),
    /// Non-2xx response.
    Status(u16),
    /// The response body is not a list of child records.
    Payload(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "request failed: {msg}"),
            Self::Status(code) => write!(f, "unexpected HTTP status {code}"),
            Self::Payload(msg) => write!(f, "malformed child records: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}
