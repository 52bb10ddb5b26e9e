// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canopy-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canopy and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ChildSource, FetchError, FetchFuture};
use crate::model::ChildRecord;

/// In-memory source answering from a fixed table; unknown refs fail with `Status(404)`.
#[derive(Debug, Default)]
pub struct StaticChildSource {
    responses: HashMap<String, Result<Vec<ChildRecord>, FetchError>>,
    calls: AtomicUsize,
}

impl StaticChildSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children<I, R>(mut self, source_ref: impl Into<String>, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ChildRecord>,
    {
        let records = records.into_iter().map(Into::into).collect();
        self.responses.insert(source_ref.into(), Ok(records));
        self
    }

    pub fn with_error(mut self, source_ref: impl Into<String>, err: FetchError) -> Self {
        self.responses.insert(source_ref.into(), Err(err));
        self
    }

    /// Number of fetches served so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ChildSource for StaticChildSource {
    fn fetch_children<'a>(&'a self, source_ref: &'a str) -> FetchFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response =
            self.responses.get(source_ref).cloned().unwrap_or(Err(FetchError::Status(404)));
        Box::pin(async move { response })
    }
}
