// SPDX-License-Identifier: AGPL-3.0-or-later
// S3Table Query - MCP server for S3 access-log analytics on Athena
// Copyright (C) 2026 Sushanth Reddy Vanagala (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! In-memory [`QueryEngine`] that replays scripted responses
//!
//! Used by the unit and integration tests of this workspace to drive the
//! query lifecycle without AWS.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::engine::{
    EngineError, JobHandle, JobState, JobStatus, QueryEngine, QueryRequest, ResultPage,
};

pub const SCRIPTED_QUERY_ID: &str = "test-query-id";

/// Scripted engine.
///
/// Statuses are served in order and the last one repeats forever. Pages are
/// served by index; continuation tokens (`page-N`) are generated so scripts
/// don't have to wire them.
pub struct ScriptedEngine {
    statuses: Mutex<VecDeque<JobStatus>>,
    pages: Vec<ResultPage>,
    submit_error: Option<String>,
    status_error: Option<String>,
    page_error: Option<(usize, String)>,
    requests: Mutex<Vec<QueryRequest>>,
    page_tokens: Mutex<Vec<Option<String>>>,
    status_calls: Mutex<usize>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    /// Engine whose queries succeed immediately with one empty page
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(VecDeque::from(vec![JobStatus::new(JobState::Succeeded)])),
            pages: Vec::new(),
            submit_error: None,
            status_error: None,
            page_error: None,
            requests: Mutex::new(Vec::new()),
            page_tokens: Mutex::new(Vec::new()),
            status_calls: Mutex::new(0),
        }
    }

    pub fn with_statuses(mut self, statuses: Vec<JobStatus>) -> Self {
        self.statuses = Mutex::new(statuses.into());
        self
    }

    pub fn with_pages(mut self, pages: Vec<ResultPage>) -> Self {
        self.pages = pages;
        self
    }

    /// Reject every submission with `message`
    pub fn failing_submit(mut self, message: impl Into<String>) -> Self {
        self.submit_error = Some(message.into());
        self
    }

    /// Fail every status check with `message`
    pub fn failing_status(mut self, message: impl Into<String>) -> Self {
        self.status_error = Some(message.into());
        self
    }

    /// Fail when page `index` is requested
    pub fn failing_page(mut self, index: usize, message: impl Into<String>) -> Self {
        self.page_error = Some((index, message.into()));
        self
    }

    /// Requests received by `start_query`, oldest first
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().clone()
    }

    /// SQL of the most recent submission
    pub fn last_sql(&self) -> Option<String> {
        self.requests.lock().last().map(|r| r.sql.clone())
    }

    pub fn status_calls(&self) -> usize {
        *self.status_calls.lock()
    }

    /// Continuation tokens passed to `result_page`, in call order
    pub fn page_tokens(&self) -> Vec<Option<String>> {
        self.page_tokens.lock().clone()
    }

    fn page_count(&self) -> usize {
        let failing = self.page_error.as_ref().map_or(0, |(index, _)| index + 1);
        self.pages.len().max(failing).max(1)
    }

    fn page_index(token: Option<&str>) -> Result<usize, EngineError> {
        match token {
            None => Ok(0),
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| format!("invalid continuation token: {token}").into()),
        }
    }
}

#[async_trait]
impl QueryEngine for ScriptedEngine {
    async fn start_query(&self, request: &QueryRequest) -> Result<JobHandle, EngineError> {
        self.requests.lock().push(request.clone());
        match &self.submit_error {
            Some(message) => Err(message.clone().into()),
            None => Ok(JobHandle::new(SCRIPTED_QUERY_ID)),
        }
    }

    async fn query_status(&self, _job: &JobHandle) -> Result<JobStatus, EngineError> {
        *self.status_calls.lock() += 1;
        if let Some(message) = &self.status_error {
            return Err(message.clone().into());
        }

        let mut statuses = self.statuses.lock();
        let status = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        status.ok_or_else(|| "no scripted status".into())
    }

    async fn result_page(
        &self,
        _job: &JobHandle,
        next_token: Option<String>,
    ) -> Result<ResultPage, EngineError> {
        let index = Self::page_index(next_token.as_deref())?;
        self.page_tokens.lock().push(next_token);

        if let Some((failing, message)) = &self.page_error {
            if *failing == index {
                return Err(message.clone().into());
            }
        }

        let mut page = self.pages.get(index).cloned().unwrap_or_default();
        page.next_token = (index + 1 < self.page_count()).then(|| format!("page-{}", index + 1));
        Ok(page)
    }
}
