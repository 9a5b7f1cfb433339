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

//! Query engine abstraction
//!
//! The lifecycle code talks to the engine only through [`QueryEngine`], so
//! the Athena client can be swapped for a scripted engine in tests.

use std::fmt;

use async_trait::async_trait;

/// Error returned by an engine call, carried unmodified into [`crate::QueryError`]
pub type EngineError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Identifier of a submitted query execution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution state as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed | JobState::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Queued => "QUEUED",
            JobState::Running => "RUNNING",
            JobState::Succeeded => "SUCCEEDED",
            JobState::Failed => "FAILED",
            JobState::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub state: JobState,
    /// Engine-supplied explanation of the last transition, if any
    pub reason: Option<String>,
}

impl JobStatus {
    pub fn new(state: JobState) -> Self {
        Self { state, reason: None }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Everything needed to start a query execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub sql: String,
    pub catalog: String,
    pub database: String,
    pub output_location: String,
}

/// One page of results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPage {
    /// Column names from the result metadata
    pub columns: Vec<String>,
    /// Positional values; `None` is a SQL NULL or an absent datum
    pub rows: Vec<Vec<Option<String>>>,
    /// Continuation token for the next page, `None` on the last page
    pub next_token: Option<String>,
}

/// Asynchronous SQL engine: submit, poll, read pages
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn start_query(&self, request: &QueryRequest) -> Result<JobHandle, EngineError>;

    async fn query_status(&self, job: &JobHandle) -> Result<JobStatus, EngineError>;

    async fn result_page(
        &self,
        job: &JobHandle,
        next_token: Option<String>,
    ) -> Result<ResultPage, EngineError>;
}
