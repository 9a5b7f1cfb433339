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

//! Error types for the query lifecycle

use std::time::Duration;

use thiserror::Error;

use crate::engine::{EngineError, JobState};

/// Errors raised while configuring, submitting, awaiting or reading a query
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Missing required environment variables: {}", .missing.join(", "))]
    Configuration { missing: Vec<String> },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Query submission rejected: {0}")]
    Submission(#[source] EngineError),

    #[error("Status check failed for query {query_id}: {source}")]
    Status {
        query_id: String,
        #[source]
        source: EngineError,
    },

    #[error("Query {query_id} failed with state {state}{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    QueryExecution {
        query_id: String,
        state: JobState,
        reason: Option<String>,
    },

    #[error("Query {query_id} still running after {waited:?}")]
    WaitTimeout { query_id: String, waited: Duration },

    #[error("Error fetching query results: {0}")]
    Fetch(#[source] EngineError),
}

impl QueryError {
    /// Stable variant name, used when reporting errors over the wire
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Configuration { .. } => "ConfigurationError",
            QueryError::InvalidArgument(_) => "InvalidArgument",
            QueryError::Submission(_) => "SubmissionError",
            QueryError::Status { .. } => "StatusError",
            QueryError::QueryExecution { .. } => "QueryExecutionError",
            QueryError::WaitTimeout { .. } => "WaitTimeout",
            QueryError::Fetch(_) => "FetchError",
        }
    }
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message_lists_names() {
        let err = QueryError::Configuration {
            missing: vec!["ATHENA_DATABASE".into(), "ATHENA_TABLE".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: ATHENA_DATABASE, ATHENA_TABLE"
        );
    }

    #[test]
    fn test_execution_message_includes_reason() {
        let err = QueryError::QueryExecution {
            query_id: "q-1".into(),
            state: JobState::Failed,
            reason: Some("Test failure".into()),
        };
        assert_eq!(err.to_string(), "Query q-1 failed with state FAILED: Test failure");
        assert_eq!(err.kind(), "QueryExecutionError");

        let err = QueryError::QueryExecution {
            query_id: "q-2".into(),
            state: JobState::Cancelled,
            reason: None,
        };
        assert_eq!(err.to_string(), "Query q-2 failed with state CANCELLED");
    }
}
