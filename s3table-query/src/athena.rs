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

//! Amazon Athena backend
//!
//! Credentials come from the SDK's default provider chain; only the region
//! is taken from [`AthenaConfig`].

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::types::{
    QueryExecutionContext, QueryExecutionState, ResultConfiguration, Row,
};
use aws_sdk_athena::Client;
use tracing::info;

use crate::config::AthenaConfig;
use crate::engine::{
    EngineError, JobHandle, JobState, JobStatus, QueryEngine, QueryRequest, ResultPage,
};

/// [`QueryEngine`] backed by the Athena API
#[derive(Clone, Debug)]
pub struct AthenaEngine {
    client: Client,
}

impl AthenaEngine {
    /// Build a client for the configured region.
    pub async fn connect(config: &AthenaConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        info!(region = %config.region, "Athena client ready");
        Self::from_client(Client::new(&sdk_config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn sdk_error<E>(err: E) -> EngineError
where
    E: std::error::Error,
{
    DisplayErrorContext(err).to_string().into()
}

fn job_state(state: &QueryExecutionState) -> Result<JobState, EngineError> {
    match state {
        QueryExecutionState::Queued => Ok(JobState::Queued),
        QueryExecutionState::Running => Ok(JobState::Running),
        QueryExecutionState::Succeeded => Ok(JobState::Succeeded),
        QueryExecutionState::Failed => Ok(JobState::Failed),
        QueryExecutionState::Cancelled => Ok(JobState::Cancelled),
        other => Err(format!("unknown query state: {}", other.as_str()).into()),
    }
}

fn row_values(row: &Row) -> Vec<Option<String>> {
    row.data()
        .iter()
        .map(|datum| datum.var_char_value().map(str::to_string))
        .collect()
}

#[async_trait]
impl QueryEngine for AthenaEngine {
    async fn start_query(&self, request: &QueryRequest) -> Result<JobHandle, EngineError> {
        let context = QueryExecutionContext::builder()
            .database(&request.database)
            .catalog(&request.catalog)
            .build();
        let output = ResultConfiguration::builder()
            .output_location(&request.output_location)
            .build();

        let response = self
            .client
            .start_query_execution()
            .query_string(&request.sql)
            .query_execution_context(context)
            .result_configuration(output)
            .send()
            .await
            .map_err(sdk_error)?;

        response
            .query_execution_id()
            .map(JobHandle::new)
            .ok_or_else(|| "StartQueryExecution returned no QueryExecutionId".into())
    }

    async fn query_status(&self, job: &JobHandle) -> Result<JobStatus, EngineError> {
        let response = self
            .client
            .get_query_execution()
            .query_execution_id(job.id())
            .send()
            .await
            .map_err(sdk_error)?;

        let status = response
            .query_execution()
            .and_then(|execution| execution.status())
            .ok_or("GetQueryExecution returned no status")?;
        let state = status
            .state()
            .ok_or("GetQueryExecution returned no state")?;

        Ok(JobStatus {
            state: job_state(state)?,
            reason: status.state_change_reason().map(str::to_string),
        })
    }

    async fn result_page(
        &self,
        job: &JobHandle,
        next_token: Option<String>,
    ) -> Result<ResultPage, EngineError> {
        let response = self
            .client
            .get_query_results()
            .query_execution_id(job.id())
            .set_next_token(next_token)
            .send()
            .await
            .map_err(sdk_error)?;

        let result_set = response
            .result_set()
            .ok_or("GetQueryResults returned no ResultSet")?;

        let columns = result_set
            .result_set_metadata()
            .ok_or("GetQueryResults returned no ResultSetMetadata")?
            .column_info()
            .iter()
            .map(|column| column.name().to_string())
            .collect();

        Ok(ResultPage {
            columns,
            rows: result_set.rows().iter().map(row_values).collect(),
            next_token: response.next_token().map(str::to_string),
        })
    }
}
