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

//! MCP Tool Definitions and Executor
//!
//! - `query_record` - object records matching optional filters
//! - `query_statistics` - per-bucket / per-source-IP aggregates

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use s3table_query::{
    AthenaConfig, FilterSet, PollPolicy, QueryEngine, QueryError, ResultSet, S3TableQuery,
};

pub const QUERY_RECORD: &str = "query_record";
pub const QUERY_STATISTICS: &str = "query_statistics";

/// Why a tool call produced no result
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments did not match the tool's input schema
    #[error("Invalid arguments: {0}")]
    BadArguments(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    /// The result set could not be rendered
    #[error("Failed to render results: {0}")]
    Render(String),
}

#[derive(Debug, Deserialize)]
struct StatisticsArgs {
    group_by: Vec<String>,
    #[serde(flatten)]
    filters: FilterSet,
}

// ============================================================================
// Tool Schema Definitions
// ============================================================================

fn filter_properties() -> serde_json::Map<String, Value> {
    let mut props = serde_json::Map::new();
    props.insert(
        "start_time".into(),
        json!({ "type": "string", "description": "Start time for record_timestamp range (ISO format)" }),
    );
    props.insert(
        "end_time".into(),
        json!({ "type": "string", "description": "End time for record_timestamp range (ISO format)" }),
    );
    props.insert(
        "bucket".into(),
        json!({ "type": "string", "description": "S3 bucket name" }),
    );
    props.insert(
        "record_type".into(),
        json!({ "type": "string", "description": "Type of record (e.g. CREATE, DELETE)" }),
    );
    props.insert(
        "storage_class".into(),
        json!({ "type": "string", "description": "S3 storage class" }),
    );
    props.insert(
        "source_ip_address".into(),
        json!({ "type": "string", "description": "Source IP address" }),
    );
    props
}

/// Tool list as published by `tools/list`
pub fn get_built_in_tools() -> Vec<Value> {
    let mut statistics_props = serde_json::Map::new();
    statistics_props.insert(
        "group_by".into(),
        json!({
            "type": "array",
            "items": { "type": "string", "enum": ["bucket", "source_ip_address"] },
            "minItems": 1,
            "description": "Fields to group by (supported: bucket, source_ip_address)"
        }),
    );
    statistics_props.extend(filter_properties());

    vec![
        json!({
            "name": QUERY_RECORD,
            "description": "Query S3 object records based on specified conditions.",
            "inputSchema": {
                "type": "object",
                "properties": filter_properties()
            }
        }),
        json!({
            "name": QUERY_STATISTICS,
            "description": "Generate statistics (object count, total size, distinct record types and storage classes) grouped by the given fields.",
            "inputSchema": {
                "type": "object",
                "properties": statistics_props,
                "required": ["group_by"]
            }
        }),
    ]
}

// ============================================================================
// Tool Executor
// ============================================================================

pub struct ToolExecutor<E: ?Sized> {
    queries: S3TableQuery<E>,
}

impl<E: QueryEngine + ?Sized> ToolExecutor<E> {
    pub fn new(queries: S3TableQuery<E>) -> Self {
        Self { queries }
    }

    /// Run tool `name` and render its result set as pretty JSON
    pub async fn execute(&self, name: &str, args: Value) -> Result<String, ToolError> {
        info!("Executing tool: {} with args: {}", name, args);

        let records = match name {
            QUERY_RECORD => self.exec_query_record(args).await?,
            QUERY_STATISTICS => self.exec_query_statistics(args).await?,
            _ => return Err(ToolError::UnknownTool(name.to_string())),
        };

        info!(tool = name, records = records.len(), "Tool finished");
        serde_json::to_string_pretty(&records).map_err(|e| ToolError::Render(e.to_string()))
    }

    async fn exec_query_record(&self, args: Value) -> Result<ResultSet, ToolError> {
        let filters: FilterSet = parse_args(args)?;
        Ok(self.queries.query_record(&filters).await?)
    }

    async fn exec_query_statistics(&self, args: Value) -> Result<ResultSet, ToolError> {
        let StatisticsArgs { group_by, filters } = parse_args(args)?;
        Ok(self.queries.query_statistics(&group_by, &filters).await?)
    }
}

/// Missing or null `arguments` means "no arguments"
fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| ToolError::BadArguments(e.to_string()))
}

/// Executor over a shared engine, the way the server holds it
pub type SharedToolExecutor = ToolExecutor<dyn QueryEngine>;

impl SharedToolExecutor {
    pub fn shared(engine: Arc<dyn QueryEngine>, config: Arc<AthenaConfig>, poll: PollPolicy) -> Self {
        Self::new(S3TableQuery::new(engine, config).with_poll_policy(poll))
    }
}
