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

//! Query submission

use tracing::{debug, info};

use crate::config::AthenaConfig;
use crate::engine::{JobHandle, QueryEngine, QueryRequest};
use crate::error::{QueryError, QueryResult};

impl QueryRequest {
    /// Request running `sql` in the configured catalog and database
    pub fn for_config(sql: impl Into<String>, config: &AthenaConfig) -> Self {
        Self {
            sql: sql.into(),
            catalog: config.catalog.clone(),
            database: config.database.clone(),
            output_location: config.output_location.clone(),
        }
    }
}

/// Submit `request` and return the handle of the new execution.
pub async fn submit_query<E>(engine: &E, request: &QueryRequest) -> QueryResult<JobHandle>
where
    E: QueryEngine + ?Sized,
{
    debug!(catalog = %request.catalog, database = %request.database, "Submitting query:\n{}", request.sql);

    let job = engine
        .start_query(request)
        .await
        .map_err(QueryError::Submission)?;

    info!(query_id = %job, "Query submitted");
    Ok(job)
}
