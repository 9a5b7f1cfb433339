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

//! Result pagination
//!
//! Athena echoes the column names as the first row of the first page. That
//! row is dropped; later pages carry data only.

use tracing::debug;

use crate::engine::{JobHandle, QueryEngine};
use crate::error::{QueryError, QueryResult};
use crate::record::{Record, ResultSet};

/// Read every page of a succeeded query into records.
///
/// Any engine failure aborts the read and discards the rows collected so far.
pub async fn fetch_results<E>(engine: &E, job: &JobHandle) -> QueryResult<ResultSet>
where
    E: QueryEngine + ?Sized,
{
    let mut records = ResultSet::new();
    let mut columns: Vec<String> = Vec::new();
    let mut next_token: Option<String> = None;
    let mut page_index = 0usize;

    loop {
        let page = engine
            .result_page(job, next_token.take())
            .await
            .map_err(QueryError::Fetch)?;

        let skip = if page_index == 0 {
            if page.columns.is_empty() && !page.rows.is_empty() {
                return Err(QueryError::Fetch(
                    format!("query {} returned rows without column metadata", job).into(),
                ));
            }
            columns = page.columns;
            1
        } else {
            0
        };

        let before = records.len();
        records.extend(
            page.rows
                .into_iter()
                .skip(skip)
                .map(|row| Record::from_row(&columns, row)),
        );
        debug!(query_id = %job, page = page_index, rows = records.len() - before, "Fetched result page");

        page_index += 1;
        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    debug!(query_id = %job, pages = page_index, records = records.len(), "Results materialized");
    Ok(records)
}
