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

//! Process configuration
//!
//! Loaded once at startup from the environment and shared read-only
//! afterwards.

use std::time::Duration;

use crate::error::{QueryError, QueryResult};

/// Catalog used when `ATHENA_CATALOG` is unset
pub const DEFAULT_CATALOG: &str = "AwsDataCatalog";

/// Region used when `AWS_REGION` is unset
pub const DEFAULT_REGION: &str = "us-east-1";

pub const ENV_CATALOG: &str = "ATHENA_CATALOG";
pub const ENV_DATABASE: &str = "ATHENA_DATABASE";
pub const ENV_TABLE: &str = "ATHENA_TABLE";
pub const ENV_OUTPUT_LOCATION: &str = "ATHENA_OUTPUT_LOCATION";
pub const ENV_REGION: &str = "AWS_REGION";

/// Where queries run and where Athena writes their results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AthenaConfig {
    pub catalog: String,
    pub database: String,
    pub table: String,
    pub output_location: String,
    pub region: String,
}

impl AthenaConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> QueryResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset. All missing required variables are
    /// reported together, in declaration order.
    pub fn from_lookup<F>(lookup: F) -> QueryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let database = get(ENV_DATABASE);
        let table = get(ENV_TABLE);
        let output_location = get(ENV_OUTPUT_LOCATION);

        let missing: Vec<String> = [
            (ENV_DATABASE, database.is_none()),
            (ENV_TABLE, table.is_none()),
            (ENV_OUTPUT_LOCATION, output_location.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name.to_string())
        .collect();

        match (database, table, output_location) {
            (Some(database), Some(table), Some(output_location)) => Ok(Self {
                catalog: get(ENV_CATALOG).unwrap_or_else(|| DEFAULT_CATALOG.to_string()),
                database,
                table,
                output_location,
                region: get(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            }),
            _ => Err(QueryError::Configuration { missing }),
        }
    }

    /// `<database>.<table>` as used in FROM clauses
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }
}

/// How the completion waiter polls a running query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two status checks
    pub interval: Duration,
    /// Give up after this long. `None` waits until the engine reaches a
    /// terminal state.
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_wait: None,
        }
    }
}
