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

//! Query S3 object-event logs through Amazon Athena.
//!
//! ## Query lifecycle
//!
//! ```text
//! FilterSet ─► build_where_clause ─► SQL
//!                                     │
//!                                     ▼
//!             submit_query ─► JobHandle ─► wait_for_completion ─► fetch_results ─► ResultSet
//! ```
//!
//! Every engine call goes through the [`QueryEngine`] trait. [`AthenaEngine`]
//! talks to AWS. With the `testing` feature, `testing::ScriptedEngine`
//! replays canned responses.
//!
//! ## Usage
//!
//! ```ignore
//! let config = Arc::new(AthenaConfig::from_env()?);
//! let engine = Arc::new(AthenaEngine::connect(&config).await);
//! let queries = S3TableQuery::new(engine, config);
//!
//! let rows = queries
//!     .query_record(&FilterSet { bucket: Some("logs".into()), ..Default::default() })
//!     .await?;
//! ```

pub mod athena;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod filter;
pub mod operations;
pub mod paginator;
pub mod record;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod waiter;

pub use athena::AthenaEngine;
pub use config::{AthenaConfig, PollPolicy, DEFAULT_CATALOG, DEFAULT_REGION};
pub use engine::{
    EngineError, JobHandle, JobState, JobStatus, QueryEngine, QueryRequest, ResultPage,
};
pub use error::{QueryError, QueryResult};
pub use executor::submit_query;
pub use filter::{build_where_clause, FilterSet};
pub use operations::{GroupByField, S3TableQuery, RECORD_COLUMNS, STATISTICS_AGGREGATES};
pub use paginator::fetch_results;
pub use record::{Record, ResultSet};
pub use waiter::wait_for_completion;
