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

//! Completion waiter
//!
//! Polls a submitted query until the engine reports a terminal state. The
//! delay goes through `tokio::time`, so a paused runtime clock drives it in
//! tests.

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::PollPolicy;
use crate::engine::{JobHandle, JobState, QueryEngine};
use crate::error::{QueryError, QueryResult};

/// Block until `job` succeeds.
///
/// `FAILED` and `CANCELLED` become [`QueryError::QueryExecution`]. Without a
/// `max_wait` the loop only ends when the engine reaches a terminal state.
/// A zero interval is rejected before the first status call.
pub async fn wait_for_completion<E>(
    engine: &E,
    job: &JobHandle,
    policy: &PollPolicy,
) -> QueryResult<()>
where
    E: QueryEngine + ?Sized,
{
    if policy.interval.is_zero() {
        return Err(QueryError::InvalidArgument(
            "poll interval must be greater than zero".to_string(),
        ));
    }

    let started = Instant::now();
    let mut polls: u64 = 0;

    loop {
        let status = engine
            .query_status(job)
            .await
            .map_err(|source| QueryError::Status {
                query_id: job.id().to_string(),
                source,
            })?;
        polls += 1;
        debug!(query_id = %job, state = %status.state, polls, "Polled query status");

        match status.state {
            JobState::Succeeded => {
                info!(query_id = %job, elapsed = ?started.elapsed(), "Query succeeded");
                return Ok(());
            }
            JobState::Failed | JobState::Cancelled => {
                warn!(query_id = %job, state = %status.state, reason = ?status.reason, "Query did not succeed");
                return Err(QueryError::QueryExecution {
                    query_id: job.id().to_string(),
                    state: status.state,
                    reason: status.reason,
                });
            }
            JobState::Queued | JobState::Running => {}
        }

        if let Some(max_wait) = policy.max_wait {
            let waited = started.elapsed();
            if waited + policy.interval > max_wait {
                return Err(QueryError::WaitTimeout {
                    query_id: job.id().to_string(),
                    waited,
                });
            }
        }

        sleep(policy.interval).await;
    }
}
