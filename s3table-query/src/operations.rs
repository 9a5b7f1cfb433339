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

//! Tool operations over the S3 access-log table
//!
//! ```text
//! FilterSet ──► WHERE clause ──► SELECT ──► submit ──► wait ──► paginate ──► ResultSet
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{AthenaConfig, PollPolicy};
use crate::engine::{QueryEngine, QueryRequest};
use crate::error::{QueryError, QueryResult};
use crate::executor::submit_query;
use crate::filter::FilterSet;
use crate::paginator::fetch_results;
use crate::record::ResultSet;
use crate::waiter::wait_for_completion;

/// Columns returned by `query_record`, in output order
pub const RECORD_COLUMNS: [&str; 19] = [
    "bucket",
    "key",
    "sequence_number",
    "record_type",
    "record_timestamp",
    "size",
    "last_modified_date",
    "e_tag",
    "storage_class",
    "is_multipart",
    "encryption_status",
    "is_bucket_key_enabled",
    "kms_key_arn",
    "checksum_algorithm",
    "object_tags",
    "user_metadata",
    "requester",
    "source_ip_address",
    "request_id",
];

/// Aggregates appended to the group columns by `query_statistics`
pub const STATISTICS_AGGREGATES: [&str; 4] = [
    "COUNT(*) AS total_objects",
    "SUM(size) AS total_size",
    "COUNT(DISTINCT record_type) AS unique_record_types",
    "COUNT(DISTINCT storage_class) AS unique_storage_classes",
];

/// Columns a statistics query may group by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupByField {
    Bucket,
    SourceIpAddress,
}

impl GroupByField {
    pub const ALL: [GroupByField; 2] = [GroupByField::Bucket, GroupByField::SourceIpAddress];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "bucket" => Some(GroupByField::Bucket),
            "source_ip_address" => Some(GroupByField::SourceIpAddress),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            GroupByField::Bucket => "bucket",
            GroupByField::SourceIpAddress => "source_ip_address",
        }
    }

    /// Recognized fields of `requested`, caller order kept, duplicates and
    /// unknown names dropped.
    pub fn select(requested: &[String]) -> Vec<GroupByField> {
        let mut fields = Vec::with_capacity(GroupByField::ALL.len());
        for field in requested.iter().filter_map(|name| GroupByField::parse(name)) {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        fields
    }
}

/// Runs the two tool queries against one engine and table
pub struct S3TableQuery<E: ?Sized> {
    engine: Arc<E>,
    config: Arc<AthenaConfig>,
    poll: PollPolicy,
}

impl<E: QueryEngine + ?Sized> S3TableQuery<E> {
    pub fn new(engine: Arc<E>, config: Arc<AthenaConfig>) -> Self {
        Self {
            engine,
            config,
            poll: PollPolicy::default(),
        }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn config(&self) -> &AthenaConfig {
        &self.config
    }

    /// Fetch individual object records matching `filters`.
    pub async fn query_record(&self, filters: &FilterSet) -> QueryResult<ResultSet> {
        info!(?filters, "query_record");
        self.execute(self.record_sql(filters)).await
    }

    /// Aggregate object records matching `filters`, grouped by the
    /// recognized names in `group_by`.
    pub async fn query_statistics(
        &self,
        group_by: &[String],
        filters: &FilterSet,
    ) -> QueryResult<ResultSet> {
        info!(?group_by, ?filters, "query_statistics");

        let fields = GroupByField::select(group_by);
        if fields.is_empty() {
            return Err(QueryError::InvalidArgument(
                "Must specify at least one valid group_by field (bucket or source_ip_address)"
                    .to_string(),
            ));
        }

        self.execute(self.statistics_sql(&fields, filters)).await
    }

    pub fn record_sql(&self, filters: &FilterSet) -> String {
        self.select_sql(&RECORD_COLUMNS.join(", "), filters, None)
    }

    pub fn statistics_sql(&self, fields: &[GroupByField], filters: &FilterSet) -> String {
        let group_columns = fields
            .iter()
            .map(|f| f.column())
            .collect::<Vec<_>>()
            .join(", ");
        let projection = format!("{}, {}", group_columns, STATISTICS_AGGREGATES.join(", "));
        self.select_sql(&projection, filters, Some(&group_columns))
    }

    fn select_sql(&self, projection: &str, filters: &FilterSet, group_by: Option<&str>) -> String {
        let mut sql = format!("SELECT {}\nFROM {}", projection, self.config.qualified_table());

        let where_clause = filters.where_clause();
        if !where_clause.is_empty() {
            sql.push('\n');
            sql.push_str(&where_clause);
        }
        if let Some(group_by) = group_by {
            sql.push_str("\nGROUP BY ");
            sql.push_str(group_by);
        }
        sql
    }

    /// Submit `sql`, wait for it and read back all rows.
    pub async fn execute(&self, sql: String) -> QueryResult<ResultSet> {
        let request = QueryRequest::for_config(sql, &self.config);
        let job = submit_query(self.engine.as_ref(), &request).await?;
        wait_for_completion(self.engine.as_ref(), &job, &self.poll).await?;
        let records = fetch_results(self.engine.as_ref(), &job).await?;
        debug!(query_id = %job, records = records.len(), "Query complete");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedEngine;

    fn service() -> S3TableQuery<ScriptedEngine> {
        let config = AthenaConfig {
            catalog: "AwsDataCatalog".into(),
            database: "logs".into(),
            table: "s3_events".into(),
            output_location: "s3://results/".into(),
            region: "us-east-1".into(),
        };
        S3TableQuery::new(Arc::new(ScriptedEngine::new()), Arc::new(config))
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_group_by_selection() {
        assert_eq!(
            GroupByField::select(&names(&["source_ip_address", "nope", "bucket", "bucket"])),
            vec![GroupByField::SourceIpAddress, GroupByField::Bucket]
        );
        assert!(GroupByField::select(&names(&["invalid_field"])).is_empty());
        assert!(GroupByField::select(&[]).is_empty());
    }

    #[test]
    fn test_record_sql_without_filters() {
        let sql = service().record_sql(&FilterSet::default());
        assert!(sql.starts_with("SELECT bucket, key, sequence_number, record_type,"));
        assert!(sql.ends_with("request_id\nFROM logs.s3_events"));
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_statistics_sql_shape() {
        let filters = FilterSet {
            storage_class: Some("GLACIER".into()),
            ..Default::default()
        };
        let sql = service().statistics_sql(
            &[GroupByField::Bucket, GroupByField::SourceIpAddress],
            &filters,
        );

        assert_eq!(
            sql,
            "SELECT bucket, source_ip_address, COUNT(*) AS total_objects, SUM(size) AS total_size, \
             COUNT(DISTINCT record_type) AS unique_record_types, \
             COUNT(DISTINCT storage_class) AS unique_storage_classes\n\
             FROM logs.s3_events\n\
             WHERE storage_class = 'GLACIER'\n\
             GROUP BY bucket, source_ip_address"
        );
    }

    #[tokio::test]
    async fn test_invalid_group_by_never_submits() {
        let service = service();
        let err = service
            .query_statistics(&names(&["invalid_field"]), &FilterSet::default())
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::InvalidArgument(_)));
        assert!(service.engine.requests().is_empty());
    }
}
