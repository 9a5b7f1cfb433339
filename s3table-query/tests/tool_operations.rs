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

//! Tool Operation Integration Tests
//!
//! Drives `query_record` and `query_statistics` end to end against a
//! scripted engine: SQL generation, submission context, polling and
//! pagination.

use std::sync::Arc;

use s3table_query::testing::ScriptedEngine;
use s3table_query::{
    AthenaConfig, FilterSet, JobState, JobStatus, QueryError, ResultPage, S3TableQuery,
};

/// Test fixture holding the engine and the service built on it
struct QueryFixture {
    engine: Arc<ScriptedEngine>,
    service: S3TableQuery<ScriptedEngine>,
}

impl QueryFixture {
    fn new(engine: ScriptedEngine) -> Self {
        let config = AthenaConfig {
            catalog: "test_catalog".into(),
            database: "test_db".into(),
            table: "test_table".into(),
            output_location: "s3://test-bucket/results/".into(),
            region: "us-east-1".into(),
        };
        let engine = Arc::new(engine);
        let service = S3TableQuery::new(Arc::clone(&engine), Arc::new(config));
        Self { engine, service }
    }

    /// Engine returning a header and two object rows on a single page
    fn with_two_records() -> Self {
        Self::new(ScriptedEngine::new().with_pages(vec![two_record_page()]))
    }
}

fn text(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

fn two_record_page() -> ResultPage {
    ResultPage {
        columns: vec![
            "bucket".into(),
            "key".into(),
            "record_type".into(),
            "size".into(),
        ],
        rows: vec![
            text(&["bucket", "key", "record_type", "size"]),
            text(&["test-bucket", "test/key1", "PUT", "1024"]),
            text(&["test-bucket", "test/key2", "GET", "2048"]),
        ],
        next_token: None,
    }
}

#[tokio::test(start_paused = true)]
async fn test_query_record() {
    let fixture = QueryFixture::with_two_records();

    let filters = FilterSet {
        bucket: Some("test-bucket".into()),
        record_type: Some("PUT".into()),
        ..Default::default()
    };
    let records = fixture.service.query_record(&filters).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].value("bucket"), Some("test-bucket"));
    assert_eq!(records[0].value("key"), Some("test/key1"));
    assert_eq!(records[1].value("size"), Some("2048"));

    let sql = fixture.engine.last_sql().unwrap();
    assert!(sql.contains("FROM test_db.test_table"));
    assert!(sql.contains("WHERE bucket = 'test-bucket' AND record_type = 'PUT'"));
}

#[tokio::test(start_paused = true)]
async fn test_submission_context() {
    let fixture = QueryFixture::with_two_records();

    fixture
        .service
        .query_record(&FilterSet::default())
        .await
        .unwrap();

    let requests = fixture.engine.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].catalog, "test_catalog");
    assert_eq!(requests[0].database, "test_db");
    assert_eq!(requests[0].output_location, "s3://test-bucket/results/");
}

#[tokio::test(start_paused = true)]
async fn test_query_statistics() {
    let fixture = QueryFixture::with_two_records();

    let filters = FilterSet {
        start_time: Some("2023-01-01T00:00:00".into()),
        end_time: Some("2023-01-02T00:00:00".into()),
        ..Default::default()
    };
    let records = fixture
        .service
        .query_statistics(&["bucket".to_string()], &filters)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);

    let sql = fixture.engine.last_sql().unwrap();
    assert!(sql.starts_with("SELECT bucket, COUNT(*) AS total_objects"));
    assert!(sql.contains(
        "WHERE record_timestamp >= '2023-01-01T00:00:00' AND record_timestamp <= '2023-01-02T00:00:00'"
    ));
    assert!(sql.ends_with("GROUP BY bucket"));
}

#[tokio::test(start_paused = true)]
async fn test_statistics_ignores_unknown_group_fields() {
    let fixture = QueryFixture::with_two_records();

    fixture
        .service
        .query_statistics(
            &["bucket".to_string(), "invalid_field".to_string()],
            &FilterSet::default(),
        )
        .await
        .unwrap();

    let sql = fixture.engine.last_sql().unwrap();
    assert!(sql.ends_with("GROUP BY bucket"));
    assert!(!sql.contains("invalid_field"));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_group_by() {
    let fixture = QueryFixture::with_two_records();

    let err = fixture
        .service
        .query_statistics(&["invalid_field".to_string()], &FilterSet::default())
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::InvalidArgument(_)));
    assert!(fixture.engine.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_query() {
    let fixture = QueryFixture::new(
        ScriptedEngine::new()
            .with_statuses(vec![
                JobStatus::new(JobState::Running),
                JobStatus::new(JobState::Failed).with_reason("Test failure"),
            ])
            .with_pages(vec![two_record_page()]),
    );

    let err = fixture
        .service
        .query_record(&FilterSet {
            bucket: Some("test-bucket".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("failed with state FAILED"));
    assert!(fixture.engine.page_tokens().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_submission_rejected() {
    let fixture = QueryFixture::new(
        ScriptedEngine::new().failing_submit("InvalidRequestException: line 1:8: mismatched input"),
    );

    let err = fixture
        .service
        .query_record(&FilterSet::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "SubmissionError");
    assert!(err.to_string().contains("mismatched input"));
    assert_eq!(fixture.engine.status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_multi_page_results() {
    let second_page = ResultPage {
        columns: two_record_page().columns,
        rows: vec![
            text(&["other-bucket", "a", "DELETE", "1"]),
            text(&["other-bucket", "b", "DELETE", "2"]),
            text(&["other-bucket", "c", "DELETE", "3"]),
        ],
        next_token: None,
    };
    let fixture = QueryFixture::new(
        ScriptedEngine::new()
            .with_statuses(vec![
                JobStatus::new(JobState::Queued),
                JobStatus::new(JobState::Running),
                JobStatus::new(JobState::Succeeded),
            ])
            .with_pages(vec![two_record_page(), second_page]),
    );

    let records = fixture
        .service
        .query_record(&FilterSet::default())
        .await
        .unwrap();

    // 3 + 3 rows, one of them the header
    assert_eq!(records.len(), 5);
    assert_eq!(records[4].value("key"), Some("c"));
    assert_eq!(fixture.engine.status_calls(), 3);
}
