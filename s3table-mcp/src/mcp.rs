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

//! MCP Protocol Implementation
//!
//! Implements the Model Context Protocol methods:
//! - initialize / initialized
//! - ping / shutdown
//! - tools/list
//! - tools/call
//! - resources/list, prompts/list (always empty)

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::jsonrpc::{RpcRequest, RpcResponse};
use crate::tools::{get_built_in_tools, SharedToolExecutor, ToolError};

/// MCP Protocol version we support
const PROTOCOL_VERSION: &str = "2024-11-05";

const SERVER_NAME: &str = "s3table-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server state
pub struct McpServer {
    executor: SharedToolExecutor,
}

impl McpServer {
    pub fn new(executor: SharedToolExecutor) -> Self {
        Self { executor }
    }

    /// Dispatch a JSON-RPC request to the appropriate handler
    pub async fn dispatch(&self, req: &RpcRequest) -> RpcResponse {
        debug!("Dispatching method: {}", req.method);

        if req.jsonrpc != "2.0" {
            return RpcResponse::invalid_request(
                req.id.clone(),
                format!("Unsupported jsonrpc version: {}", req.jsonrpc),
            );
        }

        match req.method.as_str() {
            // Lifecycle
            "initialize" => self.handle_initialize(req),
            "notifications/initialized" | "initialized" => {
                info!("MCP initialized notification received");
                RpcResponse::success(req.id.clone(), json!({}))
            }
            "ping" => RpcResponse::success(req.id.clone(), json!({})),
            "shutdown" => {
                info!("MCP shutdown requested");
                RpcResponse::success(req.id.clone(), json!({}))
            }

            // Tools
            "tools/list" => {
                RpcResponse::success(req.id.clone(), json!({"tools": get_built_in_tools()}))
            }
            "tools/call" => self.handle_tools_call(req).await,

            // Nothing to expose
            "resources/list" => RpcResponse::success(req.id.clone(), json!({"resources": []})),
            "prompts/list" => RpcResponse::success(req.id.clone(), json!({"prompts": []})),

            _ => {
                warn!("Unknown method: {}", req.method);
                RpcResponse::method_not_found(req.id.clone(), &req.method)
            }
        }
    }

    fn handle_initialize(&self, req: &RpcRequest) -> RpcResponse {
        info!("MCP initialize called");
        if let Some(client) = req.params.get("clientInfo") {
            info!("Client: {}", client);
        }

        RpcResponse::success(
            req.id.clone(),
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                }
            }),
        )
    }

    async fn handle_tools_call(&self, req: &RpcRequest) -> RpcResponse {
        let name = match req.params.get("name").and_then(|v| v.as_str()) {
            Some(n) => n,
            None => return RpcResponse::invalid_params(req.id.clone(), "Missing 'name' parameter"),
        };
        let arguments = req.params.get("arguments").cloned().unwrap_or(Value::Null);

        match self.executor.execute(name, arguments).await {
            Ok(text) => RpcResponse::success(
                req.id.clone(),
                json!({
                    "content": [{
                        "type": "text",
                        "mimeType": "application/json",
                        "text": text
                    }]
                }),
            ),
            Err(err @ ToolError::UnknownTool(_)) => {
                RpcResponse::invalid_params(req.id.clone(), err.to_string())
            }
            Err(ToolError::BadArguments(message)) => RpcResponse::invalid_params(
                req.id.clone(),
                format!("Invalid arguments for {}: {}", name, message),
            ),
            Err(ToolError::Query(err)) => {
                warn!(tool = name, kind = err.kind(), "Tool failed: {}", err);
                RpcResponse::query_error(req.id.clone(), &err)
            }
            Err(err @ ToolError::Render(_)) => {
                RpcResponse::internal_error(req.id.clone(), err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::jsonrpc::{INVALID_PARAMS, METHOD_NOT_FOUND, QUERY_ERROR};
    use s3table_query::testing::ScriptedEngine;
    use s3table_query::{AthenaConfig, JobState, JobStatus, PollPolicy, ResultPage};

    fn server(engine: ScriptedEngine) -> McpServer {
        let config = AthenaConfig {
            catalog: "test_catalog".into(),
            database: "test_db".into(),
            table: "test_table".into(),
            output_location: "s3://test-bucket/results/".into(),
            region: "us-east-1".into(),
        };
        McpServer::new(SharedToolExecutor::shared(
            Arc::new(engine),
            Arc::new(config),
            PollPolicy::default(),
        ))
    }

    fn request(id: Value, method: &str, params: Value) -> RpcRequest {
        serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        }))
        .unwrap()
    }

    fn object_page() -> ResultPage {
        let row = |v: &[&str]| v.iter().map(|s| Some(s.to_string())).collect::<Vec<_>>();
        ResultPage {
            columns: vec!["bucket".into(), "key".into()],
            rows: vec![
                row(&["bucket", "key"]),
                row(&["test-bucket", "test/key1"]),
                row(&["test-bucket", "test/key2"]),
            ],
            next_token: None,
        }
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = server(ScriptedEngine::new());
        let resp = server
            .dispatch(&request(json!(1), "initialize", json!({"clientInfo": {"name": "t"}})))
            .await;

        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = server(ScriptedEngine::new());
        let resp = server.dispatch(&request(json!(2), "tools/list", Value::Null)).await;

        let tools = resp.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tools_call_query_record() {
        let server = server(ScriptedEngine::new().with_pages(vec![object_page()]));
        let resp = server
            .dispatch(&request(
                json!(3),
                "tools/call",
                json!({
                    "name": "query_record",
                    "arguments": {"bucket": "test-bucket", "record_type": "PUT"}
                }),
            ))
            .await;

        let result = resp.result.unwrap();
        let text = result["content"][0]["text"].as_str().unwrap();
        let records: Value = serde_json::from_str(text).unwrap();
        assert_eq!(records.as_array().unwrap().len(), 2);
        assert_eq!(records[0]["key"], "test/key1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_query_is_rpc_error() {
        let server = server(
            ScriptedEngine::new()
                .with_statuses(vec![JobStatus::new(JobState::Failed).with_reason("Test failure")]),
        );
        let resp = server
            .dispatch(&request(
                json!(4),
                "tools/call",
                json!({"name": "query_record", "arguments": {"bucket": "test-bucket"}}),
            ))
            .await;

        let error = resp.error.unwrap();
        assert_eq!(error.code, QUERY_ERROR);
        assert!(error.message.contains("failed with state FAILED"));
        assert_eq!(error.data, Some(json!({"kind": "QueryExecutionError"})));
    }

    #[tokio::test]
    async fn test_invalid_group_by_is_invalid_params() {
        let server = server(ScriptedEngine::new());
        let resp = server
            .dispatch(&request(
                json!(5),
                "tools/call",
                json!({"name": "query_statistics", "arguments": {"group_by": ["invalid_field"]}}),
            ))
            .await;

        let error = resp.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.data, Some(json!({"kind": "InvalidArgument"})));
    }

    #[tokio::test]
    async fn test_missing_tool_name() {
        let server = server(ScriptedEngine::new());
        let resp = server
            .dispatch(&request(json!(6), "tools/call", json!({})))
            .await;
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = server(ScriptedEngine::new());
        let resp = server
            .dispatch(&request(json!(7), "sampling/createMessage", json!({})))
            .await;
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }
}
