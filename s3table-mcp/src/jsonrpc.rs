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

//! JSON-RPC 2.0 types for MCP
//!
//! Just enough of the protocol for a stdio tool server.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use s3table_query::QueryError;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
/// Server-defined: the query engine refused or failed the query
pub const QUERY_ERROR: i32 = -32001;

/// JSON-RPC 2.0 Request
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// Must be "2.0"
    pub jsonrpc: String,

    /// Number, string, or null/omitted for notifications
    #[serde(default)]
    pub id: Value,

    pub method: String,

    #[serde(default)]
    pub params: Value,
}

impl RpcRequest {
    /// Decode one framed message.
    ///
    /// Bytes that are not JSON get a parse error. Well-formed JSON that is
    /// not a request object gets an invalid request error carrying the id
    /// when one can be read.
    pub fn parse(bytes: &[u8]) -> Result<Self, RpcResponse> {
        let value: Value = serde_json::from_slice(bytes).map_err(|_| RpcResponse::parse_error())?;
        let id = value.get("id").cloned().unwrap_or(Value::Null);

        serde_json::from_value(value)
            .map_err(|e| RpcResponse::invalid_request(id, format!("Invalid Request: {}", e)))
    }

    /// A notification has no id and must not be answered
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    /// Always "2.0"
    pub jsonrpc: &'static str,

    /// Echo of the request id
    pub id: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data,
            }),
        }
    }

    /// Invalid JSON; the id is unknown
    pub fn parse_error() -> Self {
        Self::error(Value::Null, PARSE_ERROR, "Parse error", None)
    }

    pub fn invalid_request(id: Value, message: impl Into<String>) -> Self {
        Self::error(id, INVALID_REQUEST, message, None)
    }

    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method), None)
    }

    pub fn invalid_params(id: Value, message: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, message, None)
    }

    pub fn internal_error(id: Value, message: impl Into<String>) -> Self {
        Self::error(id, INTERNAL_ERROR, message, None)
    }

    /// Report a failed query operation
    pub fn query_error(id: Value, err: &QueryError) -> Self {
        let code = match err {
            QueryError::InvalidArgument(_) => INVALID_PARAMS,
            QueryError::Configuration { .. } => INTERNAL_ERROR,
            _ => QUERY_ERROR,
        };
        Self::error(id, code, err.to_string(), Some(json!({ "kind": err.kind() })))
    }
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i32,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
