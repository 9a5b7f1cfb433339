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

//! S3Table MCP Server - query S3 object-event logs through Athena
//!
//! ## Architecture
//!
//! ```text
//! MCP Client (Claude, Cursor, etc.)
//!      │
//!      │ JSON-RPC over stdio
//!      ▼
//! ┌─────────────────────────────────┐
//! │  s3table-mcp (this crate)       │
//! │  - Stdio framing                │
//! │  - JSON-RPC dispatch            │
//! │  - query_record / statistics    │
//! └─────────────────────────────────┘
//!      │
//!      │ s3table-query
//!      ▼
//! ┌─────────────────────────────────┐
//! │  Amazon Athena                  │
//! │  - StartQueryExecution          │
//! │  - GetQueryExecution (poll)     │
//! │  - GetQueryResults (paginate)   │
//! └─────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! export ATHENA_DATABASE=s3_logs ATHENA_TABLE=object_events \
//!        ATHENA_OUTPUT_LOCATION=s3://my-athena-results/
//! s3table-mcp
//!
//! # In Claude Desktop config:
//! # "mcpServers": { "s3table": { "command": "s3table-mcp", "env": { ... } } }
//! ```

mod framing;
mod jsonrpc;
mod mcp;
mod tools;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{self, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use s3table_query::{AthenaConfig, AthenaEngine, PollPolicy};

use crate::framing::{read_message, write_message, WireFormat};
use crate::jsonrpc::{RpcRequest, RpcResponse};
use crate::mcp::McpServer;
use crate::tools::SharedToolExecutor;

/// S3Table MCP Server
///
/// Athena settings come from ATHENA_CATALOG, ATHENA_DATABASE, ATHENA_TABLE,
/// ATHENA_OUTPUT_LOCATION and AWS_REGION.
#[derive(Parser, Debug)]
#[command(name = "s3table-mcp")]
#[command(about = "MCP server for querying S3 object-event logs with Athena")]
#[command(version)]
struct Args {
    /// Delay between query status checks, in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_ms: u64,

    /// Abandon queries still running after this many seconds (default: wait forever)
    #[arg(long)]
    max_wait_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // stdout carries the protocol, logs go to stderr
    let filter = if args.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match AthenaConfig::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!(
        catalog = %config.catalog,
        table = %config.qualified_table(),
        output = %config.output_location,
        "S3Table MCP server starting"
    );

    let poll = PollPolicy {
        interval: Duration::from_millis(args.poll_interval_ms),
        max_wait: args.max_wait_secs.map(Duration::from_secs),
    };
    let engine = Arc::new(AthenaEngine::connect(&config).await);
    let server = McpServer::new(SharedToolExecutor::shared(engine, config, poll));

    if let Err(e) = serve(&server).await {
        error!("Transport failed: {}", e);
        std::process::exit(1);
    }

    info!("S3Table MCP server shutting down");
}

/// Read requests from stdin one at a time and answer on stdout
async fn serve(server: &McpServer) -> std::io::Result<()> {
    let mut reader = BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        let (msg, format) = match read_message(&mut reader).await {
            Ok(Some(m)) => m,
            Ok(None) => {
                info!("EOF on stdin, shutting down");
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                error!("Failed to read message: {}", e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let req = match RpcRequest::parse(&msg) {
            Ok(r) => r,
            Err(resp) => {
                if let Some(e) = &resp.error {
                    error!(code = e.code, "Invalid JSON-RPC: {}", e.message);
                }
                reply(&mut stdout, &resp, format).await?;
                continue;
            }
        };

        let resp = server.dispatch(&req).await;

        // JSON-RPC 2.0: notifications MUST NOT have responses
        if !req.is_notification() {
            reply(&mut stdout, &resp, format).await?;
        }
    }
}

async fn reply(stdout: &mut io::Stdout, resp: &RpcResponse, format: WireFormat) -> std::io::Result<()> {
    if let Err(e) = write_message(stdout, resp, format).await {
        error!("Failed to write response: {}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_interval_defaults_to_one_second() {
        let args = Args::try_parse_from(["s3table-mcp"]).unwrap();
        assert_eq!(args.poll_interval_ms, 1000);
        assert_eq!(args.max_wait_secs, None);
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        assert!(Args::try_parse_from(["s3table-mcp", "--poll-interval-ms", "0"]).is_err());

        let args = Args::try_parse_from(["s3table-mcp", "--poll-interval-ms", "250"]).unwrap();
        assert_eq!(args.poll_interval_ms, 250);
    }
}
