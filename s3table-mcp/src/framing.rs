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

//! Message framing for the MCP stdio transport
//!
//! Two framings are accepted and detected per message:
//! ```text
//! Content-Length: <N>\r\n        (LSP style)
//! \r\n
//! <N bytes of JSON>
//!
//! {"jsonrpc":"2.0",...}\n         (NDJSON)
//! ```
//! Replies are written in the framing of the request they answer.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Wire format for MCP messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    ContentLength,
    Ndjson,
}

const CONTENT_LENGTH: &str = "Content-Length:";

/// Read the next framed message. `Ok(None)` means end of input.
pub async fn read_message<R>(reader: &mut R) -> io::Result<Option<(Vec<u8>, WireFormat)>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(length) = trimmed.strip_prefix(CONTENT_LENGTH) {
            let length: usize = length.trim().parse().map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidData, "Invalid Content-Length header")
            })?;

            // Skip remaining headers (Content-Type etc.) up to the blank line
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).await? == 0 {
                    return Ok(None);
                }
                if header.trim().is_empty() {
                    break;
                }
            }

            let mut body = vec![0u8; length];
            reader.read_exact(&mut body).await?;
            return Ok(Some((body, WireFormat::ContentLength)));
        }

        if trimmed.starts_with('{') {
            return Ok(Some((trimmed.as_bytes().to_vec(), WireFormat::Ndjson)));
        }

        let preview: String = trimmed.chars().take(50).collect();
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Unknown message format, expected Content-Length or JSON, got: {preview}"),
        ));
    }
}

/// Serialize `message` and write it in `format`, then flush.
pub async fn write_message<W, T>(writer: &mut W, message: &T, format: WireFormat) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: serde::Serialize,
{
    let body = serde_json::to_vec(message)?;

    match format {
        WireFormat::ContentLength => {
            let header = format!("Content-Length: {}\r\n\r\n", body.len());
            writer.write_all(header.as_bytes()).await?;
            writer.write_all(&body).await?;
        }
        WireFormat::Ndjson => {
            writer.write_all(&body).await?;
            writer.write_all(b"\n").await?;
        }
    }

    writer.flush().await
}
