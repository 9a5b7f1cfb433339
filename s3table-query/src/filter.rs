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

//! Filter set and WHERE clause construction
//!
//! Values are interpolated into the SQL text as-is. A value containing a
//! single quote changes the meaning of the generated statement; callers are
//! trusted agents, not end users.

use serde::{Deserialize, Serialize};

/// Optional predicates narrowing a query over the access-log table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Lower bound (inclusive) on `record_timestamp`
    #[serde(default)]
    pub start_time: Option<String>,
    /// Upper bound (inclusive) on `record_timestamp`
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub record_type: Option<String>,
    #[serde(default)]
    pub storage_class: Option<String>,
    #[serde(default)]
    pub source_ip_address: Option<String>,
}

impl FilterSet {
    /// Conditions in their fixed order, one per non-empty field
    pub fn conditions(&self) -> Vec<String> {
        let predicates = [
            ("record_timestamp", ">=", &self.start_time),
            ("record_timestamp", "<=", &self.end_time),
            ("bucket", "=", &self.bucket),
            ("record_type", "=", &self.record_type),
            ("storage_class", "=", &self.storage_class),
            ("source_ip_address", "=", &self.source_ip_address),
        ];

        predicates
            .into_iter()
            .filter_map(|(column, op, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("{column} {op} '{v}'"))
            })
            .collect()
    }

    /// `WHERE a AND b ...`, or an empty string when no field is set
    pub fn where_clause(&self) -> String {
        build_where_clause(self)
    }
}

pub fn build_where_clause(filters: &FilterSet) -> String {
    let conditions = filters.conditions();
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}
