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

//! Flattened result rows

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One result row: column name to string-or-null, in result column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    /// Pair `values` with `columns` position by position.
    ///
    /// Every column gets a key: positions past the end of `values` become
    /// nulls. Values without a column are dropped.
    pub fn from_row(columns: &[String], values: Vec<Option<String>>) -> Self {
        let mut values = values.into_iter();
        let fields = columns
            .iter()
            .map(|column| (column.clone(), values.next().flatten()))
            .collect();
        Self { fields }
    }

    /// Value of `column`. The outer `None` means the column is unknown, the
    /// inner one a null value.
    pub fn get(&self, column: &str) -> Option<Option<&str>> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_deref())
    }

    /// Non-null value of `column`
    pub fn value(&self, column: &str) -> Option<&str> {
        self.get(column).flatten()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Ordered, fully materialized query result
pub type ResultSet = Vec<Record>;

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_null_values_keep_their_key() {
        let record = Record::from_row(
            &columns(&["bucket", "kms_key_arn"]),
            vec![Some("b".into()), None],
        );
        assert_eq!(record.get("bucket"), Some(Some("b")));
        assert_eq!(record.get("kms_key_arn"), Some(None));
        assert_eq!(record.get("nope"), None);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let record = Record::from_row(&columns(&["a", "b", "c"]), vec![Some("1".into())]);
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("c"), Some(None));
    }

    #[test]
    fn test_extra_values_are_dropped() {
        let record = Record::from_row(
            &columns(&["a"]),
            vec![Some("1".into()), Some("2".into())],
        );
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_serializes_in_column_order() {
        let record = Record::from_row(
            &columns(&["size", "bucket", "e_tag"]),
            vec![Some("1024".into()), Some("b".into()), None],
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"size":"1024","bucket":"b","e_tag":null}"#);
    }
}
