// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Field filters over an execution's JSON input.
//!
//! An input that is not a JSON object cannot be checked against a field
//! filter, so whenever a filter is set such inputs are dropped. With no filter
//! set every input is kept: parsed inputs are pretty printed, anything else is
//! kept verbatim.

use crate::error::{Result, SfsError};
use crate::model::ExecutionInput;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

/// Text reported for an execution whose details carry no input at all.
pub const NO_INPUT: &str = "No input available";

/// Filters on the `name` and `key` fields of an execution's input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFilter {
    /// Keep only inputs whose `name` equals this string.
    pub name:         Option<String>,
    /// Keep only inputs whose `key` contains this string.
    pub key_contains: Option<String>,
}

impl InputFilter {
    /// Returns true if neither filter is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.key_contains.is_none()
    }

    /// Decides whether an execution with input `raw` is kept.
    ///
    /// # Arguments
    /// * `raw` - The input string from the execution's details, if any.
    /// * `indent` - Indentation, in spaces, of the pretty printed JSON.
    ///
    /// # Returns
    /// The printable input if the execution passes, `None` if it is skipped.
    pub fn apply(&self, raw: Option<&str>, indent: usize) -> Result<Option<ExecutionInput>> {
        let raw = raw.unwrap_or(NO_INPUT);
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => {
                if !self.is_empty() {
                    match value.as_object() {
                        Some(fields) if self.matches(fields) => {}
                        _ => return Ok(None),
                    }
                }
                Ok(Some(ExecutionInput::Json(pretty(&value, indent)?)))
            }
            Err(_) if self.is_empty() => Ok(Some(ExecutionInput::Raw(raw.to_owned()))),
            Err(_) => Ok(None),
        }
    }

    fn matches(&self, fields: &Map<String, Value>) -> bool {
        let field = |key: &str| fields.get(key).and_then(Value::as_str);

        if let Some(name) = &self.name {
            if field("name") != Some(name.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.key_contains {
            match field("key") {
                Some(key) if key.contains(needle.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Serializes `value` with `indent` spaces per level, keeping key order and
/// the exact digits of every number. Non-ASCII text is written as UTF-8.
pub fn pretty(value: &Value, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| SfsError::Internal(e.to_string()))
}
