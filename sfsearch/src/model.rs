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

//! The values sfsearch reads from AWS Step Functions and reports on.

use crate::error::{Result, SfsError};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// The ARN of a state machine. It is only ever compared and printed, never
/// taken apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateMachineRef(String);

impl StateMachineRef {
    /// Wraps the given state machine ARN.
    pub fn new(arn: impl Into<String>) -> Self {
        StateMachineRef(arn.into())
    }

    /// Returns the ARN.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateMachineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateMachineRef {
    fn from(arn: &str) -> Self {
        StateMachineRef::new(arn)
    }
}

impl From<String> for StateMachineRef {
    fn from(arn: String) -> Self {
        StateMachineRef(arn)
    }
}

/// The lifecycle status of an execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExecutionStatus {
    /// The execution is still in progress.
    Running,
    /// The execution completed successfully.
    Succeeded,
    /// The execution failed.
    Failed,
    /// The execution exceeded its timeout.
    TimedOut,
    /// The execution was stopped by a user.
    Aborted,
    /// The execution failed and can still be redriven.
    PendingRedrive,
    /// A status this build does not know, kept as the service spelled it.
    Other(String),
}

impl ExecutionStatus {
    /// Every status, in the order the service documents them.
    pub const ALL: [ExecutionStatus; 6] = [
        ExecutionStatus::Running,
        ExecutionStatus::Succeeded,
        ExecutionStatus::Failed,
        ExecutionStatus::TimedOut,
        ExecutionStatus::Aborted,
        ExecutionStatus::PendingRedrive,
    ];

    /// Reads a status reported by the service. Unknown names become
    /// [`ExecutionStatus::Other`] rather than an error.
    pub fn from_wire(s: &str) -> Self {
        s.parse()
            .unwrap_or_else(|_| ExecutionStatus::Other(s.to_owned()))
    }

    /// The wire name of the status.
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::Running => "RUNNING",
            ExecutionStatus::Succeeded => "SUCCEEDED",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::TimedOut => "TIMED_OUT",
            ExecutionStatus::Aborted => "ABORTED",
            ExecutionStatus::PendingRedrive => "PENDING_REDRIVE",
            ExecutionStatus::Other(name) => name,
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionStatus {
    type Err = SfsError;

    fn from_str(s: &str) -> Result<Self> {
        ExecutionStatus::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .cloned()
            .ok_or_else(|| SfsError::Config(format!("unknown execution status `{}`", s)))
    }
}

/// Restricts a scan to one status, or lets every status through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    /// No restriction.
    All,
    /// Only executions with the given status.
    Only(ExecutionStatus),
}

impl StatusFilter {
    /// The values accepted on the command line.
    pub const VARIANTS: [&'static str; 7] = [
        "ALL",
        "SUCCEEDED",
        "TIMED_OUT",
        "PENDING_REDRIVE",
        "ABORTED",
        "FAILED",
        "RUNNING",
    ];

    /// The `statusFilter` to send with the listing request. `None` for
    /// [`StatusFilter::All`], since the service has no wildcard value.
    pub fn server_filter(&self) -> Option<ExecutionStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(status.clone()),
        }
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("ALL"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = SfsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ALL" => Ok(StatusFilter::All),
            _ => s.parse().map(StatusFilter::Only),
        }
    }
}

/// One entry of an execution listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// The ARN used to fetch the execution's details.
    pub execution_arn: String,
    /// The name of the execution.
    pub name:          String,
    /// The status at listing time.
    pub status:        ExecutionStatus,
    /// When the execution started.
    pub start_date:    DateTime<Utc>,
}

/// The input payload of an execution, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionInput {
    /// The input parsed as JSON, re-serialized with indentation.
    Json(String),
    /// The input exactly as the service returned it, because it could not be
    /// parsed.
    Raw(String),
}

impl ExecutionInput {
    /// The printable text of the input.
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionInput::Json(text) | ExecutionInput::Raw(text) => text,
        }
    }
}

impl fmt::Display for ExecutionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An execution that passed every filter of a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
    /// The name of the execution.
    pub name:          String,
    /// The status at listing time.
    pub status:        ExecutionStatus,
    /// When the execution started.
    pub start_date:    DateTime<Utc>,
    /// The state machine the execution belongs to.
    pub state_machine: StateMachineRef,
    /// The execution's input.
    pub input:         ExecutionInput,
}
