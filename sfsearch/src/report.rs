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

//! Renders scan results as the plain-text console report.

use crate::configs::SfsConfig;
use crate::filter::InputFilter;
use crate::model::{ExecutionRecord, StateMachineRef, StatusFilter};
use std::io::{self, Write};

/// Layout of the console report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFormat {
    /// Width of the rule under each state machine header.
    pub rule_width:       usize,
    /// Width of the rule after each execution.
    pub item_rule_width:  usize,
    /// `chrono` format string for start dates, rendered in UTC.
    pub timestamp_format: String,
}

impl Default for ReportFormat {
    fn default() -> Self {
        ReportFormat {
            rule_width:       80,
            item_rule_width:  40,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

impl From<&SfsConfig> for ReportFormat {
    fn from(config: &SfsConfig) -> Self {
        ReportFormat {
            rule_width:       config.rule_width,
            item_rule_width:  config.item_rule_width,
            timestamp_format: config.timestamp_format.clone(),
        }
    }
}

impl ReportFormat {
    /// Writes the lines describing what is about to be fetched.
    pub fn write_preamble<W: Write>(
        &self,
        out: &mut W,
        status: &StatusFilter,
        hours: u32,
        filter: &InputFilter,
        region: Option<&str>,
    ) -> io::Result<()> {
        writeln!(out)?;
        writeln!(
            out,
            "Fetching {} executions from the last {} hours...",
            status, hours
        )?;
        if let Some(name) = &filter.name {
            writeln!(out, "Filtering for name = '{}'", name)?;
        }
        if let Some(key) = &filter.key_contains {
            writeln!(out, "Filtering for key containing '{}'", key)?;
        }
        if let Some(region) = region {
            writeln!(out, "Using AWS region: {}", region)?;
        }
        Ok(())
    }

    /// Writes the section for one state machine. A state machine without
    /// records gets no section at all.
    pub fn write_state_machine<W: Write>(
        &self,
        out: &mut W,
        state_machine: &StateMachineRef,
        records: &[ExecutionRecord],
    ) -> io::Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "State Machine: {}", state_machine)?;
        writeln!(out, "{}", "-".repeat(self.rule_width))?;
        for record in records {
            writeln!(out, "Name: {}", record.name)?;
            writeln!(out, "Status: {}", record.status)?;
            writeln!(
                out,
                "Start Date: {}",
                record.start_date.format(&self.timestamp_format)
            )?;
            writeln!(out, "Input:")?;
            writeln!(out, "{}", record.input)?;
            writeln!(out, "{}", "-".repeat(self.item_rule_width))?;
        }
        Ok(())
    }
}
