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

//! Collects the recent executions of one state machine.
//!
//! The service lists executions newest first, so the scan stops at the first
//! execution that started before the cutoff and never asks for another page.
//! Fetching pages ahead of time or out of order would break that.

use crate::aws::StepFunctionsService;
use crate::error::{Result, SfsError};
use crate::filter::InputFilter;
use crate::model::{ExecutionRecord, StateMachineRef, StatusFilter};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

/// What a scan looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Lookback window in hours, counted back from the start of the scan.
    pub hours:       u32,
    /// Status restriction, applied by the service.
    pub status:      StatusFilter,
    /// Filters on fields of the execution input.
    pub filter:      InputFilter,
    /// Indentation of pretty printed JSON input.
    pub json_indent: usize,
}

impl ScanOptions {
    /// Options for a window of `hours` with no other restriction.
    pub fn new(hours: u32) -> Result<Self> {
        if hours == 0 {
            return Err(SfsError::Config(
                "the lookback window must be at least one hour".to_string(),
            ));
        }
        Ok(ScanOptions {
            hours,
            status: StatusFilter::All,
            filter: InputFilter::default(),
            json_indent: 4,
        })
    }

    /// Restricts the scan to one status.
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Sets the input field filters.
    pub fn with_filter(mut self, filter: InputFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the indentation of pretty printed JSON input.
    pub fn with_json_indent(mut self, json_indent: usize) -> Self {
        self.json_indent = json_indent;
        self
    }

    /// The earliest start date still inside the window ending at `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::hours(i64::from(self.hours))
    }
}

/// Returns the executions of `state_machine` that started within the window
/// and pass the input filters, newest first.
pub async fn scan_executions<S>(
    service: &S,
    state_machine: &StateMachineRef,
    options: &ScanOptions,
) -> Result<Vec<ExecutionRecord>>
where
    S: StepFunctionsService + ?Sized,
{
    scan_executions_at(service, state_machine, options, Utc::now()).await
}

/// [`scan_executions`] with the window ending at `now` rather than the
/// current time.
pub async fn scan_executions_at<S>(
    service: &S,
    state_machine: &StateMachineRef,
    options: &ScanOptions,
    now: DateTime<Utc>,
) -> Result<Vec<ExecutionRecord>>
where
    S: StepFunctionsService + ?Sized,
{
    let cutoff = options.cutoff(now);
    let status = options.status.server_filter();
    let mut records = vec![];
    let mut next_token = None;

    info!(
        "Scanning {} for {} executions since {}",
        state_machine, options.status, cutoff
    );

    loop {
        let page = service
            .list_executions(state_machine, status.clone(), next_token.take())
            .await?;

        for execution in page.items {
            if execution.start_date < cutoff {
                info!(
                    "Reached {} started at {}, before the cutoff",
                    execution.name, execution.start_date
                );
                return Ok(records);
            }

            debug!("Fetching details of {}", execution.execution_arn);
            let raw = service.describe_execution(&execution.execution_arn).await?;
            match options.filter.apply(raw.as_deref(), options.json_indent)? {
                Some(input) => records.push(ExecutionRecord {
                    name: execution.name,
                    status: execution.status,
                    start_date: execution.start_date,
                    state_machine: state_machine.clone(),
                    input,
                }),
                None => debug!("Skipping {}: input does not match", execution.name),
            }
        }

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    info!("Listed every execution of {}", state_machine);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::Page;
    use crate::model::{ExecutionInput, ExecutionStatus};
    use crate::test_util::{execution_arn, summary, MockStepFunctions};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_709_294_400_000).unwrap()
    }

    fn hours_ago(hours: i64) -> DateTime<Utc> {
        now() - Duration::hours(hours)
    }

    #[test]
    fn zero_hours_is_rejected() {
        assert!(matches!(ScanOptions::new(0), Err(SfsError::Config(_))));
    }

    #[test]
    fn cutoff_counts_back_from_now() -> Result<()> {
        assert_eq!(ScanOptions::new(24)?.cutoff(now()), hours_ago(24));
        Ok(())
    }

    #[tokio::test]
    async fn execution_at_the_cutoff_is_kept() -> Result<()> {
        let sm = StateMachineRef::from("arn:sm:orders");
        let mock = MockStepFunctions::new()
            .with_execution_page(
                &sm,
                Page::last(vec![
                    summary("edge", ExecutionStatus::Succeeded, hours_ago(24)),
                    summary(
                        "old",
                        ExecutionStatus::Succeeded,
                        hours_ago(24) - Duration::seconds(1),
                    ),
                ]),
            )
            .with_input(&execution_arn("edge"), Some("{}"));

        let records = scan_executions_at(&mock, &sm, &ScanOptions::new(24)?, now()).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "edge");
        assert_eq!(records[0].input, ExecutionInput::Json("{}".to_string()));
        assert_eq!(mock.described(), vec![execution_arn("edge")]);
        Ok(())
    }

    #[tokio::test]
    async fn stops_without_requesting_more_pages() -> Result<()> {
        let sm = StateMachineRef::from("arn:sm:orders");
        let mock = MockStepFunctions::new()
            .with_execution_page(
                &sm,
                Page {
                    items:      vec![
                        summary("a", ExecutionStatus::Running, hours_ago(1)),
                        summary("b", ExecutionStatus::Failed, hours_ago(30)),
                        summary("c", ExecutionStatus::Failed, hours_ago(31)),
                    ],
                    next_token: Some("page-2".to_string()),
                },
            )
            .with_execution_page(
                &sm,
                Page::last(vec![summary("d", ExecutionStatus::Failed, hours_ago(40))]),
            )
            .with_input(&execution_arn("a"), Some("{}"));

        let records = scan_executions_at(&mock, &sm, &ScanOptions::new(24)?, now()).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(mock.execution_requests(), vec![(None, None)]);
        assert_eq!(mock.described(), vec![execution_arn("a")]);
        Ok(())
    }

    #[tokio::test]
    async fn follows_pages_inside_the_window() -> Result<()> {
        let sm = StateMachineRef::from("arn:sm:orders");
        let mock = MockStepFunctions::new()
            .with_execution_page(
                &sm,
                Page {
                    items:      vec![summary("a", ExecutionStatus::Succeeded, hours_ago(1))],
                    next_token: Some("page-2".to_string()),
                },
            )
            .with_execution_page(
                &sm,
                Page::last(vec![summary("b", ExecutionStatus::Succeeded, hours_ago(2))]),
            )
            .with_input(&execution_arn("a"), Some("{}"))
            .with_input(&execution_arn("b"), Some("{}"));

        let records = scan_executions_at(&mock, &sm, &ScanOptions::new(24)?, now()).await?;
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(
            mock.execution_requests(),
            vec![(None, None), (None, Some("page-2".to_string()))]
        );
        Ok(())
    }

    #[tokio::test]
    async fn concrete_status_is_sent_to_the_service() -> Result<()> {
        let sm = StateMachineRef::from("arn:sm:orders");
        let mock = MockStepFunctions::new()
            .with_execution_page(
                &sm,
                Page::last(vec![
                    summary("ok", ExecutionStatus::Succeeded, hours_ago(1)),
                    summary("bad", ExecutionStatus::Failed, hours_ago(2)),
                ]),
            )
            .with_input(&execution_arn("ok"), Some("{}"))
            .with_input(&execution_arn("bad"), Some("{}"));

        let options =
            ScanOptions::new(24)?.with_status(StatusFilter::Only(ExecutionStatus::Failed));
        let records = scan_executions_at(&mock, &sm, &options, now()).await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, ExecutionStatus::Failed);
        assert_eq!(
            mock.execution_requests(),
            vec![(Some(ExecutionStatus::Failed), None)]
        );
        assert_eq!(mock.described(), vec![execution_arn("bad")]);
        Ok(())
    }

    #[tokio::test]
    async fn describe_failure_aborts_the_scan() -> Result<()> {
        let sm = StateMachineRef::from("arn:sm:orders");
        let mock = MockStepFunctions::new().with_execution_page(
            &sm,
            Page::last(vec![summary("gone", ExecutionStatus::Aborted, hours_ago(1))]),
        );

        let result = scan_executions_at(&mock, &sm, &ScanOptions::new(24)?, now()).await;
        assert!(matches!(result, Err(SfsError::AWS(_))));
        Ok(())
    }
}
