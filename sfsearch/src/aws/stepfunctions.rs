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

//! The three AWS Step Functions control-plane calls sfsearch needs, behind a
//! trait so the scan can run against something other than the live service.

use crate::configs::AwsConfig;
use crate::error::{Result, SfsError};
use crate::model::{ExecutionStatus, ExecutionSummary, StateMachineRef};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, warn};
use rusoto_stepfunctions::{
    DescribeExecutionInput, ExecutionListItem, ListExecutionsInput, ListStateMachinesInput,
    StepFunctions, StepFunctionsClient,
};

/// One page of a listing call.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The items on this page, in service order.
    pub items:      Vec<T>,
    /// The token for the next page, `None` on the last page.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// A final page holding `items`.
    pub fn last(items: Vec<T>) -> Self {
        Page {
            items,
            next_token: None,
        }
    }
}

/// Read-only access to AWS Step Functions.
///
/// Pagination tokens are opaque; callers pass back whatever `next_token` the
/// previous page returned.
#[async_trait]
pub trait StepFunctionsService: Send + Sync {
    /// Lists one page of the state machines visible to the caller.
    async fn list_state_machines(&self, next_token: Option<String>)
        -> Result<Page<StateMachineRef>>;

    /// Lists one page of executions of `state_machine`, newest first.
    ///
    /// # Arguments
    /// * `state_machine` - The state machine whose executions are listed.
    /// * `status` - If set, the service returns only executions with this
    ///   status.
    /// * `next_token` - The token returned with the previous page.
    async fn list_executions(
        &self,
        state_machine: &StateMachineRef,
        status: Option<ExecutionStatus>,
        next_token: Option<String>,
    ) -> Result<Page<ExecutionSummary>>;

    /// Returns the input an execution was started with, or `None` if the
    /// service did not include it.
    async fn describe_execution(&self, execution_arn: &str) -> Result<Option<String>>;
}

/// [`StepFunctionsService`] backed by the rusoto client.
pub struct RusotoStepFunctions {
    client:      StepFunctionsClient,
    max_results: Option<i64>,
}

impl RusotoStepFunctions {
    /// Creates a client for the region in `config`. Credentials come from the
    /// default provider chain.
    pub fn new(config: &AwsConfig) -> Self {
        RusotoStepFunctions {
            client:      StepFunctionsClient::new(config.region.clone()),
            max_results: config.max_results,
        }
    }
}

#[async_trait]
impl StepFunctionsService for RusotoStepFunctions {
    async fn list_state_machines(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<StateMachineRef>> {
        let request = ListStateMachinesInput {
            max_results: self.max_results,
            next_token,
            ..Default::default()
        };
        let response = self.client.list_state_machines(request).await?;
        debug!(
            "ListStateMachines returned {} state machines",
            response.state_machines.len()
        );

        Ok(Page {
            items:      response
                .state_machines
                .into_iter()
                .map(|machine| StateMachineRef::new(machine.state_machine_arn))
                .collect(),
            next_token: response.next_token,
        })
    }

    async fn list_executions(
        &self,
        state_machine: &StateMachineRef,
        status: Option<ExecutionStatus>,
        next_token: Option<String>,
    ) -> Result<Page<ExecutionSummary>> {
        let request = ListExecutionsInput {
            state_machine_arn: state_machine.as_str().to_owned(),
            status_filter: status.map(|s| s.as_str().to_owned()),
            max_results: self.max_results,
            next_token,
            ..Default::default()
        };
        let response = self.client.list_executions(request).await?;
        debug!(
            "ListExecutions returned {} executions of {}",
            response.executions.len(),
            state_machine
        );

        Ok(Page {
            items:      response
                .executions
                .into_iter()
                .map(summary_from_item)
                .collect::<Result<Vec<_>>>()?,
            next_token: response.next_token,
        })
    }

    async fn describe_execution(&self, execution_arn: &str) -> Result<Option<String>> {
        let request = DescribeExecutionInput {
            execution_arn: execution_arn.to_owned(),
            ..Default::default()
        };
        Ok(self.client.describe_execution(request).await?.input)
    }
}

fn summary_from_item(item: ExecutionListItem) -> Result<ExecutionSummary> {
    let status = ExecutionStatus::from_wire(&item.status);
    if let ExecutionStatus::Other(name) = &status {
        warn!(
            "execution {} has unrecognized status `{}`",
            item.execution_arn, name
        );
    }
    let start_date = epoch_to_utc(item.start_date).ok_or_else(|| {
        SfsError::MalformedResponse(format!(
            "execution {} has invalid start date {}",
            item.execution_arn, item.start_date
        ))
    })?;

    Ok(ExecutionSummary {
        execution_arn: item.execution_arn,
        name: item.name,
        status,
        start_date,
    })
}

/// The service encodes timestamps as fractional seconds since the epoch.
fn epoch_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt((seconds * 1000.0).round() as i64).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: &str, start_date: f64) -> ExecutionListItem {
        ExecutionListItem {
            execution_arn: "arn:aws:states:us-east-1:123456789012:execution:orders:run-1"
                .to_string(),
            name: "run-1".to_string(),
            status: status.to_string(),
            start_date,
            ..Default::default()
        }
    }

    #[test]
    fn converts_list_items() -> Result<()> {
        let summary = summary_from_item(item("SUCCEEDED", 1_700_000_000.25))?;
        assert_eq!(summary.name, "run-1");
        assert_eq!(summary.status, ExecutionStatus::Succeeded);
        assert_eq!(
            summary.start_date,
            Utc.timestamp_millis_opt(1_700_000_000_250).unwrap()
        );
        Ok(())
    }

    #[test]
    fn unknown_status_is_reported_as_is() -> Result<()> {
        let summary = summary_from_item(item("PAUSED", 1_700_000_000.0))?;
        assert_eq!(summary.status, ExecutionStatus::Other("PAUSED".to_string()));
        assert_eq!(summary.status.to_string(), "PAUSED");
        Ok(())
    }

    #[test]
    fn non_finite_start_date_is_malformed() {
        assert!(matches!(
            summary_from_item(item("RUNNING", f64::NAN)),
            Err(SfsError::MalformedResponse(_))
        ));
        assert_eq!(epoch_to_utc(f64::INFINITY), None);
    }
}
