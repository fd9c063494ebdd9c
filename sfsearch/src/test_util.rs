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

//! An in-memory stand-in for AWS Step Functions, for tests.

use crate::aws::{Page, StepFunctionsService};
use crate::error::{Result, SfsError};
use crate::model::{ExecutionStatus, ExecutionSummary, StateMachineRef};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A call received by [`MockStepFunctions`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// `ListStateMachines` with the given page token.
    ListStateMachines(Option<String>),
    /// `ListExecutions` for a state machine.
    ListExecutions {
        /// The state machine listed.
        state_machine: StateMachineRef,
        /// The status filter sent to the service.
        status:        Option<ExecutionStatus>,
        /// The page token sent to the service.
        next_token:    Option<String>,
    },
    /// `DescribeExecution` for an execution ARN.
    DescribeExecution(String),
}

/// Serves canned pages and records every call it receives.
///
/// Pages are served in the order they were added, one per call. Like the
/// real service, a status filter drops non-matching executions from a page.
#[derive(Default)]
pub struct MockStepFunctions {
    state_machine_pages:   Vec<Page<StateMachineRef>>,
    state_machine_failure: Option<String>,
    execution_pages:       HashMap<StateMachineRef, Vec<Page<ExecutionSummary>>>,
    inputs:                HashMap<String, Option<String>>,
    calls:                 Mutex<Vec<Call>>,
}

impl MockStepFunctions {
    /// A service with no state machines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a page to the state machine listing.
    pub fn with_state_machine_page(mut self, page: Page<StateMachineRef>) -> Self {
        self.state_machine_pages.push(page);
        self
    }

    /// Makes the state machine listing fail with `message` once the added
    /// pages are used up.
    pub fn failing_state_machine_listing(mut self, message: &str) -> Self {
        self.state_machine_failure = Some(message.to_owned());
        self
    }

    /// Appends a page of executions for `state_machine`.
    pub fn with_execution_page(
        mut self,
        state_machine: &StateMachineRef,
        page: Page<ExecutionSummary>,
    ) -> Self {
        self.execution_pages
            .entry(state_machine.clone())
            .or_default()
            .push(page);
        self
    }

    /// Sets the input returned when `execution_arn` is described.
    pub fn with_input(mut self, execution_arn: &str, input: Option<&str>) -> Self {
        self.inputs
            .insert(execution_arn.to_owned(), input.map(str::to_owned));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.log().clone()
    }

    /// The page tokens of every `ListStateMachines` call.
    pub fn state_machine_tokens(&self) -> Vec<Option<String>> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                Call::ListStateMachines(token) => Some(token.clone()),
                _ => None,
            })
            .collect()
    }

    /// The status filter and page token of every `ListExecutions` call.
    pub fn execution_requests(&self) -> Vec<(Option<ExecutionStatus>, Option<String>)> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                Call::ListExecutions {
                    status, next_token, ..
                } => Some((status.clone(), next_token.clone())),
                _ => None,
            })
            .collect()
    }

    /// The execution ARNs described so far, in order.
    pub fn described(&self) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                Call::DescribeExecution(arn) => Some(arn.clone()),
                _ => None,
            })
            .collect()
    }

    fn log(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Logs `call` and returns how many earlier calls listed the same thing.
    fn record(&self, call: Call) -> usize {
        let mut log = self.log();
        let index = log.iter().filter(|c| same_listing(c, &call)).count();
        log.push(call);
        index
    }
}

fn same_listing(a: &Call, b: &Call) -> bool {
    match (a, b) {
        (Call::ListStateMachines(_), Call::ListStateMachines(_)) => true,
        (
            Call::ListExecutions {
                state_machine: a, ..
            },
            Call::ListExecutions {
                state_machine: b, ..
            },
        ) => a == b,
        _ => false,
    }
}

#[async_trait]
impl StepFunctionsService for MockStepFunctions {
    async fn list_state_machines(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<StateMachineRef>> {
        let index = self.record(Call::ListStateMachines(next_token));
        match self.state_machine_pages.get(index) {
            Some(page) => Ok(page.clone()),
            None => match &self.state_machine_failure {
                Some(message) => Err(SfsError::AWS(message.clone())),
                None => Ok(Page::last(vec![])),
            },
        }
    }

    async fn list_executions(
        &self,
        state_machine: &StateMachineRef,
        status: Option<ExecutionStatus>,
        next_token: Option<String>,
    ) -> Result<Page<ExecutionSummary>> {
        let index = self.record(Call::ListExecutions {
            state_machine: state_machine.clone(),
            status: status.clone(),
            next_token,
        });
        let page = self
            .execution_pages
            .get(state_machine)
            .and_then(|pages| pages.get(index))
            .cloned()
            .unwrap_or_else(|| Page::last(vec![]));

        Ok(Page {
            items:      page
                .items
                .into_iter()
                .filter(|e| status.as_ref().map_or(true, |s| &e.status == s))
                .collect(),
            next_token: page.next_token,
        })
    }

    async fn describe_execution(&self, execution_arn: &str) -> Result<Option<String>> {
        self.record(Call::DescribeExecution(execution_arn.to_owned()));
        self.inputs.get(execution_arn).cloned().ok_or_else(|| {
            SfsError::AWS(format!("ExecutionDoesNotExist: {}", execution_arn))
        })
    }
}

/// Builds a listing entry whose ARN is `arn:exec:<name>`.
pub fn summary(name: &str, status: ExecutionStatus, start_date: DateTime<Utc>) -> ExecutionSummary {
    ExecutionSummary {
        execution_arn: execution_arn(name),
        name: name.to_owned(),
        status,
        start_date,
    }
}

/// The ARN [`summary`] gives the execution called `name`.
pub fn execution_arn(name: &str) -> String {
    format!("arn:exec:{}", name)
}
