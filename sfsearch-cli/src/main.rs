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

//! sfsearch reports the recent executions of AWS Step Functions state
//! machines.

mod args;

use anyhow::Result;
use args::Opt;
use log::info;
use sfsearch::prelude::*;
use std::io::{self, Write};
use structopt::StructOpt;

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> Result<()> {
    let opt = Opt::from_args();
    opt.logging().init();

    let config = match &opt.config {
        Some(path) => SfsConfig::with_overrides(path)?,
        None => SfsConfig::embedded()?,
    };
    let aws = AwsConfig::resolve(opt.region.as_deref())?.with_max_results(config.max_results);
    info!("Using region {}", aws.region.name());

    let service = RusotoStepFunctions::new(&aws);
    run(&opt, &config, &service, &mut io::stdout()).await
}

/// Resolves the state machines to report on, scans each one in turn and
/// writes the report to `out`.
async fn run<S, W>(opt: &Opt, config: &SfsConfig, service: &S, out: &mut W) -> Result<()>
where
    S: StepFunctionsService + ?Sized,
    W: Write,
{
    let hours = opt.hours.unwrap_or(config.default_hours);
    let filter = opt.input_filter();
    let options = ScanOptions::new(hours)?
        .with_status(opt.status.clone())
        .with_filter(filter.clone())
        .with_json_indent(config.json_indent);

    let state_machines = match &opt.state_machine {
        Some(arn) => vec![StateMachineRef::from(arn.as_str())],
        None => list_state_machines(service).await?,
    };

    let format = ReportFormat::from(config);
    format.write_preamble(out, &opt.status, hours, &filter, opt.region.as_deref())?;

    for state_machine in &state_machines {
        let records = scan_executions(service, state_machine, &options).await?;
        info!("{} executions kept for {}", records.len(), state_machine);
        format.write_state_machine(out, state_machine, &records)?;
    }
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sfsearch::test_util::{execution_arn, summary, Call, MockStepFunctions};

    fn opt(args: &[&str]) -> Opt {
        Opt::from_iter_safe(std::iter::once("sfsearch").chain(args.iter().copied())).unwrap()
    }

    async fn report(opt: &Opt, service: &MockStepFunctions) -> Result<String> {
        let mut out = vec![];
        run(opt, &SfsConfig::embedded()?, service, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn explicit_state_machine_skips_discovery() -> Result<()> {
        let sm = StateMachineRef::from("arn:sm:orders");
        let mock = MockStepFunctions::new()
            .with_state_machine_page(Page::last(vec!["arn:sm:other".into()]))
            .with_execution_page(
                &sm,
                Page::last(vec![summary(
                    "run-1",
                    ExecutionStatus::Succeeded,
                    Utc::now() - Duration::hours(1),
                )]),
            )
            .with_input(&execution_arn("run-1"), Some("<binary>"));

        let text = report(&opt(&["--state-machine", "arn:sm:orders"]), &mock).await?;

        assert!(text.starts_with("\nFetching ALL executions from the last 24 hours...\n"));
        assert!(text.contains("\nState Machine: arn:sm:orders\n"));
        assert!(text.contains(&format!("{}\n", "-".repeat(80))));
        assert!(text.contains("Name: run-1\nStatus: SUCCEEDED\nStart Date: "));
        assert!(text.ends_with(&format!("Input:\n<binary>\n{}\n", "-".repeat(40))));
        assert!(!mock
            .calls()
            .iter()
            .any(|call| matches!(call, Call::ListStateMachines(_))));
        Ok(())
    }

    #[tokio::test]
    async fn discovered_state_machines_without_matches_print_nothing() -> Result<()> {
        let mock = MockStepFunctions::new().with_state_machine_page(Page::last(vec![
            "arn:sm:a".into(),
            "arn:sm:b".into(),
        ]));

        let text = report(
            &opt(&["--hours", "6", "--status", "FAILED", "--name", "job-a"]),
            &mock,
        )
        .await?;

        assert_eq!(
            text,
            "\nFetching FAILED executions from the last 6 hours...\n\
             Filtering for name = 'job-a'\n"
        );
        assert_eq!(
            mock.execution_requests(),
            vec![
                (Some(ExecutionStatus::Failed), None),
                (Some(ExecutionStatus::Failed), None)
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn zero_hours_fails() {
        let mock = MockStepFunctions::new();
        let result = report(&opt(&["--hours", "0"]), &mock).await;
        assert!(result.is_err());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn service_errors_reach_the_caller() {
        let mock = MockStepFunctions::new().failing_state_machine_listing("AccessDenied");
        let err = report(&opt(&[]), &mock).await.unwrap_err();
        assert_eq!(err.to_string(), "AWS error: AccessDenied");
    }
}
