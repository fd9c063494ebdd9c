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

use sfsearch::prelude::{InputFilter, StatusFilter};
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;

/// List AWS Step Functions executions in the last N hours
#[derive(Debug, Clone, StructOpt)]
#[structopt(name = "sfsearch")]
pub struct Opt {
    /// Number of hours to look back [default: 24]
    #[structopt(long)]
    pub hours:         Option<u32>,
    /// Specific state machine ARN (optional)
    #[structopt(long = "state-machine")]
    pub state_machine: Option<String>,
    /// Filter by execution status
    #[structopt(long, default_value = "ALL", possible_values = &StatusFilter::VARIANTS)]
    pub status:        StatusFilter,
    /// Filter by exact match of input name attribute
    #[structopt(long)]
    pub name:          Option<String>,
    /// Filter by substring in input key attribute
    #[structopt(long = "key-contains")]
    pub key_contains:  Option<String>,
    /// AWS region to use (defaults to configured region)
    #[structopt(long)]
    pub region:        Option<String>,
    /// Sets a custom config file
    #[structopt(short = "c", long, value_name = "FILE", parse(from_os_str))]
    pub config:        Option<PathBuf>,
    /// Log level
    #[structopt(
        short = "L",
        long = "log-level",
        default_value = "warn",
        possible_values = &["error", "warn", "info", "debug", "trace", "off"]
    )]
    pub log_level:     String,
    /// Log ultra-verbose (trace level) information
    #[structopt(long)]
    pub trace:         bool,
}

impl Opt {
    /// The input filters given on the command line.
    pub fn input_filter(&self) -> InputFilter {
        InputFilter {
            name:         self.name.clone(),
            key_contains: self.key_contains.clone(),
        }
    }

    /// The level logs are filtered at.
    pub fn level(&self) -> log::LevelFilter {
        if self.trace {
            return log::LevelFilter::Trace;
        }
        match self.log_level.as_str() {
            "error" => log::LevelFilter::Error,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Warn,
        }
    }

    /// A logger writing to stderr, so logs never mix with the report.
    pub fn logging(&self) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();
        let level = self.level();
        builder.filter(None, level);
        builder.filter_module("rusoto_core", log::LevelFilter::Warn.min(level));
        builder.filter_module("hyper", log::LevelFilter::Warn.min(level));
        builder.target(env_logger::Target::Stderr);

        if level == log::LevelFilter::Trace {
            builder.format_timestamp_secs();
        } else {
            builder.format(|f, record| {
                writeln!(
                    f,
                    "[{}] {}",
                    record.level().to_string().to_lowercase(),
                    record.args()
                )
            });
        }
        builder
    }
}
