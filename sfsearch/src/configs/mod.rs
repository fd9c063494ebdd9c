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

//! Settings for sfsearch. The defaults are compiled in from `config.toml`;
//! an INI file given on the command line overrides individual keys.

mod aws;
pub use aws::AwsConfig;

use crate::error::{Result, SfsError};
use ini::Ini;
use std::path::Path;
use std::str::FromStr;

/// The embedded default settings.
pub const DEFAULT_CONFIG: &str = include_str!("./config.toml");

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfsConfig {
    /// Lookback window used when none is given explicitly.
    pub default_hours:    u32,
    /// Page size for listing calls; `None` lets the service decide.
    pub max_results:      Option<i64>,
    /// Width of the rule under each state machine header.
    pub rule_width:       usize,
    /// Width of the rule after each execution.
    pub item_rule_width:  usize,
    /// `chrono` format string for start dates.
    pub timestamp_format: String,
    /// Indentation, in spaces, of pretty printed JSON input.
    pub json_indent:      usize,
}

impl SfsConfig {
    /// Loads the embedded defaults.
    pub fn embedded() -> Result<Self> {
        Self::from_ini(&Ini::load_from_str(DEFAULT_CONFIG)?)
    }

    /// Loads the embedded defaults, then applies every key present in the
    /// INI file at `path`.
    pub fn with_overrides<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conf = Ini::load_from_str(DEFAULT_CONFIG)?;
        let overrides = Ini::load_from_file(path)?;
        for (sec, prop) in &overrides {
            for (key, value) in prop.iter() {
                conf.with_section(sec).set(key, value);
            }
        }
        Self::from_ini(&conf)
    }

    fn from_ini(conf: &Ini) -> Result<Self> {
        let max_results: i64 = value(conf, "aws", "max_results")?;
        let config = SfsConfig {
            default_hours:    value(conf, "scan", "default_hours")?,
            max_results:      if max_results > 0 {
                Some(max_results)
            } else {
                None
            },
            rule_width:       value(conf, "report", "rule_width")?,
            item_rule_width:  value(conf, "report", "item_rule_width")?,
            timestamp_format: value(conf, "report", "timestamp_format")?,
            json_indent:      value(conf, "report", "json_indent")?,
        };
        if config.default_hours == 0 {
            return Err(SfsError::Config(
                "[scan] default_hours must be a positive number of hours".to_string(),
            ));
        }
        Ok(config)
    }
}

fn value<T: FromStr>(conf: &Ini, section: &str, key: &str) -> Result<T> {
    let raw = conf
        .get_from(Some(section), key)
        .ok_or_else(|| SfsError::Config(format!("missing setting [{}] {}", section, key)))?;
    raw.parse::<T>().map_err(|_| {
        SfsError::Config(format!(
            "invalid value `{}` for setting [{}] {}",
            raw, section, key
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_defaults() -> Result<()> {
        let config = SfsConfig::embedded()?;
        assert_eq!(config.default_hours, 24);
        assert_eq!(config.max_results, None);
        assert_eq!(config.rule_width, 80);
        assert_eq!(config.item_rule_width, 40);
        assert_eq!(config.timestamp_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(config.json_indent, 4);
        Ok(())
    }

    #[test]
    fn file_overrides_single_keys() -> Result<()> {
        let path = std::env::temp_dir().join(format!("sfsearch-{}.ini", std::process::id()));
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "[aws]\nmax_results = 50\n[report]\njson_indent = 2")?;
        drop(file);

        let config = SfsConfig::with_overrides(&path);
        std::fs::remove_file(&path)?;
        let config = config?;

        assert_eq!(config.max_results, Some(50));
        assert_eq!(config.json_indent, 2);
        assert_eq!(config.default_hours, 24);
        Ok(())
    }

    fn defaults_with(from: &str, to: &str) -> Ini {
        Ini::load_from_str(&DEFAULT_CONFIG.replace(from, to)).unwrap()
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let conf = defaults_with("default_hours = 24", "default_hours = soon");
        match SfsConfig::from_ini(&conf) {
            Err(SfsError::Config(msg)) => assert!(msg.contains("default_hours")),
            other => panic!("unexpected result: {:?}", other),
        }

        let conf = defaults_with("default_hours = 24", "default_hours = 0");
        assert!(matches!(SfsConfig::from_ini(&conf), Err(SfsError::Config(_))));

        let conf = defaults_with("json_indent = 4", "");
        assert!(matches!(SfsConfig::from_ini(&conf), Err(SfsError::Config(_))));
    }

    #[test]
    fn missing_override_file_is_an_error() {
        assert!(matches!(
            SfsConfig::with_overrides("/nonexistent/sfsearch.ini"),
            Err(SfsError::Config(_))
        ));
    }
}
