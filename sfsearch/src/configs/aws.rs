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

use crate::error::Result;
use rusoto_core::Region;

/// How to reach AWS Step Functions. Resolved once at start-up and handed to
/// the client, so nothing below the entry point reads the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AwsConfig {
    /// The region to send requests to.
    pub region:      Region,
    /// Page size for listing calls; `None` lets the service decide.
    pub max_results: Option<i64>,
}

impl AwsConfig {
    /// Resolves the region from an explicit override, falling back to the
    /// environment (`AWS_DEFAULT_REGION`, `AWS_REGION`, the profile, then
    /// `us-east-1`).
    ///
    /// # Arguments
    /// * `region` - A region name such as `eu-west-1`.
    pub fn resolve(region: Option<&str>) -> Result<Self> {
        let region = match region {
            Some(name) => name.parse::<Region>()?,
            None => Region::default(),
        };
        Ok(AwsConfig {
            region,
            max_results: None,
        })
    }

    /// Sets the page size for listing calls.
    pub fn with_max_results(mut self, max_results: Option<i64>) -> Self {
        self.max_results = max_results;
        self
    }
}
