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

#![warn(missing_docs, clippy::needless_borrow)]
#![allow(clippy::upper_case_acronyms)]

//! sfsearch lists the recent executions of AWS Step Functions state machines,
//! optionally narrowed by status, by a lookback window, and by fields of each
//! execution's JSON input.

pub mod aws;
pub mod configs;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod model;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod test_util;
