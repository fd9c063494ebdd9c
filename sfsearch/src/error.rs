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

//! sfsearch error types

use std::error;
use std::fmt::{Display, Formatter};
use std::io;
use std::result;

use rusoto_core::region::ParseRegionError;
use rusoto_core::RusotoError;

/// Result type for operations that could result in an [SfsError]
pub type Result<T> = result::Result<T, SfsError>;

/// sfsearch error
#[derive(Debug)]
pub enum SfsError {
    /// Error returned when a call to AWS Step Functions fails. This covers
    /// transport failures, missing or rejected credentials and service-side
    /// errors alike.
    AWS(String),
    /// Error returned when a response from the service does not have the
    /// shape we rely on, e.g. a start date that is not a valid instant.
    MalformedResponse(String),
    /// Error returned when the settings or command line options are invalid.
    Config(String),
    /// Error returned when serde_json failed to serialize or deserialize data.
    SerdeJson(serde_json::Error),
    /// Error associated to I/O operations and associated traits.
    IoError(io::Error),
    /// Error returned as a consequence of an error in sfsearch.
    /// This error should not happen in normal usage.
    Internal(String),
}

impl SfsError {
    /// Returns true if the error came from talking to the remote service,
    /// as opposed to a response that was received but could not be used.
    pub fn is_transport(&self) -> bool {
        matches!(self, SfsError::AWS(_))
    }
}

impl<E: error::Error + 'static> From<RusotoError<E>> for SfsError {
    fn from(e: RusotoError<E>) -> Self {
        SfsError::AWS(e.to_string())
    }
}

impl From<io::Error> for SfsError {
    fn from(e: io::Error) -> Self {
        SfsError::IoError(e)
    }
}

impl From<serde_json::Error> for SfsError {
    fn from(e: serde_json::Error) -> Self {
        SfsError::SerdeJson(e)
    }
}

impl From<ParseRegionError> for SfsError {
    fn from(e: ParseRegionError) -> Self {
        SfsError::Config(e.to_string())
    }
}

impl From<ini::Error> for SfsError {
    fn from(e: ini::Error) -> Self {
        SfsError::Config(e.to_string())
    }
}

impl From<ini::ParseError> for SfsError {
    fn from(e: ini::ParseError) -> Self {
        SfsError::Config(e.to_string())
    }
}

impl Display for SfsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            SfsError::AWS(ref desc) => write!(f, "AWS error: {}", desc),
            SfsError::MalformedResponse(ref desc) => {
                write!(f, "Malformed response from AWS Step Functions: {}", desc)
            }
            SfsError::Config(ref desc) => write!(f, "Configuration error: {}", desc),
            SfsError::SerdeJson(ref desc) => write!(f, "serde_json error: {:?}", desc),
            SfsError::IoError(ref desc) => write!(f, "IO error: {}", desc),
            SfsError::Internal(ref desc) => write!(
                f,
                "Internal error: {}. This was likely caused by a bug in sfsearch's \
                    code and we would welcome that you file a bug report",
                desc
            ),
        }
    }
}

impl error::Error for SfsError {}
