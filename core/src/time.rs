// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use crate::{Error, Result};
use chrono::{TimeZone, Utc};

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Current time as nanoseconds since the unix epoch.
pub fn now_unix_nanos() -> Result<u64> {
    now()
        .timestamp_nanos_opt()
        .and_then(|v| u64::try_from(v).ok())
        .ok_or_else(|| Error::unexpected("system time is out of the representable range"))
}

/// Build a datetime from nanoseconds since the unix epoch.
///
/// Precision below one millisecond is dropped.
pub fn from_unix_nanos(nanos: u64) -> Result<DateTime> {
    let millis = i64::try_from(nanos / 1_000_000)
        .map_err(|_| Error::unexpected(format!("timestamp {nanos} is out of range")))?;

    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| Error::unexpected(format!("timestamp {nanos} is out of range")))
}

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}
