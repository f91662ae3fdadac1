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

use crate::constants::{CLUSTER_ID_LENGTH, DSQL_HOSTNAME_MARKER, DSQL_HOSTNAME_SUFFIX};
use dsql_auth_core::{Error, Result};

/// Extract the region from a DSQL cluster hostname.
///
/// The hostname must look like `<cluster-id>.dsql.<region>.on.aws` where the
/// cluster id is exactly 26 characters. Any other shape is rejected with an
/// `InvalidArgument` error, it never yields a guessed region.
///
/// ```
/// use dsql_auth::parse_region;
///
/// let region = parse_region("24abtvxzzxzrrfaxyduobmpfea.dsql.us-east-1.on.aws").unwrap();
/// assert_eq!(region, "us-east-1");
/// ```
pub fn parse_region(hostname: &str) -> Result<String> {
    let min_len = CLUSTER_ID_LENGTH + DSQL_HOSTNAME_MARKER.len() + 1 + DSQL_HOSTNAME_SUFFIX.len();
    if hostname.len() < min_len {
        return Err(Error::invalid_argument(format!(
            "hostname {hostname:?} is too short to be a dsql cluster endpoint"
        )));
    }

    if hostname.find(DSQL_HOSTNAME_MARKER) != Some(CLUSTER_ID_LENGTH) {
        return Err(Error::invalid_argument(format!(
            "hostname {hostname:?} must start with a {CLUSTER_ID_LENGTH} character cluster id followed by {DSQL_HOSTNAME_MARKER:?}"
        )));
    }

    if !hostname.ends_with(DSQL_HOSTNAME_SUFFIX) {
        return Err(Error::invalid_argument(format!(
            "hostname {hostname:?} must end with {DSQL_HOSTNAME_SUFFIX:?}"
        )));
    }

    // Both bounds sit next to ASCII markers, so they are char boundaries.
    let start = CLUSTER_ID_LENGTH + DSQL_HOSTNAME_MARKER.len();
    let end = hostname.len() - DSQL_HOSTNAME_SUFFIX.len();
    match hostname.get(start..end) {
        Some(region) if !region.is_empty() => Ok(region.to_string()),
        _ => Err(Error::invalid_argument(format!(
            "hostname {hostname:?} does not contain a region"
        ))),
    }
}
