//! Read-only views over one AWS account.
//!
//! `CloudDataSource` is the seam between the web layer and the provider:
//! handlers get the trait object from `AppContext` and never see the SDK.
//! `AwsDataSource` implements it over the official SDK crates, building a
//! fresh client from the session's keys on every call — no pooling, no
//! retries beyond SDK defaults, no pagination.

pub mod cost;
pub mod ec2;
pub mod iam;
pub mod s3;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region as SdkRegion, SdkConfig};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use cost::{CostCharts, ServiceCost};
pub use iam::IamUserRecord;

use crate::charts::Figure;

// ─── Credentials ──────────────────────────────────────────────────────────────

/// The regions the profile form offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "us-east-1")]
    UsEast1,
    #[serde(rename = "us-east-2")]
    UsEast2,
    #[serde(rename = "us-west-1")]
    UsWest1,
    #[serde(rename = "us-west-2")]
    UsWest2,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::UsEast1,
        Region::UsEast2,
        Region::UsWest1,
        Region::UsWest2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UsEast1 => "us-east-1",
            Region::UsEast2 => "us-east-2",
            Region::UsWest1 => "us-west-1",
            Region::UsWest2 => "us-west-2",
        }
    }

    pub fn parse(s: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials captured by the profile form, stored verbatim in the session.
/// Validity is only discovered when a provider call fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsKeys {
    pub access_key: String,
    pub secret_key: String,
    pub region: Region,
}

// ─── Errors ───────────────────────────────────────────────────────────────────

/// A provider call failed. Callers decide presentation; an empty account is
/// never reported through this type.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("compute listing failed: {0}")]
    Compute(String),
    #[error("storage listing failed: {0}")]
    Storage(String),
    #[error("cost query failed: {0}")]
    Cost(String),
    #[error("identity listing failed: {0}")]
    Identity(String),
}

// ─── Adapter seam ─────────────────────────────────────────────────────────────

#[async_trait]
pub trait CloudDataSource: Send + Sync {
    /// Compute instance health: Active vs Inactive pie, placeholder when the
    /// account has no instances.
    async fn compute_overview(&self, keys: &AwsKeys) -> Result<Figure, FetchError>;

    /// Storage bucket usage: In-Use vs Empty pie, placeholder when the
    /// account has no buckets.
    async fn storage_overview(&self, keys: &AwsKeys) -> Result<Figure, FetchError>;

    /// Spend grouped by service over `[start, end]`, monthly granularity.
    /// The caller guarantees `start <= end`.
    async fn cost_overview(
        &self,
        keys: &AwsKeys,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CostCharts, FetchError>;

    /// IAM users with attached-then-inline policy names, duplicates retained.
    async fn identity_inventory(&self, keys: &AwsKeys) -> Result<Vec<IamUserRecord>, FetchError>;
}

pub struct AwsDataSource;

impl AwsDataSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AwsDataSource {
    fn default() -> Self {
        Self::new()
    }
}

async fn sdk_config(keys: &AwsKeys) -> SdkConfig {
    let credentials = aws_sdk_ec2::config::Credentials::new(
        keys.access_key.clone(),
        keys.secret_key.clone(),
        None,
        None,
        "profile-form",
    );
    aws_config::defaults(BehaviorVersion::latest())
        .region(SdkRegion::new(keys.region.as_str()))
        .credentials_provider(credentials)
        .load()
        .await
}

#[async_trait]
impl CloudDataSource for AwsDataSource {
    async fn compute_overview(&self, keys: &AwsKeys) -> Result<Figure, FetchError> {
        let cfg = sdk_config(keys).await;
        ec2::compute_overview(&cfg).await
    }

    async fn storage_overview(&self, keys: &AwsKeys) -> Result<Figure, FetchError> {
        let cfg = sdk_config(keys).await;
        s3::storage_overview(&cfg).await
    }

    async fn cost_overview(
        &self,
        keys: &AwsKeys,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CostCharts, FetchError> {
        let cfg = sdk_config(keys).await;
        cost::cost_overview(&cfg, start, end).await
    }

    async fn identity_inventory(&self, keys: &AwsKeys) -> Result<Vec<IamUserRecord>, FetchError> {
        let cfg = sdk_config(keys).await;
        iam::identity_inventory(&cfg).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_roundtrip() {
        for region in Region::ALL {
            assert_eq!(Region::parse(region.as_str()), Some(region));
        }
        assert_eq!(Region::parse("eu-west-1"), None);
        assert_eq!(Region::parse(""), None);
    }
}
