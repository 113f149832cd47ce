//! Storage bucket overview (S3 ListBuckets + per-bucket probe).

use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use tracing::debug;

use super::FetchError;
use crate::charts::{Figure, Layout, Marker, Trace};

// S3 green shades.
const S3_COLORS: [&str; 2] = ["#1D8102", "#A6DF8C"];

/// Lists all buckets, then probes each with a one-key listing to classify it
/// as in-use or empty. One round trip per bucket — O(n) against the account.
pub async fn storage_overview(cfg: &SdkConfig) -> Result<Figure, FetchError> {
    let client = aws_sdk_s3::Client::new(cfg);
    let resp = client
        .list_buckets()
        .send()
        .await
        .map_err(|e| FetchError::Storage(format!("{}", DisplayErrorContext(&e))))?;

    let buckets = resp.buckets();
    let total = buckets.len();
    let mut in_use = 0usize;
    for bucket in buckets {
        let Some(name) = bucket.name() else { continue };
        let listing = client
            .list_objects_v2()
            .bucket(name)
            .max_keys(1)
            .send()
            .await
            .map_err(|e| FetchError::Storage(format!("{}", DisplayErrorContext(&e))))?;
        if listing.key_count().unwrap_or(0) > 0 {
            in_use += 1;
        }
    }
    debug!(total, in_use, "probed storage buckets");

    Ok(storage_figure(total, in_use))
}

/// Two-slice In-Use/Empty pie; placeholder when the account has no buckets.
pub fn storage_figure(total: usize, in_use: usize) -> Figure {
    if total == 0 {
        return Figure::placeholder("No Data Available");
    }
    Figure {
        data: vec![Trace::Pie {
            labels: vec!["In-Use".into(), "Empty".into()],
            values: vec![in_use as f64, (total - in_use) as f64],
            marker: Marker::pie(&S3_COLORS),
        }],
        layout: Layout::titled("S3 Buckets Overview"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_buckets_yields_placeholder() {
        assert!(storage_figure(0, 0).is_placeholder());
    }

    #[test]
    fn in_use_split_becomes_two_slices() {
        let fig = storage_figure(7, 2);
        let Trace::Pie { labels, values, .. } = &fig.data[0] else {
            panic!("expected a pie trace");
        };
        assert_eq!(labels, &["In-Use", "Empty"]);
        assert_eq!(values, &[2.0, 5.0]);
    }
}
