//! Compute instance overview (EC2 DescribeInstances).

use aws_config::SdkConfig;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::InstanceStateName;
use tracing::debug;

use super::FetchError;
use crate::charts::{Figure, Layout, Marker, Trace};

// EC2 orange shades.
const EC2_COLORS: [&str; 2] = ["#FF9900", "#FFCC80"];

/// One DescribeInstances call; counts running vs total across reservations.
pub async fn compute_overview(cfg: &SdkConfig) -> Result<Figure, FetchError> {
    let client = aws_sdk_ec2::Client::new(cfg);
    let resp = client
        .describe_instances()
        .send()
        .await
        .map_err(|e| FetchError::Compute(format!("{}", DisplayErrorContext(&e))))?;

    let mut total = 0usize;
    let mut running = 0usize;
    for reservation in resp.reservations() {
        for instance in reservation.instances() {
            total += 1;
            if instance.state().and_then(|s| s.name()) == Some(&InstanceStateName::Running) {
                running += 1;
            }
        }
    }
    debug!(total, running, "described compute instances");

    Ok(compute_figure(total, running))
}

/// Two-slice Active/Inactive pie. Zero instances get the placeholder figure
/// instead of an empty pie.
pub fn compute_figure(total: usize, running: usize) -> Figure {
    if total == 0 {
        return Figure::placeholder("No Data Available");
    }
    Figure {
        data: vec![Trace::Pie {
            labels: vec!["Active".into(), "Inactive".into()],
            values: vec![running as f64, (total - running) as f64],
            marker: Marker::pie(&EC2_COLORS),
        }],
        layout: Layout::titled("EC2 Instances Overview"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_instances_yields_placeholder() {
        let fig = compute_figure(0, 0);
        assert!(fig.is_placeholder());
    }

    #[test]
    fn running_split_becomes_two_slices() {
        let fig = compute_figure(5, 3);
        assert!(!fig.is_placeholder());
        let Trace::Pie { labels, values, marker } = &fig.data[0] else {
            panic!("expected a pie trace");
        };
        assert_eq!(labels, &["Active", "Inactive"]);
        assert_eq!(values, &[3.0, 2.0]);
        assert_eq!(marker.colors.len(), 2);
    }

    #[test]
    fn all_stopped_still_charts() {
        let fig = compute_figure(4, 0);
        let Trace::Pie { values, .. } = &fig.data[0] else {
            panic!("expected a pie trace");
        };
        assert_eq!(values, &[0.0, 4.0]);
    }
}
