//! Spend breakdown (Cost Explorer GetCostAndUsage).

use aws_config::SdkConfig;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::types::{DateInterval, Granularity, GroupDefinition, GroupDefinitionType};
use chrono::NaiveDate;
use rand::Rng;
use tracing::debug;

use super::FetchError;
use crate::charts::{AxisTitle, Figure, Layout, Marker, Trace};

const METRIC: &str = "UnblendedCost";

/// One service's unblended cost inside the queried window.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCost {
    pub service: String,
    pub amount: f64,
}

/// The two dashboard cost figures.
#[derive(Debug, Clone)]
pub struct CostCharts {
    /// Stacked bar per service.
    pub service_chart: Figure,
    /// Total vs average-monthly comparison.
    pub summary_chart: Figure,
}

/// Monthly-granularity cost query grouped by the SERVICE dimension.
/// `start <= end` is the caller's responsibility.
pub async fn cost_overview(
    cfg: &SdkConfig,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<CostCharts, FetchError> {
    let client = aws_sdk_costexplorer::Client::new(cfg);
    let period = DateInterval::builder()
        .start(start.format("%Y-%m-%d").to_string())
        .end(end.format("%Y-%m-%d").to_string())
        .build()
        .map_err(|e| FetchError::Cost(e.to_string()))?;
    let group_by = GroupDefinition::builder()
        .r#type(GroupDefinitionType::Dimension)
        .key("SERVICE")
        .build();

    let resp = client
        .get_cost_and_usage()
        .time_period(period)
        .granularity(Granularity::Monthly)
        .metrics(METRIC)
        .group_by(group_by)
        .send()
        .await
        .map_err(|e| FetchError::Cost(format!("{}", DisplayErrorContext(&e))))?;

    let mut groups = Vec::new();
    for by_time in resp.results_by_time() {
        for group in by_time.groups() {
            let Some(service) = group.keys().first() else {
                continue;
            };
            if service.is_empty() {
                continue;
            }
            // Entries without the metric are dropped; a reported zero is kept.
            let Some(amount) = group
                .metrics()
                .and_then(|m| m.get(METRIC))
                .and_then(|v| v.amount())
            else {
                continue;
            };
            groups.push(ServiceCost {
                service: service.clone(),
                amount: amount.parse::<f64>().unwrap_or(0.0),
            });
        }
    }
    debug!(groups = groups.len(), %start, %end, "fetched cost groups");

    Ok(cost_figures(&groups))
}

/// Builds the two cost figures from the grouped amounts.
///
/// Each service gets a random display color, so colors are not stable across
/// refreshes. The monthly average divides the window total by a flat 12
/// regardless of how many months the window actually spans — kept from the
/// original behavior.
pub fn cost_figures(groups: &[ServiceCost]) -> CostCharts {
    let services: Vec<String> = groups.iter().map(|g| g.service.clone()).collect();
    let costs: Vec<f64> = groups.iter().map(|g| g.amount).collect();
    let colors: Vec<String> = groups.iter().map(|_| random_color()).collect();

    let total: f64 = costs.iter().sum();
    let avg_monthly = if total > 0.0 { total / 12.0 } else { 0.0 };

    let service_chart = Figure {
        data: vec![Trace::Bar {
            name: "Service Costs".into(),
            x: services,
            y: costs,
            marker: Some(Marker::bars(colors)),
        }],
        layout: Layout {
            title: Some("Cost Analysis by Service".into()),
            barmode: Some("stack".into()),
            xaxis: Some(AxisTitle {
                title: "AWS Services".into(),
            }),
            yaxis: Some(AxisTitle {
                title: "Cost (USD)".into(),
            }),
            annotations: Vec::new(),
        },
    };

    let summary_chart = Figure {
        data: vec![
            Trace::Bar {
                name: "Total Cost".into(),
                x: vec!["Total".into()],
                y: vec![total],
                marker: None,
            },
            Trace::Bar {
                name: "Avg Monthly Cost".into(),
                x: vec!["Average".into()],
                y: vec![avg_monthly],
                marker: None,
            },
        ],
        layout: Layout {
            title: Some("Total and Average Monthly Costs".into()),
            barmode: Some("group".into()),
            xaxis: Some(AxisTitle {
                title: "Category".into(),
            }),
            yaxis: Some(AxisTitle {
                title: "Cost (USD)".into(),
            }),
            annotations: Vec::new(),
        },
    };

    CostCharts {
        service_chart,
        summary_chart,
    }
}

fn random_color() -> String {
    format!("#{:06x}", rand::thread_rng().gen_range(0..0x100_0000u32))
}
