//! Chart-ready figure objects.
//!
//! Figures serialize to the subset of the Plotly JSON schema the dashboard
//! pages embed (`data` traces + `layout`). A *placeholder* figure carries no
//! traces and a single centred annotation; it stands in wherever a listing
//! came back empty so the page never plots zero-length arrays.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
        marker: Marker,
    },
    Bar {
        name: String,
        x: Vec<String>,
        y: Vec<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        marker: Option<Marker>,
    },
}

/// Trace coloring. Pie traces use `colors` (one per slice), bar traces use
/// `color` (one per bar) — Plotly's naming, kept as-is.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Marker {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub color: Vec<String>,
}

impl Marker {
    pub fn pie(colors: &[&str]) -> Self {
        Self {
            colors: colors.iter().map(|c| c.to_string()).collect(),
            color: Vec::new(),
        }
    }

    pub fn bars(color: Vec<String>) -> Self {
        Self {
            colors: Vec::new(),
            color,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub showarrow: bool,
    pub font: Font,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AxisTitle {
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<AxisTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<AxisTitle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Layout {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// Annotation-only figure shown in place of an empty data set.
    pub fn placeholder(text: &str) -> Self {
        Self {
            data: Vec::new(),
            layout: Layout {
                annotations: vec![Annotation {
                    text: text.to_string(),
                    showarrow: false,
                    font: Font { size: 20 },
                }],
                ..Default::default()
            },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.data.is_empty() && !self.layout.annotations.is_empty()
    }

    /// JSON the page hands to `Plotly.newPlot`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_has_no_traces() {
        let fig = Figure::placeholder("No Data Available");
        assert!(fig.is_placeholder());
        assert!(fig.data.is_empty());
        assert_eq!(fig.layout.annotations[0].text, "No Data Available");
    }

    #[test]
    fn pie_serializes_plotly_shape() {
        let fig = Figure {
            data: vec![Trace::Pie {
                labels: vec!["Active".into(), "Inactive".into()],
                values: vec![3.0, 2.0],
                marker: Marker::pie(&["#FF9900", "#FFCC80"]),
            }],
            layout: Layout::titled("EC2 Instances Overview"),
        };
        let json: serde_json::Value = serde_json::from_str(&fig.to_json()).unwrap();
        assert_eq!(json["data"][0]["type"], "pie");
        assert_eq!(json["data"][0]["labels"][0], "Active");
        assert_eq!(json["data"][0]["marker"]["colors"][1], "#FFCC80");
        assert_eq!(json["layout"]["title"], "EC2 Instances Overview");
        // Pie markers never carry the bar-style `color` key.
        assert!(json["data"][0]["marker"].get("color").is_none());
    }

    #[test]
    fn bar_marker_is_optional() {
        let fig = Figure {
            data: vec![Trace::Bar {
                name: "Total Cost".into(),
                x: vec!["Total".into()],
                y: vec![12.5],
                marker: None,
            }],
            layout: Layout::default(),
        };
        let json: serde_json::Value = serde_json::from_str(&fig.to_json()).unwrap();
        assert_eq!(json["data"][0]["type"], "bar");
        assert!(json["data"][0].get("marker").is_none());
    }
}
