//! Terminal output for the coverage summary

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::Colorize;
use onboard_lib::CoverageSummary;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for the terminal summary
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    summary: &'a CoverageSummary,
}

/// Print the coverage summary in the requested format
pub fn print_summary(summary: &CoverageSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let document = SummaryDocument {
                generated_at: Utc::now(),
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Table => {
            println!("{}", "Onboarding Coverage".bold());
            let table = Table::new(summary_rows(summary))
                .with(Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}

fn summary_rows(summary: &CoverageSummary) -> Vec<SummaryRow> {
    vec![
        SummaryRow {
            metric: "Clusters",
            value: summary.total_clusters.to_string(),
        },
        SummaryRow {
            metric: "Clusters with agent",
            value: summary.agent_connected_clusters.to_string(),
        },
        SummaryRow {
            metric: "Clusters with runtime",
            value: summary.runtime_enabled_clusters.to_string(),
        },
        SummaryRow {
            metric: "Total nodes",
            value: summary.total_nodes.to_string(),
        },
        SummaryRow {
            metric: "Nodes connected",
            value: summary.nodes_connected.to_string(),
        },
        SummaryRow {
            metric: "Node coverage",
            value: color_coverage(summary.node_coverage_percent),
        },
        SummaryRow {
            metric: "Hosts",
            value: summary.total_hosts.to_string(),
        },
        SummaryRow {
            metric: "Kubernetes hosts",
            value: summary.kubernetes_hosts.to_string(),
        },
        SummaryRow {
            metric: "Connected hosts",
            value: summary.connected_hosts.to_string(),
        },
    ]
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a percentage with one decimal
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Color coverage based on value
pub fn color_coverage(percent: f64) -> String {
    let formatted = format_percent(percent);
    if percent >= 90.0 {
        formatted.green().to_string()
    } else if percent >= 50.0 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(66.666), "66.7%");
        assert_eq!(format_percent(100.0), "100.0%");
    }

    #[test]
    fn test_summary_rows_cover_every_metric() {
        let summary = CoverageSummary {
            total_clusters: 2,
            total_hosts: 7,
            ..Default::default()
        };
        let rows = summary_rows(&summary);

        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0].value, "2");
        assert_eq!(rows[6].value, "7");
    }
}
