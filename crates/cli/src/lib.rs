//! `stockdesk` command line: loads a workspace snapshot and prints derived
//! views of it as JSON.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use stockdesk_core::{Money, ReportId};
use stockdesk_infra::reports::{DateRange, GeneratedReport};
use stockdesk_infra::{Config, Dashboard, Kpis, Period, ReportKind, Snapshot};
use stockdesk_inventory::{AlertSeverity, LowStockItem};

#[derive(Debug, Parser)]
#[command(name = "stockdesk")]
#[command(about = "Inventory dashboard over a JSON snapshot of the entity stores")]
#[command(version)]
pub struct Cli {
    /// Snapshot file with the entity stores
    #[arg(long, env = "STOCKDESK_SNAPSHOT", default_value = "stockdesk.json")]
    pub snapshot: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Header figures of every screen (default)
    Dashboard,

    /// Low-stock alert rows with their derived severity
    Alerts {
        /// Only rows of this severity (out-of-stock, critical, low, reorder)
        #[arg(long)]
        severity: Option<AlertSeverity>,
    },

    /// Generate a report entry for a period
    Report {
        /// Report slug, e.g. inventory-valuation
        kind: String,

        /// today, week, month, quarter or year
        #[arg(long, default_value = "month", conflicts_with_all = ["from", "to"])]
        period: String,

        /// Start of a custom range (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// End of a custom range (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
}

#[derive(Debug, Serialize)]
struct AlertRow<'a> {
    #[serde(flatten)]
    item: &'a LowStockItem,
    severity: AlertSeverity,
    stock_percentage: u32,
    reorder_cost: Money,
    days_stock_left: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ReportOutput {
    report: GeneratedReport,
    range: DateRange,
    kpis: Kpis,
}

pub fn run(cli: &Cli, config: &Config, now: DateTime<Utc>) -> anyhow::Result<Value> {
    let snapshot = Snapshot::load(&cli.snapshot)
        .with_context(|| format!("failed to load snapshot {}", cli.snapshot.display()))?;
    tracing::info!(
        path = %cli.snapshot.display(),
        items = snapshot.items.len(),
        orders = snapshot.orders.len(),
        "snapshot loaded"
    );
    execute(cli.command.as_ref().unwrap_or(&Command::Dashboard), &snapshot, config, now)
}

/// Run one command against an already loaded snapshot.
pub fn execute(
    command: &Command,
    snapshot: &Snapshot,
    config: &Config,
    now: DateTime<Utc>,
) -> anyhow::Result<Value> {
    let value = match command {
        Command::Dashboard => serde_json::to_value(Dashboard::compute(snapshot, config, now))?,
        Command::Alerts { severity } => {
            let rows: Vec<AlertRow<'_>> = snapshot
                .alerts
                .iter()
                .map(|item| AlertRow {
                    item,
                    severity: item.severity(config.thresholds),
                    stock_percentage: item.stock_percentage(),
                    reorder_cost: item.reorder_cost(),
                    days_stock_left: item.days_stock_left(),
                })
                .filter(|row| severity.is_none_or(|s| row.severity == s))
                .collect();
            serde_json::to_value(rows)?
        }
        Command::Report { kind, period, from, to } => {
            let period = match (from, to) {
                (Some(from), Some(to)) => Period::custom(*from, *to)?,
                _ => period.parse::<Period>()?,
            };
            let kind = ReportKind::new(kind.as_str());
            if !kind.is_known() {
                tracing::warn!(kind = %kind, "unrecognised report kind; generating a custom report");
            }
            let output = ReportOutput {
                report: GeneratedReport::new(ReportId::new(), kind, &period, now),
                range: period.range(now),
                kpis: Kpis::compute(&snapshot.items),
            };
            serde_json::to_value(output)?
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stockdesk_core::ItemId;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 9, 0, 0).unwrap()
    }

    fn alert(n: u128, current: i64) -> LowStockItem {
        LowStockItem {
            id: ItemId::from_u128(n),
            name: format!("Part {n}"),
            sku: format!("PRT-{n:03}"),
            category: "Widgets".into(),
            current_stock: current,
            reorder_point: 30,
            minimum_stock: 10,
            maximum_stock: 200,
            unit: "pcs".into(),
            unit_cost: Money::from_cents(1000),
            reorder_quantity: 100,
            preferred_supplier: "TechCorp Inc.".into(),
            lead_time_days: 7,
            location: "A-1-01".into(),
            last_updated: now(),
            average_daily_sales: 2.0,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            alerts: vec![alert(1, 0), alert(2, 8), alert(3, 25)],
            ..Snapshot::default()
        }
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["stockdesk", "--snapshot", "s.json", "alerts", "--severity", "critical"])
            .unwrap();
        assert_eq!(cli.snapshot, PathBuf::from("s.json"));
        assert!(matches!(
            cli.command,
            Some(Command::Alerts { severity: Some(AlertSeverity::Critical) })
        ));
        assert!(Cli::try_parse_from(["stockdesk", "report", "low-stock", "--from", "2024-11-01"]).is_err());
    }

    #[test]
    fn dashboard_is_the_default() {
        let value = execute(&Command::Dashboard, &snapshot(), &Config::default(), now()).unwrap();
        assert_eq!(value["alerts"]["total"], 3);
        assert_eq!(value["alerts"]["critical_count"], 2);
    }

    #[test]
    fn alerts_filter_by_severity() {
        let command = Command::Alerts { severity: Some(AlertSeverity::Critical) };
        let value = execute(&command, &snapshot(), &Config::default(), now()).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Part 2");
        assert_eq!(rows[0]["severity"], "critical");
        assert_eq!(rows[0]["days_stock_left"], 4);
    }

    #[test]
    fn report_for_custom_range() {
        let command = Command::Report {
            kind: "shrinkage".into(),
            period: "month".into(),
            from: NaiveDate::from_ymd_opt(2024, 10, 1),
            to: NaiveDate::from_ymd_opt(2024, 10, 31),
        };
        let value = execute(&command, &snapshot(), &Config::default(), now()).unwrap();
        assert_eq!(value["report"]["name"], "Shrinkage Analysis Report");
        assert_eq!(value["report"]["category"], "movement");
        assert_eq!(value["report"]["period"], "Custom Range");
        assert_eq!(value["range"]["from"], "2024-10-01");

        let bad = Command::Report { kind: "shrinkage".into(), period: "decade".into(), from: None, to: None };
        assert!(execute(&bad, &snapshot(), &Config::default(), now()).is_err());
    }
}
