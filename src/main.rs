use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use loadwatch::acwr::AcwrCalculator;
use loadwatch::config::CONFIG_KEYS;
use loadwatch::logging::init_logging;
use loadwatch::{
    achievement_badges, compliance_rate, compute_athlete_risk_indicators, days_lost, load_trend,
    personal_records, radar_data, readiness_heatmap, readiness_summary, summarize_injuries,
    synthesize_risk_flags, training_streaks, week_over_week, AppConfig, Athlete, Dataset,
    FlagSeverity, LoadZone, LoadZoneClassifier, LoadwatchError, LogLevel, RiskLevel,
    ThresholdSettings, TrendScope,
};

/// loadwatch - Athlete Workload Risk CLI
///
/// Computes acute:chronic workload ratios, load zones, week-over-week changes,
/// compliance and performance records from a JSON dataset export.
#[derive(Parser)]
#[command(name = "loadwatch")]
#[command(version)]
#[command(about = "Athlete workload risk analytics", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Dataset file (JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    data: Option<PathBuf>,

    /// Reference day for all windows (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "DATE", global = true)]
    as_of: Option<NaiveDate>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ACWR risk snapshot for every athlete
    Risk,

    /// Training load trend for the team or one athlete
    Trend {
        /// Athlete ID (team average when omitted)
        #[arg(short, long)]
        athlete: Option<String>,

        /// Days to look back (default: thresholds.default_days)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Daily load zones relative to the athlete's own history
    Zones {
        #[arg(short, long)]
        athlete: String,
    },

    /// This week against last week
    Week {
        /// Athlete ID (whole team when omitted)
        #[arg(short, long)]
        athlete: Option<String>,
    },

    /// Session compliance against weekly and monthly targets
    Compliance {
        #[arg(short, long)]
        athlete: String,
    },

    /// Active risk alerts for one athlete
    Flags {
        #[arg(short, long)]
        athlete: String,
    },

    /// Personal records from testing sessions
    Records {
        #[arg(short, long)]
        athlete: String,
    },

    /// Normalized testing scores, this period against the last
    Radar {
        #[arg(short, long)]
        athlete: String,
    },

    /// Consecutive training day streaks
    Streaks {
        #[arg(short, long)]
        athlete: String,
    },

    /// Achievement badges and progress
    Badges {
        #[arg(short, long)]
        athlete: String,
    },

    /// Injury counts and days lost
    Injuries {
        /// Athlete ID (whole squad when omitted)
        #[arg(short, long)]
        athlete: Option<String>,
    },

    /// Readiness summary and heatmap
    Wellness {
        #[arg(short, long)]
        athlete: String,

        /// Days to look back (default: thresholds.default_days)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (key=value)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

#[derive(Tabled)]
struct RiskRow {
    #[tabled(rename = "Athlete")]
    athlete: String,
    #[tabled(rename = "Acute")]
    acute: i64,
    #[tabled(rename = "Chronic")]
    chronic: i64,
    #[tabled(rename = "ACWR")]
    acwr: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Injuries")]
    injuries: u32,
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Date")]
    date: NaiveDate,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "RPE")]
    rpe: String,
    #[tabled(rename = "Sessions")]
    sessions: u32,
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Date")]
    date: NaiveDate,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Zone")]
    zone: LoadZone,
}

#[derive(Tabled)]
struct WeekRow {
    #[tabled(rename = "")]
    measure: &'static str,
    #[tabled(rename = "This week")]
    current: String,
    #[tabled(rename = "Last week")]
    previous: String,
    #[tabled(rename = "Change")]
    change: String,
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Best")]
    value: String,
    #[tabled(rename = "Date")]
    date: NaiveDate,
    #[tabled(rename = "Recent")]
    recent: &'static str,
}

#[derive(Tabled)]
struct RadarRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Current")]
    current: i64,
    #[tabled(rename = "Previous")]
    previous: i64,
}

#[derive(Tabled)]
struct BadgeRow {
    #[tabled(rename = "Badge")]
    title: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Earned")]
    earned: &'static str,
}

#[derive(Tabled)]
struct InjuryRow {
    #[tabled(rename = "Injury")]
    id: String,
    #[tabled(rename = "Athlete")]
    athlete: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Occurred")]
    occurred: NaiveDate,
    #[tabled(rename = "Days lost")]
    days_lost: u32,
}

#[derive(Tabled)]
struct HeatmapRow {
    #[tabled(rename = "Date")]
    date: NaiveDate,
    #[tabled(rename = "Readiness")]
    readiness: String,
    #[tabled(rename = "Band")]
    band: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    init_logging(&log_config)?;

    let as_of = cli.as_of.unwrap_or_else(|| Utc::now().date_naive());
    tracing::debug!(%as_of, "Reference day");

    match &cli.command {
        Commands::Config { list, set, get } => {
            manage_config(&mut config, cli.config.clone(), *list, set.as_deref(), get.as_deref())
        }
        command => {
            let dataset = load_dataset(cli.data.as_ref())?;
            run_report(command, &dataset, &config.thresholds, as_of, cli.json)
        }
    }
}

/// Run one analytics subcommand against a loaded dataset
fn run_report(
    command: &Commands,
    dataset: &Dataset,
    settings: &ThresholdSettings,
    as_of: NaiveDate,
    json: bool,
) -> Result<()> {
    match command {
        Commands::Risk => {
            let indicators = compute_athlete_risk_indicators(
                &dataset.athletes,
                &dataset.loads,
                &dataset.injuries,
                settings,
                as_of,
            );
            if json {
                return print_json(&indicators);
            }

            println!("{}", format!("Workload risk as of {}", as_of).bold());
            let rows: Vec<RiskRow> = indicators
                .iter()
                .map(|i| RiskRow {
                    athlete: i.athlete_name.clone(),
                    acute: i.acute_load,
                    chronic: i.chronic_load,
                    acwr: i.acwr.to_string(),
                    risk: i.risk_level.to_string(),
                    trend: i.load_trend.to_string(),
                    injuries: i.active_injuries,
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));

            for indicator in indicators.iter().filter(|i| i.risk_level != RiskLevel::Low) {
                let line = format!(
                    "{} ({}): {}",
                    indicator.athlete_name,
                    indicator.acwr,
                    indicator.risk_level.recommendation()
                );
                match indicator.risk_level {
                    RiskLevel::High => println!("{}", line.red().bold()),
                    _ => println!("{}", line.yellow()),
                }
            }
        }

        Commands::Trend { athlete, days } => {
            let scope = match athlete.as_deref() {
                Some(id) => {
                    require_athlete(dataset, id)?;
                    TrendScope::Athlete(id)
                }
                None => TrendScope::Team,
            };
            let days = days.unwrap_or(settings.default_days);
            let trend = load_trend(&dataset.loads, scope, as_of, days);
            if json {
                return print_json(&trend);
            }

            if trend.is_empty() {
                println!("{}", "No sessions in the selected window".dimmed());
                return Ok(());
            }
            let rows: Vec<TrendRow> = trend
                .iter()
                .map(|p| TrendRow {
                    date: p.date,
                    load: p.training_load.to_string(),
                    rpe: p.rpe.to_string(),
                    sessions: p.session_count,
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Commands::Zones { athlete } => {
            let athlete = require_athlete(dataset, athlete)?;
            let result = LoadZoneClassifier::load_zones(&dataset.loads, &athlete.id, settings, as_of);
            if json {
                return print_json(&result);
            }

            println!("{}", format!("Load zones for {}", athlete.name).bold());
            let rows: Vec<ZoneRow> = result
                .days
                .iter()
                .map(|d| ZoneRow {
                    date: d.date,
                    load: d.training_load.to_string(),
                    zone: d.zone,
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));

            let counts: Vec<String> = LoadZone::ALL
                .iter()
                .map(|z| format!("{}: {}", z, result.count(*z)))
                .collect();
            println!("{}", counts.join("  "));
            if result.danger_streak > 0 {
                println!(
                    "{}",
                    format!("{} consecutive day(s) in the danger zone", result.danger_streak)
                        .red()
                        .bold()
                );
            }
        }

        Commands::Week { athlete } => {
            let (entries, checkins) = match athlete.as_deref() {
                Some(id) => {
                    require_athlete(dataset, id)?;
                    (dataset.entries_for(id), dataset.checkins_for(id))
                }
                None => (dataset.loads.clone(), dataset.wellness.clone()),
            };
            let wow = week_over_week(&entries, &checkins, settings, as_of);
            if json {
                return print_json(&wow);
            }

            let change = |p: Option<i64>| p.map_or("-".to_string(), |p| format!("{:+}%", p));
            let readiness = |r: Option<i64>| r.map_or("-".to_string(), |r| r.to_string());
            let rows = vec![
                WeekRow {
                    measure: "Sessions",
                    current: wow.current_week.sessions.to_string(),
                    previous: wow.previous_week.sessions.to_string(),
                    change: change(wow.changes.sessions_percent),
                },
                WeekRow {
                    measure: "Load",
                    current: wow.current_week.total_load.to_string(),
                    previous: wow.previous_week.total_load.to_string(),
                    change: change(wow.changes.load_percent),
                },
                WeekRow {
                    measure: "Avg RPE",
                    current: wow.current_week.avg_rpe.to_string(),
                    previous: wow.previous_week.avg_rpe.to_string(),
                    change: change(wow.changes.rpe_percent),
                },
                WeekRow {
                    measure: "Avg readiness",
                    current: readiness(wow.current_week.avg_readiness),
                    previous: readiness(wow.previous_week.avg_readiness),
                    change: change(wow.changes.readiness_percent),
                },
            ];
            println!("{}", Table::new(rows).with(Style::rounded()));
            if wow.load_spike_alert {
                println!(
                    "{}",
                    format!("Load spike: weekly load up more than {}%", settings.load_spike_percent)
                        .red()
                        .bold()
                );
            }
        }

        Commands::Compliance { athlete } => {
            let athlete = require_athlete(dataset, athlete)?;
            let rate = compliance_rate(&dataset.entries_for(&athlete.id), as_of);
            if json {
                return print_json(&rate);
            }

            println!("{}", format!("Compliance for {}", athlete.name).bold());
            println!(
                "  Last 7 days:  {}/{} sessions ({}%)",
                rate.weekly_actual, rate.weekly_target, rate.weekly_percent
            );
            println!(
                "  Last 30 days: {}/{} sessions ({}%)",
                rate.monthly_actual, rate.monthly_target, rate.monthly_percent
            );
        }

        Commands::Flags { athlete } => {
            let athlete = require_athlete(dataset, athlete)?;
            let indicator = AcwrCalculator::with_settings(settings.clone()).indicator_for(
                athlete,
                &dataset.loads,
                &dataset.injuries,
                as_of,
            );
            let flags = synthesize_risk_flags(
                &indicator,
                &dataset.checkins_for(&athlete.id),
                &dataset.entries_for(&athlete.id),
                settings,
                as_of,
            );
            if json {
                return print_json(&flags);
            }

            if flags.is_empty() {
                println!("{}", format!("No active alerts for {}", athlete.name).green());
            }
            for flag in &flags {
                let heading = format!("[{}] {}", flag.severity, flag.title);
                match flag.severity {
                    FlagSeverity::Danger => println!("{}", heading.red().bold()),
                    FlagSeverity::Warning => println!("{}", heading.yellow().bold()),
                }
                println!("  {}", flag.message);
            }
        }

        Commands::Records { athlete } => {
            let athlete = require_athlete(dataset, athlete)?;
            let records = personal_records(
                &dataset.trials_for(&athlete.id),
                &dataset.metrics,
                &athlete.id,
                as_of,
            );
            if json {
                return print_json(&records);
            }

            let rows: Vec<RecordRow> = records
                .iter()
                .map(|r| RecordRow {
                    metric: r.metric_name.clone().unwrap_or_else(|| r.metric_id.clone()),
                    value: match &r.unit {
                        Some(unit) => format!("{} {}", r.value, unit),
                        None => r.value.to_string(),
                    },
                    date: r.date,
                    recent: if r.is_recent { "yes" } else { "" },
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Commands::Radar { athlete } => {
            let athlete = require_athlete(dataset, athlete)?;
            let radar = radar_data(&dataset.trials, &dataset.metrics, &athlete.id, as_of);
            if json {
                return print_json(&radar);
            }

            let rows: Vec<RadarRow> = radar
                .iter()
                .map(|p| RadarRow {
                    metric: p.metric_name.clone().unwrap_or_else(|| p.metric_id.clone()),
                    current: p.current,
                    previous: p.previous,
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Commands::Streaks { athlete } => {
            let athlete = require_athlete(dataset, athlete)?;
            let streaks = training_streaks(&dataset.entries_for(&athlete.id), as_of);
            if json {
                return print_json(&streaks);
            }

            println!("{}", format!("Training streaks for {}", athlete.name).bold());
            println!("  Current: {} day(s)", streaks.current_streak);
            println!("  Longest: {} day(s)", streaks.longest_streak);
        }

        Commands::Badges { athlete } => {
            let athlete = require_athlete(dataset, athlete)?;
            let records = personal_records(
                &dataset.trials_for(&athlete.id),
                &dataset.metrics,
                &athlete.id,
                as_of,
            );
            let badges = achievement_badges(
                &dataset.entries_for(&athlete.id),
                &dataset.checkins_for(&athlete.id),
                &records,
                as_of,
            );
            if json {
                return print_json(&badges);
            }

            let rows: Vec<BadgeRow> = badges
                .iter()
                .map(|b| BadgeRow {
                    title: b.title.clone(),
                    progress: format!("{}/{}", b.progress, b.target),
                    earned: if b.earned { "yes" } else { "" },
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Commands::Injuries { athlete } => {
            if let Some(id) = athlete.as_deref() {
                require_athlete(dataset, id)?;
            }
            let summary = summarize_injuries(&dataset.injuries, athlete.as_deref(), as_of);
            if json {
                return print_json(&summary);
            }

            let injuries = match athlete.as_deref() {
                Some(id) => dataset.injuries_for(id),
                None => dataset.injuries.clone(),
            };
            let rows: Vec<InjuryRow> = injuries
                .iter()
                .map(|i| InjuryRow {
                    id: i.id.clone(),
                    athlete: dataset
                        .athlete_name(&i.athlete_id)
                        .unwrap_or(i.athlete_id.as_str())
                        .to_string(),
                    status: format!("{:?}", i.status).to_lowercase(),
                    occurred: i.date_occurred,
                    days_lost: days_lost(i, as_of),
                })
                .collect();
            if !rows.is_empty() {
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
            println!(
                "Active: {}  Rehab: {}  Monitoring: {}  Resolved: {}",
                summary.active, summary.rehab, summary.monitoring, summary.resolved
            );
            println!("Total days lost: {}", summary.total_days_lost);
            if summary.currently_unavailable > 0 {
                println!(
                    "{}",
                    format!("{} athlete(s) currently unavailable", summary.currently_unavailable)
                        .red()
                );
            }
        }

        Commands::Wellness { athlete, days } => {
            let athlete = require_athlete(dataset, athlete)?;
            let days = days.unwrap_or(settings.default_days);
            let checkins = dataset.checkins_for(&athlete.id);
            let summary = readiness_summary(&checkins, as_of, days);
            let heatmap = readiness_heatmap(&checkins, as_of, days);
            if json {
                return print_json(&serde_json::json!({
                    "summary": summary,
                    "heatmap": heatmap,
                }));
            }

            println!("{}", format!("Readiness for {}", athlete.name).bold());
            let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
            println!(
                "  Average: {}  Latest: {}  Trend: {}  Check-ins: {}",
                or_dash(summary.average.map(|a| a.to_string())),
                or_dash(summary.latest.map(|l| l.to_string())),
                summary.trend,
                summary.checkin_count
            );
            let rows: Vec<HeatmapRow> = heatmap
                .iter()
                .map(|c| HeatmapRow {
                    date: c.date,
                    readiness: or_dash(c.readiness.map(|r| r.to_string())),
                    band: or_dash(c.band.map(|b| b.to_string())),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        // handled before the dataset is loaded
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn load_dataset(path: Option<&PathBuf>) -> Result<Dataset> {
    let path = path.context("No dataset given. Pass --data <FILE>")?;
    Dataset::load_from_file(path).map_err(|e| {
        tracing::error!(error = %e, "Dataset could not be loaded");
        anyhow!(e.user_message())
    })
}

fn require_athlete<'a>(dataset: &'a Dataset, id: &str) -> Result<&'a Athlete> {
    dataset
        .require_athlete(id)
        .map_err(|e| anyhow!(LoadwatchError::from(e).user_message()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn manage_config(
    config: &mut AppConfig,
    path: Option<PathBuf>,
    list: bool,
    set: Option<&str>,
    get: Option<&str>,
) -> Result<()> {
    if list {
        println!("{}", "Configuration:".bold());
        for key in CONFIG_KEYS {
            println!("  {} = {}", key, config.get_value(key).unwrap_or_default());
        }
    } else if let Some(key_value) = set {
        let (key, value) = key_value
            .split_once('=')
            .context("Expected key=value")?;
        config.set_value(key.trim(), value.trim())?;

        let path = path.unwrap_or_else(AppConfig::default_config_path);
        config.save_to_file(&path)?;
        println!("{}", format!("Set {} = {}", key.trim(), value.trim()).green());
    } else if let Some(key) = get {
        let value = config
            .get_value(key)
            .with_context(|| format!("Unknown configuration key: {}", key))?;
        println!("{}", value);
    } else {
        println!("Config file: {}", path.unwrap_or_else(AppConfig::default_config_path).display());
    }

    Ok(())
}
