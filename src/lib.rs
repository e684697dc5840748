// Library interface for loadwatch modules
// The CLI and integration tests both go through these exports

pub mod acwr;
pub mod badges;
pub mod compliance;
pub mod config;
pub mod dataset;
pub mod error;
pub mod flags;
pub mod injuries;
pub mod logging;
pub mod models;
pub mod records;
pub mod streaks;
pub mod trend;
pub mod validation;
pub mod weekly;
pub mod wellness;
pub mod window;
pub mod zones;

// Re-export commonly used types for convenience
pub use models::*;
pub use acwr::{compute_athlete_risk_indicators, AcwrCalculator, RiskIndicator, RiskLevel};
pub use badges::{achievement_badges, AchievementBadge};
pub use compliance::{compliance_rate, ComplianceRate};
pub use config::{AppConfig, ThresholdSettings};
pub use dataset::Dataset;
pub use error::{DatasetError, LoadwatchError, Result, ValidationError};
pub use flags::{synthesize_risk_flags, FlagSeverity, RiskFlag};
pub use injuries::{days_lost, summarize_injuries, InjurySummary};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use records::{personal_records, radar_data, PersonalRecord, RadarPoint};
pub use streaks::{training_streaks, TrainingStreaks};
pub use trend::{load_trend, LoadTrendPoint, TrendScope};
pub use validation::{validate_dataset, RecordValidator};
pub use weekly::{week_over_week, WeekOverWeek};
pub use wellness::{readiness_heatmap, readiness_summary, ReadinessBand, ReadinessSummary};
pub use zones::{LoadZone, LoadZoneClassifier, LoadZoneResult};
