pub mod config;
pub mod config_loader;
pub mod types;
pub mod weights;

pub use config::{AlertStyle, AlertsConfig, AppConfig, DetectionConfig, QueueConfig, StorageConfig};
pub use config_loader::ConfigLoader;
pub use types::{
    Candidate, Direction, FlowEvent, Grade, Greeks, MarketRegimeState, NewsItem,
    PerformanceRecord, PriceSnapshot, RiskEnvironment, Route, RoutedSignal, ScoreResult, Setup,
    TechnicalContext, TrendBias, IMMEDIATE_SCORE_MIN, INTRADAY_SCORE_MIN, SWING_SCORE_MIN,
};
pub use weights::{ScoreWeights, WeightHandle, FLOW_WEIGHT_MAX, FLOW_WEIGHT_MIN};
