//! Signal engines for the alpha-flow pipeline.
//!
//! Evaluated once per ticker per refresh cycle, in dependency order:
//! flow detection, regime and technical evaluation, candidate assembly,
//! classification, scoring, routing. The learning engine runs once per
//! cycle after all tickers are processed.

pub mod candidate;
pub mod classifier;
pub mod flow;
pub mod learning;
pub mod regime;
pub mod routing;
pub mod scoring;
pub mod technical;

#[cfg(test)]
pub(crate) mod testutil;

pub use candidate::CandidateBuilder;
pub use classifier::Classifier;
pub use flow::FlowDetector;
pub use learning::LearningEngine;
pub use regime::{RegimeEngine, RegimeError, MIN_PRICE_POINTS};
pub use routing::RoutingEngine;
pub use scoring::ScoringEngine;
pub use technical::{ema, macd, rsi, TechnicalEngine};
