//! Market data access for the signal brain: provider traits, the
//! simulated development providers, a TTL cache, and the cached
//! `DataService` facade the refresh cycle consumes.

pub mod cache;
pub mod provider;
pub mod retry;
pub mod service;

pub use cache::TtlCache;
pub use provider::{
    MarketDataProvider, NewsProvider, SimulatedMarketProvider, SimulatedNewsProvider,
};
pub use retry::with_retry;
pub use service::DataService;
