//! Alert rendering and outbound delivery for routed signals.

pub mod dispatcher;
pub mod templates;

pub use dispatcher::AlertDispatcher;
pub use templates::{format_alert, format_deep_dive_alert, format_medium_alert, format_short_alert};
