//! Candidate assembly: joins the strongest qualifying flow event with
//! the current snapshot, regime, and technical context.

use alpha_flow_core::{Candidate, FlowEvent, MarketRegimeState, PriceSnapshot, TechnicalContext};

/// Produces at most one candidate per ticker per cycle.
#[derive(Debug, Default, Clone)]
pub struct CandidateBuilder;

impl CandidateBuilder {
    /// Picks the highest-notional flow event matching the snapshot's
    /// ticker and flattens its contract fields onto the candidate.
    /// Returns `None` when no flow event matches.
    #[must_use]
    pub fn build(
        &self,
        flows: &[FlowEvent],
        price: &PriceSnapshot,
        regime: &MarketRegimeState,
        technical: &TechnicalContext,
    ) -> Option<Candidate> {
        let primary = flows
            .iter()
            .filter(|flow| flow.ticker == price.ticker)
            .max_by(|a, b| a.notional.total_cmp(&b.notional))?;

        let mut candidate = Candidate::new(
            primary.clone(),
            price.clone(),
            regime.clone(),
            technical.clone(),
        );

        // Flattening for later formatting, not new computation.
        candidate.primary_option_symbol = Some(primary.option_symbol.clone());
        candidate.primary_expiry = Some(primary.expiry);
        candidate.primary_strike = Some(primary.strike);
        candidate.primary_side = Some(primary.side.clone());
        candidate.primary_dte = Some(primary.dte);
        candidate.primary_last_price = primary.last_price;
        candidate.primary_bid = primary.bid;
        candidate.primary_ask = primary.ask;
        candidate.primary_volume = primary.volume;
        candidate.primary_open_interest = primary.open_interest;
        candidate.primary_notional = Some(primary.notional);

        Some(candidate)
    }
}
