//! Prompt text for the analysis agents
//!
//! The agents run in the external graph runtime; their prompts are owned
//! here and sent along with every run in the run configuration, so the
//! desk decides what each agent is asked to do.

mod supervisor;
mod workers;

use agent_core::AgentId;

pub use supervisor::SUPERVISOR;
pub use workers::{MARKET_DATA, NEWS_ANALYST, PRICE_RECOMMENDER, STOCK_FINDER};

/// Prompt for one agent
pub fn prompt_for(agent: &AgentId) -> Option<&'static str> {
    match agent {
        AgentId::StockFinder => Some(STOCK_FINDER),
        AgentId::MarketData => Some(MARKET_DATA),
        AgentId::NewsAnalyst => Some(NEWS_ANALYST),
        AgentId::PriceRecommender => Some(PRICE_RECOMMENDER),
        AgentId::Supervisor => Some(SUPERVISOR),
        AgentId::Other(_) => None,
    }
}

/// Run configuration key carrying an agent's prompt: `<wire id>_prompt`
pub fn prompt_key(agent: &AgentId) -> String {
    format!("{}_prompt", agent.wire_id())
}

/// `(key, prompt)` pairs for every known agent, in pipeline order
pub fn all_prompts() -> Vec<(String, &'static str)> {
    AgentId::KNOWN
        .iter()
        .filter_map(|agent| prompt_for(agent).map(|prompt| (prompt_key(agent), prompt)))
        .collect()
}
