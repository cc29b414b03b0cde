//! Response formatting utilities

use std::collections::BTreeMap;
use std::time::Duration;

use agent_core::AgentId;
use comfy_table::{Table, presets::UTF8_FULL};

use crate::config::{ApiState, ApiStatus};
use crate::error::{ErrorCategory, StockError};

pub const COMPLETE_LINE: &str = "✅ Voice output complete!";

/// Agents in the order the circles are drawn
const CIRCLE_ORDER: [AgentId; 5] = [
    AgentId::Supervisor,
    AgentId::StockFinder,
    AgentId::MarketData,
    AgentId::NewsAnalyst,
    AgentId::PriceRecommender,
];

/// One row of agent circles; the active agent is bracketed
pub fn agent_circles(active: Option<&AgentId>) -> String {
    CIRCLE_ORDER
        .iter()
        .map(|agent| {
            let circle = format!("{} {}", agent.icon(), agent.label());
            if active == Some(agent) {
                format!("[*{circle}*]")
            } else {
                format!("( {circle} )")
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// An agent's output under its icon and display name
pub fn agent_card(agent: &AgentId, content: &str) -> String {
    let title = format!("{} {}", agent.icon(), agent.display_name());
    let rule = "─".repeat(title.chars().count().max(24));
    format!("{title}\n{rule}\n{}\n", content.trim())
}

/// Cards for every output, or just one agent's
pub fn results(outputs: &BTreeMap<AgentId, String>, only: Option<&AgentId>) -> String {
    let cards: Vec<String> = outputs
        .iter()
        .filter(|(agent, _)| only.is_none_or(|wanted| wanted == *agent))
        .map(|(agent, content)| agent_card(agent, content))
        .collect();

    if cards.is_empty() {
        match only {
            Some(agent) => format!("No output from {}.", agent.display_name()),
            None => "No analysis results yet. Run /analyze first.".to_string(),
        }
    } else {
        format!("📋 Analysis Results\n\n{}", cards.join("\n"))
    }
}

pub fn presenting_line(agent: &AgentId) -> String {
    format!("{} {} is presenting their analysis...", agent.icon(), agent.label())
}

/// Countdown in whole seconds, rounded down
pub fn countdown_line(remaining: Duration) -> String {
    format!("⏱️ Next agent in ~{} seconds...", remaining.as_secs())
}

/// API status panel
pub fn status_table(status: &[ApiStatus]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Service", "Status"]);
    for entry in status {
        let state = match entry.state {
            ApiState::Connected => "✅ Connected",
            ApiState::Missing => "❌ Missing",
            ApiState::Optional => "⚠️ Optional",
        };
        table.add_row(vec![entry.name, state]);
    }
    table.to_string()
}

/// Status line for a failed turn
pub fn format_error(error: &StockError) -> String {
    match error.category() {
        ErrorCategory::Recognition => format!("⚠️ Could not transcribe audio: {error}"),
        _ => format!("❌ {error}"),
    }
}
