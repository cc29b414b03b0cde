//! Agent identity
//!
//! The agent graph runs four specialist workers and a supervisor. Their wire
//! identifiers are the node names used by the graph; everything downstream
//! (filtering, voice selection, playback order, display) keys off
//! [`AgentId`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identity of an agent in the analysis pipeline
///
/// The derived ordering is the pipeline order: the four workers in the order
/// they hand off, then the supervisor whose verdict closes the run. Agents the
/// graph reports under any other name sort after the known ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentId {
    StockFinder,
    MarketData,
    NewsAnalyst,
    PriceRecommender,
    Supervisor,
    /// A node name outside the known set
    Other(String),
}

impl AgentId {
    /// All known agents in pipeline order
    pub const KNOWN: [AgentId; 5] = [
        AgentId::StockFinder,
        AgentId::MarketData,
        AgentId::NewsAnalyst,
        AgentId::PriceRecommender,
        AgentId::Supervisor,
    ];

    /// Map a graph node name to an agent. Never fails; unrecognised names
    /// become [`AgentId::Other`].
    pub fn from_wire(name: &str) -> Self {
        match name {
            "stock_finder_agent" => Self::StockFinder,
            "market_data_agent" => Self::MarketData,
            "news_analyst_agent" => Self::NewsAnalyst,
            "price_recommender_agent" => Self::PriceRecommender,
            "supervisor" => Self::Supervisor,
            other => Self::Other(other.to_string()),
        }
    }

    /// Graph node name of this agent
    pub fn wire_id(&self) -> &str {
        match self {
            Self::StockFinder => "stock_finder_agent",
            Self::MarketData => "market_data_agent",
            Self::NewsAnalyst => "news_analyst_agent",
            Self::PriceRecommender => "price_recommender_agent",
            Self::Supervisor => "supervisor",
            Self::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Spoken name: the wire id with underscores as spaces, title-cased
    pub fn display_name(&self) -> String {
        format_agent_name(self.wire_id())
    }

    /// Short label used in the agent circles and cards
    pub fn label(&self) -> String {
        match self {
            Self::StockFinder => "Stock Finder".to_string(),
            Self::MarketData => "Market Data".to_string(),
            Self::NewsAnalyst => "News Analyst".to_string(),
            Self::PriceRecommender => "Recommender".to_string(),
            Self::Supervisor => "Supervisor".to_string(),
            Self::Other(name) => format_agent_name(name),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::StockFinder => "🔍",
            Self::MarketData => "📊",
            Self::NewsAnalyst => "📰",
            Self::PriceRecommender => "💰",
            Self::Supervisor => "👨‍💼",
            Self::Other(_) => "🤖",
        }
    }

    /// Zero-based position in the pipeline; unknown agents share the slot
    /// after the supervisor.
    pub fn sequence_position(&self) -> usize {
        Self::KNOWN
            .iter()
            .position(|known| known == self)
            .unwrap_or(Self::KNOWN.len())
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_id())
    }
}

/// Parses a known agent from its wire id or its short form
/// (`stock_finder`, `market_data`, `news_analyst`, `price_recommender`,
/// `recommender`). Case-insensitive.
impl FromStr for AgentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let short = normalized.strip_suffix("_agent").unwrap_or(&normalized);
        match short {
            "stock_finder" => Ok(Self::StockFinder),
            "market_data" => Ok(Self::MarketData),
            "news_analyst" => Ok(Self::NewsAnalyst),
            "price_recommender" | "recommender" => Ok(Self::PriceRecommender),
            "supervisor" => Ok(Self::Supervisor),
            _ => Err(Error::UnknownAgent(s.to_string())),
        }
    }
}

impl From<String> for AgentId {
    fn from(name: String) -> Self {
        Self::from_wire(&name)
    }
}

impl From<AgentId> for String {
    fn from(agent: AgentId) -> Self {
        agent.wire_id().to_string()
    }
}

/// Replace underscores with spaces and capitalise each word
pub fn format_agent_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_ids_round_trip() {
        for agent in AgentId::KNOWN {
            assert_eq!(AgentId::from_wire(agent.wire_id()), agent);
        }
    }

    #[test]
    fn test_unknown_wire_id() {
        let agent = AgentId::from_wire("tools");
        assert_eq!(agent, AgentId::Other("tools".to_string()));
        assert!(!agent.is_known());
        assert_eq!(agent.wire_id(), "tools");
    }

    #[test]
    fn test_pipeline_order() {
        let mut agents = vec![
            AgentId::Supervisor,
            AgentId::Other("tools".to_string()),
            AgentId::NewsAnalyst,
            AgentId::StockFinder,
            AgentId::PriceRecommender,
            AgentId::MarketData,
        ];
        agents.sort();
        assert_eq!(
            agents,
            vec![
                AgentId::StockFinder,
                AgentId::MarketData,
                AgentId::NewsAnalyst,
                AgentId::PriceRecommender,
                AgentId::Supervisor,
                AgentId::Other("tools".to_string()),
            ]
        );
        assert_eq!(AgentId::StockFinder.sequence_position(), 0);
        assert_eq!(AgentId::Supervisor.sequence_position(), 4);
        assert_eq!(AgentId::Other("x".into()).sequence_position(), 5);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(AgentId::StockFinder.display_name(), "Stock Finder Agent");
        assert_eq!(AgentId::Supervisor.display_name(), "Supervisor");
        assert_eq!(format_agent_name("price_recommender_agent"), "Price Recommender Agent");
        assert_eq!(format_agent_name("RISK__desk"), "Risk Desk");
    }

    #[test]
    fn test_labels_and_icons() {
        assert_eq!(AgentId::PriceRecommender.label(), "Recommender");
        assert_eq!(AgentId::MarketData.icon(), "📊");
        assert_eq!(AgentId::Other("risk_desk".into()).label(), "Risk Desk");
    }

    #[test]
    fn test_parse_short_forms() {
        assert_eq!("stock_finder".parse::<AgentId>().unwrap(), AgentId::StockFinder);
        assert_eq!("market_data_agent".parse::<AgentId>().unwrap(), AgentId::MarketData);
        assert_eq!("News Analyst".parse::<AgentId>().unwrap(), AgentId::NewsAnalyst);
        assert_eq!("recommender".parse::<AgentId>().unwrap(), AgentId::PriceRecommender);
        assert_eq!("SUPERVISOR".parse::<AgentId>().unwrap(), AgentId::Supervisor);
        assert!(matches!(
            "tools".parse::<AgentId>(),
            Err(Error::UnknownAgent(name)) if name == "tools"
        ));
    }

    #[test]
    fn test_serde_uses_wire_id() {
        let json = serde_json::to_string(&AgentId::NewsAnalyst).unwrap();
        assert_eq!(json, "\"news_analyst_agent\"");
        let parsed: AgentId = serde_json::from_str("\"supervisor\"").unwrap();
        assert_eq!(parsed, AgentId::Supervisor);
    }
}
