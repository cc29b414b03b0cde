//! Terminal presentation helpers

pub mod formatter;

pub use formatter::{
    COMPLETE_LINE, agent_card, agent_circles, countdown_line, format_error, presenting_line,
    results, status_table,
};
