//! Stock analysis desk REPL
//!
//! ```bash
//! export GROQ_API_KEY=...
//! export BRIGHT_DATA_API_TOKEN=...
//! export MURF_API_KEY=...
//! export AGENT_GRAPH_URL=http://localhost:2024
//!
//! cargo run -p agent-cli --features speaker
//! ```

mod surface;

use std::path::PathBuf;
use std::sync::Arc;

use agent_stock::interface::format_error;
use agent_stock::{Reply, SessionState, StockBot, StockConfig};
use agent_utils::LogFormat;
use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::surface::{ConsoleProgress, TerminalSurface};

const VOICE_INPUT_HELP: &str = "Voice input (/voice) uses Google speech when GOOGLE_SPEECH_API_KEY is set, \
with the Murf voice changer as fallback. Without GOOGLE_SPEECH_API_KEY only the Murf \
fallback is used, and it needs MURF_API_KEY.";

#[derive(Parser, Debug)]
#[command(name = "stock-desk")]
#[command(about = "Narrated multi-agent stock analysis", long_about = None)]
#[command(after_help = VOICE_INPUT_HELP)]
struct Args {
    /// Query to start with instead of the default one
    #[arg(short, long)]
    query: Option<String>,

    /// Run one analysis with voice output, then exit
    #[arg(long)]
    once: bool,

    /// Directory for generated audio clips
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn print_banner(welcome: &str) {
    println!(
        r"
╔══════════════════════════════════════════════════════════════╗
║              📈 Narrated Stock Analysis Desk                 ║
║                                                              ║
║  🔍 Stock Finder  📈 Market Data  📰 News  💰 Recommender    ║
║                      🎯 Supervisor                           ║
╚══════════════════════════════════════════════════════════════╝"
    );
    println!("{welcome}");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _ = agent_utils::load_dotenv();
    if args.json_logs {
        agent_utils::init_tracing_with(LogFormat::Json);
    } else {
        agent_utils::init_tracing();
    }

    let mut builder = StockConfig::builder();
    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        builder = builder.output_dir(dir);
    }
    let config = builder
        .fill_from_env()
        .build()
        .context("invalid configuration")?;

    info!(graph = %config.graph.base_url, output_dir = %config.output_dir.display(), "Starting stock desk");
    let bot = StockBot::from_config(config)
        .context("could not set up providers")?
        .with_event_handler(Arc::new(ConsoleProgress::default()));

    let mut session = SessionState::new();
    if let Some(query) = &args.query {
        session.set_query(query.as_str());
    }
    let mut surface = TerminalSurface::new();

    if args.once {
        return match bot.process_input("/analyze", &mut session, &mut surface).await {
            Ok(Reply::Message(text)) => {
                println!("{text}");
                Ok(())
            }
            Ok(Reply::Exit) => Ok(()),
            Err(e) => {
                eprintln!("{}", format_error(&e));
                Err(e.into())
            }
        };
    }

    print_banner(bot.welcome());
    println!("Voice input: {}", bot.voice_input_mode());
    println!("Query: {}\n", session.query());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"desk> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            println!("\nGoodbye!");
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match bot.process_input(input, &mut session, &mut surface).await {
            Ok(Reply::Message(text)) => println!("{text}\n"),
            Ok(Reply::Exit) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => eprintln!("{}\n", format_error(&e)),
        }
    }

    Ok(())
}
