//! CLI entrypoint for roundtable
//!
//! Wires the layers together with dependency injection and runs an
//! interactive discussion on stdin/stdout.

use anyhow::{Result, bail};
use clap::Parser;
use roundtable_application::{
    DiscussionError, DiscussionLogger, DiscussionService, NoDiscussionLogger,
};
use roundtable_domain::{Persona, Topic, Turn};
use roundtable_infrastructure::config::Severity;
use roundtable_infrastructure::{
    ConfigLoader, HttpTextGateway, InMemorySessionStore, JsonlDiscussionLogger,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "roundtable", version, about = "Throttled multi-persona group discussions")]
struct Cli {
    /// Discussion topic
    topic: Option<String>,

    /// Participant persona keys (repeatable); defaults from configuration
    #[arg(short, long = "participant")]
    participants: Vec<String>,

    /// Background context handed to the facilitator's opening
    #[arg(long)]
    context: Option<String>,

    /// Explicit configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write discussion events to this JSONL file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting roundtable");

    let config = ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?;
    let mut fatal = false;
    for issue in config.validate() {
        match issue.severity {
            Severity::Error => {
                eprintln!("config error: {}", issue.message);
                fatal = true;
            }
            Severity::Warning => eprintln!("config warning: {}", issue.message),
        }
    }
    if fatal {
        bail!("configuration is not usable");
    }

    let topic = match cli.topic {
        Some(t) => Topic::try_new(t)?,
        None => bail!("a discussion topic is required"),
    };

    let participants: Vec<Persona> = if cli.participants.is_empty() {
        config.discussion.parse_participants()?
    } else {
        cli.participants
            .iter()
            .map(|s| s.parse())
            .collect::<Result<_, _>>()?
    };

    // === Dependency Injection ===
    let gateway = Arc::new(HttpTextGateway::new(&config.gateway)?);
    let store = Arc::new(InMemorySessionStore::new());
    let logger: Arc<dyn DiscussionLogger> = match &cli.log_file {
        Some(path) => match JsonlDiscussionLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoDiscussionLogger),
        },
        None => Arc::new(NoDiscussionLogger),
    };

    let service = DiscussionService::new(
        gateway,
        store,
        config.throttle.to_throttle_config(),
        config.discussion.to_discussion_config(),
    )
    .with_logger(logger);

    let opened = service
        .initialize_discussion(topic, participants, cli.context.clone())
        .await?;
    print_turn(&opened.opening);
    println!();
    println!("(type a message, or /ask <persona> <question>, /consensus, /summary, /end)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.split_once(' ') {
            _ if input == "/end" => {
                let report = service.end_discussion(&opened.session_id).await?;
                println!();
                println!("=== Summary ===");
                println!("{}", report.summary);
                if !report.consensus.is_empty() {
                    println!();
                    println!("=== Consensus ===");
                    for point in &report.consensus.agreements {
                        println!("  + {point}");
                    }
                    for point in &report.consensus.disagreements {
                        println!("  - {point}");
                    }
                }
                println!();
                println!(
                    "{} turns in {:.1}s",
                    report.metrics.total_turns,
                    report.metrics.duration_ms as f64 / 1000.0
                );
                break;
            }
            _ if input == "/quit" => break,
            _ if input == "/consensus" => {
                match service.analyze_consensus(&opened.session_id).await {
                    Ok(analysis) => {
                        for point in &analysis.agreements {
                            println!("  agree: {point}");
                        }
                        for point in &analysis.disagreements {
                            println!("  disagree: {point}");
                        }
                        println!("  alignment: {:.2}", analysis.alignment);
                    }
                    Err(e) => eprintln!("consensus failed: {e}"),
                }
            }
            _ if input == "/summary" => match service.generate_summary(&opened.session_id).await {
                Ok(summary) => println!("{summary}"),
                Err(e) => eprintln!("summary failed: {e}"),
            },
            Some(("/ask", rest)) => {
                let Some((persona, question)) = rest.split_once(' ') else {
                    eprintln!("usage: /ask <persona> <question>");
                    continue;
                };
                let persona: Persona = match persona.parse() {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("{e}");
                        continue;
                    }
                };
                match service
                    .ask_specific_agent(&opened.session_id, persona, question)
                    .await
                {
                    Ok(turn) => print_turn(&turn),
                    Err(e) => eprintln!("ask failed: {e}"),
                }
            }
            _ => match service.process_user_input(&opened.session_id, input, None).await {
                Ok(outcome) => {
                    for turn in &outcome.responses {
                        print_turn(turn);
                    }
                    for failure in &outcome.failures {
                        eprintln!("[{} did not respond: {}]", failure.persona, failure.error);
                    }
                }
                Err(DiscussionError::AllRespondersFailed { failures }) => {
                    eprintln!("no persona could respond:");
                    for failure in &failures {
                        eprintln!("  {}: {}", failure.persona, failure.error);
                    }
                }
                Err(e) => return Err(e.into()),
            },
        }
    }

    Ok(())
}

fn print_turn(turn: &Turn) {
    println!();
    println!("[{}] {}", turn.display_name, turn.message);
}
