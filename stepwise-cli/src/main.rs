//! # Stepwise CLI
//!
//! Command-line interface for the stepwise agent.
//!
//! Usage:
//!   stepwise <question>
//!   stepwise ask <question>
//!   stepwise chat <question>
//!   stepwise calc <question>
//!   stepwise history [-m <mode>] [-n <limit>]
//!
//! Examples:
//!   stepwise "Translate 'Good Morning' into German and then multiply 5 and 6."
//!   stepwise chat "Why is the sky blue?"
//!   stepwise calc "What is 12 + 7?"
//!   stepwise history -m calc -n 5

use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;
use stepwise_agent::{Agent, AgentConfig, AGENT_LOG_FILE, CHAT_LOG_FILE, TOOL_LOG_FILE};
use stepwise_core::{GeminiProvider, Logbook, RetryPolicy};

#[derive(Parser)]
#[command(name = "stepwise")]
#[command(author, version, about = "Stepwise - plan, execute, answer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Question to answer (when not using subcommands)
    #[arg(trailing_var_arg = true)]
    question: Vec<String>,

    /// Directory the interaction logs are written to
    #[arg(long, global = true, default_value = ".")]
    log_dir: String,

    /// Enable verbose output (full records, step counts)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only show the final answer
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan and execute a multi-step question (the default)
    Ask {
        /// The question to answer
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
    },
    /// Chat without tools
    Chat {
        /// The question to answer
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
    },
    /// Answer with at most one calculator call
    Calc {
        /// The question to answer
        #[arg(trailing_var_arg = true, required = true)]
        question: Vec<String>,
    },
    /// Show recent interactions from a log
    History {
        /// Which mode's log to read
        #[arg(short, long, value_enum, default_value = "ask")]
        mode: Mode,

        /// How many records to show (default: 10)
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Ask,
    Chat,
    Calc,
}

impl Mode {
    fn log_file(self) -> &'static str {
        match self {
            Mode::Ask => AGENT_LOG_FILE,
            Mode::Chat => CHAT_LOG_FILE,
            Mode::Calc => TOOL_LOG_FILE,
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len).collect();
        format!("{}…", cut)
    }
}

fn agent_config(log_dir: &str, quiet: bool) -> AgentConfig {
    AgentConfig {
        verbose: !quiet,
        log_dir: log_dir.to_string(),
        retry: RetryPolicy::default(),
    }
}

async fn run_ask(
    provider: GeminiProvider,
    question: &str,
    log_dir: &str,
    verbose: bool,
    quiet: bool,
) {
    if !quiet {
        println!("Stepwise Agent - plan, execute, answer\n");
    }

    let agent = Agent::with_config(provider, agent_config(log_dir, quiet));

    match agent.run(question).await {
        Ok(result) => {
            if !quiet {
                println!("\n--- FINAL ANSWER ---\n");
            }
            println!("{}", result.answer);

            if verbose && !result.outcome.is_empty() {
                println!(
                    "\n{} of {} steps succeeded",
                    result.outcome.succeeded(),
                    result.outcome.len()
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run_chat(provider: GeminiProvider, question: &str, log_dir: &str, quiet: bool) {
    let agent = Agent::with_config(provider, agent_config(log_dir, quiet));

    match agent.chat(question).await {
        Ok(answer) => {
            if !quiet {
                println!("\n--- ANSWER ---\n");
            }
            println!("{}", answer);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run_calc(provider: GeminiProvider, question: &str, log_dir: &str, quiet: bool) {
    let agent = Agent::with_config(provider, agent_config(log_dir, quiet));

    match agent.solve(question).await {
        Ok(answer) => {
            if !quiet {
                println!("\n--- ANSWER ---\n");
            }
            println!("{}", answer);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn show_history(log_dir: &str, mode: Mode, limit: usize, verbose: bool) {
    let logbook = Logbook::new(Path::new(log_dir).join(mode.log_file()));

    let records = match logbook.tail(limit) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error reading history: {}", e);
            std::process::exit(1);
        }
    };

    if records.is_empty() {
        println!("No interactions logged in {} yet.", logbook.path().display());
        return;
    }

    println!(
        "Last {} interaction(s) from {}:",
        records.len(),
        logbook.path().display()
    );
    for record in &records {
        println!("\n[{}] {}", record.timestamp, record.question);
        if verbose {
            println!(
                "{}",
                serde_json::to_string_pretty(record).unwrap_or_default()
            );
        } else if let Some(answer) = &record.answer {
            println!("  -> {}", truncate(answer, 100));
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Credentials resolve up front so every mode reports misconfiguration
    // the same way, before any work starts.
    let provider = match GeminiProvider::from_env() {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Set GEMINI_API_KEY to your Google AI Studio key.");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::History { mode, limit }) => {
            show_history(&cli.log_dir, mode, limit, cli.verbose);
            return;
        }
        Some(Commands::Chat { question }) => {
            run_chat(provider, &question.join(" "), &cli.log_dir, cli.quiet).await;
            return;
        }
        Some(Commands::Calc { question }) => {
            run_calc(provider, &question.join(" "), &cli.log_dir, cli.quiet).await;
            return;
        }
        Some(Commands::Ask { question }) => {
            run_ask(
                provider,
                &question.join(" "),
                &cli.log_dir,
                cli.verbose,
                cli.quiet,
            )
            .await;
            return;
        }
        None => {
            if cli.question.is_empty() {
                eprintln!("Error: No question provided.");
                eprintln!("Usage: stepwise [OPTIONS] <QUESTION>...");
                eprintln!("       stepwise ask <QUESTION>...");
                eprintln!("       stepwise chat <QUESTION>...");
                eprintln!("       stepwise calc <QUESTION>...");
                eprintln!("       stepwise history [-m <MODE>] [-n <LIMIT>]");
                eprintln!("\nExamples:");
                eprintln!(
                    "  stepwise \"Translate 'Good Morning' into German and then multiply 5 and 6.\""
                );
                eprintln!("  stepwise chat \"Why is the sky blue?\"");
                eprintln!("  stepwise calc \"What is 12 + 7?\"");
                eprintln!("  stepwise --help");
                std::process::exit(1);
            }
        }
    }

    // Default: treat positional args as the question for a full run
    let question = cli.question.join(" ");
    run_ask(provider, &question, &cli.log_dir, cli.verbose, cli.quiet).await;
}
