//! CLI command definitions

use arena_application::RunMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for experiment results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Blinded answers only
    Answers,
    /// Blinded answers with full transcripts
    Full,
    /// Blinded JSON payload
    Json,
}

/// Condition scheduling mode
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Serial,
    Concurrent,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Serial => RunMode::Serial,
            ModeArg::Concurrent => RunMode::Concurrent,
        }
    }
}

/// CLI arguments for debate-arena
#[derive(Parser, Debug)]
#[command(name = "debate-arena")]
#[command(author, version, about = "Blinded four-condition LLM answer experiments")]
#[command(long_about = r#"
debate-arena submits one question to four generation conditions - a plain
call, a role-primed call, a mixed-backend debate, and a same-backend
multi-role debate - then shuffles the four answers behind opaque labels so
you can rank them without knowing their source.

Configuration files are loaded from (in priority order):
1. ARENA_* environment variables
2. --config <path>     Explicit config file
3. ./arena.toml        Project-level config
4. ~/.config/debate-arena/config.toml   Global config

Credentials come from the environment (GEMINI_API_KEY, OPENAI_API_KEY by
default; names are configurable).

Example:
  debate-arena "What's the best way to handle errors in Rust?"
  debate-arena --rounds 3 --mode concurrent "Compare async runtimes"
  debate-arena --reveal --output full "Is TDD worth it?"
"#)]
pub struct Cli {
    /// The question to submit
    pub question: String,

    /// Debate rounds before synthesis
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Condition scheduling mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Explicit config file path
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip config files and use built-in defaults
    #[arg(long)]
    pub no_config: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "answers")]
    pub output: OutputFormat,

    /// Print the label -> condition mapping after the listing
    #[arg(long)]
    pub reveal: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and headers
    #[arg(short, long)]
    pub quiet: bool,
}
