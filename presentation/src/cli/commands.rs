//! CLI command definitions

use clap::{ArgGroup, Parser, ValueEnum};
use council_domain::DurationPolicy;
use std::path::PathBuf;

/// Output format for council results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every stage: round, reviews, debate and verdict
    Full,
    /// Only the chairman's verdict
    Synthesis,
    /// The council record as JSON
    Json,
}

impl From<OutputFormat> for council_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => council_domain::OutputFormat::Full,
            OutputFormat::Synthesis => council_domain::OutputFormat::Synthesis,
            OutputFormat::Json => council_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for llm-council
#[derive(Parser, Debug)]
#[command(name = "llm-council")]
#[command(author, version, about = "LLM Council - independent answers, a live debate, one verdict")]
#[command(group(ArgGroup::new("length").args(["duration", "unlimited", "no_debate"])))]
#[command(long_about = r#"
LLM Council convenes several language models on one question.

The process has four stages:
1. Round: every ready node answers independently, in parallel
2. Peer review (optional): nodes critique and score each other
3. Debate: nodes argue in turn; type to join in
4. Verdict: the chairman streams a consolidated answer

During the debate, stdin lines are commands:
  /pause    hold the next turn (the countdown keeps running)
  /resume   continue
  /end      stop the debate and go to the verdict
  anything else is posted to the debate as the user

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/llm-council/config.toml   Global config

Example:
  llm-council "Should we rewrite the billing service in Rust?"
  llm-council --preset divergence --duration 60 --review "Monorepo or polyrepo?"
  llm-council --no-debate -o json "Is P = NP?"
  llm-council --verify-keys
"#)]
pub struct Cli {
    /// The question to put to the council
    pub question: Option<String>,

    /// Built-in roster (standard, divergence)
    #[arg(short, long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Debate length in seconds (0 = unlimited)
    #[arg(short, long, value_name = "SECS")]
    pub duration: Option<u64>,

    /// Run the debate until /end
    #[arg(long)]
    pub unlimited: bool,

    /// Skip the debate and go straight to the verdict
    #[arg(long)]
    pub no_debate: bool,

    /// Run the peer review stage
    #[arg(long)]
    pub review: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Append council events as JSON lines to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,

    /// Probe every configured provider key and exit
    #[arg(long)]
    pub verify_keys: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the resolved roster, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Debate length requested on the command line.
    ///
    /// `Some(None)` means the debate is switched off.
    pub fn debate_override(&self) -> Option<Option<DurationPolicy>> {
        if self.no_debate {
            Some(None)
        } else if self.unlimited {
            Some(Some(DurationPolicy::Unlimited))
        } else {
            self.duration
                .map(|secs| Some(DurationPolicy::from_secs(secs)))
        }
    }
}
