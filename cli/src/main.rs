//! CLI entrypoint for LLM Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    ConversationLogger, DebateController, NoConversationLogger, NoProgress, ProgressNotifier,
    RoundError, RunCouncilError, RunCouncilInput, RunCouncilUseCase, SynthesisError,
    VerifyKeysUseCase,
};
use council_domain::{DebateMessage, DurationPolicy, OutputFormat, Query, Stage};
use council_infrastructure::{
    ConfigLoader, CouncilSettings, FileConfig, HttpKeyVerifier, JsonlConversationLogger,
    ProviderRegistry,
};
use council_presentation::{Cli, ConsoleFormatter, DebateCommand, DebatePrinter, ProgressReporter};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    // CLI flags override file values
    if let Some(preset) = &cli.preset {
        config.council.preset = preset.clone();
        config.council.members.clear();
    }
    if cli.review {
        config.round.review = true;
    }

    let issues = config.validate();
    for issue in &issues {
        eprintln!("Warning: {}", issue);
    }

    let settings = CouncilSettings::resolve(&config).context("Invalid council configuration")?;

    let log_dir = cli.log_dir.clone().or_else(|| settings.log_dir.clone());
    let _log_guard = init_tracing(cli.verbose, log_dir.as_deref());

    if !settings.color {
        colored::control::set_override(false);
    }

    info!("Starting LLM Council");

    if cli.show_config {
        print_config(&cli, &config, &settings);
        return Ok(());
    }

    if cli.verify_keys {
        let verifier = Arc::new(HttpKeyVerifier::default());
        let results = VerifyKeysUseCase::new(verifier)
            .execute(&settings.credentials)
            .await;
        print!("{}", ConsoleFormatter::format_key_report(&results));
        return Ok(());
    }

    let question = match cli.question.as_deref() {
        Some(q) => q,
        None => bail!("A question is required. Try: llm-council \"Your question\""),
    };
    let query = Query::new(question)?;

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(settings.output_format)
        .unwrap_or_default();

    let debate = match cli.debate_override() {
        Some(choice) => choice,
        None => settings.debate_enabled.then_some(settings.debate_duration),
    };

    // === Dependency Injection ===
    let conversation_log = cli
        .conversation_log
        .clone()
        .or_else(|| settings.conversation_log.clone());
    let logger: Arc<dyn ConversationLogger> = match conversation_log {
        Some(path) => match JsonlConversationLogger::new(&path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoConversationLogger),
        },
        None => Arc::new(NoConversationLogger),
    };

    let gateway = Arc::new(ProviderRegistry::new(settings.credentials.clone()));
    let use_case = RunCouncilUseCase::new(gateway)
        .with_policy(settings.council_policy.clone())
        .with_debate_policy(settings.debate_policy.clone())
        .with_logger(logger);

    let streamed = !cli.quiet && format.is_interactive();
    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new().with_verdict_stream(streamed))
    };

    let input = RunCouncilInput {
        query,
        roster: settings.roster.clone(),
        chairman: settings.chairman.clone(),
        credentials: settings.credentials.clone(),
    };

    let mut session = match use_case.convene(input, progress.as_ref()).await {
        Ok(session) => session,
        Err(e) => return Err(explain(e)),
    };

    if streamed && format == OutputFormat::Full {
        print!(
            "{}",
            ConsoleFormatter::format_round(&session.record, &session.roster)
        );
    }

    let transcript = match debate {
        Some(duration) if format.is_interactive() => {
            let (controller, events) = use_case.open_debate(&mut session);
            controller.start(duration)?;
            let printer = DebatePrinter::new(session.roster.clone());
            let printer = tokio::spawn(async move { printer.run(events).await });
            drive_debate(&controller, printer, duration).await
        }
        Some(DurationPolicy::Unlimited) => {
            warn!("Unlimited debate needs an operator; skipping it for {} output", format.as_str());
            Vec::new()
        }
        Some(duration) => {
            let (controller, _events) = use_case.open_debate(&mut session);
            controller.start(duration)?;
            controller.wait_ended().await
        }
        None => Vec::new(),
    };

    let roster = session.roster.clone();
    let chairman = session.chairman.clone();
    let record = use_case
        .conclude(session, transcript, progress.as_ref())
        .await
        .map_err(explain)?;

    if !streamed {
        println!(
            "{}",
            ConsoleFormatter::render(format, &record, &roster, &chairman)
        );
    }

    if record.stage == Stage::Error {
        let reason = record.error.as_deref().unwrap_or("synthesis failed");
        bail!("No verdict: {}", reason);
    }

    Ok(())
}

/// Feed operator input into a running debate until it ends.
async fn drive_debate(
    controller: &DebateController<ProviderRegistry>,
    mut printer: tokio::task::JoinHandle<Vec<DebateMessage>>,
    duration: DurationPolicy,
) -> Vec<DebateMessage> {
    let mut input = spawn_stdin_reader();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            result = &mut printer => {
                return match result {
                    Ok(transcript) => transcript,
                    Err(e) => {
                        warn!("Debate printer stopped: {}", e);
                        controller.end();
                        controller.transcript()
                    }
                };
            }
            line = input.recv(), if stdin_open => match line {
                Some(line) => apply_command(controller, &line),
                None => {
                    stdin_open = false;
                    // Nobody is left to type /end
                    if duration == DurationPolicy::Unlimited {
                        controller.end();
                    }
                }
            },
            _ = tokio::signal::ctrl_c() => {
                controller.end();
            }
        }
    }
}

fn apply_command(controller: &DebateController<ProviderRegistry>, line: &str) {
    let Some(command) = DebateCommand::parse(line) else {
        return;
    };
    let result = match command {
        DebateCommand::Pause => controller.pause(),
        DebateCommand::Resume => controller.resume(),
        DebateCommand::End => {
            controller.end();
            Ok(())
        }
        DebateCommand::Say(text) => controller.inject_user_message(&text).map(|_| ()),
        DebateCommand::Unknown(command) => {
            eprintln!("Unknown command {}. {}", command, DebateCommand::help());
            Ok(())
        }
    };
    if let Err(e) = result {
        eprintln!("{}", e);
    }
}

/// Read stdin lines on a plain thread so a pending read never blocks
/// runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        use std::io::BufRead;
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "llm-council.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn print_config(cli: &Cli, config: &FileConfig, settings: &CouncilSettings) {
    println!("Configuration sources (highest priority first):");
    if cli.no_config {
        println!("  [     ] Config files disabled (--no-config)");
    } else {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
    }
    println!();

    let issues = config.validate();
    if !issues.is_empty() {
        println!("Issues:");
        for issue in &issues {
            println!("  {}", issue);
        }
        println!();
    }

    print!(
        "{}",
        ConsoleFormatter::format_roster(&settings.roster, &settings.chairman, &settings.credentials)
    );
    let debate = if settings.debate_enabled {
        settings.debate_duration.to_string()
    } else {
        "off".to_string()
    };
    println!("Debate: {}", debate);
    println!("Peer review: {}", if settings.council_policy.enable_review { "on" } else { "off" });
}

/// Attach an actionable hint to errors the operator can fix.
fn explain(error: RunCouncilError) -> anyhow::Error {
    match &error {
        RunCouncilError::Round(RoundError::NoReadyNodes)
        | RunCouncilError::Round(RoundError::InsufficientNodes { .. })
        | RunCouncilError::Synthesis(SynthesisError::ChairmanNotReady(_)) => {
            anyhow::Error::new(error).context(
                "Council cannot convene. Set GEMINI_API_KEY (or other provider keys), \
                 or add a [credentials] table to council.toml. See --show-config.",
            )
        }
        _ => anyhow::Error::new(error),
    }
}
