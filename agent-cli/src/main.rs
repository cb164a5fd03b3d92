use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use agent_invoker::{NoFailuresJudge, ScriptedInvoker};
use graph::SessionId;
use orchestrator::{CoordPaths, Orchestrator, SessionOutcome};
use scheduler::CancelHandle;

mod invokers;

use invokers::InstructionEchoPlanner;

#[derive(Parser)]
#[command(name = "agent", about = "Autonomous multi-agent code-change orchestrator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decompose an instruction into tasks and run them to completion, or
    /// (with --resume) continue a session whose journal ends in session_abort.
    Plan {
        #[arg(long)]
        resume: bool,
        #[arg(long)]
        config: Option<PathBuf>,
        /// The user instruction, or (with --resume) the sessionId to resume.
        instruction: Option<String>,
    },
    /// Continue running an already-planned session by id.
    Run {
        #[arg(long)]
        session: String,
        #[arg(long = "max-workers")]
        max_workers: Option<usize>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn coord_path() -> PathBuf {
    std::env::var_os("AGENT_COORD_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".agent-coord"))
}

fn load_config(paths: &CoordPaths, override_path: Option<PathBuf>) -> Result<config::Config, i32> {
    let path = override_path.unwrap_or_else(|| paths.config_path());
    config::Config::load(path).map_err(|err| {
        eprintln!("error: {err}");
        1
    })
}

fn build_orchestrator(paths: CoordPaths, config: config::Config) -> Orchestrator {
    Orchestrator::new(
        paths,
        config,
        Arc::new(InstructionEchoPlanner),
        Arc::new(ScriptedInvoker::new(HashMap::new())),
        Arc::new(NoFailuresJudge),
    )
}

fn install_cancel_on_ctrlc(cancel: CancelHandle) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("received interrupt, cancelling in-flight tasks");
            cancel.cancel();
        }
    });
}

fn report(outcome: &SessionOutcome) -> i32 {
    println!("session {}", outcome.session_id.as_str());
    println!(
        "completed={} failed={} blocked={} aborted={}",
        outcome.result.completed.len(),
        outcome.result.failed.len(),
        outcome.result.blocked.len(),
        outcome.result.aborted
    );
    println!(
        "judge: approved={} - {}",
        outcome.verdict.approved, outcome.verdict.comment
    );
    outcome.exit_code()
}

async fn run_plan(resume: bool, config_path: Option<PathBuf>, instruction: Option<String>) -> i32 {
    let paths = CoordPaths::new(coord_path());
    let config = match load_config(&paths, config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };

    if resume {
        let Some(session_id) = instruction else {
            eprintln!("error: agent plan --resume requires a <sessionId>");
            return 1;
        };
        let orch = build_orchestrator(paths, config);
        let cancel = CancelHandle::new();
        install_cancel_on_ctrlc(cancel.clone());
        match orch.resume_session(SessionId::new(session_id), cancel).await {
            Ok(outcome) => report(&outcome),
            Err(err) => {
                eprintln!("error: {err}");
                err.exit_code()
            }
        }
    } else {
        let Some(instruction) = instruction else {
            eprintln!("error: agent plan requires an <instruction> (or --resume <sessionId>)");
            return 1;
        };
        let orch = build_orchestrator(paths, config);
        let cancel = CancelHandle::new();
        install_cancel_on_ctrlc(cancel.clone());
        match orch.start_session(&instruction, cancel).await {
            Ok(outcome) => report(&outcome),
            Err(err) => {
                eprintln!("error: {err}");
                err.exit_code()
            }
        }
    }
}

async fn run_run(session: String, max_workers: Option<usize>, config_path: Option<PathBuf>) -> i32 {
    let paths = CoordPaths::new(coord_path());
    let mut config = match load_config(&paths, config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };
    if let Some(max_workers) = max_workers {
        config.max_workers = max_workers;
    }

    let orch = build_orchestrator(paths, config);
    let cancel = CancelHandle::new();
    install_cancel_on_ctrlc(cancel.clone());
    match orch.resume_session(SessionId::new(session), cancel).await {
        Ok(outcome) => report(&outcome),
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}

#[tokio::main]
async fn main() {
    agent_logging::init_for_cli(false);
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Plan {
            resume,
            config,
            instruction,
        } => run_plan(resume, config, instruction).await,
        Command::Run {
            session,
            max_workers,
            config,
        } => run_run(session, max_workers, config).await,
    };

    std::process::exit(exit_code);
}
