//! agentide: 行式交互的模拟工作台
//!
//! stdin 每行交给模拟终端执行；stdin 结束后等待未完成的模拟任务再退出。

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use agentide::app::Workbench;
use agentide::kernel::services::adapters::{
    ensure_settings_file, get_settings_path, load_settings,
};
use agentide::kernel::services::ports::Settings;
use agentide::kernel::{Action, NotificationKind};
use agentide::models::{sample_project, DocTree};
use clap::Parser;

mod logging;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Agent workbench - simulated AI coding workbench on a persistent document tree
#[derive(Parser, Debug)]
#[command(name = "agentide", version)]
struct Args {
    /// Settings file path (defaults to the cache directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Start with an empty project instead of the sample one
    #[arg(long, default_value = "false")]
    empty: bool,
}

#[derive(Default)]
struct OutputCursor {
    terminal_seq: u64,
    notification_seq: u64,
}

fn resolve_settings(args: &Args) -> Settings {
    let path = match &args.settings {
        Some(path) => path.clone(),
        None => {
            let Some(path) = get_settings_path() else {
                tracing::warn!("cannot determine settings directory, using defaults");
                return Settings::default();
            };
            if let Err(e) = ensure_settings_file(&path) {
                tracing::warn!(error = %e, path = %path.display(), "cannot create settings file");
            }
            path
        }
    };

    match load_settings(&path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "using default settings");
            Settings::default()
        }
    }
}

fn flush_output(
    workbench: &Workbench,
    cursor: &mut OutputCursor,
    out: &mut impl Write,
) -> io::Result<()> {
    let state = workbench.state();
    for line in state.terminal.lines_since(cursor.terminal_seq) {
        writeln!(out, "{}", line.text)?;
    }
    cursor.terminal_seq = state.terminal.next_seq();

    let fresh = state
        .notifications
        .iter()
        .filter(|n| n.seq >= cursor.notification_seq);
    for n in fresh {
        let tag = match n.kind {
            NotificationKind::Info => "info",
            NotificationKind::Error => "error",
        };
        writeln!(out, "[{tag}] {}: {}", n.title, n.description)?;
    }
    cursor.notification_seq = state.next_notification_seq();
    out.flush()
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let mut logging = logging::init();
    let log_rx = logging.as_mut().and_then(|logging| logging.take_panel_rx());
    if let Some(logging) = &logging {
        tracing::debug!(log_dir = %logging.dir().display(), "logging ready");
    }

    let settings = resolve_settings(&args);
    let files = if args.empty {
        DocTree::new()
    } else {
        sample_project()
    };
    let mut workbench = Workbench::from_settings(&settings, files, log_rx)?;

    let (line_tx, line_rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut cursor = OutputCursor::default();
    flush_output(&workbench, &mut cursor, &mut out)?;

    loop {
        match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                if matches!(line.trim(), "exit" | "quit") {
                    break;
                }
                workbench.dispatch(Action::TerminalSubmit(line));
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                if !workbench.wait_idle(DRAIN_TIMEOUT) {
                    tracing::warn!("exiting with simulated tasks still pending");
                }
                workbench.tick();
                flush_output(&workbench, &mut cursor, &mut out)?;
                break;
            }
        }
        workbench.tick();
        flush_output(&workbench, &mut cursor, &mut out)?;
    }

    tracing::info!("workbench closed");
    Ok(())
}
