//! 日志：滚动文件记录完整格式；INFO 以上的事件压成单行送到 logs 面板

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "agentide";
const LOG_FILE_SUFFIX: &str = "log";
const MAX_LOG_FILES: usize = 7;
const DEFAULT_FILTER: &str = "agentide=info";
const PANEL_LINE_MAX: usize = 200;

pub struct Logging {
    _flush: WorkerGuard,
    dir: PathBuf,
    panel_rx: Option<Receiver<String>>,
}

impl Logging {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Receiver for the logs panel; the workbench takes it once.
    pub fn take_panel_rx(&mut self) -> Option<Receiver<String>> {
        self.panel_rx.take()
    }
}

/// `MakeWriter` for the logs panel. Each event gets its own `PanelLine`.
#[derive(Clone)]
struct PanelSink {
    tx: Sender<String>,
}

impl<'a> MakeWriter<'a> for PanelSink {
    type Writer = PanelLine;

    fn make_writer(&'a self) -> Self::Writer {
        PanelLine {
            buf: Vec::with_capacity(128),
            tx: self.tx.clone(),
        }
    }
}

struct PanelLine {
    buf: Vec<u8>,
    tx: Sender<String>,
}

impl Write for PanelLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for PanelLine {
    fn drop(&mut self) {
        if let Some(line) = condense(&String::from_utf8_lossy(&self.buf)) {
            let _ = self.tx.send(line);
        }
    }
}

/// Folds a formatted event into one panel row; long rows are cut at `PANEL_LINE_MAX` chars.
fn condense(text: &str) -> Option<String> {
    let joined = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    if joined.is_empty() {
        return None;
    }
    if joined.chars().count() <= PANEL_LINE_MAX {
        return Some(joined);
    }
    let mut cut: String = joined.chars().take(PANEL_LINE_MAX).collect();
    cut.push_str("...");
    Some(cut)
}

fn resolve_log_dir() -> io::Result<PathBuf> {
    agentide::kernel::services::adapters::ensure_log_dir().or_else(|_| -> io::Result<PathBuf> {
        let dir = std::env::temp_dir().join("agentide").join("logs");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    })
}

/// `None` when no log directory is usable or a subscriber is already set.
pub fn init() -> Option<Logging> {
    let dir = resolve_log_dir().ok()?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(&dir)
        .ok()?;
    let (file_writer, flush) = tracing_appender::non_blocking(appender);
    let (panel_tx, panel_rx) = mpsc::channel::<String>();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true);

    // 面板只看 INFO 以上，即使 RUST_LOG 打开了 debug
    let panel_layer = tracing_subscriber::fmt::layer()
        .compact()
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .with_writer(PanelSink { tx: panel_tx })
        .with_filter(LevelFilter::INFO);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(panel_layer);
    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(panic = %panic_info, %location, "panic");
    }));

    tracing::info!(dir = %dir.display(), "logging initialized");

    Some(Logging {
        _flush: flush,
        dir,
        panel_rx: Some(panel_rx),
    })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
