//! Rolling file logs for the workspace engine.
//!
//! # Responsibility
//! - Parse the host's logging request and start `flexi_logger` once.
//! - Turn panics from event handlers and frame callbacks into log records.
//!
//! # Invariants
//! - A repeated request with the same level and directory is a no-op.
//! - A request that differs from the running config is refused, never applied.
//! - Note text never reaches the log; records carry ids and geometry only.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

const FILE_BASENAME: &str = "driftnote";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogConfig {
    level: &'static str,
    dir: PathBuf,
}

struct ActiveLogger {
    config: LogConfig,
    _handle: LoggerHandle,
}

impl LogConfig {
    fn parse(level: &str, dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: parse_level(level)?,
            dir: parse_log_dir(dir)?,
        })
    }

    /// Refuses a request that would move or re-level the running logger.
    fn accept(&self, requested: &LogConfig) -> Result<(), String> {
        if self.dir != requested.dir {
            return Err(format!(
                "logging already initialized at `{}`; refusing to switch to `{}`",
                self.dir.display(),
                requested.dir.display()
            ));
        }
        if self.level != requested.level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                self.level, requested.level
            ));
        }
        Ok(())
    }

    fn start(&self) -> Result<ActiveLogger, String> {
        std::fs::create_dir_all(&self.dir).map_err(|err| {
            format!("cannot create log directory `{}`: {err}", self.dir.display())
        })?;

        let files = FileSpec::default()
            .directory(self.dir.as_path())
            .basename(FILE_BASENAME);
        let handle = Logger::try_with_str(self.level)
            .map_err(|err| format!("logger rejected level `{}`: {err}", self.level))?
            .log_to_file(files)
            .rotate(
                Criterion::Size(ROTATE_AT_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(KEEP_ROTATED),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("logger backend failed to start: {err}"))?;

        PANIC_HOOK.get_or_init(install_panic_hook);

        info!(
            "event=logging_start module=logging status=ok os={} profile={} version={} level={} log_dir={}",
            std::env::consts::OS,
            if cfg!(debug_assertions) { "debug" } else { "release" },
            env!("CARGO_PKG_VERSION"),
            self.level,
            self.dir.display()
        );

        Ok(ActiveLogger {
            config: self.clone(),
            _handle: handle,
        })
    }
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error`.
/// - `log_dir` is empty, relative, or cannot be created.
/// - Logging is already running with another level or directory.
/// - The `flexi_logger` backend fails to start.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let requested = LogConfig::parse(level, log_dir)?;
    let active = ACTIVE.get_or_try_init(|| requested.start())?;
    active.config.accept(&requested)
}

/// Level and directory of the running logger, `None` before init.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.config.level, active.config.dir.clone()))
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(raw: &str) -> Result<&'static str, String> {
    let wanted = raw.trim().to_ascii_lowercase();
    let wanted = if wanted == "warning" { "warn" } else { wanted.as_str() };
    LEVELS
        .iter()
        .copied()
        .find(|level| *level == wanted)
        .ok_or_else(|| {
            format!(
                "unsupported log level `{wanted}`; expected one of {}",
                LEVELS.join("|")
            )
        })
}

fn parse_log_dir(raw: &str) -> Result<PathBuf, String> {
    let path = Path::new(raw.trim());
    if path.as_os_str().is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    if path.is_relative() {
        return Err(format!(
            "log_dir must be an absolute path, got `{}`",
            path.display()
        ));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map_or_else(
            || "unknown".to_string(),
            |at| format!("{}:{}", at.file(), at.line()),
        );
        error!(
            "event=panic_captured module=logging status=error location={location} payload={}",
            panic_payload(info)
        );
        chained(info);
    }));
}

// Payloads can quote note text, so they are flattened and capped.
fn panic_payload(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    let text = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    single_line(text, PANIC_PAYLOAD_LIMIT)
}

fn single_line(value: &str, max_chars: usize) -> String {
    let mut chars = value
        .chars()
        .map(|c| if matches!(c, '\n' | '\r') { ' ' } else { c });
    let mut line: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        line.push_str("...");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, parse_level, parse_log_dir, single_line};
    use std::path::PathBuf;
    use uuid::Uuid;

    fn scratch_dir(tag: &str) -> (PathBuf, String) {
        let dir = std::env::temp_dir().join(format!("driftnote-logging-{tag}-{}", Uuid::new_v4()));
        let text = dir.to_str().expect("temp dir is UTF-8").to_string();
        (dir, text)
    }

    #[test]
    fn levels_are_case_and_alias_tolerant() {
        assert_eq!(parse_level("INFO"), Ok("info"));
        assert_eq!(parse_level(" warning "), Ok("warn"));
        assert_eq!(parse_level("trace"), Ok("trace"));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let error = parse_level("verbose").unwrap_err();
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn log_dir_must_be_absolute_and_non_empty() {
        assert!(parse_log_dir("logs/dev").unwrap_err().contains("absolute"));
        assert!(parse_log_dir("   ").unwrap_err().contains("empty"));
    }

    #[test]
    fn single_line_flattens_and_caps() {
        assert_eq!(single_line("line1\nline2\rline3", 8), "line1 li...");
        assert_eq!(single_line("short", 8), "short");
    }

    #[test]
    fn repeated_init_is_a_noop_and_conflicts_are_refused() {
        let (dir, dir_text) = scratch_dir("first");
        let (_, other_text) = scratch_dir("second");

        init_logging("info", &dir_text).expect("first init");
        init_logging("INFO", &dir_text).expect("same config again");

        let relevel = init_logging("debug", &dir_text).unwrap_err();
        assert!(relevel.contains("refusing to switch"));
        let moved = init_logging("info", &other_text).unwrap_err();
        assert!(moved.contains("refusing to switch"));

        assert_eq!(logging_status(), Some(("info", dir)));
    }
}
