//! Logging configuration for wxdash.
//!
//! This module provides initialization and configuration for the tracing-based
//! logging system used throughout wxdash. Output starts on stderr; once the
//! dashboard takes over the terminal, [`LogRedirect::to_file`] moves it to a
//! log file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    prelude::*,
    EnvFilter,
};

use crate::error::{Error, Result};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Suppress all output except errors.
    Quiet,
    /// Normal output level (info and above).
    #[default]
    Normal,
    /// Verbose output (debug and above).
    Verbose,
    /// Very verbose output (trace level).
    Trace,
}

impl Verbosity {
    /// Convert verbosity to tracing level filter.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Shared switch between stderr and a log file.
///
/// Clones share the same destination.
#[derive(Debug, Clone, Default)]
pub struct LogRedirect {
    file: Arc<Mutex<Option<File>>>,
}

impl LogRedirect {
    /// Send all further log lines to `path` (appending, parents created).
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directory cannot be created.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let file = open_log_file(path)?;
        let mut slot = self
            .file
            .lock()
            .map_err(|_| Error::internal("log destination lock poisoned"))?;
        *slot = Some(file);
        Ok(())
    }

    /// Whether output currently goes to a file.
    #[must_use]
    pub fn is_redirected(&self) -> bool {
        self.file.lock().is_ok_and(|slot| slot.is_some())
    }
}

/// Writer handed out by [`LogRedirect`] for one log line.
#[derive(Debug)]
pub enum LogWriter<'a> {
    /// Standard error.
    Stderr(io::Stderr),
    /// The redirect file.
    File(MutexGuard<'a, Option<File>>),
}

impl Write for LogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stderr(stderr) => stderr.write(buf),
            Self::File(slot) => match slot.as_mut() {
                Some(file) => file.write(buf),
                None => Ok(buf.len()),
            },
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stderr(stderr) => stderr.flush(),
            Self::File(slot) => slot.as_mut().map_or(Ok(()), Write::flush),
        }
    }
}

impl<'a> MakeWriter<'a> for LogRedirect {
    type Writer = LogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match self.file.lock() {
            Ok(slot) if slot.is_some() => LogWriter::File(slot),
            _ => LogWriter::Stderr(io::stderr()),
        }
    }
}

/// Build the default filter directive for a verbosity level.
fn default_directive(verbosity: Verbosity) -> String {
    format!("wxdash={}", verbosity.to_level_filter())
}

/// Initialize the logging system, writing to stderr.
///
/// This should be called once at application startup. The logging level can be
/// controlled via:
/// 1. The `verbosity` parameter
/// 2. The `RUST_LOG` environment variable (takes precedence)
///
/// The returned handle moves output to a file later on.
///
/// # Examples
///
/// ```no_run
/// use wxdash::logging::{init_logging, Verbosity};
///
/// let redirect = init_logging(Verbosity::Normal);
/// redirect.to_file("/tmp/wxdash.log".as_ref()).unwrap();
/// ```
#[must_use]
pub fn init_logging(verbosity: Verbosity) -> LogRedirect {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let redirect = LogRedirect::default();
    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(redirect.clone())
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    // Ignore the error if a subscriber is already set
    let _ = subscriber.try_init();

    redirect
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_to_level() {
        assert_eq!(Verbosity::Quiet.to_level_filter(), Level::ERROR);
        assert_eq!(Verbosity::Normal.to_level_filter(), Level::INFO);
        assert_eq!(Verbosity::Verbose.to_level_filter(), Level::DEBUG);
        assert_eq!(Verbosity::Trace.to_level_filter(), Level::TRACE);
    }

    #[test]
    fn test_verbosity_default() {
        assert_eq!(Verbosity::default(), Verbosity::Normal);
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(Verbosity::Normal), "wxdash=INFO");
        assert_eq!(default_directive(Verbosity::Verbose), "wxdash=DEBUG");
    }

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wxdash.log");

        let file = open_log_file(&path);
        assert!(file.is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_under_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = open_log_file(&blocker.join("wxdash.log"));
        assert!(result.is_err());
    }

    #[test]
    fn test_redirect_starts_on_stderr() {
        let redirect = LogRedirect::default();
        assert!(!redirect.is_redirected());
        assert!(matches!(redirect.make_writer(), LogWriter::Stderr(_)));
    }

    #[test]
    fn test_redirect_to_file_captures_later_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("wxdash.log");
        let redirect = LogRedirect::default();
        let shared = redirect.clone();

        redirect.to_file(&path).unwrap();
        assert!(shared.is_redirected());

        {
            let mut writer = shared.make_writer();
            assert!(matches!(writer, LogWriter::File(_)));
            writer.write_all(b"database connection attempt 1 failed\n").unwrap();
            writer.flush().unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "database connection attempt 1 failed\n");
    }

    #[test]
    fn test_redirect_to_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let redirect = LogRedirect::default();
        assert!(redirect.to_file(&blocker.join("wxdash.log")).is_err());
        assert!(!redirect.is_redirected());
    }

    #[test]
    fn test_init_logging_does_not_panic() {
        // The subscriber may already be set by another test; that is ignored.
        let redirect = init_logging(Verbosity::Normal);
        assert!(!redirect.is_redirected());
    }
}
