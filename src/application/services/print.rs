//! Print hand-off
//!
//! Sends a rendered handout document to a file or to an external print
//! command (e.g. `lp`, or a browser that opens the page). The command string
//! is split with shell quoting rules.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::{CommandRunner, FileSystem};
use crate::infrastructure::InfraError;

/// Where a printed document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintTarget {
    /// Write the document to this file
    File(PathBuf),
    /// Run this command with a temp file holding the document as last argument
    Command(String),
    /// Caller writes the document to stdout
    Stdout,
}

/// Service delivering handout documents.
pub struct PrintService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
}

impl PrintService {
    /// Create a new print service.
    pub fn new(fs: Arc<dyn FileSystem>, cmd: Arc<dyn CommandRunner>) -> Self {
        Self { fs, cmd }
    }

    /// Deliver `document` to `target`. `Stdout` is a no-op here.
    pub fn print(&self, document: &str, target: &PrintTarget) -> ApplicationResult<()> {
        match target {
            PrintTarget::File(path) => self.write_to(path, document),
            PrintTarget::Command(command) => self.send_to_command(command, document),
            PrintTarget::Stdout => Ok(()),
        }
    }

    fn write_to(&self, path: &Path, document: &str) -> ApplicationResult<()> {
        debug!("write_to: {}", path.display());
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, document)
            .with_path_context("write handout", path)
    }

    /// Run the print command on a temp copy of `document`.
    ///
    /// The temp file is kept: openers like `xdg-open` return before the
    /// viewer reads it.
    fn send_to_command(&self, command: &str, document: &str) -> ApplicationResult<()> {
        let words = shlex::split(command).ok_or_else(|| ApplicationError::Config {
            message: format!("print_command has unbalanced quotes: {command}"),
        })?;
        let (program, rest) = words.split_first().ok_or_else(|| ApplicationError::Config {
            message: "print_command is empty".into(),
        })?;

        let mut tmp = tempfile::Builder::new()
            .prefix("handout-")
            .suffix(".html")
            .tempfile()
            .map_err(|e| ApplicationError::OperationFailed {
                context: "create temp file for print".into(),
                source: Box::new(e),
            })?;
        let tmp_path = tmp.path().to_path_buf();
        tmp.write_all(document.as_bytes())
            .and_then(|_| tmp.flush())
            .with_path_context("write handout", &tmp_path)?;
        let tmp_path = tmp
            .into_temp_path()
            .keep()
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("keep {}", tmp_path.display()),
                source: Box::new(e),
            })?;

        let tmp_path = tmp_path.to_string_lossy().to_string();
        let mut args: Vec<&str> = rest.iter().map(String::as_str).collect();
        args.push(&tmp_path);
        debug!("send_to_command: {} {:?}", program, args);

        let result = self
            .cmd
            .run(program, &args)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("run print command: {program}"),
                source: Box::new(e),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ApplicationError::OperationFailed {
                context: format!("print command {}: {}", program, stderr),
                source: Box::new(InfraError::Print {
                    message: stderr.to_string(),
                    exit_code: result.status.code(),
                }),
            });
        }
        Ok(())
    }
}
