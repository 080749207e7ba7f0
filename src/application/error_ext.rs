//! Error conversion helpers for I/O operations
//!
//! Turns `io::Result` into `ApplicationResult` carrying the action and path.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Attach `action` and `path` to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.write(&output, &document)
    ///     .with_path_context("write handout", &output)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::OperationFailed {
            context: format!("{action}: {}", path.display()),
            source: Box::new(source),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_io_error_when_adding_context_then_message_names_action_and_path() {
        let err: io::Result<()> = Err(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));

        let err = err
            .with_path_context("write handout", Path::new("/tmp/out.html"))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "operation failed: write handout: /tmp/out.html"
        );
    }
}
