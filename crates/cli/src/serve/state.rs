//! Application state shared by the handlers.

use fil_codegen::GenerateOptions;
use fil_core::ParseOptions;

/// Read-only configuration; each request runs its own translation.
pub(crate) struct AppState {
    /// Largest accepted source text, in bytes.
    pub(crate) max_source_size: usize,
    pub(crate) parse_options: ParseOptions,
    pub(crate) generate_options: GenerateOptions,
}

impl AppState {
    /// Reject sources that are too large or contain NUL bytes.
    pub(crate) fn check_source(&self, source: &str) -> Result<(), &'static str> {
        if source.len() > self.max_source_size {
            return Err("source content exceeds maximum size");
        }
        if source.contains('\0') {
            return Err("source content must not contain null bytes");
        }
        Ok(())
    }
}
