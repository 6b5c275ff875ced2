use crate::application::hooks::HookEvent;
use crate::error::{FeeError, Result};
use std::io::BufRead;

/// Reads host hook events from a JSON-lines source. Blank lines are skipped.
pub struct EventReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Lazily parses one event per line; a malformed line yields an error without
    /// ending the stream.
    pub fn events(self) -> impl Iterator<Item = Result<HookEvent>> {
        self.source.lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str(&line).map_err(FeeError::from)),
            Err(e) => Some(Err(FeeError::from(e))),
        })
    }
}
