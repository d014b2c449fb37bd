use log::warn;

use crate::common::packed::PackedReader;
use crate::{ParserError, Warning};

/// Per-call decoding state. There is no global state: every decode call gets its own context.
#[derive(Debug, Default)]
pub struct DecodeContext {
    /// When set, recoverable errors are returned instead of being downgraded to warnings.
    pub strict: bool,
    path: Vec<String>,
    warnings: Vec<Warning>,
}

impl DecodeContext {
    pub fn new(strict: bool) -> Self {
        DecodeContext {
            strict,
            ..Default::default()
        }
    }

    /// Human readable location, e.g. `motion 'walk' / bone 'spine' / channel 3`.
    pub fn location(&self) -> String {
        if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.path.join(" / ")
        }
    }

    /// Runs `f` with `segment` appended to the location. Errors leaving `f` get the location attached.
    pub fn scoped<T>(
        &mut self,
        segment: impl Into<String>,
        f: impl FnOnce(&mut DecodeContext) -> Result<T, ParserError>,
    ) -> Result<T, ParserError> {
        self.path.push(segment.into());
        let result = f(self).map_err(|err| match err {
            // only the innermost scope attaches the location, it already contains the outer segments
            err @ ParserError::Context { .. } => err,
            err => ParserError::Context {
                context: self.location(),
                source: Box::new(err),
            },
        });
        self.path.pop();
        result
    }

    /// Downgrades `err` to a warning and yields `default`, unless decoding is strict.
    pub fn recover<T>(&mut self, err: ParserError, default: T) -> Result<T, ParserError> {
        if self.strict {
            return Err(err);
        }

        let context = self.location();
        warn!("{}: {} (continuing)", context, err);
        self.warnings.push(Warning::Recovered { context, error: err });
        Ok(default)
    }

    pub fn warn(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Reads a NUL terminated string. A missing terminator is recoverable: the rest of the buffer becomes the string.
    pub fn read_name(&mut self, rdr: &mut PackedReader<'_>) -> Result<String, ParserError> {
        match rdr.read_cstring() {
            Err(ParserError::UnterminatedString { offset, partial }) => {
                rdr.read_rest();
                self.recover(
                    ParserError::UnterminatedString {
                        offset,
                        partial: partial.clone(),
                    },
                    partial,
                )
            }
            result => result,
        }
    }
}
