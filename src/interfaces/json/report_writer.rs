use crate::domain::payment::SessionDescriptor;
use crate::domain::session::{SessionOutcome, SessionState};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// What a single CLI run reports about its payment attempt.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    /// Whether the checkout session was opened at all.
    pub initiated: bool,
    pub outcome: Option<SessionOutcome>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub descriptor: Option<SessionDescriptor>,
}

impl SessionReport {
    pub fn new(
        state: &SessionState,
        outcome: Option<SessionOutcome>,
        descriptor: Option<SessionDescriptor>,
    ) -> Self {
        Self {
            initiated: descriptor.is_some(),
            outcome,
            is_loading: state.is_loading(),
            error: state.error.clone(),
            descriptor,
        }
    }
}

/// Writes reports as pretty-printed JSON.
pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_report(&mut self, report: &SessionReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
