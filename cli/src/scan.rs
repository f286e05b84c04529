//! Line-oriented scan loop: each input line is one QR decode.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use tixgate_workflow::{ExpirationOutcome, ScanEvent, ScannerSession, Stage};

/// Tally of a scan loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub scanned: usize,
    pub confirmed: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl ScanSummary {
    fn record(&mut self, outcome: &ExpirationOutcome) {
        self.scanned += 1;
        match outcome.stage() {
            Stage::Confirmed => self.confirmed += 1,
            Stage::Failed => self.failed += 1,
            _ => self.rejected += 1,
        }
    }
}

/// Read decodes from `input` until EOF, expiring each scanned ticket.
///
/// Blank lines stand for frames where nothing was decoded.
pub async fn run<R>(session: &mut ScannerSession, input: R) -> std::io::Result<ScanSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut summary = ScanSummary::default();

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            session.on_scan(ScanEvent::Error("no code decoded".into()));
            continue;
        }
        session.on_scan(ScanEvent::Decoded(text.to_string()));
        let outcome = session.mark_expired().await;
        summary.record(&outcome);
    }

    Ok(summary)
}
