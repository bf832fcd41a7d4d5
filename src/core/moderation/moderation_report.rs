// Console output for a moderation run.
//
// Writes the human-readable trace: a banner, one line per event and the final
// summary. Structured diagnostics go through `tracing` instead.

use super::moderation_models::{short_id, ModerationAction, ModerationOutcome, ModerationSummary};
use super::moderation_service::ModerationReporter;
use std::io::Write;

const RULE_WIDTH: usize = 60;

pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self) {
        self.line("🎯 BLKOUT Events Calendar - Event Approval Script");
        self.line(&"=".repeat(RULE_WIDTH));
        self.line("");
    }

    /// Final block printed after both lists were processed.
    pub fn summary(&mut self, summary: &ModerationSummary, public_url: &str) {
        self.line(&"=".repeat(RULE_WIDTH));
        self.line("📊 SUMMARY");
        self.line(&"-".repeat(RULE_WIDTH));
        self.line(&format!(
            "✅ Approved: {} community events",
            summary.approved
        ));
        self.line(&format!("🗑️  Archived: {} test events", summary.archived));
        if !summary.failures.is_empty() {
            self.line(&format!("⚠️  Failed: {} events", summary.failed_count()));
        }
        self.line("");
        self.line("🎉 Events should now be visible at:");
        self.line(&format!("   {}", public_url));
        self.line("");
    }

    fn line(&mut self, text: &str) {
        // Losing console output must not abort the run.
        let _ = writeln!(self.out, "{}", text);
    }
}

fn section_title(action: ModerationAction) -> &'static str {
    match action {
        ModerationAction::Approve => "✅ APPROVING COMMUNITY EVENTS",
        ModerationAction::Reject => "🗑️  ARCHIVING TEST EVENTS",
    }
}

fn section_total(action: ModerationAction, succeeded: usize, total: usize) -> String {
    match action {
        ModerationAction::Approve => {
            format!("✅ Successfully approved {}/{} events", succeeded, total)
        }
        ModerationAction::Reject => {
            format!(
                "🗑️  Successfully archived {}/{} test events",
                succeeded, total
            )
        }
    }
}

impl<W: Write> ModerationReporter for ConsoleReporter<W> {
    fn section_started(&mut self, action: ModerationAction, _total: usize) {
        self.line(section_title(action));
        self.line(&"-".repeat(RULE_WIDTH));
    }

    fn attempting(&mut self, event_id: &str, action: ModerationAction) {
        let _ = write!(self.out, "{} event {}... ", action.verb(), short_id(event_id));
        let _ = self.out.flush();
    }

    fn finished(&mut self, outcome: &ModerationOutcome) {
        if outcome.succeeded {
            self.line(&format!("✓ {}", outcome.action.outcome_label()));
            return;
        }
        // The diagnostic continues the progress line, the verdict goes below it.
        if let Some(reason) = &outcome.error {
            self.line(&format!("  ❌ Error: {}", reason));
        }
        self.line("✗ Failed");
    }

    fn section_finished(&mut self, action: ModerationAction, succeeded: usize, total: usize) {
        self.line("");
        self.line(&section_total(action, succeeded, total));
        self.line("");
    }
}
