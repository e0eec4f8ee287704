//! Console output formatting for runs

use arena_domain::Run;
use colored::Colorize;

/// Formats a blinded run for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Blinded listing, optionally with full transcripts
    pub fn format(run: &Run, show_transcripts: bool) -> String {
        let mut out = String::new();

        out.push_str(&format!("{}\n", format!("Run {}", run.id()).dimmed()));
        out.push_str(&format!("Question: {}\n", run.question()));

        for response in run.responses() {
            out.push('\n');
            out.push_str(&format!(
                "{}\n",
                format!("=== {} ===", response.label).bold().cyan()
            ));
            out.push_str(&response.answer);
            out.push('\n');

            if show_transcripts && !response.transcript.is_empty() {
                out.push_str(&format!("{}\n", "--- transcript ---".dimmed()));
                for turn in response.transcript.turns() {
                    out.push_str(&format!(
                        "{}\n{}\n",
                        format!(
                            "[round {}] {} ({}/{})",
                            turn.round, turn.agent_name, turn.provider, turn.model
                        )
                        .dimmed(),
                        turn.content
                    ));
                }
            }
        }

        out
    }

    /// Blinded JSON payload (the label -> condition key is never serialized)
    pub fn format_json(run: &Run) -> String {
        serde_json::to_string_pretty(run)
            .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
    }

    /// Explicit reveal: the label -> condition mapping
    pub fn format_reveal(run: &Run) -> String {
        let mut out = String::new();
        out.push_str(&format!("\n{}\n", "Reveal".bold().yellow()));
        for response in run.responses() {
            let condition = run.reveal(response.label);
            out.push_str(&format!("{} <- {}\n", response.label, condition.label()));
        }
        out
    }
}
