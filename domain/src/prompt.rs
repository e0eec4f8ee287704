//! Prompt templates for the debate flow
//!
//! Prompt construction is keyed by the closed [`PromptKind`] set so each
//! format contract stays independently testable. Excerpt bounds cap prompt
//! growth as rounds and agents scale.

use crate::debate::transcript::Transcript;
use crate::util::excerpt;

/// Maximum bytes of one peer turn quoted into a rebuttal prompt.
pub const PEER_EXCERPT_MAX: usize = 1200;

/// Maximum bytes of one turn quoted into the synthesis digest.
pub const SYNTHESIS_EXCERPT_MAX: usize = 2400;

/// The kinds of prompt a debate can issue (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Round 1: initial position
    Opening,
    /// Round 2 and later: respond to peers
    Rebuttal,
    /// Final moderator pass
    Synthesis,
}

impl PromptKind {
    /// Kind of prompt an agent receives in a given debate round
    pub fn for_round(round: u32) -> PromptKind {
        if round <= 1 {
            PromptKind::Opening
        } else {
            PromptKind::Rebuttal
        }
    }
}

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System rules seeded into every debating agent's history, with the
    /// agent's persona interpolated.
    pub fn debate_rules(persona: &str) -> String {
        format!(
            r#"You are taking part in a structured multi-round debate with other AI participants.

Your role: {}

Rules of the debate:
1. Argue your genuine assessment; do not agree merely to converge.
2. Engage directly with the strongest points made by other participants.
3. Concede a point explicitly when a peer's argument is better than yours.
4. Keep every reply under the requested sections and stay on the question.
5. Report a confidence value between 0 and 100 in every reply."#,
            persona
        )
    }

    /// System prompt for the role-primed single-call condition
    pub fn primed_system() -> &'static str {
        r#"You are a careful senior analyst. Before answering, weigh the strongest
arguments on every side of the question, then commit to the best-supported
position. Be concrete, cite your reasoning, and state what would change your
mind."#
    }

    /// User prompt for round 1
    pub fn opening(question: &str) -> String {
        format!(
            r#"The debate question is:

{}

Give your opening statement using exactly these labeled sections:

ANSWER: your direct answer in a few sentences
REASONING:
- the main arguments supporting your answer, as bullets
QUESTIONS FOR PEERS:
- up to two questions you want the other participants to address
CONFIDENCE: a number from 0 to 100"#,
            question
        )
    }

    /// User prompt for round 2 and later.
    ///
    /// `peers` holds (agent name, previous-round content) for every *other*
    /// participant; each excerpt is bounded by [`PEER_EXCERPT_MAX`].
    pub fn rebuttal(round: u32, peers: &[(String, String)]) -> String {
        let mut prompt = format!(
            "This is round {} of the debate. Your fellow participants said in the previous round:\n",
            round
        );

        for (name, content) in peers {
            prompt.push_str(&format!(
                "\n--- {} ---\n{}\n",
                name,
                excerpt(content, PEER_EXCERPT_MAX)
            ));
        }

        prompt.push_str(
            r#"
Respond using exactly these labeled sections:

CRITIQUE: where the other participants are wrong or incomplete
POSITION: defend your previous answer or concede, explicitly saying which
QUESTIONS FOR PEERS:
- up to two questions, only if something genuinely needs answering
CONFIDENCE: your updated number from 0 to 100"#,
        );

        prompt
    }

    /// Moderator prompt: question plus a condensed digest of the whole
    /// transcript, each turn bounded by [`SYNTHESIS_EXCERPT_MAX`].
    pub fn synthesis(question: &str, transcript: &Transcript) -> String {
        let mut prompt = format!(
            r#"You moderated a debate on the question:

{}

Full discussion, in order:
"#,
            question
        );

        for turn in transcript.turns() {
            prompt.push_str(&format!(
                "\n[round {}] {}:\n{}\n",
                turn.round,
                turn.agent_name,
                excerpt(&turn.content, SYNTHESIS_EXCERPT_MAX)
            ));
        }

        prompt.push_str(
            r#"
Synthesize the debate into one final verdict using exactly these sections:

FINAL ANSWER: the single best-supported answer to the question
JUSTIFICATION: why this answer wins, referencing the debate
REMAINING UNCERTAINTY: what is still unresolved
FINAL CONFIDENCE: a number from 0 to 100"#,
        );

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::Provider;
    use crate::debate::agent::AgentId;
    use crate::debate::transcript::Turn;

    #[test]
    fn test_kind_for_round() {
        assert_eq!(PromptKind::for_round(1), PromptKind::Opening);
        assert_eq!(PromptKind::for_round(2), PromptKind::Rebuttal);
        assert_eq!(PromptKind::for_round(7), PromptKind::Rebuttal);
    }

    #[test]
    fn test_rules_interpolate_persona() {
        let rules = PromptTemplate::debate_rules("You are the skeptic.");
        assert!(rules.contains("You are the skeptic."));
        assert!(rules.contains("confidence value between 0 and 100"));
    }

    #[test]
    fn test_opening_format() {
        let prompt = PromptTemplate::opening("Is P equal to NP?");
        assert!(prompt.contains("Is P equal to NP?"));
        assert!(prompt.contains("ANSWER:"));
        assert!(prompt.contains("REASONING:"));
        assert!(prompt.contains("QUESTIONS FOR PEERS:"));
        assert!(prompt.contains("CONFIDENCE:"));
    }

    #[test]
    fn test_rebuttal_includes_peers_and_round() {
        let peers = vec![
            ("Advocate".to_string(), "Yes, because X.".to_string()),
            ("Skeptic".to_string(), "No, because Y.".to_string()),
        ];
        let prompt = PromptTemplate::rebuttal(2, &peers);
        assert!(prompt.contains("round 2"));
        assert!(prompt.contains("--- Advocate ---"));
        assert!(prompt.contains("--- Skeptic ---"));
        assert!(prompt.contains("Yes, because X."));
        assert!(prompt.contains("POSITION:"));
    }

    #[test]
    fn test_rebuttal_bounds_peer_excerpts() {
        let long = "a".repeat(PEER_EXCERPT_MAX * 3);
        let peers = vec![("Verbose".to_string(), long)];
        let prompt = PromptTemplate::rebuttal(3, &peers);
        // The quoted excerpt must be bounded, not the raw 3x content
        assert!(prompt.len() < PEER_EXCERPT_MAX * 2);
        assert!(prompt.contains('…'));
    }

    #[test]
    fn test_synthesis_digest_labels_rounds_and_agents() {
        let mut transcript = Transcript::new();
        transcript.record(Turn {
            round: 1,
            agent_id: AgentId::new("a"),
            agent_name: "Advocate".to_string(),
            provider: Provider::Gemini,
            model: "m".to_string(),
            content: "Opening claim".to_string(),
        });
        transcript.record(Turn {
            round: 2,
            agent_id: AgentId::new("a"),
            agent_name: "Advocate".to_string(),
            provider: Provider::Gemini,
            model: "m".to_string(),
            content: "Rebuttal claim".to_string(),
        });

        let prompt = PromptTemplate::synthesis("The question?", &transcript);
        assert!(prompt.contains("The question?"));
        assert!(prompt.contains("[round 1] Advocate:"));
        assert!(prompt.contains("[round 2] Advocate:"));
        assert!(prompt.contains("FINAL ANSWER:"));
        assert!(prompt.contains("REMAINING UNCERTAINTY:"));
    }
}
