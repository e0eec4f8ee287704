//! The four canonical condition plans

use crate::config::catalog::ModelCatalog;
use arena_domain::{Agent, ConditionId, PromptTemplate, Provider};

/// How one condition produces its answer
#[derive(Debug, Clone)]
pub enum ConditionFlow {
    /// One system/user exchange
    SingleCall {
        provider: Provider,
        model: String,
        system: Option<String>,
    },
    /// Full multi-round debate over the given roster
    Debate { roster: Vec<Agent>, rounds: u32 },
}

/// One condition's identity and flow
#[derive(Debug, Clone)]
pub struct ConditionPlan {
    pub id: ConditionId,
    pub flow: ConditionFlow,
}

/// Build the four canonical condition plans from the resolved model catalog.
///
/// Returned in canonical slot order ([`ConditionId::ALL`]).
pub fn default_conditions(catalog: &ModelCatalog, rounds: u32) -> [ConditionPlan; 4] {
    let gemini = catalog.chain(Provider::Gemini).preferred.clone();
    let openai = catalog.chain(Provider::OpenAi).preferred.clone();

    [
        ConditionPlan {
            id: ConditionId::SinglePlain,
            flow: ConditionFlow::SingleCall {
                provider: Provider::Gemini,
                model: gemini.clone(),
                system: None,
            },
        },
        ConditionPlan {
            id: ConditionId::SinglePrimed,
            flow: ConditionFlow::SingleCall {
                provider: Provider::Gemini,
                model: gemini.clone(),
                system: Some(PromptTemplate::primed_system().to_string()),
            },
        },
        ConditionPlan {
            id: ConditionId::MixedDebate,
            flow: ConditionFlow::Debate {
                roster: mixed_roster(&gemini, &openai),
                rounds,
            },
        },
        ConditionPlan {
            id: ConditionId::SameBackendDebate,
            flow: ConditionFlow::Debate {
                roster: same_backend_roster(&gemini),
                rounds,
            },
        },
    ]
}

/// Roster spanning both backends: advocate and skeptic argue, the judge
/// moderates.
fn mixed_roster(gemini_model: &str, openai_model: &str) -> Vec<Agent> {
    vec![
        Agent::new(
            "advocate",
            "Advocate",
            Provider::Gemini,
            gemini_model,
            "You are the Advocate. Commit early to the best-supported answer and \
             defend it with concrete evidence and examples.",
        ),
        Agent::new(
            "skeptic",
            "Skeptic",
            Provider::OpenAi,
            openai_model,
            "You are the Skeptic. Stress-test every claim made in this debate: hunt \
             for weak evidence, hidden assumptions, and overconfident conclusions.",
        ),
        Agent::new(
            "judge",
            "Judge",
            Provider::Gemini,
            gemini_model,
            "You are the Judge. Track which arguments survive scrutiny and care only \
             about which answer is best supported, not who argued it.",
        )
        .as_moderator(),
    ]
}

/// Single-backend roster with three contrasting role primes.
fn same_backend_roster(model: &str) -> Vec<Agent> {
    vec![
        Agent::new(
            "optimist",
            "Optimist",
            Provider::Gemini,
            model,
            "You are the Optimist. Surface the most constructive reading of the \
             question and the strongest case for each promising answer.",
        ),
        Agent::new(
            "pessimist",
            "Pessimist",
            Provider::Gemini,
            model,
            "You are the Pessimist. Surface failure modes, costs, and the reasons \
             the obvious answer is wrong.",
        ),
        Agent::new(
            "pragmatist",
            "Pragmatist",
            Provider::Gemini,
            model,
            "You are the Pragmatist. Anchor the discussion in practical consequences \
             and back whichever position the evidence actually supports.",
        )
        .as_moderator(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_four_canonical_plans_in_order() {
        let plans = default_conditions(&ModelCatalog::default(), 2);
        let ids: Vec<_> = plans.iter().map(|p| p.id).collect();
        assert_eq!(ids, ConditionId::ALL);
    }

    #[test]
    fn test_mixed_debate_spans_backends() {
        let plans = default_conditions(&ModelCatalog::default(), 2);
        let ConditionFlow::Debate { roster, .. } = &plans[2].flow else {
            panic!("mixed debate slot must be a debate");
        };
        let providers: HashSet<_> = roster.iter().map(|a| a.provider).collect();
        assert!(providers.len() > 1);
    }

    #[test]
    fn test_same_backend_debate_uses_one_backend() {
        let plans = default_conditions(&ModelCatalog::default(), 2);
        let ConditionFlow::Debate { roster, .. } = &plans[3].flow else {
            panic!("same-backend slot must be a debate");
        };
        let providers: HashSet<_> = roster.iter().map(|a| a.provider).collect();
        assert_eq!(providers.len(), 1);
        // Roles must still differ
        let personas: HashSet<_> = roster.iter().map(|a| a.persona.clone()).collect();
        assert_eq!(personas.len(), roster.len());
    }

    #[test]
    fn test_every_debate_has_exactly_one_moderator() {
        for plan in default_conditions(&ModelCatalog::default(), 2) {
            if let ConditionFlow::Debate { roster, .. } = &plan.flow {
                assert_eq!(roster.iter().filter(|a| a.moderator).count(), 1);
            }
        }
    }

    #[test]
    fn test_primed_condition_carries_system_prompt() {
        let plans = default_conditions(&ModelCatalog::default(), 2);
        let ConditionFlow::SingleCall { system, .. } = &plans[1].flow else {
            panic!("primed slot must be a single call");
        };
        assert!(system.is_some());

        let ConditionFlow::SingleCall { system, .. } = &plans[0].flow else {
            panic!("plain slot must be a single call");
        };
        assert!(system.is_none());
    }
}
