//! Invariants of the composer checked over a sweep of budgets and inputs.

use pretty_assertions::assert_eq;
use tessera_core::{
    budget::PromptBudget,
    error::TesseraError,
    generic::{FragmentRole, PromptFragment},
};
use tessera_prompt::{
    chain::{FragmentChain, FragmentSet},
    composer::PromptComposer,
};

/// Deterministic pseudo-random sizes, so failures are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }
}

fn generated_set(rng: &mut Lcg) -> FragmentSet {
    let mut chain = FragmentChain::new()
        .with(sized("system-a", FragmentRole::System, rng.next(300)))
        .with(sized("system-b", FragmentRole::System, rng.next(300)))
        .with(sized("intent", FragmentRole::Intent, rng.next(100)))
        .with(sized("continuation", FragmentRole::Continuation, rng.next(20)));

    for index in 0..rng.next(12) {
        let text = format!("memory-{index}");
        chain = chain.with(sized(&text, FragmentRole::Memory, rng.next(900)));
    }
    for index in 0..rng.next(12) {
        let text = format!("history-{index}");
        chain = chain.with(sized(&text, FragmentRole::History, rng.next(900)));
    }

    chain.build()
}

fn sized(text: &str, role: FragmentRole, tokens: usize) -> PromptFragment {
    PromptFragment::new(text, role).with_estimated_tokens(tokens)
}

fn budgets() -> Vec<PromptBudget> {
    let mut budgets = Vec::new();
    for (max, reserve) in [(8192, 1024), (4096, 512), (1200, 200), (700, 100)] {
        for (memory, history) in [(0.3, 0.3), (0.5, 0.5), (0.0, 1.0), (0.1, 0.0)] {
            budgets.push(
                PromptBudget::new(max, reserve)
                    .unwrap()
                    .with_weight(FragmentRole::Memory, memory)
                    .unwrap()
                    .with_weight(FragmentRole::History, history)
                    .unwrap(),
            );
        }
    }
    budgets
}

#[test]
fn every_composition_respects_the_budget_and_keeps_prefixes() {
    let composer = PromptComposer::default();
    let mut rng = Lcg(42);
    let mut composed = 0;

    for budget in budgets() {
        for _ in 0..50 {
            let set = generated_set(&mut rng);

            let prompt = match composer.compose_set(&set, &budget) {
                Ok(prompt) => prompt,
                Err(TesseraError::BudgetExceeded {
                    required,
                    available,
                }) => {
                    assert!(required > available);
                    continue;
                }
                Err(other) => panic!("unexpected error: {other}"),
            };
            composed += 1;

            // Bounded.
            assert!(prompt.total_estimated_tokens() <= budget.available_tokens());

            // Fixed fragments are all present, in supply order.
            let fixed: Vec<_> = prompt
                .fragments()
                .iter()
                .filter(|fragment| fragment.role().is_fixed())
                .map(PromptFragment::text)
                .collect();
            assert_eq!(fixed, vec!["system-a", "system-b", "intent", "continuation"]);

            // Per variable role: a prefix of the candidates within the allocation.
            for role in FragmentRole::VARIABLE {
                let included: Vec<_> = prompt
                    .fragments()
                    .iter()
                    .filter(|fragment| fragment.role() == role)
                    .map(PromptFragment::text)
                    .collect();
                let offered: Vec<_> = set
                    .variable
                    .get(role)
                    .iter()
                    .map(PromptFragment::text)
                    .collect();

                assert_eq!(included.as_slice(), &offered[..included.len()]);

                let usage = prompt.usage(role);
                assert!(usage.used <= usage.allocated);
                assert_eq!(usage.included + usage.dropped, usage.offered);
            }

            // No hidden state.
            assert_eq!(composer.compose_set(&set, &budget).unwrap(), prompt);
        }
    }

    assert!(composed > 0);
}

#[test]
fn text_is_the_newline_join_of_fragments() {
    let budget = PromptBudget::new(8192, 1024)
        .unwrap()
        .with_weight(FragmentRole::History, 0.3)
        .unwrap()
        .with_weight(FragmentRole::Memory, 0.3)
        .unwrap();
    let set = FragmentChain::new()
        .with(PromptFragment::new("You are helpful.", FragmentRole::System))
        .with(PromptFragment::new("[Mon] alice: hi", FragmentRole::History))
        .with(PromptFragment::new("alice likes tea", FragmentRole::Memory))
        .with(PromptFragment::new("alice wants a greeting", FragmentRole::Intent))
        .with(PromptFragment::new("[Mon] bot:", FragmentRole::Continuation))
        .build();

    let prompt = PromptComposer::default().compose_set(&set, &budget).unwrap();

    assert_eq!(
        prompt.text(),
        "You are helpful.\nalice wants a greeting\nalice likes tea\n[Mon] alice: hi\n[Mon] bot:"
    );
}
