//! Budget-aware prompt composition.
//!
//! [`PromptComposer::compose`] turns fixed fragments plus ranked candidates
//! into one prompt that is guaranteed to fit the [`PromptBudget`]:
//!
//! 1. every fixed fragment (system, intent, continuation) is included; if
//!    they alone do not fit, composition fails with
//!    [`TesseraError::BudgetExceeded`],
//! 2. each variable role gets `floor(remaining × weight)` tokens and takes
//!    whole fragments, in supply order, until the next one would overflow,
//! 3. unused allocation is not handed to other roles,
//! 4. fragments render as System → Intent → Memory → History → Continuation,
//!    joined by newlines.
//!
//! ```rust
//! use tessera_core::{budget::PromptBudget, generic::{FragmentRole, PromptFragment}};
//! use tessera_prompt::{chain::FragmentChain, composer::PromptComposer};
//!
//! let budget = PromptBudget::new(100, 20)?.with_weight(FragmentRole::History, 0.5)?;
//! let set = FragmentChain::new()
//!     .with(PromptFragment::new("You are terse.", FragmentRole::System))
//!     .with(PromptFragment::new("bot:", FragmentRole::Continuation))
//!     .with(PromptFragment::new("alice: hi", FragmentRole::History))
//!     .build();
//!
//! let prompt = PromptComposer::default().compose_set(&set, &budget)?;
//!
//! assert_eq!(prompt.text(), "You are terse.\nalice: hi\nbot:");
//! assert!(prompt.total_estimated_tokens() <= budget.available_tokens());
//! # Ok::<(), tessera_core::error::TesseraError>(())
//! ```
//!
//! The composer holds no mutable state; share one instance freely.
use std::collections::{BTreeMap, BTreeSet};

use tessera_core::{
    budget::PromptBudget,
    error::{Result, TesseraError},
    generic::{FragmentRole, PromptFragment},
};

use crate::{
    chain::{FragmentSet, VariableFragments},
    estimate::TokenEstimator,
};

/// How a variable role fared during composition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleUsage {
    /// Tokens the role was allowed to use.
    pub allocated: usize,
    /// Tokens taken by the included fragments.
    pub used: usize,
    /// Candidates supplied by the caller.
    pub offered: usize,
    pub included: usize,
    /// Candidates left out because the allocation was exhausted.
    pub dropped: usize,
}

/// The final, budget-checked prompt of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    fragments: Vec<PromptFragment>,
    total_estimated_tokens: usize,
    available_tokens: usize,
    usage: BTreeMap<FragmentRole, RoleUsage>,
}

impl ComposedPrompt {
    /// Included fragments in render order, each with its token estimate set.
    pub fn fragments(&self) -> &[PromptFragment] {
        &self.fragments
    }

    pub fn total_estimated_tokens(&self) -> usize {
        self.total_estimated_tokens
    }

    /// Prompt tokens the budget allowed (limit minus response reserve).
    pub fn available_tokens(&self) -> usize {
        self.available_tokens
    }

    /// Allocation report of a variable role.
    pub fn usage(&self, role: FragmentRole) -> RoleUsage {
        self.usage.get(&role).copied().unwrap_or_default()
    }

    /// Total number of candidates that did not fit.
    pub fn dropped_count(&self) -> usize {
        self.usage.values().map(|usage| usage.dropped).sum()
    }

    /// Roles that were offered candidates but ended up with none.
    pub fn emptied_roles(&self) -> Vec<FragmentRole> {
        self.usage
            .iter()
            .filter(|(_, usage)| usage.offered > 0 && usage.included == 0)
            .map(|(role, _)| *role)
            .collect()
    }

    /// The prompt string sent to the completion provider.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(PromptFragment::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptComposer {
    estimator: TokenEstimator,
    reversed_roles: BTreeSet<FragmentRole>,
}

impl PromptComposer {
    pub fn new(estimator: TokenEstimator) -> Self {
        Self {
            estimator,
            reversed_roles: BTreeSet::new(),
        }
    }

    /// Render the included fragments of `role` in reverse supply order.
    ///
    /// Selection still walks the supplied order, so a newest-first history
    /// keeps the most recent messages and renders them oldest first.
    pub fn render_reversed(mut self, role: FragmentRole) -> Self {
        self.reversed_roles.insert(role);
        self
    }

    pub fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    /// Convenience wrapper around [`Self::compose`] for a [`FragmentSet`].
    pub fn compose_set(&self, set: &FragmentSet, budget: &PromptBudget) -> Result<ComposedPrompt> {
        self.compose(&set.fixed, &set.variable, budget)
    }

    /// Compose a prompt from `fixed` fragments and ranked `variable`
    /// candidates.
    ///
    /// # Errors
    ///
    /// * [`TesseraError::InvalidRequest`] – a variable-role fragment was
    ///   passed among the fixed ones.
    /// * [`TesseraError::BudgetExceeded`] – the fixed fragments alone exceed
    ///   the available budget.
    pub fn compose(
        &self,
        fixed: &[PromptFragment],
        variable: &VariableFragments,
        budget: &PromptBudget,
    ) -> Result<ComposedPrompt> {
        let available = budget.available_tokens();

        let mut included = Vec::with_capacity(fixed.len());
        let mut fixed_cost = 0usize;
        for fragment in fixed {
            if fragment.role().is_variable() {
                return Err(TesseraError::InvalidRequest(format!(
                    "`{}` fragments must be passed as variable candidates",
                    fragment.role()
                )));
            }

            let cost = self.estimator.estimate(fragment);
            fixed_cost = fixed_cost.saturating_add(cost);
            included.push(fragment.clone().with_estimated_tokens(cost));
        }

        if fixed_cost > available {
            return Err(TesseraError::BudgetExceeded {
                required: fixed_cost,
                available,
            });
        }

        let remaining = available - fixed_cost;
        let mut unallocated = remaining;
        let mut usage = BTreeMap::new();

        for role in FragmentRole::VARIABLE {
            let share = (remaining as f64 * budget.weight(role)).floor() as usize;
            let allocation = share.min(unallocated);
            unallocated -= allocation;

            let candidates = variable.get(role);
            let mut role_usage = RoleUsage {
                allocated: allocation,
                offered: candidates.len(),
                ..RoleUsage::default()
            };

            let mut selected = Vec::new();
            for fragment in candidates {
                let cost = self.estimator.estimate(fragment);
                if role_usage.used.saturating_add(cost) > allocation {
                    break;
                }
                role_usage.used += cost;
                selected.push(fragment.clone().with_estimated_tokens(cost));
            }

            role_usage.included = selected.len();
            role_usage.dropped = role_usage.offered - role_usage.included;

            if role_usage.offered > 0 && role_usage.included == 0 {
                tracing::debug!(
                    %role,
                    allocated = allocation,
                    offered = role_usage.offered,
                    "no candidate fits the role allocation"
                );
            }

            if self.reversed_roles.contains(&role) {
                selected.reverse();
            }
            included.extend(selected);
            usage.insert(role, role_usage);
        }

        // Stable: keeps supply order within a role.
        included.sort_by_key(PromptFragment::role);

        let total_estimated_tokens = fixed_cost + usage.values().map(|u| u.used).sum::<usize>();

        tracing::debug!(
            available,
            fixed_cost,
            total = total_estimated_tokens,
            memory_used = usage.get(&FragmentRole::Memory).map_or(0, |u| u.used),
            history_used = usage.get(&FragmentRole::History).map_or(0, |u| u.used),
            "prompt composed"
        );

        Ok(ComposedPrompt {
            fragments: included,
            total_estimated_tokens,
            available_tokens: available,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chain::FragmentChain;

    fn sized(text: &str, role: FragmentRole, tokens: usize) -> PromptFragment {
        PromptFragment::new(text, role).with_estimated_tokens(tokens)
    }

    fn reference_budget() -> PromptBudget {
        PromptBudget::new(8192, 1024)
            .unwrap()
            .with_weight(FragmentRole::History, 0.3)
            .unwrap()
            .with_weight(FragmentRole::Memory, 0.3)
            .unwrap()
    }

    fn texts(prompt: &ComposedPrompt) -> Vec<&str> {
        prompt.fragments().iter().map(PromptFragment::text).collect()
    }

    #[test]
    fn reference_scenario_allocates_two_thousand_per_role() {
        let set = FragmentChain::new()
            .with(sized("system", FragmentRole::System, 500))
            .with(sized("h800", FragmentRole::History, 800))
            .with(sized("h900", FragmentRole::History, 900))
            .with(sized("h500", FragmentRole::History, 500))
            .build();

        let prompt = PromptComposer::default()
            .compose_set(&set, &reference_budget())
            .unwrap();

        assert_eq!(texts(&prompt), vec!["system", "h800", "h900"]);
        assert_eq!(
            prompt.usage(FragmentRole::History),
            RoleUsage {
                allocated: 2000,
                used: 1700,
                offered: 3,
                included: 2,
                dropped: 1,
            }
        );
        assert_eq!(prompt.usage(FragmentRole::Memory).allocated, 2000);
        assert_eq!(prompt.total_estimated_tokens(), 2200);
        assert_eq!(prompt.available_tokens(), 7168);
    }

    #[test]
    fn oversized_fixed_fragments_fail() {
        let set = FragmentChain::new()
            .with(sized("system", FragmentRole::System, 9000))
            .build();

        let err = PromptComposer::default()
            .compose_set(&set, &reference_budget())
            .unwrap_err();

        assert!(matches!(
            err,
            TesseraError::BudgetExceeded {
                required: 9000,
                available: 7168
            }
        ));
    }

    #[test]
    fn fixed_fragments_may_fill_the_budget_exactly() {
        let set = FragmentChain::new()
            .with(sized("system", FragmentRole::System, 7168))
            .with(sized("h", FragmentRole::History, 1))
            .build();

        let prompt = PromptComposer::default()
            .compose_set(&set, &reference_budget())
            .unwrap();

        assert_eq!(texts(&prompt), vec!["system"]);
        assert_eq!(prompt.emptied_roles(), vec![FragmentRole::History]);
    }

    #[test]
    fn empty_variable_inputs_yield_fixed_only_prompt() {
        let set = FragmentChain::new()
            .with(sized("system", FragmentRole::System, 10))
            .with(sized("bot:", FragmentRole::Continuation, 2))
            .build();

        let prompt = PromptComposer::default()
            .compose_set(&set, &reference_budget())
            .unwrap();

        assert_eq!(prompt.text(), "system\nbot:");
        assert_eq!(prompt.dropped_count(), 0);
        assert!(prompt.emptied_roles().is_empty());
    }

    #[test]
    fn render_order_ignores_supply_order() {
        let set = FragmentChain::new()
            .with(sized("cont", FragmentRole::Continuation, 1))
            .with(sized("hist", FragmentRole::History, 1))
            .with(sized("intent", FragmentRole::Intent, 1))
            .with(sized("mem", FragmentRole::Memory, 1))
            .with(sized("sys", FragmentRole::System, 1))
            .build();

        let prompt = PromptComposer::default()
            .compose_set(&set, &reference_budget())
            .unwrap();

        assert_eq!(texts(&prompt), vec!["sys", "intent", "mem", "hist", "cont"]);
    }

    #[test]
    fn oversized_first_candidate_empties_the_role() {
        let set = FragmentChain::new()
            .with(sized("sys", FragmentRole::System, 500))
            .with(sized("huge", FragmentRole::Memory, 2001))
            .with(sized("small", FragmentRole::Memory, 1))
            .build();

        let prompt = PromptComposer::default()
            .compose_set(&set, &reference_budget())
            .unwrap();

        assert_eq!(texts(&prompt), vec!["sys"]);
        assert_eq!(prompt.usage(FragmentRole::Memory).dropped, 2);
        assert_eq!(prompt.emptied_roles(), vec![FragmentRole::Memory]);
    }

    #[test]
    fn unused_allocation_is_not_redistributed() {
        let set = FragmentChain::new()
            .with(sized("sys", FragmentRole::System, 500))
            .with(sized("h1", FragmentRole::History, 2000))
            .with(sized("h2", FragmentRole::History, 1))
            .build();

        let prompt = PromptComposer::default()
            .compose_set(&set, &reference_budget())
            .unwrap();

        // Memory has nothing to spend, history still stops at its own 2000.
        assert_eq!(texts(&prompt), vec!["sys", "h1"]);
        assert_eq!(prompt.usage(FragmentRole::Memory).used, 0);
        assert_eq!(prompt.usage(FragmentRole::History).allocated, 2000);
        assert_eq!(prompt.usage(FragmentRole::History).dropped, 1);
    }

    #[test]
    fn unweighted_roles_receive_nothing() {
        let budget = PromptBudget::new(100, 0).unwrap();
        let set = FragmentChain::new()
            .with(sized("mem", FragmentRole::Memory, 1))
            .build();

        let prompt = PromptComposer::default().compose_set(&set, &budget).unwrap();

        assert!(prompt.fragments().is_empty());
        assert_eq!(prompt.usage(FragmentRole::Memory).allocated, 0);
    }

    #[test]
    fn variable_role_among_fixed_is_rejected() {
        let fixed = vec![sized("h", FragmentRole::History, 1)];

        let err = PromptComposer::default()
            .compose(&fixed, &VariableFragments::new(), &reference_budget())
            .unwrap_err();

        assert!(matches!(err, TesseraError::InvalidRequest(_)));
    }

    #[test]
    fn estimates_fragments_without_counts() {
        let estimator = TokenEstimator::new(2.0).unwrap();
        let budget = PromptBudget::new(9, 0)
            .unwrap()
            .with_weight(FragmentRole::History, 1.0)
            .unwrap();
        let set = FragmentChain::new()
            .with(PromptFragment::new("abcd", FragmentRole::System))
            .with(PromptFragment::new("abcdefgh", FragmentRole::History))
            .with(PromptFragment::new("abcdefgh", FragmentRole::History))
            .build();

        let prompt = PromptComposer::new(estimator).compose_set(&set, &budget).unwrap();

        assert_eq!(prompt.total_estimated_tokens(), 6);
        assert_eq!(prompt.fragments()[1].estimated_tokens(), Some(4));
        assert_eq!(prompt.usage(FragmentRole::History).dropped, 1);
    }

    #[test]
    fn reversed_roles_render_backwards_but_select_forwards() {
        let budget = PromptBudget::new(10, 0)
            .unwrap()
            .with_weight(FragmentRole::History, 0.5)
            .unwrap();
        let set = FragmentChain::new()
            .with(sized("newest", FragmentRole::History, 2))
            .with(sized("older", FragmentRole::History, 2))
            .with(sized("oldest", FragmentRole::History, 2))
            .build();

        let prompt = PromptComposer::default()
            .render_reversed(FragmentRole::History)
            .compose_set(&set, &budget)
            .unwrap();

        assert_eq!(texts(&prompt), vec!["older", "newest"]);
    }

    #[test]
    fn composing_twice_gives_the_same_prompt() {
        let set = FragmentChain::new()
            .with(PromptFragment::new("system text", FragmentRole::System))
            .with(PromptFragment::new("a memory", FragmentRole::Memory))
            .with(PromptFragment::new("a message", FragmentRole::History))
            .build();
        let composer = PromptComposer::default();

        let first = composer.compose_set(&set, &reference_budget()).unwrap();
        let second = composer.compose_set(&set, &reference_budget()).unwrap();

        assert_eq!(first, second);
    }
}
