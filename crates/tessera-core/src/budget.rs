//! Token budget that bounds a composed prompt.
//!
//! ```text
//! ┌──────────────────────── max_total_tokens ────────────────────────┐
//! │ reserved_for_response │ fixed fragments │ memory │ history │ …   │
//! └───────────────────────┴─────────────────┴────────┴─────────┴─────┘
//!                         └───────────── available ──────────────────┘
//! ```
//!
//! Variable roles receive `weight × (available − fixed)` tokens each. The
//! weights are validated once, here, so the composer never has to second-guess
//! them.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    error::{Result, TesseraError},
    generic::FragmentRole,
};

/// Tolerance for floating point noise when summing role weights.
const WEIGHT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptBudget {
    max_total_tokens: usize,
    reserved_for_response: usize,
    weights: BTreeMap<FragmentRole, f64>,
}

impl PromptBudget {
    /// Create a budget with no variable-role weights.
    ///
    /// # Errors
    ///
    /// [`TesseraError::InvalidBudget`] if the response reserve is larger than
    /// the total limit.
    pub fn new(max_total_tokens: usize, reserved_for_response: usize) -> Result<Self> {
        if reserved_for_response > max_total_tokens {
            return Err(TesseraError::InvalidBudget(format!(
                "response reserve ({reserved_for_response}) exceeds the total limit ({max_total_tokens})"
            )));
        }

        Ok(Self {
            max_total_tokens,
            reserved_for_response,
            weights: BTreeMap::new(),
        })
    }

    /// Assign the fraction of the remaining budget a variable role may use.
    ///
    /// ```rust
    /// use tessera_core::{budget::PromptBudget, generic::FragmentRole};
    ///
    /// let budget = PromptBudget::new(8192, 1024)?
    ///     .with_weight(FragmentRole::History, 0.3)?
    ///     .with_weight(FragmentRole::Memory, 0.3)?;
    ///
    /// assert_eq!(budget.available_tokens(), 7168);
    /// # Ok::<(), tessera_core::error::TesseraError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`TesseraError::InvalidBudget`] if `role` is fixed, `weight` is not a
    /// finite value in `[0, 1]`, or the sum of all weights would exceed `1.0`.
    pub fn with_weight(mut self, role: FragmentRole, weight: f64) -> Result<Self> {
        if role.is_fixed() {
            return Err(TesseraError::InvalidBudget(format!(
                "`{role}` fragments are always included and cannot be weighted"
            )));
        }

        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(TesseraError::InvalidBudget(format!(
                "weight for `{role}` must be within 0.0..=1.0, got {weight}"
            )));
        }

        self.weights.insert(role, weight);

        let total: f64 = self.weights.values().sum();
        if total > 1.0 + WEIGHT_EPSILON {
            return Err(TesseraError::InvalidBudget(format!(
                "role weights sum to {total}, which exceeds 1.0"
            )));
        }

        Ok(self)
    }

    pub fn max_total_tokens(&self) -> usize {
        self.max_total_tokens
    }

    pub fn reserved_for_response(&self) -> usize {
        self.reserved_for_response
    }

    /// Tokens left for the prompt once the response is reserved.
    pub fn available_tokens(&self) -> usize {
        self.max_total_tokens - self.reserved_for_response
    }

    /// Weight of `role`; unweighted roles get nothing.
    pub fn weight(&self, role: FragmentRole) -> f64 {
        self.weights.get(&role).copied().unwrap_or(0.0)
    }

    pub fn weights(&self) -> &BTreeMap<FragmentRole, f64> {
        &self.weights
    }
}
