//! Character-based token estimation.
//!
//! Real tokenizers are model specific and expensive to ship. A fixed
//! characters-per-token factor is good enough to keep prompts under budget,
//! as long as it errs on the small side (more tokens than reality).

use tessera_core::{
    error::{Result, TesseraError},
    generic::PromptFragment,
};

pub const DEFAULT_TOKEN_ESTIMATE_FACTOR: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenEstimator {
    factor: f64,
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self {
            factor: DEFAULT_TOKEN_ESTIMATE_FACTOR,
        }
    }
}

impl TokenEstimator {
    /// # Errors
    ///
    /// [`TesseraError::InvalidBudget`] unless `factor` is finite and positive.
    pub fn new(factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(TesseraError::InvalidBudget(format!(
                "token estimate factor must be a positive number, got {factor}"
            )));
        }

        Ok(Self { factor })
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// `ceil(chars / factor)`, counted in Unicode scalar values.
    ///
    /// ```rust
    /// use tessera_prompt::estimate::TokenEstimator;
    ///
    /// let estimator = TokenEstimator::default();
    /// assert_eq!(estimator.estimate_text("hello"), 2);
    /// assert_eq!(estimator.estimate_text("hello!"), 3);
    /// ```
    pub fn estimate_text(&self, text: &str) -> usize {
        let chars = text.chars().count();
        if chars == 0 {
            return 0;
        }

        (chars as f64 / self.factor).ceil() as usize
    }

    /// Precomputed cost of `fragment`, or an estimate of its text.
    pub fn estimate(&self, fragment: &PromptFragment) -> usize {
        fragment
            .estimated_tokens()
            .unwrap_or_else(|| self.estimate_text(fragment.text()))
    }
}
