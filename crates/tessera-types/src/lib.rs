//! Ready-made fragments and the two-stage chat turn built on the composer.
pub mod fragments;
pub mod prompts;
