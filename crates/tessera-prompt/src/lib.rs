//! Prompt assembly for the Tessera workspace.
//!
//! * [`estimate`] – character-based token estimation.
//! * [`builder`] – line-oriented text builder for fragment bodies.
//! * [`chain`] – routes fragments into fixed and variable inputs.
//! * [`composer`] – fits fragments into a token budget.
//! * [`skills`] – read-only registry of prompt templates loaded from disk.
pub mod builder;
pub mod chain;
pub mod composer;
pub mod estimate;
pub mod skills;
