//! Ready-made fragment sources for common prompt parts.

pub mod continuation;
pub mod description;
pub mod history;
pub mod memory;
pub mod static_fragment;

pub use continuation::ContinuationFragment;
pub use description::SystemDescriptionFragment;
pub use history::{ChatHistoryFragment, ChatMessage};
pub use memory::{MemoryFragment, RetrievedMemory};
pub use static_fragment::StaticFragment;
