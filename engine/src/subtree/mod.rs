//! Tree-level invariants: subtree cleanliness and the freeze/unfreeze cascade.

pub mod engine;

pub use engine::{first_unsettled_child, freeze_ancestors, is_subtree_clean, unfreeze_ancestors};
