//! Interface view: reduce a decompiled type to its externally visible declarations.

pub mod pruner;
pub mod rules;

pub use pruner::*;
pub use rules::*;
