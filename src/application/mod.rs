//! Application layer: fee reconciliation, checkout estimates and the addon surface.
//!
//! Every host event is handled to completion before the next one; the reconciler
//! relies on that ordering for its delete-then-insert sequence.

pub mod addon;
pub mod estimator;
pub mod hooks;
pub mod reconciler;
pub mod rule_store;
