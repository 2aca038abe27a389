//! Session reconciliation between the connected EVM account and the derived
//! Mycel wallet

mod reconciler;
mod state;

pub use reconciler::SessionReconciler;
pub use state::{Phase, SessionStatus};
