//! Session phases and the pure transition on address changes

use crate::types::{EvmAddress, SecondaryAddress};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Disconnected,
    /// Connected, waiting for a cache restore or an explicit create
    PendingDerivation { evm_address: EvmAddress },
    Active { address: EvmAddress },
    /// A wallet for `active` is still installed while `pending` is connected
    Mismatched {
        active: EvmAddress,
        pending: EvmAddress,
    },
}

impl Phase {
    /// Next phase after the provider reports `connected`
    ///
    /// Total and side-effect free. The reconciler applies the effects
    /// (release, restore) that the returned phase implies.
    pub fn on_address_changed(&self, connected: Option<&EvmAddress>) -> Phase {
        let Some(connected) = connected else {
            return Phase::Disconnected;
        };

        match self {
            Phase::Disconnected | Phase::PendingDerivation { .. } => Phase::PendingDerivation {
                evm_address: connected.clone(),
            },
            Phase::Active { address } | Phase::Mismatched { active: address, .. } => {
                if address == connected {
                    Phase::Active {
                        address: address.clone(),
                    }
                } else {
                    Phase::Mismatched {
                        active: address.clone(),
                        pending: connected.clone(),
                    }
                }
            }
        }
    }

    /// Address whose wallet is installed, if any
    pub fn active_address(&self) -> Option<&EvmAddress> {
        match self {
            Phase::Active { address } => Some(address),
            Phase::Mismatched { active, .. } => Some(active),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Phase::Active { .. })
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Disconnected => write!(f, "disconnected"),
            Phase::PendingDerivation { evm_address } => {
                write!(f, "pending derivation for {evm_address}")
            }
            Phase::Active { address } => write!(f, "active for {address}"),
            Phase::Mismatched { active, pending } => {
                write!(f, "mismatched (active {active}, connected {pending})")
            }
        }
    }
}

/// Snapshot of the reconciler, safe to log or serialize
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    #[serde(flatten)]
    pub phase: Phase,
    pub connected: Option<EvmAddress>,
    pub secondary_address: Option<SecondaryAddress>,
}
