use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::game::Amount;
use crate::player::PlayerId;

/// A single directed play-money transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub payer_id: PlayerId,
    pub payee_id: PlayerId,
    pub amount: Amount,
}

impl Settlement {
    pub fn new(
        payer_id: impl Into<PlayerId>,
        payee_id: impl Into<PlayerId>,
        amount: Amount,
    ) -> Self {
        Self {
            payer_id: payer_id.into(),
            payee_id: payee_id.into(),
            amount,
        }
    }

    /// Reject zero amounts and self-payments.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.amount == 0 {
            return Err(ScoringError::InvalidSettlement(format!(
                "{} -> {} has a zero amount",
                self.payer_id, self.payee_id
            )));
        }
        if self.payer_id == self.payee_id {
            return Err(ScoringError::InvalidSettlement(format!(
                "{} cannot pay themselves",
                self.payer_id
            )));
        }
        Ok(())
    }
}
