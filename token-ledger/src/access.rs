//! Single-owner authorization and the global pause switch

use crate::types::Address;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Owner identity plus the paused flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: Address,
    paused: bool,
}

impl AccessControl {
    /// Active ledger owned by `owner`
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            paused: false,
        }
    }

    /// Current owner (zero after renounce)
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether transfers are halted
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Guard clause for owner-only operations
    pub fn ensure_owner(&self, caller: Address) -> Result<()> {
        // A renounced ledger has a zero owner; nobody can call as zero.
        if self.owner.is_zero() || caller != self.owner {
            return Err(Error::Unauthorized { caller });
        }
        Ok(())
    }

    /// Guard clause for value movements
    pub fn ensure_not_paused(&self) -> Result<()> {
        if self.paused {
            return Err(Error::EnforcedPause);
        }
        Ok(())
    }

    /// Active -> Paused
    pub fn pause(&mut self, caller: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if self.paused {
            return Err(Error::AlreadyPaused);
        }
        self.paused = true;
        Ok(())
    }

    /// Paused -> Active
    pub fn unpause(&mut self, caller: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if !self.paused {
            return Err(Error::NotPaused);
        }
        self.paused = false;
        Ok(())
    }

    /// Hand ownership to `new_owner`, returning the previous owner
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<Address> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(Error::InvalidAddress("new owner"));
        }
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }

    /// Give up ownership permanently, returning the previous owner
    pub fn renounce_ownership(&mut self, caller: Address) -> Result<Address> {
        self.ensure_owner(caller)?;
        Ok(std::mem::replace(&mut self.owner, Address::ZERO))
    }
}
