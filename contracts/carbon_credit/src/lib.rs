//! # Carbon Credit Ledger Contract
//!
//! Root crate of the carbon credit ledger. It exposes the single Soroban
//! contract `CarbonCredit`, which tracks carbon-offset projects and the
//! credits issued against them:
//!
//! | Phase        | Entry Point(s)                                         |
//! |--------------|--------------------------------------------------------|
//! | Deployment   | constructor (records the owner)                        |
//! | Registry     | [`CarbonCredit::add_project`], [`CarbonCredit::verify_project`] |
//! | Issuance     | [`CarbonCredit::mint`]                                 |
//! | Circulation  | [`CarbonCredit::transfer`], [`CarbonCredit::retire`]   |
//! | Queries      | `get_credit_balance`, `get_total_supply`, `get_project`, `get_owner`, `get_project_count`, `get_remaining_credits` |
//!
//! ## Architecture
//!
//! Storage access is delegated to [`storage`] and event publication to
//! [`events`]. This file holds the entry points and their checks. Every
//! mutating entry point runs all of its checks before its first write, so a
//! returned [`Error`] never leaves partial state behind.
//!
//! ## Roles
//!
//! There is a single privileged identity, the owner, fixed at deployment.
//! Registration, verification and minting require the owner; transfer and
//! retirement require the holder's own authorization.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String};

pub mod events;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_supply;

pub use types::Project;

/// Longest accepted project name, in bytes.
pub const MAX_NAME_LEN: u32 = 64;
/// Longest accepted project description, in bytes.
pub const MAX_DESCRIPTION_LEN: u32 = 256;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotAuthorized        = 100,
    ProjectNotFound      = 101,
    InsufficientBalance  = 102,
    ExceedsProjectSupply = 103,
    DuplicateProject     = 104,
    InvalidAmount        = 105,
    ProjectUnverified    = 106,
    InvalidProjectId     = 107,
    InvalidMetadata      = 108,
    Overflow             = 109,
}

#[contract]
pub struct CarbonCredit;

#[contractimpl]
impl CarbonCredit {
    // ─────────────────────────────────────────────────────────
    // Deployment
    // ─────────────────────────────────────────────────────────

    /// Record `owner` as the only identity allowed to register, verify
    /// and mint. Runs exactly once, at deployment.
    pub fn __constructor(env: Env, owner: Address) {
        storage::set_owner(&env, &owner);
    }

    // ─────────────────────────────────────────────────────────
    // Project registry
    // ─────────────────────────────────────────────────────────

    /// Register a new, unverified project.
    ///
    /// - `caller` must be the owner.
    /// - `id` is chosen by the caller; it must be non-zero and unused.
    /// - `name` must be 1..=[`MAX_NAME_LEN`] bytes, `description` at most
    ///   [`MAX_DESCRIPTION_LEN`] bytes.
    /// - `total_credits` caps how many credits may ever be minted for it.
    pub fn add_project(
        env: Env,
        caller: Address,
        id: u64,
        name: String,
        description: String,
        total_credits: i128,
    ) -> Result<bool, Error> {
        Self::require_owner(&env, &caller)?;

        if id == 0 {
            return Err(Error::InvalidProjectId);
        }
        if name.len() == 0 || name.len() > MAX_NAME_LEN || description.len() > MAX_DESCRIPTION_LEN {
            return Err(Error::InvalidMetadata);
        }
        if total_credits < 0 {
            return Err(Error::InvalidAmount);
        }
        if storage::has_project(&env, id) {
            return Err(Error::DuplicateProject);
        }

        let config = types::ProjectConfig {
            id,
            name: name.clone(),
            description,
            total_credits,
        };
        let state = types::ProjectState {
            minted: 0,
            verified: false,
        };
        storage::save_project(&env, &config, &state);
        storage::increment_project_count(&env);

        events::emit_project_created(&env, id, name, total_credits);
        Ok(true)
    }

    /// Mark a project as verified, unlocking minting against it.
    ///
    /// Verifying an already verified project succeeds and changes nothing
    /// except emitting another `verified` event.
    pub fn verify_project(env: Env, caller: Address, id: u64) -> Result<bool, Error> {
        Self::require_owner(&env, &caller)?;

        let mut state = storage::load_project_state(&env, id).ok_or(Error::ProjectNotFound)?;
        state.verified = true;
        storage::save_project_state(&env, id, &state);

        events::emit_project_verified(&env, id, caller);
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────
    // Issuance and circulation
    // ─────────────────────────────────────────────────────────

    /// Issue `amount` new credits of `project_id` to `recipient`.
    ///
    /// Fails with `ProjectUnverified` before verification and with
    /// `ExceedsProjectSupply` once cumulative mints would pass the
    /// project's `total_credits`.
    pub fn mint(
        env: Env,
        caller: Address,
        amount: i128,
        recipient: Address,
        project_id: u64,
    ) -> Result<bool, Error> {
        Self::require_owner(&env, &caller)?;
        Self::require_positive(amount)?;

        let (config, mut state) =
            storage::load_project_pair(&env, project_id).ok_or(Error::ProjectNotFound)?;
        if !state.verified {
            return Err(Error::ProjectUnverified);
        }

        let minted = state
            .minted
            .checked_add(amount)
            .filter(|minted| *minted <= config.total_credits)
            .ok_or(Error::ExceedsProjectSupply)?;
        let balance = storage::get_balance(&env, &recipient, project_id)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        let supply = storage::get_total_supply(&env)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        state.minted = minted;
        storage::save_project_state(&env, project_id, &state);
        storage::set_balance(&env, &recipient, project_id, balance);
        storage::set_total_supply(&env, supply);

        events::emit_credits_minted(&env, project_id, recipient, amount);
        Ok(true)
    }

    /// Move `amount` credits of `project_id` from `sender` to `recipient`.
    ///
    /// `sender` must authorize the call. Total supply is unchanged.
    pub fn transfer(
        env: Env,
        amount: i128,
        sender: Address,
        recipient: Address,
        project_id: u64,
    ) -> Result<bool, Error> {
        sender.require_auth();
        Self::require_positive(amount)?;

        let sender_balance = storage::get_balance(&env, &sender, project_id);
        if sender_balance < amount {
            return Err(Error::InsufficientBalance);
        }

        if sender != recipient {
            let recipient_balance = storage::get_balance(&env, &recipient, project_id)
                .checked_add(amount)
                .ok_or(Error::Overflow)?;
            storage::set_balance(&env, &sender, project_id, sender_balance - amount);
            storage::set_balance(&env, &recipient, project_id, recipient_balance);
        }

        events::emit_credits_transferred(&env, project_id, sender, recipient, amount);
        Ok(true)
    }

    /// Permanently remove `amount` credits of `project_id` held by `holder`,
    /// recording an offset claim. Total supply shrinks by `amount`; the
    /// project's minting allowance is not restored.
    pub fn retire(env: Env, amount: i128, holder: Address, project_id: u64) -> Result<bool, Error> {
        holder.require_auth();
        Self::require_positive(amount)?;

        let balance = storage::get_balance(&env, &holder, project_id);
        if balance < amount {
            return Err(Error::InsufficientBalance);
        }
        let supply = storage::get_total_supply(&env)
            .checked_sub(amount)
            .ok_or(Error::Overflow)?;

        storage::set_balance(&env, &holder, project_id, balance - amount);
        storage::set_total_supply(&env, supply);

        events::emit_credits_retired(&env, project_id, holder, amount);
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Credits of `project_id` held by `holder`; 0 if it never held any.
    pub fn get_credit_balance(env: Env, holder: Address, project_id: u64) -> i128 {
        storage::get_balance(&env, &holder, project_id)
    }

    /// Credits currently in circulation across all projects.
    pub fn get_total_supply(env: Env) -> i128 {
        storage::get_total_supply(&env)
    }

    /// Retrieve a project, or `None` if `id` was never registered.
    pub fn get_project(env: Env, id: u64) -> Option<Project> {
        storage::load_project(&env, id)
    }

    pub fn get_owner(env: Env) -> Option<Address> {
        storage::get_owner(&env)
    }

    pub fn get_project_count(env: Env) -> u64 {
        storage::get_project_count(&env)
    }

    /// Credits that can still be minted against `id`.
    pub fn get_remaining_credits(env: Env, id: u64) -> Result<i128, Error> {
        let (config, state) = storage::load_project_pair(&env, id).ok_or(Error::ProjectNotFound)?;
        Ok(state.remaining(&config))
    }

    // ─────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────

    fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        match storage::get_owner(env) {
            Some(owner) if owner == *caller => Ok(()),
            _ => Err(Error::NotAuthorized),
        }
    }

    fn require_positive(amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        Ok(())
    }
}
