//! # Types
//!
//! Shared data structures used across the carbon credit ledger.
//!
//! ## Config / State split
//!
//! A `Project` is internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`]: written once by `add_project`; never mutated.
//! - [`ProjectState`]: written on verification and on every mint.
//!
//! The public API exposes the reconstructed [`Project`] struct.
//!
//! ## Verification gate
//!
//! `verified` is a one-way latch:
//!
//! ```text
//! unverified ──verify_project──► verified
//! ```
//!
//! Minting is only possible once the latch is set, and only up to
//! `total_credits` cumulatively (tracked in `ProjectState::minted`).

use soroban_sdk::{contracttype, String};

/// Immutable project metadata, written once at registration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub total_credits: i128,
}

/// Mutable project state, updated on verification and minting.
///
/// Kept small so that the frequent write (mint) does not rewrite the
/// name and description.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    /// Credits minted against this project so far. Retirement does not
    /// give allowance back.
    pub minted: i128,
    pub verified: bool,
}

impl ProjectState {
    /// Credits that can still be minted against `config`.
    pub fn remaining(&self, config: &ProjectConfig) -> i128 {
        config.total_credits - self.minted
    }
}

/// Full representation of a registered carbon-offset project.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ProjectConfig` + `ProjectState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Caller-supplied identifier (positive, unique).
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Maximum number of credits that may ever be minted for the project.
    pub total_credits: i128,
    /// Credits minted so far.
    pub minted: i128,
    /// Set by the owner once the underlying offsets have been audited.
    pub verified: bool,
}

impl Project {
    pub(crate) fn from_parts(config: ProjectConfig, state: ProjectState) -> Self {
        Project {
            id: config.id,
            name: config.name,
            description: config.description,
            total_credits: config.total_credits,
            minted: state.minted,
            verified: state.verified,
        }
    }
}
