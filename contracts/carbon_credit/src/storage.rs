//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the ledger.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type      | Description                          |
//! |----------------|-----------|--------------------------------------|
//! | `Owner`        | `Address` | Owner recorded by the constructor    |
//! | `TotalSupply`  | `i128`    | Credits in circulation               |
//! | `ProjectCount` | `u64`     | Number of registered projects        |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                    | Type            | Description                        |
//! |------------------------|-----------------|------------------------------------|
//! | `ProjConfig(id)`       | `ProjectConfig` | Immutable project metadata         |
//! | `ProjState(id)`        | `ProjectState`  | Minted-so-far and verification     |
//! | `Balance(holder, id)`  | `i128`          | Credits held for one project       |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Absent entries are reported as `None` (projects) or `0` (balances, supply,
//! counters); mapping absence to a contract error is left to the entry points.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Project, ProjectConfig, ProjectState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Contract owner (Instance).
    Owner,
    /// Global circulating supply (Instance).
    TotalSupply,
    /// Registered project counter (Instance).
    ProjectCount,
    /// Immutable project metadata keyed by ID (Persistent).
    ProjConfig(u64),
    /// Mutable project state keyed by ID (Persistent).
    ProjState(u64),
    /// Holder balance for one project (Persistent).
    Balance(Address, u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Record the owner. Called once, from the constructor.
pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
    bump_instance(env);
}

pub fn get_owner(env: &Env) -> Option<Address> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Owner)
}

pub fn get_total_supply(env: &Env) -> i128 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0)
}

pub fn set_total_supply(env: &Env, supply: i128) {
    env.storage().instance().set(&DataKey::TotalSupply, &supply);
    bump_instance(env);
}

pub fn get_project_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0)
}

/// Count one more registered project.
pub fn increment_project_count(env: &Env) {
    let next = get_project_count(env) + 1;
    env.storage().instance().set(&DataKey::ProjectCount, &next);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn has_project(env: &Env, id: u64) -> bool {
    env.storage().persistent().has(&DataKey::ProjConfig(id))
}

/// Save both the immutable config and initial state for a new project.
pub fn save_project(env: &Env, config: &ProjectConfig, state: &ProjectState) {
    let config_key = DataKey::ProjConfig(config.id);
    let state_key = DataKey::ProjState(config.id);

    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full `Project` by combining config and state.
pub fn load_project(env: &Env, id: u64) -> Option<Project> {
    load_project_pair(env, id).map(|(config, state)| Project::from_parts(config, state))
}

/// Load config and state together, bumping both TTLs.
pub fn load_project_pair(env: &Env, id: u64) -> Option<(ProjectConfig, ProjectState)> {
    let config = load_project_config(env, id)?;
    let state = load_project_state(env, id)?;
    Some((config, state))
}

pub fn load_project_config(env: &Env, id: u64) -> Option<ProjectConfig> {
    let key = DataKey::ProjConfig(id);
    let config: ProjectConfig = env.storage().persistent().get(&key)?;
    bump_persistent(env, &key);
    Some(config)
}

pub fn load_project_state(env: &Env, id: u64) -> Option<ProjectState> {
    let key = DataKey::ProjState(id);
    let state: ProjectState = env.storage().persistent().get(&key)?;
    bump_persistent(env, &key);
    Some(state)
}

/// Save only the mutable project state (verification and mint).
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    let key = DataKey::ProjState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Credits `holder` owns for `project_id`; 0 when no entry exists.
pub fn get_balance(env: &Env, holder: &Address, project_id: u64) -> i128 {
    let key = DataKey::Balance(holder.clone(), project_id);
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            bump_persistent(env, &key);
            balance
        }
        None => 0,
    }
}

/// Write a holder balance. A zero balance removes the entry.
pub fn set_balance(env: &Env, holder: &Address, project_id: u64, balance: i128) {
    let key = DataKey::Balance(holder.clone(), project_id);
    if balance == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &balance);
        bump_persistent(env, &key);
    }
}
