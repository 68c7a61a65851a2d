//! # Events
//!
//! Every successful state change publishes exactly one event. Topics are
//! `(symbol, project_id)` so that indexers can filter per project; the data
//! payload is one of the `#[contracttype]` structs below, which the RPC
//! renders as a map keyed by field name.
//!
//! | Topic      | Data                   |
//! |------------|------------------------|
//! | `created`  | [`ProjectCreated`]     |
//! | `verified` | [`ProjectVerified`]    |
//! | `minted`   | [`CreditsMinted`]      |
//! | `transfer` | [`CreditsTransferred`] |
//! | `retired`  | [`CreditsRetired`]     |

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub name: String,
    pub total_credits: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectVerified {
    pub project_id: u64,
    pub verifier: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreditsMinted {
    pub project_id: u64,
    pub recipient: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreditsTransferred {
    pub project_id: u64,
    pub from: Address,
    pub to: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreditsRetired {
    pub project_id: u64,
    pub holder: Address,
    pub amount: i128,
}

pub fn emit_project_created(env: &Env, project_id: u64, name: String, total_credits: i128) {
    env.events().publish(
        (symbol_short!("created"), project_id),
        ProjectCreated {
            project_id,
            name,
            total_credits,
        },
    );
}

pub fn emit_project_verified(env: &Env, project_id: u64, verifier: Address) {
    env.events().publish(
        (symbol_short!("verified"), project_id),
        ProjectVerified {
            project_id,
            verifier,
        },
    );
}

pub fn emit_credits_minted(env: &Env, project_id: u64, recipient: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("minted"), project_id),
        CreditsMinted {
            project_id,
            recipient,
            amount,
        },
    );
}

pub fn emit_credits_transferred(
    env: &Env,
    project_id: u64,
    from: Address,
    to: Address,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("transfer"), project_id),
        CreditsTransferred {
            project_id,
            from,
            to,
            amount,
        },
    );
}

pub fn emit_credits_retired(env: &Env, project_id: u64, holder: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("retired"), project_id),
        CreditsRetired {
            project_id,
            holder,
            amount,
        },
    );
}
