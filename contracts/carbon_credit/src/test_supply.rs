extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Env, String};

use crate::invariants::{
    assert_all_project_invariants, assert_project_transition, assert_supply_matches_balances,
};
use crate::{CarbonCredit, CarbonCreditClient, Error};

fn setup() -> (Env, CarbonCreditClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);
    let contract_id = env.register(CarbonCredit, (owner.clone(),));
    let client = CarbonCreditClient::new(&env, &contract_id);
    (env, client, owner)
}

fn register(env: &Env, client: &CarbonCreditClient, owner: &Address, id: u64, credits: i128) {
    client.add_project(
        owner,
        &id,
        &String::from_str(env, "Reforestation"),
        &String::from_str(env, "Native species planting"),
        &credits,
    );
    client.verify_project(owner, &id);
}

#[test]
fn test_cumulative_mints_are_capped() {
    let (env, client, owner) = setup();
    let wallet1 = Address::generate(&env);
    let wallet2 = Address::generate(&env);
    register(&env, &client, &owner, 1, 10_000);

    client.mint(&owner, &6_000, &wallet1, &1);
    client.mint(&owner, &4_000, &wallet2, &1);
    assert_eq!(client.get_remaining_credits(&1), 0);

    assert_eq!(
        client.try_mint(&owner, &1, &wallet1, &1),
        Err(Ok(Error::ExceedsProjectSupply))
    );
    assert_eq!(client.get_total_supply(), 10_000);
    assert_supply_matches_balances(&client, &[wallet1, wallet2], &[1]);
}

#[test]
fn test_retirement_does_not_restore_allowance() {
    let (env, client, owner) = setup();
    let wallet1 = Address::generate(&env);
    register(&env, &client, &owner, 1, 1_000);

    client.mint(&owner, &1_000, &wallet1, &1);
    client.retire(&1_000, &wallet1, &1);

    assert_eq!(client.get_total_supply(), 0);
    assert_eq!(client.get_remaining_credits(&1), 0);
    assert_eq!(
        client.try_mint(&owner, &1, &wallet1, &1),
        Err(Ok(Error::ExceedsProjectSupply))
    );
}

#[test]
fn test_zero_credit_project_cannot_mint() {
    let (env, client, owner) = setup();
    let wallet1 = Address::generate(&env);
    register(&env, &client, &owner, 1, 0);

    assert_eq!(
        client.try_mint(&owner, &1, &wallet1, &1),
        Err(Ok(Error::ExceedsProjectSupply))
    );
}

#[test]
fn test_remaining_credits_tracks_mints() {
    let (env, client, owner) = setup();
    let wallet1 = Address::generate(&env);
    register(&env, &client, &owner, 3, 5_000);

    assert_eq!(client.get_remaining_credits(&3), 5_000);
    client.mint(&owner, &1_250, &wallet1, &3);
    assert_eq!(client.get_remaining_credits(&3), 3_750);
}

#[test]
fn test_supply_spans_projects() {
    let (env, client, owner) = setup();
    let wallet1 = Address::generate(&env);
    let wallet2 = Address::generate(&env);
    register(&env, &client, &owner, 1, 10_000);
    register(&env, &client, &owner, 2, 3_000);

    client.mint(&owner, &1_000, &wallet1, &1);
    client.mint(&owner, &2_000, &wallet1, &2);
    client.mint(&owner, &500, &wallet2, &2);

    assert_eq!(client.get_total_supply(), 3_500);
    assert_eq!(client.get_credit_balance(&wallet1, &1), 1_000);
    assert_eq!(client.get_credit_balance(&wallet1, &2), 2_000);
    assert_eq!(client.get_remaining_credits(&2), 500);
    assert_eq!(client.get_project_count(), 2);
    assert_supply_matches_balances(&client, &[wallet1, wallet2], &[1, 2]);
}

/// Drive a mixed sequence of calls, checking every invariant after each one.
#[test]
fn test_invariants_hold_across_lifecycle() {
    let (env, client, owner) = setup();
    let wallets = [
        Address::generate(&env),
        Address::generate(&env),
        Address::generate(&env),
    ];
    let ids = [1u64, 2u64];

    client.add_project(
        &owner,
        &1,
        &String::from_str(&env, "Wind Farm"),
        &String::from_str(&env, "Onshore wind, 40MW"),
        &8_000i128,
    );
    client.add_project(
        &owner,
        &2,
        &String::from_str(&env, "Cookstoves"),
        &String::from_str(&env, "Clean cookstove distribution"),
        &2_000i128,
    );

    let mut snapshots = [
        client.get_project(&1).unwrap(),
        client.get_project(&2).unwrap(),
    ];

    let check = |snapshots: &mut [crate::Project; 2]| {
        for (slot, id) in snapshots.iter_mut().zip(ids.iter()) {
            let current = client.get_project(id).unwrap();
            assert_project_transition(slot, &current);
            *slot = current;
        }
        assert_supply_matches_balances(&client, &wallets, &ids);
    };

    // Minting before verification is rejected and changes nothing.
    assert!(client.try_mint(&owner, &100, &wallets[0], &1).is_err());
    check(&mut snapshots);

    client.verify_project(&owner, &1);
    check(&mut snapshots);

    client.mint(&owner, &5_000, &wallets[0], &1);
    check(&mut snapshots);

    client.transfer(&1_500, &wallets[0], &wallets[1], &1);
    check(&mut snapshots);

    client.verify_project(&owner, &2);
    client.mint(&owner, &2_000, &wallets[2], &2);
    check(&mut snapshots);

    assert!(client.try_mint(&owner, &1, &wallets[2], &2).is_err());
    check(&mut snapshots);

    client.retire(&700, &wallets[1], &1);
    client.retire(&2_000, &wallets[2], &2);
    check(&mut snapshots);

    assert!(client.try_retire(&1, &wallets[2], &2).is_err());
    assert!(client
        .try_transfer(&10_000, &wallets[0], &wallets[2], &1)
        .is_err());
    check(&mut snapshots);

    assert_eq!(client.get_total_supply(), 5_000 - 700);
    for project in snapshots.iter() {
        assert_all_project_invariants(project);
        assert!(project.verified);
    }
    assert_eq!(snapshots[0].minted, 5_000);
    assert_eq!(snapshots[1].minted, 2_000);
}
