extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, Env, IntoVal, String, Symbol, TryIntoVal,
};

use crate::events::{
    CreditsMinted, CreditsRetired, CreditsTransferred, ProjectCreated, ProjectVerified,
};
use crate::{CarbonCredit, CarbonCreditClient};

fn setup() -> (Env, CarbonCreditClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);
    let contract_id = env.register(CarbonCredit, (owner.clone(),));
    let client = CarbonCreditClient::new(&env, &contract_id);
    (env, client, owner)
}

fn setup_with_verified_project() -> (Env, CarbonCreditClient<'static>, Address) {
    let (env, client, owner) = setup();
    client.add_project(
        &owner,
        &1,
        &String::from_str(&env, "Mangrove Restoration"),
        &String::from_str(&env, "Coastal blue-carbon project"),
        &10_000i128,
    );
    client.verify_project(&owner, &1);
    (env, client, owner)
}

#[test]
fn test_project_created_event() {
    let (env, client, owner) = setup();
    let name = String::from_str(&env, "Mangrove Restoration");

    client.add_project(
        &owner,
        &7,
        &name,
        &String::from_str(&env, "Coastal blue-carbon project"),
        &25_000i128,
    );

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("created"), project_id)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        7u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ProjectCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProjectCreated {
            project_id: 7,
            name,
            total_credits: 25_000,
        }
    );
}

#[test]
fn test_project_verified_event() {
    let (env, client, owner) = setup_with_verified_project();

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("verified").into_val(&env),
        1u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ProjectVerified = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProjectVerified {
            project_id: 1,
            verifier: owner,
        }
    );
}

#[test]
fn test_credits_minted_event() {
    let (env, client, owner) = setup_with_verified_project();
    let wallet1 = Address::generate(&env);

    client.mint(&owner, &1_000, &wallet1, &1);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("minted").into_val(&env),
        1u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CreditsMinted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CreditsMinted {
            project_id: 1,
            recipient: wallet1,
            amount: 1_000,
        }
    );
}

#[test]
fn test_credits_transferred_event() {
    let (env, client, owner) = setup_with_verified_project();
    let wallet1 = Address::generate(&env);
    let wallet2 = Address::generate(&env);

    client.mint(&owner, &1_000, &wallet1, &1);
    client.transfer(&500, &wallet1, &wallet2, &1);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("transfer").into_val(&env),
        1u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CreditsTransferred = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CreditsTransferred {
            project_id: 1,
            from: wallet1,
            to: wallet2,
            amount: 500,
        }
    );
}

#[test]
fn test_credits_retired_event() {
    let (env, client, owner) = setup_with_verified_project();
    let wallet1 = Address::generate(&env);

    client.mint(&owner, &1_000, &wallet1, &1);
    client.retire(&400, &wallet1, &1);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("retired").into_val(&env),
        1u64.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: CreditsRetired = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CreditsRetired {
            project_id: 1,
            holder: wallet1,
            amount: 400,
        }
    );
}

/// A rejected transfer followed by a successful one leaves exactly one
/// `transfer` event, carrying the successful amount.
#[test]
fn test_transfer_emits_one_event_per_successful_call() {
    let (env, client, owner) = setup_with_verified_project();
    let wallet1 = Address::generate(&env);
    let wallet2 = Address::generate(&env);
    client.mint(&owner, &500, &wallet1, &1);

    assert!(client.try_transfer(&501, &wallet1, &wallet2, &1).is_err());
    client.transfer(&300, &wallet1, &wallet2, &1);

    let transfer_topic = symbol_short!("transfer");
    let transfers: std::vec::Vec<_> = env
        .events()
        .all()
        .iter()
        .filter(|event| {
            let topic: Symbol = event.1.get(0).unwrap().try_into_val(&env).unwrap();
            topic == transfer_topic
        })
        .map(|event| -> CreditsTransferred { event.2.try_into_val(&env).unwrap() })
        .collect();

    assert_eq!(
        transfers,
        std::vec![CreditsTransferred {
            project_id: 1,
            from: wallet1,
            to: wallet2,
            amount: 300,
        }]
    );
}
