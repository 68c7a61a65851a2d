extern crate std;

use soroban_sdk::Address;

use crate::{CarbonCreditClient, Project};

/// Total supply equals the sum of every holder's balance.
///
/// `holders` must list every address that ever received credits for any of
/// `project_ids`; balances outside that set are not visible to the check.
pub fn assert_supply_matches_balances(
    client: &CarbonCreditClient,
    holders: &[Address],
    project_ids: &[u64],
) {
    let mut sum = 0i128;
    for holder in holders {
        for id in project_ids {
            let balance = client.get_credit_balance(holder, id);
            assert!(
                balance >= 0,
                "negative balance {} for project {}",
                balance,
                id
            );
            sum += balance;
        }
    }
    assert_eq!(
        client.get_total_supply(),
        sum,
        "total supply does not match sum of balances"
    );
}

/// Cumulative mints never pass the project's declared credits.
pub fn assert_minted_within_cap(project: &Project) {
    assert!(
        project.minted >= 0 && project.minted <= project.total_credits,
        "project {} minted {} of {} credits",
        project.id,
        project.minted,
        project.total_credits
    );
}

/// Minted credits only exist on verified projects.
pub fn assert_minted_implies_verified(project: &Project) {
    if project.minted > 0 {
        assert!(
            project.verified,
            "project {} has minted credits but is unverified",
            project.id
        );
    }
}

/// The verified flag never goes back to false.
pub fn assert_verified_monotonic(before: &Project, after: &Project) {
    if before.verified {
        assert!(after.verified, "project {} lost its verification", before.id);
    }
}

/// Registration-time fields never change.
pub fn assert_project_immutable_fields(original: &Project, current: &Project) {
    assert_eq!(original.id, current.id, "project id changed");
    assert_eq!(original.name, current.name, "project name changed");
    assert_eq!(
        original.description, current.description,
        "project description changed"
    );
    assert_eq!(
        original.total_credits, current.total_credits,
        "project total_credits changed"
    );
}

/// Minted-so-far never decreases (retirement does not refund it).
pub fn assert_minted_monotonic(before: &Project, after: &Project) {
    assert!(
        after.minted >= before.minted,
        "project {} minted went from {} to {}",
        before.id,
        before.minted,
        after.minted
    );
}

/// Run all stateless project invariants.
pub fn assert_all_project_invariants(project: &Project) {
    assert_minted_within_cap(project);
    assert_minted_implies_verified(project);
}

/// Run all invariants relating two snapshots of the same project.
pub fn assert_project_transition(before: &Project, after: &Project) {
    assert_project_immutable_fields(before, after);
    assert_verified_monotonic(before, after);
    assert_minted_monotonic(before, after);
    assert_all_project_invariants(after);
}
