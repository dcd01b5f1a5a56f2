//! Property-based tests for hierarchy traversal.

use std::collections::HashSet;

use proptest::prelude::*;
use tally_shared::types::AccountId;

use super::hierarchy::flatten_hierarchy;
use super::types::{Account, AccountType};

/// Builds an acyclic chart: account `i` may only point at an earlier account.
fn arb_forest() -> impl Strategy<Value = Vec<Account>> {
    prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 0..40).prop_map(
        |parents| {
            let mut accounts: Vec<Account> = Vec::with_capacity(parents.len());
            for (i, parent) in parents.into_iter().enumerate() {
                let parent_id = match parent {
                    Some(idx) if i > 0 => Some(accounts[idx.index(i)].id),
                    _ => None,
                };
                accounts.push(Account {
                    id: AccountId::new(),
                    account_code: format!("{:04}", (i * 7919) % 10_000),
                    account_name: format!("Account {i}"),
                    account_type: AccountType::Asset,
                    description: None,
                    parent_id,
                });
            }
            accounts
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every account of an acyclic chart appears exactly once.
    #[test]
    fn prop_acyclic_chart_is_fully_visited(accounts in arb_forest()) {
        let nodes = flatten_hierarchy(&accounts);
        prop_assert_eq!(nodes.len(), accounts.len());

        let ids: HashSet<_> = nodes.iter().map(|n| n.account.id).collect();
        prop_assert_eq!(ids.len(), accounts.len());
    }

    /// A child is always emitted after its parent, one level deeper.
    #[test]
    fn prop_children_follow_parents(accounts in arb_forest()) {
        let nodes = flatten_hierarchy(&accounts);

        for (pos, node) in nodes.iter().enumerate() {
            match node.account.parent_id {
                None => prop_assert_eq!(node.level, 0),
                Some(parent) => {
                    let parent_pos = nodes.iter().position(|n| n.account.id == parent);
                    prop_assert!(parent_pos.is_some_and(|p| p < pos));
                    let parent_level = parent_pos.map(|p| nodes[p].level);
                    prop_assert_eq!(parent_level.map(|l| l + 1), Some(node.level));
                }
            }
        }
    }
}
