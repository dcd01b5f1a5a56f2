//! Chart-of-accounts hierarchy traversal.
//!
//! Accounts are visited depth-first: root accounts (no parent) in code
//! order, each followed by its descendants, siblings in code order. Level 0
//! is a root. Nodes reachable only through a parent cycle are never
//! visited, and traversal stops descending past [`MAX_HIERARCHY_DEPTH`].

use std::collections::{HashMap, HashSet};

use tally_shared::types::AccountId;

use super::types::Account;

/// Deepest level that traversal and parent validation will follow.
pub const MAX_HIERARCHY_DEPTH: u32 = 64;

/// An account positioned in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    /// The account.
    pub account: Account,
    /// Depth below its root (roots are level 0).
    pub level: u32,
}

/// Flattens accounts into hierarchy order.
#[must_use]
pub fn flatten_hierarchy(accounts: &[Account]) -> Vec<HierarchyNode> {
    let mut children: HashMap<AccountId, Vec<&Account>> = HashMap::new();
    let mut roots: Vec<&Account> = Vec::new();

    for account in accounts {
        match account.parent_id {
            Some(parent) => children.entry(parent).or_default().push(account),
            None => roots.push(account),
        }
    }
    roots.sort_by(|a, b| a.account_code.cmp(&b.account_code));
    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| a.account_code.cmp(&b.account_code));
    }

    let mut visited: HashSet<AccountId> = HashSet::with_capacity(accounts.len());
    let mut out = Vec::with_capacity(accounts.len());
    // Stack holds nodes still to emit; reversed pushes keep code order.
    let mut stack: Vec<(&Account, u32)> = roots.into_iter().rev().map(|a| (a, 0)).collect();

    while let Some((account, level)) = stack.pop() {
        if !visited.insert(account.id) {
            continue;
        }
        out.push(HierarchyNode {
            account: account.clone(),
            level,
        });
        if level >= MAX_HIERARCHY_DEPTH {
            continue;
        }
        if let Some(kids) = children.get(&account.id) {
            stack.extend(kids.iter().rev().map(|kid| (*kid, level + 1)));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::types::AccountType;

    fn account(code: &str, parent: Option<&Account>) -> Account {
        Account {
            id: AccountId::new(),
            account_code: code.to_string(),
            account_name: format!("Account {code}"),
            account_type: AccountType::Asset,
            description: None,
            parent_id: parent.map(|p| p.id),
        }
    }

    fn codes(nodes: &[HierarchyNode]) -> Vec<(&str, u32)> {
        nodes
            .iter()
            .map(|n| (n.account.account_code.as_str(), n.level))
            .collect()
    }

    #[test]
    fn test_empty_chart() {
        assert!(flatten_hierarchy(&[]).is_empty());
    }

    #[test]
    fn test_roots_then_children_in_code_order() {
        let assets = account("1000", None);
        let bank = account("1200", Some(&assets));
        let cash = account("1100", Some(&assets));
        let petty = account("1110", Some(&cash));
        let liabilities = account("2000", None);
        let input = vec![
            liabilities.clone(),
            petty.clone(),
            bank.clone(),
            assets.clone(),
            cash.clone(),
        ];

        let nodes = flatten_hierarchy(&input);

        assert_eq!(
            codes(&nodes),
            vec![("1000", 0), ("1100", 1), ("1110", 2), ("1200", 1), ("2000", 0)]
        );
    }

    #[test]
    fn test_cycle_members_are_excluded() {
        let root = account("1000", None);
        let mut a = account("1100", None);
        let mut b = account("1200", None);
        a.parent_id = Some(b.id);
        b.parent_id = Some(a.id);

        let nodes = flatten_hierarchy(&[root, a, b]);

        assert_eq!(codes(&nodes), vec![("1000", 0)]);
    }

    #[test]
    fn test_traversal_stops_at_max_depth() {
        let mut chain = vec![account("0000", None)];
        for i in 1..=(MAX_HIERARCHY_DEPTH + 5) {
            let next = account(&format!("{i:04}"), chain.last());
            chain.push(next);
        }

        let nodes = flatten_hierarchy(&chain);

        assert_eq!(nodes.len(), MAX_HIERARCHY_DEPTH as usize + 1);
        assert_eq!(nodes.last().map(|n| n.level), Some(MAX_HIERARCHY_DEPTH));
    }
}
