//! Chart of accounts.
//!
//! - Account records and their partial-update patch
//! - Hierarchy traversal (roots first, children in code order)
//! - Account management service

pub mod hierarchy;
pub mod service;
pub mod types;

#[cfg(test)]
mod hierarchy_props;

pub use hierarchy::{HierarchyNode, MAX_HIERARCHY_DEPTH, flatten_hierarchy};
pub use service::ChartOfAccounts;
pub use types::{
    Account, AccountPatch, AccountSummary, AccountType, MAX_ACCOUNT_CODE_LEN,
    MAX_ACCOUNT_NAME_LEN, NewAccount, NormalBalance, UnknownAccountType,
};
