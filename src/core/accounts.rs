//! Posting accounts
//!
//! The account switcher keeps a list of accounts and one active account.
//! Posts created on the board are attributed to the active account.

use serde::{Deserialize, Serialize};

use crate::core::post::Author;
use crate::error::{Result, ThreadlineError};

/// An account posts can be published from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub handle: String,
    pub name: String,
}

impl Account {
    /// Author details for posts from this account
    pub fn author(&self) -> Author {
        Author::new(self.name.clone(), self.handle.clone())
    }
}

/// Configured accounts and the active one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBook {
    pub accounts: Vec<Account>,
    /// Handle of the active account
    pub active: String,
}

impl Default for AccountBook {
    fn default() -> Self {
        Self {
            accounts: vec![
                Account {
                    id: "1".to_string(),
                    handle: "@techguru".to_string(),
                    name: "Tech Guru".to_string(),
                },
                Account {
                    id: "2".to_string(),
                    handle: "@saasbuilder".to_string(),
                    name: "SaaS Builder".to_string(),
                },
            ],
            active: "@techguru".to_string(),
        }
    }
}

impl AccountBook {
    /// The active account, falling back to the first configured one
    pub fn active(&self) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.handle == self.active)
            .or_else(|| self.accounts.first())
    }

    /// Make `handle` the active account; a missing `@` is added
    pub fn select(&mut self, handle: &str) -> Result<&Account> {
        let handle = normalize_handle(handle);
        let account = self
            .accounts
            .iter()
            .find(|a| a.handle == handle)
            .ok_or_else(|| ThreadlineError::AccountNotFound(handle.clone()))?;
        self.active = account.handle.clone();
        Ok(account)
    }

    /// Add a placeholder account numbered after the existing ones
    pub fn add_generated(&mut self) -> &Account {
        let n = self.accounts.len() + 1;
        self.accounts.push(Account {
            id: n.to_string(),
            handle: format!("@newuser{}", n),
            name: format!("New User {}", n),
        });
        &self.accounts[n - 1]
    }
}

fn normalize_handle(handle: &str) -> String {
    let trimmed = handle.trim();
    if trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_active_account() {
        let book = AccountBook::default();
        assert_eq!(book.active().unwrap().handle, "@techguru");
    }

    #[test]
    fn test_select_account() {
        let mut book = AccountBook::default();
        assert_eq!(book.select("saasbuilder").unwrap().name, "SaaS Builder");
        assert_eq!(book.active, "@saasbuilder");

        assert!(matches!(
            book.select("@nobody"),
            Err(ThreadlineError::AccountNotFound(_))
        ));
        assert_eq!(book.active, "@saasbuilder");
    }

    #[test]
    fn test_add_generated_account() {
        let mut book = AccountBook::default();
        let added = book.add_generated().clone();
        assert_eq!(added.handle, "@newuser3");
        assert_eq!(added.id, "3");
        assert_eq!(book.accounts.len(), 3);
    }

    #[test]
    fn test_stale_active_falls_back_to_first() {
        let book = AccountBook {
            active: "@gone".to_string(),
            ..AccountBook::default()
        };
        assert_eq!(book.active().unwrap().handle, "@techguru");
        assert_eq!(book.active().unwrap().author().name, "Tech Guru");
    }
}
