//! # Role Registry
//!
//! The singleton administrator and membership of the five independent roles.
//!
//! The administrator is fixed at construction and needs none of the five
//! roles. Only the administrator may grant or revoke. Both operations are
//! idempotent but every call is recorded in the authorization log.

use crate::domain::errors::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use shared_types::{Principal, Role, Timestamp};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Whether a role change granted or revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleAction {
    Granted,
    Revoked,
}

/// One entry of the authorization log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChange {
    pub action: RoleAction,
    pub role: Role,
    pub principal: Principal,
    /// False when the call was a no-op (already held / not held).
    pub changed: bool,
    pub at: Timestamp,
}

/// Which dashboard a principal lands on.
///
/// Resolved in the fixed precedence of the variant order: a principal that is
/// both a producer and a retailer is shown as a producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Admin,
    Producer,
    Slaughterhouse,
    HalalAuthority,
    Distributor,
    Retailer,
    /// Holds no role. Can only verify batches.
    Public,
}

impl From<Role> for Persona {
    fn from(role: Role) -> Self {
        match role {
            Role::Producer => Persona::Producer,
            Role::Slaughterhouse => Persona::Slaughterhouse,
            Role::HalalAuthority => Persona::HalalAuthority,
            Role::Distributor => Persona::Distributor,
            Role::Retailer => Persona::Retailer,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone)]
pub struct RoleRegistry {
    admin: Principal,
    members: HashMap<Role, HashSet<Principal>>,
    log: Vec<RoleChange>,
}

impl RoleRegistry {
    #[must_use]
    pub fn new(admin: Principal) -> Self {
        Self {
            admin,
            members: HashMap::new(),
            log: Vec::new(),
        }
    }

    #[must_use]
    pub fn admin(&self) -> Principal {
        self.admin
    }

    #[must_use]
    pub fn is_admin(&self, principal: &Principal) -> bool {
        *principal == self.admin
    }

    #[must_use]
    pub fn has_role(&self, role: Role, principal: &Principal) -> bool {
        self.members
            .get(&role)
            .is_some_and(|set| set.contains(principal))
    }

    /// Roles held by `principal`, in custody-chain order.
    #[must_use]
    pub fn roles_of(&self, principal: &Principal) -> BTreeSet<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.has_role(*role, principal))
            .collect()
    }

    #[must_use]
    pub fn persona(&self, principal: &Principal) -> Persona {
        if self.is_admin(principal) {
            return Persona::Admin;
        }
        Role::ALL
            .into_iter()
            .find(|role| self.has_role(*role, principal))
            .map_or(Persona::Public, Persona::from)
    }

    /// Succeeds if `caller` holds `role`.
    ///
    /// # Errors
    ///
    /// `MissingRole` otherwise.
    pub fn require_role(&self, role: Role, caller: &Principal) -> LedgerResult<()> {
        if self.has_role(role, caller) {
            Ok(())
        } else {
            Err(LedgerError::MissingRole {
                caller: *caller,
                role,
            })
        }
    }

    /// # Errors
    ///
    /// `NotAdmin` unless `caller` is the administrator.
    pub fn require_admin(&self, caller: &Principal) -> LedgerResult<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(LedgerError::NotAdmin { caller: *caller })
        }
    }

    /// Adds `principal` to `role`. Returns whether membership changed.
    ///
    /// # Errors
    ///
    /// `NotAdmin` unless `caller` is the administrator.
    pub fn grant_role(
        &mut self,
        caller: &Principal,
        role: Role,
        principal: Principal,
        at: Timestamp,
    ) -> LedgerResult<bool> {
        self.require_admin(caller)?;
        let changed = self.members.entry(role).or_default().insert(principal);
        self.record(RoleAction::Granted, role, principal, changed, at);
        Ok(changed)
    }

    /// Removes `principal` from `role`. Returns whether membership changed.
    ///
    /// # Errors
    ///
    /// `NotAdmin` unless `caller` is the administrator.
    pub fn revoke_role(
        &mut self,
        caller: &Principal,
        role: Role,
        principal: Principal,
        at: Timestamp,
    ) -> LedgerResult<bool> {
        self.require_admin(caller)?;
        let changed = self
            .members
            .get_mut(&role)
            .is_some_and(|set| set.remove(&principal));
        self.record(RoleAction::Revoked, role, principal, changed, at);
        Ok(changed)
    }

    /// The authorization log, oldest first.
    #[must_use]
    pub fn history(&self) -> &[RoleChange] {
        &self.log
    }

    fn record(
        &mut self,
        action: RoleAction,
        role: Role,
        principal: Principal,
        changed: bool,
        at: Timestamp,
    ) {
        self.log.push(RoleChange {
            action,
            role,
            principal,
            changed,
            at,
        });
    }
}
