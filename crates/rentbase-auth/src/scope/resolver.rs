//! Row-level tenant scoping and the modify hierarchy.
//!
//! Everything here is a pure function of `(role, tenant ids)` returning an
//! immutable value: no hidden per-request state, safe to call from any
//! request-handling task without synchronization. A scoped role missing
//! its tenant id resolves to [`ScopePredicate::DenyAll`] rather than an
//! error — defaults closed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rentbase_entity::account::AccountRole;

/// The row-level predicate a caller's queries must be constrained by.
///
/// An immutable value object the route layer translates into its query
/// builder; this core never renders SQL from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scope", content = "id")]
pub enum ScopePredicate {
    /// No restriction: top-tier roles see all tenants.
    Unrestricted,
    /// Rows restricted to one city.
    City(Uuid),
    /// Rows restricted to one franchise unit.
    Unit(Uuid),
    /// No rows at all. The closed fallback for a scoped role whose tenant
    /// id is missing.
    DenyAll,
}

impl ScopePredicate {
    /// Whether a row with the given tenant columns passes this predicate.
    pub fn allows(&self, row_city_id: Option<Uuid>, row_unit_id: Option<Uuid>) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::City(city) => row_city_id == Some(*city),
            Self::Unit(unit) => row_unit_id == Some(*unit),
            Self::DenyAll => false,
        }
    }
}

/// The city-level filter for city-keyed tables.
///
/// Top-tier roles are unrestricted; regional- and unit-scoped roles are
/// pinned to their city.
pub fn city_filter(role: AccountRole, city_id: Option<Uuid>) -> ScopePredicate {
    match role {
        AccountRole::Owner | AccountRole::Admin => ScopePredicate::Unrestricted,
        AccountRole::Regional | AccountRole::Unit => match city_id {
            Some(city) => ScopePredicate::City(city),
            None => ScopePredicate::DenyAll,
        },
    }
}

/// The unit-level filter for unit-keyed tables.
///
/// Top-tier roles are unrestricted; regional roles see their whole city;
/// unit roles see exactly their unit and never a sibling's rows, even
/// within the same city.
pub fn unit_filter(
    role: AccountRole,
    city_id: Option<Uuid>,
    unit_id: Option<Uuid>,
) -> ScopePredicate {
    match role {
        AccountRole::Owner | AccountRole::Admin => ScopePredicate::Unrestricted,
        AccountRole::Regional => match city_id {
            Some(city) => ScopePredicate::City(city),
            None => ScopePredicate::DenyAll,
        },
        AccountRole::Unit => match unit_id {
            Some(unit) => ScopePredicate::Unit(unit),
            None => ScopePredicate::DenyAll,
        },
    }
}

/// Whether an actor may modify a target account.
///
/// An actor may always modify themself; otherwise the actor's rank must be
/// strictly greater than the target's under the fixed total order, so peers
/// cannot modify peers.
pub fn can_modify_account(
    actor_role: AccountRole,
    actor_id: Uuid,
    target_role: AccountRole,
    target_id: Uuid,
) -> bool {
    if actor_id == target_id {
        return true;
    }
    actor_role.rank() > target_role.rank()
}

/// Whether an actor may assign `new_role` to a target account.
///
/// Self-modification is allowed except elevating one's own role; assigning
/// to someone else requires outranking both the target's current role and
/// the role being assigned.
pub fn can_assign_role(
    actor_role: AccountRole,
    actor_id: Uuid,
    target_role: AccountRole,
    target_id: Uuid,
    new_role: AccountRole,
) -> bool {
    if actor_id == target_id {
        return new_role.rank() <= actor_role.rank();
    }
    actor_role.rank() > target_role.rank() && actor_role.rank() > new_role.rank()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_filter_top_tier_unrestricted() {
        assert_eq!(
            city_filter(AccountRole::Owner, None),
            ScopePredicate::Unrestricted
        );
        assert_eq!(
            city_filter(AccountRole::Admin, Some(Uuid::new_v4())),
            ScopePredicate::Unrestricted
        );
    }

    #[test]
    fn test_city_filter_scoped_roles_pinned() {
        let city = Uuid::new_v4();
        let other_city = Uuid::new_v4();

        let predicate = city_filter(AccountRole::Regional, Some(city));
        assert_eq!(predicate, ScopePredicate::City(city));
        assert!(predicate.allows(Some(city), None));
        assert!(!predicate.allows(Some(other_city), None));

        assert_eq!(
            city_filter(AccountRole::Unit, Some(city)),
            ScopePredicate::City(city)
        );
    }

    #[test]
    fn test_unit_filter_never_leaks_sibling_units() {
        let city = Uuid::new_v4();
        let unit = Uuid::new_v4();
        let sibling_unit = Uuid::new_v4();

        let predicate = unit_filter(AccountRole::Unit, Some(city), Some(unit));
        assert_eq!(predicate, ScopePredicate::Unit(unit));
        assert!(predicate.allows(Some(city), Some(unit)));
        // Same city, different unit: must not match.
        assert!(!predicate.allows(Some(city), Some(sibling_unit)));
    }

    #[test]
    fn test_unit_filter_regional_sees_whole_city() {
        let city = Uuid::new_v4();
        assert_eq!(
            unit_filter(AccountRole::Regional, Some(city), None),
            ScopePredicate::City(city)
        );
    }

    #[test]
    fn test_missing_tenant_id_denies_all() {
        assert_eq!(
            city_filter(AccountRole::Regional, None),
            ScopePredicate::DenyAll
        );
        assert_eq!(
            unit_filter(AccountRole::Unit, Some(Uuid::new_v4()), None),
            ScopePredicate::DenyAll
        );
        assert!(!ScopePredicate::DenyAll.allows(Some(Uuid::new_v4()), Some(Uuid::new_v4())));
    }

    #[test]
    fn test_can_modify_self_always() {
        let id = Uuid::new_v4();
        assert!(can_modify_account(AccountRole::Unit, id, AccountRole::Unit, id));
    }

    #[test]
    fn test_peers_cannot_modify_peers() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(!can_modify_account(
            AccountRole::Admin,
            a,
            AccountRole::Admin,
            b
        ));
        assert!(can_modify_account(
            AccountRole::Admin,
            a,
            AccountRole::Regional,
            b
        ));
        assert!(!can_modify_account(
            AccountRole::Regional,
            a,
            AccountRole::Admin,
            b
        ));
    }

    #[test]
    fn test_modify_hierarchy_is_exhaustive() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        for actor in AccountRole::all() {
            for target in AccountRole::all() {
                let allowed = can_modify_account(actor, a, target, b);
                assert_eq!(allowed, actor.rank() > target.rank());
            }
        }
    }

    #[test]
    fn test_cannot_elevate_own_role() {
        let id = Uuid::new_v4();
        assert!(!can_assign_role(
            AccountRole::Regional,
            id,
            AccountRole::Regional,
            id,
            AccountRole::Admin
        ));
        // Lateral or downward self-assignment is fine.
        assert!(can_assign_role(
            AccountRole::Regional,
            id,
            AccountRole::Regional,
            id,
            AccountRole::Unit
        ));
    }

    #[test]
    fn test_cannot_assign_role_at_or_above_own() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert!(!can_assign_role(
            AccountRole::Admin,
            a,
            AccountRole::Unit,
            b,
            AccountRole::Admin
        ));
        assert!(can_assign_role(
            AccountRole::Admin,
            a,
            AccountRole::Unit,
            b,
            AccountRole::Regional
        ));
    }
}
