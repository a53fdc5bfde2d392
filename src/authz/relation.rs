use std::collections::{BTreeSet, HashMap};

use super::role::Role;

/// Satisfaction relation between roles and dashboard requirements.
///
/// Each requirement maps to the set of roles allowed to meet it. Every role
/// meets its own requirement; roles listed as super-roles meet all of them.
/// Sibling roles never satisfy each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRelation {
    satisfiers: HashMap<Role, BTreeSet<Role>>,
}

impl RoleRelation {
    pub const SUPER_ROLES: &'static [Role] = &[Role::Admin];

    pub fn standard() -> Self {
        Self::with_super_roles(Self::SUPER_ROLES)
    }

    pub fn with_super_roles(super_roles: &[Role]) -> Self {
        let satisfiers = Role::ALL
            .into_iter()
            .map(|requirement| {
                let mut set: BTreeSet<Role> = super_roles.iter().copied().collect();
                set.insert(requirement);
                (requirement, set)
            })
            .collect();

        Self { satisfiers }
    }

    pub fn satisfies(&self, role: Role, requirement: Role) -> bool {
        self.satisfiers
            .get(&requirement)
            .is_some_and(|roles| roles.contains(&role))
    }
}

impl Default for RoleRelation {
    fn default() -> Self {
        Self::standard()
    }
}
