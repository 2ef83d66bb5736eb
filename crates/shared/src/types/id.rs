//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `TenantId` where a `CompanyId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(TenantId, "Unique identifier for a tenant.");
typed_id!(CompanyId, "Unique identifier for a company within a tenant.");
typed_id!(UserId, "Unique identifier for the user performing an operation.");

/// The tenant/company pair every ledger query and mutation is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyScope {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Company within the tenant.
    pub company_id: CompanyId,
}

impl CompanyScope {
    /// Creates a scope from raw UUIDs.
    #[must_use]
    pub const fn new(tenant_id: Uuid, company_id: Uuid) -> Self {
        Self {
            tenant_id: TenantId::from_uuid(tenant_id),
            company_id: CompanyId::from_uuid(company_id),
        }
    }

    /// Raw tenant UUID, for storage filters.
    #[must_use]
    pub const fn tenant(&self) -> Uuid {
        self.tenant_id.into_inner()
    }

    /// Raw company UUID, for storage filters.
    #[must_use]
    pub const fn company(&self) -> Uuid {
        self.company_id.into_inner()
    }

    /// Returns true if a row carrying `tenant`/`company` belongs to this scope.
    #[must_use]
    pub fn owns(&self, tenant: Uuid, company: Uuid) -> bool {
        self.tenant() == tenant && self.company() == company
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
