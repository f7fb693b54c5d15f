//! PostgreSQL implementation of OwnerDirectory.
//!
//! Reads owner records from the table of the configured owner kind. The
//! table belongs to the host application; this service never writes to it.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, OwnerId, PrincipalId};
use crate::domain::owner::{CustomerRef, Owner, OwnerKind};
use crate::ports::{LookupCapabilities, OwnerDirectory};

/// PostgreSQL implementation of the OwnerDirectory port.
pub struct PostgresOwnerDirectory {
    pool: PgPool,
    kind: OwnerKind,
    capabilities: LookupCapabilities,
}

impl PostgresOwnerDirectory {
    /// Creates a directory over `kind.table_name()`.
    pub fn new(pool: PgPool, kind: OwnerKind) -> Self {
        Self {
            pool,
            kind,
            capabilities: LookupCapabilities::default(),
        }
    }

    /// Declares whether the owner table has a usable `slug` column.
    pub fn with_slug_lookup(mut self, enabled: bool) -> Self {
        self.capabilities = self.capabilities.with_slug_lookup(enabled);
        self
    }

    fn select(&self, predicate: &str) -> String {
        format!(
            "SELECT id, slug, principal_id, billing_customer FROM {} WHERE {} LIMIT 1",
            self.kind.table_name(),
            predicate
        )
    }

    async fn fetch_one(
        &self,
        sql: String,
        bind: OwnerBind<'_>,
    ) -> Result<Option<Owner>, DomainError> {
        let query = sqlx::query_as::<_, OwnerRow>(&sql);
        let query = match bind {
            OwnerBind::Id(id) => query.bind(id),
            OwnerBind::Text(text) => query.bind(text),
        };

        let row = query.fetch_optional(&self.pool).await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find {}: {}", self.kind, e),
            )
        })?;

        row.map(|row| row.into_owner(self.kind)).transpose()
    }
}

enum OwnerBind<'a> {
    Id(i64),
    Text(&'a str),
}

/// Database row representation of an owner.
#[derive(Debug, sqlx::FromRow)]
struct OwnerRow {
    id: i64,
    slug: Option<String>,
    principal_id: Option<String>,
    billing_customer: Option<String>,
}

impl OwnerRow {
    fn into_owner(self, kind: OwnerKind) -> Result<Owner, DomainError> {
        let mut owner = Owner::new(OwnerId::new(self.id), kind);
        owner.slug = self.slug.filter(|s| !s.is_empty());
        owner.principal_id = self
            .principal_id
            .map(PrincipalId::new)
            .transpose()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid principal_id: {}", e),
                )
            })?;
        // Blank customer columns mean "no billing customer", not corruption.
        owner.billing_customer = self
            .billing_customer
            .and_then(|id| CustomerRef::new(id).ok());
        Ok(owner)
    }
}

#[async_trait]
impl OwnerDirectory for PostgresOwnerDirectory {
    fn kind(&self) -> OwnerKind {
        self.kind
    }

    fn capabilities(&self) -> LookupCapabilities {
        self.capabilities
    }

    async fn find_by_id(&self, id: OwnerId) -> Result<Option<Owner>, DomainError> {
        self.fetch_one(self.select("id = $1"), OwnerBind::Id(id.value()))
            .await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Owner>, DomainError> {
        if !self.capabilities.slug_lookup {
            return Ok(None);
        }
        self.fetch_one(self.select("slug = $1"), OwnerBind::Text(slug))
            .await
    }

    async fn find_for_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Option<Owner>, DomainError> {
        self.fetch_one(
            self.select("principal_id = $1"),
            OwnerBind::Text(principal_id.as_str()),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> OwnerRow {
        OwnerRow {
            id: 7,
            slug: Some("acme".to_string()),
            principal_id: Some("user-7".to_string()),
            billing_customer: Some("cus_7".to_string()),
        }
    }

    #[test]
    fn row_converts_to_owner_of_kind() {
        let owner = row().into_owner(OwnerKind::Company).unwrap();
        assert_eq!(owner.id, OwnerId::new(7));
        assert_eq!(owner.kind, OwnerKind::Company);
        assert_eq!(owner.to_param(), "acme");
        assert_eq!(owner.billing_customer.unwrap().as_str(), "cus_7");
    }

    #[test]
    fn blank_columns_become_none() {
        let owner = OwnerRow {
            slug: Some(String::new()),
            billing_customer: Some("  ".to_string()),
            ..row()
        }
        .into_owner(OwnerKind::Account)
        .unwrap();

        assert!(owner.slug.is_none());
        assert!(owner.billing_customer.is_none());
    }

    #[test]
    fn blank_principal_is_a_data_error() {
        let err = OwnerRow {
            principal_id: Some(String::new()),
            ..row()
        }
        .into_owner(OwnerKind::User)
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
