//! SQLite lead repository implementation.

use frontdesk_core::repository::LeadRepository;
use frontdesk_types::error::RepositoryError;
use frontdesk_types::lead::Lead;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `LeadRepository`.
pub struct SqliteLeadRepository {
    pool: DatabasePool,
}

impl SqliteLeadRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct LeadRow {
    id: String,
    name: String,
    phone: Option<String>,
    email: Option<String>,
    company: Option<String>,
    source: Option<String>,
    tags: String,
    created_at: String,
    updated_at: String,
}

impl LeadRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            company: row.try_get("company")?,
            source: row.try_get("source")?,
            tags: row.try_get("tags")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_lead(self) -> Result<Lead, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid lead id: {e}")))?;
        let tags: Vec<String> = serde_json::from_str(&self.tags)
            .map_err(|e| RepositoryError::Query(format!("invalid tags json: {e}")))?;

        Ok(Lead {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            company: self.company,
            source: self.source,
            tags,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl LeadRepository for SqliteLeadRepository {
    async fn insert(&self, lead: &Lead) -> Result<Lead, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO leads (id, name, phone, email, company, source, tags, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(lead.id.to_string())
        .bind(&lead.name)
        .bind(&lead.phone)
        .bind(&lead.email)
        .bind(&lead.company)
        .bind(&lead.source)
        .bind(
            serde_json::to_string(&lead.tags)
                .map_err(|e| RepositoryError::Query(format!("serialize tags: {e}")))?,
        )
        .bind(format_datetime(&lead.created_at))
        .bind(format_datetime(&lead.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(lead.clone())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Lead>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM leads WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let lead_row =
                    LeadRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(lead_row.into_lead()?))
            }
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Lead>, RepositoryError> {
        let mut sql = String::from("SELECT * FROM leads ORDER BY created_at DESC");
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut leads = Vec::with_capacity(rows.len());
        for row in &rows {
            let lead_row =
                LeadRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            leads.push(lead_row.into_lead()?);
        }

        Ok(leads)
    }

    async fn update(&self, lead: &Lead) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE leads
               SET name = ?, phone = ?, email = ?, company = ?, source = ?, tags = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&lead.name)
        .bind(&lead.phone)
        .bind(&lead.email)
        .bind(&lead.company)
        .bind(&lead.source)
        .bind(
            serde_json::to_string(&lead.tags)
                .map_err(|e| RepositoryError::Query(format!("serialize tags: {e}")))?,
        )
        .bind(format_datetime(&lead.updated_at))
        .bind(lead.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
