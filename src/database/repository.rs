use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::database::models::{Contact, ContactInput};
use crate::database::pagination::{contains_pattern, Pagination};

/// Storage operations the handlers depend on.
///
/// `update` and `delete` return the number of rows they touched; zero means
/// no contact had that id.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn create_schema(&self) -> Result<(), DatabaseError>;

    async fn insert(&self, contact: &ContactInput) -> Result<i64, DatabaseError>;

    async fn list(
        &self,
        pagination: Pagination,
        name_filter: Option<&str>,
    ) -> Result<Vec<Contact>, DatabaseError>;

    async fn find(&self, id: i64) -> Result<Option<Contact>, DatabaseError>;

    async fn update(&self, contact: &Contact) -> Result<u64, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<u64, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// SQLite-backed contact table
#[derive(Clone)]
pub struct ContactRepository {
    pool: SqlitePool,
}

impl ContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn create_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                email TEXT
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, contact: &ContactInput) -> Result<i64, DatabaseError> {
        let result = sqlx::query("INSERT INTO contacts (name, email) VALUES (?, ?)")
            .bind(&contact.name)
            .bind(&contact.email)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn list(
        &self,
        pagination: Pagination,
        name_filter: Option<&str>,
    ) -> Result<Vec<Contact>, DatabaseError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT id, name, email FROM contacts");

        if let Some(name) = name_filter.filter(|n| !n.is_empty()) {
            qb.push(" WHERE name LIKE ")
                .push_bind(contains_pattern(name))
                .push(" ESCAPE '\\'");
        }

        qb.push(" ORDER BY id LIMIT ")
            .push_bind(pagination.limit)
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let contacts = qb.build_query_as::<Contact>().fetch_all(&self.pool).await?;
        Ok(contacts)
    }

    async fn find(&self, id: i64) -> Result<Option<Contact>, DatabaseError> {
        let contact = sqlx::query_as::<_, Contact>("SELECT id, name, email FROM contacts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contact)
    }

    async fn update(&self, contact: &Contact) -> Result<u64, DatabaseError> {
        let result = sqlx::query("UPDATE contacts SET name = ?, email = ? WHERE id = ?")
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(contact.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        crate::database::manager::DatabaseManager::health_check(&self.pool).await
    }
}
