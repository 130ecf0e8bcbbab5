use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};

use crate::error::StoreError;
use crate::models::{Product, ProductPayload, User};
use crate::schema::{products, users};

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Blocking access to the credential and product tables. Calls are made from
/// the blocking thread pool, never directly from a request future.
pub trait Store: Send + Sync {
    fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    fn create_product(&self, payload: &ProductPayload) -> Result<Product, StoreError>;

    fn get_product(&self, id: i32) -> Result<Option<Product>, StoreError>;

    /// `None` when no row has the given id.
    fn update_product(
        &self,
        id: i32,
        payload: &ProductPayload,
    ) -> Result<Option<Product>, StoreError>;

    /// Number of rows removed (0 or 1).
    fn delete_product(&self, id: i32) -> Result<usize, StoreError>;
}

/// PostgreSQL store backed by an r2d2 connection pool.
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn connect(database_url: &str) -> Result<PgStore, StoreError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = r2d2::Pool::builder().build(manager)?;
        Ok(PgStore { pool })
    }
}

impl Store for PgStore {
    fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get()?;
        let user = users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(user)
    }

    fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .select(Product::as_select())
            .order(products::id.asc())
            .load(&mut conn)?;
        Ok(rows)
    }

    fn create_product(&self, payload: &ProductPayload) -> Result<Product, StoreError> {
        let mut conn = self.pool.get()?;
        let product = diesel::insert_into(products::table)
            .values(payload)
            .returning(Product::as_returning())
            .get_result(&mut conn)?;
        Ok(product)
    }

    fn get_product(&self, id: i32) -> Result<Option<Product>, StoreError> {
        let mut conn = self.pool.get()?;
        let product = products::table
            .find(id)
            .select(Product::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(product)
    }

    fn update_product(
        &self,
        id: i32,
        payload: &ProductPayload,
    ) -> Result<Option<Product>, StoreError> {
        let mut conn = self.pool.get()?;
        let product = diesel::update(products::table.find(id))
            .set(payload)
            .returning(Product::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(product)
    }

    fn delete_product(&self, id: i32) -> Result<usize, StoreError> {
        let mut conn = self.pool.get()?;
        let removed = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        Ok(removed)
    }
}
