use crate::schema::{products, users};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A row of the credential table. Only ever read.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub salted_password_hash: String,
    pub salt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub manufacturer: String,
}

/// Request body for create and update. Doubles as the insert row and the
/// update changeset.
#[derive(Debug, Clone, Deserialize, Insertable, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductPayload {
    pub name: String,
    pub manufacturer: String,
}
