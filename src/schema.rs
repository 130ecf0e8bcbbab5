table! {
    users (id) {
        id -> Int4,
        username -> Varchar,
        salted_password_hash -> Varchar,
        salt -> Varchar,
    }
}

table! {
    products (id) {
        id -> Int4,
        name -> Varchar,
        manufacturer -> Varchar,
    }
}

allow_tables_to_appear_in_same_query!(users, products);
