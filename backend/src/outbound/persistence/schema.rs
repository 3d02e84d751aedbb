//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lowercased.
    users (id) {
        id -> Int4,
        email -> Varchar,
        name -> Varchar,
        password_hash -> Varchar,
        /// One of `owner`, `sales`, `admin`, `viewer` (CHECK constraint).
        role -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Car listings.
    cars (id) {
        id -> Int4,
        make -> Varchar,
        model -> Varchar,
        year -> Int4,
        mileage -> Int4,
        price -> Int8,
        fuel_type -> Varchar,
        transmission -> Varchar,
        body_type -> Varchar,
        /// Legacy single-image field mirroring the primary image url.
        image_url -> Nullable<Varchar>,
        available -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Images attached to cars, cascading on car deletion.
    car_images (id) {
        id -> Int4,
        car_id -> Int4,
        url -> Varchar,
        caption -> Nullable<Varchar>,
        is_primary -> Bool,
        sort_order -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// (user, car) bookmarks, unique per pair.
    favorites (id) {
        id -> Int4,
        user_id -> Int4,
        car_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Direct messages.
    messages (id) {
        id -> Int4,
        content -> Text,
        sender_id -> Int4,
        receiver_id -> Int4,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(car_images -> cars (car_id));
diesel::joinable!(favorites -> cars (car_id));
diesel::joinable!(favorites -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, cars, car_images, favorites, messages);
