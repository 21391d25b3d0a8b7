//! Diesel table definitions.
//!
//! Must match `migrations/` exactly. Regenerate with `diesel print-schema`
//! after changing a migration, then restore the `kind` rename on
//! `ephemera.type`.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// UUID v4 primary key.
        id -> Uuid,
        /// Lower-cased login email, unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// `user` or `admin`.
        role -> Varchar,
        /// Registration time.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Camera makers.
    manufacturers (id) {
        id -> Int4,
        name -> Varchar,
        founded -> Int4,
        defunct -> Nullable<Int4>,
        country -> Varchar,
        description -> Text,
    }
}

diesel::table! {
    /// Camera models. Rows with `deleted_at` set are soft-deleted.
    cameras (id) {
        id -> Int4,
        name -> Varchar,
        manufacturer -> Varchar,
        year_introduced -> Int4,
        year_discontinued -> Nullable<Int4>,
        format -> Varchar,
        plate_sizes -> Array<Text>,
        lens -> Text,
        shutter -> Text,
        features -> Array<Text>,
        description -> Text,
        image_urls -> Array<Text>,
        rarity -> Varchar,
        estimated_value_min -> Nullable<Float8>,
        estimated_value_max -> Nullable<Float8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Printed ephemera. Rows with `deleted_at` set are soft-deleted.
    ephemera (id) {
        id -> Int4,
        #[sql_name = "type"]
        kind -> Varchar,
        title -> Varchar,
        year -> Int4,
        pages -> Nullable<Int4>,
        description -> Text,
        scan_url -> Text,
        thumbnail_url -> Text,
        related_cameras -> Array<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, manufacturers, cameras, ephemera);
