//! Column families of the legacy document store.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// User documents, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Index: identity-provider UID to `user_id`.
    pub const USERS_BY_UID: &str = "users_by_uid";

    /// Index: lowercased email to `user_id`.
    pub const USERS_BY_EMAIL: &str = "users_by_email";

    /// Brand documents, keyed by `brand_id`.
    pub const BRANDS: &str = "brands";

    /// Index: brands by owner, keyed by `user_id || brand_id`.
    /// Value is empty (index only).
    pub const BRANDS_BY_USER: &str = "brands_by_user";

    /// Index: share token to `brand_id`.
    pub const SHARE_LINKS: &str = "share_links";

    /// Logo history documents, keyed by `logo_id` (ULID).
    pub const LOGOS: &str = "logos";

    /// Index: logos by owner, keyed by `user_id || logo_id`.
    /// Value is empty (index only).
    pub const LOGOS_BY_USER: &str = "logos_by_user";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::USERS_BY_UID,
        cf::USERS_BY_EMAIL,
        cf::BRANDS,
        cf::BRANDS_BY_USER,
        cf::SHARE_LINKS,
        cf::LOGOS,
        cf::LOGOS_BY_USER,
    ]
}
