//! Storage layer for BrandyBot.
//!
//! This crate persists users, brands and logo history behind one async
//! [`Store`] trait with three implementations:
//!
//! - [`PgStore`]: the relational store (PostgreSQL via `sqlx`, embedded
//!   migrations, JSONB for nested documents, cascading foreign keys)
//! - [`MemoryStore`]: in-process maps with the same constraints, used by
//!   tests and local development
//! - `RocksStore` (feature `rocksdb-backend`): the legacy document store,
//!   CBOR documents in column families with owner index keys
//!
//! [`migrate::migrate_legacy`] copies every document from one store into
//! another and is safe to run repeatedly.
//!
//! # Example
//!
//! ```no_run
//! use brandybot_core::{AuthProvider, NewUser, User};
//! use brandybot_store::{MemoryStore, Store};
//!
//! # async fn run() -> brandybot_store::Result<()> {
//! let store = MemoryStore::new();
//! let user = User::new(NewUser {
//!     uid: "firebase-uid".into(),
//!     email: "owner@example.com".into(),
//!     display_name: "Owner".into(),
//!     photo_url: String::new(),
//!     provider: AuthProvider::Google,
//! })
//! .expect("valid user");
//! store.create_user(&user).await?;
//! assert!(store.get_user_by_uid("firebase-uid").await?.is_some());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
pub mod migrate;
pub mod postgres;

#[cfg(feature = "rocksdb-backend")]
pub mod keys;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
#[cfg(feature = "rocksdb-backend")]
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use migrate::{migrate_legacy, MigrationReport};
pub use postgres::PgStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use async_trait::async_trait;
use brandybot_core::{Brand, BrandId, BrandStatus, LogoHistory, LogoId, LogoStats, User, UserId};

/// The storage trait defining all database operations.
///
/// Owned lookups take the caller's [`UserId`] and return `None` for records
/// that belong to someone else, so handlers never leak foreign records.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the UID or email is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Get a user by local ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Get a user by identity-provider UID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_user_by_uid(&self, uid: &str) -> Result<Option<User>>;

    /// Overwrite an existing user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    async fn update_user(&self, user: &User) -> Result<()>;

    /// Delete a user together with their brands and logo history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    async fn delete_user(&self, id: &UserId) -> Result<()>;

    /// List every user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_users(&self) -> Result<Vec<User>>;

    // =========================================================================
    // Brand Operations
    // =========================================================================

    /// Insert a new brand.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidReference` if the owner doesn't exist.
    async fn create_brand(&self, brand: &Brand) -> Result<()>;

    /// Get a brand owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_brand(&self, id: &BrandId, owner: &UserId) -> Result<Option<Brand>>;

    /// List an owner's brands, most recently updated first.
    ///
    /// `None` lists every status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_brands(&self, owner: &UserId, status: Option<BrandStatus>)
        -> Result<Vec<Brand>>;

    /// Overwrite an existing brand.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the brand doesn't exist.
    /// - `StoreError::Conflict` if the share link is taken.
    async fn update_brand(&self, brand: &Brand) -> Result<()>;

    /// Delete a brand owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such brand belongs to `owner`.
    async fn delete_brand(&self, id: &BrandId, owner: &UserId) -> Result<()>;

    /// Get a public brand by its share link.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_public_brand(&self, share_link: &str) -> Result<Option<Brand>>;

    // =========================================================================
    // Logo History Operations
    // =========================================================================

    /// Insert a logo history record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidReference` if the owner doesn't exist.
    async fn create_logo(&self, logo: &LogoHistory) -> Result<()>;

    /// Overwrite an existing logo history record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the record doesn't exist.
    async fn update_logo(&self, logo: &LogoHistory) -> Result<()>;

    /// Get a logo history record owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_logo(&self, id: &LogoId, owner: &UserId) -> Result<Option<LogoHistory>>;

    /// List an owner's logo history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_logos(
        &self,
        owner: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LogoHistory>>;

    /// Count an owner's logo history records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn count_logos(&self, owner: &UserId) -> Result<u64>;

    /// Aggregate statistics over an owner's logo history.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn logo_stats(&self, owner: &UserId) -> Result<LogoStats>;
}
