//! In-memory storage implementation.
//!
//! Enforces the same constraints as the relational schema: unique UID,
//! email and share link, owner references, and cascading user deletes.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use brandybot_core::{Brand, BrandId, BrandStatus, LogoHistory, LogoId, LogoStats, User, UserId};

use crate::error::{Result, StoreError};
use crate::Store;

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    brands: HashMap<BrandId, Brand>,
    logos: HashMap<LogoId, LogoHistory>,
}

impl Tables {
    fn check_user_unique(&self, user: &User) -> Result<()> {
        let clash = self.users.values().find(|existing| {
            existing.id != user.id && (existing.uid == user.uid || existing.email == user.email)
        });
        match clash {
            Some(existing) if existing.uid == user.uid => {
                Err(StoreError::Conflict(format!("uid {}", user.uid)))
            }
            Some(_) => Err(StoreError::Conflict(format!("email {}", user.email))),
            None => Ok(()),
        }
    }

    fn check_owner(&self, owner: &UserId) -> Result<()> {
        if self.users.contains_key(owner) {
            Ok(())
        } else {
            Err(StoreError::InvalidReference(format!("user {owner}")))
        }
    }

    fn check_share_link_unique(&self, brand: &Brand) -> Result<()> {
        let Some(link) = brand.share_link.as_deref() else {
            return Ok(());
        };
        let taken = self
            .brands
            .values()
            .any(|other| other.id != brand.id && other.share_link.as_deref() == Some(link));
        if taken {
            Err(StoreError::Conflict(format!("share link {link}")))
        } else {
            Ok(())
        }
    }
}

/// Map-backed storage for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("user {}", user.id)));
        }
        tables.check_user_unique(user)?;
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn get_user_by_uid(&self, uid: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.uid == uid).cloned())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(StoreError::not_found("user", user.id));
        }
        tables.check_user_unique(user)?;
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(id).is_none() {
            return Err(StoreError::not_found("user", id));
        }
        tables.brands.retain(|_, brand| brand.user_id != *id);
        tables.logos.retain(|_, logo| logo.user_id != *id);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<_> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    // =========================================================================
    // Brand Operations
    // =========================================================================

    async fn create_brand(&self, brand: &Brand) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.check_owner(&brand.user_id)?;
        if tables.brands.contains_key(&brand.id) {
            return Err(StoreError::Conflict(format!("brand {}", brand.id)));
        }
        tables.check_share_link_unique(brand)?;
        tables.brands.insert(brand.id, brand.clone());
        Ok(())
    }

    async fn get_brand(&self, id: &BrandId, owner: &UserId) -> Result<Option<Brand>> {
        let tables = self.tables.read().await;
        Ok(tables
            .brands
            .get(id)
            .filter(|b| b.user_id == *owner)
            .cloned())
    }

    async fn list_brands(
        &self,
        owner: &UserId,
        status: Option<BrandStatus>,
    ) -> Result<Vec<Brand>> {
        let tables = self.tables.read().await;
        let mut brands: Vec<_> = tables
            .brands
            .values()
            .filter(|b| b.user_id == *owner && status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        brands.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(brands)
    }

    async fn update_brand(&self, brand: &Brand) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.brands.contains_key(&brand.id) {
            return Err(StoreError::not_found("brand", brand.id));
        }
        tables.check_share_link_unique(brand)?;
        tables.brands.insert(brand.id, brand.clone());
        Ok(())
    }

    async fn delete_brand(&self, id: &BrandId, owner: &UserId) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.brands.get(id) {
            Some(brand) if brand.user_id == *owner => {
                tables.brands.remove(id);
                Ok(())
            }
            _ => Err(StoreError::not_found("brand", id)),
        }
    }

    async fn get_public_brand(&self, share_link: &str) -> Result<Option<Brand>> {
        let tables = self.tables.read().await;
        Ok(tables
            .brands
            .values()
            .find(|b| b.is_public && b.share_link.as_deref() == Some(share_link))
            .cloned())
    }

    // =========================================================================
    // Logo History Operations
    // =========================================================================

    async fn create_logo(&self, logo: &LogoHistory) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.check_owner(&logo.user_id)?;
        if tables.logos.contains_key(&logo.id) {
            return Err(StoreError::Conflict(format!("logo {}", logo.id)));
        }
        tables.logos.insert(logo.id, logo.clone());
        Ok(())
    }

    async fn update_logo(&self, logo: &LogoHistory) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.logos.get_mut(&logo.id) {
            Some(existing) => {
                *existing = logo.clone();
                Ok(())
            }
            None => Err(StoreError::not_found("logo", logo.id)),
        }
    }

    async fn get_logo(&self, id: &LogoId, owner: &UserId) -> Result<Option<LogoHistory>> {
        let tables = self.tables.read().await;
        Ok(tables
            .logos
            .get(id)
            .filter(|l| l.user_id == *owner)
            .cloned())
    }

    async fn list_logos(
        &self,
        owner: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LogoHistory>> {
        let tables = self.tables.read().await;
        let mut logos: Vec<_> = tables
            .logos
            .values()
            .filter(|l| l.user_id == *owner)
            .cloned()
            .collect();
        // ULIDs sort by creation time.
        logos.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(logos.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_logos(&self, owner: &UserId) -> Result<u64> {
        let tables = self.tables.read().await;
        Ok(tables.logos.values().filter(|l| l.user_id == *owner).count() as u64)
    }

    async fn logo_stats(&self, owner: &UserId) -> Result<LogoStats> {
        let tables = self.tables.read().await;
        Ok(LogoStats::from_records(
            tables.logos.values().filter(|l| l.user_id == *owner),
        ))
    }
}
