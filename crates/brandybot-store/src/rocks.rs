//! `RocksDB` storage implementation of the legacy document store.
//!
//! Documents are CBOR-encoded. Uniqueness of UID, email and share link is
//! kept with lookup column families; owner listings use index keys.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use brandybot_core::{Brand, BrandId, BrandStatus, LogoHistory, LogoId, LogoStats, User, UserId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serializes read-check-write sequences.
    write_lock: Mutex<()>,
}

fn db_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(e.to_string())
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(db_err)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get_doc<T: serde::de::DeserializeOwned>(&self, family: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(family)?;
        self.db
            .get_cf(&cf, key)
            .map_err(db_err)?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn get_raw(&self, family: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self.cf(family)?;
        self.db.get_cf(&cf, key).map_err(db_err)
    }

    /// Collect the keys of an owner index, in key order.
    fn index_keys(&self, family: &str, owner: &UserId) -> Result<Vec<Vec<u8>>> {
        let cf = self.cf(family)?;
        let prefix = keys::owner_prefix(owner);
        let mut found = Vec::new();
        for item in self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward))
        {
            let (key, _) = item.map_err(db_err)?;
            if !key.starts_with(&prefix) {
                break;
            }
            found.push(key.to_vec());
        }
        Ok(found)
    }

    fn owned_brands(&self, owner: &UserId) -> Result<Vec<Brand>> {
        let mut brands = Vec::new();
        for key in self.index_keys(cf::BRANDS_BY_USER, owner)? {
            let Some(id) = keys::brand_id_from_index(&key) else {
                tracing::warn!(owner = %owner, "Skipping malformed brand index key");
                continue;
            };
            if let Some(brand) = self.get_doc(cf::BRANDS, &keys::brand_key(&id))? {
                brands.push(brand);
            }
        }
        Ok(brands)
    }

    fn owned_logo_ids(&self, owner: &UserId) -> Result<Vec<LogoId>> {
        Ok(self
            .index_keys(cf::LOGOS_BY_USER, owner)?
            .iter()
            .filter_map(|key| keys::logo_id_from_index(key))
            .collect())
    }

    /// Fail with `Conflict` if `value` is claimed in `family` by another owner.
    fn check_unique(&self, family: &str, value: &str, owner: &[u8]) -> Result<()> {
        match self.get_raw(family, &keys::lookup_key(value))? {
            Some(existing) if existing != owner => {
                Err(StoreError::Conflict(format!("{family}: {value}")))
            }
            _ => Ok(()),
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    fn write_user(&self, user: &User, previous: Option<&User>) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_uid = self.cf(cf::USERS_BY_UID)?;
        let cf_email = self.cf(cf::USERS_BY_EMAIL)?;
        let id_bytes = keys::user_key(&user.id);

        let mut batch = WriteBatch::default();
        if let Some(prev) = previous {
            if prev.email != user.email {
                batch.delete_cf(&cf_email, keys::lookup_key(&prev.email));
            }
            if prev.uid != user.uid {
                batch.delete_cf(&cf_uid, keys::lookup_key(&prev.uid));
            }
        }
        batch.put_cf(&cf_users, &id_bytes, Self::serialize(user)?);
        batch.put_cf(&cf_uid, keys::lookup_key(&user.uid), &id_bytes);
        batch.put_cf(&cf_email, keys::lookup_key(&user.email), &id_bytes);
        self.db.write(batch).map_err(db_err)
    }

    fn create_user_sync(&self, user: &User) -> Result<()> {
        let _guard = self.lock()?;
        let id_bytes = keys::user_key(&user.id);
        if self.get_raw(cf::USERS, &id_bytes)?.is_some() {
            return Err(StoreError::Conflict(format!("user {}", user.id)));
        }
        self.check_unique(cf::USERS_BY_UID, &user.uid, &id_bytes)?;
        self.check_unique(cf::USERS_BY_EMAIL, &user.email, &id_bytes)?;
        self.write_user(user, None)
    }

    fn get_user_sync(&self, id: &UserId) -> Result<Option<User>> {
        self.get_doc(cf::USERS, &keys::user_key(id))
    }

    fn get_user_by_uid_sync(&self, uid: &str) -> Result<Option<User>> {
        match self
            .get_raw(cf::USERS_BY_UID, &keys::lookup_key(uid))?
            .and_then(|v| keys::user_id_from_value(&v))
        {
            Some(id) => self.get_user_sync(&id),
            None => Ok(None),
        }
    }

    fn update_user_sync(&self, user: &User) -> Result<()> {
        let _guard = self.lock()?;
        let previous = self
            .get_user_sync(&user.id)?
            .ok_or_else(|| StoreError::not_found("user", user.id))?;
        let id_bytes = keys::user_key(&user.id);
        self.check_unique(cf::USERS_BY_UID, &user.uid, &id_bytes)?;
        self.check_unique(cf::USERS_BY_EMAIL, &user.email, &id_bytes)?;
        self.write_user(user, Some(&previous))
    }

    fn delete_user_sync(&self, id: &UserId) -> Result<()> {
        let _guard = self.lock()?;
        let user = self
            .get_user_sync(id)?
            .ok_or_else(|| StoreError::not_found("user", id))?;

        let cf_brands = self.cf(cf::BRANDS)?;
        let cf_brands_by_user = self.cf(cf::BRANDS_BY_USER)?;
        let cf_share = self.cf(cf::SHARE_LINKS)?;
        let cf_logos = self.cf(cf::LOGOS)?;
        let cf_logos_by_user = self.cf(cf::LOGOS_BY_USER)?;

        let mut batch = WriteBatch::default();
        for brand in self.owned_brands(id)? {
            if let Some(link) = &brand.share_link {
                batch.delete_cf(&cf_share, keys::lookup_key(link));
            }
            batch.delete_cf(&cf_brands, keys::brand_key(&brand.id));
            batch.delete_cf(&cf_brands_by_user, keys::user_brand_key(id, &brand.id));
        }
        for logo_id in self.owned_logo_ids(id)? {
            batch.delete_cf(&cf_logos, keys::logo_key(&logo_id));
            batch.delete_cf(&cf_logos_by_user, keys::user_logo_key(id, &logo_id));
        }
        batch.delete_cf(&self.cf(cf::USERS_BY_UID)?, keys::lookup_key(&user.uid));
        batch.delete_cf(&self.cf(cf::USERS_BY_EMAIL)?, keys::lookup_key(&user.email));
        batch.delete_cf(&self.cf(cf::USERS)?, keys::user_key(id));
        self.db.write(batch).map_err(db_err)
    }

    fn list_users_sync(&self) -> Result<Vec<User>> {
        let cf = self.cf(cf::USERS)?;
        let mut users = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(db_err)?;
            users.push(Self::deserialize::<User>(&value)?);
        }
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    // =========================================================================
    // Brands
    // =========================================================================

    fn write_brand(&self, brand: &Brand, previous: Option<&Brand>) -> Result<()> {
        let cf_brands = self.cf(cf::BRANDS)?;
        let cf_share = self.cf(cf::SHARE_LINKS)?;
        let id_bytes = keys::brand_key(&brand.id);

        let mut batch = WriteBatch::default();
        if let Some(old) = previous.and_then(|p| p.share_link.as_deref()) {
            if brand.share_link.as_deref() != Some(old) {
                batch.delete_cf(&cf_share, keys::lookup_key(old));
            }
        }
        if let Some(link) = &brand.share_link {
            batch.put_cf(&cf_share, keys::lookup_key(link), &id_bytes);
        }
        batch.put_cf(&cf_brands, &id_bytes, Self::serialize(brand)?);
        batch.put_cf(
            &self.cf(cf::BRANDS_BY_USER)?,
            keys::user_brand_key(&brand.user_id, &brand.id),
            [],
        );
        self.db.write(batch).map_err(db_err)
    }

    fn create_brand_sync(&self, brand: &Brand) -> Result<()> {
        let _guard = self.lock()?;
        if self.get_user_sync(&brand.user_id)?.is_none() {
            return Err(StoreError::InvalidReference(format!("user {}", brand.user_id)));
        }
        let id_bytes = keys::brand_key(&brand.id);
        if self.get_raw(cf::BRANDS, &id_bytes)?.is_some() {
            return Err(StoreError::Conflict(format!("brand {}", brand.id)));
        }
        if let Some(link) = &brand.share_link {
            self.check_unique(cf::SHARE_LINKS, link, &id_bytes)?;
        }
        self.write_brand(brand, None)
    }

    fn get_brand_sync(&self, id: &BrandId, owner: &UserId) -> Result<Option<Brand>> {
        Ok(self
            .get_doc::<Brand>(cf::BRANDS, &keys::brand_key(id))?
            .filter(|b| b.user_id == *owner))
    }

    fn update_brand_sync(&self, brand: &Brand) -> Result<()> {
        let _guard = self.lock()?;
        let id_bytes = keys::brand_key(&brand.id);
        let previous: Brand = self
            .get_doc(cf::BRANDS, &id_bytes)?
            .ok_or_else(|| StoreError::not_found("brand", brand.id))?;
        if let Some(link) = &brand.share_link {
            self.check_unique(cf::SHARE_LINKS, link, &id_bytes)?;
        }
        self.write_brand(brand, Some(&previous))
    }

    fn delete_brand_sync(&self, id: &BrandId, owner: &UserId) -> Result<()> {
        let _guard = self.lock()?;
        let brand = self
            .get_brand_sync(id, owner)?
            .ok_or_else(|| StoreError::not_found("brand", id))?;

        let mut batch = WriteBatch::default();
        if let Some(link) = &brand.share_link {
            batch.delete_cf(&self.cf(cf::SHARE_LINKS)?, keys::lookup_key(link));
        }
        batch.delete_cf(&self.cf(cf::BRANDS)?, keys::brand_key(id));
        batch.delete_cf(&self.cf(cf::BRANDS_BY_USER)?, keys::user_brand_key(owner, id));
        self.db.write(batch).map_err(db_err)
    }

    fn get_public_brand_sync(&self, share_link: &str) -> Result<Option<Brand>> {
        let Some(id) = self
            .get_raw(cf::SHARE_LINKS, &keys::lookup_key(share_link))?
            .and_then(|v| keys::brand_id_from_value(&v))
        else {
            return Ok(None);
        };
        Ok(self
            .get_doc::<Brand>(cf::BRANDS, &keys::brand_key(&id))?
            .filter(|b| b.is_public))
    }

    // =========================================================================
    // Logos
    // =========================================================================

    fn create_logo_sync(&self, logo: &LogoHistory) -> Result<()> {
        let _guard = self.lock()?;
        if self.get_user_sync(&logo.user_id)?.is_none() {
            return Err(StoreError::InvalidReference(format!("user {}", logo.user_id)));
        }
        let key = keys::logo_key(&logo.id);
        if self.get_raw(cf::LOGOS, &key)?.is_some() {
            return Err(StoreError::Conflict(format!("logo {}", logo.id)));
        }

        let mut batch = WriteBatch::default();
        batch.put_cf(&self.cf(cf::LOGOS)?, &key, Self::serialize(logo)?);
        batch.put_cf(
            &self.cf(cf::LOGOS_BY_USER)?,
            keys::user_logo_key(&logo.user_id, &logo.id),
            [],
        );
        self.db.write(batch).map_err(db_err)
    }

    fn update_logo_sync(&self, logo: &LogoHistory) -> Result<()> {
        let _guard = self.lock()?;
        let cf = self.cf(cf::LOGOS)?;
        let key = keys::logo_key(&logo.id);
        if self.db.get_cf(&cf, &key).map_err(db_err)?.is_none() {
            return Err(StoreError::not_found("logo", logo.id));
        }
        self.db
            .put_cf(&cf, key, Self::serialize(logo)?)
            .map_err(db_err)
    }

    fn get_logo_sync(&self, id: &LogoId, owner: &UserId) -> Result<Option<LogoHistory>> {
        Ok(self
            .get_doc::<LogoHistory>(cf::LOGOS, &keys::logo_key(id))?
            .filter(|l| l.user_id == *owner))
    }

    fn list_logos_sync(
        &self,
        owner: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LogoHistory>> {
        let mut logos = Vec::new();
        // Index keys are in ULID (creation) order; walk them backwards.
        for id in self
            .owned_logo_ids(owner)?
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
        {
            if let Some(logo) = self.get_doc(cf::LOGOS, &keys::logo_key(id))? {
                logos.push(logo);
            }
        }
        Ok(logos)
    }

    fn logo_stats_sync(&self, owner: &UserId) -> Result<LogoStats> {
        let logos = self.list_logos_sync(owner, usize::MAX, 0)?;
        Ok(LogoStats::from_records(&logos))
    }
}

#[async_trait]
impl Store for RocksStore {
    async fn create_user(&self, user: &User) -> Result<()> {
        self.create_user_sync(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        self.get_user_sync(id)
    }

    async fn get_user_by_uid(&self, uid: &str) -> Result<Option<User>> {
        self.get_user_by_uid_sync(uid)
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        self.update_user_sync(user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<()> {
        self.delete_user_sync(id)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.list_users_sync()
    }

    async fn create_brand(&self, brand: &Brand) -> Result<()> {
        self.create_brand_sync(brand)
    }

    async fn get_brand(&self, id: &BrandId, owner: &UserId) -> Result<Option<Brand>> {
        self.get_brand_sync(id, owner)
    }

    async fn list_brands(
        &self,
        owner: &UserId,
        status: Option<BrandStatus>,
    ) -> Result<Vec<Brand>> {
        let mut brands: Vec<_> = self
            .owned_brands(owner)?
            .into_iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .collect();
        brands.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(brands)
    }

    async fn update_brand(&self, brand: &Brand) -> Result<()> {
        self.update_brand_sync(brand)
    }

    async fn delete_brand(&self, id: &BrandId, owner: &UserId) -> Result<()> {
        self.delete_brand_sync(id, owner)
    }

    async fn get_public_brand(&self, share_link: &str) -> Result<Option<Brand>> {
        self.get_public_brand_sync(share_link)
    }

    async fn create_logo(&self, logo: &LogoHistory) -> Result<()> {
        self.create_logo_sync(logo)
    }

    async fn update_logo(&self, logo: &LogoHistory) -> Result<()> {
        self.update_logo_sync(logo)
    }

    async fn get_logo(&self, id: &LogoId, owner: &UserId) -> Result<Option<LogoHistory>> {
        self.get_logo_sync(id, owner)
    }

    async fn list_logos(
        &self,
        owner: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<LogoHistory>> {
        self.list_logos_sync(owner, limit, offset)
    }

    async fn count_logos(&self, owner: &UserId) -> Result<u64> {
        Ok(self.owned_logo_ids(owner)?.len() as u64)
    }

    async fn logo_stats(&self, owner: &UserId) -> Result<LogoStats> {
        self.logo_stats_sync(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandybot_core::{AuthProvider, LogoRequest, NewBrand, NewUser};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = RocksStore::open(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    fn user(uid: &str, email: &str) -> User {
        User::new(NewUser {
            uid: uid.into(),
            email: email.into(),
            display_name: "Owner".into(),
            photo_url: String::new(),
            provider: AuthProvider::Password,
        })
        .unwrap()
    }

    fn brand(owner: UserId) -> Brand {
        Brand::new(
            owner,
            NewBrand {
                brand_name: "Acme".into(),
                ..NewBrand::default()
            },
        )
        .unwrap()
    }

    fn logo(owner: UserId) -> LogoHistory {
        let request = LogoRequest::new("Acme", "A fox", None, None, vec![]).unwrap();
        LogoHistory::processing(owner, &request)
    }

    #[tokio::test]
    async fn user_roundtrip_and_uid_lookup() {
        let (store, _dir) = create_test_store();
        let owner = user("uid-1", "one@example.com");
        store.create_user(&owner).await.unwrap();

        assert_eq!(store.get_user(&owner.id).await.unwrap(), Some(owner.clone()));
        let by_uid = store.get_user_by_uid("uid-1").await.unwrap().unwrap();
        assert_eq!(by_uid.id, owner.id);

        let dup = user("uid-2", "one@example.com");
        assert!(matches!(
            store.create_user(&dup).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn email_change_releases_old_address() {
        let (store, _dir) = create_test_store();
        let mut owner = user("uid-1", "old@example.com");
        store.create_user(&owner).await.unwrap();
        owner.email = "new@example.com".into();
        store.update_user(&owner).await.unwrap();

        let reuse = user("uid-2", "old@example.com");
        store.create_user(&reuse).await.unwrap();
    }

    #[tokio::test]
    async fn delete_user_cascades_documents() {
        let (store, _dir) = create_test_store();
        let owner = user("uid-1", "one@example.com");
        store.create_user(&owner).await.unwrap();
        let mut b = brand(owner.id);
        let link = b.publish().to_string();
        store.create_brand(&b).await.unwrap();
        store.create_logo(&logo(owner.id)).await.unwrap();

        store.delete_user(&owner.id).await.unwrap();

        assert!(store.get_user_by_uid("uid-1").await.unwrap().is_none());
        assert!(store.get_public_brand(&link).await.unwrap().is_none());
        assert_eq!(store.count_logos(&owner.id).await.unwrap(), 0);
        assert!(store.list_brands(&owner.id, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn logos_list_newest_first() {
        let (store, _dir) = create_test_store();
        let owner = user("uid-1", "one@example.com");
        store.create_user(&owner).await.unwrap();

        let first = logo(owner.id);
        store.create_logo(&first).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = logo(owner.id);
        store.create_logo(&second).await.unwrap();

        let listed = store.list_logos(&owner.id, 10, 0).await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn orphan_logo_is_rejected() {
        let (store, _dir) = create_test_store();
        assert!(matches!(
            store.create_logo(&logo(UserId::generate())).await,
            Err(StoreError::InvalidReference(_))
        ));
    }
}
