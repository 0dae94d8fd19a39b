//! Key encoding utilities for `RocksDB`.
//!
//! Primary keys are the raw 16 bytes of the identifier. Owner index keys are
//! `user_id (16 bytes) || child_id (16 bytes)`, so a prefix scan over the
//! owner's id lists the owner's records; logo ids are ULIDs and therefore
//! scan in creation order.

use brandybot_core::{BrandId, LogoId, UserId};

/// Length of an owner index key.
const INDEX_KEY_LEN: usize = 32;

/// Create a user key from a user ID.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a brand key from a brand ID.
#[must_use]
pub fn brand_key(brand_id: &BrandId) -> Vec<u8> {
    brand_id.as_bytes().to_vec()
}

/// Create a logo key from a logo ID.
#[must_use]
pub fn logo_key(logo_id: &LogoId) -> Vec<u8> {
    logo_id.to_bytes().to_vec()
}

/// Create a lookup key for a unique string value (UID, email, share link).
#[must_use]
pub fn lookup_key(value: &str) -> Vec<u8> {
    value.as_bytes().to_vec()
}

/// Create an owner-brand index key.
#[must_use]
pub fn user_brand_key(user_id: &UserId, brand_id: &BrandId) -> Vec<u8> {
    let mut key = Vec::with_capacity(INDEX_KEY_LEN);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(brand_id.as_bytes());
    key
}

/// Create an owner-logo index key.
#[must_use]
pub fn user_logo_key(user_id: &UserId, logo_id: &LogoId) -> Vec<u8> {
    let mut key = Vec::with_capacity(INDEX_KEY_LEN);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&logo_id.to_bytes());
    key
}

/// Create a prefix for iterating all index entries of an owner.
#[must_use]
pub fn owner_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

fn child_bytes(key: &[u8]) -> Option<[u8; 16]> {
    if key.len() != INDEX_KEY_LEN {
        return None;
    }
    key[16..].try_into().ok()
}

/// Extract the brand ID from an owner-brand index key.
#[must_use]
pub fn brand_id_from_index(key: &[u8]) -> Option<BrandId> {
    child_bytes(key).map(|bytes| BrandId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Extract the logo ID from an owner-logo index key.
#[must_use]
pub fn logo_id_from_index(key: &[u8]) -> Option<LogoId> {
    child_bytes(key).and_then(|bytes| LogoId::from_bytes(bytes).ok())
}

/// Decode a user ID stored as a lookup value.
#[must_use]
pub fn user_id_from_value(value: &[u8]) -> Option<UserId> {
    uuid::Uuid::from_slice(value).ok().map(UserId::from_uuid)
}

/// Decode a brand ID stored as a lookup value.
#[must_use]
pub fn brand_id_from_value(value: &[u8]) -> Option<BrandId> {
    uuid::Uuid::from_slice(value).ok().map(BrandId::from_uuid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_lengths() {
        assert_eq!(user_key(&UserId::generate()).len(), 16);
        assert_eq!(brand_key(&BrandId::generate()).len(), 16);
        assert_eq!(logo_key(&LogoId::generate()).len(), 16);
    }

    #[test]
    fn index_keys_start_with_owner() {
        let user_id = UserId::generate();
        let brand_id = BrandId::generate();
        let key = user_brand_key(&user_id, &brand_id);

        assert_eq!(key.len(), INDEX_KEY_LEN);
        assert!(key.starts_with(&owner_prefix(&user_id)));
        assert_eq!(brand_id_from_index(&key), Some(brand_id));
    }

    #[test]
    fn logo_index_roundtrip() {
        let user_id = UserId::generate();
        let logo_id = LogoId::generate();
        let key = user_logo_key(&user_id, &logo_id);
        assert_eq!(logo_id_from_index(&key), Some(logo_id));
    }

    #[test]
    fn short_keys_are_rejected() {
        assert_eq!(brand_id_from_index(&[0u8; 16]), None);
        assert_eq!(user_id_from_value(b"short"), None);
    }

    #[test]
    fn logo_index_keys_sort_by_time() {
        let user_id = UserId::generate();
        let first = LogoId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = LogoId::generate();
        assert!(user_logo_key(&user_id, &first) < user_logo_key(&user_id, &second));
    }
}
