//! One-shot copy from the legacy document store into the relational store.
//!
//! Records whose id already exists in the target are skipped, so the copy can
//! be re-run after a partial failure. A user whose UID or email is already
//! claimed by a different row in the target is skipped along with their
//! documents.

use serde::Serialize;

use brandybot_core::User;

use crate::error::{Result, StoreError};
use crate::Store;

/// Counts produced by [`migrate_legacy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Users copied.
    pub users: usize,
    /// Brands copied.
    pub brands: usize,
    /// Logo history records copied.
    pub logos: usize,
    /// Records already present in the target.
    pub skipped: usize,
    /// Users left behind because of a uniqueness clash.
    pub conflicts: usize,
}

/// Copy every user, brand and logo document from `source` into `target`.
///
/// # Errors
///
/// Returns the first storage error other than a uniqueness clash.
pub async fn migrate_legacy(source: &dyn Store, target: &dyn Store) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    for user in source.list_users().await? {
        if !copy_user(target, &user, &mut report).await? {
            continue;
        }

        for brand in source.list_brands(&user.id, None).await? {
            if target.get_brand(&brand.id, &user.id).await?.is_some() {
                report.skipped += 1;
                continue;
            }
            match target.create_brand(&brand).await {
                Ok(()) => report.brands += 1,
                Err(StoreError::Conflict(reason)) => {
                    tracing::warn!(brand_id = %brand.id, %reason, "Share link clash, copying brand as private");
                    let mut private = brand.clone();
                    private.share_link = None;
                    private.is_public = false;
                    target.create_brand(&private).await?;
                    report.brands += 1;
                }
                Err(e) => return Err(e),
            }
        }

        for logo in source.list_logos(&user.id, usize::MAX, 0).await? {
            if target.get_logo(&logo.id, &user.id).await?.is_some() {
                report.skipped += 1;
                continue;
            }
            target.create_logo(&logo).await?;
            report.logos += 1;
        }
    }

    tracing::info!(
        users = report.users,
        brands = report.brands,
        logos = report.logos,
        skipped = report.skipped,
        conflicts = report.conflicts,
        "Legacy migration finished"
    );
    Ok(report)
}

/// Returns whether the user's documents should be copied.
async fn copy_user(target: &dyn Store, user: &User, report: &mut MigrationReport) -> Result<bool> {
    if target.get_user(&user.id).await?.is_some() {
        report.skipped += 1;
        return Ok(true);
    }
    match target.create_user(user).await {
        Ok(()) => {
            report.users += 1;
            Ok(true)
        }
        Err(StoreError::Conflict(reason)) => {
            tracing::warn!(user_id = %user.id, uid = %user.uid, %reason, "User already exists under another id, skipping");
            report.conflicts += 1;
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
