//! Credential store service: identity management and password hashing

use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use uuid::Uuid;

use crate::{
    config::BootstrapConfig,
    error::AppResult,
    models::identity::{Identity, Role},
    repository::Repository,
};

/// PBKDF2-HMAC-SHA256 parameters for stored credentials.
const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Derive the hex-encoded hash for a password and raw salt.
fn derive_hash(password: &str, salt: &[u8]) -> String {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut out);
    hex::encode(out)
}

/// Generate a fresh salt and the matching hash, both hex-encoded.
fn hash_password(password: &str) -> (String, String) {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    (hex::encode(salt), derive_hash(password, &salt))
}

/// Verify a candidate password against a stored hash and salt.
///
/// Always a full recomputation; a malformed or empty hash/salt yields
/// false, never an error.
pub fn verify_password(hash: &str, salt: &str, candidate: &str) -> bool {
    if hash.is_empty() || salt.is_empty() {
        return false;
    }
    let Ok(salt_bytes) = hex::decode(salt) else {
        return false;
    };
    derive_hash(candidate, &salt_bytes) == hash.to_lowercase()
}

#[derive(Clone)]
pub struct CredentialsService {
    repository: Repository,
    bootstrap: BootstrapConfig,
}

impl CredentialsService {
    pub fn new(repository: Repository, bootstrap: BootstrapConfig) -> Self {
        Self {
            repository,
            bootstrap,
        }
    }

    /// Create an identity. A non-empty password gets a fresh salt and hash;
    /// None or empty stores no credential at all (passwordless login).
    pub async fn create(
        &self,
        display_name: &str,
        group_tag: &str,
        password: Option<&str>,
        role: Role,
    ) -> AppResult<Uuid> {
        let (salt, hash) = match password {
            Some(p) if !p.is_empty() => {
                let (salt, hash) = hash_password(p);
                (Some(salt), Some(hash))
            }
            _ => (None, None),
        };

        let identity = Identity {
            id: Uuid::new_v4(),
            display_name: display_name.to_string(),
            group_tag: group_tag.to_string(),
            role,
            password_salt: salt,
            password_hash: hash,
            points: 0,
        };

        self.repository.identities.insert(&identity).await?;
        tracing::info!(id = %identity.id, role = %role, "identity created");
        Ok(identity.id)
    }

    /// Get identity by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Identity>> {
        self.repository.identities.get_by_id(id).await
    }

    /// First identity matching a display name (arbitrary order on duplicates)
    pub async fn find_by_display_name(&self, display_name: &str) -> AppResult<Option<Identity>> {
        self.repository
            .identities
            .find_by_display_name(display_name)
            .await
    }

    /// List identities, optionally filtered by group tag and/or role
    pub async fn list(
        &self,
        group_tag: Option<&str>,
        role: Option<Role>,
    ) -> AppResult<Vec<Identity>> {
        self.repository.identities.list(group_tag, role).await
    }

    /// Update name, group tag and role, leaving any credential untouched
    pub async fn update_details(
        &self,
        id: Uuid,
        display_name: &str,
        group_tag: &str,
        role: Role,
    ) -> AppResult<bool> {
        self.repository
            .identities
            .update_details(id, display_name, group_tag, role)
            .await
    }

    /// Set a new password, regenerating the salt and overwriting any prior
    /// credential state (including "no credential").
    pub async fn set_password(&self, id: Uuid, new_password: &str) -> AppResult<bool> {
        let (salt, hash) = hash_password(new_password);
        self.repository
            .identities
            .set_credential(id, Some(&salt), Some(&hash))
            .await
    }

    /// Delete an identity
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.repository.identities.delete(id).await
    }

    /// True only when the id resolves to an identity with the leader role
    pub async fn is_leader(&self, id: Uuid) -> AppResult<bool> {
        let identity = self.repository.identities.get_by_id(id).await?;
        Ok(identity.map(|i| i.role == Role::Leader).unwrap_or(false))
    }

    /// Move every identity from `old_tag` to `new_tag`.
    ///
    /// Rejected (false) when the new tag is empty or whitespace, when the
    /// tags are equal, or when no identity carries the old tag.
    pub async fn rename_group(&self, old_tag: &str, new_tag: &str) -> AppResult<bool> {
        if new_tag.trim().is_empty() || old_tag == new_tag {
            return Ok(false);
        }

        let moved = self
            .repository
            .identities
            .rename_group(old_tag, new_tag)
            .await?;
        if moved > 0 {
            tracing::info!(old_tag, new_tag, moved, "group renamed");
        }
        Ok(moved > 0)
    }

    /// Adjust the stored points balance (floored at zero). The core never
    /// calls this itself; it exists for external gamification collaborators.
    pub async fn add_points(&self, id: Uuid, delta: i64) -> AppResult<bool> {
        self.repository.identities.add_points(id, delta).await
    }

    /// Ensure the default admin identity exists. Idempotent: repeated calls
    /// never duplicate it or fail.
    pub async fn bootstrap(&self) -> AppResult<()> {
        let exists = self
            .repository
            .identities
            .admin_exists(&self.bootstrap.admin_name, &self.bootstrap.admin_group)
            .await?;

        if !exists {
            self.create(
                &self.bootstrap.admin_name,
                &self.bootstrap.admin_group,
                None,
                Role::Admin,
            )
            .await?;
            tracing::info!(name = %self.bootstrap.admin_name, "default admin created");
        }

        Ok(())
    }
}
