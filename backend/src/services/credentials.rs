//! Password hashing

use std::sync::OnceLock;
#[cfg(test)]
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::error::{AppError, AppResult};

/// bcrypt work factor for stored vendor passwords
pub const PASSWORD_COST: u32 = 10;

/// Stand-in hash checked when no stored hash exists, at the stored cost
static DECOY_HASH: OnceLock<Option<String>> = OnceLock::new();

fn decoy_hash() -> Option<&'static str> {
    DECOY_HASH
        .get_or_init(|| bcrypt::hash("decoy-vendor-password", PASSWORD_COST).ok())
        .as_deref()
}

/// Compute the decoy hash ahead of the first login
pub fn prime_decoy_hash() {
    decoy_hash();
}

/// One-way password hasher
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    cost: u32,
    #[cfg(test)]
    verifications: Arc<AtomicUsize>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::with_cost(PASSWORD_COST)
    }
}

impl PasswordHasher {
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost,
            #[cfg(test)]
            verifications: Arc::default(),
        }
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash(&self, plaintext: &str) -> AppResult<String> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Check a plaintext password against a stored hash
    pub fn verify(&self, plaintext: &str, hash: &str) -> AppResult<bool> {
        #[cfg(test)]
        self.verifications.fetch_add(1, Ordering::SeqCst);

        bcrypt::verify(plaintext, hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
    }

    /// Spend the same work as `verify` when there is no account to check.
    ///
    /// The outcome is discarded.
    pub fn verify_decoy(&self, plaintext: &str) {
        if let Some(hash) = decoy_hash() {
            let _ = self.verify(plaintext, hash);
        }
    }

    #[cfg(test)]
    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}
