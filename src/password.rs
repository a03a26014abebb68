//! Password validation and hashing.
//!
//! Raw passwords are checked for strength with zxcvbn before they are
//! accepted, and only bcrypt hashes are ever stored or compared.

use std::fmt::Display;

use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// The minimum zxcvbn score a password must reach to be accepted.
const MINIMUM_SCORE: Score = Score::Three;

/// A password that has passed the strength check.
///
/// This type can only be constructed through [ValidatedPassword::new], so a
/// function taking it can assume the strength policy has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Validate `raw_password` against the password strength policy.
    ///
    /// # Errors
    /// Returns an [Error::TooWeak] describing the problem if the password is
    /// too easy to guess.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let entropy = zxcvbn(raw_password, &[]);

        if entropy.score() < MINIMUM_SCORE {
            let message = entropy
                .feedback()
                .and_then(|feedback| feedback.warning())
                .map(|warning| warning.to_string())
                .unwrap_or_else(|| "try a longer password with more variety".to_owned());

            return Err(Error::TooWeak(message));
        }

        Ok(Self(raw_password.to_owned()))
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

/// A bcrypt hash of a user's password.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a validated password with bcrypt.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if the underlying library fails.
    pub fn new(password: ValidatedPassword) -> Result<Self, Error> {
        let hash = bcrypt::hash(&password.0, bcrypt::DEFAULT_COST)
            .map_err(|error| Error::HashingError(error.to_string()))?;

        Ok(Self(hash))
    }

    /// Wrap a hash string that was previously produced by [PasswordHash::new],
    /// e.g. one read back from the database.
    pub fn from_hash(hash: String) -> Self {
        Self(hash)
    }

    /// Check `raw_password` against this hash.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if the underlying library fails. This
    /// is distinct from the `Ok(false)` returned for a wrong password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        bcrypt::verify(raw_password, &self.0)
            .map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
