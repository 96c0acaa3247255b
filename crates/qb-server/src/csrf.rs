//! Single-use CSRF tokens for the submission form.
//!
//! A token is issued with every rendering of the form and consumed by the
//! next submission that presents it, whether or not that submission is valid.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::error::ServerError;

const TOKEN_BYTES: usize = 16;

#[derive(Debug)]
pub struct CsrfTokens {
    ttl: Duration,
    issued: Mutex<HashMap<String, Instant>>,
}

impl CsrfTokens {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            issued: Mutex::new(HashMap::new()),
        }
    }

    /// Generate a fresh random token and remember when it was issued.
    pub fn issue(&self) -> Result<String, ServerError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        getrandom::fill(&mut bytes).map_err(|e| ServerError::Random(e.to_string()))?;
        let token: String = bytes.iter().map(|b| format!("{b:02x}")).collect();

        let now = Instant::now();
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        issued.retain(|_, at| now.duration_since(*at) < self.ttl);
        issued.insert(token.clone(), now);
        tracing::debug!(outstanding = issued.len(), "issued CSRF token");
        Ok(token)
    }

    /// Consume `token`. `true` only if it was issued here and has not expired.
    pub fn verify(&self, token: &str) -> bool {
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        issued
            .remove(token)
            .is_some_and(|at| at.elapsed() < self.ttl)
    }

    #[cfg(test)]
    fn outstanding(&self) -> usize {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
