//! Scan secret verification.

use giftbox_common::GiftboxError;

/// Exact, case-sensitive comparison; no trimming.
pub fn verify(candidate: &str, secret: &str) -> bool {
    candidate == secret
}

/// Checks decoded scan text against the configured secret
pub struct SecretVerifier {
    secret: String,
}

impl SecretVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns `DecodeMismatch` unless `candidate` equals the secret
    pub fn check(&self, candidate: &str) -> Result<(), GiftboxError> {
        if verify(candidate, &self.secret) {
            tracing::info!("Scan code accepted");
            Ok(())
        } else {
            tracing::debug!(len = candidate.len(), "Scan code rejected");
            Err(GiftboxError::DecodeMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "I-LOVE-U_LISA-ARDELIANA";

    #[test]
    fn test_exact_match_only() {
        assert!(verify(SECRET, SECRET));
        assert!(!verify("wrong", SECRET));
        assert!(!verify("i-love-u_lisa-ardeliana", SECRET));
        assert!(!verify(" I-LOVE-U_LISA-ARDELIANA", SECRET));
        assert!(!verify("", SECRET));
        assert!(verify("", ""));
    }

    #[test]
    fn test_check_reports_mismatch() {
        let verifier = SecretVerifier::new(SECRET);
        assert!(verifier.check(SECRET).is_ok());
        assert!(matches!(
            verifier.check("wrong-code"),
            Err(GiftboxError::DecodeMismatch)
        ));
    }
}
