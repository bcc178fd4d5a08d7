use crate::application_port::AuthError;
use crate::domain_model::{CsrfToken, SessionToken};
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;

/// Derives the CSRF token of a session as hex(HMAC-SHA256(key, session token)).
/// Nothing extra is stored per session; checking recomputes the MAC.
pub struct HmacCsrfBinder {
    key: Vec<u8>,
}

impl HmacCsrfBinder {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    fn mac_for(&self, session: &SessionToken) -> Result<Hmac<Sha256>, AuthError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&self.key)
            .map_err(|e| AuthError::InternalError(format!("csrf key: {}", e)))?;
        mac.update(session.as_str().as_bytes());
        Ok(mac)
    }

    pub fn bind(&self, session: &SessionToken) -> Result<CsrfToken, AuthError> {
        let out = self.mac_for(session)?.finalize().into_bytes();
        Ok(CsrfToken::from(hex::encode(out)))
    }

    /// Constant-time check of a presented token against the session's binding.
    pub fn verify(&self, session: &SessionToken, csrf: &CsrfToken) -> Result<bool, AuthError> {
        let Ok(provided) = hex::decode(csrf.as_str()) else {
            return Ok(false);
        };
        Ok(self.mac_for(session)?.verify_slice(&provided).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_is_deterministic_per_session() {
        let binder = HmacCsrfBinder::new("k");
        let session = SessionToken::generate();
        assert_eq!(binder.bind(&session).unwrap(), binder.bind(&session).unwrap());
        assert_ne!(
            binder.bind(&session).unwrap(),
            binder.bind(&SessionToken::generate()).unwrap()
        );
    }

    #[test]
    fn verify_accepts_only_own_token() {
        let binder = HmacCsrfBinder::new("k");
        let session = SessionToken::generate();
        let other = SessionToken::generate();
        let csrf = binder.bind(&session).unwrap();

        assert!(binder.verify(&session, &csrf).unwrap());
        assert!(!binder.verify(&other, &csrf).unwrap());
        assert!(!binder.verify(&session, &CsrfToken::from("zz-not-hex".to_string())).unwrap());
        assert!(!binder.verify(&session, &CsrfToken::from(String::new())).unwrap());
    }

    #[test]
    fn different_keys_bind_differently() {
        let session = SessionToken::generate();
        let a = HmacCsrfBinder::new("key-a").bind(&session).unwrap();
        assert!(!HmacCsrfBinder::new("key-b").verify(&session, &a).unwrap());
    }
}
