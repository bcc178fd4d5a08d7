use crate::application_port::IssuedSession;
use std::time::Duration;
use warp::http::HeaderValue;
use warp::http::header::InvalidHeaderValue;

pub const SESSION_COOKIE: &str = "session";
pub const CSRF_COOKIE: &str = "X-CSRF";
/// Request header a page echoes the CSRF cookie into for state-changing calls.
pub const CSRF_HEADER: &str = "x-csrf";

#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub secure: bool,
    pub max_age: Duration,
}

impl CookiePolicy {
    fn attributes(&self, max_age_secs: u64, http_only: bool) -> String {
        let mut attrs = format!("Path=/; Max-Age={}; SameSite=Lax", max_age_secs);
        if http_only {
            attrs.push_str("; HttpOnly");
        }
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }

    /// `Set-Cookie` values for a freshly issued session. The CSRF cookie stays
    /// readable by the page so it can be echoed back in the `X-CSRF` header.
    pub fn issue(&self, issued: &IssuedSession) -> Result<[HeaderValue; 2], InvalidHeaderValue> {
        let max_age = self.max_age.as_secs();
        Ok([
            HeaderValue::from_str(&format!(
                "{}={}; {}",
                SESSION_COOKIE,
                issued.session_token.as_str(),
                self.attributes(max_age, true)
            ))?,
            HeaderValue::from_str(&format!(
                "{}={}; {}",
                CSRF_COOKIE,
                issued.csrf_token.as_str(),
                self.attributes(max_age, false)
            ))?,
        ])
    }

    pub fn clear(&self) -> [HeaderValue; 2] {
        [
            HeaderValue::from_str(&format!("{}=; {}", SESSION_COOKIE, self.attributes(0, true)))
                .unwrap_or_else(|_| HeaderValue::from_static("session=; Max-Age=0")),
            HeaderValue::from_str(&format!("{}=; {}", CSRF_COOKIE, self.attributes(0, false)))
                .unwrap_or_else(|_| HeaderValue::from_static("X-CSRF=; Max-Age=0")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::*;
    use chrono::Utc;

    fn issued() -> IssuedSession {
        IssuedSession {
            session_token: SessionToken::from("s3ss".to_string()),
            csrf_token: CsrfToken::from("c5rf".to_string()),
            user_id: UserId::new_random(),
            username: "TEST_USER".to_string(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn issue_sets_both_cookies() {
        let policy = CookiePolicy {
            secure: false,
            max_age: Duration::from_secs(60),
        };
        let [session, csrf] = policy.issue(&issued()).unwrap();
        assert_eq!(
            session.to_str().unwrap(),
            "session=s3ss; Path=/; Max-Age=60; SameSite=Lax; HttpOnly"
        );
        assert_eq!(
            csrf.to_str().unwrap(),
            "X-CSRF=c5rf; Path=/; Max-Age=60; SameSite=Lax"
        );
    }

    #[test]
    fn secure_flag_follows_tls() {
        let policy = CookiePolicy {
            secure: true,
            max_age: Duration::from_secs(60),
        };
        let [session, csrf] = policy.issue(&issued()).unwrap();
        assert!(session.to_str().unwrap().ends_with("; Secure"));
        assert!(csrf.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn clear_expires_immediately() {
        let policy = CookiePolicy {
            secure: false,
            max_age: Duration::from_secs(60),
        };
        for value in policy.clear() {
            assert!(value.to_str().unwrap().contains("Max-Age=0"));
        }
    }
}
