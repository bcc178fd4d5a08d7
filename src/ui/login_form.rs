use crate::application_port::*;
use crate::logger::*;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ErrorDialog {
    Hidden,
    /// Visible until the user dismisses it.
    Shown {
        title: &'static str,
        description: &'static str,
    },
    /// Closed by the user; only a new submit can bring it back.
    Dismissed,
}

pub struct LoginForm {
    username: String,
    password: String,
    dialog: ErrorDialog,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            dialog: ErrorDialog::Hidden,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn dialog(&self) -> &ErrorDialog {
        &self.dialog
    }

    pub fn dialog_visible(&self) -> bool {
        matches!(self.dialog, ErrorDialog::Shown { .. })
    }

    pub fn set_username(&mut self, value: impl Into<String>) {
        self.username = value.into();
        self.dialog = ErrorDialog::Hidden;
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
        self.dialog = ErrorDialog::Hidden;
    }

    /// Appends typed characters to the username, as a keyboard would.
    pub fn type_username(&mut self, text: &str) {
        let value = format!("{}{}", self.username, text);
        self.set_username(value);
    }

    pub fn type_password(&mut self, text: &str) {
        let value = format!("{}{}", self.password, text);
        self.set_password(value);
    }

    pub fn dismiss(&mut self) {
        if self.dialog_visible() {
            self.dialog = ErrorDialog::Dismissed;
        }
    }

    /// Record the outcome of a submit. Returns the issued session on success.
    pub fn apply(&mut self, outcome: Result<AuthResult, AuthError>) -> Option<IssuedSession> {
        match outcome {
            Ok(AuthResult::Authenticated(issued)) => {
                self.dialog = ErrorDialog::Hidden;
                Some(issued)
            }
            Ok(AuthResult::Rejected { reason }) => {
                self.dialog = ErrorDialog::Shown {
                    title: reason.title(),
                    description: reason.message(),
                };
                None
            }
            Err(e) => {
                warn!("login submit failed: {}", e);
                self.dialog = ErrorDialog::Shown {
                    title: LOGIN_ERROR_TITLE,
                    description: SERVER_ERROR_MESSAGE,
                };
                None
            }
        }
    }

    pub async fn submit(&mut self, auth_service: &dyn AuthService) -> Option<IssuedSession> {
        let credentials = Credentials::new(self.username.clone(), self.password.clone());
        let outcome = auth_service.validate(credentials).await;
        self.apply(outcome)
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{Argon2PasswordHasher, HmacCsrfBinder, RealAuthService};
    use crate::infra_memory::{MemoryAuthRepo, MemoryAuthSessionStore};
    use crate::settings::SeedUser;
    use std::sync::Arc;
    use std::time::Duration;

    async fn service() -> RealAuthService {
        let hasher = Arc::new(Argon2PasswordHasher::with_cost(1024, 1).unwrap());
        let repo = Arc::new(MemoryAuthRepo::new());
        repo.seed(
            hasher.as_ref(),
            &[SeedUser {
                username: "TEST_USER".to_string(),
                password: Some("DUMMY_PASSWORD".to_string()),
                password_hash: None,
                is_active: true,
            }],
        )
        .await
        .unwrap();
        RealAuthService::new(
            repo,
            hasher,
            Arc::new(MemoryAuthSessionStore::new()),
            HmacCsrfBinder::new("test-key"),
            Duration::from_secs(60),
        )
    }

    fn incorrect() -> ErrorDialog {
        ErrorDialog::Shown {
            title: "Error",
            description: "Incorrect username or password.",
        }
    }

    #[tokio::test]
    async fn successful_submit_returns_session() {
        let auth = service().await;
        let mut form = LoginForm::new();
        form.type_username("TEST_USER");
        form.type_password("DUMMY_PASSWORD");

        let issued = form.submit(&auth).await.unwrap();
        assert_eq!(issued.username, "TEST_USER");
        assert_eq!(form.dialog(), &ErrorDialog::Hidden);
    }

    #[tokio::test]
    async fn wrong_username_and_wrong_password_show_same_dialog() {
        let auth = service().await;

        let mut form = LoginForm::new();
        form.type_username("WRONG_USER");
        form.type_password("DUMMY_PASSWORD");
        assert!(form.submit(&auth).await.is_none());
        assert_eq!(form.dialog(), &incorrect());

        let mut form = LoginForm::new();
        form.type_username("TEST_USER");
        form.type_password("WRONG_PASSWORD");
        assert!(form.submit(&auth).await.is_none());
        assert_eq!(form.dialog(), &incorrect());
    }

    #[tokio::test]
    async fn dialog_reappears_on_resubmit_after_dismissal() {
        let auth = service().await;
        let mut form = LoginForm::new();
        form.type_username("WRONG_USER");
        form.type_password("DUMMY_PASSWORD");
        form.submit(&auth).await;

        form.dismiss();
        assert_eq!(form.dialog(), &ErrorDialog::Dismissed);
        assert!(!form.dialog_visible());

        form.submit(&auth).await;
        assert!(form.dialog_visible());
    }

    #[tokio::test]
    async fn typing_after_dismissal_does_not_reopen_dialog() {
        let auth = service().await;
        let mut form = LoginForm::new();
        form.type_username("WRONG_USER");
        form.type_password("DUMMY_PASSWORD");
        form.submit(&auth).await;
        form.dismiss();

        form.type_username("_CHANGED");
        assert_eq!(form.username(), "WRONG_USER_CHANGED");
        assert!(!form.dialog_visible());
    }

    #[test]
    fn internal_fault_shows_server_error() {
        let mut form = LoginForm::new();
        form.apply(Err(AuthError::Store("down".to_string())));
        assert_eq!(
            form.dialog(),
            &ErrorDialog::Shown {
                title: "Error",
                description: "Server error",
            }
        );
    }

    #[test]
    fn dismiss_without_dialog_is_noop() {
        let mut form = LoginForm::new();
        form.dismiss();
        assert_eq!(form.dialog(), &ErrorDialog::Hidden);
    }
}
