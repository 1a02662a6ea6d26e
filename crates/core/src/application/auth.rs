// Auth Service - registration and login against the stored accounts

use crate::application::records::Records;
use crate::domain::validate::is_valid_email;
use crate::domain::{DomainError, FieldError, Principal, Role, UserAccount};
use crate::error::Result;
use crate::port::TimeProvider;
use std::sync::Arc;
use tracing::info;

/// Name a login falls back to when no registered account matches the email.
const DEMO_USER_NAME: &str = "Demo User";

const MIN_PASSWORD_LEN: usize = 8;
const MIN_NAME_LEN: usize = 2;
const MAX_NAME_LEN: usize = 100;

/// Registration form input
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

/// Checks credentials against the stored accounts and owns the session
/// hand-off. Passwords are compared in plaintext against the stored record;
/// see [`UserAccount`] for why that stands.
pub struct AuthService {
    records: Records,
    time_provider: Arc<dyn TimeProvider>,
}

impl AuthService {
    pub fn new(records: Records, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            records,
            time_provider,
        }
    }

    /// Create a new account.
    ///
    /// Field violations are collected and reported all at once; a duplicate
    /// email is only reported once the fields themselves pass, mirroring
    /// the registration form's behavior.
    pub fn register(&self, req: RegisterRequest) -> Result<UserAccount> {
        let name = req.name.trim();
        let email = req.email.trim();

        let mut errors = Vec::new();

        if name.is_empty() {
            errors.push(FieldError::new("name", "Full name is required."));
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.push(FieldError::new(
                "name",
                "Name must be 100 characters or fewer.",
            ));
        } else if name.chars().count() < MIN_NAME_LEN {
            errors.push(FieldError::new("name", "Name must be at least 2 characters."));
        }

        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required."));
        } else if !is_valid_email(email) {
            errors.push(FieldError::new(
                "email",
                "Please enter a valid email address.",
            ));
        }

        if req.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required."));
        } else if req.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters.",
            ));
        } else if !req.password.chars().any(|c| c.is_ascii_uppercase()) {
            errors.push(FieldError::new(
                "password",
                "Password must contain at least one uppercase letter.",
            ));
        } else if !req.password.chars().any(|c| c.is_ascii_digit()) {
            errors.push(FieldError::new(
                "password",
                "Password must contain at least one number.",
            ));
        }

        if req.confirm_password.is_empty() {
            errors.push(FieldError::new(
                "confirmPassword",
                "Please confirm your password.",
            ));
        } else if req.confirm_password != req.password {
            errors.push(FieldError::new(
                "confirmPassword",
                "Passwords do not match.",
            ));
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors).into());
        }

        let mut users = self.records.users();
        if users.iter().any(|u| u.email == email) {
            return Err(DomainError::Validation(vec![FieldError::new(
                "email",
                "An account with this email already exists.",
            )])
            .into());
        }

        let account = UserAccount {
            name: name.to_string(),
            email: email.to_string(),
            password: req.password,
            role: req.role,
            created_at: self.time_provider.now_millis(),
        };
        users.push(account.clone());
        self.records.save_users(&users)?;

        info!(email = %account.email, role = %account.role, "account registered");
        Ok(account)
    }

    /// Check credentials and persist the session.
    ///
    /// When no registered account matches the email, the demo fallback
    /// applies: the login succeeds as "Demo User" with the `user` role.
    /// When an account matches, its password must match too.
    pub fn login(&self, email: &str, password: &str) -> Result<Principal> {
        let email = email.trim();

        let mut errors = Vec::new();
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required."));
        } else if !is_valid_email(email) {
            errors.push(FieldError::new(
                "email",
                "Please enter a valid email address.",
            ));
        }
        if password.is_empty() {
            errors.push(FieldError::new("password", "Password is required."));
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters.",
            ));
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors).into());
        }

        let mut principal = Principal {
            name: DEMO_USER_NAME.to_string(),
            email: email.to_string(),
            role: Role::User,
            logged_in: true,
        };

        if let Some(account) = self.records.users().into_iter().find(|u| u.email == email) {
            if account.password != password {
                return Err(DomainError::Validation(vec![FieldError::new(
                    "password",
                    "Incorrect password. Please try again.",
                )])
                .into());
            }
            principal.name = account.name;
            principal.role = account.role;
        }

        self.records.save_session(&principal)?;
        info!(email = %principal.email, role = %principal.role, "logged in");
        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::StateStore;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MemStore {
        cells: Mutex<HashMap<String, String>>,
    }

    impl StateStore for MemStore {
        fn load_raw(&self, key: &str) -> Result<Option<String>> {
            Ok(self.cells.lock().expect("lock").get(key).cloned())
        }

        fn save_raw(&self, key: &str, value: &str) -> Result<()> {
            self.cells
                .lock()
                .expect("lock")
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.cells.lock().expect("lock").remove(key);
            Ok(())
        }
    }

    struct FixedTimeProvider;

    impl TimeProvider for FixedTimeProvider {
        fn now_millis(&self) -> i64 {
            1_000_000
        }
    }

    fn auth() -> (AuthService, Records) {
        let records = Records::new(Arc::new(MemStore {
            cells: Mutex::new(HashMap::new()),
        }));
        (
            AuthService::new(records.clone(), Arc::new(FixedTimeProvider)),
            records,
        )
    }

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Grace Lee".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: password.to_string(),
            role: Role::Admin,
        }
    }

    fn validation_fields(err: crate::error::AppError) -> Vec<String> {
        match err {
            crate::error::AppError::Domain(DomainError::Validation(errors)) => {
                errors.into_iter().map(|e| e.field).collect()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_register_then_login_with_role() {
        let (auth, records) = auth();
        auth.register(request("grace@example.com", "Sup3rSecret"))
            .expect("register");

        let principal = auth.login("grace@example.com", "Sup3rSecret").expect("login");
        assert_eq!(principal.name, "Grace Lee");
        assert_eq!(principal.role, Role::Admin);
        assert!(principal.logged_in);
        assert_eq!(records.session(), Some(principal));
    }

    #[test]
    fn test_register_rejects_weak_passwords() {
        let (auth, _) = auth();
        // no uppercase
        let err = auth.register(request("a@b.com", "secret123")).unwrap_err();
        assert_eq!(validation_fields(err), vec!["password"]);
        // no digit
        let err = auth.register(request("a@b.com", "SecretWord")).unwrap_err();
        assert_eq!(validation_fields(err), vec!["password"]);
        // too short
        let err = auth.register(request("a@b.com", "S3cret")).unwrap_err();
        assert_eq!(validation_fields(err), vec!["password"]);
    }

    #[test]
    fn test_register_duplicate_email() {
        let (auth, _) = auth();
        auth.register(request("grace@example.com", "Sup3rSecret"))
            .expect("register");
        let err = auth
            .register(request("grace@example.com", "0therSecret"))
            .unwrap_err();
        assert_eq!(validation_fields(err), vec!["email"]);
    }

    #[test]
    fn test_register_mismatched_confirmation() {
        let (auth, _) = auth();
        let mut req = request("a@b.com", "Sup3rSecret");
        req.confirm_password = "Different1".to_string();
        let err = auth.register(req).unwrap_err();
        assert_eq!(validation_fields(err), vec!["confirmPassword"]);
    }

    #[test]
    fn test_login_wrong_password() {
        let (auth, records) = auth();
        auth.register(request("grace@example.com", "Sup3rSecret"))
            .expect("register");
        let err = auth.login("grace@example.com", "WrongPass1").unwrap_err();
        assert_eq!(validation_fields(err), vec!["password"]);
        assert!(records.session().is_none());
    }

    #[test]
    fn test_login_unregistered_email_falls_back_to_demo_user() {
        let (auth, _) = auth();
        let principal = auth
            .login("stranger@example.com", "Whatever1")
            .expect("login");
        assert_eq!(principal.name, "Demo User");
        assert_eq!(principal.role, Role::User);
    }
}
