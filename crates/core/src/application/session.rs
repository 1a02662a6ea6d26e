// Session Guard - who is logged in, and what may they see

use crate::application::records::Records;
use crate::domain::{DomainError, Principal, Role};
use crate::error::Result;
use tracing::debug;

/// Reads and gates on the persisted session record.
///
/// Credential checking lives in [`AuthService`](crate::application::AuthService);
/// this guard only consumes its result. Redirecting on failure is the
/// caller's concern.
pub struct SessionGuard {
    records: Records,
}

impl SessionGuard {
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    /// The logged-in principal, if any.
    pub fn current_user(&self) -> Option<Principal> {
        self.records.session().filter(|p| p.logged_in)
    }

    /// Fails with `Unauthenticated` when nobody is logged in.
    pub fn require_auth(&self) -> Result<Principal> {
        self.current_user().ok_or_else(|| {
            debug!("access to protected view without a session");
            DomainError::Unauthenticated.into()
        })
    }

    /// Fails with `Forbidden` when the principal's role does not match.
    pub fn require_role(&self, role: Role) -> Result<Principal> {
        let principal = self.require_auth()?;
        if principal.role != role {
            debug!(required = %role, actual = %principal.role, "role check failed");
            return Err(DomainError::Forbidden { required: role }.into());
        }
        Ok(principal)
    }

    /// Persist `principal` as the current session.
    pub fn login(&self, principal: &Principal) -> Result<()> {
        self.records.save_session(principal)
    }

    /// Clear the session record unconditionally.
    pub fn logout(&self) -> Result<()> {
        self.records.clear_session()
    }
}
