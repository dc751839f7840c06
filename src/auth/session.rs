use crate::database::models::{Role, User};

/// The resolved user behind a request, as far as guards need to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
    pub uuid: String,
    pub role: Role,
}

/// Per-request session, stored in request extensions by the auth layer.
///
/// A session without a user is a guest; that only happens in development
/// mode, where an absent or unusable token does not stop the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn for_user(user: &User) -> Self {
        Self {
            user: Some(SessionUser { id: user.id, uuid: user.uuid.clone(), role: user.role }),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}
