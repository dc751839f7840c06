use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use validator::Validate;

use crate::auth::{random_string, AUTH_KEY_LENGTH, UUID_LENGTH};
use crate::database::resource::{Resource, Timestamps};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[repr(i32)]
pub enum Role {
    #[default]
    Guest = 1,
    Mod = 2,
    Admin = 3,
}

#[derive(Debug, Clone, Serialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip)]
    pub id: i64,
    #[validate(length(equal = 8))]
    pub uuid: String,
    #[validate(length(min = 1, code = "required"))]
    pub first_name: String,
    #[validate(length(min = 1, code = "required"))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[serde(skip)]
    pub password: String,
    #[serde(skip)]
    #[validate(length(equal = 16))]
    pub auth_key: String,
    #[serde(skip)]
    pub role: Role,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Body of `POST /v1/users`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UserDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[validate(length(min = 6))]
    pub password: Option<String>,
}

/// Body of `PATCH /v1/users/:uuid`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPayload {
    #[validate(length(min = 3))]
    pub first_name: Option<String>,
    #[validate(length(min = 3))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6))]
    pub password: Option<String>,
    #[validate(length(min = 6))]
    pub password_confirm: Option<String>,
}

impl User {
    /// New guest user with a fresh public id and auth key. The draft's
    /// password is ignored here; callers store it only once hashed.
    pub fn from_draft(draft: UserDraft) -> Self {
        Self {
            id: 0,
            uuid: random_string(UUID_LENGTH),
            first_name: draft.first_name.unwrap_or_default(),
            last_name: draft.last_name.unwrap_or_default(),
            email: draft.email.unwrap_or_default(),
            password: String::new(),
            auth_key: random_string(AUTH_KEY_LENGTH),
            role: Role::default(),
            timestamps: Timestamps::default(),
        }
    }

    /// Apply the profile fields of `payload`. The password is handled by the
    /// caller since it has to be hashed first.
    pub fn apply(&mut self, payload: UserPayload) {
        if let Some(first_name) = payload.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = payload.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = payload.email {
            self.email = email;
        }
    }

    /// Authorization needs a user that still holds an auth key.
    pub fn is_authorized(&self) -> bool {
        !self.auth_key.is_empty()
    }

    #[cfg(test)]
    pub fn fixture(uuid: &str, email: &str, role: Role) -> Self {
        Self {
            id: 0,
            uuid: uuid.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: String::new(),
            auth_key: random_string(AUTH_KEY_LENGTH),
            role,
            timestamps: Timestamps { created_at: chrono::Utc::now(), ..Default::default() },
        }
    }
}

impl UserPayload {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.password_confirm.is_none()
    }

    /// When both are given they must be identical.
    pub fn passwords_match(&self) -> bool {
        match (&self.password, &self.password_confirm) {
            (Some(password), Some(confirm)) => password == confirm,
            _ => true,
        }
    }
}

impl Resource for User {
    const NAME: &'static str = "User";
    const TABLE: &'static str = "users";
    const NATURAL_KEY: &'static str = "email";
    const SORTABLE: &'static [&'static str] =
        &["uuid", "firstName", "lastName", "email", "createdAt", "updatedAt"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn natural_key(&self) -> &str {
        &self.email
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.timestamps
    }

    fn write_columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("uuid", json!(self.uuid)),
            ("first_name", json!(self.first_name)),
            ("last_name", json!(self.last_name)),
            ("email", json!(self.email)),
            ("password", json!(self.password)),
            ("auth_key", json!(self.auth_key)),
            ("role", json!(self.role as i32)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_ordered_by_privilege() {
        assert!(Role::Guest < Role::Mod);
        assert!(Role::Mod < Role::Admin);
        assert_eq!(Role::default(), Role::Guest);
        assert_eq!(Role::Admin as i32, 3);
    }

    #[test]
    fn new_users_get_generated_identity() {
        let user = User::from_draft(
            UserDraft {
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                email: Some("ada@example.com".into()),
                password: None,
            },
        );
        assert_eq!(user.uuid.len(), UUID_LENGTH);
        assert_eq!(user.auth_key.len(), AUTH_KEY_LENGTH);
        assert_eq!(user.role, Role::Guest);
        assert!(user.is_authorized());
        assert!(user.validate().is_ok());
    }

    #[test]
    fn missing_names_are_reported_as_required() {
        let user = User::from_draft(UserDraft { email: Some("nope".into()), ..Default::default() });
        let errors = user.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["first_name"][0].code, "required");
        assert_eq!(fields["last_name"][0].code, "required");
        assert_eq!(fields["email"][0].code, "email");
    }

    #[test]
    fn password_confirmation_must_match_when_both_present() {
        let mut payload = UserPayload { password: Some("secret1".into()), ..Default::default() };
        assert!(payload.passwords_match());
        payload.password_confirm = Some("secret2".into());
        assert!(!payload.passwords_match());
        payload.password_confirm = Some("secret1".into());
        assert!(payload.passwords_match());
    }

    #[test]
    fn secrets_are_never_serialized() {
        let value = serde_json::to_value(User::fixture("abcdefgh", "ada@example.com", Role::Admin)).unwrap();
        assert_eq!(value["email"], "ada@example.com");
        assert_eq!(value["firstName"], "Ada");
        for hidden in ["id", "password", "authKey", "role", "deletedAt"] {
            assert!(value.get(hidden).is_none(), "{hidden} leaked");
        }
    }
}
