use axum::http::Method;

use super::{ConstraintRegistry, GuardContext};
use crate::database::models::Role;

pub fn register(registry: &mut ConstraintRegistry) {
    registry.add(Method::GET, "/v1/users", list_users);
}

/// Guests may list users; a signed-in user needs the admin role.
fn list_users(ctx: &GuardContext) -> bool {
    match ctx.session.role() {
        Some(role) => role >= Role::Admin,
        None => true,
    }
}
