//! Route constraints: guards that run after authentication and before the
//! handler, keyed on the exact request method and path.

pub mod user;

use std::sync::Arc;

use axum::http::Method;

use crate::auth::Session;

/// What a guard gets to see about the request.
#[derive(Debug, Clone)]
pub struct GuardContext {
    pub method: Method,
    pub path: String,
    pub session: Session,
}

/// Allow/deny decision for a single request.
pub trait Guard: Send + Sync {
    fn evaluate(&self, ctx: &GuardContext) -> bool;
}

impl<F> Guard for F
where
    F: Fn(&GuardContext) -> bool + Send + Sync,
{
    fn evaluate(&self, ctx: &GuardContext) -> bool {
        self(ctx)
    }
}

#[derive(Clone)]
pub struct Constraint {
    pub method: Method,
    pub path: String,
    pub guard: Arc<dyn Guard>,
}

impl Constraint {
    fn applies_to(&self, ctx: &GuardContext) -> bool {
        self.method == ctx.method && self.path == ctx.path
    }
}

/// Ordered list of constraints, filled once at startup.
#[derive(Clone, Default)]
pub struct ConstraintRegistry {
    constraints: Vec<Constraint>,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in constraint.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        user::register(&mut registry);
        registry
    }

    pub fn add(&mut self, method: Method, path: impl Into<String>, guard: impl Guard + 'static) -> &mut Self {
        self.constraints.push(Constraint { method, path: path.into(), guard: Arc::new(guard) });
        self
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// False as soon as one matching guard denies; later guards are not evaluated.
    pub fn permits(&self, ctx: &GuardContext) -> bool {
        self.constraints
            .iter()
            .filter(|c| c.applies_to(ctx))
            .all(|c| c.guard.evaluate(ctx))
    }
}
