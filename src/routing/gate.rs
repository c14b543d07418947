use std::collections::HashSet;
use tracing::warn;

use crate::{
    error::{AppError, Result},
    models::{Role, User},
    routing::routes::Route,
    toast::Toasts,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    RedirectLogin,
    /// Forbidden. Terminal for this navigation attempt.
    RedirectHome,
}

/// Pure access rule: no side effects.
pub fn check_access(role: Option<Role>, allowed: Option<&[Role]>) -> GateDecision {
    let Some(role) = role else {
        return GateDecision::RedirectLogin;
    };
    match allowed {
        None => GateDecision::Render,
        Some(roles) if roles.contains(&role) => GateDecision::Render,
        Some(_) => GateDecision::RedirectHome,
    }
}

/// Route guard that warns once per forbidden path.
#[derive(Default)]
pub struct RoleGate {
    warned_paths: HashSet<String>,
}

impl RoleGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, user: Option<&User>, route: &Route, toasts: &Toasts) -> GateDecision {
        if route.is_public() {
            return GateDecision::Render;
        }
        self.evaluate_path(user.map(|u| u.role), &route.path(), route.allowed_roles(), toasts)
    }

    pub fn evaluate_path(
        &mut self,
        role: Option<Role>,
        path: &str,
        allowed: Option<&[Role]>,
        toasts: &Toasts,
    ) -> GateDecision {
        let decision = check_access(role, allowed);
        if decision == GateDecision::RedirectHome && self.warned_paths.insert(path.to_string()) {
            warn!("Role {:?} denied access to {}", role, path);
            toasts.warning(format!("Você não tem permissão para acessar {}", path));
        }
        decision
    }

    /// The decision as a `Result` for one-shot callers such as CLI commands.
    /// Raises the same warning toast as a denied screen.
    pub fn require(&mut self, user: Option<&User>, route: &Route, toasts: &Toasts) -> Result<()> {
        match self.evaluate(user, route, toasts) {
            GateDecision::Render => Ok(()),
            GateDecision::RedirectLogin => Err(AppError::Unauthorized),
            GateDecision::RedirectHome => Err(AppError::Forbidden(format!(
                "Seu perfil não tem acesso a {}",
                route.title()
            ))),
        }
    }

    /// Forget warned paths, e.g. after a different user logs in.
    pub fn reset(&mut self) {
        self.warned_paths.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::ToastLevel;

    fn user(role: Role) -> User {
        User {
            id: "u1".to_string(),
            name: "Agente".to_string(),
            email: "acs@ubs.gov.br".to_string(),
            role,
            micro_area_id: Some("ma-3".to_string()),
        }
    }

    #[test]
    fn test_unauthenticated_always_goes_to_login() {
        assert_eq!(check_access(None, None), GateDecision::RedirectLogin);
        assert_eq!(check_access(None, Some(&[Role::Acs])), GateDecision::RedirectLogin);
    }

    #[test]
    fn test_no_allow_list_admits_any_role() {
        assert_eq!(check_access(Some(Role::Acs), None), GateDecision::Render);
        assert_eq!(check_access(Some(Role::Admin), Some(&[Role::Admin])), GateDecision::Render);
    }

    #[test]
    fn test_forbidden_path_warns_exactly_once() {
        let mut gate = RoleGate::new();
        let toasts = Toasts::new();

        for _ in 0..5 {
            let decision = gate.evaluate_path(Some(Role::Acs), "/users", Some(&[Role::Admin]), &toasts);
            assert_eq!(decision, GateDecision::RedirectHome);
        }
        gate.evaluate_path(Some(Role::Acs), "/micro-areas", Some(&[Role::Admin]), &toasts);

        let shown = toasts.drain();
        assert_eq!(shown.len(), 2);
        assert!(shown.iter().all(|t| t.level == ToastLevel::Warning));
        assert!(shown[0].message.contains("/users"));

        gate.evaluate_path(Some(Role::Acs), "/users", Some(&[Role::Admin]), &toasts);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_require_denies_with_the_screen_warning() {
        let mut gate = RoleGate::new();
        let toasts = Toasts::new();
        let acs = user(Role::Acs);

        let err = gate.require(Some(&acs), &Route::MicroAreas, &toasts).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let shown = toasts.drain();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].level, ToastLevel::Warning);
        assert!(shown[0].message.contains("/micro-areas"));

        assert!(matches!(
            gate.require(None, &Route::Patients, &toasts),
            Err(AppError::Unauthorized)
        ));
        assert!(gate.require(Some(&acs), &Route::HomeVisits, &toasts).is_ok());
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_login_route_is_public() {
        let mut gate = RoleGate::new();
        let toasts = Toasts::new();
        assert_eq!(gate.evaluate(None, &Route::Login, &toasts), GateDecision::Render);
        assert_eq!(gate.evaluate(None, &Route::Home, &toasts), GateDecision::RedirectLogin);
        assert_eq!(
            gate.evaluate(Some(&user(Role::Acs)), &Route::Indicators, &toasts),
            GateDecision::RedirectHome
        );
    }
}
