//! Access control gate.
//!
//! Intercepts every request before handler dispatch and enforces three
//! rules, in order, first match wins:
//!
//! 1. Admin paths require an owner identity: anonymous callers are sent to
//!    login with the original path as the return target; authenticated
//!    non-owners are sent to the public home page (a silent demotion, not
//!    an error).
//! 2. Account paths require any authenticated identity.
//! 3. Auth-entry paths bounce already-authenticated callers to their
//!    `redirect` target, or home.
//!
//! Everything else passes through untouched. Only the admin rule consults
//! the role, so the profile lookup is deferred until that rule fires; the
//! account and auth-entry rules are decided from session presence alone. A
//! live session is therefore never bounced off its own pages by a profile
//! outage. The gate never mutates persisted state; when it does resolve a
//! role it stashes the identity in the request extensions for handlers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::db::ProfileRepository;
use crate::models::{CurrentUser, Identity, session_keys};
use crate::state::AppState;

/// Path prefixes requiring the owner role.
const ADMIN_PREFIXES: &[&str] = &["/admin"];

/// Path prefixes requiring any authenticated identity.
const CUSTOMER_PREFIXES: &[&str] = &["/account"];

/// Auth-entry paths (login/signup).
const AUTH_PREFIXES: &[&str] = &["/login", "/signup"];

/// The gate's classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Owner-only admin area.
    Admin,
    /// Authenticated-customer area.
    Customer,
    /// Login/signup entry points.
    AuthEntry,
    /// No rule applies.
    Public,
}

/// What the gate does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    /// Pass through to the handler.
    Allow,
    /// Rewrite the response into a redirect.
    Redirect(String),
}

/// What the gate knows about the caller at decision time.
///
/// The role lives in the profile table and is resolved lazily: customer and
/// auth-entry rules only ever see the first two variants.
#[derive(Debug, Clone)]
pub enum Caller {
    /// No session user.
    Anonymous,
    /// A live session whose role was not looked up because no rule needs it.
    Authenticated,
    /// A live session with its profile role resolved (admin paths).
    Resolved(Identity),
}

impl Caller {
    /// Whether a session user is present, regardless of role resolution.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }
}

/// Classify a path against the protected prefix sets, in rule order.
#[must_use]
pub fn classify(path: &str) -> RouteClass {
    if ADMIN_PREFIXES.iter().any(|p| path.starts_with(p)) {
        RouteClass::Admin
    } else if CUSTOMER_PREFIXES.iter().any(|p| path.starts_with(p)) {
        RouteClass::Customer
    } else if AUTH_PREFIXES.iter().any(|p| path.starts_with(p)) {
        RouteClass::AuthEntry
    } else {
        RouteClass::Public
    }
}

/// The pure policy decision: classification × caller → action.
///
/// `redirect_param` is the decoded `redirect` query parameter, consulted
/// only on auth-entry paths. A session user whose role could not be
/// resolved counts as an authenticated non-owner for the admin rule.
#[must_use]
pub fn decide(
    class: RouteClass,
    caller: &Caller,
    path: &str,
    redirect_param: Option<&str>,
) -> GateAction {
    match class {
        RouteClass::Admin => match caller {
            Caller::Anonymous => GateAction::Redirect(login_with_return(path)),
            Caller::Resolved(identity) if identity.is_owner() => GateAction::Allow,
            Caller::Authenticated | Caller::Resolved(_) => GateAction::Redirect("/".to_owned()),
        },
        RouteClass::Customer => {
            if caller.is_authenticated() {
                GateAction::Allow
            } else {
                GateAction::Redirect(login_with_return(path))
            }
        }
        RouteClass::AuthEntry => {
            if caller.is_authenticated() {
                GateAction::Redirect(redirect_param.unwrap_or("/").to_owned())
            } else {
                GateAction::Allow
            }
        }
        RouteClass::Public => GateAction::Allow,
    }
}

fn login_with_return(path: &str) -> String {
    format!("/login?redirect={}", urlencoding::encode(path))
}

/// Extract the decoded `redirect` parameter from a raw query string.
fn redirect_param(query: Option<&str>) -> Option<String> {
    let query = query?;
    query.split('&').find_map(|pair| {
        let value = pair.strip_prefix("redirect=")?;
        Some(urlencoding::decode(value).map_or_else(|_| value.to_owned(), |v| v.into_owned()))
    })
}

/// The gate middleware. Applied inside the session layer so the session is
/// available in the request extensions.
pub async fn access_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let class = classify(req.uri().path());

    // Public paths never need the caller resolved here; handlers that
    // want it use their own extractors.
    if class == RouteClass::Public {
        return next.run(req).await;
    }

    let user = session_user(req.extensions().get::<Session>()).await;

    // Only the admin rule needs the role, so only there does the gate hit
    // the profile table.
    let caller = match user {
        None => Caller::Anonymous,
        Some(user) if class == RouteClass::Admin => resolve_role(&state, &user).await,
        Some(_) => Caller::Authenticated,
    };

    let path = req.uri().path().to_owned();
    let redirect = redirect_param(req.uri().query());
    match decide(class, &caller, &path, redirect.as_deref()) {
        GateAction::Allow => {
            if let Caller::Resolved(identity) = caller {
                req.extensions_mut().insert(identity);
            }
            next.run(req).await
        }
        GateAction::Redirect(target) => Redirect::to(&target).into_response(),
    }
}

/// Read the session user without touching the database.
async fn session_user(session: Option<&Session>) -> Option<CurrentUser> {
    session?
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Resolve a session user's role against the profile table.
///
/// A missing row or a failed lookup resolves to `Authenticated`, not an
/// error: the session is real, only the role is unknown, and the admin rule
/// treats an unknown role as non-owner.
async fn resolve_role(state: &AppState, user: &CurrentUser) -> Caller {
    match ProfileRepository::new(state.pool()).get(user.id).await {
        Ok(Some(profile)) => Caller::Resolved(Identity::from_profile(profile)),
        Ok(None) => {
            tracing::warn!(user_id = %user.id, "session user has no profile row");
            Caller::Authenticated
        }
        Err(e) => {
            tracing::error!(error = %e, user_id = %user.id, "profile lookup failed in gate");
            Caller::Authenticated
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use dora_patisserie_core::{UserId, UserRole};

    use super::*;
    use crate::models::Profile;

    fn profile(role: UserRole) -> Profile {
        Profile {
            id: UserId::generate(),
            name: Some("Dora".to_owned()),
            phone: None,
            email: None,
            address: None,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn customer() -> Caller {
        Caller::Resolved(Identity::Customer(profile(UserRole::Customer)))
    }

    fn owner() -> Caller {
        Caller::Resolved(Identity::Owner(profile(UserRole::Owner)))
    }

    #[test]
    fn classification_follows_prefix_sets() {
        assert_eq!(classify("/admin"), RouteClass::Admin);
        assert_eq!(classify("/admin/products"), RouteClass::Admin);
        assert_eq!(classify("/account/orders"), RouteClass::Customer);
        assert_eq!(classify("/login"), RouteClass::AuthEntry);
        assert_eq!(classify("/signup"), RouteClass::AuthEntry);
        assert_eq!(classify("/"), RouteClass::Public);
        assert_eq!(classify("/api/orders"), RouteClass::Public);
    }

    #[test]
    fn anonymous_admin_request_redirects_to_login_with_return_target() {
        let action = decide(RouteClass::Admin, &Caller::Anonymous, "/admin/hours", None);
        assert_eq!(
            action,
            GateAction::Redirect("/login?redirect=%2Fadmin%2Fhours".to_owned())
        );
    }

    #[test]
    fn authenticated_non_owner_is_sent_home_not_to_login() {
        let action = decide(RouteClass::Admin, &customer(), "/admin", None);
        assert_eq!(action, GateAction::Redirect("/".to_owned()));
    }

    #[test]
    fn unresolved_role_on_admin_paths_is_sent_home_not_to_login() {
        // Session present but the profile row is missing or unreachable:
        // treated as an authenticated non-owner, never as anonymous.
        let action = decide(RouteClass::Admin, &Caller::Authenticated, "/admin", None);
        assert_eq!(action, GateAction::Redirect("/".to_owned()));
    }

    #[test]
    fn owner_passes_the_admin_gate() {
        assert_eq!(decide(RouteClass::Admin, &owner(), "/admin", None), GateAction::Allow);
    }

    #[test]
    fn account_area_accepts_any_authenticated_role() {
        assert_eq!(
            decide(RouteClass::Customer, &customer(), "/account", None),
            GateAction::Allow
        );
        assert_eq!(
            decide(RouteClass::Customer, &owner(), "/account", None),
            GateAction::Allow
        );
        assert_eq!(
            decide(RouteClass::Customer, &Caller::Anonymous, "/account", None),
            GateAction::Redirect("/login?redirect=%2Faccount".to_owned())
        );
    }

    #[test]
    fn account_access_needs_only_a_live_session() {
        // The account rule is decided from session presence alone; the role
        // is never looked up for it, so a profile outage cannot bounce a
        // logged-in customer from /account to /login.
        assert_eq!(
            decide(RouteClass::Customer, &Caller::Authenticated, "/account", None),
            GateAction::Allow
        );
    }

    #[test]
    fn logged_in_caller_is_bounced_off_auth_entry_paths() {
        assert_eq!(
            decide(RouteClass::AuthEntry, &Caller::Authenticated, "/login", Some("/account")),
            GateAction::Redirect("/account".to_owned())
        );
        assert_eq!(
            decide(RouteClass::AuthEntry, &Caller::Authenticated, "/login", None),
            GateAction::Redirect("/".to_owned())
        );
        assert_eq!(
            decide(RouteClass::AuthEntry, &Caller::Anonymous, "/login", None),
            GateAction::Allow
        );
    }

    #[test]
    fn redirect_param_is_percent_decoded() {
        assert_eq!(
            redirect_param(Some("redirect=%2Fadmin%2Fhours")),
            Some("/admin/hours".to_owned())
        );
        assert_eq!(redirect_param(Some("foo=bar")), None);
        assert_eq!(redirect_param(None), None);
    }
}
