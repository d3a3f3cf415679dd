//! Authentication route handlers.
//!
//! Login and signup share one form. On success the user record is written to
//! the session and the shopper returns to `next` (defaulting to `/`).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use ecotrade_core::user::User;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::{OptionalAuth, safe_next};
use crate::models::PageContext;
use crate::models::session::{clear_current_user, set_current_user};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Shown when either field is blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";

/// Query parameters for the login and signup pages.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Login and signup form data. Not `Debug`: it carries the password.
#[derive(Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// Which of the two forms is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

/// Login or signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/form.html")]
pub struct AuthTemplate {
    pub page: PageContext,
    pub is_login: bool,
    pub action: &'static str,
    pub email: String,
    pub next: String,
    pub error: Option<String>,
}

impl AuthTemplate {
    fn new(mode: AuthMode, page: PageContext, next: &str) -> Self {
        Self {
            page,
            is_login: mode == AuthMode::Login,
            action: match mode {
                AuthMode::Login => "/login",
                AuthMode::Signup => "/signup",
            },
            email: String::new(),
            next: next.to_string(),
            error: None,
        }
    }
}

fn form_page(mode: AuthMode, page: PageContext, user: Option<&User>, next: Option<&str>) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    AuthTemplate::new(mode, page, safe_next(next)).into_response()
}

/// Display the login page. Signed-in users go home.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    page: PageContext,
    Query(query): Query<NextQuery>,
) -> Response {
    form_page(AuthMode::Login, page, user.as_ref(), query.next.as_deref())
}

/// Display the signup page. Signed-in users go home.
pub async fn signup_page(
    OptionalAuth(user): OptionalAuth,
    page: PageContext,
    Query(query): Query<NextQuery>,
) -> Response {
    form_page(AuthMode::Signup, page, user.as_ref(), query.next.as_deref())
}

/// Handle login or signup form submission.
async fn submit(
    mode: AuthMode,
    state: &AppState,
    page: PageContext,
    session: &Session,
    form: CredentialsForm,
) -> Result<Response> {
    let next = safe_next(form.next.as_deref()).to_string();
    let mut view = AuthTemplate::new(mode, page, &next);
    view.email = form.email.trim().to_string();

    if form.email.trim().is_empty() || form.password.is_empty() {
        view.error = Some(MISSING_FIELDS_MESSAGE.to_string());
        return Ok((axum::http::StatusCode::UNPROCESSABLE_ENTITY, view).into_response());
    }

    let auth = AuthService::new(state.store(), state.config());
    let result = match mode {
        AuthMode::Login => auth.sign_in(&form.email, &form.password).await,
        AuthMode::Signup => auth.sign_up(&form.email, &form.password).await,
    };

    let user = match result {
        Ok(user) => user,
        Err(AuthError::Repository(err)) => return Err(err.into()),
        Err(err) => {
            tracing::warn!(error = %err, ?mode, "Authentication failed");
            let err = AppError::from(err);
            view.error = Some(err.public_message());
            return Ok((err.status(), view).into_response());
        }
    };

    session.cycle_id().await?;
    set_current_user(session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, ?mode, "Signed in");

    Ok(Redirect::to(&next).into_response())
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    page: PageContext,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    submit(AuthMode::Login, &state, page, &session, form).await
}

/// Handle signup form submission.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    page: PageContext,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    submit(AuthMode::Signup, &state, page, &session, form).await
}

/// Sign out. The cart is kept; checkout progress is dropped.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
