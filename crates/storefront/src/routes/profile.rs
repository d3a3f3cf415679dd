//! Profile route handlers.
//!
//! One page with four tabs: overview, order history, environmental impact
//! and account settings.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use ecotrade_core::impact::PurchaseImpact;
use ecotrade_core::leaderboard::{self, Standing};
use ecotrade_core::order::Order;
use ecotrade_core::user::{Badge, User, UserStats};
use ecotrade_core::CarbonKg;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{LeaderboardRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::PageContext;
use crate::models::session::set_current_user;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Profile tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileTab {
    #[default]
    Overview,
    Orders,
    Impact,
    Settings,
}

impl ProfileTab {
    const ALL: [Self; 4] = [Self::Overview, Self::Orders, Self::Impact, Self::Settings];

    const fn slug(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Orders => "orders",
            Self::Impact => "impact",
            Self::Settings => "settings",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Orders => "Orders",
            Self::Impact => "Impact",
            Self::Settings => "Settings",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TabQuery {
    #[serde(default)]
    pub tab: Option<String>,
}

/// Settings form data.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub display_name: String,
}

/// Navigation link for one tab.
#[derive(Debug, Clone)]
pub struct TabLink {
    pub href: String,
    pub label: &'static str,
    pub active: bool,
}

/// One month in the carbon chart.
#[derive(Debug, Clone)]
pub struct ChartBar {
    pub label: String,
    pub value: CarbonKg,
    /// Bar height relative to the busiest month.
    pub height: u32,
}

/// Scale monthly totals so the largest is 100.
fn chart_bars(stats: &UserStats) -> Vec<ChartBar> {
    let max = stats
        .carbon_over_time
        .iter()
        .map(|s| s.value.kg())
        .max()
        .unwrap_or(Decimal::ZERO);

    stats
        .carbon_over_time
        .iter()
        .map(|stat| {
            let height = if max.is_zero() {
                0
            } else {
                (stat.value.kg() / max * Decimal::ONE_HUNDRED)
                    .round()
                    .to_u32()
                    .unwrap_or(0)
            };
            ChartBar {
                label: stat.label(),
                value: stat.value,
                height,
            }
        })
        .collect()
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfileTemplate {
    pub page: PageContext,
    pub user: User,
    pub member_since: String,
    pub tabs: Vec<TabLink>,
    pub on_overview: bool,
    pub on_orders: bool,
    pub on_impact: bool,
    pub on_settings: bool,
    pub stats: UserStats,
    pub orders: Vec<Order>,
    pub impact: PurchaseImpact,
    pub chart: Vec<ChartBar>,
    pub standing: Option<Standing>,
    pub badges: Vec<Badge>,
    pub display_name: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl ProfileTemplate {
    async fn load(state: &AppState, page: PageContext, user: User, tab: ProfileTab) -> Self {
        let orders = OrderRepository::new(state.store())
            .get_by_user_id(user.id)
            .await;
        let ranked = LeaderboardRepository::new(state.store()).entries().await;
        let stats = UserStats::from_orders(&orders);

        Self {
            page,
            member_since: user.joined_at.format("%B %Y").to_string(),
            tabs: ProfileTab::ALL
                .iter()
                .map(|t| TabLink {
                    href: format!("/profile?tab={}", t.slug()),
                    label: t.label(),
                    active: *t == tab,
                })
                .collect(),
            on_overview: tab == ProfileTab::Overview,
            on_orders: tab == ProfileTab::Orders,
            on_impact: tab == ProfileTab::Impact,
            on_settings: tab == ProfileTab::Settings,
            impact: PurchaseImpact::for_footprint(stats.total_carbon),
            chart: chart_bars(&stats),
            standing: leaderboard::standing(&ranked, user.id),
            badges: stats.badges(&user, Utc::now()),
            display_name: user.display_name.clone(),
            stats,
            orders,
            user,
            notice: None,
            error: None,
        }
    }
}

/// Parse the `tab` parameter, falling back to the overview.
fn parse_tab(raw: Option<&str>) -> ProfileTab {
    ProfileTab::ALL
        .into_iter()
        .find(|t| Some(t.slug()) == raw)
        .unwrap_or_default()
}

/// Reload the signed-in account so points earned elsewhere show up.
async fn fresh_user(state: &AppState, session: &Session, user: User) -> Result<User> {
    let auth = AuthService::new(state.store(), state.config());
    match auth.refresh(&user).await {
        Some(fresh) => {
            if fresh != user {
                set_current_user(session, &fresh).await?;
            }
            Ok(fresh)
        }
        None => Ok(user),
    }
}

/// Display the profile page.
#[instrument(skip(state, page, session, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut page: PageContext,
    session: Session,
    Query(query): Query<TabQuery>,
) -> Result<impl IntoResponse> {
    let user = fresh_user(&state, &session, user).await?;
    page.user = Some(user.clone());
    let tab = parse_tab(query.tab.as_deref());
    Ok(ProfileTemplate::load(&state, page, user, tab).await)
}

/// Update account settings.
///
/// # Errors
///
/// Returns 500 if the account cannot be saved. Invalid names re-render the
/// settings tab with a message.
#[instrument(skip(state, page, session, user, form), fields(user_id = %user.id))]
pub async fn update_settings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut page: PageContext,
    session: Session,
    Form(form): Form<SettingsForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.store(), state.config());
    match auth.update_display_name(&user, &form.display_name).await {
        Ok(updated) => {
            set_current_user(&session, &updated).await?;
            LeaderboardRepository::new(state.store())
                .refresh_profile(&updated)
                .await;
            tracing::info!("Display name updated");
            page.user = Some(updated.clone());
            let mut view = ProfileTemplate::load(&state, page, updated, ProfileTab::Settings).await;
            view.notice = Some("Profile updated".to_string());
            Ok(view.into_response())
        }
        Err(AuthError::Repository(err)) => Err(err.into()),
        Err(err) => {
            let err = AppError::from(err);
            let mut view = ProfileTemplate::load(&state, page, user, ProfileTab::Settings).await;
            view.display_name = form.display_name;
            view.error = Some(err.public_message());
            Ok((StatusCode::UNPROCESSABLE_ENTITY, view).into_response())
        }
    }
}
