//! Community leaderboard page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use ecotrade_core::leaderboard::{RankedEntry, podium};
use ecotrade_core::{CarbonKg, UserId};

use crate::db::LeaderboardRepository;
use crate::filters;
use crate::models::PageContext;
use crate::state::AppState;

/// A leaderboard row ready for display.
#[derive(Debug, Clone)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub medal: Option<&'static str>,
    pub display_name: String,
    pub initial: String,
    pub photo_url: Option<String>,
    pub points: u32,
    pub carbon_saved: CarbonKg,
    pub is_current_user: bool,
}

impl LeaderboardRow {
    fn new(ranked: &RankedEntry, current: Option<UserId>) -> Self {
        let entry = &ranked.entry;
        Self {
            rank: ranked.rank,
            medal: ranked.medal(),
            display_name: entry.display_name.clone(),
            initial: entry
                .display_name
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default(),
            photo_url: entry.photo_url.clone(),
            points: entry.points,
            carbon_saved: entry.carbon_saved,
            is_current_user: current == Some(entry.user_id),
        }
    }
}

/// Leaderboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "leaderboard.html")]
pub struct LeaderboardTemplate {
    pub page: PageContext,
    pub podium: Vec<LeaderboardRow>,
    pub rows: Vec<LeaderboardRow>,
}

fn rows(ranked: &[RankedEntry], current: Option<UserId>) -> Vec<LeaderboardRow> {
    ranked
        .iter()
        .map(|r| LeaderboardRow::new(r, current))
        .collect()
}

/// Display the leaderboard.
pub async fn show(State(state): State<AppState>, page: PageContext) -> impl IntoResponse {
    let ranked = LeaderboardRepository::new(state.store()).entries().await;
    let current = page.user.as_ref().map(|u| u.id);

    LeaderboardTemplate {
        podium: rows(podium(&ranked), current),
        rows: rows(&ranked, current),
        page,
    }
}
