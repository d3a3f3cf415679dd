//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use ecotrade_core::catalog::{Category, Product};
use ecotrade_core::impact::trees_for;
use ecotrade_core::leaderboard::RankedEntry;
use ecotrade_core::CarbonKg;
use tracing::instrument;

use crate::db::{LeaderboardRepository, ProductRepository};
use crate::filters;
use crate::models::PageContext;
use crate::state::AppState;

/// Maximum featured products on the home page.
const FEATURED_LIMIT: usize = 4;

/// A category tile with its live product count.
#[derive(Debug, Clone)]
pub struct CategoryTile {
    pub title: &'static str,
    pub slug: &'static str,
    pub image: &'static str,
    pub count: usize,
}

/// Tile image for a category.
const fn category_image(category: Category) -> &'static str {
    match category {
        Category::Furniture => {
            "https://images.pexels.com/photos/4112557/pexels-photo-4112557.jpeg?auto=compress&cs=tinysrgb&w=800"
        }
        Category::Fashion => {
            "https://images.pexels.com/photos/5662862/pexels-photo-5662862.png?auto=compress&cs=tinysrgb&w=800"
        }
        Category::HomeDecor => {
            "https://images.pexels.com/photos/7195232/pexels-photo-7195232.jpeg?auto=compress&cs=tinysrgb&w=800"
        }
        Category::Electronics => {
            "https://images.pexels.com/photos/3733929/pexels-photo-3733929.jpeg?auto=compress&cs=tinysrgb&w=800"
        }
        Category::Accessories => {
            "https://images.pexels.com/photos/5717829/pexels-photo-5717829.jpeg?auto=compress&cs=tinysrgb&w=800"
        }
    }
}

/// Count products per category, in category display order.
#[must_use]
pub fn category_tiles(catalog: &[Product]) -> Vec<CategoryTile> {
    Category::ALL
        .iter()
        .map(|category| CategoryTile {
            title: category.headline(),
            slug: category.slug(),
            image: category_image(*category),
            count: catalog.iter().filter(|p| p.category == *category).count(),
        })
        .collect()
}

/// Community totals shown in the impact band.
#[derive(Debug, Clone)]
pub struct CommunityImpact {
    pub members: usize,
    pub points: u32,
    pub carbon_saved: CarbonKg,
    pub trees_equivalent: u32,
}

impl CommunityImpact {
    #[must_use]
    pub fn from_ranking(ranking: &[RankedEntry]) -> Self {
        let carbon_saved: CarbonKg = ranking.iter().map(|r| r.entry.carbon_saved).sum();
        Self {
            members: ranking.len(),
            points: ranking.iter().map(|r| r.entry.points).sum(),
            carbon_saved,
            trees_equivalent: trees_for(carbon_saved),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub featured: Vec<Product>,
    pub categories: Vec<CategoryTile>,
    pub community: CommunityImpact,
}

/// Display the home page.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageContext) -> impl IntoResponse {
    let products = ProductRepository::new(state.store());
    let catalog = products.get_all().await;
    let featured = products
        .get_featured()
        .await
        .into_iter()
        .take(FEATURED_LIMIT)
        .collect();
    let ranking = LeaderboardRepository::new(state.store()).entries().await;

    HomeTemplate {
        page,
        featured,
        categories: category_tiles(&catalog),
        community: CommunityImpact::from_ranking(&ranking),
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::db::seed::SeedData;

    #[test]
    fn test_category_counts_cover_catalog() {
        let catalog = SeedData::generate(Some(3)).products;
        let tiles = category_tiles(&catalog);
        assert_eq!(tiles.len(), Category::ALL.len());
        assert_eq!(tiles.iter().map(|t| t.count).sum::<usize>(), catalog.len());
        assert_eq!(tiles[2].slug, "home-decor");
    }
}
