//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, RawQuery, State},
    response::IntoResponse,
};
use ecotrade_core::catalog::{
    CarbonFilter, Category, FILTER_MATERIALS, Product, ProductQuery, SortOrder,
};
use ecotrade_core::{Price, ProductId};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::PageContext;
use crate::state::AppState;

/// Number of same-category suggestions on the detail page.
const RELATED_LIMIT: usize = 4;

/// Listing layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Listing query string: `category`, `min_price`, `max_price`, `impact`,
/// repeated `materials`, `sort` and `view`.
///
/// Unknown or malformed values fall back to the defaults rather than
/// rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingParams {
    pub query: ProductQuery,
    pub view: ViewMode,
}

impl ListingParams {
    /// Parse a raw query string.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        let filter = &mut params.query.filter;

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "category" => filter.category = value.parse().ok(),
                "min_price" => {
                    if let Some(price) = parse_price(value) {
                        filter.min_price = price;
                    }
                }
                "max_price" => {
                    if let Some(price) = parse_price(value) {
                        filter.max_price = price;
                    }
                }
                "impact" => filter.carbon = value.parse().unwrap_or_default(),
                "materials" => {
                    filter.materials.insert(value.to_string());
                }
                "sort" => params.query.sort = value.parse().unwrap_or_default(),
                "view" => {
                    params.view = if value == "list" {
                        ViewMode::List
                    } else {
                        ViewMode::Grid
                    };
                }
                _ => {}
            }
        }

        params
    }
}

fn parse_price(value: &str) -> Option<Price> {
    value
        .parse::<Decimal>()
        .ok()
        .filter(|amount| !amount.is_sign_negative())
        .map(Price::new)
}

/// A select, radio or checkbox option in the filter sidebar.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl FilterOption {
    fn new(value: &str, label: &str, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<Product>,
    pub total: usize,
    pub categories: Vec<FilterOption>,
    pub impacts: Vec<FilterOption>,
    pub materials: Vec<FilterOption>,
    pub sorts: Vec<FilterOption>,
    pub min_price: String,
    pub max_price: String,
    pub list_view: bool,
    pub filters_active: bool,
}

impl ProductsIndexTemplate {
    fn new(page: PageContext, params: &ListingParams, products: Vec<Product>) -> Self {
        let filter = &params.query.filter;

        let mut categories = vec![FilterOption::new(
            "",
            "All Categories",
            filter.category.is_none(),
        )];
        categories.extend(
            Category::ALL
                .iter()
                .map(|c| FilterOption::new(c.slug(), c.label(), filter.category == Some(*c))),
        );

        Self {
            page,
            total: products.len(),
            products,
            categories,
            impacts: CarbonFilter::OPTIONS
                .iter()
                .map(|o| FilterOption::new(o.as_str(), o.label(), filter.carbon == *o))
                .collect(),
            materials: FILTER_MATERIALS
                .iter()
                .map(|m| FilterOption::new(m, m, filter.materials.contains(*m)))
                .collect(),
            sorts: SortOrder::OPTIONS
                .iter()
                .map(|o| FilterOption::new(o.as_str(), o.label(), params.query.sort == *o))
                .collect(),
            min_price: filter.min_price.amount().to_string(),
            max_price: filter.max_price.amount().to_string(),
            list_view: params.view == ViewMode::List,
            filters_active: filter.is_active(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: Product,
    pub impact_text: String,
    pub score_class: &'static str,
    pub related: Vec<Product>,
}

/// Sentence comparing the product's footprint to conventional goods.
#[must_use]
pub fn impact_text(product: &Product) -> String {
    let band = product.impact_band();
    format!(
        "This product has {} carbon footprint of {}. This is {}% lower than similar non-recycled products.",
        band.with_article(),
        product.carbon_footprint,
        band.reduction_vs_conventional()
    )
}

/// CSS modifier for the sustainability score bar.
const fn score_class(score: u8) -> &'static str {
    if score > 70 {
        "low"
    } else if score > 40 {
        "medium"
    } else {
        "high"
    }
}

/// Display product listing with filters.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    RawQuery(raw): RawQuery,
) -> impl IntoResponse {
    let params = ListingParams::parse(raw.as_deref());
    let catalog = ProductRepository::new(state.store()).get_all().await;
    let products = params.query.apply(&catalog);

    ProductsIndexTemplate::new(page, &params, products)
}

/// Display product detail page.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.store());
    let product = repo
        .get_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let related = repo
        .get_by_category(product.category)
        .await
        .into_iter()
        .filter(|p| p.id != product.id)
        .take(RELATED_LIMIT)
        .collect();

    Ok(ProductShowTemplate {
        page,
        impact_text: impact_text(&product),
        score_class: score_class(product.sustainability_score),
        product,
        related,
    })
}
