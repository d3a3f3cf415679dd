//! Product catalog: products, categories, filters and sort orders.
//!
//! Listing pages narrow the catalog with a [`ProductFilter`] (a conjunction of
//! category, price range, carbon band and material membership) and order it
//! with a [`SortOrder`]. Both operate on an in-memory slice.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CarbonKg, ImpactBand, Price, ProductId};

/// Materials offered as listing filters.
pub const FILTER_MATERIALS: [&str; 5] = [
    "Recycled Plastic",
    "Upcycled Wood",
    "Reclaimed Metal",
    "Organic Cotton",
    "Recycled Paper",
];

/// Upper bound of the default price range, in whole dollars.
pub const DEFAULT_MAX_PRICE_DOLLARS: i64 = 1000;

/// Sustainability score scale maximum.
pub const MAX_SUSTAINABILITY_SCORE: u8 = 100;

// =============================================================================
// Category
// =============================================================================

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Furniture,
    Fashion,
    #[serde(rename = "Home Decor")]
    HomeDecor,
    Electronics,
    Accessories,
}

impl Category {
    /// All categories in navigation order.
    pub const ALL: [Self; 5] = [
        Self::Furniture,
        Self::Fashion,
        Self::HomeDecor,
        Self::Electronics,
        Self::Accessories,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Furniture => "Furniture",
            Self::Fashion => "Fashion",
            Self::HomeDecor => "Home Decor",
            Self::Electronics => "Electronics",
            Self::Accessories => "Accessories",
        }
    }

    /// URL slug used in query strings.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Furniture => "furniture",
            Self::Fashion => "fashion",
            Self::HomeDecor => "home-decor",
            Self::Electronics => "electronics",
            Self::Accessories => "accessories",
        }
    }

    /// Home-page tile title.
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::Furniture => "Recycled Furniture",
            Self::Fashion => "Sustainable Fashion",
            Self::HomeDecor => "Eco Home Decor",
            Self::Electronics => "Refurbished Electronics",
            Self::Accessories => "Green Accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts either the label ("Home Decor") or the slug ("home-decor"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(needle) || c.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Image URLs, primary image first.
    pub images: Vec<String>,
    pub category: Category,
    /// Footprint per unit.
    pub carbon_footprint: CarbonKg,
    pub materials: Vec<String>,
    /// 0-100, higher is better.
    pub sustainability_score: u8,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Primary image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Impact band of the per-unit footprint.
    #[must_use]
    pub fn impact_band(&self) -> ImpactBand {
        self.carbon_footprint.band()
    }

    /// Whether the product lists `material` (exact match).
    #[must_use]
    pub fn has_material(&self, material: &str) -> bool {
        self.materials.iter().any(|m| m == material)
    }

    /// Whether stock is low enough to warn shoppers.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock < 10
    }
}

/// Fields for a product that does not exist yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub images: Vec<String>,
    pub category: Category,
    pub carbon_footprint: CarbonKg,
    pub materials: Vec<String>,
    pub sustainability_score: u8,
    pub stock: u32,
    #[serde(default)]
    pub featured: bool,
}

impl NewProduct {
    /// Assign an ID and creation time.
    #[must_use]
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            images: self.images,
            category: self.category,
            carbon_footprint: self.carbon_footprint,
            materials: self.materials,
            sustainability_score: self.sustainability_score.min(MAX_SUSTAINABILITY_SCORE),
            stock: self.stock,
            created_at,
            featured: self.featured,
        }
    }
}

/// Partial product update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub images: Option<Vec<String>>,
    pub category: Option<Category>,
    pub carbon_footprint: Option<CarbonKg>,
    pub materials: Option<Vec<String>>,
    pub sustainability_score: Option<u8>,
    pub stock: Option<u32>,
    pub featured: Option<bool>,
}

impl ProductUpdate {
    /// Merge the present fields into `product`.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(images) = self.images {
            product.images = images;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(carbon) = self.carbon_footprint {
            product.carbon_footprint = carbon;
        }
        if let Some(materials) = self.materials {
            product.materials = materials;
        }
        if let Some(score) = self.sustainability_score {
            product.sustainability_score = score.min(MAX_SUSTAINABILITY_SCORE);
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
    }
}

// =============================================================================
// Filtering
// =============================================================================

/// Carbon band filter; `All` disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarbonFilter {
    #[default]
    All,
    Only(ImpactBand),
}

impl CarbonFilter {
    /// Filter options in display order.
    pub const OPTIONS: [Self; 4] = [
        Self::All,
        Self::Only(ImpactBand::Low),
        Self::Only(ImpactBand::Medium),
        Self::Only(ImpactBand::High),
    ];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(band) => band.as_str(),
        }
    }

    /// Option label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "All Products",
            Self::Only(band) => band.label(),
        }
    }

    fn matches(self, carbon: CarbonKg) -> bool {
        match self {
            Self::All => true,
            Self::Only(band) => carbon.band() == band,
        }
    }
}

impl FromStr for CarbonFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::OPTIONS
            .into_iter()
            .find(|option| option.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown carbon impact filter: {s}"))
    }
}

/// Listing filter. A product must satisfy every active criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category: Option<Category>,
    /// Inclusive lower bound.
    pub min_price: Price,
    /// Inclusive upper bound.
    pub max_price: Price,
    pub carbon: CarbonFilter,
    /// Matches products listing at least one of these; empty disables the criterion.
    pub materials: BTreeSet<String>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            min_price: Price::ZERO,
            max_price: Price::from_cents(DEFAULT_MAX_PRICE_DOLLARS * 100),
            carbon: CarbonFilter::All,
            materials: BTreeSet::new(),
        }
    }
}

impl ProductFilter {
    /// Whether `product` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category.is_none_or(|c| c == product.category)
            && product.price >= self.min_price
            && product.price <= self.max_price
            && self.carbon.matches(product.carbon_footprint)
            && (self.materials.is_empty()
                || product.materials.iter().any(|m| self.materials.contains(m)))
    }

    /// Whether the shopper has narrowed the listing by category, band or material.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.carbon != CarbonFilter::All || !self.materials.is_empty()
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    #[serde(rename = "featured")]
    Featured,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[serde(rename = "carbon-asc")]
    CarbonAsc,
}

impl SortOrder {
    /// Options in display order.
    pub const OPTIONS: [Self; 4] = [
        Self::Featured,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::CarbonAsc,
    ];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::CarbonAsc => "carbon-asc",
        }
    }

    /// Option label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::CarbonAsc => "Lowest Carbon Impact",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Featured => Ordering::Equal,
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::CarbonAsc => a.carbon_footprint.cmp(&b.carbon_footprint),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::OPTIONS
            .into_iter()
            .find(|option| option.as_str() == s.trim())
            .ok_or_else(|| format!("unknown sort order: {s}"))
    }
}

/// A filter plus a sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: SortOrder,
}

impl ProductQuery {
    /// Filter then stably sort `products`.
    ///
    /// Products that compare equal keep their catalog order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut result: Vec<Product> = products
            .iter()
            .filter(|p| self.filter.matches(p))
            .cloned()
            .collect();
        result.sort_by(|a, b| self.sort.compare(a, b));
        result
    }
}
