//! Demo data: curated products, generated filler products and community standings.

use chrono::{DateTime, Duration, Utc};
use ecotrade_core::catalog::{Category, FILTER_MATERIALS, Product};
use ecotrade_core::leaderboard::LeaderboardEntry;
use ecotrade_core::{CarbonKg, Price, ProductId, UserId};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

/// Catalog size after generated products are added.
pub const CATALOG_SIZE: usize = 24;

/// Generated `created_at` values fall within this many milliseconds before now.
const MAX_AGE_MS: i64 = 10_000_000_000;

const PEXELS_PARAMS: &str = "auto=compress&cs=tinysrgb&w=800";

fn pexels(id: u32) -> String {
    format!("https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg?{PEXELS_PARAMS}")
}

struct Curated {
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    images: [u32; 2],
    category: Category,
    carbon_centi_kg: i64,
    materials: &'static [&'static str],
    score: u8,
    stock: u32,
    featured: bool,
}

const CURATED: [Curated; 7] = [
    Curated {
        name: "Recycled Plastic Tote Bag",
        description: "A stylish, durable tote bag made from 100% recycled plastic bottles, perfect for everyday use, grocery shopping, or as a sustainable fashion statement. Available in earthy tones like sage green and navy blue.",
        price_cents: 2500,
        images: [5_717_826, 5_717_829],
        category: Category::Fashion,
        carbon_centi_kg: 250,
        materials: &["Recycled Plastic Bottles", "Eco-friendly Dyes"],
        score: 90,
        stock: 45,
        featured: true,
    },
    Curated {
        name: "Upcycled Denim Jacket",
        description: "A trendy denim jacket crafted from repurposed vintage jeans, featuring unique patchwork designs. Each piece is one-of-a-kind, promoting circular fashion.",
        price_cents: 6500,
        images: [2_119_935, 6_843_278],
        category: Category::Fashion,
        carbon_centi_kg: 1500,
        materials: &["Upcycled Denim", "Recycled Thread"],
        score: 85,
        stock: 25,
        featured: true,
    },
    Curated {
        name: "Recycled Glass Candle Holder",
        description: "A handcrafted candle holder made from recycled glass, ideal for home decor. Its translucent green hue adds a touch of elegance while promoting sustainability.",
        price_cents: 1800,
        images: [3_270_223, 7_955_268],
        category: Category::HomeDecor,
        carbon_centi_kg: 80,
        materials: &["Recycled Glass", "Natural Wax"],
        score: 92,
        stock: 60,
        featured: true,
    },
    Curated {
        name: "Reclaimed Wood Coffee Table",
        description: "A minimalist coffee table made from reclaimed wood sourced from old furniture and construction waste. Its natural grain and rustic finish make it a statement piece.",
        price_cents: 15_000,
        images: [4_857_775, 4_846_461],
        category: Category::Furniture,
        carbon_centi_kg: 5000,
        materials: &["Reclaimed Wood", "Non-toxic Sealant"],
        score: 88,
        stock: 15,
        featured: true,
    },
    Curated {
        name: "Recycled Paper Notebook",
        description: "A compact notebook made from 100% recycled paper, with a cover crafted from upcycled fabric scraps. Perfect for journaling or note-taking with a sustainable twist.",
        price_cents: 1200,
        images: [6_157_229, 8_241_135],
        category: Category::Accessories,
        carbon_centi_kg: 50,
        materials: &["Recycled Paper", "Upcycled Fabric"],
        score: 95,
        stock: 100,
        featured: true,
    },
    Curated {
        name: "Organic Cotton Bedding Set",
        description: "Sleep sustainably with this GOTS-certified organic cotton bedding set. Free from harmful chemicals and pesticides, providing healthier sleep and better for the planet.",
        price_cents: 12_995,
        images: [1_267_438, 6_316_065],
        category: Category::HomeDecor,
        carbon_centi_kg: 250,
        materials: &["Organic Cotton"],
        score: 88,
        stock: 30,
        featured: false,
    },
    Curated {
        name: "Cork Yoga Mat",
        description: "Naturally antimicrobial cork yoga mat with rubber base. Provides excellent grip that actually improves with moisture. Eco-friendly, biodegradable, and PVC-free.",
        price_cents: 8500,
        images: [4_056_723, 4_498_515],
        category: Category::Accessories,
        carbon_centi_kg: 180,
        materials: &["Cork", "Natural Rubber"],
        score: 85,
        stock: 25,
        featured: false,
    },
];

struct Template {
    category: Category,
    prefix: &'static str,
    item: &'static str,
    description: &'static str,
    image: u32,
}

const TEMPLATES: [Template; 8] = [
    Template {
        category: Category::Fashion,
        prefix: "Sustainable",
        item: "Hemp Backpack",
        description: "Durable hemp backpack with organic cotton lining, perfect for everyday use. Features multiple pockets and adjustable straps.",
        image: 1_546_003,
    },
    Template {
        category: Category::HomeDecor,
        prefix: "Eco-friendly",
        item: "Recycled Glass Vase",
        description: "Handcrafted vase made from recycled glass bottles. Each piece is unique and helps reduce glass waste.",
        image: 1_838_551,
    },
    Template {
        category: Category::Accessories,
        prefix: "Upcycled",
        item: "Wooden Watch",
        description: "Elegant timepiece crafted from reclaimed wood. Features Japanese movement and a soft vegan leather strap.",
        image: 9_978_694,
    },
    Template {
        category: Category::Furniture,
        prefix: "Reclaimed",
        item: "Bamboo Side Table",
        description: "Minimalist side table made from sustainable bamboo. Perfect for small spaces and eco-conscious homes.",
        image: 4_112_600,
    },
    Template {
        category: Category::Electronics,
        prefix: "Energy-efficient",
        item: "Bamboo Bluetooth Speaker",
        description: "Wireless speaker with bamboo casing that produces rich, natural sound while using less plastic than conventional speakers.",
        image: 6_778_216,
    },
    Template {
        category: Category::HomeDecor,
        prefix: "Natural",
        item: "Coconut Bowl Set",
        description: "Set of 4 handcrafted bowls made from reclaimed coconut shells. Food-safe and perfect for açaí bowls, smoothies, or decor.",
        image: 7_195_014,
    },
    Template {
        category: Category::Fashion,
        prefix: "Organic",
        item: "Cotton T-shirt",
        description: "Ultra-soft t-shirt made from 100% GOTS-certified organic cotton. Ethically manufactured with natural dyes.",
        image: 5_698_853,
    },
    Template {
        category: Category::Accessories,
        prefix: "Biodegradable",
        item: "Phone Case",
        description: "Protective phone case made from plant-based materials that will naturally biodegrade at end-of-life.",
        image: 1_092_644,
    },
];

/// Secondary images for generated products.
const GALLERY_IMAGES: [u32; 24] = [
    1_108_572, 1_470_168, 4_068_314, 2_249_063, 4_050_334, 793_759, 1_266_302, 276_583,
    1_148_955, 325_153, 982_865, 1_342_529, 1_454_806, 1_279_813, 6_044_266, 3_014_856,
    925_415, 1_020_016, 2_850_487, 3_672_770, 4_050_290, 2_365_572, 2_383_010, 2_962_144,
];

const COMMUNITY: [(&str, &str); 10] = [
    ("Ankit Sharma", "men/11"),
    ("Riya Verma", "women/12"),
    ("Vikas Mehta", "men/13"),
    ("Pooja Gupta", "women/14"),
    ("Neeraj Kumar", "men/15"),
    ("Sonal Tiwari", "women/16"),
    ("Aman Joshi", "men/17"),
    ("Kriti Singh", "women/18"),
    ("Rohit Yadav", "men/19"),
    ("Waqas Anwar", "women/20"),
];

/// Generated demo data.
pub struct SeedData {
    pub products: Vec<Product>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl SeedData {
    /// Generate the demo data. The same `seed` always yields the same
    /// products and standings; `None` draws from the OS.
    #[must_use]
    pub fn generate(seed: Option<u64>) -> Self {
        let mut rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let now = Utc::now();
        let products = generate_products(&mut rng, now);
        let leaderboard = generate_leaderboard(&mut rng);
        Self {
            products,
            leaderboard,
        }
    }
}

fn random_uuid(rng: &mut StdRng) -> uuid::Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}

fn random_created_at(rng: &mut StdRng, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::milliseconds(rng.random_range(0..MAX_AGE_MS))
}

fn generate_products(rng: &mut StdRng, now: DateTime<Utc>) -> Vec<Product> {
    let mut products: Vec<Product> = CURATED
        .iter()
        .map(|c| Product {
            id: ProductId::new(random_uuid(rng)),
            name: c.name.to_string(),
            description: c.description.to_string(),
            price: Price::from_cents(c.price_cents),
            images: c.images.iter().copied().map(pexels).collect(),
            category: c.category,
            carbon_footprint: CarbonKg::from_centi_kg(c.carbon_centi_kg),
            materials: c.materials.iter().map(ToString::to_string).collect(),
            sustainability_score: c.score,
            stock: c.stock,
            created_at: random_created_at(rng, now),
            featured: c.featured,
        })
        .collect();

    let generated = CATALOG_SIZE.saturating_sub(products.len());
    let themes = TEMPLATES
        .iter()
        .cycle()
        .zip(GALLERY_IMAGES.iter().copied().cycle().skip(10))
        .take(generated);
    for (template, gallery) in themes {
        let materials = index::sample(rng, FILTER_MATERIALS.len(), 2)
            .into_iter()
            .filter_map(|m| FILTER_MATERIALS.get(m))
            .map(ToString::to_string)
            .collect();

        products.push(Product {
            id: ProductId::new(random_uuid(rng)),
            name: format!("{} {}", template.prefix, template.item),
            description: template.description.to_string(),
            price: Price::from_cents(rng.random_range(10..=1000) * 100),
            images: vec![pexels(template.image), pexels(gallery)],
            category: template.category,
            carbon_footprint: CarbonKg::from_centi_kg(rng.random_range(0..1000)),
            materials,
            sustainability_score: rng.random_range(60..95),
            stock: rng.random_range(1..=100),
            created_at: random_created_at(rng, now),
            featured: false,
        });
    }

    products
}

fn generate_leaderboard(rng: &mut StdRng) -> Vec<LeaderboardEntry> {
    COMMUNITY
        .iter()
        .map(|(name, portrait)| LeaderboardEntry {
            user_id: UserId::new(random_uuid(rng)),
            display_name: (*name).to_string(),
            photo_url: Some(format!("https://randomuser.me/api/portraits/{portrait}.jpg")),
            points: rng.random_range(100..1100),
            carbon_saved: CarbonKg::from_centi_kg(rng.random_range(0..50_000)),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size_and_curated_first() {
        let data = SeedData::generate(Some(7));
        assert_eq!(data.products.len(), CATALOG_SIZE);
        assert_eq!(data.products[0].name, "Recycled Plastic Tote Bag");
        assert_eq!(data.products[0].price, Price::from_cents(2500));
        assert_eq!(data.products[6].name, "Cork Yoga Mat");
        assert_eq!(data.products[7].name, "Sustainable Hemp Backpack");
        assert_eq!(data.products.iter().filter(|p| p.featured).count(), 5);
    }

    #[test]
    fn test_generated_products_within_ranges() {
        let data = SeedData::generate(Some(42));
        for p in data.products.iter().skip(CURATED.len()) {
            assert!(p.price >= Price::from_cents(1000) && p.price <= Price::from_cents(100_000));
            assert!(p.carbon_footprint < CarbonKg::from_centi_kg(1000));
            assert!((60..95).contains(&p.sustainability_score));
            assert!((1..=100).contains(&p.stock));
            assert_eq!(p.materials.len(), 2);
            assert_ne!(p.materials[0], p.materials[1]);
            assert!(p.materials.iter().all(|m| FILTER_MATERIALS.contains(&m.as_str())));
            assert!(p.created_at <= Utc::now());
        }
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let a = SeedData::generate(Some(1234));
        let b = SeedData::generate(Some(1234));
        let ids = |d: &SeedData| d.products.iter().map(|p| p.id).collect::<Vec<_>>();
        let prices = |d: &SeedData| d.products.iter().map(|p| p.price).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(prices(&a), prices(&b));
        assert_eq!(a.leaderboard, b.leaderboard);
    }

    #[test]
    fn test_leaderboard_ranges() {
        let data = SeedData::generate(Some(3));
        assert_eq!(data.leaderboard.len(), 10);
        for entry in &data.leaderboard {
            assert!((100..1100).contains(&entry.points));
            assert!(entry.carbon_saved < CarbonKg::from_centi_kg(50_000));
            assert!(entry.photo_url.is_some());
        }
    }
}
