//! Shopper accounts and their sustainability statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::impact::PurchaseImpact;
use crate::order::{Order, points_for};
use crate::types::{CarbonKg, Email, Price, UserId};

/// A shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    /// Footprint of everything this shopper has bought.
    pub carbon_footprint: CarbonKg,
    pub points: u32,
    pub joined_at: DateTime<Utc>,
}

impl User {
    /// A fresh account named after the local part of `email`.
    #[must_use]
    pub fn new(email: Email, is_admin: bool, joined_at: DateTime<Utc>) -> Self {
        Self {
            id: UserId::generate(),
            display_name: email.display_name(),
            email,
            photo_url: None,
            is_admin,
            carbon_footprint: CarbonKg::ZERO,
            points: 0,
            joined_at,
        }
    }

    /// Credit an order's footprint and eco points to this account.
    pub fn record_purchase(&mut self, order: &Order) {
        self.carbon_footprint = self.carbon_footprint + order.total_carbon;
        self.points = self.points.saturating_add(points_for(order.total_amount));
    }

    /// First letter of the display name, uppercased, for avatar placeholders.
    #[must_use]
    pub fn initial(&self) -> String {
        self.display_name
            .chars()
            .next()
            .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
    }
}

/// Footprint recorded in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarbonStat {
    /// First day of the month.
    pub month: NaiveDate,
    pub value: CarbonKg,
}

impl CarbonStat {
    /// Short label such as "Mar 2026".
    #[must_use]
    pub fn label(&self) -> String {
        self.month.format("%b %Y").to_string()
    }
}

/// Aggregates over a shopper's orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_orders: usize,
    /// Units bought across all orders.
    pub total_items: u32,
    pub total_spent: Price,
    pub total_carbon: CarbonKg,
    /// One point per month with orders, oldest first.
    pub carbon_over_time: Vec<CarbonStat>,
}

impl UserStats {
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut monthly: BTreeMap<NaiveDate, CarbonKg> = BTreeMap::new();
        for order in orders {
            let date = order.created_at.date_naive();
            let month = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
            let slot = monthly.entry(month).or_insert(CarbonKg::ZERO);
            *slot = *slot + order.total_carbon;
        }

        Self {
            total_orders: orders.len(),
            total_items: orders.iter().map(Order::item_count).sum(),
            total_spent: orders.iter().map(|o| o.total_amount).sum(),
            total_carbon: orders.iter().map(|o| o.total_carbon).sum(),
            carbon_over_time: monthly
                .into_iter()
                .map(|(month, value)| CarbonStat { month, value })
                .collect(),
        }
    }

    /// Sustainability badges, earned or not, in display order.
    #[must_use]
    pub fn badges(&self, user: &User, now: DateTime<Utc>) -> Vec<Badge> {
        let saved = PurchaseImpact::for_footprint(self.total_carbon).carbon_saved;
        vec![
            Badge {
                name: "Eco Shopper",
                requirement: "10+ eco purchases",
                earned: self.total_items >= 10,
            },
            Badge {
                name: "Carbon Saver",
                requirement: "Save 100kg CO₂",
                earned: saved.kg() >= rust_decimal::Decimal::ONE_HUNDRED,
            },
            Badge {
                name: "Frequent Buyer",
                requirement: "25+ orders",
                earned: self.total_orders >= 25,
            },
            Badge {
                name: "Earth Lover",
                requirement: "1 year membership",
                earned: now.signed_duration_since(user.joined_at).num_days() >= 365,
            },
        ]
    }
}

/// A profile achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub name: &'static str,
    pub requirement: &'static str,
    pub earned: bool,
}
