//! Market record shapes as served by the external API.
//!
//! These are pass-through types: field names follow the API's JSON so that
//! records can be decoded directly and handed on to consumers unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::id::{LocationId, RegionId, StationId, TypeId};

/// Which side of the order book a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Both sides, buy first.
    pub const ALL: [Self; 2] = [Self::Buy, Self::Sell];

    /// The value of the API's `order_type` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side selector for aggregate queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideFilter {
    Buy,
    Sell,
    #[default]
    All,
}

impl SideFilter {
    /// Whether `side` passes this filter.
    #[must_use]
    pub const fn matches(self, side: OrderSide) -> bool {
        matches!(
            (self, side),
            (Self::All, _) | (Self::Buy, OrderSide::Buy) | (Self::Sell, OrderSide::Sell)
        )
    }
}

impl From<OrderSide> for SideFilter {
    fn from(side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => Self::Buy,
            OrderSide::Sell => Self::Sell,
        }
    }
}

impl FromStr for SideFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "all" | "" => Ok(Self::All),
            other => Err(format!("unknown order side '{other}'")),
        }
    }
}

/// One order record from a regional order book page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOrder {
    pub order_id: u64,
    pub type_id: TypeId,
    pub location_id: StationId,
    #[serde(default)]
    pub system_id: Option<LocationId>,
    pub is_buy_order: bool,
    pub price: f64,
    pub volume_remain: u64,
    #[serde(default)]
    pub volume_total: u64,
    #[serde(default)]
    pub min_volume: u64,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub issued: Option<DateTime<Utc>>,
}

impl MarketOrder {
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        if self.is_buy_order {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }
}

/// Cost index of a single industry activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityCostIndex {
    pub activity: String,
    pub cost_index: f64,
}

/// Industry cost indices of one solar system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemCostIndices {
    pub solar_system_id: LocationId,
    #[serde(default)]
    pub cost_indices: Vec<ActivityCostIndex>,
}

impl SystemCostIndices {
    /// Index for `activity`, if the system reports one.
    #[must_use]
    pub fn index_for(&self, activity: &str) -> Option<f64> {
        self.cost_indices
            .iter()
            .find(|entry| entry.activity == activity)
            .map(|entry| entry.cost_index)
    }
}

/// Server-wide adjusted and average price of an item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub type_id: TypeId,
    #[serde(default)]
    pub adjusted_price: Option<f64>,
    #[serde(default)]
    pub average_price: Option<f64>,
}

/// A public contract listed in a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub contract_id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub issuer_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub reward: Option<f64>,
    #[serde(default)]
    pub collateral: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub start_location_id: Option<StationId>,
    #[serde(default)]
    pub end_location_id: Option<StationId>,
    #[serde(default)]
    pub date_issued: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_expired: Option<DateTime<Utc>>,
}

/// One day of regional trade history for an item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
    pub order_count: u64,
    pub volume: u64,
}

/// Minimal station record; only the name is of interest here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    pub name: String,
    #[serde(default)]
    pub system_id: Option<LocationId>,
}

/// Key of a regional history series.
pub type HistoryKey = (RegionId, TypeId);
