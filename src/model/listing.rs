//! Normalized listing data model
//!
//! One record per marketplace listing after extraction. Every top-level field
//! is optional because each extraction tier is independently fallible; checks
//! downstream treat absence as "no signal", never as an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Normalized marketplace listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ListingData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub location: Option<Location>,
    /// Category path, root first, leaf last
    pub category: Option<Vec<String>>,
    pub condition: Option<String>,
    pub images: Option<Images>,
    pub seller: Option<Seller>,
    pub listing_meta: Option<ListingMeta>,
    pub payment: Option<Payment>,
}

impl ListingData {
    /// A listing with no title, description, or price carries no usable
    /// signal and must not progress through the pipeline.
    pub fn has_core_fields(&self) -> bool {
        self.title.is_some() || self.description.is_some() || self.price.is_some()
    }
}

/// Listing price in major currency units
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Price {
    pub amount: f64,
    pub currency: Option<String>,
    /// Pre-discount price, when the listing advertises one
    pub original_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Images {
    pub count: u32,
    pub urls: Vec<String>,
}

/// Seller profile as exposed by the application-state tier
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Seller {
    pub id: Option<String>,
    pub verified: bool,
    #[serde(rename = "type")]
    pub seller_type: Option<String>,
    pub name: Option<String>,
    pub number_of_listings: Option<u32>,
    pub has_profile_photo: bool,
}

/// Listing lifecycle metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ListingMeta {
    pub id: Option<String>,
    pub activation_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub views: Option<u64>,
    /// Paid promotion ("top ad") flag
    pub top_ad: bool,
    pub ad_source: Option<String>,
}

/// Accepted payment methods
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub cash_accepted: bool,
    pub cashless: bool,
    pub shipping: bool,
}
