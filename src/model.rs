//! Row and payload types for categories and goods.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub category_id: i32,
    pub category_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCategory {
    pub category_name: String,
}

/// A good as stored, returned on create.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Good {
    pub product_id: i32,
    pub product_name: String,
    pub category_id: i32,
    pub price: Option<i32>,
}

/// A good joined with its category's current name, returned by the list route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GoodListing {
    pub product_id: i32,
    pub product_name: String,
    pub category_name: String,
    pub price: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewGood {
    pub product_name: String,
    pub category_id: i32,
    #[serde(default)]
    pub price: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RenamedGood {
    pub product_id: i32,
    pub product_name: String,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct DeletedCategory {
    pub category_id: i32,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct DeletedGood {
    pub product_id: i32,
}
