// src/sources/nvidia_api.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{fetch_body, Identity, Source};
use crate::error::{Result, WatchError};

const STORE_NAME: &str = "NVIDIA Store";
const API_BASE: &str = "https://api-prod.nvidia.com/direct-sales-shop/DR/products/en_us/USD";

/// NVIDIA direct-sales product endpoint, keyed by Digital River id.
#[derive(Debug, Clone)]
pub struct NvidiaApiSource {
    pub product: String,
    pub id: String,
    pub checkout_page: String,
}

impl NvidiaApiSource {
    pub fn new(
        product: impl Into<String>,
        id: impl Into<String>,
        checkout_page: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            id: id.into(),
            checkout_page: checkout_page.into(),
        }
    }

    pub fn api_url(&self) -> String {
        format!("{API_BASE}/{}", self.id)
    }

    pub(crate) fn parse_availability(&self, body: &str) -> Result<bool> {
        let resp: ApiResponse =
            serde_json::from_str(body).map_err(|e| WatchError::format(STORE_NAME, e.to_string()))?;

        let first = resp
            .products
            .product
            .first()
            .ok_or_else(|| WatchError::semantic(STORE_NAME, format!("no product for id {}", self.id)))?;

        // The API reports the flag as a string ("true" / "false").
        let raw = first.inventory_status.product_is_in_stock.trim();
        raw.parse::<bool>().map_err(|_| {
            WatchError::format(STORE_NAME, format!("productIsInStock is not a bool: {raw:?}"))
        })
    }
}

#[async_trait]
impl Source for NvidiaApiSource {
    fn identify(&self) -> Identity {
        Identity {
            product: self.product.clone(),
            store: STORE_NAME.to_string(),
            url: self.checkout_page.clone(),
        }
    }

    async fn check_availability(&self, client: &Client) -> Result<bool> {
        let body = fetch_body(client, STORE_NAME, &self.api_url()).await?;
        self.parse_availability(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    products: Products,
}

#[derive(Debug, Deserialize)]
struct Products {
    #[serde(default)]
    product: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(rename = "inventoryStatus")]
    inventory_status: InventoryStatus,
}

#[derive(Debug, Deserialize)]
struct InventoryStatus {
    #[serde(rename = "productIsInStock")]
    product_is_in_stock: String,
}
