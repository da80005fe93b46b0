// src/sources/nvidia_search.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{fetch_body, Identity, Source};
use crate::error::{Result, WatchError};

const STORE_NAME: &str = "NVIDIA Store";
const BUY_NOW: &str = "buy_now";

/// NVIDIA partner product search, matched on the numeric product id.
#[derive(Debug, Clone)]
pub struct NvidiaSearchSource {
    pub product: String,
    pub product_sku: i64,
    /// Already URL-encoded, e.g. `RTX%203080`.
    pub search: String,
}

impl NvidiaSearchSource {
    pub fn new(product: impl Into<String>, product_sku: i64, search: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            product_sku,
            search: search.into(),
        }
    }

    pub fn api_url(&self) -> String {
        format!(
            "https://api.nvidia.partners/edge/product/search?page=1&limit=9&locale=en-us&search={}&manufacturer=NVIDIA&manufacturer_filter=NVIDIA~1,ACER~0,ALIENWARE~0,ASUS~0,DELL~0,EVGA~2,GIGABYTE~2,HP~0,LENOVO~0,LG~0,MSI~3,PNY~0,RAZER~0,ZOTAC~0",
            self.search
        )
    }

    pub(crate) fn parse_availability(&self, body: &str) -> Result<bool> {
        let resp: SearchResponse =
            serde_json::from_str(body).map_err(|e| WatchError::format(STORE_NAME, e.to_string()))?;

        let found = resp
            .searched_products
            .product_details
            .iter()
            .find(|p| p.product_id == self.product_sku)
            .ok_or_else(|| {
                WatchError::semantic(STORE_NAME, format!("sku {} not found", self.product_sku))
            })?;

        tracing::debug!(
            store = STORE_NAME,
            product = %self.product,
            sku = self.product_sku,
            listed_as = %found.display_name,
            state = %found.prd_status,
            "found product status"
        );
        Ok(found.prd_status == BUY_NOW)
    }
}

#[async_trait]
impl Source for NvidiaSearchSource {
    fn identify(&self) -> Identity {
        Identity {
            product: self.product.clone(),
            store: STORE_NAME.to_string(),
            url: format!(
                "https://www.nvidia.com/en-us/shop/geforce/?page=1&limit=9&locale=en-us&manufacturer=NVIDIA&gpu={}&gpu_filter=RTX%203090~1,RTX%203080~1,RTX%203070~1,RTX%202080%20Ti~0,RTX%202080%20SUPER~0,RTX%202080~0,RTX%202070%20SUPER~0,RTX%202070~0,RTX%202060%20SUPER~1,RTX%202060~0,GTX%201660%20Ti~0,GTX%201660%20SUPER~0,GTX%201660~0,GTX%201650%20Ti~0,GTX%201650%20SUPER~0,GTX%201650~0",
                self.search
            ),
        }
    }

    async fn check_availability(&self, client: &Client) -> Result<bool> {
        let body = fetch_body(client, STORE_NAME, &self.api_url()).await?;
        self.parse_availability(&body)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "searchedProducts")]
    searched_products: SearchedProducts,
}

#[derive(Debug, Deserialize)]
struct SearchedProducts {
    #[serde(rename = "productDetails", default)]
    product_details: Vec<ProductDetail>,
}

#[derive(Debug, Deserialize)]
struct ProductDetail {
    #[serde(rename = "displayName", default)]
    display_name: String,
    #[serde(rename = "productID")]
    product_id: i64,
    #[serde(rename = "prdStatus", default)]
    prd_status: String,
}
