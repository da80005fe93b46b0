// src/sources/bestbuy.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use super::{fetch_body, Identity, Source};
use crate::error::{Result, WatchError};

const STORE_NAME: &str = "Best Buy";
const ADD_TO_CART: &str = "ADD_TO_CART";

/// Best Buy button state for one sku, scoped to a zip code and a pickup store.
#[derive(Debug, Clone)]
pub struct BestBuySource {
    pub product: String,
    pub sku_id: u64,
    pub zip: String,
    pub store_id: u64,
}

impl BestBuySource {
    pub fn new(product: impl Into<String>, sku_id: u64, zip: impl Into<String>, store_id: u64) -> Self {
        Self {
            product: product.into(),
            sku_id,
            zip: zip.into(),
            store_id,
        }
    }

    /// Falcor-style JSON graph query for the "buttonstate" path of this sku.
    pub fn api_url(&self) -> String {
        format!(
            "https://www.bestbuy.com/api/tcfb/model.json?paths=%5B%5B%22shop%22%2C%22buttonstate%22%2C%22v5%22%2C%22item%22%2C%22skus%22%2C{sku}%2C%22conditions%22%2C%22NONE%22%2C%22destinationZipCode%22%2C{zip}%2C%22storeId%22%2C{store}%2C%22context%22%2C%22cyp%22%2C%22addAll%22%2C%22false%22%5D%5D&method=get",
            sku = self.sku_id,
            zip = self.zip,
            store = self.store_id,
        )
    }

    pub(crate) fn parse_availability(&self, body: &str) -> Result<bool> {
        let graph: Response =
            serde_json::from_str(body).map_err(|e| WatchError::format(STORE_NAME, e.to_string()))?;

        let sku_key = self.sku_id.to_string();
        let store_key = self.store_id.to_string();

        let missing = |what: &str, key: &str| {
            tracing::debug!(store = STORE_NAME, body, "response body");
            WatchError::semantic(STORE_NAME, format!("missing {what} {key} in response"))
        };

        let sku = graph
            .json_graph
            .shop
            .buttonstate
            .v5
            .item
            .skus
            .get(&sku_key)
            .ok_or_else(|| missing("sku", sku_key.as_str()))?;
        let zip = sku
            .conditions
            .none
            .destination_zip_code
            .get(&self.zip)
            .ok_or_else(|| missing("zip", self.zip.as_str()))?;
        let store = zip
            .store_id
            .get(&store_key)
            .ok_or_else(|| missing("store", store_key.as_str()))?;
        let add_all = store
            .context
            .cyp
            .add_all
            .get("false")
            .ok_or_else(|| missing("addAll", "false"))?;

        let info = add_all
            .value
            .button_state_response_infos
            .iter()
            .find(|p| p.sku_id == sku_key)
            .ok_or_else(|| WatchError::semantic(STORE_NAME, format!("sku {sku_key} not found")))?;

        tracing::debug!(
            store = STORE_NAME,
            product = %self.product,
            sku = self.sku_id,
            state = %info.button_state,
            "found button state"
        );
        Ok(info.button_state == ADD_TO_CART)
    }
}

#[async_trait]
impl Source for BestBuySource {
    fn identify(&self) -> Identity {
        Identity {
            product: self.product.clone(),
            store: STORE_NAME.to_string(),
            url: format!(
                "https://www.bestbuy.com/site/{sku}.p?skuId={sku}",
                sku = self.sku_id
            ),
        }
    }

    async fn check_availability(&self, client: &Client) -> Result<bool> {
        let body = fetch_body(client, STORE_NAME, &self.api_url()).await?;
        self.parse_availability(&body)
    }
}

// --- response schema (only the path we query) ---

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(rename = "jsonGraph")]
    json_graph: JsonGraph,
}

#[derive(Debug, Deserialize)]
struct JsonGraph {
    shop: Shop,
}

#[derive(Debug, Deserialize)]
struct Shop {
    buttonstate: ButtonState,
}

#[derive(Debug, Deserialize)]
struct ButtonState {
    v5: V5,
}

#[derive(Debug, Deserialize)]
struct V5 {
    #[serde(alias = "Item")]
    item: Item,
}

#[derive(Debug, Deserialize)]
struct Item {
    skus: HashMap<String, SkuEntry>,
}

#[derive(Debug, Deserialize)]
struct SkuEntry {
    conditions: Conditions,
}

#[derive(Debug, Deserialize)]
struct Conditions {
    #[serde(rename = "NONE")]
    none: NoCondition,
}

#[derive(Debug, Deserialize)]
struct NoCondition {
    #[serde(rename = "destinationZipCode")]
    destination_zip_code: HashMap<String, ZipEntry>,
}

#[derive(Debug, Deserialize)]
struct ZipEntry {
    #[serde(rename = "storeId")]
    store_id: HashMap<String, StoreEntry>,
}

#[derive(Debug, Deserialize)]
struct StoreEntry {
    context: StoreContext,
}

#[derive(Debug, Deserialize)]
struct StoreContext {
    cyp: Cyp,
}

#[derive(Debug, Deserialize)]
struct Cyp {
    #[serde(rename = "addAll")]
    add_all: HashMap<String, AddAllEntry>,
}

#[derive(Debug, Deserialize)]
struct AddAllEntry {
    value: Value,
}

#[derive(Debug, Deserialize)]
struct Value {
    #[serde(rename = "buttonStateResponseInfos", default)]
    button_state_response_infos: Vec<ButtonStateInfo>,
}

#[derive(Debug, Deserialize)]
struct ButtonStateInfo {
    #[serde(rename = "skuId")]
    sku_id: String,
    #[serde(rename = "buttonState")]
    button_state: String,
}
