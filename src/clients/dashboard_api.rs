// HTTP client for the trading bot backend

use crate::core::model::PositionUpdate;
use crate::core::position_status::parse_position_report;
use crate::core::price_feed::{parse_price, PriceSample};
use crate::core::types::{OrderSide, StrategyKind};
use crate::error::{DashboardError, DashboardResult};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Thin wrapper over the backend's JSON endpoints. Cheap to clone; every
/// in-flight request owns its own handle.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: reqwest::Client,
    base_url: String,
}

impl DashboardApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/price`
    pub async fn fetch_price(&self) -> DashboardResult<PriceSample> {
        let body = self.get_json("/api/price").await?;
        parse_price(&body)
    }

    /// `GET /api/position`
    pub async fn fetch_position(&self) -> DashboardResult<PositionUpdate> {
        let body = self.get_json("/api/position").await?;
        parse_position_report(&body)
    }

    /// `GET /api/restore`, same shape as the position report
    pub async fn restore(&self) -> DashboardResult<PositionUpdate> {
        let body = self.get_json("/api/restore").await?;
        parse_position_report(&body)
    }

    /// `POST /api/quick_order`. Returns the backend's message on success.
    pub async fn quick_order(&self, side: OrderSide) -> DashboardResult<Option<String>> {
        let body = self.post_json("/api/quick_order", &json!({ "side": side.as_wire() })).await?;
        parse_command_response(&body)
    }

    /// `POST /api/auto_trading`; the response body carries nothing we act on
    pub async fn set_auto_trading(&self, enabled: bool) -> DashboardResult<()> {
        self.post_json("/api/auto_trading", &json!({ "enabled": enabled })).await?;
        Ok(())
    }

    /// `POST /api/update_strategy`
    pub async fn update_strategy(&self, strategy: StrategyKind) -> DashboardResult<Option<String>> {
        let body = self.post_json("/api/update_strategy", &json!({ "strategy": strategy.as_wire() })).await?;
        parse_command_response(&body)
    }

    /// `GET /api/trades`, most recent trades as recorded by the backend
    pub async fn fetch_trades(&self) -> DashboardResult<Vec<TradeRecord>> {
        let body = self.get_json("/api/trades").await?;
        if body.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(body)?)
    }

    /// `GET /api/get_config`, settings grouped by section
    pub async fn fetch_settings(&self) -> DashboardResult<BTreeMap<String, BTreeMap<String, String>>> {
        let body = self.get_json("/api/get_config").await?;
        let sections = body.as_object()
            .ok_or_else(|| DashboardError::Format("settings body is not an object".to_string()))?;

        let mut settings = BTreeMap::new();
        for (section, options) in sections {
            let Some(options) = options.as_object() else { continue };
            let values = options
                .iter()
                .map(|(k, v)| (k.clone(), value_to_setting(v)))
                .collect();
            settings.insert(section.clone(), values);
        }
        Ok(settings)
    }

    /// `POST /api/save_config` with a flat option map for the trading section
    pub async fn save_settings(&self, options: &BTreeMap<String, String>) -> DashboardResult<()> {
        let body = self.post_json("/api/save_config", &json!(options)).await?;
        parse_command_response(&body).map(|_| ())
    }

    async fn get_json(&self, path: &str) -> DashboardResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| DashboardError::Transport(e.to_string()))?;

        read_json(response).await
    }

    async fn post_json(&self, path: &str, payload: &Value) -> DashboardResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} {}", url, payload);

        let response = self.client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| DashboardError::Transport(e.to_string()))?;

        read_json(response).await
    }
}

/// Read a JSON body. The backend answers errors with a JSON body too, so the
/// HTTP status only matters when the body cannot be parsed.
async fn read_json(response: reqwest::Response) -> DashboardResult<Value> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| DashboardError::Transport(e.to_string()))?;

    match serde_json::from_str::<Value>(&text) {
        Ok(body) => Ok(body),
        Err(_) if !status.is_success() => {
            Err(DashboardError::ServerRejection(format!("HTTP {}", status.as_u16())))
        }
        Err(e) => Err(e.into()),
    }
}

/// `{ status: "success" | other, message? }`
pub fn parse_command_response(body: &Value) -> DashboardResult<Option<String>> {
    let message = body.get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(|m| m.to_string());

    match body.get("status").and_then(|s| s.as_str()) {
        Some("success") => Ok(message),
        _ => Err(DashboardError::ServerRejection(message.unwrap_or_default())),
    }
}

fn value_to_setting(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_to_f64(value: &Option<Value>) -> Option<f64> {
    match value.as_ref()? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// One row of the backend's trade log. Numeric columns arrive as numbers or
/// strings depending on how the row was written.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub order_id: Option<Value>,
    #[serde(default)]
    pub order_price: Option<Value>,
    #[serde(default)]
    pub order_qty: Option<Value>,
    #[serde(default)]
    pub exec_price: Option<Value>,
    #[serde(default)]
    pub exec_qty: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub pnl: Option<Value>,
    #[serde(default)]
    pub fee: Option<Value>,
}

impl TradeRecord {
    /// Executed price, falling back to the order price
    pub fn price(&self) -> Option<f64> {
        value_to_f64(&self.exec_price).or_else(|| value_to_f64(&self.order_price))
    }

    /// Executed quantity, falling back to the order quantity
    pub fn quantity(&self) -> Option<f64> {
        value_to_f64(&self.exec_qty).or_else(|| value_to_f64(&self.order_qty))
    }

    pub fn pnl_value(&self) -> Option<f64> {
        value_to_f64(&self.pnl)
    }

    pub fn fee_value(&self) -> Option<f64> {
        value_to_f64(&self.fee)
    }

    /// Backend timestamps are naive ISO-8601 local times
    pub fn executed_at(&self) -> Option<NaiveDateTime> {
        let ts = self.timestamp.as_deref()?;
        NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}
