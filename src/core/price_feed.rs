// Price feed sampling: parse `/api/price` bodies and derive the change

use crate::core::model::TradeStatusModel;
use crate::core::types::{PriceChange, PriceDirection, PriceTick};
use crate::error::{DashboardError, DashboardResult};
use serde_json::Value;

/// Raw sample as returned by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSample {
    pub display: String,
    pub price: f64,
}

/// Parse `{ "price": string|number }`. A missing, null, empty or
/// non-numeric price is a format error and must not touch the model.
pub fn parse_price(body: &Value) -> DashboardResult<PriceSample> {
    let raw = body.get("price")
        .ok_or_else(|| DashboardError::Format("missing price field".to_string()))?;

    let display = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => return Err(DashboardError::Format(format!("unexpected price value: {}", other))),
    };

    let price = display.parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| DashboardError::Format(format!("price is not numeric: '{}'", display)))?;

    Ok(PriceSample { display, price })
}

/// Percent move from `last` to `current`; none without a usable baseline
pub fn percent_change(last: Option<f64>, current: f64) -> Option<PriceChange> {
    let last = last.filter(|l| *l != 0.0)?;
    let delta = current - last;
    Some(PriceChange {
        percent: delta / last * 100.0,
        direction: PriceDirection::classify(delta),
    })
}

/// Shift the sample into the model and build the view tick
pub fn apply_sample(model: &mut TradeStatusModel, sample: PriceSample) -> PriceTick {
    let last = model.record_price(sample.price);
    PriceTick {
        change: percent_change(last, sample.price),
        display: sample.display,
        price: sample.price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_string_and_number() {
        let sample = parse_price(&json!({ "price": "0.5123" })).unwrap();
        assert_eq!(sample.display, "0.5123");
        assert_eq!(sample.price, 0.5123);

        let sample = parse_price(&json!({ "price": 64000.5 })).unwrap();
        assert_eq!(sample.price, 64000.5);
    }

    #[test]
    fn test_parse_rejects_bad_bodies() {
        assert!(parse_price(&json!({})).is_err());
        assert!(parse_price(&json!({ "price": null })).is_err());
        assert!(parse_price(&json!({ "price": "" })).is_err());
        assert!(parse_price(&json!({ "price": "n/a" })).is_err());
    }

    #[test]
    fn test_first_sample_has_no_change() {
        let mut model = TradeStatusModel::new();
        let tick = apply_sample(&mut model, PriceSample { display: "100".into(), price: 100.0 });
        assert!(tick.change.is_none());
    }

    #[test]
    fn test_change_classification() {
        let mut model = TradeStatusModel::new();
        apply_sample(&mut model, PriceSample { display: "100".into(), price: 100.0 });

        let tick = apply_sample(&mut model, PriceSample { display: "102".into(), price: 102.0 });
        let change = tick.change.unwrap();
        assert_eq!(change.direction, PriceDirection::Up);
        assert!((change.percent - 2.0).abs() < 1e-9);

        let tick = apply_sample(&mut model, PriceSample { display: "102".into(), price: 102.0 });
        assert_eq!(tick.change.unwrap().direction, PriceDirection::Flat);

        let tick = apply_sample(&mut model, PriceSample { display: "51".into(), price: 51.0 });
        let change = tick.change.unwrap();
        assert_eq!(change.direction, PriceDirection::Down);
        assert!((change.percent + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_baseline_skips_change() {
        assert!(percent_change(Some(0.0), 10.0).is_none());
    }
}
