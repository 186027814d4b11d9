// Direct backend commands: trade history and settings
use std::collections::BTreeMap;
use tracing::info;
use trade_dashboard::{Config, DashboardApi, DashboardError, DashboardResult, TradeRecord};

pub async fn show_history(limit: usize, config: &Config) -> DashboardResult<()> {
    let api = DashboardApi::new(&config.backend.base_url);
    let trades = api.fetch_trades().await?;

    info!("📋 Recent Trades");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if trades.is_empty() {
        info!("  No trades recorded yet");
    }

    for trade in trades.iter().take(limit) {
        info!("  {}", format_trade(trade));
    }

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("Total: {} trades", trades.len().min(limit));
    Ok(())
}

fn format_trade(trade: &TradeRecord) -> String {
    let when = trade.executed_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .or_else(|| trade.timestamp.clone())
        .unwrap_or_else(|| "-".to_string());
    let num = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
    let pnl = match trade.pnl_value() {
        Some(p) if p > 0.0 => format!("+{:.2}", p),
        Some(p) => format!("{:.2}", p),
        None => "-".to_string(),
    };

    format!(
        "{} {:<5} price={} qty={} status={} pnl={}",
        when,
        trade.side.as_deref().unwrap_or("-"),
        num(trade.price()),
        num(trade.quantity()),
        trade.status.as_deref().unwrap_or("-"),
        pnl,
    )
}

pub async fn show_settings(config: &Config) -> DashboardResult<()> {
    let api = DashboardApi::new(&config.backend.base_url);
    let settings = api.fetch_settings().await?;

    info!("⚙️  Backend Settings");
    for (section, options) in &settings {
        info!("[{}]", section);
        for (key, value) in options {
            info!("  {} = {}", key, value);
        }
    }
    Ok(())
}

pub async fn set_settings(assignments: &[String], config: &Config) -> DashboardResult<()> {
    let options = parse_assignments(assignments)?;
    let api = DashboardApi::new(&config.backend.base_url);
    api.save_settings(&options).await?;
    info!("✅ Saved {} setting(s)", options.len());
    Ok(())
}

fn parse_assignments(assignments: &[String]) -> DashboardResult<BTreeMap<String, String>> {
    let mut options = BTreeMap::new();
    for assignment in assignments {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            DashboardError::ConfigValidation(format!("expected key=value, got '{}'", assignment))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DashboardError::ConfigValidation(format!("empty key in '{}'", assignment)));
        }
        options.insert(key.to_string(), value.trim().to_string());
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignments() {
        let opts = parse_assignments(&["leverage=5".to_string(), " stop_loss = 1.5".to_string()]).unwrap();
        assert_eq!(opts.get("leverage").map(String::as_str), Some("5"));
        assert_eq!(opts.get("stop_loss").map(String::as_str), Some("1.5"));

        assert!(parse_assignments(&["leverage".to_string()]).is_err());
        assert!(parse_assignments(&["=5".to_string()]).is_err());
    }
}
