// Synchronizer-driven commands: live watch and one-shot order/status
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use trade_dashboard::{
    Config, DashboardApi, DashboardError, DashboardResult, LogView, OperatorCommand, OrderSide,
    Synchronizer, SystemClock,
};

const MAX_SYNC_ATTEMPTS: u32 = 3;

pub async fn watch(config: &Config) -> DashboardResult<()> {
    info!("👀 Watching {} (commands: buy, sell, close, auto, strategy <name>, quit)", config.backend.base_url);

    let sync = new_synchronizer(config);
    let (tx, rx) = mpsc::channel(16);

    let ctrl_c_tx = tx.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = ctrl_c_tx.send(OperatorCommand::Shutdown).await;
        }
    });
    let reader = tokio::spawn(read_operator_commands(tx));

    let result = sync.run(rx).await;
    reader.abort();
    ctrl_c.abort();
    result.map(|_| ())
}

pub async fn place_order(side: &str, config: &Config) -> DashboardResult<()> {
    let side: OrderSide = side.parse()?;
    let mut sync = new_synchronizer(config);

    sync.start();
    pump_until(&mut sync, config, |s| s.snapshot().synced).await?;

    sync.submit(side)?;
    pump_until(&mut sync, config, |s| !s.snapshot().order_lock.is_held()).await?;

    report(&sync);
    Ok(())
}

pub async fn show_status(config: &Config) -> DashboardResult<()> {
    let mut sync = new_synchronizer(config);
    sync.start();
    pump_until(&mut sync, config, |s| s.snapshot().synced).await?;
    report(&sync);
    Ok(())
}

fn new_synchronizer(config: &Config) -> Synchronizer<LogView> {
    let api = DashboardApi::new(&config.backend.base_url);
    let view = LogView::new(config.logging.log_price_ticks);
    Synchronizer::new(api, config, view, Arc::new(SystemClock))
}

/// Apply events until `done` holds. A quiet position interval counts as a
/// missed poll and issues one, like the live dashboard would.
async fn pump_until<F>(sync: &mut Synchronizer<LogView>, config: &Config, done: F) -> DashboardResult<()>
where
    F: Fn(&Synchronizer<LogView>) -> bool,
{
    let wait: Duration = config.polling.position_interval();
    let mut attempts = 0;

    while !done(&*sync) {
        match tokio::time::timeout(wait, sync.pump()).await {
            Ok(true) => {}
            Ok(false) => return Err(DashboardError::Internal("event channel closed".to_string())),
            Err(_) => {
                attempts += 1;
                if attempts >= MAX_SYNC_ATTEMPTS {
                    return Err(DashboardError::Transport(format!(
                        "no authoritative state from {} after {} attempts",
                        config.backend.base_url, attempts
                    )));
                }
                warn!("⏳ Still waiting for backend state, polling again");
                sync.on_position_tick();
            }
        }
    }
    Ok(())
}

fn report(sync: &Synchronizer<LogView>) {
    let snapshot = sync.snapshot();
    let controls = sync.controls();
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("📊 Position: {}", snapshot.position);
    if let Some(balance) = snapshot.balance {
        info!("💷 Balance: {:.2}", balance);
    }
    if let Some(until) = snapshot.lockout.until() {
        info!("🔒 Locked until {:.0}", until);
    } else if snapshot.lockout.is_active() {
        info!("🔒 Locked (no expiry reported)");
    }
    info!(
        "🎛️  buy={} sell={} close={}",
        controls.flags.buy, controls.flags.sell, controls.flags.close
    );
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

async fn read_operator_commands(tx: mpsc::Sender<OperatorCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match parse_operator_command(&line) {
            Ok(Some(command)) => {
                let stop = command == OperatorCommand::Shutdown;
                if tx.send(command).await.is_err() || stop {
                    break;
                }
            }
            Ok(None) => {}
            Err(msg) => warn!("⚠️  {}", msg),
        }
    }
}

pub fn parse_operator_command(line: &str) -> Result<Option<OperatorCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "buy" => OperatorCommand::Submit(OrderSide::Buy),
        "sell" => OperatorCommand::Submit(OrderSide::Sell),
        "close" => OperatorCommand::Submit(OrderSide::Close),
        "auto" => OperatorCommand::ToggleAutoTrading,
        "strategy" => match parts.next() {
            Some(name) => OperatorCommand::SelectStrategy(name.to_string()),
            None => return Err("usage: strategy <simple|ma|rsi|combined>".to_string()),
        },
        "quit" | "exit" => OperatorCommand::Shutdown,
        other => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operator_commands() {
        assert_eq!(parse_operator_command("BUY"), Ok(Some(OperatorCommand::Submit(OrderSide::Buy))));
        assert_eq!(parse_operator_command("  close "), Ok(Some(OperatorCommand::Submit(OrderSide::Close))));
        assert_eq!(
            parse_operator_command("strategy rsi"),
            Ok(Some(OperatorCommand::SelectStrategy("rsi".to_string())))
        );
        assert_eq!(parse_operator_command(""), Ok(None));
        assert!(parse_operator_command("strategy").is_err());
        assert!(parse_operator_command("hodl").is_err());
    }
}
