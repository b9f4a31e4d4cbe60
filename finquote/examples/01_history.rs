mod common;
use common::{get_client, init_tracing};
use finquote::{ChartRequest, Interval, Period};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // 1. Build the client (mock in CI when FINQUOTE_EXAMPLES_USE_MOCK is set).
    let client = get_client()?;
    let msft = client.ticker("MSFT");

    // 2. Three months of daily bars with dividends and splits.
    let req = ChartRequest::default()
        .period(Period::M3)
        .interval(Interval::D1);
    println!("Fetching history for {}...", msft.symbol());
    let rows = match msft.history_with(&req).await {
        Err(e) if e.is_auth_rejection() => {
            // 3. A stale crumb: refresh once and retry.
            client.credentials().refresh().await?;
            msft.history_with(&req).await?
        }
        other => other?,
    };

    // 4. Print bars with corporate actions.
    for r in &rows {
        let mut line = format!(
            "{}  O {:>10}  H {:>10}  L {:>10}  C {:>10}  V {:>12}",
            r.timestamp.format("%Y-%m-%d"),
            r.open,
            r.high,
            r.low,
            r.close,
            r.volume
        );
        if !r.dividends.is_zero() {
            line.push_str(&format!("  div {}", r.dividends));
        }
        if !r.stock_splits.is_zero() {
            line.push_str(&format!("  split {}", r.stock_splits));
        }
        println!("{line}");
    }
    println!("{} bars", rows.len());

    Ok(())
}
