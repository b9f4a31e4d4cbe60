mod common;
use common::{get_client, init_tracing};
use finquote::SummaryModule;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let client = get_client()?;
    let aapl = client.ticker("AAPL");

    // Default modules, flattened into one map.
    let info = aapl.info().await?;
    println!(
        "{} ({}) on {}",
        info.long_name().unwrap_or("?"),
        info.symbol().unwrap_or("?"),
        info.exchange().unwrap_or("?"),
    );
    println!("sector:        {}", info.sector().unwrap_or("-"));
    println!("industry:      {}", info.industry().unwrap_or("-"));
    if let Some(p) = info.current_price() {
        println!("current price: {p} {}", info.currency().unwrap_or(""));
    }
    if let Some(m) = info.market_cap() {
        println!("market cap:    {m}");
    }

    // A narrower request: just the price module.
    let price_only = aapl.info_with(&[SummaryModule::Price]).await?;
    println!("\nprice module has {} fields:", price_only.len());
    for (k, v) in price_only.iter() {
        println!("  {k} = {v}");
    }

    Ok(())
}
