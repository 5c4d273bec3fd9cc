use financial_report_joiner::fetch::{fetch_and_join, ReportClient};
use financial_report_joiner::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: fetch_and_join <ticker> <ifrs|ras|both> [output.tsv]");
        std::process::exit(2);
    }

    let ticker = &args[1];
    let selector: StandardSelector = args[2].parse()?;
    let output = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| format!("{}_{}.tsv", ticker, args[2].to_lowercase()));

    println!("🌐 Fetching {:?} reports for {}...", selector, ticker);

    let client = ReportClient::new();
    let joiner = ReportJoiner::new(JoinerConfig::default())?;

    match fetch_and_join(&client, &joiner, ticker, selector).await {
        Ok(tsv) => {
            std::fs::write(&output, tsv)?;
            println!("✅ Saved to {}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            Err(e.into())
        }
    }
}
