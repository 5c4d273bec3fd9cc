use financial_report_joiner::*;
use std::path::Path;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: join_files <annual.csv> <quarterly.csv> <output.tsv> [config.json]");
        std::process::exit(2);
    }

    let config = match args.get(4) {
        Some(path) => JoinerConfig::from_path(Path::new(path))?,
        None => JoinerConfig::default(),
    };
    let joiner = ReportJoiner::new(config)?;

    let annual = std::fs::read_to_string(&args[1])?;
    let quarterly = std::fs::read_to_string(&args[2])?;

    let table = joiner.join_documents(&annual, &quarterly)?;
    std::fs::write(&args[3], table.to_tsv()?)?;

    println!("📊 Joined {} metrics across {} periods", table.rows().len(), table.columns().len());
    println!("   Columns: {}", table.columns().as_slice().join(", "));
    println!("✅ Saved to {}", args[3]);

    Ok(())
}
