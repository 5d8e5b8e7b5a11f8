use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use piggybank::utils::logger;
use piggybank::{GoalService, JsonStore};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "piggybank", version, about = "Track savings goals and see where your money would go")]
struct Cli {
    #[arg(long, global = true, help = "Path to the JSON data file")]
    data_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to a TOML config file")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,

    #[arg(long, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the balance and how it is provisionally split across targets
    Status,
    /// Add a savings target
    Add {
        name: String,
        price: f64,
        #[arg(long, help = "Initial weight; defaults to an equal share")]
        weight: Option<u32>,
    },
    /// Delete a target
    Remove { id: i64 },
    /// Delete every target
    Clear,
    /// Pin one target's weight percentage and rescale the others
    SetWeight { id: i64, pct: u32 },
    /// Buy a target at its full price
    Buy { id: i64 },
    /// Record money saved
    Deposit {
        amount: f64,
        #[arg(long, default_value = "General")]
        category: String,
        #[arg(long, help = "Date as YYYY-MM-DD; defaults to today")]
        date: Option<NaiveDate>,
    },
    /// Record money spent outside the targets
    Spend {
        amount: f64,
        #[arg(long, default_value = "General")]
        category: String,
        #[arg(long, help = "Date as YYYY-MM-DD; defaults to today")]
        date: Option<NaiveDate>,
    },
    /// List ledger entries, newest first
    Transactions,
    /// List purchased targets, newest first
    Purchases,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    let data_file = piggybank::config::resolve_data_file(cli.data_file.clone(), cli.config.clone())?;
    tracing::debug!(data_file = %data_file.display(), "opening store");

    let store = JsonStore::open(&data_file)
        .with_context(|| format!("failed to open data file {}", data_file.display()))?;
    let mut service = GoalService::new(store);

    match cli.command {
        Commands::Status => {
            let (total_saved, allocations) = service.status()?;
            if cli.json {
                let view = serde_json::json!({
                    "total_saved": total_saved,
                    "targets": allocations,
                });
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("Saved: {:.2}", total_saved);
                if allocations.is_empty() {
                    println!("No targets yet. Add one with `piggybank add <name> <price>`.");
                }
                for a in &allocations {
                    println!(
                        "  [{}] {:<20} {:>8.2} / {:<8.2}  {:>5.1}%  (weight {}%)",
                        a.id, a.name, a.allocated, a.price, a.progress, a.display_weight_pct
                    );
                }
            }
        }
        Commands::Add { name, price, weight } => {
            let id = service.add_target(&name, price, weight)?;
            println!("Added target [{}] {}", id, name);
        }
        Commands::Remove { id } => {
            service.remove_target(id)?;
            println!("Removed target [{}]", id);
        }
        Commands::Clear => {
            service.clear_targets()?;
            println!("Cleared all targets");
        }
        Commands::SetWeight { id, pct } => {
            service.set_weight(id, pct)?;
            println!("Set weight of target [{}] to {}%", id, pct.min(100));
        }
        Commands::Buy { id } => {
            let purchase = service.buy_target(id)?;
            println!("Bought {} for {:.2}", purchase.target_name, purchase.amount);
        }
        Commands::Deposit { amount, category, date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            service.deposit(date, amount, &category)?;
            println!("Recorded deposit of {:.2} ({})", amount, category);
        }
        Commands::Spend { amount, category, date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            service.spend(date, amount, &category)?;
            println!("Recorded spend of {:.2} ({})", amount, category);
        }
        Commands::Transactions => {
            let transactions = service.transactions()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&transactions)?);
            } else if transactions.is_empty() {
                println!("No transactions yet.");
            } else {
                for t in &transactions {
                    println!("  [{}] {}  {:>10.2}  {}", t.id, t.date, t.amount, t.category);
                }
            }
        }
        Commands::Purchases => {
            let purchases = service.purchases()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&purchases)?);
            } else if purchases.is_empty() {
                println!("No purchases yet.");
            } else {
                for p in &purchases {
                    println!(
                        "  [{}] {}  {:>10.2}  {}",
                        p.id,
                        p.purchased_at.format("%Y-%m-%d"),
                        p.amount,
                        p.target_name
                    );
                }
            }
        }
    }

    Ok(())
}
