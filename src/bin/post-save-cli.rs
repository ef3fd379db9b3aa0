use clap::{Parser, Subcommand};
use serde_json::Value;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "post-save-cli")]
#[command(about = "Client for the post-save demo service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a record and report how long the request took
    Create,
    /// List stored records
    List,
    /// Show service health and handler invocation count
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Create => {
            let start = Instant::now();
            let res = client.post(format!("{}/create", cli.url)).send().await?;
            let status = res.status();
            let body = res.text().await?;
            let elapsed = start.elapsed();

            if status.is_success() {
                println!("{} ({:.2?})", body, elapsed);
            } else {
                eprintln!("Error: service returned status {} after {:.2?}", status, elapsed);
                eprintln!("Response: {}", body);
            }
        }
        Commands::List => {
            let res = client.get(format!("{}/records", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
