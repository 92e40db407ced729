use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the outage gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, env = "GATEWAY_ADMIN_KEY", default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Overall gateway status
    Status,
    /// Circuit breaker state per operation
    Circuits,
    /// Liveness and database readiness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/admin/status", base)).headers(headers).send().await?;
            print_response(res).await?;
        }
        Commands::Circuits => {
            let res = client.get(format!("{}/admin/circuits", base)).headers(headers).send().await?;
            print_response(res).await?;
        }
        Commands::Health => {
            for path in ["/health/live", "/health/ready"] {
                let res = client.get(format!("{}{}", base, path)).send().await?;
                println!("{} -> {}", path, res.status());
                print_response(res).await?;
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) if status.is_success() => println!("{}", serde_json::to_string_pretty(&json)?),
        _ => {
            eprintln!("Error: gateway returned status {}", status);
            eprintln!("Response: {}", text);
        }
    }
    Ok(())
}
