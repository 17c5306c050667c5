use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "hostwatch-cli")]
#[command(about = "Control CLI for the hostwatch daemon", long_about = None)]
struct Cli {
    /// Base URL of the daemon's control endpoint.
    #[arg(short, long, default_value = "http://localhost:7700")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start (or restart) monitoring a host
    Start {
        host: String,
        /// Register the host as already down
        #[arg(long)]
        down: bool,
    },
    /// Stop monitoring a host
    Stop { host: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Start { host, down } => {
            client
                .put(format!("{}/{}", base, host))
                .query(&[("down", down)])
                .send()
                .await?
        }
        Commands::Stop { host } => client.delete(format!("{}/{}", base, host)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: control endpoint returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
