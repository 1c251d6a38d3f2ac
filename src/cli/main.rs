use clap::{Parser, Subcommand};
use licita_kb::tagging::detect_tags;
use reqwest::Client;
use std::error::Error;

#[derive(Parser)]
#[command(name = "licita-kb-cli")]
#[command(about = "Procurement knowledge base CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "LICITA_KB_ENDPOINT", default_value = "http://localhost:8000")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect tags in a text, offline
    Tags {
        #[arg(value_name = "TEXT", required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Ranked search with suggested tags
    Search {
        #[arg(value_name = "QUERY", required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// List entries, best voted first
    List {
        #[arg(short, long)]
        modalidade: Option<String>,

        #[arg(short, long)]
        tag: Option<String>,

        #[arg(short, long)]
        busca: Option<String>,

        #[arg(short, long, default_value = "20")]
        limite: usize,

        #[arg(short, long, default_value = "0")]
        offset: usize,
    },

    /// Get entry details
    Get {
        #[arg(value_name = "ENTRY_ID")]
        id: u64,
    },

    /// Show knowledge base statistics
    Stats,

    /// Check server health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Tags { text } => {
            let tags = detect_tags(&text.join(" "));
            if tags.is_empty() {
                println!("(nenhuma tag detectada)");
            }
            for tag in tags {
                println!("{}", tag);
            }
        }

        Commands::Search { query } => {
            let response = client
                .get(format!("{}/buscar-inteligente", cli.endpoint))
                .query(&[("q", query.join(" "))])
                .send()
                .await?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::List {
            modalidade,
            tag,
            busca,
            limite,
            offset,
        } => {
            let mut params: Vec<(&str, String)> = vec![
                ("limite", limite.to_string()),
                ("offset", offset.to_string()),
            ];
            if let Some(modalidade) = modalidade {
                params.push(("modalidade", modalidade));
            }
            if let Some(tag) = tag {
                params.push(("tag", tag));
            }
            if let Some(busca) = busca {
                params.push(("busca", busca));
            }

            let response = client
                .get(format!("{}/conhecimentos", cli.endpoint))
                .query(&params)
                .send()
                .await?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Get { id } => {
            let response = client
                .get(format!("{}/conhecimentos/{}", cli.endpoint, id))
                .send()
                .await?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Stats => {
            let response = client
                .get(format!("{}/estatisticas", cli.endpoint))
                .send()
                .await?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Health => {
            let response = client
                .get(format!("{}/health", cli.endpoint))
                .send()
                .await?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
