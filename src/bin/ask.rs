use clap::Parser;
use conceptmap::skill::{Card, ResponseEnvelope};
use conceptmap::{ClaimsQuery, Config, IntentOrchestrator};

#[derive(Parser, Debug)]
#[command(name = "ask")]
#[command(about = "Answer one Concept Map claims question from the terminal")]
struct Args {
    /// Item name as it would be spoken, e.g. "Lionel Messi"
    #[arg(short, long)]
    item: String,

    /// Relationship as it would be spoken, e.g. "team"
    #[arg(short, long)]
    relationship: String,

    /// Use built-in defaults instead of loading config.toml
    #[arg(long)]
    no_config: bool,

    /// Print the full response envelope as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn")).init();

    let args = Args::parse();
    if args.item.trim().is_empty() || args.relationship.trim().is_empty() {
        anyhow::bail!("--item and --relationship must not be empty");
    }

    let config = if args.no_config {
        Config::default()
    } else {
        Config::load()?
    };

    let orchestrator = IntentOrchestrator::from_config(&config)?;
    let response = orchestrator
        .answer_claims(&ClaimsQuery::new(args.item, args.relationship))
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ResponseEnvelope::new(response))?);
        return Ok(());
    }

    println!("{}", response.speech_text().unwrap_or_default());
    if let Some(Card::Standard { image, .. }) = &response.card {
        if let Some(url) = &image.large_image_url {
            println!("Image: {}", url);
        }
    }

    Ok(())
}
