use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use eaiser::config::SettingsUpdate;
use eaiser::App;

#[derive(Parser)]
#[command(name = "eaiser")]
#[command(about = "Local-first notes with categories, attachments, and an AI assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all categories
    Categories,
    /// List notes, optionally scoped to a category and its subtree
    Notes {
        #[arg(short, long)]
        category: Option<Uuid>,
    },
    /// Print the markdown body of a note
    Show { id: Uuid },
    /// Execute a script note and print its output
    Run { id: Uuid },
    /// Ask the AI assistant, optionally with a category's notes as context
    Chat {
        prompt: String,
        #[arg(short, long)]
        category: Option<Uuid>,
    },
    /// Show the current AI configuration
    Config,
    /// Update AI configuration fields; omitted fields are left unchanged
    SetConfig {
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        api_url: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "eaiser=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let app = App::init()?;

    match cli.command {
        Commands::Categories => {
            for category in app.db.list_categories()? {
                println!("{}  {}", category.id, category.name);
            }
        }
        Commands::Notes { category } => {
            for note in app.db.list_notes(category)? {
                println!("{}  [{}] {}", note.id, note.kind.as_str(), note.title);
            }
        }
        Commands::Show { id } => {
            println!("{}", app.db.note_content(id)?);
        }
        Commands::Run { id } => {
            let outcome = eaiser::script::run(&app.db, id).await?;
            print!("{}", outcome.stdout);
            eprint!("{}", outcome.stderr);
            if let Some(message) = outcome.error {
                eprintln!("{message}");
            }
            if !outcome.success {
                std::process::exit(1);
            }
        }
        Commands::Chat { prompt, category } => {
            let contexts = match category {
                Some(id) => {
                    let aggregated = app.db.aggregate_category_content(id)?;
                    if aggregated.is_empty() {
                        Vec::new()
                    } else {
                        vec![aggregated]
                    }
                }
                None => Vec::new(),
            };
            println!("{}", app.chat.chat(&prompt, &contexts).await?);
        }
        Commands::Config => {
            let settings = app.config.get();
            println!("apiURL: {}", settings.api_url);
            println!("model:  {}", settings.model);
            println!(
                "apiKey: {}",
                if settings.api_key.is_empty() { "(unset)" } else { "(set)" }
            );
        }
        Commands::SetConfig {
            api_key,
            api_url,
            model,
        } => {
            app.config.set(SettingsUpdate {
                api_key,
                api_url,
                model,
            })?;
            println!("config updated: {}", app.config.path().display());
        }
    }

    Ok(())
}
