//! Interactive Dungeon Master REPL.
//!
//! Forwards each line of player input to the DM agent and prints the
//! reply. World data comes from a JSON file; the chat backend is
//! configured through the environment.

use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use wuxia_core::{sample_world, Config, DmAgent, DmConfig, Generator, MemoryStore};

#[derive(Parser)]
#[command(name = "wuxia-dm", about = "Interactive wuxia Dungeon Master")]
struct Args {
    /// Path to the JSON world file (overrides DM_WORLD_FILE)
    #[arg(long)]
    world: Option<PathBuf>,

    /// Guideline set to load (overrides DM_GUIDELINE_SET)
    #[arg(long)]
    guideline: Option<String>,

    /// Focus character (overrides DM_FOCUS_CHARACTER)
    #[arg(long)]
    character: Option<String>,

    /// Chat model override (overrides DM_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Write the seeded sample world to the world file and exit
    #[arg(long)]
    sample: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(world) = args.world {
        config.world_path = world;
    }
    if let Some(guideline) = args.guideline {
        config.guideline_name = guideline;
    }
    if let Some(character) = args.character {
        config.focus_character = character;
    }
    if let Some(model) = args.model {
        config.model = Some(model);
    }

    if args.sample {
        sample_world().save_json(&config.world_path)?;
        println!("Sample world written to {}", config.world_path.display());
        return Ok(());
    }

    let store = Arc::new(MemoryStore::load(&config.world_path)?);

    let generator = config.api_key.as_deref().map(|key| {
        let mut client = openai::Client::new(key);
        if let Some(model) = &config.model {
            client = client.with_model(model);
        }
        Arc::new(client) as Arc<dyn Generator>
    });
    if generator.is_none() {
        eprintln!("OPENAI_API_KEY not set; AI narration is disabled.");
    }

    let agent = DmAgent::new(
        store,
        generator,
        DmConfig {
            guideline_name: config.guideline_name,
            focus_character: config.focus_character,
        },
    );

    println!("Wuxia DM ready. Type 'quit' to exit.");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();
    loop {
        print!("\n> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "quit" | "exit" | "salir") {
            break;
        }

        let reply = agent.respond_to(input).await;
        println!("{reply}");
    }

    Ok(())
}
