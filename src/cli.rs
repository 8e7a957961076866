use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use imagesapi::OpenAiImages;
use tracing_subscriber::EnvFilter;

use crate::commands::generate::generate_for_session;
use crate::commands::library::{list_images, refresh_images};
use crate::commands::providers::{
    ProviderEdit, provider_catalog, restore_session, switch_provider, update_provider_config,
};
use crate::constants::{DEFAULT_NAME_PREFIX, LOG_FILTER_ENV};
use crate::models::ImageEntry;
use crate::session::Session;
use crate::settings::SettingsStore;

#[derive(Debug, Parser)]
#[command(
    name = "prompt-gallery",
    version,
    about = "Browse an image folder and save images generated from a prompt"
)]
pub struct Cli {
    /// Settings file holding per-provider endpoints and keys
    #[arg(long, global = true, env = "PROMPT_GALLERY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List images in a directory, newest first
    List { dir: Option<PathBuf> },
    /// Generate one image and save it with the next free sequence number
    Generate(GenerateArgs),
    /// Show the built-in provider presets
    Providers,
    /// Inspect or change the active provider
    #[command(subcommand)]
    Provider(ProviderCommand),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[arg(long)]
    prompt: String,
    /// Image directory; also the output directory unless --save-dir is given
    #[arg(long)]
    dir: Option<PathBuf>,
    #[arg(long)]
    save_dir: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_NAME_PREFIX)]
    prefix: String,
    /// One-off overrides of the active provider's settings
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long, env = "PROMPT_GALLERY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long)]
    model: Option<String>,
}

#[derive(Debug, Subcommand)]
enum ProviderCommand {
    /// Switch to another provider, saving the current one first
    Use { id: String },
    /// Edit and persist the active provider's settings
    Set {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
    /// Print the active provider's settings
    Show,
}

pub fn run() -> Result<i32> {
    init_logging();
    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new().context("Failed to start Tokio runtime")?;
    runtime.block_on(dispatch(cli))
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn settings_store(config: Option<PathBuf>) -> Result<SettingsStore> {
    config
        .or_else(SettingsStore::default_path)
        .map(SettingsStore::new)
        .ok_or_else(|| anyhow!("No settings location available; pass --config"))
}

async fn dispatch(cli: Cli) -> Result<i32> {
    let store = settings_store(cli.config)?;

    match cli.command {
        Command::List { dir } => {
            let images = list_images(dir.as_deref()).await.map_err(|err| anyhow!(err))?;
            print_images(&images);
            Ok(0)
        }
        Command::Generate(args) => run_generate(&store, args).await,
        Command::Providers => {
            for (provider, preset) in provider_catalog() {
                println!("{:<12} {} ({})", provider.id(), preset.label, display_or_dash(preset.base_url));
                for model in preset.models {
                    let marker = if model.id == preset.default_model { "*" } else { " " };
                    println!("  {} {:<40} {}", marker, display_or_dash(model.id), model.label);
                }
            }
            Ok(0)
        }
        Command::Provider(ProviderCommand::Use { id }) => {
            let mut session = restore_session(&store).await;
            switch_provider(&mut session, &store, &id).await;
            print_provider(&session);
            Ok(0)
        }
        Command::Provider(ProviderCommand::Set {
            base_url,
            api_key,
            model,
        }) => {
            let mut session = restore_session(&store).await;
            update_provider_config(
                &mut session,
                &store,
                ProviderEdit {
                    base_url,
                    api_key,
                    model,
                },
            )
            .await
            .map_err(|err| anyhow!(err))?;
            print_provider(&session);
            Ok(0)
        }
        Command::Provider(ProviderCommand::Show) => {
            let session = restore_session(&store).await;
            print_provider(&session);
            Ok(0)
        }
    }
}

async fn run_generate(store: &SettingsStore, args: GenerateArgs) -> Result<i32> {
    let mut session = restore_session(store).await;

    if args.dir.is_some() {
        session.choose_image_dir(args.dir);
    }
    if args.save_dir.is_some() {
        session.choose_save_dir(args.save_dir);
    }
    session.set_name_prefix(&args.prefix);

    let config = session.config_mut();
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(api_key) = args.api_key {
        config.api_key = api_key;
    }
    if let Some(model) = args.model {
        config.model = model;
    }

    let backend = OpenAiImages::new();
    match generate_for_session(&mut session, &backend, &args.prompt).await {
        Ok(result) => {
            println!("{}", session.status());
            println!("{}", result.saved_url);
        }
        Err(_) => {
            eprintln!("{}", session.status());
            return Ok(1);
        }
    }

    if session.image_dir().is_some() {
        let images = refresh_images(&mut session)
            .await
            .map_err(|err| anyhow!(err))?;
        print_images(&images);
    }

    Ok(0)
}

fn print_images(images: &[ImageEntry]) {
    if images.is_empty() {
        println!("No images in directory");
        return;
    }

    for image in images {
        println!("{}\t{}", image.name, image.path.display());
    }
}

fn print_provider(session: &Session) {
    let config = session.config();
    println!("provider: {}", session.provider().id());
    println!("base url: {}", display_or_dash(&config.base_url));
    println!("model:    {}", display_or_dash(&config.model));
    println!(
        "api key:  {}",
        if config.api_key.is_empty() { "-" } else { "(set)" }
    );
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
