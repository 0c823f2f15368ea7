use anyhow::Result;
use clap::{Parser, Subcommand};
use fluxgen::api::{self, ApiState};
use fluxgen::app::App;
use fluxgen::models::Config;
use fluxgen::storage::{LocalImageStore, StorageService};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "fluxgen")]
#[command(about = "Generate images with the Flux API and keep them locally")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a prompt, wait for the image, and save it locally.
    Generate {
        /// Text prompt describing the image.
        prompt: String,
    },
    /// Serve the persistence API over HTTP.
    Serve,
    /// List previously saved images.
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fluxgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Command::Generate { prompt } => {
            let app = App::new(&config);
            match app.generate(&prompt).await {
                Ok(generated) => {
                    info!("Image available at {}", generated.sample_url);
                    if let Some(filename) = &generated.filename {
                        info!("Saved as {}", filename);
                    }
                    if let Some(save_error) = &generated.save_error {
                        error!("{}", save_error);
                        std::process::exit(1);
                    }
                    Ok(())
                }
                Err(e) => {
                    error!("Generation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Serve => {
            let storage = Arc::new(LocalImageStore::new(&config.images_dir));
            let state = Arc::new(ApiState::new(storage));
            match api::serve(config.listen_addr, state).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    error!("Server failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::List => {
            let storage = LocalImageStore::new(&config.images_dir);
            match storage.list().await {
                Ok(images) => {
                    for image in images {
                        println!("{}", image);
                    }
                    Ok(())
                }
                Err(e) => {
                    error!("Failed to list images: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
