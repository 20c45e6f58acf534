use anyhow::Result;
use clap::{Parser, Subcommand};
use hpr_core::{Collection, ProjectStatus};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "hpr")]
#[command(about = "HPR - browse and manage HPR Infra site content", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use instead of <config dir>/hpr/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the project gallery by category
    Gallery {
        /// ongoing, completed or future
        #[arg(long, default_value = "ongoing")]
        category: ProjectStatus,
        /// Number of pages to show
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Show the home page projects section
    Projects {
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// List news articles, or read one
    News {
        #[arg(long)]
        id: Option<String>,
    },
    /// Show a public section, e.g. testimonials, partners or footer
    Show { collection: Collection },
    /// Show the about page
    About,
    /// Manage an editable section
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Show or replace the mission statement
    Mission {
        #[command(subcommand)]
        action: MissionAction,
    },
    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List one numbered page of a section
    List {
        collection: Collection,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Add an item
    Create {
        collection: Collection,
        /// Text field as name=value (repeatable)
        #[arg(long = "field", value_name = "NAME=VALUE", value_parser = commands::admin::parse_field)]
        fields: Vec<(String, String)>,
        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Edit an existing item
    Update {
        collection: Collection,
        id: String,
        #[arg(long = "field", value_name = "NAME=VALUE", value_parser = commands::admin::parse_field)]
        fields: Vec<(String, String)>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete an item
    Delete { collection: Collection, id: String },
}

#[derive(Subcommand)]
enum MissionAction {
    Show,
    Set {
        #[arg(long)]
        heading: String,
        #[arg(long)]
        description: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::load(cli.config, cli.json)?;

    match cli.command {
        Commands::Gallery { category, pages } => commands::gallery::run(&ctx, category, pages).await?,
        Commands::Projects { pages } => commands::gallery::projects(&ctx, pages).await?,
        Commands::News { id } => commands::news::run(&ctx, id).await?,
        Commands::Show { collection } => commands::section::show(&ctx, collection).await?,
        Commands::About => commands::section::about(&ctx).await?,
        Commands::Admin { action } => match action {
            AdminAction::List { collection, page } => {
                commands::admin::list(&ctx, collection, page).await?
            }
            AdminAction::Create {
                collection,
                fields,
                image,
            } => commands::admin::submit(&ctx, collection, None, fields, image).await?,
            AdminAction::Update {
                collection,
                id,
                fields,
                image,
            } => commands::admin::submit(&ctx, collection, Some(id), fields, image).await?,
            AdminAction::Delete { collection, id } => {
                commands::admin::delete(&ctx, collection, id).await?
            }
        },
        Commands::Mission { action } => match action {
            MissionAction::Show => commands::mission::show(&ctx).await?,
            MissionAction::Set {
                heading,
                description,
            } => commands::mission::set(&ctx, heading, description).await?,
        },
        Commands::Config { init } => commands::config::run(&ctx, init)?,
    }

    Ok(())
}
