use std::{
    fs::{self, read_to_string},
    path::PathBuf,
    sync::Arc,
};

use clap::{Parser, Subcommand};

use crate::core::{analysis::AnalysisRequest, db::TournamentDb, settings::Settings};

mod core;
mod error;
mod util;
mod web;

#[derive(Parser, Debug)]
#[command(name = "auctionboard")]
#[command(version = "0.1")]
#[command(about = "Tournament storage and budget analysis for player auctions.", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: RunType,
}

#[derive(Subcommand, Debug)]
enum RunType {
    /// Create a settings file filled with default values.
    Init { settings_file: PathBuf },

    /// Run the HTTP server.
    Serve {
        /// Location of the settings file. Defaults are used when omitted.
        #[arg(short, long)]
        settings_file: Option<PathBuf>,

        /// SQLite database file, overrides the settings file.
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// HTTP port, overrides the settings file.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Classify the teams of an auction JSON file and print the results.
    Analyze { request_file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        RunType::Init { settings_file } => {
            let settings = serde_json::to_string_pretty(&Settings::defaults())?;
            fs::write(&settings_file, settings)?;

            println!("Settings written to {}", settings_file.display());
            Ok(())
        }
        RunType::Serve {
            settings_file,
            database,
            port,
        } => {
            let mut settings = match settings_file {
                Some(file) => {
                    log::info!("Loading settings from {}", file.display());
                    Settings::load(&file)?
                }
                None => Settings::default(),
            };
            if database.is_some() {
                settings.database_file = database;
            }
            if port.is_some() {
                settings.web_port = port;
            }

            let db = Arc::new(TournamentDb::init(&settings.database_file()).await?);
            web::run_http_server(db, Arc::new(settings)).await
        }
        RunType::Analyze { request_file } => {
            let body: serde_json::Value = serde_json::from_str(&read_to_string(&request_file)?)?;
            let report = AnalysisRequest::from_json(&body)?.analyze();

            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}
