use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEFAULT_DATABASE_FILE: &str = "auction.db";
pub const DEFAULT_WEB_PORT: u16 = 5000;
pub const DEFAULT_WEB_ROOT: &str = "web/";

/// Json struct for server settings. Every field is optional.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Settings {
    /// SQLite file holding saved tournaments
    pub database_file: Option<PathBuf>,

    /// Port the HTTP server listens on
    pub web_port: Option<u16>,

    /// Directory with the browser front-end
    pub web_root: Option<PathBuf>,
}

impl Settings {
    pub fn load(file: &Path) -> Result<Self, Error> {
        Ok(serde_json::from_str(&read_to_string(file)?)?)
    }

    /// Settings with every field filled in, used to seed a new settings file.
    pub fn defaults() -> Self {
        Settings {
            database_file: Some(PathBuf::from(DEFAULT_DATABASE_FILE)),
            web_port: Some(DEFAULT_WEB_PORT),
            web_root: Some(PathBuf::from(DEFAULT_WEB_ROOT)),
        }
    }

    pub fn database_file(&self) -> PathBuf {
        self.database_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE))
    }

    pub fn web_port(&self) -> u16 {
        self.web_port.unwrap_or(DEFAULT_WEB_PORT)
    }

    pub fn web_root(&self) -> PathBuf {
        self.web_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WEB_ROOT))
    }
}
