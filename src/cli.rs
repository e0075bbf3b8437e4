use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::parser::ZONE_PERSISTENCE_GLOBAL;

#[derive(Parser, Debug)]
#[command(name = "foothold-sitac")]
#[command(version, about = "Situation dashboard for DCS Foothold servers")]
pub struct Cli {
    /// Configuration file (default: config/config.yml)
    #[arg(short, long, global = true, env = "FOOTHOLD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Bind address (overrides web.host)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides web.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List servers with an active mission
    Servers,

    /// Print the sitac of a server as JSON
    Sitac {
        server: String,

        /// Indent the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the map projection of a server as JSON
    Map { server: String },

    /// Dump a global of an export file as raw JSON
    Parse {
        file: PathBuf,

        /// Global variable to extract
        #[arg(short, long, default_value = ZONE_PERSISTENCE_GLOBAL)]
        global: String,
    },

    /// List record schemas and their export key aliases
    Records {
        /// Only show this record
        name: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
