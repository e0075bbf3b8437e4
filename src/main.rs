use anyhow::{Context, Result};
use chrono::Local;
use foothold_sitac::{
    api::{self, AppState, MapData},
    cli::{Cli, Commands},
    config::AppConfig,
    discovery::ServerDirectory,
    parser::load_global,
    schema::{get_record, record_names, ALL_RECORDS},
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Setup logging
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.log_level))
        .context("Invalid log level")?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.web.host.clone());
            let port = port.unwrap_or(config.web.port);
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

            info!(
                %addr,
                saved_games = %config.dcs.saved_games.display(),
                title = %config.web.title,
                "starting server"
            );

            let router = api::configure(AppState::new(config));
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            axum::serve(listener, router.into_make_service())
                .await
                .context("Server error")?;
        }

        Commands::Servers => {
            let servers = ServerDirectory::new(&config.dcs.saved_games);
            for name in servers.list_servers()? {
                let mission = servers
                    .detect_mission_path(&name)
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("{:<24} {}", name, mission);
            }
        }

        Commands::Sitac { server, pretty } => {
            let sitac = ServerDirectory::new(&config.dcs.saved_games)
                .active_sitac(&server)
                .with_context(|| format!("Failed to load sitac of {}", server))?;
            let json = if pretty {
                serde_json::to_string_pretty(&sitac)?
            } else {
                serde_json::to_string(&sitac)?
            };
            println!("{}", json);
        }

        Commands::Map { server } => {
            let sitac = ServerDirectory::new(&config.dcs.saved_games)
                .active_sitac(&server)
                .with_context(|| format!("Failed to load sitac of {}", server))?;
            let data = MapData::from_sitac(&sitac, config.features.show_zone_forces, Local::now());
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        Commands::Parse { file, global } => {
            let table = load_global(&file, &global)
                .with_context(|| format!("Failed to parse {:?}", file))?;
            println!("{}", serde_json::to_string_pretty(&table.to_json())?);
        }

        Commands::Records { name } => {
            let records = match name {
                Some(name) => vec![get_record(&name).with_context(|| {
                    format!("Unknown record '{}' (known: {})", name, record_names().join(", "))
                })?],
                None => ALL_RECORDS.to_vec(),
            };

            println!("Record schemas:\n");
            for record in records {
                println!("  {}", record.name);
                for field in record.fields {
                    let marker = if field.required { "*" } else { " " };
                    println!(
                        "    {}{:<22} {:<8} <- {}",
                        marker,
                        field.name,
                        field.field_type.as_str(),
                        field.source_key()
                    );
                }
            }
        }
    }

    Ok(())
}
