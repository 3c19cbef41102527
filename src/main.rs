//! sql-notebook - run SQL against PostgreSQL from markdown notes.

use std::sync::Arc;

use anyhow::Context;
use sql_notebook::bridge::{
    CommandOutcome, ConsoleNotifier, DocumentSurface, EditorBridge, EditorCommand, HttpApi,
    COMMANDS,
};
use sql_notebook::cli::{Cli, Command, NoteArgs, ServeArgs};
use sql_notebook::config::Config;
use sql_notebook::db::{self, DatabaseClient, MockDatabaseClient};
use sql_notebook::{logging, server};
use tracing::{error, info, warn};

#[actix_web::main]
async fn main() {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    match cli.command {
        Command::Serve(args) => serve(args, config).await,
        Command::Tables(args) => edit_note(EditorCommand::InsertTables, args, &config).await,
        Command::Exec(args) => edit_note(EditorCommand::ExecuteSql, args, &config).await,
        Command::Block(args) => edit_note(EditorCommand::CodeBlock, args, &config).await,
        Command::Commands => {
            for def in COMMANDS {
                println!("{def}");
            }
            Ok(())
        }
    }
}

/// Starts the HTTP service.
///
/// Connection precedence: command-line URL, then `[database]` from the
/// config file, then `PG*` environment variables for anything still unset.
async fn serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(log_path) = &args.log_path {
        config.server.log_path = log_path.clone();
    }

    let db: Arc<dyn DatabaseClient> = if args.mock_db {
        warn!("Serving from the in-memory mock database");
        Arc::new(MockDatabaseClient::new().with_tables(["mock_table"]))
    } else {
        let mut connection = config.database.clone();
        if let Some(from_cli) = args.to_connection_config()? {
            connection.merge(&from_cli);
        }
        connection.apply_env_defaults();

        info!("Connecting to {}", connection.display_string());
        db::connect(&connection)
            .await
            .context("Failed to connect to PostgreSQL")?
    };

    server::run(&config.server, db).await?;
    Ok(())
}

/// Applies an editor command to a markdown file, writing it back on success.
async fn edit_note(command: EditorCommand, args: NoteArgs, config: &Config) -> anyhow::Result<()> {
    let mut client_config = config.client.clone();
    if let Some(url) = args.url {
        client_config.base_url = url;
    }
    if let Some(format) = args.format {
        client_config.result_format = format;
    }

    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let mut surface = DocumentSurface::new(text);
    if let Some(lines) = args.lines {
        surface.select_lines(lines)?;
    }

    let api = HttpApi::from_config(&client_config)?;
    let mut bridge = EditorBridge::new(api, ConsoleNotifier, client_config.result_format);

    match bridge.dispatch(command, &mut surface).await? {
        CommandOutcome::Applied => {
            tokio::fs::write(&args.file, surface.text())
                .await
                .with_context(|| format!("Failed to write {}", args.file.display()))?;
            info!("Updated {}", args.file.display());
        }
        CommandOutcome::Skipped => {}
    }

    Ok(())
}
