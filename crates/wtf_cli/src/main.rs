//! `wtf-server` command-line entry point.
//!
//! # Responsibility
//! - Choose between serving the RPC API, bulk-loading a definition file, and
//!   one-off local lookups.
//! - Own the database handle for the lifetime of the process.
//!
//! # Invariants
//! - Load failures exit non-zero after the loader has rolled back.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use log::{error, info};
use wtf_core::config::{resolve_db_path, DB_PATH_ENV};
use wtf_core::{Database, Loader, LookupService};

#[derive(Parser, Debug)]
#[command(name = "wtf-server")]
#[command(about = "Acronym lookup server and loader")]
#[command(version)]
struct Cli {
    /// SQLite database file (defaults to <temp_dir>/wtf-server.db)
    #[arg(short, long, global = true, env = DB_PATH_ENV)]
    database: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (stderr when omitted)
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON-RPC API
    Serve {
        /// Listen address (host:port)
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        listen: SocketAddr,
    },
    /// Populate the database from an acronym file
    Populate {
        /// File with one `ACRONYM<tab>translation` definition per line
        #[arg(short, long = "file", value_name = "FILE")]
        file: PathBuf,
    },
    /// Print every translation known for an acronym
    WtfIs { acronym: String },
    /// Print every known acronym
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli) {
        eprintln!("wtf-server: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err:#}");
            eprintln!("wtf-server: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(wtf_core::default_log_level());
    let result = match cli.log_dir.as_deref() {
        Some(dir) => wtf_core::init_logging(level, dir),
        None => wtf_core::init_console_logging(level),
    };
    result.map_err(|err| anyhow!(err))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let db_path = resolve_db_path(cli.database.as_deref());
    info!(
        "event=cli_start module=cli status=ok database={}",
        db_path.display()
    );

    match cli.command {
        Command::Populate { file } => {
            if !file.is_file() {
                return Err(anyhow!("invalid acronym file: {}", file.display()));
            }
            let db = open_database(&db_path)?;
            let report = Loader::new(db)
                .populate_from_file(&file)
                .context("failed to populate the database")?;
            println!(
                "loaded {} new acronym(s) from {} line(s); {} duplicate(s), {} skipped",
                report.inserted, report.lines, report.duplicates, report.skipped
            );
            Ok(())
        }
        Command::Serve { listen } => {
            let lookup = LookupService::new(open_database(&db_path)?);
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind(listen)
                    .await
                    .with_context(|| format!("failed to bind {listen}"))?;
                wtf_rpc::serve(listener, lookup)
                    .await
                    .context("server terminated with an error")
            })
        }
        Command::WtfIs { acronym } => {
            let lookup = LookupService::new(open_database(&db_path)?);
            for translation in lookup.wtf_is(&acronym) {
                println!("{translation}");
            }
            Ok(())
        }
        Command::List => {
            let lookup = LookupService::new(open_database(&db_path)?);
            for acronym in lookup.list() {
                println!("{acronym}");
            }
            Ok(())
        }
    }
}

fn open_database(path: &std::path::Path) -> anyhow::Result<Database> {
    Database::open(path).with_context(|| format!("failed to open database {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn populate_takes_file_and_global_database() {
        let cli = Cli::parse_from([
            "wtf-server",
            "populate",
            "-f",
            "acronyms.txt",
            "--database",
            "/tmp/custom.db",
        ]);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/custom.db")));
        assert!(matches!(
            cli.command,
            Command::Populate { file } if file == PathBuf::from("acronyms.txt")
        ));
    }

    #[test]
    fn serve_defaults_listen_address() {
        let cli = Cli::parse_from(["wtf-server", "serve"]);
        match cli.command {
            Command::Serve { listen } => assert_eq!(listen.to_string(), "127.0.0.1:5000"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn wtf_is_subcommand_uses_kebab_case() {
        let cli = Cli::parse_from(["wtf-server", "wtf-is", "api"]);
        assert!(matches!(cli.command, Command::WtfIs { acronym } if acronym == "api"));
    }
}
