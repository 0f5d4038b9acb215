//! access - grant or revoke rights in an Access file

use clap::{ArgGroup, CommandFactory, Parser};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use upspin_access::{
    AppError, RightsDelta,
    access::Operation,
    config::{LogFormat, load_config},
    edit_access_file, preview_access_edit,
    store::LocalStore,
};

const AFTER_HELP: &str = r#"The first argument is a comma-separated list of rights to add or remove:
read, write, list, create, delete, own. '*' stands for every right; quote
it so the shell does not expand it.

The last argument is the Access file to edit. The arguments in between are
the users (or group paths, or '*') the edit applies to; each may itself be a
comma-separated list.

Examples:

  # Let ann@example.com read and list my root
  access -grant read,list ann@example.com me@example.com/Access

  # Let ann and bob write in photos
  access -grant write ann@example.com bob@example.com me@example.com/photos/Access

  # Take every right away from ann
  access -revoke '*' ann@example.com me@example.com/Access"#;

/// Update an Access file by granting or revoking rights
#[derive(Parser, Debug)]
#[command(name = "access")]
#[command(version, about, long_about = None, after_long_help = AFTER_HELP)]
#[command(
    override_usage = "access (-grant | -revoke) right[,right...] user[,user...]... path/Access"
)]
#[command(group(ArgGroup::new("operation").required(true).args(["grant", "revoke"])))]
struct Args {
    /// Add the rights to the users
    #[arg(long)]
    grant: bool,

    /// Remove the rights from the users
    #[arg(long)]
    revoke: bool,

    /// Print the resulting Access file instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Path to configuration file
    #[arg(short, long, env = "UPSPIN_ACCESS_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "UPSPIN_ACCESS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Comma-separated rights, or '*' for all
    rights: String,

    /// Users followed by the Access file path
    #[arg(num_args = 2.., required = true, value_names = ["USER", "PATH"])]
    targets: Vec<String>,
}

impl Args {
    fn operation(&self) -> Operation {
        if self.grant {
            Operation::Grant
        } else {
            Operation::Revoke
        }
    }

    /// Split the trailing positionals into users and the Access file path
    fn users_and_path(&self) -> Result<(&[String], &str), AppError> {
        match self.targets.split_last() {
            Some((path, users)) if !users.is_empty() => Ok((users, path.as_str())),
            _ => Err(AppError::Usage("expected users and an Access file path".into())),
        }
    }
}

/// Accept the historical single-dash spelling of the long flags.
fn normalize_legacy_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| match arg.as_str() {
            "-grant" | "-revoke" | "-dry-run" => format!("-{arg}"),
            _ => arg,
        })
        .collect()
}

fn parse_args() -> Result<Args, ExitCode> {
    Args::try_parse_from(normalize_legacy_flags(std::env::args())).map_err(|e| {
        use clap::error::ErrorKind;
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                ExitCode::SUCCESS
            }
            _ => {
                let _ = e.print();
                eprintln!("\n{}", Args::command().render_long_help());
                ExitCode::from(2)
            }
        }
    })
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(args: &Args, store: &LocalStore, max_retries: u32) -> Result<(), AppError> {
    let (users, path) = args.users_and_path()?;
    let delta = RightsDelta::from_args(args.operation(), &args.rights, users)?;

    if args.dry_run {
        let outcome = preview_access_edit(store, path, &delta).await?;
        print!("{}", outcome.model);
        return Ok(());
    }

    let outcome = edit_access_file(store, path, &delta, max_retries).await?;
    info!(
        path = %outcome.path,
        changed = outcome.changed,
        attempts = outcome.attempts,
        "Done"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(code) => return Ok(code),
    };

    let config = load_config(args.config.as_deref())?;

    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, config.logging.format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        root = %config.store.root,
        "Starting access"
    );

    let store = LocalStore::new(&config.store.root);

    match run(&args, &store, config.store.max_retries).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %e, "access failed");
            eprintln!("access: {e}");
            if matches!(e, AppError::Usage(_)) {
                eprintln!("\n{}", Args::command().render_long_help());
            }
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
