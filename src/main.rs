use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};

use ucs_version::commands::{self, OutputFormat};
use ucs_version::config::{self, ConfigStore, YamlConfigStore};
use ucs_version::logging;
use ucs_version::ucs::XmlApiClient;

#[derive(Parser)]
#[command(name = "ucs-version")]
#[command(version, about = "Cisco Unified Computing System version checking tool")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/ucs-version/config.yaml)
    #[arg(long, global = true, env = config::CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Do not print the banner
    #[arg(long, global = true)]
    no_banner: bool,

    /// Do not write log files
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new UCS domain
    Add {
        #[command(subcommand)]
        target: CredentialsTarget,
    },
    /// Update a UCS domain
    Update {
        #[command(subcommand)]
        target: CredentialsTarget,
    },
    /// Remove a UCS domain
    Delete {
        #[command(subcommand)]
        target: AddressTarget,
    },
    /// Show UCS domains
    Show {
        #[command(subcommand)]
        target: ShowTarget,
    },
    /// Check every UCS domain against the release trains
    Run {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CredentialsTarget {
    /// A UCS domain
    Ucs(Credentials),
}

#[derive(Subcommand)]
enum AddressTarget {
    /// A UCS domain
    Ucs(Address),
}

#[derive(Subcommand)]
enum ShowTarget {
    /// A UCS domain
    Ucs {
        #[command(flatten)]
        address: Address,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// All UCS domains
    All {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct Address {
    /// IP address or DNS name of UCS Manager, without http(s)
    #[arg(long)]
    ip: String,
}

#[derive(Args)]
struct Credentials {
    #[command(flatten)]
    address: Address,

    /// Name of user
    #[arg(long)]
    username: String,

    /// Password for user in plain text
    #[arg(long)]
    password: String,
}

impl Command {
    fn output_format(&self) -> OutputFormat {
        match self {
            Command::Run { json: true }
            | Command::Show {
                target: ShowTarget::Ucs { json: true, .. } | ShowTarget::All { json: true },
            } => OutputFormat::Json,
            _ => OutputFormat::Human,
        }
    }
}

fn print_banner(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "Cisco Unified Computing System version checking tool v{}",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out, "{}", "=".repeat(80))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let log_root = (!cli.no_log_file).then(config::log_dir);
    let log = match logging::init(level, log_root.as_deref()) {
        Ok(handle) => handle,
        Err(logging::LoggingError::Directory { path, source }) => {
            // Fall back to console-only logging
            let handle = logging::init(level, None)?;
            warn!(path = %path.display(), "Cannot create log directory: {}", source);
            handle
        }
        Err(e) => return Err(e.into()),
    };

    let format = cli.command.output_format();
    let mut stdout = std::io::stdout().lock();
    if format == OutputFormat::Human && !cli.no_banner {
        print_banner(&mut stdout)?;
    }

    let store = YamlConfigStore::new(config::config_path(cli.config));
    info!(version = env!("CARGO_PKG_VERSION"), config = %store.path().display(), "Starting");
    if let Some(dir) = log.dir() {
        info!(dir = %dir.display(), "Writing logs");
    }

    match cli.command {
        Command::Add {
            target: CredentialsTarget::Ucs(c),
        } => commands::add(&store, &c.address.ip, &c.username, &c.password, &mut stdout),
        Command::Update {
            target: CredentialsTarget::Ucs(c),
        } => commands::update(&store, &c.address.ip, &c.username, &c.password, &mut stdout),
        Command::Delete {
            target: AddressTarget::Ucs(a),
        } => commands::delete(&store, &a.ip, &mut stdout),
        Command::Show {
            target: ShowTarget::Ucs { address, .. },
        } => commands::show(&store, &address.ip, format, &mut stdout),
        Command::Show {
            target: ShowTarget::All { .. },
        } => commands::show_all(&store, format, &mut stdout),
        Command::Run { .. } => {
            let config = commands::load_config(&store)?;
            let client = XmlApiClient::new(&config.client);
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(commands::run(&config, &client, format, &mut stdout))
                .map(|_| ())
        }
    }
}
