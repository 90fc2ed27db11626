//! dictwire CLI Client
//!
//! Command-line interface for querying a DICT server.

use clap::{Parser, Subcommand};
use dictwire::{Config, Database, DictConnection, MatchingStrategy, ReplyPolicy, DEFAULT_PORT};
use tracing_subscriber::{fmt, EnvFilter};

/// dictwire CLI
#[derive(Parser, Debug)]
#[command(name = "dictwire-cli")]
#[command(about = "CLI for RFC 2229 DICT servers")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = "dict.org")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Read/write/connect timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "0")]
    timeout_ms: u64,

    /// Treat server failures on DEFINE/MATCH as errors instead of empty results
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up definitions of a word
    Define {
        /// The word to define
        word: String,

        /// Database name, `*` for all, `!` for the first with a result
        #[arg(short, long, default_value = "*")]
        database: String,
    },

    /// List words matching a pattern
    Match {
        /// The word or pattern to match
        word: String,

        /// Matching strategy
        #[arg(short, long, default_value = "prefix")]
        strategy: String,

        /// Database name, `*` for all, `!` for the first with a result
        #[arg(short, long, default_value = "*")]
        database: String,
    },

    /// List databases
    Databases,

    /// List matching strategies
    Strategies,

    /// Show information about a database
    Info {
        /// The database name
        database: String,
    },

    /// Show server information
    Server,

    /// Show the server's help text
    HelpText,

    /// Show the server status line
    Status,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,dictwire=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let policy = if args.strict {
        ReplyPolicy::Strict
    } else {
        ReplyPolicy::Lenient
    };

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .client_name(format!("dictwire-cli {}", dictwire::VERSION))
        .reply_policy(policy)
        .build();

    let conn = match DictConnection::connect(config) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Failed to connect: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let outcome = run(&conn, args.command);
    conn.close();

    if let Err(e) = outcome {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(conn: &DictConnection, command: Commands) -> dictwire::Result<()> {
    match command {
        Commands::Define { word, database } => {
            let definitions = conn.define(&word, &Database::new(database, ""))?;
            if definitions.is_empty() {
                println!("No definitions found for \"{}\"", word);
            }
            for def in definitions {
                println!("From {} [{}]:", def.database, def.word);
                println!("{}", def.text());
                println!();
            }
        }
        Commands::Match {
            word,
            strategy,
            database,
        } => {
            let strategy = MatchingStrategy::new(strategy, "");
            let words = conn.match_words(&word, &strategy, &Database::new(database, ""))?;
            if words.is_empty() {
                println!("No matches found for \"{}\"", word);
            }
            for word in words {
                println!("{}", word);
            }
        }
        Commands::Databases => {
            for db in conn.databases()?.values() {
                println!("{}", db);
            }
        }
        Commands::Strategies => {
            for strategy in conn.strategies()? {
                println!("{}", strategy);
            }
        }
        Commands::Info { database } => {
            let database = Database::new(database, "");
            if database.is_selector() {
                eprintln!("SHOW INFO needs a database name, not the selector {}", database.name);
                std::process::exit(2);
            }
            let info = conn.database_info(&database)?;
            if info.is_empty() {
                println!("Invalid database: {}", database.name);
            } else {
                println!("{}", info);
            }
        }
        Commands::Server => println!("{}", conn.server_info()?),
        Commands::HelpText => println!("{}", conn.help()?),
        Commands::Status => println!("{}", conn.status()?),
    }
    Ok(())
}
