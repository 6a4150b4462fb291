use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "getjobs", about = "One-click job delivery across recruitment platforms")]
pub struct Config {
    /// Database connection URL (platform configuration store)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Run database migrations on startup
    #[arg(long, env = "RUN_MIGRATIONS", default_value = "true")]
    pub run_migrations: bool,

    /// Base URL of the browser-automation agent
    #[arg(long, env = "AGENT_URL", default_value = "http://127.0.0.1:9400")]
    pub agent_url: String,

    /// Per-request timeout for agent calls, in seconds
    #[arg(long, env = "AGENT_TIMEOUT", default_value = "600")]
    pub agent_timeout: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the web server (default when no subcommand given)
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
        listen_addr: String,
    },
    /// Run quick delivery for one platform and print the result
    Deliver {
        /// Platform code (boss, zhilian, job51, liepin)
        #[arg(long)]
        platform: String,
    },
    /// Run quick delivery for every platform and print the outcome
    DeliverAll {
        /// Run all platforms at the same time instead of one after another
        #[arg(long)]
        concurrent: bool,
    },
}

impl Config {
    /// Resolve the command, defaulting to Serve if none specified.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            listen_addr: std::env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}
