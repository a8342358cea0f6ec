//! Server configuration (command line, with environment fallbacks)

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "blog-server")]
#[command(author, version, about = "CRUD HTTP service for users and posts", long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long = "bind", env = "BIND_ADDRESS", default_value = "0.0.0.0:8010")]
    pub bind_address: SocketAddr,

    /// SQLite database file
    #[arg(long = "database", env = "DATABASE_PATH", default_value = "data/blog.db")]
    pub database_path: PathBuf,

    /// Keep everything in memory instead of SQLite
    #[arg(long, env = "BLOG_IN_MEMORY")]
    pub in_memory: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "blog-server",
            "--bind",
            "127.0.0.1:9000",
            "--database",
            "/tmp/blog.db",
            "--in-memory",
        ])
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.database_path, PathBuf::from("/tmp/blog.db"));
        assert!(config.in_memory);
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        assert!(Config::try_parse_from(["blog-server", "--bind", "not-an-addr"]).is_err());
    }
}
