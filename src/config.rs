//! Startup configuration
//!
//! The gateway takes exactly four required command-line flags: static
//! backend credentials, the backend endpoint URL, and the listening
//! port. There is no config file and no environment-variable fallback.
//! A missing flag terminates the process via clap; an empty value fails
//! `validate` and terminates before any port is bound.

use clap::Parser;

/// Command-line configuration for the gateway.
#[derive(Parser, Debug, Clone)]
#[command(name = "s3browse", about = "HTTP gateway for browsing S3-compatible buckets")]
pub struct Config {
    /// Backend access key
    #[arg(long = "accesskey")]
    pub access_key: String,

    /// Backend secret key
    #[arg(long = "secretkey")]
    pub secret_key: String,

    /// Backend endpoint URL (e.g. http://10.19.1.1:30150)
    #[arg(long = "s3endpoint")]
    pub s3_endpoint: String,

    /// HTTP server listening port
    #[arg(long = "port")]
    pub port: u16,
}

impl Config {
    /// Reject empty credential or endpoint values.
    pub fn validate(&self) -> Result<(), String> {
        if self.access_key.is_empty() {
            return Err("accesskey should not be empty".to_string());
        }
        if self.secret_key.is_empty() {
            return Err("secretkey should not be empty".to_string());
        }
        if self.s3_endpoint.is_empty() {
            return Err("s3endpoint should not be empty".to_string());
        }
        Ok(())
    }
}
