//! Connection and diff parameter resolution
//!
//! Each field takes the first non-empty value of: its flag, its
//! environment variable (both merged by clap), then the next unused
//! trailing positional argument.

use clap::{Args, ValueEnum};
use snapdiff_core::errors::{ExError, ExErrorKind};
use snapdiff_core::logging_facility::Profile;
use snapdiff_core::SnapshotId;
use snapdiff_http::ConnectionConfig;
use std::time::Duration;

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";
pub const DEFAULT_COMPARE_PATH: &str = "/";

/// Flags shared by every subcommand that talks to the service
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Hostname of the server, optionally with port
    #[arg(short = 'h', long, env = "HOST")]
    pub host: Option<String>,

    /// Username for login
    #[arg(short = 'u', long, env = "USERNAME")]
    pub username: Option<String>,

    /// Password for login
    #[arg(short = 'p', long, env = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Verify the server's TLS certificate
    #[arg(long)]
    pub verify_tls: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogProfile::Terminal)]
    pub log_profile: LogProfile,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    pub help: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogProfile {
    Terminal,
    Development,
    Production,
}

impl From<LogProfile> for Profile {
    fn from(profile: LogProfile) -> Self {
        match profile {
            LogProfile::Terminal => Profile::Terminal,
            LogProfile::Development => Profile::Development,
            LogProfile::Production => Profile::Production,
        }
    }
}

/// Raw field values after flag and environment merging
#[derive(Debug, Clone, Default)]
pub struct RawFields {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub source_id: Option<String>,
    pub dest_id: Option<String>,
    pub compare_path: Option<String>,
}

impl RawFields {
    /// Start from the connection flags; snapshot fields are set by the caller
    pub fn from_connection(conn: &ConnectionArgs) -> Self {
        Self {
            host: conn.host.clone(),
            username: conn.username.clone(),
            password: conn.password.clone(),
            ..Self::default()
        }
    }
}

/// Fully resolved parameters of one diff
#[derive(Debug, Clone)]
pub struct DiffConfig {
    pub connection: ConnectionConfig,
    pub source: SnapshotId,
    pub dest: SnapshotId,
    pub compare_path: String,
}

/// Resolve diff parameters
///
/// Positionals fill the still-unset fields in the order host, username,
/// password, source id, dest id, compare path. Surplus positionals are
/// ignored.
///
/// # Errors
///
/// `InvalidInput` if the host is empty or either snapshot id contains no
/// digit.
pub fn resolve_diff(
    mut fields: RawFields,
    positionals: &[String],
    conn: &ConnectionArgs,
) -> Result<DiffConfig, ExError> {
    fill_from_positionals(
        &mut [
            &mut fields.host,
            &mut fields.username,
            &mut fields.password,
            &mut fields.source_id,
            &mut fields.dest_id,
            &mut fields.compare_path,
        ],
        positionals,
    );

    let host = require_host(fields.host)?;
    let source = require_snapshot_id("source", fields.source_id)?;
    let dest = require_snapshot_id("destination", fields.dest_id)?;
    let connection = connection_config(host, fields.username, fields.password, conn);

    Ok(DiffConfig {
        connection,
        source,
        dest,
        compare_path: non_empty(fields.compare_path)
            .unwrap_or_else(|| DEFAULT_COMPARE_PATH.to_string()),
    })
}

/// Resolve connection-only parameters (host, username, password)
///
/// # Errors
///
/// `InvalidInput` if the host is empty.
pub fn resolve_connection(
    mut fields: RawFields,
    positionals: &[String],
    conn: &ConnectionArgs,
) -> Result<ConnectionConfig, ExError> {
    fill_from_positionals(
        &mut [&mut fields.host, &mut fields.username, &mut fields.password],
        positionals,
    );
    let host = require_host(fields.host)?;
    Ok(connection_config(host, fields.username, fields.password, conn))
}

/// Resolve the parameters of a single-snapshot subtree listing
///
/// Positionals fill host, username, password, snapshot id, path.
///
/// # Errors
///
/// `InvalidInput` if the host is empty or the snapshot id contains no digit.
pub fn resolve_tree(
    mut fields: RawFields,
    positionals: &[String],
    conn: &ConnectionArgs,
) -> Result<(ConnectionConfig, SnapshotId, String), ExError> {
    fill_from_positionals(
        &mut [
            &mut fields.host,
            &mut fields.username,
            &mut fields.password,
            &mut fields.source_id,
            &mut fields.compare_path,
        ],
        positionals,
    );
    let host = require_host(fields.host)?;
    let snapshot = require_snapshot_id("tree", fields.source_id)?;
    let path = non_empty(fields.compare_path).unwrap_or_else(|| DEFAULT_COMPARE_PATH.to_string());
    Ok((
        connection_config(host, fields.username, fields.password, conn),
        snapshot,
        path,
    ))
}

fn fill_from_positionals(slots: &mut [&mut Option<String>], positionals: &[String]) {
    let mut rest = positionals.iter();
    for slot in slots.iter_mut() {
        if slot.as_deref().map_or(true, str::is_empty) {
            **slot = rest.next().cloned();
        }
    }
    if rest.len() > 0 {
        tracing::warn!(ignored = rest.len(), "ignoring surplus positional arguments");
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn invalid_argument(detail: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("resolve_config")
        .with_message(format!("invalid argument: {}", detail))
}

fn require_host(host: Option<String>) -> Result<String, ExError> {
    non_empty(host).ok_or_else(|| invalid_argument("host is required"))
}

fn require_snapshot_id(which: &str, id: Option<String>) -> Result<SnapshotId, ExError> {
    match id {
        Some(id) if id.chars().any(|c| c.is_ascii_digit()) => Ok(SnapshotId::new(id)),
        _ => Err(invalid_argument(&format!(
            "{} snapshot id must contain a digit",
            which
        ))),
    }
}

fn connection_config(
    host: String,
    username: Option<String>,
    password: Option<String>,
    conn: &ConnectionArgs,
) -> ConnectionConfig {
    let username = non_empty(username);
    let password = non_empty(password);
    let (username, password) = match (username, password) {
        (None, None) => (DEFAULT_USERNAME.to_string(), DEFAULT_PASSWORD.to_string()),
        (username, password) => (username.unwrap_or_default(), password.unwrap_or_default()),
    };

    ConnectionConfig::new(host, username, password)
        .with_timeout(Duration::from_secs(conn.timeout))
        .with_accept_invalid_certs(!conn.verify_tls)
}
