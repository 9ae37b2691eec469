//! Snapshot catalogue command

use crate::commands::{cancel_on_signals, connect, write_output, CommandResult};
use crate::config::{resolve_connection, ConnectionArgs, RawFields};
use clap::Args;
use snapdiff_core::errors::{ExError, ExErrorKind};
use snapdiff_core::render::render_snapshot_table;
use snapdiff_core::{list_snapshots, logging_facility};

#[derive(Debug, Args)]
pub struct SnapshotsArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// HOST USERNAME PASSWORD, filling unset fields in order
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

pub fn execute(args: SnapshotsArgs) -> CommandResult {
    logging_facility::init(args.connection.log_profile.into());

    let config = resolve_connection(
        RawFields::from_connection(&args.connection),
        &args.args,
        &args.connection,
    )?;
    let cancel = cancel_on_signals()?;
    let session = connect(&config, &cancel)?;

    let snapshots = list_snapshots(&session)?;
    let text = if args.json {
        let mut json = serde_json::to_string_pretty(&snapshots).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("render_snapshots")
                .with_message(e.to_string())
        })?;
        json.push('\n');
        json
    } else {
        render_snapshot_table(&snapshots)
    };

    write_output(None, text.as_bytes())?;
    Ok(())
}
