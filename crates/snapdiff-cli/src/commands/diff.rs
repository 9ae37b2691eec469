//! Snapshot diff command

use crate::commands::{cancel_on_signals, connect, write_output, CommandResult};
use crate::config::{resolve_diff, ConnectionArgs, RawFields};
use clap::Args;
use snapdiff_core::logging_facility;
use snapdiff_core::namespace::DEFAULT_PAGE_SIZE;
use snapdiff_core::{OutputStyle, SnapshotDiffer};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Source snapshot id
    #[arg(short = 'f', long = "sourceid", env = "SID")]
    pub source_id: Option<String>,

    /// Destination snapshot id
    #[arg(short = 't', long = "destid", env = "DID")]
    pub dest_id: Option<String>,

    /// Path to compare
    #[arg(short = 'c', long = "comparepath", env = "COMPAREPATH")]
    pub compare_path: Option<String>,

    /// Write the change list to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// standard, rsync-all, rsync, differ or json
    #[arg(short = 's', long, default_value = "standard")]
    pub style: OutputStyle,

    /// Entries requested per listing or diff page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// HOST USERNAME PASSWORD SID DID COMPAREPATH, filling unset fields in order
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

pub fn execute(args: DiffArgs) -> CommandResult {
    logging_facility::init(args.connection.log_profile.into());

    let fields = RawFields {
        source_id: args.source_id.clone(),
        dest_id: args.dest_id.clone(),
        compare_path: args.compare_path.clone(),
        ..RawFields::from_connection(&args.connection)
    };
    let config = resolve_diff(fields, &args.args, &args.connection)?;

    let cancel = cancel_on_signals()?;
    let session = connect(&config.connection, &cancel)?;

    let changes = SnapshotDiffer::new(&session)
        .with_cancel(cancel)
        .with_page_size(args.page_size)
        .diff(&config.source, &config.dest, &config.compare_path)?;

    let rendered = args.style.render(&changes)?;
    write_output(args.output.as_deref(), &rendered)?;
    Ok(())
}
