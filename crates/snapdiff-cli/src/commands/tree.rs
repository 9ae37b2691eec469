//! Subtree listing command

use crate::commands::{cancel_on_signals, connect, write_output, CommandResult};
use crate::config::{resolve_tree, ConnectionArgs, RawFields};
use clap::Args;
use snapdiff_core::namespace::DEFAULT_PAGE_SIZE;
use snapdiff_core::{logging_facility, path, Namespace};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Snapshot id
    #[arg(short = 'f', long = "sourceid", env = "SID")]
    pub snapshot_id: Option<String>,

    /// Path to list
    #[arg(short = 'c', long = "comparepath", env = "COMPAREPATH")]
    pub path: Option<String>,

    /// Write the listing to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Entries requested per listing page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// HOST USERNAME PASSWORD SID PATH, filling unset fields in order
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

pub fn execute(args: TreeArgs) -> CommandResult {
    logging_facility::init(args.connection.log_profile.into());

    let fields = RawFields {
        source_id: args.snapshot_id.clone(),
        compare_path: args.path.clone(),
        ..RawFields::from_connection(&args.connection)
    };
    let (config, snapshot, root) = resolve_tree(fields, &args.args, &args.connection)?;
    let root = path::normalize(&root);

    let cancel = cancel_on_signals()?;
    let session = connect(&config, &cancel)?;
    let namespace = Namespace::new(&session)
        .with_cancel(cancel)
        .with_page_size(args.page_size);

    let mut listing = String::new();
    let entry = namespace.stat(&root, &snapshot)?;
    if entry.is_dir() {
        for descendant in namespace.walk(&root, &snapshot) {
            let _ = writeln!(listing, "{}", descendant?.display_path());
        }
    } else {
        let _ = writeln!(listing, "{}", entry.display_path());
    }

    write_output(args.output.as_deref(), listing.as_bytes())?;
    Ok(())
}
