//! Text renderers for diff results and snapshot listings.

pub mod change_list;
pub mod snapshot_table;

pub use change_list::OutputStyle;
pub use snapshot_table::render_snapshot_table;
