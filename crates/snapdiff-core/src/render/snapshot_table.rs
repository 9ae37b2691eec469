use crate::model::Snapshot;
use std::fmt::Write as _;

/// Render snapshots as an aligned plain-text table, newest id last
pub fn render_snapshot_table(snapshots: &[Snapshot]) -> String {
    let mut rows: Vec<&Snapshot> = snapshots.iter().collect();
    rows.sort_by_key(|s| s.sid);

    let policy_width = rows
        .iter()
        .map(|s| s.policy.len())
        .chain(std::iter::once("POLICY".len()))
        .max()
        .unwrap_or(0);
    let state_width = rows
        .iter()
        .map(|s| s.state.len())
        .chain(std::iter::once("STATE".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>8}  {:<pw$}  {:<sw$}  {:>12}  {:>8}",
        "SID",
        "POLICY",
        "STATE",
        "STIME",
        "SPID",
        pw = policy_width,
        sw = state_width
    );
    for s in rows {
        let _ = writeln!(
            out,
            "{:>8}  {:<pw$}  {:<sw$}  {:>12}  {:>8}",
            s.sid,
            s.policy,
            s.state,
            s.stime,
            s.spid,
            pw = policy_width,
            sw = state_width
        );
    }
    out
}
