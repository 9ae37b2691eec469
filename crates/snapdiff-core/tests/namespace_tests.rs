#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{dir, file, FakeService};
use snapdiff_core::{EntryType, ExErrorKind, Namespace, NamespaceEntry, SnapshotId};

fn tree_service() -> FakeService {
    FakeService::new().snapshot(
        "5",
        &[
            ("/top/a.txt", file("a")),
            ("/top/b/c.txt", file("c")),
            ("/top/b/d/e.txt", file("e")),
            ("/top/empty", dir()),
            ("/top/z.txt", file("z")),
        ],
    )
}

#[test]
fn test_stat_reports_entry_type() {
    let svc = tree_service();
    let ns = Namespace::new(&svc);
    let snapshot = SnapshotId::new("5");

    let entry = ns.stat("/top/b", &snapshot).unwrap();
    assert_eq!(entry, NamespaceEntry::new("/top/b", EntryType::Directory));

    let entry = ns.stat("/top/a.txt", &snapshot).unwrap();
    assert_eq!(entry.entry_type, EntryType::File);
    assert_eq!(entry.display_path(), "/top/a.txt");
}

#[test]
fn test_stat_missing_path_is_not_found_with_context() {
    let svc = tree_service();
    let ns = Namespace::new(&svc);

    let err = ns.stat("/top/missing", &SnapshotId::new("5")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.op(), Some("stat"));
    assert_eq!(err.path(), Some("/top/missing"));
    assert_eq!(err.snapshot_id(), Some("5"));
}

#[test]
fn test_stat_request_shape() {
    let svc = tree_service();
    Namespace::new(&svc)
        .stat("/top/b", &SnapshotId::new("5"))
        .unwrap();

    let requests = svc.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path(), "namespace/top/b");
    assert_eq!(requests[0].query_value("metadata"), Some("true"));
    assert_eq!(requests[0].query_value("sid"), Some("5"));
}

#[test]
fn test_list_children_short_page_ends_listing() {
    let svc = tree_service();
    let ns = Namespace::new(&svc).with_page_size(10);

    let page = ns.list_children("/top", &SnapshotId::new("5"), 0).unwrap();

    let paths: Vec<&str> = page.children.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["/top/a.txt", "/top/b", "/top/empty", "/top/z.txt"]
    );
    assert_eq!(page.next_offset, None);
}

#[test]
fn test_list_children_full_page_continues() {
    let svc = tree_service();
    let ns = Namespace::new(&svc).with_page_size(2);
    let snapshot = SnapshotId::new("5");

    let first = ns.list_children("/top", &snapshot, 0).unwrap();
    assert_eq!(first.children.len(), 2);
    assert_eq!(first.next_offset, Some(2));

    let second = ns.list_children("/top", &snapshot, 2).unwrap();
    assert_eq!(second.children.len(), 2);
    assert_eq!(second.next_offset, Some(4));

    let third = ns.list_children("/top", &snapshot, 4).unwrap();
    assert!(third.children.is_empty());
    assert_eq!(third.next_offset, None);
}

#[test]
fn test_list_children_skips_dot_entries() {
    let svc = tree_service().respond_with(
        r#"{".": {"type": "directory"}, "..": {"type": "directory"}, "f": {"type": "file"}}"#,
        |r| r.path() == "namespace/top" && r.query_value("metadata").is_none(),
    );

    let page = Namespace::new(&svc)
        .list_children("/top", &SnapshotId::new("5"), 0)
        .unwrap();

    assert_eq!(page.children, vec![NamespaceEntry::new("/top/f", EntryType::File)]);
}

#[test]
fn test_children_pages_stop_on_exact_multiple() {
    // GIVEN four children and a page size of two
    let svc = tree_service();
    let ns = Namespace::new(&svc).with_page_size(2);

    // WHEN draining the page sequence
    let pages: Vec<_> = ns
        .children("/top", &SnapshotId::new("5"))
        .collect::<Result<_, _>>()
        .unwrap();

    // THEN two full pages are yielded and the trailing empty page is not
    assert_eq!(pages.len(), 2);
    assert_eq!(svc.request_count(), 3);
}

#[test]
fn test_walk_is_pre_order_and_excludes_root() {
    let svc = tree_service();
    let ns = Namespace::new(&svc);

    let paths: Vec<String> = ns
        .walk("/top", &SnapshotId::new("5"))
        .map(|e| e.unwrap().display_path())
        .collect();

    assert_eq!(
        paths,
        vec![
            "/top/a.txt",
            "/top/b/",
            "/top/b/c.txt",
            "/top/b/d/",
            "/top/b/d/e.txt",
            "/top/empty/",
            "/top/z.txt",
        ]
    );
}

#[test]
fn test_walk_is_lazy() {
    let svc = tree_service();
    let ns = Namespace::new(&svc);

    let first_two: Vec<_> = ns.walk("/top", &SnapshotId::new("5")).take(2).collect();

    assert_eq!(first_two.len(), 2);
    // Only the root listing was fetched; /top/b is listed when the walk descends
    assert_eq!(svc.request_count(), 1);
}

#[test]
fn test_walk_stops_after_error() {
    let svc = tree_service().fail_when(ExErrorKind::Timeout, |r| r.path() == "namespace/top/b/d");
    let ns = Namespace::new(&svc);

    let results: Vec<_> = ns.walk("/top", &SnapshotId::new("5")).collect();

    let errors: Vec<_> = results.iter().filter(|r| r.is_err()).collect();
    assert_eq!(errors.len(), 1);
    assert!(results.last().unwrap().is_err());
    assert_eq!(
        results.last().unwrap().as_ref().unwrap_err().kind(),
        ExErrorKind::Timeout
    );
}

#[test]
fn test_walk_of_empty_directory_yields_nothing() {
    let svc = tree_service();
    let ns = Namespace::new(&svc);

    assert_eq!(ns.walk("/top/empty", &SnapshotId::new("5")).count(), 0);
}
