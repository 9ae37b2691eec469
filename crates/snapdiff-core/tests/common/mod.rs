//! In-memory storage service used by the integration tests.
//!
//! Serves the namespace, snapshot catalogue and snapshot diff endpoints
//! from literal trees, records every request, and can inject failures.

#![allow(dead_code)]

use serde_json::{json, Map, Value};
use snapdiff_core::{ApiRequest, CancelToken, ExError, ExErrorKind, Snapshot, Transport};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Tag the fake server uses for directories present on both sides whose
/// subtree changed
pub const UNCLASSIFIED: &str = "UNCHANGED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(Vec<u8>),
    Dir,
}

pub fn file(content: &str) -> Node {
    Node::File(content.as_bytes().to_vec())
}

pub fn dir() -> Node {
    Node::Dir
}

/// One snapshot's namespace; `order` keeps the insertion order the
/// directory diff reports children in
#[derive(Default)]
struct Tree {
    nodes: BTreeMap<String, Node>,
    order: Vec<String>,
}

impl Tree {
    fn insert(&mut self, path: String, node: Node) {
        if self.nodes.insert(path.clone(), node).is_none() {
            self.order.push(path);
        }
    }

    fn insert_dir(&mut self, path: String) {
        if !self.nodes.contains_key(&path) {
            self.insert(path, Node::Dir);
        }
    }

    fn get(&self, path: &str) -> Option<&Node> {
        self.nodes.get(path)
    }
}

struct Fault {
    matches: Box<dyn Fn(&ApiRequest) -> bool>,
    kind: ExErrorKind,
}

pub struct FakeService {
    trees: BTreeMap<String, Tree>,
    catalogue: Vec<Snapshot>,
    dir_diff_page_limit: usize,
    file_diff_page_limit: usize,
    extent_block: usize,
    requests: RefCell<Vec<ApiRequest>>,
    fault: Option<Fault>,
    cancel_after: Option<(usize, CancelToken)>,
    body_override: Option<(Box<dyn Fn(&ApiRequest) -> bool>, Vec<u8>)>,
}

impl Default for FakeService {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            trees: BTreeMap::new(),
            catalogue: Vec::new(),
            dir_diff_page_limit: usize::MAX,
            file_diff_page_limit: usize::MAX,
            extent_block: 4,
            requests: RefCell::new(Vec::new()),
            fault: None,
            cancel_after: None,
            body_override: None,
        }
    }

    /// Add snapshot `sid` holding `entries`; parent directories are implied
    pub fn snapshot(mut self, sid: &str, entries: &[(&str, Node)]) -> Self {
        let mut tree = Tree::default();
        tree.insert("/".to_string(), Node::Dir);
        for (path, node) in entries {
            let mut parent = String::new();
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            for segment in &segments[..segments.len().saturating_sub(1)] {
                parent = format!("{}/{}", parent, segment);
                tree.insert_dir(parent.clone());
            }
            tree.insert(path.to_string(), node.clone());
        }
        self.catalogue.push(Snapshot {
            sid: sid.parse().unwrap_or(0),
            policy: "manual".to_string(),
            state: "active".to_string(),
            stime: 1_700_000_000,
            spid: 100,
        });
        self.trees.insert(sid.to_string(), tree);
        self
    }

    /// Cap the number of records per directory diff page
    pub fn dir_diff_page_limit(mut self, limit: usize) -> Self {
        self.dir_diff_page_limit = limit.max(1);
        self
    }

    /// Cap the number of extents per file diff page
    pub fn file_diff_page_limit(mut self, limit: usize) -> Self {
        self.file_diff_page_limit = limit.max(1);
        self
    }

    /// Fail every request matching `matches` with `kind`
    pub fn fail_when<F>(mut self, kind: ExErrorKind, matches: F) -> Self
    where
        F: Fn(&ApiRequest) -> bool + 'static,
    {
        self.fault = Some(Fault {
            matches: Box::new(matches),
            kind,
        });
        self
    }

    /// Answer requests matching `matches` with a fixed body
    pub fn respond_with<F>(mut self, body: &str, matches: F) -> Self
    where
        F: Fn(&ApiRequest) -> bool + 'static,
    {
        self.body_override = Some((Box::new(matches), body.as_bytes().to_vec()));
        self
    }

    /// Trip `token` once `n` requests have been served
    pub fn cancel_after(mut self, n: usize, token: CancelToken) -> Self {
        self.cancel_after = Some((n, token));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn tree(&self, sid: &str) -> Result<&Tree, ExError> {
        self.trees.get(sid).ok_or_else(|| not_found(sid))
    }

    fn serve(&self, request: &ApiRequest) -> Result<Value, ExError> {
        let path = request.path();
        if path == "snapshots" {
            return Ok(serde_json::to_value(&self.catalogue).unwrap());
        }
        if let Some(rel) = path.strip_prefix("namespace/") {
            let ns_path = absolute(rel);
            let sid = request.query_value("sid").unwrap_or_default();
            let tree = self.tree(sid)?;
            return if request.query_value("metadata").is_some() {
                stat(tree, &ns_path)
            } else {
                readdir(tree, &ns_path, request)
            };
        }
        if let Some(rest) = path.strip_prefix("snapshots/") {
            let parts: Vec<&str> = rest.splitn(4, '/').collect();
            if parts.len() >= 3 && parts[1] == "diff" {
                let source = self.tree(parts[0])?;
                let dest = self.tree(parts[2])?;
                let ns_path = absolute(parts.get(3).copied().unwrap_or(""));
                return match request.query_value("type") {
                    Some("directory") => self.diff_directory(source, dest, &ns_path, request),
                    Some("file") => self.diff_file(source, dest, &ns_path, request),
                    _ => Err(ExError::new(ExErrorKind::Transport).with_status(400)),
                };
            }
        }
        Err(not_found(path))
    }

    fn diff_directory(
        &self,
        source: &Tree,
        dest: &Tree,
        dir: &str,
        request: &ApiRequest,
    ) -> Result<Value, ExError> {
        let mut names: Vec<String> = Vec::new();
        for (name, _) in children(source, dir).chain(children(dest, dir)) {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let mut records = Vec::new();
        for name in names {
            let child = join(dir, &name);
            let tag = match (source.get(&child), dest.get(&child)) {
                (Some(_), None) => "DELETE",
                (None, Some(_)) => "CREATE",
                (Some(Node::File(a)), Some(Node::File(b))) if a != b => "MODIFY",
                (Some(Node::File(_)), Some(Node::File(_))) => continue,
                (Some(Node::Dir), Some(Node::Dir)) => {
                    if subtree(source, &child) == subtree(dest, &child) {
                        continue;
                    }
                    UNCLASSIFIED
                }
                (Some(_), Some(_)) => "MODIFY",
                (None, None) => continue,
            };
            records.push(json!({"name": name, "type": tag}));
        }

        let count = query_usize(request, "count").unwrap_or(usize::MAX);
        Ok(page(records, query_usize(request, "offset").unwrap_or(0), count.min(self.dir_diff_page_limit)))
    }

    fn diff_file(
        &self,
        source: &Tree,
        dest: &Tree,
        file: &str,
        request: &ApiRequest,
    ) -> Result<Value, ExError> {
        let (a, b) = match (source.get(file), dest.get(file)) {
            (Some(Node::File(a)), Some(Node::File(b))) => (a, b),
            _ => return Err(not_found(file)),
        };

        let len = a.len().max(b.len());
        let mut extents = Vec::new();
        let mut offset = 0;
        while offset < len {
            let end = (offset + self.extent_block).min(len);
            if a.get(offset..end.min(a.len())) != b.get(offset..end.min(b.len())) {
                extents.push(json!({"offset": offset, "length": end - offset, "type": "MODIFY"}));
            }
            offset = end;
        }

        Ok(page(extents, query_usize(request, "offset").unwrap_or(0), self.file_diff_page_limit))
    }
}

impl Transport for FakeService {
    fn get(&self, request: &ApiRequest) -> snapdiff_core::Result<Vec<u8>> {
        self.requests.borrow_mut().push(request.clone());
        let served = self.requests.borrow().len();
        if let Some((n, token)) = &self.cancel_after {
            if served >= *n {
                token.cancel();
            }
        }

        if let Some(fault) = &self.fault {
            if (fault.matches)(request) {
                return Err(ExError::new(fault.kind).with_message("injected fault"));
            }
        }
        if let Some((matches, body)) = &self.body_override {
            if matches(request) {
                return Ok(body.clone());
            }
        }
        let value = self.serve(request)?;
        Ok(serde_json::to_vec(&value).unwrap())
    }
}

// ---------------------------------------------------------------------------
// Tree helpers
// ---------------------------------------------------------------------------

fn absolute(rel: &str) -> String {
    let trimmed = rel.trim_matches('/');
    format!("/{}", trimmed)
}

fn join(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", dir, name)
    }
}

fn not_found(what: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_status(404)
        .with_message(format!("{} not found", what))
}

/// Immediate children of `dir` in insertion order
fn children<'t>(tree: &'t Tree, dir: &str) -> impl Iterator<Item = (String, &'t Node)> + 't {
    let prefix = if dir == "/" {
        "/".to_string()
    } else {
        format!("{}/", dir)
    };
    tree.order.iter().filter_map(move |path| {
        let rest = path.strip_prefix(&prefix)?;
        if rest.is_empty() || rest.contains('/') {
            return None;
        }
        Some((rest.to_string(), tree.get(path)?))
    })
}

fn subtree<'t>(tree: &'t Tree, dir: &str) -> Vec<(&'t String, &'t Node)> {
    let prefix = format!("{}/", dir);
    tree.nodes
        .iter()
        .filter(|(path, _)| path.starts_with(&prefix))
        .collect()
}

fn type_name(node: &Node) -> &'static str {
    match node {
        Node::File(_) => "file",
        Node::Dir => "directory",
    }
}

fn stat(tree: &Tree, ns_path: &str) -> Result<Value, ExError> {
    let node = tree.get(ns_path).ok_or_else(|| not_found(ns_path))?;
    let size = match node {
        Node::File(bytes) => bytes.len(),
        Node::Dir => 4096,
    };
    Ok(json!({"type": type_name(node), "size": size, "nlink": 1, "owner-name": "root"}))
}

fn readdir(tree: &Tree, dir: &str, request: &ApiRequest) -> Result<Value, ExError> {
    match tree.get(dir) {
        Some(Node::Dir) => {}
        Some(Node::File(_)) => {
            return Err(ExError::new(ExErrorKind::Transport)
                .with_status(400)
                .with_message("not a directory"))
        }
        None => return Err(not_found(dir)),
    }
    let offset = query_usize(request, "offset").unwrap_or(0);
    let count = query_usize(request, "count").unwrap_or(usize::MAX);
    let mut sorted: Vec<(String, &Node)> = children(tree, dir).collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    let mut listing = Map::new();
    for (name, node) in sorted.into_iter().skip(offset).take(count) {
        listing.insert(name, json!({"type": type_name(node)}));
    }
    Ok(Value::Object(listing))
}

fn query_usize(request: &ApiRequest, key: &str) -> Option<usize> {
    request.query_value(key).and_then(|v| v.parse().ok())
}

fn page(records: Vec<Value>, offset: usize, limit: usize) -> Value {
    let total = records.len();
    let content: Vec<Value> = records.into_iter().skip(offset).take(limit).collect();
    let end = offset + content.len();
    if end < total {
        json!({"content": content, "next": end})
    } else {
        json!({"content": content})
    }
}
