//! In-memory Transport
//!
//! Models a remote server as a tree of directories and files with the same
//! single-level `MKD` semantics as FTP: creating a directory or storing a
//! file under a missing parent fails. Backs `--dry-run` and the tests.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use crate::domain::ports::{
    ConnectionSettings, RemoteEntry, Transport, TransportError, TransportResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Directory,
    File(Vec<u8>),
}

/// In-memory remote file system
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    nodes: BTreeMap<String, Node>,
    cwd: String,
    connected: bool,
    ready: bool,
    close_count: usize,
    operations: Vec<String>,
    /// `(operation, path suffix)` that fails when matched
    failure: Option<(String, String)>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    /// Empty server with only `/`
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Directory);
        Self {
            nodes,
            cwd: "/".to_string(),
            connected: false,
            ready: false,
            close_count: 0,
            operations: Vec::new(),
            failure: None,
        }
    }

    /// Pre-create a directory (and its parents)
    pub fn with_directory(mut self, path: &str) -> Self {
        let absolute = resolve("/", path);
        for ancestor in ancestors_of(&absolute) {
            self.nodes.insert(ancestor, Node::Directory);
        }
        self.nodes.insert(absolute, Node::Directory);
        self
    }

    /// Pre-create a file (and its parent directories)
    pub fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        let absolute = resolve("/", path);
        for ancestor in ancestors_of(&absolute) {
            self.nodes.insert(ancestor, Node::Directory);
        }
        self.nodes.insert(absolute, Node::File(content.to_vec()));
        self
    }

    /// Make the next `operation` (e.g. `"STOR"`) on a path ending in `suffix` fail
    pub fn fail_on(mut self, operation: &str, suffix: &str) -> Self {
        self.failure = Some((operation.to_string(), suffix.to_string()));
        self
    }

    /// Operations performed so far, e.g. `"MKD /www/app"`
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// How many times `close` was called on a live session
    pub fn close_count(&self) -> usize {
        self.close_count
    }

    pub fn is_directory(&self, path: &str) -> bool {
        self.nodes.get(&resolve("/", path)) == Some(&Node::Directory)
    }

    /// Content of a file by absolute path
    pub fn file(&self, path: &str) -> Option<&[u8]> {
        match self.nodes.get(&resolve("/", path)) {
            Some(Node::File(content)) => Some(content),
            _ => None,
        }
    }

    /// Files below `root`, as paths relative to it, sorted
    pub fn files_under(&self, root: &str) -> Vec<String> {
        let root = resolve("/", root);
        let prefix = if root == "/" {
            root.clone()
        } else {
            format!("{}/", root)
        };
        self.nodes
            .iter()
            .filter(|(path, node)| matches!(node, Node::File(_)) && path.starts_with(&prefix))
            .map(|(path, _)| path[prefix.len()..].to_string())
            .collect()
    }

    fn record(&mut self, operation: &str, path: &str) -> TransportResult<()> {
        self.operations.push(format!("{} {}", operation, path));
        match &self.failure {
            Some((op, suffix)) if op == operation && path.ends_with(suffix.as_str()) => {
                self.failure = None;
                Err(TransportError::Injected(format!("{} {}", operation, path)))
            }
            _ => Ok(()),
        }
    }

    fn require_ready(&self) -> TransportResult<()> {
        if self.connected && self.ready {
            Ok(())
        } else {
            Err(TransportError::NotConnected)
        }
    }

    fn require_parent(&self, absolute: &str) -> TransportResult<()> {
        let parent = parent_of(absolute);
        match self.nodes.get(&parent) {
            Some(Node::Directory) => Ok(()),
            _ => Err(TransportError::NotFound(parent)),
        }
    }

    fn children_of(&self, directory: &str) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|path| path.as_str() != "/" && parent_of(path) == directory)
            .cloned()
            .collect()
    }
}

impl Transport for MemoryTransport {
    fn connect(&mut self, settings: &ConnectionSettings) -> TransportResult<()> {
        self.record("CONNECT", &settings.host)?;
        self.connected = true;
        Ok(())
    }

    fn await_ready(&mut self) -> TransportResult<()> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }
        self.record("LOGIN", "/")?;
        self.ready = true;
        Ok(())
    }

    fn current_directory(&self) -> &str {
        &self.cwd
    }

    fn change_directory(&mut self, path: &str) -> TransportResult<()> {
        self.require_ready()?;
        let absolute = resolve(&self.cwd, path);
        self.record("CWD", &absolute)?;
        match self.nodes.get(&absolute) {
            Some(Node::Directory) => {
                self.cwd = absolute;
                Ok(())
            }
            _ => Err(TransportError::NotFound(absolute)),
        }
    }

    fn list(&mut self) -> TransportResult<Vec<RemoteEntry>> {
        self.require_ready()?;
        let cwd = self.cwd.clone();
        self.record("LIST", &cwd)?;
        Ok(self
            .children_of(&cwd)
            .into_iter()
            .map(|path| {
                let name = path.rsplit('/').next().unwrap_or(&path).to_string();
                match &self.nodes[&path] {
                    Node::Directory => RemoteEntry::directory(name),
                    Node::File(content) => RemoteEntry::file(name, content.len() as u64),
                }
            })
            .collect())
    }

    fn make_directory(&mut self, path: &str, recursive: bool) -> TransportResult<()> {
        self.require_ready()?;
        let absolute = resolve(&self.cwd, path);
        self.record("MKD", &absolute)?;

        if recursive {
            for directory in ancestors_of(&absolute).into_iter().chain([absolute]) {
                match self.nodes.get(&directory) {
                    Some(Node::Directory) => {}
                    Some(Node::File(_)) => return Err(TransportError::AlreadyExists(directory)),
                    None => {
                        self.nodes.insert(directory, Node::Directory);
                    }
                }
            }
            return Ok(());
        }

        if self.nodes.contains_key(&absolute) {
            return Err(TransportError::AlreadyExists(absolute));
        }
        self.require_parent(&absolute)?;
        self.nodes.insert(absolute, Node::Directory);
        Ok(())
    }

    fn remove_directory(&mut self, path: &str, recursive: bool) -> TransportResult<()> {
        self.require_ready()?;
        let absolute = resolve(&self.cwd, path);
        self.record("RMD", &absolute)?;

        if self.nodes.get(&absolute) != Some(&Node::Directory) || absolute == "/" {
            return Err(TransportError::NotFound(absolute));
        }

        let prefix = format!("{}/", absolute);
        let has_children = self.nodes.keys().any(|p| p.starts_with(&prefix));
        if has_children && !recursive {
            return Err(TransportError::protocol("RMD", "550 Directory not empty"));
        }

        self.nodes.retain(|p, _| p != &absolute && !p.starts_with(&prefix));
        Ok(())
    }

    fn upload_file(&mut self, local: &Path, remote: &str) -> TransportResult<u64> {
        self.require_ready()?;
        let absolute = resolve(&self.cwd, remote);
        self.record("STOR", &absolute)?;
        self.require_parent(&absolute)?;

        if self.nodes.get(&absolute) == Some(&Node::Directory) {
            return Err(TransportError::AlreadyExists(absolute));
        }

        let content = std::fs::read(local)?;
        let size = content.len() as u64;
        self.nodes.insert(absolute, Node::File(content));
        Ok(size)
    }

    fn retrieve_file(&mut self, remote: &str) -> TransportResult<Cursor<Vec<u8>>> {
        self.require_ready()?;
        let absolute = resolve(&self.cwd, remote);
        self.record("RETR", &absolute)?;
        match self.nodes.get(&absolute) {
            Some(Node::File(content)) => Ok(Cursor::new(content.clone())),
            _ => Err(TransportError::NotFound(absolute)),
        }
    }

    fn close(&mut self) -> TransportResult<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        self.ready = false;
        self.close_count += 1;
        self.record("QUIT", "/")
    }
}

/// Resolve `path` against `cwd` into a normalized absolute path
fn resolve(cwd: &str, path: &str) -> String {
    let mut segments: Vec<&str> = if path.starts_with('/') {
        Vec::new()
    } else {
        cwd.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    format!("/{}", segments.join("/"))
}

fn parent_of(absolute: &str) -> String {
    match absolute.rsplit_once('/') {
        Some(("", _)) | None => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
    }
}

/// Proper ancestors of an absolute path, shallowest first, including `/`
fn ancestors_of(absolute: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = absolute.to_string();
    while current != "/" {
        current = parent_of(&current);
        out.push(current.clone());
    }
    out.reverse();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    fn settings() -> ConnectionSettings {
        ConnectionSettings {
            host: "memory".to_string(),
            port: 21,
            user: "test".to_string(),
            password: String::new(),
            timeout: None,
        }
    }

    fn ready(transport: MemoryTransport) -> MemoryTransport {
        let mut transport = transport;
        transport.connect(&settings()).unwrap();
        transport.await_ready().unwrap();
        transport
    }

    #[test]
    fn resolve_handles_relative_and_parent_segments() {
        assert_eq!(resolve("/www", "app"), "/www/app");
        assert_eq!(resolve("/www/app", "../other"), "/www/other");
        assert_eq!(resolve("/www", "/srv"), "/srv");
        assert_eq!(resolve("/", "."), "/");
    }

    #[test]
    fn operations_require_login() {
        let mut transport = MemoryTransport::new();
        assert!(matches!(transport.list(), Err(TransportError::NotConnected)));
    }

    #[test]
    fn non_recursive_mkdir_needs_parent() {
        let mut transport = ready(MemoryTransport::new());
        assert!(matches!(
            transport.make_directory("a/b", false),
            Err(TransportError::NotFound(_))
        ));
        transport.make_directory("a/b", true).unwrap();
        assert!(transport.is_directory("/a"));
        assert!(transport.is_directory("/a/b"));
    }

    #[test]
    fn upload_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let local = dir.path().join("index.js");
        std::fs::write(&local, "x").unwrap();

        let mut transport = ready(MemoryTransport::new());
        assert!(transport.upload_file(&local, "lib/index.js").is_err());

        transport.make_directory("lib", false).unwrap();
        assert_eq!(transport.upload_file(&local, "lib/index.js").unwrap(), 1);

        let mut content = String::new();
        transport
            .retrieve_file("/lib/index.js")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "x");
    }

    #[test]
    fn list_and_remove_recursive() {
        let mut transport = ready(
            MemoryTransport::new()
                .with_file("/www/app/index.js", b"old")
                .with_directory("/www/other"),
        );
        transport.change_directory("/www").unwrap();

        let names: Vec<String> = transport.list().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["app", "other"]);

        assert!(transport.remove_directory("app", false).is_err());
        transport.remove_directory("app", true).unwrap();
        assert!(!transport.is_directory("/www/app"));
        assert!(transport.file("/www/app/index.js").is_none());
        assert!(transport.is_directory("/www/other"));
    }

    #[test]
    fn injected_failure_fires_once() {
        let mut transport = ready(MemoryTransport::new().fail_on("MKD", "lib"));
        assert!(matches!(
            transport.make_directory("lib", true),
            Err(TransportError::Injected(_))
        ));
        assert!(transport.make_directory("lib", true).is_ok());
    }

    #[test]
    fn close_counts_live_sessions_only() {
        let mut transport = MemoryTransport::new();
        transport.close().unwrap();
        assert_eq!(transport.close_count(), 0);

        let mut transport = ready(transport);
        transport.close().unwrap();
        transport.close().unwrap();
        assert_eq!(transport.close_count(), 1);
        assert!(!transport.is_connected());
    }
}
