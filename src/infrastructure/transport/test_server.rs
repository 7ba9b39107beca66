//! Loopback FTP server for `FtpTransport` tests
//!
//! Serves one client session over 127.0.0.1 with passive-mode `LIST`
//! and an in-memory tree. Every command line received is recorded.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Directory,
    File,
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<String, Node>,
    commands: Vec<String>,
}

pub struct TestServer {
    port: u16,
    state: Arc<Mutex<State>>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Start a server whose tree holds `/` plus the given directories and files
    pub fn start(directories: &[&str], files: &[&str]) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Directory);
        for dir in directories {
            nodes.insert(dir.to_string(), Node::Directory);
        }
        for file in files {
            nodes.insert(file.to_string(), Node::File);
        }
        let state = Arc::new(Mutex::new(State {
            nodes,
            commands: Vec::new(),
        }));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let shared = Arc::clone(&state);
        let handle = std::thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                serve(stream, &shared);
            }
        });

        Self {
            port,
            state,
            handle: Some(handle),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Command lines received so far, e.g. `"MKD a"`
    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    /// Commands received after the login sequence (`USER`, `TYPE`, `PWD`)
    pub fn commands_after_login(&self) -> Vec<String> {
        self.commands().into_iter().skip(3).collect()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.state.lock().unwrap().nodes.contains_key(path)
    }

    /// Wait for the session to end (after `QUIT`)
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}

fn serve(stream: TcpStream, state: &Mutex<State>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut out = stream;
    let mut cwd = "/".to_string();
    let mut passive: Option<TcpListener> = None;

    reply(&mut out, "220 test server ready");
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        let line = line.trim_end().to_string();
        state.lock().unwrap().commands.push(line.clone());

        let (command, argument) = match line.split_once(' ') {
            Some((c, a)) => (c.to_string(), a.to_string()),
            None => (line.clone(), String::new()),
        };
        let path = resolve(&cwd, &argument);
        let mut state = state.lock().unwrap();

        match command.as_str() {
            "USER" => reply(&mut out, "230 logged in"),
            "TYPE" => reply(&mut out, "200 type set"),
            "PWD" => reply(&mut out, &format!("257 \"{}\" is current", cwd)),
            "CWD" => match state.nodes.get(&path) {
                Some(Node::Directory) => {
                    cwd = path;
                    reply(&mut out, "250 ok");
                }
                _ => reply(&mut out, "550 no such directory"),
            },
            "MKD" => {
                let parent_ok = state.nodes.get(&parent_of(&path)) == Some(&Node::Directory);
                if parent_ok && !state.nodes.contains_key(&path) {
                    state.nodes.insert(path.clone(), Node::Directory);
                    reply(&mut out, &format!("257 \"{}\" created", path));
                } else {
                    reply(&mut out, "550 cannot create");
                }
            }
            "RMD" => {
                let empty = children(&state.nodes, &path).is_empty();
                if state.nodes.get(&path) == Some(&Node::Directory) && empty {
                    state.nodes.remove(&path);
                    reply(&mut out, "250 removed");
                } else {
                    reply(&mut out, "550 cannot remove");
                }
            }
            "DELE" => {
                if state.nodes.get(&path) == Some(&Node::File) {
                    state.nodes.remove(&path);
                    reply(&mut out, "250 deleted");
                } else {
                    reply(&mut out, "550 no such file");
                }
            }
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0").unwrap();
                let port = listener.local_addr().unwrap().port();
                passive = Some(listener);
                reply(
                    &mut out,
                    &format!(
                        "227 Entering Passive Mode (127,0,0,1,{},{})",
                        port / 256,
                        port % 256
                    ),
                );
            }
            "LIST" => {
                let Some(listener) = passive.take() else {
                    reply(&mut out, "425 use PASV first");
                    continue;
                };
                let (mut data, _) = listener.accept().unwrap();
                reply(&mut out, "150 here it comes");
                for (name, node) in children(&state.nodes, &path) {
                    let kind = if node == Node::Directory { 'd' } else { '-' };
                    write!(data, "{}rw-r--r-- 1 ftp ftp 0 Jan 01 12:00 {}\r\n", kind, name)
                        .unwrap();
                }
                drop(data);
                reply(&mut out, "226 transfer complete");
            }
            "QUIT" => {
                reply(&mut out, "221 bye");
                return;
            }
            _ => reply(&mut out, "502 not implemented"),
        }
    }
}

fn reply(out: &mut TcpStream, line: &str) {
    write!(out, "{}\r\n", line).unwrap();
    out.flush().unwrap();
}

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

fn parent_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) | None => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
    }
}

fn children(nodes: &BTreeMap<String, Node>, directory: &str) -> Vec<(String, Node)> {
    nodes
        .iter()
        .filter(|(path, _)| path.as_str() != "/" && parent_of(path) == directory)
        .map(|(path, node)| (path.rsplit('/').next().unwrap_or(path).to_string(), *node))
        .collect()
}
