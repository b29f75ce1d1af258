//! Asking the OS who is listening on a TCP port.
//!
//! Unix uses `lsof`, Windows uses `netstat`. Both only see what the current
//! user may see, so an empty answer is confirmed with a bind test before the
//! port is declared free.

use regex::Regex;
use serde::Serialize;
use std::io::ErrorKind;
use std::net::TcpListener;
use std::sync::LazyLock;

use crate::error::{DepotError, Result};
use crate::shell::{execute, CommandSpec, Platform};

static NETSTAT_LISTEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*TCP\s+(\S+):(\d+)\s+\S+\s+LISTENING\s+(\d+)\s*$").unwrap()
});

/// A process holding a listening socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listener {
    /// Process id, when the OS reported one.
    pub pid: Option<u32>,
    /// Command name, when the OS reported one.
    pub command: Option<String>,
}

/// Source of listener information.
pub trait ListenerProbe {
    /// Processes listening on `port`. Empty means the port is free.
    fn listeners(&self, port: u16) -> Result<Vec<Listener>>;
}

/// Queries the real system.
#[derive(Debug, Clone, Copy)]
pub struct SystemProbe {
    platform: Platform,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }

    fn query_tool(&self, port: u16) -> Option<Vec<Listener>> {
        let spec = match self.platform {
            Platform::Unix => CommandSpec::new("lsof").args([
                "-nP".to_string(),
                format!("-iTCP:{}", port),
                "-sTCP:LISTEN".to_string(),
                "-F".to_string(),
                "pc".to_string(),
            ]),
            Platform::Windows => CommandSpec::new("netstat").args(["-ano", "-p", "TCP"]),
        };

        let stdout = match execute(&spec, true) {
            // lsof exits 1 when nothing matched
            Ok(result) if result.success || result.stdout.trim().is_empty() => result.stdout,
            Ok(result) => {
                tracing::debug!("{} exited with {:?}", spec.program_name(), result.exit_code);
                return None;
            }
            Err(DepotError::MissingPrerequisite { what, .. }) => {
                tracing::debug!("{} not available, falling back to bind test", what);
                return None;
            }
            Err(e) => {
                tracing::debug!("Port query failed: {}", e);
                return None;
            }
        };

        Some(match self.platform {
            Platform::Unix => parse_lsof(&stdout),
            Platform::Windows => parse_netstat(&stdout, port),
        })
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerProbe for SystemProbe {
    fn listeners(&self, port: u16) -> Result<Vec<Listener>> {
        if let Some(found) = self.query_tool(port) {
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Ok(bind_probe(port))
    }
}

/// Detect a conflict by trying to bind the port ourselves.
///
/// Reports an anonymous listener on `AddrInUse`. Any other bind error
/// (for example a privileged port) says nothing about other processes.
pub fn bind_probe(port: u16) -> Vec<Listener> {
    match TcpListener::bind(("0.0.0.0", port)) {
        Ok(_) => Vec::new(),
        Err(e) if e.kind() == ErrorKind::AddrInUse => vec![Listener {
            pid: None,
            command: None,
        }],
        Err(e) => {
            tracing::debug!("Bind test on port {} inconclusive: {}", port, e);
            Vec::new()
        }
    }
}

/// Parse `lsof -F pc` field output.
///
/// Each process starts with a `p<pid>` line, optionally followed by
/// `c<command>`. Other field lines are ignored.
pub fn parse_lsof(output: &str) -> Vec<Listener> {
    let mut listeners: Vec<Listener> = Vec::new();
    for line in output.lines() {
        let (tag, value) = match line.chars().next() {
            Some(tag) => (tag, line[tag.len_utf8()..].trim()),
            None => continue,
        };
        match tag {
            'p' => {
                if let Ok(pid) = value.parse::<u32>() {
                    if !listeners.iter().any(|l| l.pid == Some(pid)) {
                        listeners.push(Listener {
                            pid: Some(pid),
                            command: None,
                        });
                    }
                }
            }
            'c' => {
                if let Some(last) = listeners.last_mut() {
                    if last.command.is_none() && !value.is_empty() {
                        last.command = Some(value.to_string());
                    }
                }
            }
            _ => {}
        }
    }
    listeners
}

/// Parse `netstat -ano -p TCP` output for listeners on `port`.
pub fn parse_netstat(output: &str, port: u16) -> Vec<Listener> {
    let mut listeners: Vec<Listener> = Vec::new();
    for caps in output.lines().filter_map(|l| NETSTAT_LISTEN.captures(l)) {
        if caps[2].parse::<u16>().ok() != Some(port) {
            continue;
        }
        let Ok(pid) = caps[3].parse::<u32>() else {
            continue;
        };
        if !listeners.iter().any(|l| l.pid == Some(pid)) {
            listeners.push(Listener {
                pid: Some(pid),
                command: None,
            });
        }
    }
    listeners
}
