//! Refusing to start when the server port is already taken.
//!
//! The guard only reports. It never terminates the process holding the
//! port; the operator decides what to do with it.

pub mod probe;

pub use probe::{bind_probe, parse_lsof, parse_netstat, Listener, ListenerProbe, SystemProbe};

use crate::error::{DepotError, Result};

/// Checks that nothing listens on the server port.
pub struct PortGuard<'a> {
    probe: &'a dyn ListenerProbe,
}

impl<'a> PortGuard<'a> {
    pub fn new(probe: &'a dyn ListenerProbe) -> Self {
        Self { probe }
    }

    /// `Ok` when the port is free, `PortInUse` naming the holders otherwise.
    pub fn check(&self, port: u16) -> Result<()> {
        let listeners = self.probe.listeners(port)?;
        if listeners.is_empty() {
            tracing::debug!("Port {} is free", port);
            return Ok(());
        }

        for listener in &listeners {
            tracing::warn!(
                "Port {} held by pid {} ({})",
                port,
                listener
                    .pid
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "?".to_string()),
                listener.command.as_deref().unwrap_or("unknown command")
            );
        }

        Err(DepotError::PortInUse {
            port,
            pids: listeners.iter().filter_map(|l| l.pid).collect(),
        })
    }
}
