//! Remote runtime integration.
//!
//! Bridges the sync game loop with the async TCP server.

use tokio::runtime::Runtime;
use tokio::sync::watch;

use crate::server::{run_server, RemoteConfig};
use crate::types::ControllerState;

/// Running remote-control server.
pub struct Remote {
    _rt: Runtime,
    held_rx: watch::Receiver<ControllerState>,
}

impl Remote {
    pub fn start(config: RemoteConfig) -> anyhow::Result<Self> {
        let (held_tx, held_rx) = watch::channel(ControllerState::default());

        let rt = Runtime::new()?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, held_tx, None).await {
                log::error!("remote control stopped: {:#}", e);
            }
        });

        Ok(Self { _rt: rt, held_rx })
    }

    /// Start from environment variables.
    ///
    /// Returns `Ok(None)` if `CONSOLE_TETRIS_REMOTE_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if RemoteConfig::is_disabled() {
            log::info!("remote control disabled via CONSOLE_TETRIS_REMOTE_DISABLED");
            return Ok(None);
        }
        Self::start(RemoteConfig::from_env()).map(Some)
    }

    /// Latest held actions of every remote slot
    pub fn held(&self) -> ControllerState {
        *self.held_rx.borrow()
    }
}
