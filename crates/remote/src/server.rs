//! TCP server for remote controllers
//!
//! Each connection claims one player slot with a handshake frame and then
//! streams held-action masks for it. The latest mask of every slot is
//! published through a `watch` channel; the game loop reads it once per frame.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{oneshot, watch, Mutex};

use crate::protocol::{decode, Frame, FRAME_LEN};
use crate::types::{ActionSet, ControllerState, PLAYERS};

/// Server configuration
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
        }
    }
}

impl RemoteConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("CONSOLE_TETRIS_REMOTE_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("CONSOLE_TETRIS_REMOTE_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self { host, port }
    }

    /// Check if remote control is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("CONSOLE_TETRIS_REMOTE_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared server state
struct ServerState {
    claimed: Mutex<[bool; PLAYERS]>,
    held_tx: watch::Sender<ControllerState>,
}

impl ServerState {
    async fn claim(&self, slot: usize) -> bool {
        let mut claimed = self.claimed.lock().await;
        match claimed.get_mut(slot) {
            Some(taken) if !*taken => {
                *taken = true;
                true
            }
            _ => false,
        }
    }

    async fn release(&self, slot: usize) {
        self.publish(slot, ActionSet::empty());
        let mut claimed = self.claimed.lock().await;
        if let Some(taken) = claimed.get_mut(slot) {
            *taken = false;
        }
    }

    fn publish(&self, slot: usize, held: ActionSet) {
        self.held_tx.send_if_modified(|state| match state.players.get_mut(slot) {
            Some(current) if *current != held => {
                *current = held;
                true
            }
            _ => false,
        });
    }
}

/// Run the server until the listener fails.
///
/// `ready_tx` receives the bound address once the listener is up, which lets
/// callers bind port 0.
pub async fn run_server(
    config: RemoteConfig,
    held_tx: watch::Sender<ControllerState>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding remote listener on {addr}"))?;
    let bound = listener.local_addr()?;
    info!("remote control listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState {
        claimed: Mutex::new([false; PLAYERS]),
        held_tx,
    });

    loop {
        let (socket, addr) = listener.accept().await?;
        info!("remote client connected from {}", addr);

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, state).await {
                warn!("remote client {} closed: {}", addr, e);
            }
            info!("remote client {} disconnected", addr);
        });
    }
}

/// Read one frame; `Ok(None)` on a clean end of stream
async fn read_frame(socket: &mut TcpStream) -> anyhow::Result<Option<[u8; FRAME_LEN]>> {
    let mut buf = [0u8; FRAME_LEN];
    match socket.read_exact(&mut buf).await {
        Ok(_) => Ok(Some(buf)),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn handle_client(
    mut socket: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let Some(first) = read_frame(&mut socket).await? else {
        return Ok(());
    };
    let slot = match decode(first)? {
        Frame::Handshake { slot } => slot,
        Frame::Input(_) => anyhow::bail!("input frame before handshake"),
    };
    if !state.claim(slot).await {
        anyhow::bail!("player slot {} already claimed", slot);
    }
    info!("remote client {} controls player {}", addr, slot + 1);

    let result = stream_inputs(&mut socket, slot, &state).await;
    state.release(slot).await;
    result
}

async fn stream_inputs(
    socket: &mut TcpStream,
    slot: usize,
    state: &ServerState,
) -> anyhow::Result<()> {
    while let Some(bytes) = read_frame(socket).await? {
        match decode(bytes)? {
            Frame::Input(held) => state.publish(slot, held),
            Frame::Handshake { .. } => anyhow::bail!("repeated handshake"),
        }
    }
    Ok(())
}
