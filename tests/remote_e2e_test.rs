use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, watch};

use console_tetris::remote::{encode, run_server, Frame, RemoteConfig, PROTOCOL_VERSION};
use console_tetris::types::{Action, ActionSet, ControllerState};

async fn start_server() -> (SocketAddr, watch::Receiver<ControllerState>) {
    let config = RemoteConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let (held_tx, held_rx) = watch::channel(ControllerState::default());
    let (ready_tx, ready_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = run_server(config, held_tx, Some(ready_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("timeout waiting for listener")
        .expect("server dropped ready channel");
    (addr, held_rx)
}

async fn wait_for(
    rx: &mut watch::Receiver<ControllerState>,
    mut f: impl FnMut(&ControllerState) -> bool,
) -> ControllerState {
    let state = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(|s| f(s)))
        .await
        .expect("timeout waiting for controller state")
        .expect("server dropped sender");
    *state
}

async fn connect(addr: SocketAddr, slot: usize) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(&encode(Frame::Handshake { slot }))
        .await
        .unwrap();
    stream
}

async fn assert_closed(stream: &mut TcpStream) {
    let mut buf = [0u8; 1];
    let n = tokio::time::timeout(Duration::from_secs(2), stream.read(&mut buf))
        .await
        .expect("server kept the connection open")
        .unwrap_or(0);
    assert_eq!(n, 0);
}

#[tokio::test]
async fn input_frames_publish_held_actions_for_the_claimed_slot() {
    let (addr, mut held_rx) = start_server().await;

    let mut client = connect(addr, 1).await;
    let held: ActionSet = [Action::MoveLeft, Action::RotateRight].into_iter().collect();
    client.write_all(&encode(Frame::Input(held))).await.unwrap();

    let state = wait_for(&mut held_rx, |s| !s.players[1].is_empty()).await;
    assert_eq!(state.players[1], held);
    assert!(state.players[0].is_empty());

    let released = ActionSet::empty();
    client
        .write_all(&encode(Frame::Input(released)))
        .await
        .unwrap();
    wait_for(&mut held_rx, |s| s.players[1].is_empty()).await;
}

#[tokio::test]
async fn disconnect_clears_the_slot_and_frees_it() {
    let (addr, mut held_rx) = start_server().await;

    {
        let mut client = connect(addr, 0).await;
        let held: ActionSet = [Action::SoftDrop].into_iter().collect();
        client.write_all(&encode(Frame::Input(held))).await.unwrap();
        wait_for(&mut held_rx, |s| s.players[0].contains(Action::SoftDrop)).await;
    }
    wait_for(&mut held_rx, |s| s.players[0].is_empty()).await;

    // The slot can be claimed again.
    let mut client = connect(addr, 0).await;
    let held: ActionSet = [Action::HardDrop].into_iter().collect();
    client.write_all(&encode(Frame::Input(held))).await.unwrap();
    wait_for(&mut held_rx, |s| s.players[0].contains(Action::HardDrop)).await;
}

#[tokio::test]
async fn second_claim_on_a_slot_is_rejected() {
    let (addr, mut held_rx) = start_server().await;

    let mut first = connect(addr, 0).await;
    let held: ActionSet = [Action::MoveRight].into_iter().collect();
    first.write_all(&encode(Frame::Input(held))).await.unwrap();
    wait_for(&mut held_rx, |s| !s.players[0].is_empty()).await;

    let mut second = connect(addr, 0).await;
    assert_closed(&mut second).await;
    assert_eq!(held_rx.borrow().players[0], held);
}

#[tokio::test]
async fn malformed_frames_close_the_connection() {
    let (addr, _held_rx) = start_server().await;

    let mut bad_version = TcpStream::connect(addr).await.unwrap();
    bad_version
        .write_all(&[b'T', b'R', PROTOCOL_VERSION.wrapping_add(1), 0])
        .await
        .unwrap();
    assert_closed(&mut bad_version).await;

    let mut input_first = TcpStream::connect(addr).await.unwrap();
    input_first.write_all(&[b'I', 0, 0, 0]).await.unwrap();
    assert_closed(&mut input_first).await;

    let mut bad_mask = connect(addr, 1).await;
    bad_mask.write_all(&[b'I', 0xff, 0, 0]).await.unwrap();
    assert_closed(&mut bad_mask).await;
}
