//! Shared test doubles: a recording session provider and thread-backed mock
//! servers speaking the wire protocol.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io::BufReader;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use testrig::rpc::proto::{
    read_msg, write_msg, ClientMsg, ServerMsg, TrackerReply, TrackerRequest,
};
use testrig::rpc::AcquireError;
use testrig::{SessionProvider, Target};

/// One acquisition call observed by [`RecordingProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect {
        host: String,
        port: u16,
    },
    OpenLocal {
        target: Target,
    },
    Lease {
        target: Target,
        host: String,
        port: u16,
        timeout: Duration,
    },
}

/// Stand-in session tagged with a creation ordinal.
#[derive(Debug, PartialEq, Eq)]
pub struct MockSession {
    pub ordinal: usize,
}

/// Provider that records every call and hands out numbered mock sessions.
pub struct RecordingProvider {
    simulator_available: bool,
    calls: RefCell<Vec<Call>>,
    next_ordinal: Cell<usize>,
}

impl RecordingProvider {
    pub fn new(simulator_available: bool) -> Self {
        Self {
            simulator_available,
            calls: RefCell::new(Vec::new()),
            next_ordinal: Cell::new(0),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) -> Result<MockSession, AcquireError> {
        self.calls.borrow_mut().push(call);
        let ordinal = self.next_ordinal.get();
        self.next_ordinal.set(ordinal + 1);
        Ok(MockSession { ordinal })
    }
}

impl SessionProvider for RecordingProvider {
    type Session = MockSession;

    fn connect(&self, host: &str, port: u16) -> Result<MockSession, AcquireError> {
        self.record(Call::Connect {
            host: host.to_string(),
            port,
        })
    }

    fn open_local(&self, target: Target) -> Result<MockSession, AcquireError> {
        self.record(Call::OpenLocal { target })
    }

    fn lease_pooled(
        &self,
        target: Target,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<MockSession, AcquireError> {
        self.record(Call::Lease {
            target,
            host: host.to_string(),
            port,
            timeout,
        })
    }

    fn simulator_available(&self) -> bool {
        self.simulator_available
    }
}

/// Device server accepting one session: hello then welcome, then pongs
/// pings until the client closes. `expect_key` makes the handshake require
/// a tracker lease key.
pub fn spawn_device_server(
    device: &'static str,
    expect_key: Option<String>,
) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock device server");
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        serve_device(stream, device, expect_key.as_deref());
    });
    (addr, handle)
}

fn serve_device(stream: TcpStream, device: &str, expect_key: Option<&str>) {
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);

    match read_msg::<ClientMsg>(&mut reader).unwrap() {
        Some(ClientMsg::Hello { key, .. }) => {
            if expect_key.is_some() && key.as_deref() != expect_key {
                write_msg(
                    &mut writer,
                    &ServerMsg::Rejected {
                        reason: "bad lease key".to_string(),
                    },
                )
                .unwrap();
                return;
            }
            write_msg(
                &mut writer,
                &ServerMsg::Welcome {
                    device: device.to_string(),
                },
            )
            .unwrap();
        }
        other => panic!("expected hello, got {other:?}"),
    }

    while let Ok(Some(msg)) = read_msg::<ClientMsg>(&mut reader) {
        match msg {
            ClientMsg::Ping { seq } => {
                write_msg(&mut writer, &ServerMsg::Pong { seq }).unwrap();
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}

/// Tracker that grants its single lease by pointing at a freshly spawned
/// device server, wiring the lease key through.
pub fn spawn_granting_tracker(device: &'static str) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock tracker");
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);

        match read_msg::<TrackerRequest>(&mut reader).unwrap() {
            Some(TrackerRequest::Lease {
                device: requested, ..
            }) => {
                assert_eq!(requested, device);
                let key = "lease-1".to_string();
                let (board_addr, board) = spawn_device_server(device, Some(key.clone()));
                write_msg(
                    &mut writer,
                    &TrackerReply::Grant {
                        host: board_addr.ip().to_string(),
                        port: board_addr.port(),
                        key,
                    },
                )
                .unwrap();
                board.join().unwrap();
            }
            other => panic!("expected lease request, got {other:?}"),
        }
    });
    (addr, handle)
}

/// Tracker that denies every lease.
pub fn spawn_denying_tracker(reason: &'static str) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock tracker");
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);

        match read_msg::<TrackerRequest>(&mut reader).unwrap() {
            Some(TrackerRequest::Lease { .. }) => {
                write_msg(
                    &mut writer,
                    &TrackerReply::Deny {
                        reason: reason.to_string(),
                    },
                )
                .unwrap();
            }
            other => panic!("expected lease request, got {other:?}"),
        }
    });
    (addr, handle)
}
