//! Remote seats over TCP
//!
//! The wire format is JSON lines: one `ServerMessage` per line from the
//! host, one `Command` per line from the participant. Both ends drive their
//! sockets from a private current-thread runtime and block on it, so the
//! turn engine and the participant's controller stay synchronous.

use crate::core::PlayerId;
use crate::game::{Command, DecisionRequest, GameEvent, GameReport, GameStateView, PlayerController};
use crate::loader::CardCatalog;
use crate::{KingdomError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::{Builder, Runtime};

/// Host-to-participant messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First message: the participant's seat, every player's name and the
    /// host's catalog card names in id order
    Welcome {
        seat: PlayerId,
        players: Vec<String>,
        cards: Vec<String>,
    },
    Decide {
        view: GameStateView,
        request: DecisionRequest,
    },
    Event {
        event: GameEvent,
    },
    Rejected {
        command: Command,
        reason: String,
    },
    GameOver {
        report: GameReport,
    },
}

fn lost(e: std::io::Error) -> KingdomError {
    KingdomError::ProtocolViolation(format!("connection lost: {e}"))
}

fn runtime() -> Result<Arc<Runtime>> {
    Ok(Arc::new(Builder::new_current_thread().enable_all().build()?))
}

/// A JSON-lines stream driven by its own runtime
struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    line: String,
    runtime: Arc<Runtime>,
}

impl Connection {
    fn new(stream: TcpStream, runtime: Arc<Runtime>) -> Self {
        let (read, writer) = stream.into_split();
        Connection {
            reader: BufReader::new(read),
            writer,
            line: String::new(),
            runtime,
        }
    }

    fn send<T: Serialize>(&mut self, message: &T) -> Result<()> {
        let mut text = serde_json::to_string(message)?;
        text.push('\n');
        let Connection {
            writer, runtime, ..
        } = self;
        runtime
            .block_on(async {
                writer.write_all(text.as_bytes()).await?;
                writer.flush().await
            })
            .map_err(lost)
    }

    fn recv<T: DeserializeOwned>(&mut self) -> Result<T> {
        let Connection {
            reader,
            line,
            runtime,
            ..
        } = self;
        line.clear();
        let read = runtime.block_on(reader.read_line(line)).map_err(lost)?;
        if read == 0 {
            return Err(KingdomError::ProtocolViolation("connection closed".to_string()));
        }
        serde_json::from_str(line.trim_end())
            .map_err(|e| KingdomError::ProtocolViolation(format!("malformed message: {e}")))
    }
}

/// A bound socket that seats participants as they connect
pub struct RemoteListener {
    listener: TcpListener,
    runtime: Arc<Runtime>,
}

impl RemoteListener {
    pub fn bind(addr: &str) -> Result<Self> {
        let runtime = runtime()?;
        let listener = runtime.block_on(TcpListener::bind(addr))?;
        Ok(RemoteListener { listener, runtime })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Wait for a participant and seat it at `seat`
    pub fn accept(&self, seat: PlayerId, players: &[String], catalog: &CardCatalog) -> Result<RemoteController> {
        let (stream, peer) = self.runtime.block_on(self.listener.accept())?;
        let mut conn = Connection::new(stream, Arc::clone(&self.runtime));
        conn.send(&ServerMessage::Welcome {
            seat,
            players: players.to_vec(),
            cards: catalog.names(),
        })?;
        Ok(RemoteController {
            player_id: seat,
            peer,
            conn,
            broken: None,
        })
    }
}

/// Engine-side proxy for a participant across a socket
pub struct RemoteController {
    player_id: PlayerId,
    peer: SocketAddr,
    conn: Connection,
    /// First failure while sending a notification
    broken: Option<String>,
}

impl RemoteController {
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    fn notify(&mut self, message: ServerMessage) {
        if self.broken.is_some() {
            return;
        }
        if let Err(e) = self.conn.send(&message) {
            self.broken = Some(e.to_string());
        }
    }
}

impl PlayerController for RemoteController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn next_command(&mut self, view: &GameStateView, request: &DecisionRequest) -> Result<Command> {
        if let Some(reason) = &self.broken {
            return Err(KingdomError::ProtocolViolation(reason.clone()));
        }
        self.conn.send(&ServerMessage::Decide {
            view: view.clone(),
            request: request.clone(),
        })?;
        self.conn.recv()
    }

    fn on_event(&mut self, event: &GameEvent) {
        self.notify(ServerMessage::Event {
            event: event.clone(),
        });
    }

    fn on_rejected(&mut self, command: &Command, reason: &str) {
        self.notify(ServerMessage::Rejected {
            command: *command,
            reason: reason.to_string(),
        });
    }

    fn on_game_end(&mut self, report: &GameReport) {
        self.notify(ServerMessage::GameOver {
            report: report.clone(),
        });
    }
}

/// Join the match hosted at `addr`, answering with the controller that
/// `make` builds for the assigned seat. Returns the final report.
pub fn run_client<C, F>(addr: &str, catalog: &CardCatalog, make: F) -> Result<GameReport>
where
    C: PlayerController,
    F: FnOnce(PlayerId, &[String]) -> C,
{
    let runtime = runtime()?;
    let stream = runtime.block_on(TcpStream::connect(addr))?;
    let mut conn = Connection::new(stream, runtime);

    let ServerMessage::Welcome {
        seat,
        players,
        cards,
    } = conn.recv()?
    else {
        return Err(KingdomError::ProtocolViolation("expected welcome".to_string()));
    };
    if cards != catalog.names() {
        return Err(KingdomError::ProtocolViolation(
            "host uses a different card catalog".to_string(),
        ));
    }

    let mut controller = make(seat, &players);
    loop {
        match conn.recv()? {
            ServerMessage::Decide { view, request } => {
                // After a quit the host still sends the report
                let command = controller.next_command(&view, &request)?;
                conn.send(&command)?;
            }
            ServerMessage::Event { event } => controller.on_event(&event),
            ServerMessage::Rejected { command, reason } => controller.on_rejected(&command, &reason),
            ServerMessage::GameOver { report } => {
                controller.on_game_end(&report);
                return Ok(report);
            }
            ServerMessage::Welcome { .. } => {
                return Err(KingdomError::ProtocolViolation("unexpected welcome".to_string()));
            }
        }
    }
}
