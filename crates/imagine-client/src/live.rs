//! Live processing updates over WebSocket.
//!
//! A [`LiveChannel`] holds at most one open connection. `connect` replaces
//! the previous connection: its reader task is told to close the socket and
//! its [`JobStream`] stops yielding immediately, even if frames were already
//! buffered. No reconnect is attempted on failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::StreamExt as _;
use imagine_auth::SessionStore;
use imagine_config::ApiConfig;
use imagine_core::entities::ProcessingUpdate;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::LiveError;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Item = Result<ProcessingUpdate, LiveError>;

const BUFFER: usize = 64;

/// Close code reported when the transport ends without a close frame.
const ABNORMAL_CLOSURE: u16 = 1006;

/// WebSocket base for live updates.
///
/// Uses `api.ws_url` when set, else `ws(s)://<host>[:port]/ws` from the REST
/// base URL.
///
/// # Errors
///
/// Returns [`LiveError::InvalidUrl`] if `base_url` has no host or an
/// unsupported scheme.
pub fn ws_base_url(config: &ApiConfig) -> Result<String, LiveError> {
    let explicit = config.ws_url.trim().trim_end_matches('/');
    if !explicit.is_empty() {
        return Ok(explicit.to_string());
    }

    let base = reqwest::Url::parse(config.base_url())
        .map_err(|e| LiveError::InvalidUrl(format!("{}: {e}", config.base_url())))?;
    let scheme = match base.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => {
            return Err(LiveError::InvalidUrl(format!(
                "unsupported scheme '{other}' in {}",
                config.base_url()
            )));
        }
    };
    let host = base
        .host_str()
        .ok_or_else(|| LiveError::InvalidUrl(format!("no host in {}", config.base_url())))?;
    Ok(match base.port() {
        Some(port) => format!("{scheme}://{host}:{port}/ws"),
        None => format!("{scheme}://{host}/ws"),
    })
}

struct ActiveConnection {
    job_id: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ActiveConnection {
    fn cancel(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        tracing::debug!(job_id = %self.job_id, "live connection superseded");
    }
}

pub struct LiveChannel {
    ws_base: String,
    session: Arc<SessionStore>,
    active: Mutex<Option<ActiveConnection>>,
    generation: Arc<AtomicU64>,
}

impl LiveChannel {
    #[must_use]
    pub fn new(ws_base: String, session: Arc<SessionStore>) -> Self {
        Self {
            ws_base,
            session,
            active: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Open a stream of updates for `job_id`, closing any previous one.
    ///
    /// The current access token is sent as the `token` query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`LiveError::NotAuthenticated`] without a token, or
    /// [`LiveError::Connect`] if the handshake fails.
    pub async fn connect(&self, job_id: &str) -> Result<JobStream, LiveError> {
        self.disconnect();

        let token = self
            .session
            .access_token()
            .ok_or(LiveError::NotAuthenticated)?;
        let url = format!(
            "{}/processing/{}?token={}",
            self.ws_base,
            urlencoding::encode(job_id),
            urlencoding::encode(&token)
        );

        let (socket, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| LiveError::Connect(e.to_string()))?;
        tracing::info!(job_id, "live updates connected");

        let (tx, rx) = mpsc::channel(BUFFER);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(read_frames(socket, job_id.to_string(), tx, shutdown_rx));
        let generation = self.install(ActiveConnection {
            job_id: job_id.to_string(),
            shutdown: Some(shutdown_tx),
            task,
        });

        Ok(JobStream {
            job_id: job_id.to_string(),
            generation,
            current: Arc::clone(&self.generation),
            rx,
            finished: false,
        })
    }

    /// Make `connection` the open one and return its generation.
    fn install(&self, connection: ActiveConnection) -> u64 {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = active.replace(connection);
        drop(active);
        if let Some(previous) = previous {
            previous.cancel();
        }
        generation
    }

    /// Close the open connection, if any. Its stream ends.
    pub fn disconnect(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = active.take();
        self.generation.fetch_add(1, Ordering::SeqCst);
        drop(active);
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    /// Job of the connection that is still open.
    #[must_use]
    pub fn active_job(&self) -> Option<String> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|c| !c.task.is_finished())
            .map(|c| c.job_id.clone())
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Updates for one job, in arrival order.
///
/// Ends after a terminal update (`job_complete` / `job_failed`), after one
/// error, on a clean server close, or once the channel connects elsewhere.
pub struct JobStream {
    job_id: String,
    generation: u64,
    current: Arc<AtomicU64>,
    rx: mpsc::Receiver<Item>,
    finished: bool,
}

impl JobStream {
    #[must_use]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    fn superseded(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.generation
    }

    pub async fn next(&mut self) -> Option<Item> {
        if self.finished || self.superseded() {
            self.finished = true;
            return None;
        }
        let item = self.rx.recv().await;
        if self.superseded() {
            self.finished = true;
            return None;
        }
        match item {
            Some(Ok(update)) => {
                if update.kind.is_terminal() {
                    self.finished = true;
                }
                Some(Ok(update))
            }
            Some(Err(error)) => {
                self.finished = true;
                Some(Err(error))
            }
            None => {
                self.finished = true;
                None
            }
        }
    }
}

/// Hand `item` to the stream unless shutdown arrives first.
///
/// Returns `false` once the reader should stop: shutdown was signalled or the
/// stream was dropped. `shutdown` must not be polled again after that.
async fn deliver(tx: &mpsc::Sender<Item>, shutdown: &mut oneshot::Receiver<()>, item: Item) -> bool {
    tokio::select! {
        biased;
        _ = shutdown => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}

async fn read_frames(
    mut socket: Socket,
    job_id: String,
    tx: mpsc::Sender<Item>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                let _ = socket.close(None).await;
                tracing::debug!(job_id = %job_id, "live connection closed on shutdown");
                return;
            }
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let update = match serde_json::from_str::<ProcessingUpdate>(&text) {
                        Ok(update) => update,
                        Err(error) => {
                            tracing::warn!(%error, job_id = %job_id, "dropping malformed live update");
                            continue;
                        }
                    };
                    let terminal = update.kind.is_terminal();
                    // A full buffer must not keep the socket open past shutdown.
                    if !deliver(&tx, &mut shutdown, Ok(update)).await || terminal {
                        let _ = socket.close(None).await;
                        tracing::debug!(job_id = %job_id, terminal, "live connection closed by client");
                        return;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    match frame {
                        Some(frame) if frame.code != CloseCode::Normal => {
                            let error = LiveError::ClosedUnclean {
                                code: u16::from(frame.code),
                                reason: frame.reason.into_owned(),
                            };
                            deliver(&tx, &mut shutdown, Err(error)).await;
                        }
                        _ => tracing::debug!(job_id = %job_id, "live connection closed by server"),
                    }
                    return;
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::warn!(job_id = %job_id, "dropping binary live frame");
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    deliver(&tx, &mut shutdown, Err(LiveError::Transport(error.to_string()))).await;
                    return;
                }
                None => {
                    let error = LiveError::ClosedUnclean {
                        code: ABNORMAL_CLOSURE,
                        reason: "connection dropped without a close frame".into(),
                    };
                    deliver(&tx, &mut shutdown, Err(error)).await;
                    return;
                }
            }
        }
    }
}
