//! Session and socket callback slots.
//!
//! Two fixed-shape callback surfaces live here, both single-slot
//! call-throughs rather than chained dispatch (exactly one consumer is
//! expected for each event kind):
//!
//! - [`SessionCallbacks`]: auth prompt, log and connection-progress hooks a
//!   session owner installs via [`CallbackSlots::set`]. The struct opens
//!   with its own compiled size so that a caller built against an older
//!   layout is still accepted by a newer library build, while a caller
//!   built against a *newer* layout is rejected.
//! - [`SocketCallbacks`]: event hooks the socket layer fires for incoming
//!   data, flow-control changes, exceptions and connect completion.
//!
//! Range-based packet routing is a separate mechanism; see
//! [`dispatch`](super::dispatch).
//!
//! All slots default to absent and absent slots are skipped silently.
//! Registrant state travels through an opaque [`UserData`] value handed
//! back on every invocation, so callbacks themselves stay plain `fn`
//! pointers.
//!
//! # Example
//!
//! ```rust
//! use bosun_proto::ssh::callbacks::{CallbackSlots, LogLevel, SessionCallbacks, UserData};
//!
//! fn print_log(level: LogLevel, message: &str, _user: Option<&UserData>) {
//!     eprintln!("[{:?}] {}", level, message);
//! }
//!
//! let mut slots = CallbackSlots::new();
//! let mut callbacks = SessionCallbacks::new();
//! callbacks.log = Some(print_log);
//! slots.set(callbacks).unwrap();
//!
//! slots.log(LogLevel::Protocol, "service negotiation started");
//! ```

use std::any::Any;
use std::mem;
use std::sync::Arc;

use bosun_platform::{BosunError, BosunResult};
use tracing::{debug, info, trace, warn};

/// Opaque registrant-owned context handed back to callbacks.
///
/// Compared by pointer identity, never by value. Callbacks needing mutable
/// state put interior mutability inside (an atomic, a `Mutex`, ...).
pub type UserData = Arc<dyn Any + Send + Sync>;

/// Verbosity ladder for log events, lower is more important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Problems the session owner should see.
    Warning,
    /// High-level protocol progress.
    Protocol,
    /// Per-packet detail.
    Packet,
    /// Function-level tracing.
    Functions,
}

/// Prompts the registrant for a secret (key passphrase, password).
///
/// The reply is written into `buf`; the returned count is the number of
/// bytes filled in. `echo` asks whether typed input may be shown, `verify`
/// whether the registrant should ask twice.
pub type AuthPromptCallback = fn(
    prompt: &str,
    buf: &mut [u8],
    echo: bool,
    verify: bool,
    user: Option<&UserData>,
) -> BosunResult<usize>;

/// Receives every loggable event together with its verbosity.
pub type LogCallback = fn(level: LogLevel, message: &str, user: Option<&UserData>);

/// Reports connection progress as a fraction in `0.0..=1.0`.
pub type ConnectStatusCallback = fn(progress: f32, user: Option<&UserData>);

/// Session-level callback slots, installed with [`CallbackSlots::set`].
///
/// The `size` field is the forward-compatibility guard: [`SessionCallbacks::new`]
/// stamps it with the struct's own compiled size, and validation on install
/// distinguishes callers built against older layouts (accepted, their
/// missing fields default to absent) from callers built against newer ones
/// (rejected).
#[derive(Clone)]
pub struct SessionCallbacks {
    /// Size of this structure; stamped by [`SessionCallbacks::new`].
    pub size: usize,
    /// Registrant context handed back on every invocation.
    pub userdata: Option<UserData>,
    /// Called when a secret is needed, e.g. a keyphrase.
    pub auth: Option<AuthPromptCallback>,
    /// Called each time a loggable event happens.
    pub log: Option<LogCallback>,
    /// Called during connection establishment with the completed fraction.
    pub connect_status: Option<ConnectStatusCallback>,
}

impl SessionCallbacks {
    /// Creates an empty callback struct with a correctly stamped `size`.
    pub fn new() -> Self {
        Self {
            size: mem::size_of::<Self>(),
            userdata: None,
            auth: None,
            log: None,
            connect_status: None,
        }
    }
}

impl Default for SessionCallbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCallbacks")
            .field("size", &self.size)
            .field("userdata", &self.userdata.is_some())
            .field("auth", &self.auth.is_some())
            .field("log", &self.log.is_some())
            .field("connect_status", &self.connect_status.is_some())
            .finish()
    }
}

/// Per-session holder for the single installed [`SessionCallbacks`].
///
/// Delivery helpers skip absent slots silently; [`CallbackSlots::log`]
/// additionally falls through to the `tracing` subscriber when no log slot
/// is installed, so events are never lost for lack of a registrant.
#[derive(Debug, Default)]
pub struct CallbackSlots {
    callbacks: Option<SessionCallbacks>,
}

impl CallbackSlots {
    /// Creates a holder with no callbacks installed.
    pub fn new() -> Self {
        Self { callbacks: None }
    }

    /// Installs a callback struct, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`BosunError::InvalidArgument`] when the `size` field is zero
    /// (the struct was assembled by hand instead of through
    /// [`SessionCallbacks::new`]) or larger than this build's layout (the
    /// caller was built against a newer library).
    pub fn set(&mut self, callbacks: SessionCallbacks) -> BosunResult<()> {
        let current = mem::size_of::<SessionCallbacks>();
        if callbacks.size == 0 {
            return Err(BosunError::InvalidArgument(
                "callback struct size is zero; initialize with SessionCallbacks::new".to_string(),
            ));
        }
        if callbacks.size > current {
            return Err(BosunError::InvalidArgument(format!(
                "callback struct size {} exceeds this build's layout ({} bytes)",
                callbacks.size, current
            )));
        }

        debug!(size = callbacks.size, "session callbacks installed");
        self.callbacks = Some(callbacks);
        Ok(())
    }

    /// Removes the installed callbacks, if any.
    pub fn clear(&mut self) {
        self.callbacks = None;
    }

    /// Returns `true` if a callback struct is installed.
    pub fn is_set(&self) -> bool {
        self.callbacks.is_some()
    }

    /// Returns the installed registrant context, if any.
    pub fn userdata(&self) -> Option<&UserData> {
        self.callbacks.as_ref()?.userdata.as_ref()
    }

    /// Delivers an authentication prompt.
    ///
    /// Returns `None` when no auth slot is installed; otherwise the slot's
    /// result carrying the number of bytes written into `buf`.
    pub fn auth_prompt(
        &self,
        prompt: &str,
        buf: &mut [u8],
        echo: bool,
        verify: bool,
    ) -> Option<BosunResult<usize>> {
        let callbacks = self.callbacks.as_ref()?;
        let auth = callbacks.auth?;
        Some(auth(prompt, buf, echo, verify, callbacks.userdata.as_ref()))
    }

    /// Delivers a log event.
    ///
    /// Goes to the installed log slot when present, and otherwise to the
    /// `tracing` subscriber at the corresponding level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if let Some(callbacks) = &self.callbacks {
            if let Some(log) = callbacks.log {
                log(level, message, callbacks.userdata.as_ref());
                return;
            }
        }

        match level {
            LogLevel::Warning => warn!("{}", message),
            LogLevel::Protocol => info!("{}", message),
            LogLevel::Packet => debug!("{}", message),
            LogLevel::Functions => trace!("{}", message),
        }
    }

    /// Delivers a connection-progress event.
    ///
    /// `progress` runs from `0.0` to `1.0` once the connection is done.
    /// Returns `true` when a slot consumed the event.
    pub fn connect_status(&self, progress: f32) -> bool {
        if let Some(callbacks) = &self.callbacks {
            if let Some(connect_status) = callbacks.connect_status {
                connect_status(progress, callbacks.userdata.as_ref());
                return true;
            }
        }
        false
    }
}

/// Flow-control transitions reported by the socket layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketFlow {
    /// Further writes would block.
    WriteWillBlock,
    /// Writes will proceed without blocking again.
    WriteWontBlock,
}

/// Exceptional socket conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketException {
    /// The peer closed the stream.
    Eof,
    /// A socket error occurred; the OS error code accompanies the event.
    Error,
}

/// Outcome of a connect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectResult {
    /// The connection was established.
    Ok,
    /// The connection failed; the OS error code accompanies the event.
    Error,
    /// The connection attempt timed out.
    Timeout,
}

/// Receives freshly read bytes; returns how many were consumed. Bytes not
/// consumed are redelivered with the next event once more data arrives.
pub type SocketDataCallback = fn(data: &[u8], user: Option<&UserData>) -> usize;

/// Receives flow-control transitions.
pub type SocketFlowCallback = fn(flow: SocketFlow, user: Option<&UserData>);

/// Receives exceptional conditions together with the OS error code.
pub type SocketExceptionCallback =
    fn(kind: SocketException, errno_code: i32, user: Option<&UserData>);

/// Receives the outcome of a connect attempt.
pub type SocketConnectedCallback =
    fn(result: ConnectResult, errno_code: i32, user: Option<&UserData>);

/// Callback slots exported to the socket layer.
///
/// Predates the versioned-size convention of [`SessionCallbacks`] and so
/// carries no `size` field. Fields are filled directly; absent slots are
/// skipped by the delivery helpers.
#[derive(Clone, Default)]
pub struct SocketCallbacks {
    /// Fired when bytes arrive on the socket.
    pub data: Option<SocketDataCallback>,
    /// Fired on flow-control transitions.
    pub controlflow: Option<SocketFlowCallback>,
    /// Fired on EOF or socket errors.
    pub exception: Option<SocketExceptionCallback>,
    /// Fired once a connect attempt resolves.
    pub connected: Option<SocketConnectedCallback>,
    /// Registrant context shared by all four slots.
    pub userdata: Option<UserData>,
}

impl SocketCallbacks {
    /// Creates an empty slot set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers arrived bytes; an absent slot consumes nothing.
    pub fn data_received(&self, data: &[u8]) -> usize {
        match self.data {
            Some(callback) => callback(data, self.userdata.as_ref()),
            None => 0,
        }
    }

    /// Delivers a flow-control transition. Returns `true` when consumed.
    pub fn flow_event(&self, flow: SocketFlow) -> bool {
        match self.controlflow {
            Some(callback) => {
                callback(flow, self.userdata.as_ref());
                true
            }
            None => false,
        }
    }

    /// Delivers an exceptional condition. Returns `true` when consumed.
    pub fn exception_event(&self, kind: SocketException, errno_code: i32) -> bool {
        match self.exception {
            Some(callback) => {
                callback(kind, errno_code, self.userdata.as_ref());
                true
            }
            None => false,
        }
    }

    /// Delivers a connect outcome. Returns `true` when consumed.
    pub fn connect_event(&self, result: ConnectResult, errno_code: i32) -> bool {
        match self.connected {
            Some(callback) => {
                callback(result, errno_code, self.userdata.as_ref());
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for SocketCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketCallbacks")
            .field("data", &self.data.is_some())
            .field("controlflow", &self.controlflow.is_some())
            .field("exception", &self.exception.is_some())
            .field("connected", &self.connected.is_some())
            .field("userdata", &self.userdata.is_some())
            .finish()
    }
}
