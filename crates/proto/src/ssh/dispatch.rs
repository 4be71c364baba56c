//! Range-based packet dispatch.
//!
//! Incoming packets are routed by their one-byte message-type code through a
//! per-session [`PacketDispatcher`]. Subsystems register
//! [`PacketCallbacks`] chains, each binding a consecutive range of codes
//! `[start, start + count)` to an ordered array of handler functions, one
//! handler per code. Registration order is priority order: the
//! earliest-registered chain covering a code is consulted first.
//!
//! A handler either consumes the packet ([`PacketStatus::Used`], which ends
//! the dispatch immediately) or declines it ([`PacketStatus::NotUsed`],
//! which passes the packet to the next covering chain). When no chain
//! covers the code, or every covering handler declines, the dispatch
//! returns `NotUsed` and the transport layer applies its own default
//! policy.
//!
//! # Reentrancy
//!
//! Handlers may register and unregister chains on the dispatcher that is
//! currently delivering to them; deregistering oneself on the final packet
//! of interest is routine. The dispatcher snapshots the covering handlers
//! when `dispatch` is entered, so mid-dispatch changes take effect for the
//! next packet: a chain removed by a handler is still consulted for the
//! packet in flight, and a chain added by a handler is not.
//!
//! A dispatcher belongs to one session and is driven from one thread of
//! control; it takes no locks and is intentionally `!Sync`.
//!
//! # Example
//!
//! ```rust
//! use bosun_proto::ssh::dispatch::{PacketCallbacks, PacketDispatcher, PacketStatus, UserData};
//!
//! struct Session {
//!     rekeys: u32,
//! }
//!
//! fn on_newkeys(
//!     session: &mut Session,
//!     _msg_type: u8,
//!     _payload: &[u8],
//!     _user: Option<&UserData>,
//! ) -> PacketStatus {
//!     session.rekeys += 1;
//!     PacketStatus::Used
//! }
//!
//! let dispatcher = PacketDispatcher::new();
//! dispatcher
//!     .register(PacketCallbacks::single(21, on_newkeys))
//!     .unwrap();
//!
//! let mut session = Session { rekeys: 0 };
//! assert_eq!(dispatcher.dispatch(&mut session, 21, &[]), PacketStatus::Used);
//! assert_eq!(dispatcher.dispatch(&mut session, 2, &[]), PacketStatus::NotUsed);
//! assert_eq!(session.rekeys, 1);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use bosun_platform::{BosunError, BosunResult, OrderedList};
use tracing::{debug, trace};

use super::message;

pub use super::callbacks::UserData;

/// Outcome of offering a packet to a handler, or of a whole dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketStatus {
    /// The packet was fully consumed; no further handler sees it.
    Used,
    /// The handler declined; the packet falls through to the next covering
    /// chain. As the overall result of a dispatch: nothing consumed the
    /// packet. This is an ordinary outcome, not an error.
    NotUsed,
}

/// Handler for one message-type code.
///
/// Receives the caller's session state, the code, the packet payload
/// (borrowed for the duration of the call), and the registering chain's
/// context.
pub type PacketHandler<S> =
    fn(session: &mut S, msg_type: u8, payload: &[u8], user: Option<&UserData>) -> PacketStatus;

/// A registered chain: a consecutive code range bound to handlers.
///
/// `handlers[i]` serves code `start + i`. An empty handler array is legal
/// and simply never matches. Two chains are equal when they have the same
/// range, the same handler pointers in the same order, and the same
/// context identity; [`PacketDispatcher::unregister`] removes by that
/// equality, so keep a clone of what you registered.
pub struct PacketCallbacks<S> {
    start: u8,
    handlers: Vec<PacketHandler<S>>,
    user: Option<UserData>,
}

impl<S> PacketCallbacks<S> {
    /// Creates a chain covering `start .. start + handlers.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`BosunError::InvalidArgument`] when the handler count does
    /// not fit a `u8` or the range would wrap past code 255.
    pub fn new(
        start: u8,
        handlers: Vec<PacketHandler<S>>,
        user: Option<UserData>,
    ) -> BosunResult<Self> {
        if handlers.len() > usize::from(u8::MAX) {
            return Err(BosunError::InvalidArgument(format!(
                "handler count {} does not fit an 8-bit range",
                handlers.len()
            )));
        }
        if usize::from(start) + handlers.len() > 256 {
            return Err(BosunError::InvalidArgument(format!(
                "range {}+{} wraps past message-type code 255",
                start,
                handlers.len()
            )));
        }

        Ok(Self {
            start,
            handlers,
            user,
        })
    }

    /// Creates a chain serving exactly one code. Cannot wrap, so it cannot
    /// fail.
    pub fn single(code: u8, handler: PacketHandler<S>) -> Self {
        Self {
            start: code,
            handlers: vec![handler],
            user: None,
        }
    }

    /// Attaches a registrant context, handed to every handler invocation.
    pub fn with_user(mut self, user: UserData) -> Self {
        self.user = Some(user);
        self
    }

    /// First code this chain serves.
    pub fn start(&self) -> u8 {
        self.start
    }

    /// Number of consecutive codes this chain serves.
    pub fn count(&self) -> u8 {
        self.handlers.len() as u8
    }

    /// Returns `true` when `msg_type` falls inside this chain's range.
    pub fn covers(&self, msg_type: u8) -> bool {
        usize::from(msg_type) >= usize::from(self.start)
            && usize::from(msg_type) < usize::from(self.start) + self.handlers.len()
    }

    /// The handler serving `msg_type`, if covered.
    pub fn handler_for(&self, msg_type: u8) -> Option<PacketHandler<S>> {
        if !self.covers(msg_type) {
            return None;
        }
        self.handlers.get(usize::from(msg_type - self.start)).copied()
    }

    /// The registrant context, if any.
    pub fn user(&self) -> Option<&UserData> {
        self.user.as_ref()
    }
}

impl<S> Clone for PacketCallbacks<S> {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            handlers: self.handlers.clone(),
            user: self.user.clone(),
        }
    }
}

impl<S> PartialEq for PacketCallbacks<S> {
    fn eq(&self, other: &Self) -> bool {
        let same_handlers = self.handlers.len() == other.handlers.len()
            && self
                .handlers
                .iter()
                .zip(&other.handlers)
                .all(|(a, b)| std::ptr::fn_addr_eq(*a, *b));
        let same_user = match (&self.user, &other.user) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.start == other.start && same_handlers && same_user
    }
}

impl<S> fmt::Debug for PacketCallbacks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketCallbacks")
            .field("start", &self.start)
            .field("count", &self.handlers.len())
            .field("user", &self.user.is_some())
            .finish()
    }
}

/// Per-session registry of [`PacketCallbacks`] chains.
///
/// See the [module documentation](self) for the routing and reentrancy
/// contract.
pub struct PacketDispatcher<S> {
    chains: RefCell<OrderedList<PacketCallbacks<S>>>,
}

impl<S> PacketDispatcher<S> {
    /// Creates a dispatcher with no chains registered.
    pub fn new() -> Self {
        Self {
            chains: RefCell::new(OrderedList::new()),
        }
    }

    /// Number of registered chains.
    pub fn len(&self) -> usize {
        self.chains.borrow().len()
    }

    /// Returns `true` when no chains are registered.
    pub fn is_empty(&self) -> bool {
        self.chains.borrow().is_empty()
    }

    /// Registers a chain at the lowest priority (after all current chains).
    ///
    /// # Errors
    ///
    /// Returns [`BosunError::OutOfMemory`] if the registry cannot grow; the
    /// registry is left unchanged in that case.
    pub fn register(&self, callbacks: PacketCallbacks<S>) -> BosunResult<()> {
        let (start, count) = (callbacks.start, callbacks.handlers.len());
        self.chains.borrow_mut().append(callbacks)?;
        debug!(start, count, "registered packet callback chain");
        Ok(())
    }

    /// Removes the first registered chain equal to `callbacks`.
    ///
    /// Absent chains are a no-op; unregistering twice is harmless.
    pub fn unregister(&self, callbacks: &PacketCallbacks<S>) {
        let mut chains = self.chains.borrow_mut();
        let found = chains
            .entries()
            .find(|(_, chain)| *chain == callbacks)
            .map(|(cursor, _)| cursor);
        if let Some(cursor) = found {
            chains.remove(cursor);
            debug!(
                start = callbacks.start,
                count = callbacks.handlers.len(),
                "unregistered packet callback chain"
            );
        }
    }

    /// Routes one decoded packet to the registered chains.
    ///
    /// Walks chains in registration order, invoking the covering handler of
    /// each, and stops at the first [`PacketStatus::Used`]. Returns
    /// [`PacketStatus::NotUsed`] when no covering handler consumed the
    /// packet; the caller decides whether that means a protocol violation
    /// or a code with default handling.
    pub fn dispatch(&self, session: &mut S, msg_type: u8, payload: &[u8]) -> PacketStatus {
        // Fix the candidate set before running any handler: chains
        // registered or unregistered from inside a handler take effect for
        // the next packet, never the one in flight. Cloning the contexts
        // also keeps an unregistered chain's context alive until the round
        // finishes.
        let snapshot: Vec<(PacketHandler<S>, Option<UserData>)> = self
            .chains
            .borrow()
            .iter()
            .filter_map(|chain| {
                chain
                    .handler_for(msg_type)
                    .map(|handler| (handler, chain.user.clone()))
            })
            .collect();

        trace!(
            msg_type,
            name = %message::describe(msg_type),
            candidates = snapshot.len(),
            payload_len = payload.len(),
            "dispatching packet"
        );

        for (handler, user) in snapshot {
            match handler(session, msg_type, payload, user.as_ref()) {
                PacketStatus::Used => {
                    trace!(msg_type, "packet consumed");
                    return PacketStatus::Used;
                }
                PacketStatus::NotUsed => {}
            }
        }

        trace!(msg_type, "packet not consumed by any handler");
        PacketStatus::NotUsed
    }
}

impl<S> Default for PacketDispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for PacketDispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketDispatcher")
            .field("chains", &self.len())
            .finish()
    }
}
