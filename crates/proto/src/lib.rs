//! Protocol event routing for the Bosun SSH ecosystem.
//!
//! This crate carries the pieces of an SSH implementation that route
//! in-process events: the per-session packet dispatch registry, the
//! fixed-shape callback slot structs, and the message-type name table.
//! Transport framing, key exchange, and socket I/O are external
//! collaborators and are out of scope here.
//!
//! # Features
//!
//! - `ssh` (default) - SSH event-routing support
//!
//! # Example
//!
//! ```rust
//! use bosun_proto::ssh::{PacketCallbacks, PacketDispatcher, PacketStatus};
//! use bosun_proto::ssh::dispatch::UserData;
//!
//! struct Session {
//!     ignored: u32,
//! }
//!
//! fn on_ignore(
//!     session: &mut Session,
//!     _msg_type: u8,
//!     _payload: &[u8],
//!     _user: Option<&UserData>,
//! ) -> PacketStatus {
//!     session.ignored += 1;
//!     PacketStatus::Used
//! }
//!
//! let dispatcher = PacketDispatcher::new();
//! dispatcher
//!     .register(PacketCallbacks::single(2, on_ignore))
//!     .unwrap();
//!
//! let mut session = Session { ignored: 0 };
//! assert_eq!(dispatcher.dispatch(&mut session, 2, &[]), PacketStatus::Used);
//! assert_eq!(session.ignored, 1);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

#[cfg(feature = "ssh")]
pub mod ssh;
