//! SSH session event routing.
//!
//! This module is the in-process event plumbing an SSH transport is wired
//! into. It deliberately contains no wire parsing, cryptography, or socket
//! I/O; those layers sit on either side of it and are reached through the
//! interfaces here.
//!
//! # Architecture
//!
//! 1. **Message table** ([`message`]) - Symbolic names and range
//!    classification for the one-byte message-type codes (RFC 4250)
//! 2. **Callback slots** ([`callbacks`]) - Fixed-shape, single-consumer
//!    hooks for auth prompts, logging, connection progress and socket
//!    events
//! 3. **Packet dispatch** ([`dispatch`]) - Range-based, prioritized
//!    routing of decoded packets to registered handler chains
//!
//! The transport decodes a packet into its type code and payload, hands
//! both to the session's [`PacketDispatcher`], and acts on the returned
//! [`PacketStatus`]: `Used` means a registered handler consumed the
//! packet, `NotUsed` means the transport applies its own default policy
//! (typically answering `SSH_MSG_UNIMPLEMENTED` or treating the packet as
//! a protocol violation).
//!
//! # Concurrency
//!
//! A session and its registries belong to one thread of control. Nothing
//! here blocks, suspends, or takes a lock; every operation is bounded by
//! the number of registered chains and handlers, not by message volume.

pub mod callbacks;
pub mod dispatch;
pub mod message;

// Re-export main types
pub use callbacks::{
    CallbackSlots, ConnectResult, LogLevel, SessionCallbacks, SocketCallbacks, SocketException,
    SocketFlow, UserData,
};
pub use dispatch::{PacketCallbacks, PacketDispatcher, PacketHandler, PacketStatus};
pub use message::{MessageCategory, MessageType};
