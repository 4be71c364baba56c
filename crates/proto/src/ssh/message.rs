//! SSH message-type numbers (RFC 4250 Section 4.1).
//!
//! Wire packets open with a one-byte type code in the range 0-255. The
//! routing layer works on the raw code so that unknown and locally-extended
//! types stay routable; this module is the advisory table that gives the
//! well-known codes symbolic names for logging and diagnostics.
//!
//! The code space is carved into ranges by RFC 4251 Section 7:
//!
//! | Range   | Meaning                          |
//! |---------|----------------------------------|
//! | 1-19    | Transport layer generic          |
//! | 20-29   | Algorithm negotiation            |
//! | 30-49   | Key exchange method specific     |
//! | 50-59   | User authentication generic      |
//! | 60-79   | User authentication method       |
//! | 80-89   | Connection protocol generic      |
//! | 90-127  | Channel related                  |
//! | 128-191 | Reserved for client protocols    |
//! | 192-255 | Local extensions                 |
//!
//! # Example
//!
//! ```rust
//! use bosun_proto::ssh::message::{MessageCategory, MessageType};
//!
//! let msg = MessageType::from_u8(20).unwrap();
//! assert_eq!(msg, MessageType::KexInit);
//! assert_eq!(msg.name(), "SSH_MSG_KEXINIT");
//! assert_eq!(msg.category(), MessageCategory::AlgorithmNegotiation);
//! ```

/// Range classification of a message-type code (RFC 4251 Section 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCategory {
    /// Transport layer generic messages (1-19).
    TransportGeneric,
    /// Algorithm negotiation (20-29).
    AlgorithmNegotiation,
    /// Key exchange method specific messages (30-49).
    KeyExchangeMethod,
    /// User authentication generic messages (50-59).
    UserauthGeneric,
    /// User authentication method specific messages (60-79).
    UserauthMethod,
    /// Connection protocol generic messages (80-89).
    ConnectionGeneric,
    /// Channel related messages (90-127).
    ChannelRelated,
    /// Reserved for client protocols (128-191).
    Reserved,
    /// Local extensions (192-255).
    LocalExtension,
}

impl MessageCategory {
    /// Classifies a raw code. Code 0 is not assigned to any range.
    pub fn of(code: u8) -> Option<Self> {
        match code {
            0 => None,
            1..=19 => Some(Self::TransportGeneric),
            20..=29 => Some(Self::AlgorithmNegotiation),
            30..=49 => Some(Self::KeyExchangeMethod),
            50..=59 => Some(Self::UserauthGeneric),
            60..=79 => Some(Self::UserauthMethod),
            80..=89 => Some(Self::ConnectionGeneric),
            90..=127 => Some(Self::ChannelRelated),
            128..=191 => Some(Self::Reserved),
            192..=255 => Some(Self::LocalExtension),
        }
    }
}

/// Well-known SSH message types and their assigned numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Terminates the connection.
    Disconnect = 1,
    /// Padding / keep-alive; must be ignored by the receiver.
    Ignore = 2,
    /// Response to a message the peer does not implement.
    Unimplemented = 3,
    /// Debugging information.
    Debug = 4,
    /// Requests a service such as `ssh-userauth`.
    ServiceRequest = 5,
    /// Grants a service request.
    ServiceAccept = 6,
    /// Extension negotiation (RFC 8308).
    ExtInfo = 7,

    /// Opens algorithm negotiation.
    KexInit = 20,
    /// Signals the switch to the newly negotiated keys.
    NewKeys = 21,

    /// DH/ECDH key exchange initiation (number shared by both families).
    KexdhInit = 30,
    /// DH/ECDH key exchange reply.
    KexdhReply = 31,

    /// Requests authentication for a user.
    UserauthRequest = 50,
    /// Authentication attempt rejected; lists methods that can continue.
    UserauthFailure = 51,
    /// Authentication completed.
    UserauthSuccess = 52,
    /// Banner text to show before authentication.
    UserauthBanner = 53,

    /// Public key accepted for authentication (method-specific, code 60).
    UserauthPkOk = 60,
    /// Response to a keyboard-interactive info request (code 61).
    UserauthInfoResponse = 61,

    /// Global (connection-wide) request.
    GlobalRequest = 80,
    /// Global request succeeded.
    RequestSuccess = 81,
    /// Global request failed or is unknown.
    RequestFailure = 82,

    /// Opens a new channel.
    ChannelOpen = 90,
    /// Confirms a channel open.
    ChannelOpenConfirmation = 91,
    /// Rejects a channel open.
    ChannelOpenFailure = 92,
    /// Adjusts the flow-control window.
    ChannelWindowAdjust = 93,
    /// Channel payload data.
    ChannelData = 94,
    /// Typed out-of-band channel data (stderr).
    ChannelExtendedData = 95,
    /// No more data will be sent on the channel.
    ChannelEof = 96,
    /// Closes the channel.
    ChannelClose = 97,
    /// Channel-specific request (pty-req, exec, ...).
    ChannelRequest = 98,
    /// Channel request succeeded.
    ChannelSuccess = 99,
    /// Channel request failed.
    ChannelFailure = 100,
}

impl MessageType {
    /// Looks up a well-known message type by its wire code.
    ///
    /// Returns `None` for unassigned, reserved, and locally-extended codes;
    /// those are still legal on the wire and routable by the dispatch layer.
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Disconnect),
            2 => Some(Self::Ignore),
            3 => Some(Self::Unimplemented),
            4 => Some(Self::Debug),
            5 => Some(Self::ServiceRequest),
            6 => Some(Self::ServiceAccept),
            7 => Some(Self::ExtInfo),
            20 => Some(Self::KexInit),
            21 => Some(Self::NewKeys),
            30 => Some(Self::KexdhInit),
            31 => Some(Self::KexdhReply),
            50 => Some(Self::UserauthRequest),
            51 => Some(Self::UserauthFailure),
            52 => Some(Self::UserauthSuccess),
            53 => Some(Self::UserauthBanner),
            60 => Some(Self::UserauthPkOk),
            61 => Some(Self::UserauthInfoResponse),
            80 => Some(Self::GlobalRequest),
            81 => Some(Self::RequestSuccess),
            82 => Some(Self::RequestFailure),
            90 => Some(Self::ChannelOpen),
            91 => Some(Self::ChannelOpenConfirmation),
            92 => Some(Self::ChannelOpenFailure),
            93 => Some(Self::ChannelWindowAdjust),
            94 => Some(Self::ChannelData),
            95 => Some(Self::ChannelExtendedData),
            96 => Some(Self::ChannelEof),
            97 => Some(Self::ChannelClose),
            98 => Some(Self::ChannelRequest),
            99 => Some(Self::ChannelSuccess),
            100 => Some(Self::ChannelFailure),
            _ => None,
        }
    }

    /// Returns the protocol constant name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Disconnect => "SSH_MSG_DISCONNECT",
            Self::Ignore => "SSH_MSG_IGNORE",
            Self::Unimplemented => "SSH_MSG_UNIMPLEMENTED",
            Self::Debug => "SSH_MSG_DEBUG",
            Self::ServiceRequest => "SSH_MSG_SERVICE_REQUEST",
            Self::ServiceAccept => "SSH_MSG_SERVICE_ACCEPT",
            Self::ExtInfo => "SSH_MSG_EXT_INFO",
            Self::KexInit => "SSH_MSG_KEXINIT",
            Self::NewKeys => "SSH_MSG_NEWKEYS",
            Self::KexdhInit => "SSH_MSG_KEXDH_INIT",
            Self::KexdhReply => "SSH_MSG_KEXDH_REPLY",
            Self::UserauthRequest => "SSH_MSG_USERAUTH_REQUEST",
            Self::UserauthFailure => "SSH_MSG_USERAUTH_FAILURE",
            Self::UserauthSuccess => "SSH_MSG_USERAUTH_SUCCESS",
            Self::UserauthBanner => "SSH_MSG_USERAUTH_BANNER",
            Self::UserauthPkOk => "SSH_MSG_USERAUTH_PK_OK",
            Self::UserauthInfoResponse => "SSH_MSG_USERAUTH_INFO_RESPONSE",
            Self::GlobalRequest => "SSH_MSG_GLOBAL_REQUEST",
            Self::RequestSuccess => "SSH_MSG_REQUEST_SUCCESS",
            Self::RequestFailure => "SSH_MSG_REQUEST_FAILURE",
            Self::ChannelOpen => "SSH_MSG_CHANNEL_OPEN",
            Self::ChannelOpenConfirmation => "SSH_MSG_CHANNEL_OPEN_CONFIRMATION",
            Self::ChannelOpenFailure => "SSH_MSG_CHANNEL_OPEN_FAILURE",
            Self::ChannelWindowAdjust => "SSH_MSG_CHANNEL_WINDOW_ADJUST",
            Self::ChannelData => "SSH_MSG_CHANNEL_DATA",
            Self::ChannelExtendedData => "SSH_MSG_CHANNEL_EXTENDED_DATA",
            Self::ChannelEof => "SSH_MSG_CHANNEL_EOF",
            Self::ChannelClose => "SSH_MSG_CHANNEL_CLOSE",
            Self::ChannelRequest => "SSH_MSG_CHANNEL_REQUEST",
            Self::ChannelSuccess => "SSH_MSG_CHANNEL_SUCCESS",
            Self::ChannelFailure => "SSH_MSG_CHANNEL_FAILURE",
        }
    }

    /// Returns the RFC 4251 range this message number falls in.
    pub fn category(&self) -> MessageCategory {
        // Every assigned number classifies; the table has no code 0.
        match MessageCategory::of(*self as u8) {
            Some(category) => category,
            None => unreachable!("assigned message number outside every range"),
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Human-readable label for any wire code, known or not.
///
/// Used by the dispatch layer's trace logging so that raw codes show up
/// next to their protocol names when the table knows them.
///
/// # Example
///
/// ```rust
/// use bosun_proto::ssh::message::describe;
///
/// assert_eq!(describe(21), "SSH_MSG_NEWKEYS");
/// assert_eq!(describe(137), "unassigned(137)");
/// ```
pub fn describe(code: u8) -> String {
    match MessageType::from_u8(code) {
        Some(msg) => msg.name().to_string(),
        None => format!("unassigned({})", code),
    }
}
