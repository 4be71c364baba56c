//! Integration tests for session event routing.
//!
//! These tests drive the routing surface the way a transport loop would:
//! decoded (type, payload) pairs flow through the dispatch registry while
//! session-level events (auth prompts, logging, connection progress) go
//! through the callback slots.

use std::rc::Rc;
use std::sync::{Arc, Mutex};

use bosun_proto::ssh::callbacks::{CallbackSlots, LogLevel, SessionCallbacks, UserData};
use bosun_proto::ssh::dispatch::{
    PacketCallbacks, PacketDispatcher, PacketHandler, PacketStatus,
};
use bosun_proto::ssh::message::MessageType;
use bosun_platform::BosunResult;

/// Session state shared by the registered subsystems.
struct TestSession {
    dispatcher: Rc<PacketDispatcher<TestSession>>,
    slots: CallbackSlots,
    kex_chain: Option<PacketCallbacks<TestSession>>,
    kex_done: bool,
    auth_attempts: u32,
    last_password: Vec<u8>,
    channel_data: Vec<u8>,
    unhandled: Vec<u8>,
    trace: Vec<&'static str>,
    probe_consumes: bool,
}

impl TestSession {
    fn new(dispatcher: Rc<PacketDispatcher<TestSession>>) -> Self {
        Self {
            dispatcher,
            slots: CallbackSlots::new(),
            kex_chain: None,
            kex_done: false,
            auth_attempts: 0,
            last_password: Vec::new(),
            channel_data: Vec::new(),
            unhandled: Vec::new(),
            trace: Vec::new(),
            probe_consumes: false,
        }
    }
}

/// Feeds decoded packets through the dispatcher the way a transport loop
/// does, collecting codes nothing consumed.
fn pump(session: &mut TestSession, packets: &[(u8, &[u8])]) {
    for &(code, payload) in packets {
        let dispatcher = Rc::clone(&session.dispatcher);
        if dispatcher.dispatch(session, code, payload) == PacketStatus::NotUsed {
            session.unhandled.push(code);
        }
    }
}

fn on_kexinit(
    session: &mut TestSession,
    _msg_type: u8,
    _payload: &[u8],
    _user: Option<&UserData>,
) -> PacketStatus {
    session.trace.push("kexinit");
    PacketStatus::Used
}

/// Key exchange finishes on NEWKEYS; the subsystem detaches its own chain.
fn on_newkeys(
    session: &mut TestSession,
    _msg_type: u8,
    _payload: &[u8],
    _user: Option<&UserData>,
) -> PacketStatus {
    session.kex_done = true;
    if let Some(chain) = session.kex_chain.take() {
        let dispatcher = Rc::clone(&session.dispatcher);
        dispatcher.unregister(&chain);
    }
    PacketStatus::Used
}

fn on_userauth_request(
    session: &mut TestSession,
    _msg_type: u8,
    _payload: &[u8],
    _user: Option<&UserData>,
) -> PacketStatus {
    session.auth_attempts += 1;
    let mut buf = [0u8; 64];
    if let Some(Ok(written)) = session
        .slots
        .auth_prompt("password for user:", &mut buf, false, false)
    {
        session.last_password = buf[..written].to_vec();
    }
    PacketStatus::Used
}

fn on_channel_data(
    session: &mut TestSession,
    _msg_type: u8,
    payload: &[u8],
    _user: Option<&UserData>,
) -> PacketStatus {
    session.channel_data.extend_from_slice(payload);
    PacketStatus::Used
}

fn decline(
    _session: &mut TestSession,
    _msg_type: u8,
    _payload: &[u8],
    _user: Option<&UserData>,
) -> PacketStatus {
    PacketStatus::NotUsed
}

fn supply_password(
    _prompt: &str,
    buf: &mut [u8],
    _echo: bool,
    _verify: bool,
    _user: Option<&UserData>,
) -> BosunResult<usize> {
    let secret = b"swordfish";
    buf[..secret.len()].copy_from_slice(secret);
    Ok(secret.len())
}

#[test]
fn test_session_flow_routes_across_subsystems() {
    let dispatcher = Rc::new(PacketDispatcher::new());
    let mut session = TestSession::new(Rc::clone(&dispatcher));

    // Auth prompts are answered by the installed session callbacks.
    let mut callbacks = SessionCallbacks::new();
    callbacks.auth = Some(supply_password);
    session.slots.set(callbacks).unwrap();

    // Kex subsystem: KEXINIT and NEWKEYS.
    let kex_chain =
        PacketCallbacks::new(MessageType::KexInit as u8, vec![on_kexinit, on_newkeys], None)
            .unwrap();
    dispatcher.register(kex_chain.clone()).unwrap();
    session.kex_chain = Some(kex_chain);

    // Userauth subsystem: a single code.
    dispatcher
        .register(PacketCallbacks::single(
            MessageType::UserauthRequest as u8,
            on_userauth_request,
        ))
        .unwrap();

    // Channel subsystem: the whole 90..=100 range, with only CHANNEL_DATA
    // implemented so far.
    let mut channel_handlers: Vec<PacketHandler<TestSession>> = vec![decline; 11];
    channel_handlers[usize::from(MessageType::ChannelData as u8 - 90)] = on_channel_data;
    dispatcher
        .register(PacketCallbacks::new(90, channel_handlers, None).unwrap())
        .unwrap();
    assert_eq!(dispatcher.len(), 3);

    pump(
        &mut session,
        &[
            (MessageType::KexInit as u8, b"algorithms"),
            (MessageType::NewKeys as u8, b""),
            (MessageType::UserauthRequest as u8, b"user"),
            (MessageType::ChannelData as u8, b"hello"),
            (MessageType::Ignore as u8, b""),
            (MessageType::ChannelEof as u8, b""),
            (MessageType::ChannelData as u8, b" world"),
        ],
    );

    assert!(session.kex_done);
    assert_eq!(session.trace, ["kexinit"]);
    assert_eq!(session.auth_attempts, 1);
    assert_eq!(session.last_password, b"swordfish");
    assert_eq!(session.channel_data, b"hello world");

    // IGNORE had no chain; CHANNEL_EOF's handler declined.
    assert_eq!(
        session.unhandled,
        [MessageType::Ignore as u8, MessageType::ChannelEof as u8]
    );

    // The kex chain detached itself on NEWKEYS, so KEXINIT now falls through.
    assert_eq!(dispatcher.len(), 2);
    session.unhandled.clear();
    pump(&mut session, &[(MessageType::KexInit as u8, b"")]);
    assert_eq!(session.unhandled, [MessageType::KexInit as u8]);
}

fn probe(
    session: &mut TestSession,
    _msg_type: u8,
    _payload: &[u8],
    _user: Option<&UserData>,
) -> PacketStatus {
    session.trace.push("probe");
    if session.probe_consumes {
        PacketStatus::Used
    } else {
        PacketStatus::NotUsed
    }
}

fn core_handler(
    session: &mut TestSession,
    _msg_type: u8,
    _payload: &[u8],
    _user: Option<&UserData>,
) -> PacketStatus {
    session.trace.push("core");
    PacketStatus::Used
}

#[test]
fn test_probe_chain_sees_packets_before_core_chain() {
    // A diagnostic probe registered before the core subsystem observes
    // every covered packet first and decides whether it falls through.
    let dispatcher = Rc::new(PacketDispatcher::new());
    let mut session = TestSession::new(Rc::clone(&dispatcher));

    dispatcher
        .register(PacketCallbacks::single(MessageType::KexdhInit as u8, probe))
        .unwrap();
    dispatcher
        .register(PacketCallbacks::single(
            MessageType::KexdhInit as u8,
            core_handler,
        ))
        .unwrap();

    assert_eq!(
        dispatcher.dispatch(&mut session, MessageType::KexdhInit as u8, b""),
        PacketStatus::Used
    );
    assert_eq!(session.trace, ["probe", "core"]);

    session.trace.clear();
    session.probe_consumes = true;
    assert_eq!(
        dispatcher.dispatch(&mut session, MessageType::KexdhInit as u8, b""),
        PacketStatus::Used
    );
    assert_eq!(session.trace, ["probe"]);
}

fn record_progress(progress: f32, user: Option<&UserData>) {
    let recorded = user
        .and_then(|u| u.downcast_ref::<Mutex<Vec<f32>>>())
        .expect("progress userdata");
    recorded.lock().unwrap().push(progress);
}

fn record_log(level: LogLevel, message: &str, user: Option<&UserData>) {
    let recorded = user
        .and_then(|u| u.downcast_ref::<Mutex<Vec<(LogLevel, String)>>>())
        .expect("log userdata");
    recorded.lock().unwrap().push((level, message.to_string()));
}

#[test]
fn test_connect_progress_and_log_delivery() {
    let progress: UserData = Arc::new(Mutex::new(Vec::<f32>::new()));
    let mut callbacks = SessionCallbacks::new();
    callbacks.userdata = Some(Arc::clone(&progress));
    callbacks.connect_status = Some(record_progress);

    let mut slots = CallbackSlots::new();
    slots.set(callbacks).unwrap();

    for step in [0.0_f32, 0.5, 1.0] {
        assert!(slots.connect_status(step));
    }
    let recorded = progress.downcast_ref::<Mutex<Vec<f32>>>().unwrap();
    assert_eq!(*recorded.lock().unwrap(), vec![0.0, 0.5, 1.0]);

    // Swap in a log slot; the old callbacks are replaced wholesale.
    let log: UserData = Arc::new(Mutex::new(Vec::<(LogLevel, String)>::new()));
    let mut callbacks = SessionCallbacks::new();
    callbacks.userdata = Some(Arc::clone(&log));
    callbacks.log = Some(record_log);
    slots.set(callbacks).unwrap();

    slots.log(LogLevel::Protocol, "kex negotiation complete");
    slots.log(LogLevel::Warning, "server sent unexpected banner");
    assert!(!slots.connect_status(1.0)); // progress slot no longer installed

    let recorded = log
        .downcast_ref::<Mutex<Vec<(LogLevel, String)>>>()
        .unwrap();
    assert_eq!(
        *recorded.lock().unwrap(),
        vec![
            (LogLevel::Protocol, "kex negotiation complete".to_string()),
            (LogLevel::Warning, "server sent unexpected banner".to_string()),
        ]
    );
}

#[test]
fn test_dispatch_logging_without_slot_uses_tracing() {
    // No log slot installed anywhere: events fall through to the tracing
    // subscriber and routing is unaffected.
    tracing_subscriber::fmt()
        .with_env_filter("bosun_proto=trace")
        .try_init()
        .ok();

    let dispatcher = Rc::new(PacketDispatcher::new());
    let mut session = TestSession::new(Rc::clone(&dispatcher));
    session.slots.log(LogLevel::Packet, "no slot installed");

    dispatcher
        .register(PacketCallbacks::single(MessageType::Debug as u8, core_handler))
        .unwrap();
    assert_eq!(
        dispatcher.dispatch(&mut session, MessageType::Debug as u8, b"debug"),
        PacketStatus::Used
    );
    assert_eq!(
        dispatcher.dispatch(&mut session, 137, b"unassigned"),
        PacketStatus::NotUsed
    );
}

#[test]
fn test_chain_context_is_visible_to_owner() {
    // A registrant can keep a tagged clone for later unregistration and
    // still reach its own context through the chain.
    let tag: UserData = Arc::new("channel-subsystem".to_string());
    let chain =
        PacketCallbacks::<TestSession>::single(MessageType::ChannelOpen as u8, decline)
            .with_user(Arc::clone(&tag));

    let user = chain.user().expect("context attached");
    assert!(Arc::ptr_eq(user, &tag));

    let dispatcher = Rc::new(PacketDispatcher::new());
    dispatcher.register(chain.clone()).unwrap();
    assert_eq!(dispatcher.len(), 1);
    dispatcher.unregister(&chain);
    assert!(dispatcher.is_empty());
}
