//! Fuzz target for packet dispatch.
//!
//! Builds a registry from arbitrary chain layouts and routes arbitrary
//! message-type codes through it to find:
//! - Panics
//! - Range bookkeeping errors (handlers invoked for codes outside their
//!   chain's range)
//! - Incorrect wraparound rejection
//!
//! Run with:
//! ```bash
//! cd crates/proto
//! cargo +nightly fuzz run dispatch -- -max_total_time=300
//! ```

#![no_main]
use bosun_proto::ssh::dispatch::{
    PacketCallbacks, PacketDispatcher, PacketHandler, PacketStatus, UserData,
};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct FuzzSession {
    invoked: usize,
}

/// Every chain is tagged with its own (start, count); a handler invoked for
/// a code outside that range is a routing bug.
fn check_range(
    session: &mut FuzzSession,
    msg_type: u8,
    _payload: &[u8],
    user: Option<&UserData>,
) -> PacketStatus {
    let (start, count) = user
        .and_then(|u| u.downcast_ref::<(u8, usize)>())
        .copied()
        .expect("chain range tag");
    assert!(usize::from(msg_type) >= usize::from(start));
    assert!(usize::from(msg_type) < usize::from(start) + count);

    session.invoked += 1;
    // Exercise both outcomes.
    if session.invoked % 3 == 0 {
        PacketStatus::Used
    } else {
        PacketStatus::NotUsed
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let dispatcher: PacketDispatcher<FuzzSession> = PacketDispatcher::new();
    for chunk in data.chunks_exact(2).take(16) {
        let start = chunk[0];
        let count = usize::from(chunk[1] % 8);
        let handlers: Vec<PacketHandler<FuzzSession>> = vec![check_range; count];

        if usize::from(start) + count > 256 {
            // Wrapping ranges must be rejected at construction.
            assert!(PacketCallbacks::<FuzzSession>::new(start, handlers, None).is_err());
            continue;
        }

        let tag: UserData = Arc::new((start, count));
        let chain = PacketCallbacks::new(start, handlers, None)
            .expect("non-wrapping range")
            .with_user(tag);
        dispatcher.register(chain).expect("register");
    }

    let mut session = FuzzSession { invoked: 0 };
    for &code in data.iter().take(64) {
        let _ = dispatcher.dispatch(&mut session, code, data);
    }
});
