//! Network Layer
//!
//! Replication plumbing for the session lifecycle. The transport is a
//! seam: endpoints speak [`ReplicationSink`]/[`ReplicationSource`] and
//! never see sockets, so tests drive them over the in-process loopback.

pub mod context;
pub mod registry;
pub mod replication;
pub mod session;

pub use context::{LoopbackContext, NetworkContext};
pub use registry::{SessionRegistry, SessionTicket};
pub use replication::{
    FieldUpdate, LoopbackSubscription, LoopbackTransport, ReplicationError,
    ReplicationSink, ReplicationSource,
};
pub use session::{SessionError, SessionHost, SessionReplica, TickOutput};
