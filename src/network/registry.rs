//! Session Registry
//!
//! Move-based exclusivity for the per-process session endpoint. Opening
//! the registry consumes it and yields a ticket; constructing a host or
//! replica requires that ticket; closing the ticket hands the registry
//! back for the next match. A second concurrent session, or a teardown by
//! anyone but the owner, does not compile.

/// The process's single slot for a session endpoint.
#[derive(Debug)]
pub struct SessionRegistry {
    _priv: (),
}

impl SessionRegistry {
    /// Create the registry slot. One per process, made at startup.
    pub fn new() -> Self {
        Self { _priv: () }
    }

    /// Claim the slot for one match.
    pub fn open(self) -> SessionTicket {
        SessionTicket { _priv: () }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that the holder owns the process's only session slot.
///
/// Not Clone: the live endpoint holds it for its whole lifetime and
/// surrenders it on shutdown.
#[derive(Debug)]
pub struct SessionTicket {
    _priv: (),
}

impl SessionTicket {
    /// Release the slot, making the registry available again.
    pub fn close(self) -> SessionRegistry {
        SessionRegistry { _priv: () }
    }
}
