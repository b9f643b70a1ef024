//! Network Runtime Context
//!
//! Facts the controller needs from the surrounding network runtime every
//! tick: the shared session clock, the local connection's RTT estimate,
//! and who is connected right now. Clock synchronization itself is the
//! runtime's job.

use crate::game::player::ClientId;

/// Runtime facts consumed by the session endpoints each tick.
pub trait NetworkContext {
    /// Shared session clock, seconds since the runtime's epoch.
    fn session_now(&self) -> f64;

    /// Round-trip estimate for the local connection, milliseconds.
    fn local_rtt_ms(&self) -> u32;

    /// Identities of every currently connected participant.
    fn connected_clients(&self) -> Vec<ClientId>;
}

/// In-process stand-in used by the demo binary and tests.
#[derive(Clone, Debug, Default)]
pub struct LoopbackContext {
    /// Current session clock value.
    pub now: f64,
    /// Reported local RTT.
    pub rtt_ms: u32,
    /// Connected participants.
    pub clients: Vec<ClientId>,
}

impl LoopbackContext {
    /// Create a context at clock zero.
    pub fn new(clients: Vec<ClientId>) -> Self {
        Self {
            now: 0.0,
            rtt_ms: 0,
            clients,
        }
    }

    /// Advance the simulated clock by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.now += dt;
    }
}

impl NetworkContext for LoopbackContext {
    fn session_now(&self) -> f64 {
        self.now
    }

    fn local_rtt_ms(&self) -> u32 {
        self.rtt_ms
    }

    fn connected_clients(&self) -> Vec<ClientId> {
        self.clients.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances() {
        let mut ctx = LoopbackContext::new(vec![ClientId::new(1), ClientId::new(2)]);
        assert_eq!(ctx.session_now(), 0.0);

        ctx.advance(1.5);
        ctx.advance(0.5);
        assert_eq!(ctx.session_now(), 2.0);
        assert_eq!(ctx.connected_clients().len(), 2);
    }
}
