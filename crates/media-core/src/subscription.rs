//! A `Subscription` is the per-channel, per-destination container that owns
//! all [`SubscribedSession`]s for that channel and tracks how many logical
//! `add_channels` calls are still outstanding against it.

use std::collections::HashMap;

use crate::{destination::Destination, session::SubscribedSession};

/// One subscription to a channel within a destination. Reference-counted:
/// destroyed (by its owning registry) when the count reaches zero.
pub struct Subscription {
    destination: Destination,
    channel_id: u64,
    ref_count: usize,
    sessions: HashMap<u64, SubscribedSession>,
}

impl Subscription {
    /// Create a subscription with an initial reference count of 1, as
    /// happens on the first `add_channels` call for this channel.
    #[must_use]
    pub fn new(destination: Destination, channel_id: u64) -> Self {
        Self { destination, channel_id, ref_count: 1, sessions: HashMap::new() }
    }

    /// Destination this subscription was created under.
    #[must_use]
    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Channel this subscription covers.
    #[must_use]
    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    /// Current reference count.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        self.ref_count
    }

    /// Record another logical `add_channels` call for this channel.
    pub fn inc_ref(&mut self) {
        self.ref_count += 1;
    }

    /// Record a `remove_channels` call for this channel. Returns the
    /// resulting reference count; the caller should close and drop the
    /// subscription once this reaches zero.
    pub fn dec_ref(&mut self) -> usize {
        self.ref_count = self.ref_count.saturating_sub(1);
        self.ref_count
    }

    /// Look up a session by id.
    #[must_use]
    pub fn session(&self, session_id: u64) -> Option<&SubscribedSession> {
        self.sessions.get(&session_id)
    }

    /// Mutably look up a session by id.
    pub fn session_mut(&mut self, session_id: u64) -> Option<&mut SubscribedSession> {
        self.sessions.get_mut(&session_id)
    }

    /// Insert a newly provisioned session.
    pub fn insert_session(&mut self, session: SubscribedSession) {
        self.sessions.insert(session.session_id(), session);
    }

    /// Number of sessions currently tracked on this channel.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Iterate over all sessions tracked on this channel, mutably.
    pub fn sessions_mut(&mut self) -> impl Iterator<Item = &mut SubscribedSession> {
        self.sessions.values_mut()
    }

    /// Close every session this subscription owns. Invoked once as the
    /// close hook when the subscription's reference count reaches zero.
    pub fn close(&mut self) {
        for session in self.sessions.values_mut() {
            session.close();
        }
        self.sessions.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::*;

    fn destination() -> Destination {
        Destination::unicast(
            "0.0.0.0:40001".parse::<SocketAddr>().unwrap(),
            "10.0.0.1:5000".parse::<SocketAddr>().unwrap(),
        )
    }

    #[test]
    fn new_subscription_has_ref_count_one() {
        let subscription = Subscription::new(destination(), 17);
        assert_eq!(subscription.ref_count(), 1);
    }

    #[test]
    fn inc_and_dec_ref_track_balanced_calls() {
        let mut subscription = Subscription::new(destination(), 17);
        subscription.inc_ref();
        assert_eq!(subscription.ref_count(), 2);
        assert_eq!(subscription.dec_ref(), 1);
        assert_eq!(subscription.dec_ref(), 0);
    }

    #[test]
    fn close_clears_all_sessions() {
        let mut subscription = Subscription::new(destination(), 17);
        subscription.insert_session(SubscribedSession::new_provisioned(
            42,
            17,
            "10.0.0.1:5000".parse().unwrap(),
        ));
        assert_eq!(subscription.session_count(), 1);

        subscription.close();

        assert_eq!(subscription.session_count(), 0);
    }
}
