//! Per-destination channel registry (C3): maps `channelId` to a
//! reference-counted [`Subscription`], created on first `add_channels` and
//! torn down once the matching number of `remove_channels` calls has been
//! observed.
//!
//! This is the single-threaded, receiver-owned map `DataFrameHandler`
//! consults to demultiplex inbound datagrams and to admit or reject
//! conductor subscription commands.

use std::collections::HashMap;

use media_core::{CoreError, Destination, Subscription};

/// Channel-keyed subscription table for one destination.
pub struct SubscriptionRegistry {
    destination: Destination,
    subscriptions: HashMap<u64, Subscription>,
}

impl SubscriptionRegistry {
    /// An empty registry for `destination`.
    #[must_use]
    pub fn new(destination: Destination) -> Self {
        Self { destination, subscriptions: HashMap::new() }
    }

    /// Destination this registry demultiplexes for.
    #[must_use]
    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// For each channel id: create a new `Subscription` (ref count 1) if
    /// none exists, otherwise increment its reference count.
    pub fn add_channels(&mut self, channel_ids: &[u64]) {
        for &channel_id in channel_ids {
            self.subscriptions
                .entry(channel_id)
                .and_modify(Subscription::inc_ref)
                .or_insert_with(|| Subscription::new(self.destination, channel_id));
        }
    }

    /// For each channel id: decrement its reference count, closing and
    /// removing the subscription once it reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SubscriptionNotRegistered`] on the first channel
    /// id with no live subscription; ids processed before the failing one
    /// remain decremented.
    pub fn remove_channels(&mut self, channel_ids: &[u64]) -> Result<(), CoreError> {
        for &channel_id in channel_ids {
            let Some(subscription) = self.subscriptions.get_mut(&channel_id) else {
                return Err(CoreError::SubscriptionNotRegistered { channel_id });
            };

            if subscription.dec_ref() == 0 {
                if let Some(mut subscription) = self.subscriptions.remove(&channel_id) {
                    subscription.close();
                }
            }
        }
        Ok(())
    }

    /// Number of channels with a currently live subscription.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Channel ids with a currently live subscription.
    #[must_use]
    pub fn channel_ids(&self) -> Vec<u64> {
        self.subscriptions.keys().copied().collect()
    }

    /// Look up a subscription by channel id.
    #[must_use]
    pub fn get(&self, channel_id: u64) -> Option<&Subscription> {
        self.subscriptions.get(&channel_id)
    }

    /// Mutably look up a subscription by channel id.
    pub fn get_mut(&mut self, channel_id: u64) -> Option<&mut Subscription> {
        self.subscriptions.get_mut(&channel_id)
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
    fn add_channels_creates_subscription() {
        let mut registry = SubscriptionRegistry::new(destination());
        registry.add_channels(&[17]);
        assert_eq!(registry.channel_count(), 1);
        assert_eq!(registry.get(17).unwrap().ref_count(), 1);
    }

    #[test]
    fn remove_unknown_channel_fails() {
        let mut registry = SubscriptionRegistry::new(destination());
        let err = registry.remove_channels(&[999]).unwrap_err();
        assert!(matches!(err, CoreError::SubscriptionNotRegistered { channel_id: 999 }));
    }

    #[test]
    fn balanced_add_remove_leaves_no_subscription() {
        let mut registry = SubscriptionRegistry::new(destination());
        registry.add_channels(&[5]);
        registry.add_channels(&[5]);
        registry.remove_channels(&[5]).unwrap();
        assert_eq!(registry.channel_count(), 1);

        registry.remove_channels(&[5]).unwrap();
        assert_eq!(registry.channel_count(), 0);
        assert!(registry.get(5).is_none());
    }

    #[test]
    fn unknown_channel_does_not_mutate_registry() {
        let mut registry = SubscriptionRegistry::new(destination());
        registry.add_channels(&[17]);

        let before = registry.channel_count();
        assert!(registry.remove_channels(&[999]).is_err());
        assert_eq!(registry.channel_count(), before);
        assert_eq!(registry.get(17).unwrap().ref_count(), 1);
    }
}
