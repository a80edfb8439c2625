//! Emitter registry
//!
//! Process-wide table from [`SessionToken`] to a weak handle of the session's
//! [`ResultChannel`]. A recreated UI surface looks its token up to re-attach
//! to the in-flight session instead of starting a duplicate one. Entries
//! never keep a channel alive: once every owner dropped it, `lookup` returns
//! `None` and the session is treated as gone.

use bioprompt_core::SessionToken;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::Rng;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

use crate::channel::ResultChannel;

static GLOBAL: Lazy<Arc<EmitterRegistry>> = Lazy::new(|| Arc::new(EmitterRegistry::new()));

/// Token → weak result channel table.
#[derive(Debug, Default)]
pub struct EmitterRegistry {
    entries: Mutex<HashMap<SessionToken, Weak<ResultChannel>>>,
}

impl EmitterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by every session in this process.
    pub fn global() -> Arc<EmitterRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Store a weak handle under a fresh token.
    ///
    /// The presence check and the insert happen under one lock, so concurrent
    /// registrations never hand out the same token.
    pub fn register(&self, channel: &Arc<ResultChannel>) -> SessionToken {
        let mut entries = self.entries.lock();
        entries.retain(|_, weak| weak.strong_count() > 0);

        let mut rng = rand::thread_rng();
        loop {
            let token = SessionToken::from_raw(rng.gen());
            match entries.entry(token) {
                Entry::Vacant(slot) => {
                    slot.insert(Arc::downgrade(channel));
                    trace!(token = %token, "registered result channel");
                    return token;
                }
                Entry::Occupied(_) => {
                    debug!(token = %token, "session token collision; retrying");
                }
            }
        }
    }

    /// The live channel for `token`, if its owner still exists.
    pub fn lookup(&self, token: SessionToken) -> Option<Arc<ResultChannel>> {
        let channel = self.entries.lock().get(&token).and_then(Weak::upgrade);
        if channel.is_none() {
            debug!(token = %token, "lookup on unknown or expired session token");
        }
        channel
    }

    /// Remove the entry. Returns whether one was present.
    pub fn unregister(&self, token: SessionToken) -> bool {
        self.entries.lock().remove(&token).is_some()
    }

    /// Whether an entry exists for `token`, live or expired.
    pub fn contains(&self, token: SessionToken) -> bool {
        self.entries.lock().contains_key(&token)
    }

    /// Number of entries, including expired ones not yet pruned.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Scoped registration: unregisters its token exactly once when dropped.
#[derive(Debug)]
pub struct RegistrationGuard {
    registry: Arc<EmitterRegistry>,
    token: SessionToken,
}

impl RegistrationGuard {
    /// Register `channel` and hold the entry until the guard drops.
    pub fn register(registry: Arc<EmitterRegistry>, channel: &Arc<ResultChannel>) -> Self {
        let token = registry.register(channel);
        Self { registry, token }
    }

    /// The token the channel was registered under.
    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// The registry holding the entry.
    pub fn registry(&self) -> &EmitterRegistry {
        &self.registry
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        if self.registry.unregister(self.token) {
            trace!(token = %self.token, "unregistered result channel");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SurfaceSlot;
    use bioprompt_core::effects::{CancelSignal, HeadlessSurface, PromptSurface};
    use std::collections::HashSet;

    fn channel() -> Arc<ResultChannel> {
        let surface: Arc<dyn PromptSurface> = Arc::new(HeadlessSurface);
        Arc::new(ResultChannel::new(
            CancelSignal::new(),
            Arc::new(SurfaceSlot::new(&surface)),
        ))
    }

    #[test]
    fn test_register_then_lookup_returns_same_channel() {
        let registry = EmitterRegistry::new();
        let channel = channel();
        let token = registry.register(&channel);

        let found = registry.lookup(token).unwrap();
        assert!(Arc::ptr_eq(&found, &channel));
    }

    #[test]
    fn test_lookup_after_unregister_is_none() {
        let registry = EmitterRegistry::new();
        let channel = channel();
        let token = registry.register(&channel);

        assert!(registry.unregister(token));
        assert!(!registry.unregister(token));
        assert!(registry.lookup(token).is_none());
    }

    #[test]
    fn test_dropped_owner_expires_entry() {
        let registry = EmitterRegistry::new();
        let token = registry.register(&channel());

        assert!(registry.contains(token));
        assert!(registry.lookup(token).is_none());
    }

    #[test]
    fn test_unknown_token_is_none() {
        let registry = EmitterRegistry::new();
        assert!(registry.lookup(SessionToken::from_raw(7)).is_none());
    }

    #[test]
    fn test_guard_unregisters_on_drop() {
        let registry = Arc::new(EmitterRegistry::new());
        let channel = channel();
        let guard = RegistrationGuard::register(registry.clone(), &channel);
        let token = guard.token();
        assert!(registry.lookup(token).is_some());

        drop(guard);
        assert!(registry.is_empty());
        assert!(registry.lookup(token).is_none());
    }

    #[test]
    fn test_concurrent_registration_yields_distinct_tokens() {
        let registry = Arc::new(EmitterRegistry::new());
        let channels: Vec<_> = (0..64).map(|_| channel()).collect();

        let tokens: Vec<SessionToken> = std::thread::scope(|scope| {
            let workers: Vec<_> = channels
                .chunks(8)
                .map(|chunk| {
                    let registry = &registry;
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|channel| registry.register(channel))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers
                .into_iter()
                .flat_map(|worker| worker.join().unwrap())
                .collect()
        });

        let unique: HashSet<_> = tokens.iter().copied().collect();
        assert_eq!(unique.len(), 64);
        assert_eq!(registry.len(), 64);
    }
}
