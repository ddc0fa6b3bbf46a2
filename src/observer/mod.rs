use core::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::protocol::NodeState;

/// Event published to registered observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// The peer entered a new election role.
    StateChange(NodeState),
    /// The peer was destroyed and will publish nothing further.
    Destroy,
}

/// Event category an observer subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    StateChange,
    Destroy,
}

impl EngineEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::StateChange(_) => EventKind::StateChange,
            EngineEvent::Destroy => EventKind::Destroy,
        }
    }
}

/// Handle returned by [`ObserverRegistry::on`], used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObserverToken(u64);

type ObserverCallback = Arc<dyn Fn(&EngineEvent) + Send + Sync + 'static>;

struct Observer {
    token: ObserverToken,
    kind: EventKind,
    callback: ObserverCallback,
}

/// Registry of event observers for one peer.
///
/// Callbacks run synchronously on the engine worker that produced the event,
/// in registration order. The registry lock is released before callbacks are
/// invoked, so a callback may register or unregister observers. Callbacks
/// must not block on the peer handle itself.
#[derive(Clone)]
pub struct ObserverRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

struct RegistryInner {
    next_token: u64,
    observers: Vec<Observer>,
}

impl ObserverRegistry {
    pub fn new() -> ObserverRegistry {
        ObserverRegistry {
            inner: Arc::new(Mutex::new(RegistryInner {
                next_token: 0,
                observers: Vec::new(),
            })),
        }
    }

    /// Registers a callback for one event kind. The same callback can be
    /// registered several times and will then fire once per registration.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ObserverToken
    where
        F: Fn(&EngineEvent) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let token = ObserverToken(inner.next_token);
        inner.next_token += 1;
        inner.observers.push(Observer {
            token,
            kind,
            callback: Arc::new(callback),
        });

        token
    }

    /// Unregisters a callback. Returns false for unknown tokens.
    pub fn off(&self, token: ObserverToken) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.observers.len();
        inner.observers.retain(|observer| observer.token != token);

        inner.observers.len() < before
    }

    pub(crate) fn publish(&self, event: &EngineEvent) {
        let callbacks: Vec<ObserverCallback> = {
            let inner = self.inner.lock();
            inner
                .observers
                .iter()
                .filter(|observer| observer.kind == event.kind())
                .map(|observer| observer.callback.clone())
                .collect()
        };

        for callback in callbacks {
            callback(event);
        }
    }

    #[cfg(test)]
    fn observer_count(&self) -> usize {
        self.inner.lock().observers.len()
    }
}

impl Default for ObserverRegistry {
    fn default() -> ObserverRegistry {
        ObserverRegistry::new()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.inner.lock().observers.len())
            .finish()
    }
}
