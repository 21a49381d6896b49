//! World/theme state use-case service.
//!
//! # Responsibility
//! - Own the active world and its derived dark-mode flag.
//! - Persist the world durably and reflect it onto the document root.
//! - Notify explicit subscribers of world changes.
//!
//! # Invariants
//! - `set_world` is the only mutation path; `is_dark == (world == gaming)`.
//! - Both `data-aesthetic` and `data-theme` are written at init and on every
//!   `set_world`, including repeated calls with the same world.
//! - Subscribers run only when the world actually changes, after the new
//!   state and attributes are in place.
//! - Persistence failures are counted and logged, never returned.

use crate::dom::{DocumentRoot, ATTR_AESTHETIC, ATTR_THEME};
use crate::model::world::{ColorScheme, ThemeState, World};
use crate::repo::local_store::DurableStore;
use log::{info, warn};

/// Handle returned by `subscribe`; pass it to `unsubscribe` on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(ThemeState)>;

/// Durable key storing the last selected world: `<namespace>-world`.
pub fn world_storage_key(namespace: &str) -> String {
    format!("{namespace}-world")
}

/// Single source of truth for the active world/theme.
pub struct ThemeStore<S: DurableStore, D: DocumentRoot> {
    store: S,
    document: D,
    storage_key: String,
    state: ThemeState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    persist_failures: u64,
}

impl<S: DurableStore, D: DocumentRoot> ThemeStore<S, D> {
    /// Restores the persisted world and reflects it onto `document`.
    ///
    /// Missing, unreadable or unknown persisted values fall back to
    /// `World::Classical`. Initialization never writes to the store.
    pub fn init(store: S, document: D, namespace: &str) -> Self {
        let storage_key = world_storage_key(namespace);
        let world = match store.get_item(storage_key.as_str()) {
            Ok(Some(value)) => World::parse(value.as_str()).unwrap_or_else(|| {
                warn!(
                    "event=theme_init module=theme status=fallback reason=invalid_value key={}",
                    storage_key
                );
                World::default()
            }),
            Ok(None) => World::default(),
            Err(err) => {
                warn!(
                    "event=theme_init module=theme status=fallback reason=read_failed key={} error={}",
                    storage_key, err
                );
                World::default()
            }
        };

        let mut theme = Self {
            store,
            document,
            storage_key,
            state: ThemeState::for_world(world),
            listeners: Vec::new(),
            next_subscription: 0,
            persist_failures: 0,
        };
        theme.reflect();
        info!(
            "event=theme_init module=theme status=ok world={} theme={}",
            world,
            theme.state.color_scheme().as_str()
        );
        theme
    }

    /// Switches to `world`, persists it and re-applies document attributes.
    pub fn set_world(&mut self, world: World) {
        let previous = self.state;
        self.state = ThemeState::for_world(world);

        if let Err(err) = self.store.set_item(self.storage_key.as_str(), world.as_str()) {
            self.persist_failures += 1;
            warn!(
                "event=theme_persist module=theme status=ignored key={} error={}",
                self.storage_key, err
            );
        }
        self.reflect();

        if previous != self.state {
            info!(
                "event=world_change module=theme status=ok from={} to={}",
                previous.world(),
                world
            );
            let state = self.state;
            for (_, listener) in self.listeners.iter_mut() {
                listener(state);
            }
        }
    }

    pub fn world(&self) -> World {
        self.state.world()
    }

    pub fn is_dark(&self) -> bool {
        self.state.is_dark()
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.state.color_scheme()
    }

    pub fn state(&self) -> ThemeState {
        self.state
    }

    /// Registers a change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(ThemeState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of `set_world` calls whose durable write failed.
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// Releases the store and document, e.g. to simulate a reload in tests.
    pub fn into_parts(self) -> (S, D) {
        (self.store, self.document)
    }

    fn reflect(&mut self) {
        self.document
            .set_attribute(ATTR_AESTHETIC, self.state.world().as_str());
        self.document
            .set_attribute(ATTR_THEME, self.state.color_scheme().as_str());
    }
}
