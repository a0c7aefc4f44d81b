use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub const fn bottom(px: f64) -> Self {
        Self {
            top: 0.0,
            right: 0.0,
            bottom: px,
            left: 0.0,
        }
    }

    /// CSS margin shorthand in the order the observer expects.
    pub fn to_css(self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl RevealOptions {
    pub fn new(threshold: f64, root_margin: RootMargin) -> Self {
        let threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };

        Self {
            threshold,
            root_margin,
        }
    }
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self::new(0.0, RootMargin::default())
    }
}

/// One notification from the browser for a single element.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection<K> {
    pub key: K,
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl<K> Intersection<K> {
    fn reaches(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

pub trait ObserverBackend<K> {
    fn observe(&mut self, key: &K);
    fn unobserve(&mut self, key: &K);
}

type Effect<K> = Box<dyn FnOnce(&K)>;

/// Binds one-shot visual effects to element visibility.
///
/// The registry owns a single pending effect per element. An entry is
/// removed and the element unobserved before its effect runs, so a later
/// notification for the same element finds nothing to fire.
pub struct VisibilityCoordinator<K, B> {
    options: RevealOptions,
    backend: B,
    registry: HashMap<K, Effect<K>>,
}

impl<K, B> VisibilityCoordinator<K, B>
where
    K: Clone + Eq + Hash,
    B: ObserverBackend<K>,
{
    pub fn new(options: RevealOptions, backend: B) -> Self {
        Self {
            options,
            backend,
            registry: HashMap::new(),
        }
    }

    /// Prepares each element with `initial`, then observes it. Returns how
    /// many new registrations were made; an element that is already pending
    /// keeps its first effect.
    pub fn register<I, P, F>(&mut self, elements: I, mut initial: P, effect: F) -> usize
    where
        I: IntoIterator<Item = K>,
        P: FnMut(&K),
        F: Fn(&K) + Clone + 'static,
    {
        let mut added = 0;

        for key in elements {
            if self.registry.contains_key(&key) {
                continue;
            }

            initial(&key);
            self.backend.observe(&key);
            self.registry.insert(key, Box::new(effect.clone()));
            added += 1;
        }

        added
    }

    /// Fires every pending effect whose element reached the threshold in
    /// this batch. Returns the keys that fired.
    pub fn handle_batch<I>(&mut self, entries: I) -> Vec<K>
    where
        I: IntoIterator<Item = Intersection<K>>,
    {
        let mut fired = Vec::new();

        for entry in entries {
            if !entry.reaches(self.options.threshold) {
                continue;
            }

            let Some(effect) = self.registry.remove(&entry.key) else {
                continue;
            };

            self.backend.unobserve(&entry.key);
            effect(&entry.key);
            fired.push(entry.key);
        }

        fired
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.registry.contains_key(key)
    }

    pub fn pending(&self) -> usize {
        self.registry.len()
    }

    /// Drops every pending effect without running it.
    pub fn disconnect(&mut self) {
        for (key, _) in self.registry.drain() {
            self.backend.unobserve(&key);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
