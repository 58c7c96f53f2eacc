//! Suspension of host pan/zoom while a drawing gesture is in progress.

use std::sync::Arc;

use parking_lot::Mutex;

/// Host callback receiving `true` when navigation may resume, `false` when it must stop.
pub type NavigationHook = Box<dyn FnMut(bool) + Send>;

struct LockState {
    held: bool,
    acquisitions: u64,
    releases: u64,
}

struct Inner {
    state: Mutex<LockState>,
    /// Called after `state` is unlocked, so a hook may query the lock.
    hook: Mutex<Option<NavigationHook>>,
}

/// Process-wide navigation flag with explicit acquire/release.
///
/// Acquiring returns a [`NavigationGuard`]; dropping the guard is the only way to
/// release, so every exit path of a gesture (commit, cancel, tool switch, teardown,
/// unwinding) restores navigation.
#[derive(Clone)]
pub struct NavigationLock {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for NavigationLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("NavigationLock")
            .field("held", &state.held)
            .field("acquisitions", &state.acquisitions)
            .field("releases", &state.releases)
            .finish_non_exhaustive()
    }
}

impl Default for NavigationLock {
    fn default() -> Self {
        Self::new(None)
    }
}

impl NavigationLock {
    pub fn new(hook: Option<NavigationHook>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(LockState {
                    held: false,
                    acquisitions: 0,
                    releases: 0,
                }),
                hook: Mutex::new(hook),
            }),
        }
    }

    /// `None` if the lock is already held.
    pub fn acquire(&self) -> Option<NavigationGuard> {
        {
            let mut state = self.inner.state.lock();
            if state.held {
                log::warn!("Navigation lock already held");
                return None;
            }
            state.held = true;
            state.acquisitions += 1;
        }
        self.notify(false);
        Some(NavigationGuard { lock: self.clone() })
    }

    pub fn is_held(&self) -> bool {
        self.inner.state.lock().held
    }

    pub fn acquisitions(&self) -> u64 {
        self.inner.state.lock().acquisitions
    }

    pub fn releases(&self) -> u64 {
        self.inner.state.lock().releases
    }

    fn release(&self) {
        {
            let mut state = self.inner.state.lock();
            if !state.held {
                return;
            }
            state.held = false;
            state.releases += 1;
        }
        self.notify(true);
    }

    fn notify(&self, enabled: bool) {
        if let Some(hook) = self.inner.hook.lock().as_mut() {
            hook(enabled);
        }
    }
}

/// Held for the duration of one gesture.
#[must_use = "navigation is restored as soon as the guard is dropped"]
pub struct NavigationGuard {
    lock: NavigationLock,
}

impl std::fmt::Debug for NavigationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NavigationGuard")
    }
}

impl Drop for NavigationGuard {
    fn drop(&mut self) {
        self.lock.release();
    }
}
