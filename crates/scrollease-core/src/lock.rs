//! L4 Atomic Layer: Scroll lock
//!
//! Suppresses user wheel input on a target while a run owns it. Each target
//! holds at most one blocking listener. The lock remembers which run owns
//! that listener, so a run that starts over a still-animating target takes
//! the listener over instead of attaching a second one, and the superseded
//! run's release becomes a no-op.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::environment::{HostEnvironment, WheelEvent};
use crate::target::{ListenerId, ScrollTarget, TargetKey};
use crate::{Error, Result};

/// Token identifying one run against one target
pub type Generation = u64;

#[derive(Debug, Clone, Copy)]
struct Hold {
    event: WheelEvent,
    listener: ListenerId,
    owner: Generation,
}

/// Per-target wheel suppression, keyed by [`TargetKey`]
#[derive(Debug)]
pub struct ScrollLock {
    environment: HostEnvironment,
    holds: RefCell<HashMap<TargetKey, Hold>>,
}

impl ScrollLock {
    pub fn new(environment: HostEnvironment) -> Self {
        Self {
            environment,
            holds: RefCell::new(HashMap::new()),
        }
    }

    /// Block wheel input on `target` on behalf of run `owner`
    pub fn acquire(&self, target: &ScrollTarget, owner: Generation) -> Result<()> {
        let key = target.key();
        let source = target.wheel_source().ok_or_else(|| {
            Error::InvalidTarget(format!("{target:?} cannot take event listeners"))
        })?;

        let mut holds = self.holds.borrow_mut();
        if let Some(hold) = holds.get_mut(&key) {
            debug!(?key, from = hold.owner, to = owner, "Scroll lock handed over");
            hold.owner = owner;
            return Ok(());
        }

        let event = self.environment.wheel_event();
        let listener = source.block_wheel(event).map_err(|e| match e {
            Error::InvalidTarget(msg) => Error::InvalidTarget(msg),
            other => Error::InvalidTarget(other.to_string()),
        })?;
        holds.insert(key, Hold { event, listener, owner });
        debug!(?key, %event, owner, "Scroll lock acquired");
        Ok(())
    }

    /// Unblock wheel input on `target` if run `owner` still holds it
    ///
    /// Returns whether a listener was removed.
    pub fn release(&self, target: &ScrollTarget, owner: Generation) -> bool {
        let key = target.key();
        let mut holds = self.holds.borrow_mut();
        let hold = match holds.get(&key) {
            Some(hold) if hold.owner == owner => *hold,
            Some(hold) => {
                debug!(?key, owner, holder = hold.owner, "Scroll lock held by a newer run");
                return false;
            }
            None => {
                warn!(?key, owner, "Release without a matching scroll lock");
                return false;
            }
        };
        holds.remove(&key);
        drop(holds);

        if let Some(source) = target.wheel_source() {
            // Same event name as the attach, whatever the environment says now
            source.unblock_wheel(hold.event, hold.listener);
        }
        debug!(?key, event = %hold.event, owner, "Scroll lock released");
        true
    }

    pub fn is_locked(&self, target: &ScrollTarget) -> bool {
        self.holds.borrow().contains_key(&target.key())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::environment::Browser;
    use crate::sim::{SimElement, SimViewport};

    fn element_target() -> (Rc<SimElement>, ScrollTarget) {
        let element = Rc::new(SimElement::new((100.0, 1000.0), (100.0, 400.0)));
        let target = ScrollTarget::element(element.clone()).unwrap();
        (element, target)
    }

    #[test]
    fn test_acquire_and_release_are_balanced() {
        let lock = ScrollLock::new(HostEnvironment::default());
        let (element, target) = element_target();

        lock.acquire(&target, 1).unwrap();
        assert!(lock.is_locked(&target));
        assert_eq!(element.active_listeners(), 1);

        assert!(lock.release(&target, 1));
        assert!(!lock.is_locked(&target));
        assert_eq!(element.listener_log().attached, 1);
        assert_eq!(element.listener_log().detached, 1);
    }

    #[test]
    fn test_uses_environment_event_name() {
        let lock = ScrollLock::new(HostEnvironment::new(Browser::Firefox));
        let (element, target) = element_target();

        lock.acquire(&target, 1).unwrap();
        lock.release(&target, 1);
        assert_eq!(element.listener_log().events, vec![WheelEvent::DomMouseScroll; 2]);
    }

    #[test]
    fn test_target_without_listeners_is_invalid() {
        let lock = ScrollLock::new(HostEnvironment::default());
        let viewport = Rc::new(SimViewport::new((10.0, 10.0), (10.0, 10.0)).without_listeners());
        let target = ScrollTarget::window(viewport);

        let err = lock.acquire(&target, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidTarget(_)));
        assert!(!lock.is_locked(&target));
    }

    #[test]
    fn test_newer_run_takes_over_listener() {
        let lock = ScrollLock::new(HostEnvironment::default());
        let (element, target) = element_target();

        lock.acquire(&target, 1).unwrap();
        lock.acquire(&target, 2).unwrap();
        assert_eq!(element.listener_log().attached, 1);

        assert!(!lock.release(&target, 1));
        assert_eq!(element.active_listeners(), 1);
        assert!(lock.release(&target, 2));
        assert_eq!(element.active_listeners(), 0);
    }

    #[test]
    fn test_double_release_is_harmless() {
        let lock = ScrollLock::new(HostEnvironment::default());
        let (element, target) = element_target();

        lock.acquire(&target, 1).unwrap();
        assert!(lock.release(&target, 1));
        assert!(!lock.release(&target, 1));
        assert_eq!(element.listener_log().detached, 1);
    }
}
