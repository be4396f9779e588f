//! Event fan-out.
//!
//! Components own an [`EventBus`] per event type. Consumers (audio, camera shake, arm IK)
//! subscribe with a closure and keep the returned id to unsubscribe when they go away.

use crate::collision::types::Vec3;
use crate::ledge::LedgeType;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Explicit observer list. Emission order is subscription order.
pub struct EventBus<E> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<E>)>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Fire-and-forget notification. Emitting with no listeners is a no-op.
    pub fn emit(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Footstep and landing sounds, from lightest to heaviest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FootSoundType {
    Walk,
    Run,
    LandEasy,
    LandModerate,
    LandHeavy,
    LandNasty,
}

/// Movement and lifecycle notifications published by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    Jump,
    Land(FootSoundType),
    Ungrounded,
    RunEnter,
    RunExit,
    CrouchEnter,
    CrouchExit,
    LowTransitionEnter,
    LowTransitionExit,
    MidTransitionEnter,
    MidTransitionExit,
    WallHangEntered,
    WallClimbOverTriggered,
    WallHangExited,
}

/// A ledge found by one of the tiered detectors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgeDetection {
    pub ledge_type: LedgeType,
    pub position: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let a = Rc::clone(&seen);
        bus.subscribe(move |e: &ControllerEvent| a.borrow_mut().push((1, *e)));
        let b = Rc::clone(&seen);
        bus.subscribe(move |e: &ControllerEvent| b.borrow_mut().push((2, *e)));

        bus.emit(&ControllerEvent::Jump);
        assert_eq!(
            *seen.borrow(),
            vec![(1, ControllerEvent::Jump), (2, ControllerEvent::Jump)]
        );
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_: &ControllerEvent| *c.borrow_mut() += 1);

        bus.emit(&ControllerEvent::RunEnter);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&ControllerEvent::RunExit);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn emit_without_listeners_is_noop() {
        let mut bus: EventBus<LedgeDetection> = EventBus::new();
        bus.emit(&LedgeDetection {
            ledge_type: LedgeType::Mid,
            position: Vec3::zeros(),
        });
    }
}
