//! Controller events and observers
//!
//! The controller's outward notification surface: two edge-triggered
//! events, delivered to subscribed observers after a tick completes. The
//! core never waits on an observer and is indifferent to how many are
//! subscribed; presentation layers (animation, particles, audio) own
//! their subscription lifecycle through the returned handles.

/// Edge-triggered notifications emitted by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerEvent {
    /// A jump impulse was applied this tick.
    Jumped,
    /// The ground contact state flipped. On landing, `impact_speed`
    /// carries the magnitude of the vertical speed at the moment of
    /// contact (raw, unscaled); on leaving the ground it is zero.
    GroundedChanged { grounded: bool, impact_speed: f32 },
}

/// Receives controller events. All methods default to no-ops so observers
/// implement only what they react to.
pub trait ControllerObserver {
    /// A jump impulse was applied this tick.
    fn on_jumped(&mut self) {}

    /// The ground contact state flipped.
    fn on_grounded_changed(&mut self, grounded: bool, impact_speed: f32) {
        let _ = (grounded, impact_speed);
    }
}

/// Identifies one subscription, for later unsubscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

/// The controller's observer registry.
#[derive(Default)]
pub(crate) struct ObserverSet {
    observers: Vec<(ObserverHandle, Box<dyn ControllerObserver>)>,
    next_id: u64,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer and return its handle.
    pub fn subscribe(&mut self, observer: Box<dyn ControllerObserver>) -> ObserverHandle {
        let handle = ObserverHandle(self.next_id);
        self.next_id += 1;
        self.observers.push((handle, observer));
        handle
    }

    /// Remove an observer, returning it to the caller. `None` if the
    /// handle was never subscribed or already removed.
    pub fn unsubscribe(&mut self, handle: ObserverHandle) -> Option<Box<dyn ControllerObserver>> {
        let index = self.observers.iter().position(|(h, _)| *h == handle)?;
        Some(self.observers.remove(index).1)
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Deliver a batch of events to every observer, in subscription order.
    pub fn dispatch(&mut self, events: &[ControllerEvent]) {
        for (_, observer) in &mut self.observers {
            for event in events {
                match *event {
                    ControllerEvent::Jumped => observer.on_jumped(),
                    ControllerEvent::GroundedChanged {
                        grounded,
                        impact_speed,
                    } => observer.on_grounded_changed(grounded, impact_speed),
                }
            }
        }
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers_len", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
