//! Input Dispatch
//!
//! Fans platform input out to rig components. Subscribers are identified by a
//! [`ListenerId`] handle and pick the channels they care about; events are queued
//! per subscriber and handed over by [`InputDispatcher::drain`].
//!
//! Removing a subscriber drops its queue immediately. Publishing only ever reaches
//! live handles, so nothing has to track whether a listener still exists.
//!
//! Subscribers are expected to drain once per frame. A queue left undrained holds
//! at most [`MAX_QUEUED_EVENTS`]; past that the oldest events are dropped.

use std::collections::{BTreeMap, VecDeque};

use glam::Vec2;
use tracing::debug;

/// Pending events kept per subscriber before the oldest are dropped
pub const MAX_QUEUED_EVENTS: usize = 256;

/// Stable handle of one subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Groups of events a subscriber can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputChannel {
    /// `Move` and `Run`
    Movement,
    /// `Rotate`
    Camera,
}

/// Input delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Movement axes, x = strafe right, y = forward
    Move(Vec2),
    /// Run modifier held or released
    Run(bool),
    /// Look delta (mouse or right stick)
    Rotate(Vec2),
}

impl InputEvent {
    pub fn channel(&self) -> InputChannel {
        match self {
            InputEvent::Move(_) | InputEvent::Run(_) => InputChannel::Movement,
            InputEvent::Rotate(_) => InputChannel::Camera,
        }
    }
}

#[derive(Debug, Default)]
struct Subscriber {
    movement: bool,
    camera: bool,
    queue: VecDeque<InputEvent>,
}

impl Subscriber {
    fn wants(&self, channel: InputChannel) -> bool {
        match channel {
            InputChannel::Movement => self.movement,
            InputChannel::Camera => self.camera,
        }
    }
}

/// Channel-filtered event queues keyed by listener handle.
#[derive(Debug)]
pub struct InputDispatcher {
    subscribers: BTreeMap<ListenerId, Subscriber>,
    next_id: u64,
    enabled: bool,
    movement_input: Vec2,
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: BTreeMap::new(),
            next_id: 0,
            enabled: true,
            movement_input: Vec2::ZERO,
        }
    }

    /// Register a subscriber for `channels` and return its handle.
    pub fn subscribe(&mut self, channels: &[InputChannel]) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(
            id,
            Subscriber {
                movement: channels.contains(&InputChannel::Movement),
                camera: channels.contains(&InputChannel::Camera),
                queue: VecDeque::new(),
            },
        );
        debug!(?id, ?channels, "input listener subscribed");
        id
    }

    /// Remove a subscriber and its pending events. Returns false for unknown handles.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            debug!(?id, "input listener unsubscribed");
        }
        removed
    }

    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.subscribers.contains_key(&id)
    }

    pub fn listener_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Queue `event` for every subscriber of its channel.
    ///
    /// Returns how many subscribers received it. Disabled dispatchers drop events.
    pub fn publish(&mut self, event: InputEvent) -> usize {
        if !self.enabled {
            return 0;
        }
        if let InputEvent::Move(input) = event {
            self.movement_input = input;
        }

        let channel = event.channel();
        let mut delivered = 0;
        for (id, subscriber) in self.subscribers.iter_mut() {
            if subscriber.wants(channel) {
                if subscriber.queue.len() >= MAX_QUEUED_EVENTS {
                    subscriber.queue.pop_front();
                    debug!(?id, "input queue full, dropped oldest event");
                }
                subscriber.queue.push_back(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Take all pending events of `id` in publish order. Unknown handles get none.
    pub fn drain(&mut self, id: ListenerId) -> Vec<InputEvent> {
        self.subscribers
            .get_mut(&id)
            .map(|subscriber| subscriber.queue.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stop delivering events and clear anything pending.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.movement_input = Vec2::ZERO;
        for subscriber in self.subscribers.values_mut() {
            subscriber.queue.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last published movement axes.
    pub fn movement_input(&self) -> Vec2 {
        self.movement_input
    }
}

/// Movement axes from four digital direction keys, normalized on diagonals.
pub fn axes_from_keys(forward: bool, backward: bool, left: bool, right: bool) -> Vec2 {
    let axis = |positive: bool, negative: bool| match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    };
    Vec2::new(axis(right, left), axis(forward, backward)).normalize_or_zero()
}
