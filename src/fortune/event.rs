//! Priority queue of pending sweep events

use std::cmp::Ordering;
use std::collections::BTreeMap;

use glam::DVec2;

use super::beachline::ArcKey;

/// Something that happens when the sweep line reaches a coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A new site enters the beachline
    Site {
        /// Index into the diagram's sites
        site: usize,
    },
    /// An arc shrinks to nothing at `vertex`
    Circle {
        /// The arc that disappears
        arc: ArcKey,
        /// Center of the circle through the three foci
        vertex: DVec2,
    },
}

/// Position of an event in the queue
///
/// Keys order by descending `y`, then ascending `x`, then insertion order, so
/// the smallest key is always the next event the sweep line meets.
#[derive(Debug, Clone, Copy)]
pub struct EventKey {
    y: f64,
    x: f64,
    seq: u64,
}

impl EventKey {
    /// Sweep coordinate at which the event fires
    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventKey {}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .y
            .total_cmp(&self.y)
            .then_with(|| self.x.total_cmp(&other.x))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Ordered multiset of events with removal by key
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: BTreeMap<EventKey, Event>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event firing at sweep coordinate `y`
    pub fn insert(&mut self, y: f64, x: f64, event: Event) -> EventKey {
        let key = EventKey {
            y,
            x,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.events.insert(key, event);
        key
    }

    /// Queue the site event for `sites[site]`
    pub fn insert_site(&mut self, site: usize, position: DVec2) -> EventKey {
        self.insert(position.y, position.x, Event::Site { site })
    }

    /// Remove and return the next event
    pub fn pop(&mut self) -> Option<(EventKey, Event)> {
        self.events.pop_first()
    }

    /// Key of the next event without removing it
    pub fn peek(&self) -> Option<&EventKey> {
        self.events.keys().next()
    }

    /// Drop a queued event, typically a circle event that became stale
    pub fn remove(&mut self, key: &EventKey) -> Option<Event> {
        self.events.remove(key)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.next_seq = 0;
    }
}
