use crate::event::{EnrichedEvent, ServerLocation};
use rand::Rng;
use std::collections::VecDeque;
use std::ops::Range;

const ARC_ALTITUDE: Range<f64> = 0.1..0.5;

/// Arc colour, chosen from the request outcome and method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcColor {
    /// status >= 400
    Error,
    Post,
    Get,
    Other,
}

impl ArcColor {
    pub fn for_event(event: &EnrichedEvent) -> Self {
        if event.raw.status_code.is_some_and(|s| s >= 400) {
            return ArcColor::Error;
        }

        match event.raw.method.as_str() {
            "POST" => ArcColor::Post,
            "GET" => ArcColor::Get,
            _ => ArcColor::Other,
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ArcColor::Error => "#FF4136",
            ArcColor::Post => "#FFDC00",
            ArcColor::Get => "#62DAFF",
            ArcColor::Other => "#01FF70",
        }
    }
}

/// From the event's location to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub color: ArcColor,
    pub altitude: f64,
}

/// Ring pulse drawn at the event's location.
#[derive(Debug, Clone, PartialEq)]
pub struct RingPoint {
    pub lat: f64,
    pub lng: f64,
    pub color: ArcColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
    pub event: EnrichedEvent,
    pub arc: ArcSegment,
    pub ring: RingPoint,
}

impl DisplayEntry {
    pub fn new<R: Rng>(event: EnrichedEvent, server: &ServerLocation, rng: &mut R) -> Self {
        let color = ArcColor::for_event(&event);
        let (lat, lng) = (event.location.latitude, event.location.longitude);

        Self {
            arc: ArcSegment {
                start_lat: lat,
                start_lng: lng,
                end_lat: server.latitude,
                end_lng: server.longitude,
                color,
                altitude: rng.random_range(ARC_ALTITUDE),
            },
            ring: RingPoint { lat, lng, color },
            event,
        }
    }
}

/// What is currently drawn, oldest first. Same eviction rule as the server
/// history: once full, each push evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct DisplaySet {
    entries: VecDeque<DisplayEntry>,
    capacity: usize,
}

impl DisplaySet {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: DisplayEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
