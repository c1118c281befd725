//! Dungeon events and the observer list that delivers them
//!
//! Events are plain values. Observers are called synchronously, in
//! subscription order, from whoever emits.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::dungeon::{DungeonMapIndex, Pos, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DungeonEvent {
    /// A room of a freshly committed dungeon can be populated
    RoomReady(RoomId),
    /// A tracked actor moved into another room (`None` = left all rooms)
    RoomEntered(Option<RoomId>),
}

/// Handle returned by [`EventHub::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

type Observer = Box<dyn FnMut(&DungeonEvent)>;

/// Explicit observer list
#[derive(Default)]
pub struct EventHub {
    observers: Vec<(ObserverId, Observer)>,
    next_id: u32,
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&DungeonEvent) + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the observer was already gone
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub fn emit(&mut self, event: DungeonEvent) {
        trace!(?event, observers = self.observers.len(), "emit");
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

/// Follows one actor and reports room changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomTracker {
    current: Option<RoomId>,
}

impl RoomTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<RoomId> {
        self.current
    }

    /// Record the actor at `pos`. Returns `RoomEntered` if its room changed.
    pub fn update(&mut self, index: &DungeonMapIndex, pos: Pos) -> Option<DungeonEvent> {
        let room = index.room_at(pos);
        if room == self.current {
            return None;
        }
        self.current = room;
        Some(DungeonEvent::RoomEntered(room))
    }

    /// Like [`update`](Self::update), delivering the event through `hub`
    pub fn observe(&mut self, index: &DungeonMapIndex, pos: Pos, hub: &mut EventHub) {
        if let Some(event) = self.update(index, pos) {
            hub.emit(event);
        }
    }

    /// Forget the current room, e.g. after a rebuild
    pub fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{CellKind, Dir, FloorKind, Grid, Rect, Room};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn index() -> DungeonMapIndex {
        let mut grid = Grid::new(20, 10);
        let a = Rect::new(1, 1, 5, 5);
        let b = Rect::new(10, 1, 14, 5);
        grid.carve_room(&a, CellKind::Floor(FloorKind::Stone));
        grid.carve_room(&b, CellKind::Floor(FloorKind::Stone));
        let mut rooms = vec![
            Room::new(RoomId(0), a, None, Dir::Down, 1, FloorKind::Stone),
            Room::new(RoomId(1), b, Some(RoomId(0)), Dir::Right, 2, FloorKind::Stone),
        ];
        for room in &mut rooms {
            room.rebuild_info(&mut grid, 2);
        }
        DungeonMapIndex::build(&grid, &rooms)
    }

    #[test]
    fn test_observers_receive_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hub = EventHub::new();
        let first = Rc::clone(&log);
        hub.subscribe(move |e| first.borrow_mut().push((1, *e)));
        let second = Rc::clone(&log);
        hub.subscribe(move |e| second.borrow_mut().push((2, *e)));

        hub.emit(DungeonEvent::RoomReady(RoomId(3)));
        assert_eq!(
            *log.borrow(),
            vec![
                (1, DungeonEvent::RoomReady(RoomId(3))),
                (2, DungeonEvent::RoomReady(RoomId(3)))
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut hub = EventHub::new();
        let c = Rc::clone(&count);
        let id = hub.subscribe(move |_| *c.borrow_mut() += 1);

        hub.emit(DungeonEvent::RoomEntered(None));
        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        hub.emit(DungeonEvent::RoomEntered(None));
        assert_eq!(*count.borrow(), 1);
        assert!(hub.is_empty());
    }

    #[test]
    fn test_tracker_reports_changes_only() {
        let index = index();
        let mut tracker = RoomTracker::new();

        assert_eq!(tracker.update(&index, Pos::new(7, 3)), None);
        assert_eq!(
            tracker.update(&index, Pos::new(2, 2)),
            Some(DungeonEvent::RoomEntered(Some(RoomId(0))))
        );
        assert_eq!(tracker.update(&index, Pos::new(3, 2)), None);
        assert_eq!(
            tracker.update(&index, Pos::new(11, 2)),
            Some(DungeonEvent::RoomEntered(Some(RoomId(1))))
        );
        assert_eq!(
            tracker.update(&index, Pos::new(7, 3)),
            Some(DungeonEvent::RoomEntered(None))
        );
    }

    #[test]
    fn test_tracker_emits_through_hub() {
        let index = index();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hub = EventHub::new();
        let s = Rc::clone(&seen);
        hub.subscribe(move |e| s.borrow_mut().push(*e));

        let mut tracker = RoomTracker::new();
        tracker.observe(&index, Pos::new(2, 2), &mut hub);
        tracker.observe(&index, Pos::new(2, 3), &mut hub);
        tracker.observe(&index, Pos::new(12, 3), &mut hub);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(tracker.current(), Some(RoomId(1)));
    }
}
