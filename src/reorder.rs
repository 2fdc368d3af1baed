// ↕️ Reorder Engine - drag gestures and rank entry
//
// Both state machines are toolkit independent: the UI feeds them pointer
// positions, row bounds and keystrokes, they mutate a PriorityList.

use crate::priority_list::{parse_rank, PriorityList};
use std::time::{Duration, Instant};
use tracing::debug;

/// Pointer-move handling runs at most once per window
pub const DRAG_THROTTLE: Duration = Duration::from_millis(50);

// ============================================================================
// GEOMETRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSide {
    Before,
    After,
}

/// Vertical extent of a rendered row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub top: f64,
    pub height: f64,
}

impl RowBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Above the midpoint inserts before, at or below inserts after
    pub fn side_for(&self, pointer_y: f64) -> DropSide {
        if pointer_y < self.midpoint() {
            DropSide::Before
        } else {
            DropSide::After
        }
    }
}

// ============================================================================
// THROTTLE
// ============================================================================

/// Leading-edge throttle: the first call in a window runs, the rest are dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_run: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
        }
    }

    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last_run {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_run = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_run = None;
    }
}

// ============================================================================
// DRAG GESTURE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragGesture {
    Idle,
    Dragging { id: String },
    Dropped { id: String },
}

#[derive(Debug, Clone)]
pub struct DragController {
    gesture: DragGesture,
    throttle: Throttle,
    /// Set once a hover relocated the dragged row
    moved: bool,
}

impl DragController {
    pub fn new() -> Self {
        Self::with_interval(DRAG_THROTTLE)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            gesture: DragGesture::Idle,
            throttle: Throttle::new(interval),
            moved: false,
        }
    }

    pub fn gesture(&self) -> &DragGesture {
        &self.gesture
    }

    /// Id of the row being dragged, if a drag is in progress
    pub fn dragged_id(&self) -> Option<&str> {
        match &self.gesture {
            DragGesture::Dragging { id } => Some(id),
            _ => None,
        }
    }

    /// Idle → Dragging. A new press while dragging restarts the gesture.
    pub fn begin(&mut self, id: impl Into<String>) {
        let id = id.into();
        debug!(%id, "drag started");
        self.throttle.reset();
        self.moved = false;
        self.gesture = DragGesture::Dragging { id };
    }

    /// Whether the current or just-dropped gesture changed the order.
    /// A press and release without movement is a plain click.
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Pointer moved over `target`. Relocates the dragged row next to it when
    /// the throttle allows. Returns whether the list changed.
    pub fn hover(
        &mut self,
        list: &mut PriorityList,
        target: &str,
        bounds: RowBounds,
        pointer_y: f64,
        now: Instant,
    ) -> bool {
        let DragGesture::Dragging { id } = &self.gesture else {
            return false;
        };
        if id == target || !self.throttle.ready(now) {
            return false;
        }

        let changed = list.place_relative(id, target, bounds.side_for(pointer_y));
        self.moved |= changed;
        changed
    }

    /// Dragging → Dropped. Returns the dropped id.
    pub fn drop_row(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.gesture, DragGesture::Idle) {
            DragGesture::Dragging { id } => {
                debug!(%id, "drag dropped");
                self.gesture = DragGesture::Dropped { id: id.clone() };
                Some(id)
            }
            other => {
                self.gesture = other;
                None
            }
        }
    }

    /// Dropped → Idle
    pub fn finish(&mut self) {
        if matches!(self.gesture, DragGesture::Dropped { .. }) {
            self.gesture = DragGesture::Idle;
            self.moved = false;
        }
    }

    pub fn cancel(&mut self) {
        self.gesture = DragGesture::Idle;
        self.moved = false;
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RANK ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankEdit {
    Idle,
    Editing { row: usize, buffer: String },
}

/// Result of a committed rank edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankCommit {
    /// Row relocated; new 0-based index
    Moved { to: usize },
    /// Out of range, unparsable, or same position
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct RankEditor {
    state: RankEdit,
}

impl RankEditor {
    pub fn new() -> Self {
        Self {
            state: RankEdit::Idle,
        }
    }

    pub fn state(&self) -> &RankEdit {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, RankEdit::Editing { .. })
    }

    /// Start editing `row`, pre-filled with its current rank
    pub fn begin(&mut self, row: usize) {
        self.state = RankEdit::Editing {
            row,
            buffer: (row + 1).to_string(),
        };
    }

    /// Keystrokes only touch the buffer; nothing moves until commit
    pub fn push(&mut self, c: char) {
        if let RankEdit::Editing { buffer, .. } = &mut self.state {
            if c.is_ascii_digit() || (c == '-' && buffer.is_empty()) {
                buffer.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let RankEdit::Editing { buffer, .. } = &mut self.state {
            buffer.pop();
        }
    }

    pub fn clear(&mut self) {
        if let RankEdit::Editing { buffer, .. } = &mut self.state {
            buffer.clear();
        }
    }

    /// Editing → Idle, applying the typed rank to `list`
    pub fn commit(&mut self, list: &mut PriorityList) -> RankCommit {
        let RankEdit::Editing { row, buffer } = std::mem::replace(&mut self.state, RankEdit::Idle)
        else {
            return RankCommit::Unchanged;
        };

        match parse_rank(&buffer) {
            Some(rank) if list.move_to_rank(row, rank) => {
                let to = (rank - 1) as usize;
                debug!(row, to, "rank committed");
                RankCommit::Moved { to }
            }
            _ => RankCommit::Unchanged,
        }
    }

    /// Editing → Idle, discarding the buffer
    pub fn cancel(&mut self) {
        self.state = RankEdit::Idle;
    }
}

impl Default for RankEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogEntry};

    fn list_of(n: usize) -> (Catalog, PriorityList) {
        let catalog = Catalog::from_entries(
            (1..=n).map(|i| CatalogEntry::new(i.to_string(), format!("Mon {}", i))),
        );
        let list = PriorityList::from_catalog(&catalog);
        (catalog, list)
    }

    #[test]
    fn test_side_for_midpoint() {
        let bounds = RowBounds::new(10.0, 2.0);

        assert_eq!(bounds.side_for(10.0), DropSide::Before);
        assert_eq!(bounds.side_for(10.99), DropSide::Before);
        assert_eq!(bounds.side_for(11.0), DropSide::After);
        assert_eq!(bounds.side_for(11.5), DropSide::After);
    }

    #[test]
    fn test_throttle_drops_calls_inside_window() {
        let mut throttle = Throttle::new(Duration::from_millis(50));
        let start = Instant::now();

        assert!(throttle.ready(start));
        assert!(!throttle.ready(start + Duration::from_millis(10)));
        assert!(!throttle.ready(start + Duration::from_millis(49)));
        assert!(throttle.ready(start + Duration::from_millis(50)));
        assert!(!throttle.ready(start + Duration::from_millis(60)));
    }

    #[test]
    fn test_drag_gesture_lifecycle() {
        let (_, mut list) = list_of(4);
        let mut drag = DragController::new();
        let now = Instant::now();

        // Moves before a press are ignored
        assert!(!drag.hover(&mut list, "3", RowBounds::new(4.0, 2.0), 5.5, now));

        drag.begin("1");
        assert_eq!(drag.dragged_id(), Some("1"));

        // Lower half of row "3" → after it
        assert!(drag.hover(&mut list, "3", RowBounds::new(4.0, 2.0), 5.5, now));
        assert_eq!(list.serialize(), "2\n3\n1\n4");

        // Inside the throttle window nothing happens
        assert!(!drag.hover(
            &mut list,
            "4",
            RowBounds::new(6.0, 2.0),
            7.5,
            now + Duration::from_millis(20)
        ));
        assert_eq!(list.serialize(), "2\n3\n1\n4");

        // Upper half of row "2" → before it
        assert!(drag.hover(
            &mut list,
            "2",
            RowBounds::new(0.0, 2.0),
            0.5,
            now + Duration::from_millis(70)
        ));
        assert_eq!(list.serialize(), "1\n2\n3\n4");

        assert_eq!(drag.drop_row(), Some("1".to_string()));
        assert_eq!(drag.gesture(), &DragGesture::Dropped { id: "1".to_string() });
        assert!(drag.moved());
        drag.finish();
        assert!(!drag.moved());
        assert_eq!(drag.gesture(), &DragGesture::Idle);
        assert_eq!(drag.drop_row(), None);
    }

    #[test]
    fn test_hover_over_dragged_row_is_noop() {
        let (_, mut list) = list_of(3);
        let mut drag = DragController::new();

        drag.begin("2");
        assert!(!drag.hover(&mut list, "2", RowBounds::new(2.0, 2.0), 3.5, Instant::now()));
        assert_eq!(list.serialize(), "1\n2\n3");
        assert!(!drag.moved());
    }

    #[test]
    fn test_rank_editor_commit() {
        let (_, mut list) = list_of(5);
        let mut editor = RankEditor::new();

        editor.begin(0);
        assert_eq!(
            editor.state(),
            &RankEdit::Editing { row: 0, buffer: "1".to_string() }
        );
        editor.clear();
        editor.push('4');
        editor.push('x');

        assert_eq!(editor.commit(&mut list), RankCommit::Moved { to: 3 });
        assert_eq!(list.serialize(), "2\n3\n4\n1\n5");
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_rank_editor_out_of_range_and_cancel() {
        let (_, mut list) = list_of(3);
        let mut editor = RankEditor::new();

        editor.begin(1);
        editor.clear();
        editor.push('9');
        assert_eq!(editor.commit(&mut list), RankCommit::Unchanged);

        editor.begin(1);
        editor.clear();
        editor.push('0');
        assert_eq!(editor.commit(&mut list), RankCommit::Unchanged);

        editor.begin(1);
        editor.clear();
        editor.push('1');
        editor.cancel();
        assert_eq!(editor.commit(&mut list), RankCommit::Unchanged);

        assert_eq!(list.serialize(), "1\n2\n3");
    }
}
