/// Undo/redo over whole-value snapshots.
///
/// The entry list is never empty and `cursor` always indexes into it. Growth is
/// unbounded; there is no eviction.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    cursor: usize,
}

impl<T> History<T> {
    /// Creates a history holding a single entry
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// The snapshot the cursor points at
    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    /// Record a new state, discarding anything that could have been redone
    pub fn set(&mut self, state: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(state);
        self.cursor = self.entries.len() - 1;
    }

    /// Replace the current entry in place. Used to fold the frames of one
    /// gesture into a single undo step.
    pub fn amend(&mut self, state: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries[self.cursor] = state;
    }

    /// Step back one entry; a no-op at the oldest entry
    pub fn undo(&mut self) -> &T {
        if self.can_undo() {
            self.cursor -= 1;
        }
        self.current()
    }

    /// Step forward one entry; a no-op at the newest entry
    pub fn redo(&mut self) -> &T {
        if self.can_redo() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Drop every entry and start over from `state`
    pub fn reset(&mut self, state: T) {
        self.entries.clear();
        self.entries.push(state);
        self.cursor = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of stored snapshots (always at least one)
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<T: Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(states: &[i32]) -> History<i32> {
        let mut history = History::new(0);
        for state in states {
            history.set(*state);
        }
        history
    }

    #[test]
    fn test_undo_walks_back_through_sets() {
        let sets = [1, 2, 3, 4];
        for n in 0..=sets.len() {
            let mut history = history_with(&sets);
            for _ in 0..n {
                history.undo();
            }
            let expected = if n == sets.len() { 0 } else { sets[sets.len() - n - 1] };
            assert_eq!(*history.current(), expected, "after {n} undos");
        }
    }

    #[test]
    fn test_undo_then_redo_restores_state() {
        let mut history = history_with(&[1, 2]);
        history.undo();
        assert_eq!(*history.redo(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_set_after_undo_discards_redo() {
        let mut history = history_with(&[1, 2, 3]);
        history.undo();
        history.undo();
        history.set(9);
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(*history.redo(), 9);
        assert_eq!(*history.undo(), 1);
    }

    #[test]
    fn test_bounds_are_no_ops() {
        let mut history = History::new("a");
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(*history.undo(), "a");
        assert_eq!(*history.redo(), "a");
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut history = history_with(&[1, 2, 3]);
        history.undo();
        history.reset(42);
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current(), 42);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_amend_replaces_current_entry() {
        let mut history = history_with(&[1]);
        history.set(2);
        history.amend(3);
        history.amend(4);
        assert_eq!(history.len(), 3);
        assert_eq!(*history.current(), 4);
        assert_eq!(*history.undo(), 1);
    }
}
