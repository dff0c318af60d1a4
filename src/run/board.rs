use crate::item::{ItemRecord, ItemStatus};
use indexmap::IndexMap;
use serde::Serialize;

/// One row of the board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardRow {
    pub record: ItemRecord,
    pub checked: bool,
    /// Hidden by the current filter
    pub filtered_out: bool,
    pub status: ItemStatus,
}

impl BoardRow {
    fn new(record: ItemRecord) -> Self {
        Self { record, checked: true, filtered_out: false, status: ItemStatus::Pending }
    }

    pub fn is_visible(&self) -> bool {
        !self.filtered_out
    }

    /// Would be picked up by the next run
    pub fn is_selectable(&self) -> bool {
        self.checked && self.is_visible() && self.status.is_selectable()
    }
}

/// Number of rows per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub done: usize,
    pub failed: usize,
    pub interrupted: usize,
}

/// Scanned items with their selection and status, keyed by original position.
/// Uses IndexMap to keep scan order.
#[derive(Debug, Clone, Default)]
pub struct ItemBoard {
    rows: IndexMap<usize, BoardRow>,
    filter: String,
}

impl ItemBoard {
    pub fn new(records: impl IntoIterator<Item = ItemRecord>) -> Self {
        let rows = records
            .into_iter()
            .map(|record| (record.original_position(), BoardRow::new(record)))
            .collect();
        Self { rows, filter: String::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row by original position
    pub fn get(&self, position: usize) -> Option<&BoardRow> {
        self.rows.get(&position)
    }

    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.values()
    }

    pub fn status(&self, position: usize) -> Option<ItemStatus> {
        self.rows.get(&position).map(|row| row.status)
    }

    /// Current filter term
    pub fn filter_term(&self) -> &str {
        &self.filter
    }

    /// Hide rows whose title does not contain `term` (case-insensitive).
    /// An empty term shows every row.
    pub fn filter(&mut self, term: &str) {
        let needle = term.trim().to_lowercase();
        for row in self.rows.values_mut() {
            row.filtered_out = !needle.is_empty() && !row.record.title().to_lowercase().contains(&needle);
        }
        self.filter = term.trim().to_string();
    }

    /// Check or uncheck every visible row
    pub fn set_all_visible(&mut self, checked: bool) {
        for row in self.rows.values_mut().filter(|row| row.is_visible()) {
            row.checked = checked;
        }
    }

    /// Check or uncheck one row. Returns false for an unknown position.
    pub fn set_checked(&mut self, position: usize, checked: bool) -> bool {
        match self.rows.get_mut(&position) {
            Some(row) => {
                row.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Check exactly the given positions and uncheck everything else
    pub fn select_only(&mut self, positions: &[usize]) {
        for (position, row) in self.rows.iter_mut() {
            row.checked = positions.contains(position);
        }
        for position in positions.iter().filter(|p| !self.rows.contains_key(*p)) {
            log::warn!("No scanned item at position {}", position);
        }
    }

    /// Mark every row still processing as interrupted and return their positions
    pub(crate) fn interrupt_in_flight(&mut self) -> Vec<usize> {
        let mut positions = Vec::new();
        for (position, row) in self.rows.iter_mut() {
            if row.status == ItemStatus::Processing {
                row.status = ItemStatus::Interrupted;
                positions.push(*position);
            }
        }
        positions
    }

    /// Records a run would process: checked, visible and not done
    pub fn selectable(&self) -> Vec<&ItemRecord> {
        self.rows.values().filter(|row| row.is_selectable()).map(|row| &row.record).collect()
    }

    pub(crate) fn set_status(&mut self, position: usize, status: ItemStatus) {
        if let Some(row) = self.rows.get_mut(&position) {
            row.status = status;
        }
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for row in self.rows.values() {
            match row.status {
                ItemStatus::Pending => counts.pending += 1,
                ItemStatus::Processing => counts.processing += 1,
                ItemStatus::Done => counts.done += 1,
                ItemStatus::Failed => counts.failed += 1,
                ItemStatus::Interrupted => counts.interrupted += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeHandle;

    fn board() -> ItemBoard {
        let titles = ["Rust in 100 seconds", "Async Rust", "Cooking pasta", "RUSTLING leaves"];
        ItemBoard::new(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| ItemRecord::new(*t, "1:00", "today", NodeHandle::new(i as u64), i)),
        )
    }

    fn positions(records: Vec<&ItemRecord>) -> Vec<usize> {
        records.into_iter().map(|r| r.original_position()).collect()
    }

    #[test]
    fn test_rows_start_checked_and_pending() {
        let board = board();
        assert_eq!(board.len(), 4);
        assert!(board.rows().all(|row| row.checked && row.status == ItemStatus::Pending));
        assert_eq!(positions(board.selectable()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut board = board();
        board.filter("rust");
        assert_eq!(positions(board.selectable()), vec![0, 1, 3]);
        assert!(board.get(2).unwrap().filtered_out);

        board.filter("");
        assert_eq!(positions(board.selectable()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_select_all_only_touches_visible_rows() {
        let mut board = board();
        board.set_all_visible(false);
        board.filter("pasta");
        board.set_all_visible(true);
        board.filter("");

        assert_eq!(positions(board.selectable()), vec![2]);
    }

    #[test]
    fn test_select_only() {
        let mut board = board();
        board.select_only(&[3, 1, 42]);
        assert_eq!(positions(board.selectable()), vec![1, 3]);
        assert!(!board.set_checked(42, true));
        assert!(board.set_checked(0, true));
        assert_eq!(positions(board.selectable()), vec![0, 1, 3]);
    }

    #[test]
    fn test_done_rows_are_never_selectable() {
        let mut board = board();
        board.set_status(0, ItemStatus::Done);
        board.set_status(1, ItemStatus::Failed);
        board.set_status(2, ItemStatus::Interrupted);

        assert!(board.get(0).unwrap().checked);
        assert_eq!(positions(board.selectable()), vec![1, 2, 3]);

        let counts = board.counts();
        assert_eq!(counts.done, 1);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.interrupted, 1);
        assert_eq!(counts.pending, 1);
    }

    #[test]
    fn test_interrupt_in_flight() {
        let mut board = board();
        board.set_status(0, ItemStatus::Done);
        board.set_status(2, ItemStatus::Processing);

        assert_eq!(board.interrupt_in_flight(), vec![2]);
        assert_eq!(board.status(2), Some(ItemStatus::Interrupted));
        assert_eq!(board.status(0), Some(ItemStatus::Done));
        assert_eq!(positions(board.selectable()), vec![1, 2, 3]);
        assert!(board.interrupt_in_flight().is_empty());
    }
}
