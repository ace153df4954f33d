/*!
Button coordinates and layout-dependent note numbers.

Which MIDI note a physical button sends and listens to depends on the firmware layout that's
currently active. Every device type supplies a formula `(button, layout index) -> note`; a
[`NoteResolver`] wraps that formula for one button and remembers each result the first time a
layout is asked for.
*/

use std::cell::Cell;

use crate::LaunchpadError;

/// Which part of the device a button belongs to
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ButtonGroup {
    /// The main 8x8 pads
    Grid,
    /// The round scene buttons to the right of the grid
    Right,
    /// The round control buttons above the grid
    Top,
}

/// The kind of MIDI message a button is addressed with
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum Status {
    NoteOn,
    ControlChange,
}

/// Which 4x4 quarter of the grid a coordinate lies in.
///
/// 0 is the low-column low-row quarter, 1 has the high columns, 2 the high rows, 3 both.
pub fn quadrant(column: u8, row: u8) -> u8 {
    let mut quadrant = 0;
    if column > 3 {
        quadrant += 1;
    }
    if row > 3 {
        quadrant += 2;
    }
    quadrant
}

/// The immutable description of one physical button.
///
/// Rows count upwards from the bottom of the grid, columns from the left. Side buttons sit in
/// column 8, top buttons in row 8.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct ButtonSpec {
    pub group: ButtonGroup,
    pub column: u8,
    pub row: u8,
    pub status: Status,
    /// The label printed on side and top buttons
    pub name: Option<&'static str>,
}

impl ButtonSpec {
    pub fn grid(column: u8, row: u8) -> Self {
        Self {
            group: ButtonGroup::Grid,
            column,
            row,
            status: Status::NoteOn,
            name: None,
        }
    }

    pub fn right(row: u8, name: &'static str) -> Self {
        Self {
            group: ButtonGroup::Right,
            column: 8,
            row,
            status: Status::NoteOn,
            name: Some(name),
        }
    }

    pub fn top(column: u8, name: &'static str) -> Self {
        Self {
            group: ButtonGroup::Top,
            column,
            row: 8,
            status: Status::ControlChange,
            name: Some(name),
        }
    }

    pub fn quadrant(&self) -> u8 {
        quadrant(self.column, self.row)
    }

    pub fn is_at(&self, group: ButtonGroup, column: u8, row: u8) -> bool {
        self.group == group && self.column == column && self.row == row
    }
}

/// A per-device-type note formula
pub type NoteFormula = fn(&ButtonSpec, usize) -> u8;

/// Lazily computes and caches the note of one button for each layout.
///
/// The cache has one slot per layout of the device type, and a slot is only filled once that
/// layout has been asked for.
#[derive(Debug, Clone)]
pub struct NoteResolver {
    button: ButtonSpec,
    formula: NoteFormula,
    notes: Box<[Cell<Option<u8>>]>,
}

impl NoteResolver {
    pub fn new(button: ButtonSpec, formula: NoteFormula, layout_count: usize) -> Self {
        Self {
            button,
            formula,
            notes: vec![Cell::new(None); layout_count].into_boxed_slice(),
        }
    }

    pub fn button(&self) -> &ButtonSpec {
        &self.button
    }

    /// The note of this button while the layout at `layout` is active
    pub fn note_for(&self, layout: usize) -> Result<u8, LaunchpadError> {
        let slot = self
            .notes
            .get(layout)
            .ok_or(LaunchpadError::LayoutOutOfRange {
                index: layout,
                count: self.notes.len(),
            })?;

        if let Some(note) = slot.get() {
            return Ok(note);
        }

        let note = (self.formula)(&self.button, layout);
        slot.set(Some(note));
        Ok(note)
    }

    /// Whether the note for `layout` has been computed already
    pub fn is_resolved(&self, layout: usize) -> bool {
        self.notes
            .get(layout)
            .map_or(false, |slot| slot.get().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_quadrant() {
        assert_eq!(quadrant(0, 0), 0);
        assert_eq!(quadrant(3, 3), 0);
        assert_eq!(quadrant(4, 0), 1);
        assert_eq!(quadrant(0, 4), 2);
        assert_eq!(quadrant(7, 7), 3);
        assert_eq!(ButtonSpec::grid(5, 2).quadrant(), 1);
    }

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counting_formula(button: &ButtonSpec, layout: usize) -> u8 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        button.column + 10 * layout as u8
    }

    #[test]
    fn test_memoized_per_layout() {
        let resolver = NoteResolver::new(ButtonSpec::grid(3, 0), counting_formula, 3);
        assert!(!resolver.is_resolved(0));
        assert!(!resolver.is_resolved(2));

        assert_eq!(resolver.note_for(2).unwrap(), 23);
        assert_eq!(resolver.note_for(2).unwrap(), 23);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert!(resolver.is_resolved(2));
        assert!(!resolver.is_resolved(0));

        assert_eq!(resolver.note_for(0).unwrap(), 3);
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_layout() {
        let resolver = NoteResolver::new(ButtonSpec::top(0, "up"), |_, _| 104, 2);
        assert!(matches!(
            resolver.note_for(2),
            Err(LaunchpadError::LayoutOutOfRange { index: 2, count: 2 })
        ));
        assert!(!resolver.is_resolved(2));
    }
}
