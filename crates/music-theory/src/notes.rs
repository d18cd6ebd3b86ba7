//! Note preprocessing: grid quantization and scale filtering.

use live_model::Note;

use crate::scale::{scale, Mode};

/// Snap each note's start to the nearest multiple of `grid` beats.
/// Durations are unchanged. A non-positive grid leaves the notes alone.
pub fn quantize(notes: &mut [Note], grid: f64) {
    if !(grid > 0.0) || !grid.is_finite() {
        return;
    }
    for note in notes {
        note.start = (note.start / grid).round() * grid;
    }
}

/// Keep only the notes whose pitch class belongs to the scale. Out-of-scale
/// notes are dropped, never transposed: moving a pitch the user wrote would
/// change their material rather than tidy it.
pub fn filter_to_scale(notes: Vec<Note>, root_pc: u8, mode: Mode) -> Vec<Note> {
    let mut member = [false; 12];
    for pc in scale(root_pc, mode) {
        member[pc as usize] = true;
    }
    notes
        .into_iter()
        .filter(|n| member[(n.pitch % 12) as usize])
        .collect()
}
