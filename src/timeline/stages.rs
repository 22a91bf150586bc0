//! Pure stage math: progress in, opacities and gates out.
//!
//! Nothing here keeps state; every function can be sampled at any progress in any order.

use crate::{
    foundation::math::{clamp01, ramp},
    timeline::config::StageTimings,
};

/// Rows (and columns) in the square.
pub const GRID_DIM: usize = 4;

/// Share of the square sub-progress given to each row.
pub const ROW_SLICE: f64 = 1.0 / GRID_DIM as f64;

/// Where a row sits in its reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowPhase {
    /// Slice not reached.
    Pending,
    /// Inside its slice.
    Current,
    /// Slice over.
    Completed,
}

/// Reveal state of one row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowState {
    /// Phase.
    pub phase: RowPhase,
    /// Final row opacity, fade-out included.
    pub opacity: f64,
    /// Row gets the highlight band.
    pub highlighted: bool,
    /// `= S` annotation is shown.
    pub show_sum: bool,
}

/// Reveal state of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellState {
    /// Cell reveal progress in `[0, 1]`; `0` means not drawn.
    pub progress: f64,
    /// Pop scale applied to the glyph size.
    pub scale: f64,
}

/// Proof overlay state, present only while the overlay is on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProofState {
    /// Proof sub-progress; runs past `1.0` while the overlay fades.
    pub progress: f64,
    /// Overlay opacity.
    pub opacity: f64,
    /// Column lines visible.
    pub columns: bool,
    /// Column sum labels visible.
    pub labels: bool,
    /// Diagonals visible.
    pub diagonals: bool,
}

/// Finale state, present once the finale has started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinaleState {
    /// Finale sub-progress in `[0, 1]`.
    pub progress: f64,
    /// Backdrop (and legibility gradient) opacity.
    pub image_alpha: f64,
    /// Text block opacity.
    pub text_alpha: f64,
    /// Remaining upward slide of the text block, `1.0` at finale start, `0.0` at the end.
    pub text_rise: f64,
}

/// Square sub-progress in `[0, 1]`.
pub fn square_progress(t: &StageTimings, p: f64) -> f64 {
    ramp(p, t.reveal.start, t.reveal.end)
}

/// `true` while the square (grid, cells, sums) is drawn at all.
pub fn reveal_visible(t: &StageTimings, p: f64) -> bool {
    p < t.reveal_visible_until
}

/// Opacity of the grid lines.
pub fn grid_opacity(t: &StageTimings, p: f64) -> f64 {
    1.0 - ramp(p, t.grid_fade.start, t.grid_fade.end)
}

/// Reveal state of `row` at progress `p`.
pub fn reveal_row(t: &StageTimings, p: f64, row: usize) -> RowState {
    let sq = square_progress(t, p);
    let start = row as f64 * ROW_SLICE;
    let end = start + ROW_SLICE;
    let phase = if sq >= end {
        RowPhase::Completed
    } else if sq >= start {
        RowPhase::Current
    } else {
        RowPhase::Pending
    };

    // The date row stays at full strength.
    let base = if row == 0 {
        1.0
    } else {
        match phase {
            RowPhase::Pending => 0.0,
            RowPhase::Current => 1.0,
            RowPhase::Completed => t.completed_row_opacity,
        }
    };
    let opacity = base * (1.0 - ramp(p, t.row_fade.start, t.row_fade.end));

    RowState {
        phase,
        opacity,
        highlighted: phase == RowPhase::Current && p < t.reveal.end,
        show_sum: sq > end - t.sum_lead || phase == RowPhase::Completed,
    }
}

/// Reveal state of the cell at `(row, col)`.
pub fn reveal_cell(t: &StageTimings, p: f64, row: usize, col: usize) -> CellState {
    let sq = square_progress(t, p);
    let delay = row as f64 * ROW_SLICE + col as f64 * t.cell_stagger;
    let progress = clamp01((sq - delay) / t.cell_duration);
    let current = reveal_row(t, p, row).phase == RowPhase::Current;
    let scale = if current && progress < 1.0 {
        1.0 + (progress * std::f64::consts::PI).sin() * 0.5
    } else {
        1.0
    };
    CellState { progress, scale }
}

/// Which rows have finished their reveal slice.
pub fn rows_completed(t: &StageTimings, p: f64) -> [bool; GRID_DIM] {
    std::array::from_fn(|r| reveal_row(t, p, r).phase == RowPhase::Completed)
}

/// Proof overlay state, `None` outside its visible range.
pub fn proof_state(t: &StageTimings, p: f64) -> Option<ProofState> {
    if !(p > t.proof.start && p < t.proof_visible_until) {
        return None;
    }
    let progress = t.proof.local(p);
    Some(ProofState {
        progress,
        opacity: 1.0 - ramp(p, t.proof_fade.start, t.proof_fade.end),
        columns: progress > t.proof_column_gate,
        labels: progress > t.proof_label_gate,
        diagonals: progress > t.proof_diagonal_gate,
    })
}

/// Finale state, `None` before it starts.
pub fn finale_state(t: &StageTimings, p: f64) -> Option<FinaleState> {
    if p <= t.finale_start {
        return None;
    }
    let progress = clamp01((p - t.finale_start) / (1.0 - t.finale_start));
    Some(FinaleState {
        progress,
        image_alpha: progress,
        text_alpha: (progress * 1.5).min(1.0),
        text_rise: 1.0 - progress,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/stages.rs"]
mod tests;
