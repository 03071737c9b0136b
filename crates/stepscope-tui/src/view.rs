#![forbid(unsafe_code)]

//! Terminal rendering. The layout math lives in pure helpers so it can be
//! unit tested; only [`draw`] touches the terminal.

use std::io::{self, Write};

use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{cursor, queue, terminal};
use stepscope_playback::AdvanceScheduler;
use stepscope_trace::{Bounds, Step, StepOutcome};

use crate::app::{App, InputFocus};

/// How one array cell should be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// Not involved in the current step.
    Plain,
    /// The element being compared right now.
    Compared,
    /// The element the search ended on.
    Found,
    /// Outside the live binary-search window.
    Eliminated,
}

/// Classify every cell of an array of `len` elements for the given step.
pub fn cell_roles(len: usize, step: &Step) -> Vec<CellRole> {
    let mut roles = vec![CellRole::Plain; len];
    if let Some(bounds) = step.bounds {
        for (i, role) in roles.iter_mut().enumerate() {
            if i < bounds.low || i > bounds.high {
                *role = CellRole::Eliminated;
            }
        }
    }
    match step.outcome {
        StepOutcome::Searching { compared } => {
            if let Some(role) = roles.get_mut(compared) {
                *role = CellRole::Compared;
            }
        }
        StepOutcome::Found { at } => {
            if let Some(role) = roles.get_mut(at) {
                *role = CellRole::Found;
            }
        }
        StepOutcome::NotFound => {}
    }
    roles
}

/// The printed form of one array cell.
fn cell_text(value: i64) -> String {
    format!("[{value}]")
}

/// A row of `L`/`M`/`H` markers aligned under the cells they describe.
///
/// Cells are joined by single spaces, so each marker column is the running
/// width of the cells before it.
pub fn marker_row(values: &[i64], bounds: &Bounds) -> String {
    let mut row = String::new();
    let mut col = 0usize;
    let mut place = |at: usize, label: char| {
        let target: usize = values[..at].iter().map(|v| cell_text(*v).len() + 1).sum();
        // Markers at the same column stack into one label, e.g. "LM".
        while col < target {
            row.push(' ');
            col += 1;
        }
        row.push(label);
        col += 1;
    };
    if bounds.low < values.len() {
        place(bounds.low, 'L');
    }
    if let Some(mid) = bounds.mid
        && mid < values.len()
    {
        place(mid, 'M');
    }
    if bounds.high < values.len() && bounds.high > bounds.low {
        place(bounds.high, 'H');
    }
    row
}

/// One-line playback summary for the status row.
pub fn playback_summary<S: AdvanceScheduler>(app: &App<S>) -> String {
    let state = app.session.playback_state();
    let position = match (state.cursor, state.trace_len) {
        (Some(cursor), Some(len)) => format!("step {}/{len}", cursor + 1),
        _ => "no trace".to_string(),
    };
    let narration = if !app.session.narration_available() {
        "narration unavailable"
    } else if app.session.narration_enabled() {
        "narration on"
    } else {
        "narration off"
    };
    format!(
        "{position} | {} | {}ms/step | {narration}",
        state.status,
        state.speed.as_millis()
    )
}

/// Paint a full frame.
pub fn draw<S: AdvanceScheduler>(out: &mut impl Write, app: &App<S>) -> io::Result<()> {
    queue!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0),
        SetAttribute(Attribute::Bold),
        Print("stepscope: stepwise search visualizer"),
        SetAttribute(Attribute::Reset),
    )?;

    draw_field(out, 2, "Array ", &app.array_input, app.focus == InputFocus::Array)?;
    draw_field(out, 3, "Target", &app.target_input, app.focus == InputFocus::Target)?;
    queue!(
        out,
        cursor::MoveTo(2, 4),
        Print(format!("Algorithm: {}  (a to switch)", app.algorithm)),
    )?;

    if let Some(step) = app.session.current_step() {
        draw_cells(out, 6, &app.values, step)?;
        if let Some(bounds) = step.bounds {
            queue!(
                out,
                cursor::MoveTo(2, 7),
                SetForegroundColor(Color::Cyan),
                Print(marker_row(&app.values, &bounds)),
                ResetColor,
            )?;
        }
        queue!(out, cursor::MoveTo(2, 9), Print(&step.description))?;
    } else {
        queue!(
            out,
            cursor::MoveTo(2, 6),
            SetForegroundColor(Color::DarkGrey),
            Print("(no trace yet)"),
            ResetColor,
        )?;
    }

    queue!(out, cursor::MoveTo(2, 11), Print(playback_summary(app)))?;
    queue!(
        out,
        cursor::MoveTo(2, 13),
        SetForegroundColor(Color::DarkGrey),
        Print(&app.status),
        cursor::MoveTo(2, 15),
        Print("Enter start | Space play/pause | Left/Right step | +/_ speed | n narration | r reset | q quit"),
        ResetColor,
    )?;
    out.flush()
}

fn draw_field(
    out: &mut impl Write,
    row: u16,
    label: &str,
    text: &str,
    focused: bool,
) -> io::Result<()> {
    let marker = if focused { '>' } else { ' ' };
    queue!(out, cursor::MoveTo(0, row), Print(format!("{marker} {label}: ")))?;
    if focused {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    queue!(out, Print(text))?;
    if focused {
        queue!(out, Print("_"), SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

fn draw_cells(out: &mut impl Write, row: u16, values: &[i64], step: &Step) -> io::Result<()> {
    let roles = cell_roles(values.len(), step);
    queue!(out, cursor::MoveTo(2, row))?;
    for (value, role) in values.iter().zip(roles) {
        match role {
            CellRole::Plain => queue!(out, Print(cell_text(*value)))?,
            CellRole::Compared => queue!(
                out,
                SetForegroundColor(Color::Yellow),
                SetAttribute(Attribute::Bold),
                Print(cell_text(*value)),
                SetAttribute(Attribute::Reset),
                ResetColor,
            )?,
            CellRole::Found => queue!(
                out,
                SetForegroundColor(Color::Green),
                SetAttribute(Attribute::Bold),
                Print(cell_text(*value)),
                SetAttribute(Attribute::Reset),
                ResetColor,
            )?,
            CellRole::Eliminated => queue!(
                out,
                SetForegroundColor(Color::DarkGrey),
                Print(cell_text(*value)),
                ResetColor,
            )?,
        }
        queue!(out, Print(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepscope_trace::{Algorithm, SearchRequest, generate};

    fn binary_trace() -> stepscope_trace::Trace {
        generate(&SearchRequest::new(
            vec![1, 3, 5, 7, 9, 11, 13, 15],
            11,
            Algorithm::Binary,
        ))
    }

    #[test]
    fn compared_cell_is_marked_and_window_dims_the_rest() {
        let trace = binary_trace();
        let probe = trace.get(1).unwrap();
        let roles = cell_roles(8, probe);
        assert_eq!(roles[5], CellRole::Compared);
        for i in 0..4 {
            assert_eq!(roles[i], CellRole::Eliminated, "cell {i}");
        }
        assert_eq!(roles[4], CellRole::Plain);
    }

    #[test]
    fn found_cell_wins_over_window_shading() {
        let trace = binary_trace();
        let terminal = trace.terminal();
        let roles = cell_roles(8, terminal);
        assert_eq!(roles[5], CellRole::Found);
    }

    #[test]
    fn linear_steps_have_no_eliminated_cells() {
        let trace = generate(&SearchRequest::new(vec![4, 2, 7], 7, Algorithm::Linear));
        for step in trace.steps() {
            let roles = cell_roles(3, step);
            assert!(roles.iter().all(|r| *r != CellRole::Eliminated));
        }
    }

    #[test]
    fn marker_row_aligns_under_cells() {
        // Cells: "[1] [3] [5] [7]" with columns 0, 4, 8, 12.
        let bounds = Bounds {
            low: 0,
            high: 3,
            mid: Some(1),
        };
        assert_eq!(marker_row(&[1, 3, 5, 7], &bounds), "L   M       H");
    }

    #[test]
    fn marker_row_stacks_coincident_markers() {
        let bounds = Bounds {
            low: 2,
            high: 2,
            mid: Some(2),
        };
        assert_eq!(marker_row(&[1, 3, 5, 7], &bounds), "        LM");
    }
}
