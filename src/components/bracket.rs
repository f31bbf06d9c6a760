use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::widgets::Widget;
use wrestling_api::{Match, MatchState, Participant, RoundGroup};

use crate::components::palette::{PaletteColor, resolve};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per match cell: first-slot line, status line, second-slot line.
pub const MATCH_HEIGHT: u16 = 3;

/// Blank rows between stacked cells in the busiest column.
const SLOT_GAP: u16 = 1;

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Round label plus an underline.
pub const HEADER_HEIGHT: u16 = 2;

const CELL_W_MIN: u16 = 16;
const CELL_W_FULL: u16 = 26;

// ---------------------------------------------------------------------------
// ColumnGrid: vertical positions for every match cell
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCell {
    pub round_idx: usize,
    pub match_idx: usize,
    /// Row of the status line, relative to the top of the grid.
    pub center_row: u16,
}

/// Each round column divides the grid height evenly among its matches, so a
/// round with half as many matches as its predecessor lands every cell on the
/// midpoint of the two cells feeding it.
#[derive(Debug, Clone)]
pub struct ColumnGrid {
    pub cells: Vec<MatchCell>,
    /// Index into `cells` where each round starts, plus a final end marker.
    offsets: Vec<usize>,
    pub total_height: u16,
}

impl ColumnGrid {
    pub fn compute(counts: &[usize]) -> Self {
        let busiest = counts.iter().copied().max().unwrap_or(0);
        let total_height = (busiest as u16).saturating_mul(MATCH_HEIGHT + SLOT_GAP);

        let mut cells = Vec::with_capacity(counts.iter().sum());
        let mut offsets = Vec::with_capacity(counts.len() + 1);
        for (round_idx, &count) in counts.iter().enumerate() {
            offsets.push(cells.len());
            if count == 0 {
                continue;
            }
            let slot = total_height / count as u16;
            for match_idx in 0..count {
                cells.push(MatchCell {
                    round_idx,
                    match_idx,
                    center_row: slot * match_idx as u16 + slot / 2,
                });
            }
        }
        offsets.push(cells.len());

        Self { cells, offsets, total_height }
    }

    pub fn cells_for_round(&self, round_idx: usize) -> &[MatchCell] {
        match (self.offsets.get(round_idx), self.offsets.get(round_idx + 1)) {
            (Some(&start), Some(&end)) => &self.cells[start..end],
            _ => &[],
        }
    }

    pub fn center_of(&self, round_idx: usize, match_idx: usize) -> Option<u16> {
        self.cells_for_round(round_idx)
            .get(match_idx)
            .map(|c| c.center_row)
    }

    /// First grid row to show so the given row sits mid-screen where possible.
    pub fn scroll_for(&self, focus_row: u16, visible_height: u16) -> u16 {
        if self.total_height <= visible_height {
            return 0;
        }
        focus_row
            .saturating_sub(visible_height / 2)
            .min(self.total_height - visible_height)
    }
}

/// The horizontal slice of round columns that fits on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWindow {
    pub first: usize,
    pub visible: usize,
    pub cell_width: u16,
}

/// Pick how many columns fit in `width` and which ones, keeping the
/// selected round in view.
pub fn column_layout(width: u16, rounds: usize, selected_round: usize) -> ColumnWindow {
    if rounds == 0 || width == 0 {
        return ColumnWindow { first: 0, visible: 0, cell_width: 0 };
    }
    let fit = ((width + CONNECTOR_WIDTH) / (CELL_W_MIN + CONNECTOR_WIDTH)).max(1) as usize;
    let visible = fit.min(rounds);
    let connectors = CONNECTOR_WIDTH * (visible as u16 - 1);
    let cell_width = (width.saturating_sub(connectors) / visible as u16).min(CELL_W_FULL);
    let selected = selected_round.min(rounds - 1);
    let first = selected.saturating_sub(visible - 1).min(rounds - visible);
    ColumnWindow { first, visible, cell_width }
}

// ---------------------------------------------------------------------------
// RoundColumns widget
// ---------------------------------------------------------------------------

/// Draws one side of a bracket as a column per round, left to right, with
/// box-drawing connectors where one round feeds the next.
pub struct RoundColumns<'a> {
    pub rounds: &'a [RoundGroup<'a>],
    pub selected_round: usize,
    pub selected_match: usize,
}

impl Widget for RoundColumns<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < CELL_W_MIN || area.height < HEADER_HEIGHT + MATCH_HEIGHT {
            return;
        }

        let counts: Vec<usize> = self.rounds.iter().map(|r| r.matches.len()).collect();
        let grid = ColumnGrid::compute(&counts);
        let window = column_layout(area.width, self.rounds.len(), self.selected_round);

        let body = Rect::new(
            area.x,
            area.y + HEADER_HEIGHT,
            area.width,
            area.height - HEADER_HEIGHT,
        );
        let focus = grid
            .center_of(self.selected_round, self.selected_match)
            .unwrap_or(0);
        let scroll = grid.scroll_for(focus, body.height);
        let stride = window.cell_width + CONNECTOR_WIDTH;

        for slot in 0..window.visible {
            let round_idx = window.first + slot;
            let Some(round) = self.rounds.get(round_idx) else {
                break;
            };
            let x = area.x + slot as u16 * stride;
            let is_selected_round = round_idx == self.selected_round;

            draw_header(round, x, area.y, window.cell_width, is_selected_round, buf);

            for cell in grid.cells_for_round(round_idx) {
                let selected = is_selected_round && cell.match_idx == self.selected_match;
                if let Some(m) = round.matches.get(cell.match_idx) {
                    draw_match_cell(m, cell, x, window.cell_width, selected, body, scroll, buf);
                }
            }

            if slot + 1 < window.visible {
                draw_round_connectors(
                    grid.cells_for_round(round_idx),
                    grid.cells_for_round(round_idx + 1),
                    x + window.cell_width,
                    body,
                    scroll,
                    buf,
                );
            }
        }
    }
}

fn draw_header(
    round: &RoundGroup,
    x: u16,
    y: u16,
    width: u16,
    selected: bool,
    buf: &mut Buffer,
) {
    let style = if selected {
        resolve(PaletteColor::Accent)
    } else {
        resolve(PaletteColor::Dim)
    };
    let label = format!("{} ({})", round.label, round.matches.len());
    buf.set_string(x, y, fit_width(&label, width as usize), style);
    buf.set_string(x, y + 1, "─".repeat(width as usize), resolve(PaletteColor::Dim));
}

/// Convert a grid row to an absolute screen y, applying scroll and bounds.
fn screen_y(grid_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if grid_row < scroll {
        return None;
    }
    let rel = grid_row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

#[allow(clippy::too_many_arguments)]
fn draw_match_cell(
    m: &Match,
    cell: &MatchCell,
    x: u16,
    width: u16,
    selected: bool,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let limit_x = area.x + area.width;
    if x >= limit_x {
        return;
    }
    let avail = (limit_x - x).min(width) as usize;

    let rows = [
        cell.center_row.saturating_sub(1),
        cell.center_row,
        cell.center_row.saturating_add(1),
    ];
    for (slot_idx, grid_row) in rows.into_iter().enumerate() {
        let Some(sy) = screen_y(grid_row, scroll, area) else {
            continue;
        };
        let (text, style) = match slot_idx {
            0 => participant_row(&m.participants[0], avail, selected),
            2 => participant_row(&m.participants[1], avail, selected),
            _ => (format_status_line(m, avail, selected), status_style(m.state, selected)),
        };
        buf.set_string(x, sy, text, style);
    }
}

fn participant_row(p: &Participant, width: usize, selected: bool) -> (String, Style) {
    let style = if p.is_winner {
        resolve(PaletteColor::Winner)
    } else if p.name.as_deref().is_none_or(|n| n.trim().is_empty() || n == "TBD") {
        resolve(PaletteColor::Dim)
    } else if selected {
        resolve(PaletteColor::Selected)
    } else {
        Style::default().fg(Color::Gray)
    };
    (format_participant_line(p, width), style)
}

fn status_style(state: MatchState, selected: bool) -> Style {
    match (state, selected) {
        (_, true) => resolve(PaletteColor::Accent),
        (MatchState::ScoreDone, false) => resolve(PaletteColor::Pending),
        _ => resolve(PaletteColor::Dim),
    }
}

/// `" Name           "` padded or clipped to exactly `width` columns.
pub fn format_participant_line(p: &Participant, width: usize) -> String {
    fit_width(&format!(" {}", p.display_name()), width)
}

/// The middle row: result for finished matches, start time otherwise.
/// A leading `>` marks the selected match.
pub fn format_status_line(m: &Match, width: usize, selected: bool) -> String {
    let marker = if selected { '>' } else { ' ' };
    let detail = match m.state {
        MatchState::Done | MatchState::ScoreDone => {
            let result = m
                .winner()
                .and_then(|w| w.result_text.as_deref())
                .unwrap_or_default();
            format!("{} {result}", m.state.label())
        }
        MatchState::Scheduled => m
            .start_time_utc()
            .map(|t| t.format("%m/%d %H:%M").to_string())
            .unwrap_or_else(|| m.name.clone()),
    };
    fit_width(&format!("{marker}{}", detail.trim_end()), width)
}

fn fit_width(text: &str, width: usize) -> String {
    let clipped: String = text.chars().take(width).collect();
    format!("{clipped:<width$}")
}

/// Connect one round column to the next.
///
/// Halving rounds get a fork per parent; rounds of equal size get a straight
/// run per match. Anything else is left unconnected.
fn draw_round_connectors(
    children: &[MatchCell],
    parents: &[MatchCell],
    conn_base_x: u16,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let style = resolve(PaletteColor::Dim);
    if !parents.is_empty() && children.len() == parents.len() * 2 {
        for (j, parent) in parents.iter().enumerate() {
            draw_fork(
                children[2 * j].center_row,
                parent.center_row,
                children[2 * j + 1].center_row,
                conn_base_x,
                area,
                scroll,
                style,
                buf,
            );
        }
    } else if children.len() == parents.len() {
        for child in children {
            for dx in 0..CONNECTOR_WIDTH {
                if let Some(sy) = screen_y(child.center_row, scroll, area) {
                    put_char(buf, conn_base_x + dx, sy, '─', style, area);
                }
            }
        }
    }
}

/// ```text
///  child_top  ──┐
///               │
///  parent     ──├──
///               │
///  child_bot  ──┘
/// ```
#[allow(clippy::too_many_arguments)]
fn draw_fork(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_base_x: u16,
    area: Rect,
    scroll: u16,
    style: Style,
    buf: &mut Buffer,
) {
    let col_a = conn_base_x;
    let col_b = conn_base_x + 1;
    let col_c = conn_base_x + 2;

    macro_rules! put {
        ($x:expr, $row:expr, $ch:expr) => {
            if let Some(sy) = screen_y($row, scroll, area) {
                put_char(buf, $x, sy, $ch, style, area);
            }
        };
    }

    put!(col_a, r_top, '─');
    put!(col_b, r_top, '┐');
    for row in (r_top + 1)..r_mid {
        put!(col_b, row, '│');
    }
    put!(col_a, r_mid, '─');
    put!(col_b, r_mid, '├');
    put!(col_c, r_mid, '─');
    for row in (r_mid + 1)..r_bot {
        put!(col_b, row, '│');
    }
    put!(col_a, r_bot, '─');
    put!(col_b, r_bot, '┘');
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style, area: Rect) {
    if x >= area.x + area.width {
        return;
    }
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wrestling_api::{Analysis, Bracket, group_rounds};

    fn demo_analysis() -> Analysis {
        let demo = wrestling_api::client::demo_bracket().expect("demo bracket");
        Analysis::from_value(Some(&demo))
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
            .collect()
    }

    #[test]
    fn halving_rounds_center_on_their_feeders() {
        let grid = ColumnGrid::compute(&[4, 2, 1]);
        assert_eq!(grid.total_height, 16);
        let centers = |r| grid.cells_for_round(r).iter().map(|c| c.center_row).collect::<Vec<_>>();
        assert_eq!(centers(0), vec![2, 6, 10, 14]);
        assert_eq!(centers(1), vec![4, 12]);
        assert_eq!(centers(2), vec![8]);

        for round in 0..2 {
            let children = grid.cells_for_round(round);
            for (j, parent) in grid.cells_for_round(round + 1).iter().enumerate() {
                let mid = (children[2 * j].center_row + children[2 * j + 1].center_row) / 2;
                assert_eq!(parent.center_row, mid, "round {round} parent {j}");
            }
        }
    }

    #[test]
    fn empty_grid_has_no_cells() {
        let grid = ColumnGrid::compute(&[]);
        assert!(grid.cells.is_empty());
        assert!(grid.cells_for_round(0).is_empty());
        assert_eq!(grid.center_of(0, 0), None);
        assert_eq!(grid.scroll_for(10, 5), 0);
    }

    #[test]
    fn scroll_keeps_focus_mid_screen() {
        let grid = ColumnGrid::compute(&[16]);
        assert_eq!(grid.total_height, 64);
        assert_eq!(grid.scroll_for(2, 20), 0);
        assert_eq!(grid.scroll_for(30, 20), 20);
        assert_eq!(grid.scroll_for(62, 20), 44);
    }

    #[test]
    fn column_window_follows_selection() {
        assert_eq!(column_layout(80, 0, 0).visible, 0);

        let all = column_layout(200, 4, 0);
        assert_eq!(all, ColumnWindow { first: 0, visible: 4, cell_width: CELL_W_FULL });

        let narrow = column_layout(40, 6, 5);
        assert_eq!(narrow.visible, 2);
        assert_eq!(narrow.first, 4);
        assert!(narrow.cell_width >= CELL_W_MIN);

        let clamped = column_layout(40, 6, 99);
        assert_eq!(clamped.first, 4);
    }

    #[test]
    fn lines_are_exact_width() {
        let analysis = demo_analysis();
        let first = &analysis.matches[0];
        let line = format_participant_line(&first.participants[0], 12);
        assert_eq!(line.chars().count(), 12);
        assert_eq!(line, " Gavin Stolt");

        let status = format_status_line(first, 20, true);
        assert_eq!(status.chars().count(), 20);
        assert!(status.starts_with(">Final Fall 0:58"), "status: {status:?}");

        let scheduled = &analysis.matches[6];
        assert!(format_status_line(scheduled, 20, false).starts_with(" 02/22 10:00"));
    }

    #[test]
    fn renders_winners_side_of_demo_bracket() {
        let analysis = demo_analysis();
        let Some(Bracket::Double(d)) = analysis.bracket() else {
            panic!("demo bracket is double elimination");
        };
        let rounds = group_rounds(&d.winners);
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        RoundColumns { rounds: &rounds, selected_round: 0, selected_match: 0 }
            .render(area, &mut buf);

        let header = row_text(&buf, 0);
        assert!(header.starts_with("W1 (4)"), "header: {header:?}");
        assert!(header.contains("GF (1)"), "header: {header:?}");
        assert!(row_text(&buf, 3).contains("Gavin Stoltz"));
        assert!(row_text(&buf, 4).starts_with(">Final"));
        // Fork between the first two W1 bouts and the first W2 bout.
        assert_eq!(buf.cell((18, 4)).map(|c| c.symbol()), Some("┐"));
        assert_eq!(buf.cell((18, 6)).map(|c| c.symbol()), Some("├"));
    }

    #[test]
    fn tiny_area_draws_nothing() {
        let analysis = demo_analysis();
        let all: Vec<&Match> = analysis.matches.iter().collect();
        let rounds = group_rounds(&all);
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        RoundColumns { rounds: &rounds, selected_round: 0, selected_match: 0 }
            .render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
