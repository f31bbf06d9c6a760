use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::RoundColumns;
use crate::components::palette::{PaletteColor, resolve};
use crate::state::app_settings::BracketSource;
use crate::state::app_state::BracketState;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use wrestling_api::{Match, RoundLabel};

static TABS: &[&str; 4] = &["Tournaments", "Bracket", "Stats", "Issues"];

const HELP_TEXT: &str = "\
Views
  1  Tournaments     2  Bracket     3  Stats     4  Issues     ?  Help

Tournaments
  j/k  move          Enter  open bracket

Bracket
  h/l  previous/next round
  j/k  previous/next match
  w    switch winners / consolation / unclassified (double elimination)

Issues
  j/k  scroll

Anywhere
  R    reload        f  full screen        \"  toggle logs        q  quit";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Tournaments => draw_tournaments(f, layout.main, app),
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Stats => draw_stats(f, layout.main, app),
            MenuItem::Issues => draw_issues(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_of = |item: MenuItem| match item {
        MenuItem::Tournaments => 0,
        MenuItem::Bracket => 1,
        MenuItem::Stats => 2,
        MenuItem::Issues => 3,
        MenuItem::Help => 0,
    };
    let tab_index = match app.state.active_tab {
        MenuItem::Help => tab_of(app.state.previous_tab),
        other => tab_of(other),
    };

    let issue_count = app.state.bracket.analysis.validation.errors.len();
    let titles: Vec<Line> = TABS
        .iter()
        .enumerate()
        .map(|(i, t)| {
            if i == 3 && issue_count > 0 {
                Line::from(vec![
                    Span::raw(*t),
                    Span::styled(format!(" ({issue_count})"), resolve(PaletteColor::Error)),
                ])
            } else {
                Line::from(*t)
            }
        })
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_tournaments(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Tournaments ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [header, list_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new(format!("Source: {}", app.settings.source.describe()))
            .style(Style::default().fg(Color::DarkGray)),
        header,
    );

    let list = &app.state.tournaments;
    if list.items.is_empty() {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Tournament list failed:\n{err}")
        } else if list.loaded {
            "No tournaments found. Press R to reload.".to_string()
        } else {
            "Loading tournaments...".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            list_area,
        );
        return;
    }

    let visible = list_area.height as usize;
    let offset = list.selected.saturating_sub(visible.saturating_sub(1));
    let open_id = app.state.bracket.tournament_id.as_deref();
    let lines: Vec<Line> = list
        .items
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(idx, t)| {
            let selected = idx == list.selected;
            let marker = if selected { "> " } else { "  " };
            let open = if open_id == Some(t.id.as_str()) { "  [open]" } else { "" };
            let style = if selected {
                resolve(PaletteColor::Selected)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(format!("{marker}{}", t.title()), style),
                Span::styled(open, resolve(PaletteColor::Dim)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), list_area);
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let bracket = &app.state.bracket;
    if !bracket.has_data() {
        draw_centered_note(f, inner, &waiting_message(app, "bracket"));
        return;
    }

    let analysis = &bracket.analysis;
    if !analysis.is_renderable() {
        let msg = if analysis.validation.is_valid {
            "This bracket could not be read. See Issues (4).".to_string()
        } else {
            format!(
                "This bracket failed validation with {} error(s). See Issues (4).",
                analysis.validation.errors.len()
            )
        };
        draw_centered_note(f, inner, &msg);
        return;
    }

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    f.render_widget(Paragraph::new(bracket_header(bracket)), header);
    let legend = if bracket.is_double() {
        "Keys: h/l=round  j/k=match  w=side  R=reload  ?=help  q=quit"
    } else {
        "Keys: h/l=round  j/k=match  R=reload  ?=help  q=quit"
    };
    f.render_widget(
        Paragraph::new(legend).style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let rounds = bracket.rounds();
    if rounds.is_empty() {
        draw_centered_note(f, content, "No matches on this side of the bracket");
        return;
    }

    let (columns_area, detail_area) = if content.width >= 110 {
        let [left, right] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(34)]).areas(content);
        (left, Some(right))
    } else if content.height >= 24 {
        let [top, bottom] = Layout::vertical([Constraint::Fill(1), Constraint::Length(9)]).areas(content);
        (top, Some(bottom))
    } else {
        (content, None)
    };

    f.render_widget(
        RoundColumns {
            rounds: &rounds,
            selected_round: bracket.selected_round,
            selected_match: bracket.selected_match,
        },
        columns_area,
    );

    if let Some(detail) = detail_area {
        draw_match_detail(f, detail, bracket.selected_match());
    }
}

fn bracket_header(bracket: &BracketState) -> Line<'static> {
    let analysis = &bracket.analysis;
    let title = analysis
        .tournament
        .as_ref()
        .map(|t| t.title())
        .unwrap_or_else(|| "Bracket".to_string());
    let format = analysis.format.map(|f| f.label()).unwrap_or("-");

    let mut spans = vec![
        Span::styled(title, resolve(PaletteColor::Selected)),
        Span::raw(format!(" | {format}")),
    ];
    if bracket.is_double() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(bracket.pane.label(), resolve(PaletteColor::Accent)));
    }
    if let Some(at) = bracket.loaded_at.as_deref() {
        spans.push(Span::styled(format!(" | loaded {at}"), resolve(PaletteColor::Dim)));
    }
    Line::from(spans)
}

fn draw_match_detail(f: &mut Frame, area: Rect, selected: Option<&Match>) {
    let block = default_border(Color::DarkGray).title(" Match ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(m) = selected else {
        draw_centered_note(f, inner, "No match selected");
        return;
    };

    let dim = resolve(PaletteColor::Dim);
    let mut lines = vec![
        Line::from(Span::styled(m.name.clone(), resolve(PaletteColor::Selected))),
        Line::from(vec![
            Span::styled("Bout ", dim),
            Span::raw(m.id.to_string()),
            Span::styled("  Round ", dim),
            Span::raw(format!("{} ({})", m.tournament_round_text, describe_round(m.round))),
        ]),
        Line::from(vec![
            Span::styled("State ", dim),
            Span::raw(m.state.label()),
            Span::styled("  Starts ", dim),
            Span::raw(
                m.start_time_utc()
                    .map(|t| t.format("%a %m/%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]),
        Line::from(""),
    ];

    for p in &m.participants {
        let style = if p.is_winner {
            resolve(PaletteColor::Winner)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut spans = vec![Span::styled(format!("{} ", if p.is_winner { "W" } else { " " }), style)];
        spans.push(Span::styled(p.display_name().to_string(), style));
        if let Some(result) = p.result_text.as_deref() {
            spans.push(Span::styled(format!("  {result}"), dim));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    let route = |id: &Option<wrestling_api::MatchId>| {
        id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
    };
    let mut routing = vec![Span::styled("Winner to ", dim), Span::raw(route(&m.next_match_id))];
    if m.next_loser_match_id.is_some() {
        routing.push(Span::styled("  Loser to ", dim));
        routing.push(Span::raw(route(&m.next_loser_match_id)));
    }
    lines.push(Line::from(routing));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn describe_round(round: RoundLabel) -> String {
    match round {
        RoundLabel::Upper(n) => format!("winners round {n}"),
        RoundLabel::Lower(n) => format!("consolation round {n}"),
        RoundLabel::Stage(side) => format!("{} stage", side.label().to_lowercase()),
        RoundLabel::GrandFinal => "grand final".to_string(),
        RoundLabel::Numbered(n) => format!("round {n}"),
        RoundLabel::Unrecognized => "unrecognised label".to_string(),
    }
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Stats ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let bracket = &app.state.bracket;
    if !bracket.has_data() {
        draw_centered_note(f, inner, &waiting_message(app, "stats"));
        return;
    }

    let analysis = &bracket.analysis;
    let stats = analysis.stats;
    let [summary, gauge_area, _rest] = Layout::vertical([
        Constraint::Length(8),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(inner);

    let dim = resolve(PaletteColor::Dim);
    let row = |label: &str, value: String| {
        Line::from(vec![Span::styled(format!("{label:<20}"), dim), Span::raw(value)])
    };
    let mut lines = vec![
        row(
            "Tournament",
            analysis
                .tournament
                .as_ref()
                .map(|t| t.title())
                .unwrap_or_else(|| "-".to_string()),
        ),
        row(
            "Format",
            analysis.format.map(|f| f.label().to_string()).unwrap_or_else(|| "-".to_string()),
        ),
        row("Rounds", stats.total_rounds.to_string()),
        row("Matches", stats.total_matches.to_string()),
        row("Completed", stats.completed_matches.to_string()),
        row("Remaining", stats.remaining_matches.to_string()),
    ];
    if let Some(wrestling_api::Bracket::Double(d)) = analysis.bracket() {
        lines.push(row(
            "Winners / Consol.",
            format!("{} / {}", d.winners.len(), d.consolation.len()),
        ));
        if !d.unclassified.is_empty() {
            lines.push(row("Unclassified", d.unclassified.len().to_string()));
        }
    }
    f.render_widget(Paragraph::new(lines), summary);

    let ratio = stats.progress().clamp(0.0, 1.0);
    f.render_widget(
        Gauge::default()
            .block(default_border(Color::DarkGray).title(" Progress "))
            .gauge_style(resolve(PaletteColor::Winner))
            .ratio(ratio)
            .label(format!("{}/{} complete", stats.completed_matches, stats.total_matches)),
        gauge_area,
    );
}

fn draw_issues(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Issues ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let bracket = &app.state.bracket;
    let mut lines: Vec<Line> = Vec::new();

    if let Some(err) = app.state.last_error.as_deref() {
        lines.push(section_title("Last request"));
        lines.push(Line::from(Span::styled(err.to_string(), resolve(PaletteColor::Error))));
        lines.push(Line::from(""));
    }

    if !bracket.has_data() {
        lines.push(Line::from(Span::styled(
            waiting_message(app, "issues"),
            resolve(PaletteColor::Dim),
        )));
        f.render_widget(Paragraph::new(lines), inner);
        return;
    }

    let analysis = &bracket.analysis;
    let verdict = if analysis.validation.is_valid {
        Span::styled("Valid", resolve(PaletteColor::Winner))
    } else {
        Span::styled("Invalid", resolve(PaletteColor::Error))
    };
    lines.push(Line::from(vec![Span::raw("Validation: "), verdict]));
    lines.push(Line::from(""));

    if !analysis.validation.errors.is_empty() {
        lines.push(section_title(&format!("Errors ({})", analysis.validation.errors.len())));
        for e in &analysis.validation.errors {
            lines.push(Line::from(Span::styled(format!("  {e}"), resolve(PaletteColor::Error))));
        }
        lines.push(Line::from(""));
    }

    let notices = analysis.notices();
    if !notices.is_empty() {
        lines.push(section_title(&format!("Warnings ({})", notices.len())));
        for n in &notices {
            lines.push(Line::from(Span::styled(format!("  {n}"), resolve(PaletteColor::Warning))));
        }
    }

    if analysis.validation.errors.is_empty() && notices.is_empty() {
        lines.push(Line::from(Span::styled(
            "No problems found.",
            resolve(PaletteColor::Dim),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((app.state.issues_scroll, 0)),
        inner,
    );
}

fn section_title(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), resolve(PaletteColor::Accent)))
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(HELP_TEXT).style(Style::default().fg(Color::Gray)),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(resolve(PaletteColor::Error))
        .style_warn(resolve(PaletteColor::Warning))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(resolve(PaletteColor::Dim))
        .output_separator(' ')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logger, area);
}

fn waiting_message(app: &App, what: &str) -> String {
    if let Some(err) = app.state.last_error.as_deref() {
        format!("Load failed:\n{err}")
    } else if app.settings.initial_tournament.is_none()
        && matches!(app.settings.source, BracketSource::Api { .. })
    {
        format!("Pick a tournament on the Tournaments tab (1) to see its {what}")
    } else {
        "Loading bracket data...".to_string()
    }
}

fn draw_centered_note(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg.to_string())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
