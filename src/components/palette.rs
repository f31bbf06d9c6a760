use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaletteColor {
    /// Headers and the selected round label.
    Accent,
    /// Connectors, placeholders and secondary text.
    Dim,
    Winner,
    /// A score has been entered but the result is not final.
    Pending,
    Selected,
    Warning,
    Error,
}

pub fn resolve(color: PaletteColor) -> Style {
    match color {
        PaletteColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        PaletteColor::Dim => Style::default().fg(Color::Indexed(240)),
        PaletteColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        PaletteColor::Pending => Style::default().fg(Color::Rgb(0, 122, 195)),
        PaletteColor::Selected => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        PaletteColor::Warning => Style::default().fg(Color::Rgb(255, 103, 31)),
        PaletteColor::Error => Style::default().fg(Color::Red),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_and_results_are_told_apart() {
        assert_eq!(resolve(PaletteColor::Winner).fg, Some(Color::Green));
        assert_eq!(resolve(PaletteColor::Error).fg, Some(Color::Red));
        assert_ne!(resolve(PaletteColor::Accent), resolve(PaletteColor::Dim));
        assert!(resolve(PaletteColor::Selected).add_modifier.contains(Modifier::BOLD));
    }
}
