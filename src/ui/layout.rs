use tui::layout::{Constraint, Layout, Rect, Size};

pub const TAB_BAR_HEIGHT: u16 = 3;
pub const LOGS_HEIGHT: u16 = 8;

/// Pre-computed layout areas for the main draw loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    /// Present only while the log pane is toggled on.
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (content, logs) = Self::split_logs(area, show_logs);

        if full_screen {
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main: content,
                logs,
            };
        }

        let [tab, main] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(content);

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            main,
            logs,
        }
    }

    /// The log pane takes the bottom rows, but never more than half the screen.
    fn split_logs(area: Rect, show_logs: bool) -> (Rect, Option<Rect>) {
        if !show_logs {
            return (area, None);
        }
        let height = LOGS_HEIGHT.min(area.height / 2);
        let [content, logs] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(height)]).areas(area);
        (content, Some(logs))
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_bar_sits_above_main() {
        let layout = LayoutAreas::new(Size::new(100, 40));
        assert_eq!(layout.tab_bar[0].height, TAB_BAR_HEIGHT);
        assert_eq!(layout.main, Rect::new(0, TAB_BAR_HEIGHT, 100, 40 - TAB_BAR_HEIGHT));
        assert!(layout.logs.is_none());
    }

    #[test]
    fn full_screen_drops_tab_bar() {
        let mut layout = LayoutAreas::new(Size::new(100, 40));
        layout.update(Rect::new(0, 0, 100, 40), true, false);
        assert_eq!(layout.tab_bar, [Rect::ZERO, Rect::ZERO]);
        assert_eq!(layout.main, Rect::new(0, 0, 100, 40));
    }

    #[test]
    fn logs_take_bottom_rows() {
        let mut layout = LayoutAreas::new(Size::new(100, 40));
        layout.update(Rect::new(0, 0, 100, 40), false, true);
        assert_eq!(layout.logs, Some(Rect::new(0, 40 - LOGS_HEIGHT, 100, LOGS_HEIGHT)));
        assert_eq!(layout.main.bottom(), 40 - LOGS_HEIGHT);

        layout.update(Rect::new(0, 0, 100, 12), true, true);
        assert_eq!(layout.logs.map(|r| r.height), Some(6));
    }
}
