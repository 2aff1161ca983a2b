use crate::ui::app::{App, Focus};
use crate::ui::theme::{GLOBAL_BORDER, HEADER_TEXT};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Key hints for the focused control, plus a result counter.
pub struct Footer {
    focus: Focus,
    ready: bool,
    results: usize,
}

impl Footer {
    pub fn new(app: &App) -> Self {
        Self {
            focus: app.focus(),
            ready: app.is_ready(),
            results: app.results().len(),
        }
    }

    fn hints(&self) -> &'static str {
        match (self.focus, self.ready) {
            (Focus::Operation, _) => " ←/→: Operation │ Tab: Next field │ Esc: Quit",
            (Focus::OperandA | Focus::OperandB, _) => " Type a number │ Tab: Next field │ Esc: Quit",
            (Focus::Calculate, true) => " Enter: Calculate │ Tab: Next field │ Esc: Quit",
            (Focus::Calculate, false) => " Waiting for module │ Tab: Next field │ Esc: Quit",
        }
    }

    fn status(&self) -> String {
        match self.results {
            1 => format!("1 line │ v{VERSION} "),
            n => format!("{n} lines │ v{VERSION} "),
        }
    }

    pub fn widget(&self, area: Rect) -> Paragraph<'static> {
        let hints = self.hints();
        let status = self.status();

        // Box-drawing separators are multi-byte.
        let used = hints.chars().count() + status.chars().count();
        let padding = (area.width.saturating_sub(2) as usize).saturating_sub(used);

        let text_style = Style::default().fg(HEADER_TEXT).add_modifier(Modifier::DIM);
        Paragraph::new(Line::from(vec![
            Span::styled(hints, text_style),
            Span::raw(" ".repeat(padding)),
            Span::styled(status, text_style),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(GLOBAL_BORDER)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::output::TracingChannel;
    use std::sync::Arc;

    #[test]
    fn hints_follow_focus_and_readiness() {
        let mut app = App::new(&UiConfig::default(), Arc::new(TracingChannel::new()));
        assert!(Footer::new(&app).hints().contains("Operation"));

        app.focus_prev();
        assert!(Footer::new(&app).hints().contains("Waiting for module"));
    }

    #[test]
    fn status_counts_result_lines() {
        let mut app = App::new(&UiConfig::default(), Arc::new(TracingChannel::new()));
        app.on_output("RESULT: 1".into());
        assert!(Footer::new(&app).status().starts_with("1 line │"));
        app.on_output("RESULT: 2".into());
        assert!(Footer::new(&app).status().starts_with("2 lines │"));
    }
}
