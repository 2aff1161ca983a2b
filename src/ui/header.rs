use crate::ui::loader::LoaderLifecycleState;
use crate::ui::theme::{
    GLOBAL_BORDER, HEADER_SEPARATOR, HEADER_TEXT, STATUS_ERROR, STATUS_OK, STATUS_PENDING,
};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub struct Header<'a> {
    lifecycle: &'a LoaderLifecycleState,
    in_flight: usize,
    spinner_frame: usize,
}

impl<'a> Header<'a> {
    pub fn new(lifecycle: &'a LoaderLifecycleState, in_flight: usize, spinner_frame: usize) -> Self {
        Self {
            lifecycle,
            in_flight,
            spinner_frame,
        }
    }

    fn indicator(&self) -> &'static str {
        if self.lifecycle.is_loading() || self.in_flight > 0 {
            SPINNER[self.spinner_frame % SPINNER.len()]
        } else {
            "●"
        }
    }

    pub fn widget(&self) -> Paragraph<'static> {
        let text_style = Style::default().fg(HEADER_TEXT);
        let separator_style = Style::default().fg(HEADER_SEPARATOR);
        let status_color = match self.lifecycle {
            LoaderLifecycleState::Ready => STATUS_OK,
            LoaderLifecycleState::Failed { .. } => STATUS_ERROR,
            _ => STATUS_PENDING,
        };

        let mut spans = vec![
            Span::styled("  ", text_style),
            Span::styled(self.indicator(), Style::default().fg(status_color)),
            Span::styled("  ", text_style),
            Span::styled("VM Calculator", text_style),
            Span::styled("  │  ", separator_style),
            Span::styled(self.lifecycle.label(), text_style),
        ];
        if self.in_flight > 0 {
            spans.push(Span::styled("  │  ", separator_style));
            spans.push(Span::styled(
                format!("{} pending", self.in_flight),
                text_style,
            ));
        }

        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(Style::default().fg(GLOBAL_BORDER)),
        )
    }
}
