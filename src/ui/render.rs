use crate::ui::app::{App, Focus};
use crate::ui::footer::Footer;
use crate::ui::header::Header;
use crate::ui::layout::{body_sections, layout_regions, operand_columns};
use crate::ui::theme::{
    ACCENT, ACTIVE_HIGHLIGHT, DISABLED, GLOBAL_BORDER, HEADER_TEXT, RESULT_TEXT,
};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const PLACEHOLDER: &str = "Waiting for input...";

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    let (header, body, footer) = layout_regions(area);

    let header_widget = Header::new(&app.loader_lifecycle, app.in_flight(), app.spinner_frame());
    frame.render_widget(header_widget.widget(), header);
    frame.render_widget(Clear, body);

    let (form, results) = body_sections(body);
    draw_form(frame, app, form);
    draw_results(frame, app, results);

    frame.render_widget(Footer::new(app).widget(footer), footer);
}

fn field_style(app: &App, focus: Focus) -> Style {
    let style = Style::default().fg(HEADER_TEXT);
    if app.focus() == focus {
        style.bg(ACTIVE_HIGHLIGHT).add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

fn draw_form(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GLOBAL_BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let row = |offset: u16, height: u16| Rect {
        x: inner.x,
        y: inner.y + offset.min(inner.height),
        width: inner.width,
        height: height.min(inner.height.saturating_sub(offset)),
    };

    let operation = Line::from(vec![
        Span::raw("Operation: "),
        Span::styled(
            format!("< {} >", app.operation().label()),
            field_style(app, Focus::Operation),
        ),
    ]);
    frame.render_widget(Paragraph::new(operation), row(0, 1));

    let (left, right) = operand_columns(row(2, 1));
    let value_a = Line::from(vec![
        Span::raw("Value A: "),
        Span::styled(format!("[{:<8}]", app.operand_a()), field_style(app, Focus::OperandA)),
    ]);
    let value_b = Line::from(vec![
        Span::raw("Value B: "),
        Span::styled(format!("[{:<8}]", app.operand_b()), field_style(app, Focus::OperandB)),
    ]);
    frame.render_widget(Paragraph::new(value_a), left);
    frame.render_widget(Paragraph::new(value_b), right);

    let mut button_style = if app.is_ready() {
        Style::default().fg(HEADER_TEXT).bg(ACCENT)
    } else {
        Style::default().fg(DISABLED)
    };
    if app.focus() == Focus::Calculate {
        button_style = button_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    let button = Paragraph::new(Span::styled(
        format!("  {}  ", app.button_label()),
        button_style,
    ))
    .alignment(Alignment::Center);
    frame.render_widget(button, row(4, 1));
}

fn draw_results(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let lines: Vec<Line> = if app.results().is_empty() {
        vec![Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(DISABLED),
        ))]
    } else {
        app.results()
            .iter()
            .map(|line| Line::from(Span::styled(line.clone(), Style::default().fg(RESULT_TEXT))))
            .collect()
    };

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(" Results ", Style::default().fg(HEADER_TEXT)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(GLOBAL_BORDER)),
        );
    frame.render_widget(widget, area);
}
