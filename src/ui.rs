use codeassist_core::{segment, Mode, Role, SegmentKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use crate::app::{App, InputMode, ProbeStatus};
use crate::highlight::highlight_code;

const SIDEBAR_WIDTH: u16 = 24;
const MAX_INPUT_ROWS: usize = 6;

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            // Consume the second *
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;

            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

fn assistant_header() -> Line<'static> {
    Line::from(Span::styled(
        "Assistant",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
}

/// Build the whole transcript as display lines. Rebuilt on every frame.
pub fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let gutter = Style::default().fg(Color::DarkGray);

    for turn in app.conversation.turns() {
        match turn.role() {
            Role::User => {
                lines.push(
                    Line::from(Span::styled(
                        "You",
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ))
                    .alignment(Alignment::Right),
                );
                for line in turn.content().lines() {
                    lines.push(
                        Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Gray)))
                            .alignment(Alignment::Right),
                    );
                }
            }
            Role::Assistant => {
                lines.push(assistant_header());
                for block in segment(turn.content()) {
                    match block.kind {
                        SegmentKind::Prose if block.text.is_empty() => {
                            lines.push(Line::default());
                        }
                        SegmentKind::Prose => {
                            lines.extend(block.text.lines().map(parse_markdown_line));
                        }
                        SegmentKind::Code => {
                            for code_line in highlight_code(&block.text) {
                                let mut spans = vec![Span::styled("▎ ", gutter)];
                                spans.extend(code_line.spans);
                                lines.push(Line::from(spans));
                            }
                        }
                    }
                }
            }
        }
        lines.push(Line::default());
    }

    if app.is_loading() {
        lines.push(assistant_header());
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Generating response{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// Rows `text` occupies once word-wrapped to `width` columns, measured the
/// same way the chat pane wraps it.
pub fn wrapped_height(text: &Text<'_>, width: u16) -> u16 {
    let rows = Paragraph::new(text.clone())
        .wrap(Wrap { trim: false })
        .line_count(width);
    rows.min(u16::MAX as usize) as u16
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [sidebar_area, main_area] = Layout::horizontal([
        Constraint::Length(SIDEBAR_WIDTH),
        Constraint::Min(0),
    ])
    .areas(body_area);

    let input_rows = app.input.split('\n').count().clamp(1, MAX_INPUT_ROWS);
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(input_rows as u16 + 2),
    ])
    .areas(main_area);

    // Store areas for mouse hit-testing
    app.sidebar_area = Some(sidebar_area);
    app.chat_area = Some(chat_area);

    render_header(frame, header_area);
    render_sidebar(app, frame, sidebar_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(" Code Assist ", Style::default().fg(Color::Cyan).bold())),
        Line::from(Span::styled(
            " Chat with the assistant about coding tasks, and get Python code snippets or explanations!",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(header, area);
}

fn render_sidebar(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Code Assist ");

    let items: Vec<ListItem> = Mode::all()
        .iter()
        .map(|mode| ListItem::new(format!(" {} ", mode.display_name())))
        .collect();

    let selected = Mode::all().iter().position(|mode| *mode == app.mode());
    let mut state = ListState::default().with_selected(selected);

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} · {} ", app.mode().display_name(), app.model()));

    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    let chat_text = if app.conversation.is_empty() && !app.is_loading() {
        app.update_chat_metrics(0, inner_height);
        Text::from(Span::styled(
            "No messages yet. Type a request and press Enter.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let text = Text::from(transcript_lines(app));
        let total = wrapped_height(&text, inner_width);
        app.update_chat_metrics(total, inner_height);
        text
    };

    let chat = Paragraph::new(chat_text)
        .block(chat_block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let mode = app.mode();
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let submit_style = if app.is_loading() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Yellow).bold()
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Your Message ")
        .title_top(
            Line::from(vec![
                Span::styled(format!(" {} ", mode.submit_label()), submit_style),
                Span::raw(" "),
            ])
            .right_aligned(),
        );

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let (row, col) = app.cursor_row_col();

    // Scroll offsets to keep the cursor visible
    let row_offset = if inner_height == 0 { 0 } else { row.saturating_sub(inner_height - 1) };
    let col_offset = if inner_width == 0 || col < inner_width { 0 } else { col - inner_width + 1 };

    let input = if app.input.is_empty() {
        Paragraph::new(Span::styled(mode.placeholder(), Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(app.input.as_str())
            .style(Style::default().fg(Color::Cyan))
            .scroll((row_offset as u16, col_offset as u16))
    };

    frame.render_widget(input.block(input_block), area);

    // Show cursor when editing
    if editing {
        frame.set_cursor_position((
            area.x + 1 + (col - col_offset) as u16,
            area.y + 1 + (row - row_offset) as u16,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Black).bg(Color::DarkGray);
    let label_style = Style::default().fg(Color::DarkGray);

    let status = match &app.probe {
        ProbeStatus::Skipped | ProbeStatus::Checking => {
            Span::styled(format!(" {} ", app.model()), Style::default().fg(Color::Gray))
        }
        ProbeStatus::Ready => {
            Span::styled(format!(" ● {} ", app.model()), Style::default().fg(Color::Green))
        }
        ProbeStatus::MissingModel => Span::styled(
            format!(" ● {} not installed ", app.model()),
            Style::default().fg(Color::Yellow),
        ),
        ProbeStatus::Unreachable(_) => Span::styled(
            format!(" ● {} unreachable ", app.endpoint),
            Style::default().fg(Color::Red),
        ),
    };

    let mut spans = vec![status];
    let hints = match app.input_mode {
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(format!(" {} ", app.mode().submit_label().to_lowercase()), label_style),
            Span::styled(" Alt+Enter ", key_style),
            Span::styled(" newline ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" stop typing ", label_style),
        ],
        InputMode::Normal => vec![
            Span::styled(" i ", key_style),
            Span::styled(" type ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" mode ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" G ", key_style),
            Span::styled(" bottom ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };
    spans.extend(hints);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
