//! UI drawing - renders a [`RenderState`] with Ratatui

use ratatui::{prelude::*, widgets::*};

use crate::constants::{APP_NAME, FAUCET_URL};
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{Field, Form, Outcome};

const SUCCESS: Color = Color::Green;
const ERROR: Color = Color::Red;

pub fn draw(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(f, state, main_chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(0)])
        .split(main_chunks[1]);

    draw_panel_list(f, state, body[0]);
    draw_active_panel(f, state, body[1]);
    draw_status_bar(f, state, main_chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, area: Rect) {
    let (open_text, open_color) = open_label(state);
    let header = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw("  Open: "),
        Span::styled(open_text, Style::default().fg(open_color)),
        Span::raw("  Balance: "),
        Span::styled(format!("{} sats", state.wallet.balance_sats), Style::default().fg(Color::Yellow).bold()),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn open_label(state: &RenderState) -> (&'static str, Color) {
    if state.wallet.open {
        ("Yes", SUCCESS)
    } else if !state.wallet.open_attempted {
        ("checking...", Color::DarkGray)
    } else {
        ("No", ERROR)
    }
}

fn is_pending(state: &RenderState, panel: Panel) -> bool {
    match panel {
        Panel::Status => false,
        Panel::Join => state.join.pending,
        Panel::Invoice => state.invoice.pending,
        Panel::Redeem => state.redeem.pending,
        Panel::Pay => state.pay.pending,
        Panel::InviteCode => state.invite.pending,
        Panel::Bolt11 => state.bolt11.pending,
    }
}

fn draw_panel_list(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = Panel::ALL
        .iter()
        .enumerate()
        .map(|(i, panel)| {
            let loading = if is_pending(state, *panel) { " [...]" } else { "" };
            ListItem::new(format!("{} {}{}", i + 1, panel.title(), loading))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Panels "))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.active_panel.index()));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_active_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", state.active_panel.title()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match state.active_panel {
        Panel::Status => draw_status_panel(f, state, inner),
        Panel::Join => {
            let label = if state.join.pending { "Joining..." } else { "Join" };
            let disabled = state.wallet.open;
            let mut lines = outcome_lines(&state.join.outcome, |preview| {
                vec![
                    Line::from(Span::styled("Joined!", Style::default().fg(SUCCESS).bold())),
                    Line::from(format!("Federation: {}", preview.federation_id)),
                ]
            });
            if lines.is_empty() && state.wallet.open {
                lines.push(Line::from(Span::styled(
                    "(You've already joined a federation)",
                    Style::default().italic(),
                )));
            }
            draw_form(f, state, &state.join, label, disabled, lines, inner);
        }
        Panel::Invoice => {
            let label = if state.invoice.pending { "Generating..." } else { "Generate Invoice" };
            let mut lines = vec![Line::from(vec![
                Span::raw("mutinynet faucet: "),
                Span::styled(FAUCET_URL, Style::default().fg(Color::Blue).underlined()),
            ])];
            lines.extend(outcome_lines(&state.invoice.outcome, |created| {
                vec![
                    Line::from(Span::styled("Generated Invoice:", Style::default().fg(SUCCESS).bold())),
                    Line::from(created.invoice.clone()),
                    Line::from(Span::styled("[y] Copy", Style::default().fg(Color::DarkGray))),
                ]
            }));
            draw_form(f, state, &state.invoice, label, false, lines, inner);
        }
        Panel::Redeem => {
            let lines = outcome_lines(&state.redeem.outcome, success_text);
            draw_form(f, state, &state.redeem, "redeem", false, lines, inner);
        }
        Panel::Pay => {
            let lines = outcome_lines(&state.pay.outcome, success_text);
            draw_form(f, state, &state.pay, "pay", false, lines, inner);
        }
        Panel::InviteCode => {
            let label = if state.invite.pending { "Parsing..." } else { "Parse" };
            let lines = outcome_lines(&state.invite.outcome, |parsed| {
                vec![
                    labelled("Fed Id:", parsed.federation_id.clone()),
                    labelled("Fed url:", parsed.url.clone()),
                ]
            });
            draw_form(f, state, &state.invite, label, false, lines, inner);
        }
        Panel::Bolt11 => {
            let label = if state.bolt11.pending { "Parsing..." } else { "Parse" };
            let lines = outcome_lines(&state.bolt11.outcome, |parsed| {
                vec![
                    labelled("Amount :", format!("{} sats", parsed.amount)),
                    labelled("Expiry :", parsed.expiry.to_string()),
                    labelled("Memo :", parsed.memo.clone()),
                ]
            });
            draw_form(f, state, &state.bolt11, label, false, lines, inner);
        }
    }
}

fn draw_status_panel(f: &mut Frame, state: &RenderState, area: Rect) {
    let (open_text, open_color) = open_label(state);
    let updated = state
        .wallet
        .balance_updated_at
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| String::from("never"));

    let lines = vec![
        Line::from(vec![
            Span::styled("Is Wallet Open? ", Style::default().bold()),
            Span::styled(open_text, Style::default().fg(open_color)),
        ]),
        Line::from(vec![
            Span::styled("Balance: ", Style::default().bold()),
            Span::styled(state.wallet.balance_sats.to_string(), Style::default().fg(Color::Yellow)),
            Span::raw(" sats"),
        ]),
        Line::from(Span::styled(
            format!("Last balance update: {}", updated),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        button_line("Check", false),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// Draw the fields of `form`, its submit button and the result lines below
fn draw_form<T>(
    f: &mut Frame,
    state: &RenderState,
    form: &Form<T>,
    label: &str,
    disabled: bool,
    result: Vec<Line<'static>>,
    area: Rect,
) {
    let mut constraints: Vec<Constraint> = form.fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(2)); // Button
    constraints.push(Constraint::Min(0)); // Result
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    for (i, field) in form.fields.iter().enumerate() {
        let selected = i == form.active_field;
        let field_area = chunks[i];
        let cursor = if selected && editing && !disabled {
            Some(state.cursor_position)
        } else {
            None
        };
        let (input, cursor_col) = render_input(field, field_area.width, selected, cursor, disabled);
        f.render_widget(input, field_area);

        if let Some(col) = cursor_col {
            let max_x = field_area.x + field_area.width.saturating_sub(2);
            let cursor_x = (field_area.x + col + 1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, field_area.y + 1));
        }
    }

    let button = button_line(label, disabled || form.pending);
    f.render_widget(Paragraph::new(button), chunks[form.fields.len()]);

    let result = Paragraph::new(result).wrap(Wrap { trim: false });
    f.render_widget(result, chunks[form.fields.len() + 1]);
}

/// Renders a text input field, scrolled so the cursor stays visible.
///
/// Returns the widget and the cursor column inside the box when editing.
pub fn render_input<'a>(
    field: &'a Field,
    width: u16,
    is_selected: bool,
    cursor: Option<usize>,
    disabled: bool,
) -> (Paragraph<'a>, Option<u16>) {
    let border_style = if cursor.is_some() {
        Style::default().fg(Color::Yellow)
    } else if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", field.label));

    if field.value.is_empty() {
        let placeholder = Paragraph::new(field.placeholder)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        return (placeholder, cursor.map(|_| 0));
    }

    let inner_width = width.saturating_sub(2).max(1) as usize;
    let cursor_chars = cursor
        .map(|pos| field.value.get(..pos).unwrap_or(field.value.as_str()).chars().count())
        .unwrap_or(0);
    let offset = cursor_chars.saturating_sub(inner_width - 1);

    let style = if disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let input = Paragraph::new(field.value.as_str())
        .style(style)
        .block(block)
        .scroll((0, offset as u16));
    (input, cursor.map(|_| (cursor_chars - offset) as u16))
}

fn button_line(label: &str, disabled: bool) -> Line<'static> {
    let style = if disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
    };
    Line::from(vec![
        Span::styled(format!(" {} ", label), style),
        Span::styled(
            if disabled { "" } else { "  (s to submit)" },
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn success_text(message: &String) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(message.clone(), Style::default().fg(SUCCESS).bold()))]
}

fn labelled(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().bold()),
        Span::raw(" "),
        Span::styled(value, Style::default().fg(SUCCESS)),
    ])
}

/// Lines for the outcome of a form; empty while idle
pub fn outcome_lines<T>(
    outcome: &Outcome<T>,
    success: impl Fn(&T) -> Vec<Line<'static>>,
) -> Vec<Line<'static>> {
    match outcome {
        Outcome::Idle => Vec::new(),
        Outcome::Success(value) => success(value),
        Outcome::Error(message) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(ERROR),
        ))],
    }
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let (text, style) = match &state.notice {
        Some(notice) => (format!(" {} ", notice), Style::default().fg(SUCCESS)),
        None if state.input_mode == InputMode::Editing => (
            String::from(" ESC:stop editing | arrows:move | Tab:next field | Enter:submit "),
            Style::default().fg(Color::DarkGray),
        ),
        None => (
            String::from(" Tab/1-7:panel | ↑↓:field | e:edit | s:submit | c:check open | ?:help | q:quit "),
            Style::default().fg(Color::DarkGray),
        ),
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 80, area);

    let help_text = format!(
        r#"
 Steps to get started:
   1. Join a Federation (persists across sessions)
   2. Generate an Invoice
   3. Pay the Invoice using the mutinynet faucet
      {}
   4. Watch the balance update, logs go to the log file

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   1 - 7              Jump to panel
   ↑ / ↓              Select field

 FORMS
   e / Enter          Edit selected field
   Tab                Next field while editing
   Enter              Submit while editing
   s                  Submit
   y                  Copy generated invoice

 WALLET
   c                  Check whether the wallet is open

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#,
        FAUCET_URL
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParsedInviteCode, ParsedInvoice};
    use ratatui::backend::TestBackend;

    fn render(state: &RenderState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| draw(f, state)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parsed_invite_code_rendered_verbatim() {
        let mut state = RenderState::default();
        state.active_panel = Panel::InviteCode;
        state.invite.outcome = Outcome::Success(ParsedInviteCode {
            federation_id: "abc".to_string(),
            url: "wss://x".to_string(),
        });

        let screen = render(&state);
        assert!(screen.contains("Fed Id: abc"));
        assert!(screen.contains("Fed url: wss://x"));
    }

    #[test]
    fn test_parsed_invoice_rendered() {
        let mut state = RenderState::default();
        state.active_panel = Panel::Bolt11;
        state.bolt11.outcome = Outcome::Success(ParsedInvoice {
            amount: 21,
            expiry: 3600,
            memo: "coffee".to_string(),
        });

        let screen = render(&state);
        assert!(screen.contains("Amount : 21 sats"));
        assert!(screen.contains("Expiry : 3600"));
        assert!(screen.contains("Memo : coffee"));
    }

    #[test]
    fn test_balance_and_open_flag_shown() {
        let mut state = RenderState::default();
        state.wallet.open = true;
        state.wallet.open_attempted = true;
        state.wallet.balance_sats = 1000;

        let screen = render(&state);
        assert!(screen.contains("Is Wallet Open? Yes"));
        assert!(screen.contains("Balance: 1000 sats"));
    }

    #[test]
    fn test_join_panel_after_joining() {
        let mut state = RenderState::default();
        state.active_panel = Panel::Join;
        state.wallet.open = true;

        let screen = render(&state);
        assert!(screen.contains("(You've already joined a federation)"));
    }

    #[test]
    fn test_error_outcome_shown() {
        let mut state = RenderState::default();
        state.active_panel = Panel::Pay;
        state.pay.outcome = Outcome::Error("no route found".to_string());

        let screen = render(&state);
        assert!(screen.contains("no route found"));
    }

    #[test]
    fn test_pending_button_label() {
        let mut state = RenderState::default();
        state.active_panel = Panel::Invoice;
        state.invoice.pending = true;

        let screen = render(&state);
        assert!(screen.contains("Generating..."));
        assert!(screen.contains("[...]"));
    }
}
