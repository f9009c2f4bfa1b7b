use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::{MenuAction, State};
use crate::api::OutputFormat;
use crate::tui::modal::CancellableForm;
use crate::tui::sections::Section;
use crate::tui::widgets::{FieldForm, ListState};
use crate::tui::{Screen, Theme};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(super) fn render(state: &mut State, frame: &mut Frame, theme: &Theme) {
    let [header, body, status, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(state, frame, theme, header);
    render_sections(state, frame, theme, body);
    render_status(state, frame, theme, status);
    render_help(state, frame, theme, footer);

    match &mut state.screen {
        Screen::Unified => {}
        Screen::Loading(message) => {
            let spinner = SPINNER[state.spinner % SPINNER.len()];
            let text = format!("{} {}...", spinner, message);
            let area = centered(body, text.chars().count() as u16 + 6, 3);
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(Line::styled(text, theme.text()))
                    .block(Block::default().borders(Borders::ALL).border_style(theme.border(true))),
                area,
            );
        }
        Screen::FormEdit { form, .. } => render_form(form, frame, theme, body),
        Screen::ModeSelect(picker) => {
            let area = centered(body, 36, OutputFormat::ALL.len() as u16 + 2);
            frame.render_widget(Clear, area);
            let block = Block::default()
                .title(" Output format ")
                .borders(Borders::ALL)
                .border_style(theme.border(true));
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let labels = OutputFormat::ALL
                .iter()
                .map(|format| format!("{:<5} {}", format.as_str(), format.label()))
                .collect();
            render_lines(frame, theme, inner, labels, &mut picker.form_mut().list, true);
        }
    }
}

fn render_header(state: &State, frame: &mut Frame, theme: &Theme, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", state.title()),
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
    )];
    if state.loaded {
        spans.push(Span::styled(format!("{} {}s", state.items.len(), state.noun), theme.hint()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_sections(state: &mut State, frame: &mut Frame, theme: &Theme, area: Rect) {
    let visible = state.sections.visible_sections();
    let constraints: Vec<Constraint> = visible
        .iter()
        .map(|section| match section {
            Section::MainMenu => Constraint::Length(26),
            Section::Content => Constraint::Min(24),
            Section::Management => Constraint::Length(30),
        })
        .collect();
    let areas = Layout::horizontal(constraints).split(area);
    let unified = state.screen.is_unified();

    for (section, area) in visible.into_iter().zip(areas.iter().copied()) {
        let focused = unified && state.sections.active() == section;
        let title = match section {
            Section::Management => match state.selected_item() {
                Some(item) => format!(" {} ", item.title),
                None => format!(" {} ", section.title()),
            },
            _ => format!(" {} ", section.title()),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme.border(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match section {
            Section::MainMenu => {
                let labels = MenuAction::ALL.iter().map(|a| a.label(&state.noun)).collect();
                render_lines(frame, theme, inner, labels, &mut state.menu, focused);
            }
            Section::Content => {
                if state.items.is_empty() {
                    let text = format!("No {}s found", state.noun);
                    frame.render_widget(Paragraph::new(Line::styled(text, theme.hint())), inner);
                    continue;
                }
                let labels = state.items.iter().map(item_line).collect();
                render_lines(frame, theme, inner, labels, &mut state.list, focused);
            }
            Section::Management => {
                let labels = state.manage_actions.iter().map(|a| a.label().to_string()).collect();
                render_lines(frame, theme, inner, labels, &mut state.manage, focused);
            }
        }
    }
}

fn item_line(item: &crate::api::Item) -> String {
    match item.format {
        Some(format) if item.artifact_url.is_some() => format!("{} [{}]", item.title, format),
        _ => item.title.clone(),
    }
}

/// Virtual-scrolled list: only rows inside the viewport are built
fn render_lines(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    labels: Vec<String>,
    list: &mut ListState,
    focused: bool,
) {
    list.set_viewport_height(area.height as usize);
    list.update_scroll(labels.len());

    let selected = list.selected();
    let lines: Vec<Line> = labels
        .into_iter()
        .enumerate()
        .skip(list.scroll_offset())
        .take(area.height as usize)
        .map(|(index, label)| {
            if Some(index) == selected {
                let style = if focused {
                    theme.selected()
                } else {
                    Style::default().fg(theme.text_secondary).add_modifier(Modifier::BOLD)
                };
                Line::styled(format!("> {}", label), style)
            } else {
                Line::styled(format!("  {}", label), theme.text())
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_form(modal: &mut CancellableForm<FieldForm>, frame: &mut Frame, theme: &Theme, body: Rect) {
    let form = modal.form_mut();
    let height = form.fields().len() as u16 * 2 + 4;
    let area = centered(body, 64, height);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", form.title()))
        .borders(Borders::ALL)
        .border_style(theme.border(true));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let focus = form.focus();
    let error = form.error().map(str::to_string);
    let width = inner.width.saturating_sub(2) as usize;
    let mut lines = Vec::new();
    let mut cursor = None;

    for (index, field) in form.fields_mut().iter_mut().enumerate() {
        let label_style = if index == focus {
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
        } else {
            theme.hint()
        };
        let marker = if field.required { " *" } else { "" };
        lines.push(Line::styled(format!("{}{}", field.label, marker), label_style));

        if field.value.is_empty() && index != focus {
            lines.push(Line::styled(format!("  {}", field.placeholder), theme.hint()));
        } else {
            let visible = field.input.visible(width, &field.value).to_string();
            if index == focus {
                let column = field.input.cursor_pos() - field.input.scroll_offset();
                cursor = Some((inner.x + 2 + column as u16, inner.y + lines.len() as u16));
            }
            lines.push(Line::styled(format!("  {}", visible), theme.text()));
        }
    }

    match error {
        Some(error) => lines.push(Line::styled(error, Style::default().fg(theme.accent_error))),
        None => lines.push(Line::styled("enter next/submit  ctrl+s submit  esc cancel", theme.hint())),
    }

    frame.render_widget(Paragraph::new(lines), inner);
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

fn render_status(state: &State, frame: &mut Frame, theme: &Theme, area: Rect) {
    let line = match &state.status {
        Some(status) => Line::styled(format!(" {}", status.text), status.style(theme)),
        None => Line::styled(" Ready", theme.hint()),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_help(state: &State, frame: &mut Frame, theme: &Theme, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (key, action) in help_entries(state) {
        spans.push(Span::styled(key, theme.key()));
        spans.push(Span::styled(format!(" {}  ", action), theme.hint()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Key hints for the current screen and focused section
pub fn help_entries(state: &State) -> Vec<(String, &'static str)> {
    let quit = state.keys.quit.to_string();
    match &state.screen {
        Screen::Loading(_) => vec![(quit, "quit")],
        Screen::FormEdit { .. } => vec![
            ("tab".to_string(), "next field"),
            ("enter".to_string(), "submit"),
            ("esc".to_string(), "cancel"),
        ],
        Screen::ModeSelect(_) => vec![
            ("↑↓".to_string(), "choose"),
            ("enter".to_string(), "render"),
            ("esc".to_string(), "back"),
        ],
        Screen::Unified => {
            let mut entries = vec![("↑↓".to_string(), "move"), ("enter".to_string(), "select")];
            if state.sections.visible_sections().len() > 1 {
                entries.push((state.keys.next_section.to_string(), "next pane"));
            }
            let esc = if state.sections.innermost() == Section::MainMenu {
                "quit"
            } else {
                "back"
            };
            entries.push(("esc".to_string(), esc));
            entries.push((quit, "quit"));
            entries
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
