use post_crafter_engine::{EMOJI_PALETTE, Page, Pending};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Editor};

const STEPS: [&str; 3] = ["Brainstorm", "Generate", "Edit"];

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    f.render_widget(Paragraph::new(progress_line(app)), chunks[0]);

    match &app.wizard.page {
        Page::Brainstorm => draw_brainstorm(f, app, chunks[1]),
        Page::Generate => draw_generate(f, app, chunks[1]),
        Page::Edit { .. } => {
            if let Some(editor) = &app.editor {
                draw_editor(f, editor, chunks[1]);
            }
        }
    }

    let status = app.status.clone().unwrap_or_default();
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            status,
            Style::default().fg(Color::Yellow),
        ))),
        chunks[2],
    );
    f.render_widget(Paragraph::new(help_line(app)), chunks[3]);
}

fn progress_line(app: &App) -> Line<'static> {
    let current = app.wizard.page.step();
    let mut spans = vec![Span::raw("Post Crafter  ")];
    for (index, name) in STEPS.iter().enumerate() {
        let step = index + 1;
        let style = if step == current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if index > 0 {
            spans.push(Span::raw(" › "));
        }
        spans.push(Span::styled(format!("{step} {name}"), style));
    }
    Line::from(spans)
}

fn highlighted_list<'a, T: Into<Line<'a>>>(items: Vec<ListItem<'a>>, title: T) -> List<'a> {
    List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black))
}

fn draw_brainstorm(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(5), Constraint::Min(0)].as_ref())
        .split(area);

    let quick_start = app
        .catalog
        .quick_start
        .iter()
        .enumerate()
        .map(|(index, quick)| format!("F{} {}", index + 1, quick.label))
        .collect::<Vec<_>>()
        .join("  ");
    f.render_widget(
        Paragraph::new(quick_start).block(Block::default().borders(Borders::ALL).title("Quick Start")),
        chunks[0],
    );

    let input = Paragraph::new(format!("{}▏", app.wizard.brainstorm_input))
        .block(Block::default().borders(Borders::ALL).title("Topic"))
        .wrap(Wrap { trim: false });
    f.render_widget(input, chunks[1]);

    if app.wizard.is_pending(Pending::Ideas) {
        f.render_widget(
            Paragraph::new("Generating Ideas...")
                .block(Block::default().borders(Borders::ALL).title("Ideas")),
            chunks[2],
        );
        return;
    }

    let items = app
        .wizard
        .ideas
        .iter()
        .map(|idea| {
            let marker = if app.wizard.selected_idea.as_deref() == Some(idea.as_str()) {
                "● "
            } else {
                "  "
            };
            ListItem::new(format!("{marker}{idea}"))
        })
        .collect();
    let mut state = ListState::default();
    if !app.wizard.ideas.is_empty() {
        state.select(Some(app.cursor));
    }
    f.render_stateful_widget(
        highlighted_list(items, "Ideas (Enter to select)"),
        chunks[2],
        &mut state,
    );
}

fn draw_generate(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let idea = app.wizard.selected_idea.clone().unwrap_or_default();
    f.render_widget(
        Paragraph::new(idea)
            .block(Block::default().borders(Borders::ALL).title("Selected Idea"))
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    if app.wizard.is_pending(Pending::Posts) {
        f.render_widget(
            Paragraph::new("Generating Posts...")
                .block(Block::default().borders(Borders::ALL).title("Posts")),
            chunks[1],
        );
        return;
    }

    let mut state = ListState::default();
    state.select(Some(app.cursor));

    if app.wizard.generated_posts.is_empty() {
        let items = app
            .catalog
            .post_types
            .iter()
            .map(|post_type| {
                let check = if app.wizard.is_post_type_selected(&post_type.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                ListItem::new(vec![
                    Line::from(format!("{check} {}", post_type.title)),
                    Line::from(Span::styled(
                        format!("    {}", post_type.description),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();
        let title = format!(
            "Select post types to generate ({} selected)",
            app.wizard.selected_post_types.len()
        );
        f.render_stateful_widget(highlighted_list(items, title), chunks[1], &mut state);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(chunks[1]);

    let items = app
        .wizard
        .generated_posts
        .iter()
        .map(|post| ListItem::new(format!("{}  {}", post.id, post.title)))
        .collect();
    let title = format!("{} variations", app.wizard.generated_posts.len());
    f.render_stateful_widget(highlighted_list(items, title), columns[0], &mut state);

    let preview = app
        .wizard
        .generated_posts
        .get(app.cursor)
        .map(|post| post.caption.clone())
        .unwrap_or_default();
    f.render_widget(
        Paragraph::new(preview)
            .block(Block::default().borders(Borders::ALL).title("Preview"))
            .wrap(Wrap { trim: false }),
        columns[1],
    );
}

fn draw_editor(f: &mut Frame, editor: &Editor, area: Rect) {
    let picker_height = if editor.emoji_picker.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(picker_height), Constraint::Min(0)].as_ref())
        .split(area);

    if let Some(selected) = editor.emoji_picker {
        let spans: Vec<Span> = EMOJI_PALETTE
            .iter()
            .enumerate()
            .map(|(index, emoji)| {
                let style = if index == selected {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Span::styled(format!("{emoji} "), style)
            })
            .collect();
        f.render_widget(
            Paragraph::new(Line::from(spans))
                .block(Block::default().borders(Borders::ALL).title("Emoji")),
            chunks[0],
        );
    }

    let title = format!("Edit Post ({} characters)", editor.doc.len());
    f.render_widget(
        Paragraph::new(editor_lines(editor))
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false }),
        chunks[1],
    );
}

/// Render the caption with the selection reversed and a block caret.
fn editor_lines(editor: &Editor) -> Vec<Line<'static>> {
    let text = editor.doc.text();
    let selection = editor.doc.selection();
    let selected = Style::default().add_modifier(Modifier::REVERSED);
    let caret = Style::default().bg(Color::Cyan).fg(Color::Black);
    let show_caret = |index: usize| selection.is_empty() && index == editor.head;

    let mut lines = Vec::new();
    let mut spans = Vec::new();
    let mut len = 0;
    for (index, ch) in text.chars().enumerate() {
        len = index + 1;
        if ch == '\n' {
            if show_caret(index) {
                spans.push(Span::styled(" ", caret));
            }
            lines.push(Line::from(std::mem::take(&mut spans)));
            continue;
        }
        let style = if selection.contains(&index) {
            selected
        } else if show_caret(index) {
            caret
        } else {
            Style::default()
        };
        spans.push(Span::styled(ch.to_string(), style));
    }
    if show_caret(len) {
        spans.push(Span::styled(" ", caret));
    }
    lines.push(Line::from(spans));
    lines
}

fn help_line(app: &App) -> Line<'static> {
    let help = match &app.wizard.page {
        Page::Brainstorm => {
            "type: topic | F1-F4: quick start | Enter: generate/select | ^G: regenerate | Tab: continue | Esc: quit"
        }
        Page::Generate if app.wizard.generated_posts.is_empty() => {
            "↑/↓: move | Space: toggle | Enter: generate | b: back | q: quit"
        }
        Page::Generate => "↑/↓: move | e: edit | y: copy | n: new posts | b: back | q: quit",
        Page::Edit { .. } if app.editor.as_ref().is_some_and(|e| e.emoji_picker.is_some()) => {
            "←/→: choose emoji | Enter: insert | Esc: close"
        }
        Page::Edit { .. } => {
            "shift+←/→: select | ^B: bold | ^E: emoji | ^Y: copy | ^S: save | Esc: back"
        }
    };
    Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)))
}
