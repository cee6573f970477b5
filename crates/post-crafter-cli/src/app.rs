use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use post_crafter_config::Config;
use post_crafter_engine::{Catalog, Cmd, Document, EMOJI_PALETTE, Event, Page, Pending, Wizard};

/// Caption editor state layered over the engine document.
pub struct Editor {
    pub doc: Document,
    /// Fixed end of the selection while extending with shift.
    pub anchor: usize,
    /// Moving end of the selection; also the caret.
    pub head: usize,
    /// Highlighted palette entry while the emoji picker is open.
    pub emoji_picker: Option<usize>,
}

impl Editor {
    fn new(content: &str) -> Self {
        let doc = Document::new(content);
        let caret = doc.len();
        Self {
            doc,
            anchor: caret,
            head: caret,
            emoji_picker: None,
        }
    }

    fn move_head(&mut self, head: usize, extend: bool) {
        self.head = head.min(self.doc.len());
        if !extend {
            self.anchor = self.head;
        }
        self.doc.set_selection(self.anchor..self.head);
    }

    fn apply(&mut self, cmd: Cmd) -> Option<String> {
        match self.doc.apply(cmd) {
            Ok(patch) => {
                self.anchor = patch.new_selection.start;
                self.head = patch.new_selection.end;
                self.doc.set_selection(patch.new_selection);
                patch.notice.map(|notice| notice.to_string())
            }
            Err(e) => {
                log::warn!("edit rejected: {e}");
                Some(e.to_string())
            }
        }
    }
}

pub struct App {
    pub catalog: Catalog,
    pub wizard: Wizard,
    pub editor: Option<Editor>,
    /// Highlighted row of whichever list the current page shows.
    pub cursor: usize,
    pub status: Option<String>,
    /// Posts copied during the session, printed on exit.
    pub copied: Vec<String>,
    pub should_quit: bool,
    ideas_delay: Duration,
    posts_delay: Duration,
    ideas_since: Option<Instant>,
    posts_since: Option<Instant>,
}

impl App {
    pub fn new(catalog: Catalog, config: &Config) -> Self {
        Self {
            catalog,
            wizard: Wizard::new(),
            editor: None,
            cursor: 0,
            status: None,
            copied: Vec::new(),
            should_quit: false,
            ideas_delay: config.ideas_delay(),
            posts_delay: config.posts_delay(),
            ideas_since: None,
            posts_since: None,
        }
    }

    /// Feed an event to the wizard, keeping the old state on failure.
    ///
    /// Returns whether the wizard accepted the event.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let page_before = self.wizard.page.step();
        match self.wizard.clone().transition(event, &self.catalog) {
            Ok(wizard) => self.wizard = wizard,
            Err(e) => {
                log::warn!("{e}");
                self.status = Some(e.to_string());
                return false;
            }
        }

        let now = Instant::now();
        for (generation, since) in [
            (Pending::Ideas, &mut self.ideas_since),
            (Pending::Posts, &mut self.posts_since),
        ] {
            if self.wizard.is_pending(generation) {
                since.get_or_insert(now);
            } else {
                *since = None;
            }
        }

        match &self.wizard.page {
            Page::Edit { content, .. } => {
                if self.editor.is_none() {
                    self.editor = Some(Editor::new(content));
                }
            }
            _ => self.editor = None,
        }

        if self.wizard.page.step() != page_before {
            self.cursor = 0;
        }
        self.cursor = self.cursor.min(self.list_len().saturating_sub(1));
        true
    }

    /// Complete simulated generations once their delay has passed.
    ///
    /// A rejected completion stops its timer instead of retrying.
    pub fn tick(&mut self) {
        if self
            .ideas_since
            .is_some_and(|since| since.elapsed() >= self.ideas_delay)
            && !self.dispatch(Event::IdeasReady)
        {
            self.ideas_since = None;
        }
        if self
            .posts_since
            .is_some_and(|since| since.elapsed() >= self.posts_delay)
            && !self.dispatch(Event::PostsReady)
        {
            self.posts_since = None;
        }
    }

    /// Number of selectable rows on the current page.
    pub fn list_len(&self) -> usize {
        match self.wizard.page {
            Page::Brainstorm => self.wizard.ideas.len(),
            Page::Generate if self.wizard.generated_posts.is_empty() => {
                self.catalog.post_types.len()
            }
            Page::Generate => self.wizard.generated_posts.len(),
            Page::Edit { .. } => 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        self.status = None;

        match self.wizard.page {
            Page::Brainstorm => self.brainstorm_key(key),
            Page::Generate => self.generate_key(key),
            Page::Edit { .. } => self.edit_key(key),
        }
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1) % len
        } else if self.cursor == 0 {
            len - 1
        } else {
            self.cursor - 1
        };
    }

    fn brainstorm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => self.move_cursor(false),
            KeyCode::Down => self.move_cursor(true),
            KeyCode::F(n @ 1..=4) => {
                self.dispatch(Event::QuickStart(usize::from(n) - 1));
            }
            KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(Event::RequestIdeas);
            }
            KeyCode::Enter if self.wizard.ideas.is_empty() => {
                self.dispatch(Event::RequestIdeas);
            }
            KeyCode::Enter => {
                self.dispatch(Event::ChooseIdea(self.cursor));
            }
            KeyCode::Tab => {
                self.dispatch(Event::Continue);
            }
            KeyCode::Backspace => {
                let mut input = self.wizard.brainstorm_input.clone();
                input.pop();
                self.dispatch(Event::SetInput(input));
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut input = self.wizard.brainstorm_input.clone();
                input.push(c);
                self.dispatch(Event::SetInput(input));
            }
            _ => {}
        }
    }

    fn generate_key(&mut self, key: KeyEvent) {
        let has_posts = !self.wizard.generated_posts.is_empty();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') => {
                self.dispatch(Event::BackToBrainstorm);
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(true),
            KeyCode::Char(' ') if !has_posts => {
                if let Some(post_type) = self.catalog.post_types.get(self.cursor) {
                    let id = post_type.id.clone();
                    self.dispatch(Event::TogglePostType(id));
                }
            }
            KeyCode::Enter if !has_posts => {
                self.dispatch(Event::RequestPosts);
            }
            KeyCode::Enter | KeyCode::Char('e') if has_posts => {
                if let Some(post) = self.wizard.generated_posts.get(self.cursor) {
                    let id = post.id.clone();
                    self.dispatch(Event::EditPost(id));
                }
            }
            KeyCode::Char('y') if has_posts => {
                if let Some(post) = self.wizard.generated_posts.get(self.cursor) {
                    self.copied.push(post.caption.clone());
                    self.status = Some("Post copied to clipboard!".to_string());
                }
            }
            KeyCode::Char('n') if has_posts => {
                self.dispatch(Event::NewPosts);
            }
            _ => {}
        }
    }

    fn edit_key(&mut self, key: KeyEvent) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };

        if let Some(index) = editor.emoji_picker {
            match key.code {
                KeyCode::Esc => editor.emoji_picker = None,
                KeyCode::Left => {
                    editor.emoji_picker =
                        Some((index + EMOJI_PALETTE.len() - 1) % EMOJI_PALETTE.len())
                }
                KeyCode::Right => editor.emoji_picker = Some((index + 1) % EMOJI_PALETTE.len()),
                KeyCode::Enter => {
                    let range = editor.doc.selection();
                    self.status = editor.apply(Cmd::InsertText {
                        range,
                        text: EMOJI_PALETTE[index].to_string(),
                    });
                    editor.emoji_picker = None;
                }
                _ => {}
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Esc => {
                self.dispatch(Event::BackFromEditor);
            }
            KeyCode::Char('s') if ctrl => {
                let content = editor.doc.text();
                if self.dispatch(Event::SavePost(content)) {
                    self.status = Some("Changes saved!".to_string());
                }
            }
            KeyCode::Char('y') if ctrl => {
                self.copied.push(editor.doc.text());
                self.status = Some("Post copied to clipboard!".to_string());
            }
            KeyCode::Char('b') if ctrl => {
                let range = editor.doc.selection();
                self.status = editor.apply(Cmd::ToggleBold { range });
            }
            KeyCode::Char('e') if ctrl => editor.emoji_picker = Some(0),
            KeyCode::Left => editor.move_head(editor.head.saturating_sub(1), shift),
            KeyCode::Right => editor.move_head(editor.head + 1, shift),
            KeyCode::Home => editor.move_head(0, shift),
            KeyCode::End => editor.move_head(editor.doc.len(), shift),
            KeyCode::Backspace => {
                let range = editor.doc.selection();
                self.status = editor.apply(Cmd::DeleteBackward { range });
            }
            KeyCode::Enter => {
                let range = editor.doc.selection();
                self.status = editor.apply(Cmd::InsertText {
                    range,
                    text: "\n".to_string(),
                });
            }
            KeyCode::Char(c) if !ctrl => {
                let range = editor.doc.selection();
                self.status = editor.apply(Cmd::InsertText {
                    range,
                    text: c.to_string(),
                });
            }
            _ => {}
        }
    }
}
