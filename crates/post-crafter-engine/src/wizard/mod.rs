//! The three-step drafting flow: brainstorm an idea, pick post types and
//! generate variants, then edit one of them.
//!
//! All session state lives in [`Wizard`], a plain serializable value.
//! Front ends never mutate it directly; they feed [`Event`]s through
//! [`Wizard::transition`] and render whatever comes back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, GeneratedPost};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    #[default]
    Brainstorm,
    Generate,
    /// Editing a copy of one generated post's caption.
    Edit {
        post_id: String,
        content: String,
    },
}

impl Page {
    pub fn name(&self) -> &'static str {
        match self {
            Page::Brainstorm => "brainstorm",
            Page::Generate => "generate",
            Page::Edit { .. } => "edit",
        }
    }

    /// 1-based wizard step, for progress indicators.
    pub fn step(&self) -> usize {
        match self {
            Page::Brainstorm => 1,
            Page::Generate => 2,
            Page::Edit { .. } => 3,
        }
    }
}

/// Generation that has been requested and is waiting for its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pending {
    Ideas,
    Posts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SetInput(String),
    QuickStart(usize),
    RequestIdeas,
    IdeasReady,
    /// Pick one of the generated ideas and move on to post generation.
    ChooseIdea(usize),
    Continue,
    EditIdea(String),
    TogglePostType(String),
    RequestPosts,
    PostsReady,
    /// Discard generated posts and the post type selection.
    NewPosts,
    BackToBrainstorm,
    EditPost(String),
    SavePost(String),
    BackFromEditor,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SetInput(_) => "set_input",
            Event::QuickStart(_) => "quick_start",
            Event::RequestIdeas => "request_ideas",
            Event::IdeasReady => "ideas_ready",
            Event::ChooseIdea(_) => "choose_idea",
            Event::Continue => "continue",
            Event::EditIdea(_) => "edit_idea",
            Event::TogglePostType(_) => "toggle_post_type",
            Event::RequestPosts => "request_posts",
            Event::PostsReady => "posts_ready",
            Event::NewPosts => "new_posts",
            Event::BackToBrainstorm => "back_to_brainstorm",
            Event::EditPost(_) => "edit_post",
            Event::SavePost(_) => "save_post",
            Event::BackFromEditor => "back_from_editor",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("{event} is not available on the {page} page")]
    NotAvailable {
        event: &'static str,
        page: &'static str,
    },

    #[error("Enter a topic before generating ideas")]
    EmptyInput,

    #[error("A generation is already in progress")]
    AlreadyGenerating,

    #[error("Nothing is being generated")]
    NothingPending,

    #[error("No quick start prompt at position {0}")]
    UnknownQuickStart(usize),

    #[error("No idea at position {0}")]
    UnknownIdea(usize),

    #[error("Select an idea first")]
    NoIdeaSelected,

    #[error("Select at least one post type")]
    NoPostTypesSelected,

    #[error("Unknown post type '{0}'")]
    UnknownPostType(String),

    #[error("Unknown post '{0}'")]
    UnknownPost(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Complete session state of the drafting flow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wizard {
    pub page: Page,
    pub brainstorm_input: String,
    pub ideas: Vec<String>,
    pub selected_idea: Option<String>,
    /// Post type ids in the order they were ticked.
    pub selected_post_types: Vec<String>,
    pub generated_posts: Vec<GeneratedPost>,
    /// Idea and post generation run independently of each other.
    pub pending: BTreeSet<Pending>,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, id: &str) -> Option<&GeneratedPost> {
        self.generated_posts.iter().find(|post| post.id == id)
    }

    pub fn is_post_type_selected(&self, id: &str) -> bool {
        self.selected_post_types.iter().any(|selected| selected == id)
    }

    pub fn is_pending(&self, generation: Pending) -> bool {
        self.pending.contains(&generation)
    }

    pub fn can_request_ideas(&self) -> bool {
        !self.is_pending(Pending::Ideas) && !self.brainstorm_input.trim().is_empty()
    }

    pub fn can_request_posts(&self) -> bool {
        !self.is_pending(Pending::Posts)
            && self.selected_idea.as_deref().is_some_and(|idea| !idea.is_empty())
            && !self.selected_post_types.is_empty()
    }

    /// Advance the flow by one event.
    ///
    /// The state is consumed. Keep a clone if it must outlive a failed
    /// transition.
    pub fn transition(mut self, event: Event, catalog: &Catalog) -> Result<Self, WizardError> {
        log::debug!("{} on {} page", event.name(), self.page.name());

        match (&self.page, event) {
            (Page::Brainstorm, Event::SetInput(input)) => {
                self.brainstorm_input = input;
            }
            (Page::Brainstorm, Event::QuickStart(index)) => {
                let quick_start = catalog
                    .quick_start(index)
                    .ok_or(WizardError::UnknownQuickStart(index))?;
                self.brainstorm_input = quick_start.prompt.clone();
            }
            (Page::Brainstorm, Event::RequestIdeas) => {
                if self.is_pending(Pending::Ideas) {
                    return Err(WizardError::AlreadyGenerating);
                }
                if self.brainstorm_input.trim().is_empty() {
                    return Err(WizardError::EmptyInput);
                }
                self.pending.insert(Pending::Ideas);
            }
            // Idea generation finishes even after the user has moved on
            (_, Event::IdeasReady) => {
                if !self.pending.remove(&Pending::Ideas) {
                    return Err(WizardError::NothingPending);
                }
                self.ideas = catalog.ideas.clone();
            }
            (Page::Brainstorm, Event::ChooseIdea(index)) => {
                let idea = self
                    .ideas
                    .get(index)
                    .ok_or(WizardError::UnknownIdea(index))?;
                self.selected_idea = Some(idea.clone());
                self.page = Page::Generate;
            }
            (Page::Brainstorm, Event::Continue) => {
                if self.selected_idea.is_none() {
                    return Err(WizardError::NoIdeaSelected);
                }
                self.page = Page::Generate;
            }
            (Page::Generate, Event::EditIdea(idea)) => {
                self.selected_idea = Some(idea);
            }
            (Page::Generate, Event::TogglePostType(id)) => {
                if catalog.post_type(&id).is_none() {
                    return Err(WizardError::UnknownPostType(id));
                }
                if let Some(position) = self.selected_post_types.iter().position(|s| *s == id) {
                    self.selected_post_types.remove(position);
                } else {
                    self.selected_post_types.push(id);
                }
            }
            (Page::Generate, Event::RequestPosts) => {
                if self.is_pending(Pending::Posts) {
                    return Err(WizardError::AlreadyGenerating);
                }
                if self.selected_idea.as_deref().is_none_or(str::is_empty) {
                    return Err(WizardError::NoIdeaSelected);
                }
                if self.selected_post_types.is_empty() {
                    return Err(WizardError::NoPostTypesSelected);
                }
                self.pending.insert(Pending::Posts);
            }
            (Page::Generate, Event::PostsReady) => {
                if !self.is_pending(Pending::Posts) {
                    return Err(WizardError::NothingPending);
                }
                self.generated_posts = catalog.generate_posts(&self.selected_post_types)?;
                self.pending.remove(&Pending::Posts);
            }
            (Page::Generate, Event::NewPosts) => {
                self.generated_posts.clear();
                self.selected_post_types.clear();
            }
            (Page::Generate, Event::BackToBrainstorm) => {
                self.generated_posts.clear();
                self.pending.remove(&Pending::Posts);
                self.page = Page::Brainstorm;
            }
            (Page::Generate, Event::EditPost(post_id)) => {
                let content = self
                    .post(&post_id)
                    .map(|post| post.caption.clone())
                    .ok_or_else(|| WizardError::UnknownPost(post_id.clone()))?;
                self.page = Page::Edit { post_id, content };
            }
            (Page::Edit { post_id, .. }, Event::SavePost(content)) => {
                let post_id = post_id.clone();
                let post = self
                    .generated_posts
                    .iter_mut()
                    .find(|post| post.id == post_id)
                    .ok_or(WizardError::UnknownPost(post_id))?;
                post.caption = content;
                self.page = Page::Generate;
            }
            (Page::Edit { .. }, Event::BackFromEditor) => {
                self.page = Page::Generate;
            }
            (page, event) => {
                return Err(WizardError::NotAvailable {
                    event: event.name(),
                    page: page.name(),
                });
            }
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn run(catalog: &Catalog, events: Vec<Event>) -> Wizard {
        events
            .into_iter()
            .fold(Wizard::new(), |wizard, event| {
                wizard.transition(event, catalog).unwrap()
            })
    }

    fn on_generate_page(catalog: &Catalog) -> Wizard {
        run(
            catalog,
            vec![
                Event::SetInput("AI adoption".to_string()),
                Event::RequestIdeas,
                Event::IdeasReady,
                Event::ChooseIdea(1),
            ],
        )
    }

    #[test]
    fn test_starts_on_brainstorm() {
        let wizard = Wizard::new();
        assert_eq!(wizard.page, Page::Brainstorm);
        assert_eq!(wizard.page.step(), 1);
        assert!(!wizard.can_request_ideas());
    }

    #[rstest]
    fn test_quick_start_fills_input(catalog: Catalog) {
        let wizard = run(&catalog, vec![Event::QuickStart(2)]);
        assert_eq!(wizard.brainstorm_input, catalog.quick_start[2].prompt);
        assert!(wizard.can_request_ideas());
    }

    #[rstest]
    fn test_unknown_quick_start(catalog: Catalog) {
        let err = Wizard::new()
            .transition(Event::QuickStart(9), &catalog)
            .unwrap_err();
        assert!(matches!(err, WizardError::UnknownQuickStart(9)));
    }

    #[rstest]
    #[case("")]
    #[case("   \n\t")]
    fn test_request_ideas_needs_input(catalog: Catalog, #[case] input: &str) {
        let wizard = run(&catalog, vec![Event::SetInput(input.to_string())]);
        let err = wizard.transition(Event::RequestIdeas, &catalog).unwrap_err();
        assert!(matches!(err, WizardError::EmptyInput));
    }

    #[rstest]
    fn test_ideas_arrive_after_request(catalog: Catalog) {
        let wizard = run(
            &catalog,
            vec![Event::SetInput("topic".to_string()), Event::RequestIdeas],
        );
        assert!(wizard.is_pending(Pending::Ideas));
        assert!(wizard.ideas.is_empty());

        let err = wizard
            .clone()
            .transition(Event::RequestIdeas, &catalog)
            .unwrap_err();
        assert!(matches!(err, WizardError::AlreadyGenerating));

        let wizard = wizard.transition(Event::IdeasReady, &catalog).unwrap();
        assert!(wizard.pending.is_empty());
        assert_eq!(wizard.ideas, catalog.ideas);
    }

    #[rstest]
    fn test_ideas_ready_without_request(catalog: Catalog) {
        let err = Wizard::new()
            .transition(Event::IdeasReady, &catalog)
            .unwrap_err();
        assert!(matches!(err, WizardError::NothingPending));
    }

    #[rstest]
    fn test_regenerating_ideas_does_not_block_posts(catalog: Catalog) {
        let wizard = run(
            &catalog,
            vec![
                Event::SetInput("topic".to_string()),
                Event::RequestIdeas,
                Event::IdeasReady,
                Event::ChooseIdea(0),
                Event::BackToBrainstorm,
                Event::RequestIdeas,
                Event::Continue,
                Event::TogglePostType("1".to_string()),
            ],
        );
        assert_eq!(wizard.page, Page::Generate);
        assert!(wizard.is_pending(Pending::Ideas));
        assert!(wizard.can_request_posts());

        let wizard = run_from(
            wizard,
            &catalog,
            vec![Event::RequestPosts, Event::IdeasReady, Event::PostsReady],
        );
        assert!(wizard.pending.is_empty());
        assert_eq!(wizard.ideas, catalog.ideas);
        assert_eq!(wizard.generated_posts.len(), 5);
    }

    #[rstest]
    fn test_back_to_brainstorm_cancels_post_generation(catalog: Catalog) {
        let wizard = run_from(
            on_generate_page(&catalog),
            &catalog,
            vec![
                Event::TogglePostType("1".to_string()),
                Event::RequestPosts,
                Event::BackToBrainstorm,
            ],
        );
        assert!(!wizard.is_pending(Pending::Posts));

        let err = wizard
            .transition(Event::Continue, &catalog)
            .and_then(|wizard| wizard.transition(Event::PostsReady, &catalog))
            .unwrap_err();
        assert!(matches!(err, WizardError::NothingPending));
    }

    #[rstest]
    fn test_choose_idea_moves_to_generate(catalog: Catalog) {
        let wizard = on_generate_page(&catalog);
        assert_eq!(wizard.page, Page::Generate);
        assert_eq!(wizard.selected_idea.as_deref(), Some(catalog.ideas[1].as_str()));
    }

    #[rstest]
    fn test_continue_requires_selected_idea(catalog: Catalog) {
        let err = Wizard::new()
            .transition(Event::Continue, &catalog)
            .unwrap_err();
        assert!(matches!(err, WizardError::NoIdeaSelected));
    }

    #[rstest]
    fn test_toggle_post_type_keeps_tick_order(catalog: Catalog) {
        let wizard = on_generate_page(&catalog);
        let wizard = ["3", "1", "2", "3"]
            .into_iter()
            .fold(wizard, |wizard, id| {
                wizard
                    .transition(Event::TogglePostType(id.to_string()), &catalog)
                    .unwrap()
            });

        assert_eq!(wizard.selected_post_types, vec!["1", "2"]);
        assert!(wizard.is_post_type_selected("2"));
        assert!(!wizard.is_post_type_selected("3"));
    }

    #[rstest]
    fn test_toggle_unknown_post_type(catalog: Catalog) {
        let err = on_generate_page(&catalog)
            .transition(Event::TogglePostType("99".to_string()), &catalog)
            .unwrap_err();
        assert!(matches!(err, WizardError::UnknownPostType(id) if id == "99"));
    }

    #[rstest]
    fn test_request_posts_needs_post_types(catalog: Catalog) {
        let wizard = on_generate_page(&catalog);
        assert!(!wizard.can_request_posts());
        let err = wizard.transition(Event::RequestPosts, &catalog).unwrap_err();
        assert!(matches!(err, WizardError::NoPostTypesSelected));
    }

    #[rstest]
    fn test_request_posts_needs_idea_text(catalog: Catalog) {
        let wizard = run(
            &catalog,
            vec![
                Event::SetInput("topic".to_string()),
                Event::RequestIdeas,
                Event::IdeasReady,
                Event::ChooseIdea(0),
                Event::EditIdea(String::new()),
                Event::TogglePostType("1".to_string()),
            ],
        );
        let err = wizard.transition(Event::RequestPosts, &catalog).unwrap_err();
        assert!(matches!(err, WizardError::NoIdeaSelected));
    }

    #[rstest]
    fn test_posts_generated_for_selected_types(catalog: Catalog) {
        let wizard = on_generate_page(&catalog);
        let wizard = run_from(
            wizard,
            &catalog,
            vec![
                Event::TogglePostType("4".to_string()),
                Event::TogglePostType("2".to_string()),
                Event::RequestPosts,
            ],
        );
        assert!(wizard.is_pending(Pending::Posts));

        let wizard = wizard.transition(Event::PostsReady, &catalog).unwrap();
        assert_eq!(wizard.generated_posts.len(), 10);
        assert_eq!(wizard.generated_posts[0].id, "4-0");
        assert_eq!(wizard.generated_posts[9].id, "2-4");
        assert!(wizard.pending.is_empty());
    }

    #[rstest]
    fn test_new_posts_clears_posts_and_selection(catalog: Catalog) {
        let wizard = with_posts(&catalog);
        let wizard = wizard.transition(Event::NewPosts, &catalog).unwrap();
        assert!(wizard.generated_posts.is_empty());
        assert!(wizard.selected_post_types.is_empty());
        assert_eq!(wizard.page, Page::Generate);
    }

    #[rstest]
    fn test_back_to_brainstorm_keeps_ideas(catalog: Catalog) {
        let wizard = with_posts(&catalog);
        let wizard = wizard
            .transition(Event::BackToBrainstorm, &catalog)
            .unwrap();

        assert_eq!(wizard.page, Page::Brainstorm);
        assert!(wizard.generated_posts.is_empty());
        assert_eq!(wizard.ideas.len(), 5);
        assert!(wizard.selected_idea.is_some());

        let wizard = wizard.transition(Event::Continue, &catalog).unwrap();
        assert_eq!(wizard.page, Page::Generate);
    }

    #[rstest]
    fn test_edit_and_save_replaces_one_caption(catalog: Catalog) {
        let wizard = with_posts(&catalog);
        let wizard = wizard
            .transition(Event::EditPost("1-2".to_string()), &catalog)
            .unwrap();

        assert_eq!(
            wizard.page,
            Page::Edit {
                post_id: "1-2".to_string(),
                content: catalog.post_types[0].captions[2].clone(),
            }
        );
        assert_eq!(wizard.page.step(), 3);

        let wizard = wizard
            .transition(Event::SavePost("edited".to_string()), &catalog)
            .unwrap();

        assert_eq!(wizard.page, Page::Generate);
        assert_eq!(wizard.post("1-2").unwrap().caption, "edited");
        assert_eq!(
            wizard.post("1-1").unwrap().caption,
            catalog.post_types[0].captions[1]
        );
    }

    #[rstest]
    fn test_back_from_editor_discards_changes(catalog: Catalog) {
        let wizard = with_posts(&catalog);
        let wizard = run_from(
            wizard,
            &catalog,
            vec![Event::EditPost("1-0".to_string()), Event::BackFromEditor],
        );

        assert_eq!(wizard.page, Page::Generate);
        assert_eq!(
            wizard.post("1-0").unwrap().caption,
            catalog.post_types[0].captions[0]
        );
    }

    #[rstest]
    fn test_edit_unknown_post(catalog: Catalog) {
        let err = with_posts(&catalog)
            .transition(Event::EditPost("7-7".to_string()), &catalog)
            .unwrap_err();
        assert!(matches!(err, WizardError::UnknownPost(id) if id == "7-7"));
    }

    #[rstest]
    #[case(Event::SavePost("x".to_string()), "save_post", "brainstorm")]
    #[case(Event::TogglePostType("1".to_string()), "toggle_post_type", "brainstorm")]
    #[case(Event::BackFromEditor, "back_from_editor", "brainstorm")]
    fn test_events_outside_their_page(
        catalog: Catalog,
        #[case] event: Event,
        #[case] expected_event: &str,
        #[case] expected_page: &str,
    ) {
        let err = Wizard::new().transition(event, &catalog).unwrap_err();
        match err {
            WizardError::NotAvailable { event, page } => {
                assert_eq!(event, expected_event);
                assert_eq!(page, expected_page);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn test_state_survives_serde_round_trip(catalog: Catalog) {
        let wizard = with_posts(&catalog)
            .transition(Event::EditPost("1-3".to_string()), &catalog)
            .unwrap();

        let json = serde_json::to_string(&wizard).unwrap();
        assert!(json.contains(r#""page":"edit""#));
        let restored: Wizard = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, wizard);
    }

    fn run_from(wizard: Wizard, catalog: &Catalog, events: Vec<Event>) -> Wizard {
        events.into_iter().fold(wizard, |wizard, event| {
            wizard.transition(event, catalog).unwrap()
        })
    }

    fn with_posts(catalog: &Catalog) -> Wizard {
        run_from(
            on_generate_page(catalog),
            catalog,
            vec![
                Event::TogglePostType("1".to_string()),
                Event::RequestPosts,
                Event::PostsReady,
            ],
        )
    }
}
