use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::repository::RepositoryError;
use crate::session::Session;

use super::forms::{ConfirmRecipeDelete, LineInput, RecipeForm};
use super::helpers::{centered_rect, chat_lines, hint_line, ingredient_lines, instruction_lines};
use super::screens::{CatalogScreen, ChatScreen, DetailTab};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows moved by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// High-level navigation states.
enum Screen {
    Catalog,
    Chat,
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    Searching(LineInput),
    AddingRecipe(RecipeForm),
    EditingRecipe { original: String, form: RecipeForm },
    ConfirmDelete(ConfirmRecipeDelete),
    Asking(LineInput),
    /// A prompt waiting for the terminal loop to draw once before the
    /// blocking assistant call runs.
    Thinking(String),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    session: Session,
    catalog: CatalogScreen,
    chat: ChatScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(session: Session) -> Self {
        let catalog = CatalogScreen::new(&session);
        Self {
            session,
            catalog,
            chat: ChatScreen::default(),
            screen: Screen::Catalog,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Route one key press through the active mode. Returns true when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching(input) => self.handle_search(code, input),
            Mode::AddingRecipe(form) => self.handle_add_recipe(code, form),
            Mode::EditingRecipe { original, form } => {
                self.handle_edit_recipe(code, original, form)
            }
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Asking(input) => self.handle_ask(code, input),
            Mode::Thinking(prompt) => Mode::Thinking(prompt),
        };

        exit
    }

    /// Ctrl+S saves whichever recipe form is open.
    pub fn handle_ctrl_s(&mut self) {
        let mode = mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::AddingRecipe(form) => self.submit_new_recipe(form),
            Mode::EditingRecipe { original, form } => self.submit_edit(original, form),
            other => other,
        };
    }

    pub fn has_pending_request(&self) -> bool {
        matches!(self.mode, Mode::Thinking(_))
    }

    /// Run the assistant call queued by the prompt. Blocks until a reply (or
    /// an error message standing in for one) is available.
    pub fn run_pending_request(&mut self) {
        let prompt = match mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Thinking(prompt) => prompt,
            other => {
                self.mode = other;
                return;
            }
        };

        if self.session.ask(&prompt).is_some() {
            self.chat.scroll = 0;
            self.screen = Screen::Chat;
            self.set_status("Assistant replied.", StatusKind::Info);
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match self.screen {
            Screen::Catalog => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc => {
                    if self.catalog.filter.is_some() {
                        self.catalog.set_filter(&self.session, None);
                        self.set_status("Search cleared.", StatusKind::Info);
                    } else {
                        *exit = true;
                    }
                }
                KeyCode::Up => self.catalog.move_selection(-1),
                KeyCode::Down => self.catalog.move_selection(1),
                KeyCode::PageUp => self.catalog.move_selection(-PAGE_STEP),
                KeyCode::PageDown => self.catalog.move_selection(PAGE_STEP),
                KeyCode::Home => self.catalog.select_first(),
                KeyCode::End => self.catalog.select_last(),
                KeyCode::Tab | KeyCode::BackTab => self.catalog.tab = self.catalog.tab.toggle(),
                KeyCode::Enter => self.open_selected(),
                KeyCode::Char('/') | KeyCode::Char('f') => {
                    self.clear_status();
                    let query = self.catalog.filter.clone().unwrap_or_default();
                    return Mode::Searching(LineInput::with_text(query));
                }
                KeyCode::Char('+') | KeyCode::Char('a') => {
                    self.clear_status();
                    return Mode::AddingRecipe(RecipeForm::default());
                }
                KeyCode::Char('e') | KeyCode::Char('E') => {
                    if let Some(recipe) = self.selected_recipe() {
                        let form = RecipeForm::from_recipe(recipe);
                        let original = recipe.name.clone();
                        self.clear_status();
                        return Mode::EditingRecipe { original, form };
                    }
                    self.set_status("No recipe selected to edit.", StatusKind::Error);
                }
                KeyCode::Char('-') | KeyCode::Char('d') => {
                    if let Some(recipe) = self.selected_recipe() {
                        let confirm = ConfirmRecipeDelete::from(recipe);
                        self.clear_status();
                        return Mode::ConfirmDelete(confirm);
                    }
                    self.set_status("No recipe selected to delete.", StatusKind::Error);
                }
                KeyCode::Char('?') => {
                    self.clear_status();
                    return Mode::Asking(LineInput::default());
                }
                KeyCode::Char('c') => {
                    self.clear_status();
                    self.screen = Screen::Chat;
                }
                _ => {}
            },
            Screen::Chat => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc | KeyCode::Char('c') => {
                    self.clear_status();
                    self.screen = Screen::Catalog;
                }
                KeyCode::Up => self.chat.scroll_by(-1),
                KeyCode::Down => self.chat.scroll_by(1),
                KeyCode::PageUp => self.chat.scroll_by(-10),
                KeyCode::PageDown => self.chat.scroll_by(10),
                KeyCode::Home => self.chat.scroll = 0,
                KeyCode::Char('?') => {
                    self.clear_status();
                    return Mode::Asking(LineInput::default());
                }
                _ => {}
            },
        }
        Mode::Normal
    }

    fn handle_search(&mut self, code: KeyCode, mut input: LineInput) -> Mode {
        match code {
            KeyCode::Esc => {
                self.catalog.set_filter(&self.session, None);
                return Mode::Normal;
            }
            KeyCode::Enter => {
                if self.catalog.names.is_empty() {
                    self.set_status("No recipes match your search.", StatusKind::Error);
                } else if self.catalog.exact {
                    self.set_status("Exact match found.", StatusKind::Info);
                }
                return Mode::Normal;
            }
            KeyCode::Up => {
                self.catalog.move_selection(-1);
                return Mode::Searching(input);
            }
            KeyCode::Down => {
                self.catalog.move_selection(1);
                return Mode::Searching(input);
            }
            KeyCode::Backspace => input.backspace(),
            KeyCode::Char(ch) => {
                input.push_char(ch);
            }
            _ => return Mode::Searching(input),
        }

        self.catalog
            .set_filter(&self.session, Some(input.text.clone()));
        Mode::Searching(input)
    }

    fn handle_add_recipe(&mut self, code: KeyCode, mut form: RecipeForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add recipe cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            _ => edit_form(&mut form, code),
        }
        Mode::AddingRecipe(form)
    }

    fn handle_edit_recipe(&mut self, code: KeyCode, original: String, mut form: RecipeForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            _ => edit_form(&mut form, code),
        }
        Mode::EditingRecipe { original, form }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmRecipeDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let result = self.session.delete(&confirm.name);
                self.catalog.refresh(&self.session);
                match result {
                    Ok(_) => self.set_status(
                        format!("Deleted '{}'.", confirm.name),
                        StatusKind::Info,
                    ),
                    Err(err) => self.set_status(err.to_string(), StatusKind::Error),
                }
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_ask(&mut self, code: KeyCode, mut input: LineInput) -> Mode {
        match code {
            KeyCode::Esc => Mode::Normal,
            KeyCode::Enter => {
                if input.text.trim().is_empty() {
                    self.set_status("Type a dish name or a question first.", StatusKind::Error);
                    Mode::Asking(input)
                } else {
                    self.set_status("Assistant is thinking...", StatusKind::Info);
                    Mode::Thinking(input.text)
                }
            }
            KeyCode::Backspace => {
                input.backspace();
                Mode::Asking(input)
            }
            KeyCode::Char(ch) => {
                input.push_char(ch);
                Mode::Asking(input)
            }
            _ => Mode::Asking(input),
        }
    }

    fn submit_new_recipe(&mut self, mut form: RecipeForm) -> Mode {
        let recipe = form.to_recipe();
        let name = recipe.name.clone();
        let result = self.session.create(recipe);
        match self.after_save(result, &name, "Recipe added.") {
            Ok(()) => Mode::Normal,
            Err(message) => {
                form.error = Some(message);
                Mode::AddingRecipe(form)
            }
        }
    }

    fn submit_edit(&mut self, original: String, mut form: RecipeForm) -> Mode {
        let recipe = form.to_recipe();
        let name = recipe.name.clone();
        let result = self.session.update(&original, recipe);
        match self.after_save(result, &name, "Recipe updated.") {
            Ok(()) => Mode::Normal,
            Err(message) => {
                form.error = Some(message);
                Mode::EditingRecipe { original, form }
            }
        }
    }

    /// Refresh the list after a save attempt. A rejected save keeps the form
    /// open with the message; a save that only failed to reach disk closes it
    /// because the catalog already changed.
    fn after_save(
        &mut self,
        result: Result<(), RepositoryError>,
        name: &str,
        success: &str,
    ) -> Result<(), String> {
        match result {
            Ok(()) => {
                self.refresh_and_focus(name);
                self.set_status(success, StatusKind::Info);
                Ok(())
            }
            Err(err @ RepositoryError::PersistenceFailure(_)) => {
                self.refresh_and_focus(name);
                self.set_status(err.to_string(), StatusKind::Error);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                self.set_status(message.clone(), StatusKind::Error);
                Err(message)
            }
        }
    }

    fn refresh_and_focus(&mut self, name: &str) {
        self.catalog.refresh(&self.session);
        if !self.catalog.names.iter().any(|entry| entry == name) {
            self.catalog.set_filter(&self.session, None);
        }
        self.catalog.focus(name);
    }

    fn open_selected(&mut self) {
        let Some(name) = self.catalog.current_name().map(str::to_string) else {
            self.set_status("No recipe selected.", StatusKind::Error);
            return;
        };
        if self.session.view(&name).is_some() {
            self.set_status(format!("Viewing '{name}'."), StatusKind::Info);
        }
    }

    fn selected_recipe(&self) -> Option<&crate::models::Recipe> {
        self.catalog
            .current_name()
            .and_then(|name| self.session.repository().search(name))
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.screen {
            Screen::Catalog => self.draw_catalog(frame, content_area),
            Screen::Chat => self.draw_chat(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Normal => {}
            Mode::Searching(input) => self.draw_input_bar(frame, area, "Search", input),
            Mode::AddingRecipe(form) => self.draw_recipe_form(frame, area, "Add Recipe", form),
            Mode::EditingRecipe { form, .. } => {
                self.draw_recipe_form(frame, area, "Edit Recipe", form)
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Asking(input) => self.draw_input_bar(frame, area, "Ask the assistant", input),
            Mode::Thinking(prompt) => self.draw_thinking(frame, area, prompt),
        }
    }

    fn draw_catalog(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area);

        let recent = self.session.recently_viewed();
        let recent_height = if recent.is_empty() {
            0
        } else {
            recent.len() as u16 + 2
        };
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(recent_height)])
            .split(columns[0]);

        self.draw_recipe_list(frame, left[0]);
        if !recent.is_empty() {
            let items: Vec<ListItem> = recent
                .iter_recent_first()
                .map(|name| ListItem::new(format!("- {name}")))
                .collect();
            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Recently Viewed"),
            );
            frame.render_widget(list, left[1]);
        }

        self.draw_detail(frame, columns[1]);
    }

    fn draw_recipe_list(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.catalog.filter {
            Some(query) if self.catalog.exact => format!("Recipes: '{query}' (exact)"),
            Some(query) => format!("Recipes matching '{query}'"),
            None => format!("Your Recipes ({})", self.session.recipes().len()),
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.catalog.names.is_empty() {
            let message = if self.catalog.filter.is_some() {
                "No recipes found."
            } else {
                "No recipes yet. Press '+' to add your first recipe."
            };
            let paragraph = Paragraph::new(message)
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self
            .catalog
            .names
            .iter()
            .map(|name| ListItem::new(name.clone()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(Some(self.catalog.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(recipe) = self.selected_recipe() else {
            let paragraph = Paragraph::new("Select a recipe from the left, or press '+' to add one.")
                .block(Block::default().borders(Borders::ALL).title("Recipe Details"))
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        };

        let active = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let inactive = Style::default().fg(Color::DarkGray);
        let (ingredients_style, instructions_style) = match self.catalog.tab {
            DetailTab::Ingredients => (active, inactive),
            DetailTab::Instructions => (inactive, active),
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(" Ingredients ", ingredients_style),
                Span::raw("|"),
                Span::styled(" Instructions ", instructions_style),
            ]),
            Line::from(""),
        ];
        lines.extend(match self.catalog.tab {
            DetailTab::Ingredients => ingredient_lines(&recipe.ingredients),
            DetailTab::Instructions => instruction_lines(&recipe.instructions),
        });

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(recipe.name.clone()),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_chat(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(chat_lines(self.session.chat_log()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Ask the Assistant for a Recipe"),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.chat.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.screen, &self.mode) {
            (_, Mode::Searching(_)) => hint_line(&[
                ("↑↓", "Navigate"),
                ("Enter", "Keep results"),
                ("Esc", "Clear search"),
            ]),
            (_, Mode::AddingRecipe(_)) | (_, Mode::EditingRecipe { .. }) => hint_line(&[
                ("Tab", "Next field"),
                ("Enter", "New line"),
                ("Ctrl+S", "Save"),
                ("Esc", "Cancel"),
            ]),
            (_, Mode::ConfirmDelete(_)) => hint_line(&[("Y", "Delete"), ("N/Esc", "Keep")]),
            (_, Mode::Asking(_)) => hint_line(&[("Enter", "Ask"), ("Esc", "Cancel")]),
            (_, Mode::Thinking(_)) => Line::from("Waiting for the assistant..."),
            (Screen::Chat, Mode::Normal) => hint_line(&[
                ("↑↓", "Scroll"),
                ("?", "Ask"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ]),
            (Screen::Catalog, Mode::Normal) => hint_line(&[
                ("↑↓", "Navigate"),
                ("Enter", "View"),
                ("Tab", "Ingredients/Steps"),
                ("/", "Search"),
                ("+", "Add"),
                ("e", "Edit"),
                ("-", "Delete"),
                ("?", "Ask AI"),
                ("c", "Chat"),
                ("q", "Quit"),
            ]),
        }
    }

    fn draw_input_bar(&self, frame: &mut Frame, area: Rect, title: &str, input: &LineInput) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        let paragraph = Paragraph::new(Span::raw(format!("> {}", input.text))).block(block.clone());
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + 2 + input.len() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }

    fn draw_recipe_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &RecipeForm) {
        let popup_area = centered_rect(70, 70, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let (mut lines, (cursor_x, cursor_y)) = form.render();
        lines.push(Line::from(""));
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Ctrl+S to save • Tab to switch field • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        if cursor_y < inner.height {
            frame.set_cursor_position((
                (inner.x + cursor_x).min(inner.right().saturating_sub(1)),
                inner.y + cursor_y,
            ));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmRecipeDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete '{}'?", confirm.name)),
            Line::from("This cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_thinking(&self, frame: &mut Frame, area: Rect, prompt: &str) {
        let popup_area = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup_area);

        let paragraph = Paragraph::new(vec![
            Line::from("The assistant is thinking..."),
            Line::from(Span::styled(
                prompt.to_string(),
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Please wait"))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Shared key handling for the add and edit forms.
fn edit_form(form: &mut RecipeForm, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Enter => form.newline(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(ch) => {
            if form.push_char(ch) {
                form.error = None;
            }
        }
        _ => {}
    }
}
