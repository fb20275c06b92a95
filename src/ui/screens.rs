use crate::models::name_key;
use crate::session::Session;

/// Which list the detail pane shows for the selected recipe.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum DetailTab {
    #[default]
    Ingredients,
    Instructions,
}

impl DetailTab {
    pub(crate) fn toggle(self) -> Self {
        match self {
            DetailTab::Ingredients => DetailTab::Instructions,
            DetailTab::Instructions => DetailTab::Ingredients,
        }
    }
}

/// Recipe list plus the active search filter. The list keeps names only and
/// is recomputed from the session after every change.
#[derive(Default)]
pub(crate) struct CatalogScreen {
    pub(crate) names: Vec<String>,
    pub(crate) filter: Option<String>,
    pub(crate) exact: bool,
    pub(crate) selected: usize,
    pub(crate) tab: DetailTab,
}

impl CatalogScreen {
    pub(crate) fn new(session: &Session) -> Self {
        let mut screen = Self::default();
        screen.refresh(session);
        screen
    }

    /// Re-run the current filter against the session.
    pub(crate) fn refresh(&mut self, session: &Session) {
        let query = self.filter.as_deref().unwrap_or("");
        let results = session.search(query);
        self.exact = results.exact;
        self.names = results
            .recipes
            .iter()
            .map(|recipe| recipe.name.clone())
            .collect();
        self.ensure_in_bounds();
    }

    pub(crate) fn set_filter(&mut self, session: &Session, filter: Option<String>) {
        self.filter = filter.filter(|query| !query.trim().is_empty());
        self.selected = 0;
        self.refresh(session);
    }

    /// Move the selection onto `name` if it is visible.
    pub(crate) fn focus(&mut self, name: &str) {
        let key = name_key(name);
        if let Some(idx) = self.names.iter().position(|entry| name_key(entry) == key) {
            self.selected = idx;
        }
    }

    pub(crate) fn current_name(&self) -> Option<&str> {
        self.names.get(self.selected).map(String::as_str)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.names.is_empty() {
            return;
        }
        let last = self.names.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.names.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.names.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.names.len() {
            self.selected = self.names.len() - 1;
        }
    }
}

/// Scroll position for the assistant conversation.
#[derive(Default)]
pub(crate) struct ChatScreen {
    pub(crate) scroll: u16,
}

impl ChatScreen {
    pub(crate) fn scroll_by(&mut self, delta: i32) {
        self.scroll = (self.scroll as i32 + delta).clamp(0, u16::MAX as i32) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::Unconfigured;
    use crate::models::Recipe;
    use crate::store::MemoryStore;

    fn session() -> Session {
        let recipes = ["Pasta", "Green Tea", "Tea", "Iced Tea"]
            .iter()
            .map(|name| Recipe::new(*name, Vec::<String>::new(), Vec::<String>::new()))
            .collect();
        Session::open(
            Box::new(MemoryStore::with_recipes(recipes)),
            Box::new(Unconfigured),
        )
    }

    #[test]
    fn test_filter_prefers_exact_match() {
        let session = session();
        let mut screen = CatalogScreen::new(&session);
        assert_eq!(screen.names.len(), 4);

        screen.set_filter(&session, Some("TEA".into()));
        assert!(screen.exact);
        assert_eq!(screen.names, vec!["Tea"]);

        screen.set_filter(&session, Some("te".into()));
        assert!(!screen.exact);
        assert_eq!(screen.names, vec!["Green Tea", "Tea", "Iced Tea"]);

        screen.set_filter(&session, Some("  ".into()));
        assert_eq!(screen.filter, None);
        assert_eq!(screen.names.len(), 4);
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let session = session();
        let mut screen = CatalogScreen::new(&session);

        screen.move_selection(10);
        assert_eq!(screen.current_name(), Some("Iced Tea"));
        screen.move_selection(-10);
        assert_eq!(screen.current_name(), Some("Pasta"));

        screen.select_last();
        screen.set_filter(&session, Some("pasta".into()));
        assert_eq!(screen.current_name(), Some("Pasta"));

        screen.set_filter(&session, Some("curry".into()));
        assert_eq!(screen.current_name(), None);
        screen.move_selection(1);
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn test_focus_finds_name_case_insensitively() {
        let session = session();
        let mut screen = CatalogScreen::new(&session);
        screen.focus("green tea");
        assert_eq!(screen.current_name(), Some("Green Tea"));
    }

    #[test]
    fn test_chat_scroll_saturates() {
        let mut chat = ChatScreen::default();
        chat.scroll_by(-3);
        assert_eq!(chat.scroll, 0);
        chat.scroll_by(4);
        assert_eq!(chat.scroll, 4);
    }
}
