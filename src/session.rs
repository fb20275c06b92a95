//! Everything one interactive user works with between start and exit: the
//! repository, the recently viewed list, and the assistant conversation.

use log::info;

use crate::assistant::{self, Assistant};
use crate::history::RecentlyViewed;
use crate::models::{name_key, Recipe};
use crate::repository::{RecipeRepository, RepositoryError};
use crate::store::RecipeStore;

/// One prompt sent to the assistant and the text shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub prompt: String,
    pub reply: String,
}

/// Recipes matching a search, in collection order.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchResults<'a> {
    /// True when the index found an exact name match.
    pub exact: bool,
    pub recipes: Vec<&'a Recipe>,
}

pub struct Session {
    repository: RecipeRepository,
    recently_viewed: RecentlyViewed,
    chat_log: Vec<ChatExchange>,
    assistant: Box<dyn Assistant>,
}

impl Session {
    /// Start a session over whatever `store` holds.
    pub fn open(store: Box<dyn RecipeStore>, assistant: Box<dyn Assistant>) -> Self {
        Self::with_repository(RecipeRepository::open(store), assistant)
    }

    pub fn with_repository(repository: RecipeRepository, assistant: Box<dyn Assistant>) -> Self {
        Self {
            repository,
            recently_viewed: RecentlyViewed::new(),
            chat_log: Vec::new(),
            assistant,
        }
    }

    pub fn repository(&self) -> &RecipeRepository {
        &self.repository
    }

    pub fn recipes(&self) -> &[Recipe] {
        self.repository.recipes()
    }

    pub fn recently_viewed(&self) -> &RecentlyViewed {
        &self.recently_viewed
    }

    pub fn chat_log(&self) -> &[ChatExchange] {
        &self.chat_log
    }

    /// Blank queries list everything. Otherwise an exact index hit wins, and
    /// a miss falls back to a case-insensitive substring scan over names.
    pub fn search(&self, query: &str) -> SearchResults<'_> {
        let query = query.trim();
        if query.is_empty() {
            return SearchResults {
                exact: false,
                recipes: self.repository.recipes().iter().collect(),
            };
        }

        if let Some(recipe) = self.repository.search(query) {
            return SearchResults {
                exact: true,
                recipes: vec![recipe],
            };
        }

        let needle = name_key(query);
        SearchResults {
            exact: false,
            recipes: self
                .repository
                .recipes()
                .iter()
                .filter(|recipe| recipe.key().contains(&needle))
                .collect(),
        }
    }

    /// Resolve `name` and remember it as the most recent view.
    pub fn view(&mut self, name: &str) -> Option<&Recipe> {
        let recipe = self.repository.search(name)?;
        self.recently_viewed.record(&recipe.name);
        Some(recipe)
    }

    pub fn create(&mut self, recipe: Recipe) -> Result<(), RepositoryError> {
        self.repository.create(recipe)
    }

    /// Update `old_name`. The recently viewed entry follows a rename, even
    /// when only saving to disk failed.
    pub fn update(&mut self, old_name: &str, recipe: Recipe) -> Result<(), RepositoryError> {
        let new_name = recipe.name.trim().to_string();
        let result = self.repository.update(old_name, recipe);
        if matches!(result, Ok(()) | Err(RepositoryError::PersistenceFailure(_))) {
            self.recently_viewed.rename(old_name, &new_name);
        }
        result
    }

    pub fn delete(&mut self, name: &str) -> Result<bool, RepositoryError> {
        let result = self.repository.delete(name);
        if self.repository.get(name).is_none() {
            self.recently_viewed.remove(name);
        }
        result
    }

    /// Send `prompt` to the assistant and log the exchange. Blank prompts are
    /// ignored.
    pub fn ask(&mut self, prompt: &str) -> Option<&ChatExchange> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }

        info!("asking assistant");
        let reply = assistant::respond(self.assistant.as_ref(), prompt);
        self.chat_log.push(ChatExchange {
            prompt: prompt.to_string(),
            reply,
        });
        self.chat_log.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{AssistantError, Unconfigured};
    use crate::store::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Echo {
        prompts: Rc<RefCell<Vec<String>>>,
    }

    impl Assistant for Echo {
        fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(format!("recipe for {prompt}"))
        }
    }

    fn recipe(name: &str) -> Recipe {
        Recipe::new(name, ["salt"], ["Cook"])
    }

    fn session_with(names: &[&str]) -> (Session, Rc<MemoryStore>) {
        let store = Rc::new(MemoryStore::with_recipes(
            names.iter().map(|name| recipe(name)).collect(),
        ));
        let session = Session::open(Box::new(Rc::clone(&store)), Box::new(Unconfigured));
        (session, store)
    }

    fn names<'a>(results: &SearchResults<'a>) -> Vec<&'a str> {
        results.recipes.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_blank_search_lists_everything() {
        let (session, _) = session_with(&["Pasta", "Tea"]);
        let results = session.search("   ");

        assert!(!results.exact);
        assert_eq!(names(&results), vec!["Pasta", "Tea"]);
    }

    #[test]
    fn test_exact_search_uses_index() {
        let (session, _) = session_with(&["Green Tea", "Tea", "Iced Tea"]);
        let results = session.search(" tea ");

        assert!(results.exact);
        assert_eq!(names(&results), vec!["Tea"]);
    }

    #[test]
    fn test_search_falls_back_to_substring() {
        let (session, _) = session_with(&["Green Tea", "Pasta", "Iced TEA"]);
        let results = session.search("tea");

        assert!(!results.exact);
        assert_eq!(names(&results), vec!["Green Tea", "Iced TEA"]);
        assert!(session.search("curry").recipes.is_empty());
    }

    #[test]
    fn test_view_records_history() {
        let (mut session, _) = session_with(&["Pasta", "Tea"]);

        assert_eq!(session.view("pasta").map(|r| r.name.clone()), Some("Pasta".into()));
        assert!(session.view("missing").is_none());
        session.view("TEA");

        let recent: Vec<&str> = session.recently_viewed().iter().collect();
        assert_eq!(recent, vec!["Pasta", "Tea"]);
    }

    #[test]
    fn test_rename_and_delete_update_history() {
        let (mut session, store) = session_with(&["Tea", "Pasta"]);
        session.view("Tea");
        session.view("Pasta");

        session.update("Tea", recipe("Green Tea")).unwrap();
        session.delete("pasta").unwrap();

        let recent: Vec<&str> = session.recently_viewed().iter().collect();
        assert_eq!(recent, vec!["Green Tea"]);
        assert_eq!(store.stored(), vec![recipe("Green Tea")]);
    }

    #[test]
    fn test_rejected_update_leaves_history_alone() {
        let (mut session, _) = session_with(&["Tea", "Pasta"]);
        session.view("Tea");

        assert!(session.update("Tea", recipe("pasta")).is_err());

        let recent: Vec<&str> = session.recently_viewed().iter().collect();
        assert_eq!(recent, vec!["Tea"]);
    }

    #[test]
    fn test_ask_logs_exchanges() {
        let prompts = Rc::new(RefCell::new(Vec::new()));
        let mut session = Session::open(
            Box::new(MemoryStore::new()),
            Box::new(Echo {
                prompts: Rc::clone(&prompts),
            }),
        );

        assert!(session.ask("   ").is_none());
        let exchange = session.ask(" lasagne ").cloned().unwrap();

        assert_eq!(exchange.prompt, "lasagne");
        assert_eq!(exchange.reply, "recipe for lasagne");
        assert_eq!(session.chat_log().len(), 1);
        assert_eq!(*prompts.borrow(), vec!["lasagne".to_string()]);
    }

    #[test]
    fn test_ask_without_assistant_still_replies() {
        let (mut session, _) = session_with(&[]);
        let exchange = session.ask("soup").unwrap();

        assert!(exchange.reply.contains("not configured"));
    }
}
