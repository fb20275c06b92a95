use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Recipe;

/// Fields available within the recipe form, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum RecipeField {
    #[default]
    Name,
    Ingredients,
    Instructions,
}

impl RecipeField {
    fn next(self) -> Self {
        match self {
            RecipeField::Name => RecipeField::Ingredients,
            RecipeField::Ingredients => RecipeField::Instructions,
            RecipeField::Instructions => RecipeField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            RecipeField::Name => RecipeField::Instructions,
            RecipeField::Ingredients => RecipeField::Name,
            RecipeField::Instructions => RecipeField::Ingredients,
        }
    }

    fn is_multiline(self) -> bool {
        !matches!(self, RecipeField::Name)
    }
}

/// Form state shared by the add and edit flows. The list fields hold raw
/// text, one item per line.
#[derive(Default, Clone, Debug)]
pub(crate) struct RecipeForm {
    pub(crate) name: String,
    pub(crate) ingredients: String,
    pub(crate) instructions: String,
    pub(crate) active: RecipeField,
    pub(crate) error: Option<String>,
}

impl RecipeForm {
    /// Populate the form from an existing recipe when editing.
    pub(crate) fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            ingredients: recipe.ingredients.join("\n"),
            instructions: recipe.instructions.join("\n"),
            active: RecipeField::Name,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    fn active_value(&mut self) -> &mut String {
        match self.active {
            RecipeField::Name => &mut self.name,
            RecipeField::Ingredients => &mut self.ingredients,
            RecipeField::Instructions => &mut self.instructions,
        }
    }

    /// Append a printable character to the active field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.active_value().push(ch);
        true
    }

    /// Enter starts a new line in the list fields and moves on from the name.
    pub(crate) fn newline(&mut self) {
        if self.active.is_multiline() {
            self.active_value().push('\n');
        } else {
            self.next_field();
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.active_value().pop();
    }

    /// Build the recipe the form describes. Name validation is left to the
    /// repository so the same rules apply everywhere.
    pub(crate) fn to_recipe(&self) -> Recipe {
        Recipe::new(
            self.name.trim(),
            split_lines(&self.ingredients),
            split_lines(&self.instructions),
        )
    }

    /// Lines for the form body plus the cursor position relative to the
    /// first line.
    pub(crate) fn render(&self) -> (Vec<Line<'static>>, (u16, u16)) {
        let mut lines = Vec::new();
        let mut cursor = (0, 0);

        let name_active = self.active == RecipeField::Name;
        let name_display = if self.name.is_empty() {
            "<required>".to_string()
        } else {
            self.name.clone()
        };
        lines.push(Line::from(vec![
            Span::raw("Name: "),
            Span::styled(name_display, field_style(name_active, self.name.is_empty())),
        ]));
        if name_active {
            cursor = (
                ("Name: ".len() + self.name.chars().count()) as u16,
                0,
            );
        }

        for (label, field, value) in [
            ("Ingredients", RecipeField::Ingredients, &self.ingredients),
            ("Instructions", RecipeField::Instructions, &self.instructions),
        ] {
            let active = self.active == field;
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{label} (one per line):"),
                field_style(active, false),
            )));

            let rows: Vec<&str> = value.split('\n').collect();
            for row in &rows {
                lines.push(Line::from(Span::styled(
                    format!("  {row}"),
                    field_style(active, false),
                )));
            }
            if active {
                let last = rows.last().copied().unwrap_or("");
                cursor = (
                    (2 + last.chars().count()) as u16,
                    (lines.len() - 1) as u16,
                );
            }
        }

        (lines, cursor)
    }
}

fn field_style(active: bool, empty: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else if empty {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    }
}

/// Split free text into trimmed, non-blank lines.
pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Debug)]
pub(crate) struct ConfirmRecipeDelete {
    pub(crate) name: String,
}

impl ConfirmRecipeDelete {
    pub(crate) fn from(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
        }
    }
}

/// Single-line input used by the search bar and the assistant prompt.
#[derive(Default, Clone, Debug)]
pub(crate) struct LineInput {
    pub(crate) text: String,
}

impl LineInput {
    pub(crate) fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            false
        } else {
            self.text.push(ch);
            true
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.text.pop();
    }

    pub(crate) fn len(&self) -> usize {
        self.text.chars().count()
    }
}
