use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use super::{RecipeStore, StoreError};
use crate::models::Recipe;

/// File-backed store holding a pretty-printed JSON array of recipes.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_err(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecipeStore for JsonStore {
    fn load_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no recipe store at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let recipes: Vec<Recipe> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            "loaded {} recipes from {}",
            recipes.len(),
            self.path.display()
        );
        Ok(recipes)
    }

    /// The collection is written to a sibling temp file first and renamed
    /// over the target, so a failed write leaves the previous store intact.
    fn save_all(&self, recipes: &[Recipe]) -> Result<(), StoreError> {
        let mut encoded = serde_json::to_string_pretty(recipes)?;
        encoded.push('\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|err| self.write_err(err))?;

        let mut staged = NamedTempFile::new_in(&dir).map_err(|err| self.write_err(err))?;
        staged
            .write_all(encoded.as_bytes())
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|err| self.write_err(err))?;
        staged
            .persist(&self.path)
            .map_err(|err| self.write_err(err.error))?;

        debug!("saved {} recipes to {}", recipes.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> Vec<Recipe> {
        vec![
            Recipe::new(
                "Crème brûlée",
                ["cream", "sugar", "sugar"],
                ["Bake", "Torch the top"],
            ),
            Recipe::new("Tea", ["water"], Vec::<String>::new()),
        ]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().join("recipes.json"));

        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order_and_content() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().join("nested/dir/recipes.json"));

        store.save_all(&sample()).unwrap();
        assert_eq!(store.load_all().unwrap(), sample());
    }

    #[test]
    fn test_saved_file_is_readable_json_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recipes.json");
        let store = JsonStore::new(&path);

        store.save_all(&sample()[1..]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(
            raw,
            indoc! {r#"
                [
                  {
                    "name": "Tea",
                    "ingredients": [
                      "water"
                    ],
                    "instructions": []
                  }
                ]
            "#}
        );
    }

    #[test]
    fn test_non_ascii_is_written_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recipes.json");
        JsonStore::new(&path).save_all(&sample()).unwrap();

        assert!(fs::read_to_string(&path).unwrap().contains("Crème brûlée"));
    }

    #[test]
    fn test_loads_hand_written_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recipes.json");
        fs::write(
            &path,
            indoc! {r#"
                [
                    {
                        "name": "Pasta",
                        "ingredients": ["flour", "eggs"],
                        "instructions": ["Mix", "Roll", "Cut"]
                    }
                ]
            "#},
        )
        .unwrap();

        let recipes = JsonStore::new(&path).load_all().unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Pasta");
        assert_eq!(recipes[0].instructions, vec!["Mix", "Roll", "Cut"]);
    }

    #[test]
    fn test_corrupt_file_reports_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recipes.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonStore::new(&path).load_all().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_save_overwrites_previous_collection() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonStore::new(temp_dir.path().join("recipes.json"));

        store.save_all(&sample()).unwrap();
        store.save_all(&[]).unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }
}
