use std::fs;

use indoc::indoc;
use pretty_assertions::assert_eq;
use recipe_book::assistant::Unconfigured;
use recipe_book::{JsonStore, Recipe, RecipeStore, RepositoryError, Session};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Session {
    let store = JsonStore::new(dir.path().join("recipes.json"));
    Session::open(Box::new(store), Box::new(Unconfigured))
}

#[test]
fn catalog_survives_restart() {
    let dir = TempDir::new().unwrap();

    let mut session = open(&dir);
    session
        .create(Recipe::new("Pasta", ["flour", "eggs"], ["Mix", "Boil"]))
        .unwrap();
    session
        .create(Recipe::new("Tea", ["water"], ["Steep"]))
        .unwrap();
    session
        .update("tea", Recipe::new("Green Tea", ["water", "leaves"], ["Steep"]))
        .unwrap();
    drop(session);

    let session = open(&dir);
    let names: Vec<&str> = session.recipes().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Pasta", "Green Tea"]);
    assert_eq!(
        session.repository().search("GREEN TEA").map(|r| r.ingredients.len()),
        Some(2)
    );
    assert!(session.repository().search("tea").is_none());
}

#[test]
fn duplicate_names_are_rejected_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let mut session = open(&dir);
    session
        .create(Recipe::new("Pasta", Vec::<String>::new(), Vec::<String>::new()))
        .unwrap();

    let err = session
        .create(Recipe::new(" PASTA ", Vec::<String>::new(), Vec::<String>::new()))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::DuplicateName(_)));
    assert_eq!(session.recipes().len(), 1);
}

#[test]
fn saved_file_is_readable_json() {
    let dir = TempDir::new().unwrap();
    let mut session = open(&dir);
    session
        .create(Recipe::new("Toast", ["bread"], ["Toast it"]))
        .unwrap();

    let raw = fs::read_to_string(dir.path().join("recipes.json")).unwrap();
    assert_eq!(
        raw,
        indoc! {r#"
            [
              {
                "name": "Toast",
                "ingredients": [
                  "bread"
                ],
                "instructions": [
                  "Toast it"
                ]
              }
            ]
        "#}
    );
}

#[test]
fn corrupt_store_opens_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recipes.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(JsonStore::new(&path).load_all().is_err());

    let mut session = open(&dir);
    assert!(session.recipes().is_empty());
    session
        .create(Recipe::new("Soup", ["stock"], ["Simmer"]))
        .unwrap();
    assert_eq!(JsonStore::new(&path).load_all().unwrap().len(), 1);
}

#[test]
fn deleting_everything_leaves_an_empty_array() {
    let dir = TempDir::new().unwrap();
    let mut session = open(&dir);
    session
        .create(Recipe::new("Pasta", Vec::<String>::new(), Vec::<String>::new()))
        .unwrap();
    session.view("pasta");

    assert!(session.delete("PASTA").unwrap());
    assert!(!session.delete("Pasta").unwrap());
    assert!(session.recently_viewed().is_empty());

    let raw = fs::read_to_string(dir.path().join("recipes.json")).unwrap();
    assert_eq!(raw.trim(), "[]");
}
