use chrono::NaiveDate;
use justdo_core::{
    AppSettings, Category, CategoryColor, CategoryRepository, ColorTheme,
    PrefsCategoryRepository, PrefsStore, PrefsTodoRepository, TodoItem, TodoListQuery,
    TodoRepository,
};

fn temp_prefs_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
    dir.path().join("justdo_prefs.json")
}

#[test]
fn missing_document_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = PrefsStore::load(temp_prefs_path(&dir));

    let todos = PrefsTodoRepository::new(&store);
    let categories = PrefsCategoryRepository::new(&store);
    assert!(todos.list(&TodoListQuery::default()).unwrap().is_empty());
    assert!(categories.list_all().unwrap().is_empty());
    assert_eq!(store.settings(), AppSettings::default());
}

#[test]
fn persisted_collections_roundtrip_across_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_prefs_path(&dir);

    let work = Category::new("Work", CategoryColor::Blue);
    let mut item = TodoItem::new("Write report");
    item.notes = "quarterly numbers".to_string();
    item.due_date = NaiveDate::from_ymd_opt(2026, 8, 28);
    item.category_id = Some(work.id);
    let plain = TodoItem::new("Water plants");

    {
        let store = PrefsStore::load(&path);
        let todos = PrefsTodoRepository::new(&store);
        let categories = PrefsCategoryRepository::new(&store);
        categories.create(&work).unwrap();
        todos.create(&item).unwrap();
        todos.create(&plain).unwrap();
    }

    let reloaded = PrefsStore::load(&path);
    let todos = PrefsTodoRepository::new(&reloaded);
    let categories = PrefsCategoryRepository::new(&reloaded);

    let listed = todos.list(&TodoListQuery::default()).unwrap();
    assert_eq!(listed, vec![item.clone(), plain.clone()]);
    assert_eq!(categories.list_all().unwrap(), vec![work]);
}

#[test]
fn list_preserves_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = PrefsStore::load(temp_prefs_path(&dir));
    let todos = PrefsTodoRepository::new(&store);

    let mut done = TodoItem::new("zebra");
    done.is_completed = true;
    todos.create(&done).unwrap();
    todos.create(&TodoItem::new("Apple")).unwrap();
    todos.create(&TodoItem::new("banana")).unwrap();

    let titles = todos
        .list(&TodoListQuery::default())
        .unwrap()
        .into_iter()
        .map(|item| item.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, ["zebra", "Apple", "banana"]);
}

#[test]
fn undecodable_document_falls_back_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_prefs_path(&dir);
    std::fs::write(&path, b"this is not json").unwrap();

    let store = PrefsStore::load(&path);
    let todos = PrefsTodoRepository::new(&store);
    assert!(todos.list(&TodoListQuery::default()).unwrap().is_empty());
    assert_eq!(store.settings(), AppSettings::default());
}

#[test]
fn corrupt_slot_does_not_drop_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_prefs_path(&dir);
    let category = Category::new("Personal", CategoryColor::Green);
    let document = serde_json::json!({
        "todoItems": "not an array",
        "todoCategories": [category],
        "settings": { "colorTheme": "purple" }
    });
    std::fs::write(&path, serde_json::to_vec(&document).unwrap()).unwrap();

    let store = PrefsStore::load(&path);
    let todos = PrefsTodoRepository::new(&store);
    let categories = PrefsCategoryRepository::new(&store);

    assert!(todos.list(&TodoListQuery::default()).unwrap().is_empty());
    assert_eq!(categories.list_all().unwrap(), vec![category]);
    assert_eq!(store.settings().color_theme, ColorTheme::Purple);
}

#[test]
fn mutations_write_through_without_explicit_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_prefs_path(&dir);

    let store = PrefsStore::load(&path);
    let todos = PrefsTodoRepository::new(&store);
    let mut item = TodoItem::new("persist me");
    todos.create(&item).unwrap();

    // A second store reading the same file sees the create immediately.
    let other = PrefsStore::load(&path);
    let other_todos = PrefsTodoRepository::new(&other);
    assert_eq!(other_todos.get(item.id).unwrap(), Some(item.clone()));

    item.is_completed = true;
    todos.update(&item).unwrap();
    let after_update = PrefsStore::load(&path);
    assert!(PrefsTodoRepository::new(&after_update)
        .get(item.id)
        .unwrap()
        .unwrap()
        .is_completed);

    todos.delete(item.id).unwrap();
    let after_delete = PrefsStore::load(&path);
    assert_eq!(
        PrefsTodoRepository::new(&after_delete).get(item.id).unwrap(),
        None
    );
}

#[test]
fn category_delete_nulls_out_task_references() {
    let dir = tempfile::tempdir().unwrap();
    let store = PrefsStore::load(temp_prefs_path(&dir));
    let todos = PrefsTodoRepository::new(&store);
    let categories = PrefsCategoryRepository::new(&store);

    let grocery = Category::new("Grocery", CategoryColor::Green);
    categories.create(&grocery).unwrap();
    let mut item = TodoItem::new("Buy milk");
    item.category_id = Some(grocery.id);
    todos.create(&item).unwrap();

    categories.delete(grocery.id).unwrap();

    assert!(categories.get(grocery.id).unwrap().is_none());
    assert_eq!(todos.get(item.id).unwrap().unwrap().category_id, None);
}

#[test]
fn settings_roundtrip_across_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_prefs_path(&dir);

    {
        let store = PrefsStore::load(&path);
        store.update_settings(AppSettings {
            show_completed_tasks: true,
            sort_completed_to_bottom: true,
            color_theme: ColorTheme::Orange,
        });
    }

    let reloaded = PrefsStore::load(&path);
    let settings = reloaded.settings();
    assert!(settings.show_completed_tasks);
    assert!(settings.sort_completed_to_bottom);
    assert_eq!(settings.color_theme, ColorTheme::Orange);
}
