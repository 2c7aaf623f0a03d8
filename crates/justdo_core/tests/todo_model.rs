use chrono::NaiveDate;
use justdo_core::{Category, CategoryColor, TodoItem, TodoValidationError};
use uuid::Uuid;

#[test]
fn todo_item_new_sets_defaults() {
    let item = TodoItem::new("Buy milk");

    assert!(!item.id.is_nil());
    assert_eq!(item.title, "Buy milk");
    assert!(!item.is_completed);
    assert_eq!(item.notes, "");
    assert_eq!(item.due_date, None);
    assert_eq!(item.category_id, None);
}

#[test]
fn successive_new_calls_yield_distinct_ids() {
    let first = TodoItem::new("first");
    let second = TodoItem::new("second");
    assert_ne!(first.id, second.id);
}

#[test]
fn toggle_completion_is_its_own_inverse() {
    let mut item = TodoItem::new("flip me");

    item.toggle_completion();
    assert!(item.is_completed);

    item.toggle_completion();
    assert!(!item.is_completed);
}

#[test]
fn validate_rejects_nil_id() {
    let item = TodoItem::with_id(Uuid::nil(), "invalid");
    assert_eq!(item.validate().unwrap_err(), TodoValidationError::NilId);
}

#[test]
fn todo_item_serialization_uses_expected_wire_fields() {
    let item_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let category_id = Uuid::parse_str("99999999-8888-4777-a666-555555555555").unwrap();
    let mut item = TodoItem::with_id(item_id, "Pay rent");
    item.is_completed = true;
    item.notes = "before the 5th".to_string();
    item.due_date = NaiveDate::from_ymd_opt(2026, 9, 5);
    item.category_id = Some(category_id);

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], item_id.to_string());
    assert_eq!(json["title"], "Pay rent");
    assert_eq!(json["isCompleted"], true);
    assert_eq!(json["notes"], "before the 5th");
    assert_eq!(json["dueDate"], "2026-09-05");
    assert_eq!(json["categoryId"], category_id.to_string());

    let decoded: TodoItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn todo_item_deserialization_defaults_absent_optional_fields() {
    let decoded: TodoItem = serde_json::from_str(
        r#"{
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "Call mom",
            "isCompleted": false
        }"#,
    )
    .unwrap();

    assert_eq!(decoded.notes, "");
    assert_eq!(decoded.due_date, None);
    assert_eq!(decoded.category_id, None);
}

#[test]
fn category_serialization_uses_lowercase_color_names() {
    let category_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let category = Category::with_id(category_id, "Work", CategoryColor::Purple);

    let json = serde_json::to_value(&category).unwrap();
    assert_eq!(json["id"], category_id.to_string());
    assert_eq!(json["name"], "Work");
    assert_eq!(json["color"], "purple");

    let decoded: Category = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, category);
}

#[test]
fn category_color_parse_covers_the_closed_set_only() {
    for color in CategoryColor::ALL {
        assert_eq!(CategoryColor::parse(color.as_str()), Some(color));
    }
    assert_eq!(CategoryColor::parse("magenta"), None);
    assert_eq!(CategoryColor::parse("Blue"), None);
}
