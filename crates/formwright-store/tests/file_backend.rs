//! Schema store over the file backend.

use formwright_schema::{FieldDefinition, FieldKind, FormId, FormSchema};
use formwright_store::{FileStore, KeyValueStore, SchemaStore, SharedStore, DEFAULT_INDEX_KEY};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn sample_schema() -> FormSchema {
    let mut age = FieldDefinition::new(FieldKind::Number).with_label("Age");
    age.validations.min = Some(1.0);
    age.validations.max = Some(10.0);
    vec![
        FieldDefinition::new(FieldKind::Text).with_label("Name"),
        age,
        FieldDefinition::new(FieldKind::Select)
            .with_label("Color")
            .with_option("Red", "red"),
    ]
    .into()
}

#[test]
fn schemas_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let id = FormId::new();
    let schema = sample_schema();

    {
        let store = SchemaStore::new(FileStore::open(dir.path()).unwrap());
        store.register_form(&id).unwrap();
        store.save_schema(&id, &schema).unwrap();
    }

    let reopened = SchemaStore::new(FileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.form_ids().unwrap(), vec![id]);
    assert_eq!(reopened.load_schema(&id).unwrap(), schema);
}

#[test]
fn stored_layout_is_plain_json() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileStore::open(dir.path()).unwrap();
    let store = SchemaStore::new(backend.clone());
    let id = FormId::new();

    store.register_form(&id).unwrap();
    store.save_schema(&id, &sample_schema()).unwrap();

    let index: serde_json::Value =
        serde_json::from_str(&backend.get(DEFAULT_INDEX_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(index, serde_json::json!([id.to_string()]));

    let fields: serde_json::Value =
        serde_json::from_str(&backend.get(&id.storage_key()).unwrap().unwrap()).unwrap();
    assert_eq!(fields.as_array().unwrap().len(), 3);
    assert_eq!(fields[1]["type"], "number");
    assert_eq!(fields[2]["options"][0]["value"], "red");
}

#[test]
fn shared_store_handle_works_through_trait_object() {
    let dir = tempfile::tempdir().unwrap();
    let shared: SharedStore = Arc::new(FileStore::open(dir.path()).unwrap());
    let store = SchemaStore::new(shared);
    let id = FormId::new();

    store.save_schema(&id, &sample_schema()).unwrap();
    assert_eq!(store.load_schema(&id).unwrap().len(), 3);
}
