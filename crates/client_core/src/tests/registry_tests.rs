use super::*;
use shared::error::{Field, FieldErrorKind};

fn valid(name: &str) -> ClientFields {
    ClientFields::new(name, "client@example.com", "+7 999 123-45-67")
}

fn registry_with(names: &[&str]) -> ClientRegistry {
    let mut registry = ClientRegistry::new();
    for name in names {
        registry.create(valid(name)).expect("create");
    }
    registry
}

#[test]
fn empty_registry_assigns_id_one() {
    let mut registry = ClientRegistry::new();
    let client = registry.create(valid("Anna")).expect("create");
    assert_eq!(client.id, ClientId(1));
    assert_eq!(registry.list(), &[client]);
}

#[test]
fn create_appends_with_id_above_every_existing_id() {
    let mut registry = ClientRegistry::with_demo_clients();
    let before = registry.list().to_vec();

    let created = registry.create(valid("Olga Smirnova")).expect("create");

    assert!(before.iter().all(|existing| created.id > existing.id));
    assert_eq!(registry.len(), before.len() + 1);
    assert_eq!(registry.list().last(), Some(&created));
    assert_eq!(
        registry.list().iter().filter(|c| **c == created).count(),
        1
    );
}

#[test]
fn deleting_highest_id_lets_next_create_reuse_it() {
    let mut registry = registry_with(&["Anna", "Boris"]);
    registry.delete(ClientId(2)).expect("delete");
    let created = registry.create(valid("Vera")).expect("create");
    assert_eq!(created.id, ClientId(2));
}

#[test]
fn deleting_a_middle_id_does_not_fill_the_gap() {
    let mut registry = registry_with(&["Anna", "Boris", "Vera"]);
    registry.delete(ClientId(2));
    let created = registry.create(valid("Gleb")).expect("create");
    assert_eq!(created.id, ClientId(4));
    let ids: Vec<_> = registry.list().iter().map(|c| c.id.0).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn update_replaces_fields_in_place() {
    let mut registry = registry_with(&["Anna", "Boris", "Vera"]);
    let updated = registry
        .update(
            ClientId(2),
            ClientFields::new("Boris Godunov", "boris@mail.ru", "8 (912) 222-33-44"),
        )
        .expect("update");

    assert_eq!(updated.id, ClientId(2));
    assert_eq!(registry.list()[1], updated);
    assert_eq!(registry.list()[1].email, "boris@mail.ru");
    assert_eq!(registry.len(), 3);
}

#[test]
fn update_of_missing_id_is_not_found_and_leaves_list_unchanged() {
    let mut registry = registry_with(&["Anna"]);
    let before = registry.clone();
    let err = registry
        .update(ClientId(42), valid("Boris"))
        .expect_err("should fail");
    assert_eq!(err, RegistryError::NotFound(ClientId(42)));
    assert_eq!(registry, before);
}

#[test]
fn update_with_invalid_fields_leaves_record_untouched() {
    let mut registry = registry_with(&["Anna"]);
    let before = registry.clone();
    let err = registry
        .update(ClientId(1), ClientFields::new("123", "anna@mail.ru", "+7 999 123-45-67"))
        .expect_err("should fail");
    let errors = match err {
        RegistryError::InvalidRecord(errors) => errors,
        other => panic!("expected invalid record, got {other:?}"),
    };
    assert!(errors.has(Field::Name, FieldErrorKind::InvalidChars));
    assert_eq!(registry, before);
}

#[test]
fn create_rejects_invalid_record_without_inserting() {
    let mut registry = ClientRegistry::new();
    let err = registry
        .create(ClientFields::default())
        .expect_err("should fail");
    let errors = match err {
        RegistryError::InvalidRecord(errors) => errors,
        other => panic!("expected invalid record, got {other:?}"),
    };
    assert_eq!(errors.len(), 3);
    assert!(registry.is_empty());
}

#[test]
fn delete_is_idempotent() {
    let mut registry = registry_with(&["Anna", "Boris"]);
    let removed = registry.delete(ClientId(1)).expect("removed");
    assert_eq!(removed.name, "Anna");

    let before = registry.clone();
    assert!(registry.delete(ClientId(1)).is_none());
    assert!(registry.delete(ClientId(99)).is_none());
    assert_eq!(registry, before);
}

#[test]
fn demo_clients_are_seeded_in_order() {
    let registry = ClientRegistry::with_demo_clients();
    let names: Vec<_> = registry.list().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Иван Иванов", "Мария Петрова", "John Doe"]);
    assert_eq!(registry.next_id(), ClientId(4));
    for client in registry.list() {
        crate::validation::validate_client(&client.fields()).expect("demo record is valid");
    }
}

#[test]
fn update_reports_missing_id_before_validating_fields() {
    let mut registry = registry_with(&["Anna"]);
    let err = registry
        .update(ClientId(5), ClientFields::default())
        .expect_err("should fail");
    assert_eq!(err, RegistryError::NotFound(ClientId(5)));
}
