use client_core::{ClientRegistry, CredentialTable, CrmStore};
use serde::Deserialize;
use shared::{
    domain::{ClientFields, ClientId, Role},
    protocol::{Intent, StoreEvent},
};

#[derive(Deserialize)]
struct CredentialsFile {
    credentials: CredentialTable,
}

fn store_from_toml(raw: &str) -> CrmStore {
    let parsed: CredentialsFile = toml::from_str(raw).expect("credentials toml");
    CrmStore::new(parsed.credentials, ClientRegistry::new())
}

#[test]
fn externalized_credentials_drive_a_full_session() {
    let mut store = store_from_toml(
        r#"
        [[credentials]]
        login = "manager"
        password = "m-pass"
        role = "user"

        [[credentials]]
        login = "root"
        password = "r-pass"
        role = "admin"
        "#,
    );

    let rejected = store.apply(Intent::Login {
        login: "user1".into(),
        password: "userpass".into(),
    });
    assert!(matches!(rejected, StoreEvent::Rejected { .. }));
    assert_eq!(store.current_role(), Role::Guest);

    store
        .dispatch(Intent::Login {
            login: "manager".into(),
            password: "m-pass".into(),
        })
        .expect("manager login");

    for (name, phone) in [
        ("Anna Karenina", "+7 999 000-00-01"),
        ("Лев Толстой", "8 999 000 00 02"),
    ] {
        store
            .dispatch(Intent::CreateClient {
                fields: ClientFields::new(name, "reader@example.com", phone),
            })
            .expect("create");
    }
    assert_eq!(store.snapshot().clients.len(), 2);

    store.dispatch(Intent::Logout).expect("logout");
    store
        .dispatch(Intent::Login {
            login: "root".into(),
            password: "r-pass".into(),
        })
        .expect("root login");

    store
        .dispatch(Intent::DeleteClient { id: ClientId(2) })
        .expect("delete");
    let StoreEvent::ClientCreated { client } = store
        .dispatch(Intent::CreateClient {
            fields: ClientFields::new("Fyodor Dostoevsky", "fyodor@example.com", "89990000003"),
        })
        .expect("create")
    else {
        panic!("expected created event");
    };
    assert_eq!(client.id, ClientId(2));

    let snapshot = store.snapshot();
    let names: Vec<_> = snapshot.clients.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Anna Karenina", "Fyodor Dostoevsky"]);
}

#[test]
fn guest_credentials_in_config_are_refused() {
    let parsed = toml::from_str::<CredentialsFile>(
        r#"
        [[credentials]]
        login = "visitor"
        password = "v"
        role = "guest"
        "#,
    );
    assert!(parsed.is_err());
}
