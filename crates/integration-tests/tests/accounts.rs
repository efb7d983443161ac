use domains::{DomainError, MessageDraft, RegistrationForm, Role};
use integration_tests::{random_buyer, sale_draft, seller, TestHub};

fn form(email: &str, role: Role) -> RegistrationForm {
    RegistrationForm {
        name: "Ana".into(),
        email: email.into(),
        phone: "0170".into(),
        password: "correct horse".into(),
        confirm_password: "correct horse".into(),
        role: Some(role),
    }
}

#[test]
fn register_login_logout_with_argon2() {
    let hub = TestHub::in_memory();
    let user = hub.users.register(form("ana@x.com", Role::Buyer)).unwrap();
    assert!(user.password.starts_with("$argon2"));

    assert!(matches!(
        hub.users.login("ana@x.com", "wrong", Role::Buyer),
        Err(DomainError::InvalidCredentials(_))
    ));
    let session = hub.users.login("ana@x.com", "correct horse", Role::Buyer).unwrap();
    assert_eq!(hub.users.current_session(), Some(session));
    hub.users.logout().unwrap();
    assert_eq!(hub.users.current_session(), None);
}

#[test]
fn saved_properties_and_messages_feed_buyer_stats() {
    let hub = TestHub::in_memory();
    let property = hub.properties.submit(&seller("s@x.com"), sale_draft("A", 1_000_000)).unwrap();
    let buyer = random_buyer();

    hub.saved.save(&buyer, &property.id).unwrap();
    assert!(hub.saved.is_saved(&buyer.email, &property.id));
    hub.messages
        .send(
            None,
            MessageDraft {
                recipient_email: buyer.email.clone(),
                subject: "Re: A".into(),
                body: "Viewing is on Friday".into(),
                sender_email: "s@x.com".into(),
                sender_name: "Sam".into(),
                sender_phone: String::new(),
            },
        )
        .unwrap();
    hub.notifications.welcome(&buyer.email).unwrap();

    let stats = hub.dashboard.buyer_stats(&buyer.email);
    assert_eq!(stats.saved, 1);
    assert_eq!(stats.unread_messages, 1);
    assert_eq!(stats.unread_notifications, 1);
    assert_eq!(stats.requests, 0);

    hub.properties.delete(&property.id).unwrap();
    assert!(hub.saved.list_for(&buyer.email).is_empty());
}
