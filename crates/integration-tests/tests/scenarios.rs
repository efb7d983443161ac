use domains::{ApprovalStatus, Decision, NotificationKind, PropertyPatch, RequestKind, Role, Session};
use insta::assert_snapshot;
use integration_tests::{booking_draft, sale_draft, seller, TestHub};

#[test]
fn loft_a_goes_back_to_review_after_edit() {
    let hub = TestHub::in_memory();
    let loft = hub.properties.submit(&seller("s@x.com"), sale_draft("Loft A", 5_000_000)).unwrap();
    assert_eq!(loft.status, ApprovalStatus::Pending);

    hub.tick();
    let approved = hub.properties.approve(&loft.id).unwrap();
    assert_eq!(approved.status, ApprovalStatus::Approved);
    assert_eq!(hub.properties.list_approved().len(), 1);

    hub.tick();
    let edited = hub
        .properties
        .edit(
            &loft.id,
            PropertyPatch {
                description: Some("freshly painted".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(edited.status, ApprovalStatus::Pending);
    assert!(edited.updated_at > approved.approved_at);
    assert!(hub.properties.list_approved().is_empty());
    assert_eq!(hub.properties.list_pending()[0].id, loft.id);
}

#[test]
fn booking_is_requested_then_approved() {
    let hub = TestHub::in_memory();
    let loft = hub.properties.submit(&seller("s@x.com"), sale_draft("Loft A", 5_000_000)).unwrap();
    hub.properties.approve(&loft.id).unwrap();
    let buyer = Session::new("Bea", "b@x.com", Role::Buyer);

    let booking = hub.requests.create(&buyer, &loft.id, booking_draft()).unwrap();
    let seller_inbox = hub.notifications.list_for("s@x.com");
    assert_eq!(seller_inbox.len(), 1);
    assert_eq!(seller_inbox[0].kind, NotificationKind::BookingRequest);
    assert_eq!(seller_inbox[0].title, "New Booking Request");
    assert_snapshot!(seller_inbox[0].message, @r#"A buyer has requested to book your property: "Loft A""#);

    hub.tick();
    hub.requests
        .update_status(&booking.id, RequestKind::Booking, Decision::Approved)
        .unwrap();

    let buyer_inbox = hub.notifications.list_for("b@x.com");
    assert_eq!(buyer_inbox.len(), 1);
    assert_eq!(buyer_inbox[0].kind, NotificationKind::Booking);
    assert_eq!(buyer_inbox[0].reference_id.as_deref(), Some(booking.id.as_str()));
    assert_snapshot!(buyer_inbox[0].title, @"Your booking request has been approved");
    assert_snapshot!(buyer_inbox[0].message, @r#"Great news! Your booking request for "Loft A" has been approved. Please check your bookings for more details."#);
    assert!(!buyer_inbox[0].read);
}
