use domains::{ApprovalStatus, Decision, NotificationKind, RequestKind};
use integration_tests::{booking_draft, random_buyer, sale_draft, seller, visit_draft, TestHub};

#[test]
fn every_transition_notifies_exactly_one_counterparty() {
    let hub = TestHub::in_memory();
    let property = hub.properties.submit(&seller("s@x.com"), sale_draft("A", 1_000_000)).unwrap();
    let buyer = random_buyer();

    let request = hub.requests.create(&buyer, &property.id, visit_draft()).unwrap();
    assert_eq!(hub.notifications.list_for("s@x.com").len(), 1);
    assert!(hub.notifications.list_for(&buyer.email).is_empty());

    for (step, decision) in [Decision::Approved, Decision::Rejected, Decision::Approved]
        .into_iter()
        .enumerate()
    {
        hub.tick();
        let updated = hub
            .requests
            .update_status(&request.id, RequestKind::Visit, decision)
            .unwrap();
        assert_eq!(updated.status, ApprovalStatus::from(decision));
        assert_eq!(hub.notifications.list_for(&buyer.email).len(), step + 1);
    }
    assert_eq!(hub.notifications.list_for("s@x.com").len(), 1);

    let latest = &hub.notifications.list_for(&buyer.email)[0];
    assert_eq!(latest.kind, NotificationKind::Visit);
    assert_eq!(latest.title, "Your visit request has been approved");
}

#[test]
fn pending_property_still_accepts_requests() {
    let hub = TestHub::in_memory();
    let property = hub.properties.submit(&seller("s@x.com"), sale_draft("A", 1_000_000)).unwrap();
    assert_eq!(property.status, ApprovalStatus::Pending);
    assert!(hub.requests.create(&random_buyer(), &property.id, booking_draft()).is_ok());
}

#[test]
fn listings_are_joined_and_newest_first() {
    let hub = TestHub::in_memory();
    let mine = hub.properties.submit(&seller("s@x.com"), sale_draft("Mine", 1_000_000)).unwrap();
    let theirs = hub.properties.submit(&seller("t@x.com"), sale_draft("Theirs", 1_000_000)).unwrap();
    let buyer = random_buyer();

    let first = hub.requests.create(&buyer, &mine.id, booking_draft()).unwrap();
    hub.tick();
    let second = hub.requests.create(&buyer, &mine.id, visit_draft()).unwrap();
    hub.tick();
    hub.requests.create(&random_buyer(), &theirs.id, booking_draft()).unwrap();

    let for_seller: Vec<_> = hub
        .requests
        .list_for_seller("s@x.com")
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(for_seller, [second.id.clone(), first.id.clone()]);
    assert_eq!(hub.requests.list_for_requester(&buyer.email).len(), 2);
    assert_eq!(hub.requests.list_all().len(), 3);

    let stats = hub.dashboard.seller_stats("s@x.com");
    assert_eq!((stats.total, stats.pending, stats.pending_requests), (1, 1, 2));
    assert_eq!(hub.dashboard.buyer_stats(&buyer.email).requests, 2);
}

#[test]
fn requester_name_can_be_overridden() {
    let hub = TestHub::in_memory();
    let property = hub.properties.submit(&seller("s@x.com"), sale_draft("A", 1_000_000)).unwrap();
    let mut draft = booking_draft();
    draft.name = Some("On Behalf".into());
    let request = hub.requests.create(&random_buyer(), &property.id, draft).unwrap();
    assert_eq!(request.requester.name, "On Behalf");
    assert_eq!(request.requester.phone, "01700000000");
    assert_eq!(request.seller_email, "s@x.com");
}
