use ecolog_core::db::open_db_in_memory;
use ecolog_core::{
    Activity, ActivityLiveQuery, ActivityService, Category, SqliteActivityRepository,
};
use std::sync::{Arc, Mutex};

type Deliveries = Arc<Mutex<Vec<Vec<Activity>>>>;

fn recording_subscriber(deliveries: &Deliveries) -> impl FnMut(&[Activity]) + Send + 'static {
    let sink = Arc::clone(deliveries);
    move |view: &[Activity]| {
        sink.lock().unwrap().push(view.to_vec());
    }
}

fn live_query(
    conn: &rusqlite::Connection,
) -> ActivityLiveQuery<SqliteActivityRepository<'_>> {
    let repo = SqliteActivityRepository::try_new(conn).unwrap();
    ActivityLiveQuery::new(ActivityService::new(repo))
}

#[test]
fn subscribe_delivers_current_view_immediately() {
    let conn = open_db_in_memory().unwrap();
    let live = live_query(&conn);
    live.add_activity("Lunch", Category::Food, 3.2).unwrap();

    let deliveries: Deliveries = Arc::new(Mutex::new(Vec::new()));
    live.subscribe(recording_subscriber(&deliveries)).unwrap();

    let received = deliveries.lock().unwrap();
    assert_eq!(received.len(), 1, "initial snapshot arrives before subscribe returns");
    assert_eq!(received[0].len(), 1);
    assert_eq!(received[0][0].name, "Lunch");
}

#[test]
fn every_mutation_notifies_with_a_fresh_sorted_view() {
    let conn = open_db_in_memory().unwrap();
    let live = live_query(&conn);

    let deliveries: Deliveries = Arc::new(Mutex::new(Vec::new()));
    live.subscribe(recording_subscriber(&deliveries)).unwrap();

    let flight = live
        .add_activity("Flight", Category::Transport, 12.5)
        .unwrap();
    live.add_activity("Lunch", Category::Food, 3.2).unwrap();
    live.delete_activity(flight.uuid).unwrap();
    live.clear_activities().unwrap();

    let received = deliveries.lock().unwrap();
    // initial empty view + one delivery per mutation
    assert_eq!(received.len(), 5);
    assert!(received[0].is_empty());
    assert_eq!(received[1].len(), 1);
    assert_eq!(received[2].len(), 2);
    assert_eq!(
        received[2][0].name, "Lunch",
        "newest record leads the delivered view"
    );
    assert_eq!(received[3].len(), 1);
    assert_eq!(received[3][0].name, "Lunch");
    assert!(received[4].is_empty());
}

#[test]
fn unsubscribe_stops_deliveries_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let live = live_query(&conn);

    let deliveries: Deliveries = Arc::new(Mutex::new(Vec::new()));
    let handle = live.subscribe(recording_subscriber(&deliveries)).unwrap();
    assert_eq!(live.subscriber_count(), 1);

    live.unsubscribe(handle);
    assert_eq!(live.subscriber_count(), 0);
    live.unsubscribe(handle);

    live.add_activity("Heating", Category::Energy, 4.0).unwrap();
    assert_eq!(deliveries.lock().unwrap().len(), 1, "only the initial snapshot");
}

#[test]
fn all_subscribers_receive_each_delivery() {
    let conn = open_db_in_memory().unwrap();
    let live = live_query(&conn);

    let first: Deliveries = Arc::new(Mutex::new(Vec::new()));
    let second: Deliveries = Arc::new(Mutex::new(Vec::new()));
    live.subscribe(recording_subscriber(&first)).unwrap();
    live.subscribe(recording_subscriber(&second)).unwrap();

    live.add_activity("Laundry", Category::Home, 0.6).unwrap();

    assert_eq!(first.lock().unwrap().len(), 2);
    assert_eq!(second.lock().unwrap().len(), 2);
}

#[test]
fn delete_at_resolves_index_against_the_displayed_order() {
    let conn = open_db_in_memory().unwrap();
    let live = live_query(&conn);

    live.add_activity("Flight", Category::Transport, 12.5)
        .unwrap();
    live.add_activity("Lunch", Category::Food, 3.2).unwrap();

    // Index 0 is the newest record in the displayed view.
    assert!(live.delete_activity_at(0).unwrap());

    let remaining = live.snapshot().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Flight");
}

#[test]
fn delete_at_out_of_range_is_a_noop_without_notification() {
    let conn = open_db_in_memory().unwrap();
    let live = live_query(&conn);
    live.add_activity("Lunch", Category::Food, 3.2).unwrap();

    let deliveries: Deliveries = Arc::new(Mutex::new(Vec::new()));
    live.subscribe(recording_subscriber(&deliveries)).unwrap();

    assert!(!live.delete_activity_at(7).unwrap());
    assert_eq!(deliveries.lock().unwrap().len(), 1);
    assert_eq!(live.snapshot().unwrap().len(), 1);
}

#[test]
fn failed_insert_does_not_notify_subscribers() {
    let conn = open_db_in_memory().unwrap();
    let live = live_query(&conn);

    let deliveries: Deliveries = Arc::new(Mutex::new(Vec::new()));
    live.subscribe(recording_subscriber(&deliveries)).unwrap();

    assert!(live.add_activity("", Category::Food, 1.0).is_err());
    assert_eq!(deliveries.lock().unwrap().len(), 1);
}
