use ogs_activities::model::{
    ActivityQuery, CreateActivityRequest, CreateCategoryRequest, UpdateActivityRequest,
};
use ogs_activities::{Activities, ActivitiesError, init};
use ogs_database::Database;
use ogs_facilities::model::CreateRoomRequest;
use ogs_facilities::{Facilities, FacilitiesError};
use ogs_kernel::domain::schedule::Weekdays;

async fn slices() -> (Facilities, Activities) {
    let db = Database::builder()
        .url("mem://")
        .session("test", "activities")
        .init()
        .await
        .expect("connect to mem://");
    let facilities = ogs_facilities::init(&db).expect("init facilities");
    let activities = init(&db, &facilities).expect("init activities");
    (facilities, activities)
}

fn category(name: &str) -> CreateCategoryRequest {
    CreateCategoryRequest { name: name.to_owned(), description: None, color: Some("#FF8800".to_owned()) }
}

fn activity(name: &str, category_id: &str, weekdays: Weekdays) -> CreateActivityRequest {
    CreateActivityRequest {
        name: name.to_owned(),
        category_id: category_id.to_owned(),
        max_participants: 12,
        is_open: false,
        planned_room_id: None,
        weekdays,
    }
}

#[tokio::test]
async fn category_names_are_unique() {
    let (_, slice) = slices().await;
    slice.categories.create(category("Sport")).await.unwrap();
    let err = slice.categories.create(category("Sport")).await.unwrap_err();
    assert!(matches!(err, ActivitiesError::Conflict { .. }));
}

#[tokio::test]
async fn category_in_use_cannot_be_deleted() {
    let (_, slice) = slices().await;
    let sport = slice.categories.create(category("Sport")).await.unwrap();
    let football =
        slice.activities.create(activity("Fußball", &sport.id, Weekdays::MONDAY)).await.unwrap();

    let err = slice.categories.delete(&sport.id).await.unwrap_err();
    assert!(matches!(err, ActivitiesError::Conflict { .. }));

    slice.activities.delete(&football.id).await.unwrap();
    slice.categories.delete(&sport.id).await.unwrap();
    assert!(slice.categories.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn activity_references_must_exist() {
    let (_, slice) = slices().await;
    let err = slice.activities.create(activity("Chor", "missing", Weekdays::FRIDAY)).await.unwrap_err();
    assert!(matches!(err, ActivitiesError::NotFound { .. }));

    let music = slice.categories.create(category("Musik")).await.unwrap();
    let mut request = activity("Chor", &music.id, Weekdays::FRIDAY);
    request.planned_room_id = Some("missing".to_owned());
    let err = slice.activities.create(request).await.unwrap_err();
    assert!(
        matches!(err, ActivitiesError::Facilities { source: FacilitiesError::NotFound { .. }, .. }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn activity_name_is_unique_per_category() {
    let (facilities, slice) = slices().await;
    let room = facilities
        .rooms
        .create(CreateRoomRequest {
            name: "Musikraum".to_owned(),
            building: None,
            floor: Some(1),
            capacity: 30,
            category: "Fachraum".to_owned(),
            color: None,
        })
        .await
        .unwrap();
    let music = slice.categories.create(category("Musik")).await.unwrap();
    let sport = slice.categories.create(category("Sport")).await.unwrap();

    let mut request = activity("Chor", &music.id, Weekdays::FRIDAY);
    request.planned_room_id = Some(format!("room:{}", room.id));
    let chor = slice.activities.create(request).await.unwrap();
    assert_eq!(chor.planned_room_id.as_deref(), Some(room.id.as_str()));

    let err = slice.activities.create(activity("Chor", &music.id, Weekdays::MONDAY)).await.unwrap_err();
    assert!(matches!(err, ActivitiesError::Conflict { .. }));

    // Same name in another category is fine.
    slice.activities.create(activity("Chor", &sport.id, Weekdays::MONDAY)).await.unwrap();
}

#[tokio::test]
async fn list_filters_by_category_and_weekday() {
    let (_, slice) = slices().await;
    let sport = slice.categories.create(category("Sport")).await.unwrap();
    let art = slice.categories.create(category("Kunst")).await.unwrap();

    slice.activities.create(activity("Fußball", &sport.id, Weekdays::MONDAY | Weekdays::WEDNESDAY)).await.unwrap();
    slice.activities.create(activity("Basketball", &sport.id, Weekdays::TUESDAY)).await.unwrap();
    slice.activities.create(activity("Malen", &art.id, Weekdays::WEDNESDAY)).await.unwrap();

    let all = slice.activities.list(&ActivityQuery::default()).await.unwrap();
    let names: Vec<_> = all.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Basketball", "Fußball", "Malen"]);

    let sport_only = ActivityQuery { category_id: Some(sport.id.clone()), weekday: None };
    assert_eq!(slice.activities.list(&sport_only).await.unwrap().len(), 2);

    let wednesday = ActivityQuery { category_id: None, weekday: Some("wednesday".to_owned()) };
    let names: Vec<_> = slice
        .activities
        .list(&wednesday)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, ["Fußball", "Malen"]);

    let bad = ActivityQuery { category_id: None, weekday: Some("blursday".to_owned()) };
    assert!(matches!(slice.activities.list(&bad).await, Err(ActivitiesError::Validation { .. })));
}

#[tokio::test]
async fn update_changes_schedule_and_limits() {
    let (_, slice) = slices().await;
    let sport = slice.categories.create(category("Sport")).await.unwrap();
    let football =
        slice.activities.create(activity("Fußball", &sport.id, Weekdays::MONDAY)).await.unwrap();

    let changes = UpdateActivityRequest {
        max_participants: Some(22),
        weekdays: Some(Weekdays::SCHOOL_DAYS),
        ..Default::default()
    };
    let updated = slice.activities.update(&football.id, changes).await.unwrap();
    assert_eq!(updated.max_participants, 22);
    assert_eq!(updated.schedule(), Weekdays::SCHOOL_DAYS);
    assert_eq!(updated.name, "Fußball");

    let invalid = UpdateActivityRequest { max_participants: Some(0), ..Default::default() };
    assert!(matches!(
        slice.activities.update(&football.id, invalid).await,
        Err(ActivitiesError::Validation { .. })
    ));
}

#[tokio::test]
async fn ensure_returns_the_same_records() {
    let (_, slice) = slices().await;

    let first = slice.categories.ensure(category("Schulhof")).await.unwrap();
    let second = slice.categories.ensure(category(" Schulhof ")).await.unwrap();
    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.value.id, second.value.id);

    let category_id = first.value.id;
    let found = slice.categories.find_by_name("Schulhof").await.unwrap();
    assert_eq!(found.map(|c| c.id), Some(category_id.clone()));
    let a = slice.activities.ensure(activity("Schulhof", &category_id, Weekdays::ALL)).await.unwrap();
    let b = slice.activities.ensure(activity("Schulhof", &category_id, Weekdays::ALL)).await.unwrap();
    assert!(a.created);
    assert!(!b.created);
    assert_eq!(a.value.id, b.value.id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_ensure_yields_one_category_and_activity() {
    for _ in 0..10 {
        let (_, slice) = slices().await;

        let categories: Vec<_> = (0..4)
            .map(|_| {
                let categories = slice.categories.clone();
                tokio::spawn(async move { categories.ensure(category("Schulhof")).await })
            })
            .collect();
        let mut ensured = Vec::new();
        for task in categories {
            ensured.push(task.await.unwrap().expect("losers read the winning category"));
        }
        assert_eq!(ensured.iter().filter(|c| c.created).count(), 1);
        assert!(ensured.iter().all(|c| c.value.id == ensured[0].value.id));
        let category_id = ensured[0].value.id.clone();

        let activities: Vec<_> = (0..4)
            .map(|_| {
                let activities = slice.activities.clone();
                let request = activity("Schulhof", &category_id, Weekdays::ALL);
                tokio::spawn(async move { activities.ensure(request).await })
            })
            .collect();
        let mut ensured = Vec::new();
        for task in activities {
            ensured.push(task.await.unwrap().expect("losers read the winning activity"));
        }
        assert_eq!(ensured.iter().filter(|a| a.created).count(), 1);
        assert!(ensured.iter().all(|a| a.value.id == ensured[0].value.id));

        let all = slice.activities.list(&ActivityQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
