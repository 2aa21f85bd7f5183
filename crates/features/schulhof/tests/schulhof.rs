use ogs_active::Active;
use ogs_active::model::SessionQuery;
use ogs_database::Database;
use ogs_kernel::domain::config::SchulhofConfig;
use ogs_kernel::server::ApiError;
use ogs_schulhof::model::SupervisionAction;
use ogs_schulhof::{Schulhof, SchulhofError, init};
use ogs_users::Users;
use ogs_users::model::{CreatePersonRequest, CreateStaffRequest, CreateStudentRequest, Staff, Student};

const MONDAY: &str = "2025-03-10";
const TUESDAY: &str = "2025-03-11";

struct Fixture {
    users: Users,
    active: Active,
    schulhof: Schulhof,
}

async fn fixture() -> Fixture {
    let db = Database::builder()
        .url("mem://")
        .session("test", "schulhof")
        .init()
        .await
        .expect("connect to mem://");
    let facilities = ogs_facilities::init(&db).expect("init facilities");
    let users = ogs_users::init(&db).expect("init users");
    let activities = ogs_activities::init(&db, &facilities).expect("init activities");
    let active = ogs_active::init(&db, &facilities, &activities, &users).expect("init active");
    let schulhof = init(&SchulhofConfig::default(), &facilities, &activities, &active, &users)
        .expect("init schulhof");
    Fixture { users, active, schulhof }
}

impl Fixture {
    async fn staff(&self, first: &str) -> Staff {
        let person = self
            .users
            .persons
            .create(CreatePersonRequest { first_name: first.to_owned(), last_name: "Team".to_owned() })
            .await
            .unwrap();
        self.users
            .staff
            .create(CreateStaffRequest { person_id: person.id, position: Some("Erzieherin".to_owned()) })
            .await
            .unwrap()
    }

    async fn student(&self, first: &str) -> Student {
        let person = self
            .users
            .persons
            .create(CreatePersonRequest { first_name: first.to_owned(), last_name: "Kind".to_owned() })
            .await
            .unwrap();
        self.users
            .students
            .create(CreateStudentRequest {
                person_id: person.id,
                school_class: "2a".to_owned(),
                guardian_name: None,
                guardian_contact: None,
            })
            .await
            .unwrap()
    }
}

fn status_code(err: SchulhofError) -> u16 {
    ApiError::from(err).status().as_u16()
}

#[tokio::test]
async fn infrastructure_is_provisioned_once() {
    let fx = fixture().await;

    let first = fx.schulhof.svc.ensure_infrastructure().await.unwrap();
    let second = fx.schulhof.svc.ensure_infrastructure().await.unwrap();

    assert_eq!(first.room.id, second.room.id);
    assert_eq!(first.category.id, second.category.id);
    assert_eq!(first.activity.id, second.activity.id);
    assert_eq!(first.room.name, "Schulhof");
    assert_eq!(first.room.capacity, 200);
    assert_eq!(first.activity.max_participants, 250);
    assert_eq!(first.activity.planned_room_id.as_deref(), Some(first.room.id.as_str()));
    assert!(first.activity.is_open);
}

#[tokio::test]
async fn status_does_not_provision() {
    let fx = fixture().await;

    let status = fx.schulhof.svc.status_on(None, MONDAY).await.unwrap();
    assert!(!status.exists);
    assert_eq!(status.room_name, "Schulhof");
    assert!(status.room_id.is_none());
    assert!(status.active_group_id.is_none());
    assert_eq!(status.supervisor_count, 0);

    // Still nothing after the read.
    let again = fx.schulhof.svc.status_on(None, MONDAY).await.unwrap();
    assert!(!again.exists);
}

#[tokio::test]
async fn starting_twice_keeps_one_supervision() {
    let fx = fixture().await;
    let anna = fx.staff("Anna").await;

    let first =
        fx.schulhof.svc.toggle_supervision_on(&anna.id, SupervisionAction::Start, MONDAY).await.unwrap();
    let second =
        fx.schulhof.svc.toggle_supervision_on(&anna.id, SupervisionAction::Start, MONDAY).await.unwrap();

    assert_eq!(first.active_group_id, second.active_group_id);
    assert_eq!(second.supervisor_count, 1);
    assert!(second.is_user_supervising);

    let status = fx.schulhof.svc.status_on(Some(&anna.id), MONDAY).await.unwrap();
    assert!(status.exists);
    assert!(status.is_user_supervising);
    assert_eq!(status.active_group_id.as_deref(), Some(first.active_group_id.as_str()));
    assert_eq!(status.supervisors.len(), 1);
    assert_eq!(status.supervisors[0].first_name, "Anna");
}

#[tokio::test]
async fn two_supervisors_share_the_session() {
    let fx = fixture().await;
    let anna = fx.staff("Anna").await;
    let ben = fx.staff("Ben").await;

    fx.schulhof.svc.toggle_supervision_on(&anna.id, SupervisionAction::Start, MONDAY).await.unwrap();
    let outcome =
        fx.schulhof.svc.toggle_supervision_on(&ben.id, SupervisionAction::Start, MONDAY).await.unwrap();
    assert_eq!(outcome.supervisor_count, 2);

    let outcome =
        fx.schulhof.svc.toggle_supervision_on(&anna.id, SupervisionAction::Stop, MONDAY).await.unwrap();
    assert_eq!(outcome.supervisor_count, 1);
    assert!(!outcome.is_user_supervising);

    // The session stays open for the remaining supervisor and its students.
    let session = fx.active.sessions.get(&outcome.active_group_id).await.unwrap();
    assert!(session.is_open());

    let status = fx.schulhof.svc.status_on(Some(&anna.id), MONDAY).await.unwrap();
    assert!(!status.is_user_supervising);
    assert_eq!(status.supervisor_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_starts_share_one_session() {
    for _ in 0..10 {
        let fx = fixture().await;
        let anna = fx.staff("Anna").await;
        let ben = fx.staff("Ben").await;

        let tasks: Vec<_> = [anna.id.clone(), ben.id.clone()]
            .into_iter()
            .map(|staff_id| {
                let svc = fx.schulhof.svc.clone();
                tokio::spawn(async move {
                    svc.toggle_supervision_on(&staff_id, SupervisionAction::Start, MONDAY).await
                })
            })
            .collect();

        let mut outcomes = Vec::new();
        for task in tasks {
            outcomes.push(task.await.unwrap().expect("both supervisors get the session"));
        }
        assert_eq!(outcomes[0].active_group_id, outcomes[1].active_group_id);

        let open = fx
            .active
            .sessions
            .list(SessionQuery { day: Some(MONDAY.to_owned()), open_only: true })
            .await
            .unwrap();
        assert_eq!(open.len(), 1);

        let status = fx.schulhof.svc.status_on(Some(&ben.id), MONDAY).await.unwrap();
        assert_eq!(status.supervisor_count, 2);
        assert_eq!(status.supervisors.len(), 2);
        assert!(status.is_user_supervising);
    }
}

#[tokio::test]
async fn stop_without_session_is_not_found() {
    let fx = fixture().await;
    let anna = fx.staff("Anna").await;

    let err = fx
        .schulhof
        .svc
        .toggle_supervision_on(&anna.id, SupervisionAction::Stop, MONDAY)
        .await
        .unwrap_err();
    assert!(matches!(err, SchulhofError::NotFound { .. }));
    assert_eq!(status_code(err), 404);
}

#[tokio::test]
async fn stop_by_non_supervisor_is_not_found() {
    let fx = fixture().await;
    let anna = fx.staff("Anna").await;
    let ben = fx.staff("Ben").await;

    fx.schulhof.svc.toggle_supervision_on(&anna.id, SupervisionAction::Start, MONDAY).await.unwrap();
    let err = fx
        .schulhof
        .svc
        .toggle_supervision_on(&ben.id, SupervisionAction::Stop, MONDAY)
        .await
        .unwrap_err();
    assert_eq!(status_code(err), 404);
}

#[tokio::test]
async fn unknown_staff_cannot_start() {
    let fx = fixture().await;

    let err = fx
        .schulhof
        .svc
        .toggle_supervision_on("nobody", SupervisionAction::Start, MONDAY)
        .await
        .unwrap_err();
    assert_eq!(status_code(err), 404);

    // Rejected before anything was provisioned.
    let status = fx.schulhof.svc.status_on(None, MONDAY).await.unwrap();
    assert!(!status.exists);
}

#[tokio::test]
async fn next_day_start_closes_the_old_session() {
    let fx = fixture().await;
    let anna = fx.staff("Anna").await;
    let mia = fx.student("Mia").await;

    let monday =
        fx.schulhof.svc.toggle_supervision_on(&anna.id, SupervisionAction::Start, MONDAY).await.unwrap();
    fx.active.visits.check_in(&monday.active_group_id, &mia.id).await.unwrap();
    let status = fx.schulhof.svc.status_on(None, MONDAY).await.unwrap();
    assert_eq!(status.student_count, 1);

    let tuesday =
        fx.schulhof.svc.toggle_supervision_on(&anna.id, SupervisionAction::Start, TUESDAY).await.unwrap();
    assert_ne!(monday.active_group_id, tuesday.active_group_id);

    let old = fx.active.sessions.get(&monday.active_group_id).await.unwrap();
    assert!(!old.is_open());
    assert!(fx.active.visits.current(&mia.id).await.unwrap().is_none());

    let filter = SessionQuery { day: None, open_only: true };
    let open = fx.active.sessions.list(filter).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, tuesday.active_group_id);
}
