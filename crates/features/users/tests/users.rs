use ogs_database::Database;
use ogs_users::model::{
    CreatePersonRequest, CreateStaffRequest, CreateStudentRequest, PersonQuery, StudentQuery,
    UpdatePersonRequest,
};
use ogs_users::{Users, UsersError, init};

async fn users() -> Users {
    let db = Database::builder()
        .url("mem://")
        .session("test", "users")
        .init()
        .await
        .expect("connect to mem://");
    init(&db).expect("init users")
}

fn person(first: &str, last: &str) -> CreatePersonRequest {
    CreatePersonRequest { first_name: first.to_owned(), last_name: last.to_owned() }
}

fn student(person_id: &str, class: &str) -> CreateStudentRequest {
    CreateStudentRequest {
        person_id: person_id.to_owned(),
        school_class: class.to_owned(),
        guardian_name: Some("Petra Huber".to_owned()),
        guardian_contact: None,
    }
}

#[tokio::test]
async fn person_crud() {
    let slice = users().await;

    let created = slice.persons.create(person(" Mia ", "Huber")).await.unwrap();
    assert_eq!(created.first_name, "Mia");
    assert!(created.tag_id.is_none());

    let changes = UpdatePersonRequest { last_name: Some("Berger".to_owned()), ..Default::default() };
    let updated = slice.persons.update(&created.id, changes).await.unwrap();
    assert_eq!(updated.first_name, "Mia");
    assert_eq!(updated.last_name, "Berger");

    slice.persons.delete(&created.id).await.unwrap();
    let err = slice.persons.get(&created.id).await.unwrap_err();
    assert!(matches!(err, UsersError::NotFound { .. }));
}

#[tokio::test]
async fn empty_names_are_rejected() {
    let slice = users().await;
    let err = slice.persons.create(person("  ", "Huber")).await.unwrap_err();
    assert!(matches!(err, UsersError::Validation { .. }));
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let slice = users().await;
    slice.persons.create(person("Mia", "Huber")).await.unwrap();
    slice.persons.create(person("Jonas", "Albers")).await.unwrap();
    slice.persons.create(person("Lea", "Hubertus")).await.unwrap();

    let all = slice.persons.list(&PersonQuery::default()).await.unwrap();
    let last: Vec<_> = all.iter().map(|p| p.last_name.as_str()).collect();
    assert_eq!(last, ["Albers", "Huber", "Hubertus"]);

    let found = slice.persons.list(&PersonQuery { search: Some("HUB".to_owned()) }).await.unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn tags_are_unique_across_persons() {
    let slice = users().await;
    let mia = slice.persons.create(person("Mia", "Huber")).await.unwrap();
    let jonas = slice.persons.create(person("Jonas", "Albers")).await.unwrap();

    let tagged = slice.persons.assign_tag(&mia.id, "04:a1:b2:c3").await.unwrap();
    assert_eq!(tagged.tag_id.as_deref(), Some("04A1B2C3"));

    let again = slice.persons.assign_tag(&mia.id, "04A1B2C3").await.unwrap();
    assert_eq!(again.tag_id.as_deref(), Some("04A1B2C3"));

    let err = slice.persons.assign_tag(&jonas.id, "04-A1-B2-C3").await.unwrap_err();
    assert!(matches!(err, UsersError::Conflict { .. }), "unexpected error: {err}");

    let owner = slice.persons.find_by_tag("04a1b2c3").await.unwrap();
    assert_eq!(owner.id, mia.id);
}

#[tokio::test]
async fn reassigning_releases_the_previous_tag() {
    let slice = users().await;
    let mia = slice.persons.create(person("Mia", "Huber")).await.unwrap();
    let jonas = slice.persons.create(person("Jonas", "Albers")).await.unwrap();

    slice.persons.assign_tag(&mia.id, "AAAA0001").await.unwrap();
    slice.persons.assign_tag(&mia.id, "AAAA0002").await.unwrap();

    let err = slice.persons.find_by_tag("AAAA0001").await.unwrap_err();
    assert!(matches!(err, UsersError::NotFound { .. }));

    // The released tag can go to somebody else.
    let jonas = slice.persons.assign_tag(&jonas.id, "AAAA0001").await.unwrap();
    assert_eq!(jonas.tag_id.as_deref(), Some("AAAA0001"));
}

#[tokio::test]
async fn unassign_requires_a_tag() {
    let slice = users().await;
    let mia = slice.persons.create(person("Mia", "Huber")).await.unwrap();

    let err = slice.persons.unassign_tag(&mia.id).await.unwrap_err();
    assert!(matches!(err, UsersError::NotFound { .. }));

    slice.persons.assign_tag(&mia.id, "DEADBEEF").await.unwrap();
    let released = slice.persons.unassign_tag(&mia.id).await.unwrap();
    assert!(released.tag_id.is_none());
    assert!(slice.persons.find_by_tag("DEADBEEF").await.is_err());
}

#[tokio::test]
async fn malformed_tag_is_a_validation_error() {
    let slice = users().await;
    let mia = slice.persons.create(person("Mia", "Huber")).await.unwrap();
    let err = slice.persons.assign_tag(&mia.id, "xyz").await.unwrap_err();
    assert!(matches!(err, UsersError::Validation { .. }));
}

#[tokio::test]
async fn students_embed_names_and_are_unique_per_person() {
    let slice = users().await;
    let mia = slice.persons.create(person("Mia", "Huber")).await.unwrap();
    let jonas = slice.persons.create(person("Jonas", "Albers")).await.unwrap();

    let created = slice.students.create(student(&mia.id, "3b")).await.unwrap();
    assert_eq!(created.first_name, "Mia");
    assert_eq!(created.guardian_name.as_deref(), Some("Petra Huber"));

    let err = slice.students.create(student(&mia.id, "4a")).await.unwrap_err();
    assert!(matches!(err, UsersError::Conflict { .. }), "unexpected error: {err}");

    slice.students.create(student(&jonas.id, "1a")).await.unwrap();

    let all = slice.students.list(&StudentQuery::default()).await.unwrap();
    let names: Vec<_> = all.iter().map(|s| s.last_name.as_str()).collect();
    assert_eq!(names, ["Albers", "Huber"]);

    let class = slice
        .students
        .list(&StudentQuery { school_class: Some("3b".to_owned()) })
        .await
        .unwrap();
    assert_eq!(class.len(), 1);

    let by_person = slice.students.by_person(&mia.id).await.unwrap();
    assert_eq!(by_person.id, created.id);
}

#[tokio::test]
async fn student_needs_an_existing_person() {
    let slice = users().await;
    let err = slice.students.create(student("nobody", "3b")).await.unwrap_err();
    assert!(matches!(err, UsersError::NotFound { .. }));
}

#[tokio::test]
async fn referenced_person_cannot_be_deleted() {
    let slice = users().await;
    let mia = slice.persons.create(person("Mia", "Huber")).await.unwrap();
    let created = slice.students.create(student(&mia.id, "3b")).await.unwrap();

    let err = slice.persons.delete(&mia.id).await.unwrap_err();
    assert!(matches!(err, UsersError::Conflict { .. }));

    slice.students.delete(&created.id).await.unwrap();
    slice.persons.delete(&mia.id).await.unwrap();
}

#[tokio::test]
async fn staff_lifecycle() {
    let slice = users().await;
    let anna = slice.persons.create(person("Anna", "Schmidt")).await.unwrap();

    let request = CreateStaffRequest { person_id: anna.id.clone(), position: Some(" Erzieherin ".to_owned()) };
    let staff = slice.staff.create(request).await.unwrap();
    assert_eq!(staff.position.as_deref(), Some("Erzieherin"));
    assert_eq!(staff.last_name, "Schmidt");

    let request = CreateStaffRequest { person_id: anna.id.clone(), position: None };
    let err = slice.staff.create(request).await.unwrap_err();
    assert!(matches!(err, UsersError::Conflict { .. }));

    let many = slice.staff.get_many(&[staff.id.clone(), "missing".to_owned()]).await.unwrap();
    assert_eq!(many.len(), 1);
    assert_eq!(slice.staff.list().await.unwrap().len(), 1);

    let err = slice.persons.delete(&anna.id).await.unwrap_err();
    assert!(matches!(err, UsersError::Conflict { .. }));

    slice.staff.delete(&staff.id).await.unwrap();
    assert!(matches!(slice.staff.get(&staff.id).await, Err(UsersError::NotFound { .. })));
}
