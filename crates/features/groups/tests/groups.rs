use ogs_database::Database;
use ogs_facilities::FacilitiesError;
use ogs_groups::model::{CreateGroupRequest, UpdateGroupRequest};
use ogs_groups::{Groups, GroupsError, init};
use ogs_users::model::{CreatePersonRequest, CreateStudentRequest, Student};
use ogs_users::{Users, UsersError};

async fn slices() -> (Users, Groups) {
    let db = Database::builder()
        .url("mem://")
        .session("test", "groups")
        .init()
        .await
        .expect("connect to mem://");
    let facilities = ogs_facilities::init(&db).expect("init facilities");
    let users = ogs_users::init(&db).expect("init users");
    let groups = init(&db, &facilities, &users).expect("init groups");
    (users, groups)
}

async fn student(users: &Users, first: &str, last: &str) -> Student {
    let person = users
        .persons
        .create(CreatePersonRequest { first_name: first.to_owned(), last_name: last.to_owned() })
        .await
        .unwrap();
    users
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

fn group(name: &str) -> CreateGroupRequest {
    CreateGroupRequest { name: name.to_owned(), room_id: None }
}

#[tokio::test]
async fn group_crud() {
    let (_, slice) = slices().await;

    let igel = slice.groups.create(group("Igel")).await.unwrap();
    let err = slice.groups.create(group("Igel")).await.unwrap_err();
    assert!(matches!(err, GroupsError::Conflict { .. }));

    let renamed = slice
        .groups
        .update(&igel.id, UpdateGroupRequest { name: Some("Füchse".to_owned()), room_id: None })
        .await
        .unwrap();
    assert_eq!(renamed.name, "Füchse");

    slice.groups.delete(&igel.id).await.unwrap();
    assert!(matches!(slice.groups.get(&igel.id).await, Err(GroupsError::NotFound { .. })));
}

#[tokio::test]
async fn home_room_must_exist() {
    let (_, slice) = slices().await;
    let request = CreateGroupRequest { name: "Igel".to_owned(), room_id: Some("nowhere".to_owned()) };
    let err = slice.groups.create(request).await.unwrap_err();
    assert!(matches!(
        err,
        GroupsError::Facilities { source: FacilitiesError::NotFound { .. }, .. }
    ));
}

#[tokio::test]
async fn adding_moves_the_student() {
    let (users, slice) = slices().await;
    let igel = slice.groups.create(group("Igel")).await.unwrap();
    let fuechse = slice.groups.create(group("Füchse")).await.unwrap();
    let mia = student(&users, "Mia", "Huber").await;
    let jonas = student(&users, "Jonas", "Albers").await;

    slice.groups.add_member(&igel.id, &mia.id).await.unwrap();
    slice.groups.add_member(&igel.id, &jonas.id).await.unwrap();
    // Adding twice keeps a single membership.
    slice.groups.add_member(&igel.id, &mia.id).await.unwrap();

    let members = slice.groups.list_members(&igel.id).await.unwrap();
    let names: Vec<_> = members.iter().map(|m| m.last_name.as_str()).collect();
    assert_eq!(names, ["Albers", "Huber"]);

    let moved = slice.groups.add_member(&fuechse.id, &mia.id).await.unwrap();
    assert_eq!(moved.group_id, fuechse.id);
    assert_eq!(slice.groups.list_members(&igel.id).await.unwrap().len(), 1);
    assert_eq!(slice.groups.list_members(&fuechse.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_student_cannot_join() {
    let (_, slice) = slices().await;
    let igel = slice.groups.create(group("Igel")).await.unwrap();
    let err = slice.groups.add_member(&igel.id, "ghost").await.unwrap_err();
    assert!(matches!(err, GroupsError::Users { source: UsersError::NotFound { .. }, .. }));
}

#[tokio::test]
async fn remove_member_and_delete_group() {
    let (users, slice) = slices().await;
    let igel = slice.groups.create(group("Igel")).await.unwrap();
    let fuechse = slice.groups.create(group("Füchse")).await.unwrap();
    let mia = student(&users, "Mia", "Huber").await;
    let jonas = student(&users, "Jonas", "Albers").await;
    slice.groups.add_member(&igel.id, &mia.id).await.unwrap();
    slice.groups.add_member(&igel.id, &jonas.id).await.unwrap();

    let err = slice.groups.remove_member(&fuechse.id, &mia.id).await.unwrap_err();
    assert!(matches!(err, GroupsError::NotFound { .. }));

    slice.groups.remove_member(&igel.id, &mia.id).await.unwrap();
    assert_eq!(slice.groups.list_members(&igel.id).await.unwrap().len(), 1);

    slice.groups.delete(&igel.id).await.unwrap();
    // The membership went with the group.
    let joined = slice.groups.add_member(&fuechse.id, &jonas.id).await.unwrap();
    assert_eq!(joined.group_id, fuechse.id);
}
