use crate::error::{GroupsError, GroupsErrorExt};
use crate::model::{CreateGroupRequest, GroupMember, SchoolGroup, UpdateGroupRequest};
use crate::repository::{GroupRepository, Membership};
use ogs_facilities::service::RoomService;
use ogs_kernel::domain::constants::{SCHOOL_GROUP, STUDENT};
use ogs_kernel::security::resource::ResourceGuard;
use ogs_users::model::Student;
use ogs_users::service::StudentService;
use tracing::info;

/// School groups and their membership.
#[derive(Debug, Clone)]
pub struct GroupService {
    repo: GroupRepository,
    rooms: RoomService,
    students: StudentService,
}

fn member_view(membership: Membership, student: &Student) -> GroupMember {
    GroupMember {
        group_id: membership.group_id,
        student_id: membership.student_id,
        first_name: student.first_name.clone(),
        last_name: student.last_name.clone(),
        school_class: student.school_class.clone(),
        joined_at: membership.joined_at,
    }
}

impl GroupService {
    #[must_use]
    pub const fn new(repo: GroupRepository, rooms: RoomService, students: StudentService) -> Self {
        Self { repo, rooms, students }
    }

    async fn home_room(&self, room_id: Option<&str>) -> Result<Option<String>, GroupsError> {
        match room_id {
            Some(id) => Ok(Some(self.rooms.get(id).await.context("Resolving home room")?.id)),
            None => Ok(None),
        }
    }

    pub async fn create(&self, request: CreateGroupRequest) -> Result<SchoolGroup, GroupsError> {
        let mut request = request.validate()?;
        request.room_id = self.home_room(request.room_id.as_deref()).await?;

        match self.repo.create(&request).await {
            Ok(group) => {
                info!(group_id = %group.id, name = %group.name, "School group created");
                Ok(group)
            },
            Err(err) if err.is_conflict() => Err(GroupsError::Conflict {
                message: format!("a group named '{}' already exists", request.name).into(),
                context: None,
            }),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, id: &str) -> Result<SchoolGroup, GroupsError> {
        let key = ResourceGuard::key(id, SCHOOL_GROUP)?;
        self.repo.get(&key).await?.ok_or_else(|| GroupsError::not_found("group", &key))
    }

    pub async fn list(&self) -> Result<Vec<SchoolGroup>, GroupsError> {
        self.repo.list().await.context("Listing groups")
    }

    pub async fn update(
        &self,
        id: &str,
        changes: UpdateGroupRequest,
    ) -> Result<SchoolGroup, GroupsError> {
        let mut changes = changes.validate()?;
        let group = self.get(id).await?;
        changes.room_id = self.home_room(changes.room_id.as_deref()).await?;

        match self.repo.update(&group.id, &changes).await {
            Ok(()) => {},
            Err(err) if err.is_conflict() => {
                return Err(GroupsError::Conflict {
                    message: format!(
                        "a group named '{}' already exists",
                        changes.name.as_deref().unwrap_or(&group.name)
                    )
                    .into(),
                    context: None,
                });
            },
            Err(err) => return Err(err.into()),
        }

        self.get(&group.id).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), GroupsError> {
        let group = self.get(id).await?;
        self.repo.delete(&group.id).await.context("Deleting group")?;
        info!(group_id = %group.id, "School group deleted");
        Ok(())
    }

    /// Adds the student to the group; a student in another group is moved.
    pub async fn add_member(
        &self,
        group_id: &str,
        student_id: &str,
    ) -> Result<GroupMember, GroupsError> {
        let group = self.get(group_id).await?;
        let student = self.students.get(student_id).await.context("Resolving student")?;

        let previous = self.repo.membership(&student.id).await?;
        let membership = match previous {
            Some(existing) if existing.group_id == group.id => existing,
            _ => self.repo.upsert_member(&group.id, &student.id).await?,
        };

        info!(group_id = %group.id, student_id = %student.id, "Student joined group");
        Ok(member_view(membership, &student))
    }

    pub async fn remove_member(&self, group_id: &str, student_id: &str) -> Result<(), GroupsError> {
        let group = self.get(group_id).await?;
        let student_key = ResourceGuard::key(student_id, STUDENT)?;

        match self.repo.membership(&student_key).await? {
            Some(membership) if membership.group_id == group.id => {
                self.repo.remove_member(&student_key).await.context("Removing member")?;
                info!(group_id = %group.id, student_id = %student_key, "Student left group");
                Ok(())
            },
            _ => Err(GroupsError::NotFound {
                message: format!("student '{student_key}' is not a member of '{}'", group.name)
                    .into(),
                context: None,
            }),
        }
    }

    /// Members ordered by last and first name.
    pub async fn list_members(&self, group_id: &str) -> Result<Vec<GroupMember>, GroupsError> {
        let group = self.get(group_id).await?;
        let memberships = self.repo.members(&group.id).await?;
        let ids: Vec<String> = memberships.iter().map(|m| m.student_id.clone()).collect();
        let students = self.students.get_many(&ids).await.context("Loading members")?;

        let mut members: Vec<GroupMember> = memberships
            .into_iter()
            .filter_map(|membership| {
                let student = students.iter().find(|s| s.id == membership.student_id)?;
                Some(member_view(membership, student))
            })
            .collect();
        members.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(members)
    }
}
