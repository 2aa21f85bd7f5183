use crate::error::{UsersError, UsersErrorExt};
use crate::model::{
    CreatePersonRequest, CreateStaffRequest, CreateStudentRequest, Person, PersonQuery, Staff,
    Student, StudentQuery, UpdatePersonRequest, normalize_tag,
};
use crate::repository::{
    PersonRepository, StaffRecord, StaffRepository, StudentRecord, StudentRepository,
};
use fxhash::FxHashMap;
use ogs_kernel::domain::constants::{PERSON, STAFF, STUDENT};
use ogs_kernel::security::resource::ResourceGuard;
use tracing::info;

/// Persons and their RFID tags.
#[derive(Debug, Clone)]
pub struct PersonService {
    repo: PersonRepository,
    students: StudentRepository,
    staff: StaffRepository,
}

impl PersonService {
    #[must_use]
    pub const fn new(
        repo: PersonRepository,
        students: StudentRepository,
        staff: StaffRepository,
    ) -> Self {
        Self { repo, students, staff }
    }

    pub async fn create(&self, request: CreatePersonRequest) -> Result<Person, UsersError> {
        let request = request.validate()?;
        let person = self.repo.create(&request).await.context("Creating person")?;
        info!(person_id = %person.id, "Person created");
        Ok(person)
    }

    pub async fn get(&self, id: &str) -> Result<Person, UsersError> {
        let key = ResourceGuard::key(id, PERSON)?;
        self.repo.get(&key).await?.ok_or_else(|| UsersError::not_found("person", &key))
    }

    pub async fn list(&self, filter: &PersonQuery) -> Result<Vec<Person>, UsersError> {
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        self.repo.list(search).await.context("Listing persons")
    }

    pub async fn update(
        &self,
        id: &str,
        changes: UpdatePersonRequest,
    ) -> Result<Person, UsersError> {
        let changes = changes.validate()?;
        let person = self.get(id).await?;
        self.repo.update(&person.id, &changes).await?;
        self.get(&person.id).await
    }

    /// Removes a person that no student or staff record references.
    pub async fn delete(&self, id: &str) -> Result<(), UsersError> {
        let person = self.get(id).await?;
        if self.students.find_by_person(&person.id).await?.is_some() {
            return Err(UsersError::conflict(format!(
                "person '{}' is still registered as a student",
                person.id
            )));
        }
        if self.staff.find_by_person(&person.id).await?.is_some() {
            return Err(UsersError::conflict(format!(
                "person '{}' is still registered as staff",
                person.id
            )));
        }

        self.repo.delete(&person.id).await.context("Deleting person")?;
        info!(person_id = %person.id, "Person deleted");
        Ok(())
    }

    /// Gives the person `raw_tag`, releasing any card they held before.
    pub async fn assign_tag(&self, id: &str, raw_tag: &str) -> Result<Person, UsersError> {
        let tag = normalize_tag(raw_tag)?;
        let person = self.get(id).await?;

        if let Some(card) = self.repo.card(&tag).await? {
            if card.person_id == person.id {
                return Ok(person);
            }
            return Err(UsersError::conflict(format!("RFID tag {tag} is assigned to another person")));
        }

        match self.repo.assign_tag(&person.id, &tag).await {
            Ok(()) => {},
            Err(err) if err.is_conflict() => {
                return Err(UsersError::conflict(format!(
                    "RFID tag {tag} is assigned to another person"
                )));
            },
            Err(err) => return Err(err.into()),
        }

        info!(person_id = %person.id, tag = %tag, "RFID tag assigned");
        self.get(&person.id).await
    }

    pub async fn unassign_tag(&self, id: &str) -> Result<Person, UsersError> {
        let person = self.get(id).await?;
        let Some(tag) = person.tag_id.as_deref() else {
            return Err(UsersError::NotFound {
                message: format!("person '{}' has no RFID tag", person.id).into(),
                context: None,
            });
        };

        self.repo.unassign_tag(&person.id).await.context("Releasing RFID tag")?;
        info!(person_id = %person.id, tag = %tag, "RFID tag released");
        self.get(&person.id).await
    }

    pub async fn find_by_tag(&self, raw_tag: &str) -> Result<Person, UsersError> {
        let tag = normalize_tag(raw_tag)?;
        let card = self
            .repo
            .card(&tag)
            .await?
            .ok_or_else(|| UsersError::not_found("RFID tag", &tag))?;
        self.repo
            .get(&card.person_id)
            .await?
            .ok_or_else(|| UsersError::not_found("person", &card.person_id))
    }

    async fn names(&self, person_ids: Vec<String>) -> Result<FxHashMap<String, Person>, UsersError> {
        let persons = self.repo.get_many(&person_ids).await.context("Loading names")?;
        Ok(persons.into_iter().map(|p| (p.id.clone(), p)).collect())
    }
}

fn student_view(record: StudentRecord, person: &Person) -> Student {
    Student {
        id: record.id,
        person_id: record.person_id,
        first_name: person.first_name.clone(),
        last_name: person.last_name.clone(),
        school_class: record.school_class,
        guardian_name: record.guardian_name,
        guardian_contact: record.guardian_contact,
        created_at: record.created_at,
    }
}

fn staff_view(record: StaffRecord, person: &Person) -> Staff {
    Staff {
        id: record.id,
        person_id: record.person_id,
        first_name: person.first_name.clone(),
        last_name: person.last_name.clone(),
        position: record.position,
        created_at: record.created_at,
    }
}

#[derive(Debug, Clone)]
pub struct StudentService {
    repo: StudentRepository,
    persons: PersonService,
}

impl StudentService {
    #[must_use]
    pub const fn new(repo: StudentRepository, persons: PersonService) -> Self {
        Self { repo, persons }
    }

    pub async fn create(&self, request: CreateStudentRequest) -> Result<Student, UsersError> {
        let request = request.validate()?;
        let person = self.persons.get(&request.person_id).await?;

        let record = match self
            .repo
            .create(
                &person.id,
                &request.school_class,
                request.guardian_name.as_deref(),
                request.guardian_contact.as_deref(),
            )
            .await
        {
            Ok(record) => record,
            Err(err) if err.is_conflict() => {
                return Err(UsersError::conflict(format!(
                    "person '{}' is already a student",
                    person.id
                )));
            },
            Err(err) => return Err(err.into()),
        };

        info!(student_id = %record.id, person_id = %person.id, "Student created");
        Ok(student_view(record, &person))
    }

    pub async fn get(&self, id: &str) -> Result<Student, UsersError> {
        let key = ResourceGuard::key(id, STUDENT)?;
        let record =
            self.repo.get(&key).await?.ok_or_else(|| UsersError::not_found("student", &key))?;
        let person = self.persons.get(&record.person_id).await?;
        Ok(student_view(record, &person))
    }

    /// Resolves several students at once; unknown ids are skipped.
    pub async fn get_many(&self, ids: &[String]) -> Result<Vec<Student>, UsersError> {
        let records = self.repo.get_many(ids).await.context("Loading students")?;
        let names = self.persons.names(records.iter().map(|r| r.person_id.clone()).collect()).await?;
        Ok(records
            .into_iter()
            .filter_map(|record| {
                let person = names.get(&record.person_id)?;
                Some(student_view(record, person))
            })
            .collect())
    }

    pub async fn by_person(&self, person_id: &str) -> Result<Student, UsersError> {
        let person = self.persons.get(person_id).await?;
        let record = self
            .repo
            .find_by_person(&person.id)
            .await?
            .ok_or_else(|| UsersError::not_found("student for person", &person.id))?;
        Ok(student_view(record, &person))
    }

    /// Students ordered by last and first name.
    pub async fn list(&self, filter: &StudentQuery) -> Result<Vec<Student>, UsersError> {
        let school_class = filter.school_class.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let records = self.repo.list(school_class).await.context("Listing students")?;
        let names = self.persons.names(records.iter().map(|r| r.person_id.clone()).collect()).await?;

        let mut students: Vec<Student> = records
            .into_iter()
            .filter_map(|record| {
                let person = names.get(&record.person_id)?;
                Some(student_view(record, person))
            })
            .collect();
        students.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(students)
    }

    pub async fn delete(&self, id: &str) -> Result<(), UsersError> {
        let student = self.get(id).await?;
        self.repo.delete(&student.id).await.context("Deleting student")?;
        info!(student_id = %student.id, "Student deleted");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StaffService {
    repo: StaffRepository,
    persons: PersonService,
}

impl StaffService {
    #[must_use]
    pub const fn new(repo: StaffRepository, persons: PersonService) -> Self {
        Self { repo, persons }
    }

    pub async fn create(&self, request: CreateStaffRequest) -> Result<Staff, UsersError> {
        let request = request.validate();
        let person = self.persons.get(&request.person_id).await?;

        let record = match self.repo.create(&person.id, request.position.as_deref()).await {
            Ok(record) => record,
            Err(err) if err.is_conflict() => {
                return Err(UsersError::conflict(format!(
                    "person '{}' is already staff",
                    person.id
                )));
            },
            Err(err) => return Err(err.into()),
        };

        info!(staff_id = %record.id, person_id = %person.id, "Staff member created");
        Ok(staff_view(record, &person))
    }

    pub async fn get(&self, id: &str) -> Result<Staff, UsersError> {
        let key = ResourceGuard::key(id, STAFF)?;
        let record =
            self.repo.get(&key).await?.ok_or_else(|| UsersError::not_found("staff", &key))?;
        let person = self.persons.get(&record.person_id).await?;
        Ok(staff_view(record, &person))
    }

    /// Resolves several staff members at once; unknown ids are skipped.
    pub async fn get_many(&self, ids: &[String]) -> Result<Vec<Staff>, UsersError> {
        let records = self.repo.get_many(ids).await.context("Loading staff")?;
        let names = self.persons.names(records.iter().map(|r| r.person_id.clone()).collect()).await?;
        Ok(records
            .into_iter()
            .filter_map(|record| {
                let person = names.get(&record.person_id)?;
                Some(staff_view(record, person))
            })
            .collect())
    }

    pub async fn list(&self) -> Result<Vec<Staff>, UsersError> {
        let records = self.repo.list().await.context("Listing staff")?;
        let names = self.persons.names(records.iter().map(|r| r.person_id.clone()).collect()).await?;

        let mut staff: Vec<Staff> = records
            .into_iter()
            .filter_map(|record| {
                let person = names.get(&record.person_id)?;
                Some(staff_view(record, person))
            })
            .collect();
        staff.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        Ok(staff)
    }

    pub async fn delete(&self, id: &str) -> Result<(), UsersError> {
        let staff = self.get(id).await?;
        self.repo.delete(&staff.id).await.context("Deleting staff")?;
        info!(staff_id = %staff.id, "Staff member deleted");
        Ok(())
    }
}
