use crate::error::{ActiveError, ActiveErrorExt};
use crate::model::{
    ActiveGroup, CheckIn, ScanAction, ScanOutcome, SessionQuery, Supervision, Supervisor, Visit,
    valid_day,
};
use crate::repository::{SessionRepository, SupervisionRepository, VisitRepository};
use ogs_activities::service::ActivityService;
use ogs_facilities::service::RoomService;
use ogs_kernel::prelude::*;
use ogs_users::service::{PersonService, StaffService, StudentService};
use tracing::{debug, info, warn};

// --- Sessions ---

/// Opening and closing the daily sessions of activities.
#[derive(Debug, Clone)]
pub struct SessionService {
    repo: SessionRepository,
    activities: ActivityService,
    rooms: RoomService,
}

impl SessionService {
    #[must_use]
    pub const fn new(
        repo: SessionRepository,
        activities: ActivityService,
        rooms: RoomService,
    ) -> Self {
        Self { repo, activities, rooms }
    }

    /// Starts today's session of an activity in a room.
    pub async fn start(
        &self,
        activity_id: &str,
        room_id: &str,
    ) -> Result<Ensured<ActiveGroup>, ActiveError> {
        self.start_on(activity_id, room_id, &today()).await
    }

    /// Starts, reuses or reopens the session of an activity for `day`.
    ///
    /// An open session of the day is returned as it is. An ended one is reopened in the
    /// given room. Opening fails with a conflict while the room hosts another activity's
    /// open session. Concurrent starts of the same activity settle on one session: the
    /// losers back off and return the winner's.
    pub async fn start_on(
        &self,
        activity_id: &str,
        room_id: &str,
        day: &str,
    ) -> Result<Ensured<ActiveGroup>, ActiveError> {
        let day = valid_day(day)?;
        let activity = self.activities.get(activity_id).await.context("Resolving activity")?;
        let room = self.rooms.get(room_id).await.context("Resolving room")?;

        let mut attempt = 1;
        loop {
            let existing = self.repo.find(&activity.id, &day).await?;
            if let Some(session) = existing.as_ref().filter(|s| s.is_open()) {
                debug!(active_group_id = %session.id, "Reusing open session");
                return Ok(Ensured::existing(session.clone()));
            }

            if let Some(occupant) = self.repo.open_in_room(&room.id).await? {
                // A concurrent start of this very session committed between the two reads.
                if occupant.activity_id == activity.id && occupant.day == day {
                    return Ok(Ensured::existing(occupant));
                }
                return Err(ActiveError::conflict(format!(
                    "room occupied: '{}' hosts session '{}'",
                    room.name, occupant.id
                )));
            }

            // A reopen yields the ended copy it started from.
            let written = match existing {
                None => self.repo.create(&activity.id, &room.id, &day).await,
                Some(ended) => self.repo.reopen(&ended.id, &room.id).await.map(|()| ended),
            };

            match written {
                Ok(session) if session.is_open() => {
                    info!(
                        active_group_id = %session.id,
                        activity_id = %activity.id,
                        room_id = %room.id,
                        %day,
                        "Session started"
                    );
                    return Ok(Ensured::created(session));
                },
                Ok(ended) => {
                    info!(active_group_id = %ended.id, room_id = %room.id, %day, "Session reopened");
                    return self.get(&ended.id).await.map(Ensured::existing);
                },
                Err(err) if err.is_conflict() && attempt < ENSURE_ATTEMPTS => {
                    warn!(activity_id = %activity.id, %day, attempt, "Lost session start race, reading the winner");
                    backoff(attempt).await;
                    attempt += 1;
                },
                Err(err) => return Err(err.into()),
            }
        }
    }

    pub async fn get(&self, id: &str) -> Result<ActiveGroup, ActiveError> {
        let key = ResourceGuard::key(id, ACTIVE_GROUP)?;
        self.repo
            .get(&key)
            .await?
            .ok_or_else(|| ActiveError::not_found(format!("active group '{key}'")))
    }

    /// Loads a session and requires it to be running.
    pub async fn get_open(&self, id: &str) -> Result<ActiveGroup, ActiveError> {
        let session = self.get(id).await?;
        if !session.is_open() {
            return Err(ActiveError::conflict(format!("session '{}' has ended", session.id)));
        }
        Ok(session)
    }

    pub async fn list(&self, filter: SessionQuery) -> Result<Vec<ActiveGroup>, ActiveError> {
        let filter = filter.validate()?;
        self.repo.list(filter.day.as_deref(), filter.open_only).await.context("Listing sessions")
    }

    pub async fn find(
        &self,
        activity_id: &str,
        day: &str,
    ) -> Result<Option<ActiveGroup>, ActiveError> {
        let day = valid_day(day)?;
        let activity_key = ResourceGuard::key(activity_id, ACTIVITY)?;
        self.repo.find(&activity_key, &day).await.context("Finding session")
    }

    /// Ends a session together with its supervisions and visits; ending twice is a no-op.
    pub async fn end(&self, id: &str) -> Result<ActiveGroup, ActiveError> {
        let session = self.get(id).await?;
        if !session.is_open() {
            return Ok(session);
        }

        self.repo.end(&session.id).await.context("Ending session")?;
        info!(active_group_id = %session.id, day = %session.day, "Session ended");
        self.get(&session.id).await
    }

    /// Ends every open session of the activity from a day before `before_day`.
    pub async fn close_stale(
        &self,
        activity_id: &str,
        before_day: &str,
    ) -> Result<Vec<ActiveGroup>, ActiveError> {
        let before_day = valid_day(before_day)?;
        let activity_key = ResourceGuard::key(activity_id, ACTIVITY)?;

        let stale = self.repo.stale(&activity_key, &before_day).await?;
        let mut closed = Vec::with_capacity(stale.len());
        for session in stale {
            warn!(active_group_id = %session.id, day = %session.day, "Closing stale session");
            closed.push(self.end(&session.id).await?);
        }
        Ok(closed)
    }
}

// --- Supervision ---

/// Staff members supervising sessions.
#[derive(Debug, Clone)]
pub struct SupervisionService {
    repo: SupervisionRepository,
    sessions: SessionService,
    staff: StaffService,
}

impl SupervisionService {
    #[must_use]
    pub const fn new(
        repo: SupervisionRepository,
        sessions: SessionService,
        staff: StaffService,
    ) -> Self {
        Self { repo, sessions, staff }
    }

    /// Records the staff member as supervisor of an open session.
    ///
    /// Claiming an already supervised session returns the running supervision with
    /// `created == false`; a supervision ended earlier that day is resumed.
    pub async fn claim(
        &self,
        active_group_id: &str,
        staff_id: &str,
    ) -> Result<Ensured<Supervision>, ActiveError> {
        let session = self.sessions.get_open(active_group_id).await?;
        let staff = self.staff.get(staff_id).await.context("Resolving supervisor")?;

        let row = find_or_create(
            "supervision",
            || self.repo.find(&session.id, &staff.id),
            || self.repo.create(&session.id, &staff.id),
        )
        .await
        .context("Claiming supervision")?;

        if row.created {
            info!(active_group_id = %session.id, staff_id = %staff.id, "Supervision started");
            return Ok(row);
        }
        let row = row.into_inner();

        if row.is_open() {
            return Ok(Ensured::existing(row));
        }

        self.repo.reopen(&row.id).await.context("Resuming supervision")?;
        info!(active_group_id = %session.id, staff_id = %staff.id, "Supervision resumed");
        let resumed = self
            .repo
            .get(&row.id)
            .await?
            .ok_or_else(|| ActiveError::from("resumed supervision vanished"))?;
        Ok(Ensured::created(resumed))
    }

    /// Ends the staff member's supervision; 404 when they are not supervising.
    pub async fn release(
        &self,
        active_group_id: &str,
        staff_id: &str,
    ) -> Result<Supervision, ActiveError> {
        let session = self.sessions.get(active_group_id).await?;
        let staff_key = ResourceGuard::key(staff_id, STAFF)?;

        let Some(row) = self.repo.find(&session.id, &staff_key).await?.filter(Supervision::is_open)
        else {
            return Err(ActiveError::not_found(format!(
                "staff '{staff_key}' is not supervising '{}'",
                session.id
            )));
        };

        self.repo.end(&row.id).await.context("Ending supervision")?;
        info!(active_group_id = %session.id, staff_id = %staff_key, "Supervision ended");
        self.repo.get(&row.id).await?.ok_or_else(|| ActiveError::from("ended supervision vanished"))
    }

    /// Whether the staff member currently supervises the session.
    pub async fn is_supervising(
        &self,
        active_group_id: &str,
        staff_id: &str,
    ) -> Result<bool, ActiveError> {
        let row = self.repo.find(active_group_id, staff_id).await?;
        Ok(row.is_some_and(|row| row.is_open()))
    }

    /// Open supervisions of a session with the staff names, longest-running first.
    pub async fn supervisors(&self, active_group_id: &str) -> Result<Vec<Supervisor>, ActiveError> {
        let session = self.sessions.get(active_group_id).await?;
        let open = self.repo.open_for(&session.id).await?;
        let ids: Vec<String> = open.iter().map(|s| s.staff_id.clone()).collect();
        let staff = self.staff.get_many(&ids).await.context("Loading supervisors")?;

        Ok(open
            .into_iter()
            .filter_map(|supervision| {
                let member = staff.iter().find(|m| m.id == supervision.staff_id)?;
                Some(Supervisor {
                    staff_id: member.id.clone(),
                    first_name: member.first_name.clone(),
                    last_name: member.last_name.clone(),
                    position: member.position.clone(),
                    started_at: supervision.started_at,
                })
            })
            .collect())
    }
}

// --- Visits ---

/// Student attendance in sessions.
#[derive(Debug, Clone)]
pub struct VisitService {
    repo: VisitRepository,
    sessions: SessionService,
    activities: ActivityService,
    persons: PersonService,
    students: StudentService,
}

impl VisitService {
    #[must_use]
    pub const fn new(
        repo: VisitRepository,
        sessions: SessionService,
        activities: ActivityService,
        persons: PersonService,
        students: StudentService,
    ) -> Self {
        Self { repo, sessions, activities, persons, students }
    }

    /// Checks a student into an open session, moving them out of any other one.
    pub async fn check_in(
        &self,
        active_group_id: &str,
        student_id: &str,
    ) -> Result<CheckIn, ActiveError> {
        let session = self.sessions.get_open(active_group_id).await?;
        let student = self.students.get(student_id).await.context("Resolving student")?;

        let activity =
            self.activities.get(&session.activity_id).await.context("Resolving activity")?;

        let mut attempt = 1;
        let (visit, current) = loop {
            let current = self.repo.open_for_student(&student.id).await?;
            if let Some(visit) = current.as_ref().filter(|v| v.active_group_id == session.id) {
                return Ok(CheckIn {
                    visit: visit.clone(),
                    transferred_from: None,
                    already_present: true,
                });
            }

            let previous = current.as_ref().map(|v| v.id.as_str());
            let admitted = self
                .repo
                .check_in(&student.id, &session.id, previous, activity.max_participants)
                .await;
            match admitted {
                Ok(Some(visit)) => break (visit, current),
                Ok(None) => {
                    return Err(ActiveError::conflict(format!(
                        "group is full: all {} places taken",
                        activity.max_participants
                    )));
                },
                Err(err) if err.is_conflict() && attempt < ENSURE_ATTEMPTS => {
                    debug!(active_group_id = %session.id, attempt, "Check-in raced, retrying");
                    backoff(attempt).await;
                    attempt += 1;
                },
                Err(err) => return Err(err.into()),
            }
        };

        match &current {
            Some(previous) => info!(
                student_id = %student.id,
                from = %previous.active_group_id,
                to = %session.id,
                "Student transferred"
            ),
            None => info!(student_id = %student.id, active_group_id = %session.id, "Student checked in"),
        }

        let transferred_from = match current {
            Some(previous) => self.repo.get(&previous.id).await?,
            None => None,
        };
        Ok(CheckIn { visit, transferred_from, already_present: false })
    }

    /// Closes the student's open visit.
    pub async fn check_out(&self, student_id: &str) -> Result<Visit, ActiveError> {
        let student_key = ResourceGuard::key(student_id, STUDENT)?;
        let visit = self
            .repo
            .open_for_student(&student_key)
            .await?
            .ok_or_else(|| ActiveError::not_found(format!("student '{student_key}' is not checked in")))?;

        self.repo.close(&visit.id).await.context("Checking out")?;
        info!(student_id = %student_key, active_group_id = %visit.active_group_id, "Student checked out");
        self.repo.get(&visit.id).await?.ok_or_else(|| ActiveError::from("closed visit vanished"))
    }

    pub async fn current(&self, student_id: &str) -> Result<Option<Visit>, ActiveError> {
        let student_key = ResourceGuard::key(student_id, STUDENT)?;
        self.repo.open_for_student(&student_key).await.context("Finding current visit")
    }

    pub async fn list(&self, active_group_id: &str, open_only: bool) -> Result<Vec<Visit>, ActiveError> {
        let session = self.sessions.get(active_group_id).await?;
        self.repo.list(&session.id, open_only).await.context("Listing visits")
    }

    pub async fn count_present(&self, active_group_id: &str) -> Result<i64, ActiveError> {
        self.repo.count_open(active_group_id).await.context("Counting visits")
    }

    /// Toggles presence from an RFID scan at a session's reader.
    pub async fn scan(&self, active_group_id: &str, raw_tag: &str) -> Result<ScanOutcome, ActiveError> {
        let session = self.sessions.get(active_group_id).await?;
        let person = self.persons.find_by_tag(raw_tag).await.context("Resolving tag")?;
        let student = self.students.by_person(&person.id).await.context("Resolving student")?;

        let current = self.repo.open_for_student(&student.id).await?;
        if current.is_some_and(|visit| visit.active_group_id == session.id) {
            let visit = self.check_out(&student.id).await?;
            return Ok(ScanOutcome { action: ScanAction::CheckedOut, visit });
        }

        let check_in = self.check_in(&session.id, &student.id).await?;
        let action = if check_in.transferred_from.is_some() {
            ScanAction::Transferred
        } else {
            ScanAction::CheckedIn
        };
        Ok(ScanOutcome { action, visit: check_in.visit })
    }
}
