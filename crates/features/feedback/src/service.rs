use crate::error::{FeedbackError, FeedbackErrorExt};
use crate::model::{
    BatchFeedbackResponse, BatchItemResult, CreateFeedbackRequest, FeedbackEntry, FeedbackQuery,
    MAX_BATCH,
};
use crate::repository::FeedbackRepository;
use ogs_kernel::domain::constants::{FEEDBACK, STUDENT};
use ogs_kernel::security::resource::ResourceGuard;
use ogs_users::service::StudentService;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct FeedbackService {
    repo: FeedbackRepository,
    students: StudentService,
}

impl FeedbackService {
    #[must_use]
    pub const fn new(repo: FeedbackRepository, students: StudentService) -> Self {
        Self { repo, students }
    }

    pub async fn create(&self, request: CreateFeedbackRequest) -> Result<FeedbackEntry, FeedbackError> {
        let mut entry = request.validate()?;
        let student = self.students.get(&entry.student_id).await.context("Resolving student")?;
        entry.student_id = student.id;

        let record = self.repo.create(&entry).await.context("Storing feedback")?;
        debug!(feedback_id = %record.id, student_id = %record.student_id, value = %entry.value, "Feedback recorded");
        record.try_into()
    }

    pub async fn get(&self, id: &str) -> Result<FeedbackEntry, FeedbackError> {
        let key = ResourceGuard::key(id, FEEDBACK)?;
        self.repo
            .get(&key)
            .await?
            .ok_or_else(|| FeedbackError::NotFound { message: key.into(), context: None })?
            .try_into()
    }

    pub async fn list(&self, filter: FeedbackQuery) -> Result<Vec<FeedbackEntry>, FeedbackError> {
        let mut filter = filter.validate()?;
        filter.student_id =
            filter.student_id.as_deref().map(|id| ResourceGuard::key(id, STUDENT)).transpose()?;

        let records = self.repo.list(&filter).await.context("Listing feedback")?;
        records.into_iter().map(FeedbackEntry::try_from).collect()
    }

    pub async fn delete(&self, id: &str) -> Result<(), FeedbackError> {
        let entry = self.get(id).await?;
        self.repo.delete(&entry.id).await.context("Deleting feedback")?;
        info!(feedback_id = %entry.id, "Feedback deleted");
        Ok(())
    }

    /// Stores each entry on its own; one bad entry does not stop the others.
    pub async fn create_batch(
        &self,
        entries: Vec<CreateFeedbackRequest>,
    ) -> Result<BatchFeedbackResponse, FeedbackError> {
        if entries.is_empty() {
            return Err(FeedbackError::invalid("a batch needs at least one entry"));
        }
        if entries.len() > MAX_BATCH {
            return Err(FeedbackError::invalid(format!(
                "a batch holds at most {MAX_BATCH} entries, got {}",
                entries.len()
            )));
        }

        let mut results = Vec::with_capacity(entries.len());
        for (index, request) in entries.into_iter().enumerate() {
            match self.create(request).await {
                Ok(entry) => results.push(BatchItemResult { index, entry: Some(entry), error: None }),
                Err(err) => {
                    warn!(index, error = %err, "Batch feedback entry rejected");
                    results.push(BatchItemResult { index, entry: None, error: Some(err.to_string()) });
                },
            }
        }

        let created = results.iter().filter(|r| r.entry.is_some()).count();
        let failed = results.len() - created;
        info!(created, failed, "Feedback batch processed");
        Ok(BatchFeedbackResponse { results, created, failed })
    }
}
