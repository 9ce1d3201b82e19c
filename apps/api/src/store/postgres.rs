use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus};
use crate::models::candidate::{CandidateProfile, CandidateSection};
use crate::models::employer::EmployerProfile;
use crate::models::job_post::{JobFilter, JobPost};
use crate::models::user::User;
use crate::pagination::PageRequest;
use crate::store::{
    Collection, GroupField, JobTally, RecordStore, StoreError, StoreResult, DUPLICATE_APPLICATION,
    DUPLICATE_EMAIL,
};

/// Postgres-backed document store. Collections are JSONB documents with a few
/// promoted columns for lookups and constraints.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation to `StoreError::Conflict`.
fn unique_violation(err: sqlx::Error, message: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(message.to_string())
        }
        _ => StoreError::Database(err),
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn limit_offset(page: PageRequest) -> (i64, i64) {
    (
        i64::try_from(page.limit).unwrap_or(i64::MAX),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

/// One `(key, count)` row per distinct value of `field`. Array fields are
/// expanded with `jsonb_array_elements*`; a missing array counts as empty.
fn group_query(field: GroupField) -> &'static str {
    match field {
        GroupField::CandidateRegion => {
            r#"
            SELECT r.value, COUNT(*) FROM candidate_profiles,
                jsonb_array_elements_text(
                    COALESCE(doc->'job_criteria'->'geographical_mobility', '[]'::jsonb)
                ) AS r(value)
            GROUP BY 1
            "#
        }
        GroupField::CandidateSkillDescription => {
            r#"
            SELECT doc->'skills'->>'skill_description', COUNT(*) FROM candidate_profiles
            WHERE btrim(COALESCE(doc->'skills'->>'skill_description', '')) <> ''
            GROUP BY 1
            "#
        }
        GroupField::CandidateEducationLevel => {
            r#"
            SELECT e.value->>'level', COUNT(*) FROM candidate_profiles,
                jsonb_array_elements(COALESCE(doc->'profile_cv'->'education', '[]'::jsonb)) AS e(value)
            GROUP BY 1
            "#
        }
        GroupField::CandidateLanguage => {
            r#"
            SELECT l.value->>'language', COUNT(*) FROM candidate_profiles,
                jsonb_array_elements(COALESCE(doc->'skills'->'spoken_languages', '[]'::jsonb)) AS l(value)
            GROUP BY 1
            "#
        }
        GroupField::CandidateSeekedJob => {
            r#"
            SELECT s.value, COUNT(*) FROM candidate_profiles,
                jsonb_array_elements_text(
                    COALESCE(doc->'job_criteria'->'seeked_jobs', '[]'::jsonb)
                ) AS s(value)
            GROUP BY 1
            "#
        }
        GroupField::EmployerIndustry => {
            r#"
            SELECT i.value, COUNT(*) FROM employer_profiles,
                jsonb_array_elements_text(COALESCE(doc->'company_industry', '[]'::jsonb)) AS i(value)
            GROUP BY 1
            "#
        }
        GroupField::EmployerCity => {
            "SELECT doc->>'city', COUNT(*) FROM employer_profiles GROUP BY 1"
        }
        GroupField::JobCategory => "SELECT doc->>'job_category', COUNT(*) FROM job_posts GROUP BY 1",
        GroupField::JobEducationLevel => {
            "SELECT doc->>'education_level_required', COUNT(*) FROM job_posts GROUP BY 1"
        }
        GroupField::JobSector => "SELECT doc->>'sector', COUNT(*) FROM job_posts GROUP BY 1",
        GroupField::JobType => "SELECT doc->>'job_type', COUNT(*) FROM job_posts GROUP BY 1",
        GroupField::JobRegion => "SELECT region, COUNT(*) FROM job_posts GROUP BY 1",
        GroupField::JobExperienceLevel => {
            "SELECT experience_level, COUNT(*) FROM job_posts GROUP BY 1"
        }
        GroupField::ApplicationStatus => "SELECT status, COUNT(*) FROM applications GROUP BY 1",
    }
}

async fn insert_user(
    conn: &mut sqlx::PgConnection,
    user: &User,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, first_name, last_name, email, gender, password_hash, role, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(user.id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(&user.gender)
    .bind(&user.password_hash)
    .bind(&user.role)
    .bind(user.created_at)
    .execute(conn)
    .await
    .map_err(|e| unique_violation(e, DUPLICATE_EMAIL))?;
    Ok(())
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert_candidate(&self, user: &User, profile: &CandidateProfile) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_user(&mut tx, user).await?;
        sqlx::query(
            "INSERT INTO candidate_profiles (id, candidate_id, doc, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(profile.id)
        .bind(profile.candidate_id)
        .bind(Json(profile))
        .bind(profile.created_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_employer(&self, user: &User, profile: &EmployerProfile) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_user(&mut tx, user).await?;
        sqlx::query(
            "INSERT INTO employer_profiles (id, employer_id, doc, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(profile.id)
        .bind(profile.employer_id)
        .bind(Json(profile))
        .bind(profile.created_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn candidate_profile(&self, candidate_id: Uuid) -> StoreResult<Option<CandidateProfile>> {
        let doc: Option<Json<CandidateProfile>> =
            sqlx::query_scalar("SELECT doc FROM candidate_profiles WHERE candidate_id = $1")
                .bind(candidate_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doc.map(|Json(p)| p))
    }

    async fn replace_candidate_section(
        &self,
        candidate_id: Uuid,
        section: CandidateSection,
    ) -> StoreResult<bool> {
        // Single statement: the section is swapped whole inside one document.
        let path = vec![section.field().to_string()];
        let value = section.to_json()?;
        let result = sqlx::query(
            "UPDATE candidate_profiles SET doc = jsonb_set(doc, $2, $3) WHERE candidate_id = $1",
        )
        .bind(candidate_id)
        .bind(path)
        .bind(Json(value))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn employer_profile(&self, employer_id: Uuid) -> StoreResult<Option<EmployerProfile>> {
        let doc: Option<Json<EmployerProfile>> =
            sqlx::query_scalar("SELECT doc FROM employer_profiles WHERE employer_id = $1")
                .bind(employer_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doc.map(|Json(p)| p))
    }

    async fn replace_employer_profile(&self, profile: &EmployerProfile) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE employer_profiles SET doc = $2 WHERE employer_id = $1")
            .bind(profile.employer_id)
            .bind(Json(profile))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_job_post(&self, job: &JobPost) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO job_posts
                (id, employer_id, job_ad_title, region, city, experience_level,
                 offered_salary, doc, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(job.id)
        .bind(job.employer_id)
        .bind(&job.job_ad_title)
        .bind(job.region.as_str())
        .bind(&job.city)
        .bind(job.experience_level.as_str())
        .bind(job.offered_salary.as_str())
        .bind(Json(job))
        .bind(job.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn job_post(&self, id: Uuid) -> StoreResult<Option<JobPost>> {
        let doc: Option<Json<JobPost>> =
            sqlx::query_scalar("SELECT doc FROM job_posts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doc.map(|Json(j)| j))
    }

    async fn search_job_posts(
        &self,
        filter: &JobFilter,
        page: PageRequest,
    ) -> StoreResult<(Vec<JobPost>, u64)> {
        const WHERE: &str = r#"
            WHERE ($1::text IS NULL OR region = $1)
              AND ($2::text IS NULL OR city = $2)
              AND ($3::text IS NULL OR experience_level = $3)
              AND ($4::text IS NULL OR job_ad_title = $4)
              AND ($5::text IS NULL OR offered_salary = $5)
        "#;
        let region = filter.region.map(|r| r.as_str());
        let experience = filter.experience_level.map(|e| e.as_str());
        let salary = filter.offered_salary.map(|s| s.as_str());
        let (limit, offset) = limit_offset(page);

        let docs: Vec<Json<JobPost>> = sqlx::query_scalar(&format!(
            "SELECT doc FROM job_posts {WHERE} ORDER BY created_at, id LIMIT $6 OFFSET $7"
        ))
        .bind(region)
        .bind(filter.city.as_deref())
        .bind(experience)
        .bind(filter.job_ad_title.as_deref())
        .bind(salary)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM job_posts {WHERE}"))
            .bind(region)
            .bind(filter.city.as_deref())
            .bind(experience)
            .bind(filter.job_ad_title.as_deref())
            .bind(salary)
            .fetch_one(&self.pool)
            .await?;

        Ok((docs.into_iter().map(|Json(j)| j).collect(), total.max(0) as u64))
    }

    async fn employer_job_posts(
        &self,
        employer_id: Uuid,
        title_contains: Option<&str>,
        page: PageRequest,
    ) -> StoreResult<(Vec<JobPost>, u64)> {
        const WHERE: &str = r#"
            WHERE employer_id = $1
              AND ($2::text IS NULL OR job_ad_title ILIKE '%' || $2 || '%' ESCAPE '\')
        "#;
        let pattern = title_contains.map(escape_like);
        let (limit, offset) = limit_offset(page);

        let docs: Vec<Json<JobPost>> = sqlx::query_scalar(&format!(
            "SELECT doc FROM job_posts {WHERE} ORDER BY created_at, id LIMIT $3 OFFSET $4"
        ))
        .bind(employer_id)
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM job_posts {WHERE}"))
            .bind(employer_id)
            .bind(pattern.as_deref())
            .fetch_one(&self.pool)
            .await?;

        Ok((docs.into_iter().map(|Json(j)| j).collect(), total.max(0) as u64))
    }

    async fn insert_application(&self, application: &Application) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO applications (id, job_id, candidate_id, status, doc, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(application.id)
        .bind(application.job_id)
        .bind(application.candidate_id)
        .bind(application.status.as_str())
        .bind(Json(application))
        .bind(application.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, DUPLICATE_APPLICATION))?;
        Ok(())
    }

    async fn application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let doc: Option<Json<Application>> =
            sqlx::query_scalar("SELECT doc FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doc.map(|Json(a)| a))
    }

    async fn transition_application(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let patch = json!({ "status": to, "updated_at": updated_at });
        let result = sqlx::query(
            "UPDATE applications SET status = $3, doc = doc || $4 WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(Json(patch))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn applications_for_job(
        &self,
        job_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> StoreResult<Vec<Application>> {
        let docs: Vec<Json<Application>> = sqlx::query_scalar(
            r#"
            SELECT doc FROM applications
            WHERE job_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at, id
            "#,
        )
        .bind(job_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(docs.into_iter().map(|Json(a)| a).collect())
    }

    async fn applications_for_candidate(&self, candidate_id: Uuid) -> StoreResult<Vec<Application>> {
        let docs: Vec<Json<Application>> = sqlx::query_scalar(
            "SELECT doc FROM applications WHERE candidate_id = $1 ORDER BY created_at, id",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(docs.into_iter().map(|Json(a)| a).collect())
    }

    async fn group_counts(&self, field: GroupField) -> StoreResult<Vec<(String, u64)>> {
        let rows: Vec<(Option<String>, i64)> = sqlx::query_as(group_query(field))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(key, count)| key.map(|k| (k, count.max(0) as u64)))
            .collect())
    }

    async fn employee_headcounts(&self) -> StoreResult<Vec<(Option<i64>, u64)>> {
        let rows: Vec<(Option<i64>, i64)> = sqlx::query_as(
            r#"
            SELECT (doc->>'number_of_employees')::bigint, COUNT(*)
            FROM employer_profiles
            GROUP BY 1
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(headcount, count)| (headcount, count.max(0) as u64))
            .collect())
    }

    async fn busiest_job_posts(&self, limit: u64) -> StoreResult<Vec<JobTally>> {
        // "C" collation so titles tie-break in byte order.
        let rows: Vec<(Uuid, String, i64)> = sqlx::query_as(
            r#"
            SELECT j.id, j.job_ad_title, COUNT(a.id)
            FROM job_posts j
            LEFT JOIN applications a ON a.job_id = j.id
            GROUP BY j.id, j.job_ad_title
            ORDER BY COUNT(a.id) DESC, j.job_ad_title COLLATE "C", j.id
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(job_id, job_ad_title, count)| JobTally {
                job_id,
                job_ad_title,
                applications: count.max(0) as u64,
            })
            .collect())
    }

    async fn count(&self, collection: Collection) -> StoreResult<u64> {
        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", collection.table()))
            .fetch_one(&self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }

    async fn page_documents(
        &self,
        collection: Collection,
        page: PageRequest,
    ) -> StoreResult<Vec<serde_json::Value>> {
        let (limit, offset) = limit_offset(page);
        if collection == Collection::Users {
            let users = sqlx::query_as::<_, User>(
                "SELECT * FROM users ORDER BY created_at, id LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
            return users
                .iter()
                .map(|u| serde_json::to_value(u).map_err(StoreError::from))
                .collect();
        }

        let docs: Vec<serde_json::Value> = sqlx::query_scalar(&format!(
            "SELECT doc FROM {} ORDER BY created_at, id LIMIT $1 OFFSET $2",
            collection.table()
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(docs)
    }

    async fn close(&self) {
        info!("Closing PostgreSQL connection pool");
        self.pool.close().await;
    }
}
