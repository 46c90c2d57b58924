//! Read-side aggregates for dashboards and statistics.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::{DbConn, DbErr, EntityTrait, PaginatorTrait};
use serde::Serialize;

use crate::models::absence_justification::{self, JustificationStatus};
use crate::models::attendance_code::{self, CodeStatus};
use crate::models::{attendance_record, class_session, course, course_teacher, enrollment, user};

/// Attendance outcome of one past session, from the student's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    /// Validated by a teacher.
    Present,
    /// Submitted, not yet validated.
    Pending,
    /// Nothing submitted.
    Absent,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub session_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: HistoryStatus,
    pub record_id: Option<i64>,
    pub justification_status: Option<JustificationStatus>,
}

/// Past sessions of the student's courses with their outcome, newest first.
///
/// A justification is reported next to the status and never changes it.
pub async fn attendance_history(
    db: &DbConn,
    student_id: i64,
    local_now: NaiveDateTime,
) -> Result<Vec<HistoryEntry>, DbErr> {
    let sessions =
        class_session::Model::enrolled_between(db, student_id, None, Some(local_now.date())).await?;
    let records: HashMap<i64, attendance_record::Model> =
        attendance_record::Model::for_student(db, student_id)
            .await?
            .into_iter()
            .map(|r| (r.class_session_id, r))
            .collect();
    let justifications: HashMap<i64, JustificationStatus> =
        absence_justification::Model::for_student(db, student_id)
            .await?
            .into_iter()
            .map(|j| (j.class_session_id, j.status))
            .collect();

    let mut history: Vec<HistoryEntry> = sessions
        .into_iter()
        .filter(|(s, _)| s.has_ended_at(local_now))
        .map(|(s, c)| {
            let record = records.get(&s.id);
            let status = match record {
                Some(r) if r.is_present => HistoryStatus::Present,
                Some(_) => HistoryStatus::Pending,
                None => HistoryStatus::Absent,
            };
            let (course_code, course_name) = c.map(|c| (c.code, c.name)).unwrap_or_default();
            HistoryEntry {
                session_id: s.id,
                course_code,
                course_name,
                date: s.date,
                start_time: s.start_time,
                end_time: s.end_time,
                status,
                record_id: record.map(|r| r.id),
                justification_status: justifications.get(&s.id).copied(),
            }
        })
        .collect();

    history.sort_by(|a, b| (b.date, b.start_time).cmp(&(a.date, a.start_time)));
    Ok(history)
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentStat {
    pub student_id: i64,
    pub username: String,
    pub attended: u64,
    pub submitted: u64,
    /// Validated attendance over past sessions, 0 when none have taken place.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseStats {
    pub course_id: i64,
    pub past_sessions: u64,
    pub students: Vec<StudentStat>,
}

pub async fn course_stats(
    db: &DbConn,
    course_id: i64,
    local_now: NaiveDateTime,
) -> Result<CourseStats, DbErr> {
    let past: Vec<i64> = class_session::Model::for_course(db, course_id)
        .await?
        .into_iter()
        .filter(|s| s.has_ended_at(local_now))
        .map(|s| s.id)
        .collect();
    let past_sessions = past.len() as u64;

    let mut submitted: HashMap<i64, u64> = HashMap::new();
    let mut attended: HashMap<i64, u64> = HashMap::new();
    for session_id in &past {
        for (record, _) in attendance_record::Model::for_session(db, *session_id).await? {
            *submitted.entry(record.student_id).or_default() += 1;
            if record.is_present {
                *attended.entry(record.student_id).or_default() += 1;
            }
        }
    }

    let students = enrollment::Model::students_of(db, course_id)
        .await?
        .into_iter()
        .map(|s| {
            let present = attended.get(&s.id).copied().unwrap_or(0);
            StudentStat {
                student_id: s.id,
                username: s.username,
                attended: present,
                submitted: submitted.get(&s.id).copied().unwrap_or(0),
                percentage: percentage(present, past_sessions),
            }
        })
        .collect();

    Ok(CourseStats {
        course_id,
        past_sessions,
        students,
    })
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    ((part as f64 / whole as f64) * 1000.0).round() / 10.0
}

/// Row counts per table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overview {
    pub users: u64,
    pub courses: u64,
    pub course_teachers: u64,
    pub enrollments: u64,
    pub class_sessions: u64,
    pub attendance_codes: u64,
    pub attendance_records: u64,
    pub absence_justifications: u64,
}

pub async fn overview(db: &DbConn) -> Result<Overview, DbErr> {
    Ok(Overview {
        users: user::Entity::find().count(db).await?,
        courses: course::Entity::find().count(db).await?,
        course_teachers: course_teacher::Entity::find().count(db).await?,
        enrollments: enrollment::Entity::find().count(db).await?,
        class_sessions: class_session::Entity::find().count(db).await?,
        attendance_codes: attendance_code::Entity::find().count(db).await?,
        attendance_records: attendance_record::Entity::find().count(db).await?,
        absence_justifications: absence_justification::Entity::find().count(db).await?,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session: class_session::Model,
    pub course: Option<course::Model>,
    pub ongoing: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeDetails {
    pub code: String,
    pub status: CodeStatus,
    pub expires_at: DateTime<Utc>,
    pub seconds_remaining: i64,
}

impl CodeDetails {
    pub fn of(code: &attendance_code::Model, now: DateTime<Utc>) -> Self {
        Self {
            code: code.code.clone(),
            status: code.status_at(now),
            expires_at: code.expires_at,
            seconds_remaining: code.seconds_remaining(now),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub record: attendance_record::Model,
    pub student_username: Option<String>,
}

pub async fn submissions(db: &DbConn, session_id: i64) -> Result<Vec<Submission>, DbErr> {
    Ok(attendance_record::Model::for_session(db, session_id)
        .await?
        .into_iter()
        .map(|(record, student)| Submission {
            record,
            student_username: student.map(|s| s.username),
        })
        .collect())
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherDashboard {
    pub sessions: Vec<SessionSummary>,
    pub selected_session_id: Option<i64>,
    pub code: Option<CodeDetails>,
    pub submissions: Vec<Submission>,
    pub known_valid_locations: Vec<attendance_record::Geolocation>,
}

/// Today's ongoing and upcoming sessions of the teacher, and the one to focus:
/// the first holding an active code, else the first listed.
pub async fn teacher_dashboard(
    db: &DbConn,
    teacher_id: i64,
    now: DateTime<Utc>,
    local_now: NaiveDateTime,
    known_valid_locations: Vec<attendance_record::Geolocation>,
) -> Result<TeacherDashboard, DbErr> {
    let today = local_now.date();
    let sessions: Vec<SessionSummary> =
        class_session::Model::taught_between(db, teacher_id, Some(today), Some(today))
            .await?
            .into_iter()
            .filter(|(s, _)| !s.has_ended_at(local_now))
            .map(|(session, course)| SessionSummary {
                ongoing: session.is_ongoing_at(local_now),
                session,
                course,
            })
            .collect();

    let mut selected: Option<(i64, Option<attendance_code::Model>)> = None;
    for summary in &sessions {
        let code = attendance_code::Model::find_for_session(db, summary.session.id).await?;
        if code.as_ref().is_some_and(|c| c.is_valid_at(now)) {
            selected = Some((summary.session.id, code));
            break;
        }
        if selected.is_none() {
            selected = Some((summary.session.id, code));
        }
    }

    let (selected_session_id, code, submissions) = match selected {
        Some((id, code)) => (
            Some(id),
            code.map(|c| CodeDetails::of(&c, now)),
            submissions(db, id).await?,
        ),
        None => (None, None, Vec::new()),
    };

    Ok(TeacherDashboard {
        sessions,
        selected_session_id,
        code,
        submissions,
        known_valid_locations,
    })
}
