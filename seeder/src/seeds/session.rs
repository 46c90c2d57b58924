use crate::seed::Seeder;
use crate::seeds::db_err;
use chrono::{Datelike, Duration, NaiveTime};
use db::AttendanceError;
use db::models::{class_session, course};
use sea_orm::{DatabaseConnection, DbErr};
use util::time;

pub struct SessionSeeder;

/// Morning, afternoon and evening slots as (start, end) in hours and minutes.
const SLOTS: [((u32, u32), (u32, u32)); 3] = [((9, 0), (12, 0)), ((14, 0), (17, 0)), ((18, 30), (21, 30))];

/// Days before and after today to schedule.
const WEEKS_BACK: i64 = 3;
const WEEKS_AHEAD: i64 = 2;

fn hm((h, m): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

#[async_trait::async_trait]
impl Seeder for SessionSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let today = time::local_now().date();
        let courses = course::Model::list(db).await?;

        for (idx, course) in courses.iter().enumerate() {
            let (start, end) = SLOTS[idx % SLOTS.len()];
            // Two weekdays per course, Monday = 0
            let meets = [idx as u32 % 5, (idx as u32 + 2) % 5];

            for offset in -(WEEKS_BACK * 7)..=(WEEKS_AHEAD * 7) {
                let date = today + Duration::days(offset);
                let weekday = date.weekday().num_days_from_monday();
                // Today always has a class so the dashboards have something live
                if offset != 0 && !meets.contains(&weekday) {
                    continue;
                }

                match class_session::Model::create(db, course.id, date, hm(start), hm(end)).await {
                    Ok(_) | Err(AttendanceError::Conflict(_)) => {}
                    Err(e) => return Err(db_err(e)),
                }
            }
        }

        Ok(())
    }
}
