use crate::seed::Seeder;
use crate::seeds::db_err;
use chrono::Duration;
use db::fraud::FraudPolicy;
use db::models::attendance_record::{self, Geolocation, SubmitOutcome, Telemetry};
use db::models::{attendance_code, class_session, course, course_teacher, enrollment};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sea_orm::{DatabaseConnection, DbErr};
use util::{config, time};

pub struct AttendanceSeeder;

/// Share of enrolled students who submit a code for a session.
const SUBMISSION_RATE: f64 = 0.7;

/// Minutes after the start of class the code is issued.
const CODE_DELAY_MINUTES: i64 = 5;

/// Maximum offset, in degrees, of a seeded position from the classroom.
const JITTER_DEGREES: f64 = 0.01;

#[async_trait::async_trait]
impl Seeder for AttendanceSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut rng = StdRng::from_entropy();
        let local_now = time::local_now();
        let ttl = Duration::minutes(config::code_ttl_minutes().max(1));
        let reference = FraudPolicy::from_config().reference;

        for course in course::Model::list(db).await? {
            let Some(teacher) = course_teacher::Model::teachers_of(db, course.id)
                .await?
                .into_iter()
                .next()
            else {
                continue;
            };
            let students = enrollment::Model::students_of(db, course.id).await?;

            for session in class_session::Model::for_course(db, course.id).await? {
                if session.starts_at() > local_now
                    || attendance_code::Model::find_for_session(db, session.id)
                        .await?
                        .is_some()
                {
                    continue;
                }

                let issued_at =
                    time::from_local(session.starts_at()) + Duration::minutes(CODE_DELAY_MINUTES);
                let code =
                    attendance_code::Model::generate(db, session.id, Some(teacher.id), issued_at, ttl)
                        .await?;

                for student in &students {
                    if !rng.gen_bool(SUBMISSION_RATE) {
                        continue;
                    }

                    let telemetry = Telemetry {
                        simulated_ip: Some(format!("192.168.1.{}", rng.gen_range(2..=254))),
                        geolocation: Some(Geolocation {
                            latitude: reference.latitude
                                + rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES),
                            longitude: reference.longitude
                                + rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES),
                        }),
                    };
                    let submitted_at =
                        issued_at + Duration::seconds(rng.gen_range(0..ttl.num_seconds()));

                    let outcome = attendance_record::Model::submit(
                        db,
                        student.id,
                        &code.code,
                        telemetry,
                        submitted_at,
                    )
                    .await
                    .map_err(db_err)?;

                    // Finished classes have been reviewed by their teacher
                    if let SubmitOutcome::Recorded(record) = outcome {
                        if session.has_ended_at(local_now) {
                            attendance_record::Model::validate(
                                db,
                                record.id,
                                &teacher,
                                time::from_local(session.ends_at()),
                            )
                            .await
                            .map_err(db_err)?;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
