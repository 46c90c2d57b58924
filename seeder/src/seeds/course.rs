use crate::seed::Seeder;
use crate::seeds::{STUDENT_COUNT, TEACHERS};
use db::models::{course, course_teacher, enrollment, user};
use fake::{Fake, faker::lorem::en::Sentence};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, seq::SliceRandom};
use sea_orm::{DatabaseConnection, DbErr};

pub struct CourseSeeder;

/// Code, name and the index into `TEACHERS` of the course's teacher.
pub const COURSES: [(&str, &str, usize); 4] = [
    ("DWFS001", "Web Development Full Stack", 0),
    ("DSA002", "Data Structures and Algorithms", 1),
    ("CSF003", "Cybersecurity Fundamentals", 2),
    ("MAD004", "Mobile Application Development", 0),
];

#[async_trait::async_trait]
impl Seeder for CourseSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut rng = StdRng::from_entropy();

        let mut students = Vec::with_capacity(STUDENT_COUNT);
        for n in 1..=STUDENT_COUNT {
            if let Some(s) = user::Model::find_by_username(db, &format!("student{n}")).await? {
                students.push(s);
            }
        }

        let existing = course::Model::list(db).await?;
        for (code, name, teacher_idx) in COURSES {
            if existing.iter().any(|c| c.code == code) {
                continue;
            }

            let description: String = Sentence(6..12).fake();
            let created = course::Model::create(db, name, code, Some(&description)).await?;

            if let Some(teacher) = user::Model::find_by_username(db, TEACHERS[teacher_idx]).await? {
                course_teacher::Model::assign(db, created.id, teacher.id).await?;
            }

            // Every course gets between five and all of the students
            let take = rng.gen_range(5..=students.len().max(5));
            for student in students.choose_multiple(&mut rng, take) {
                enrollment::Model::enroll(db, student.id, created.id).await?;
            }
        }

        Ok(())
    }
}
