use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    attendance::AttendanceSeeder, course::CourseSeeder, justification::JustificationSeeder,
    session::SessionSeeder, user::UserSeeder,
};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("seeder: cannot connect to database: {e}");
            std::process::exit(1);
        }
    };

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(CourseSeeder), "Course"),
        (Box::new(SessionSeeder), "ClassSession"),
        (Box::new(AttendanceSeeder), "AttendanceRecord"),
        (Box::new(JustificationSeeder), "AbsenceJustification"),
    ] {
        if let Err(e) = run_seeder(&*seeder, name, &db).await {
            eprintln!("seeder: {e}");
            std::process::exit(1);
        }
    }
}
