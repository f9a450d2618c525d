use crate::error::AttendanceError;
use crate::models::{AttendanceRecord, NewStudent, ReportRow, Student};
use crate::{qr, schema};
use chrono::{Local, NaiveDateTime};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::QueryResult;
use diesel::sql_types::{Integer, Text};
use std::path::{Path, PathBuf};

/// The format attendance dates are stored in.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The format attendance times are stored in.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Creates both tables if they do not exist yet. Existing data is never touched.
const CREATE_TABLES: &str = "
    CREATE TABLE IF NOT EXISTS students (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS attendance (
        student_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        time TEXT NOT NULL
    );
";

/// Inserts an attendance row only if the student has none for that date yet.
const INSERT_ATTENDANCE_ONCE: &str = "
    INSERT INTO attendance (student_id, date, time)
    SELECT ?, ?, ?
    WHERE NOT EXISTS (
        SELECT 1 FROM attendance WHERE student_id = ? AND date = ?
    )
";

/// A successfully registered student and the QR code generated for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub student: Student,
    pub qr_path: PathBuf,
}

/// What a deletion actually removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub student_id: i32,
    pub student: Option<Student>,
    pub attendance_removed: usize,
    pub qr_removed: bool,
}

/// The result of trying to mark a student present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    /// A new attendance row was written.
    Marked(AttendanceRecord),
    /// The student already has a row for this date; nothing was written.
    AlreadyMarked { date: String },
}

/// The manager for registering students and recording and retrieving their attendance.
///
/// It owns the single database connection every flow runs on, plus the directory where student
/// QR codes are kept.
pub struct AttendanceManager {
    db: SqliteConnection,
    qr_dir: PathBuf,
}

impl AttendanceManager {
    /// Connects to the `sqlite3` database at `database_url` and makes sure both tables exist.
    ///
    /// `database_url` may be `:memory:` for a throwaway database.
    pub fn open(database_url: &str, qr_dir: impl Into<PathBuf>) -> Result<Self, AttendanceError> {
        let db = SqliteConnection::establish(database_url)?;

        let mut manager = Self {
            db,
            qr_dir: qr_dir.into(),
        };
        manager.init_schema()?;

        log::debug!("opened attendance database at {database_url}");
        Ok(manager)
    }

    /// Creates the `students` and `attendance` tables if they are missing.
    pub fn init_schema(&mut self) -> QueryResult<()> {
        self.db.batch_execute(CREATE_TABLES)
    }

    /// The directory student QR codes are written to.
    pub fn qr_dir(&self) -> &Path {
        &self.qr_dir
    }

    /// Returns the total number of registered students.
    pub fn num_students(&mut self) -> QueryResult<usize> {
        use schema::students::dsl::*;

        students
            .count()
            .get_result(&mut self.db)
            .map(|count: i64| count as usize)
    }

    /// Retrieves all registered students, ordered by ID.
    pub fn roster(&mut self) -> QueryResult<Vec<Student>> {
        use schema::students::dsl::*;

        students
            .select(Student::as_select())
            .order(id.asc())
            .load(&mut self.db)
    }

    /// Retrieves a student by ID, if registered.
    pub fn get_student(&mut self, student_id: i32) -> QueryResult<Option<Student>> {
        use schema::students::dsl::*;

        students
            .filter(id.eq(student_id))
            .select(Student::as_select())
            .first(&mut self.db)
            .optional()
    }

    /// Returns the ID the next registered student will get.
    pub fn next_student_id(&mut self) -> QueryResult<i32> {
        next_student_id(&mut self.db)
    }

    /// Registers a new student and generates their QR code.
    ///
    /// Both fields are trimmed and must be non-empty; the name is checked first. The student row
    /// and the QR file are written in one transaction, so if the code cannot be written the
    /// student is not registered.
    pub fn register_student(
        &mut self,
        name: &str,
        email: &str,
    ) -> Result<Registration, AttendanceError> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(AttendanceError::EmptyName);
        }
        if email.is_empty() {
            return Err(AttendanceError::EmptyEmail);
        }

        let qr_dir = &self.qr_dir;
        let mut written_id = None;
        let result = self.db.transaction(|conn| {
            let new_id = next_student_id(conn)?;

            diesel::insert_into(schema::students::table)
                .values(&NewStudent {
                    id: new_id,
                    name,
                    email,
                })
                .execute(conn)?;

            let qr_path = qr::write_student_code(qr_dir, new_id)?;
            written_id = Some(new_id);

            Ok::<_, AttendanceError>(Registration {
                student: Student {
                    id: new_id,
                    name: name.to_string(),
                    email: email.to_string(),
                },
                qr_path,
            })
        });

        let registration = match (result, written_id) {
            (Ok(registration), _) => registration,
            // The commit failed after the code was written; the file must not outlive the row.
            (Err(err), Some(new_id)) => {
                if let Err(cleanup) = qr::remove_student_code(qr_dir, new_id) {
                    log::warn!("could not remove QR code of unregistered student {new_id}: {cleanup}");
                }
                return Err(err);
            }
            (Err(err), None) => return Err(err),
        };

        log::info!(
            "registered student {} ({}) with QR code {}",
            registration.student.id,
            registration.student.name,
            registration.qr_path.display()
        );

        Ok(registration)
    }

    /// Removes a student, all of their attendance, and their QR code.
    ///
    /// Deleting an ID that is not registered is not an error; the returned [`Deletion`] simply
    /// reports that nothing was removed.
    pub fn delete_student(&mut self, student_id: i32) -> Result<Deletion, AttendanceError> {
        let (attendance_removed, student) = self.db.transaction(|conn| {
            let attendance_removed = diesel::delete(
                schema::attendance::table.filter(schema::attendance::student_id.eq(student_id)),
            )
            .execute(conn)?;

            let mut removed: Vec<Student> = diesel::delete(
                schema::students::table.filter(schema::students::id.eq(student_id)),
            )
            .returning(Student::as_returning())
            .get_results(conn)?;

            QueryResult::Ok((attendance_removed, removed.pop()))
        })?;

        let qr_removed = qr::remove_student_code(&self.qr_dir, student_id)?;

        log::info!(
            "deleted student {student_id}: student row removed: {}, {attendance_removed} attendance row(s), QR code removed: {qr_removed}",
            student.is_some()
        );

        Ok(Deletion {
            student_id,
            student,
            attendance_removed,
            qr_removed,
        })
    }

    /// Marks the student present now, in local time.
    pub fn mark_attendance(&mut self, student_id: i32) -> QueryResult<MarkOutcome> {
        self.mark_attendance_at(student_id, Local::now().naive_local())
    }

    /// Marks the student present at the given moment, unless they are already marked for that
    /// date.
    ///
    /// The duplicate check and the insert are one statement. IDs with no registered student are
    /// still recorded.
    pub fn mark_attendance_at(
        &mut self,
        student_id: i32,
        at: NaiveDateTime,
    ) -> QueryResult<MarkOutcome> {
        let date = at.format(DATE_FORMAT).to_string();
        let time = at.format(TIME_FORMAT).to_string();

        if self.get_student(student_id)?.is_none() {
            log::warn!("marking attendance for unregistered student ID {student_id}");
        }

        let inserted = diesel::sql_query(INSERT_ATTENDANCE_ONCE)
            .bind::<Integer, _>(student_id)
            .bind::<Text, _>(date.clone())
            .bind::<Text, _>(time.clone())
            .bind::<Integer, _>(student_id)
            .bind::<Text, _>(date.clone())
            .execute(&mut self.db)?;

        if inserted == 0 {
            log::warn!("student {student_id} is already marked present on {date}");
            return Ok(MarkOutcome::AlreadyMarked { date });
        }

        log::info!("marked student {student_id} present on {date} at {time}");
        Ok(MarkOutcome::Marked(AttendanceRecord {
            student_id,
            date,
            time,
        }))
    }

    /// Retrieves every attendance record of a student.
    pub fn student_attendance(&mut self, sid: i32) -> QueryResult<Vec<AttendanceRecord>> {
        use schema::attendance::dsl::*;

        attendance
            .filter(student_id.eq(sid))
            .select(AttendanceRecord::as_select())
            .load(&mut self.db)
    }

    /// Retrieves all attendance joined with student names, in storage order.
    ///
    /// Attendance recorded for IDs with no registered student is left out.
    pub fn attendance_report(&mut self) -> QueryResult<Vec<ReportRow>> {
        use schema::{attendance, students};

        let rows = attendance::table
            .inner_join(students::table)
            .select((students::name, attendance::date, attendance::time))
            .load::<(String, String, String)>(&mut self.db)?;

        log::debug!("loaded {} attendance record(s)", rows.len());
        Ok(rows.into_iter().map(ReportRow::from).collect())
    }
}

/// Reads every student ID and returns the smallest unused one.
fn next_student_id(conn: &mut SqliteConnection) -> QueryResult<i32> {
    use schema::students::dsl::*;

    let ids: Vec<i32> = students.select(id).order(id.asc()).load(conn)?;

    Ok(lowest_unused_id(&ids))
}

/// Given IDs in ascending order, returns the smallest positive integer not among them.
///
/// Non-positive IDs are skipped, so they never hide a free slot.
pub fn lowest_unused_id(sorted_ids: &[i32]) -> i32 {
    let mut candidate = 1;

    for &existing in sorted_ids {
        if existing < candidate {
            continue;
        }
        if existing > candidate {
            break;
        }
        candidate += 1;
    }

    candidate
}

#[cfg(test)]
mod tests {
    use super::lowest_unused_id;

    #[test]
    fn first_id_is_one() {
        assert_eq!(lowest_unused_id(&[]), 1);
    }

    #[test]
    fn next_after_contiguous_prefix() {
        assert_eq!(lowest_unused_id(&[1, 2, 3]), 4);
    }

    #[test]
    fn fills_the_first_gap() {
        assert_eq!(lowest_unused_id(&[2, 3]), 1);
        assert_eq!(lowest_unused_id(&[1, 2, 4, 5]), 3);
        assert_eq!(lowest_unused_id(&[1, 3, 4, 6]), 2);
    }

    #[test]
    fn ignores_non_positive_ids() {
        assert_eq!(lowest_unused_id(&[-4, 0, 1, 2]), 3);
        assert_eq!(lowest_unused_id(&[0, 2]), 1);
    }
}
