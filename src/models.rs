use crate::schema::{attendance, students};
use diesel::prelude::*;
use serde::Serialize;
use tabled::Tabled;

/// A registered student. The `id` is also what the student's QR code encodes.
#[derive(Queryable, Selectable, Tabled, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Insertable)]
#[diesel(table_name = students)]
pub struct NewStudent<'a> {
    pub id: i32,
    pub name: &'a str,
    pub email: &'a str,
}

/// A single attendance entry. Dates are `YYYY-MM-DD` and times `HH:MM:SS`.
#[derive(Queryable, Selectable, Insertable, Tabled, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AttendanceRecord {
    pub student_id: i32,
    pub date: String,
    pub time: String,
}

/// One line of the attendance report: attendance joined to the student's name.
#[derive(Tabled, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub date: String,
    pub time: String,
}

impl From<(String, String, String)> for ReportRow {
    fn from((name, date, time): (String, String, String)) -> Self {
        Self { name, date, time }
    }
}
