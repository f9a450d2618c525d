//! Prepares a fresh installation.
//!
//! Opening the manager creates both tables if they are missing; this binary also creates the QR
//! code directory and prints the current roster, so it is safe to run against an existing
//! database.

use qr_attendance::{AttendanceError, display};
use std::fs;

pub fn main() -> Result<(), AttendanceError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut manager = qr_attendance::create_default_manager()?;

    fs::create_dir_all(manager.qr_dir())?;
    log::info!("QR codes will be written to {}", manager.qr_dir().display());

    let roster = manager.roster()?;
    println!("{} student(s) registered.", roster.len());
    if !roster.is_empty() {
        println!("Roster:\n{}", display::roster_table(&roster));
    }

    Ok(())
}
