#![allow(dead_code)]

use qr_attendance::manager::AttendanceManager;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

/// A manager on a private in-memory database whose QR codes go to a fresh temp directory.
pub fn open_manager(prefix: &str) -> (AttendanceManager, PathBuf) {
    let qr_dir = temp_dir(prefix).join("qrcodes");
    let manager = AttendanceManager::open(":memory:", &qr_dir).expect("open manager");
    (manager, qr_dir)
}
