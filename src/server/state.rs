use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use super::error::AppError;
use crate::curriculum::Curriculum;

pub struct State {
    pub curriculum: Curriculum,
    conn: Mutex<Connection>,
}

impl State {
    pub fn new(curriculum: Curriculum, conn: Connection) -> Arc<Self> {
        Arc::new(Self {
            curriculum,
            conn: Mutex::new(conn),
        })
    }

    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.conn
            .lock()
            .map_err(|_| AppError::InternalError("Database connection lock poisoned".into()))
    }
}
