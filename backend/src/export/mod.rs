//! # Document Export
//!
//! PDF export of signed documents. Only one export may run at a time; a second
//! request while one is in flight is rejected rather than queued. A running
//! export cannot be aborted.

pub mod pdf;

use crate::errors::AppError;
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-flight flag shared by all export requests.
#[derive(Clone, Default)]
pub struct ExportGuard {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of one export; clears the flag when dropped.
pub struct ExportTicket {
    busy: Arc<AtomicBool>,
}

impl ExportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn try_begin(&self) -> Result<ExportTicket, AppError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Rejected export request: another export is running");
            return Err(AppError::ExportBusy);
        }
        Ok(ExportTicket {
            busy: self.busy.clone(),
        })
    }
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
