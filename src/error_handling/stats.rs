//! Delivery statistics tracking.
//!
//! This module provides thread-safe counters for tracking query deliveries,
//! including the fire-and-forget sends whose outcome never reaches the caller.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ErrorType;

/// Thread-safe delivery statistics tracker.
///
/// Tracks successful deliveries and failed deliveries per `ErrorType` using
/// atomic counters. All error types are initialized to zero on creation.
///
/// # Thread Safety
///
/// This struct is thread-safe and can be shared across detached tasks using `Arc`.
#[derive(Debug)]
pub struct DeliveryStats {
    delivered: AtomicUsize,
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl DeliveryStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }

        DeliveryStats {
            delivered: AtomicUsize::new(0),
            errors,
        }
    }

    /// Records one successful delivery.
    pub fn increment_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment an error counter.
    ///
    /// All error types are initialized in the constructor; a missing entry
    /// is logged rather than panicking.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map. \
                 This indicates a bug in DeliveryStats initialization.",
                error
            );
        }
    }

    /// Number of deliveries that completed.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }

    /// Get the count for an error type.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Sum of all error counters.
    pub fn total_errors(&self) -> usize {
        self.errors.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }
}

impl Default for DeliveryStats {
    fn default() -> Self {
        Self::new()
    }
}
