//! Trait definition for the optional external schedule producer.

use super::error::ScheduleError;

/// An external text-generation capability that proposes schedules.
///
/// Implementations own transport, authentication and timeouts. The extractor
/// only asks whether the oracle is usable and, if so, sends it the (capped)
/// document text with today's date.
pub trait ScheduleOracle: Send + Sync {
    /// Whether requests can be attempted right now.
    fn ready(&self) -> bool;

    /// Request schedule data for `text`.
    ///
    /// `today_iso` is `YYYY-MM-DD`. The reply is raw model output, expected to
    /// contain a JSON array of objects with date/title/description/type fields.
    fn request(&self, text: &str, today_iso: &str) -> Result<String, ScheduleError>;
}

impl<T: ScheduleOracle + ?Sized> ScheduleOracle for Box<T> {
    fn ready(&self) -> bool {
        (**self).ready()
    }

    fn request(&self, text: &str, today_iso: &str) -> Result<String, ScheduleError> {
        (**self).request(text, today_iso)
    }
}

impl<T: ScheduleOracle + ?Sized> ScheduleOracle for std::sync::Arc<T> {
    fn ready(&self) -> bool {
        (**self).ready()
    }

    fn request(&self, text: &str, today_iso: &str) -> Result<String, ScheduleError> {
        (**self).request(text, today_iso)
    }
}
