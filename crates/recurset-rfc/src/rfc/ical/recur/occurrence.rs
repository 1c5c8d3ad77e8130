//! Conversion of date values into occurrence instants.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::{DateTime as IcalDateTime, DateTimeForm};
use crate::rfc::ical::expand::{TimeZoneResolver, convert_to_utc};

/// Conversion into an occurrence, checked at the mutator call site.
pub trait IntoOccurrence {
    /// ## Errors
    /// Returns `RfcError::TypeKind` if the value does not name an instant.
    fn into_occurrence(self) -> RfcResult<DateTime<Utc>>;
}

impl<Z: TimeZone> IntoOccurrence for DateTime<Z> {
    fn into_occurrence(self) -> RfcResult<DateTime<Utc>> {
        Ok(self.with_timezone(&Utc))
    }
}

impl IntoOccurrence for &IcalDateTime {
    /// Floating values are read as UTC; zoned values go through a fresh
    /// [`TimeZoneResolver`].
    fn into_occurrence(self) -> RfcResult<DateTime<Utc>> {
        let Some(naive) = self.to_naive() else {
            return Err(RfcError::TypeKind(format!(
                "{self} is not a valid calendar date-time"
            )));
        };

        match &self.form {
            DateTimeForm::Utc | DateTimeForm::Floating => Ok(naive.and_utc()),
            DateTimeForm::Zoned { tzid } => {
                let mut resolver = TimeZoneResolver::new();
                convert_to_utc(naive, tzid, &mut resolver)
                    .map_err(|err| RfcError::TypeKind(format!("{self} ({tzid}): {err}")))
            }
        }
    }
}

impl IntoOccurrence for IcalDateTime {
    fn into_occurrence(self) -> RfcResult<DateTime<Utc>> {
        (&self).into_occurrence()
    }
}
