use crate::domain::model::Record;
use chrono::{NaiveDate, NaiveDateTime};

/// Records on each side of a cutoff. Undated records belong to neither side.
#[derive(Debug, Clone, Default)]
pub struct PeriodSplit<'a> {
    pub before: Vec<&'a Record>,
    pub after: Vec<&'a Record>,
    pub undated: usize,
}

/// `before` holds dates strictly earlier than the cutoff's midnight, `after` the rest.
pub fn split_by_cutoff(records: &[Record], cutoff: NaiveDate) -> PeriodSplit<'_> {
    let boundary: NaiveDateTime = cutoff.and_hms_opt(0, 0, 0).unwrap_or_default();
    let mut split = PeriodSplit::default();

    for record in records {
        match record.registration_date {
            Some(date) if date < boundary => split.before.push(record),
            Some(_) => split.after.push(record),
            None => split.undated += 1,
        }
    }

    split
}
