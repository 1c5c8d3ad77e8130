use recurset_test::component::recur::{Recur, RecurrenceSet};

use super::helpers::{daily, utc, weekly};

#[test_log::test]
fn nested_set_acts_as_a_rule() {
    let mut inner = RecurrenceSet::default();
    inner.add_rule(daily(5, utc(2023, 1, 1, 10))).unwrap();
    inner.add_exclusion_date(utc(2023, 1, 2, 10)).unwrap();

    let mut outer = RecurrenceSet::default();
    outer.add_rule(inner).unwrap();
    outer.add_date(utc(2023, 1, 9, 10)).unwrap();
    outer.add_exclusion_date(utc(2023, 1, 4, 10)).unwrap();

    assert_eq!(
        outer.all(),
        vec![
            utc(2023, 1, 1, 10),
            utc(2023, 1, 3, 10),
            utc(2023, 1, 5, 10),
            utc(2023, 1, 9, 10),
        ]
    );
}

#[test_log::test]
fn nested_set_can_exclude() {
    let mut mondays = RecurrenceSet::default();
    mondays.add_rule(weekly(2, utc(2023, 1, 2, 9))).unwrap();

    let mut outer = RecurrenceSet::default();
    outer.add_rule(daily(7, utc(2023, 1, 2, 9))).unwrap();
    outer.add_exclusion_rule(mondays).unwrap();

    let occurrences = outer.all();

    assert_eq!(occurrences.len(), 6);
    assert!(!occurrences.contains(&utc(2023, 1, 2, 9)));
    assert_eq!(outer.after(utc(2023, 1, 1, 0), false), Some(utc(2023, 1, 3, 9)));
}

#[test_log::test]
fn cloned_set_diverges_from_original() {
    let mut original = RecurrenceSet::new(true);
    original.add_rule(daily(3, utc(2023, 1, 1, 10))).unwrap();
    let before = original.all();

    let mut copy = original.clone();
    copy.add_exclusion_date(utc(2023, 1, 2, 10)).unwrap();

    assert_eq!(original.all(), before);
    assert_eq!(copy.all().len(), 2);
    assert!(copy.caching_enabled());
}
