use chrono::{DateTime, FixedOffset, Utc};
use recurset_rfc::rfc::ical::recur::{Recur, RecurrenceSet};
use rrule::RRuleSet;

pub enum CaseQuery {
    All,
    Between(&'static str, &'static str, bool),
    After(&'static str, bool),
    Before(&'static str, bool),
}

pub struct SetCase {
    pub name: &'static str,
    pub rules: &'static [&'static str],
    pub dates: &'static [&'static str],
    pub exclusion_rules: &'static [&'static str],
    pub exclusion_dates: &'static [&'static str],
    pub query: CaseQuery,
    pub expected: &'static [&'static str],
}

#[expect(clippy::too_many_lines)]
pub fn set_cases() -> Vec<SetCase> {
    vec![
        SetCase {
            name: "daily_with_exdate",
            rules: &["DTSTART:20230101T100000Z\nRRULE:FREQ=DAILY;COUNT=5"],
            dates: &[],
            exclusion_rules: &[],
            exclusion_dates: &["2023-01-03T10:00:00+00:00"],
            query: CaseQuery::All,
            expected: &[
                "2023-01-01T10:00:00+00:00",
                "2023-01-02T10:00:00+00:00",
                "2023-01-04T10:00:00+00:00",
                "2023-01-05T10:00:00+00:00",
            ],
        },
        SetCase {
            name: "rdates_merge_without_duplicates",
            rules: &["DTSTART:20230101T100000Z\nRRULE:FREQ=DAILY;COUNT=3"],
            dates: &["2023-01-10T08:00:00+00:00", "2023-01-02T10:00:00+00:00"],
            exclusion_rules: &[],
            exclusion_dates: &[],
            query: CaseQuery::All,
            expected: &[
                "2023-01-01T10:00:00+00:00",
                "2023-01-02T10:00:00+00:00",
                "2023-01-03T10:00:00+00:00",
                "2023-01-10T08:00:00+00:00",
            ],
        },
        SetCase {
            name: "exrule_removes_mondays",
            rules: &["DTSTART:20230102T090000Z\nRRULE:FREQ=DAILY;COUNT=8"],
            dates: &[],
            exclusion_rules: &["DTSTART:20230102T090000Z\nRRULE:FREQ=WEEKLY;COUNT=2"],
            exclusion_dates: &[],
            query: CaseQuery::All,
            expected: &[
                "2023-01-03T09:00:00+00:00",
                "2023-01-04T09:00:00+00:00",
                "2023-01-05T09:00:00+00:00",
                "2023-01-06T09:00:00+00:00",
                "2023-01-07T09:00:00+00:00",
                "2023-01-08T09:00:00+00:00",
            ],
        },
        SetCase {
            name: "between_exclusive",
            rules: &["DTSTART:20230101T100000Z\nRRULE:FREQ=DAILY;COUNT=10"],
            dates: &[],
            exclusion_rules: &[],
            exclusion_dates: &[],
            query: CaseQuery::Between(
                "2023-01-03T10:00:00+00:00",
                "2023-01-06T10:00:00+00:00",
                false,
            ),
            expected: &["2023-01-04T10:00:00+00:00", "2023-01-05T10:00:00+00:00"],
        },
        SetCase {
            name: "between_inclusive_with_exrule",
            rules: &["DTSTART:20230101T100000Z\nRRULE:FREQ=DAILY;COUNT=10"],
            dates: &[],
            exclusion_rules: &["DTSTART:20230104T100000Z\nRRULE:FREQ=DAILY;COUNT=1"],
            exclusion_dates: &[],
            query: CaseQuery::Between(
                "2023-01-03T10:00:00+00:00",
                "2023-01-06T10:00:00+00:00",
                true,
            ),
            expected: &[
                "2023-01-03T10:00:00+00:00",
                "2023-01-05T10:00:00+00:00",
                "2023-01-06T10:00:00+00:00",
            ],
        },
        SetCase {
            name: "after_exclusive_on_infinite_rule",
            rules: &["DTSTART:20230101T100000Z\nRRULE:FREQ=DAILY"],
            dates: &[],
            exclusion_rules: &[],
            exclusion_dates: &[],
            query: CaseQuery::After("2023-01-05T10:00:00+00:00", false),
            expected: &["2023-01-06T10:00:00+00:00"],
        },
        SetCase {
            name: "after_inclusive_on_infinite_rule",
            rules: &["DTSTART:20230101T100000Z\nRRULE:FREQ=DAILY"],
            dates: &[],
            exclusion_rules: &[],
            exclusion_dates: &[],
            query: CaseQuery::After("2023-01-05T10:00:00+00:00", true),
            expected: &["2023-01-05T10:00:00+00:00"],
        },
        SetCase {
            name: "after_skips_exdate",
            rules: &["DTSTART:20230101T100000Z\nRRULE:FREQ=DAILY"],
            dates: &[],
            exclusion_rules: &[],
            exclusion_dates: &["2023-01-06T10:00:00+00:00"],
            query: CaseQuery::After("2023-01-05T10:00:00+00:00", false),
            expected: &["2023-01-07T10:00:00+00:00"],
        },
        SetCase {
            name: "after_skips_lazy_exrule",
            rules: &["DTSTART:20230101T100000Z\nRRULE:FREQ=DAILY"],
            dates: &[],
            exclusion_rules: &["DTSTART:20230106T100000Z\nRRULE:FREQ=DAILY;COUNT=2"],
            exclusion_dates: &[],
            query: CaseQuery::After("2023-01-05T10:00:00+00:00", false),
            expected: &["2023-01-08T10:00:00+00:00"],
        },
        SetCase {
            name: "after_prefers_earlier_rdate",
            rules: &["DTSTART:20230101T100000Z\nRRULE:FREQ=WEEKLY"],
            dates: &["2023-01-05T00:00:00+00:00"],
            exclusion_rules: &[],
            exclusion_dates: &[],
            query: CaseQuery::After("2023-01-02T00:00:00+00:00", false),
            expected: &["2023-01-05T00:00:00+00:00"],
        },
        SetCase {
            name: "before_picks_rdate",
            rules: &["DTSTART:20230102T090000Z\nRRULE:FREQ=WEEKLY;COUNT=4"],
            dates: &["2023-01-20T12:00:00+00:00"],
            exclusion_rules: &[],
            exclusion_dates: &[],
            query: CaseQuery::Before("2023-01-23T09:00:00+00:00", false),
            expected: &["2023-01-20T12:00:00+00:00"],
        },
        SetCase {
            name: "before_inclusive_hits_boundary",
            rules: &["DTSTART:20230102T090000Z\nRRULE:FREQ=WEEKLY;COUNT=4"],
            dates: &["2023-01-20T12:00:00+00:00"],
            exclusion_rules: &[],
            exclusion_dates: &[],
            query: CaseQuery::Before("2023-01-23T09:00:00+00:00", true),
            expected: &["2023-01-23T09:00:00+00:00"],
        },
        SetCase {
            name: "before_with_nothing_earlier",
            rules: &["DTSTART:20230110T090000Z\nRRULE:FREQ=DAILY;COUNT=3"],
            dates: &[],
            exclusion_rules: &[],
            exclusion_dates: &[],
            query: CaseQuery::Before("2023-01-01T00:00:00+00:00", false),
            expected: &[],
        },
        SetCase {
            name: "dates_only_come_back_sorted",
            rules: &[],
            dates: &[
                "2023-03-01T00:00:00+00:00",
                "2023-01-01T00:00:00+00:00",
                "2023-02-01T00:00:00+00:00",
            ],
            exclusion_rules: &[],
            exclusion_dates: &["2023-02-01T00:00:00+00:00"],
            query: CaseQuery::All,
            expected: &["2023-01-01T00:00:00+00:00", "2023-03-01T00:00:00+00:00"],
        },
        SetCase {
            name: "exclusions_alone_yield_nothing",
            rules: &[],
            dates: &[],
            exclusion_rules: &["DTSTART:20230101T100000Z\nRRULE:FREQ=DAILY;COUNT=3"],
            exclusion_dates: &["2023-01-01T10:00:00+00:00"],
            query: CaseQuery::All,
            expected: &[],
        },
        SetCase {
            name: "two_rules_interleave",
            rules: &[
                "DTSTART:20230101T090000Z\nRRULE:FREQ=DAILY;INTERVAL=2;COUNT=3",
                "DTSTART:20230102T090000Z\nRRULE:FREQ=DAILY;INTERVAL=2;COUNT=2",
            ],
            dates: &[],
            exclusion_rules: &[],
            exclusion_dates: &[],
            query: CaseQuery::All,
            expected: &[
                "2023-01-01T09:00:00+00:00",
                "2023-01-02T09:00:00+00:00",
                "2023-01-03T09:00:00+00:00",
                "2023-01-04T09:00:00+00:00",
                "2023-01-05T09:00:00+00:00",
            ],
        },
    ]
}

pub fn build_set(case: &SetCase, caching: bool) -> RecurrenceSet {
    let mut set = RecurrenceSet::new(caching);
    for rule in case.rules {
        set.add_rule(parse_rule_set(case.name, rule))
            .unwrap_or_else(|err| panic!("Case {} rejected rule: {err}", case.name));
    }
    for date in case.dates {
        set.add_date(parse_rfc3339(date))
            .unwrap_or_else(|err| panic!("Case {} rejected date: {err}", case.name));
    }
    for rule in case.exclusion_rules {
        set.add_exclusion_rule(parse_rule_set(case.name, rule))
            .unwrap_or_else(|err| panic!("Case {} rejected exclusion rule: {err}", case.name));
    }
    for date in case.exclusion_dates {
        set.add_exclusion_date(parse_rfc3339(date))
            .unwrap_or_else(|err| panic!("Case {} rejected exclusion date: {err}", case.name));
    }
    set
}

pub fn run_query(set: &RecurrenceSet, query: &CaseQuery) -> Vec<DateTime<Utc>> {
    match *query {
        CaseQuery::All => set.all(),
        CaseQuery::Between(after, before, inclusive) => {
            set.between(utc(after), utc(before), inclusive)
        }
        CaseQuery::After(after, inclusive) => set.after(utc(after), inclusive).into_iter().collect(),
        CaseQuery::Before(before, inclusive) => {
            set.before(utc(before), inclusive).into_iter().collect()
        }
    }
}

pub fn assert_case(case: &SetCase, caching: bool) {
    let set = build_set(case, caching);
    let actual: Vec<i64> = run_query(&set, &case.query)
        .iter()
        .map(DateTime::timestamp)
        .collect();
    let expected: Vec<i64> = case
        .expected
        .iter()
        .map(|value| parse_rfc3339(value).timestamp())
        .collect();

    assert_eq!(actual, expected, "Case {} did not match", case.name);
}

fn parse_rule_set(name: &str, value: &str) -> RRuleSet {
    value
        .parse()
        .unwrap_or_else(|err| panic!("Failed to parse {name}: {err}"))
}

fn utc(value: &str) -> DateTime<Utc> {
    parse_rfc3339(value).with_timezone(&Utc)
}

fn parse_rfc3339(value: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(value).unwrap_or_else(|err| {
        panic!("Failed to parse rfc3339 value {value}: {err}")
    })
}
