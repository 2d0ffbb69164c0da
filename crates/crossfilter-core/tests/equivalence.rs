// File: crates/crossfilter-core/tests/equivalence.rs
// Purpose: Property tests: incremental state equals from-scratch aggregation after any
//          sequence of filter changes, for both group scopes, with fractional prices
//          and unparsable rows in the data.

use chrono::{Days, NaiveDate};
use crossfilter_core::{DashboardOptions, Filter, GroupScope, Key, Record, StockDashboard};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..1500).prop_map(|day| {
        let base = NaiveDate::from_ymd_opt(1998, 1, 1).expect("valid date");
        base.checked_add_days(Days::new(day)).unwrap_or(base)
    })
}

/// Mostly clean records priced in cents, so running sums accumulate rounding error,
/// mixed with rows whose open, close or volume failed to parse.
fn arb_record() -> impl Strategy<Value = Record> {
    let clean = (arb_date(), 5_000i32..15_000, -600i32..=600, 0u32..5_000_000).prop_map(
        |(date, open, mv, volume)| {
            Record::new(date, f64::from(open) / 100.0, f64::from(open + mv) / 100.0, f64::from(volume))
        },
    );
    let unparsable = (arb_date(), 50u32..150, 0usize..3).prop_map(|(date, level, bad)| {
        let mut fields = [level.to_string(), (level + 1).to_string(), "1000".to_string()];
        fields[bad] = "n/a".to_string();
        Record::from_text(date, &fields[0], &fields[1], &fields[2])
    });
    prop_oneof![8 => clean, 1 => unparsable]
}

#[derive(Clone, Debug)]
enum Op {
    Year(Option<(i64, i64)>),
    GainOrLoss(Option<&'static str>),
    Fluctuation(Option<(i64, i64)>),
    Quarter(Option<Vec<&'static str>>),
    Weekday(Option<i64>),
    Reset,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        proptest::option::of((1998i64..2003, 0i64..3)).prop_map(|r| Op::Year(r.map(|(lo, w)| (lo, lo + w)))),
        proptest::option::of(prop_oneof![Just("Gain"), Just("Loss")]).prop_map(Op::GainOrLoss),
        proptest::option::of((-12i64..12, 1i64..8)).prop_map(|r| Op::Fluctuation(r.map(|(lo, w)| (lo, lo + w)))),
        proptest::option::of(proptest::sample::subsequence(vec!["Q1", "Q2", "Q3", "Q4"], 1..4)).prop_map(Op::Quarter),
        proptest::option::of(0i64..7).prop_map(Op::Weekday),
        Just(Op::Reset),
    ]
}

fn apply(dash: &mut StockDashboard, op: &Op) {
    let result = match op {
        Op::Year(r) => dash.set_filter(dash.year, r.map(|(lo, hi)| Filter::range(lo, hi))),
        Op::GainOrLoss(k) => dash.set_filter(dash.gain_or_loss, k.map(Filter::exact)),
        Op::Fluctuation(r) => dash.set_filter(dash.fluctuation, r.map(|(lo, hi)| Filter::range(lo, hi))),
        Op::Quarter(qs) => dash.set_filter(dash.quarter, qs.clone().map(Filter::any_of)),
        Op::Weekday(d) => {
            let want = *d;
            let filter = want.map(|w| {
                Filter::custom(move |k: &Key| {
                    k.as_text().and_then(|t| t.split('.').next()).and_then(|i| i.parse::<i64>().ok()) == Some(w)
                })
            });
            dash.set_filter(dash.day_of_week, filter)
        }
        Op::Reset => Ok(dash.reset_all()),
    };
    result.expect("dashboard handles are valid");
}

fn run(records: Vec<Record>, ops: Vec<Op>, scope: GroupScope) -> Result<(), TestCaseError> {
    let n = records.len();
    let options = DashboardOptions { group_scope: scope, ..DashboardOptions::default() };
    let mut dash = StockDashboard::new(records, options).expect("dashboard");
    for op in &ops {
        apply(&mut dash, op);
        let agg = dash.aggregator();
        prop_assert!(agg.verify_all(EPS), "incremental state drifted after {:?}", op);
        prop_assert_eq!(agg.active_count(), agg.current_active_set().len());
    }

    dash.reset_all();
    let agg = dash.aggregator();
    prop_assert_eq!(agg.active_count(), n);
    let total: u64 = agg.group(dash.gain_or_loss_count).expect("group").all().map(|(_, c)| *c).sum();
    prop_assert_eq!(total as usize, n);
    prop_assert!(agg.verify_all(EPS));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unparsable_rows_only_taint_while_active(
        records in proptest::collection::vec(arb_record(), 1..80),
        ops in proptest::collection::vec(arb_op(), 0..10),
    ) {
        let mut dash = StockDashboard::new(records, DashboardOptions::default()).expect("dashboard");
        for op in &ops {
            apply(&mut dash, op);
        }
        let parsed = dash
            .aggregator_mut()
            .create_dimension("parsed", |r| {
                Key::from(if r.mid().is_finite() && r.volume.is_finite() { "ok" } else { "bad" })
            })
            .expect("dimension");
        dash.aggregator_mut().filter_exact(parsed, "ok").expect("filter");

        let agg = dash.aggregator();
        prop_assert!(agg.verify_all(EPS));
        for (key, p) in agg.group(dash.yearly_performance).expect("group").all() {
            prop_assert!(p.abs_gain.is_finite() && p.avg_index.is_finite(), "{} stayed tainted: {:?}", key, p);
        }
        for (key, v) in agg.group(dash.quarter_volume).expect("group").all() {
            prop_assert!(v.value().is_finite(), "{} stayed tainted", key);
        }
    }

    #[test]
    fn incremental_matches_scratch_all_filters(
        records in proptest::collection::vec(arb_record(), 0..120),
        ops in proptest::collection::vec(arb_op(), 1..25),
    ) {
        run(records, ops, GroupScope::AllFilters)?;
    }

    #[test]
    fn incremental_matches_scratch_excluding_own(
        records in proptest::collection::vec(arb_record(), 0..120),
        ops in proptest::collection::vec(arb_op(), 1..25),
    ) {
        run(records, ops, GroupScope::ExcludeOwnDimension)?;
    }
}
