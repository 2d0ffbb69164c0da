// File: crates/crossfilter-core/tests/reducers.rs
// Purpose: Running-statistic reducers: worked yearly example, inverse law, zero-count safety.

use chrono::NaiveDate;
use crossfilter_core::{
    ApproxEq, CountReducer, IndexAverage, MonthlyIndexAverage, Performance, Record, Reducer, SumReducer,
    YearlyPerformance,
};

fn rec(m: u32, d: u32, open: f64, close: f64, volume: f64) -> Record {
    Record::new(NaiveDate::from_ymd_opt(2001, m, d).expect("valid date"), open, close, volume)
}

fn close_to(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

#[test]
fn yearly_two_records_then_remove_second() {
    let r1 = rec(1, 2, 100.0, 110.0, 1000.0);
    let r2 = rec(1, 3, 110.0, 90.0, 2000.0);
    let y = YearlyPerformance;

    let both = y.add(y.add(y.initial(), &r1), &r2);
    assert_eq!(both.count, 2);
    assert_eq!(both.abs_gain, -10.0);
    assert_eq!(both.fluctuation, 30.0);
    assert_eq!(both.sum_index, 205.0);
    assert_eq!(both.avg_index, 102.5);
    assert!(close_to(both.percentage_gain, -9.756, 1e-3), "{}", both.percentage_gain);
    assert!(close_to(both.fluctuation_percentage, 29.268, 1e-3));

    let one = y.remove(both, &r2);
    assert_eq!(one.count, 1);
    assert_eq!(one.abs_gain, 10.0);
    assert_eq!(one.sum_index, 105.0);
    assert_eq!(one.avg_index, 105.0);
    assert!(close_to(one.percentage_gain, 9.524, 1e-3), "{}", one.percentage_gain);

    let scratch = y.add(y.initial(), &r1);
    assert!(one.approx_eq(&scratch, 1e-12));
}

#[test]
fn emptied_partition_snaps_to_zero() {
    let r = rec(4, 2, 123.4, 120.1, 10.0);
    let y = YearlyPerformance;
    let empty = y.remove(y.add(y.initial(), &r), &r);
    assert_eq!(empty, Performance::default());
    assert!(!empty.avg_index.is_nan());
    assert!(!empty.percentage_gain.is_nan());

    let m = MonthlyIndexAverage;
    let empty = m.remove(m.add(m.initial(), &r), &r);
    assert_eq!(empty, IndexAverage::default());
    assert_eq!(empty.avg, 0.0);
}

#[test]
fn monthly_average_rounds_half_up() {
    let m = MonthlyIndexAverage;
    // mids 100.5 and 101.0 -> total 201.5 over 2 days = 100.75 -> 101
    let s = m.add(m.add(m.initial(), &rec(5, 1, 100.0, 101.0, 0.0)), &rec(5, 2, 101.0, 101.0, 0.0));
    assert_eq!(s.days, 2);
    assert_eq!(s.total, 201.5);
    assert_eq!(s.avg, 101.0);
    // single mid of 100.5 rounds up
    let s = m.add(m.initial(), &rec(5, 1, 100.0, 101.0, 0.0));
    assert_eq!(s.avg, 101.0);
}

#[test]
fn remove_inverts_add_for_every_reducer() {
    let base = [rec(3, 1, 10.0, 12.0, 300.0), rec(3, 2, 12.0, 11.5, 700.0)];
    let extra = rec(3, 5, 11.25, 9.75, 1_250_000.0);

    let y = YearlyPerformance;
    let s = base.iter().fold(y.initial(), |s, r| y.add(s, r));
    assert!(y.remove(y.add(s, &extra), &extra).approx_eq(&s, 1e-9));

    let m = MonthlyIndexAverage;
    let s = base.iter().fold(m.initial(), |s, r| m.add(s, r));
    assert!(m.remove(m.add(s, &extra), &extra).approx_eq(&s, 1e-9));

    for sum in [SumReducer::movement(), SumReducer::volume(), SumReducer::scaled_volume(500_000.0)] {
        let s = base.iter().fold(sum.initial(), |s, r| sum.add(s, r));
        assert!(sum.remove(sum.add(s, &extra), &extra).approx_eq(&s, 1e-9), "{}", sum.id());
    }

    let c = CountReducer;
    assert_eq!(c.remove(c.add(2, &extra), &extra), 2);
}

#[test]
fn nan_fields_propagate_without_panicking() {
    let bad = Record::from_text(NaiveDate::from_ymd_opt(2001, 1, 2).expect("valid date"), "100", "x", "");
    let y = YearlyPerformance;
    let s = y.add(y.initial(), &bad);
    assert_eq!(s.count, 1);
    assert!(s.abs_gain.is_nan());
    assert!(s.percentage_gain.is_nan());
    assert_eq!(y.remove(s, &bad), Performance::default());
    let volume = SumReducer::volume();
    assert!(volume.add(volume.initial(), &bad).value().is_nan());
}

#[test]
fn removing_a_nan_record_restores_the_finite_state() {
    let good = rec(1, 2, 110.0, 90.0, 1000.0);
    let bad = Record::from_text(NaiveDate::from_ymd_opt(2001, 1, 3).expect("valid date"), "100", "n/a", "");

    let y = YearlyPerformance;
    let only_good = y.add(y.initial(), &good);
    let both = y.add(only_good, &bad);
    assert_eq!(both.count, 2);
    assert!(both.abs_gain.is_nan());
    assert!(both.sum_index.is_nan());
    let back = y.remove(both, &bad);
    assert_eq!(back, only_good);
    assert_eq!(back.abs_gain, -20.0);
    assert_eq!(back.sum_index, 100.0);
    assert_eq!(back.avg_index, 100.0);

    let m = MonthlyIndexAverage;
    let month = m.add(m.initial(), &good);
    let tainted = m.add(month, &bad);
    assert!(tainted.total.is_nan() && tainted.avg.is_nan());
    assert_eq!(m.remove(tainted, &bad), month);

    let volume = SumReducer::volume();
    let s = volume.add(volume.initial(), &good);
    let tainted = volume.add(s, &bad);
    assert!(tainted.value().is_nan());
    assert_eq!(volume.remove(tainted, &bad).value(), 1000.0);
}

#[test]
fn monthly_average_tolerates_drift_across_a_rounding_tie() {
    let m = MonthlyIndexAverage;
    // A single mid of exactly 100.5 rounds up; a total a hair below it rounds down.
    let exact = m.add(m.initial(), &rec(5, 1, 100.0, 101.0, 0.0));
    let drifted = m.add(m.initial(), &rec(5, 1, 100.0, 101.0 - 2e-12, 0.0));
    assert_eq!(exact.avg, 101.0);
    assert_eq!(drifted.avg, 100.0);
    assert!(exact.approx_eq(&drifted, 1e-9));
    assert!(!exact.approx_eq(&m.add(m.initial(), &rec(5, 1, 100.0, 99.0, 0.0)), 1e-9));
}
