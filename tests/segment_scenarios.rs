use time_in_range::range::{
    segment, segment_population, FailurePolicy, Interval, Label, Measurement, Policy, RangeError,
    Source, TargetRange,
};

fn band() -> TargetRange {
    TargetRange::new(29.0, 32.0).unwrap()
}

fn weekly() -> Policy {
    Policy::new(7.0, 7.0).unwrap()
}

fn series(patient: &str, points: &[(i64, f64)]) -> Vec<Measurement> {
    points
        .iter()
        .map(|&(day, value)| Measurement::new(patient, day, value))
        .collect()
}

fn shape(intervals: &[Interval]) -> Vec<(Label, Source)> {
    intervals.iter().map(|i| (i.label, i.source)).collect()
}

fn total(intervals: &[Interval]) -> f64 {
    intervals.iter().map(|i| i.duration).sum()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn short_gap_inside_band_is_all_target() {
    let intervals = segment(&series("p1", &[(0, 30.0), (5, 31.0)]), &band(), &weekly()).unwrap();
    insta::assert_debug_snapshot!(intervals, @r###"
    [
        Interval {
            patient_id: "p1",
            label: Target,
            source: Interpolated,
            duration: 5.0,
        },
        Interval {
            patient_id: "p1",
            label: Target,
            source: CarriedForward,
            duration: 7.0,
        },
        Interval {
            patient_id: "p1",
            label: Missing,
            source: Unobserved,
            duration: 0.0,
        },
    ]
    "###);
    assert_close(total(&intervals), 12.0);
}

#[test]
fn long_gap_carries_each_side_and_leaves_missing_time() {
    let intervals = segment(&series("p1", &[(0, 30.0), (20, 35.0)]), &band(), &weekly()).unwrap();
    assert_eq!(
        shape(&intervals),
        vec![
            (Label::Target, Source::CarriedForward),
            (Label::Above, Source::CarriedForward),
            (Label::Missing, Source::Unobserved),
        ]
    );
    assert_close(intervals[0].duration, 7.0);
    assert_close(intervals[1].duration, 7.0);
    assert_close(intervals[2].duration, 13.0);
    assert_close(total(&intervals), 27.0);
}

#[test]
fn rising_line_through_band_inserts_both_crossings() {
    let intervals = segment(&series("p1", &[(0, 28.0), (3, 33.0)]), &band(), &weekly()).unwrap();
    assert_eq!(
        shape(&intervals[..3]),
        vec![
            (Label::Below, Source::Interpolated),
            (Label::Target, Source::Interpolated),
            (Label::Above, Source::Interpolated),
        ]
    );
    assert_close(intervals[0].duration, 0.6);
    assert_close(intervals[1].duration, 1.8);
    assert_close(intervals[2].duration, 0.6);
    assert_close(total(&intervals[..3]), 3.0);
    assert_eq!(intervals[3].label, Label::Above);
    assert_close(intervals[4].duration, 0.0);
}

#[test]
fn falling_line_through_band_orders_high_crossing_first() {
    let intervals = segment(&series("p1", &[(0, 34.0), (4, 28.0)]), &band(), &weekly()).unwrap();
    let labels: Vec<Label> = intervals.iter().map(|i| i.label).collect();
    assert_eq!(
        labels,
        vec![
            Label::Above,
            Label::Target,
            Label::Below,
            Label::Below,
            Label::Missing
        ]
    );
    assert_close(intervals[0].duration, 4.0 / 3.0);
    assert_close(intervals[1].duration, 2.0);
    assert_close(intervals[2].duration, 2.0 / 3.0);
}

#[test]
fn single_crossing_splits_gap_once() {
    let intervals = segment(&series("p1", &[(0, 30.0), (4, 34.0)]), &band(), &weekly()).unwrap();
    assert_eq!(intervals[0].label, Label::Target);
    assert_eq!(intervals[1].label, Label::Above);
    assert_close(intervals[0].duration, 2.0);
    assert_close(intervals[1].duration, 2.0);
}

#[test]
fn endpoint_on_threshold_needs_no_crossing() {
    let intervals = segment(&series("p1", &[(0, 28.0), (2, 29.0)]), &band(), &weekly()).unwrap();
    assert_eq!(intervals[0].label, Label::Below);
    assert_close(intervals[0].duration, 2.0);
    assert_eq!(intervals[1].label, Label::Target);
}

#[test]
fn single_measurement_is_one_carry_and_no_missing_time() {
    let intervals = segment(&series("p1", &[(3, 40.0)]), &band(), &weekly()).unwrap();
    assert_eq!(
        shape(&intervals),
        vec![
            (Label::Above, Source::CarriedForward),
            (Label::Missing, Source::Unobserved),
        ]
    );
    assert_close(intervals[0].duration, 7.0);
    assert_close(intervals[1].duration, 0.0);
}

#[test]
fn empty_series_yields_nothing() {
    let intervals = segment(&[], &band(), &weekly()).unwrap();
    assert!(intervals.is_empty());
}

#[test]
fn input_order_does_not_matter() {
    let sorted = segment(&series("p1", &[(0, 30.0), (5, 31.0)]), &band(), &weekly()).unwrap();
    let shuffled = segment(&series("p1", &[(5, 31.0), (0, 30.0)]), &band(), &weekly()).unwrap();
    assert_eq!(sorted, shuffled);
}

#[test]
fn segmenting_twice_is_identical() {
    let data = series("p1", &[(0, 27.5), (3, 33.0), (10, 31.0), (30, 29.5), (33, 26.0)]);
    let first = segment(&data, &band(), &weekly()).unwrap();
    let second = segment(&data, &band(), &weekly()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn tied_timestamps_form_zero_length_gap() {
    let intervals = segment(
        &series("p1", &[(0, 30.0), (0, 35.0), (3, 35.0)]),
        &band(),
        &weekly(),
    )
    .unwrap();
    assert_close(total(&intervals), 10.0);
    let above: f64 = intervals
        .iter()
        .filter(|i| i.label == Label::Above)
        .map(|i| i.duration)
        .sum();
    assert_close(above, 10.0);
    assert!(intervals.iter().all(|i| i.duration >= 0.0));
}

#[test]
fn carry_stops_at_next_measurement_when_window_exceeds_gap() {
    let policy = Policy::new(5.0, 10.0).unwrap();
    let intervals = segment(&series("p1", &[(0, 30.0), (8, 30.0)]), &band(), &policy).unwrap();
    assert_eq!(
        shape(&intervals),
        vec![
            (Label::Target, Source::CarriedForward),
            (Label::Target, Source::CarriedForward),
            (Label::Missing, Source::Unobserved),
        ]
    );
    assert_close(intervals[0].duration, 8.0);
    assert_close(intervals[1].duration, 10.0);
    assert_close(intervals[2].duration, 0.0);
}

#[test]
fn gap_equal_to_limit_is_carried_not_interpolated() {
    let intervals = segment(&series("p1", &[(0, 30.0), (7, 31.0)]), &band(), &weekly()).unwrap();
    assert_eq!(intervals[0].source, Source::CarriedForward);
    assert_close(intervals[2].duration, 0.0);
}

#[test]
fn mixed_patients_are_rejected() {
    let mut data = series("p1", &[(0, 30.0)]);
    data.push(Measurement::new("p2", 1, 30.0));
    let err = segment(&data, &band(), &weekly()).unwrap_err();
    assert!(matches!(err, RangeError::MixedPatients { .. }));
}

#[test]
fn non_finite_values_are_rejected() {
    let err = segment(&series("p1", &[(0, f64::NAN)]), &band(), &weekly()).unwrap_err();
    assert!(matches!(err, RangeError::InvalidMeasurement { timestamp: 0, .. }));
}

#[test]
fn overflowing_day_span_is_rejected() {
    let data = series("p1", &[(i64::MIN, 30.0), (i64::MAX, 31.0)]);
    let err = segment(&data, &band(), &weekly()).unwrap_err();
    assert!(matches!(
        err,
        RangeError::TimestampSpan { first: i64::MIN, last: i64::MAX, .. }
    ));

    let negative_days = series("p1", &[(-10, 30.0), (-2, 31.0)]);
    assert!(segment(&negative_days, &band(), &weekly()).is_ok());
}

#[test]
fn population_keeps_first_seen_patient_order() {
    let mut data = series("b", &[(0, 30.0)]);
    data.extend(series("a", &[(0, 20.0), (2, 21.0)]));
    data.push(Measurement::new("b", 3, 31.0));
    let intervals =
        segment_population(&data, &band(), &weekly(), FailurePolicy::Abort).unwrap();
    let first_a = intervals.iter().position(|i| i.patient_id == "a").unwrap();
    assert!(intervals[..first_a].iter().all(|i| i.patient_id == "b"));
    assert_close(total(&intervals), (3.0 + 7.0) + (2.0 + 7.0));
}

#[test]
fn population_abort_names_failing_patient() {
    let mut data = series("good", &[(0, 30.0)]);
    data.push(Measurement::new("bad", 0, f64::INFINITY));
    let err = segment_population(&data, &band(), &weekly(), FailurePolicy::Abort).unwrap_err();
    match err {
        RangeError::Patient { patient_id, .. } => assert_eq!(patient_id, "bad"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn population_skip_drops_failing_patient() {
    let mut data = series("good", &[(0, 30.0)]);
    data.push(Measurement::new("bad", 0, f64::NAN));
    let intervals =
        segment_population(&data, &band(), &weekly(), FailurePolicy::Skip).unwrap();
    assert!(intervals.iter().all(|i| i.patient_id == "good"));
    assert_eq!(intervals.len(), 2);
}
