use time_in_range::range::{
    summarize, summary::percentile, AggregateRow, BootstrapSample, Label,
};

fn sample(iteration: usize, target: Option<f64>) -> BootstrapSample {
    let rows = Label::ALL
        .iter()
        .map(|&label| AggregateRow {
            label,
            total_duration: 0.0,
            percent: match label {
                Label::Target => target,
                _ => target.map(|t| (1.0 - t) / 3.0),
            },
        })
        .collect();
    BootstrapSample { iteration, rows }
}

#[test]
fn mean_and_sample_std_dev_per_label() {
    let samples = vec![
        sample(0, Some(0.2)),
        sample(1, Some(0.4)),
        sample(2, Some(0.6)),
    ];
    let summary = summarize(&samples);
    let target = summary.iter().find(|s| s.label == Label::Target).unwrap();
    assert_eq!(target.iterations, 3);
    assert_eq!(target.undefined, 0);
    assert!((target.mean.unwrap() - 0.4).abs() < 1e-12);
    assert!((target.std_dev.unwrap() - 0.2).abs() < 1e-12);
    assert!((target.ci_low.unwrap() - 0.21).abs() < 1e-12);
    assert!((target.ci_high.unwrap() - 0.59).abs() < 1e-12);
}

#[test]
fn undefined_iterations_are_counted_not_averaged() {
    let samples = vec![sample(0, Some(0.5)), sample(1, None)];
    let summary = summarize(&samples);
    let target = summary.iter().find(|s| s.label == Label::Target).unwrap();
    assert_eq!(target.iterations, 1);
    assert_eq!(target.undefined, 1);
    assert_eq!(target.mean, Some(0.5));
    assert_eq!(target.std_dev, None);
}

#[test]
fn percentile_interpolates_between_ranks() {
    assert_eq!(percentile(&[], 0.5), None);
    assert_eq!(percentile(&[3.0], 0.9), Some(3.0));
    assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 0.5), Some(2.5));
    assert_eq!(percentile(&[1.0, 2.0], 1.5), Some(2.0));
}
