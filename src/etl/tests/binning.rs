use crate::etl::binning::AgeBins;

#[test]
fn test_lower_edge_belongs_to_upper_bucket() {
    let bins = AgeBins::default();
    let cases = [
        (10, None),
        (15, None),
        (16, Some("16-25")),
        (24, Some("16-25")),
        (25, Some("26-40")),
        (26, Some("26-40")),
        (40, Some("41-65")),
        (41, Some("41-65")),
        (65, Some("65+")),
        (66, Some("65+")),
        (100, Some("65+")),
        (101, None),
    ];
    for (age, expected) in cases {
        assert_eq!(bins.label_for(age), expected, "age {age}");
    }
}

#[test]
fn test_custom_bins() {
    let bins = AgeBins::new(vec![0, 18, 120], vec!["minor".to_owned(), "adult".to_owned()])
        .expect("valid bins");
    assert_eq!(bins.label_for(17), Some("minor"));
    assert_eq!(bins.label_for(18), Some("adult"));
    assert_eq!(bins.label_for(120), Some("adult"));
    assert_eq!(bins.label_for(-1), None);
}

#[test]
fn test_invalid_bins_rejected() {
    let labels = || vec!["a".to_owned(), "b".to_owned()];
    assert!(AgeBins::new(vec![16], Vec::new()).is_err());
    assert!(AgeBins::new(vec![16, 16, 40], labels()).is_err());
    assert!(AgeBins::new(vec![40, 25, 16], labels()).is_err());
    assert!(AgeBins::new(vec![16, 25, 40, 65], labels()).is_err());
    assert!(AgeBins::new(vec![16, 25, 40], labels()).is_ok());
}
