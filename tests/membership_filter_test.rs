use summary_index::filter::MembershipFilter;
use summary_index::SummaryError;

const GHENT: &str = "http://dbpedia.org/resource/Ghent";
const BRUGES: &str = "http://dbpedia.org/resource/Bruges";

/// 128 bits, 4 hashes, holding Ghent and Bruges as published by the summary generator.
const PUBLISHED: &str = "QAAAgAAAAAEAAAECBCgAAA==";

#[test]
fn test_published_filter_is_read_bit_for_bit() {
    let filter = MembershipFilter::from_base64(128, 4, PUBLISHED).unwrap();
    assert!(filter.may_contain(GHENT.as_bytes()));
    assert!(filter.may_contain(BRUGES.as_bytes()));
    assert!(!filter.may_contain(b"http://dbpedia.org/resource/Antwerp"));
}

#[test]
fn test_built_filter_matches_published_encoding() {
    let mut filter = MembershipFilter::empty(128, 4).unwrap();
    filter.add(GHENT.as_bytes());
    filter.add(BRUGES.as_bytes());
    assert_eq!(filter.to_base64(), PUBLISHED);
}

#[test]
fn test_every_inserted_value_is_a_member() {
    let mut filter = MembershipFilter::with_rate(500, 0.01).unwrap();
    let values: Vec<String> = (0..500).map(|i| format!("http://example.org/item/{}", i)).collect();
    for value in &values {
        filter.add(value.as_bytes());
    }
    assert!(values.iter().all(|value| filter.may_contain(value.as_bytes())));
}

#[test]
fn test_false_positive_rate_stays_near_target() {
    let mut filter = MembershipFilter::with_rate(1000, 0.01).unwrap();
    for i in 0..1000 {
        filter.add(format!("http://example.org/present/{}", i).as_bytes());
    }

    let samples = 10_000;
    let false_positives = (0..samples)
        .filter(|i| filter.may_contain(format!("http://example.org/absent/{}", i).as_bytes()))
        .count();
    assert!(false_positives < samples / 50, "{} false positives", false_positives);
    assert!(filter.false_positive_rate(1000) < 0.011);
}

#[test]
fn test_descriptor_values_are_validated() {
    assert!(matches!(
        MembershipFilter::from_base64(128, 4, "%%%"),
        Err(SummaryError::InvalidFilter(_))
    ));
    assert!(matches!(
        MembershipFilter::from_base64(1024, 4, PUBLISHED),
        Err(SummaryError::InvalidFilter(_))
    ));
    assert!(MembershipFilter::from_base64(128, 0, PUBLISHED).is_err());
    assert!(MembershipFilter::from_base64(0, 4, "").is_err());
}
