//! Event types and report rendering

use book_analyzer::{Direction, Emission, OrderEvent, OrderId, Quote, Side, Timestamp};
use pretty_assertions::assert_eq;

#[test]
fn test_direction_source_sides() {
    assert_eq!(Direction::Buy.source_side(), Side::Ask);
    assert_eq!(Direction::Sell.source_side(), Side::Bid);
    for side in [Side::Bid, Side::Ask] {
        assert_eq!(Direction::fed_by(side).source_side(), side);
    }
}

#[test]
fn test_side_codes() {
    assert_eq!(Side::from_code("B"), Some(Side::Bid));
    assert_eq!(Side::from_code("S"), Some(Side::Ask));
    assert_eq!(Side::from_code("A"), None);
}

#[test]
fn test_report_line_format() {
    let ts = Timestamp::new("28800758");
    assert_eq!(
        Emission::priced(ts.clone(), Direction::Sell, 8832.56).to_string(),
        "28800758 S 8832.56"
    );
    assert_eq!(
        Emission::priced(ts.clone(), Direction::Buy, 1040.0).to_string(),
        "28800758 B 1040.00"
    );
    assert_eq!(
        Emission::not_available(ts, Direction::Buy).to_string(),
        "28800758 B NA"
    );
    assert_eq!(Quote::Total(0.5).to_string(), "0.50");
}

#[test]
fn test_event_accessors() {
    let add = OrderEvent::add(5, "x", Side::Bid, 1.0, 2);
    let reduce = OrderEvent::reduce(6, OrderId::new("x"), 2);
    assert_eq!(add.timestamp(), &Timestamp::new("5"));
    assert_eq!(reduce.timestamp().as_str(), "6");
    assert_eq!(add.id(), reduce.id());
}

#[test]
fn test_emission_serializes() {
    let emission = Emission::not_available(Timestamp::new("0001"), Direction::Sell);
    let json = serde_json::to_string(&emission).unwrap();
    assert_eq!(
        json,
        r#"{"timestamp":"0001","direction":"Sell","quote":"NotAvailable"}"#
    );
    let back: Emission = serde_json::from_str(&json).unwrap();
    assert_eq!(back, emission);
}

#[test]
fn test_timestamp_token_round_trips_into_report() {
    for raw in ["0028800538", "28800538.5", "28800538"] {
        let emission = Emission::priced(Timestamp::from(raw), Direction::Buy, 44.26);
        assert_eq!(emission.to_string(), format!("{raw} B 44.26"));
    }
    assert_eq!(Timestamp::from(42_u64).as_str(), "42");
}
