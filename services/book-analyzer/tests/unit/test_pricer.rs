//! Fill cost computation

use book_analyzer::pricer::{Fill, fill_plan, price_target};
use book_analyzer::{BookError, OrderBook, OrderId, Side};
use rstest::rstest;

fn ladder(side: Side, levels: &[(f64, u64)]) -> OrderBook {
    let mut book = OrderBook::new();
    for (i, &(price, size)) in levels.iter().enumerate() {
        book.insert(OrderId::new(format!("o{i}")), side, price, size)
            .unwrap();
    }
    book
}

#[rstest]
#[case::single_level(&[(10.0, 100)], 50, 500.0)]
#[case::two_levels(&[(10.0, 60), (11.0, 60)], 100, 1040.0)]
#[case::unsorted_input(&[(11.0, 60), (10.0, 60)], 100, 1040.0)]
#[case::exact_fill(&[(1.25, 4), (1.5, 4)], 8, 11.0)]
fn test_ask_fill_cost(#[case] levels: &[(f64, u64)], #[case] target: u64, #[case] expected: f64) {
    let book = ladder(Side::Ask, levels);
    assert_eq!(price_target(&book, Side::Ask, target).unwrap(), expected);
}

#[rstest]
#[case::highest_first(&[(5.0, 50), (6.0, 10)], 50, 260.0)]
#[case::sample_feed(&[(44.10, 100), (44.18, 157)], 200, 8832.56)]
fn test_bid_fill_proceeds(#[case] levels: &[(f64, u64)], #[case] target: u64, #[case] expected: f64) {
    let book = ladder(Side::Bid, levels);
    assert_eq!(price_target(&book, Side::Bid, target).unwrap(), expected);
}

#[test]
fn test_plan_never_exceeds_target() {
    let book = ladder(Side::Ask, &[(1.0, 3), (2.0, 3), (3.0, 3), (4.0, 3)]);
    let plan = fill_plan(&book, Side::Ask, 7).unwrap();
    assert_eq!(
        plan,
        vec![
            Fill { id: OrderId::new("o0"), price: 1.0, consumed: 3 },
            Fill { id: OrderId::new("o1"), price: 2.0, consumed: 3 },
            Fill { id: OrderId::new("o2"), price: 3.0, consumed: 1 },
        ]
    );
}

#[test]
fn test_shortfall_is_a_fatal_error() {
    let book = ladder(Side::Bid, &[(1.0, 10)]);
    let err = price_target(&book, Side::Bid, 11).unwrap_err();
    assert!(matches!(
        err,
        BookError::InsufficientLiquidity { side: Side::Bid, needed: 11, available: 10 }
    ));
    assert!(err.is_fatal());
}

#[test]
fn test_empty_side() {
    let book = OrderBook::new();
    assert!(price_target(&book, Side::Ask, 1).is_err());
}
