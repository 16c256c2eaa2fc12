//! Property-based tests for book and tradability invariants
//!
//! Uses proptest to drive random add/reduce streams and checks:
//!
//! - Aggregate volume equals the sum of active sizes after every event
//! - Side entries stay sorted by price, tombstones included
//! - Fill plans consume exactly the target size, only the last leg partially
//! - Per direction, priced lines and `NA` alternate and totals never repeat
//! - The analyzer agrees with a brute-force rescan of the book

use book_analyzer::pricer::fill_plan;
use book_analyzer::{
    AnalyzerConfig, BookAnalyzer, Direction, Emission, OrderEvent, Quote, Side,
};
use proptest::prelude::*;
use std::collections::HashMap;

/// Raw generated operation
#[derive(Debug, Clone)]
enum Op {
    Add { slot: u8, side: Side, cents: u32, size: u64 },
    Reduce { slot: u8, size: u64 },
}

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Bid), Just(Side::Ask)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..24, arb_side(), 9_000u32..9_040, 1u64..80)
            .prop_map(|(slot, side, cents, size)| Op::Add { slot, side, cents, size }),
        2 => (0u8..24, 1u64..100).prop_map(|(slot, size)| Op::Reduce { slot, size }),
    ]
}

fn to_events(ops: &[Op]) -> Vec<OrderEvent> {
    ops.iter()
        .enumerate()
        .map(|(ts, op)| match *op {
            Op::Add { slot, side, cents, size } => OrderEvent::add(
                ts as u64,
                format!("o{slot}"),
                side,
                f64::from(cents) / 100.0,
                size,
            ),
            Op::Reduce { slot, size } => OrderEvent::reduce(ts as u64, format!("o{slot}"), size),
        })
        .collect()
}

/// Brute-force model: rescans every active order on every event
#[derive(Default)]
struct Model {
    orders: HashMap<String, (Side, f64, u64, u64)>,
    next_seq: u64,
    tradable: HashMap<Direction, Option<f64>>,
}

impl Model {
    fn apply(&mut self, event: &OrderEvent, target: u64) -> Option<Emission> {
        let side = match event {
            OrderEvent::Add { id, side, price, size, .. } => {
                if self.orders.contains_key(id.as_str()) {
                    return None;
                }
                self.orders
                    .insert(id.as_str().to_owned(), (*side, *price, *size, self.next_seq));
                self.next_seq += 1;
                *side
            }
            OrderEvent::Reduce { id, size, .. } => {
                let entry = self.orders.get_mut(id.as_str())?;
                entry.2 -= (*size).min(entry.2);
                let side = entry.0;
                if entry.2 == 0 {
                    self.orders.remove(id.as_str());
                }
                side
            }
        };

        let direction = Direction::fed_by(side);
        let mut resting: Vec<(f64, u64, u64)> = self
            .orders
            .values()
            .filter(|o| o.0 == side)
            .map(|o| (o.1, o.2, o.3))
            .collect();
        resting.sort_by(|a, b| match side {
            Side::Ask => a.0.total_cmp(&b.0).then(a.2.cmp(&b.2)),
            Side::Bid => b.0.total_cmp(&a.0).then(a.2.cmp(&b.2)),
        });
        let volume: u64 = resting.iter().map(|o| o.1).sum();

        let last = self.tradable.entry(direction).or_insert(None);
        if volume >= target {
            let mut remaining = target;
            let mut total = 0.0;
            for (price, size, _) in resting {
                let take = remaining.min(size);
                total += price * take as f64;
                remaining -= take;
                if remaining == 0 {
                    break;
                }
            }
            let total = (total * 100.0).round() / 100.0;
            if *last == Some(total) {
                return None;
            }
            *last = Some(total);
            Some(Emission::priced(event.timestamp().clone(), direction, total))
        } else if last.take().is_some() {
            Some(Emission::not_available(event.timestamp().clone(), direction))
        } else {
            None
        }
    }
}

fn active_sum(analyzer: &BookAnalyzer, side: Side) -> u64 {
    analyzer
        .book()
        .side(side)
        .entries()
        .iter()
        .filter(|o| o.active)
        .map(|o| o.size)
        .sum()
}

proptest! {
    #[test]
    fn prop_volume_tracks_active_sizes(ops in prop::collection::vec(arb_op(), 1..200), target in 1u64..150) {
        let mut analyzer = BookAnalyzer::new(AnalyzerConfig::new(target as i64).unwrap());
        for event in to_events(&ops) {
            let _ = analyzer.apply(&event);
            for side in [Side::Bid, Side::Ask] {
                prop_assert_eq!(analyzer.book().volume(side), active_sum(&analyzer, side));
                let prices: Vec<f64> = analyzer.book().side(side).entries().iter().map(|o| o.price).collect();
                prop_assert!(prices.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }

    #[test]
    fn prop_fill_plan_is_exact(ops in prop::collection::vec(arb_op(), 1..120), target in 1u64..150) {
        let mut analyzer = BookAnalyzer::new(AnalyzerConfig::new(target as i64).unwrap());
        for event in to_events(&ops) {
            let _ = analyzer.apply(&event);
            for side in [Side::Bid, Side::Ask] {
                let Ok(plan) = fill_plan(analyzer.book(), side, target) else {
                    prop_assert!(analyzer.book().volume(side) < target);
                    continue;
                };
                prop_assert_eq!(plan.iter().map(|f| f.consumed).sum::<u64>(), target);
                for (leg, fill) in plan.iter().enumerate() {
                    let order = analyzer.book().get(&fill.id).unwrap();
                    prop_assert!(fill.consumed <= order.size);
                    if leg + 1 < plan.len() {
                        prop_assert_eq!(fill.consumed, order.size);
                    }
                }
            }
        }
    }

    #[test]
    fn prop_emissions_alternate(ops in prop::collection::vec(arb_op(), 1..200), target in 1u64..150) {
        let mut analyzer = BookAnalyzer::new(AnalyzerConfig::new(target as i64).unwrap());
        let mut last: HashMap<Direction, Quote> = HashMap::new();
        for event in to_events(&ops) {
            let Ok(Some(emission)) = analyzer.apply(&event) else { continue };
            match (last.get(&emission.direction), emission.quote) {
                (None | Some(Quote::NotAvailable), Quote::NotAvailable) => {
                    prop_assert!(false, "NA without a preceding price: {}", emission);
                }
                (Some(Quote::Total(prev)), Quote::Total(total)) => {
                    prop_assert!(*prev != total, "repeated total: {}", emission);
                }
                _ => {}
            }
            prop_assert_eq!(
                emission.quote == Quote::NotAvailable,
                !analyzer.state(emission.direction).is_tradable()
            );
            last.insert(emission.direction, emission.quote);
        }
    }

    #[test]
    fn prop_matches_brute_force(ops in prop::collection::vec(arb_op(), 1..200), target in 1u64..150) {
        let mut analyzer = BookAnalyzer::new(AnalyzerConfig::new(target as i64).unwrap());
        let mut model = Model::default();
        for event in to_events(&ops) {
            let got = analyzer.apply(&event).unwrap_or(None);
            let want = model.apply(&event, target);
            prop_assert_eq!(got, want, "event {:?}", event);
        }
    }
}
