//! Feed record decoding
//!
//! Records are whitespace-separated:
//!
//! ```text
//! 28800538 A b S 44.26 100    timestamp A id side price size
//! 28800744 R b 100            timestamp R id size
//! ```
//!
//! Side `B` is a bid, `S` an ask. Prices are normalised to cents; the
//! timestamp is kept as the raw token.

use crate::errors::DecodeError;
use crate::events::{OrderEvent, OrderId, Side, Timestamp};
use crate::numeric::round_price;

/// Operation code of an add record
pub const ADD_CODE: &str = "A";
/// Operation code of a reduce record
pub const REDUCE_CODE: &str = "R";

/// Decode one feed record
pub fn decode_line(line: &str) -> Result<OrderEvent, DecodeError> {
    let fields: Vec<&str> = line.split_whitespace().collect();

    match fields.as_slice() {
        [timestamp, op, id, side, price, size] => {
            expect_operation(op, ADD_CODE, fields.len())?;
            let side = Side::from_code(side).ok_or_else(|| DecodeError::Side((*side).to_owned()))?;
            Ok(OrderEvent::Add {
                timestamp: Timestamp::new(*timestamp),
                id: OrderId::from(*id),
                side,
                price: parse_price(price)?,
                size: parse_size(size)?,
            })
        }
        [timestamp, op, id, size] => {
            expect_operation(op, REDUCE_CODE, fields.len())?;
            Ok(OrderEvent::Reduce {
                timestamp: Timestamp::new(*timestamp),
                id: OrderId::from(*id),
                size: parse_size(size)?,
            })
        }
        _ => Err(DecodeError::FieldCount {
            count: fields.len(),
            record: line.to_owned(),
        }),
    }
}

fn expect_operation(op: &str, expected: &str, fields: usize) -> Result<(), DecodeError> {
    if op == expected {
        Ok(())
    } else {
        Err(DecodeError::Operation {
            code: op.to_owned(),
            fields,
        })
    }
}

fn parse_price(raw: &str) -> Result<f64, DecodeError> {
    match raw.parse::<f64>() {
        // adding 0.0 folds -0.0 into 0.0
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(round_price(price) + 0.0),
        _ => Err(DecodeError::Price(raw.to_owned())),
    }
}

fn parse_size(raw: &str) -> Result<u64, DecodeError> {
    match raw.parse::<u64>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(DecodeError::Size(raw.to_owned())),
    }
}
