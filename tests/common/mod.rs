//! Shared row and key helpers for the integration tests.
//!
//! One row type carrying every key field plays the role of the external
//! storage schema; the engine only ever sees it through `KeySource`, so the
//! unused columns of a given table kind are just dead weight it never reads.

#![allow(dead_code)]

use flatkey::{FieldValue, FixedStr, KeyField, KeySource, TableKind};

/// Identifier width used by test rows.
pub type Ident = FixedStr<16>;

/// Universal test row: every key field plus a payload column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Row {
    pub date: i64,
    pub symbol: Ident,
    pub portfolio: Ident,
    pub riskfactor: Ident,
    pub riskfactor1: Ident,
    pub riskfactor2: Ident,
    pub clordid: Ident,
    pub tradeid: Ident,
    pub price: f64,
}

impl KeySource for Row {
    fn key_field(&self, field: KeyField) -> FieldValue<'_> {
        match field {
            KeyField::Date => FieldValue::Date(self.date),
            KeyField::Symbol => FieldValue::Text(self.symbol.as_bytes()),
            KeyField::Portfolio => FieldValue::Text(self.portfolio.as_bytes()),
            KeyField::RiskFactor => FieldValue::Text(self.riskfactor.as_bytes()),
            KeyField::RiskFactor1 => FieldValue::Text(self.riskfactor1.as_bytes()),
            KeyField::RiskFactor2 => FieldValue::Text(self.riskfactor2.as_bytes()),
            KeyField::ClOrdId => FieldValue::Text(self.clordid.as_bytes()),
            KeyField::TradeId => FieldValue::Text(self.tradeid.as_bytes()),
        }
    }
}

impl Row {
    pub fn market_data(date: i64, symbol: &str, price: f64) -> Self {
        Self {
            date,
            symbol: Ident::from(symbol),
            price,
            ..Self::default()
        }
    }

    pub fn portfolio(date: i64, portfolio: &str, price: f64) -> Self {
        Self {
            date,
            portfolio: Ident::from(portfolio),
            price,
            ..Self::default()
        }
    }

    pub fn risk(date: i64, portfolio: &str, riskfactor: &str, price: f64) -> Self {
        Self {
            date,
            portfolio: Ident::from(portfolio),
            riskfactor: Ident::from(riskfactor),
            price,
            ..Self::default()
        }
    }

    pub fn relationship(date: i64, riskfactor1: &str, riskfactor2: &str, price: f64) -> Self {
        Self {
            date,
            riskfactor1: Ident::from(riskfactor1),
            riskfactor2: Ident::from(riskfactor2),
            price,
            ..Self::default()
        }
    }

    pub fn position(date: i64, portfolio: &str, symbol: &str, price: f64) -> Self {
        Self {
            date,
            portfolio: Ident::from(portfolio),
            symbol: Ident::from(symbol),
            price,
            ..Self::default()
        }
    }

    pub fn order(date: i64, portfolio: &str, symbol: &str, clordid: &str, price: f64) -> Self {
        Self {
            date,
            portfolio: Ident::from(portfolio),
            symbol: Ident::from(symbol),
            clordid: Ident::from(clordid),
            price,
            ..Self::default()
        }
    }

    pub fn trade(date: i64, portfolio: &str, symbol: &str, tradeid: &str, price: f64) -> Self {
        Self {
            date,
            portfolio: Ident::from(portfolio),
            symbol: Ident::from(symbol),
            tradeid: Ident::from(tradeid),
            price,
            ..Self::default()
        }
    }
}

/// The `i`-th sample row for `kind`, with a key distinct from every other
/// index and a payload that encodes `i`.
pub fn sample_row(kind: TableKind, i: usize) -> Row {
    let date = 20_000 + (i / 7) as i64;
    let price = i as f64;
    match kind {
        TableKind::MarketData => Row::market_data(date, &format!("SYM{i:04}"), price),
        TableKind::Portfolios => Row::portfolio(date, &format!("PORT{i:04}"), price),
        TableKind::Risk => Row::risk(date, "book1", &format!("RF{i:04}"), price),
        TableKind::Relationships => {
            Row::relationship(date, &format!("RF{i:04}"), &format!("RF{:04}", i + 1), price)
        }
        TableKind::Positions => {
            Row::position(date, &format!("PORT{:02}", i % 4), &format!("SYM{i:04}"), price)
        }
        TableKind::Orders => Row::order(
            date,
            "book1",
            &format!("SYM{:02}", i % 10),
            &format!("ORD{i:06}"),
            price,
        ),
        TableKind::Trades => Row::trade(
            date,
            "book1",
            &format!("SYM{:02}", i % 10),
            &format!("TRD{i:06}"),
            price,
        ),
    }
}

/// `n` sample rows for `kind`.
pub fn sample_rows(kind: TableKind, n: usize) -> Vec<Row> {
    (0..n).map(|i| sample_row(kind, i)).collect()
}

/// A freshly built engine, record array, and slot array holding the first
/// `n` sample rows for `kind`, sized with spare capacity.
pub fn build_fixture(kind: TableKind, n: usize) -> (flatkey::PkeyEngine, Vec<Row>, Vec<i64>) {
    let engine = flatkey::PkeyEngine::new(kind);
    let records = sample_rows(kind, n);
    let mut slots = vec![flatkey::EMPTY_SLOT; flatkey::table::slot_count_for_capacity(n)];
    engine
        .build(&records, n, &mut slots, 0)
        .expect("sample rows have distinct keys");
    (engine, records, slots)
}
