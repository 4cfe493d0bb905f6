//! Table kinds and their composite key schemas.
//!
//! Every table kind maps to an ordered list of key fields. The hash of a
//! record's key is the XOR of its per-field hashes in schema order, which is
//! what lets one probe loop serve seven different key shapes. The
//! `Relationships` schema carries the one domain special case: a
//! self-relationship (both risk factors equal) collapses to the two-field
//! hash so it occupies the same slot chain a two-field key would.

use std::fmt;
use std::str::FromStr;

use crate::error::IndexError;
use crate::hash::hash_field;
use crate::record::KeySource;

/// Field names that can participate in a primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyField {
    /// Date ordinal.
    Date,
    /// Instrument symbol.
    Symbol,
    /// Portfolio name.
    Portfolio,
    /// Risk factor name.
    RiskFactor,
    /// First risk factor of a relationship.
    RiskFactor1,
    /// Second risk factor of a relationship.
    RiskFactor2,
    /// Client order id.
    ClOrdId,
    /// Trade id.
    TradeId,
}

impl KeyField {
    /// Column name as the storage layer spells it.
    pub const fn name(self) -> &'static str {
        match self {
            KeyField::Date => "date",
            KeyField::Symbol => "symbol",
            KeyField::Portfolio => "portfolio",
            KeyField::RiskFactor => "riskfactor",
            KeyField::RiskFactor1 => "riskfactor1",
            KeyField::RiskFactor2 => "riskfactor2",
            KeyField::ClOrdId => "clordid",
            KeyField::TradeId => "tradeid",
        }
    }
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Record table kinds, each with its own composite primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// Prices and quotes, keyed by `(date, symbol)`.
    MarketData,
    /// Portfolio snapshots, keyed by `(date, portfolio)`.
    Portfolios,
    /// Risk factor exposure, keyed by `(date, portfolio, riskfactor)`.
    Risk,
    /// Pairwise risk factor relationships, keyed by
    /// `(date, riskfactor1, riskfactor2)` with the self-pair collapse.
    Relationships,
    /// Position snapshots, keyed by `(date, portfolio, symbol)`.
    Positions,
    /// Orders, keyed by `(date, portfolio, symbol, clordid)`.
    Orders,
    /// Trades, keyed by `(date, portfolio, symbol, tradeid)`.
    Trades,
}

impl TableKind {
    /// Every table kind, in declaration order.
    pub const ALL: [TableKind; 7] = [
        TableKind::MarketData,
        TableKind::Portfolios,
        TableKind::Risk,
        TableKind::Relationships,
        TableKind::Positions,
        TableKind::Orders,
        TableKind::Trades,
    ];

    /// The key schema for this kind.
    pub fn key_schema(self) -> &'static KeySchema {
        match self {
            TableKind::MarketData => &MARKET_DATA,
            TableKind::Portfolios => &PORTFOLIOS,
            TableKind::Risk => &RISK,
            TableKind::Relationships => &RELATIONSHIPS,
            TableKind::Positions => &POSITIONS,
            TableKind::Orders => &ORDERS,
            TableKind::Trades => &TRADES,
        }
    }

    /// Kind name as the storage layer spells it.
    pub const fn as_str(self) -> &'static str {
        match self {
            TableKind::MarketData => "MarketData",
            TableKind::Portfolios => "Portfolios",
            TableKind::Risk => "Risk",
            TableKind::Relationships => "Relationships",
            TableKind::Positions => "Positions",
            TableKind::Orders => "Orders",
            TableKind::Trades => "Trades",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MarketData" => Ok(TableKind::MarketData),
            "Portfolios" => Ok(TableKind::Portfolios),
            "Risk" => Ok(TableKind::Risk),
            "Relationships" => Ok(TableKind::Relationships),
            "Positions" => Ok(TableKind::Positions),
            "Orders" => Ok(TableKind::Orders),
            "Trades" => Ok(TableKind::Trades),
            other => Err(IndexError::UnsupportedTableKind(other.to_string())),
        }
    }
}

/// Ordered key field list plus the optional equal-collapse rule.
///
/// Schemas are static; [`TableKind::key_schema`] hands out the one matching
/// a kind, and every engine operation for that kind hashes and compares
/// through it.
#[derive(Debug)]
pub struct KeySchema {
    kind: TableKind,
    fields: &'static [KeyField],
    collapse_equal: Option<(KeyField, KeyField)>,
}

static MARKET_DATA: KeySchema = KeySchema {
    kind: TableKind::MarketData,
    fields: &[KeyField::Date, KeyField::Symbol],
    collapse_equal: None,
};

static PORTFOLIOS: KeySchema = KeySchema {
    kind: TableKind::Portfolios,
    fields: &[KeyField::Date, KeyField::Portfolio],
    collapse_equal: None,
};

static RISK: KeySchema = KeySchema {
    kind: TableKind::Risk,
    fields: &[KeyField::Date, KeyField::Portfolio, KeyField::RiskFactor],
    collapse_equal: None,
};

static RELATIONSHIPS: KeySchema = KeySchema {
    kind: TableKind::Relationships,
    fields: &[KeyField::Date, KeyField::RiskFactor1, KeyField::RiskFactor2],
    collapse_equal: Some((KeyField::RiskFactor1, KeyField::RiskFactor2)),
};

static POSITIONS: KeySchema = KeySchema {
    kind: TableKind::Positions,
    fields: &[KeyField::Date, KeyField::Portfolio, KeyField::Symbol],
    collapse_equal: None,
};

static ORDERS: KeySchema = KeySchema {
    kind: TableKind::Orders,
    fields: &[
        KeyField::Date,
        KeyField::Portfolio,
        KeyField::Symbol,
        KeyField::ClOrdId,
    ],
    collapse_equal: None,
};

static TRADES: KeySchema = KeySchema {
    kind: TableKind::Trades,
    fields: &[
        KeyField::Date,
        KeyField::Portfolio,
        KeyField::Symbol,
        KeyField::TradeId,
    ],
    collapse_equal: None,
};

impl KeySchema {
    /// Table kind this schema belongs to.
    #[inline]
    pub const fn kind(&self) -> TableKind {
        self.kind
    }

    /// Key fields in schema order.
    #[inline]
    pub const fn fields(&self) -> &'static [KeyField] {
        self.fields
    }

    /// The `(kept, dropped_when_equal)` field pair, if the schema has one.
    #[inline]
    pub const fn collapse_equal(&self) -> Option<(KeyField, KeyField)> {
        self.collapse_equal
    }

    /// Composite hash of the key fields of `row`.
    ///
    /// XOR of per-field hashes in schema order. When the collapse pair's
    /// two values are equal, the dropped field contributes nothing: the
    /// collapsed hash has to match a key spelled with the shorter field
    /// list, and XORing the duplicated value in would instead cancel the
    /// kept field's contribution as well.
    pub fn hash_key<S>(&self, row: &S) -> u64
    where
        S: KeySource + ?Sized,
    {
        let mut hash = 0u64;
        for &field in self.fields {
            if let Some((kept, dropped)) = self.collapse_equal {
                if field == dropped && row.key_field(kept) == row.key_field(dropped) {
                    continue;
                }
            }
            hash ^= hash_field(row.key_field(field));
        }
        hash
    }

    /// Whether `a` and `b` agree on every key field.
    ///
    /// Always compares the full field list; the collapse rule affects
    /// hashing only.
    pub fn keys_equal<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: KeySource + ?Sized,
        B: KeySource + ?Sized,
    {
        self.fields
            .iter()
            .all(|&field| a.key_field(field) == b.key_field(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_field;
    use crate::record::FieldValue;

    struct Rel {
        date: i64,
        rf1: &'static str,
        rf2: &'static str,
    }

    impl KeySource for Rel {
        fn key_field(&self, field: KeyField) -> FieldValue<'_> {
            match field {
                KeyField::Date => FieldValue::Date(self.date),
                KeyField::RiskFactor1 => FieldValue::Text(self.rf1.as_bytes()),
                KeyField::RiskFactor2 => FieldValue::Text(self.rf2.as_bytes()),
                other => panic!("relationship rows have no {other} field"),
            }
        }
    }

    #[test]
    fn test_schemas_list_the_documented_fields() {
        use KeyField::*;
        let expect: [(_, &[KeyField]); 7] = [
            (TableKind::MarketData, &[Date, Symbol]),
            (TableKind::Portfolios, &[Date, Portfolio]),
            (TableKind::Risk, &[Date, Portfolio, RiskFactor]),
            (TableKind::Relationships, &[Date, RiskFactor1, RiskFactor2]),
            (TableKind::Positions, &[Date, Portfolio, Symbol]),
            (TableKind::Orders, &[Date, Portfolio, Symbol, ClOrdId]),
            (TableKind::Trades, &[Date, Portfolio, Symbol, TradeId]),
        ];
        for (kind, fields) in expect {
            assert_eq!(kind.key_schema().fields(), fields, "{kind}");
            assert_eq!(kind.key_schema().kind(), kind);
        }
    }

    #[test]
    fn test_only_relationships_collapse() {
        for kind in TableKind::ALL {
            let collapse = kind.key_schema().collapse_equal();
            if kind == TableKind::Relationships {
                assert_eq!(
                    collapse,
                    Some((KeyField::RiskFactor1, KeyField::RiskFactor2))
                );
            } else {
                assert_eq!(collapse, None, "{kind}");
            }
        }
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TableKind::ALL {
            assert_eq!(kind.as_str().parse::<TableKind>(), Ok(kind));
        }
        assert_eq!(
            "Quotes".parse::<TableKind>(),
            Err(IndexError::UnsupportedTableKind("Quotes".to_string()))
        );
    }

    #[test]
    fn test_cross_relationship_hashes_all_three_fields() {
        let row = Rel {
            date: 100,
            rf1: "USDBRL",
            rf2: "SELIC",
        };
        let expect = hash_field(FieldValue::Date(100))
            ^ hash_field(FieldValue::Text(b"USDBRL"))
            ^ hash_field(FieldValue::Text(b"SELIC"));
        let schema = TableKind::Relationships.key_schema();
        assert_eq!(schema.hash_key(&row), expect);
    }

    #[test]
    fn test_self_relationship_hash_drops_the_second_factor() {
        let row = Rel {
            date: 100,
            rf1: "SELIC",
            rf2: "SELIC",
        };
        let expect =
            hash_field(FieldValue::Date(100)) ^ hash_field(FieldValue::Text(b"SELIC"));
        let schema = TableKind::Relationships.key_schema();
        assert_eq!(schema.hash_key(&row), expect);
    }

    #[test]
    fn test_equality_still_compares_the_collapsed_field() {
        let self_pair = Rel {
            date: 100,
            rf1: "SELIC",
            rf2: "SELIC",
        };
        let cross = Rel {
            date: 100,
            rf1: "SELIC",
            rf2: "CDI",
        };
        let schema = TableKind::Relationships.key_schema();
        assert!(schema.keys_equal(&self_pair, &self_pair));
        assert!(!schema.keys_equal(&self_pair, &cross));
    }
}
