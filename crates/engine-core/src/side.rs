//! Side (Buy / Sell) for orders and book queries.
//!
//! `Side` is a closed enum, so every book operation taking a `Side` is
//! total. Untyped side values (chars, bytes, strings coming from a
//! submission layer) are validated here and rejected with
//! [`EngineError::InvalidArgument`].

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Order side: Buy or Sell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order of this side matches against.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl TryFrom<char> for Side {
    type Error = EngineError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'B' | 'b' => Ok(Side::Buy),
            'S' | 's' => Ok(Side::Sell),
            other => Err(EngineError::invalid_side(other)),
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = EngineError;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        Side::try_from(char::from(b))
    }
}

impl FromStr for Side {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("buy") || s.eq_ignore_ascii_case("b") => Ok(Side::Buy),
            s if s.eq_ignore_ascii_case("sell") || s.eq_ignore_ascii_case("s") => Ok(Side::Sell),
            other => Err(EngineError::invalid_side(other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("Buy"),
            Side::Sell => f.write_str("Sell"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_flips() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn parses_valid_values() {
        assert_eq!(Side::try_from('B').unwrap(), Side::Buy);
        assert_eq!(Side::try_from(b's').unwrap(), Side::Sell);
        assert_eq!("sell".parse::<Side>().unwrap(), Side::Sell);
        assert_eq!(" BUY ".parse::<Side>().unwrap(), Side::Buy);
    }

    #[test]
    fn rejects_malformed_side() {
        let err = Side::try_from('X').unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));

        let err = "hold".parse::<Side>().unwrap_err();
        assert!(err.to_string().contains("hold"));
    }
}
