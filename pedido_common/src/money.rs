use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const CURRENCY_CODE: &str = "ARS";

//--------------------------------------       Money       -----------------------------------------------------------
/// A monetary amount in integer cents. All arithmetic and storage happens in cents; the decimal major-unit
/// representation only exists at the HTTP boundary (see [`Money::from_major`] and [`Money::to_major`]).
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a money amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl TryFrom<f64> for Money {
    type Error = MoneyConversionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(MoneyConversionError(format!("{value} is not a finite amount")));
        }
        let cents = (value * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return Err(MoneyConversionError(format!("{value} is too large to represent in cents")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(cents as i64))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:0.2}", self.to_major())
    }
}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Construct from a decimal major-unit amount, e.g. `42.5` → 4250 cents.
    pub fn from_major(value: f64) -> Result<Self, MoneyConversionError> {
        Self::try_from(value)
    }

    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}
