use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// EXIF RATIONAL: two unsigned 32 bit integers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Divide out the fraction.
    ///
    /// A zero denominator fails with [`Error::DivisionByZero`], except for 0/0
    /// which is reported as [`Error::Indeterminate`] so the caller can decide
    /// what an empty value means.
    pub fn to_f64(&self) -> Result<f64> {
        match (self.numerator, self.denominator) {
            (0, 0) => Err(Error::Indeterminate),
            (numerator, 0) => Err(Error::DivisionByZero { numerator }),
            (n, d) => Ok(f64::from(n) / f64::from(d)),
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
