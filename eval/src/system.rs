//! System variables and the interpreter configuration.

use num_complex::Complex64;

use crate::{numeric, Array, Element, Error};

/// Name of the index origin system variable.
pub const INDEX_ORIGIN: &str = "⎕IO";
/// Name of the print precision system variable.
pub const PRINT_PRECISION: &str = "⎕PP";
/// Name of the comparison tolerance system variable.
pub const COMPARISON_TOLERANCE: &str = "⎕CT";

/// Interpreter configuration: initial values of system variables and their ceilings.
///
/// # Examples
///
/// ```
/// # use kpl_eval::{Config, Session};
/// # fn main() -> Result<(), kpl_eval::Error> {
/// let config = Config::default().with_index_origin(0).with_print_precision(5);
/// let mut session = Session::with_config(config)?;
/// let sum = session.immediately_execute("+/⍳5")?.unwrap();
/// assert_eq!(sum.to_string(), "10");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    index_origin: i64,
    print_precision: usize,
    max_print_precision: usize,
    comparison_tolerance: f64,
    max_comparison_tolerance: f64,
    max_array_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_origin: 1,
            print_precision: 10,
            max_print_precision: 17,
            comparison_tolerance: 1e-10,
            max_comparison_tolerance: 1e-6,
            max_array_len: 1 << 24,
        }
    }
}

impl Config {
    /// Sets the initial index origin (`⎕IO`).
    #[must_use]
    pub fn with_index_origin(mut self, index_origin: i64) -> Self {
        self.index_origin = index_origin;
        self
    }

    /// Sets the initial print precision (`⎕PP`).
    #[must_use]
    pub fn with_print_precision(mut self, precision: usize) -> Self {
        self.print_precision = precision;
        self
    }

    /// Sets the maximum print precision.
    #[must_use]
    pub fn with_max_print_precision(mut self, precision: usize) -> Self {
        self.max_print_precision = precision;
        self
    }

    /// Sets the initial comparison tolerance (`⎕CT`).
    #[must_use]
    pub fn with_comparison_tolerance(mut self, tolerance: f64) -> Self {
        self.comparison_tolerance = tolerance;
        self
    }

    /// Sets the maximum comparison tolerance.
    #[must_use]
    pub fn with_max_comparison_tolerance(mut self, tolerance: f64) -> Self {
        self.max_comparison_tolerance = tolerance;
        self
    }

    /// Sets the maximum number of elements in a single array created by a primitive.
    #[must_use]
    pub fn with_max_array_len(mut self, len: usize) -> Self {
        self.max_array_len = len;
        self
    }

    /// Returns the initial index origin.
    pub fn index_origin(&self) -> i64 {
        self.index_origin
    }

    /// Returns the initial print precision.
    pub fn print_precision(&self) -> usize {
        self.print_precision
    }

    /// Returns the maximum print precision.
    pub fn max_print_precision(&self) -> usize {
        self.max_print_precision
    }

    /// Returns the initial comparison tolerance.
    pub fn comparison_tolerance(&self) -> f64 {
        self.comparison_tolerance
    }

    /// Returns the maximum comparison tolerance.
    pub fn max_comparison_tolerance(&self) -> f64 {
        self.max_comparison_tolerance
    }

    /// Returns the maximum number of elements in a single array created by a primitive.
    pub fn max_array_len(&self) -> usize {
        self.max_array_len
    }

    /// Checks that the initial values satisfy the same constraints as assignments
    /// to the corresponding system variables.
    pub fn validate(&self) -> Result<(), Error> {
        let mut values = SystemValues::new(self);
        #[allow(clippy::cast_precision_loss)]
        let (io, pp) = (self.index_origin as f64, self.print_precision as f64);
        values.assign(INDEX_ORIGIN, &Array::number(io), self)?;
        values.assign(PRINT_PRECISION, &Array::number(pp), self)?;
        let ct = Array::number(self.comparison_tolerance);
        values.assign(COMPARISON_TOLERANCE, &ct, self)
    }
}

/// Current values of system variables in a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SystemValues {
    pub index_origin: i64,
    pub print_precision: usize,
    pub comparison_tolerance: f64,
}

impl SystemValues {
    pub fn new(config: &Config) -> Self {
        Self {
            index_origin: config.index_origin,
            print_precision: config.print_precision,
            comparison_tolerance: config.comparison_tolerance,
        }
    }

    pub fn is_known(name: &str) -> bool {
        matches!(name, INDEX_ORIGIN | PRINT_PRECISION | COMPARISON_TOLERANCE)
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn get(&self, name: &str) -> Result<Array, Error> {
        Ok(match name {
            INDEX_ORIGIN => Array::number(self.index_origin as f64),
            PRINT_PRECISION => Array::number(self.print_precision as f64),
            COMPARISON_TOLERANCE => Array::number(self.comparison_tolerance),
            _ => return Err(unknown_name(name)),
        })
    }

    /// Validates and assigns a system variable. On error, the values are not changed.
    pub fn assign(&mut self, name: &str, value: &Array, config: &Config) -> Result<(), Error> {
        match name {
            INDEX_ORIGIN => {
                let io = integer_value(name, value)?;
                if io != 0 && io != 1 {
                    let message = format!("{name} must be 0 or 1, got {io}");
                    return Err(Error::limit(message));
                }
                self.index_origin = io;
            }
            PRINT_PRECISION => {
                let pp = integer_value(name, value)?;
                let max = config.max_print_precision;
                let pp = usize::try_from(pp)
                    .ok()
                    .filter(|pp| (1..=max).contains(pp))
                    .ok_or_else(|| {
                        let message = format!("{name} must be in range 1..{max}, got {pp}");
                        Error::limit(message)
                    })?;
                self.print_precision = pp;
            }
            COMPARISON_TOLERANCE => {
                let number = scalar_value(name, value)?;
                let ct = numeric::as_real(number).ok_or_else(|| {
                    Error::domain(format!("{name} must be a real number"))
                })?;
                if ct < 0.0 {
                    return Err(Error::domain(format!("{name} must be non-negative")));
                }
                if ct > config.max_comparison_tolerance {
                    let max = config.max_comparison_tolerance;
                    return Err(Error::limit(format!("{name} must not exceed {max:e}")));
                }
                self.comparison_tolerance = ct;
            }
            _ => return Err(unknown_name(name)),
        }
        log::debug!("Assigned system variable {name} ← {value}");
        Ok(())
    }
}

fn unknown_name(name: &str) -> Error {
    Error::value(format!("Unknown system variable `{name}`"))
}

fn scalar_value(name: &str, value: &Array) -> Result<Complex64, Error> {
    if value.rank() > 1 {
        return Err(Error::rank(format!("{name} must be a scalar")));
    }
    if value.len() != 1 {
        return Err(Error::length(format!("{name} must be a single number")));
    }
    match &value.data()[0] {
        Element::Number(number) => Ok(*number),
        _ => Err(Error::domain(format!("{name} must be a number"))),
    }
}

fn integer_value(name: &str, value: &Array) -> Result<i64, Error> {
    let number = scalar_value(name, value)?;
    numeric::to_integer(number)
        .ok_or_else(|| Error::domain(format!("{name} must be an integer")))
}
