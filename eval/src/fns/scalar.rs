//! Scalar functions. Each function only defines its leaf operation on simple scalars;
//! [`Pervasive`] extends it to arbitrary arrays.

use num_complex::Complex64;
use num_traits::{One, Zero};

use core::f64::consts::PI;

use crate::{fns::NativeFn, numeric, pervade, Array, CallContext, Element, Error};

/// Leaf operation of a scalar function, defined on simple scalars (numbers and chars).
///
/// # Examples
///
/// ```
/// # use kpl_eval::{fns::{Pervasive, ScalarFn}, Element, Error, Session};
/// struct Half;
///
/// impl ScalarFn for Half {
///     fn name(&self) -> String {
///         "half".to_owned()
///     }
///
///     fn monadic(&self, omega: &Element, _tolerance: f64) -> Result<Element, Error> {
///         match omega {
///             Element::Number(x) => Ok(Element::Number(x / 2.0)),
///             _ => Err(Error::domain("Expected a number")),
///         }
///     }
/// }
///
/// # fn main() -> Result<(), Error> {
/// let mut session = Session::new();
/// session.insert_native_fn("half", Pervasive(Half));
/// let output = session.immediately_execute("half 4 6 8")?.unwrap();
/// assert_eq!(session.format(&output), "2 3 4");
/// # Ok(())
/// # }
/// ```
pub trait ScalarFn {
    /// Returns the name of the function used in error messages.
    fn name(&self) -> String;

    /// Applies the function to a single simple scalar.
    fn monadic(&self, omega: &Element, tolerance: f64) -> Result<Element, Error> {
        let _ = (omega, tolerance);
        Err(no_monadic_form(&self.name()))
    }

    /// Applies the function to a pair of simple scalars.
    fn dyadic(&self, alpha: &Element, omega: &Element, tolerance: f64) -> Result<Element, Error> {
        let _ = (alpha, omega, tolerance);
        Err(no_dyadic_form(&self.name()))
    }

    /// Returns the identity element of the dyadic form, used when reducing empty arrays.
    fn identity(&self) -> Option<Element> {
        None
    }
}

pub(crate) fn no_monadic_form(name: &str) -> Error {
    Error::domain(format!("`{name}` cannot be applied monadically"))
}

pub(crate) fn no_dyadic_form(name: &str) -> Error {
    Error::domain(format!("`{name}` cannot be applied dyadically"))
}

/// Rejects numbers that overflowed or are undefined (e.g., `∞-∞`).
fn finite(value: Element, name: impl FnOnce() -> String) -> Result<Element, Error> {
    match &value {
        Element::Number(number) if !(number.re.is_finite() && number.im.is_finite()) => {
            let message = format!("Result of `{}` is not a finite number", name());
            Err(Error::domain(message))
        }
        _ => Ok(value),
    }
}

/// Function obtained by extending a [`ScalarFn`] to arrays via pervasion.
#[derive(Debug, Clone, Copy)]
pub struct Pervasive<F>(pub F);

impl<F: ScalarFn> NativeFn for Pervasive<F> {
    fn name(&self) -> String {
        self.0.name()
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        let tolerance = ctx.comparison_tolerance();
        pervade::monadic(&omega, &mut |x| {
            finite(self.0.monadic(x, tolerance)?, || self.0.name())
        })
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let tolerance = ctx.comparison_tolerance();
        pervade::dyadic(&alpha, &omega, &mut |x, y| {
            finite(self.0.dyadic(x, y, tolerance)?, || self.0.name())
        })
    }

    fn identity(&self) -> Option<Array> {
        self.0.identity().map(Array::scalar)
    }
}

fn number(element: &Element) -> Result<Complex64, Error> {
    match element {
        Element::Number(number) => Ok(*number),
        Element::Char(c) => Err(Error::domain(format!("Expected a number, got char `{c}`"))),
        Element::Array(_) => Err(Error::internal("Nested array passed to a scalar function")),
    }
}

fn real_number(element: &Element) -> Result<f64, Error> {
    numeric::as_real(number(element)?)
        .ok_or_else(|| Error::domain("Expected a real number, got a complex one"))
}

fn boolean(element: &Element) -> Result<bool, Error> {
    numeric::to_boolean(number(element)?)
        .ok_or_else(|| Error::domain("Expected a Boolean value (0 or 1)"))
}

fn real(value: f64) -> Element {
    Element::from(value)
}

/// Drops the imaginary part if it is exactly zero for real arguments.
fn complex_or_real(value: Complex64, is_real: bool) -> Element {
    if is_real {
        real(value.re)
    } else {
        Element::Number(value)
    }
}

macro_rules! scalar_fn {
    ($(#[$meta:meta])* $name:ident = $glyph:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            const GLYPH: &'static str = $glyph;
        }
    };
}

scalar_fn!(
    /// `+`: conjugate / add.
    Plus = "+"
);

impl ScalarFn for Plus {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(Element::Number(number(omega)?.conj()))
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(Element::Number(number(alpha)? + number(omega)?))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(0.0))
    }
}

scalar_fn!(
    /// `-`: negate / subtract.
    Minus = "-"
);

impl ScalarFn for Minus {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(Element::Number(-number(omega)?))
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(Element::Number(number(alpha)? - number(omega)?))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(0.0))
    }
}

scalar_fn!(
    /// `×`: direction / multiply.
    Times = "×"
);

impl ScalarFn for Times {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, _: f64) -> Result<Element, Error> {
        let z = number(omega)?;
        Ok(Element::Number(if z.is_zero() { z } else { z / z.norm() }))
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(Element::Number(number(alpha)? * number(omega)?))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(1.0))
    }
}

scalar_fn!(
    /// `÷`: reciprocal / divide. `0÷0` is 1; dividing anything else by zero is an error.
    Divide = "÷"
);

impl ScalarFn for Divide {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, tolerance: f64) -> Result<Element, Error> {
        self.dyadic(&real(1.0), omega, tolerance)
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        let (x, y) = (number(alpha)?, number(omega)?);
        if y.is_zero() {
            return if x.is_zero() {
                Ok(real(1.0))
            } else {
                Err(Error::domain("Division by zero"))
            };
        }
        Ok(Element::Number(x / y))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(1.0))
    }
}

scalar_fn!(
    /// `*`: exponential / power.
    Star = "*"
);

impl ScalarFn for Star {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, _: f64) -> Result<Element, Error> {
        let z = number(omega)?;
        Ok(complex_or_real(z.exp(), z.im == 0.0))
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        let (base, exponent) = (number(alpha)?, number(omega)?);
        if exponent.is_zero() {
            return Ok(real(1.0));
        }
        if base.is_zero() {
            return if exponent.re > 0.0 {
                Ok(real(0.0))
            } else {
                Err(Error::domain("Zero cannot be raised to a non-positive power"))
            };
        }
        if base.im == 0.0 && exponent.im == 0.0 {
            let is_integral = exponent.re.fract() == 0.0;
            if base.re > 0.0 || is_integral {
                return Ok(real(base.re.powf(exponent.re)));
            }
        }
        Ok(Element::Number(base.powc(exponent)))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(1.0))
    }
}

fn ln(z: Complex64) -> Result<Complex64, Error> {
    if z.is_zero() {
        return Err(Error::domain("Logarithm of zero is undefined"));
    }
    Ok(if z.im == 0.0 && z.re > 0.0 {
        numeric::real(z.re.ln())
    } else {
        z.ln()
    })
}

scalar_fn!(
    /// `⍟`: natural logarithm / logarithm.
    Log = "⍟"
);

impl ScalarFn for Log {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(Element::Number(ln(number(omega)?)?))
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        let (base, value) = (number(alpha)?, number(omega)?);
        if base == Complex64::one() {
            return if value == Complex64::one() {
                Ok(real(1.0))
            } else {
                Err(Error::domain("Logarithm base cannot be 1"))
            };
        }
        Ok(Element::Number(ln(value)? / ln(base)?))
    }
}

scalar_fn!(
    /// `|`: magnitude / residue.
    Stile = "|"
);

impl ScalarFn for Stile {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(real(number(omega)?.norm()))
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, tolerance: f64) -> Result<Element, Error> {
        let residue = numeric::residue(number(alpha)?, number(omega)?, tolerance);
        Ok(Element::Number(residue))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(0.0))
    }
}

scalar_fn!(
    /// `⌊`: floor / minimum.
    Downstile = "⌊"
);

impl ScalarFn for Downstile {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, tolerance: f64) -> Result<Element, Error> {
        Ok(Element::Number(numeric::floor(number(omega)?, tolerance)))
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(real(real_number(alpha)?.min(real_number(omega)?)))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(f64::MAX))
    }
}

scalar_fn!(
    /// `⌈`: ceiling / maximum.
    Upstile = "⌈"
);

impl ScalarFn for Upstile {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, tolerance: f64) -> Result<Element, Error> {
        Ok(Element::Number(numeric::ceil(number(omega)?, tolerance)))
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(real(real_number(alpha)?.max(real_number(omega)?)))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(-f64::MAX))
    }
}

scalar_fn!(
    /// `!`: factorial / binomial.
    Exclamation = "!"
);

impl ScalarFn for Exclamation {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, _: f64) -> Result<Element, Error> {
        numeric::factorial(number(omega)?).map(Element::Number)
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        numeric::binomial(number(alpha)?, number(omega)?).map(Element::Number)
    }

    fn identity(&self) -> Option<Element> {
        Some(real(1.0))
    }
}

scalar_fn!(
    /// `○`: pi times / circular functions.
    Circle = "○"
);

impl Circle {
    fn apply(selector: i64, z: Complex64) -> Result<Complex64, Error> {
        let i = Complex64::i();
        let one = Complex64::one();
        Ok(match selector {
            0 => (one - z * z).sqrt(),
            1 => z.sin(),
            2 => z.cos(),
            3 => z.tan(),
            4 => (one + z * z).sqrt(),
            5 => z.sinh(),
            6 => z.cosh(),
            7 => z.tanh(),
            8 => (-one - z * z).sqrt(),
            9 => numeric::real(z.re),
            10 => numeric::real(z.norm()),
            11 => numeric::real(z.im),
            12 => numeric::real(z.arg()),
            -1 => z.asin(),
            -2 => z.acos(),
            -3 => z.atan(),
            -4 => {
                if z == -one {
                    Complex64::zero()
                } else {
                    (z + one) * ((z - one) / (z + one)).sqrt()
                }
            }
            -5 => z.asinh(),
            -6 => z.acosh(),
            -7 => z.atanh(),
            -8 => -(-one - z * z).sqrt(),
            -9 => z,
            -10 => z.conj(),
            -11 => i * z,
            -12 => (i * z).exp(),
            _ => {
                let message = format!("Circular function selector must be in ¯12..12, got {selector}");
                return Err(Error::domain(message));
            }
        })
    }

    /// Applies a circular function to a real argument, staying in reals where the result
    /// is defined.
    fn apply_real(selector: i64, x: f64) -> Option<f64> {
        let value = match selector {
            0 => (1.0 - x * x).sqrt(),
            1 => x.sin(),
            2 => x.cos(),
            3 => x.tan(),
            4 => (1.0 + x * x).sqrt(),
            5 => x.sinh(),
            6 => x.cosh(),
            7 => x.tanh(),
            9 => x,
            10 => x.abs(),
            11 => 0.0,
            12 => {
                if x < 0.0 {
                    PI
                } else {
                    0.0
                }
            }
            -1 => x.asin(),
            -2 => x.acos(),
            -3 => x.atan(),
            -4 => (x * x - 1.0).sqrt().copysign(x + 1.0),
            -5 => x.asinh(),
            -6 => x.acosh(),
            -7 => x.atanh(),
            -9 | -10 => x,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl ScalarFn for Circle {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(Element::Number(number(omega)? * PI))
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        let selector = numeric::to_integer(number(alpha)?)
            .ok_or_else(|| Error::domain("Circular function selector must be an integer"))?;
        let z = number(omega)?;
        if z.im == 0.0 {
            if let Some(value) = Self::apply_real(selector, z.re) {
                return Ok(real(value));
            }
        }
        Self::apply(selector, z).map(Element::Number)
    }
}

scalar_fn!(
    /// `~` (monadic): Boolean negation.
    Not = "~"
);

impl ScalarFn for Not {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn monadic(&self, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(Element::from(!boolean(omega)?))
    }
}

scalar_fn!(
    /// `=`: equality; applies to both numbers and chars.
    Equal = "="
);

fn elements_equal(x: &Element, y: &Element, tolerance: f64) -> Result<bool, Error> {
    Ok(match (x, y) {
        (Element::Number(x), Element::Number(y)) => numeric::tolerant_eq(*x, *y, tolerance),
        (Element::Char(x), Element::Char(y)) => x == y,
        (Element::Array(_), _) | (_, Element::Array(_)) => {
            return Err(Error::internal("Nested array passed to a scalar function"));
        }
        _ => false,
    })
}

impl ScalarFn for Equal {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, tolerance: f64) -> Result<Element, Error> {
        elements_equal(alpha, omega, tolerance).map(Element::from)
    }

    fn identity(&self) -> Option<Element> {
        Some(real(1.0))
    }
}

scalar_fn!(
    /// `≠`: inequality.
    NotEqual = "≠"
);

impl ScalarFn for NotEqual {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, tolerance: f64) -> Result<Element, Error> {
        elements_equal(alpha, omega, tolerance).map(|eq| Element::from(!eq))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(0.0))
    }
}

/// Compares two real numbers with tolerance.
fn compare(alpha: &Element, omega: &Element, tolerance: f64) -> Result<core::cmp::Ordering, Error> {
    let (x, y) = (real_number(alpha)?, real_number(omega)?);
    Ok(if numeric::tolerant_eq(numeric::real(x), numeric::real(y), tolerance) {
        core::cmp::Ordering::Equal
    } else if x < y {
        core::cmp::Ordering::Less
    } else {
        core::cmp::Ordering::Greater
    })
}

macro_rules! comparison {
    ($(#[$meta:meta])* $name:ident = $glyph:literal, $identity:expr, $($ordering:ident)|+) => {
        scalar_fn!($(#[$meta])* $name = $glyph);

        impl ScalarFn for $name {
            fn name(&self) -> String {
                Self::GLYPH.to_owned()
            }

            fn dyadic(
                &self,
                alpha: &Element,
                omega: &Element,
                tolerance: f64,
            ) -> Result<Element, Error> {
                let ordering = compare(alpha, omega, tolerance)?;
                let holds = matches!(ordering, $(core::cmp::Ordering::$ordering)|+);
                Ok(Element::from(holds))
            }

            fn identity(&self) -> Option<Element> {
                Some(real($identity))
            }
        }
    };
}

comparison!(
    /// `<`: less than.
    Less = "<", 0.0, Less
);
comparison!(
    /// `≤`: less than or equal.
    LessOrEqual = "≤", 1.0, Less | Equal
);
comparison!(
    /// `≥`: greater than or equal.
    GreaterOrEqual = "≥", 1.0, Greater | Equal
);
comparison!(
    /// `>`: greater than.
    Greater = ">", 0.0, Greater
);

scalar_fn!(
    /// `∧`: logical AND, generalized to the least common multiple.
    And = "∧"
);

impl ScalarFn for And {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, tolerance: f64) -> Result<Element, Error> {
        let lcm = numeric::lcm(number(alpha)?, number(omega)?, tolerance);
        Ok(Element::Number(lcm))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(1.0))
    }
}

scalar_fn!(
    /// `∨`: logical OR, generalized to the greatest common divisor.
    Or = "∨"
);

impl ScalarFn for Or {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, tolerance: f64) -> Result<Element, Error> {
        let gcd = numeric::gcd(number(alpha)?, number(omega)?, tolerance);
        Ok(Element::Number(gcd))
    }

    fn identity(&self) -> Option<Element> {
        Some(real(0.0))
    }
}

scalar_fn!(
    /// `⍲`: logical NAND.
    Nand = "⍲"
);

impl ScalarFn for Nand {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(Element::from(!(boolean(alpha)? && boolean(omega)?)))
    }
}

scalar_fn!(
    /// `⍱`: logical NOR.
    Nor = "⍱"
);

impl ScalarFn for Nor {
    fn name(&self) -> String {
        Self::GLYPH.to_owned()
    }

    fn dyadic(&self, alpha: &Element, omega: &Element, _: f64) -> Result<Element, Error> {
        Ok(Element::from(!(boolean(alpha)? || boolean(omega)?)))
    }
}
