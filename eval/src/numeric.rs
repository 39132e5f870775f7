//! Numeric helpers: tolerant comparisons and rounding, gamma function, GCD / LCM.

use num_complex::Complex64;
use num_traits::{One, Zero};

use core::f64::consts::PI;

use crate::Error;

/// Absolute tolerance used when checking whether a number is integral.
pub(crate) const INTEGER_TOLERANCE: f64 = 1e-10;
const MAX_EXACT_FACTORIAL: f64 = 170.0;
const MAX_GCD_ITERATIONS: usize = 1_000;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

pub(crate) fn real(value: f64) -> Complex64 {
    Complex64::new(value, 0.0)
}

/// Checks whether `x` and `y` are equal within the relative `tolerance`.
pub(crate) fn tolerant_eq(x: Complex64, y: Complex64, tolerance: f64) -> bool {
    x == y || (x - y).norm() <= tolerance * x.norm().max(y.norm())
}

fn is_near_integer(value: f64) -> bool {
    (value - value.round()).abs() <= INTEGER_TOLERANCE * value.abs().max(1.0)
}

/// Returns the real part of `value` if its imaginary part is negligible.
pub(crate) fn as_real(value: Complex64) -> Option<f64> {
    (value.im.abs() <= INTEGER_TOLERANCE * value.re.abs().max(1.0)).then_some(value.re)
}

/// Converts `value` to an integer if it is (nearly) integral.
pub(crate) fn to_integer(value: Complex64) -> Option<i64> {
    let re = as_real(value)?;
    if !re.is_finite() || !is_near_integer(re) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)] // the value is integral and range-checked
    let integer = re.round() as i64;
    (re.abs() < 9.0e15).then_some(integer)
}

/// Converts `value` to a Boolean if it is 0 or 1.
pub(crate) fn to_boolean(value: Complex64) -> Option<bool> {
    match to_integer(value)? {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

fn floor_real(value: f64, tolerance: f64) -> f64 {
    let rounded = (value + 0.5).floor();
    if rounded - value > tolerance * value.abs().max(1.0) {
        rounded - 1.0
    } else {
        rounded
    }
}

/// Tolerant floor. For complex numbers, the result is the Gaussian integer nearest to `value`
/// among those with both parts not exceeding the corresponding parts of `value`, following
/// McDonnell's definition.
pub(crate) fn floor(value: Complex64, tolerance: f64) -> Complex64 {
    let re = floor_real(value.re, tolerance);
    if value.im == 0.0 {
        return real(re);
    }
    let im = floor_real(value.im, tolerance);
    let (dx, dy) = (value.re - re, value.im - im);
    if dx + dy < 1.0 - tolerance {
        Complex64::new(re, im)
    } else if dx >= dy {
        Complex64::new(re + 1.0, im)
    } else {
        Complex64::new(re, im + 1.0)
    }
}

/// Tolerant ceiling.
pub(crate) fn ceil(value: Complex64, tolerance: f64) -> Complex64 {
    -floor(-value, tolerance)
}

/// Residue `modulus | value`. The result has the sign of `modulus` for real arguments.
pub(crate) fn residue(modulus: Complex64, value: Complex64, tolerance: f64) -> Complex64 {
    if modulus.is_zero() {
        return value;
    }
    let quotient = value / modulus;
    let is_integral = [quotient.re, quotient.im]
        .iter()
        .all(|&part| (part - part.round()).abs() <= tolerance * part.abs().max(1.0));
    if is_integral {
        Complex64::zero()
    } else {
        value - modulus * floor(quotient, tolerance)
    }
}

/// Gamma function computed via the Lanczos approximation.
pub(crate) fn gamma(z: Complex64) -> Complex64 {
    if z.re < 0.5 {
        // Reflection formula.
        return real(PI) / ((z * PI).sin() * gamma(Complex64::one() - z));
    }
    let z = z - 1.0;
    let mut sum = real(LANCZOS_COEFFICIENTS[0]);
    for (i, &coefficient) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        #[allow(clippy::cast_precision_loss)]
        let i = i as f64;
        sum += coefficient / (z + i);
    }
    let t = z + LANCZOS_G + 0.5;
    (2.0 * PI).sqrt() * t.powc(z + 0.5) * (-t).exp() * sum
}

/// Factorial generalized via the gamma function: `!x` is `Γ(x + 1)`.
pub(crate) fn factorial(value: Complex64) -> Result<Complex64, Error> {
    if let Some(n) = to_integer(value) {
        if n < 0 {
            return Err(Error::domain("Factorial of a negative integer is undefined"));
        }
        #[allow(clippy::cast_precision_loss)]
        let n = n as f64;
        if n <= MAX_EXACT_FACTORIAL {
            let mut product = 1.0;
            let mut i = 2.0;
            while i <= n {
                product *= i;
                i += 1.0;
            }
            return Ok(real(product));
        }
    }

    let result = gamma(value + 1.0);
    let result = if value.im == 0.0 { real(result.re) } else { result };
    if result.re.is_finite() && result.im.is_finite() {
        Ok(result)
    } else {
        Err(Error::domain("Factorial result is out of range"))
    }
}

fn exact_binomial(k: i64, n: i64) -> Option<f64> {
    if n >= 0 {
        if k < 0 || k > n {
            return Some(0.0);
        }
        let k = k.min(n - k);
        let mut result = 1.0_f64;
        for i in 1..=k {
            #[allow(clippy::cast_precision_loss)]
            let (num, den) = ((n - k + i) as f64, i as f64);
            result = result * num / den;
        }
        Some(result.round())
    } else if k >= 0 {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        exact_binomial(k, k - n - 1).map(|value| sign * value)
    } else if k <= n {
        let sign = if (n - k) % 2 == 0 { 1.0 } else { -1.0 };
        exact_binomial(n - k, -k - 1).map(|value| sign * value)
    } else {
        Some(0.0)
    }
}

/// Binomial coefficient `k ! n`, generalized via the gamma function.
pub(crate) fn binomial(k: Complex64, n: Complex64) -> Result<Complex64, Error> {
    if let (Some(k), Some(n)) = (to_integer(k), to_integer(n)) {
        if let Some(value) = exact_binomial(k, n) {
            return Ok(real(value));
        }
    }

    let numerator = gamma(n + 1.0);
    let denominator = gamma(k + 1.0) * gamma(n - k + 1.0);
    if !denominator.re.is_finite() || !denominator.im.is_finite() {
        return Ok(Complex64::zero());
    }
    let result = numerator / denominator;
    if result.re.is_finite() && result.im.is_finite() {
        let is_real = k.im == 0.0 && n.im == 0.0;
        Ok(if is_real { real(result.re) } else { result })
    } else {
        Err(Error::domain("Binomial coefficient is undefined"))
    }
}

/// Greatest common divisor; for real arguments, the result is non-negative.
pub(crate) fn gcd(x: Complex64, y: Complex64, tolerance: f64) -> Complex64 {
    let (mut small, mut large) = (x, y);
    let tolerance = tolerance.max(INTEGER_TOLERANCE);
    for _ in 0..MAX_GCD_ITERATIONS {
        if small.norm() <= tolerance * large.norm().max(1.0) {
            break;
        }
        let rem = residue(small, large, tolerance);
        large = small;
        small = rem;
    }
    if large.im == 0.0 {
        real(large.re.abs())
    } else {
        large
    }
}

/// Least common multiple.
pub(crate) fn lcm(x: Complex64, y: Complex64, tolerance: f64) -> Complex64 {
    if x.is_zero() || y.is_zero() {
        return Complex64::zero();
    }
    x * y / gcd(x, y, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CT: f64 = 1e-10;

    fn floors(values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| floor(real(x), CT).re).collect()
    }

    #[test]
    fn tolerant_floor() {
        let values = [-3.1416, 3.1416, 0.999_999_999_99, 5e20, -0.5e-10];
        assert_eq!(floors(&values), [-4.0, 3.0, 1.0, 5e20, 0.0]);
        assert_eq!(floors(&[2.5, -2.5, 7.0]), [2.0, -3.0, 7.0]);
        assert_eq!(ceil(real(2.1), CT), real(3.0));
        assert_eq!(ceil(real(-2.1), CT), real(-2.0));
    }

    #[test]
    fn complex_floor() {
        assert_eq!(floor(Complex64::new(1.2, 3.3), CT), Complex64::new(1.0, 3.0));
        assert_eq!(floor(Complex64::new(1.7, 3.6), CT), Complex64::new(2.0, 3.0));
        assert_eq!(floor(Complex64::new(1.6, 3.7), CT), Complex64::new(1.0, 4.0));
    }

    #[test]
    fn residue_has_sign_of_modulus() {
        assert_eq!(residue(real(3.0), real(7.0), CT), real(1.0));
        assert_eq!(residue(real(3.0), real(-1.0), CT), real(2.0));
        assert_eq!(residue(real(-3.0), real(7.0), CT), real(-2.0));
        assert_eq!(residue(real(0.0), real(7.5), CT), real(7.5));
        assert_eq!(residue(real(0.1), real(0.3), CT), real(0.0));
    }

    #[test]
    fn integer_conversion() {
        assert_eq!(to_integer(real(3.0)), Some(3));
        assert_eq!(to_integer(real(2.000_000_000_01)), Some(2));
        assert_eq!(to_integer(real(2.5)), None);
        assert_eq!(to_integer(Complex64::new(1.0, 1.0)), None);
        assert_eq!(to_boolean(real(1.0)), Some(true));
        assert_eq!(to_boolean(real(2.0)), None);
    }

    #[test]
    fn factorials_and_gamma() {
        assert_eq!(factorial(real(5.0)).unwrap(), real(120.0));
        assert_eq!(factorial(real(0.0)).unwrap(), real(1.0));
        let half = factorial(real(0.5)).unwrap();
        assert!((half.re - 0.886_226_925_452_758).abs() < 1e-12);
        assert!(factorial(real(-1.0)).is_err());
        let g = gamma(Complex64::new(1.0, 1.0));
        assert!((g.re - 0.498_015_668_118_356).abs() < 1e-10);
        assert!((g.im + 0.154_949_828_301_810_7).abs() < 1e-10);
    }

    #[test]
    fn binomials() {
        assert_eq!(binomial(real(2.0), real(5.0)).unwrap(), real(10.0));
        assert_eq!(binomial(real(6.0), real(5.0)).unwrap(), real(0.0));
        assert_eq!(binomial(real(2.0), real(-3.0)).unwrap(), real(6.0));
        let value = binomial(real(0.5), real(1.0)).unwrap();
        assert!((value.re - 4.0 / PI).abs() < 1e-10);
    }

    #[test]
    fn gcd_and_lcm() {
        assert_eq!(gcd(real(12.0), real(18.0), CT), real(6.0));
        assert_eq!(gcd(real(-4.0), real(6.0), CT), real(2.0));
        assert_eq!(gcd(real(0.0), real(5.0), CT), real(5.0));
        assert_eq!(lcm(real(4.0), real(6.0), CT), real(12.0));
        assert_eq!(lcm(real(1.0), real(0.0), CT), real(0.0));
        let value = gcd(real(0.3), real(0.2), CT);
        assert!((value.re - 0.1).abs() < 1e-9);
    }
}
