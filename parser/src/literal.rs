//! Conversion of literal tokens into values.

use num_complex::Complex64;

use crate::{
    alloc::{format, String},
    glyphs::OVERBAR,
    Error,
};

/// Converts the content of a numeric token into a complex number. The content is expected
/// to follow the tokenizer grammar: a real part with an optional `E` exponent, optionally
/// followed by `J` and an imaginary part.
///
/// # Errors
///
/// Returns a [`SyntaxError`](crate::ErrorKind::Syntax) if the content does not represent
/// a finite number.
pub fn parse_number(content: &str) -> Result<Complex64, Error> {
    let (re, im) = match content.find(['J', 'j']) {
        Some(pos) => (&content[..pos], Some(&content[pos + 1..])),
        None => (content, None),
    };
    let re = parse_real(re)?;
    let im = im.map(parse_real).transpose()?.unwrap_or(0.0);
    Ok(Complex64::new(re, im))
}

fn parse_real(content: &str) -> Result<f64, Error> {
    let normalized: String = content
        .chars()
        .map(|c| match c {
            c if OVERBAR.matches(c) => '-',
            'E' => 'e',
            c => c,
        })
        .collect();
    let value: f64 = normalized
        .parse()
        .map_err(|err| Error::syntax(format!("Invalid number `{content}`: {err}")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::syntax(format!("Number `{content}` is out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn parsing_real_numbers() {
        assert_eq!(parse_number("3").unwrap(), Complex64::new(3.0, 0.0));
        assert_eq!(parse_number("¯3.25").unwrap(), Complex64::new(-3.25, 0.0));
        assert_eq!(parse_number(".5").unwrap(), Complex64::new(0.5, 0.0));
        assert_eq!(parse_number("1.").unwrap(), Complex64::new(1.0, 0.0));
        assert_eq!(parse_number("5E20").unwrap(), Complex64::new(5e20, 0.0));
        assert_eq!(parse_number("¯0.5E¯10").unwrap(), Complex64::new(-0.5e-10, 0.0));
    }

    #[test]
    fn parsing_complex_numbers() {
        assert_eq!(parse_number("3J4").unwrap(), Complex64::new(3.0, 4.0));
        assert_eq!(parse_number("¯1j¯.5").unwrap(), Complex64::new(-1.0, -0.5));
        assert_eq!(parse_number("0J1E2").unwrap(), Complex64::new(0.0, 100.0));
    }

    #[test]
    fn overflowing_number() {
        let err = parse_number("1E400").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.message(), "Number `1E400` is out of range");
    }
}
