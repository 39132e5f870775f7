//! Text rendering of arrays.

use num_complex::Complex64;

use core::fmt;

use super::{Array, Element};

/// Print precision used if the formatter does not specify one.
pub(crate) const DEFAULT_PRECISION: usize = 10;
/// Relative magnitude below which a part of a complex number is not displayed.
const NEGLIGIBLE_PART: f64 = 1e-14;

/// Formats a number with the specified number of significant digits.
pub(crate) fn format_number(number: Complex64, precision: usize) -> String {
    let re = format_real(number.re, precision);
    if number.im == 0.0 || number.im.abs() < number.re.abs() * NEGLIGIBLE_PART {
        return re;
    }
    let im = format_real(number.im, precision);
    if im == "0" {
        return re;
    }
    if number.re.abs() < number.im.abs() * NEGLIGIBLE_PART {
        format!("0J{im}")
    } else {
        format!("{re}J{im}")
    }
}

fn format_real(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "¯∞" }.to_owned();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i64 = exponent.parse().unwrap_or_default();
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let max_exponent = i64::try_from(precision).unwrap_or(i64::MAX);

    let body = if exponent >= max_exponent || exponent < -6 {
        let (head, tail) = digits.split_at(1);
        let exponent = if exponent < 0 {
            format!("¯{}", -exponent)
        } else {
            exponent.to_string()
        };
        if tail.is_empty() {
            format!("{head}E{exponent}")
        } else {
            format!("{head}.{tail}E{exponent}")
        }
    } else if let Ok(exponent) = usize::try_from(exponent) {
        let int_len = exponent + 1;
        if digits.len() <= int_len {
            format!("{digits}{}", "0".repeat(int_len - digits.len()))
        } else {
            format!("{}.{}", &digits[..int_len], &digits[int_len..])
        }
    } else {
        let zeros = usize::try_from(-exponent - 1).unwrap_or_default();
        format!("0.{}{digits}", "0".repeat(zeros))
    };

    if value < 0.0 {
        format!("¯{body}")
    } else {
        body
    }
}

fn width(line: &str) -> usize {
    line.chars().count()
}

fn pad_right(line: &str, target: usize) -> String {
    let mut line = line.to_owned();
    line.extend(core::iter::repeat(' ').take(target.saturating_sub(width(&line))));
    line
}

fn pad_left(line: &str, target: usize) -> String {
    let mut padded: String = core::iter::repeat(' ')
        .take(target.saturating_sub(width(line)))
        .collect();
    padded.push_str(line);
    padded
}

/// Splits the shape of an array into the number of rows and columns of its 2D layout.
fn layout(shape: &[usize]) -> (usize, usize) {
    match shape {
        [] => (1, 1),
        [len] => (1, *len),
        [init @ .., last] => (init.iter().product(), *last),
    }
}

/// Returns the number of blank lines preceding the row with the specified index.
fn blank_lines_before(shape: &[usize], row: usize) -> usize {
    if row == 0 || shape.len() < 3 {
        return 0;
    }
    let axes = &shape[..shape.len() - 1];
    (0..axes.len() - 1)
        .filter(|&k| {
            let block: usize = axes[k + 1..].iter().product();
            block > 0 && row % block == 0
        })
        .count()
}

fn render(array: &Array, precision: usize) -> Vec<String> {
    if array.is_simple() {
        render_simple(array, precision)
    } else if array.rank() > 2 {
        let mut lines = Vec::new();
        for (i, cell) in array.major_cells().iter().enumerate() {
            if i > 0 {
                lines.extend(core::iter::repeat(String::new()).take(array.rank() - 2));
            }
            lines.extend(render(cell, precision));
        }
        lines
    } else {
        render_grid(array, precision)
    }
}

fn render_simple(array: &Array, precision: usize) -> Vec<String> {
    let cells: Vec<_> = array
        .data()
        .iter()
        .map(|element| element_text(element, precision))
        .collect();
    if array.rank() <= 1 {
        let mut line = String::new();
        for (i, (element, text)) in array.data().iter().zip(&cells).enumerate() {
            let is_char = matches!(element, Element::Char(_));
            let prev_is_char = i > 0 && matches!(array.data()[i - 1], Element::Char(_));
            if i > 0 && !(is_char && prev_is_char) {
                line.push(' ');
            }
            line.push_str(text);
        }
        return vec![line];
    }

    let (rows, cols) = layout(array.shape());
    if cols == 0 {
        return vec![String::new(); rows];
    }
    let all_chars = array
        .data()
        .iter()
        .all(|element| matches!(element, Element::Char(_)));
    let widths: Vec<usize> = (0..cols)
        .map(|col| {
            (0..rows)
                .map(|row| width(&cells[row * cols + col]))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows);
    for row in 0..rows {
        lines.extend(core::iter::repeat(String::new()).take(blank_lines_before(array.shape(), row)));
        let row_cells = &cells[row * cols..(row + 1) * cols];
        let line = if all_chars {
            row_cells.concat()
        } else {
            let padded: Vec<_> = row_cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| pad_left(cell, width))
                .collect();
            padded.join(" ")
        };
        lines.push(line);
    }
    lines
}

fn element_text(element: &Element, precision: usize) -> String {
    match element {
        Element::Number(number) => format_number(*number, precision),
        Element::Char(c) => c.to_string(),
        Element::Array(array) => render(array, precision).join("\n"),
    }
}

/// Renders a nested array of rank <= 2 as a table with box-drawing borders.
fn render_grid(array: &Array, precision: usize) -> Vec<String> {
    let (rows, cols) = layout(array.shape());
    let cells: Vec<Vec<String>> = array
        .data()
        .iter()
        .map(|element| match element {
            Element::Array(inner) => render(inner, precision),
            simple => vec![element_text(simple, precision)],
        })
        .collect();

    let widths: Vec<usize> = (0..cols)
        .map(|col| {
            (0..rows)
                .flat_map(|row| cells[row * cols + col].iter().map(|line| width(line)))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let border = |left: char, middle: char, right: char| {
        let segments: Vec<String> = widths.iter().map(|&width| "─".repeat(width)).collect();
        format!("{left}{}{right}", segments.join(&middle.to_string()))
    };

    let mut lines = vec![border('┌', '┬', '┐')];
    for row in 0..rows {
        if row > 0 {
            lines.push(border('├', '┼', '┤'));
        }
        let row_cells = &cells[row * cols..(row + 1) * cols];
        let height = row_cells.iter().map(Vec::len).max().unwrap_or(1);
        for line_idx in 0..height {
            let parts: Vec<String> = row_cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| {
                    let line = cell.get(line_idx).map_or("", String::as_str);
                    pad_right(line, width)
                })
                .collect();
            lines.push(format!("│{}│", parts.join("│")));
        }
    }
    lines.push(border('└', '┴', '┘'));
    lines
}

/// Formats the array using the formatter precision as the number of significant digits
/// (10 by default).
impl fmt::Display for Array {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = formatter.precision().unwrap_or(DEFAULT_PRECISION);
        let lines = render(self, precision);
        formatter.write_str(&lines.join("\n"))
    }
}
