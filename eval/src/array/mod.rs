//! Nested array model.

use num_complex::Complex64;
use num_traits::Zero;

use core::{fmt, iter};

use crate::{numeric, Error};

mod format;

pub(crate) use self::format::format_number;

/// Element of an [`Array`]: either a simple scalar (a number or a char), or a nested array.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Complex number; real numbers have a zero imaginary part.
    Number(Complex64),
    /// Single char.
    Char(char),
    /// Nested (enclosed) array. Never a simple scalar; see [`Element::from_array()`].
    Array(Array),
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Self::Number(Complex64::new(value, 0.0))
    }
}

impl From<Complex64> for Element {
    fn from(value: Complex64) -> Self {
        Self::Number(value)
    }
}

impl From<char> for Element {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<bool> for Element {
    fn from(value: bool) -> Self {
        Self::from(if value { 1.0 } else { 0.0 })
    }
}

impl Element {
    /// Converts an array into an element. Simple scalars are unwrapped; any other array
    /// is nested.
    pub fn from_array(array: Array) -> Self {
        if array.is_simple_scalar() {
            array.data.into_iter().next().unwrap_or(Self::Number(Complex64::zero()))
        } else {
            Self::Array(array)
        }
    }

    /// Converts this element into an array; simple elements become scalars.
    pub fn into_array(self) -> Array {
        match self {
            Self::Array(array) => array,
            simple => Array::scalar(simple),
        }
    }

    /// Checks whether this element is a simple scalar.
    pub fn is_simple(&self) -> bool {
        !matches!(self, Self::Array(_))
    }

    /// Returns the number contained in this element, if any.
    pub fn as_number(&self) -> Option<Complex64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the fill element corresponding to this element: zero for numbers, a blank
    /// for chars, and an array of fills of the same shape for nested arrays.
    pub fn prototype(&self) -> Self {
        match self {
            Self::Number(_) => Self::Number(Complex64::zero()),
            Self::Char(_) => Self::Char(' '),
            Self::Array(array) => Self::Array(Array {
                shape: array.shape.clone(),
                data: array.data.iter().map(Self::prototype).collect(),
            }),
        }
    }

    /// Depth of this element: 0 for simple scalars.
    pub fn depth(&self) -> usize {
        match self {
            Self::Array(array) => array.depth(),
            _ => 0,
        }
    }

    /// Checks whether two elements match, comparing numbers with the specified tolerance.
    pub fn matches(&self, other: &Self, tolerance: f64) -> bool {
        match (self, other) {
            (Self::Number(x), Self::Number(y)) => numeric::tolerant_eq(*x, *y, tolerance),
            (Self::Char(x), Self::Char(y)) => x == y,
            (Self::Array(x), Self::Array(y)) => x.matches(y, tolerance),
            _ => false,
        }
    }
}

/// Rank-generic array: a shape and the elements in the row-major order.
///
/// The product of the shape dimensions always equals the number of elements; a scalar
/// has an empty shape and exactly one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    shape: Vec<usize>,
    data: Vec<Element>,
}

impl Array {
    /// Creates an array with the specified shape and elements.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the number of elements does not correspond to the shape.
    pub fn new(shape: Vec<usize>, data: Vec<Element>) -> Result<Self, Error> {
        if checked_len(&shape, usize::MAX) == Some(data.len()) {
            Ok(Self { shape, data })
        } else {
            let message = format!(
                "Array of shape {shape:?} cannot hold {} element(s)",
                data.len()
            );
            Err(Error::internal(message))
        }
    }

    pub(crate) fn from_raw(shape: Vec<usize>, data: Vec<Element>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { shape, data }
    }

    /// Creates a scalar.
    pub fn scalar(element: impl Into<Element>) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![element.into()],
        }
    }

    /// Creates a numeric scalar.
    pub fn number(value: impl Into<Complex64>) -> Self {
        Self::scalar(Element::Number(value.into()))
    }

    /// Creates a vector from the specified elements.
    pub fn vector(data: Vec<Element>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Creates an empty numeric vector.
    pub fn empty() -> Self {
        Self::vector(Vec::new())
    }

    /// Creates a numeric vector from real values.
    pub fn from_reals(values: impl IntoIterator<Item = f64>) -> Self {
        Self::vector(values.into_iter().map(Element::from).collect())
    }

    /// Creates a char vector from a string, or a char scalar if the string contains a single char.
    pub fn string(value: &str) -> Self {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::scalar(c),
            _ => Self::vector(value.chars().map(Element::Char).collect()),
        }
    }

    /// Returns the shape of this array.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the elements of this array in the row-major order.
    pub fn data(&self) -> &[Element] {
        &self.data
    }

    /// Converts this array into its shape and elements.
    pub fn into_parts(self) -> (Vec<usize>, Vec<Element>) {
        (self.shape, self.data)
    }

    /// Returns the elements of this array in the row-major order.
    pub fn into_data(self) -> Vec<Element> {
        self.data
    }

    /// Returns the rank (number of dimensions) of this array.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks whether this array has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checks whether this array is a scalar (has rank 0).
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Checks whether this array is a simple scalar: a rank-0 array with a number or a char.
    pub fn is_simple_scalar(&self) -> bool {
        self.is_scalar() && self.data[0].is_simple()
    }

    /// Checks whether all elements of this array are simple.
    pub fn is_simple(&self) -> bool {
        self.data.iter().all(Element::is_simple)
    }

    /// Returns the length of the first axis (1 for scalars).
    pub fn tally(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    /// Returns the depth of this array: 0 for simple scalars, 1 for simple non-scalar arrays,
    /// and one more than the maximum depth of elements for nested arrays.
    pub fn depth(&self) -> usize {
        if self.is_simple_scalar() {
            return 0;
        }
        1 + self.data.iter().map(Element::depth).max().unwrap_or(0)
    }

    /// Returns the fill element for this array, based on its first element.
    pub fn prototype(&self) -> Element {
        self.data
            .first()
            .map_or(Element::Number(Complex64::zero()), Element::prototype)
    }

    /// Returns a copy of this array with a new shape. Elements are cycled if necessary;
    /// an empty array is filled with its prototype.
    ///
    /// # Panics
    ///
    /// Panics if the number of elements in `shape` overflows `usize`.
    pub fn reshape(&self, shape: Vec<usize>) -> Self {
        let len: usize = shape.iter().product();
        let data = if self.data.is_empty() {
            vec![self.prototype(); len]
        } else {
            self.data.iter().cycle().take(len).cloned().collect()
        };
        Self { shape, data }
    }

    /// Returns the ravel of this array as a vector.
    #[must_use]
    pub fn ravel(self) -> Self {
        Self::vector(self.data)
    }

    /// Checks whether this array matches `other`: it has the same shape, and all elements
    /// match with the specified tolerance.
    pub fn matches(&self, other: &Self, tolerance: f64) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(x, y)| x.matches(y, tolerance))
    }

    /// Returns the element at the specified multi-dimensional index.
    pub(crate) fn at(&self, index: &[usize]) -> &Element {
        &self.data[flat_index(&self.shape, index)]
    }

    /// Splits the shape around `axis` into the number of outer cells, the axis extent
    /// and the number of inner elements.
    pub(crate) fn axis_split(&self, axis: usize) -> (usize, usize, usize) {
        let outer = self.shape[..axis].iter().product();
        let inner = self.shape[axis + 1..].iter().product();
        (outer, self.shape[axis], inner)
    }

    /// Returns the major cells of this array (sub-arrays along the first axis).
    pub(crate) fn major_cells(&self) -> Vec<Self> {
        if self.is_scalar() {
            return vec![self.clone()];
        }
        let cell_shape = self.shape[1..].to_vec();
        let cell_len: usize = cell_shape.iter().product();
        (0..self.shape[0])
            .map(|i| Self {
                shape: cell_shape.clone(),
                data: self.data[i * cell_len..(i + 1) * cell_len].to_vec(),
            })
            .collect()
    }
}

impl From<Element> for Array {
    fn from(element: Element) -> Self {
        element.into_array()
    }
}

impl FromIterator<Element> for Array {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self::vector(iter.into_iter().collect())
    }
}

/// Returns the number of elements in an array of the specified shape, or `None` if
/// the product of non-zero dimensions exceeds `max_len`. Zero dimensions are skipped
/// when checking the limit, so that every shape derived from an accepted one
/// by removing axes is accepted as well.
pub(crate) fn checked_len(shape: &[usize], max_len: usize) -> Option<usize> {
    let nonzero_len = shape
        .iter()
        .filter(|&&dim| dim != 0)
        .try_fold(1_usize, |acc, &dim| acc.checked_mul(dim))
        .filter(|&len| len <= max_len)?;
    Some(if shape.contains(&0) { 0 } else { nonzero_len })
}

/// Converts a multi-dimensional index into the row-major flat index.
pub(crate) fn flat_index(shape: &[usize], index: &[usize]) -> usize {
    shape
        .iter()
        .zip(index)
        .fold(0, |acc, (&dim, &i)| acc * dim + i)
}

/// Iterates over all multi-dimensional indices of the specified shape in the row-major order.
pub(crate) fn indices(shape: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    let len: usize = shape.iter().product();
    let mut current = vec![0; shape.len()];
    let mut remaining = len;
    iter::from_fn(move || {
        if remaining == 0 {
            return None;
        }
        remaining -= 1;
        let output = current.clone();
        for (i, &dim) in shape.iter().enumerate().rev() {
            current[i] += 1;
            if current[i] < dim {
                break;
            }
            current[i] = 0;
        }
        Some(output)
    })
}

impl fmt::Display for Element {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(array) => fmt::Display::fmt(array, formatter),
            Self::Char(c) => write!(formatter, "{c}"),
            Self::Number(number) => {
                let precision = formatter.precision().unwrap_or(format::DEFAULT_PRECISION);
                formatter.write_str(&format_number(*number, precision))
            }
        }
    }
}
