//! Structural functions: functions that rearrange arrays rather than compute on elements.

use core::cmp::Ordering;

use crate::{
    array::indices,
    fns::{index_element, integer, integer_vector, size, size_element, NativeFn, Pervasive},
    Array, CallContext, Element, Error,
};

use super::scalar::Not;

#[allow(clippy::cast_possible_wrap)] // array dimensions are far below `i64::MAX`
fn signed(value: usize) -> i64 {
    value as i64
}

#[allow(clippy::cast_possible_truncation)] // `value` is a validated array dimension
fn unsigned(value: i64) -> usize {
    value.unsigned_abs() as usize
}

fn axis(array: &Array, first_axis: bool) -> usize {
    if first_axis {
        0
    } else {
        array.rank() - 1
    }
}

/// Converts an argument into a list of items; the argument must be a scalar or a vector.
fn items(array: Array, what: &str) -> Result<Vec<Element>, Error> {
    if array.rank() > 1 {
        return Err(Error::rank(format!("{what} must be a scalar or a vector")));
    }
    Ok(array.into_data())
}

fn contains(haystack: &[Element], needle: &Element, tolerance: f64) -> bool {
    haystack.iter().any(|item| item.matches(needle, tolerance))
}

/// Takes `counts[i]` elements along each axis `i`, from the end of the axis if the count
/// is negative. Missing elements are filled with `fill`.
pub(crate) fn take(array: &Array, counts: &[i64], fill: &Element) -> Array {
    debug_assert_eq!(counts.len(), array.rank());

    let shape = array.shape();
    let new_shape: Vec<usize> = counts.iter().copied().map(unsigned).collect();
    let data = indices(&new_shape)
        .map(|index| {
            let source: Option<Vec<usize>> = index
                .iter()
                .zip(counts)
                .zip(shape)
                .map(|((&i, &count), &dim)| {
                    let offset = if count >= 0 { 0 } else { signed(dim) + count };
                    let source = signed(i) + offset;
                    (0..signed(dim)).contains(&source).then(|| unsigned(source))
                })
                .collect();
            source.map_or_else(|| fill.clone(), |source| array.at(&source).clone())
        })
        .collect();
    Array::from_raw(new_shape, data)
}

/// Normalizes the left argument of take / drop, extending a scalar `omega` to the rank
/// of the left argument.
fn take_counts(alpha: &Array, omega: Array, what: &str) -> Result<(Vec<i64>, Array), Error> {
    let counts = integer_vector(alpha, what)?;
    let omega = if omega.is_scalar() {
        omega.reshape(vec![1; counts.len()])
    } else {
        omega
    };
    if counts.len() > omega.rank() {
        let message = format!(
            "{what} has {} item(s), but the argument has rank {}",
            counts.len(),
            omega.rank()
        );
        return Err(Error::rank(message));
    }
    Ok((counts, omega))
}

/// `⍴`: shape / reshape.
///
/// Reshaping cycles the elements of the right argument to fill the new shape.
///
/// # Examples
///
/// ```
/// # use kpl_eval::{Error, Session};
/// # fn main() -> Result<(), Error> {
/// let mut session = Session::new();
/// let matrix = session.immediately_execute("2 3⍴⍳4")?.unwrap();
/// assert_eq!(session.format(&matrix), "1 2 3\n4 1 2");
/// let shape = session.immediately_execute("⍴2 3⍴⍳4")?.unwrap();
/// assert_eq!(session.format(&shape), "2 3");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Rho;

impl NativeFn for Rho {
    fn name(&self) -> String {
        "⍴".to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        Ok(omega.shape().iter().copied().map(size_element).collect())
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        const WHAT: &str = "Shape";

        let shape: Vec<_> = integer_vector(&alpha, WHAT)?
            .into_iter()
            .map(|dim| size(dim, WHAT))
            .collect::<Result<_, _>>()?;
        ctx.checked_len(&shape)?;
        Ok(omega.reshape(shape))
    }
}

/// `⍳`: index generator / index of. Both forms honor the index origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Iota;

impl NativeFn for Iota {
    fn name(&self) -> String {
        "⍳".to_owned()
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        if !omega.is_scalar() {
            return Err(Error::rank("Argument of `⍳` must be a scalar"));
        }
        let element = &omega.data()[0];
        if matches!(element, Element::Number(z) if z.im != 0.0) {
            return Err(Error::domain("Argument of `⍳` must be real"));
        }
        let len = size(integer(element, "Argument of `⍳`")?, "Argument of `⍳`")?;
        ctx.checked_len(&[len])?;
        let io = ctx.index_origin();
        Ok((0..len).map(|i| index_element(i, io)).collect())
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let io = ctx.index_origin();
        let tolerance = ctx.comparison_tolerance();
        let haystack = items(alpha, "Left argument of `⍳`")?;
        let (shape, needles) = omega.into_parts();
        let data = needles
            .iter()
            .map(|needle| {
                let position = haystack
                    .iter()
                    .position(|item| item.matches(needle, tolerance))
                    .unwrap_or(haystack.len());
                index_element(position, io)
            })
            .collect();
        Ok(Array::from_raw(shape, data))
    }
}

/// `⌽` / `⊖`: reverse / rotate along the last or the first axis.
#[derive(Debug, Clone, Copy)]
pub struct Reverse {
    first_axis: bool,
}

impl Reverse {
    /// Operation along the first axis (`⊖`).
    pub const FIRST: Self = Self { first_axis: true };
    /// Operation along the last axis (`⌽`).
    pub const LAST: Self = Self { first_axis: false };

    fn rotate(&self, shifts: &Array, omega: Array) -> Result<Array, Error> {
        let amounts = shifts
            .data()
            .iter()
            .map(|element| integer(element, "Rotation amount"))
            .collect::<Result<Vec<_>, _>>()?;
        if omega.is_scalar() || omega.is_empty() {
            return Ok(omega);
        }

        let axis = axis(&omega, self.first_axis);
        let (outer, len, inner) = omega.axis_split(axis);
        let is_broadcast = shifts.rank() <= 1 && amounts.len() == 1;
        if !is_broadcast {
            let mut lines_shape = omega.shape().to_vec();
            lines_shape.remove(axis);
            if shifts.shape() != lines_shape.as_slice() {
                let message = format!(
                    "Rotation amounts of shape {:?} do not match {} line(s) of the argument",
                    shifts.shape(),
                    outer * inner
                );
                return Err(Error::length(message));
            }
        }

        let data = omega.data();
        let mut output = Vec::with_capacity(data.len());
        for o in 0..outer {
            for i in 0..len {
                for k in 0..inner {
                    let shift = if is_broadcast {
                        amounts[0]
                    } else {
                        amounts[o * inner + k]
                    };
                    let source = unsigned((signed(i) + shift).rem_euclid(signed(len)));
                    output.push(data[(o * len + source) * inner + k].clone());
                }
            }
        }
        Ok(Array::from_raw(omega.shape().to_vec(), output))
    }
}

impl NativeFn for Reverse {
    fn name(&self) -> String {
        if self.first_axis { "⊖" } else { "⌽" }.to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        if omega.is_scalar() {
            return Ok(omega);
        }
        let axis = axis(&omega, self.first_axis);
        let (outer, len, inner) = omega.axis_split(axis);
        let data = omega.data();
        let mut output = Vec::with_capacity(data.len());
        for o in 0..outer {
            for i in (0..len).rev() {
                let start = (o * len + i) * inner;
                output.extend_from_slice(&data[start..start + inner]);
            }
        }
        Ok(Array::from_raw(omega.shape().to_vec(), output))
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        _: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        self.rotate(&alpha, omega)
    }
}

/// `,` / `⍪`: ravel / table, and catenation along the last or the first axis.
#[derive(Debug, Clone, Copy)]
pub struct Catenate {
    first_axis: bool,
}

impl Catenate {
    /// Operation along the first axis (`⍪`).
    pub const FIRST: Self = Self { first_axis: true };
    /// Operation along the last axis (`,`).
    pub const LAST: Self = Self { first_axis: false };

    /// Brings `array` to the rank `rank`, inserting a unit axis at `axis` or extending
    /// a scalar to the shape of `other`.
    fn conform(array: Array, rank: usize, axis: usize, other: &Array) -> Result<Array, Error> {
        if array.rank() == rank {
            Ok(array)
        } else if array.is_scalar() {
            let mut shape = other.shape().to_vec();
            shape[axis] = 1;
            Ok(array.reshape(shape))
        } else if array.rank() + 1 == rank {
            let (mut shape, data) = array.into_parts();
            shape.insert(axis, 1);
            Ok(Array::from_raw(shape, data))
        } else {
            Err(Error::rank("Catenated arrays must have ranks differing by at most 1"))
        }
    }

    pub(crate) fn catenate(self, alpha: Array, omega: Array) -> Result<Array, Error> {
        if alpha.is_scalar() && omega.is_scalar() {
            let mut data = alpha.into_data();
            data.extend(omega.into_data());
            return Ok(Array::vector(data));
        }

        let rank = alpha.rank().max(omega.rank());
        let axis = if self.first_axis { 0 } else { rank - 1 };
        let alpha = Self::conform(alpha, rank, axis, &omega)?;
        let omega = Self::conform(omega, rank, axis, &alpha)?;

        let dims_match = alpha
            .shape()
            .iter()
            .zip(omega.shape())
            .enumerate()
            .all(|(i, (x, y))| i == axis || x == y);
        if !dims_match {
            let message = format!(
                "Cannot catenate arrays of shapes {:?} and {:?}",
                alpha.shape(),
                omega.shape()
            );
            return Err(Error::length(message));
        }

        let (outer, alpha_len, inner) = alpha.axis_split(axis);
        let omega_len = omega.shape()[axis];
        let mut shape = alpha.shape().to_vec();
        shape[axis] = alpha_len + omega_len;

        let mut output = Vec::with_capacity(alpha.len() + omega.len());
        let (alpha_chunk, omega_chunk) = (alpha_len * inner, omega_len * inner);
        for o in 0..outer {
            output.extend_from_slice(&alpha.data()[o * alpha_chunk..(o + 1) * alpha_chunk]);
            output.extend_from_slice(&omega.data()[o * omega_chunk..(o + 1) * omega_chunk]);
        }
        Ok(Array::from_raw(shape, output))
    }
}

impl NativeFn for Catenate {
    fn name(&self) -> String {
        if self.first_axis { "⍪" } else { "," }.to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        if !self.first_axis {
            return Ok(omega.ravel());
        }
        let rows = omega.tally();
        let columns = omega.shape().iter().skip(1).product();
        let (_, data) = omega.into_parts();
        Ok(Array::from_raw(vec![rows, columns], data))
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let output = self.catenate(alpha, omega)?;
        ctx.checked_len(output.shape())?;
        Ok(output)
    }
}

/// `↑`: mix / take.
///
/// Mixing pads all items to the same shape; taking pads the argument if the requested
/// length exceeds the axis length. In both cases, padding uses the prototype of the padded
/// array (0 for numbers, a blank for chars).
#[derive(Debug, Clone, Copy, Default)]
pub struct Take;

impl Take {
    /// Mixes items of `omega`. `check_len` validates the result shape before elements
    /// are padded.
    fn mix(
        omega: Array,
        check_len: impl FnOnce(&[usize]) -> Result<usize, Error>,
    ) -> Result<Array, Error> {
        if omega.is_simple() {
            return Ok(omega);
        }

        let (outer_shape, elements) = omega.into_parts();
        let items: Vec<_> = elements.into_iter().map(Element::into_array).collect();
        let rank = items.iter().map(Array::rank).max().unwrap_or(0);
        let padded_shape = |item: &Array| {
            let mut shape = vec![1; rank - item.rank()];
            shape.extend_from_slice(item.shape());
            shape
        };

        let mut max_shape = vec![0; rank];
        for item in &items {
            for (max_dim, dim) in max_shape.iter_mut().zip(padded_shape(item)) {
                *max_dim = (*max_dim).max(dim);
            }
        }
        let mut shape = outer_shape;
        shape.extend_from_slice(&max_shape);
        check_len(&shape)?;
        let counts: Vec<_> = max_shape.iter().copied().map(signed).collect();

        let mut data = vec![];
        for item in items {
            let fill = item.prototype();
            let shape = padded_shape(&item);
            let item = Array::from_raw(shape, item.into_data());
            data.extend(take(&item, &counts, &fill).into_data());
        }
        Ok(Array::from_raw(shape, data))
    }
}

impl NativeFn for Take {
    fn name(&self) -> String {
        "↑".to_owned()
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        Self::mix(omega, |shape| ctx.checked_len(shape))
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let (mut counts, omega) = take_counts(&alpha, omega, "Take amount")?;
        counts.extend(omega.shape()[counts.len()..].iter().copied().map(signed));
        let shape: Vec<_> = counts.iter().copied().map(unsigned).collect();
        ctx.checked_len(&shape)?;
        let fill = omega.prototype();
        Ok(take(&omega, &counts, &fill))
    }
}

/// `↓`: split / drop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Drop;

impl NativeFn for Drop {
    fn name(&self) -> String {
        "↓".to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        if omega.is_scalar() {
            return Ok(omega);
        }
        let (mut shape, data) = omega.into_parts();
        let len = shape.pop().unwrap_or(1);
        let data = if len == 0 {
            let count = shape.iter().product();
            vec![Element::Array(Array::empty()); count]
        } else {
            data.chunks(len)
                .map(|chunk| Element::Array(Array::vector(chunk.to_vec())))
                .collect()
        };
        Ok(Array::from_raw(shape, data))
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        _: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let (counts, omega) = take_counts(&alpha, omega, "Drop amount")?;
        let take_counts: Vec<_> = omega
            .shape()
            .iter()
            .enumerate()
            .map(|(i, &dim)| {
                let count = counts.get(i).copied().unwrap_or(0);
                let remaining = signed(dim.saturating_sub(unsigned(count)));
                if count >= 0 {
                    -remaining
                } else {
                    remaining
                }
            })
            .collect();
        let fill = omega.prototype();
        Ok(take(&omega, &take_counts, &fill))
    }
}

/// `⍉`: transpose (reverses the order of axes). Only the monadic form is supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transpose;

impl NativeFn for Transpose {
    fn name(&self) -> String {
        "⍉".to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        let shape: Vec<_> = omega.shape().iter().rev().copied().collect();
        let data = indices(&shape)
            .map(|index| {
                let source: Vec<_> = index.into_iter().rev().collect();
                omega.at(&source).clone()
            })
            .collect();
        Ok(Array::from_raw(shape, data))
    }

    fn dyadic(&self, _: Array, _: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        Err(Error::not_implemented("Dyadic transpose"))
    }
}

/// `⊢`: identity / right argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct Right;

impl NativeFn for Right {
    fn name(&self) -> String {
        "⊢".to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        Ok(omega)
    }

    fn dyadic(&self, _: Array, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        Ok(omega)
    }
}

/// `⊣`: identity / left argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct Left;

impl NativeFn for Left {
    fn name(&self) -> String {
        "⊣".to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        Ok(omega)
    }

    fn dyadic(&self, alpha: Array, _: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        Ok(alpha)
    }
}

/// `/` / `⌿` with an array on the left: replication along the last or the first axis.
/// A negative count inserts the corresponding number of fill elements.
#[derive(Debug, Clone, Copy)]
pub struct Replicate {
    first_axis: bool,
}

impl Replicate {
    /// Operation along the first axis (`⌿`).
    pub const FIRST: Self = Self { first_axis: true };
    /// Operation along the last axis (`/`).
    pub const LAST: Self = Self { first_axis: false };
}

impl NativeFn for Replicate {
    fn name(&self) -> String {
        if self.first_axis { "⌿" } else { "/" }.to_owned()
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let counts = integer_vector(&alpha, "Replication count")?;
        let omega = if omega.is_scalar() {
            omega.reshape(vec![1])
        } else {
            omega
        };
        let axis = axis(&omega, self.first_axis);
        let (outer, len, inner) = omega.axis_split(axis);

        let counts = if counts.len() == 1 {
            vec![counts[0]; len]
        } else if counts.len() == len || len == 1 {
            counts
        } else {
            let message = format!(
                "Cannot replicate {len} item(s) using {} count(s)",
                counts.len()
            );
            return Err(Error::length(message));
        };
        let mut shape = omega.shape().to_vec();
        shape[axis] = counts
            .iter()
            .try_fold(0_usize, |acc, &count| acc.checked_add(unsigned(count)))
            .unwrap_or(usize::MAX);
        ctx.checked_len(&shape)?;

        let fill = vec![omega.prototype(); inner];
        let data = omega.data();
        let mut output = vec![];
        for o in 0..outer {
            for (j, &count) in counts.iter().enumerate() {
                let source = if len == 1 { 0 } else { j };
                let start = (o * len + source) * inner;
                let slice = if count >= 0 {
                    &data[start..start + inner]
                } else {
                    fill.as_slice()
                };
                for _ in 0..count.unsigned_abs() {
                    output.extend_from_slice(slice);
                }
            }
        }

        Ok(Array::from_raw(shape, output))
    }
}

/// `⍋` / `⍒`: grade up / grade down. Grades major cells of the argument; the sort is stable.
///
/// Numbers are ordered by their real, then imaginary part, and precede chars.
#[derive(Debug, Clone, Copy)]
pub struct Grade {
    descending: bool,
}

impl Grade {
    /// Grade up (`⍋`).
    pub const UP: Self = Self { descending: false };
    /// Grade down (`⍒`).
    pub const DOWN: Self = Self { descending: true };

    fn compare_elements(x: &Element, y: &Element) -> Ordering {
        match (x, y) {
            (Element::Number(x), Element::Number(y)) => {
                x.re.total_cmp(&y.re).then(x.im.total_cmp(&y.im))
            }
            (Element::Char(x), Element::Char(y)) => x.cmp(y),
            (Element::Number(_), _) => Ordering::Less,
            (_, Element::Number(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }

    fn compare_cells(x: &Array, y: &Array) -> Ordering {
        x.data()
            .iter()
            .zip(y.data())
            .map(|(x, y)| Self::compare_elements(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl NativeFn for Grade {
    fn name(&self) -> String {
        if self.descending { "⍒" } else { "⍋" }.to_owned()
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        if omega.is_scalar() {
            return Err(Error::rank("Cannot grade a scalar"));
        }
        if !omega.is_simple() {
            return Err(Error::domain("Cannot grade a nested array"));
        }

        let cells = omega.major_cells();
        let mut order: Vec<usize> = (0..cells.len()).collect();
        order.sort_by(|&i, &j| {
            let ordering = Self::compare_cells(&cells[i], &cells[j]);
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        let io = ctx.index_origin();
        Ok(order.into_iter().map(|i| index_element(i, io)).collect())
    }
}

/// `∪`: unique / union. Both forms work on scalars and vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Union;

impl NativeFn for Union {
    fn name(&self) -> String {
        "∪".to_owned()
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        let tolerance = ctx.comparison_tolerance();
        let mut unique = vec![];
        for item in items(omega, "Argument of `∪`")? {
            if !contains(&unique, &item, tolerance) {
                unique.push(item);
            }
        }
        Ok(Array::vector(unique))
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let tolerance = ctx.comparison_tolerance();
        let mut output = items(alpha, "Left argument of `∪`")?;
        let extra: Vec<_> = items(omega, "Right argument of `∪`")?
            .into_iter()
            .filter(|item| !contains(&output, item, tolerance))
            .collect();
        output.extend(extra);
        Ok(Array::vector(output))
    }
}

/// `∩`: intersection of scalars and vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Intersection;

impl NativeFn for Intersection {
    fn name(&self) -> String {
        "∩".to_owned()
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let tolerance = ctx.comparison_tolerance();
        let omega = items(omega, "Right argument of `∩`")?;
        let output = items(alpha, "Left argument of `∩`")?
            .into_iter()
            .filter(|item| contains(&omega, item, tolerance))
            .collect();
        Ok(Array::vector(output))
    }
}

/// `~`: Boolean negation / without.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tilde;

impl NativeFn for Tilde {
    fn name(&self) -> String {
        "~".to_owned()
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        Pervasive(Not).monadic(omega, ctx)
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let tolerance = ctx.comparison_tolerance();
        let excluded = omega.into_data();
        let output = items(alpha, "Left argument of `~`")?
            .into_iter()
            .filter(|item| !contains(&excluded, item, tolerance))
            .collect();
        Ok(Array::vector(output))
    }
}

/// Converts an index honoring the index origin into a 0-based position.
pub(crate) fn checked_index(index: i64, len: usize, io: i64) -> Result<usize, Error> {
    let position = index - io;
    if (0..signed(len)).contains(&position) {
        Ok(unsigned(position))
    } else {
        let message = format!("Index {index} is out of range for an axis of length {len}");
        Err(Error::domain(message))
    }
}
