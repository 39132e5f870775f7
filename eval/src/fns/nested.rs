//! Functions working with nested arrays.

use crate::{
    fns::{boolean, integer, size_element, structural::checked_index, NativeFn},
    Array, CallContext, Element, Error,
};

/// `⊂`: enclose / partitioned enclose.
///
/// The partitioned form splits a vector into runs starting at each `1` of the left argument;
/// elements before the first `1` are discarded. A single partition is returned as is,
/// without an enclosing vector.
///
/// # Examples
///
/// ```
/// # use kpl_eval::{Error, Session};
/// # fn main() -> Result<(), Error> {
/// let mut session = Session::new();
/// let parts = session.immediately_execute("≢1 0 1 0 0⊂⍳5")?.unwrap();
/// assert_eq!(session.format(&parts), "2");
/// let single = session.immediately_execute("0 1 0 0 0⊂⍳5")?.unwrap();
/// assert_eq!(session.format(&single), "2 3 4 5");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Enclose;

impl Enclose {
    pub(crate) fn partition(alpha: &Array, omega: Array) -> Result<Array, Error> {
        if alpha.rank() > 1 || omega.rank() > 1 {
            return Err(Error::rank("Partitioned enclose requires vector arguments"));
        }
        let mut control = alpha
            .data()
            .iter()
            .map(|element| boolean(element, "Partition vector"))
            .collect::<Result<Vec<_>, _>>()?;
        let omega = omega.into_data();
        if alpha.is_scalar() {
            control = vec![control[0]; omega.len()];
        }

        if control.len() > omega.len() {
            let excess = control.len() - omega.len();
            if control[..excess].iter().any(|&starts| starts) {
                let message = format!(
                    "Partition vector of length {} is too long for {} item(s)",
                    control.len(),
                    omega.len()
                );
                return Err(Error::length(message));
            }
            control.drain(..excess);
        }

        let mut partitions: Vec<Vec<Element>> = vec![];
        for (i, element) in omega.into_iter().enumerate() {
            if control.get(i).copied().unwrap_or(false) {
                partitions.push(vec![element]);
            } else if let Some(current) = partitions.last_mut() {
                current.push(element);
            }
        }

        Ok(match partitions.len() {
            0 => Array::empty(),
            1 => Array::vector(partitions.pop().unwrap_or_default()),
            _ => partitions
                .into_iter()
                .map(|partition| Element::Array(Array::vector(partition)))
                .collect(),
        })
    }
}

impl NativeFn for Enclose {
    fn name(&self) -> String {
        "⊂".to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        if omega.is_simple_scalar() {
            Ok(omega)
        } else {
            Ok(Array::scalar(Element::Array(omega)))
        }
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        _: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        Self::partition(&alpha, omega)
    }
}

/// `⊃`: first / pick.
#[derive(Debug, Clone, Copy, Default)]
pub struct First;

impl First {
    fn pick_one(array: Array, index: &Element, io: i64) -> Result<Array, Error> {
        const WHAT: &str = "Pick index";

        let index: Vec<i64> = match index {
            Element::Array(index) => index
                .data()
                .iter()
                .map(|element| integer(element, WHAT))
                .collect::<Result<_, _>>()?,
            simple => vec![integer(simple, WHAT)?],
        };
        if index.len() != array.rank() {
            let message = format!(
                "{WHAT} has {} item(s), but the picked array has rank {}",
                index.len(),
                array.rank()
            );
            return Err(Error::rank(message));
        }

        let position = index
            .iter()
            .zip(array.shape())
            .map(|(&i, &dim)| checked_index(i, dim, io))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(array.at(&position).clone().into_array())
    }
}

impl NativeFn for First {
    fn name(&self) -> String {
        "⊃".to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        let first = match omega.data().first() {
            Some(element) => element.clone(),
            None => omega.prototype(),
        };
        Ok(first.into_array())
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        if alpha.rank() > 1 {
            return Err(Error::rank("Left argument of `⊃` must be a scalar or a vector"));
        }
        let io = ctx.index_origin();
        alpha
            .data()
            .iter()
            .try_fold(omega, |array, index| Self::pick_one(array, index, io))
    }
}

/// `≡`: depth / match.
#[derive(Debug, Clone, Copy, Default)]
pub struct Depth;

impl NativeFn for Depth {
    fn name(&self) -> String {
        "≡".to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        Ok(Array::scalar(size_element(omega.depth())))
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let matches = alpha.matches(&omega, ctx.comparison_tolerance());
        Ok(Array::scalar(matches))
    }
}

/// `≢`: tally / not match.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tally;

impl NativeFn for Tally {
    fn name(&self) -> String {
        "≢".to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        Ok(Array::scalar(size_element(omega.tally())))
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let matches = alpha.matches(&omega, ctx.comparison_tolerance());
        Ok(Array::scalar(!matches))
    }
}

/// `∊`: enlist / membership.
#[derive(Debug, Clone, Copy, Default)]
pub struct Enlist;

impl Enlist {
    fn flatten(elements: Vec<Element>, output: &mut Vec<Element>) {
        for element in elements {
            match element {
                Element::Array(array) => Self::flatten(array.into_data(), output),
                simple => output.push(simple),
            }
        }
    }
}

impl NativeFn for Enlist {
    fn name(&self) -> String {
        "∊".to_owned()
    }

    fn monadic(&self, omega: Array, _: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        let mut output = vec![];
        Self::flatten(omega.into_data(), &mut output);
        Ok(Array::vector(output))
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let tolerance = ctx.comparison_tolerance();
        let (shape, needles) = alpha.into_parts();
        let data = needles
            .iter()
            .map(|needle| {
                let is_member = omega.data().iter().any(|x| x.matches(needle, tolerance));
                Element::from(is_member)
            })
            .collect();
        Ok(Array::from_raw(shape, data))
    }
}
