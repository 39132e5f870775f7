//! Pervasion: applying scalar functions element-wise, recursing into nested arrays.

use crate::{Array, Element, Error};

/// Applies `leaf` to every simple scalar in `omega`, preserving the nesting structure.
pub(crate) fn monadic<F>(omega: &Array, leaf: &mut F) -> Result<Array, Error>
where
    F: FnMut(&Element) -> Result<Element, Error>,
{
    let data = omega
        .data()
        .iter()
        .map(|element| monadic_element(element, leaf))
        .collect::<Result<_, _>>()?;
    Ok(Array::from_raw(omega.shape().to_vec(), data))
}

fn monadic_element<F>(element: &Element, leaf: &mut F) -> Result<Element, Error>
where
    F: FnMut(&Element) -> Result<Element, Error>,
{
    match element {
        Element::Array(array) => monadic(array, leaf).map(Element::Array),
        simple => leaf(simple),
    }
}

/// Applies `leaf` pairwise to simple scalars in `alpha` and `omega`.
///
/// Arrays of the same shape are combined element-wise; a scalar is paired with every element
/// of the other argument. Nested elements are recursed into.
///
/// # Errors
///
/// Returns a syntax error if neither argument is a scalar and their shapes differ.
pub(crate) fn dyadic<F>(alpha: &Array, omega: &Array, leaf: &mut F) -> Result<Array, Error>
where
    F: FnMut(&Element, &Element) -> Result<Element, Error>,
{
    if alpha.is_simple_scalar() && omega.is_simple_scalar() {
        let value = leaf(&alpha.data()[0], &omega.data()[0])?;
        return Ok(Array::scalar(value));
    }

    let data = if !alpha.is_scalar() && !omega.is_scalar() {
        if alpha.shape() != omega.shape() {
            return Err(Error::syntax("Mismatched left and right shapes"));
        }
        alpha
            .data()
            .iter()
            .zip(omega.data())
            .map(|(x, y)| dyadic_element(x, y, leaf))
            .collect::<Result<_, _>>()?
    } else if alpha.is_scalar() {
        let x = &alpha.data()[0];
        omega
            .data()
            .iter()
            .map(|y| dyadic_element(x, y, leaf))
            .collect::<Result<_, _>>()?
    } else {
        let y = &omega.data()[0];
        alpha
            .data()
            .iter()
            .map(|x| dyadic_element(x, y, leaf))
            .collect::<Result<_, _>>()?
    };

    let shape = if alpha.is_scalar() {
        omega.shape()
    } else {
        alpha.shape()
    };
    Ok(Array::from_raw(shape.to_vec(), data))
}

fn dyadic_element<F>(x: &Element, y: &Element, leaf: &mut F) -> Result<Element, Error>
where
    F: FnMut(&Element, &Element) -> Result<Element, Error>,
{
    let array = match (x, y) {
        (Element::Array(x), Element::Array(y)) => dyadic(x, y, leaf)?,
        (Element::Array(x), simple) => dyadic(x, &Array::scalar(simple.clone()), leaf)?,
        (simple, Element::Array(y)) => dyadic(&Array::scalar(simple.clone()), y, leaf)?,
        (x, y) => return leaf(x, y),
    };
    Ok(Element::from_array(array))
}
