//! Functions derived by operators.

use crate::{
    fns::{boolean, integer, size, NativeFn, Operand, Operation},
    Array, CallContext, Element, Error,
};

fn describe(operand: &Operand) -> String {
    match operand {
        Operand::Function(function) => function.name(),
        Operand::Array(array) => format!("({array})"),
    }
}

/// Checks that the array is a single Boolean value, e.g., a result of a fixpoint test.
fn is_true(array: &Array, what: &str) -> Result<bool, Error> {
    if array.len() != 1 || array.rank() > 1 {
        return Err(Error::domain(format!("{what} must be a Boolean scalar")));
    }
    boolean(&array.data()[0], what)
}

/// Folds `items` from the right using `function`: `a f (b f (c f d))`.
fn fold_right(
    function: &Operation,
    mut items: Vec<Array>,
    ctx: &mut CallContext<'_, '_>,
) -> Result<Array, Error> {
    let Some(mut acc) = items.pop() else {
        return function.identity().ok_or_else(|| {
            let message = format!("`{function}` has no identity element");
            Error::domain(message)
        });
    };
    while let Some(item) = items.pop() {
        acc = ctx.call_dyadic(function, item, acc)?;
    }
    Ok(acc)
}

/// Extracts items along an axis: `(outer, inner)` line, item `i`.
fn line(omega: &Array, axis: usize, o: usize, k: usize, end: usize) -> Vec<Array> {
    let (_, len, inner) = omega.axis_split(axis);
    (0..end)
        .map(|i| omega.data()[(o * len + i) * inner + k].clone().into_array())
        .collect()
}

fn operator_axis(omega: &Array, first_axis: bool) -> usize {
    if first_axis {
        0
    } else {
        omega.rank() - 1
    }
}

/// `f⍨`: commute. `f⍨ ⍵` is `⍵ f ⍵`, and `⍺ f⍨ ⍵` is `⍵ f ⍺`. With an array operand,
/// the derived function returns the operand regardless of its arguments.
#[derive(Debug, Clone)]
pub struct Commute(Operand);

impl Commute {
    pub(crate) fn new(operand: Operand) -> Self {
        Self(operand)
    }
}

impl NativeFn for Commute {
    fn name(&self) -> String {
        format!("{}⍨", describe(&self.0))
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        match &self.0 {
            Operand::Function(function) => ctx.call_dyadic(function, omega.clone(), omega),
            Operand::Array(array) => Ok(array.clone()),
        }
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        match &self.0 {
            Operand::Function(function) => ctx.call_dyadic(function, omega, alpha),
            Operand::Array(array) => Ok(array.clone()),
        }
    }
}

/// `f/` / `f⌿`: reduction along the last or the first axis.
///
/// The reduction is a right fold: `f/a b c` is `a f (b f c)`. Reducing an empty axis
/// produces the identity element of `f`.
///
/// # Examples
///
/// ```
/// # use kpl_eval::{Error, Session};
/// # fn main() -> Result<(), Error> {
/// let mut session = Session::new();
/// let diff = session.immediately_execute("-/1 2 3 4")?.unwrap();
/// assert_eq!(session.format(&diff), "¯2");
/// let sum = session.immediately_execute("+/⍳0")?.unwrap();
/// assert_eq!(session.format(&sum), "0");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Reduce {
    function: Operation,
    first_axis: bool,
}

impl Reduce {
    /// Creates a reduction along the last axis.
    pub fn last(function: Operation) -> Self {
        Self {
            function,
            first_axis: false,
        }
    }

    /// Creates a reduction along the first axis.
    pub fn first(function: Operation) -> Self {
        Self {
            function,
            first_axis: true,
        }
    }
}

impl NativeFn for Reduce {
    fn name(&self) -> String {
        let op = if self.first_axis { '⌿' } else { '/' };
        format!("{}{op}", self.function)
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        if omega.is_scalar() {
            return Ok(omega);
        }
        let axis = operator_axis(&omega, self.first_axis);
        let (outer, len, inner) = omega.axis_split(axis);
        log::trace!("Reducing {len} item(s) along axis {axis} with `{}`", self.function);

        let mut output = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            for k in 0..inner {
                let items = line(&omega, axis, o, k, len);
                let reduced = fold_right(&self.function, items, ctx)?;
                output.push(Element::from_array(reduced));
            }
        }
        let mut shape = omega.shape().to_vec();
        shape.remove(axis);
        Ok(Array::from_raw(shape, output))
    }
}

/// `f\` / `f⍀`: scan along the last or the first axis. Each element of the result
/// is the reduction of the corresponding prefix.
#[derive(Debug, Clone)]
pub struct Scan {
    function: Operation,
    first_axis: bool,
}

impl Scan {
    /// Creates a scan along the last axis.
    pub fn last(function: Operation) -> Self {
        Self {
            function,
            first_axis: false,
        }
    }

    /// Creates a scan along the first axis.
    pub fn first(function: Operation) -> Self {
        Self {
            function,
            first_axis: true,
        }
    }
}

impl NativeFn for Scan {
    fn name(&self) -> String {
        let op = if self.first_axis { '⍀' } else { '\\' };
        format!("{}{op}", self.function)
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        if omega.is_scalar() {
            return Ok(omega);
        }
        let axis = operator_axis(&omega, self.first_axis);
        let (outer, len, inner) = omega.axis_split(axis);

        let mut output = omega.data().to_vec();
        for o in 0..outer {
            for k in 0..inner {
                for i in 0..len {
                    let prefix = line(&omega, axis, o, k, i + 1);
                    let reduced = fold_right(&self.function, prefix, ctx)?;
                    output[(o * len + i) * inner + k] = Element::from_array(reduced);
                }
            }
        }
        Ok(Array::from_raw(omega.shape().to_vec(), output))
    }
}

/// `f¨`: applies `f` to each element (or each pair of elements) of the arguments.
#[derive(Debug, Clone)]
pub struct Each(pub(crate) Operation);

impl NativeFn for Each {
    fn name(&self) -> String {
        format!("{}¨", self.0)
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        let (shape, elements) = omega.into_parts();
        let data = elements
            .into_iter()
            .map(|element| {
                let output = ctx.call_monadic(&self.0, element.into_array())?;
                Ok(Element::from_array(output))
            })
            .collect::<Result<_, Error>>()?;
        Ok(Array::from_raw(shape, data))
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let shape = if alpha.is_scalar() {
            omega.shape().to_vec()
        } else if omega.is_scalar() || alpha.shape() == omega.shape() {
            alpha.shape().to_vec()
        } else if alpha.rank() == omega.rank() {
            return Err(Error::length("Mismatched left and right lengths for `¨`"));
        } else {
            return Err(Error::rank("Mismatched left and right ranks for `¨`"));
        };

        let element_at = |array: &Array, i: usize| {
            let i = if array.is_scalar() { 0 } else { i };
            array.data()[i].clone().into_array()
        };
        let len = shape.iter().product();
        let mut data = Vec::with_capacity(len);
        for i in 0..len {
            let output = ctx.call_dyadic(&self.0, element_at(&alpha, i), element_at(&omega, i))?;
            data.push(Element::from_array(output));
        }
        Ok(Array::from_raw(shape, data))
    }
}

/// `f∘g`: composition, or binding of an array operand (`A∘f`, `f∘B`).
#[derive(Debug, Clone)]
pub struct Compose {
    left: Operand,
    right: Operand,
}

impl Compose {
    pub(crate) fn new(left: Operand, right: Operand) -> Result<Self, Error> {
        if matches!((&left, &right), (Operand::Array(_), Operand::Array(_))) {
            return Err(Error::syntax("At least one operand of `∘` must be a function"));
        }
        Ok(Self { left, right })
    }
}

impl NativeFn for Compose {
    fn name(&self) -> String {
        format!("{}∘{}", describe(&self.left), describe(&self.right))
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        match (&self.left, &self.right) {
            (Operand::Function(f), Operand::Function(g)) => {
                let omega = ctx.call_monadic(g, omega)?;
                ctx.call_monadic(f, omega)
            }
            (Operand::Array(alpha), Operand::Function(g)) => {
                ctx.call_dyadic(g, alpha.clone(), omega)
            }
            (Operand::Function(f), Operand::Array(right)) => {
                ctx.call_dyadic(f, omega, right.clone())
            }
            (Operand::Array(_), Operand::Array(_)) => {
                Err(Error::internal("`∘` with two array operands"))
            }
        }
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        match (&self.left, &self.right) {
            (Operand::Function(f), Operand::Function(g)) => {
                let omega = ctx.call_monadic(g, omega)?;
                ctx.call_dyadic(f, alpha, omega)
            }
            _ => {
                let message = format!("`{}` with a bound operand is monadic", self.name());
                Err(Error::domain(message))
            }
        }
    }
}

/// `f⍤g`: atop. `f⍤g ⍵` is `f g ⍵`, and `⍺ f⍤g ⍵` is `f ⍺ g ⍵`.
#[derive(Debug, Clone)]
pub struct Atop(pub(crate) Operation, pub(crate) Operation);

impl NativeFn for Atop {
    fn name(&self) -> String {
        format!("{}⍤{}", self.0, self.1)
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        let omega = ctx.call_monadic(&self.1, omega)?;
        ctx.call_monadic(&self.0, omega)
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let omega = ctx.call_dyadic(&self.1, alpha, omega)?;
        ctx.call_monadic(&self.0, omega)
    }
}

/// `f⍥g`: over. `f⍥g ⍵` is `f g ⍵`, and `⍺ f⍥g ⍵` is `(g ⍺) f (g ⍵)`.
#[derive(Debug, Clone)]
pub struct Over(pub(crate) Operation, pub(crate) Operation);

impl NativeFn for Over {
    fn name(&self) -> String {
        format!("{}⍥{}", self.0, self.1)
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        let omega = ctx.call_monadic(&self.1, omega)?;
        ctx.call_monadic(&self.0, omega)
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let alpha = ctx.call_monadic(&self.1, alpha)?;
        let omega = ctx.call_monadic(&self.1, omega)?;
        ctx.call_dyadic(&self.0, alpha, omega)
    }
}

#[derive(Debug, Clone)]
enum Repetition {
    Count(usize),
    Until(Operation),
}

/// `f⍣n` / `f⍣g`: power. Applies `f` the specified number of times, or until the test
/// function `g` applied to the new and the previous values returns 1.
///
/// In the dyadic form, the left argument is bound to `f`: `⍺ f⍣n ⍵` repeats `⍵ ← ⍺ f ⍵`.
#[derive(Debug, Clone)]
pub struct Power {
    function: Operation,
    repetition: Repetition,
}

impl Power {
    pub(crate) fn new(function: Operation, right: Operand) -> Result<Self, Error> {
        const WHAT: &str = "Repetition count of `⍣`";

        let repetition = match right {
            Operand::Function(test) => Repetition::Until(test),
            Operand::Array(count) => {
                if count.len() != 1 || count.rank() > 1 {
                    return Err(Error::domain(format!("{WHAT} must be a scalar")));
                }
                let count = integer(&count.data()[0], WHAT)?;
                Repetition::Count(size(count, WHAT)?)
            }
        };
        Ok(Self {
            function,
            repetition,
        })
    }

    fn apply(
        &self,
        alpha: Option<&Array>,
        mut omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        match &self.repetition {
            Repetition::Count(count) => {
                log::trace!("Applying `{}` {count} time(s)", self.function);
                for _ in 0..*count {
                    omega = ctx.call(&self.function, alpha.cloned(), omega)?;
                }
                Ok(omega)
            }
            Repetition::Until(test) => {
                let mut iterations = 0_usize;
                loop {
                    let next = ctx.call(&self.function, alpha.cloned(), omega.clone())?;
                    iterations += 1;
                    let is_done = ctx.call_dyadic(test, next.clone(), omega)?;
                    if is_true(&is_done, "Result of the `⍣` test")? {
                        log::trace!("`{}` converged after {iterations} step(s)", self.function);
                        return Ok(next);
                    }
                    omega = next;
                }
            }
        }
    }
}

impl NativeFn for Power {
    fn name(&self) -> String {
        match &self.repetition {
            Repetition::Count(count) => format!("{}⍣{count}", self.function),
            Repetition::Until(test) => format!("{}⍣{test}", self.function),
        }
    }

    fn monadic(&self, omega: Array, ctx: &mut CallContext<'_, '_>) -> Result<Array, Error> {
        self.apply(None, omega, ctx)
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        self.apply(Some(&alpha), omega, ctx)
    }
}

/// `f.g`: inner product. For vectors, `⍺ f.g ⍵` is `f/ ⍺ g ⍵`; for higher-rank arrays,
/// the last axis of `⍺` is paired with the first axis of `⍵`.
///
/// # Examples
///
/// ```
/// # use kpl_eval::{Error, Session};
/// # fn main() -> Result<(), Error> {
/// let mut session = Session::new();
/// let dot = session.immediately_execute("1 2 3 +.× 4 5 6")?.unwrap();
/// assert_eq!(session.format(&dot), "32");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct InnerProduct(pub(crate) Operation, pub(crate) Operation);

impl NativeFn for InnerProduct {
    fn name(&self) -> String {
        format!("{}.{}", self.0, self.1)
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let (alpha, omega) = match (alpha.is_scalar(), omega.is_scalar()) {
            (true, true) => (alpha.reshape(vec![1]), omega.reshape(vec![1])),
            (true, false) => (alpha.reshape(vec![omega.tally()]), omega),
            (false, true) => {
                let len = alpha.shape()[alpha.rank() - 1];
                (alpha, omega.reshape(vec![len]))
            }
            (false, false) => (alpha, omega),
        };

        let len = alpha.shape()[alpha.rank() - 1];
        if len != omega.tally() {
            let message = format!(
                "Inner product of arrays of shapes {:?} and {:?}",
                alpha.shape(),
                omega.shape()
            );
            return Err(Error::length(message));
        }

        let outer_shape = &alpha.shape()[..alpha.rank() - 1];
        let inner_shape = &omega.shape()[1..];
        let mut shape = outer_shape.to_vec();
        shape.extend_from_slice(inner_shape);
        ctx.checked_len(&shape)?;
        let rows: usize = outer_shape.iter().product();
        let columns: usize = inner_shape.iter().product();
        log::trace!("Computing `{}` for {rows}×{len}×{columns} item(s)", self.name());

        let mut output = Vec::with_capacity(rows * columns);
        for i in 0..rows {
            for j in 0..columns {
                let pairs = (0..len)
                    .map(|k| {
                        let x = alpha.data()[i * len + k].clone().into_array();
                        let y = omega.data()[k * columns + j].clone().into_array();
                        ctx.call_dyadic(&self.1, x, y)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let reduced = fold_right(&self.0, pairs, ctx)?;
                output.push(Element::from_array(reduced));
            }
        }
        Ok(Array::from_raw(shape, output))
    }
}

/// `∘.f`: outer product. Applies `f` to each pair of elements from the arguments;
/// the result shape is the catenation of the argument shapes.
#[derive(Debug, Clone)]
pub struct OuterProduct(pub(crate) Operation);

impl NativeFn for OuterProduct {
    fn name(&self) -> String {
        format!("∘.{}", self.0)
    }

    fn dyadic(
        &self,
        alpha: Array,
        omega: Array,
        ctx: &mut CallContext<'_, '_>,
    ) -> Result<Array, Error> {
        let mut shape = alpha.shape().to_vec();
        shape.extend_from_slice(omega.shape());
        let len = ctx.checked_len(&shape)?;

        let mut output = Vec::with_capacity(len);
        for x in alpha.data() {
            for y in omega.data() {
                let (x, y) = (x.clone().into_array(), y.clone().into_array());
                let value = ctx.call_dyadic(&self.0, x, y)?;
                output.push(Element::from_array(value));
            }
        }
        Ok(Array::from_raw(shape, output))
    }
}
