//! Tree-walking interpreter.

use std::{fmt, io::Write, mem, rc::Rc};

use kpl_parser::{
    Block, Expr, FnExpr, Location, Name, Operand as OperandExpr, SpannedExpr, SpannedFnExpr,
    Statement,
};

use crate::{
    array::{self, indices},
    fns::{self, checked_index, DefinedFn, Operand, Operation},
    symbols::{Referent, ScopeId, Scopes},
    system::Config,
    Array, Element, Error, ErrorKind,
};

const ALPHA: &str = "⍺";
const OMEGA: &str = "⍵";
const RECURSION: &str = "∇";

/// Outcome of running a statement list.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Value of a statement that is not an assignment. Terminates a dfn.
    Value(Array),
    /// All statements were executed. Contains the value of the last statement if it was
    /// an assignment.
    Completed(Option<Array>),
}

/// Checks that `array` is a single Boolean value.
fn is_true(array: &Array, what: &str) -> Result<bool, Error> {
    if array.len() != 1 || array.rank() > 1 {
        return Err(Error::domain(format!("{what} must be a Boolean scalar")));
    }
    fns::boolean(&array.data()[0], what)
}

fn write_error(err: &std::io::Error) -> Error {
    Error::new(ErrorKind::Implicit, format!("Cannot write output: {err}"))
}

pub(crate) struct Interpreter<'s> {
    scopes: &'s mut Scopes,
    config: &'s Config,
    output: &'s mut dyn Write,
    scope: ScopeId,
}

impl fmt::Debug for Interpreter<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Interpreter")
            .field("scopes", &self.scopes)
            .field("config", &self.config)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl<'s> Interpreter<'s> {
    pub fn new(scopes: &'s mut Scopes, config: &'s Config, output: &'s mut dyn Write) -> Self {
        Self {
            scopes,
            config,
            output,
            scope: ScopeId::ROOT,
        }
    }

    /// Runs a statement list. In a dfn, the first statement that is not an assignment
    /// terminates the list; otherwise, values of such statements except for the last one
    /// are written to the output.
    pub fn run_block(&mut self, block: &Block, is_dfn: bool) -> Result<Outcome, Error> {
        let mut shy = None;
        let last_idx = block.statements.len().saturating_sub(1);

        for (i, statement) in block.statements.iter().enumerate() {
            let expr = match statement {
                Statement::Expr(expr) => expr,
                Statement::Function(function) => {
                    self.evaluate_fn(function)?;
                    shy = None;
                    continue;
                }
                _ => return Err(Error::internal("Unsupported statement")),
            };

            match &expr.extra {
                Expr::Conditional {
                    condition,
                    then,
                    otherwise,
                } => {
                    let location = condition.with_no_extra();
                    let condition = self.evaluate_expr(condition)?;
                    let holds = is_true(&condition, "Guard condition")
                        .map_err(|err| err.or_location(location))?;
                    return if holds {
                        self.evaluate_expr(then).map(Outcome::Value)
                    } else {
                        self.run_block(otherwise, is_dfn)
                    };
                }
                Expr::Assignment { .. } | Expr::Output(_) => {
                    shy = Some(self.evaluate_expr(expr)?);
                }
                _ => {
                    let value = self.evaluate_expr(expr)?;
                    if is_dfn || i == last_idx {
                        return Ok(Outcome::Value(value));
                    }
                    self.write_output(&value)
                        .map_err(|err| err.or_location(expr.with_no_extra()))?;
                    shy = None;
                }
            }
        }
        Ok(Outcome::Completed(shy))
    }

    fn write_output(&mut self, value: &Array) -> Result<(), Error> {
        let precision = self.scopes.system().print_precision;
        writeln!(self.output, "{value:.precision$}").map_err(|err| write_error(&err))?;
        self.output.flush().map_err(|err| write_error(&err))
    }

    fn evaluate_expr(&mut self, expr: &SpannedExpr) -> Result<Array, Error> {
        let location = expr.with_no_extra();
        self.evaluate_expr_inner(expr, location)
            .map_err(|err| err.or_location(location))
    }

    fn evaluate_expr_inner(
        &mut self,
        expr: &SpannedExpr,
        location: Location,
    ) -> Result<Array, Error> {
        Ok(match &expr.extra {
            Expr::Number(number) => Array::number(*number),
            Expr::String(string) => Array::string(string),
            Expr::Vector(items) => {
                let mut elements = Vec::with_capacity(items.len());
                for item in items.iter().rev() {
                    elements.push(Element::from_array(self.evaluate_expr(item)?));
                }
                elements.reverse();
                Array::vector(elements)
            }
            Expr::Variable(name) | Expr::SystemVariable(name) => {
                self.scopes.get_array(self.scope, name)?
            }
            Expr::Alpha => self.argument(ALPHA)?,
            Expr::Omega => self.argument(OMEGA)?,

            Expr::Monadic { function, omega } => {
                let omega = self.evaluate_expr(omega)?;
                let function = self.evaluate_fn(function)?;
                self.call(&function, None, omega, location)?
            }
            Expr::Dyadic {
                function,
                alpha,
                omega,
            } => {
                let omega = self.evaluate_expr(omega)?;
                let function = self.evaluate_fn(function)?;
                let alpha = self.evaluate_expr(alpha)?;
                self.call(&function, Some(alpha), omega, location)?
            }

            Expr::Assignment { name, value } => {
                let value = self.evaluate_expr(value)?;
                self.assign(name, value.clone())?;
                value
            }
            Expr::Output(value) => {
                let value = self.evaluate_expr(value)?;
                self.write_output(&value)?;
                value
            }
            Expr::Index { array, indices } => {
                let mut evaluated = Vec::with_capacity(indices.len());
                for index in indices.iter().rev() {
                    let index = index.as_ref().map(|index| self.evaluate_expr(index));
                    evaluated.push(index.transpose()?);
                }
                evaluated.reverse();
                let array = self.evaluate_expr(array)?;
                self.index(&array, evaluated)?
            }
            Expr::Conditional { .. } => {
                return Err(Error::internal("Guard outside of a statement list"));
            }
            _ => return Err(Error::internal("Unsupported expression")),
        })
    }

    fn argument(&self, name: &str) -> Result<Array, Error> {
        match self.scopes.lookup_local(self.scope, name) {
            Some(Referent::Variable(array)) => Ok(array.clone()),
            _ => Err(Error::value(format!("`{name}` is not defined here"))),
        }
    }

    fn assign(&mut self, name: &Location<Name>, value: Array) -> Result<(), Error> {
        match &name.extra {
            Name::User(name) => {
                self.scopes.set(self.scope, name.as_str(), Referent::Variable(value));
            }
            Name::System(name) => {
                self.scopes.assign_system(name, &value, self.config)?;
            }
            Name::Alpha => {
                if self.scopes.lookup_local(self.scope, ALPHA).is_none() {
                    self.scopes.set(self.scope, ALPHA, Referent::Variable(value));
                }
            }
            _ => return Err(Error::internal("Unsupported assignment target")),
        }
        Ok(())
    }

    fn checked_len(&self, shape: &[usize]) -> Result<usize, Error> {
        let max_len = self.config.max_array_len();
        array::checked_len(shape, max_len).ok_or_else(|| {
            let message =
                format!("Array of shape {shape:?} exceeds the limit of {max_len} elements");
            Error::limit(message)
        })
    }

    fn index(&self, array: &Array, selectors: Vec<Option<Array>>) -> Result<Array, Error> {
        if selectors.len() != array.rank() {
            let message = format!(
                "Array of rank {} cannot be indexed with {} index(es)",
                array.rank(),
                selectors.len()
            );
            return Err(Error::rank(message));
        }

        let io = self.scopes.system().index_origin;
        let mut shape = vec![];
        let mut positions = Vec::with_capacity(selectors.len());
        for (index, &dim) in selectors.into_iter().zip(array.shape()) {
            let Some(index) = index else {
                shape.push(dim);
                positions.push((0..dim).collect::<Vec<_>>());
                continue;
            };
            let (index_shape, data) = index.into_parts();
            shape.extend(index_shape);
            let axis_positions = data
                .iter()
                .map(|element| checked_index(fns::integer(element, "Index")?, dim, io))
                .collect::<Result<_, _>>()?;
            positions.push(axis_positions);
        }

        self.checked_len(&shape)?;
        let lens: Vec<_> = positions.iter().map(Vec::len).collect();
        let data = indices(&lens)
            .map(|selection| {
                let source: Vec<_> = selection
                    .iter()
                    .zip(&positions)
                    .map(|(&i, axis_positions)| axis_positions[i])
                    .collect();
                array.at(&source).clone()
            })
            .collect();
        Ok(Array::from_raw(shape, data))
    }

    fn evaluate_fn(&mut self, function: &SpannedFnExpr) -> Result<Operation, Error> {
        let location = function.with_no_extra();
        self.evaluate_fn_inner(function)
            .map_err(|err| err.or_location(location))
    }

    fn evaluate_fn_inner(&mut self, function: &SpannedFnExpr) -> Result<Operation, Error> {
        Ok(match &function.extra {
            FnExpr::Primitive(primitive) => fns::primitive(*primitive)?,
            FnExpr::Variable(name) => self.scopes.get_function(self.scope, name)?,
            FnExpr::Recursion => match self.scopes.lookup(self.scope, RECURSION) {
                Some(Referent::Function(function)) => function.clone(),
                _ => return Err(Error::value("`∇` can only be used within a dfn")),
            },
            FnExpr::Dfn(body) => Operation::defined(body.clone(), self.scope),

            FnExpr::MonadicOperator { op, operand } => {
                let operand = self.evaluate_operand(operand)?;
                fns::derive_monadic(*op, operand)?
            }
            FnExpr::DyadicOperator { op, left, right } => {
                let right = self.evaluate_operand(right)?;
                let left = self.evaluate_operand(left)?;
                fns::derive_dyadic(*op, left, right)?
            }

            FnExpr::Assignment { name, function } => {
                let function = self.evaluate_fn(function)?;
                let referent = Referent::Function(function.clone());
                self.scopes.set(self.scope, name.extra.as_str(), referent);
                function
            }
            _ => return Err(Error::internal("Unsupported function expression")),
        })
    }

    fn evaluate_operand(&mut self, operand: &OperandExpr) -> Result<Operand, Error> {
        Ok(match operand {
            OperandExpr::Function(function) => Operand::Function(self.evaluate_fn(function)?),
            OperandExpr::Array(array) => Operand::Array(self.evaluate_expr(array)?),
        })
    }

    /// Calls a function. Errors raised by the function get the location of the call site
    /// unless they are already located.
    fn call(
        &mut self,
        function: &Operation,
        alpha: Option<Array>,
        omega: Array,
        location: Location,
    ) -> Result<Array, Error> {
        let output = match function {
            Operation::Native(native) => {
                let mut ctx = CallContext {
                    interpreter: self,
                    location,
                };
                match alpha {
                    Some(alpha) => native.dyadic(alpha, omega, &mut ctx),
                    None => native.monadic(omega, &mut ctx),
                }
            }
            Operation::Defined(defined) => self.call_dfn(defined, alpha, omega),
        };
        output.map_err(|err| err.or_location(location))
    }

    fn call_dfn(
        &mut self,
        function: &Rc<DefinedFn>,
        alpha: Option<Array>,
        omega: Array,
    ) -> Result<Array, Error> {
        let frame = self.scopes.push(function.scope);
        log::trace!(
            "Calling dfn {} in frame {frame:?}",
            if alpha.is_some() { "dyadically" } else { "monadically" }
        );

        self.scopes.set(frame, OMEGA, Referent::Variable(omega));
        if let Some(alpha) = alpha {
            self.scopes.set(frame, ALPHA, Referent::Variable(alpha));
        }
        let recursion = Operation::Defined(function.clone());
        self.scopes.set(frame, RECURSION, Referent::Function(recursion));

        let previous_scope = mem::replace(&mut self.scope, frame);
        let outcome = self.run_block(&function.body, true);
        self.scope = previous_scope;
        self.scopes.release(frame);

        match outcome? {
            Outcome::Value(value) | Outcome::Completed(Some(value)) => Ok(value),
            Outcome::Completed(None) => Err(Error::value("Dfn did not produce a value")),
        }
    }
}

/// Context of a native function call. Allows to access system variables and to call
/// other functions (e.g., operands of an operator).
#[derive(Debug)]
pub struct CallContext<'r, 's> {
    interpreter: &'r mut Interpreter<'s>,
    location: Location,
}

impl CallContext<'_, '_> {
    /// Returns the current index origin (`⎕IO`).
    pub fn index_origin(&self) -> i64 {
        self.interpreter.scopes.system().index_origin
    }

    /// Returns the current comparison tolerance (`⎕CT`).
    pub fn comparison_tolerance(&self) -> f64 {
        self.interpreter.scopes.system().comparison_tolerance
    }

    /// Returns the number of elements in an array of the specified shape.
    ///
    /// # Errors
    ///
    /// Returns a limit error if the array would be larger than allowed by the interpreter
    /// [`Config`].
    pub fn checked_len(&self, shape: &[usize]) -> Result<usize, Error> {
        self.interpreter.checked_len(shape)
    }

    /// Returns the location of the call site.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Calls a function with a single argument.
    pub fn call_monadic(&mut self, function: &Operation, omega: Array) -> Result<Array, Error> {
        self.call(function, None, omega)
    }

    /// Calls a function with two arguments.
    pub fn call_dyadic(
        &mut self,
        function: &Operation,
        alpha: Array,
        omega: Array,
    ) -> Result<Array, Error> {
        self.call(function, Some(alpha), omega)
    }

    /// Calls a function with an optional left argument.
    pub fn call(
        &mut self,
        function: &Operation,
        alpha: Option<Array>,
        omega: Array,
    ) -> Result<Array, Error> {
        self.interpreter.call(function, alpha, omega, self.location)
    }
}
