//! Right-to-left parser.
//!
//! Statements are located left to right; each statement is then parsed starting from its
//! rightmost token. A function takes everything to its right as its right argument;
//! whether it also has a left argument depends on whether the thing to its left produces
//! an array.

use crate::{
    alloc::{format, vec, BTreeMap, Box, Rc, String, ToOwned, Vec},
    ast::{Block, Expr, FnExpr, Name, Operand, SpannedExpr, SpannedFnExpr, Statement},
    glyphs::TokenKind,
    literal::parse_number,
    tokenize, DyadicOp, Error, Location, MonadicOp, Primitive, Token,
};

use self::helpers::{match_brackets, split_ranges, top_level_indices};

mod helpers;
#[cfg(test)]
mod tests;

/// Classification of a name: whether it refers to an array or to a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NameClass {
    /// Name refers to an array.
    Variable,
    /// Name refers to a function.
    Function,
    /// Name refers to a system variable.
    System,
}

/// Source of name classifications consulted during parsing, usually a symbol table
/// of an interpreter session.
///
/// Names not known to the resolver (and not assigned earlier in the parsed code) are treated
/// as variables.
pub trait NameResolver {
    /// Returns the current classification of the specified name.
    fn current_class(&self, name: &str) -> Option<NameClass>;
}

impl NameResolver for () {
    fn current_class(&self, _name: &str) -> Option<NameClass> {
        None
    }
}

impl<T: NameResolver + ?Sized> NameResolver for &T {
    fn current_class(&self, name: &str) -> Option<NameClass> {
        (**self).current_class(name)
    }
}

/// Parses a token sequence into a statement list.
///
/// # Errors
///
/// Returns a [`SyntaxError`](crate::ErrorKind::Syntax) on unbalanced brackets, an assignment
/// without a target name, a function or an operator missing its argument / operand, and other
/// malformed code.
pub fn parse(tokens: &[Token<'_>], resolver: &dyn NameResolver) -> Result<Block, Error> {
    let partners = match_brackets(tokens)?;
    let mut parser = Parser {
        tokens,
        partners,
        resolver,
        scopes: vec![BTreeMap::new()],
        groups: BTreeMap::new(),
    };
    let block = parser.parse_block(0, tokens.len())?;
    log::trace!("Parsed {} statement(s)", block.statements.len());
    Ok(block)
}

/// Tokenizes and parses `code`.
pub fn parse_code(code: &str, resolver: &dyn NameResolver) -> Result<Block, Error> {
    let tokens = tokenize(code)?;
    parse(&tokens, resolver)
}

/// Outcome of parsing a token range.
#[derive(Debug, Clone)]
enum Parsed {
    Array(SpannedExpr),
    Function(SpannedFnExpr),
}

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    partners: Vec<usize>,
    resolver: &'t dyn NameResolver,
    /// Names assigned so far in the parsed code, one map per dfn nesting level.
    scopes: Vec<BTreeMap<String, NameClass>>,
    /// Parsed parenthesized groups keyed by the index of the opening paren. A group
    /// may be inspected several times while classifying its surroundings.
    groups: BTreeMap<usize, Parsed>,
}

impl Parser<'_, '_> {
    fn kind(&self, idx: usize) -> TokenKind {
        self.tokens[idx].extra
    }

    fn location(&self, lo: usize, hi: usize) -> Location {
        let start = self.tokens[lo].to_location();
        start.union(&self.tokens[hi - 1].to_location())
    }

    fn error(&self, idx: usize, message: impl Into<String>) -> Error {
        Error::syntax(message).with_location(self.tokens[idx].to_location())
    }

    fn name(&self, idx: usize) -> String {
        (*self.tokens[idx].fragment()).to_owned()
    }

    fn class_of(&self, name: &str) -> NameClass {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
            .or_else(|| self.resolver.current_class(name))
            .unwrap_or(NameClass::Variable)
    }

    fn register(&mut self, name: String, class: NameClass) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, class);
        }
    }

    fn is_dyadic_operator(&self, idx: usize) -> bool {
        matches!(self.kind(idx), TokenKind::DyadicOperator(_))
    }

    fn parse_block(&mut self, lo: usize, hi: usize) -> Result<Block, Error> {
        let ranges = split_ranges(
            self.tokens,
            &self.partners,
            (lo, hi),
            TokenKind::Separator,
            false,
        );
        let mut statements = Vec::with_capacity(ranges.len());

        for (i, &(start, stop)) in ranges.iter().enumerate() {
            let colon = top_level_indices(self.tokens, &self.partners, start, stop)
                .find(|&idx| self.kind(idx) == TokenKind::Colon);
            let Some(colon) = colon else {
                statements.push(self.parse_statement(start, stop)?);
                continue;
            };

            if colon == start {
                return Err(self.error(colon, "Guard is missing its condition"));
            }
            if colon + 1 == stop {
                return Err(self.error(colon, "Guard is missing its result"));
            }
            let condition = self.parse_array(start, colon, "Guard condition")?;
            let then = self.parse_array(colon + 1, stop, "Guard result")?;
            let otherwise = match ranges.get(i + 1) {
                Some(&(next_start, _)) => self.parse_block(next_start, hi)?,
                None => Block::default(),
            };
            let expr = Expr::Conditional {
                condition: Box::new(condition),
                then: Box::new(then),
                otherwise,
            };
            let location = self.location(start, stop);
            statements.push(Statement::Expr(location.copy_with_extra(expr)));
            break;
        }
        Ok(Block { statements })
    }

    fn parse_statement(&mut self, lo: usize, hi: usize) -> Result<Statement, Error> {
        // `name ← {...}` is registered before the dfn body is parsed, so that the body
        // may refer to the name.
        let is_dfn_definition = hi - lo >= 3
            && self.kind(lo) == TokenKind::Identifier
            && self.kind(lo + 1) == TokenKind::Assign
            && self.kind(lo + 2) == TokenKind::LeftBrace
            && self.partners[lo + 2] == hi - 1;
        if is_dfn_definition {
            let name = self.name(lo);
            self.register(name, NameClass::Function);
        }

        Ok(match self.parse_expr(lo, hi)? {
            Parsed::Array(expr) => Statement::Expr(expr),
            Parsed::Function(function) => Statement::Function(function),
        })
    }

    fn parse_array(&mut self, lo: usize, hi: usize, what: &str) -> Result<SpannedExpr, Error> {
        match self.parse_expr(lo, hi)? {
            Parsed::Array(expr) => Ok(expr),
            Parsed::Function(function) => {
                let message = format!("{what} must be an array, not a function");
                Err(Error::syntax(message).with_location(function.with_no_extra()))
            }
        }
    }

    fn parse_expr(&mut self, lo: usize, hi: usize) -> Result<Parsed, Error> {
        debug_assert!(lo < hi);
        let mut end = hi;
        let items = self.parse_strand(lo, &mut end)?;

        if items.is_empty() {
            let function = self.parse_function(lo, &mut end)?;
            let function = self.parse_fn_assignments(lo, &mut end, function)?;
            if end > lo {
                let message = "Function is missing its right argument";
                return Err(Error::syntax(message).with_location(function.with_no_extra()));
            }
            return Ok(Parsed::Function(function));
        }

        let mut value = make_vector(items);
        while end > lo {
            let idx = end - 1;
            value = match self.kind(idx) {
                TokenKind::Assign => self.parse_assignment(lo, &mut end, value)?,
                TokenKind::Colon => return Err(self.error(idx, "Guard is not allowed here")),
                _ => {
                    let function = self.parse_function(lo, &mut end)?;
                    let alpha = self.parse_strand(lo, &mut end)?;
                    if alpha.is_empty() {
                        let location = function.with_no_extra().union(&value.with_no_extra());
                        location.copy_with_extra(Expr::Monadic {
                            function: Box::new(function),
                            omega: Box::new(value),
                        })
                    } else {
                        let alpha = make_vector(alpha);
                        let location = alpha.with_no_extra().union(&value.with_no_extra());
                        location.copy_with_extra(Expr::Dyadic {
                            function: Box::new(function),
                            alpha: Box::new(alpha),
                            omega: Box::new(value),
                        })
                    }
                }
            };
        }
        Ok(Parsed::Array(value))
    }

    fn parse_assignment(
        &mut self,
        lo: usize,
        end: &mut usize,
        value: SpannedExpr,
    ) -> Result<SpannedExpr, Error> {
        let arrow_idx = *end - 1;
        if arrow_idx == lo {
            return Err(self.error(arrow_idx, "Assignment must be preceded by a name"));
        }
        let target_idx = arrow_idx - 1;
        let target = &self.tokens[target_idx];
        let location = target.to_location().union(&value.with_no_extra());
        let name = match target.extra {
            TokenKind::Identifier => {
                let name = self.name(target_idx);
                self.register(name.clone(), NameClass::Variable);
                Name::User(name)
            }
            TokenKind::SystemName => Name::System(self.name(target_idx)),
            TokenKind::Alpha => Name::Alpha,
            TokenKind::Quad => {
                *end = target_idx;
                return Ok(location.copy_with_extra(Expr::Output(Box::new(value))));
            }
            other => {
                let message = format!("Cannot assign to {other}");
                return Err(self.error(target_idx, message));
            }
        };

        *end = target_idx;
        let name = target.to_location().copy_with_extra(name);
        Ok(location.copy_with_extra(Expr::Assignment {
            name,
            value: Box::new(value),
        }))
    }

    fn parse_fn_assignments(
        &mut self,
        lo: usize,
        end: &mut usize,
        mut function: SpannedFnExpr,
    ) -> Result<SpannedFnExpr, Error> {
        while *end > lo && self.kind(*end - 1) == TokenKind::Assign {
            let arrow_idx = *end - 1;
            if arrow_idx == lo || self.kind(arrow_idx - 1) != TokenKind::Identifier {
                let message = "Function assignment must be preceded by a name";
                return Err(self.error(arrow_idx, message));
            }
            let target_idx = arrow_idx - 1;
            let name = self.name(target_idx);
            self.register(name.clone(), NameClass::Function);

            let target_location = self.tokens[target_idx].to_location();
            let location = target_location.union(&function.with_no_extra());
            function = location.copy_with_extra(FnExpr::Assignment {
                name: target_location.copy_with_extra(name),
                function: Box::new(function),
            });
            *end = target_idx;
        }
        Ok(function)
    }

    /// Parses a (possibly empty) run of adjacent array items ending at `end`.
    /// An item immediately preceded by a dyadic operator is left alone since it is
    /// the right operand of that operator.
    fn parse_strand(&mut self, lo: usize, end: &mut usize) -> Result<Vec<SpannedExpr>, Error> {
        let mut items = Vec::new();
        while *end > lo {
            let saved_end = *end;
            let Some(item) = self.parse_item(lo, end)? else {
                break;
            };
            if *end > lo && self.is_dyadic_operator(*end - 1) {
                *end = saved_end;
                break;
            }
            items.push(item);
        }
        items.reverse();
        Ok(items)
    }

    /// Parses a single array item ending at `end`. Returns `None` if the token at `end - 1`
    /// does not end an array item; in this case, `end` is not modified.
    fn parse_item(&mut self, lo: usize, end: &mut usize) -> Result<Option<SpannedExpr>, Error> {
        let idx = *end - 1;
        let token = &self.tokens[idx];
        let expr = match token.extra {
            TokenKind::Number => {
                let content = token.content().unwrap_or_default();
                let number =
                    parse_number(content).map_err(|err| err.with_location(token.to_location()))?;
                Expr::Number(number)
            }
            TokenKind::String => Expr::String(token.content().unwrap_or_default().to_owned()),
            TokenKind::Identifier => {
                let name = self.name(idx);
                if self.class_of(&name) == NameClass::Function {
                    return Ok(None);
                }
                Expr::Variable(name)
            }
            TokenKind::SystemName => Expr::SystemVariable(self.name(idx)),
            TokenKind::Alpha => Expr::Alpha,
            TokenKind::Omega => Expr::Omega,

            TokenKind::RightParen => {
                let open_idx = self.partners[idx];
                return Ok(match self.parse_group(open_idx, idx)? {
                    Parsed::Array(expr) => {
                        *end = open_idx;
                        Some(expr)
                    }
                    Parsed::Function(_) => None,
                });
            }
            TokenKind::RightBracket => return self.parse_indexing(lo, end).map(Some),
            TokenKind::Quad => {
                let err = Error::not_implemented("Evaluated input `⎕`");
                return Err(err.with_location(token.to_location()));
            }
            _ => return Ok(None),
        };

        *end = idx;
        Ok(Some(token.to_location().copy_with_extra(expr)))
    }

    fn parse_indexing(&mut self, lo: usize, end: &mut usize) -> Result<SpannedExpr, Error> {
        let close_idx = *end - 1;
        let open_idx = self.partners[close_idx];
        let mut array_end = open_idx;
        if array_end == lo {
            return Err(self.error(open_idx, "Indexing requires an array on the left"));
        }
        let Some(array) = self.parse_item(lo, &mut array_end)? else {
            let message = "Indexing requires an array on the left; axis specification \
                           for functions is not supported";
            return Err(self.error(open_idx, message));
        };

        let ranges = split_ranges(
            self.tokens,
            &self.partners,
            (open_idx + 1, close_idx),
            TokenKind::Semicolon,
            true,
        );
        let mut indices = Vec::with_capacity(ranges.len());
        for (start, stop) in ranges {
            indices.push(if start == stop {
                None
            } else {
                Some(self.parse_array(start, stop, "Index")?)
            });
        }

        *end = array_end;
        let location = array.with_no_extra().union(&self.tokens[close_idx].to_location());
        Ok(location.copy_with_extra(Expr::Index {
            array: Box::new(array),
            indices,
        }))
    }

    fn parse_group(&mut self, open_idx: usize, close_idx: usize) -> Result<Parsed, Error> {
        if let Some(parsed) = self.groups.get(&open_idx) {
            return Ok(parsed.clone());
        }
        if open_idx + 1 == close_idx {
            return Err(self.error(open_idx, "Empty parentheses"));
        }
        let parsed = self.parse_expr(open_idx + 1, close_idx)?;
        self.groups.insert(open_idx, parsed.clone());
        Ok(parsed)
    }

    /// Checks whether the tokens ending at `end` form a function.
    fn function_ends_at(&mut self, lo: usize, end: usize) -> Result<bool, Error> {
        if end <= lo {
            return Ok(false);
        }
        let idx = end - 1;
        Ok(match self.kind(idx) {
            TokenKind::Function(_)
            | TokenKind::MonadicOperator(_)
            | TokenKind::Del
            | TokenKind::RightBrace => true,
            TokenKind::Identifier => {
                let name = self.name(idx);
                self.class_of(&name) == NameClass::Function
                    || (idx > lo && self.is_dyadic_operator(idx - 1))
            }
            TokenKind::RightParen => {
                let open_idx = self.partners[idx];
                let is_function = matches!(self.parse_group(open_idx, idx)?, Parsed::Function(_));
                is_function || (open_idx > lo && self.is_dyadic_operator(open_idx - 1))
            }
            TokenKind::Number
            | TokenKind::String
            | TokenKind::SystemName
            | TokenKind::Alpha
            | TokenKind::Omega => idx > lo && self.is_dyadic_operator(idx - 1),
            _ => false,
        })
    }

    fn parse_function(&mut self, lo: usize, end: &mut usize) -> Result<SpannedFnExpr, Error> {
        if *end <= lo {
            let idx = lo.min(self.tokens.len() - 1);
            return Err(self.error(idx, "Expected a function"));
        }
        let idx = *end - 1;

        let mut right = match self.kind(idx) {
            TokenKind::MonadicOperator(op) => {
                return self.parse_monadic_operator(lo, end, op);
            }
            TokenKind::DyadicOperator(op) => {
                let message = format!("Operator `{op}` is missing its right operand");
                return Err(self.error(idx, message));
            }
            _ => {
                let saved_end = *end;
                match self.parse_item(lo, end)? {
                    Some(item) if *end > lo && self.is_dyadic_operator(*end - 1) => {
                        Operand::Array(item)
                    }
                    Some(_) => {
                        *end = saved_end;
                        let message = format!("Expected a function, got {}", self.kind(idx));
                        return Err(self.error(idx, message));
                    }
                    None => Operand::Function(self.parse_function_atom(end)?),
                }
            }
        };

        while *end > lo {
            let op_idx = *end - 1;
            let TokenKind::DyadicOperator(op) = self.kind(op_idx) else {
                break;
            };

            let is_outer_product = op == DyadicOp::InnerProduct
                && op_idx > lo
                && self.kind(op_idx - 1) == TokenKind::DyadicOperator(DyadicOp::Jot);
            let derived = if is_outer_product {
                let jot_location = self.tokens[op_idx - 1].to_location();
                *end = op_idx - 1;
                let location = jot_location.union(&right.location());
                location.copy_with_extra(FnExpr::MonadicOperator {
                    op: MonadicOp::OuterProduct,
                    operand: Box::new(right),
                })
            } else {
                *end = op_idx;
                if *end == lo {
                    let message = format!("Operator `{op}` is missing its left operand");
                    return Err(self.error(op_idx, message));
                }
                let left = self.parse_left_operand(lo, end, op_idx)?;
                let location = left.location().union(&right.location());
                location.copy_with_extra(FnExpr::DyadicOperator {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            };
            right = Operand::Function(derived);
        }

        match right {
            Operand::Function(function) => Ok(function),
            Operand::Array(array) => {
                let message = "Expected a function";
                Err(Error::syntax(message).with_location(array.with_no_extra()))
            }
        }
    }

    fn parse_monadic_operator(
        &mut self,
        lo: usize,
        end: &mut usize,
        op: MonadicOp,
    ) -> Result<SpannedFnExpr, Error> {
        let op_idx = *end - 1;
        let op_location = self.tokens[op_idx].to_location();
        if op_idx == lo {
            let message = format!("Operator `{op}` is missing its operand");
            return Err(self.error(op_idx, message));
        }

        let is_replication = matches!(op, MonadicOp::Reduce | MonadicOp::ReduceFirst)
            && !self.function_ends_at(lo, op_idx)?;
        if is_replication {
            *end = op_idx;
            let primitive = if op == MonadicOp::Reduce {
                Primitive::Replicate
            } else {
                Primitive::ReplicateFirst
            };
            return Ok(op_location.copy_with_extra(FnExpr::Primitive(primitive)));
        }

        *end = op_idx;
        let operand = self.parse_function(lo, end)?;
        let location = operand.with_no_extra().union(&op_location);
        Ok(location.copy_with_extra(FnExpr::MonadicOperator {
            op,
            operand: Box::new(Operand::Function(operand)),
        }))
    }

    fn parse_left_operand(
        &mut self,
        lo: usize,
        end: &mut usize,
        op_idx: usize,
    ) -> Result<Operand, Error> {
        if self.function_ends_at(lo, *end)? {
            return self.parse_function(lo, end).map(Operand::Function);
        }
        let items = self.parse_strand(lo, end)?;
        if items.is_empty() {
            return Err(self.error(op_idx, "Operator is missing its left operand"));
        }
        Ok(Operand::Array(make_vector(items)))
    }

    fn parse_function_atom(&mut self, end: &mut usize) -> Result<SpannedFnExpr, Error> {
        let idx = *end - 1;
        let location = self.tokens[idx].to_location();
        let function = match self.kind(idx) {
            TokenKind::Function(primitive) => FnExpr::Primitive(primitive),
            TokenKind::Del => FnExpr::Recursion,
            TokenKind::Identifier => {
                let name = self.name(idx);
                if self.class_of(&name) != NameClass::Function {
                    return Err(self.error(idx, format!("`{name}` is not a function")));
                }
                FnExpr::Variable(name)
            }
            TokenKind::RightBrace => {
                let open_idx = self.partners[idx];
                let dfn = self.parse_dfn(open_idx, idx)?;
                *end = open_idx;
                return Ok(dfn);
            }
            TokenKind::RightParen => {
                let open_idx = self.partners[idx];
                return match self.parse_group(open_idx, idx)? {
                    Parsed::Function(function) => {
                        *end = open_idx;
                        Ok(function)
                    }
                    Parsed::Array(_) => Err(self.error(open_idx, "Expected a function")),
                };
            }
            other => {
                return Err(self.error(idx, format!("Expected a function, got {other}")));
            }
        };
        *end = idx;
        Ok(location.copy_with_extra(function))
    }

    fn parse_dfn(&mut self, open_idx: usize, close_idx: usize) -> Result<SpannedFnExpr, Error> {
        self.scopes.push(BTreeMap::new());
        let body = self.parse_block(open_idx + 1, close_idx);
        self.scopes.pop();

        let location = self.location(open_idx, close_idx + 1);
        Ok(location.copy_with_extra(FnExpr::Dfn(Rc::new(body?))))
    }
}

/// Converts strand items into a single expression. `items` must be non-empty.
fn make_vector(mut items: Vec<SpannedExpr>) -> SpannedExpr {
    let first = items[0].with_no_extra();
    let location = first.union(&items[items.len() - 1].with_no_extra());
    if items.len() == 1 {
        items.swap_remove(0)
    } else {
        location.copy_with_extra(Expr::Vector(items))
    }
}
