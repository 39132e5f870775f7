//! Symbol tables chained into scopes.

use hashbrown::HashMap;

use kpl_parser::{NameClass, NameResolver};

use crate::{
    fns::Operation,
    system::{Config, SystemValues},
    Array, Error, ErrorKind,
};

/// Identifier of a scope in [`Scopes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// Root (session-level) scope.
    pub const ROOT: Self = Self(0);
}

/// Value bound to a name.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Referent {
    /// Array variable.
    Variable(Array),
    /// Function.
    Function(Operation),
}

impl Referent {
    fn class(&self) -> NameClass {
        match self {
            Self::Variable(_) => NameClass::Variable,
            Self::Function(_) => NameClass::Function,
        }
    }
}

#[derive(Debug, Default)]
struct SymbolTable {
    bindings: HashMap<String, Referent>,
    parent: Option<ScopeId>,
}

/// Arena of symbol tables. Each table except for the root one has a parent; lookups walk
/// the parent chain. Scopes are released in the reverse order of their creation, so a scope
/// never outlives its parent.
#[derive(Debug)]
pub struct Scopes {
    tables: Vec<SymbolTable>,
    system: SystemValues,
}

impl Scopes {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            tables: vec![SymbolTable::default()],
            system: SystemValues::new(config),
        }
    }

    /// Creates a new empty scope with the specified parent.
    pub(crate) fn push(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.tables.len());
        self.tables.push(SymbolTable {
            bindings: HashMap::new(),
            parent: Some(parent),
        });
        id
    }

    /// Releases the specified scope together with all scopes created after it.
    pub(crate) fn release(&mut self, scope: ScopeId) {
        debug_assert_ne!(scope, ScopeId::ROOT);
        self.tables.truncate(scope.0.max(1));
    }

    pub(crate) fn system(&self) -> &SystemValues {
        &self.system
    }

    pub(crate) fn assign_system(
        &mut self,
        name: &str,
        value: &Array,
        config: &Config,
    ) -> Result<(), Error> {
        self.system.assign(name, value, config)
    }

    /// Looks up a name walking the scope chain starting from `scope`.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Referent> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let table = &self.tables[id.0];
            if let Some(referent) = table.bindings.get(name) {
                return Some(referent);
            }
            current = table.parent;
        }
        None
    }

    /// Looks up a name in `scope` only, without consulting parent scopes.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&Referent> {
        self.tables[scope.0].bindings.get(name)
    }

    /// Binds a name in the specified scope, shadowing bindings in parent scopes.
    pub fn set(&mut self, scope: ScopeId, name: impl Into<String>, referent: Referent) {
        self.tables[scope.0].bindings.insert(name.into(), referent);
    }

    /// Gets an array bound to `name`.
    ///
    /// # Errors
    ///
    /// - [`ValueError`](ErrorKind::Value) if the name is unbound.
    /// - [`DefinitionError`](ErrorKind::Definition) if the name is bound to a function.
    pub fn get_array(&self, scope: ScopeId, name: &str) -> Result<Array, Error> {
        if SystemValues::is_known(name) {
            return self.system.get(name);
        }
        match self.lookup(scope, name) {
            Some(Referent::Variable(array)) => Ok(array.clone()),
            Some(Referent::Function(_)) => {
                let message = format!("`{name}` is a function, not an array");
                Err(Error::new(ErrorKind::Definition, message))
            }
            None => Err(Error::value(format!("Undefined name `{name}`"))),
        }
    }

    /// Gets a function bound to `name`.
    ///
    /// # Errors
    ///
    /// - [`ValueError`](ErrorKind::Value) if the name is unbound.
    /// - [`DefinitionError`](ErrorKind::Definition) if the name is bound to an array.
    pub fn get_function(&self, scope: ScopeId, name: &str) -> Result<Operation, Error> {
        match self.lookup(scope, name) {
            Some(Referent::Function(function)) => Ok(function.clone()),
            Some(Referent::Variable(_)) => {
                let message = format!("`{name}` is an array, not a function");
                Err(Error::new(ErrorKind::Definition, message))
            }
            None => Err(Error::value(format!("Undefined function `{name}`"))),
        }
    }

    /// Returns the class of the name as visible from `scope`.
    pub fn class_at(&self, scope: ScopeId, name: &str) -> Option<NameClass> {
        if name.starts_with('⎕') {
            return Some(NameClass::System);
        }
        self.lookup(scope, name).map(Referent::class)
    }
}

impl NameResolver for Scopes {
    fn current_class(&self, name: &str) -> Option<NameClass> {
        self.class_at(ScopeId::ROOT, name)
    }
}
