use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind},
    value::Value,
};

pub type EnvironmentRef = Rc<RefCell<Environment>>;

/// One lexical scope. Children hold their parent; parents never see children.
#[derive(Debug, Default)]
pub struct Environment {
    parent: Option<EnvironmentRef>,
    bindings: IndexMap<String, Binding>,
}

#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub value: Value,
    pub constant: bool,
}

impl Environment {
    pub fn new() -> EnvironmentRef {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn with_parent(parent: EnvironmentRef) -> EnvironmentRef {
        Rc::new(RefCell::new(Self {
            parent: Some(parent),
            bindings: IndexMap::new(),
        }))
    }

    pub fn parent(&self) -> Option<EnvironmentRef> {
        self.parent.clone()
    }

    /// Inserts or replaces a binding without the duplicate check.
    pub fn define(&mut self, name: &str, value: Value, constant: bool) {
        self.bindings
            .insert(name.to_string(), Binding { value, constant });
    }

    /// Binds `name` in this scope. Ancestors are not consulted, so shadowing is allowed.
    pub fn declare(
        &mut self,
        name: &str,
        value: Value,
        constant: bool,
    ) -> Result<Value, Diagnostic> {
        if self.bindings.contains_key(name) {
            return Err(Diagnostic::new(
                DiagnosticKind::DuplicateDeclaration,
                format!("variable `{name}` has already been declared"),
            ));
        }
        tracing::trace!(name, %value, constant, "declare");
        self.define(name, value, constant);
        Ok(value)
    }

    pub fn assign(env: &EnvironmentRef, name: &str, value: Value) -> Result<Value, Diagnostic> {
        let scope = Environment::resolve(env, name)?;
        let mut scope = scope.borrow_mut();
        let Some(binding) = scope.bindings.get_mut(name) else {
            return Err(unresolved(name));
        };
        if binding.constant {
            return Err(Diagnostic::new(
                DiagnosticKind::ConstReassignment,
                format!("cannot reassign constant `{name}`"),
            ));
        }
        tracing::trace!(name, %value, "assign");
        binding.value = value;
        Ok(value)
    }

    pub fn lookup(env: &EnvironmentRef, name: &str) -> Result<Value, Diagnostic> {
        if let Some(binding) = env.borrow().bindings.get(name) {
            return Ok(binding.value);
        }
        match env.borrow().parent.clone() {
            Some(parent) => Environment::lookup(&parent, name),
            None => Err(unresolved(name)),
        }
    }

    /// Nearest scope, starting at `env`, that binds `name`.
    pub fn resolve(env: &EnvironmentRef, name: &str) -> Result<EnvironmentRef, Diagnostic> {
        let mut scope = Rc::clone(env);
        loop {
            if scope.borrow().bindings.contains_key(name) {
                return Ok(scope);
            }
            let parent = scope.borrow().parent.clone();
            match parent {
                Some(parent) => scope = parent,
                None => return Err(unresolved(name)),
            }
        }
    }

    pub fn is_constant(env: &EnvironmentRef, name: &str) -> Result<bool, Diagnostic> {
        let scope = Environment::resolve(env, name)?;
        let constant = scope
            .borrow()
            .bindings
            .get(name)
            .is_some_and(|binding| binding.constant);
        Ok(constant)
    }

    /// Whether this scope alone binds `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Names bound in this scope, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

fn unresolved(name: &str) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::UnresolvedName,
        format!("cannot resolve `{name}` because it does not exist"),
    )
}
