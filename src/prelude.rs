use crate::{environment::EnvironmentRef, value::Value};

/// Constants every global scope starts with.
pub const BINDINGS: [(&str, Value); 2] = [
    ("true", Value::Boolean(true)),
    ("false", Value::Boolean(false)),
];

pub fn install(env: &EnvironmentRef) {
    let mut scope = env.borrow_mut();
    for (name, value) in BINDINGS {
        scope.define(name, value, true);
    }
}
