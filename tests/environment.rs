use hybrid::{
    diagnostics::DiagnosticKind,
    environment::Environment,
    value::Value,
};

#[test]
fn declare_returns_the_bound_value() {
    let env = Environment::new();
    let value = env
        .borrow_mut()
        .declare("x", Value::Number(5.0), false)
        .expect("declare should succeed");
    assert_eq!(value, Value::Number(5.0));
    assert_eq!(Environment::lookup(&env, "x").ok(), Some(Value::Number(5.0)));
}

#[test]
fn duplicate_declaration_in_same_scope_fails() {
    let env = Environment::new();
    env.borrow_mut()
        .declare("x", Value::Null, false)
        .expect("first declare");
    let err = env
        .borrow_mut()
        .declare("x", Value::Number(1.0), true)
        .expect_err("second declare should fail");
    assert_eq!(err.kind, DiagnosticKind::DuplicateDeclaration);
    assert_eq!(Environment::lookup(&env, "x").ok(), Some(Value::Null));
}

#[test]
fn child_declaration_shadows_without_touching_parent() {
    let parent = Environment::new();
    parent
        .borrow_mut()
        .declare("x", Value::Number(1.0), false)
        .expect("parent declare");
    let child = Environment::with_parent(parent.clone());
    child
        .borrow_mut()
        .declare("x", Value::Number(2.0), false)
        .expect("shadowing is allowed");

    assert_eq!(Environment::lookup(&child, "x").ok(), Some(Value::Number(2.0)));
    assert_eq!(Environment::lookup(&parent, "x").ok(), Some(Value::Number(1.0)));
}

#[test]
fn assignment_from_child_mutates_parent_binding() {
    let parent = Environment::new();
    parent
        .borrow_mut()
        .declare("y", Value::Number(1.0), false)
        .expect("parent declare");
    let child = Environment::with_parent(parent.clone());

    Environment::assign(&child, "y", Value::Number(9.0)).expect("assign should succeed");

    assert!(!child.borrow().contains("y"));
    assert_eq!(Environment::lookup(&parent, "y").ok(), Some(Value::Number(9.0)));
}

#[test]
fn assignment_hits_nearest_shadowing_scope() {
    let parent = Environment::new();
    parent
        .borrow_mut()
        .declare("x", Value::Number(1.0), true)
        .expect("parent declare");
    let child = Environment::with_parent(parent.clone());
    child
        .borrow_mut()
        .declare("x", Value::Number(2.0), false)
        .expect("child declare");

    Environment::assign(&child, "x", Value::Number(3.0)).expect("child binding is mutable");
    assert_eq!(Environment::lookup(&child, "x").ok(), Some(Value::Number(3.0)));
    assert_eq!(Environment::lookup(&parent, "x").ok(), Some(Value::Number(1.0)));
}

#[test]
fn constants_reject_assignment_from_any_scope() {
    let root = Environment::new();
    root.borrow_mut()
        .declare("pi", Value::Number(3.0), true)
        .expect("declare constant");
    let grandchild = Environment::with_parent(Environment::with_parent(root.clone()));

    for scope in [&root, &grandchild] {
        let err = Environment::assign(scope, "pi", Value::Number(4.0))
            .expect_err("constant must not change");
        assert_eq!(err.kind, DiagnosticKind::ConstReassignment);
    }
    assert_eq!(Environment::is_constant(&grandchild, "pi").ok(), Some(true));
    assert_eq!(Environment::lookup(&root, "pi").ok(), Some(Value::Number(3.0)));
}

#[test]
fn unresolved_names_fail_lookup_and_assign() {
    let env = Environment::with_parent(Environment::new());
    let err = Environment::lookup(&env, "missing").expect_err("lookup should fail");
    assert_eq!(err.kind, DiagnosticKind::UnresolvedName);
    let err = Environment::assign(&env, "missing", Value::Null).expect_err("assign should fail");
    assert_eq!(err.kind, DiagnosticKind::UnresolvedName);
    assert!(err.message.contains("`missing`"), "{}", err.message);
}

#[test]
fn names_keep_declaration_order() {
    let env = Environment::new();
    for name in ["b", "a", "c"] {
        env.borrow_mut()
            .declare(name, Value::Null, false)
            .expect("declare");
    }
    let names: Vec<String> = env.borrow().names().map(str::to_string).collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

#[test]
fn child_reports_its_parent() {
    let parent = Environment::new();
    let child = Environment::with_parent(parent.clone());
    assert!(child
        .borrow()
        .parent()
        .is_some_and(|p| std::rc::Rc::ptr_eq(&p, &parent)));
    assert!(parent.borrow().parent().is_none());
}
