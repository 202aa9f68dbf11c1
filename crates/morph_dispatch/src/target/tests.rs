use super::*;
use futures::executor::block_on;
use pretty_assertions::assert_eq;

struct Counter {
    base: i64,
}

fn counter_type() -> TargetType<Counter> {
    TargetType::builder("Counter")
        .method("add", [Ty::named("int")], Ty::named("int"), |c: &Counter, args| {
            let n = args[0].as_int().unwrap_or_default();
            Ok(TargetReturn::Value(Value::Int(c.base + n)))
        })
        .method("add", [Ty::named("str")], Ty::named("int"), |c: &Counter, _| {
            Ok(TargetReturn::Value(Value::Int(c.base)))
        })
        .method("reset", [], Ty::Task, |_: &Counter, _| {
            Ok(TargetReturn::task(async { Ok(Value::Void) }))
        })
        .build()
        .unwrap()
}

#[test]
fn test_find_exact_matches_parameter_types() {
    let ty = counter_type();
    let add = Name::new("add");

    let by_int = ty.find_exact(&add, &[Ty::named("int")]).unwrap();
    assert_eq!(by_int.signature().to_string(), "add(int) -> int");

    let by_str = ty.find_exact(&add, &[Ty::named("str")]).unwrap();
    assert_eq!(by_str.params(), &[Ty::named("str")]);

    assert!(ty.find_exact(&add, &[Ty::named("float")]).is_none());
    assert!(ty.find_exact(&Name::new("sub"), &[Ty::named("int")]).is_none());
}

#[test]
fn test_overloads_keep_declaration_order() {
    let ty = counter_type();
    let names: Vec<String> = ty
        .overloads(&Name::new("add"))
        .iter()
        .map(|m| m.signature().to_string())
        .collect();
    assert_eq!(names, vec!["add(int) -> int", "add(str) -> int"]);
    assert!(ty.overloads(&Name::new("missing")).is_empty());
    assert_eq!(ty.len(), 3);
}

#[test]
fn test_invoke_calls_closure() {
    let ty = counter_type();
    let add = ty.find_exact(&Name::new("add"), &[Ty::named("int")]).unwrap();
    let mut args = vec![Value::Int(5)];
    let ret = add.invoke(&Counter { base: 10 }, &mut args).unwrap();
    assert!(matches!(ret, TargetReturn::Value(Value::Int(15))));
}

#[test]
fn test_task_handle_completes() {
    let ty = counter_type();
    let reset = ty.find_exact(&Name::new("reset"), &[]).unwrap();
    let ret = reset.invoke(&Counter { base: 0 }, &mut []).unwrap();
    match ret {
        TargetReturn::Task(Some(future)) => assert_eq!(block_on(future).unwrap(), Value::Void),
        other => panic!("expected a task, got {other:?}"),
    }
}

#[test]
fn test_duplicate_method_rejected() {
    let err = TargetType::<Counter>::builder("Counter")
        .method("get", [Ty::named("int")], Ty::named("int"), |_, _| {
            Ok(TargetReturn::void())
        })
        .method("get", [Ty::named("int")], Ty::Void, |_, _| Ok(TargetReturn::void()))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::DuplicateTargetMethod {
            target_type: Name::new("Counter"),
            signature: "get(int)".to_owned(),
        }
    );
}

#[test]
fn test_describe_handles() {
    assert_eq!(TargetReturn::void().describe(), "no value");
    assert_eq!(TargetReturn::null_task().describe(), "a null task");
    assert_eq!(
        TargetReturn::value_task(async { Ok(Value::Int(1)) }).describe(),
        "a value task"
    );
    assert_eq!(format!("{:?}", TargetReturn::null_task()), "Task(null)");
}
