//! Integration tests for end-to-end compilation.
//!
//! These tests drive the public `compile` entry point from GLHF source all the
//! way to JavaScript text.

use glhfc::{
    compile,
    errors::errors::{ErrorImpl, ErrorKind},
    CompileOptions,
};
use indoc::indoc;

fn compile_optimized(source: &str) -> String {
    compile(source, "test.gg", &CompileOptions::default()).unwrap()
}

fn compile_plain(source: &str) -> String {
    compile(source, "test.gg", &CompileOptions { optimize: false }).unwrap()
}

fn error_kind(source: &str) -> ErrorKind {
    compile(source, "test.gg", &CompileOptions::default())
        .unwrap_err()
        .get_kind()
}

#[test]
fn test_variable_and_print_share_a_name() {
    let output = compile_optimized("x = 21\nprint(x)");
    assert_eq!(output, "let x_1 = 21;\nconsole.log(x_1);");
}

#[test]
fn test_function_keeps_parameter_and_body_order() {
    let output = compile_optimized(indoc! {"
        Function f(x, y)
          x = y
          return x
        end f
        print(f(1, 2))
    "});

    assert_eq!(
        output,
        indoc! {"
            function f_1(x_2, y_3) {
              x_2 = y_3;
              return x_2;
            }
            console.log(f_1(1, 2));"}
    );
}

#[test]
fn test_recursive_function() {
    let output = compile_optimized(indoc! {"
        Function fact(n: int) -> int
          return n <= 1 ? 1 : n * fact(n - 1)
        end fact
        print(fact(5))
    "});

    assert_eq!(
        output,
        indoc! {"
            function fact_1(n_2) {
              return (((n_2 <= 1)) ? (1) : ((n_2 * fact_1((n_2 - 1)))));
            }
            console.log(fact_1(5));"}
    );
}

#[test]
fn test_loop_program() {
    let source = indoc! {r#"
        // sum of squares
        total = 0
        for (i = 1, i += 1)
          total += i ** 2
        end i <= 10
        print("total:", total)
    "#};

    let expected = indoc! {r#"
        let total_1 = 0;
        for (let i_2 = 1; (i_2 <= 10); i_2++) {
          total_1 = (total_1 + (i_2 ** 2));
        }
        console.log("total:", total_1);"#};

    assert_eq!(compile_optimized(source), expected);
    assert_eq!(compile_plain(source), expected);
}

#[test]
fn test_collections() {
    let output = compile_optimized(indoc! {r#"
        words = ["a", "b"]
        pairs = <<"a": "x", "b": "y">>
        for word in words
          print(word, words[0])
        end for
        for entry in pairs
          print(entry[0])
        end for
    "#});

    assert_eq!(
        output,
        indoc! {r#"
            let words_1 = ["a", "b"];
            let pairs_2 = new Map([["a", "x"], ["b", "y"]]);
            for (let word_3 of words_1) {
              console.log(word_3, words_1[0]);
            }
            for (let entry_4 of pairs_2.entries()) {
              console.log(entry_4[0]);
            }"#}
    );
}

#[test]
fn test_optimizer_changes_output() {
    let source = indoc! {"
        y = 2
        x = y * 1 + 0
        z = 5 / 8
        w = true ? 2 ** 10 : 0
        x = x
    "};

    assert_eq!(
        compile_optimized(source),
        indoc! {"
            let y_1 = 2;
            let x_2 = y_1;
            let z_3 = 0.625;
            let w_4 = 1024;"}
    );
    assert_eq!(
        compile_plain(source),
        indoc! {"
            let y_1 = 2;
            let x_2 = ((y_1 * 1) + 0);
            let z_3 = (5 / 8);
            let w_4 = ((true) ? ((2 ** 10)) : (0));
            x_2 = x_2;"}
    );
}

#[test]
fn test_dead_loop_disappears() {
    let source = "for (i = 10, i += 1)\n  print(i)\nend i < 10";
    assert_eq!(compile_optimized(source), "");
    assert_eq!(
        compile_plain(source),
        "for (let i_1 = 10; (i_1 < 10); i_1++) {\n  console.log(i_1);\n}"
    );
}

#[test]
fn test_dead_loop_keeps_outer_assignment() {
    let source = "i = 0\nfor (i = 3, i += 1)\nend i < 2\nprint(i)";
    assert_eq!(
        compile_optimized(source),
        "let i_1 = 0;\ni_1 = 3;\nconsole.log(i_1);"
    );
}

#[test]
fn test_collection_methods() {
    let output = compile_optimized(indoc! {r#"
        queue = [1, 2]
        queue.add(3 * 1)
        queue.delete(0)
        seen = <<"a": "yes">>
        seen.set("b", "no")
        for item in queue
          wait(item)
        end for
    "#});

    assert_eq!(
        output,
        indoc! {r#"
            let queue_1 = [1, 2];
            queue_1.push(3);
            queue_1.splice(0, 1);
            let seen_2 = new Map([["a", "yes"]]);
            seen_2.set("b", "no");
            for (let item_3 of queue_1) {
              ((seconds) => Atomics.wait(new Int32Array(new SharedArrayBuffer(4)), 0, 0, seconds * 1000))(item_3);
            }"#}
    );
}

#[test]
fn test_standard_library() {
    let output = compile_optimized(indoc! {r#"
        r = hypot(3.0, 4.0)
        angle = tau / 4.0
        print(sin(angle), cos(pi), r)
        print(bytes("hi"), codepoints("hi"))
    "#});

    assert_eq!(
        output,
        indoc! {r#"
            let r_1 = Math.hypot(3, 4);
            let angle_2 = ((2 * Math.PI) / 4);
            console.log(Math.sin(angle_2), Math.cos(Math.PI), r_1);
            console.log(((s) => [...new TextEncoder().encode(s)])("hi"), ((s) => [...s].map((c) => c.codePointAt(0)))("hi"));"#}
    );
}

#[test]
fn test_compilation_is_repeatable() {
    let source = "a = 1\nFunction g(b)\n  return b\nend g\nprint(g(a))";
    assert_eq!(compile_optimized(source), compile_optimized(source));
}

#[test]
fn test_error_kinds() {
    assert_eq!(error_kind("x = $"), ErrorKind::Syntax);
    assert_eq!(error_kind("x = (1"), ErrorKind::Syntax);
    assert_eq!(error_kind("y = x"), ErrorKind::Resolution);
    assert_eq!(error_kind("x = 1\nx = \"a\""), ErrorKind::Type);
    assert_eq!(error_kind("x = 1 + true"), ErrorKind::Type);
    assert_eq!(error_kind("x = 1\nFunction x()\nend x"), ErrorKind::Declaration);
    assert_eq!(error_kind("break"), ErrorKind::Structural);
    assert_eq!(error_kind("return 1"), ErrorKind::Structural);
    assert_eq!(
        error_kind("for (i = 0, j = 1)\n  print(i)\nend i < 3"),
        ErrorKind::Resolution
    );
    assert_eq!(error_kind("xs = [1]\nxs.set(0, 1)"), ErrorKind::Type);
    assert_eq!(error_kind("File.parent.start_menu()"), ErrorKind::Resolution);
}

#[test]
fn test_first_error_wins() {
    let error = compile("y = a\nz = b", "main.gg", &CompileOptions::default()).unwrap_err();

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::NotDeclared {
            name: String::from("a")
        }
    );
    assert_eq!(error.get_position().file.as_str(), "main.gg");
    assert_eq!(error.to_string(), "1:5: Identifier a not declared");
}
