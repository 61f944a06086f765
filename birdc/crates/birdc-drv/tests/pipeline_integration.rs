//! End-to-end pipeline tests: source text in, interpreter output or
//! module structure out.

use birdc_drv::{CompileError, CompileOutcome, Config, EmitType, Session};

fn session(emit: EmitType, source: &str) -> Session {
    let config = Config {
        emit,
        ..Config::default()
    };
    Session::new(config, source)
}

/// Interprets a program and captures its print output.
fn interpret(source: &str) -> String {
    let mut session = session(EmitType::Run, source);
    let mut out = Vec::new();
    let outcome = session
        .compile_with_output(&mut out)
        .unwrap_or_else(|e| panic!("pipeline failed: {} / {:?}", e, session.handler.diagnostics()));
    assert!(matches!(outcome, CompileOutcome::Ran));
    String::from_utf8(out).expect("non-utf8 output")
}

/// Lowers a program to a module.
fn lower(source: &str) -> birdc_gen::WasmModule {
    let mut session = session(EmitType::Wasm, source);
    match session.compile() {
        Ok(CompileOutcome::Module(module)) => module,
        Ok(_) => panic!("expected a module"),
        Err(e) => panic!("pipeline failed: {} / {:?}", e, session.handler.diagnostics()),
    }
}

/// Compiles expecting diagnostics; returns their rendered messages.
fn expect_errors(source: &str) -> Vec<String> {
    let mut session = session(EmitType::Check, source);
    match session.compile() {
        Err(CompileError::Reported { count }) => {
            assert!(count > 0);
            session
                .handler
                .diagnostics()
                .iter()
                .map(|d| d.message.clone())
                .collect()
        },
        Ok(_) => panic!("expected diagnostics for {:?}", source),
        Err(e) => panic!("expected recorded diagnostics, got {}", e),
    }
}

#[test]
fn test_arithmetic_scenario() {
    assert_eq!(interpret("var x: int = (10 + 1) * 3 / -3 - -3; print x;"), "-8\n");
}

#[test]
fn test_while_scenario() {
    assert_eq!(interpret("var x = 0; while x < 3 { x += 1; print x; }"), "1\n2\n3\n");
}

#[test]
fn test_function_scenario() {
    assert_eq!(
        interpret("fn add(a: int, b: int) -> int { return a + b; } print add(2,3);"),
        "5\n"
    );
}

#[test]
fn test_const_immutability_scenario() {
    let messages = expect_errors("const x = 1; x = 2;");
    assert!(messages.contains(&"Identifier 'x' is not mutable.".to_string()));
}

#[test]
fn test_type_alias_scenario() {
    assert_eq!(interpret("type num = int; var y: num = 42; print y;"), "42\n");
}

#[test]
fn test_string_scenario_interpreted() {
    assert_eq!(interpret("var s = \"hello\"; print s;"), "hello\n");
}

#[test]
fn test_string_scenario_lowered() {
    let module = lower("var s = \"hello\"; print s;");
    assert_eq!(module.segments.len(), 1);
    assert!(module.segments[0].offset >= 1024);
    assert_eq!(module.segments[0].bytes, b"hello\0");

    let wat = module.to_wat();
    assert!(wat.contains("(import \"env\" \"print_str\""));
    assert!(wat.contains("call $print_str"));
}

#[test]
fn test_module_contract() {
    let module = lower("fn add(a: int, b: int) -> int { return a + b; } print add(2,3);");
    let wat = module.to_wat();

    assert!(wat.contains("(import \"env\" \"print_i32\" (func $print_i32 (param i32)))"));
    assert!(wat.contains("(import \"env\" \"print_f64\" (func $print_f64 (param f64)))"));
    assert!(wat.contains("(import \"env\" \"print_str\" (func $print_str (param i32)))"));
    assert!(wat.contains("(memory (export \"memory\") 1 1)"));
    assert!(wat.contains("(func $add (export \"add\")"));
    assert!(wat.contains("(func $main (export \"main\")"));

    let bytes = module.to_bytes();
    assert_eq!(&bytes[0..4], b"\0asm");
    assert_eq!(&bytes[4..8], &[1, 0, 0, 0]);
}

#[test]
fn test_interpreter_and_lowerer_agree_on_locals() {
    // the same declarations produce one local slot each
    let module = lower("var a = 1; var b = 2.5; var c = true;");
    let main = module.functions.last().unwrap();
    assert_eq!(main.locals.len(), 3);
}

#[test]
fn test_parse_errors_stop_the_pipeline() {
    let messages = expect_errors("var = 1;");
    assert!(messages[0].starts_with("expected identifier"));
}

#[test]
fn test_semantic_errors_stop_before_type_checking() {
    // `ghost` is undeclared; no cascading type diagnostics follow
    let messages = expect_errors("print ghost;");
    assert_eq!(messages, vec!["Identifier 'ghost' is not initialized.".to_string()]);
}

#[test]
fn test_break_in_function_declared_inside_loop_is_rejected() {
    // the enclosing loop does not license jumps inside the function body;
    // this must be caught before interpretation or lowering ever runs
    let messages = expect_errors("while true { fn f() { break; } f(); }");
    assert_eq!(
        messages,
        vec!["Break statement is declared outside of a loop.".to_string()]
    );

    let messages = expect_errors("while true { fn f() { continue; } f(); }");
    assert_eq!(
        messages,
        vec!["Continue statement is declared outside of a loop.".to_string()]
    );
}

#[test]
fn test_loop_owned_by_function_inside_loop_compiles() {
    let source = "fn drain(n: int) -> int {\n\
                      while n > 0 { n -= 1; if n == 1 { break; } }\n\
                      return n;\n\
                  }\n\
                  var i = 0;\n\
                  while i < 2 { print drain(3); i += 1; }";
    assert_eq!(interpret(source), "1\n1\n");

    let module = lower(source);
    // encoding resolves every branch; a label leak would panic here
    assert_eq!(&module.to_bytes()[0..4], b"\0asm");
}

#[test]
fn test_type_errors_stop_before_execution() {
    let messages = expect_errors("var x = 1 + true;");
    assert_eq!(messages, vec!["type mismatch: in binary operation".to_string()]);
}

#[test]
fn test_multiple_semantic_errors_surface_together() {
    let messages = expect_errors("print a; print b; break;");
    assert_eq!(messages.len(), 3);
}

#[test]
fn test_runtime_division_by_zero() {
    let mut session = session(EmitType::Run, "var x = 0; print 10 / x;");
    let mut out = Vec::new();
    let err = session.compile_with_output(&mut out).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Runtime(birdc_interp::RuntimeError::DivisionByZero { .. })
    ));
}

#[test]
fn test_float_modulo_only_fails_when_lowering() {
    let source = "print 7.5 % 2.0;";
    assert_eq!(interpret(source), "1.5\n");

    let mut session = session(EmitType::Wasm, source);
    let err = session.compile().unwrap_err();
    assert!(matches!(
        err,
        CompileError::Lower(birdc_gen::LowerError::FloatModulo)
    ));
}

#[test]
fn test_string_concat_only_fails_when_lowering() {
    let source = "print \"fly \" + \"away\";";
    assert_eq!(interpret(source), "fly away\n");

    let mut session = session(EmitType::Wasm, source);
    let err = session.compile().unwrap_err();
    assert!(matches!(
        err,
        CompileError::Lower(birdc_gen::LowerError::StrConcat)
    ));
}

#[test]
fn test_lex_error_is_fatal() {
    let mut session = session(EmitType::Check, "var x = 1; @");
    let err = session.compile().unwrap_err();
    assert!(matches!(err, CompileError::Lex(_)));
    // nothing was recorded in the sink; the lexer aborted outright
    assert!(!session.handler.has_errors());
}

#[test]
fn test_tokens_emit_stage() {
    let mut session = session(EmitType::Tokens, "var x = 1;");
    match session.compile().unwrap() {
        CompileOutcome::Tokens(tokens) => assert_eq!(tokens.len(), 6),
        _ => panic!("expected tokens"),
    }
}

#[test]
fn test_ast_emit_stage_skips_checks() {
    // `break` outside a loop parses fine; Ast mode stops before semantics
    let mut session = session(EmitType::Ast, "break;");
    match session.compile().unwrap() {
        CompileOutcome::Ast(ast) => assert_eq!(ast.len(), 1),
        _ => panic!("expected an AST"),
    }
}

#[test]
fn test_diagnostics_render_with_context() {
    let mut session = session(EmitType::Check, "const x = 1;\nx = 2;");
    let _ = session.compile();
    let rendered = session.handler.render_all(&session.source);
    assert!(rendered.contains(">>[ERROR] Identifier 'x' is not mutable. (line 2, character 1)"));
    assert!(rendered.contains("x = 2;"));
    assert!(rendered.contains("^"));
    assert!(rendered.contains("[1 ERRORS FOUND]"));
}

#[test]
fn test_interpreter_output_matches_lowered_print_dispatch() {
    // every printable tag routes somewhere in the module
    let source = "print 1; print 2.5; print true; print \"s\";";
    assert_eq!(interpret(source), "1\n2.5\n1\ns\n");

    let wat = lower(source).to_wat();
    assert!(wat.contains("call $print_i32"));
    assert!(wat.contains("call $print_f64"));
    assert!(wat.contains("call $print_str"));
}

#[test]
fn test_nested_program_end_to_end() {
    let source = r#"
        fn classify(n: int) -> str {
            if n % 15 == 0 { return "fizzbuzz"; }
            if n % 3 == 0 { return "fizz"; }
            if n % 5 == 0 { return "buzz"; }
            return "";
        }

        for var i = 1; i <= 15; i += 1 do {
            const label = classify(i);
            if label == "" { print i; } else { print label; }
        }
    "#;
    let expected = "1\n2\nfizz\n4\nbuzz\nfizz\n7\n8\nfizz\nbuzz\n11\nfizz\n13\n14\nfizzbuzz\n";
    assert_eq!(interpret(source), expected);
}
