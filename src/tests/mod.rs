#[cfg(test)]
mod rendering_tests {
    use crate::{
        dump, Ast, GoParser, LitKind, Node, ObjData, ObjKind, Object, Render, RenderContext,
        RenderOptions, Subtree, Target, TreeRenderer,
    };

    fn render_node(ast: &Ast, root: crate::NodeId) -> String {
        Subtree::new(ast, root).render(&RenderContext::new())
    }

    fn empty_block(ast: &mut Ast) -> crate::NodeId {
        ast.alloc(Node::Block { list: vec![] })
    }

    fn function(ast: &mut Ast, name: &str, body: Option<crate::NodeId>) -> crate::NodeId {
        let name = ast.ident(name);
        ast.alloc(Node::Function {
            recv: vec![],
            name,
            params: vec![],
            results: vec![],
            body,
        })
    }

    // `var x = 1` with `x` bound to its own spec.
    fn var_spec(ast: &mut Ast) -> (crate::NodeId, crate::ObjectId) {
        let object = ast.alloc_object(Object::new(ObjKind::Var, "x"));
        let name = ast.bound_ident("x", object);
        let value = ast.basic_lit(LitKind::Int, "1");
        let spec = ast.alloc(Node::ValueSpec {
            names: vec![name],
            ty: None,
            values: vec![value],
            comment: None,
        });
        ast.object_mut(object).decl = Some(spec);
        (spec, object)
    }

    #[test]
    fn test_function_with_empty_body() {
        let mut ast = Ast::new();
        let body = empty_block(&mut ast);
        let func = function(&mut ast, "main", Some(body));
        ast.decls.push(func);

        let output = dump(&ast, RenderOptions::default());
        assert_eq!(
            output,
            "Function name=main\n  Function Body:\n    Block\n      Block List:\n"
        );
    }

    #[test]
    fn test_key_value_collapses_to_one_line() {
        let mut ast = Ast::new();
        let key = ast.ident("X");
        let value = ast.basic_lit(LitKind::Int, "5");
        let kv = ast.alloc(Node::KeyValue { key, value });

        assert_eq!(render_node(&ast, kv), "KeyValue key=\"X\" value=5\n");
    }

    #[test]
    fn test_key_value_with_non_literal_value_expands() {
        let mut ast = Ast::new();
        let key = ast.ident("X");
        let value = ast.ident("y");
        let kv = ast.alloc(Node::KeyValue { key, value });

        assert_eq!(
            render_node(&ast, kv),
            "KeyValue\n\
             \x20 KeyValue Key:\n\
             \x20   Identifier { name: \"X\", obj: None }\n\
             \x20 KeyValue Value:\n\
             \x20   Identifier { name: \"y\", obj: None }\n"
        );
    }

    #[test]
    fn test_unbound_selector_collapses() {
        let mut ast = Ast::new();
        let x = ast.ident("fmt");
        let sel = ast.ident("Println");
        let selector = ast.alloc(Node::Selector { x, sel });

        assert_eq!(render_node(&ast, selector), "Selector fmt.Println\n");
    }

    #[test]
    fn test_bound_selector_operand_expands() {
        let mut ast = Ast::new();
        let object = ast.alloc_object(Object::new(ObjKind::Var, "p"));
        let x = ast.bound_ident("p", object);
        let sel = ast.ident("Name");
        let selector = ast.alloc(Node::Selector { x, sel });

        assert_eq!(
            render_node(&ast, selector),
            "Selector\n\
             \x20 Selector X:\n\
             \x20   Identifier name=p\n\
             \x20     Object kind=var name=\"p\"\n\
             \x20 Selector Sel:\n\
             \x20   Identifier { name: \"Name\", obj: None }\n"
        );
    }

    #[test]
    fn test_binary_prints_operator_between_operands() {
        let mut ast = Ast::new();
        let x = ast.basic_lit(LitKind::Int, "1");
        let y = ast.basic_lit(LitKind::Int, "2");
        let binary = ast.alloc(Node::Binary {
            x,
            op: "+".to_string(),
            y,
        });

        assert_eq!(
            render_node(&ast, binary),
            "Binary\n\
             \x20 Binary X:\n\
             \x20   BasicLiteral kind=INT value=1\n\
             \x20 Binary Op: +\n\
             \x20 Binary Y:\n\
             \x20   BasicLiteral kind=INT value=2\n"
        );
    }

    #[test]
    fn test_separator_only_between_root_decls() {
        let mut ast = Ast::new();
        for name in ["a", "b", "c"] {
            let func = function(&mut ast, name, None);
            ast.decls.push(func);
        }

        let output = dump(&ast, RenderOptions::default());
        let separators = output.lines().filter(|line| *line == "--------").count();
        assert_eq!(separators, 2);
        assert!(output.starts_with("Function name=a\n"));
        assert!(output.ends_with("    nil\n"));
    }

    #[test]
    fn test_custom_separator() {
        let mut ast = Ast::new();
        for name in ["a", "b"] {
            let func = function(&mut ast, name, None);
            ast.decls.push(func);
        }

        let options = RenderOptions {
            separator: "####".to_string(),
            ..RenderOptions::default()
        };
        let output = dump(&ast, options);
        assert_eq!(output.lines().filter(|line| *line == "####").count(), 1);
        assert!(!output.contains("--------"));
    }

    #[test]
    fn test_empty_file_renders_nothing() {
        let ast = Ast::new();
        assert_eq!(dump(&ast, RenderOptions::default()), "");
    }

    #[test]
    fn test_fallback_is_a_single_line() {
        let mut ast = Ast::new();
        let x = ast.ident("v");
        let unary = ast.alloc(Node::Unary {
            op: "-".to_string(),
            x,
        });

        let output = render_node(&ast, unary);
        assert_eq!(output.lines().count(), 1);
        assert_eq!(output, "Unary { op: \"-\", x: #0 }\n");
    }

    #[test]
    fn test_if_without_init_or_else_prints_nil() {
        let mut ast = Ast::new();
        let cond = ast.ident("ok");
        let body = empty_block(&mut ast);
        let stmt = ast.alloc(Node::If {
            init: None,
            cond,
            body,
            else_branch: None,
        });

        assert_eq!(
            render_node(&ast, stmt),
            "If\n\
             \x20 If Init:\n\
             \x20   nil\n\
             \x20 If Cond:\n\
             \x20   Identifier { name: \"ok\", obj: None }\n\
             \x20 If Body:\n\
             \x20   Block\n\
             \x20     Block List:\n\
             \x20 If Else:\n\
             \x20   nil\n"
        );
    }

    #[test]
    fn test_block_statements_are_list_items() {
        let mut ast = Ast::new();
        let x = ast.ident("fmt");
        let sel = ast.ident("Println");
        let fun = ast.alloc(Node::Selector { x, sel });
        let arg = ast.basic_lit(LitKind::String, "\"hi\"");
        let call = ast.alloc(Node::Call {
            fun,
            args: vec![arg],
            ellipsis: false,
        });
        let stmt = ast.alloc(Node::ExprStmt { x: call });
        let block = ast.alloc(Node::Block { list: vec![stmt] });

        assert_eq!(
            render_node(&ast, block),
            "Block\n\
             \x20 Block List:\n\
             \x20 - ExprStmt\n\
             \x20     ExprStmt X:\n\
             \x20       Call\n\
             \x20         Call Fun:\n\
             \x20           Selector fmt.Println\n\
             \x20         Call Args:\n\
             \x20         - BasicLiteral kind=STRING value=\"hi\"\n"
        );
    }

    #[test]
    fn test_call_without_args_omits_args_header() {
        let mut ast = Ast::new();
        let fun = ast.ident("f");
        let call = ast.alloc(Node::Call {
            fun,
            args: vec![],
            ellipsis: false,
        });

        let output = render_node(&ast, call);
        assert!(output.contains("Call Fun:"));
        assert!(!output.contains("Call Args:"));
    }

    #[test]
    fn test_composite_literal_without_type_prints_nil() {
        let mut ast = Ast::new();
        let key = ast.ident("X");
        let value = ast.basic_lit(LitKind::Int, "5");
        let kv = ast.alloc(Node::KeyValue { key, value });
        let lit = ast.alloc(Node::CompositeLiteral {
            ty: None,
            elts: vec![kv],
        });

        assert_eq!(
            render_node(&ast, lit),
            "CompositeLiteral\n\
             \x20 CompositeLiteral Type:\n\
             \x20   nil\n\
             \x20 CompositeLiteral Elts:\n\
             \x20 - KeyValue key=\"X\" value=5\n"
        );
    }

    #[test]
    fn test_array_type_element_keeps_list_marker() {
        let mut ast = Ast::new();
        let fun = ast.ident("make");
        let elt = ast.ident("int");
        let array = ast.alloc(Node::ArrayType { len: None, elt });
        let call = ast.alloc(Node::Call {
            fun,
            args: vec![array],
            ellipsis: false,
        });

        let output = render_node(&ast, call);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines.contains(&"  - ArrayType"));
        assert!(lines.contains(&"      ArrayType Elt:"));
        assert!(lines.contains(&"      - Identifier { name: \"int\", obj: None }"));
    }

    #[test]
    fn test_array_type_outside_list_has_no_marker() {
        let mut ast = Ast::new();
        let len = ast.basic_lit(LitKind::Int, "4");
        let elt = ast.ident("byte");
        let array = ast.alloc(Node::ArrayType {
            len: Some(len),
            elt,
        });

        assert_eq!(
            render_node(&ast, array),
            "ArrayType len=4\n\
             \x20 ArrayType Elt:\n\
             \x20   Identifier { name: \"byte\", obj: None }\n"
        );
    }

    #[test]
    fn test_self_referencing_decl_is_cut_off() {
        let mut ast = Ast::new();
        let (spec, _) = var_spec(&mut ast);
        let group = ast.alloc(Node::GroupedDecl {
            tok: crate::DeclToken::Var,
            specs: vec![spec],
        });
        ast.decls.push(group);

        assert_eq!(
            dump(&ast, RenderOptions::default()),
            "GroupedDecl tok=var\n\
             \x20 GroupedDecl Specs:\n\
             \x20 - ValueSpec\n\
             \x20     ValueSpec Names:\n\
             \x20     - Identifier name=x\n\
             \x20         Object kind=var name=\"x\"\n\
             \x20           Object Decl:\n\
             \x20             ValueSpec <recursive reference>\n\
             \x20     ValueSpec Values:\n\
             \x20     - BasicLiteral kind=INT value=1\n"
        );
    }

    #[test]
    fn test_use_site_expands_declaration_once() {
        let mut ast = Ast::new();
        let (_, object) = var_spec(&mut ast);
        let usage = ast.bound_ident("x", object);

        let output = render_node(&ast, usage);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Identifier name=x");
        assert_eq!(lines[1], "  Object kind=var name=\"x\"");
        assert_eq!(lines[2], "    Object Decl:");
        assert_eq!(lines[3], "      ValueSpec");
        assert_eq!(
            output.matches("ValueSpec <recursive reference>").count(),
            1
        );
    }

    #[test]
    fn test_no_object_decls_option() {
        let mut ast = Ast::new();
        let (_, object) = var_spec(&mut ast);
        let usage = ast.bound_ident("x", object);

        let options = RenderOptions {
            follow_object_decls: false,
            ..RenderOptions::default()
        };
        let output = TreeRenderer::new(&ast)
            .with_options(options)
            .render_target(Target::Node(usage), RenderContext::new());
        assert_eq!(output, "Identifier name=x\n  Object kind=var name=\"x\"\n");
    }

    #[test]
    fn test_object_data_is_printed() {
        let mut ast = Ast::new();
        let mut constant = Object::new(ObjKind::Con, "C");
        constant.data = Some(ObjData::Iota(2));
        let object = ast.alloc_object(constant);
        let ident = ast.bound_ident("C", object);

        assert_eq!(
            render_node(&ast, ident),
            "Identifier name=C\n  Object kind=const name=\"C\"\n    Object Data: iota=2\n"
        );
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let mut ast = Ast::new();
        let (spec, object) = var_spec(&mut ast);
        let group = ast.alloc(Node::GroupedDecl {
            tok: crate::DeclToken::Var,
            specs: vec![spec],
        });
        let usage = ast.bound_ident("x", object);
        let stmt = ast.alloc(Node::ExprStmt { x: usage });
        let body = ast.alloc(Node::Block { list: vec![stmt] });
        let func = function(&mut ast, "main", Some(body));
        ast.decls.extend([group, func]);

        let first = dump(&ast, RenderOptions::default());
        let second = dump(&ast, RenderOptions::default());
        assert_eq!(first, second);
        assert_eq!(ast.render(&RenderContext::new()), first);
    }

    #[test]
    fn test_nested_context_shifts_everything() {
        let mut ast = Ast::new();
        let lit = ast.basic_lit(LitKind::Float, "1.5");
        let context = RenderContext::new().descend(2);

        let output = Subtree::new(&ast, lit).render(&context);
        assert_eq!(output, "    BasicLiteral kind=FLOAT value=1.5\n");
    }

    #[test]
    fn test_parsed_source_renders() {
        let source = r#"package main

import "fmt" // printing

type Point struct{ X, Y int }

func main() {
	p := Point{X: 1}
	for i := 0; i < 3; i++ {
		fmt.Println(p, i)
	}
}
"#;
        let ast = GoParser::new().unwrap().parse_str(source).unwrap();
        let output = dump(&ast, RenderOptions::default());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "GroupedDecl tok=import");
        assert!(lines.contains(&"  - ImportSpec path=\"fmt\" comment=\"// printing\""));
        assert_eq!(lines.iter().filter(|line| **line == "--------").count(), 2);
        assert!(output.contains("KeyValue key=\"X\" value=1"));
        assert!(output.contains("Selector fmt.Println"));
        assert!(output.contains("For\n"));
        assert!(output.contains("Object kind=type name=\"Point\" type=struct{...}"));
        assert!(output.contains("Assign tok=:="));
    }

    #[test]
    fn test_declaration_expanded_once_per_pass() {
        let mut ast = Ast::new();
        let (_, object) = var_spec(&mut ast);
        let first = ast.bound_ident("x", object);
        let second = ast.bound_ident("x", object);
        let first = ast.alloc(Node::ExprStmt { x: first });
        let second = ast.alloc(Node::ExprStmt { x: second });
        let block = ast.alloc(Node::Block {
            list: vec![first, second],
        });

        let output = render_node(&ast, block);
        assert_eq!(output.matches("ValueSpec Names:").count(), 1);
        assert_eq!(output.matches("ValueSpec <already shown>").count(), 1);
        assert!(output.ends_with(
            "\x20     ExprStmt X:\n\
             \x20       Identifier name=x\n\
             \x20         Object kind=var name=\"x\"\n\
             \x20           Object Decl:\n\
             \x20             ValueSpec <already shown>\n"
        ));
    }

    #[test]
    fn test_chained_declarations_grow_linearly() {
        fn chain(length: usize) -> String {
            let mut source = String::from("package p\n\nfunc f() {\n\tx0 := 1\n\tx1 := 1\n");
            for i in 2..length {
                source.push_str(&format!("\tx{} := x{} + x{}\n", i, i - 1, i - 2));
            }
            source.push_str("}\n");
            let ast = GoParser::new().unwrap().parse_str(&source).unwrap();
            dump(&ast, RenderOptions::default())
        }

        let short = chain(20).lines().count();
        let long = chain(40).lines().count();
        assert!(short < 1_000, "20 statements rendered {} lines", short);
        assert!(long < short * 3, "{} lines grew to {}", short, long);
    }

    #[test]
    fn test_spread_call_is_marked() {
        let mut ast = Ast::new();
        let fun = ast.ident("f");
        let arg = ast.ident("xs");
        let call = ast.alloc(Node::Call {
            fun,
            args: vec![arg],
            ellipsis: true,
        });

        let output = render_node(&ast, call);
        assert!(output.starts_with("Call ellipsis\n  Call Fun:\n"));
    }

    #[test]
    fn test_parsed_statement_forms_render() {
        let source = r#"package p

func f(v interface{}, ch chan int, xs []int) {
	switch t := v.(type) {
	case int, string:
		_ = t
	}
	select {
	case n := <-ch:
		_ = n
	}
	for k := range xs {
		_ = k
	}
}
"#;
        let ast = GoParser::new().unwrap().parse_str(source).unwrap();
        let output = dump(&ast, RenderOptions::default());

        assert!(output.contains("- TypeSwitch\n"));
        assert!(output.contains("TypeSwitch Init:\n"));
        assert!(output.contains("Object Decl:\n"));
        assert!(output.contains("TypeSwitch <recursive reference>"));
        assert!(output.contains("- CommClause\n"));
        assert!(output.contains("Range tok=:="));
        assert!(output.contains("Range <recursive reference>"));
        assert!(!output.contains("Bad {"));
        assert!(!output.contains("name=\",\""));
    }
}
