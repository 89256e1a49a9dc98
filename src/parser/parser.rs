//! Go front end built on `tree-sitter-go`.
//!
//! The concrete syntax tree is lowered into the closed [`Node`] set. While
//! lowering, identifiers are bound to the [`Object`] they resolve to within
//! the file, the way the Go toolchain's own parser does: file-scope names are
//! declared up front so forward references bind, everything else follows
//! block structure.

use tracing::{debug, warn};
use tree_sitter::{Node as TsNode, Parser as TsParser};

use crate::error::{GoastError, Result};
use crate::parser::scope::ScopeStack;
use crate::parser::types::*;

/// Parser that owns a tree-sitter instance loaded with the Go grammar.
pub struct GoParser {
    parser: TsParser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|err| GoastError::Grammar(err.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse a whole Go source file. Any syntax error fails the parse; no
    /// partial tree is returned.
    pub fn parse_str(&mut self, source: &str) -> Result<Ast> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| GoastError::Parse {
                line: 1,
                column: 1,
                message: "parser produced no syntax tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root, source));
        }

        let ast = Lowering::new(source).file(root);
        debug!(
            nodes = ast.node_count(),
            objects = ast.object_count(),
            decls = ast.decls.len(),
            "lowered Go source"
        );
        Ok(ast)
    }
}

fn syntax_error(root: TsNode, source: &str) -> GoastError {
    let node = first_error(root).unwrap_or(root);
    let position = node.start_position();

    let message = if node.is_missing() {
        format!("expected {}", node.kind())
    } else {
        let snippet: String = source[node.byte_range()]
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .chars()
            .take(24)
            .collect();
        if snippet.is_empty() {
            "syntax error".to_string()
        } else {
            format!("syntax error near {:?}", snippet)
        }
    };

    GoastError::Parse {
        line: position.row + 1,
        column: position.column + 1,
        message,
    }
}

fn first_error(node: TsNode) -> Option<TsNode> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

// Named children without comments.
fn named<'t>(node: TsNode<'t>) -> Vec<TsNode<'t>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();
    children
}

// A comma-separated field also yields its `,` tokens; only named nodes count.
fn field_all<'t>(node: TsNode<'t>, field: &str) -> Vec<TsNode<'t>> {
    let mut cursor = node.walk();
    let children = node
        .children_by_field_name(field, &mut cursor)
        .filter(|child| child.is_named())
        .collect();
    children
}

fn list_items<'t>(node: TsNode<'t>) -> Vec<TsNode<'t>> {
    if node.kind() == "expression_list" {
        named(node)
    } else {
        vec![node]
    }
}

fn token_of(node: TsNode, tokens: &[&'static str]) -> Option<&'static str> {
    let mut cursor = node.walk();
    let kinds: Vec<&'static str> = node.children(&mut cursor).map(|child| child.kind()).collect();
    kinds
        .into_iter()
        .find_map(|kind| tokens.iter().copied().find(|token| *token == kind))
}

fn spec_nodes<'t>(node: TsNode<'t>) -> Vec<TsNode<'t>> {
    let mut specs = Vec::new();
    for child in named(node) {
        match child.kind() {
            "import_spec_list" | "const_spec_list" | "var_spec_list" | "type_spec_list" => {
                specs.extend(spec_nodes(child));
            }
            "import_spec" | "const_spec" | "var_spec" | "type_spec" | "type_alias" => {
                specs.push(child);
            }
            _ => {}
        }
    }
    specs
}

struct Lowering<'s> {
    source: &'s str,
    ast: Ast,
    scopes: ScopeStack,
}

impl<'s> Lowering<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            ast: Ast::new(),
            scopes: ScopeStack::new(),
        }
    }

    fn text(&self, node: TsNode) -> &'s str {
        let source: &'s str = self.source;
        &source[node.byte_range()]
    }

    fn file(mut self, root: TsNode) -> Ast {
        let top = named(root);
        for node in &top {
            self.predeclare(*node);
        }

        let mut decls = Vec::new();
        for node in top {
            match node.kind() {
                "package_clause" => {
                    self.ast.package = named(node).first().map(|name| self.text(*name).to_string());
                }
                "import_declaration" | "const_declaration" | "var_declaration"
                | "type_declaration" => decls.push(self.gen_decl(node)),
                "function_declaration" | "method_declaration" => decls.push(self.function(node)),
                _ => decls.push(self.bad(node)),
            }
        }

        self.ast.decls = decls;
        self.ast
    }

    // Declares every file-scope name before any body is lowered.
    fn predeclare(&mut self, node: TsNode) {
        match node.kind() {
            "function_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let name = self.text(name);
                    if name != "init" {
                        self.new_object(ObjKind::Fun, name);
                    }
                }
            }
            "const_declaration" | "var_declaration" | "type_declaration" => {
                let kind = match node.kind() {
                    "const_declaration" => ObjKind::Con,
                    "var_declaration" => ObjKind::Var,
                    _ => ObjKind::Typ,
                };
                for spec in spec_nodes(node) {
                    for name in field_all(spec, "name") {
                        let name = self.text(name);
                        self.new_object(kind, name);
                    }
                }
            }
            _ => {}
        }
    }

    fn bad(&mut self, node: TsNode) -> NodeId {
        warn!(
            kind = node.kind(),
            line = node.start_position().row + 1,
            "unsupported Go syntax"
        );
        let syntax = self.text(node).chars().take(40).collect();
        self.ast.alloc(Node::Bad { syntax })
    }

    // -- binding ----------------------------------------------------------

    fn new_object(&mut self, kind: ObjKind, name: &str) -> Option<ObjectId> {
        if name == "_" {
            return None;
        }
        let id = self.ast.alloc_object(Object::new(kind, name));
        self.scopes.insert(name, id);
        Some(id)
    }

    /// Lowers a declaring identifier. At file scope the object created by
    /// `predeclare` is reused.
    fn declare(&mut self, node: TsNode, kind: ObjKind) -> (NodeId, Option<ObjectId>) {
        let name = self.text(node);
        if name == "_" {
            return (self.ast.ident(name), None);
        }

        let predeclared = self
            .scopes
            .lookup_local(name)
            .filter(|id| self.scopes.is_file_scope() && self.ast.object(*id).decl.is_none());
        let object = match predeclared {
            Some(id) => Some(id),
            None => self.new_object(kind, name),
        };

        let ident = self.ast.alloc(Node::Identifier {
            name: name.to_string(),
            obj: object,
        });
        (ident, object)
    }

    /// `:=` target: declares the name unless the innermost scope has it.
    fn define(&mut self, node: TsNode) -> (NodeId, Option<ObjectId>) {
        let name = self.text(node);
        if node.kind() == "identifier" && name != "_" && self.scopes.lookup_local(name).is_none() {
            let object = self.new_object(ObjKind::Var, name);
            let ident = self.ast.alloc(Node::Identifier {
                name: name.to_string(),
                obj: object,
            });
            return (ident, object);
        }
        (self.expr(node), None)
    }

    fn set_decl(&mut self, objects: &[ObjectId], decl: NodeId) {
        for object in objects {
            self.ast.object_mut(*object).decl = Some(decl);
        }
    }

    fn resolve(&mut self, node: TsNode) -> NodeId {
        let name = self.text(node);
        let obj = if name == "_" {
            None
        } else {
            self.scopes.lookup(name)
        };
        self.ast.alloc(Node::Identifier {
            name: name.to_string(),
            obj,
        })
    }

    fn plain(&mut self, node: TsNode) -> NodeId {
        let name = self.text(node);
        self.ast.ident(name)
    }

    // -- declarations -----------------------------------------------------

    fn gen_decl(&mut self, node: TsNode) -> NodeId {
        let tok = match node.kind() {
            "import_declaration" => DeclToken::Import,
            "const_declaration" => DeclToken::Const,
            "var_declaration" => DeclToken::Var,
            _ => DeclToken::Type,
        };

        let mut specs = Vec::new();
        for (iota, spec) in spec_nodes(node).into_iter().enumerate() {
            let id = match spec.kind() {
                "import_spec" => self.import_spec(spec),
                "const_spec" => self.value_spec(spec, ObjKind::Con, Some(iota)),
                "var_spec" => self.value_spec(spec, ObjKind::Var, None),
                _ => self.type_spec(spec),
            };
            specs.push(id);
        }

        self.ast.alloc(Node::GroupedDecl { tok, specs })
    }

    fn import_spec(&mut self, spec: TsNode) -> NodeId {
        let name = spec.child_by_field_name("name").map(|name| self.plain(name));
        let path = match spec.child_by_field_name("path") {
            Some(path) => {
                let text = self.text(path);
                self.ast.basic_lit(LitKind::String, text)
            }
            None => self.bad(spec),
        };
        let comment = self.trailing_comment(spec);
        self.ast.alloc(Node::ImportSpec {
            name,
            path,
            comment,
        })
    }

    fn value_spec(&mut self, spec: TsNode, kind: ObjKind, iota: Option<usize>) -> NodeId {
        let ty = spec.child_by_field_name("type").map(|ty| self.type_expr(ty));
        let values = spec
            .child_by_field_name("value")
            .map(|value| self.expr_list(value))
            .unwrap_or_default();

        let mut names = Vec::new();
        let mut objects = Vec::new();
        for name in field_all(spec, "name") {
            let (ident, object) = self.declare(name, kind);
            names.push(ident);
            objects.extend(object);
        }
        if let Some(iota) = iota {
            for object in &objects {
                self.ast.object_mut(*object).data = Some(ObjData::Iota(iota));
            }
        }

        let comment = self.trailing_comment(spec);
        let id = self.ast.alloc(Node::ValueSpec {
            names,
            ty,
            values,
            comment,
        });
        self.set_decl(&objects, id);
        id
    }

    fn type_spec(&mut self, spec: TsNode) -> NodeId {
        let (name, object) = match spec.child_by_field_name("name") {
            Some(name) => self.declare(name, ObjKind::Typ),
            None => (self.bad(spec), None),
        };
        let ty = self.field_type(spec, "type");
        let comment = self.trailing_comment(spec);
        let id = self.ast.alloc(Node::TypeSpec {
            name,
            alias: spec.kind() == "type_alias",
            ty,
            comment,
        });
        if let Some(object) = object {
            self.set_decl(&[object], id);
        }
        id
    }

    // A line comment starting on the row where this declaration ends.
    fn trailing_comment(&self, node: TsNode) -> Option<String> {
        let row = node.end_position().row;
        let mut current = node;
        loop {
            if let Some(next) = current.next_named_sibling() {
                let attached = next.kind() == "comment" && next.start_position().row == row;
                return attached.then(|| self.text(next).to_string());
            }
            let parent = current.parent()?;
            if !(parent.kind().ends_with("_declaration") || parent.kind().ends_with("_spec_list")) {
                return None;
            }
            current = parent;
        }
    }

    fn function(&mut self, node: TsNode) -> NodeId {
        let is_method = node.kind() == "method_declaration";
        let (name, object) = match node.child_by_field_name("name") {
            Some(name) if !is_method && self.text(name) != "init" => self.declare(name, ObjKind::Fun),
            Some(name) => (self.plain(name), None),
            None => (self.bad(node), None),
        };

        self.scopes.open();
        let recv = node
            .child_by_field_name("receiver")
            .map(|list| self.fields(list, true))
            .unwrap_or_default();
        let params = node
            .child_by_field_name("parameters")
            .map(|list| self.fields(list, true))
            .unwrap_or_default();
        let results = node
            .child_by_field_name("result")
            .map(|result| self.results(result, true))
            .unwrap_or_default();
        let body = node
            .child_by_field_name("body")
            .map(|body| self.function_body(body));
        self.scopes.close();

        let id = self.ast.alloc(Node::Function {
            recv,
            name,
            params,
            results,
            body,
        });
        if let Some(object) = object {
            self.set_decl(&[object], id);
        }
        id
    }

    fn fields(&mut self, list: TsNode, declare: bool) -> Vec<NodeId> {
        let mut fields = Vec::new();
        for param in named(list) {
            let variadic = match param.kind() {
                "parameter_declaration" => false,
                "variadic_parameter_declaration" => true,
                _ => continue,
            };

            let mut ty = self.field_type(param, "type");
            if variadic {
                ty = self.ast.alloc(Node::Ellipsis { elt: Some(ty) });
            }

            let mut names = Vec::new();
            let mut objects = Vec::new();
            for name in field_all(param, "name") {
                if declare {
                    let (ident, object) = self.declare(name, ObjKind::Var);
                    names.push(ident);
                    objects.extend(object);
                } else {
                    names.push(self.plain(name));
                }
            }

            let id = self.ast.alloc(Node::Field { names, ty });
            self.set_decl(&objects, id);
            fields.push(id);
        }
        fields
    }

    fn results(&mut self, result: TsNode, declare: bool) -> Vec<NodeId> {
        if result.kind() == "parameter_list" {
            return self.fields(result, declare);
        }
        let ty = self.type_expr(result);
        vec![self.ast.alloc(Node::Field {
            names: Vec::new(),
            ty,
        })]
    }

    // -- statements -------------------------------------------------------

    // Function bodies share the scope of the parameters.
    fn function_body(&mut self, node: TsNode) -> NodeId {
        let list = self.statements_except(node, &[]);
        self.ast.alloc(Node::Block { list })
    }

    fn block(&mut self, node: TsNode) -> NodeId {
        self.scopes.open();
        let list = self.statements_except(node, &[]);
        self.scopes.close();
        self.ast.alloc(Node::Block { list })
    }

    fn statements_except(&mut self, node: TsNode, skip: &[usize]) -> Vec<NodeId> {
        let mut list = Vec::new();
        for child in named(node) {
            if skip.contains(&child.id()) {
                continue;
            }
            if child.kind() == "statement_list" {
                list.extend(self.statements_except(child, &[]));
            } else {
                list.push(self.statement(child));
            }
        }
        list
    }

    fn statement(&mut self, node: TsNode) -> NodeId {
        match node.kind() {
            "expression_statement" => {
                let x = self.first_expr(node);
                self.ast.alloc(Node::ExprStmt { x })
            }
            "send_statement" => {
                let chan = self.field_expr(node, "channel");
                let value = self.field_expr(node, "value");
                self.ast.alloc(Node::Send { chan, value })
            }
            "inc_statement" | "dec_statement" => {
                let x = self.first_expr(node);
                let tok = if node.kind() == "inc_statement" { "++" } else { "--" };
                self.ast.alloc(Node::IncDec {
                    x,
                    tok: tok.to_string(),
                })
            }
            "assignment_statement" => {
                let lhs = self.field_list(node, "left");
                let tok = node
                    .child_by_field_name("operator")
                    .map(|op| self.text(op).to_string())
                    .unwrap_or_else(|| "=".to_string());
                let rhs = self.field_list(node, "right");
                self.ast.alloc(Node::Assign { lhs, tok, rhs })
            }
            "short_var_declaration" => self.short_var_decl(node),
            "receive_statement" => self.receive(node),
            "return_statement" => {
                let mut results = Vec::new();
                for child in named(node) {
                    results.extend(self.expr_list(child));
                }
                self.ast.alloc(Node::Return { results })
            }
            "go_statement" => {
                let call = self.first_expr(node);
                self.ast.alloc(Node::Go { call })
            }
            "defer_statement" => {
                let call = self.first_expr(node);
                self.ast.alloc(Node::Defer { call })
            }
            "if_statement" => self.if_statement(node),
            "for_statement" => self.for_statement(node),
            "expression_switch_statement" => self.switch(node),
            "type_switch_statement" => self.type_switch(node),
            "select_statement" => self.select(node),
            "labeled_statement" => {
                let label = node
                    .child_by_field_name("label")
                    .map(|label| self.text(label).to_string())
                    .unwrap_or_default();
                let inner = named(node)
                    .into_iter()
                    .find(|child| child.kind() != "label_name");
                let stmt = match inner {
                    Some(inner) => self.statement(inner),
                    None => self.ast.alloc(Node::Empty),
                };
                self.ast.alloc(Node::Labeled { label, stmt })
            }
            "break_statement" | "continue_statement" | "goto_statement" | "fallthrough_statement" => {
                let tok = node.kind().trim_end_matches("_statement").to_string();
                let label = named(node)
                    .first()
                    .map(|label| self.text(*label).to_string());
                self.ast.alloc(Node::Branch { tok, label })
            }
            "const_declaration" | "var_declaration" | "type_declaration" => {
                let decl = self.gen_decl(node);
                self.ast.alloc(Node::DeclStmt { decl })
            }
            "block" => self.block(node),
            "empty_statement" => self.ast.alloc(Node::Empty),
            _ => self.bad(node),
        }
    }

    fn short_var_decl(&mut self, node: TsNode) -> NodeId {
        // Right-hand side resolves before the new names exist.
        let rhs = self.field_list(node, "right");

        let mut lhs = Vec::new();
        let mut objects = Vec::new();
        if let Some(left) = node.child_by_field_name("left") {
            for target in list_items(left) {
                let (ident, object) = self.define(target);
                lhs.push(ident);
                objects.extend(object);
            }
        }

        let id = self.ast.alloc(Node::Assign {
            lhs,
            tok: ":=".to_string(),
            rhs,
        });
        self.set_decl(&objects, id);
        id
    }

    fn receive(&mut self, node: TsNode) -> NodeId {
        let right = self.field_expr(node, "right");
        let Some(left) = node.child_by_field_name("left") else {
            return self.ast.alloc(Node::ExprStmt { x: right });
        };

        let tok = token_of(node, &[":=", "="]).unwrap_or("=");
        let mut lhs = Vec::new();
        let mut objects = Vec::new();
        for target in list_items(left) {
            if tok == ":=" {
                let (ident, object) = self.define(target);
                lhs.push(ident);
                objects.extend(object);
            } else {
                lhs.push(self.expr(target));
            }
        }

        let id = self.ast.alloc(Node::Assign {
            lhs,
            tok: tok.to_string(),
            rhs: vec![right],
        });
        self.set_decl(&objects, id);
        id
    }

    fn if_statement(&mut self, node: TsNode) -> NodeId {
        self.scopes.open();
        let init = node
            .child_by_field_name("initializer")
            .map(|init| self.statement(init));
        let cond = self.field_expr(node, "condition");
        let body = match node.child_by_field_name("consequence") {
            Some(body) => self.block(body),
            None => self.bad(node),
        };
        let else_branch = node
            .child_by_field_name("alternative")
            .map(|alt| self.statement(alt));
        self.scopes.close();

        self.ast.alloc(Node::If {
            init,
            cond,
            body,
            else_branch,
        })
    }

    fn for_statement(&mut self, node: TsNode) -> NodeId {
        self.scopes.open();
        let body_node = node.child_by_field_name("body");

        let mut init = None;
        let mut cond = None;
        let mut post = None;
        let mut range_clause = None;
        for child in named(node) {
            if Some(child.id()) == body_node.map(|body| body.id()) {
                continue;
            }
            match child.kind() {
                "for_clause" => {
                    init = child
                        .child_by_field_name("initializer")
                        .map(|init| self.statement(init));
                    cond = child
                        .child_by_field_name("condition")
                        .map(|cond| self.expr(cond));
                    post = child
                        .child_by_field_name("update")
                        .map(|post| self.statement(post));
                }
                "range_clause" => range_clause = Some(child),
                _ => cond = Some(self.expr(child)),
            }
        }

        let id = match range_clause {
            Some(clause) => self.range(clause, body_node),
            None => {
                let body = match body_node {
                    Some(body) => self.block(body),
                    None => self.bad(node),
                };
                self.ast.alloc(Node::For {
                    init,
                    cond,
                    post,
                    body,
                })
            }
        };
        self.scopes.close();
        id
    }

    fn range(&mut self, clause: TsNode, body: Option<TsNode>) -> NodeId {
        let tok = token_of(clause, &[":=", "="]);
        let x = self.field_expr(clause, "right");

        let mut targets = Vec::new();
        let mut objects = Vec::new();
        if let Some(left) = clause.child_by_field_name("left") {
            for target in list_items(left) {
                if tok == Some(":=") {
                    let (ident, object) = self.define(target);
                    targets.push(ident);
                    objects.extend(object);
                } else {
                    targets.push(self.expr(target));
                }
            }
        }

        let body = match body {
            Some(body) => self.block(body),
            None => self.bad(clause),
        };
        let id = self.ast.alloc(Node::Range {
            key: targets.first().copied(),
            value: targets.get(1).copied(),
            tok: tok.map(str::to_string),
            x,
            body,
        });
        self.set_decl(&objects, id);
        id
    }

    fn switch(&mut self, node: TsNode) -> NodeId {
        self.scopes.open();
        let init = node
            .child_by_field_name("initializer")
            .map(|init| self.statement(init));
        let tag = node.child_by_field_name("value").map(|tag| self.expr(tag));

        let mut clauses = Vec::new();
        for child in named(node) {
            if matches!(child.kind(), "expression_case" | "default_case") {
                clauses.push(self.case_clause(child));
            }
        }
        let body = self.ast.alloc(Node::Block { list: clauses });
        self.scopes.close();

        self.ast.alloc(Node::Switch { init, tag, body })
    }

    fn case_clause(&mut self, node: TsNode) -> NodeId {
        self.scopes.open();
        let value = node.child_by_field_name("value");
        let list = value.map(|value| self.expr_list(value)).unwrap_or_default();
        let skip: Vec<usize> = value.iter().map(|value| value.id()).collect();
        let body = self.statements_except(node, &skip);
        self.scopes.close();

        self.ast.alloc(Node::CaseClause {
            list,
            body,
            default: node.kind() == "default_case",
        })
    }

    fn type_switch(&mut self, node: TsNode) -> NodeId {
        self.scopes.open();
        let init = node
            .child_by_field_name("initializer")
            .map(|init| self.statement(init));

        let x = self.field_expr(node, "value");
        let assert = self.ast.alloc(Node::TypeAssert { x, ty: None });
        let alias = node.child_by_field_name("alias");
        let assign = match alias {
            Some(alias) => {
                let mut lhs = Vec::new();
                for target in list_items(alias) {
                    lhs.push(self.plain(target));
                }
                self.ast.alloc(Node::Assign {
                    lhs,
                    tok: ":=".to_string(),
                    rhs: vec![assert],
                })
            }
            None => self.ast.alloc(Node::ExprStmt { x: assert }),
        };
        let alias_name = alias
            .and_then(|alias| list_items(alias).first().copied())
            .map(|name| self.text(name));

        // The alias is redeclared in every clause.
        let mut clauses = Vec::new();
        let mut objects = Vec::new();
        for child in named(node) {
            if !matches!(child.kind(), "type_case" | "default_case") {
                continue;
            }
            self.scopes.open();
            let types = field_all(child, "type");
            let mut list = Vec::new();
            for ty in &types {
                list.push(self.type_expr(*ty));
            }
            if let Some(name) = alias_name {
                objects.extend(self.new_object(ObjKind::Var, name));
            }
            let skip: Vec<usize> = types.iter().map(|ty| ty.id()).collect();
            let body = self.statements_except(child, &skip);
            self.scopes.close();

            clauses.push(self.ast.alloc(Node::CaseClause {
                list,
                body,
                default: child.kind() == "default_case",
            }));
        }
        let body = self.ast.alloc(Node::Block { list: clauses });
        self.scopes.close();

        let id = self.ast.alloc(Node::TypeSwitch { init, assign, body });
        self.set_decl(&objects, id);
        id
    }

    fn select(&mut self, node: TsNode) -> NodeId {
        let mut clauses = Vec::new();
        for child in named(node) {
            if !matches!(child.kind(), "communication_case" | "default_case") {
                continue;
            }
            self.scopes.open();
            let comm_node = child.child_by_field_name("communication");
            let comm = comm_node.map(|comm| self.statement(comm));
            let skip: Vec<usize> = comm_node.iter().map(|comm| comm.id()).collect();
            let body = self.statements_except(child, &skip);
            self.scopes.close();
            clauses.push(self.ast.alloc(Node::CommClause { comm, body }));
        }
        let body = self.ast.alloc(Node::Block { list: clauses });
        self.ast.alloc(Node::Select { body })
    }

    // -- expressions ------------------------------------------------------

    fn field_expr(&mut self, node: TsNode, field: &str) -> NodeId {
        match node.child_by_field_name(field) {
            Some(child) => self.expr(child),
            None => self.bad(node),
        }
    }

    fn field_type(&mut self, node: TsNode, field: &str) -> NodeId {
        match node.child_by_field_name(field) {
            Some(child) => self.type_expr(child),
            None => self.bad(node),
        }
    }

    fn field_list(&mut self, node: TsNode, field: &str) -> Vec<NodeId> {
        node.child_by_field_name(field)
            .map(|list| self.expr_list(list))
            .unwrap_or_default()
    }

    fn first_expr(&mut self, node: TsNode) -> NodeId {
        match named(node).first() {
            Some(child) => self.expr(*child),
            None => self.bad(node),
        }
    }

    fn expr_list(&mut self, node: TsNode) -> Vec<NodeId> {
        let mut exprs = Vec::new();
        for item in list_items(node) {
            exprs.push(self.expr(item));
        }
        exprs
    }

    fn literal(&mut self, node: TsNode, kind: LitKind) -> NodeId {
        let text = self.text(node);
        self.ast.basic_lit(kind, text)
    }

    fn expr(&mut self, node: TsNode) -> NodeId {
        match node.kind() {
            "identifier" | "type_identifier" | "true" | "false" | "nil" | "iota" => {
                self.resolve(node)
            }
            "field_identifier" | "package_identifier" | "label_name" | "blank_identifier" => {
                self.plain(node)
            }
            "int_literal" => self.literal(node, LitKind::Int),
            "float_literal" => self.literal(node, LitKind::Float),
            "imaginary_literal" => self.literal(node, LitKind::Imag),
            "rune_literal" => self.literal(node, LitKind::Char),
            "interpreted_string_literal" | "raw_string_literal" => {
                self.literal(node, LitKind::String)
            }
            "parenthesized_expression" => {
                let x = self.first_expr(node);
                self.ast.alloc(Node::Paren { x })
            }
            "call_expression" => self.call(node),
            "selector_expression" => {
                let x = self.field_expr(node, "operand");
                let sel = match node.child_by_field_name("field") {
                    Some(field) => self.plain(field),
                    None => self.bad(node),
                };
                self.ast.alloc(Node::Selector { x, sel })
            }
            "index_expression" => {
                let x = self.field_expr(node, "operand");
                let index = self.field_expr(node, "index");
                self.ast.alloc(Node::Index { x, index })
            }
            "slice_expression" => {
                let x = self.field_expr(node, "operand");
                let low = node.child_by_field_name("start").map(|low| self.expr(low));
                let high = node.child_by_field_name("end").map(|high| self.expr(high));
                let max = node.child_by_field_name("capacity").map(|max| self.expr(max));
                self.ast.alloc(Node::Slice { x, low, high, max })
            }
            "type_assertion_expression" => {
                let x = self.field_expr(node, "operand");
                let ty = Some(self.field_type(node, "type"));
                self.ast.alloc(Node::TypeAssert { x, ty })
            }
            "type_conversion_expression" => {
                let fun = self.field_type(node, "type");
                let arg = self.field_expr(node, "operand");
                self.ast.alloc(Node::Call {
                    fun,
                    args: vec![arg],
                    ellipsis: false,
                })
            }
            "unary_expression" => {
                let op = node
                    .child_by_field_name("operator")
                    .map(|op| self.text(op).to_string())
                    .unwrap_or_default();
                let x = self.field_expr(node, "operand");
                if op == "*" {
                    self.ast.alloc(Node::Star { x })
                } else {
                    self.ast.alloc(Node::Unary { op, x })
                }
            }
            "binary_expression" => {
                let x = self.field_expr(node, "left");
                let op = node
                    .child_by_field_name("operator")
                    .map(|op| self.text(op).to_string())
                    .unwrap_or_default();
                let y = self.field_expr(node, "right");
                self.ast.alloc(Node::Binary { x, op, y })
            }
            "composite_literal" => {
                let ty = node.child_by_field_name("type").map(|ty| self.type_expr(ty));
                let elts = node
                    .child_by_field_name("body")
                    .map(|body| self.literal_elements(body))
                    .unwrap_or_default();
                self.ast.alloc(Node::CompositeLiteral { ty, elts })
            }
            "literal_value" => {
                let elts = self.literal_elements(node);
                self.ast.alloc(Node::CompositeLiteral { ty: None, elts })
            }
            "func_literal" => self.func_lit(node),
            "qualified_type" | "pointer_type" | "array_type" | "implicit_length_array_type"
            | "slice_type" | "map_type" | "channel_type" | "function_type" | "struct_type"
            | "interface_type" | "generic_type" | "parenthesized_type" | "negated_type" => {
                self.type_expr(node)
            }
            _ => self.bad(node),
        }
    }

    fn call(&mut self, node: TsNode) -> NodeId {
        let fun = self.field_expr(node, "function");

        let mut args = Vec::new();
        let mut ellipsis = false;
        if let Some(list) = node.child_by_field_name("arguments") {
            ellipsis = token_of(list, &["..."]).is_some();
            for arg in named(list) {
                if arg.kind() == "variadic_argument" {
                    ellipsis = true;
                    args.push(self.first_expr(arg));
                } else {
                    args.push(self.expr(arg));
                }
            }
        }

        self.ast.alloc(Node::Call {
            fun,
            args,
            ellipsis,
        })
    }

    fn func_lit(&mut self, node: TsNode) -> NodeId {
        self.scopes.open();
        let params = node
            .child_by_field_name("parameters")
            .map(|list| self.fields(list, true))
            .unwrap_or_default();
        let results = node
            .child_by_field_name("result")
            .map(|result| self.results(result, true))
            .unwrap_or_default();
        let body = match node.child_by_field_name("body") {
            Some(body) => self.function_body(body),
            None => self.bad(node),
        };
        self.scopes.close();

        let ty = self.ast.alloc(Node::FuncType { params, results });
        self.ast.alloc(Node::FuncLit { ty, body })
    }

    fn literal_elements(&mut self, node: TsNode) -> Vec<NodeId> {
        let mut elts = Vec::new();
        for child in named(node) {
            if child.kind() != "keyed_element" {
                elts.push(self.element(child));
                continue;
            }
            let parts = named(child);
            let id = match (parts.first(), parts.last()) {
                (Some(key), Some(value)) if parts.len() >= 2 => {
                    let key = self.element_key(*key);
                    let value = self.element(*value);
                    self.ast.alloc(Node::KeyValue { key, value })
                }
                _ => self.bad(child),
            };
            elts.push(id);
        }
        elts
    }

    fn element(&mut self, node: TsNode) -> NodeId {
        match node.kind() {
            "literal_element" | "element" => match named(node).first() {
                Some(inner) => self.element(*inner),
                None => self.bad(node),
            },
            "literal_value" => {
                let elts = self.literal_elements(node);
                self.ast.alloc(Node::CompositeLiteral { ty: None, elts })
            }
            _ => self.expr(node),
        }
    }

    // Keys that are bare names may be struct fields, so they are never resolved.
    fn element_key(&mut self, node: TsNode) -> NodeId {
        let inner = match node.kind() {
            "literal_element" | "element" => named(node).first().copied().unwrap_or(node),
            _ => node,
        };
        match inner.kind() {
            "identifier" | "field_identifier" => self.plain(inner),
            _ => self.element(inner),
        }
    }

    // -- types ------------------------------------------------------------

    fn type_expr(&mut self, node: TsNode) -> NodeId {
        match node.kind() {
            "type_identifier" | "identifier" => self.resolve(node),
            "qualified_type" => {
                let x = match node.child_by_field_name("package") {
                    Some(package) => self.plain(package),
                    None => self.bad(node),
                };
                let sel = match node.child_by_field_name("name") {
                    Some(name) => self.plain(name),
                    None => self.bad(node),
                };
                self.ast.alloc(Node::Selector { x, sel })
            }
            "pointer_type" => {
                let x = match named(node).first() {
                    Some(inner) => self.type_expr(*inner),
                    None => self.bad(node),
                };
                self.ast.alloc(Node::Star { x })
            }
            "array_type" => {
                let len = Some(self.field_expr(node, "length"));
                let elt = self.field_type(node, "element");
                self.ast.alloc(Node::ArrayType { len, elt })
            }
            "implicit_length_array_type" => {
                let len = Some(self.ast.alloc(Node::Ellipsis { elt: None }));
                let elt = self.field_type(node, "element");
                self.ast.alloc(Node::ArrayType { len, elt })
            }
            "slice_type" => {
                let elt = self.field_type(node, "element");
                self.ast.alloc(Node::ArrayType { len: None, elt })
            }
            "map_type" => {
                let key = self.field_type(node, "key");
                let value = self.field_type(node, "value");
                self.ast.alloc(Node::MapType { key, value })
            }
            "channel_type" => {
                let mut cursor = node.walk();
                let tokens: Vec<&str> = node.children(&mut cursor).map(|child| child.kind()).collect();
                let dir = match tokens.iter().position(|kind| *kind == "<-") {
                    Some(0) => ChanDir::Recv,
                    Some(_) => ChanDir::Send,
                    None => ChanDir::Both,
                };
                let value = self.field_type(node, "value");
                self.ast.alloc(Node::ChanType { dir, value })
            }
            "function_type" => {
                let params = node
                    .child_by_field_name("parameters")
                    .map(|list| self.fields(list, false))
                    .unwrap_or_default();
                let results = node
                    .child_by_field_name("result")
                    .map(|result| self.results(result, false))
                    .unwrap_or_default();
                self.ast.alloc(Node::FuncType { params, results })
            }
            "struct_type" => {
                let fields = self.struct_fields(node);
                self.ast.alloc(Node::StructType { fields })
            }
            "interface_type" => {
                let methods = self.interface_elems(node);
                self.ast.alloc(Node::InterfaceType { methods })
            }
            "generic_type" => {
                let x = self.field_type(node, "type");
                let index = match node
                    .child_by_field_name("type_arguments")
                    .and_then(|args| named(args).first().copied())
                {
                    Some(arg) => self.type_expr(arg),
                    None => self.bad(node),
                };
                self.ast.alloc(Node::Index { x, index })
            }
            "parenthesized_type" => {
                let x = match named(node).first() {
                    Some(inner) => self.type_expr(*inner),
                    None => self.bad(node),
                };
                self.ast.alloc(Node::Paren { x })
            }
            "negated_type" => {
                let x = match named(node).first() {
                    Some(inner) => self.type_expr(*inner),
                    None => self.bad(node),
                };
                self.ast.alloc(Node::Unary {
                    op: "~".to_string(),
                    x,
                })
            }
            _ => self.expr(node),
        }
    }

    fn struct_fields(&mut self, node: TsNode) -> Vec<NodeId> {
        let mut fields = Vec::new();
        for list in named(node) {
            if list.kind() != "field_declaration_list" {
                continue;
            }
            for decl in named(list) {
                if decl.kind() != "field_declaration" {
                    continue;
                }
                let mut names = Vec::new();
                for name in field_all(decl, "name") {
                    names.push(self.plain(name));
                }
                let ty = self.field_type(decl, "type");
                fields.push(self.ast.alloc(Node::Field { names, ty }));
            }
        }
        fields
    }

    fn interface_elems(&mut self, node: TsNode) -> Vec<NodeId> {
        let mut methods = Vec::new();
        for elem in named(node) {
            let id = match elem.child_by_field_name("name") {
                Some(name) => {
                    let names = vec![self.plain(name)];
                    let params = elem
                        .child_by_field_name("parameters")
                        .map(|list| self.fields(list, false))
                        .unwrap_or_default();
                    let results = elem
                        .child_by_field_name("result")
                        .map(|result| self.results(result, false))
                        .unwrap_or_default();
                    let ty = self.ast.alloc(Node::FuncType { params, results });
                    self.ast.alloc(Node::Field { names, ty })
                }
                None => {
                    let ty = match named(elem).first() {
                        Some(inner) => self.type_expr(*inner),
                        None => self.bad(elem),
                    };
                    self.ast.alloc(Node::Field {
                        names: Vec::new(),
                        ty,
                    })
                }
            };
            methods.push(id);
        }
        methods
    }
}
