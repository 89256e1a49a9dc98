use std::collections::HashSet;

use tracing::trace;

use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::traits::*;

/// What a list of children holds. Only a root `Decls` sequence gets
/// separators between its elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqKind {
    Decls,
    Stmts,
    Exprs,
    Specs,
    Idents,
}

/// One unit of work for the dispatcher.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Node(NodeId),
    /// An absent optional child. Rendered as a `nil` line so every named
    /// slot stays visible.
    Missing,
    Object(ObjectId),
    Sequence(SeqKind, &'a [NodeId]),
}

impl<'a> From<Option<NodeId>> for Target<'a> {
    fn from(child: Option<NodeId>) -> Self {
        match child {
            Some(id) => Target::Node(id),
            None => Target::Missing,
        }
    }
}

/// Depth-first dumper for one [`Ast`].
///
/// Every node kind with a specific rule below expands its named children
/// under labeled sub-headers; everything else gets the one-line fallback.
/// The set of nodes on the active path stops an object's declaration site
/// from being expanded inside itself. An object's declaration site is
/// expanded at most once per pass; later uses print a one-line marker, so
/// output stays linear in the size of the tree.
pub struct TreeRenderer<'a> {
    ast: &'a Ast,
    options: RenderOptions,
    output: String,
    active: HashSet<NodeId>,
    expanded: HashSet<ObjectId>,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self {
            ast,
            options: RenderOptions::default(),
            output: String::new(),
            active: HashSet::new(),
            expanded: HashSet::new(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Render the file's top-level declarations.
    pub fn render_file(self) -> String {
        let ast = self.ast;
        self.render_target(Target::Sequence(SeqKind::Decls, &ast.decls), RenderContext::new())
    }

    pub fn render_target(mut self, target: Target<'a>, context: RenderContext) -> String {
        self.render(target, context);
        self.output
    }

    fn render(&mut self, target: Target<'a>, context: RenderContext) {
        match target {
            Target::Node(id) => self.node(id, context),
            Target::Missing => self.line(context, "nil"),
            Target::Object(id) => self.object(id, context),
            Target::Sequence(kind, items) => self.sequence(kind, items, context),
        }
    }

    fn line(&mut self, context: RenderContext, message: &str) {
        LineEmitter::emit(&mut self.output, &context, message);
    }

    fn sequence(&mut self, kind: SeqKind, items: &'a [NodeId], context: RenderContext) {
        let root = kind == SeqKind::Decls && context.depth == 0;
        for (i, item) in items.iter().enumerate() {
            if root && i > 0 {
                LineEmitter::emit_raw(&mut self.output, &self.options.separator);
            }
            let item_context = if context.depth > 0 {
                context.descend_as_list_item(context.depth)
            } else {
                context.descend(0)
            };
            self.node(*item, item_context);
        }
    }

    // `<Kind> <label>:` one level down, then the child two levels down.
    fn labeled(&mut self, context: RenderContext, kind: &str, label: &str, child: Target<'a>) {
        self.line(context.descend(context.depth + 1), &format!("{} {}:", kind, label));
        self.render(child, context.descend(context.depth + 2));
    }

    fn labeled_list(
        &mut self,
        context: RenderContext,
        kind: &str,
        label: &str,
        seq: SeqKind,
        items: &'a [NodeId],
    ) {
        self.labeled(context, kind, label, Target::Sequence(seq, items));
    }

    fn node(&mut self, id: NodeId, context: RenderContext) {
        let entered = self.active.insert(id);
        self.dispatch(id, context);
        if entered {
            self.active.remove(&id);
        }
    }

    fn dispatch(&mut self, id: NodeId, context: RenderContext) {
        let ast = self.ast;
        let node = ast.node(id);
        let kind = node.kind();

        match node {
            Node::Identifier { name, obj: Some(obj) } => {
                self.line(context, &format!("{} name={}", kind, name));
                self.render(Target::Object(*obj), context.descend(context.depth + 1));
            }
            Node::BasicLiteral { kind: lit, value } => {
                self.line(context, &format!("{} kind={} value={}", kind, lit, value));
            }
            Node::Selector { x, sel } => {
                if let Some(line) = PatternCollapser::new(ast).selector(*x, *sel) {
                    self.line(context, &line);
                    return;
                }
                self.line(context, kind);
                self.labeled(context, kind, "X", Target::Node(*x));
                self.labeled(context, kind, "Sel", Target::Node(*sel));
            }
            Node::KeyValue { key, value } => {
                if let Some(line) = PatternCollapser::new(ast).key_value(*key, *value) {
                    self.line(context, &line);
                    return;
                }
                self.line(context, kind);
                self.labeled(context, kind, "Key", Target::Node(*key));
                self.labeled(context, kind, "Value", Target::Node(*value));
            }
            Node::Call {
                fun,
                args,
                ellipsis,
            } => {
                if *ellipsis {
                    self.line(context, &format!("{} ellipsis", kind));
                } else {
                    self.line(context, kind);
                }
                self.labeled(context, kind, "Fun", Target::Node(*fun));
                if !args.is_empty() {
                    self.labeled_list(context, kind, "Args", SeqKind::Exprs, args);
                }
            }
            Node::CompositeLiteral { ty, elts } => {
                self.line(context, kind);
                self.labeled(context, kind, "Type", (*ty).into());
                if !elts.is_empty() {
                    self.labeled_list(context, kind, "Elts", SeqKind::Exprs, elts);
                }
            }
            Node::Block { list } => {
                self.line(context, kind);
                self.labeled_list(context, kind, "List", SeqKind::Stmts, list);
            }
            Node::Return { results } => {
                self.line(context, kind);
                self.labeled_list(context, kind, "Results", SeqKind::Exprs, results);
            }
            Node::Binary { x, op, y } => {
                self.line(context, kind);
                self.labeled(context, kind, "X", Target::Node(*x));
                self.line(context.descend(context.depth + 1), &format!("{} Op: {}", kind, op));
                self.labeled(context, kind, "Y", Target::Node(*y));
            }
            Node::ExprStmt { x } => {
                self.line(context, kind);
                self.labeled(context, kind, "X", Target::Node(*x));
            }
            Node::Assign { lhs, tok, rhs } => {
                self.line(context, &format!("{} tok={}", kind, tok));
                self.labeled_list(context, kind, "Lhs", SeqKind::Exprs, lhs);
                self.labeled_list(context, kind, "Rhs", SeqKind::Exprs, rhs);
            }
            Node::If {
                init,
                cond,
                body,
                else_branch,
            } => {
                self.line(context, kind);
                self.labeled(context, kind, "Init", (*init).into());
                self.labeled(context, kind, "Cond", Target::Node(*cond));
                self.labeled(context, kind, "Body", Target::Node(*body));
                self.labeled(context, kind, "Else", (*else_branch).into());
            }
            Node::For {
                init,
                cond,
                post,
                body,
            } => {
                self.line(context, kind);
                self.labeled(context, kind, "Init", (*init).into());
                self.labeled(context, kind, "Cond", (*cond).into());
                self.labeled(context, kind, "Post", (*post).into());
                self.labeled(context, kind, "Body", Target::Node(*body));
            }
            Node::Range {
                key,
                value,
                tok,
                x,
                body,
            } => {
                match tok {
                    Some(tok) => self.line(context, &format!("{} tok={}", kind, tok)),
                    None => self.line(context, kind),
                }
                self.labeled(context, kind, "Key", (*key).into());
                self.labeled(context, kind, "Value", (*value).into());
                self.labeled(context, kind, "X", Target::Node(*x));
                self.labeled(context, kind, "Body", Target::Node(*body));
            }
            Node::Go { call } | Node::Defer { call } => {
                self.line(context, kind);
                self.labeled(context, kind, "Call", Target::Node(*call));
            }
            Node::Switch { init, tag, body } => {
                self.line(context, kind);
                self.labeled(context, kind, "Init", (*init).into());
                self.labeled(context, kind, "Tag", (*tag).into());
                self.labeled(context, kind, "Body", Target::Node(*body));
            }
            Node::TypeSwitch { init, assign, body } => {
                self.line(context, kind);
                self.labeled(context, kind, "Init", (*init).into());
                self.labeled(context, kind, "Assign", Target::Node(*assign));
                self.labeled(context, kind, "Body", Target::Node(*body));
            }
            Node::CaseClause {
                list,
                body,
                default,
            } => {
                if *default {
                    self.line(context, &format!("{} default", kind));
                } else {
                    self.line(context, kind);
                }
                self.labeled_list(context, kind, "List", SeqKind::Exprs, list);
                self.labeled_list(context, kind, "Body", SeqKind::Stmts, body);
            }
            Node::Select { body } => {
                self.line(context, kind);
                self.labeled(context, kind, "Body", Target::Node(*body));
            }
            Node::CommClause { comm, body } => {
                self.line(context, kind);
                self.labeled(context, kind, "Comm", (*comm).into());
                self.labeled_list(context, kind, "Body", SeqKind::Stmts, body);
            }
            Node::Labeled { label, stmt } => {
                self.line(context, &format!("{} label={}", kind, label));
                self.labeled(context, kind, "Stmt", Target::Node(*stmt));
            }
            Node::ArrayType { len, elt } => {
                match len {
                    Some(len) => {
                        let len = TypeSummary::new(ast).summarize(*len);
                        self.line(context, &format!("{} len={}", kind, len));
                    }
                    None => self.line(context, kind),
                }
                self.line(context.descend(context.depth + 1), &format!("{} Elt:", kind));
                self.render(Target::Node(*elt), context.with_depth(context.depth + 2));
            }
            Node::GroupedDecl { tok, specs } => {
                self.line(context, &format!("{} tok={}", kind, tok));
                self.labeled_list(context, kind, "Specs", SeqKind::Specs, specs);
            }
            Node::DeclStmt { decl } => {
                self.line(context, kind);
                self.labeled(context, kind, "Decl", Target::Node(*decl));
            }
            Node::Function {
                recv, name, body, ..
            } => {
                let summary = TypeSummary::new(ast);
                let mut header = format!("{} name={}", kind, summary.summarize(*name));
                if let Some(Node::Field { ty, .. }) = recv.first().map(|field| ast.node(*field)) {
                    header.push_str(&format!(" recv={}", summary.summarize(*ty)));
                }
                self.line(context, &header);
                self.labeled(context, kind, "Body", (*body).into());
            }
            Node::ImportSpec {
                name,
                path,
                comment,
            } => {
                let path = TypeSummary::new(ast).summarize(*path);
                self.line(context, &with_comment(format!("{} path={}", kind, path), comment));
                if let Some(name) = name {
                    self.labeled(context, kind, "Name", Target::Node(*name));
                }
            }
            Node::ValueSpec {
                names,
                ty,
                values,
                comment,
            } => {
                let mut header = kind.to_string();
                if let Some(ty) = ty {
                    header.push_str(&format!(" type={}", TypeSummary::new(ast).summarize(*ty)));
                }
                self.line(context, &with_comment(header, comment));
                if !names.is_empty() {
                    self.labeled_list(context, kind, "Names", SeqKind::Idents, names);
                }
                if !values.is_empty() {
                    self.labeled_list(context, kind, "Values", SeqKind::Exprs, values);
                }
            }
            Node::TypeSpec {
                name,
                alias,
                ty,
                comment,
            } => {
                let header = if *alias {
                    format!("{} alias", kind)
                } else {
                    kind.to_string()
                };
                self.line(context, &with_comment(header, comment));
                self.labeled(context, kind, "Name", Target::Node(*name));
                self.labeled(context, kind, "Type", Target::Node(*ty));
            }
            _ => self.line(context, &format!("{:?}", node)),
        }
    }

    fn object(&mut self, id: ObjectId, context: RenderContext) {
        let ast = self.ast;
        let object = ast.object(id);

        let mut header = format!("Object kind={} name={:?}", object.kind, object.name);
        if let Some(ty) = TypeSummary::new(ast).of_object(object) {
            header.push_str(&format!(" type={}", ty));
        }
        self.line(context, &header);

        if let Some(decl) = object.decl.filter(|_| self.options.follow_object_decls) {
            let below = context.descend(context.depth + 1);
            self.line(below, "Object Decl:");
            let site = context.descend(context.depth + 2);
            let first_use = self.expanded.insert(id);
            if self.active.contains(&decl) {
                trace!(?decl, name = %object.name, "declaration already on the active path");
                self.line(site, &format!("{} <recursive reference>", ast.node(decl).kind()));
            } else if !first_use {
                trace!(?decl, name = %object.name, "declaration already expanded");
                self.line(site, &format!("{} <already shown>", ast.node(decl).kind()));
            } else {
                self.node(decl, site);
            }
        }

        if let Some(data) = &object.data {
            self.line(context.descend(context.depth + 1), &format!("Object Data: {}", data));
        }
    }
}

fn with_comment(mut header: String, comment: &Option<String>) -> String {
    if let Some(comment) = comment {
        header.push_str(&format!(" comment={:?}", comment));
    }
    header
}

impl Render for Ast {
    fn render(&self, context: &RenderContext) -> String {
        TreeRenderer::new(self).render_target(Target::Sequence(SeqKind::Decls, &self.decls), *context)
    }
}

/// A single node of an [`Ast`], renderable on its own.
#[derive(Debug, Clone, Copy)]
pub struct Subtree<'a> {
    pub ast: &'a Ast,
    pub root: NodeId,
}

impl<'a> Subtree<'a> {
    pub fn new(ast: &'a Ast, root: NodeId) -> Self {
        Self { ast, root }
    }
}

impl Render for Subtree<'_> {
    fn render(&self, context: &RenderContext) -> String {
        TreeRenderer::new(self.ast).render_target(Target::Node(self.root), *context)
    }
}
