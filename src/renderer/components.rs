use crate::parser::*;
use crate::renderer::traits::*;

/// Writes one indented line per call.
pub struct LineEmitter;

impl LineEmitter {
    pub fn emit(output: &mut String, context: &RenderContext, message: &str) {
        output.push_str(&context.indent());
        output.push_str(message);
        output.push('\n');
    }

    /// A line with no indentation, used for the root separator.
    pub fn emit_raw(output: &mut String, message: &str) {
        output.push_str(message);
        output.push('\n');
    }
}

/// Recognizes small shapes that read better as a single line.
pub struct PatternCollapser<'a> {
    ast: &'a Ast,
}

impl<'a> PatternCollapser<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self { ast }
    }

    fn bare_name(&self, id: NodeId) -> Option<&'a str> {
        match self.ast.node(id) {
            Node::Identifier { name, obj: None } => Some(name),
            _ => None,
        }
    }

    /// `pkg.Name` where neither side is bound.
    pub fn selector(&self, x: NodeId, sel: NodeId) -> Option<String> {
        let operand = self.bare_name(x)?;
        let member = self.bare_name(sel)?;
        Some(format!("Selector {}.{}", operand, member))
    }

    /// `Name: literal`. The key only has to be an identifier; it may be bound.
    pub fn key_value(&self, key: NodeId, value: NodeId) -> Option<String> {
        let Node::Identifier { name, .. } = self.ast.node(key) else {
            return None;
        };
        let Node::BasicLiteral { value, .. } = self.ast.node(value) else {
            return None;
        };
        Some(format!("KeyValue key={:?} value={}", name, value))
    }
}

/// Compact Go-like spelling of a type expression, used in summaries.
pub struct TypeSummary<'a> {
    ast: &'a Ast,
}

impl<'a> TypeSummary<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self { ast }
    }

    pub fn summarize(&self, id: NodeId) -> String {
        match self.ast.node(id) {
            Node::Identifier { name, .. } => name.clone(),
            Node::BasicLiteral { value, .. } => value.clone(),
            Node::Selector { x, sel } => format!("{}.{}", self.summarize(*x), self.summarize(*sel)),
            Node::Star { x } => format!("*{}", self.summarize(*x)),
            Node::Paren { x } => format!("({})", self.summarize(*x)),
            Node::Index { x, index } => {
                format!("{}[{}]", self.summarize(*x), self.summarize(*index))
            }
            Node::ArrayType { len: None, elt } => format!("[]{}", self.summarize(*elt)),
            Node::ArrayType { len: Some(len), elt } => {
                format!("[{}]{}", self.summarize(*len), self.summarize(*elt))
            }
            Node::Ellipsis { elt: Some(elt) } => format!("...{}", self.summarize(*elt)),
            Node::Ellipsis { elt: None } => "...".to_string(),
            Node::MapType { key, value } => {
                format!("map[{}]{}", self.summarize(*key), self.summarize(*value))
            }
            Node::ChanType { dir, value } => {
                let prefix = match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                };
                format!("{}{}", prefix, self.summarize(*value))
            }
            Node::FuncType { .. } => "func(...)".to_string(),
            Node::StructType { fields } if fields.is_empty() => "struct{}".to_string(),
            Node::StructType { .. } => "struct{...}".to_string(),
            Node::InterfaceType { methods } if methods.is_empty() => "interface{}".to_string(),
            Node::InterfaceType { .. } => "interface{...}".to_string(),
            other => other.kind().to_string(),
        }
    }

    /// The declared type of an object, when its declaration site names one.
    pub fn of_object(&self, object: &Object) -> Option<String> {
        let decl = object.decl?;
        match self.ast.node(decl) {
            Node::ValueSpec { ty: Some(ty), .. } => Some(self.summarize(*ty)),
            Node::Field { ty, .. } => Some(self.summarize(*ty)),
            Node::TypeSpec { ty, .. } => Some(self.summarize(*ty)),
            Node::Function { .. } => Some("func(...)".to_string()),
            _ => None,
        }
    }
}
