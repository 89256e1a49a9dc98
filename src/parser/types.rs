use std::fmt;

/// Index of a node inside an [`Ast`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a binding record inside an [`Ast`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclToken {
    Import,
    Const,
    Var,
    Type,
}

impl fmt::Display for DeclToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            DeclToken::Import => "import",
            DeclToken::Const => "const",
            DeclToken::Var => "var",
            DeclToken::Type => "type",
        };
        write!(f, "{}", keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

impl fmt::Display for LitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LitKind::Int => "INT",
            LitKind::Float => "FLOAT",
            LitKind::Imag => "IMAG",
            LitKind::Char => "CHAR",
            LitKind::String => "STRING",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjKind {
    Con,
    Typ,
    Var,
    Fun,
}

impl fmt::Display for ObjKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjKind::Con => "const",
            ObjKind::Typ => "type",
            ObjKind::Var => "var",
            ObjKind::Fun => "func",
        };
        write!(f, "{}", name)
    }
}

/// Extra payload some bindings carry besides their declaration site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjData {
    /// Position of a constant inside its `const` group.
    Iota(usize),
}

impl fmt::Display for ObjData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjData::Iota(value) => write!(f, "iota={}", value),
        }
    }
}

/// Where a name was declared. Identifiers point here without owning it, so
/// several identifiers may share one object.
#[derive(Debug, Clone)]
pub struct Object {
    pub kind: ObjKind,
    pub name: String,
    pub decl: Option<NodeId>,
    pub data: Option<ObjData>,
}

impl Object {
    pub fn new(kind: ObjKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            decl: None,
            data: None,
        }
    }
}

// Node variants are named after the kind tag they print as. The derived
// Debug output doubles as the generic field dump.
#[derive(Debug, Clone)]
pub enum Node {
    // Declarations
    Function {
        recv: Vec<NodeId>,
        name: NodeId,
        params: Vec<NodeId>,
        results: Vec<NodeId>,
        body: Option<NodeId>,
    },
    GroupedDecl {
        tok: DeclToken,
        specs: Vec<NodeId>,
    },
    ImportSpec {
        name: Option<NodeId>,
        path: NodeId,
        comment: Option<String>,
    },
    ValueSpec {
        names: Vec<NodeId>,
        ty: Option<NodeId>,
        values: Vec<NodeId>,
        comment: Option<String>,
    },
    TypeSpec {
        name: NodeId,
        alias: bool,
        ty: NodeId,
        comment: Option<String>,
    },
    Field {
        names: Vec<NodeId>,
        ty: NodeId,
    },

    // Statements
    Block {
        list: Vec<NodeId>,
    },
    Return {
        results: Vec<NodeId>,
    },
    ExprStmt {
        x: NodeId,
    },
    Assign {
        lhs: Vec<NodeId>,
        tok: String,
        rhs: Vec<NodeId>,
    },
    If {
        init: Option<NodeId>,
        cond: NodeId,
        body: NodeId,
        else_branch: Option<NodeId>,
    },
    For {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        post: Option<NodeId>,
        body: NodeId,
    },
    Range {
        key: Option<NodeId>,
        value: Option<NodeId>,
        tok: Option<String>,
        x: NodeId,
        body: NodeId,
    },
    Go {
        call: NodeId,
    },
    Defer {
        call: NodeId,
    },
    DeclStmt {
        decl: NodeId,
    },
    Switch {
        init: Option<NodeId>,
        tag: Option<NodeId>,
        body: NodeId,
    },
    TypeSwitch {
        init: Option<NodeId>,
        assign: NodeId,
        body: NodeId,
    },
    CaseClause {
        list: Vec<NodeId>,
        body: Vec<NodeId>,
        default: bool,
    },
    Select {
        body: NodeId,
    },
    CommClause {
        comm: Option<NodeId>,
        body: Vec<NodeId>,
    },
    Labeled {
        label: String,
        stmt: NodeId,
    },
    IncDec {
        x: NodeId,
        tok: String,
    },
    Branch {
        tok: String,
        label: Option<String>,
    },
    Send {
        chan: NodeId,
        value: NodeId,
    },
    Empty,

    // Expressions and types
    Call {
        fun: NodeId,
        args: Vec<NodeId>,
        ellipsis: bool,
    },
    Selector {
        x: NodeId,
        sel: NodeId,
    },
    KeyValue {
        key: NodeId,
        value: NodeId,
    },
    CompositeLiteral {
        ty: Option<NodeId>,
        elts: Vec<NodeId>,
    },
    BasicLiteral {
        kind: LitKind,
        value: String,
    },
    Identifier {
        name: String,
        obj: Option<ObjectId>,
    },
    Binary {
        x: NodeId,
        op: String,
        y: NodeId,
    },
    Unary {
        op: String,
        x: NodeId,
    },
    Star {
        x: NodeId,
    },
    Paren {
        x: NodeId,
    },
    Index {
        x: NodeId,
        index: NodeId,
    },
    Slice {
        x: NodeId,
        low: Option<NodeId>,
        high: Option<NodeId>,
        max: Option<NodeId>,
    },
    TypeAssert {
        x: NodeId,
        ty: Option<NodeId>,
    },
    FuncLit {
        ty: NodeId,
        body: NodeId,
    },
    ArrayType {
        len: Option<NodeId>,
        elt: NodeId,
    },
    MapType {
        key: NodeId,
        value: NodeId,
    },
    ChanType {
        dir: ChanDir,
        value: NodeId,
    },
    FuncType {
        params: Vec<NodeId>,
        results: Vec<NodeId>,
    },
    StructType {
        fields: Vec<NodeId>,
    },
    InterfaceType {
        methods: Vec<NodeId>,
    },
    Ellipsis {
        elt: Option<NodeId>,
    },
    Bad {
        syntax: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

impl Node {
    /// The kind tag, as printed at the start of every rendered line.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Function { .. } => "Function",
            Node::GroupedDecl { .. } => "GroupedDecl",
            Node::ImportSpec { .. } => "ImportSpec",
            Node::ValueSpec { .. } => "ValueSpec",
            Node::TypeSpec { .. } => "TypeSpec",
            Node::Field { .. } => "Field",
            Node::Block { .. } => "Block",
            Node::Return { .. } => "Return",
            Node::ExprStmt { .. } => "ExprStmt",
            Node::Assign { .. } => "Assign",
            Node::If { .. } => "If",
            Node::For { .. } => "For",
            Node::Range { .. } => "Range",
            Node::Go { .. } => "Go",
            Node::Defer { .. } => "Defer",
            Node::DeclStmt { .. } => "DeclStmt",
            Node::Switch { .. } => "Switch",
            Node::TypeSwitch { .. } => "TypeSwitch",
            Node::CaseClause { .. } => "CaseClause",
            Node::Select { .. } => "Select",
            Node::CommClause { .. } => "CommClause",
            Node::Labeled { .. } => "Labeled",
            Node::IncDec { .. } => "IncDec",
            Node::Branch { .. } => "Branch",
            Node::Send { .. } => "Send",
            Node::Empty => "Empty",
            Node::Call { .. } => "Call",
            Node::Selector { .. } => "Selector",
            Node::KeyValue { .. } => "KeyValue",
            Node::CompositeLiteral { .. } => "CompositeLiteral",
            Node::BasicLiteral { .. } => "BasicLiteral",
            Node::Identifier { .. } => "Identifier",
            Node::Binary { .. } => "Binary",
            Node::Unary { .. } => "Unary",
            Node::Star { .. } => "Star",
            Node::Paren { .. } => "Paren",
            Node::Index { .. } => "Index",
            Node::Slice { .. } => "Slice",
            Node::TypeAssert { .. } => "TypeAssert",
            Node::FuncLit { .. } => "FuncLit",
            Node::ArrayType { .. } => "ArrayType",
            Node::MapType { .. } => "MapType",
            Node::ChanType { .. } => "ChanType",
            Node::FuncType { .. } => "FuncType",
            Node::StructType { .. } => "StructType",
            Node::InterfaceType { .. } => "InterfaceType",
            Node::Ellipsis { .. } => "Ellipsis",
            Node::Bad { .. } => "Bad",
        }
    }
}

/// Arena owning every node and binding record of one parsed file.
///
/// Children are referenced by [`NodeId`]; identifiers reference bindings by
/// [`ObjectId`]. Nodes are only ever appended, so ids stay valid for the
/// lifetime of the arena.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    objects: Vec<Object>,
    pub package: Option<String>,
    pub decls: Vec<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn alloc_object(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // Shorthands for the leaf nodes built most often.

    pub fn ident(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc(Node::Identifier {
            name: name.into(),
            obj: None,
        })
    }

    pub fn bound_ident(&mut self, name: impl Into<String>, obj: ObjectId) -> NodeId {
        self.alloc(Node::Identifier {
            name: name.into(),
            obj: Some(obj),
        })
    }

    pub fn basic_lit(&mut self, kind: LitKind, value: impl Into<String>) -> NodeId {
        self.alloc(Node::BasicLiteral {
            kind,
            value: value.into(),
        })
    }
}
