use crate::error::Span;
use crate::value::Value;

/// Host statements produced by the translator, as parsed for the tree walker.

#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expression {
        expr: Expr,
        span: Span,
    },
    /// `let a = 1, b;` declares every binding in the current scope.
    Let {
        bindings: Vec<Binding>,
        span: Span,
    },
    Block {
        statements: Vec<Stmt>,
        span: Span,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        span: Span,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
        span: Span,
    },
    For {
        initializer: Option<Box<Stmt>>,
        condition: Option<Expr>,
        updates: Vec<Expr>,
        body: Box<Stmt>,
        span: Span,
    },
    /// `for (let name of iterable)`
    ForEach {
        name: String,
        iterable: Expr,
        body: Box<Stmt>,
        span: Span,
    },
    Break {
        span: Span,
    },
    Continue {
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Empty {
        span: Span,
    },
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub initializer: Option<Expr>,
}

impl Stmt {
    pub fn span(&self) -> &Span {
        match self {
            Stmt::Expression { span, .. } => span,
            Stmt::Let { span, .. } => span,
            Stmt::Block { span, .. } => span,
            Stmt::If { span, .. } => span,
            Stmt::While { span, .. } => span,
            Stmt::DoWhile { span, .. } => span,
            Stmt::For { span, .. } => span,
            Stmt::ForEach { span, .. } => span,
            Stmt::Break { span } => span,
            Stmt::Continue { span } => span,
            Stmt::Return { span, .. } => span,
            Stmt::Empty { span } => span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal {
        value: Value,
        span: Span,
    },
    Variable {
        name: String,
        span: Span,
    },
    /// `target = value`, or `target op= value` when `operator` is set.
    Assign {
        target: Box<Expr>,
        operator: Option<BinaryOp>,
        value: Box<Expr>,
        span: Span,
    },
    /// `++x`, `x++`, `--x`, `x--`
    Update {
        target: Box<Expr>,
        delta: i64,
        prefix: bool,
        span: Span,
    },
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
        span: Span,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    Logical {
        left: Box<Expr>,
        operator: LogicalOp,
        right: Box<Expr>,
        span: Span,
    },
    Ternary {
        condition: Box<Expr>,
        then_value: Box<Expr>,
        else_value: Box<Expr>,
        span: Span,
    },
    Cast {
        target: CastType,
        operand: Box<Expr>,
        span: Span,
    },
    /// Call of a host function such as `parseInt(...)`.
    Call {
        callee: String,
        args: Vec<Expr>,
        span: Span,
    },
    MethodCall {
        object: Box<Expr>,
        method: String,
        args: Vec<Expr>,
        span: Span,
    },
    PropertyAccess {
        object: Box<Expr>,
        property: String,
        span: Span,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    New {
        class: String,
        args: Vec<Expr>,
        span: Span,
    },
    Grouping {
        expr: Box<Expr>,
        span: Span,
    },
    Array {
        elements: Vec<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> &Span {
        match self {
            Expr::Literal { span, .. } => span,
            Expr::Variable { span, .. } => span,
            Expr::Assign { span, .. } => span,
            Expr::Update { span, .. } => span,
            Expr::Binary { span, .. } => span,
            Expr::Unary { span, .. } => span,
            Expr::Logical { span, .. } => span,
            Expr::Ternary { span, .. } => span,
            Expr::Cast { span, .. } => span,
            Expr::Call { span, .. } => span,
            Expr::MethodCall { span, .. } => span,
            Expr::PropertyAccess { span, .. } => span,
            Expr::Index { span, .. } => span,
            Expr::New { span, .. } => span,
            Expr::Grouping { span, .. } => span,
            Expr::Array { span, .. } => span,
        }
    }

    /// Whether the expression can appear on the left of `=` or `++`.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Variable { .. } | Expr::Index { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastType {
    Int,
    Long,
    Short,
    Byte,
    Double,
    Float,
    Char,
}

impl CastType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(CastType::Int),
            "long" => Some(CastType::Long),
            "short" => Some(CastType::Short),
            "byte" => Some(CastType::Byte),
            "double" => Some(CastType::Double),
            "float" => Some(CastType::Float),
            "char" => Some(CastType::Char),
            _ => None,
        }
    }
}
