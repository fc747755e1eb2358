use serde::Serialize;

/// A half-open byte range into the parsed fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A parsed expression. Every node carries its span so consumers can map
/// findings back to source positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[must_use]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Identifier(String),
    StringLit(String),
    NumberLit(f64),
    BoolLit(bool),
    NullLit,
    TemplateLit {
        /// The `${…}` substitution expressions, in order.
        parts: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: MemberKey,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Spread(Box<Expr>),
    ObjectLit(Vec<Property>),
    ArrayLit(Vec<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Arrow {
        params: Vec<Param>,
        body: Box<Expr>,
    },
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MemberKey {
    /// Dot access; the span covers the property name.
    Named { name: String, span: Span },
    /// Bracket access with an arbitrary key expression.
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub key: PropertyKey,
    /// `None` for shorthand properties (`{ name }`).
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyKey {
    Named { name: String, span: Span },
    StringLit { value: String, span: Span },
    Computed(Box<Expr>),
    /// `{ ...rest }`.
    Spread(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    TypeOf,
    Void,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Or,
    And,
    NullishCoalesce,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    In,
    InstanceOf,
}

/// An arrow-function parameter. Only simple identifier parameters are
/// supported; that matches what loop callbacks in templates actually use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub span: Span,
}
