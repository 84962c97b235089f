//! Abstract syntax tree: tagged-variant nodes with recursive ownership.
//!
//! Each node owns its children outright (`Box`/`Vec`, never shared), so the
//! compiler-generated `Drop` impl is already a correct recursive free; no
//! node appears as a child of more than one parent. `sem_type` and
//! `const_value` are write-once slots filled in by later phases (type
//! lowering, constant folding) and left `None` by the parser.

use std::fmt::Write as _;

use crate::types::Type;

/// The root of a parsed program: an ordered list of top-level declarations.
#[derive(Debug, Clone)]
pub struct Program {
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone)]
pub enum Decl {
    Variable(VariableDecl),
    Function(FunctionDecl),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Variable(v) => &v.name,
            Decl::Function(f) => &f.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub name: String,
    pub is_const: bool,
    pub type_expr: TypeExpr,
    pub initializer: Option<Expr>,
    pub sem_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    pub body: Block,
    pub sem_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub type_expr: TypeExpr,
}

#[derive(Debug, Clone, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    VariableDecl(VariableDecl),
    Block(Block),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(Option<Expr>),
    Break,
    Continue,
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Block,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone)]
pub enum ElseBranch {
    Block(Block),
    If(Box<IfStmt>),
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub condition: Option<Expr>,
    pub post: Option<Expr>,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub enum ForInit {
    Decl(VariableDecl),
    Expr(Expr),
}

/// An expression node: the syntactic shape plus its write-once semantic
/// slots.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub sem_type: Option<Type>,
    pub const_value: Option<ConstValue>,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr {
            kind,
            sem_type: None,
            const_value: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(String),
    Binary {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: Op,
        expr: Box<Expr>,
    },
    Postfix {
        op: Op,
        expr: Box<Expr>,
    },
    Assignment {
        op: Op,
        lvalue: Box<Expr>,
        rvalue: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Subscript {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    InitializerList(Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Float,
    Bool,
}

#[derive(Debug, Clone)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// The closed set of unary/binary/assignment/increment operator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Not,
    Assign,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    Deref,
    AddressOf,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl Op {
    pub fn display(self) -> &'static str {
        use Op::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Eq => "==",
            Neq => "!=",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
            And => "&&",
            Or => "||",
            Not => "!",
            Assign => "=",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            PercentEq => "%=",
            Deref => "* (deref)",
            AddressOf => "& (addr)",
            PreInc => "++ (pre)",
            PreDec => "-- (pre)",
            PostInc => "++ (post)",
            PostDec => "-- (post)",
        }
    }
}

/// The parser's syntactic representation of a type: three disjoint shapes
/// sharing one suffix envelope (`pre_stars` / `sizes` / `post_stars`).
#[derive(Debug, Clone)]
pub enum TypeExpr {
    /// `i32`, `const i32**`, `i32[10]`, ...
    Regular {
        base_name: String,
        base_is_const: bool,
        pre_stars: u32,
        sizes: Vec<Option<Expr>>,
        post_stars: u32,
    },
    /// `fn(i32, i32) -> i32`, possibly itself wrapped in stars/arrays.
    Function {
        base_is_const: bool,
        params: Vec<TypeExpr>,
        return_type: Option<Box<TypeExpr>>,
        pre_stars: u32,
        sizes: Vec<Option<Expr>>,
        post_stars: u32,
    },
    /// `(i32*)`, possibly itself wrapped in stars/arrays, e.g. `(i32*)[10]`.
    Grouped {
        inner: Box<TypeExpr>,
        base_is_const: bool,
        pre_stars: u32,
        sizes: Vec<Option<Expr>>,
        post_stars: u32,
    },
}

/// Identifiers, subscripts, and unary-deref expressions are lvalues;
/// everything else (postfix inc/dec, calls, literals, binary expressions)
/// is not.
pub fn is_lvalue(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Identifier(_) => true,
        ExprKind::Subscript { .. } => true,
        ExprKind::Unary { op: Op::Deref, .. } => true,
        _ => false,
    }
}

pub fn is_assignment_op(op: Op) -> bool {
    matches!(
        op,
        Op::Assign | Op::PlusEq | Op::MinusEq | Op::StarEq | Op::SlashEq | Op::PercentEq
    )
}

/// The `base_is_const` flag shared by all three `TypeExpr` shapes.
pub fn type_expr_is_const(type_expr: &TypeExpr) -> bool {
    match type_expr {
        TypeExpr::Regular { base_is_const, .. }
        | TypeExpr::Function { base_is_const, .. }
        | TypeExpr::Grouped { base_is_const, .. } => *base_is_const,
    }
}

/// Renders `program` as an indented tree, in the style used by `--ast`.
pub fn print_program(program: &Program) -> String {
    let mut out = String::new();
    writeln!(out, "Program:").unwrap();
    for decl in &program.decls {
        print_decl(decl, 1, &mut out);
    }
    out
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn print_decl(decl: &Decl, depth: usize, out: &mut String) {
    match decl {
        Decl::Variable(v) => print_variable_decl(v, depth, out),
        Decl::Function(f) => print_function_decl(f, depth, out),
    }
}

fn print_variable_decl(v: &VariableDecl, depth: usize, out: &mut String) {
    indent(depth, out);
    writeln!(out, "Variable: {}{}", v.name, if v.is_const { " (const)" } else { "" }).unwrap();
    indent(depth + 1, out);
    writeln!(out, "Type: {}", type_expr_to_string(&v.type_expr)).unwrap();
    if let Some(init) = &v.initializer {
        indent(depth + 1, out);
        writeln!(out, "Initializer:").unwrap();
        print_expr(init, depth + 2, out);
    }
}

fn print_function_decl(f: &FunctionDecl, depth: usize, out: &mut String) {
    indent(depth, out);
    writeln!(out, "Function: {}", f.name).unwrap();
    indent(depth + 1, out);
    writeln!(out, "Parameters:").unwrap();
    for p in &f.params {
        indent(depth + 2, out);
        writeln!(out, "Param: {}: {}", p.name, type_expr_to_string(&p.type_expr)).unwrap();
    }
    if let Some(rt) = &f.return_type {
        indent(depth + 1, out);
        writeln!(out, "ReturnType: {}", type_expr_to_string(rt)).unwrap();
    }
    indent(depth + 1, out);
    writeln!(out, "Body:").unwrap();
    print_block(&f.body, depth + 2, out);
}

fn print_block(block: &Block, depth: usize, out: &mut String) {
    indent(depth, out);
    writeln!(out, "Block:").unwrap();
    for stmt in &block.statements {
        print_stmt(stmt, depth + 1, out);
    }
}

fn print_stmt(stmt: &Stmt, depth: usize, out: &mut String) {
    match stmt {
        Stmt::VariableDecl(v) => print_variable_decl(v, depth, out),
        Stmt::Block(b) => print_block(b, depth, out),
        Stmt::If(i) => print_if(i, depth, out),
        Stmt::While(w) => {
            indent(depth, out);
            writeln!(out, "WhileLoop:").unwrap();
            indent(depth + 1, out);
            writeln!(out, "Condition:").unwrap();
            print_expr(&w.condition, depth + 2, out);
            indent(depth + 1, out);
            writeln!(out, "Body:").unwrap();
            print_block(&w.body, depth + 2, out);
        }
        Stmt::For(fr) => {
            indent(depth, out);
            writeln!(out, "ForLoop:").unwrap();
            if let Some(init) = &fr.init {
                indent(depth + 1, out);
                writeln!(out, "Init:").unwrap();
                match init {
                    ForInit::Decl(v) => print_variable_decl(v, depth + 2, out),
                    ForInit::Expr(e) => print_expr(e, depth + 2, out),
                }
            }
            if let Some(cond) = &fr.condition {
                indent(depth + 1, out);
                writeln!(out, "Condition:").unwrap();
                print_expr(cond, depth + 2, out);
            }
            if let Some(post) = &fr.post {
                indent(depth + 1, out);
                writeln!(out, "Post:").unwrap();
                print_expr(post, depth + 2, out);
            }
            indent(depth + 1, out);
            writeln!(out, "Body:").unwrap();
            print_block(&fr.body, depth + 2, out);
        }
        Stmt::Return(e) => {
            indent(depth, out);
            writeln!(out, "ReturnStatement:").unwrap();
            if let Some(e) = e {
                print_expr(e, depth + 1, out);
            }
        }
        Stmt::Break => {
            indent(depth, out);
            writeln!(out, "BreakStatement").unwrap();
        }
        Stmt::Continue => {
            indent(depth, out);
            writeln!(out, "ContinueStatement").unwrap();
        }
        Stmt::Expr(e) => {
            indent(depth, out);
            writeln!(out, "ExprStatement:").unwrap();
            print_expr(e, depth + 1, out);
        }
    }
}

fn print_if(i: &IfStmt, depth: usize, out: &mut String) {
    indent(depth, out);
    writeln!(out, "IfStatement:").unwrap();
    indent(depth + 1, out);
    writeln!(out, "Condition:").unwrap();
    print_expr(&i.condition, depth + 2, out);
    indent(depth + 1, out);
    writeln!(out, "Then:").unwrap();
    print_block(&i.then_branch, depth + 2, out);
    if let Some(e) = &i.else_branch {
        indent(depth + 1, out);
        writeln!(out, "Else:").unwrap();
        match e {
            ElseBranch::Block(b) => print_block(b, depth + 2, out),
            ElseBranch::If(nested) => print_if(nested, depth + 2, out),
        }
    }
}

fn print_expr(expr: &Expr, depth: usize, out: &mut String) {
    indent(depth, out);
    match &expr.kind {
        ExprKind::Literal(lit) => {
            let kind = match lit.kind {
                LiteralKind::Int => "Integer",
                LiteralKind::Float => "Float",
                LiteralKind::Bool => "Boolean",
            };
            writeln!(out, "Literal: {}: {}", kind, lit.text).unwrap();
        }
        ExprKind::Identifier(name) => {
            writeln!(out, "Variable: {}", name).unwrap();
        }
        ExprKind::Binary { op, left, right } => {
            writeln!(out, "BinaryOp: {}", op.display()).unwrap();
            print_expr(left, depth + 1, out);
            print_expr(right, depth + 1, out);
        }
        ExprKind::Unary { op, expr } => {
            writeln!(out, "UnaryOp: {}", op.display()).unwrap();
            print_expr(expr, depth + 1, out);
        }
        ExprKind::Postfix { op, expr } => {
            writeln!(out, "PostfixOp: {}", op.display()).unwrap();
            print_expr(expr, depth + 1, out);
        }
        ExprKind::Assignment { op, lvalue, rvalue } => {
            writeln!(out, "Assignment: {}", op.display()).unwrap();
            print_expr(lvalue, depth + 1, out);
            print_expr(rvalue, depth + 1, out);
        }
        ExprKind::Call { callee, args } => {
            writeln!(out, "Call:").unwrap();
            indent(depth + 1, out);
            writeln!(out, "Callee:").unwrap();
            print_expr(callee, depth + 2, out);
            indent(depth + 1, out);
            writeln!(out, "Args:").unwrap();
            for a in args {
                print_expr(a, depth + 2, out);
            }
        }
        ExprKind::Subscript { target, index } => {
            writeln!(out, "Subscript:").unwrap();
            indent(depth + 1, out);
            writeln!(out, "Target:").unwrap();
            print_expr(target, depth + 2, out);
            indent(depth + 1, out);
            writeln!(out, "Index:").unwrap();
            print_expr(index, depth + 2, out);
        }
        ExprKind::InitializerList(items) => {
            writeln!(out, "InitializerList:").unwrap();
            for item in items {
                print_expr(item, depth + 1, out);
            }
        }
    }
}

/// A compact, single-line rendering of a syntactic type, used by `--ast`
/// and by error messages that need to name a type before lowering has run.
pub fn type_expr_to_string(t: &TypeExpr) -> String {
    let mut s = String::new();
    match t {
        TypeExpr::Regular {
            base_name,
            base_is_const,
            pre_stars,
            sizes,
            post_stars,
        } => {
            if *base_is_const {
                s.push_str("const ");
            }
            for _ in 0..*pre_stars {
                s.push('*');
            }
            s.push_str(base_name);
            append_suffix(&mut s, sizes, *post_stars);
        }
        TypeExpr::Function {
            base_is_const,
            params,
            return_type,
            pre_stars,
            sizes,
            post_stars,
        } => {
            if *base_is_const {
                s.push_str("const ");
            }
            for _ in 0..*pre_stars {
                s.push('*');
            }
            s.push_str("fn(");
            for (i, p) in params.iter().enumerate() {
                if i > 0 {
                    s.push_str(", ");
                }
                s.push_str(&type_expr_to_string(p));
            }
            s.push(')');
            if let Some(rt) = return_type {
                s.push_str(" -> ");
                s.push_str(&type_expr_to_string(rt));
            }
            append_suffix(&mut s, sizes, *post_stars);
        }
        TypeExpr::Grouped {
            inner,
            base_is_const,
            pre_stars,
            sizes,
            post_stars,
        } => {
            if *base_is_const {
                s.push_str("const ");
            }
            for _ in 0..*pre_stars {
                s.push('*');
            }
            s.push('(');
            s.push_str(&type_expr_to_string(inner));
            s.push(')');
            append_suffix(&mut s, sizes, *post_stars);
        }
    }
    s
}

fn append_suffix(s: &mut String, sizes: &[Option<Expr>], post_stars: u32) {
    for size in sizes {
        s.push('[');
        if let Some(Expr {
            kind: ExprKind::Literal(lit),
            ..
        }) = size
        {
            s.push_str(&lit.text);
        }
        s.push(']');
    }
    for _ in 0..post_stars {
        s.push('*');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Identifier(name.to_string()))
    }

    #[test]
    fn identifiers_and_derefs_are_lvalues() {
        assert!(is_lvalue(&ident("x")));
        let deref = Expr::new(ExprKind::Unary {
            op: Op::Deref,
            expr: Box::new(ident("p")),
        });
        assert!(is_lvalue(&deref));
    }

    #[test]
    fn calls_and_literals_are_not_lvalues() {
        let call = Expr::new(ExprKind::Call {
            callee: Box::new(ident("f")),
            args: vec![],
        });
        assert!(!is_lvalue(&call));
        let lit = Expr::new(ExprKind::Literal(Literal {
            kind: LiteralKind::Int,
            text: "1".into(),
        }));
        assert!(!is_lvalue(&lit));
    }

    #[test]
    fn type_expr_rendering_distinguishes_precedence() {
        let pointer_array = TypeExpr::Regular {
            base_name: "i32".into(),
            base_is_const: false,
            pre_stars: 1,
            sizes: vec![None],
            post_stars: 0,
        };
        assert_eq!(type_expr_to_string(&pointer_array), "*i32[]");

        let array_pointer = TypeExpr::Regular {
            base_name: "i32".into(),
            base_is_const: false,
            pre_stars: 0,
            sizes: vec![None],
            post_stars: 1,
        };
        assert_eq!(type_expr_to_string(&array_pointer), "i32[]*");
    }
}
