//! The semantic type model and the lowering of syntactic [`TypeExpr`]s into
//! it.

use std::fmt;

use crate::ast::{Expr, ExprKind, FunctionDecl, LiteralKind, TypeExpr};

/// The semantic representation of a type: fully structural, with no
/// unevaluated expressions remaining (array sizes have already been
/// resolved to a `usize`, or to `0` for "unspecified").
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive { name: String, is_const: bool },
    Pointer { to: Box<Type>, is_const: bool },
    /// `size == 0` means the dimension was unspecified (`[]`) or was not a
    /// literal at parse time.
    Array { of: Box<Type>, size: usize, is_const: bool },
    Function {
        return_type: Option<Box<Type>>,
        params: Vec<Type>,
        is_const: bool,
    },
}

impl Type {
    pub fn is_const(&self) -> bool {
        match self {
            Type::Primitive { is_const, .. }
            | Type::Pointer { is_const, .. }
            | Type::Array { is_const, .. }
            | Type::Function { is_const, .. } => *is_const,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const() {
            write!(f, "const ")?;
        }
        match self {
            Type::Primitive { name, .. } => write!(f, "{name}"),
            Type::Pointer { to, .. } => write!(f, "{to}*"),
            Type::Array { of, size, .. } => {
                if *size == 0 {
                    write!(f, "{of}[]")
                } else {
                    write!(f, "{of}[{size}]")
                }
            }
            Type::Function {
                return_type,
                params,
                ..
            } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ")")?;
                if let Some(rt) = return_type {
                    write!(f, " -> {rt}")?;
                }
                Ok(())
            }
        }
    }
}

/// Extracts an array-dimension size from a size expression: `Some(literal)`
/// if and only if it is an integer literal, else `0` (unspecified).
fn dimension_size(expr: &Option<Expr>) -> usize {
    match expr {
        Some(Expr {
            kind: ExprKind::Literal(lit),
            ..
        }) if lit.kind == LiteralKind::Int => lit.text.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Wraps `base` in pointer/array layers per the suffix envelope: pre-stars
/// (innermost), then arrays in index order, then post-stars (outermost).
fn apply_suffix_envelope(mut base: Type, pre_stars: u32, sizes: &[Option<Expr>], post_stars: u32) -> Type {
    for _ in 0..pre_stars {
        base = Type::Pointer {
            to: Box::new(base),
            is_const: false,
        };
    }
    for size_expr in sizes {
        base = Type::Array {
            of: Box::new(base),
            size: dimension_size(size_expr),
            is_const: false,
        };
    }
    for _ in 0..post_stars {
        base = Type::Pointer {
            to: Box::new(base),
            is_const: false,
        };
    }
    base
}

/// Lowers a syntactic [`TypeExpr`] into a semantic [`Type`], applying the
/// suffix envelope in the order pre-stars, arrays, post-stars. Grouped
/// types apply their own envelope on top of the already-lowered inner
/// type rather than re-applying the inner type's envelope.
pub fn lower_type_expr(type_expr: &TypeExpr) -> Type {
    match type_expr {
        TypeExpr::Regular {
            base_name,
            base_is_const,
            pre_stars,
            sizes,
            post_stars,
        } => {
            let base = Type::Primitive {
                name: base_name.clone(),
                is_const: *base_is_const,
            };
            apply_suffix_envelope(base, *pre_stars, sizes, *post_stars)
        }
        TypeExpr::Function {
            base_is_const,
            params,
            return_type,
            pre_stars,
            sizes,
            post_stars,
        } => {
            let base = Type::Function {
                return_type: return_type.as_deref().map(|rt| Box::new(lower_type_expr(rt))),
                params: params.iter().map(lower_type_expr).collect(),
                is_const: *base_is_const,
            };
            apply_suffix_envelope(base, *pre_stars, sizes, *post_stars)
        }
        TypeExpr::Grouped {
            inner,
            base_is_const,
            pre_stars,
            sizes,
            post_stars,
        } => {
            let mut base = lower_type_expr(inner);
            if *base_is_const {
                base = force_const(base);
            }
            apply_suffix_envelope(base, *pre_stars, sizes, *post_stars)
        }
    }
}

fn force_const(t: Type) -> Type {
    match t {
        Type::Primitive { name, .. } => Type::Primitive { name, is_const: true },
        Type::Pointer { to, .. } => Type::Pointer { to, is_const: true },
        Type::Array { of, size, .. } => Type::Array { of, size, is_const: true },
        Type::Function {
            return_type,
            params,
            ..
        } => Type::Function {
            return_type,
            params,
            is_const: true,
        },
    }
}

/// Lowers a function declaration's signature directly: its return type
/// (absent ⇒ `None`) and every parameter's type, in order.
pub fn lower_function_decl(decl: &FunctionDecl) -> Type {
    let return_type = decl.return_type.as_ref().map(|rt| Box::new(lower_type_expr(rt)));
    let params = decl.params.iter().map(|p| lower_type_expr(&p.type_expr)).collect();
    Type::Function {
        return_type,
        params,
        is_const: false,
    }
}
