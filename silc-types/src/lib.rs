//! Canonical, hash-consed types: two types with the same structural shape
//! are always the same `Ty` (pointer-equal), the way `vex-compiler`'s
//! `types::interner::TypeInterner` hash-conses its own `Type` enum behind
//! a `DashMap<Type, Arc<Type>>`.
//!
//! This crate only models the shape of a type. Resolving a name to a
//! `Ty` (binding a `DeclId`, checking a generic argument list matches a
//! type parameter list) is `silc-sema`'s job.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A canonical, interned type. Cheap to clone (one `Arc` bump) and cheap
/// to compare (pointer equality after interning).
pub type Ty = Arc<TyKind>;

/// Stable numeric id of a nominal declaration (struct/enum/class/protocol),
/// mirroring `silc_ast::DeclId` but kept decoupled so this crate does not
/// need to depend on `silc-ast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeclId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinTy {
    Void,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    String,
    RawPointer,
}

impl fmt::Display for BuiltinTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuiltinTy::Void => "Void",
            BuiltinTy::Bool => "Bool",
            BuiltinTy::Int => "Int",
            BuiltinTy::Int8 => "Int8",
            BuiltinTy::Int16 => "Int16",
            BuiltinTy::Int32 => "Int32",
            BuiltinTy::Int64 => "Int64",
            BuiltinTy::Float => "Float",
            BuiltinTy::Double => "Double",
            BuiltinTy::String => "String",
            BuiltinTy::RawPointer => "RawPointer",
        };
        write!(f, "{name}")
    }
}

/// The structural shape of a canonical type. Two `TyKind` values that are
/// `Eq` always intern to the same `Ty`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TyKind {
    Builtin(BuiltinTy),
    /// A concrete instantiation of a nominal declaration: `args` is empty
    /// for a non-generic struct/enum/class, populated for a bound generic
    /// (`Array<Int>` is `Nominal { decl: Array, args: [Int] }`).
    Nominal { decl: DeclId, name: String, args: Vec<Ty> },
    Tuple(Vec<Ty>),
    Function {
        params: Vec<Ty>,
        result: Ty,
        throws: bool,
    },
    /// An unbound generic parameter, identified by its depth/index in the
    /// declaring context's generic parameter list (depth distinguishes a
    /// nested generic context's own parameters from its enclosing one's).
    Archetype { name: String, depth: u32, index: u32 },
    Metatype(Ty),
    /// Placeholder produced after a type error; never equal to anything
    /// but itself, so it never silently unifies with a real type.
    Error(u32),
}

impl fmt::Display for TyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TyKind::Builtin(b) => write!(f, "{b}"),
            TyKind::Nominal { name, args, .. } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{a}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TyKind::Tuple(elems) => {
                write!(f, "(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
            TyKind::Function {
                params,
                result,
                throws,
            } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") ->")?;
                if *throws {
                    write!(f, " throws")?;
                }
                write!(f, " {result}")
            }
            TyKind::Archetype { name, .. } => write!(f, "{name}"),
            TyKind::Metatype(t) => write!(f, "{t}.Type"),
            TyKind::Error(n) => write!(f, "<error {n}>"),
        }
    }
}

impl TyKind {
    pub fn is_error(&self) -> bool {
        matches!(self, TyKind::Error(_))
    }

    /// Replace each archetype found in `substitutions` with its bound
    /// type, recursing through compound shapes. Used by the generic
    /// specializer to build a concrete function type from a generic one.
    pub fn substitute(self: &Ty, interner: &TypeInterner, substitutions: &[(Ty, Ty)]) -> Ty {
        if let Some((_, replacement)) = substitutions.iter().find(|(from, _)| Arc::ptr_eq(from, self)) {
            return replacement.clone();
        }
        match self.as_ref() {
            TyKind::Nominal { decl, name, args } => {
                let new_args: Vec<Ty> = args
                    .iter()
                    .map(|a| a.substitute(interner, substitutions))
                    .collect();
                interner.nominal(*decl, name.clone(), new_args)
            }
            TyKind::Tuple(elems) => {
                let new_elems: Vec<Ty> = elems
                    .iter()
                    .map(|e| e.substitute(interner, substitutions))
                    .collect();
                interner.tuple(new_elems)
            }
            TyKind::Function {
                params,
                result,
                throws,
            } => {
                let new_params: Vec<Ty> = params
                    .iter()
                    .map(|p| p.substitute(interner, substitutions))
                    .collect();
                let new_result = result.substitute(interner, substitutions);
                interner.function(new_params, new_result, *throws)
            }
            TyKind::Metatype(t) => interner.metatype(t.substitute(interner, substitutions)),
            _ => self.clone(),
        }
    }
}

/// Hash-conses [`TyKind`]s behind `Arc`, mirroring `vex-compiler`'s
/// `TypeInterner` exactly, generalized from its closed three-variant enum
/// to the full canonical type language spec §3.1 needs.
pub struct TypeInterner {
    cache: DashMap<TyKind, Ty>,
    next_error_id: std::sync::atomic::AtomicU32,
}

impl TypeInterner {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
            next_error_id: std::sync::atomic::AtomicU32::new(0),
        }
    }

    pub fn intern(&self, kind: TyKind) -> Ty {
        if let Some(existing) = self.cache.get(&kind) {
            return existing.clone();
        }
        self.cache.entry(kind.clone()).or_insert_with(|| Arc::new(kind)).clone()
    }

    pub fn builtin(&self, b: BuiltinTy) -> Ty {
        self.intern(TyKind::Builtin(b))
    }

    pub fn void(&self) -> Ty {
        self.builtin(BuiltinTy::Void)
    }

    pub fn bool_(&self) -> Ty {
        self.builtin(BuiltinTy::Bool)
    }

    pub fn int(&self) -> Ty {
        self.builtin(BuiltinTy::Int)
    }

    pub fn nominal(&self, decl: DeclId, name: impl Into<String>, args: Vec<Ty>) -> Ty {
        self.intern(TyKind::Nominal {
            decl,
            name: name.into(),
            args,
        })
    }

    pub fn tuple(&self, elems: Vec<Ty>) -> Ty {
        if elems.len() == 1 {
            return elems.into_iter().next().expect("len checked above");
        }
        self.intern(TyKind::Tuple(elems))
    }

    pub fn function(&self, params: Vec<Ty>, result: Ty, throws: bool) -> Ty {
        self.intern(TyKind::Function {
            params,
            result,
            throws,
        })
    }

    pub fn archetype(&self, name: impl Into<String>, depth: u32, index: u32) -> Ty {
        self.intern(TyKind::Archetype {
            name: name.into(),
            depth,
            index,
        })
    }

    pub fn metatype(&self, instance: Ty) -> Ty {
        self.intern(TyKind::Metatype(instance))
    }

    /// A fresh error type, never equal to any other type (including other
    /// error types), so that one type error can't mask a second one via
    /// accidental unification.
    pub fn fresh_error(&self) -> Ty {
        let id = self
            .next_error_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Arc::new(TyKind::Error(id))
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structurally_equal_types_are_pointer_equal() {
        let interner = TypeInterner::new();
        let a = interner.nominal(DeclId(1), "Array", vec![interner.int()]);
        let b = interner.nominal(DeclId(1), "Array", vec![interner.int()]);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn distinct_generic_arguments_are_distinct_types() {
        let interner = TypeInterner::new();
        let ints = interner.nominal(DeclId(1), "Array", vec![interner.int()]);
        let bools = interner.nominal(DeclId(1), "Array", vec![interner.bool_()]);
        assert!(!Arc::ptr_eq(&ints, &bools));
    }

    #[test]
    fn error_types_never_unify() {
        let interner = TypeInterner::new();
        let e1 = interner.fresh_error();
        let e2 = interner.fresh_error();
        assert_ne!(e1, e2);
    }

    #[test]
    fn substitute_replaces_archetype_in_function_type() {
        let interner = TypeInterner::new();
        let t = interner.archetype("T", 0, 0);
        let generic_fn = interner.function(vec![t.clone()], t.clone(), false);
        let concrete_fn = generic_fn.substitute(&interner, &[(t, interner.int())]);
        assert_eq!(concrete_fn.to_string(), "(Int) -> Int");
    }

    #[test]
    fn display_formats_generic_nominal() {
        let interner = TypeInterner::new();
        let arr = interner.nominal(DeclId(2), "Array", vec![interner.int()]);
        assert_eq!(arr.to_string(), "Array<Int>");
    }
}
