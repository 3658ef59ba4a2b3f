//! Declaration graph: the common bookkeeping every declaration carries,
//! independent of which concrete item (function, struct, var, ...) it wraps.
//!
//! The parser/lexer collaborators (see `silc-parser`) still produce the
//! lightweight [`Item`](crate::Item) tree for the source text. Semantic
//! analysis lowers each `Item` into a [`Decl`] that additionally carries a
//! source range, an attribute set, an accessibility level, a validation
//! state, and a pointer back to its enclosing [`DeclContext`] — the four
//! pieces of bookkeeping every declaration needs per the data model.

use crate::{Function, Param, Type, TypeAlias, TypeParam};
use serde::{Deserialize, Serialize};

/// Effective accessibility level of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Accessibility {
    Private,
    Internal,
    Public,
}

impl Accessibility {
    /// `self` is valid as the accessibility of something nested in a
    /// context whose accessibility is `container`.
    pub fn at_least(self, floor: Accessibility) -> bool {
        self >= floor
    }
}

/// Idempotent-validation state machine carried by every declaration.
///
/// `being_validated` guards against infinite recursion: a request to
/// validate a decl that is already `BeingValidated` short-circuits rather
/// than re-entering (spec: "recursive requests during validation
/// short-circuit or fail with a precise diagnostic").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationState {
    Unvalidated,
    BeingValidated,
    EarlyValidated,
    Validated,
    /// Validation failed; the decl's type has been overwritten with the
    /// error sentinel and dependents should skip their own checks.
    Invalid,
}

impl Default for ValidationState {
    fn default() -> Self {
        ValidationState::Unvalidated
    }
}

/// A single recognized attribute. Closed set, not a stringly-typed bag —
/// `silc-sema`'s attribute checker validates combinations over this enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribute {
    Final,
    Required,
    Override,
    Unavailable { message: Option<String> },
    Objc,
    Transparent,
    Inline(InlineHint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineHint {
    Never,
    Always,
    Default,
}

/// A small ordered bag of [`Attribute`]s attached to a declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSet {
    attrs: Vec<Attribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attr: Attribute) {
        self.attrs.push(attr);
    }

    pub fn has_final(&self) -> bool {
        self.attrs.iter().any(|a| matches!(a, Attribute::Final))
    }

    pub fn has_required(&self) -> bool {
        self.attrs.iter().any(|a| matches!(a, Attribute::Required))
    }

    pub fn has_override(&self) -> bool {
        self.attrs.iter().any(|a| matches!(a, Attribute::Override))
    }

    pub fn unavailable_message(&self) -> Option<Option<&str>> {
        self.attrs.iter().find_map(|a| match a {
            Attribute::Unavailable { message } => Some(message.as_deref()),
            _ => None,
        })
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable_message().is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }
}

/// Opaque stand-in for the out-of-scope `SourceRange` collaborator
/// (spec §6: "opaque `SourceLoc` / `SourceRange`"). Line/column recovery
/// belongs to the source-map collaborator, not here.
pub use silc_support::SourceRange;

/// Index into a [`DeclContextArena`], identifying the lexical parent of a
/// declaration (a nominal, an extension, a function body, or the module
/// top level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclContextId(pub u32);

impl DeclContextId {
    pub const TOP_LEVEL: DeclContextId = DeclContextId(0);
}

/// Bookkeeping shared by every declaration kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclCommon {
    pub range: SourceRange,
    pub attrs: AttributeSet,
    pub accessibility: Accessibility,
    pub validation: ValidationState,
    pub context: DeclContextId,
}

impl DeclCommon {
    pub fn new(range: SourceRange, context: DeclContextId) -> Self {
        Self {
            range,
            attrs: AttributeSet::new(),
            accessibility: Accessibility::Internal,
            validation: ValidationState::Unvalidated,
            context,
        }
    }

    /// True if validation should short-circuit: already validated, or
    /// re-entrant while being validated.
    pub fn should_skip_validation(&self) -> bool {
        matches!(
            self.validation,
            ValidationState::Validated | ValidationState::BeingValidated | ValidationState::Invalid
        )
    }
}

/// Kind-specific payload for declarations that aren't already modeled by
/// an `Item` variant reused verbatim (see [`DeclKind`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedTypeDecl {
    pub name: String,
    pub bounds: Vec<crate::TraitBound>,
    pub default: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NominalKind {
    Struct,
    Enum,
    Class,
    Protocol,
}

/// A struct/enum/class/protocol declaration with its member list, unified
/// so inheritance-clause checking and member validation (spec §4.2)
/// operate uniformly across all four (the parser's `Item` tree keeps
/// `Struct`/`Enum`/`Trait` separate since they lex differently; sema's
/// view normalizes them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominalDecl {
    pub kind: NominalKind,
    pub name: String,
    pub type_params: Vec<TypeParam>,
    /// Syntactic inheritance list: superclass/raw-type/protocol names in
    /// source order, as written (duplicates and cycles are diagnosed by
    /// the inheritance-clause checker, not filtered out here).
    pub inherits: Vec<String>,
    pub members: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionDecl {
    pub extended_type: Type,
    pub inherits: Vec<String>,
    pub members: Vec<DeclId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub is_let: bool,
    pub ty: Option<Type>,
    pub initializer: Option<crate::Expression>,
    pub accessors: Vec<AccessorKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorKind {
    Get,
    Set,
    WillSet,
    DidSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    pub params: Vec<Param>,
    pub is_failable: bool,
    pub is_designated: bool,
    pub body: crate::Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestructorDecl {
    pub body: crate::Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptDecl {
    pub params: Vec<Param>,
    pub element_type: Type,
    pub accessors: Vec<AccessorKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumElementDecl {
    pub name: String,
    pub payload: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorDecl {
    pub symbol: String,
    pub is_infix: bool,
}

/// The closed sum of declaration kinds named in the data model. Where the
/// parser's `Item` already models the kind exactly (function, typealias,
/// enum-element-bearing `Enum`, const, trait impl), `Decl` wraps it
/// directly rather than duplicating fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclKind {
    Import(crate::Import),
    TypeAlias(TypeAlias),
    AssociatedType(AssociatedTypeDecl),
    GenericParam(TypeParam),
    Nominal(NominalDecl),
    Extension(ExtensionDecl),
    Var(VarDecl),
    Func(Function),
    Constructor(ConstructorDecl),
    Destructor(DestructorDecl),
    Subscript(SubscriptDecl),
    EnumElement(EnumElementDecl),
    Operator(OperatorDecl),
    TopLevel(crate::Statement),
}

/// A fully bookkept declaration node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decl {
    pub common: DeclCommon,
    pub kind: DeclKind,
}

impl Decl {
    pub fn new(common: DeclCommon, kind: DeclKind) -> Self {
        Self { common, kind }
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            DeclKind::TypeAlias(t) => Some(&t.name),
            DeclKind::AssociatedType(t) => Some(&t.name),
            DeclKind::GenericParam(t) => Some(&t.name),
            DeclKind::Nominal(n) => Some(&n.name),
            DeclKind::Var(v) => Some(&v.name),
            DeclKind::Func(f) => Some(&f.name),
            DeclKind::EnumElement(e) => Some(&e.name),
            _ => None,
        }
    }
}

/// Stable index for a [`Decl`] allocated in a [`DeclContextArena`].
/// Identity is this index, not a pointer — decls cross-reference each
/// other (e.g. override targets, member lists) by `DeclId`, which stays
/// valid independent of arena reallocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclId(pub u32);

