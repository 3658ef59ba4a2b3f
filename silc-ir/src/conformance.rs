//! Class v-tables and protocol witness tables: the two indirect-dispatch
//! tables `ClassMethod`/`WitnessMethod` instructions resolve against, plus
//! the `Conformance` chain those witness tables are resolved through.

use serde::{Deserialize, Serialize};
use silc_types::Ty;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VTableEntry {
    pub member: String,
    pub implementing_function: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VTable {
    pub class: Ty,
    pub entries: Vec<VTableEntry>,
}

impl VTable {
    pub fn lookup(&self, member: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.member == member)
            .map(|e| e.implementing_function.as_str())
    }
}

/// An owned `(depth, index) -> replacement` generic-parameter substitution
/// list: the conformance-chain equivalent of [`crate::clone::Substitutions`]'s
/// map, kept as plain data (no interner borrow) so it can live inside a
/// `Conformance` across a `Clone`/serialize boundary.
pub type SubstitutionList = Vec<((u32, u32), Ty)>;

/// One entry of a witness table, per spec's four requirement kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WitnessEntry {
    /// A protocol the conformed-to protocol refines, satisfied by a nested
    /// conformance of the same conforming type.
    BaseProtocol {
        protocol: String,
        conformance: Box<Conformance>,
    },
    /// An associated type requirement, resolved to its concrete target.
    AssociatedType { name: String, target: Ty },
    /// An associated type's own protocol conformance.
    AssociatedTypeProtocol {
        name: String,
        protocol: String,
        conformance: Box<Conformance>,
    },
    /// A method requirement, resolved to the concrete witness function.
    Method {
        requirement: String,
        witness_function: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WitnessTable {
    pub conforming_type: Ty,
    pub protocol: String,
    pub entries: Vec<WitnessEntry>,
}

impl WitnessTable {
    /// Looks up a method requirement's witness function; the other three
    /// entry kinds aren't method-dispatch targets.
    pub fn lookup(&self, requirement: &str) -> Option<&str> {
        self.entries.iter().find_map(|e| match e {
            WitnessEntry::Method {
                requirement: r,
                witness_function,
            } if r == requirement => Some(witness_function.as_str()),
            _ => None,
        })
    }
}

/// How a type conforms to a protocol: directly (`Normal`, possibly still a
/// declaration awaiting its table), through a superclass's conformance
/// (`Inherited`), or through a generic conformance narrowed by a
/// substitution list (`Specialized`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConformanceKind {
    /// `table` is `None` while the conformance is only declared; resolving
    /// it for the first time upgrades this to `Some` in place.
    Normal { table: Option<WitnessTable> },
    Inherited(Box<Conformance>),
    Specialized {
        generic: Box<Conformance>,
        substitutions: SubstitutionList,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conformance {
    pub conforming_type: Ty,
    pub protocol: String,
    pub kind: ConformanceKind,
}

impl Conformance {
    pub fn normal(conforming_type: Ty, protocol: impl Into<String>, table: Option<WitnessTable>) -> Self {
        Self {
            conforming_type,
            protocol: protocol.into(),
            kind: ConformanceKind::Normal { table },
        }
    }

    pub fn inherited(conforming_type: Ty, protocol: impl Into<String>, parent: Conformance) -> Self {
        Self {
            conforming_type,
            protocol: protocol.into(),
            kind: ConformanceKind::Inherited(Box::new(parent)),
        }
    }

    pub fn specialized(
        conforming_type: Ty,
        protocol: impl Into<String>,
        generic: Conformance,
        substitutions: SubstitutionList,
    ) -> Self {
        Self {
            conforming_type,
            protocol: protocol.into(),
            kind: ConformanceKind::Specialized {
                generic: Box::new(generic),
                substitutions,
            },
        }
    }

    /// The `Normal` conformance this chain ultimately reduces to, without
    /// accumulating substitutions (use [`Conformance::resolve`] for that).
    pub fn normal_root(&self) -> &Conformance {
        let mut current = self;
        loop {
            match &current.kind {
                ConformanceKind::Normal { .. } => return current,
                ConformanceKind::Inherited(parent) => current = parent,
                ConformanceKind::Specialized { generic, .. } => current = generic,
            }
        }
    }

    /// Walks `Inherited`/`Specialized` wrappers down to the `Normal` root,
    /// accumulating each `Specialized` layer's substitutions outermost
    /// first, and returns that root's table (`None` if it's still a bare
    /// declaration) paired with the accumulated substitution list.
    pub fn resolve(&self) -> (Option<&WitnessTable>, SubstitutionList) {
        let mut substitutions = SubstitutionList::new();
        let mut current = self;
        loop {
            match &current.kind {
                ConformanceKind::Normal { table } => return (table.as_ref(), substitutions),
                ConformanceKind::Inherited(parent) => current = parent,
                ConformanceKind::Specialized { generic, substitutions: layer } => {
                    substitutions.extend(layer.iter().cloned());
                    current = generic;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_types::TypeInterner;

    fn any_ty(interner: &TypeInterner) -> Ty {
        interner.void()
    }

    #[test]
    fn normal_conformance_resolves_to_its_own_table() {
        let interner = TypeInterner::new();
        let ty = any_ty(&interner);
        let table = WitnessTable {
            conforming_type: ty.clone(),
            protocol: "Equatable".to_string(),
            entries: vec![WitnessEntry::Method {
                requirement: "eq".to_string(),
                witness_function: "Point_eq".to_string(),
            }],
        };
        let conformance = Conformance::normal(ty, "Equatable", Some(table));
        let (resolved, substitutions) = conformance.resolve();
        assert!(resolved.is_some());
        assert!(substitutions.is_empty());
        assert_eq!(resolved.unwrap().lookup("eq"), Some("Point_eq"));
    }

    #[test]
    fn declaration_only_conformance_resolves_to_no_table() {
        let interner = TypeInterner::new();
        let conformance = Conformance::normal(any_ty(&interner), "Equatable", None);
        let (resolved, _) = conformance.resolve();
        assert!(resolved.is_none());
    }

    #[test]
    fn inherited_conformance_resolves_through_to_the_parent_table() {
        let interner = TypeInterner::new();
        let base_ty = any_ty(&interner);
        let table = WitnessTable {
            conforming_type: base_ty.clone(),
            protocol: "Drawable".to_string(),
            entries: vec![WitnessEntry::Method {
                requirement: "draw".to_string(),
                witness_function: "Shape_draw".to_string(),
            }],
        };
        let base = Conformance::normal(base_ty, "Drawable", Some(table));
        let sub_ty = any_ty(&interner);
        let inherited = Conformance::inherited(sub_ty, "Drawable", base);

        let (resolved, substitutions) = inherited.resolve();
        assert!(substitutions.is_empty());
        assert_eq!(resolved.unwrap().lookup("draw"), Some("Shape_draw"));
    }

    #[test]
    fn specialized_conformance_accumulates_substitutions_outermost_first() {
        let interner = TypeInterner::new();
        let generic_ty = any_ty(&interner);
        let table = WitnessTable {
            conforming_type: generic_ty.clone(),
            protocol: "Collection".to_string(),
            entries: vec![],
        };
        let generic = Conformance::normal(generic_ty, "Collection", Some(table));
        let inner_subst: SubstitutionList = vec![((0, 0), interner.void())];
        let once_specialized = Conformance::specialized(any_ty(&interner), "Collection", generic, inner_subst.clone());
        let outer_subst: SubstitutionList = vec![((1, 0), interner.void())];
        let twice_specialized =
            Conformance::specialized(any_ty(&interner), "Collection", once_specialized, outer_subst.clone());

        let (resolved, substitutions) = twice_specialized.resolve();
        assert!(resolved.is_some());
        assert_eq!(substitutions.len(), 2);
        assert_eq!(substitutions[0].0, (1, 0));
        assert_eq!(substitutions[1].0, (0, 0));
    }
}
