//! The top-level container: owns every function, v-table, witness table,
//! and global variable in one compilation unit. Grounded on the shape of
//! `original_source/lib/SIL/SILModule.cpp`'s module-as-registry design,
//! expressed here as owning `Vec`s plus name-indexed lookup rather than
//! that file's intrusive linked lists.

use crate::conformance::{Conformance, SubstitutionList, VTable, WitnessTable};
use crate::errors::{IrError, IrResult};
use crate::function::{Function, Linkage};
use serde::{Deserialize, Serialize};
use silc_types::Ty;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    pub ty: Ty,
    pub linkage: Linkage,
}

/// Controls how much external-module linking `Module::link_function`
/// performs when a caller asks to resolve a declaration-only function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Resolve nothing; leave declarations as declarations.
    None,
    /// Resolve every external declaration found in a linked module.
    All,
    /// Resolve only functions whose linkage is transparent-eligible or
    /// shared: the minimum needed to keep the specializer and inliner
    /// working across module boundaries.
    DeserializeTransparentAndShared,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Module {
    functions: Vec<Function>,
    vtables: Vec<VTable>,
    witness_tables: Vec<WitnessTable>,
    globals: Vec<GlobalVariable>,
    /// Memoizes `lookup_witness_table`'s chain walk per `(conforming_type,
    /// protocol)` so repeated `witness_method` lowering for the same
    /// conformance doesn't re-walk it. Not part of the on-disk format.
    #[serde(skip)]
    witness_table_cache: RefCell<HashMap<(Ty, String), Option<WitnessTable>>>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, function: Function) -> IrResult<()> {
        if self.lookup_function(&function.name).is_some() {
            return Err(IrError::DuplicateFunction(function.name));
        }
        self.functions.push(function);
        Ok(())
    }

    pub fn lookup_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn lookup_function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.functions.iter_mut().find(|f| f.name == name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter()
    }

    pub fn functions_mut(&mut self) -> impl Iterator<Item = &mut Function> {
        self.functions.iter_mut()
    }

    /// Returns the existing function of this name if one is shared or
    /// already present, otherwise inserts `make` and returns it — the
    /// one-definition-per-shared-name contract `Linkage::Shared`
    /// requires for deduplicated generic specializations and witness
    /// thunks.
    pub fn get_or_create_shared(&mut self, name: &str, make: impl FnOnce() -> Function) -> &mut Function {
        if self.lookup_function(name).is_none() {
            self.functions.push(make());
        }
        self.lookup_function_mut(name).expect("just inserted or already present")
    }

    pub fn add_vtable(&mut self, vtable: VTable) {
        self.vtables.push(vtable);
    }

    pub fn vtables(&self) -> &[VTable] {
        &self.vtables
    }

    pub fn add_witness_table(&mut self, table: WitnessTable) {
        self.witness_tables.push(table);
    }

    pub fn witness_tables(&self) -> &[WitnessTable] {
        &self.witness_tables
    }

    /// Resolves a conformance to its witness table, per spec §3.4: walks
    /// `Inherited`/`Specialized` wrappers to the `Normal` root,
    /// accumulating substitutions, then resolves that root against this
    /// module's own registry (the conformance handle's embedded table is
    /// authoritative if present; otherwise the module's `add_witness_table`
    /// registry is consulted, since a declaration can be upgraded to a
    /// definition there without every outstanding `Conformance` handle
    /// being rebuilt). Returns `None` if the root is still a declaration
    /// with no registered definition.
    pub fn lookup_witness_table(&self, conformance: &Conformance) -> (Option<WitnessTable>, SubstitutionList) {
        let (embedded, substitutions) = conformance.resolve();
        if let Some(table) = embedded {
            return (Some(table.clone()), substitutions);
        }

        let root = conformance.normal_root();
        let key = (root.conforming_type.clone(), root.protocol.clone());
        if let Some(cached) = self.witness_table_cache.borrow().get(&key) {
            return (cached.clone(), substitutions);
        }

        let resolved = self
            .witness_tables
            .iter()
            .find(|t| t.conforming_type == root.conforming_type && t.protocol == root.protocol)
            .cloned();
        self.witness_table_cache.borrow_mut().insert(key, resolved.clone());
        (resolved, substitutions)
    }

    pub fn add_global(&mut self, global: GlobalVariable) {
        self.globals.push(global);
    }

    pub fn globals(&self) -> &[GlobalVariable] {
        &self.globals
    }

    /// Demotes external-linkage declarations to bodies pulled in from
    /// `other`, per `mode`. Functions already carrying a body are left
    /// untouched regardless of mode.
    pub fn link_function(&mut self, name: &str, other: &Module, mode: LinkMode) -> bool {
        if mode == LinkMode::None {
            return false;
        }
        let Some(existing) = self.lookup_function(name) else { return false };
        if !existing.is_declaration() {
            return false;
        }
        let Some(donor) = other.lookup_function(name) else { return false };
        if donor.is_declaration() {
            return false;
        }
        let eligible = match mode {
            LinkMode::All => true,
            LinkMode::DeserializeTransparentAndShared => {
                donor.flags.transparent || donor.linkage == Linkage::Shared
            }
            LinkMode::None => false,
        };
        if !eligible {
            return false;
        }
        let donor_clone = donor.clone();
        if let Some(slot) = self.lookup_function_mut(name) {
            *slot = donor_clone;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_types::TypeInterner;

    fn void_fn(name: &str, linkage: Linkage) -> Function {
        let interner = TypeInterner::new();
        Function::new(name, interner.function(vec![], interner.void(), false), linkage)
    }

    #[test]
    fn adding_a_duplicate_function_name_is_rejected() {
        let mut module = Module::new();
        module.add_function(void_fn("f", Linkage::Hidden)).unwrap();
        let result = module.add_function(void_fn("f", Linkage::Hidden));
        assert!(matches!(result, Err(IrError::DuplicateFunction(_))));
    }

    #[test]
    fn get_or_create_shared_reuses_an_existing_definition() {
        let mut module = Module::new();
        module.add_function(void_fn("spec_Int", Linkage::Shared)).unwrap();
        let f = module.get_or_create_shared("spec_Int", || void_fn("spec_Int", Linkage::Shared));
        assert_eq!(f.name, "spec_Int");
        assert_eq!(module.functions().count(), 1);
    }

    #[test]
    fn linking_fills_in_an_external_declaration_from_another_module() {
        let mut consumer = Module::new();
        let declaration = void_fn("shared_fn", Linkage::Shared);
        assert!(declaration.is_declaration());
        consumer.add_function(declaration).unwrap();

        let mut provider = Module::new();
        let mut definition = void_fn("shared_fn", Linkage::Shared);
        let entry = definition.fresh_block();
        definition.blocks.push(crate::function::BasicBlock::new(entry));
        provider.add_function(definition).unwrap();

        let linked = consumer.link_function("shared_fn", &provider, LinkMode::All);
        assert!(linked);
        assert!(!consumer.lookup_function("shared_fn").unwrap().is_declaration());
    }

    #[test]
    fn witness_table_registered_on_the_module_resolves_a_bare_normal_conformance() {
        let interner = TypeInterner::new();
        let ty = interner.void();
        let mut module = Module::new();
        module.add_witness_table(WitnessTable {
            conforming_type: ty.clone(),
            protocol: "Drawable".to_string(),
            entries: vec![crate::conformance::WitnessEntry::Method {
                requirement: "draw".to_string(),
                witness_function: "Shape_draw".to_string(),
            }],
        });

        let conformance = Conformance::normal(ty, "Drawable", None);
        let (table, substitutions) = module.lookup_witness_table(&conformance);
        assert!(substitutions.is_empty());
        assert_eq!(table.unwrap().lookup("draw"), Some("Shape_draw"));
    }

    #[test]
    fn unregistered_conformance_resolves_to_no_table() {
        let interner = TypeInterner::new();
        let conformance = Conformance::normal(interner.void(), "Drawable", None);
        let module = Module::new();
        let (table, _) = module.lookup_witness_table(&conformance);
        assert!(table.is_none());
    }
}
