//! Top-level module writer/reader tying the signature, record framing,
//! and on-disk hash tables together, plus the lazy, on-demand reader
//! the rest of the crate builds toward.

use crate::cache::{CacheState, LazyEntry};
use crate::emission::{plan_emission, EmissionPolicy};
use crate::errors::{SerializeError, SerializeResult};
use crate::hashtable::OnDiskHashTable;
use crate::records::{read_record, write_record, RecordKind};
use crate::signature::Signature;
use silc_ir::{Function, GlobalVariable, Module, VTable, WitnessTable};
use std::cell::RefCell;
use std::collections::HashMap;

/// Invoked when a lookup misses in the local tables: the hook a caller
/// installs to pull a declaration's body in from another already-loaded
/// module, mirroring `silc_ir::Module::link_function`'s `LinkMode` at
/// the serialized-container layer.
pub trait ExternalLinker {
    fn resolve_function(&self, name: &str) -> Option<Function>;
}

fn declaration_only(function: &Function) -> Function {
    let mut decl = function.clone();
    decl.blocks.clear();
    decl.linkage = decl.linkage.make_external();
    decl
}

pub fn write_module(module: &Module, policy: EmissionPolicy) -> SerializeResult<Vec<u8>> {
    let plan = plan_emission(module, policy);

    let mut sil_block = Vec::new();
    let mut function_table = OnDiskHashTable::new();
    for function in module.functions() {
        let include_body = plan.get(&function.name).copied().unwrap_or(false);
        let record = if include_body { function.clone() } else { declaration_only(function) };
        let payload = serde_json::to_vec(&record)?;
        let offset = write_record(&mut sil_block, RecordKind::Function, &payload);
        function_table.insert(function.name.clone(), offset);
    }

    let mut vtable_table = OnDiskHashTable::new();
    for vtable in module.vtables() {
        let payload = serde_json::to_vec(vtable)?;
        let offset = write_record(&mut sil_block, RecordKind::VTable, &payload);
        vtable_table.insert(vtable.class.to_string(), offset);
    }

    let mut witness_table_table = OnDiskHashTable::new();
    for table in module.witness_tables() {
        let payload = serde_json::to_vec(table)?;
        let offset = write_record(&mut sil_block, RecordKind::WitnessTable, &payload);
        witness_table_table.insert(format!("{}:{}", table.conforming_type, table.protocol), offset);
    }

    let mut global_table = OnDiskHashTable::new();
    for global in module.globals() {
        let payload = serde_json::to_vec(global)?;
        let offset = write_record(&mut sil_block, RecordKind::Global, &payload);
        global_table.insert(global.name.clone(), offset);
    }

    let mut index_block = Vec::new();
    function_table.write(&mut index_block);
    vtable_table.write(&mut index_block);
    witness_table_table.write(&mut index_block);
    global_table.write(&mut index_block);

    let mut out = Vec::new();
    Signature::current().write(&mut out);
    out.extend_from_slice(&(sil_block.len() as u64).to_le_bytes());
    out.extend_from_slice(&sil_block);
    out.extend_from_slice(&index_block);
    Ok(out)
}

pub struct LazyModule {
    raw: Vec<u8>,
    functions: OnDiskHashTable,
    vtables: OnDiskHashTable,
    witness_tables: OnDiskHashTable,
    globals: OnDiskHashTable,
    function_cache: RefCell<HashMap<String, LazyEntry<Function>>>,
    external_linker: Option<Box<dyn ExternalLinker>>,
}

impl LazyModule {
    pub fn read(bytes: &[u8]) -> SerializeResult<Self> {
        let (_sig, rest) = Signature::read(bytes)?;
        if rest.len() < 8 {
            return Err(SerializeError::Truncated { needed: 8, available: rest.len() });
        }
        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&rest[0..8]);
        let sil_len = u64::from_le_bytes(len_bytes) as usize;
        let rest = &rest[8..];
        if rest.len() < sil_len {
            return Err(SerializeError::Truncated { needed: sil_len, available: rest.len() });
        }
        let (sil_block, index_bytes) = rest.split_at(sil_len);

        let (functions, index_bytes) = OnDiskHashTable::read(index_bytes)?;
        let (vtables, index_bytes) = OnDiskHashTable::read(index_bytes)?;
        let (witness_tables, index_bytes) = OnDiskHashTable::read(index_bytes)?;
        let (globals, _rest) = OnDiskHashTable::read(index_bytes)?;

        Ok(Self {
            raw: sil_block.to_vec(),
            functions,
            vtables,
            witness_tables,
            globals,
            function_cache: RefCell::new(HashMap::new()),
            external_linker: None,
        })
    }

    pub fn with_external_linker(mut self, linker: Box<dyn ExternalLinker>) -> Self {
        self.external_linker = Some(linker);
        self
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.names()
    }

    pub fn cache_state(&self, name: &str) -> Option<CacheState> {
        self.function_cache.borrow().get(name).map(|e| e.state())
    }

    /// Loads and deserializes the named function, deferring to the
    /// external linker if this container has no local record for it (an
    /// external declaration whose body lives in another module).
    pub fn get_function(&self, name: &str) -> SerializeResult<Function> {
        if let Some(entry) = self.function_cache.borrow_mut().get_mut(name) {
            return entry.force();
        }
        match self.functions.get(name) {
            Some(offset) => {
                let (_, payload, _) = read_record(&self.raw, offset)?;
                let mut entry = LazyEntry::new(payload.to_vec());
                let value = entry.force()?;
                self.function_cache.borrow_mut().insert(name.to_string(), entry);
                Ok(value)
            }
            None => self
                .external_linker
                .as_ref()
                .and_then(|linker| linker.resolve_function(name))
                .ok_or_else(|| SerializeError::NotFound(name.to_string())),
        }
    }

    /// Reads a function's signature (name, type, linkage) without forcing
    /// a full resident deserialization: a fresh lookup is recorded as
    /// `Partial` rather than `Resident`, so a later `get_function` still
    /// does the full parse and caching rather than treating this peek as
    /// having already forced the entry. Matches the driver's
    /// module-interface path, which only needs declarations.
    pub fn get_function_declaration_only(&self, name: &str) -> SerializeResult<Function> {
        {
            let cache = self.function_cache.borrow();
            if let Some(entry) = cache.get(name) {
                if let Some(value) = entry.peek() {
                    return Ok(declaration_only(value));
                }
            }
        }
        let offset = self.functions.get(name).ok_or_else(|| SerializeError::NotFound(name.to_string()))?;
        let (_, payload, _) = read_record(&self.raw, offset)?;
        let function: Function = serde_json::from_slice(payload)?;
        let mut entry = LazyEntry::new(payload.to_vec());
        entry.mark_partial();
        self.function_cache.borrow_mut().entry(name.to_string()).or_insert(entry);
        Ok(declaration_only(&function))
    }

    pub fn get_vtable(&self, class_name: &str) -> SerializeResult<VTable> {
        let offset = self.vtables.get(class_name).ok_or_else(|| SerializeError::NotFound(class_name.to_string()))?;
        let (_, payload, _) = read_record(&self.raw, offset)?;
        Ok(serde_json::from_slice(payload)?)
    }

    pub fn get_witness_table(&self, conforming_type: &str, protocol: &str) -> SerializeResult<WitnessTable> {
        let key = format!("{conforming_type}:{protocol}");
        let offset = self.witness_tables.get(&key).ok_or_else(|| SerializeError::NotFound(key.clone()))?;
        let (_, payload, _) = read_record(&self.raw, offset)?;
        Ok(serde_json::from_slice(payload)?)
    }

    pub fn get_global(&self, name: &str) -> SerializeResult<GlobalVariable> {
        let offset = self.globals.get(name).ok_or_else(|| SerializeError::NotFound(name.to_string()))?;
        let (_, payload, _) = read_record(&self.raw, offset)?;
        Ok(serde_json::from_slice(payload)?)
    }

    /// Forces every entry, producing a fully materialized [`Module`].
    pub fn materialize(&self) -> SerializeResult<Module> {
        let mut module = Module::new();
        for name in self.functions.names() {
            let function = self.get_function(name)?;
            module.add_function(function).map_err(|e| SerializeError::CorruptRecord(e.to_string()))?;
        }
        for name in self.vtables.names() {
            module.add_vtable(self.get_vtable(name)?);
        }
        for name in self.witness_tables.names() {
            let (conforming, protocol) = name.split_once(':').unwrap_or((name, ""));
            module.add_witness_table(self.get_witness_table(conforming, protocol)?);
        }
        for name in self.globals.names() {
            module.add_global(self.get_global(name)?);
        }
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silc_ir::Linkage;
    use silc_types::TypeInterner;

    fn sample_module() -> Module {
        let interner = TypeInterner::new();
        let mut module = Module::new();
        module
            .add_function(Function::new("pub_fn", interner.function(vec![], interner.void(), false), Linkage::Public))
            .unwrap();
        module
            .add_function(Function::new(
                "priv_fn",
                interner.function(vec![], interner.void(), false),
                Linkage::Private,
            ))
            .unwrap();
        module
    }

    #[test]
    fn round_trips_a_module_and_demotes_private_functions_to_declarations() {
        let module = sample_module();
        let bytes = write_module(&module, EmissionPolicy::Default).unwrap();
        let lazy = LazyModule::read(&bytes).unwrap();

        let pub_fn = lazy.get_function("pub_fn").unwrap();
        assert_eq!(pub_fn.linkage, Linkage::PublicExternal);

        let priv_fn = lazy.get_function("priv_fn").unwrap();
        assert!(priv_fn.is_declaration());
    }

    #[test]
    fn forcing_a_function_twice_reuses_the_cached_deserialization() {
        let module = sample_module();
        let bytes = write_module(&module, EmissionPolicy::SerializeAll).unwrap();
        let lazy = LazyModule::read(&bytes).unwrap();

        assert_eq!(lazy.cache_state("pub_fn"), None);
        lazy.get_function("pub_fn").unwrap();
        assert_eq!(lazy.cache_state("pub_fn"), Some(CacheState::Resident));
        lazy.get_function("pub_fn").unwrap();
        assert_eq!(lazy.cache_state("pub_fn"), Some(CacheState::Resident));
    }

    #[test]
    fn declaration_only_lookup_marks_the_entry_partial_without_forcing_it() {
        let module = sample_module();
        let bytes = write_module(&module, EmissionPolicy::SerializeAll).unwrap();
        let lazy = LazyModule::read(&bytes).unwrap();

        assert_eq!(lazy.cache_state("pub_fn"), None);
        let decl = lazy.get_function_declaration_only("pub_fn").unwrap();
        assert!(decl.is_declaration());
        assert_eq!(lazy.cache_state("pub_fn"), Some(CacheState::Partial));

        let full = lazy.get_function("pub_fn").unwrap();
        assert_eq!(lazy.cache_state("pub_fn"), Some(CacheState::Resident));
        assert_eq!(full.name, "pub_fn");
    }

    struct StubLinker;
    impl ExternalLinker for StubLinker {
        fn resolve_function(&self, name: &str) -> Option<Function> {
            if name == "elsewhere" {
                let interner = TypeInterner::new();
                Some(Function::new(name, interner.function(vec![], interner.void(), false), Linkage::Shared))
            } else {
                None
            }
        }
    }

    #[test]
    fn an_unresolved_name_falls_back_to_the_external_linker() {
        let module = sample_module();
        let bytes = write_module(&module, EmissionPolicy::Default).unwrap();
        let lazy = LazyModule::read(&bytes).unwrap().with_external_linker(Box::new(StubLinker));

        let resolved = lazy.get_function("elsewhere").unwrap();
        assert_eq!(resolved.name, "elsewhere");
        assert!(lazy.get_function("nope").is_err());
    }
}
