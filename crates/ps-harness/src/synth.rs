use std::collections::BTreeMap;

use ps_core::{Bindings, GlobalAccess, ScriptValue, Signature};
use rhai::{Dynamic, Engine, Map, Scope, AST};

use crate::bridge::{dynamic_to_value, value_to_dynamic, value_to_rhai_literal};
use crate::error::PageScriptError;

// One reload's worth of executable state: the synthesized wrapper source, its
// compiled form and the global resolution plan it was built against.
#[derive(Debug)]
pub(crate) struct CompiledScript {
    source: String,
    ast: AST,
    plan: Vec<(String, GlobalAccess)>,
    signature: Signature,
}

impl CompiledScript {
    pub(crate) fn build(
        identifier: &str,
        body: &[String],
        indent: &str,
        plan: Vec<(String, GlobalAccess)>,
        signature: Signature,
    ) -> Result<Self, PageScriptError> {
        let source = synthesize_source(identifier, body, indent, &signature);
        let ast = Engine::new()
            .compile(&source)
            .map_err(|error| PageScriptError::Compile(Box::new(error)))?;
        Ok(Self {
            source,
            ast,
            plan,
            signature,
        })
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn invoke(
        &self,
        bindings: &Bindings,
        globals: &BTreeMap<String, ScriptValue>,
        kwargs: BTreeMap<String, ScriptValue>,
        extras: BTreeMap<String, ScriptValue>,
    ) -> Result<ScriptValue, PageScriptError> {
        let mut scope = Scope::new();

        let mut global_snapshot = Map::new();
        for (name, access) in &self.plan {
            let value = resolve_global(name, access, bindings, globals);
            let dynamic = value_to_dynamic(&value);
            global_snapshot.insert(name.clone().into(), dynamic.clone());
            scope.push_dynamic(name.to_string(), dynamic);
        }

        let mut kwargs_map = Map::new();
        for (name, value) in &kwargs {
            kwargs_map.insert(name.clone().into(), value_to_dynamic(value));
        }
        let mut extras_map = Map::new();
        for (name, value) in &extras {
            extras_map.insert(name.clone().into(), value_to_dynamic(value));
        }

        // Entry snapshot of the local scope: merged parameters plus the
        // catch-all map, mirroring what the wrapper hands to the body.
        let mut local_snapshot = Map::new();
        for param in &self.signature.params {
            let merged = kwargs.get(&param.name).unwrap_or(&param.default);
            local_snapshot.insert(param.name.clone().into(), value_to_dynamic(merged));
        }
        if let Some(catch_all) = &self.signature.catch_all {
            local_snapshot.insert(
                catch_all.clone().into(),
                Dynamic::from_map(extras_map.clone()),
            );
        }

        scope.push_dynamic("__kwargs".to_string(), Dynamic::from_map(kwargs_map));
        scope.push_dynamic("__extras".to_string(), Dynamic::from_map(extras_map));

        let mut engine = Engine::new();
        engine.register_fn("globals", move || global_snapshot.clone());
        engine.register_fn("locals", move || local_snapshot.clone());

        let result = engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &self.ast)
            .map_err(PageScriptError::Eval)?;
        dynamic_to_value(result)
    }
}

fn resolve_global(
    name: &str,
    access: &GlobalAccess,
    bindings: &Bindings,
    globals: &BTreeMap<String, ScriptValue>,
) -> ScriptValue {
    match access {
        GlobalAccess::Injected => globals.get(name).cloned().unwrap_or(ScriptValue::Null),
        GlobalAccess::SlotOrLiteral { target } => bindings
            .slot(target)
            .unwrap_or_else(|| ScriptValue::String(target.clone())),
    }
}

fn synthesize_source(
    identifier: &str,
    body: &[String],
    indent: &str,
    signature: &Signature,
) -> String {
    let mut param_names: Vec<&str> = signature
        .params
        .iter()
        .map(|param| param.name.as_str())
        .collect();
    if let Some(catch_all) = &signature.catch_all {
        param_names.push(catch_all.as_str());
    }

    let mut source = String::new();
    source.push_str(&format!(
        "let {} = |{}| {{\n",
        identifier,
        param_names.join(", ")
    ));
    for line in body {
        source.push_str(indent);
        source.push_str(line);
    }
    if !source.ends_with('\n') {
        source.push('\n');
    }
    source.push_str("};\n");

    let mut call_args: Vec<String> = Vec::new();
    for param in &signature.params {
        source.push_str(&format!(
            "let __arg_{} = if \"{}\" in __kwargs {{ __kwargs[\"{}\"] }} else {{ {} }};\n",
            param.name,
            param.name,
            param.name,
            value_to_rhai_literal(&param.default)
        ));
        call_args.push(format!("__arg_{}", param.name));
    }
    if let Some(catch_all) = &signature.catch_all {
        source.push_str(&format!("let __arg_{} = __extras;\n", catch_all));
        call_args.push(format!("__arg_{}", catch_all));
    }
    source.push_str(&format!("{}.call({})\n", identifier, call_args.join(", ")));
    source
}
