use std::collections::BTreeMap;

use ps_core::{Bindings, ScriptValue, Signature};

use crate::error::PageScriptError;
use crate::header::parse_header;
use crate::indent::{IndentOutcome, IndentScanner};
use crate::synth::CompiledScript;

const DEFAULT_INDENT: &str = "    ";

#[derive(Clone, Default)]
pub struct PageScriptOptions {
    pub bindings: Bindings,
    pub globals: BTreeMap<String, ScriptValue>,
}

#[derive(Debug)]
pub struct PageScript {
    identifier: String,
    source: String,
    bindings: Bindings,
    globals: BTreeMap<String, ScriptValue>,
    header: Vec<String>,
    body: Vec<String>,
    signature: Signature,
    indent: String,
    compiled: Option<CompiledScript>,
}

impl PageScript {
    pub fn new(
        text: impl Into<String>,
        identifier: impl Into<String>,
        options: PageScriptOptions,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            source: text.into(),
            bindings: options.bindings,
            globals: options.globals,
            header: Vec::new(),
            body: Vec::new(),
            signature: Signature::default(),
            indent: DEFAULT_INDENT.to_string(),
            compiled: None,
        }
    }

    pub fn reload(&mut self) -> Result<(), PageScriptError> {
        self.compiled = None;
        self.signature = Signature::default();
        let (header, body) = split_source(&self.source);
        self.header = header;
        self.body = body;

        let mut scanner = IndentScanner::new();
        for line in &self.body {
            scanner.scan_line(line);
        }
        self.indent = match scanner.finish() {
            IndentOutcome::Width(width) => " ".repeat(width),
            IndentOutcome::Unknown => DEFAULT_INDENT.to_string(),
            IndentOutcome::Mixed => return Err(PageScriptError::MixedIndent),
        };

        let parsed = parse_header(&self.header, &self.globals)?;
        self.signature = parsed.signature.clone();
        self.compiled = Some(CompiledScript::build(
            &self.identifier,
            &self.body,
            &self.indent,
            parsed.plan,
            parsed.signature,
        )?);
        Ok(())
    }

    // Scripts are authored live, so every call re-reads the current text.
    pub fn call(
        &mut self,
        kwargs: BTreeMap<String, ScriptValue>,
    ) -> Result<ScriptValue, PageScriptError> {
        self.reload()?;
        let (declared, extras) = self.filter_kwargs(kwargs);
        let compiled = self
            .compiled
            .as_ref()
            .expect("reload should leave behind a compiled unit");
        compiled.invoke(&self.bindings, &self.globals, declared, extras)
    }

    fn filter_kwargs(
        &self,
        kwargs: BTreeMap<String, ScriptValue>,
    ) -> (BTreeMap<String, ScriptValue>, BTreeMap<String, ScriptValue>) {
        let mut declared = BTreeMap::new();
        let mut extras = BTreeMap::new();
        for (name, value) in kwargs {
            if self.signature.declares(&name) {
                declared.insert(name, value);
            } else if self.signature.catch_all.is_some() {
                extras.insert(name, value);
            }
            // Without a catch-all, unknown keywords are dropped silently.
        }
        (declared, extras)
    }

    pub(crate) fn set_source(&mut self, text: String) {
        self.source = text;
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn catch_all(&self) -> Option<&str> {
        self.signature.catch_all.as_deref()
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent
    }

    pub fn header_lines(&self) -> &[String] {
        &self.header
    }

    pub fn synthesized_source(&self) -> Option<&str> {
        self.compiled.as_ref().map(CompiledScript::source)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    pub fn globals(&self) -> &BTreeMap<String, ScriptValue> {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut BTreeMap<String, ScriptValue> {
        &mut self.globals
    }
}

fn split_source(source: &str) -> (Vec<String>, Vec<String>) {
    let mut header = Vec::new();
    let mut body = Vec::new();
    for line in source.split_inclusive('\n') {
        if line.starts_with("##") {
            header.push(line.trim().to_string());
        } else {
            body.push(line.to_string());
        }
    }
    (header, body)
}
