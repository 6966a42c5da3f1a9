use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use ps_core::{Bindings, ScriptValue, Signature};

use crate::error::PageScriptError;
use crate::script::{PageScript, PageScriptOptions};

#[derive(Debug)]
pub struct FsPageScript {
    path: PathBuf,
    script: PageScript,
}

impl FsPageScript {
    pub fn new(path: impl Into<PathBuf>, options: PageScriptOptions) -> Result<Self, PageScriptError> {
        let path = path.into();
        let identifier = identifier_from_path(&path);
        Self::with_identifier(path, identifier, options)
    }

    pub fn with_identifier(
        path: impl Into<PathBuf>,
        identifier: impl Into<String>,
        options: PageScriptOptions,
    ) -> Result<Self, PageScriptError> {
        let path = path.into();
        // Open and close immediately so unreadable files fail at construction
        // instead of on the first call.
        File::open(&path)?;
        Ok(Self {
            path,
            script: PageScript::new(String::new(), identifier, options),
        })
    }

    pub fn reload(&mut self) -> Result<(), PageScriptError> {
        let text = fs::read_to_string(&self.path)?;
        self.script.set_source(text);
        self.script.reload()
    }

    pub fn call(
        &mut self,
        kwargs: BTreeMap<String, ScriptValue>,
    ) -> Result<ScriptValue, PageScriptError> {
        let text = fs::read_to_string(&self.path)?;
        self.script.set_source(text);
        self.script.call(kwargs)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn identifier(&self) -> &str {
        self.script.identifier()
    }

    pub fn signature(&self) -> &Signature {
        self.script.signature()
    }

    pub fn catch_all(&self) -> Option<&str> {
        self.script.catch_all()
    }

    pub fn indent_unit(&self) -> &str {
        self.script.indent_unit()
    }

    pub fn header_lines(&self) -> &[String] {
        self.script.header_lines()
    }

    pub fn synthesized_source(&self) -> Option<&str> {
        self.script.synthesized_source()
    }

    pub fn bindings(&self) -> &Bindings {
        self.script.bindings()
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        self.script.bindings_mut()
    }

    pub fn globals(&self) -> &BTreeMap<String, ScriptValue> {
        self.script.globals()
    }

    pub fn globals_mut(&mut self) -> &mut BTreeMap<String, ScriptValue> {
        self.script.globals_mut()
    }
}

// The identifier is the file basename without its final extension, stripped
// of anything outside [A-Za-z0-9_].
fn identifier_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name.as_str(),
    };
    stem.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect()
}
