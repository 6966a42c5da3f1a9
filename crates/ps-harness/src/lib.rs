mod bridge;
mod error;
mod fs;
mod header;
mod indent;
mod literal;
mod script;
mod synth;

pub use error::PageScriptError;
pub use fs::FsPageScript;
pub use script::{PageScript, PageScriptOptions};
