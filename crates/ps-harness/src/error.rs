use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageScriptError {
    #[error(transparent)]
    Source(#[from] std::io::Error),
    #[error("Code indented with mixed tabs/spaces.")]
    MixedIndent,
    #[error("Invalid {directive} directive: {message}")]
    HeaderSyntax { directive: String, message: String },
    #[error("Synthesized script does not compile: {0}")]
    Compile(Box<rhai::ParseError>),
    #[error(transparent)]
    Eval(Box<rhai::EvalAltResult>),
    #[error("Script returned an unsupported value of type {type_name}")]
    UnsupportedValue { type_name: String },
}
