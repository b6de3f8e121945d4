use limelight_resolver::ResolveError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CssError>;

#[derive(Debug, Error)]
pub enum CssError {
    /// `:global(...)` / `:local(...)` without a class selector argument.
    #[error("malformed scope directive `{directive}` in {file}: expected a class selector argument")]
    MalformedScopeDirective { directive: String, file: String },

    /// A mixin URL named an unregistered gem.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
