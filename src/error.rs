//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the polyview crate.
///
/// User-misuse variants leave host state exactly as it was before the
/// failed call. Initialization variants are fatal for startup.
#[derive(Debug)]
pub enum PolyviewError {
    /// A structure with the same type and name is already registered.
    DuplicateStructure {
        /// Type tag of the rejected structure.
        type_name: String,
        /// Instance name of the rejected structure.
        name: String,
    },
    /// No structures of this type tag have ever been registered.
    UnknownType {
        /// The requested type tag.
        type_name: String,
    },
    /// No structure with this type and name is registered.
    StructureNotFound {
        /// The requested type tag.
        type_name: String,
        /// The requested instance name.
        name: String,
    },
    /// An empty-name lookup was made while the type holds zero or several
    /// instances.
    AmbiguousLookup {
        /// The requested type tag.
        type_name: String,
        /// Number of instances currently registered under the type.
        count: usize,
    },
    /// A type-inferred lookup matched structures of more than one type.
    AmbiguousName {
        /// The requested instance name.
        name: String,
        /// Type tag of the first match.
        first_type: String,
        /// Type tag of the second match.
        second_type: String,
    },
    /// A type-inferred lookup matched nothing.
    NoStructureNamed {
        /// The requested instance name.
        name: String,
    },
    /// A typed query found the structure but it has a different concrete
    /// type.
    WrongType {
        /// Type tag of the structure.
        type_name: String,
        /// Instance name of the structure.
        name: String,
        /// Rust type that was requested.
        expected: &'static str,
    },
    /// `pop_context` was called with only the root context on the stack.
    PopRootContext,
    /// `init` was called on an already-initialized host.
    AlreadyInitialized,
    /// An operation needing the platform or render backend ran before
    /// `init`.
    NotInitialized,
    /// A screenshot was requested without an image sink configured.
    NoImageSink,
    /// The render backend could not read back the scene image.
    Readback(String),
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options or JSON preferences parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for PolyviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateStructure { type_name, name } => write!(
                f,
                "attempted to register structure with name {name}, but a \
                 structure of type {type_name} with that name already exists"
            ),
            Self::UnknownType { type_name } => {
                write!(f, "no structures of type {type_name} registered")
            }
            Self::StructureNotFound { type_name, name } => write!(
                f,
                "no structure of type {type_name} with name {name} registered"
            ),
            Self::AmbiguousLookup { type_name, count } => write!(
                f,
                "cannot use automatic structure get with empty name unless \
                 there is exactly one structure of that type registered \
                 ({count} of type {type_name})"
            ),
            Self::AmbiguousName {
                name,
                first_type,
                second_type,
            } => write!(
                f,
                "found two structures of different types named {name}: \
                 {first_type} and {second_type}"
            ),
            Self::NoStructureNamed { name } => {
                write!(f, "no structure named {name} to remove")
            }
            Self::WrongType {
                type_name,
                name,
                expected,
            } => write!(
                f,
                "structure {type_name}: {name} is not a {expected}"
            ),
            Self::PopRootContext => {
                write!(f, "called pop_context() too many times")
            }
            Self::AlreadyInitialized => write!(f, "initialize called twice"),
            Self::NotInitialized => {
                write!(f, "host used before initialization")
            }
            Self::NoImageSink => {
                write!(f, "no image sink configured for screenshots")
            }
            Self::Readback(msg) => write!(f, "readback failed: {msg}"),
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for PolyviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for PolyviewError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for PolyviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguity_message_names_both_types() {
        let err = PolyviewError::AmbiguousName {
            name: "bunny".into(),
            first_type: "Point Cloud".into(),
            second_type: "Surface Mesh".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Point Cloud"));
        assert!(msg.contains("Surface Mesh"));
        assert!(msg.contains("bunny"));
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err = PolyviewError::from(std::io::Error::other("disk"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
