pub mod checksum;
pub mod config;
pub mod locate;
pub mod logging;
pub mod params;
pub mod reader;
pub mod scan;
pub mod span;
pub mod types;
pub mod vfs;
pub mod writer;

pub use config::{LocatorSettings, MatchingSettings};
pub use locate::{LocateError, Located, locate};
pub use reader::{DeclarationRecord, FunctionLocationReader, ImplementationRecord, LocatedRecord};
pub use scan::{Direction, find_matching_bracket, find_outside_literals_and_comments};
pub use span::SourceSpan;
pub use types::signature::{ParameterSignature, SignatureParam};
pub use types::{TypeDescriptor, normalize, parse_descriptor, types_match};
pub use writer::{PositionalWriter, WriteError, WriteTarget};
