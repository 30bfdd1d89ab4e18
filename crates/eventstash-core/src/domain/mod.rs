//! Domain model (ids, keys, envelopes, principals, errors).

pub mod envelope;
pub mod errors;
pub mod ids;
pub mod key;
pub mod principal;

pub use self::envelope::{BlobEnvelope, Headers, is_preserved_header, select_headers};
pub use self::errors::{CacheError, ErrorKind, ValidationError};
pub use self::ids::{ArtifactName, EventId};
pub use self::key::CacheKey;
pub use self::principal::Principal;
