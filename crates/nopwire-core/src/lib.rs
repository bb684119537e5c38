//! nopwire-core — wire-format primitives shared by the `nopwire` codec engine.
//!
//! Fournit :
//! - `EncodingByte` : l'alphabet de tags du format fil
//! - `SizeType` : l'entier canonique des préfixes de longueur
//! - `Status<T>` / `Error` / `ErrorKind` : le porteur de résultat uniforme
//! - `Reader` / `Writer` : les contrats d'E/S sur lesquels le codec s'appuie,
//!   plus leurs implémentations mémoire (`SliceReader`, `VecWriter`),
//!   d'échec contrôlé (`FailingReader`, `FailingWriter`) et `std::io`
//!   (`IoReader`, `IoWriter`)
//! - `HandleReference` / `EMPTY_HANDLE_REFERENCE`
//!
//! Ce crate ne connaît rien des types composites (structures, tables,
//! variants) : c'est le rôle de `nopwire`, qui s'appuie dessus comme
//! `vitte-vitbc` s'appuie sur `vitte-core`.

#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod error;
mod handle;
mod size;
mod tag;

/// Reader/Writer contracts and their in-memory, failing, and `std::io` adapters.
pub mod io;

pub use error::{Error, ErrorKind, Status};
pub use handle::{HandleReference, EMPTY_HANDLE_REFERENCE};
pub use size::SizeType;
pub use tag::EncodingByte;

/// Convenient glob import for consumers.
pub mod prelude {
    pub use crate::io::{
        BoundedReader, FailingReader, FailingWriter, NoHandle, Reader, SliceReader, VecWriter,
        Writer,
    };
    pub use crate::{EncodingByte, Error, ErrorKind, SizeType, Status, EMPTY_HANDLE_REFERENCE};

    #[cfg(feature = "std")]
    pub use crate::io::{IoReader, IoWriter};
}
