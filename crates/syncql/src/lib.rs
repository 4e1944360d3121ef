//! ## Crate layout
//! - `core`: predicates, catalog, literal grammar, composer, config, and
//!   observability.
//! - `entity!`: declares an entity type, its static model, and its typed
//!   field handles in one place.
//!
//! The `prelude` module carries everything needed to describe and compose
//! a query against a declared entity.

pub use syncql_core as core;

/// re-exports
///
/// the `entity!` macro expands against these, so callers do not need the
/// underlying crates in their own Cargo.toml
pub mod __reexports {
    pub use chrono;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{
    Error,
    config::CompilerConfig,
    error::{ErrorClass, ErrorOrigin},
};

//
// Macros
//

/// Declare an entity type together with its static model.
///
/// Each field line reads `CONST => field_name: ScalarType`, optionally
/// followed by `as "wireName"` when the service name is not the
/// lowerCamelCase form of `field_name`.
///
/// ```ignore
/// syncql::entity! {
///     pub struct Movie: "movie" {
///         TITLE => title: Text,
///         MPAA_RATING => mpaa_rating: Text as "rating",
///     }
/// }
/// ```
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $entity:literal {
            $( $konst:ident => $field:ident : $kind:ident $( as $wire:literal )? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        $vis struct $name;

        impl $name {
            $(
                pub const $konst: $crate::core::query::FieldRef = $crate::core::query::FieldRef::new(
                    stringify!($field),
                    $crate::core::value::ScalarType::$kind,
                );
            )*

            pub const FIELDS: &'static [$crate::core::model::EntityFieldModel] = &[
                $(
                    $crate::core::model::EntityFieldModel::new(
                        stringify!($field),
                        $crate::core::value::ScalarType::$kind,
                    ) $( .renamed($wire) )?
                ),*
            ];

            /// Start an empty query against this entity.
            #[must_use]
            pub const fn query() -> $crate::core::query::QueryBuilder<Self> {
                $crate::core::query::QueryBuilder::new()
            }
        }

        impl $crate::core::model::EntityKind for $name {
            const MODEL: &'static $crate::core::model::EntityModel =
                &$crate::core::model::EntityModel::new($entity, Self::FIELDS);
        }
    };
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        prelude::*,
        query::{OrderKey, QueryError},
    };
    pub use crate::{CompilerConfig, entity};
}
