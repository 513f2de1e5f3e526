// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for PawMatch.
//!
//! This crate provides the domain types, the store-neutral query model,
//! error types, and the adapter traits implemented by the store and
//! generative-AI clients.

pub mod error;
pub mod query;
pub mod traits;
pub mod types;

pub use error::{ApiError, ApiResult, PawError};
pub use query::{Direction, Filter, Operation, Query, StoreOutput, StoreRequest, Table};
pub use types::{AdapterType, HealthStatus};

pub use traits::{GenerationAdapter, PluginAdapter, RecordStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Store, AdapterType::Generator] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_record_store<T: RecordStore>() {}
        fn _assert_generation_adapter<T: GenerationAdapter>() {}
    }
}
