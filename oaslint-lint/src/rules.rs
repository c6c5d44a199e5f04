//! The bundled rule set.

mod component_schema_name_capital;
mod operation_description_required;
mod operation_pagination;
mod path_no_trailing_slash;
mod ref_cycle;
mod server_url_https;
mod unresolved_ref;

pub use component_schema_name_capital::ComponentSchemaNameCapitalRule;
pub use operation_description_required::OperationDescriptionRequiredRule;
pub use operation_pagination::OperationPaginationRule;
pub use path_no_trailing_slash::PathNoTrailingSlashRule;
pub use ref_cycle::RefCycleRule;
pub use server_url_https::ServerUrlHttpsRule;
pub use unresolved_ref::UnresolvedRefRule;

use crate::rule::Rule;

/// Builds the default bundled rule set.
///
/// In debug builds, asserts every id is unique and kebab-case, matching
/// the convention rule ids are documented under (§4.9).
pub fn rules() -> Vec<Box<dyn Rule>> {
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(PathNoTrailingSlashRule),
        Box::new(ComponentSchemaNameCapitalRule),
        Box::new(OperationDescriptionRequiredRule),
        Box::new(UnresolvedRefRule),
        Box::new(ServerUrlHttpsRule),
        Box::new(OperationPaginationRule),
        Box::new(RefCycleRule),
    ];

    #[cfg(debug_assertions)]
    {
        let mut seen = std::collections::HashSet::new();
        for rule in &rules {
            let id = rule.meta().id;
            let is_kebab_case = id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                && !id.starts_with('-')
                && !id.ends_with('-');
            assert!(is_kebab_case, "lint rule id `{id}` is not kebab-case");
            assert!(seen.insert(id), "duplicate rule id `{id}`");
        }
    }

    rules
}
