//! Shared filtered-pagination contract used by every list endpoint.
//!
//! Every listing accepts `skip`/`limit` plus a typed per-entity filter set,
//! and answers with the `{data, totalRecords, currentPage, totalPages}`
//! envelope. String filters are case-insensitive substring matches, enum and
//! foreign-key filters are exact, and all conditions are ANDed together.

pub mod page;
pub mod query;

pub use page::{Page, PageParams};
pub use query::ListQuery;

use uuid::Uuid;

/// Effective office filter for a query.
///
/// A tenant-bound caller is always pinned to their own office, whatever the
/// client supplied. Tenant-free callers (head-office roles) may pass an
/// explicit office filter, or none to see all tenants.
pub fn office_scope(actor_office: Option<Uuid>, requested: Option<Uuid>) -> Option<Uuid> {
    actor_office.or(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_caller_overrides_client_filter() {
        let mine = Uuid::new_v4();
        let theirs = Uuid::new_v4();
        assert_eq!(office_scope(Some(mine), Some(theirs)), Some(mine));
        assert_eq!(office_scope(Some(mine), None), Some(mine));
    }

    #[test]
    fn free_caller_filter_is_honored() {
        let theirs = Uuid::new_v4();
        assert_eq!(office_scope(None, Some(theirs)), Some(theirs));
        assert_eq!(office_scope(None, None), None);
    }
}
