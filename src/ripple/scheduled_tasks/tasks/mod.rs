mod category_catalog_refresh;
mod profile_reconciliation;

pub(crate) use category_catalog_refresh::CategoryCatalogRefresh;
pub(crate) use profile_reconciliation::ProfileReconciliation;
