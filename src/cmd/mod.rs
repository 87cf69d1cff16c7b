pub(crate) mod browse;
pub(crate) mod check;
pub(crate) mod export_api_schema;
