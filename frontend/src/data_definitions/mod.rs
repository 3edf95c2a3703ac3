pub mod query_params;
pub mod url_param;
