pub(crate) mod docs;
pub(crate) mod routes;
pub(crate) mod server;
