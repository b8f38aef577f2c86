pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod pagination;
pub(crate) mod router;
pub(crate) mod sections;
pub(crate) mod sets;
pub(crate) mod submissions;
