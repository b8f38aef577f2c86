pub(crate) mod analytics;
pub(crate) mod grading;
pub(crate) mod normalize;
pub(crate) mod submissions;
