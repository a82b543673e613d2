pub(crate) mod matrix;
pub(crate) mod scan_bounds;
