pub(crate) mod composite;
pub(crate) mod options;
pub(crate) mod rasterizer;
pub(crate) mod sample;
