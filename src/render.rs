pub(crate) mod artwork;
pub(crate) mod painter;
pub(crate) mod surface;
pub(crate) mod text;
