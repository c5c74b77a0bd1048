pub(crate) mod blend;
pub(crate) mod params;
pub(crate) mod watermarker;
