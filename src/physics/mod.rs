pub mod pressure;
pub mod wavelet;

pub use pressure::WaterColumn;
pub use wavelet::MultiOrmsbyWavelet;
