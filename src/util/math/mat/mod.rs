mod mat33;

pub use mat33::Mat33;
