mod masked;
mod spinner;

pub use masked::read_masked_line;
pub use spinner::Spinner;
