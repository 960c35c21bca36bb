pub mod phonepe;

pub use phonepe::extract_phonepe_text;
