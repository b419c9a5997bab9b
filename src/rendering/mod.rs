pub mod png_out;
pub mod source;

pub use png_out::encode_indexed_png;
pub use source::load_image;
