mod service;
mod store;

pub use service::{store_image, StoredImage};
pub use store::{LocalStore, MediaStore, S3Store};
