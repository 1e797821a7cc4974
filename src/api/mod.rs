pub mod crud;
pub mod error;
pub mod media;
pub mod router;
