pub mod cancel;
pub use cancel::with_cancellation;
