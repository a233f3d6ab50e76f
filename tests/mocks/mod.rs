//! Test doubles and fixtures shared by the integration tests.

pub mod fixtures;
pub mod mock_mistral_client;
pub mod mock_qr_detector;

#[allow(unused_imports)]
pub use mock_mistral_client::MockMistralClient;
#[allow(unused_imports)]
pub use mock_qr_detector::MockQrDetector;
