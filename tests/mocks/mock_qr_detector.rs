use image::RgbImage;
use qr_contact_server::qr::QrDetector;
use std::sync::{Arc, Mutex};

/// QR detector that ignores the image and returns fixed payloads.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockQrDetector {
    payloads: Vec<String>,
    calls: Arc<Mutex<usize>>,
}

#[allow(dead_code)]
impl MockQrDetector {
    pub fn new(payloads: &[&str]) -> Self {
        Self {
            payloads: payloads.iter().map(|p| p.to_string()).collect(),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl QrDetector for MockQrDetector {
    fn detect_and_decode(&self, _image: &RgbImage) -> Vec<String> {
        *self.calls.lock().unwrap() += 1;
        self.payloads.clone()
    }
}
