//! Shared test data.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use qrcode::{Color, QrCode};
use std::io::Cursor;

const QR_MODULE_PX: u32 = 6;
const QR_QUIET_ZONE: u32 = 4;

/// A vCard with all four target fields.
pub const COMPLETE_VCARD: &str = "BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
FN:Jane Doe\r\n\
N:Doe;Jane;;;\r\n\
EMAIL;TYPE=INTERNET,WORK:JANE.DOE@Example.COM\r\n\
TEL;TYPE=CELL:+1 555 123 4567\r\n\
ADR;TYPE=WORK:;;42 Harbor Rd;Portland;OR;97201;USA\r\n\
END:VCARD\r\n";

/// The record the structured parser produces for `COMPLETE_VCARD`.
pub const COMPLETE_RECORD_JSON: &str = r#"{"fullName":"Jane Doe","email":"jane.doe@example.com","phone":"+15551234567","address":"42 Harbor Rd, Portland, OR, 97201, USA"}"#;

/// `COMPLETE_VCARD` without its TEL line.
pub fn vcard_without_phone() -> String {
    COMPLETE_VCARD
        .split("\r\n")
        .filter(|line| !line.starts_with("TEL"))
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// A blank white PNG with no QR code in it.
pub fn blank_png() -> Vec<u8> {
    encode_png(RgbImage::from_pixel(96, 96, Rgb([255, 255, 255])))
}

/// A QR code carrying `payload`, rendered black on white with a quiet zone.
pub fn qr_image(payload: &str) -> RgbImage {
    let code = QrCode::new(payload.as_bytes()).expect("payload fits in a QR code");
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let side = (modules + 2 * QR_QUIET_ZONE) * QR_MODULE_PX;

    RgbImage::from_fn(side, side, |x, y| {
        let mx = (x / QR_MODULE_PX).checked_sub(QR_QUIET_ZONE);
        let my = (y / QR_MODULE_PX).checked_sub(QR_QUIET_ZONE);
        match (mx, my) {
            (Some(mx), Some(my)) if mx < modules && my < modules => {
                match colors[(my * modules + mx) as usize] {
                    Color::Dark => Rgb([0, 0, 0]),
                    Color::Light => Rgb([255, 255, 255]),
                }
            }
            _ => Rgb([255, 255, 255]),
        }
    })
}

/// `qr_image(payload)` as PNG bytes.
pub fn qr_png(payload: &str) -> Vec<u8> {
    encode_png(qr_image(payload))
}

fn encode_png(image: RgbImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

/// A fenced JSON reply in the shape the model is asked for.
pub fn fenced_reply(json: &str) -> String {
    format!("```json\n{}\n```", json)
}
