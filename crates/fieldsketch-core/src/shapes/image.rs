//! Image shape for embedding raster backgrounds and photos.

use super::{Drawable, ShapeId, ShapeStyle};
use crate::geometry::point_in_rect;
use crate::surface::{ImageHandle, Surface};
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// Decode progress of the embedded payload. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ImageLoad {
    #[default]
    Pending,
    Ready { handle: ImageHandle, natural: Size },
    Failed,
}

/// A raster image placed in a rectangle.
///
/// Geometry is usable before the host finishes decoding `image_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    pub(crate) id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// `data:` URL with a base64 payload.
    pub image_data: Option<String>,
    #[serde(flatten)]
    pub style: ShapeStyle,
    #[serde(skip)]
    load: ImageLoad,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            id: ShapeId::new(),
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            image_data: None,
            style: ShapeStyle {
                opacity: 0.5,
                ..ShapeStyle::default()
            },
            load: ImageLoad::Pending,
        }
    }
}

// Decode state is host-side and does not take part in equality.
impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.x == other.x
            && self.y == other.y
            && self.w == other.w
            && self.h == other.h
            && self.image_data == other.image_data
            && self.style == other.style
    }
}

impl Image {
    /// Image placed at `rect` referencing an existing data URL.
    pub fn new(rect: Rect, data_url: impl Into<String>) -> Self {
        Self {
            x: rect.x0,
            y: rect.y0,
            w: rect.width(),
            h: rect.height(),
            image_data: Some(data_url.into()),
            ..Self::default()
        }
    }

    /// Embed raw bytes. Size stays zero until the decoded natural size arrives.
    pub fn from_bytes(position: Point, data: &[u8], format: ImageFormat) -> Self {
        Self {
            x: position.x,
            y: position.y,
            image_data: Some(format!(
                "data:{};base64,{}",
                format.mime_type(),
                STANDARD.encode(data)
            )),
            ..Self::default()
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h).abs()
    }

    pub fn load_state(&self) -> ImageLoad {
        self.load
    }

    /// Split the data URL into MIME type and base64 payload.
    fn data_url_parts(&self) -> Option<(&str, &str)> {
        let rest = self.image_data.as_deref()?.strip_prefix("data:")?;
        let (meta, payload) = rest.split_once(',')?;
        let mime = meta.strip_suffix(";base64")?;
        Some((mime, payload))
    }

    /// Decoded payload bytes.
    pub fn payload(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.data_url_parts()?;
        STANDARD.decode(payload.trim()).ok()
    }

    /// Format from the declared MIME type, falling back to sniffing the payload.
    pub fn format(&self) -> Option<ImageFormat> {
        let (mime, _) = self.data_url_parts()?;
        ImageFormat::from_mime_type(mime)
            .or_else(|| self.payload().and_then(|bytes| ImageFormat::from_magic_bytes(&bytes)))
    }

    /// Replace the payload and size, resetting the decode state.
    pub fn set_image(&mut self, data_url: impl Into<String>, natural: Size) {
        self.image_data = Some(data_url.into());
        self.w = natural.width;
        self.h = natural.height;
        self.load = ImageLoad::Pending;
    }

    /// Host finished decoding. Images placed without a size adopt the natural size.
    pub fn mark_decoded(&mut self, handle: ImageHandle, natural: Size) {
        if self.w == 0.0 && self.h == 0.0 {
            self.w = natural.width;
            self.h = natural.height;
        }
        self.load = ImageLoad::Ready { handle, natural };
    }

    pub fn mark_failed(&mut self) {
        self.load = ImageLoad::Failed;
    }
}

impl Drawable for Image {
    fn id(&self) -> &ShapeId {
        &self.id
    }

    fn bounds(&self) -> Option<Rect> {
        Some(self.as_rect())
    }

    fn hit_test(&self, point: Point) -> bool {
        point_in_rect(point, self.as_rect())
    }

    fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let ImageLoad::Ready { handle, .. } = self.load else {
            return;
        };
        surface.set_alpha(self.style.opacity.clamp(0.0, 1.0));
        surface.draw_image(handle, self.as_rect());
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
