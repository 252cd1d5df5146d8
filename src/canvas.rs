use std::path::Path;

use anyhow::{Context, Error};

/// An 8-bit RGB color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A buffer of color data, with the top-left being `(0,0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    buffer: Vec<Color>,
}

/// An iterator for the rows of the image, starting at the top and working down.
pub struct Rows<'a> {
    canvas: &'a Canvas,
    row: usize,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn to_u8(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Scale every channel by `intensity`, clamping to the displayable range and truncating.
    pub fn scale(&self, intensity: f32) -> Self {
        let convert = |x: u8| (x as f32 * intensity).clamp(0.0, 255.0) as u8;
        Self::new(convert(self.r), convert(self.g), convert(self.b))
    }

    /// Convert the [`Color`] to grayscale, in `[0, 1]`.
    pub fn to_grayscale(&self) -> f32 {
        (0.3 * self.r as f32 + 0.59 * self.g as f32 + 0.11 * self.b as f32) / 255.0
    }
}

impl Canvas {
    /// Construct a new [`Canvas`] filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            buffer: vec![Color::black(); size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (self.width as usize) * y + x
    }

    /// Mutate a color in the [`Canvas`].
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut Color {
        let ix = self.index(x, y);
        &mut self.buffer[ix]
    }

    /// Fetch a color in the [`Canvas`].
    pub fn get(&self, x: usize, y: usize) -> &Color {
        let ix = self.index(x, y);
        &self.buffer[ix]
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        self.buffer.fill(color);
    }

    /// The pixels of the canvas, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.buffer
    }

    /// Mutable access to the pixels of the canvas, row-major.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.buffer
    }

    /// Return an iterator to the rows of the image.
    pub fn rows(&self) -> Rows {
        Rows {
            canvas: self,
            row: 0,
        }
    }

    /// Return raw image RGB8 data for the image.
    pub fn data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.buffer.len() * 3);

        for row in self.rows() {
            for color in row {
                data.extend_from_slice(&color.to_u8())
            }
        }

        data
    }

    /// Write the [`Canvas`] out as an image, with the format chosen by the extension of `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.data(),
            self.width,
            self.height,
            image::ExtendedColorType::Rgb8,
        )
        .with_context(|| format!("failed to write `{}`", path.display()))
    }

    /// Return an ascii version of the [`Canvas`], `cols` characters wide.
    ///
    /// Terminal cells are roughly twice as tall as they are wide, so lines step twice as far
    /// through the image as columns do.
    pub fn to_ascii(&self, cols: u32) -> String {
        let mut buf = String::new();
        let palette = r#" .'`^",:;Il!i><~+_-?][}{1)(|\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$"#;
        let bytes = palette.as_bytes();
        let bound = (palette.len() - 1) as f32;

        let cols = cols.clamp(1, self.width.max(1));
        let step_x = self.width as f32 / cols as f32;
        let step_y = step_x * 2.0;
        let lines = (self.height as f32 / step_y) as u32;

        for line in 0..lines {
            let y = ((line as f32 + 0.5) * step_y) as usize;
            for col in 0..cols {
                let x = ((col as f32 + 0.5) * step_x) as usize;
                let g = self.get(x, y).to_grayscale();
                let index = (g.clamp(0.0, 1.0) * bound).round() as usize;
                buf.push(bytes[index] as char);
            }
            buf.push('\n');
        }

        buf
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a [Color];

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.canvas.height as usize {
            return None;
        }

        let len = self.canvas.width as usize;
        let start = self.row * len;
        self.row += 1;

        Some(&self.canvas.buffer[start..start + len])
    }
}

#[test]
fn test_scale_clamps_and_truncates() {
    let c = Color::new(231, 76, 60);
    assert_eq!(Color::new(255, 114, 90), c.scale(1.5));
    assert_eq!(Color::new(23, 7, 6), c.scale(0.1));
    assert_eq!(Color::black(), c.scale(0.0));
}

#[test]
fn test_rows_top_down() {
    let mut c = Canvas::new(3, 2);
    *c.get_mut(1, 0) = Color::new(1, 2, 3);
    let rows: Vec<_> = c.rows().collect();
    assert_eq!(2, rows.len());
    assert_eq!(Color::new(1, 2, 3), rows[0][1]);
    assert_eq!(&c.data()[3..6], &[1, 2, 3]);
}

#[test]
fn test_to_ascii_dimensions() {
    let mut c = Canvas::new(8, 8);
    c.fill(Color::new(255, 255, 255));
    let ascii = c.to_ascii(4);
    let lines: Vec<_> = ascii.lines().collect();
    assert_eq!(2, lines.len());
    assert!(lines.iter().all(|l| l == &"$$$$"));
}
