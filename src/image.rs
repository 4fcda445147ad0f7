//! Raster images produced by [`render`](crate::render)
use crate::RGBA;

/// Size of the raster image in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Width of the image
    pub width: usize,
    /// Height of the image
    pub height: usize,
    /// How many elements we need to skip to get to the next row.
    pub row_stride: usize,
    /// How many elements we need to skip to get to the next column.
    pub col_stride: usize,
}

impl Shape {
    /// Shape of the densely packed row-major image
    pub fn contiguous(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            row_stride: size.width,
            col_stride: 1,
        }
    }

    #[inline]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        row * self.row_stride + col * self.col_stride
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn is_contiguous(&self) -> bool {
        self.col_stride == 1 && self.row_stride == self.width
    }
}

pub trait Image {
    type Pixel;

    fn data(&self) -> &[Self::Pixel];

    fn shape(&self) -> Shape;

    fn width(&self) -> usize {
        self.shape().width
    }

    fn height(&self) -> usize {
        self.shape().height
    }

    fn get(&self, row: usize, col: usize) -> Option<&Self::Pixel> {
        let shape = self.shape();
        if row >= shape.height || col >= shape.width {
            return None;
        }
        self.data().get(shape.offset(row, col))
    }

    /// Iterate over pixels in row-major order
    fn pixels(&self) -> impl Iterator<Item = &Self::Pixel> {
        let shape = self.shape();
        let data = self.data();
        (0..shape.height).flat_map(move |row| {
            (0..shape.width).filter_map(move |col| data.get(shape.offset(row, col)))
        })
    }
}

pub trait ImageMut: Image {
    fn data_mut(&mut self) -> &mut [Self::Pixel];

    fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Self::Pixel> {
        let shape = self.shape();
        if row >= shape.height || col >= shape.width {
            return None;
        }
        self.data_mut().get_mut(shape.offset(row, col))
    }

    /// Set every pixel to the value
    fn fill(&mut self, value: Self::Pixel)
    where
        Self::Pixel: Clone,
    {
        let shape = self.shape();
        let data = self.data_mut();
        for row in 0..shape.height {
            for col in 0..shape.width {
                if let Some(pixel) = data.get_mut(shape.offset(row, col)) {
                    *pixel = value.clone();
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageOwned<P> {
    shape: Shape,
    data: Vec<P>,
}

impl<P> ImageOwned<P> {
    pub fn new_default(size: Size) -> Self
    where
        P: Default,
    {
        Self::new_with(size, |_, _| Default::default())
    }

    pub fn new_with<F>(size: Size, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> P,
    {
        let mut data = Vec::with_capacity(size.height * size.width);
        for row in 0..size.height {
            for col in 0..size.width {
                data.push(f(row, col))
            }
        }
        Self {
            shape: Shape::contiguous(size),
            data,
        }
    }

    pub fn size(&self) -> Size {
        self.shape.size()
    }

    pub fn to_vec(self) -> Vec<P> {
        self.data
    }
}

impl<P> Image for ImageOwned<P> {
    type Pixel = P;

    fn shape(&self) -> Shape {
        self.shape
    }

    fn data(&self) -> &[Self::Pixel] {
        &self.data
    }
}

impl<P> ImageMut for ImageOwned<P> {
    fn data_mut(&mut self) -> &mut [Self::Pixel] {
        &mut self.data
    }
}

impl<I> Image for &I
where
    I: Image + ?Sized,
{
    type Pixel = I::Pixel;

    fn shape(&self) -> Shape {
        (*self).shape()
    }

    fn data(&self) -> &[Self::Pixel] {
        (*self).data()
    }
}

/// Encode image as 8-bit RGBA PNG
#[cfg(feature = "png")]
pub fn write_png(
    image: impl Image<Pixel = RGBA>,
    out: impl std::io::Write,
) -> Result<(), std::io::Error> {
    let shape = image.shape();
    let mut encoder = png::Encoder::new(out, shape.width as u32, shape.height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(std::io::Error::other)?;
    if cfg!(target_endian = "little") && shape.is_contiguous() {
        // RGBA is stored as ABGR u32 which is RGBA byte order on little-endian
        writer
            .write_image_data(bytemuck::cast_slice(image.data()))
            .map_err(std::io::Error::other)?;
    } else {
        let data: Vec<u8> = image.pixels().flat_map(|pixel| pixel.to_rgba()).collect();
        writer
            .write_image_data(&data)
            .map_err(std::io::Error::other)?;
    }
    Ok(())
}

/// Flatten image into RGBA bytes
pub fn to_rgba_bytes(image: impl Image<Pixel = RGBA>) -> Vec<u8> {
    image.pixels().flat_map(|pixel| pixel.to_rgba()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_access() {
        let mut image = ImageOwned::new_with(Size::new(3, 2), |row, col| row * 10 + col);
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.get(1, 2), Some(&12));
        assert_eq!(image.get(2, 0), None);
        assert_eq!(image.get(0, 3), None);
        if let Some(pixel) = image.get_mut(0, 1) {
            *pixel = 100;
        }
        let pixels: Vec<_> = image.pixels().copied().collect();
        assert_eq!(pixels, vec![0, 100, 2, 10, 11, 12]);
        image.fill(7);
        assert!(image.to_vec().into_iter().all(|pixel| pixel == 7));
    }

    #[test]
    fn test_rgba_bytes() {
        let image = ImageOwned::new_with(Size::new(2, 1), |_, col| {
            if col == 0 {
                RGBA::new(1, 2, 3, 4)
            } else {
                RGBA::WHITE
            }
        });
        assert_eq!(to_rgba_bytes(&image), vec![1, 2, 3, 4, 255, 255, 255, 255]);
        let bytes: &[u8] = bytemuck::cast_slice(image.data());
        if cfg!(target_endian = "little") {
            assert_eq!(bytes, to_rgba_bytes(&image).as_slice());
        }
    }

    #[cfg(feature = "png")]
    #[test]
    fn test_write_png() -> Result<(), std::io::Error> {
        let image = ImageOwned::new_with(Size::new(4, 4), |_, _| RGBA::WHITE);
        let mut out = Vec::new();
        write_png(&image, &mut out)?;
        assert_eq!(&out[..8], b"\x89PNG\r\n\x1a\n");
        Ok(())
    }
}
