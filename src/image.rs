use crate::RGBA;
use std::io::Write;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
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
    #[inline]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        row * self.row_stride + col * self.col_stride
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

    /// New image with columns reversed, `(row, col) ↦ (row, width-1-col)`.
    fn flip_horizontal(&self) -> ImageOwned<Self::Pixel>
    where
        Self::Pixel: Clone,
    {
        let shape = self.shape();
        let data = self.data();
        ImageOwned::new_with(shape.height, shape.width, |row, col| {
            data[shape.offset(row, shape.width - 1 - col)].clone()
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
        let index = shape.offset(row, col);
        self.data_mut().get_mut(index)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ImageOwned<P> {
    shape: Shape,
    data: Vec<P>,
}

impl<P> ImageOwned<P> {
    pub fn new_default(height: usize, width: usize) -> Self
    where
        P: Default,
    {
        Self::new_with(height, width, |_, _| Default::default())
    }

    pub fn new_with<F>(height: usize, width: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> P,
    {
        let mut data = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col))
            }
        }
        Self {
            shape: Shape {
                width,
                height,
                row_stride: width,
                col_stride: 1,
            },
            data,
        }
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

impl<'a, I> Image for &'a I
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

/// Encode an RGBA image as an 8-bit PNG.
pub fn write_png(img: &impl Image<Pixel = RGBA>, out: impl Write) -> Result<(), png::EncodingError> {
    let shape = img.shape();
    let mut encoder = png::Encoder::new(out, shape.width as u32, shape.height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let data = img.data();
    let mut raw: Vec<u8> = Vec::with_capacity(shape.width * shape.height * 4);
    if shape.col_stride == 1 {
        for row in 0..shape.height {
            let start = shape.offset(row, 0);
            raw.extend_from_slice(bytemuck::cast_slice(&data[start..start + shape.width]));
        }
    } else {
        for row in 0..shape.height {
            for col in 0..shape.width {
                raw.extend_from_slice(&data[shape.offset(row, col)].to_rgba());
            }
        }
    }
    writer.write_image_data(&raw)?;
    writer.finish()
}
