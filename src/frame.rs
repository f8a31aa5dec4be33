use std::io::{self, Write};

use crate::constants::PLANE_COUNT;

/// One 8-bit sample plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl Plane {
    pub fn new(width: usize, height: usize, fill: u8) -> Self {
        Self {
            width,
            height,
            stride: width,
            data: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Visible samples of row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Samples from (`x`, `y`) to the end of the plane, for block writers
    /// addressing rows through the stride.
    pub(crate) fn tail_mut(&mut self, x: usize, y: usize) -> Option<&mut [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get_mut(y * self.stride + x..)
    }
}

/// Planar YUV 4:2:0 picture: full resolution luma followed by two chroma
/// planes of half width and height, rounded up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    planes: [Plane; PLANE_COUNT],
}

impl Frame {
    /// Black picture: luma 0, chroma at the neutral 0x80.
    pub fn new(width: usize, height: usize) -> Self {
        let chroma_width = width.div_ceil(2);
        let chroma_height = height.div_ceil(2);
        Self {
            planes: [
                Plane::new(width, height, 0),
                Plane::new(chroma_width, chroma_height, 0x80),
                Plane::new(chroma_width, chroma_height, 0x80),
            ],
        }
    }

    pub fn width(&self) -> usize {
        self.planes[0].width
    }

    pub fn height(&self) -> usize {
        self.planes[0].height
    }

    pub fn plane(&self, index: usize) -> &Plane {
        &self.planes[index]
    }

    pub(crate) fn plane_mut(&mut self, index: usize) -> &mut Plane {
        &mut self.planes[index]
    }

    /// Copies all samples from a frame of the same geometry.
    pub(crate) fn copy_from(&mut self, other: &Frame) {
        for (dst, src) in self.planes.iter_mut().zip(&other.planes) {
            dst.data.copy_from_slice(&src.data);
        }
    }

    /// Writes the visible samples as raw I420: Y, then U, then V.
    pub fn write_i420<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for plane in &self.planes {
            for y in 0..plane.height {
                out.write_all(plane.row(y))?;
            }
        }
        Ok(())
    }

    /// Writes a PGM image with the luma plane on top and the two chroma
    /// planes side by side below it (the `pgmyuv` layout).
    pub fn write_pgmyuv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let [luma, u, v] = &self.planes;
        let width = luma.width.max(u.width * 2);
        let height = luma.height + u.height;
        write!(out, "P5\n{} {}\n255\n", width, height)?;

        let luma_pad = vec![0u8; width - luma.width];
        for y in 0..luma.height {
            out.write_all(luma.row(y))?;
            out.write_all(&luma_pad)?;
        }
        let chroma_pad = vec![0x80u8; width - u.width * 2];
        for y in 0..u.height {
            out.write_all(u.row(y))?;
            out.write_all(v.row(y))?;
            out.write_all(&chroma_pad)?;
        }
        Ok(())
    }
}
