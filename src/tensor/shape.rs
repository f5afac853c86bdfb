use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of an NHWC image tensor: batch × height × width × channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorShape {
    pub batch: usize,
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl TensorShape {
    pub fn new(batch: usize, height: usize, width: usize, channels: usize) -> Self {
        TensorShape { batch, height, width, channels }
    }

    pub fn element_count(&self) -> usize {
        self.batch * self.height * self.width * self.channels
    }

    /// Row-major strides for (batch, height, width, channel).
    pub fn strides(&self) -> [usize; 4] {
        let c = self.channels;
        let wc = self.width * c;
        [self.height * wc, wc, c, 1]
    }

    /// Flat buffer offset of element `(n, y, x, c)`, or `None` when any
    /// coordinate lies outside the shape.
    pub fn offset(&self, n: usize, y: usize, x: usize, c: usize) -> Option<usize> {
        if n >= self.batch || y >= self.height || x >= self.width || c >= self.channels {
            return None;
        }
        let [sn, sy, sx, sc] = self.strides();
        Some(n * sn + y * sy + x * sx + c * sc)
    }

    pub fn dims(&self) -> [usize; 4] {
        [self.batch, self.height, self.width, self.channels]
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.batch, self.height, self.width, self.channels)
    }
}
