use std::ops::Mul;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    pub fn cast<U: From<T>>(self) -> Size<U> {
        Size {
            width: U::from(self.width),
            height: U::from(self.height),
        }
    }
}

impl<T: Mul + Copy> Mul<T> for Size<T> {
    type Output = Size<<T as Mul>::Output>;

    fn mul(self, rhs: T) -> Self::Output {
        Size {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos<T> {
    pub x: T,
    pub y: T,
}

impl<T> Pos<T> {
    pub fn new(x: T, y: T) -> Self {
        Pos { x, y }
    }
}

/// Primary axis of a row of regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Left to right; lengths are widths.
    #[default]
    Horizontal,
    /// Top to bottom; lengths are heights.
    Vertical,
}

impl Axis {
    pub fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Axis::Vertical)
    }
}

impl<T> Rect<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Rect<i32> {
    pub const ZERO: Self = Rect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn from_size(size: Size<u32>) -> Self {
        Rect::new(0, 0, size.width as i32, size.height as i32)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: Pos<i32>) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(self.width.max(0) as u32, self.height.max(0) as u32)
    }

    /// Length along `axis`.
    pub fn length(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Start coordinate along `axis`.
    pub fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Build a rectangle whose `axis` span is `start..start+length` and whose
    /// cross span is copied from `self`.
    pub fn with_span(&self, axis: Axis, start: i32, length: i32) -> Self {
        match axis {
            Axis::Horizontal => Rect::new(start, self.y, length, self.height),
            Axis::Vertical => Rect::new(self.x, start, self.width, length),
        }
    }

    /// Shrink every edge inward. Negative results collapse to zero extent.
    pub fn inset(&self, top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Rect::new(
            self.x + left,
            self.y + top,
            (self.width - left - right).max(0),
            (self.height - top - bottom).max(0),
        )
    }
}
